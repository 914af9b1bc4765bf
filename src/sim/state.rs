//! Simulation state: the grid plus the arena of squares living on it

use glam::{IVec2, Vec2};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::grid::Grid;
use super::surface::{DrawSurface, MarkerHandle};
use crate::settings::{Settings, Tuning};
use crate::{grid_to_pixel, pixel_to_cell};

/// Index of a square in `SimulationState::squares`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SquareId(pub u32);

impl SquareId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A square on the grid
#[derive(Debug, Clone)]
pub struct Square {
    pub id: SquareId,
    /// Continuous position in grid units
    pub pos: Vec2,
    pub vel: Vec2,
    /// Force from the most recent sample
    pub pending_force: Vec2,
    /// Index of the grid cell this square occupies
    pub cell: usize,
    pub marker: MarkerHandle,
}

/// Everything a tick reads and writes
#[derive(Debug, Clone)]
pub struct SimulationState {
    pub grid: Grid,
    /// Arena of squares; `squares[id.index()].id == id`
    pub squares: Vec<Square>,
    pub tuning: Tuning,
    /// Cell side in pixels, for reporting marker positions
    pub cell_size: f32,
    /// Whether the next paced step resamples forces
    pub recompute_force: bool,
    /// Ticks run since the last reset
    pub time_ticks: u64,
    pub seed: u64,
    rng: Pcg32,
}

impl SimulationState {
    /// Create an empty grid of `width x height` cells
    pub fn new(width: i32, height: i32, settings: &Settings, seed: u64) -> Self {
        Self {
            grid: Grid::new(width, height, settings.tuning.exclusion_half_extent),
            squares: Vec::new(),
            tuning: settings.tuning,
            cell_size: settings.cell_size,
            recompute_force: true,
            time_ticks: 0,
            seed,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Fill the grid, rolling once per cell, column by column
    pub fn populate(&mut self, surface: &mut impl DrawSurface) {
        let p = self.tuning.spawn_probability;
        for x in 0..self.grid.width() {
            for y in 0..self.grid.height() {
                if self.rng.random::<f64>() < p {
                    self.spawn_square(IVec2::new(x, y), surface);
                }
            }
        }

        log::info!(
            "Populated {}x{} grid with {} squares",
            self.grid.width(),
            self.grid.height(),
            self.squares.len()
        );
    }

    /// Place a square on a free cell inside the grid.
    ///
    /// Exclusion walls are not checked; a square may start inside the window.
    pub fn spawn_square(&mut self, at: IVec2, surface: &mut impl DrawSurface) -> Option<SquareId> {
        if !self.grid.contains(at.x, at.y) {
            return None;
        }
        let index = (at.y * self.grid.width() + at.x) as usize;
        if self.grid.cell(index).is_occupied() {
            return None;
        }

        let id = SquareId(self.squares.len() as u32);
        let pos = at.as_vec2();
        let marker = surface.place_marker(grid_to_pixel(pos, self.cell_size));
        self.grid.set_occupant(index, Some(id));
        self.squares.push(Square {
            id,
            pos,
            vel: Vec2::ZERO,
            pending_force: Vec2::ZERO,
            cell: index,
            marker,
        });
        Some(id)
    }

    /// Throw everything away and start over on a `width x height` grid
    pub fn reset(&mut self, width: i32, height: i32, surface: &mut impl DrawSurface) {
        surface.clear_markers();
        self.squares.clear();
        self.grid = Grid::new(width, height, self.tuning.exclusion_half_extent);
        self.recompute_force = true;
        self.time_ticks = 0;
        log::debug!("Rebuilding {}x{} grid (seed {})", width, height, self.seed);
        self.populate(surface);
    }

    pub fn square(&self, id: SquareId) -> &Square {
        &self.squares[id.index()]
    }

    /// Coordinates of the cell a square occupies
    pub fn square_cell(&self, id: SquareId) -> IVec2 {
        self.grid.cell(self.square(id).cell).coords()
    }

    /// Move the exclusion window under a pointer at pixel `px`.
    ///
    /// The center is clamped to one window beyond the halo; past that the
    /// window only covers cells that are walls already.
    pub fn set_pointer(&mut self, px: Vec2) {
        let reach = self.grid.exclusion_half_extent() + 1;
        let center = pixel_to_cell(px, self.cell_size).clamp(
            IVec2::splat(-reach),
            IVec2::new(self.grid.width() + reach, self.grid.height() + reach),
        );
        self.grid.set_exclusion_center(center);
    }

    /// Every square sits in its own cell and every occupied cell points back
    pub fn is_consistent(&self) -> bool {
        let back_refs = self
            .squares
            .iter()
            .all(|s| self.grid.cell(s.cell).occupant == Some(s.id));
        back_refs && self.grid.occupied_count() == self.squares.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::MarkerLayer;
    use crate::sim::CellKind;

    #[test]
    fn test_populate_is_seeded() {
        let settings = Settings::default();
        let mut a = SimulationState::new(40, 30, &settings, 42);
        let mut b = SimulationState::new(40, 30, &settings, 42);
        let mut layer_a = MarkerLayer::default();
        let mut layer_b = MarkerLayer::default();
        a.populate(&mut layer_a);
        b.populate(&mut layer_b);

        assert!(!a.squares.is_empty());
        assert_eq!(a.squares.len(), b.squares.len());
        assert_eq!(layer_a.len(), a.squares.len());
        for (sa, sb) in a.squares.iter().zip(&b.squares) {
            assert_eq!(sa.cell, sb.cell);
        }
        assert!(a.is_consistent());
    }

    #[test]
    fn test_populate_density() {
        let settings = Settings::default();
        let mut state = SimulationState::new(100, 100, &settings, 7);
        state.populate(&mut MarkerLayer::default());
        // 6.4% of 10,000 cells
        let n = state.squares.len();
        assert!((450..=850).contains(&n), "got {} squares", n);
    }

    #[test]
    fn test_spawn_square() {
        let settings = Settings::default();
        let mut state = SimulationState::new(10, 10, &settings, 1);
        let mut layer = MarkerLayer::default();

        let id = state.spawn_square(IVec2::new(2, 3), &mut layer).expect("free cell");
        assert_eq!(state.square_cell(id), IVec2::new(2, 3));
        assert_eq!(layer.position(state.square(id).marker), Some(Vec2::new(10.0, 15.0)));

        assert!(state.spawn_square(IVec2::new(2, 3), &mut layer).is_none());
        assert!(state.spawn_square(IVec2::new(-1, 3), &mut layer).is_none());
        assert!(state.spawn_square(IVec2::new(10, 0), &mut layer).is_none());
        assert!(state.is_consistent());
    }

    #[test]
    fn test_reset_rebuilds() {
        let settings = Settings::default();
        let mut state = SimulationState::new(20, 20, &settings, 3);
        let mut layer = MarkerLayer::default();
        state.populate(&mut layer);
        state.set_pointer(Vec2::new(0.0, 0.0));
        state.time_ticks = 12;

        state.reset(30, 10, &mut layer);
        assert_eq!(state.grid.width(), 30);
        assert_eq!(state.grid.height(), 10);
        assert_eq!(state.grid.exclusion_center(), IVec2::new(15, 5));
        assert_eq!(state.time_ticks, 0);
        assert_eq!(layer.len(), state.squares.len());
        assert!(state.is_consistent());
    }

    #[test]
    fn test_set_pointer() {
        let settings = Settings::default();
        let mut state = SimulationState::new(40, 40, &settings, 3);
        state.set_pointer(Vec2::new(52.0, 98.0));
        assert_eq!(state.grid.exclusion_center(), IVec2::new(10, 20));
    }

    #[test]
    fn test_far_pointer_is_clamped() {
        let settings = Settings::default();
        let mut state = SimulationState::new(40, 30, &settings, 3);

        state.set_pointer(Vec2::new(-1.0e12, 10.0));
        assert_eq!(state.grid.exclusion_center(), IVec2::new(-3, 2));
        assert_eq!(state.grid.resolve_cell(-2, 2), CellKind::Wall);
        assert!(matches!(state.grid.resolve_cell(0, 2), CellKind::Real(_)));

        state.set_pointer(Vec2::new(1.0e12, -1.0e12));
        assert_eq!(state.grid.exclusion_center(), IVec2::new(43, -3));
        assert!(matches!(state.grid.resolve_cell(39, 0), CellKind::Real(_)));
    }
}
