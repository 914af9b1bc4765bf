//! Local repulsion field
//!
//! Every blocked cell in the sampling window pushes the center away along
//! the offset from that cell. The sum is scaled by `count^exponent`, which
//! grows slower than the count so crowds still push hard.

use glam::{IVec2, Vec2};

use super::grid::Grid;
use crate::settings::Tuning;

/// Repulsion at `(x, y)` from walls and occupied cells in the sampling window.
///
/// The window includes the center itself, so a square counts itself
/// (adding nothing to the sum).
pub fn sample_force(grid: &Grid, at: IVec2, tuning: &Tuning) -> Vec2 {
    let r = tuning.sample_radius;
    let center = at.as_vec2();
    let mut force = Vec2::ZERO;
    let mut count = 0u32;

    for i in (at.x - r)..=(at.x + r) {
        for j in (at.y - r)..=(at.y + r) {
            if grid.resolve_cell(i, j).is_blocked() {
                force += center - Vec2::new(i as f32, j as f32);
                count += 1;
            }
        }
    }

    normalize_force(force, count, tuning.force_exponent)
}

/// Scale an accumulated force by `count^exponent`; nothing sampled means no force
#[inline]
pub fn normalize_force(sum: Vec2, count: u32, exponent: f32) -> Vec2 {
    if count == 0 {
        return Vec2::ZERO;
    }
    sum / (count as f32).powf(exponent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::SquareId;

    fn open_grid() -> Grid {
        let mut grid = Grid::new(10, 10, 2);
        grid.set_exclusion_center(IVec2::new(-1000, -1000));
        grid
    }

    fn occupy(grid: &mut Grid, x: i32, y: i32, id: u32) {
        let index = grid.resolve_cell(x, y).as_real().expect("real cell").index;
        grid.set_occupant(index, Some(SquareId(id)));
    }

    #[test]
    fn test_empty_neighbourhood_is_zero() {
        let grid = open_grid();
        assert_eq!(sample_force(&grid, IVec2::new(5, 5), &Tuning::default()), Vec2::ZERO);
    }

    #[test]
    fn test_zero_count_is_finite() {
        let f = normalize_force(Vec2::ZERO, 0, 1.0 / 2.4);
        assert_eq!(f, Vec2::ZERO);
        assert!(f.is_finite());
    }

    #[test]
    fn test_self_only_is_zero() {
        let mut grid = open_grid();
        occupy(&mut grid, 5, 5, 0);
        assert_eq!(sample_force(&grid, IVec2::new(5, 5), &Tuning::default()), Vec2::ZERO);
    }

    #[test]
    fn test_pushes_away_from_neighbour() {
        let mut grid = open_grid();
        occupy(&mut grid, 5, 5, 0);
        occupy(&mut grid, 5, 6, 1);

        let tuning = Tuning::default();
        let force = sample_force(&grid, IVec2::new(5, 5), &tuning);
        // Self plus one neighbour: count 2
        let expected = Vec2::new(0.0, -1.0) / 2f32.powf(tuning.force_exponent);
        assert!((force - expected).length() < 1e-6);
        assert!(force.y < 0.0);
    }

    #[test]
    fn test_outer_wall_pushes_inward() {
        let grid = open_grid();
        let force = sample_force(&grid, IVec2::new(0, 5), &Tuning::default());
        // Column x = -2 is wall, x = -1 is void
        let expected = Vec2::new(10.0, 0.0) / 5f32.powf(1.0 / 2.4);
        assert!((force - expected).length() < 1e-5);
    }

    #[test]
    fn test_exclusion_zone_repels() {
        let mut grid = open_grid();
        grid.set_exclusion_center(IVec2::new(5, 5));
        let force = sample_force(&grid, IVec2::new(5, 8), &Tuning::default());
        assert!(force.y > 0.0);
        assert!(force.x.abs() < 1e-6);
    }
}
