//! Host loop shared by the browser and headless entry points
//!
//! Owns the simulation and feeds it paced steps and buffered input.

use glam::Vec2;

use crate::error::Result;
use crate::platform::{FramePacer, InputBuffer, TickInput, Viewport};
use crate::settings::Settings;
use crate::sim::{DrawSurface, SimulationState, TickStats, step};

pub struct App {
    pub settings: Settings,
    pub state: SimulationState,
    pub viewport: Viewport,
    input: InputBuffer,
    pacer: FramePacer,
}

impl App {
    /// Build and populate a simulation for a `width_px x height_px` viewport
    pub fn new(
        settings: Settings,
        width_px: f64,
        height_px: f64,
        seed: u64,
        now_ms: f64,
        surface: &mut impl DrawSurface,
    ) -> Result<Self> {
        settings.validate()?;
        let viewport = Viewport::new(width_px, height_px, settings.cell_size)?;
        let dims = viewport.grid_dimensions();

        let mut state = SimulationState::new(dims.x, dims.y, &settings, seed);
        state.populate(surface);
        log::info!("Simulation seeded with {}", seed);

        Ok(Self {
            input: InputBuffer::new(settings.resize_debounce_ms),
            pacer: FramePacer::new(settings.interval_ms(), now_ms),
            settings,
            state,
            viewport,
        })
    }

    pub fn pointer_moved(&mut self, px: Vec2) {
        self.input.pointer_moved(px);
    }

    pub fn resized(&mut self, width_px: f64, height_px: f64, now_ms: f64) {
        self.input.resized(width_px, height_px, now_ms);
    }

    /// Called on every refresh. Applies ready input, then runs a step if one
    /// is due. Returns the step's stats, or `None` when no step ran.
    pub fn frame(&mut self, now_ms: f64, surface: &mut impl DrawSurface) -> Option<TickStats> {
        let input = self.input.take_ready(now_ms);
        if !input.is_empty() {
            self.apply_input(input, now_ms, surface);
        }

        if !self.pacer.poll(now_ms) {
            return None;
        }
        Some(step(&mut self.state, surface))
    }

    /// Resize first so a pointer in the same batch lands on the new grid
    fn apply_input(&mut self, input: TickInput, now_ms: f64, surface: &mut impl DrawSurface) {
        if let Some((width_px, height_px)) = input.resize {
            match Viewport::new(width_px, height_px, self.settings.cell_size) {
                Ok(viewport) => {
                    let dims = viewport.grid_dimensions();
                    log::info!(
                        "Resized to {}x{} px, rebuilding {}x{} grid",
                        width_px,
                        height_px,
                        dims.x,
                        dims.y
                    );
                    self.viewport = viewport;
                    self.state.reset(dims.x, dims.y, surface);
                    self.pacer.reset(now_ms);
                }
                Err(e) => log::warn!("Ignoring resize: {}", e),
            }
        }

        if let Some(px) = input.pointer {
            self.state.set_pointer(px);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::MarkerLayer;
    use glam::IVec2;

    fn app(layer: &mut MarkerLayer) -> App {
        App::new(Settings::default(), 400.0, 300.0, 5, 0.0, layer).expect("valid app")
    }

    #[test]
    fn test_new_sizes_grid() {
        let mut layer = MarkerLayer::default();
        let app = app(&mut layer);
        assert_eq!(app.state.grid.width(), 80);
        assert_eq!(app.state.grid.height(), 60);
        assert_eq!(layer.len(), app.state.squares.len());
    }

    #[test]
    fn test_rejects_bad_settings() {
        let mut layer = MarkerLayer::default();
        let settings = Settings {
            fps: -1.0,
            ..Default::default()
        };
        assert!(App::new(settings, 400.0, 300.0, 5, 0.0, &mut layer).is_err());
    }

    #[test]
    fn test_frames_are_paced() {
        let mut layer = MarkerLayer::default();
        let mut app = app(&mut layer);

        let steps = (1..=400)
            .filter_map(|i| app.frame(i as f64 * 5.0, &mut layer))
            .count();
        assert_eq!(steps, 40);
        assert_eq!(app.state.time_ticks, 40);
        assert!(app.state.is_consistent());
    }

    #[test]
    fn test_pointer_applies_between_ticks() {
        let mut layer = MarkerLayer::default();
        let mut app = app(&mut layer);

        app.pointer_moved(Vec2::new(100.0, 50.0));
        // Not stepping yet, but input is applied
        assert!(app.frame(1.0, &mut layer).is_none());
        assert_eq!(app.state.grid.exclusion_center(), IVec2::new(20, 10));
    }

    #[test]
    fn test_far_pointer_keeps_running() {
        let mut layer = MarkerLayer::default();
        let mut app = app(&mut layer);

        app.pointer_moved(Vec2::new(-1.0e12, 10.0));
        let steps = (1..=20)
            .filter_map(|i| app.frame(i as f64 * 50.0, &mut layer))
            .count();
        assert_eq!(steps, 20);
        assert_eq!(app.state.grid.exclusion_center(), IVec2::new(-3, 2));
        assert!(app.state.is_consistent());
    }

    #[test]
    fn test_resize_rebuilds_after_debounce() {
        let mut layer = MarkerLayer::default();
        let mut app = app(&mut layer);

        app.resized(200.0, 100.0, 10.0);
        app.frame(100.0, &mut layer);
        assert_eq!(app.state.grid.width(), 80);

        app.frame(300.0, &mut layer);
        assert_eq!(app.state.grid.width(), 40);
        assert_eq!(app.state.grid.height(), 20);
        assert_eq!(layer.len(), app.state.squares.len());
        assert!(app.state.is_consistent());
    }

    #[test]
    fn test_bad_resize_is_ignored() {
        let mut layer = MarkerLayer::default();
        let mut app = app(&mut layer);
        let squares = app.state.squares.len();

        app.resized(0.0, 0.0, 0.0);
        app.frame(500.0, &mut layer);
        assert_eq!(app.state.grid.width(), 80);
        assert_eq!(app.state.squares.len(), squares);

        app.resized(5.0e9, 5.0e9, 600.0);
        app.frame(1000.0, &mut layer);
        assert_eq!(app.state.grid.width(), 80);
        assert_eq!(app.state.squares.len(), squares);
    }
}
