//! Repel Grid - squares that keep their distance
//!
//! Core modules:
//! - `app`: Host loop tying pacing, input and the simulation together
//! - `sim`: Grid occupancy, force sampling and motion (pure, no rendering)
//! - `renderer`: Retained marker layer and WebGPU pipeline
//! - `platform`: Frame pacing and buffered host input
//! - `settings`: Runtime settings and simulation tuning
//! - `error`: Setup-boundary errors

pub mod app;
pub mod error;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use app::App;
pub use error::{Error, Result};
pub use settings::{Settings, Tuning};

use glam::{IVec2, Vec2};

/// Configuration constants
pub mod consts {
    /// Side of one grid cell in pixels
    pub const CELL_SIZE: f32 = 5.0;
    /// Side of a square's on-screen marker in pixels
    pub const MARKER_SIZE: f32 = 2.0;

    /// Target simulation rate
    pub const TARGET_FPS: f64 = 20.0;
    /// Quiet period before a resize is applied
    pub const RESIZE_DEBOUNCE_MS: f64 = 250.0;

    /// Chance that a cell starts with a square in it
    pub const SPAWN_PROBABILITY: f64 = 0.064;

    /// Velocity kept from the previous tick
    pub const DAMPING: f32 = 0.3;
    /// Force is divided by `count^FORCE_EXPONENT`
    pub const FORCE_EXPONENT: f32 = 1.0 / 2.4;
    /// Speeds below this snap to zero
    pub const REST_THRESHOLD: f32 = 0.05;
    /// Hard speed cap, in cells per tick
    pub const MAX_SPEED: f32 = 5.0;
    /// Fraction of the velocity applied per tick
    pub const STEP_FRACTION: f32 = 0.5;

    /// Force sampling reaches this many cells in each direction (5x5 window)
    pub const SAMPLE_RADIUS: i32 = 2;
    /// Exclusion window is `center ± (EXCLUSION_HALF_EXTENT - 1)`
    pub const EXCLUSION_HALF_EXTENT: i32 = 2;
}

/// Round half up, matching the browser's `Math.round`
#[inline]
pub fn round_half_up(v: f32) -> f32 {
    (v + 0.5).floor()
}

/// Round a continuous grid position to its cell
#[inline]
pub fn to_cell(pos: Vec2) -> IVec2 {
    IVec2::new(round_half_up(pos.x) as i32, round_half_up(pos.y) as i32)
}

/// Convert a pixel coordinate to the nearest cell
#[inline]
pub fn pixel_to_cell(px: Vec2, cell_size: f32) -> IVec2 {
    to_cell(px / cell_size)
}

/// Convert a continuous grid position to pixels
#[inline]
pub fn grid_to_pixel(pos: Vec2, cell_size: f32) -> Vec2 {
    pos * cell_size
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(-0.5), 0.0);
        assert_eq!(round_half_up(-0.6), -1.0);
        assert_eq!(round_half_up(1.49), 1.0);
    }

    #[test]
    fn test_pixel_to_cell() {
        assert_eq!(pixel_to_cell(Vec2::new(50.0, 52.4), 5.0), IVec2::new(10, 10));
        assert_eq!(pixel_to_cell(Vec2::new(12.5, 0.0), 5.0), IVec2::new(3, 0));
    }
}
