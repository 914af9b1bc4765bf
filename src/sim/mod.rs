//! Grid simulation module
//!
//! Everything that moves squares lives here. This module must stay pure:
//! - No rendering or platform dependencies (markers go through `DrawSurface`)
//! - Seeded RNG only
//! - Stable iteration order (reverse square index)

pub mod force;
pub mod grid;
pub mod motion;
pub mod state;
pub mod surface;
pub mod tick;

pub use force::{normalize_force, sample_force};
pub use grid::{CellKind, Grid, GridCell};
pub use motion::{attempt_move, commit_move, integrate_velocity, next_velocity};
pub use state::{SimulationState, Square, SquareId};
pub use surface::{DrawSurface, MarkerHandle};
pub use tick::{TickStats, step, tick};
