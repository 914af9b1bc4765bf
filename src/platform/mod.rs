//! Platform abstraction layer
//!
//! Host-side pieces that sit between browser events and the simulation:
//! - Frame pacing (fixed step interval over a faster refresh signal)
//! - Buffered pointer/resize input with resize debounce
//! - Viewport to grid dimension mapping

pub mod input;
pub mod pacing;
pub mod viewport;

pub use input::{InputBuffer, TickInput};
pub use pacing::FramePacer;
pub use viewport::Viewport;
