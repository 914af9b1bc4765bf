//! Buffered host input
//!
//! Browser events arrive whenever they like. They are collected here and
//! handed to the simulation as one `TickInput` between ticks, never in the
//! middle of one. Resizes are debounced on the trailing edge: a burst of
//! resize events yields a single rebuild once the window has been still for
//! the debounce period.

use glam::Vec2;

/// Input to apply before the next tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Latest pointer position in pixels
    pub pointer: Option<Vec2>,
    /// New viewport size in pixels (already debounced)
    pub resize: Option<(f64, f64)>,
}

impl TickInput {
    pub fn is_empty(&self) -> bool {
        self.pointer.is_none() && self.resize.is_none()
    }
}

#[derive(Debug, Clone, Copy)]
struct PendingResize {
    size: (f64, f64),
    last_event_ms: f64,
}

#[derive(Debug, Clone)]
pub struct InputBuffer {
    debounce_ms: f64,
    pointer: Option<Vec2>,
    resize: Option<PendingResize>,
}

impl InputBuffer {
    pub fn new(debounce_ms: f64) -> Self {
        Self {
            debounce_ms,
            pointer: None,
            resize: None,
        }
    }

    /// Record a pointer position; the latest one wins
    pub fn pointer_moved(&mut self, px: Vec2) {
        if !px.is_finite() {
            log::warn!("Dropping non-finite pointer position {:?}", px);
            return;
        }
        self.pointer = Some(px);
    }

    /// Record a resize; restarts the debounce window
    pub fn resized(&mut self, width_px: f64, height_px: f64, now_ms: f64) {
        self.resize = Some(PendingResize {
            size: (width_px, height_px),
            last_event_ms: now_ms,
        });
    }

    pub fn resize_pending(&self) -> bool {
        self.resize.is_some()
    }

    /// Drain everything that is ready at `now_ms`
    pub fn take_ready(&mut self, now_ms: f64) -> TickInput {
        let resize = match self.resize {
            Some(pending) if now_ms - pending.last_event_ms >= self.debounce_ms => {
                self.resize = None;
                Some(pending.size)
            }
            _ => None,
        };

        TickInput {
            pointer: self.pointer.take(),
            resize,
        }
    }
}
