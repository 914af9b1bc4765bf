//! Draw surface seam between the simulation and whatever renders it

use glam::Vec2;

/// Opaque handle to a marker owned by a draw surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerHandle(pub u32);

/// Something that can show one small marker per square.
///
/// Positions are in pixels, origin top-left.
pub trait DrawSurface {
    /// Create a marker at `pixel` and return its handle
    fn place_marker(&mut self, pixel: Vec2) -> MarkerHandle;

    /// Move an existing marker
    fn update_marker_position(&mut self, handle: MarkerHandle, pixel: Vec2);

    /// Drop every marker (full reset)
    fn clear_markers(&mut self);
}
