//! Retained marker layer
//!
//! Holds one marker per square in pixel space. The simulation writes to it
//! through `DrawSurface`; the renderer reads it once per frame.

use glam::Vec2;

use super::vertex::colors;
use crate::sim::{DrawSurface, MarkerHandle};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    /// Top-left corner in pixels
    pub pos: Vec2,
    pub color: [f32; 4],
}

#[derive(Debug, Clone)]
pub struct MarkerLayer {
    markers: Vec<Marker>,
    color: [f32; 4],
}

impl Default for MarkerLayer {
    fn default() -> Self {
        Self::with_color(colors::MARKER)
    }
}

impl MarkerLayer {
    pub fn with_color(color: [f32; 4]) -> Self {
        Self {
            markers: Vec::new(),
            color,
        }
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn position(&self, handle: MarkerHandle) -> Option<Vec2> {
        self.markers.get(handle.0 as usize).map(|m| m.pos)
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }
}

impl DrawSurface for MarkerLayer {
    fn place_marker(&mut self, pixel: Vec2) -> MarkerHandle {
        let handle = MarkerHandle(self.markers.len() as u32);
        self.markers.push(Marker {
            pos: pixel,
            color: self.color,
        });
        handle
    }

    fn update_marker_position(&mut self, handle: MarkerHandle, pixel: Vec2) {
        match self.markers.get_mut(handle.0 as usize) {
            Some(marker) => marker.pos = pixel,
            None => log::debug!("Stale marker handle {:?}", handle),
        }
    }

    fn clear_markers(&mut self) {
        self.markers.clear();
    }
}
