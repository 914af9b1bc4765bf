//! Shape generation for markers

use glam::Vec2;

use super::markers::Marker;
use super::vertex::Vertex;

/// Two triangles per marker, `size` pixels square, in pixel space
pub fn marker_quads(markers: &[Marker], size: f32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(markers.len() * 6);
    for marker in markers {
        let min = marker.pos;
        let max = marker.pos + Vec2::splat(size);
        let c = marker.color;

        vertices.push(Vertex::new(min.x, min.y, c));
        vertices.push(Vertex::new(max.x, min.y, c));
        vertices.push(Vertex::new(min.x, max.y, c));

        vertices.push(Vertex::new(max.x, min.y, c));
        vertices.push(Vertex::new(max.x, max.y, c));
        vertices.push(Vertex::new(min.x, max.y, c));
    }
    vertices
}

/// Pixel coordinates (origin top-left, y down) to normalized device coordinates
#[inline]
pub fn pixel_to_ndc(p: [f32; 2], width: f32, height: f32) -> [f32; 2] {
    [p[0] / width * 2.0 - 1.0, 1.0 - p[1] / height * 2.0]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::vertex::colors;

    #[test]
    fn test_marker_quads() {
        let markers = [
            Marker {
                pos: Vec2::new(10.0, 20.0),
                color: colors::MARKER,
            },
            Marker {
                pos: Vec2::new(0.0, 0.0),
                color: colors::MARKER,
            },
        ];
        let vertices = marker_quads(&markers, 2.0);
        assert_eq!(vertices.len(), 12);
        assert_eq!(vertices[0].position, [10.0, 20.0]);
        assert_eq!(vertices[4].position, [12.0, 22.0]);
    }

    #[test]
    fn test_pixel_to_ndc() {
        assert_eq!(pixel_to_ndc([0.0, 0.0], 200.0, 100.0), [-1.0, 1.0]);
        assert_eq!(pixel_to_ndc([200.0, 100.0], 200.0, 100.0), [1.0, -1.0]);
        assert_eq!(pixel_to_ndc([100.0, 50.0], 200.0, 100.0), [0.0, 0.0]);
    }
}
