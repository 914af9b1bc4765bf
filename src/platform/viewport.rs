//! Viewport pixels to grid cells

use glam::IVec2;

use crate::error::{Error, Result};

/// Largest accepted viewport edge, the default wgpu 2D texture limit
pub const MAX_VIEWPORT_PX: f64 = 8192.0;

/// Drawable area in CSS pixels and the cell size that tiles it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width_px: f64,
    pub height_px: f64,
    pub cell_size: f32,
}

impl Viewport {
    pub fn new(width_px: f64, height_px: f64, cell_size: f32) -> Result<Self> {
        let in_range = |px: f64| (1.0..=MAX_VIEWPORT_PX).contains(&px);
        if !(in_range(width_px) && in_range(height_px)) {
            return Err(Error::InvalidDimensions {
                width: width_px,
                height: height_px,
            });
        }
        if !(cell_size >= 1.0) {
            return Err(Error::InvalidSettings(format!(
                "cell_size must be at least 1px, got {}",
                cell_size
            )));
        }
        Ok(Self {
            width_px,
            height_px,
            cell_size,
        })
    }

    /// Whole cells that fit, `floor(px / cell_size)` per axis
    pub fn grid_dimensions(&self) -> IVec2 {
        let cell = self.cell_size as f64;
        IVec2::new(
            (self.width_px / cell).floor() as i32,
            (self.height_px / cell).floor() as i32,
        )
    }

    /// Pixel size of the area the grid covers
    pub fn grid_pixels(&self) -> (u32, u32) {
        let dims = self.grid_dimensions();
        let cell = self.cell_size as f64;
        ((dims.x as f64 * cell) as u32, (dims.y as f64 * cell) as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_dimensions() {
        let viewport = Viewport::new(1024.0, 768.0, 5.0).expect("valid");
        assert_eq!(viewport.grid_dimensions(), IVec2::new(204, 153));
        assert_eq!(viewport.grid_pixels(), (1020, 765));
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(matches!(
            Viewport::new(0.0, 100.0, 5.0),
            Err(Error::InvalidDimensions { .. })
        ));
        assert!(matches!(
            Viewport::new(f64::NAN, 100.0, 5.0),
            Err(Error::InvalidDimensions { .. })
        ));
        assert!(matches!(
            Viewport::new(1.0e12, 100.0, 5.0),
            Err(Error::InvalidDimensions { .. })
        ));
        assert!(matches!(
            Viewport::new(100.0, f64::INFINITY, 5.0),
            Err(Error::InvalidDimensions { .. })
        ));
        assert!(Viewport::new(MAX_VIEWPORT_PX, MAX_VIEWPORT_PX, 1.0).is_ok());
        assert!(matches!(
            Viewport::new(100.0, 100.0, 0.0),
            Err(Error::InvalidSettings(_))
        ));
    }
}
