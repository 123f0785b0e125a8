//! Viewport rectangle for the 2D render pipeline

/// Rectangular viewport restricting where 2D rendering lands on the target.
///
/// Coordinates are in pixels from the target's top-left corner. A viewport
/// rect may hang partially off the target, so the origin is signed. The
/// cached/encoded viewport is an `Option<Viewport>`: `None` means the full
/// render target, with no explicit region set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Viewport {
    /// X coordinate of top-left corner (pixels from left edge)
    pub x: i32,
    /// Y coordinate of top-left corner (pixels from top edge)
    pub y: i32,
    /// Width of viewport in pixels
    pub width: u32,
    /// Height of viewport in pixels
    pub height: u32,
}

impl Viewport {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Calculate aspect ratio (width / height)
    #[inline]
    pub fn aspect_ratio(&self) -> f32 {
        if self.height == 0 {
            1.0 // Avoid division by zero
        } else {
            self.width as f32 / self.height as f32
        }
    }

    /// Check if viewport is valid (non-zero dimensions)
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aspect_ratio() {
        assert_eq!(Viewport::new(0, 0, 800, 600).aspect_ratio(), 800.0 / 600.0);
        // Degenerate height falls back to square
        assert_eq!(Viewport::new(0, 0, 800, 0).aspect_ratio(), 1.0);
    }

    #[test]
    fn test_is_valid() {
        assert!(Viewport::new(0, 0, 1, 1).is_valid());
        assert!(Viewport::new(-16, -16, 64, 64).is_valid());
        assert!(!Viewport::new(0, 0, 0, 64).is_valid());
        assert!(!Viewport::new(0, 0, 64, 0).is_valid());
    }
}
