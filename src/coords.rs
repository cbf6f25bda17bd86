//! Display-to-natural coordinate mapping.
//!
//! The drawing surface has a fixed size while every image has its own natural
//! resolution. Annotations are always stored in natural pixels; this module
//! converts pointer positions into that space and stored boxes back out for
//! drawing.

use crate::error::{AnnotatorError, Result};
use crate::model::{Point, Rect};

/// Per-axis scale between natural image pixels and display pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    pub scale_x: f32,
    pub scale_y: f32,
}

impl CoordinateMapper {
    /// Create a mapper for an image of natural size `natural` shown on a
    /// surface of `display` pixels.
    ///
    /// `scale_x = display_width / natural_width`, same for Y. The aspect
    /// ratio is not preserved: the image is stretched to fill the surface.
    pub fn new(natural: (u32, u32), display: (f32, f32)) -> Result<Self> {
        let (width, height) = natural;
        if width == 0 || height == 0 {
            return Err(AnnotatorError::invalid_image_size(width, height));
        }
        let (display_width, display_height) = display;
        if !(display_width > 0.0 && display_height > 0.0) {
            return Err(AnnotatorError::InvalidDisplaySize {
                width: display_width,
                height: display_height,
            });
        }

        Ok(Self {
            scale_x: display_width / width as f32,
            scale_y: display_height / height as f32,
        })
    }

    /// Create an identity mapper (display and natural space coincide).
    pub fn identity() -> Self {
        Self {
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }

    /// Convert a display-space point to natural space.
    pub fn to_natural(&self, point: Point) -> Point {
        Point::new(point.x / self.scale_x, point.y / self.scale_y)
    }

    /// Convert a natural-space point to display space.
    pub fn to_display_point(&self, point: Point) -> Point {
        Point::new(point.x * self.scale_x, point.y * self.scale_y)
    }

    /// Convert a display-space rectangle to natural space.
    pub fn to_natural_rect(&self, rect: Rect) -> Rect {
        Rect::new(
            rect.x / self.scale_x,
            rect.y / self.scale_y,
            rect.width / self.scale_x,
            rect.height / self.scale_y,
        )
    }

    /// Convert a natural-space rectangle to display space.
    pub fn to_display(&self, rect: Rect) -> Rect {
        Rect::new(
            rect.x * self.scale_x,
            rect.y * self.scale_y,
            rect.width * self.scale_x,
            rect.height * self.scale_y,
        )
    }
}

impl Default for CoordinateMapper {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 0.001;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_scale_per_axis() {
        let mapper = CoordinateMapper::new((800, 600), (900.0, 400.0)).unwrap();
        assert!(approx_eq(mapper.scale_x, 1.125));
        assert!(approx_eq(mapper.scale_y, 400.0 / 600.0));
    }

    #[test]
    fn test_to_natural() {
        let mapper = CoordinateMapper::new((800, 600), (900.0, 400.0)).unwrap();
        let p = mapper.to_natural(Point::new(100.0, 100.0));
        assert!(approx_eq(p.x, 88.888_89));
        assert!(approx_eq(p.y, 150.0));
    }

    #[test]
    fn test_point_round_trip() {
        let mapper = CoordinateMapper::new((1920, 1080), (900.0, 400.0)).unwrap();
        for &(x, y) in &[(0.0, 0.0), (17.5, 333.3), (899.0, 399.0), (450.25, 1.0)] {
            let p = Point::new(x, y);
            let back = mapper.to_display_point(mapper.to_natural(p));
            assert!(approx_eq(back.x, p.x), "x: {} != {}", back.x, p.x);
            assert!(approx_eq(back.y, p.y), "y: {} != {}", back.y, p.y);
        }
    }

    #[test]
    fn test_rect_round_trip() {
        let mapper = CoordinateMapper::new((640, 480), (900.0, 400.0)).unwrap();
        let rect = Rect::new(12.0, 34.0, 56.0, 78.0);
        let back = mapper.to_display(mapper.to_natural_rect(rect));
        assert!(approx_eq(back.x, rect.x));
        assert!(approx_eq(back.y, rect.y));
        assert!(approx_eq(back.width, rect.width));
        assert!(approx_eq(back.height, rect.height));
    }

    #[test]
    fn test_rejects_zero_natural_size() {
        assert!(matches!(
            CoordinateMapper::new((0, 600), (900.0, 400.0)),
            Err(AnnotatorError::InvalidImageSize { width: 0, height: 600 })
        ));
    }

    #[test]
    fn test_rejects_zero_display_size() {
        assert!(matches!(
            CoordinateMapper::new((800, 600), (0.0, 400.0)),
            Err(AnnotatorError::InvalidDisplaySize { .. })
        ));
    }

    #[test]
    fn test_identity() {
        let mapper = CoordinateMapper::identity();
        let rect = Rect::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(mapper.to_display(rect), rect);
    }
}
