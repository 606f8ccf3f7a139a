use crate::geom::Rect;
use crate::tile::CropRect;

/// A decoded picture the surface knows how to blit.
pub trait SourceImage {
    fn natural_size(&self) -> (u32, u32);
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shadow {
    pub color: &'static str,
    pub blur: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fill {
    pub color: &'static str,
    pub alpha: f32,
    pub shadow: Option<Shadow>,
}

impl Fill {
    pub const fn solid(color: &'static str) -> Self {
        Self {
            color,
            alpha: 1.0,
            shadow: None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke {
    pub color: &'static str,
    pub width: f32,
    pub alpha: f32,
    pub dash: Option<[f32; 2]>,
}

impl Stroke {
    pub const fn solid(color: &'static str, width: f32) -> Self {
        Self {
            color,
            width,
            alpha: 1.0,
            dash: None,
        }
    }
}

/// 2D raster target in logical (CSS) pixels.
///
/// Implementations own the device-pixel scaling: the backing buffer is the
/// logical size times the device scale and every draw call is transformed
/// back into logical space. Each call leaves no drawing state behind.
pub trait Surface {
    type Image: SourceImage;

    /// Re-syncs the backing buffer with the on-screen size and returns the
    /// logical `(width, height)`.
    fn resize(&mut self) -> (f32, f32);

    fn clear(&mut self, width: f32, height: f32);

    fn fill_rect(&mut self, rect: Rect, fill: &Fill);

    fn stroke_rect(&mut self, rect: Rect, stroke: &Stroke);

    fn stroke_line(&mut self, from: [f32; 2], to: [f32; 2], stroke: &Stroke);

    /// Blits `crop` of `image` into `dest`, clipped to a rounded rectangle.
    fn draw_image_clipped(
        &mut self,
        image: &Self::Image,
        crop: CropRect,
        dest: Rect,
        corner_radius: f32,
    );
}
