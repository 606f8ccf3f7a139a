use calm_puzzle_core::{CropRect, EngineError, Fill, Rect, SourceImage, Stroke, Surface};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

/// A decoded `<img>` the engine can crop tiles from.
#[derive(Clone)]
pub(crate) struct PuzzleImage(HtmlImageElement);

impl PuzzleImage {
    pub(crate) fn new(element: HtmlImageElement) -> Self {
        Self(element)
    }
}

impl SourceImage for PuzzleImage {
    fn natural_size(&self) -> (u32, u32) {
        (self.0.natural_width(), self.0.natural_height())
    }
}

pub(crate) fn device_scale() -> f64 {
    let ratio = web_sys::window()
        .map(|window| window.device_pixel_ratio())
        .unwrap_or(1.0);
    ratio.floor().max(1.0)
}

/// Canvas 2D backend. Draw calls take logical pixels; the context transform
/// maps them onto the device-scaled backing buffer.
pub(crate) struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    scale: f64,
}

impl CanvasSurface {
    pub(crate) fn new(canvas: HtmlCanvasElement) -> Result<Self, EngineError> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
            .ok_or(EngineError::UnsupportedSurface)?;
        Ok(Self {
            canvas,
            ctx,
            scale: device_scale(),
        })
    }

    fn apply_stroke(&self, stroke: &Stroke) {
        self.ctx.set_stroke_style_str(stroke.color);
        self.ctx.set_line_width(stroke.width as f64);
        self.ctx.set_global_alpha(stroke.alpha as f64);
        if let Some([on, off]) = stroke.dash {
            let pattern = js_sys::Array::of2(
                &JsValue::from_f64(on as f64),
                &JsValue::from_f64(off as f64),
            );
            if let Err(err) = self.ctx.set_line_dash(&pattern) {
                gloo::console::warn!("canvas line dash failed", err);
            }
        }
    }

    fn rounded_rect_path(&self, rect: Rect, radius: f32) {
        let r = radius.min(rect.w / 2.0).min(rect.h / 2.0).max(0.0) as f64;
        let (x, y) = (rect.x as f64, rect.y as f64);
        let (right, bottom) = (rect.right() as f64, rect.bottom() as f64);
        self.ctx.begin_path();
        self.ctx.move_to(x + r, y);
        let corners = [
            (right, y, right, bottom),
            (right, bottom, x, bottom),
            (x, bottom, x, y),
            (x, y, right, y),
        ];
        for (x1, y1, x2, y2) in corners {
            if let Err(err) = self.ctx.arc_to(x1, y1, x2, y2, r) {
                gloo::console::warn!("canvas clip path failed", err);
                break;
            }
        }
        self.ctx.close_path();
    }
}

impl Surface for CanvasSurface {
    type Image = PuzzleImage;

    fn resize(&mut self) -> (f32, f32) {
        self.scale = device_scale();
        let rect = self.canvas.get_bounding_client_rect();
        let width = rect.width().max(0.0);
        let height = rect.height().max(0.0);
        self.canvas.set_width((width * self.scale).floor() as u32);
        self.canvas.set_height((height * self.scale).floor() as u32);
        if let Err(err) = self
            .ctx
            .set_transform(self.scale, 0.0, 0.0, self.scale, 0.0, 0.0)
        {
            gloo::console::warn!("canvas transform failed", err);
        }
        (width as f32, height as f32)
    }

    fn clear(&mut self, width: f32, height: f32) {
        self.ctx.clear_rect(0.0, 0.0, width as f64, height as f64);
    }

    fn fill_rect(&mut self, rect: Rect, fill: &Fill) {
        self.ctx.save();
        self.ctx.set_fill_style_str(fill.color);
        self.ctx.set_global_alpha(fill.alpha as f64);
        if let Some(shadow) = fill.shadow {
            self.ctx.set_shadow_color(shadow.color);
            self.ctx.set_shadow_blur(shadow.blur as f64);
        }
        self.ctx
            .fill_rect(rect.x as f64, rect.y as f64, rect.w as f64, rect.h as f64);
        self.ctx.restore();
    }

    fn stroke_rect(&mut self, rect: Rect, stroke: &Stroke) {
        self.ctx.save();
        self.apply_stroke(stroke);
        self.ctx
            .stroke_rect(rect.x as f64, rect.y as f64, rect.w as f64, rect.h as f64);
        self.ctx.restore();
    }

    fn stroke_line(&mut self, from: [f32; 2], to: [f32; 2], stroke: &Stroke) {
        self.ctx.save();
        self.apply_stroke(stroke);
        self.ctx.begin_path();
        self.ctx.move_to(from[0] as f64, from[1] as f64);
        self.ctx.line_to(to[0] as f64, to[1] as f64);
        self.ctx.stroke();
        self.ctx.restore();
    }

    fn draw_image_clipped(
        &mut self,
        image: &PuzzleImage,
        crop: CropRect,
        dest: Rect,
        corner_radius: f32,
    ) {
        self.ctx.save();
        self.rounded_rect_path(dest, corner_radius);
        self.ctx.clip();
        let drawn = self
            .ctx
            .draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                &image.0,
                crop.sx as f64,
                crop.sy as f64,
                crop.sw as f64,
                crop.sh as f64,
                dest.x as f64,
                dest.y as f64,
                dest.w as f64,
                dest.h as f64,
            );
        if let Err(err) = drawn {
            gloo::console::warn!("tile draw failed", err);
        }
        self.ctx.restore();
    }
}
