use wasm_bindgen::{Clamped, JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, ImageData};

use sketchboard_shared::{Color, Point};

use crate::geometry::Outline;
use crate::render::{Pen, Snapshot, Surface};

const LINE_SPACING: f64 = 1.2;

/// Surface backed by a 2D canvas context. Its size is fixed at creation.
pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
    width: u32,
    height: u32,
}

impl CanvasSurface {
    pub fn new(
        canvas: HtmlCanvasElement,
        width: u32,
        height: u32,
        background: Color,
    ) -> Result<Self, JsValue> {
        canvas.set_width(width);
        canvas.set_height(height);
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("Missing 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        ctx.set_line_cap("round");
        ctx.set_line_join("round");
        ctx.set_fill_style_str(&background.to_hex());
        ctx.fill_rect(0.0, 0.0, width as f64, height as f64);
        Ok(Self {
            ctx,
            width,
            height,
        })
    }

    fn apply_pen(&self, pen: &Pen) {
        self.ctx.set_stroke_style_str(&pen.color.to_hex());
        self.ctx.set_line_width(pen.width as f64);
    }
}

impl Surface for CanvasSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn stroke_segment(&mut self, from: Point, to: Point, pen: &Pen) {
        self.apply_pen(pen);
        self.ctx.begin_path();
        self.ctx.move_to(from.x as f64, from.y as f64);
        self.ctx.line_to(to.x as f64, to.y as f64);
        self.ctx.stroke();
    }

    fn stroke_outline(&mut self, outline: &Outline, pen: &Pen) {
        self.apply_pen(pen);
        let ctx = &self.ctx;
        match *outline {
            Outline::Rectangle {
                origin,
                width,
                height,
            } => {
                ctx.stroke_rect(origin.x as f64, origin.y as f64, width as f64, height as f64);
            }
            Outline::Circle { center, radius } => {
                ctx.begin_path();
                let _ = ctx.arc(
                    center.x as f64,
                    center.y as f64,
                    radius as f64,
                    0.0,
                    std::f64::consts::PI * 2.0,
                );
                ctx.stroke();
            }
            Outline::Line { from, to } => {
                ctx.begin_path();
                ctx.move_to(from.x as f64, from.y as f64);
                ctx.line_to(to.x as f64, to.y as f64);
                ctx.stroke();
            }
            Outline::Triangle { points: [a, b, c] } => {
                ctx.begin_path();
                ctx.move_to(a.x as f64, a.y as f64);
                ctx.line_to(b.x as f64, b.y as f64);
                ctx.line_to(c.x as f64, c.y as f64);
                ctx.close_path();
                ctx.stroke();
            }
        }
    }

    fn fill_text(&mut self, anchor: Point, content: &str, color: Color, size: f32) {
        self.ctx.set_fill_style_str(&color.to_hex());
        self.ctx.set_font(&format!("{size}px sans-serif"));
        let line_height = size as f64 * LINE_SPACING;
        for (index, line) in content.split('\n').enumerate() {
            let y = anchor.y as f64 + index as f64 * line_height;
            if let Err(error) = self.ctx.fill_text(line, anchor.x as f64, y) {
                log::warn!("fill_text failed: {error:?}");
            }
        }
    }

    fn snapshot(&self) -> Snapshot {
        match self
            .ctx
            .get_image_data(0.0, 0.0, self.width as f64, self.height as f64)
        {
            Ok(image) => Snapshot::new(image.width(), image.height(), image.data().0),
            Err(error) => {
                log::error!("get_image_data failed: {error:?}");
                let len = self.width as usize * self.height as usize * 4;
                Snapshot::new(self.width, self.height, vec![0; len])
            }
        }
    }

    fn restore(&mut self, snapshot: &Snapshot) {
        let image = match ImageData::new_with_u8_clamped_array_and_sh(
            Clamped(snapshot.pixels()),
            snapshot.width(),
            snapshot.height(),
        ) {
            Ok(image) => image,
            Err(error) => {
                log::error!("snapshot rejected: {error:?}");
                return;
            }
        };
        if let Err(error) = self.ctx.put_image_data(&image, 0.0, 0.0) {
            log::error!("put_image_data failed: {error:?}");
        }
    }
}
