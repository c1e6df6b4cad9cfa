use ab_glyph::{point, Font, FontArc, GlyphId, PxScale, ScaleFont};

use sketchboard_shared::{Color, Point};

use crate::geometry::{distance_to_segment, Outline};

/// Color and width used for one stroke.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pen {
    pub color: Color,
    pub width: f32,
}

/// Immutable copy of a whole surface, RGBA8, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Snapshot {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(pixels.len(), width as usize * height as usize * 4);
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let index = (y as usize * self.width as usize + x as usize) * 4;
        let mut rgba = [0; 4];
        rgba.copy_from_slice(&self.pixels[index..index + 4]);
        Some(rgba)
    }
}

/// The raster the engine draws on.
///
/// Drawing calls never fail; coordinates outside the surface are clipped.
pub trait Surface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    /// Strokes a straight segment with round caps.
    fn stroke_segment(&mut self, from: Point, to: Point, pen: &Pen);
    fn stroke_outline(&mut self, outline: &Outline, pen: &Pen);
    /// Draws `content` with its baseline starting at `anchor`.
    fn fill_text(&mut self, anchor: Point, content: &str, color: Color, size: f32);
    fn snapshot(&self) -> Snapshot;
    fn restore(&mut self, snapshot: &Snapshot);
}

/// In-memory RGBA surface. Used off-browser and for export.
pub struct PixelSurface {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    font: Option<FontArc>,
}

impl PixelSurface {
    pub fn new(width: u32, height: u32, background: Color) -> Self {
        let pixels = background
            .to_rgba()
            .repeat(width as usize * height as usize);
        Self {
            width,
            height,
            pixels,
            font: None,
        }
    }

    pub fn with_font(mut self, font: FontArc) -> Self {
        self.font = Some(font);
        self
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let index = (y as usize * self.width as usize + x as usize) * 4;
        Some(Color::rgb(
            self.pixels[index],
            self.pixels[index + 1],
            self.pixels[index + 2],
        ))
    }

    fn plot(&mut self, x: i64, y: i64, rgba: [u8; 4]) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let index = (y as usize * self.width as usize + x as usize) * 4;
        self.pixels[index..index + 4].copy_from_slice(&rgba);
    }

    /// Pixels whose centre is within half the pen width of the segment, which gives round
    /// caps for free.
    fn paint_segment(&mut self, from: Point, to: Point, pen: &Pen) {
        let half = (pen.width as f64 / 2.0).max(0.5);
        let (x1, y1, x2, y2) = (from.x as f64, from.y as f64, to.x as f64, to.y as f64);
        let min_x = (x1.min(x2) - half).floor().max(0.0) as i64;
        let max_x = (x1.max(x2) + half).ceil().min(self.width as f64 - 1.0) as i64;
        let min_y = (y1.min(y2) - half).floor().max(0.0) as i64;
        let max_y = (y1.max(y2) + half).ceil().min(self.height as f64 - 1.0) as i64;
        let rgba = pen.color.to_rgba();
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                if distance_to_segment(x as f64, y as f64, x1, y1, x2, y2) <= half {
                    self.plot(x, y, rgba);
                }
            }
        }
    }

    fn paint_ring(&mut self, center: Point, radius: f32, pen: &Pen) {
        let half = (pen.width as f64 / 2.0).max(0.5);
        let (cx, cy, radius) = (center.x as f64, center.y as f64, radius as f64);
        let reach = radius + half;
        let min_x = (cx - reach).floor().max(0.0) as i64;
        let max_x = (cx + reach).ceil().min(self.width as f64 - 1.0) as i64;
        let min_y = (cy - reach).floor().max(0.0) as i64;
        let max_y = (cy + reach).ceil().min(self.height as f64 - 1.0) as i64;
        let rgba = pen.color.to_rgba();
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let distance = ((x as f64 - cx).powi(2) + (y as f64 - cy).powi(2)).sqrt();
                if (distance - radius).abs() <= half {
                    self.plot(x, y, rgba);
                }
            }
        }
    }
}

impl Surface for PixelSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn stroke_segment(&mut self, from: Point, to: Point, pen: &Pen) {
        self.paint_segment(from, to, pen);
    }

    fn stroke_outline(&mut self, outline: &Outline, pen: &Pen) {
        if let Outline::Circle { center, radius } = *outline {
            self.paint_ring(center, radius, pen);
            return;
        }
        for (from, to) in outline.segments() {
            self.paint_segment(from, to, pen);
        }
    }

    fn fill_text(&mut self, anchor: Point, content: &str, color: Color, size: f32) {
        let Some(font) = self.font.clone() else {
            log::warn!("no font loaded, skipping text {content:?}");
            return;
        };
        let scaled = font.as_scaled(PxScale::from(size));
        let line_height = scaled.height() + scaled.line_gap();
        let rgba = color.to_rgba();
        let mut caret = point(anchor.x, anchor.y);
        let mut previous: Option<GlyphId> = None;
        for ch in content.chars() {
            if ch == '\n' {
                caret = point(anchor.x, caret.y + line_height);
                previous = None;
                continue;
            }
            let mut glyph = scaled.scaled_glyph(ch);
            if let Some(previous) = previous {
                caret.x += scaled.kern(previous, glyph.id);
            }
            glyph.position = caret;
            caret.x += scaled.h_advance(glyph.id);
            previous = Some(glyph.id);

            let Some(outlined) = font.outline_glyph(glyph) else {
                continue;
            };
            let bounds = outlined.px_bounds();
            let mut covered = Vec::new();
            outlined.draw(|x, y, coverage| {
                if coverage >= 0.5 {
                    covered.push((
                        bounds.min.x as i64 + x as i64,
                        bounds.min.y as i64 + y as i64,
                    ));
                }
            });
            for (x, y) in covered {
                self.plot(x, y, rgba);
            }
        }
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.width, self.height, self.pixels.clone())
    }

    fn restore(&mut self, snapshot: &Snapshot) {
        if snapshot.width != self.width || snapshot.height != self.height {
            log::warn!(
                "ignoring {}x{} snapshot on {}x{} surface",
                snapshot.width,
                snapshot.height,
                self.width,
                self.height
            );
            return;
        }
        self.pixels.copy_from_slice(&snapshot.pixels);
    }
}

/// DejaVu Sans Mono, bundled for rendering tests.
#[cfg(test)]
pub(crate) fn test_font() -> FontArc {
    FontArc::try_from_slice(include_bytes!("../assets/DejaVuSansMono.ttf"))
        .expect("bundled font parses")
}
