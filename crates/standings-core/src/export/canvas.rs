// Drawing surface for the exported sheet.
//
// All coordinates are logical (the 1080-unit sheet); the canvas multiplies
// them by its scale when painting. Text comes from an 8x8 bitmap font, so a
// glyph of size `s` is an 8x8 grid of `s / 8` cells.

use font8x8::{UnicodeFonts, BASIC_FONTS, LATIN_FONTS};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbImage, RgbaImage};
use tiny_skia::{
    FillRule, FilterQuality, IntSize, Paint, Path, PathBuilder, Pattern, Pixmap, Rect, SpreadMode,
    Transform,
};

use crate::export::{ExportError, ExportFormat};
use crate::upload::ImageShape;

/// JPEG quality used for exports (the encoder's maximum).
pub const JPEG_QUALITY: u8 = 100;

/// An opaque sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const fn hex(value: u32) -> Self {
        Rgb((value >> 16) as u8, (value >> 8) as u8, value as u8)
    }
}

/// Anti-aliased paint for curved outlines.
fn solid(color: Rgb) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.0, color.1, color.2, 255);
    paint.anti_alias = true;
    paint
}

/// Paint for axis-aligned fills. These are snapped to whole device pixels,
/// and tiny-skia's anti-aliased rect path asserts on sub-pixel slivers.
fn crisp(color: Rgb) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.0, color.1, color.2, 255);
    paint.anti_alias = false;
    paint
}

pub struct Canvas {
    pixmap: Pixmap,
    transform: Transform,
}

impl Canvas {
    pub fn new(logical_width: u32, logical_height: u32, scale: f32) -> Result<Self, ExportError> {
        let width = (logical_width as f32 * scale).round() as u32;
        let height = (logical_height as f32 * scale).round() as u32;
        let pixmap = Pixmap::new(width, height).ok_or(ExportError::Canvas { width, height })?;
        Ok(Canvas {
            pixmap,
            transform: Transform::from_scale(scale, scale),
        })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn fill(&mut self, color: Rgb) {
        self.pixmap
            .fill(tiny_skia::Color::from_rgba8(color.0, color.1, color.2, 255));
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgb) {
        self.fill_device_rect(x, y, w, h, &crisp(color));
    }

    /// Fill a logical rect after rounding its edges to device pixels. A
    /// non-empty rect always covers at least one pixel.
    fn fill_device_rect(&mut self, x: f32, y: f32, w: f32, h: f32, paint: &Paint) {
        if !(w > 0.0 && h > 0.0) {
            return;
        }
        let (sx, sy) = (self.transform.sx, self.transform.sy);
        let left = (x * sx).round();
        let top = (y * sy).round();
        let right = ((x + w) * sx).round().max(left + 1.0);
        let bottom = ((y + h) * sy).round().max(top + 1.0);
        if let Some(rect) = Rect::from_ltrb(left, top, right, bottom) {
            self.pixmap.fill_rect(rect, paint, Transform::identity(), None);
        }
    }

    pub fn fill_rounded_rect(&mut self, x: f32, y: f32, w: f32, h: f32, radius: f32, color: Rgb) {
        if let Some(path) = rounded_rect_path(x, y, w, h, radius) {
            self.pixmap
                .fill_path(&path, &solid(color), FillRule::Winding, self.transform, None);
        }
    }

    pub fn fill_circle(&mut self, cx: f32, cy: f32, r: f32, color: Rgb) {
        if let Some(path) = PathBuilder::from_circle(cx, cy, r) {
            self.pixmap
                .fill_path(&path, &solid(color), FillRule::Winding, self.transform, None);
        }
    }

    /// Logical width of `text` at glyph size `size`.
    pub fn text_width(text: &str, size: f32) -> f32 {
        text.chars().count() as f32 * size
    }

    /// Largest glyph size no bigger than `preferred` at which `text` fits in
    /// `max_width`.
    pub fn fit_size(text: &str, preferred: f32, max_width: f32) -> f32 {
        let chars = text.chars().count().max(1) as f32;
        preferred.min(max_width / chars)
    }

    /// Draw `text` with its top-left corner at `(x, y)`.
    pub fn draw_text(&mut self, text: &str, x: f32, y: f32, size: f32, color: Rgb) {
        let cell = size / 8.0;
        let paint = crisp(color);
        for (i, c) in text.chars().enumerate() {
            let origin_x = x + i as f32 * size;
            for (row, bits) in glyph(c).iter().enumerate() {
                for (start, len) in bit_runs(*bits) {
                    self.fill_device_rect(
                        origin_x + start as f32 * cell,
                        y + row as f32 * cell,
                        len as f32 * cell,
                        cell,
                        &paint,
                    );
                }
            }
        }
    }

    /// Draw `text` horizontally centered in the span `[x, x + w)`.
    pub fn draw_text_centered(&mut self, text: &str, x: f32, w: f32, y: f32, size: f32, color: Rgb) {
        let tx = x + (w - Self::text_width(text, size)) / 2.0;
        self.draw_text(text, tx, y, size, color);
    }

    /// Draw `text` ending at `right`.
    pub fn draw_text_right(&mut self, text: &str, right: f32, y: f32, size: f32, color: Rgb) {
        let tx = right - Self::text_width(text, size);
        self.draw_text(text, tx, y, size, color);
    }

    /// Draw `text` rotated a quarter turn counter-clockwise, reading bottom
    /// to top. `(x, y)` is the bottom-left corner of the first glyph.
    pub fn draw_text_vertical(&mut self, text: &str, x: f32, y: f32, size: f32, color: Rgb) {
        let cell = size / 8.0;
        let paint = crisp(color);
        for (i, c) in text.chars().enumerate() {
            let origin_y = y - i as f32 * size;
            for (row, bits) in glyph(c).iter().enumerate() {
                for (start, len) in bit_runs(*bits) {
                    // Glyph (col, row) lands at (row, -col) once rotated.
                    self.fill_device_rect(
                        x + row as f32 * cell,
                        origin_y - (start + len) as f32 * cell,
                        cell,
                        len as f32 * cell,
                        &paint,
                    );
                }
            }
        }
    }

    /// Draw `image` scaled to cover the box and clipped to `shape`.
    pub fn draw_image(&mut self, image: &RgbaImage, shape: ImageShape, x: f32, y: f32, w: f32, h: f32) {
        let Some(source) = to_pixmap(image) else {
            return;
        };
        let (iw, ih) = (image.width() as f32, image.height() as f32);
        let scale = (w / iw).max(h / ih);
        let tx = x + (w - iw * scale) / 2.0;
        let ty = y + (h - ih * scale) / 2.0;

        let paint = Paint {
            shader: Pattern::new(
                source.as_ref(),
                SpreadMode::Pad,
                FilterQuality::Bicubic,
                1.0,
                Transform::from_row(scale, 0.0, 0.0, scale, tx, ty),
            ),
            anti_alias: true,
            ..Paint::default()
        };

        let clip = match shape {
            ImageShape::Circle => PathBuilder::from_circle(x + w / 2.0, y + h / 2.0, w.min(h) / 2.0),
            ImageShape::Rectangle => rounded_rect_path(x, y, w, h, 6.0),
        };
        if let Some(path) = clip {
            self.pixmap
                .fill_path(&path, &paint, FillRule::Winding, self.transform, None);
        }
    }

    /// Encode the canvas. The sheet is opaque, so alpha is dropped.
    pub fn encode(&self, format: ExportFormat) -> Result<Vec<u8>, ExportError> {
        let (width, height) = (self.width(), self.height());
        let mut rgb = RgbImage::new(width, height);
        for (src, dst) in self.pixmap.pixels().iter().zip(rgb.pixels_mut()) {
            let c = src.demultiply();
            *dst = image::Rgb([c.red(), c.green(), c.blue()]);
        }

        let mut out = Vec::new();
        match format {
            ExportFormat::Png => PngEncoder::new(&mut out).write_image(
                rgb.as_raw(),
                width,
                height,
                ExtendedColorType::Rgb8,
            )?,
            ExportFormat::Jpeg => JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY)
                .write_image(rgb.as_raw(), width, height, ExtendedColorType::Rgb8)?,
        }
        Ok(out)
    }
}

fn glyph(c: char) -> [u8; 8] {
    BASIC_FONTS
        .get(c)
        .or_else(|| LATIN_FONTS.get(c))
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or([0; 8])
}

/// Runs of set bits in a glyph row as `(start, len)`. Bit 0 is the leftmost
/// pixel.
fn bit_runs(bits: u8) -> Vec<(u32, u32)> {
    let mut runs = Vec::new();
    let mut col = 0;
    while col < 8 {
        if bits & (1 << col) != 0 {
            let start = col;
            while col < 8 && bits & (1 << col) != 0 {
                col += 1;
            }
            runs.push((start, col - start));
        } else {
            col += 1;
        }
    }
    runs
}

fn rounded_rect_path(x: f32, y: f32, w: f32, h: f32, radius: f32) -> Option<Path> {
    let r = radius.min(w / 2.0).min(h / 2.0).max(0.0);
    let mut pb = PathBuilder::new();
    pb.move_to(x + r, y);
    pb.line_to(x + w - r, y);
    pb.quad_to(x + w, y, x + w, y + r);
    pb.line_to(x + w, y + h - r);
    pb.quad_to(x + w, y + h, x + w - r, y + h);
    pb.line_to(x + r, y + h);
    pb.quad_to(x, y + h, x, y + h - r);
    pb.line_to(x, y + r);
    pb.quad_to(x, y, x + r, y);
    pb.close();
    pb.finish()
}

/// Convert straight-alpha RGBA into a premultiplied pixmap.
fn to_pixmap(image: &RgbaImage) -> Option<Pixmap> {
    let size = IntSize::from_wh(image.width(), image.height())?;
    let mut data = image.as_raw().clone();
    for px in data.chunks_exact_mut(4) {
        let a = px[3] as u16;
        for channel in &mut px[..3] {
            *channel = ((*channel as u16 * a + 127) / 255) as u8;
        }
    }
    Pixmap::from_vec(data, size)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
