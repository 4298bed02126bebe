//! Blank page canvases and text drawing.
//!
//! Text is shaped and rasterised with cosmic-text. The configured truetype
//! file is tried first, then a system face whose family matches the file stem,
//! and finally the default sans-serif family at the same size.

use cosmic_text::{Attrs, Buffer, Color, Family, FontSystem, Metrics, Shaping, SwashCache};
use image::{Rgb, RgbImage};
use std::path::Path;
use tracing::{debug, warn};

/// Page background.
pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

/// Text color.
const INK: Color = Color::rgb(0, 0, 0);

/// A fresh white RGB canvas.
pub fn blank_page(width: u32, height: u32) -> RgbImage {
    RgbImage::from_pixel(width, height, WHITE)
}

/// Draws unwrapped text onto canvases.
pub struct TextPainter {
    font_system: FontSystem,
    swash_cache: SwashCache,
    /// Family resolved from the configured font, `None` for the sans-serif fallback.
    family: Option<String>,
    metrics: Metrics,
}

impl TextPainter {
    /// Create a painter for `font_path` at `font_size` pixels.
    pub fn new(font_path: Option<&Path>, font_size: f32) -> Self {
        let mut font_system = FontSystem::new();
        let family = font_path.and_then(|path| resolve_family(&mut font_system, path));

        match &family {
            Some(name) => debug!("Drawing text with '{}' at {}px", name, font_size),
            None => warn!(
                "Font {:?} unavailable, falling back to the default sans-serif face",
                font_path
            ),
        }

        Self {
            font_system,
            swash_cache: SwashCache::new(),
            family,
            metrics: Metrics::new(font_size, font_size * 1.2),
        }
    }

    /// Whether the configured font was found.
    pub fn uses_configured_font(&self) -> bool {
        self.family.is_some()
    }

    /// Draw `text` with its top-left corner at `(x, y)`.
    ///
    /// Newlines start new lines. Nothing wraps; pixels outside the canvas are dropped.
    pub fn draw(&mut self, canvas: &mut RgbImage, x: i32, y: i32, text: &str) {
        if text.trim().is_empty() {
            return;
        }

        let family = match &self.family {
            Some(name) => Family::Name(name),
            None => Family::SansSerif,
        };

        let mut buffer = Buffer::new(&mut self.font_system, self.metrics);
        buffer.set_size(&mut self.font_system, None, None);
        buffer.set_text(
            &mut self.font_system,
            text,
            Attrs::new().family(family),
            Shaping::Advanced,
        );
        buffer.shape_until_scroll(&mut self.font_system, false);

        buffer.draw(
            &mut self.font_system,
            &mut self.swash_cache,
            INK,
            |gx, gy, w, h, color| {
                blend_rect(canvas, x + gx, y + gy, w, h, color);
            },
        );
    }
}

/// Load the font file, or find a system face named after it.
fn resolve_family(font_system: &mut FontSystem, path: &Path) -> Option<String> {
    if let Ok(data) = std::fs::read(path) {
        let before = font_system.db().len();
        font_system.db_mut().load_font_data(data);
        if let Some(name) = font_system
            .db()
            .faces()
            .skip(before)
            .find_map(|face| face.families.first().map(|(name, _)| name.clone()))
        {
            return Some(name);
        }
    }

    let stem = path.file_stem()?.to_str()?;
    font_system.db().faces().find_map(|face| {
        face.families
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(stem))
            .map(|(name, _)| name.clone())
    })
}

/// Alpha-blend a solid rectangle onto the canvas, clipping at the edges.
fn blend_rect(canvas: &mut RgbImage, x: i32, y: i32, w: u32, h: u32, color: Color) {
    let alpha = color.a() as u32;
    if alpha == 0 {
        return;
    }
    let (cw, ch) = (canvas.width() as i64, canvas.height() as i64);
    let x0 = (x as i64).max(0);
    let y0 = (y as i64).max(0);
    let x1 = (x as i64 + w as i64).min(cw);
    let y1 = (y as i64 + h as i64).min(ch);

    let src = [color.r() as u32, color.g() as u32, color.b() as u32];
    for py in y0..y1 {
        for px in x0..x1 {
            let pixel = canvas.get_pixel_mut(px as u32, py as u32);
            for (channel, s) in pixel.0.iter_mut().zip(src) {
                *channel = ((s * alpha + *channel as u32 * (255 - alpha)) / 255) as u8;
            }
        }
    }
}
