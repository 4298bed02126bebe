//! PDF page rasterisation using pdfium (Google's PDF engine).

use crate::cancel::CancellationToken;
use crate::config::RenderConfig;
use crate::error::{ConversionError, Result};
use image::{Rgb, RgbImage, RgbaImage};
use pdfium_render::prelude::*;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// PDF rasteriser bound to a pdfium library.
pub struct PdfRenderer {
    /// Background that transparent pixels are flattened onto.
    background: (u8, u8, u8),
    /// Pdfium library instance.
    pdfium: Pdfium,
}

impl PdfRenderer {
    /// Bind to pdfium.
    ///
    /// An explicit library directory is tried first, then the current
    /// directory, common system locations and finally the system loader.
    pub fn new(config: &RenderConfig) -> Result<Self> {
        config.validate()?;

        let explicit = config
            .pdfium_library_path
            .as_ref()
            .map(|dir| Pdfium::pdfium_platform_library_name_at_path(dir));

        let bindings = explicit
            .map(|path| Pdfium::bind_to_library(path))
            .unwrap_or_else(|| Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./")))
            .or_else(|_| {
                Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("/usr/lib"))
            })
            .or_else(|_| {
                Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(
                    "/usr/local/lib",
                ))
            })
            .or_else(|_| Pdfium::bind_to_system_library())
            .map_err(|e| {
                ConversionError::PdfiumError(format!("Failed to load pdfium library: {}", e))
            })?;

        info!("PDF renderer bound to pdfium");

        Ok(Self {
            background: config.background_color,
            pdfium: Pdfium::new(bindings),
        })
    }

    /// Rasterise every page at `dpi`, in page order.
    ///
    /// The token is checked before each page; a page already being rendered
    /// always completes.
    pub fn render_pages(
        &self,
        pdf_path: &Path,
        dpi: u32,
        token: &CancellationToken,
    ) -> Result<Vec<RgbImage>> {
        let start = Instant::now();
        let document = self.load(pdf_path)?;
        let page_count = document.pages().len() as usize;
        debug!("Rendering {} pages from {:?} at {} DPI", page_count, pdf_path, dpi);

        let mut pages = Vec::with_capacity(page_count);

        for page_idx in 0..page_count {
            token.check()?;

            let page = document.pages().get(page_idx as u16).map_err(|e| {
                ConversionError::PdfRenderError(format!(
                    "Failed to get page {}: {}",
                    page_idx + 1,
                    e
                ))
            })?;

            let width = points_to_pixels(page.width().value, dpi) as i32;
            let height = points_to_pixels(page.height().value, dpi) as i32;

            let render_config = PdfRenderConfig::new()
                .set_target_width(width)
                .set_target_height(height)
                .rotate_if_landscape(PdfPageRenderRotation::None, false);

            let bitmap = page.render_with_config(&render_config).map_err(|e| {
                ConversionError::PdfRenderError(format!(
                    "Failed to render page {}: {}",
                    page_idx + 1,
                    e
                ))
            })?;

            let rgba: RgbaImage = bitmap.as_image().into_rgba8();
            pages.push(flatten_onto(&rgba, self.background));
        }

        debug!("Rendered {} pages in {:?}", page_count, start.elapsed());
        Ok(pages)
    }

    fn load(&self, pdf_path: &Path) -> Result<PdfDocument<'_>> {
        if !pdf_path.exists() {
            return Err(ConversionError::InputNotFound(pdf_path.to_path_buf()));
        }
        self.pdfium
            .load_pdf_from_file(pdf_path, None)
            .map_err(|e| ConversionError::PdfRenderError(format!("Failed to load PDF: {}", e)))
    }
}

/// Composite an RGBA bitmap over a solid background, dropping alpha.
pub fn flatten_onto(image: &RgbaImage, background: (u8, u8, u8)) -> RgbImage {
    let (r, g, b) = background;
    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let pixel = image.get_pixel(x, y);
        let alpha = pixel[3] as f32 / 255.0;
        let inv_alpha = 1.0 - alpha;
        Rgb([
            ((pixel[0] as f32 * alpha) + (r as f32 * inv_alpha)).round() as u8,
            ((pixel[1] as f32 * alpha) + (g as f32 * inv_alpha)).round() as u8,
            ((pixel[2] as f32 * alpha) + (b as f32 * inv_alpha)).round() as u8,
        ])
    })
}

/// Pixel size of a PDF page edge at a given DPI, truncated.
fn points_to_pixels(points: f32, dpi: u32) -> u32 {
    ((points * dpi as f32) / 72.0) as u32
}
