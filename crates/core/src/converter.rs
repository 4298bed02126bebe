//! Single-file conversion: paginate a source document and write it as TIFF.

use crate::cancel::CancellationToken;
use crate::config::{ConverterConfig, FileResult};
use crate::dispatch::{output_path_for, DocumentKind};
use crate::docx::read_paragraphs;
use crate::email::read_body;
use crate::error::Result;
use crate::orientation::{optimal_orientation, Orientation};
use crate::paginator::Paginator;
use crate::pdf_renderer::PdfRenderer;
use crate::tabular::{load_workbook, SpreadsheetKind};
use crate::tiff_writer::write_tiff;
use image::RgbImage;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Converts one document at a time into a multi-frame TIFF.
///
/// Pdfium is bound lazily on the first PDF, so a missing pdfium library only
/// affects PDF inputs.
pub struct Converter {
    config: ConverterConfig,
    paginator: Paginator,
    pdf: Option<PdfRenderer>,
}

impl Converter {
    /// Create a new converter with the given configuration.
    pub fn new(config: ConverterConfig) -> Result<Self> {
        config.validate()?;

        info!(
            "Initializing converter with dpi={}, compression={:?}",
            config.render.dpi, config.render.compression
        );

        let paginator = Paginator::new(config.layout.clone());
        Ok(Self {
            config,
            paginator,
            pdf: None,
        })
    }

    /// Convert `input` into `output_dir/<stem>.tiff`.
    ///
    /// Documents that paginate to zero pages write nothing and return a
    /// result with `output_path: None`.
    pub fn convert(
        &mut self,
        kind: DocumentKind,
        input: &Path,
        output_dir: &Path,
        token: &CancellationToken,
    ) -> Result<FileResult> {
        let start = Instant::now();
        debug!("Converting {:?} as {:?}", input, kind);

        let pages = self.paginate(kind, input, token)?;

        let output_path = if pages.is_empty() {
            info!("{:?} produced no pages, nothing written", input);
            None
        } else {
            let path = output_path_for(input, output_dir);
            write_tiff(&path, &pages, self.config.render.compression)?;
            info!(
                "Converted {:?} to {} frame(s) in {:?}",
                input,
                pages.len(),
                start.elapsed()
            );
            Some(path)
        };

        Ok(FileResult {
            input_path: input.to_path_buf(),
            kind,
            page_count: pages.len(),
            output_path,
            duration: start.elapsed(),
        })
    }

    /// Produce the ordered page images for a document.
    pub fn paginate(
        &mut self,
        kind: DocumentKind,
        input: &Path,
        token: &CancellationToken,
    ) -> Result<Vec<RgbImage>> {
        match kind {
            DocumentKind::Pdf => {
                let dpi = self.config.render.dpi;
                self.pdf_renderer()?.render_pages(input, dpi, token)
            }
            DocumentKind::RasterImage => Ok(vec![image::open(input)?.to_rgb8()]),
            DocumentKind::WordDoc => {
                let paragraphs = read_paragraphs(input)?;
                self.paginator.paragraph_pages(&paragraphs, token)
            }
            DocumentKind::Spreadsheet(_) => self.spreadsheet_pages(input),
            DocumentKind::Email(email_kind) => {
                let body = read_body(email_kind, input)?;
                Ok(vec![self.paginator.text_page(&body)])
            }
        }
    }

    fn spreadsheet_pages(&mut self, input: &Path) -> Result<Vec<RgbImage>> {
        let workbook = load_workbook(input)?;
        let orientation = self.orientation_for(input, workbook.kind);

        let mut pages = Vec::new();
        for sheet in &workbook.sheets {
            let sheet_pages = self.paginator.grid_pages(&sheet.grid, orientation);
            debug!("Sheet '{}' -> {} page(s)", sheet.name, sheet_pages.len());
            pages.extend(sheet_pages);
        }
        Ok(pages)
    }

    /// XLS and CSV always print landscape. Only XLSX is measured, and only
    /// XLSX can have the choice written back.
    fn orientation_for(&self, input: &Path, kind: SpreadsheetKind) -> Orientation {
        if kind != SpreadsheetKind::Xlsx {
            return Orientation::Landscape;
        }
        let persist = self.config.persist_xlsx_orientation;
        optimal_orientation(input, &self.config.capacity, persist).unwrap_or_else(|e| {
            warn!(
                "Could not choose orientation for {:?}, using portrait: {}",
                input, e
            );
            Orientation::Portrait
        })
    }

    fn pdf_renderer(&mut self) -> Result<&PdfRenderer> {
        let renderer = match self.pdf.take() {
            Some(renderer) => renderer,
            None => PdfRenderer::new(&self.config.render)?,
        };
        Ok(&*self.pdf.insert(renderer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::email::EmailKind;
    use crate::error::ConversionError;
    use image::Rgb;

    fn small_config() -> ConverterConfig {
        ConverterConfig {
            layout: LayoutConfig {
                canvas_width: 200,
                canvas_height: 300,
                font_path: None,
                ..LayoutConfig::default()
            },
            ..ConverterConfig::default()
        }
    }

    #[test]
    fn test_converter_rejects_invalid_config() {
        let mut config = ConverterConfig::default();
        config.render.dpi = 0;
        assert!(Converter::new(config).is_err());
    }

    #[test]
    fn test_image_round_trip_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("photo.png");
        RgbImage::from_pixel(37, 21, Rgb([1, 2, 3])).save(&input).unwrap();

        let mut converter = Converter::new(small_config()).unwrap();
        let result = converter
            .convert(
                DocumentKind::RasterImage,
                &input,
                dir.path(),
                &CancellationToken::new(),
            )
            .unwrap();

        assert_eq!(result.page_count, 1);
        let output = result.output_path.unwrap();
        assert_eq!(output, dir.path().join("photo.tiff"));
        let decoded = image::open(&output).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (37, 21));
    }

    #[test]
    fn test_csv_pages_are_landscape() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("wide.csv");
        let row = (0..40).map(|i| i.to_string()).collect::<Vec<_>>().join(",");
        std::fs::write(&input, format!("{}\n", row)).unwrap();

        let mut converter = Converter::new(small_config()).unwrap();
        let pages = converter
            .paginate(
                DocumentKind::Spreadsheet(SpreadsheetKind::Csv),
                &input,
                &CancellationToken::new(),
            )
            .unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].dimensions(), (300, 200));
    }

    #[test]
    fn test_tall_csv_stays_landscape() {
        // Portrait would need fewer pages here, but CSV is never measured.
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("tall.csv");
        let body: String = (0..200).map(|r| format!("{},x\n", r)).collect();
        std::fs::write(&input, body).unwrap();

        let mut converter = Converter::new(small_config()).unwrap();
        let pages = converter
            .paginate(
                DocumentKind::Spreadsheet(SpreadsheetKind::Csv),
                &input,
                &CancellationToken::new(),
            )
            .unwrap();
        // 10 + 20k >= 180 first holds at k = 9 rows, so 200 rows need 23 pages.
        assert_eq!(pages.len(), 23);
        assert!(pages.iter().all(|p| p.dimensions() == (300, 200)));
    }

    #[test]
    fn test_tall_xlsx_is_measured() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("tall.xlsx");
        let mut workbook = rust_xlsxwriter::Workbook::new();
        let sheet = workbook.add_worksheet();
        for r in 0..200u32 {
            sheet.write_number(r, 0, r as f64).unwrap();
            sheet.write_number(r, 1, 1.0).unwrap();
        }
        workbook.save(&input).unwrap();

        let mut config = small_config();
        config.persist_xlsx_orientation = false;
        let mut converter = Converter::new(config).unwrap();
        let pages = converter
            .paginate(
                DocumentKind::Spreadsheet(SpreadsheetKind::Xlsx),
                &input,
                &CancellationToken::new(),
            )
            .unwrap();
        assert!(pages.iter().all(|p| p.dimensions() == (200, 300)));
    }

    #[test]
    fn test_empty_csv_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("empty.csv");
        std::fs::write(&input, "").unwrap();
        let out = dir.path().join("out");
        std::fs::create_dir(&out).unwrap();

        let mut converter = Converter::new(small_config()).unwrap();
        let result = converter
            .convert(
                DocumentKind::Spreadsheet(SpreadsheetKind::Csv),
                &input,
                &out,
                &CancellationToken::new(),
            )
            .unwrap();

        assert_eq!(result.page_count, 0);
        assert!(result.output_path.is_none());
        assert!(!out.join("empty.tiff").exists());
    }

    #[test]
    fn test_eml_single_page() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("mail.eml");
        std::fs::write(&input, "Subject: x\r\n\r\nbody text\r\n").unwrap();

        let mut converter = Converter::new(small_config()).unwrap();
        let pages = converter
            .paginate(
                DocumentKind::Email(EmailKind::Eml),
                &input,
                &CancellationToken::new(),
            )
            .unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].dimensions(), (200, 300));
    }

    #[test]
    fn test_corrupt_image_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("broken.png");
        std::fs::write(&input, "not a png").unwrap();

        let mut converter = Converter::new(small_config()).unwrap();
        let result = converter.convert(
            DocumentKind::RasterImage,
            &input,
            dir.path(),
            &CancellationToken::new(),
        );
        assert!(matches!(result, Err(ConversionError::ImageError(_))));
        assert!(!dir.path().join("broken.tiff").exists());
    }
}
