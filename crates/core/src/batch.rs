//! Directory-level driver: walk the input directory and convert each entry.

use crate::cancel::CancellationToken;
use crate::config::{
    BatchProgress, BatchReport, ConverterConfig, FailedFile, FileStatus, RunOutcome,
};
use crate::converter::Converter;
use crate::dispatch::DocumentKind;
use crate::error::{ConversionError, Result};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Runs a [`Converter`] over every entry of a directory, in file-name order.
pub struct BatchDriver {
    converter: Converter,
}

impl BatchDriver {
    pub fn new(config: ConverterConfig) -> Result<Self> {
        Ok(Self {
            converter: Converter::new(config)?,
        })
    }

    /// Convert every entry of `input_dir` into `output_dir`.
    ///
    /// The token is checked before each entry; once it fires the run ends
    /// with [`RunOutcome::Stopped`]. Per-file failures are logged, recorded in
    /// the report and never abort the run. `progress` is called once per
    /// visited entry.
    pub fn run<F>(
        &mut self,
        input_dir: &Path,
        output_dir: &Path,
        token: &CancellationToken,
        progress: F,
    ) -> Result<BatchReport>
    where
        F: Fn(BatchProgress),
    {
        let start = Instant::now();
        let entries = list_entries(input_dir)?;

        std::fs::create_dir_all(output_dir).map_err(|e| ConversionError::OutputDirError {
            path: output_dir.to_path_buf(),
            message: e.to_string(),
        })?;

        let total_files = entries.len();
        info!(
            "Converting {} entries from {:?} into {:?}",
            total_files, input_dir, output_dir
        );

        let mut report = BatchReport {
            total_files,
            processed: 0,
            converted: Vec::new(),
            skipped: Vec::new(),
            failed: Vec::new(),
            outcome: RunOutcome::Completed,
            total_duration: Duration::ZERO,
            total_pages: 0,
        };

        for (index, path) in entries.iter().enumerate() {
            if token.is_cancelled() {
                info!("Cancelled after {} of {} entries", index, total_files);
                report.outcome = RunOutcome::Stopped;
                break;
            }

            let status = self.visit(path, output_dir, token, &mut report);
            report.processed = index + 1;

            progress(BatchProgress {
                files_done: index + 1,
                total_files,
                current_file: display_name(path),
                status,
            });

            if status == FileStatus::Cancelled {
                report.outcome = RunOutcome::Stopped;
                break;
            }
        }

        report.total_duration = start.elapsed();
        info!(
            "Batch finished ({:?}): {} converted, {} skipped, {} failed, {} frames in {:?}",
            report.outcome,
            report.converted.len(),
            report.skipped.len(),
            report.failed.len(),
            report.total_pages,
            report.total_duration
        );
        Ok(report)
    }

    fn visit(
        &mut self,
        path: &Path,
        output_dir: &Path,
        token: &CancellationToken,
        report: &mut BatchReport,
    ) -> FileStatus {
        let Some(kind) = DocumentKind::from_path(path) else {
            debug!("Skipping {:?}: no converter for this suffix", path);
            report.skipped.push(path.to_path_buf());
            return FileStatus::Skipped;
        };

        match self.converter.convert(kind, path, output_dir, token) {
            Ok(result) => {
                let status = if result.output_path.is_some() {
                    FileStatus::Converted
                } else {
                    FileStatus::NoOutput
                };
                report.total_pages += result.page_count;
                report.converted.push(result);
                status
            }
            Err(e) if e.is_cancelled() => {
                warn!("Cancelled while converting {:?}, no output written", path);
                FileStatus::Cancelled
            }
            Err(e) => {
                error!("Failed to convert {:?}: {}", path, e);
                report.failed.push(FailedFile {
                    input_path: path.to_path_buf(),
                    error: e.to_string(),
                });
                FileStatus::Failed
            }
        }
    }
}

/// Direct entries of `dir`, sorted by file name. Nothing recurses.
pub fn list_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(ConversionError::InputNotFound(dir.to_path_buf()));
    }

    let mut entries = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        entries.push(entry?.path());
    }
    entries.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(entries)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use image::{Rgb, RgbImage};
    use std::sync::Mutex;

    fn small_config() -> ConverterConfig {
        ConverterConfig {
            layout: LayoutConfig {
                canvas_width: 120,
                canvas_height: 160,
                font_path: None,
                ..LayoutConfig::default()
            },
            ..ConverterConfig::default()
        }
    }

    fn write_png(path: &Path) {
        RgbImage::from_pixel(4, 4, Rgb([9, 9, 9])).save(path).unwrap();
    }

    #[test]
    fn test_list_entries_sorted() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.csv"), "1").unwrap();
        std::fs::write(dir.path().join("a.txt"), "x").unwrap();
        std::fs::create_dir(dir.path().join("c_subdir")).unwrap();
        std::fs::write(dir.path().join("c_subdir").join("nested.csv"), "1").unwrap();

        let names: Vec<String> = list_entries(dir.path())
            .unwrap()
            .iter()
            .map(|p| display_name(p))
            .collect();
        assert_eq!(names, vec!["a.txt", "b.csv", "c_subdir"]);
    }

    #[test]
    fn test_subdirectory_entries() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        std::fs::create_dir(input.path().join("archive")).unwrap();
        std::fs::create_dir(input.path().join("folder.csv")).unwrap();

        let mut driver = BatchDriver::new(small_config()).unwrap();
        let report = driver
            .run(input.path(), output.path(), &CancellationToken::new(), |_| {})
            .unwrap();

        // No suffix: skipped. A directory with a spreadsheet suffix fails to load.
        assert_eq!(report.processed, 2);
        assert_eq!(report.skipped, vec![input.path().join("archive")]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.outcome, RunOutcome::Completed);
    }

    #[test]
    fn test_missing_input_dir() {
        let out = tempfile::tempdir().unwrap();
        let mut driver = BatchDriver::new(small_config()).unwrap();
        let result = driver.run(
            Path::new("/nonexistent/input"),
            out.path(),
            &CancellationToken::new(),
            |_| {},
        );
        assert!(matches!(result, Err(ConversionError::InputNotFound(_))));
    }

    #[test]
    fn test_skipped_entries_are_counted() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        write_png(&input.path().join("a.png"));
        std::fs::write(input.path().join("b.txt"), "notes").unwrap();

        let seen = Mutex::new(Vec::new());
        let mut driver = BatchDriver::new(small_config()).unwrap();
        let report = driver
            .run(input.path(), output.path(), &CancellationToken::new(), |p| {
                seen.lock().unwrap().push((p.message(), p.status));
            })
            .unwrap();

        assert_eq!(report.outcome, RunOutcome::Completed);
        assert_eq!(report.processed, 2);
        assert_eq!(report.skipped.len(), 1);
        assert!(output.path().join("a.tiff").exists());
        assert!(!output.path().join("b.tiff").exists());
        assert_eq!(
            seen.into_inner().unwrap(),
            vec![
                ("Converting 1 out of 2 files".to_string(), FileStatus::Converted),
                ("Converting 2 out of 2 files".to_string(), FileStatus::Skipped),
            ]
        );
    }

    #[test]
    fn test_failure_does_not_abort_batch() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        std::fs::write(input.path().join("a.png"), "garbage").unwrap();
        write_png(&input.path().join("b.png"));

        let mut driver = BatchDriver::new(small_config()).unwrap();
        let report = driver
            .run(input.path(), output.path(), &CancellationToken::new(), |_| {})
            .unwrap();

        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].input_path, input.path().join("a.png"));
        assert_eq!(report.converted.len(), 1);
        assert!(output.path().join("b.tiff").exists());
        assert_eq!(report.outcome, RunOutcome::Completed);
    }

    #[test]
    fn test_zero_page_file_has_no_output() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        std::fs::write(input.path().join("empty.csv"), "").unwrap();

        let mut driver = BatchDriver::new(small_config()).unwrap();
        let report = driver
            .run(input.path(), output.path(), &CancellationToken::new(), |p| {
                assert_eq!(p.status, FileStatus::NoOutput);
            })
            .unwrap();

        assert_eq!(report.converted.len(), 1);
        assert_eq!(report.outputs().count(), 0);
        assert!(!output.path().join("empty.tiff").exists());
    }

    #[test]
    fn test_cancel_after_k_files() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        for name in ["a.png", "b.png", "c.png", "d.png"] {
            write_png(&input.path().join(name));
        }

        let token = CancellationToken::new();
        let stop_after = 2;
        let mut driver = BatchDriver::new(small_config()).unwrap();
        let report = driver
            .run(input.path(), output.path(), &token, |p| {
                if p.files_done == stop_after {
                    token.cancel();
                }
            })
            .unwrap();

        assert_eq!(report.outcome, RunOutcome::Stopped);
        assert_eq!(report.processed, stop_after);
        assert!(output.path().join("a.tiff").exists());
        assert!(output.path().join("b.tiff").exists());
        assert!(!output.path().join("c.tiff").exists());
        assert!(!output.path().join("d.tiff").exists());
    }

    #[test]
    fn test_cancel_before_start() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        write_png(&input.path().join("a.png"));

        let token = CancellationToken::new();
        token.cancel();
        let mut driver = BatchDriver::new(small_config()).unwrap();
        let report = driver
            .run(input.path(), output.path(), &token, |_| {})
            .unwrap();

        assert_eq!(report.outcome, RunOutcome::Stopped);
        assert_eq!(report.processed, 0);
        assert!(!output.path().join("a.tiff").exists());
    }

    #[test]
    fn test_creates_output_dir() {
        let input = tempfile::tempdir().unwrap();
        let root = tempfile::tempdir().unwrap();
        let output = root.path().join("nested").join("out");
        write_png(&input.path().join("a.png"));

        let mut driver = BatchDriver::new(small_config()).unwrap();
        driver
            .run(input.path(), &output, &CancellationToken::new(), |_| {})
            .unwrap();
        assert!(output.join("a.tiff").exists());
    }
}
