//! tiff-erator CLI - batch document to TIFF converter

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use tifferator_core::{
    init_logging, BatchDriver, BatchReport, CancellationToken, ConverterConfig, RunOutcome,
    TiffCompression,
};

#[derive(Parser, Debug)]
#[command(name = "tiff-erator")]
#[command(version)]
#[command(about = "Convert every document in a folder to a multi-frame TIFF", long_about = None)]
struct Cli {
    /// Directory holding the documents to convert
    #[arg(value_name = "INPUT_DIR")]
    input: PathBuf,

    /// Directory the TIFF files are written to
    #[arg(value_name = "OUTPUT_DIR")]
    output: PathBuf,

    /// PDF rasterisation resolution
    #[arg(long, env = "TIFFERATOR_DPI")]
    dpi: Option<u32>,

    /// TIFF compression scheme
    #[arg(long, value_enum)]
    compression: Option<Compression>,

    /// Truetype font for spreadsheets, Word documents and emails
    #[arg(long, value_name = "PATH")]
    font: Option<PathBuf>,

    /// JSON configuration file; flags override its values
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Do not write the chosen page orientation back into .xlsx inputs
    #[arg(long)]
    no_persist_orientation: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Compression {
    Lzw,
    Deflate,
    Packbits,
    None,
}

impl From<Compression> for TiffCompression {
    fn from(c: Compression) -> Self {
        match c {
            Compression::Lzw => TiffCompression::Lzw,
            Compression::Deflate => TiffCompression::Deflate,
            Compression::Packbits => TiffCompression::PackBits,
            Compression::None => TiffCompression::None,
        }
    }
}

impl Cli {
    fn converter_config(&self) -> Result<ConverterConfig> {
        let mut config = match &self.config {
            Some(path) => ConverterConfig::from_json_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => ConverterConfig::default(),
        };

        if let Some(dpi) = self.dpi {
            config.render.dpi = dpi;
        }
        if let Some(compression) = self.compression {
            config.render.compression = compression.into();
        }
        if let Some(font) = &self.font {
            config.layout.font_path = Some(font.clone());
        }
        if self.no_persist_orientation {
            config.persist_xlsx_orientation = false;
        }

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();
    let config = cli.converter_config()?;

    let token = CancellationToken::new();
    let report = run(&cli.input, &cli.output, config, token).await?;

    print_summary(&report);
    Ok(())
}

/// Run the batch on a blocking worker while Ctrl-C cancels the token.
async fn run(
    input: &Path,
    output: &Path,
    config: ConverterConfig,
    token: CancellationToken,
) -> Result<BatchReport> {
    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {msg}")?
            .progress_chars("#>-"),
    );

    let worker = {
        let input = input.to_path_buf();
        let output = output.to_path_buf();
        let token = token.clone();
        let pb = pb.clone();
        tokio::task::spawn_blocking(move || -> Result<BatchReport> {
            let mut driver = BatchDriver::new(config)?;
            let report = driver.run(&input, &output, &token, |progress| {
                pb.set_length(progress.total_files as u64);
                pb.set_position(progress.files_done as u64);
                pb.set_message(progress.message());
            })?;
            Ok(report)
        })
    };
    tokio::pin!(worker);

    let report = tokio::select! {
        joined = &mut worker => joined?,
        _ = tokio::signal::ctrl_c() => {
            warn!("Stop requested, finishing the current file");
            pb.set_message("Stopping...");
            token.cancel();
            worker.await?
        }
    }?;

    pb.finish_and_clear();
    info!("Processed {} of {} files", report.processed, report.total_files);
    Ok(report)
}

fn print_summary(report: &BatchReport) {
    match report.outcome {
        RunOutcome::Completed => println!("All files have been converted to TIFF."),
        RunOutcome::Stopped => println!("Conversion process has been stopped."),
    }

    if !report.skipped.is_empty() {
        println!("Skipped {} unsupported file(s).", report.skipped.len());
    }
    if !report.failed.is_empty() {
        println!("{} file(s) failed:", report.failed.len());
        for failed in &report.failed {
            println!("  {}: {}", failed.input_path.display(), failed.error);
        }
    }
}
