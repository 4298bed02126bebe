//! Multi-frame TIFF output.

use crate::config::TiffCompression;
use crate::error::{ConversionError, Result};
use image::RgbImage;
use std::fs::File;
use std::io::{BufWriter, Seek, Write};
use std::path::Path;
use tiff::encoder::compression::{Compression, Deflate, Lzw, Packbits, Uncompressed};
use tiff::encoder::{colortype, TiffEncoder};
use tracing::{debug, warn};

/// Write `pages` as consecutive frames of one TIFF file.
///
/// The first page is the base frame; the rest are appended in order.
/// Writing zero pages is an error; callers skip empty documents instead.
/// If encoding fails part way, the partial file is deleted.
pub fn write_tiff(path: &Path, pages: &[RgbImage], compression: TiffCompression) -> Result<()> {
    if pages.is_empty() {
        return Err(ConversionError::TiffEncodingError(
            "No pages to write".to_string(),
        ));
    }

    let file = File::create(path).map_err(|e| ConversionError::OutputDirError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let mut writer = BufWriter::new(file);
    let written = encode_frames(&mut writer, pages, compression)
        .and_then(|()| writer.flush().map_err(ConversionError::from));
    if let Err(e) = written {
        drop(writer);
        // A half-written file must not look like output.
        if let Err(remove_err) = std::fs::remove_file(path) {
            warn!("Could not remove partial TIFF {:?}: {}", path, remove_err);
        }
        return Err(e);
    }

    debug!(
        "Wrote {} frame(s) to {:?} ({:?})",
        pages.len(),
        path,
        compression
    );
    Ok(())
}

/// Encode frames into any seekable writer.
pub fn encode_frames<W: Write + Seek>(
    writer: &mut W,
    pages: &[RgbImage],
    compression: TiffCompression,
) -> Result<()> {
    let mut encoder = TiffEncoder::new(writer)?;
    match compression {
        TiffCompression::Lzw => write_all(&mut encoder, pages, Lzw::default()),
        TiffCompression::Deflate => write_all(&mut encoder, pages, Deflate::default()),
        TiffCompression::PackBits => write_all(&mut encoder, pages, Packbits::default()),
        TiffCompression::None => write_all(&mut encoder, pages, Uncompressed::default()),
    }
}

fn write_all<W, D>(encoder: &mut TiffEncoder<W>, pages: &[RgbImage], compression: D) -> Result<()>
where
    W: Write + Seek,
    D: Compression + Clone,
{
    for page in pages {
        encoder.write_image_with_compression::<colortype::RGB8, D>(
            page.width(),
            page.height(),
            compression.clone(),
            page.as_raw(),
        )?;
    }
    Ok(())
}
