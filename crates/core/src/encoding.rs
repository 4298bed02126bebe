//! Text encoding detection for CSV input.
//!
//! Detection is a best guess. A wrong guess yields garbled text, never an error.

use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use tracing::debug;

/// Guess the encoding of a raw byte buffer.
///
/// A byte order mark wins outright; otherwise the buffer is fed through a
/// statistical detector.
pub fn detect_encoding(bytes: &[u8]) -> &'static Encoding {
    if let Some((encoding, _bom_len)) = Encoding::for_bom(bytes) {
        return encoding;
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    detector.guess(None, true)
}

/// Decode bytes using the detected encoding, replacing malformed sequences.
pub fn decode_text(bytes: &[u8]) -> String {
    let encoding = detect_encoding(bytes);
    let (text, used, had_errors) = encoding.decode(bytes);
    debug!(
        "Decoded {} bytes as {} (malformed sequences: {})",
        bytes.len(),
        used.name(),
        had_errors
    );
    text.into_owned()
}
