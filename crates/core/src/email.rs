//! Message bodies from EML (RFC 5322) and Outlook MSG files.
//!
//! Plain text wins. Without it, the HTML body is used verbatim as markup text,
//! and a message with neither gets [`NO_CONTENT`].

use crate::error::{ConversionError, Result};
use encoding_rs::{UTF_16LE, WINDOWS_1252};
use mail_parser::{MessageParser, PartType};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

/// Placeholder drawn when a message has no body.
pub const NO_CONTENT: &str = "No content available";

/// MSG property streams holding the body, in order of preference.
const MSG_BODY_UNICODE: &str = "/__substg1.0_1000001F";
const MSG_BODY_ANSI: &str = "/__substg1.0_1000001E";
const MSG_BODY_HTML: &str = "/__substg1.0_10130102";

/// Email container formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmailKind {
    Eml,
    Msg,
}

/// Read the body text of an email file.
pub fn read_body(kind: EmailKind, path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(ConversionError::InputNotFound(path.to_path_buf()));
    }
    match kind {
        EmailKind::Eml => eml_body(&std::fs::read(path)?),
        EmailKind::Msg => msg_body(path),
    }
}

/// Body of a raw RFC 5322 message.
pub fn eml_body(raw: &[u8]) -> Result<String> {
    let message = MessageParser::default()
        .parse(raw)
        .ok_or_else(|| ConversionError::EmailError("Unparseable message".to_string()))?;

    let plain = message.text_bodies().find_map(|part| match &part.body {
        PartType::Text(text) => Some(text.to_string()),
        _ => None,
    });
    let html = || {
        message.html_bodies().find_map(|part| match &part.body {
            PartType::Html(html) => Some(html.to_string()),
            _ => None,
        })
    };

    Ok(plain
        .or_else(html)
        .unwrap_or_else(|| NO_CONTENT.to_string()))
}

fn msg_body(path: &Path) -> Result<String> {
    let mut file = cfb::open(path)
        .map_err(|e| ConversionError::EmailError(format!("Not an Outlook message: {}", e)))?;

    let mut read_stream = |name: &str| -> Result<Option<Vec<u8>>> {
        if !file.is_stream(name) {
            return Ok(None);
        }
        let mut data = Vec::new();
        file.open_stream(name)?.read_to_end(&mut data)?;
        Ok(Some(data))
    };

    if let Some(data) = read_stream(MSG_BODY_UNICODE)? {
        let (text, _) = UTF_16LE.decode_without_bom_handling(&data);
        return Ok(trim_nul(&text));
    }
    if let Some(data) = read_stream(MSG_BODY_ANSI)? {
        let (text, _) = WINDOWS_1252.decode_without_bom_handling(&data);
        return Ok(trim_nul(&text));
    }
    if let Some(data) = read_stream(MSG_BODY_HTML)? {
        return Ok(trim_nul(&String::from_utf8_lossy(&data)));
    }
    Ok(NO_CONTENT.to_string())
}

/// MSG string properties are often NUL-terminated.
fn trim_nul(text: &str) -> String {
    text.trim_end_matches('\0').to_string()
}
