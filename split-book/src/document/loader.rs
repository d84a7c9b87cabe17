//! Document loading with ordered encoding trial.

use super::Document;
use crate::error::{Result, SplitError};
use encoding_rs::{UTF_8, WINDOWS_1252};
use std::fs;
use std::path::Path;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Text encodings tried when decoding a document, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    /// UTF-8 with a leading byte order mark
    Utf8Sig,
    Utf8,
    Windows1252,
    Latin1,
}

/// The order in which encodings are tried; the first that decodes wins.
pub const ENCODING_ORDER: &[TextEncoding] = &[
    TextEncoding::Utf8Sig,
    TextEncoding::Utf8,
    TextEncoding::Windows1252,
    TextEncoding::Latin1,
];

impl TextEncoding {
    pub fn name(&self) -> &'static str {
        match self {
            TextEncoding::Utf8Sig => "utf-8-sig",
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Windows1252 => "cp1252",
            TextEncoding::Latin1 => "latin1",
        }
    }

    /// Decode bytes strictly, returning `None` on any malformed sequence.
    pub fn decode(&self, bytes: &[u8]) -> Option<String> {
        match self {
            TextEncoding::Utf8Sig => {
                let body = bytes.strip_prefix(UTF8_BOM)?;
                UTF_8
                    .decode_without_bom_handling_and_without_replacement(body)
                    .map(|text| text.into_owned())
            }
            TextEncoding::Utf8 => UTF_8
                .decode_without_bom_handling_and_without_replacement(bytes)
                .map(|text| text.into_owned()),
            TextEncoding::Windows1252 => WINDOWS_1252
                .decode_without_bom_handling_and_without_replacement(bytes)
                .map(|text| text.into_owned()),
            // Every byte maps to the code point of the same value.
            TextEncoding::Latin1 => Some(bytes.iter().map(|&b| b as char).collect()),
        }
    }
}

/// Decode raw bytes, trying each encoding in [`ENCODING_ORDER`].
pub fn decode(bytes: &[u8]) -> Option<(String, TextEncoding)> {
    ENCODING_ORDER
        .iter()
        .find_map(|encoding| encoding.decode(bytes).map(|text| (text, *encoding)))
}

/// Read and decode a document from disk.
pub fn read_document(path: &Path) -> Result<Document> {
    let bytes = fs::read(path).map_err(|e| SplitError::ReadFailure {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let (text, encoding) = decode(&bytes).ok_or_else(|| SplitError::ReadFailure {
        path: path.to_path_buf(),
        reason: "no supported encoding could decode the file".to_string(),
    })?;

    let document = Document::new(text);
    log::info!("Read {} with encoding {}", path.display(), encoding.name());
    log::info!(
        "Document size: {} characters, {} words",
        document.char_count(),
        document.word_count()
    );

    Ok(document)
}
