use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;

use crate::error::{Error, Result};
use crate::mime::guess_mimetype_from_data;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DataUriError {
    #[error("not a data URI")]
    NotADataUri,

    #[error("missing ',' between header and payload")]
    Malformed,

    #[error("corrupt payload: {0}")]
    CorruptPayload(String),
}

/// A decoded `data:` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    /// Media type without parameters. `text/plain` when the URI omits it.
    pub mimetype: String,
    pub data: Bytes,
}

/// Decode `data:[<mediatype>][;base64],<payload>`.
///
/// Payloads without `;base64` are percent-decoded.
pub fn parse_data_uri(uri: &str) -> std::result::Result<DataUri, DataUriError> {
    let rest = uri.strip_prefix("data:").ok_or(DataUriError::NotADataUri)?;
    let (header, payload) = rest.split_once(',').ok_or(DataUriError::Malformed)?;

    let (mediatype, is_base64) = match header.len().checked_sub(";base64".len()) {
        Some(at) if header.is_char_boundary(at) && header[at..].eq_ignore_ascii_case(";base64") => {
            (&header[..at], true)
        }
        _ => (header, false),
    };

    let data = if is_base64 {
        STANDARD
            .decode(payload.trim())
            .map_err(|e| DataUriError::CorruptPayload(e.to_string()))?
    } else {
        percent_encoding::percent_decode_str(payload).collect()
    };

    let mimetype = mediatype.split(';').next().unwrap_or_default().trim();
    let mimetype = if mimetype.is_empty() {
        "text/plain".to_owned()
    } else {
        mimetype.to_ascii_lowercase()
    };

    Ok(DataUri {
        mimetype,
        data: Bytes::from(data),
    })
}

/// Encode `data` as a base64 data URI.
///
/// Without an explicit `mimetype` one is sniffed from the data; if that fails
/// too, [`Error::UnknownMimetype`] is returned.
pub fn to_data_uri(data: &[u8], mimetype: Option<&str>) -> Result<String> {
    let mimetype = mimetype
        .or_else(|| guess_mimetype_from_data(data))
        .ok_or(Error::UnknownMimetype)?;

    Ok(format!("data:{mimetype};base64,{}", STANDARD.encode(data)))
}
