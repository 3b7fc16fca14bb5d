//! Multipart reading shared by the CSV preview and the generate endpoint.

use crate::error::MergeError;
use actix_multipart::Multipart;
use futures_util::StreamExt;

/// Raw parts of an upload, in the form the client sent them.
#[derive(Debug, Default)]
pub struct UploadParts {
    /// Body of the `json` part.
    pub json: Option<Vec<u8>>,
    /// Body of the `file` part (the CSV).
    pub file: Option<Vec<u8>>,
}

impl UploadParts {
    pub fn require_file(&self) -> Result<&[u8], MergeError> {
        self.file
            .as_deref()
            .ok_or_else(|| MergeError::InvalidRequest("missing 'file' part".to_string()))
    }

    pub fn require_json(&self) -> Result<&[u8], MergeError> {
        self.json
            .as_deref()
            .ok_or_else(|| MergeError::InvalidRequest("missing 'json' part".to_string()))
    }
}

fn check_file_name(name: &str) -> Result<(), MergeError> {
    let lower = name.to_ascii_lowercase();
    if name.is_empty() || lower.ends_with(".csv") || lower.ends_with(".txt") {
        Ok(())
    } else {
        Err(MergeError::InvalidRequest(format!(
            "'{}' is not a CSV file",
            name
        )))
    }
}

/// Reads the `json` and `file` parts of `payload`, in any order.
///
/// Other parts are drained and ignored. The combined size of the kept parts
/// may not exceed `max_bytes`.
pub async fn read_parts(
    mut payload: Multipart,
    max_bytes: usize,
) -> Result<UploadParts, MergeError> {
    let mut parts = UploadParts::default();
    let mut total = 0usize;

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| MergeError::InvalidRequest(e.to_string()))?;
        let name = field.name().map(str::to_string);

        if name.as_deref() == Some("file") {
            let filename = field
                .content_disposition()
                .and_then(|cd| cd.get_filename().map(|f| f.to_string()))
                .unwrap_or_default();
            check_file_name(&filename)?;
        }

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| MergeError::InvalidRequest(e.to_string()))?;
            if name.is_none() {
                continue;
            }
            total += chunk.len();
            if total > max_bytes {
                return Err(MergeError::InvalidRequest(format!(
                    "upload exceeds the limit of {} bytes",
                    max_bytes
                )));
            }
            bytes.extend_from_slice(&chunk);
        }

        match name.as_deref() {
            Some("file") => parts.file = Some(bytes),
            Some("json") => parts.json = Some(bytes),
            _ => {}
        }
    }

    Ok(parts)
}
