//! Reading OCR output from storage.

use std::path::Path;

use tracing::debug;

use crate::error::InputError;

/// Read OCR text from a file.
///
/// OCR engines occasionally emit invalid UTF-8; such bytes are replaced
/// with U+FFFD rather than rejecting the whole document.
pub fn read_text(path: &Path) -> Result<String, InputError> {
    let bytes = std::fs::read(path).map_err(|source| InputError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let text = String::from_utf8_lossy(&bytes).into_owned();
    debug!("Read {} bytes of OCR text from {}", bytes.len(), path.display());

    Ok(text)
}
