//! Raw upload bytes → exchange-file text. Handles `.ifczip` archives.

use std::io::{Cursor, Read};

use ifcdot_core::{Error, Result};
use tracing::debug;

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

/// Whether the bytes look like a zip archive.
pub fn is_zip(bytes: &[u8]) -> bool {
    bytes.starts_with(ZIP_MAGIC)
}

/// Extract model text. Zip archives must contain an `.ifc` member; the first
/// one is used.
pub fn model_text(bytes: &[u8]) -> Result<String> {
    if !is_zip(bytes) {
        return Ok(decode(bytes.to_vec()));
    }

    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| Error::Archive(format!("Invalid ZIP file: {}", e)))?;

    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| Error::Archive(e.to_string()))?;
        if !entry.is_file() || !entry.name().to_ascii_lowercase().ends_with(".ifc") {
            continue;
        }

        debug!("Reading {} from archive", entry.name());
        let mut data = Vec::new();
        entry.read_to_end(&mut data)?;
        return Ok(decode(data));
    }

    Err(Error::Archive("archive contains no .ifc file".to_string()))
}

/// Exchange files are 7-bit ASCII by specification; tolerate stray bytes.
fn decode(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    }
}
