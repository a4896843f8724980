use std::fs;
use std::path::Path;

use crate::errors::AppResult;

/// Raw photo bytes captured by the client, plus the file extension used
/// when building the storage key.
#[derive(Debug, Clone)]
pub struct Photo {
    pub bytes: Vec<u8>,
    pub extension: String,
}

impl Photo {
    pub fn new(bytes: Vec<u8>, extension: impl Into<String>) -> Self {
        Self {
            bytes,
            extension: extension.into(),
        }
    }

    /// Read a photo from disk; the extension is taken from the file name
    /// (defaults to "jpg").
    pub fn from_file(path: &Path) -> AppResult<Self> {
        let bytes = fs::read(path)?;
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("jpg")
            .to_lowercase();
        Ok(Self { bytes, extension })
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
