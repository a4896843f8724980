//! Photo storage. Uploads are the first phase of a two-phase write: the
//! caller persists the returned reference in a row afterwards, and nothing
//! removes the object if that second phase fails.

use crate::errors::{AppError, AppResult};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

pub const BUCKET_ATTENDANCE: &str = "attendance";
pub const BUCKET_REPORTS: &str = "reports";

pub trait ObjectStore {
    /// Store `bytes` under `bucket/key`; returns the public reference.
    fn upload(&self, bucket: &str, key: &str, bytes: &[u8]) -> AppResult<String>;

    fn public_url(&self, bucket: &str, key: &str) -> String;
}

/// Objects as plain files under a root directory.
pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, bucket: &str, key: &str) -> PathBuf {
        self.root.join(bucket).join(key)
    }
}

impl ObjectStore for FsObjectStore {
    fn upload(&self, bucket: &str, key: &str, bytes: &[u8]) -> AppResult<String> {
        if key.split('/').any(|seg| seg == ".." || seg.is_empty()) {
            return Err(AppError::UploadFailed(format!("invalid object key '{}'", key)));
        }

        let path = self.path_for(bucket, key);
        if path.exists() {
            return Err(AppError::UploadFailed(format!(
                "object '{}/{}' already exists",
                bucket, key
            )));
        }

        let write = || -> std::io::Result<()> {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, bytes)
        };
        write().map_err(|e| AppError::UploadFailed(e.to_string()))?;

        Ok(self.public_url(bucket, key))
    }

    fn public_url(&self, bucket: &str, key: &str) -> String {
        format!("file://{}", self.path_for(bucket, key).display())
    }
}

/// In-process store; can be switched to reject every upload.
#[derive(Default)]
pub struct MemoryObjectStore {
    objects: Mutex<HashMap<String, Vec<u8>>>,
    reject: Mutex<bool>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_reject(&self, reject: bool) {
        if let Ok(mut r) = self.reject.lock() {
            *r = reject;
        }
    }

    pub fn len(&self) -> usize {
        self.objects.lock().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether an object with this public reference exists.
    pub fn contains_url(&self, url: &str) -> bool {
        url.strip_prefix("mem://")
            .and_then(|path| self.objects.lock().ok().map(|m| m.contains_key(path)))
            .unwrap_or(false)
    }
}

impl ObjectStore for MemoryObjectStore {
    fn upload(&self, bucket: &str, key: &str, bytes: &[u8]) -> AppResult<String> {
        if self.reject.lock().map(|r| *r).unwrap_or(false) {
            return Err(AppError::UploadFailed("storage rejected the upload".into()));
        }

        let path = format!("{}/{}", bucket, key);
        let mut objects = self
            .objects
            .lock()
            .map_err(|_| AppError::UploadFailed("store lock poisoned".into()))?;
        if objects.contains_key(&path) {
            return Err(AppError::UploadFailed(format!("object '{}' already exists", path)));
        }
        objects.insert(path, bytes.to_vec());
        drop(objects);

        Ok(self.public_url(bucket, key))
    }

    fn public_url(&self, bucket: &str, key: &str) -> String {
        format!("mem://{}/{}", bucket, key)
    }
}
