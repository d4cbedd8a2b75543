//! Image upload validation and file storage.
//!
//! Products and spaces may carry one image. Uploads are validated before they
//! reach a storage backend:
//!
//! - size must not exceed the configured maximum (1.5 MB by default)
//! - the content type must end in `jpg`, `jpeg`, `png` or `webp`
//!
//! Stored files are addressed by a storage key such as
//! `products/5f0c...e1.png`; the backend turns the key into a public URL.
//!
//! # Example
//!
//! ```ignore
//! use activecenter_core::file_storage::{FileStorage, ImageUpload, LocalFileStorage};
//!
//! let storage = LocalFileStorage::new("./uploads".into(), "http://localhost:3000/files".into());
//! let upload = ImageUpload::new("racket.png", "image/png", bytes);
//! let stored = storage.store_image("products", product_id, &upload).await?;
//! // `stored.key` is what `delete` takes back if the owner is never saved.
//! ```

use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;

use tokio::fs;

/// Default upload limit in bytes (1.5 MB).
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 1_500_000;

/// Accepted image suffixes, matched against the end of the content type.
pub const ALLOWED_IMAGE_TYPES: [&str; 4] = ["jpg", "jpeg", "png", "webp"];

pub type StorageFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StorageError>> + Send + 'a>>;

/// Storage backend for uploaded files.
pub trait FileStorage: Send + Sync {
    /// Save file content under `key` and return the key.
    fn save<'a>(&'a self, key: &'a str, content: &'a [u8]) -> StorageFuture<'a, String>;

    /// Delete a file by key. Missing files are not an error.
    fn delete<'a>(&'a self, key: &'a str) -> StorageFuture<'a, ()>;

    /// Public URL for a stored key.
    fn get_url(&self, key: &str) -> Result<String, StorageError>;

    /// Largest accepted upload in bytes.
    fn max_file_size(&self) -> usize;

    /// Validates `upload` and stores it under `<prefix>/<owner_id>.<ext>`.
    fn store_image<'a>(
        &'a self,
        prefix: &'a str,
        owner_id: &'a str,
        upload: &'a ImageUpload,
    ) -> StorageFuture<'a, StoredImage> {
        Box::pin(async move {
            let extension = upload.validate(self.max_file_size())?;
            let key = format!("{}/{}.{}", prefix, owner_id, extension);
            let key = self.save(&key, &upload.content).await?;
            let url = self.get_url(&key)?;
            Ok(StoredImage { key, url })
        })
    }
}

/// Where an image landed: the key to delete it by and its public URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    pub key: String,
    pub url: String,
}

/// Deletes an image whose owner was never saved.
///
/// The caller is already returning the save error, so a failed delete is only
/// logged.
pub async fn discard_image(files: &dyn FileStorage, image: &StoredImage) {
    match files.delete(&image.key).await {
        Ok(()) => tracing::debug!(key = %image.key, "Discarded unsaved image"),
        Err(e) => tracing::warn!(key = %image.key, error = %e, "Failed to discard unsaved image"),
    }
}

/// Error type for file storage operations.
#[derive(Debug)]
pub enum StorageError {
    /// File exceeds maximum allowed size.
    InvalidFileSize { max_bytes: usize },

    /// MIME type not allowed.
    InvalidMimeType {
        received: String,
        allowed: Vec<String>,
    },

    /// I/O error (file system or similar).
    IoError(std::io::Error),

    /// Invalid storage key format.
    InvalidKey(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFileSize { max_bytes } => {
                write!(f, "File exceeds maximum size of {} bytes", max_bytes)
            }
            Self::InvalidMimeType { received, allowed } => {
                write!(
                    f,
                    "File type '{}' not allowed. Allowed types: {}",
                    received,
                    allowed.join(", ")
                )
            }
            Self::IoError(e) => write!(f, "I/O error: {}", e),
            Self::InvalidKey(msg) => write!(f, "Invalid storage key: {}", msg),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        Self::IoError(e)
    }
}

/// An image received from a multipart form, not yet stored.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub content: Vec<u8>,
}

impl ImageUpload {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        content: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            content,
        }
    }

    /// Checks size and type, returning the file extension to store under.
    pub fn validate(&self, max_bytes: usize) -> Result<&'static str, StorageError> {
        if self.content.is_empty() || self.content.len() > max_bytes {
            return Err(StorageError::InvalidFileSize { max_bytes });
        }

        let content_type = self.content_type.to_ascii_lowercase();
        ALLOWED_IMAGE_TYPES
            .iter()
            .find(|suffix| content_type.ends_with(*suffix))
            .map(|suffix| match *suffix {
                "jpeg" => "jpg",
                other => other,
            })
            .ok_or_else(|| StorageError::InvalidMimeType {
                received: self.content_type.clone(),
                allowed: ALLOWED_IMAGE_TYPES.iter().map(|s| s.to_string()).collect(),
            })
    }
}

/// Local filesystem-based file storage, served over HTTP under `base_url`.
#[derive(Clone, Debug)]
pub struct LocalFileStorage {
    base_dir: PathBuf,
    base_url: String,
    max_file_size: usize,
}

impl LocalFileStorage {
    pub fn new(base_dir: PathBuf, base_url: String) -> Self {
        Self::with_max_size(base_dir, base_url, DEFAULT_MAX_IMAGE_BYTES)
    }

    pub fn with_max_size(base_dir: PathBuf, base_url: String, max_file_size: usize) -> Self {
        Self {
            base_dir,
            base_url,
            max_file_size,
        }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Rejects keys that could escape `base_dir`.
    fn validate_key(key: &str) -> Result<(), StorageError> {
        if key.is_empty() || key.contains("..") || key.starts_with('/') || key.starts_with('\\') {
            return Err(StorageError::InvalidKey(
                "Key must not be empty, contain '..', or start with a separator".to_string(),
            ));
        }

        if !key
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_' || c == '/' || c == '.')
        {
            return Err(StorageError::InvalidKey(
                "Key contains invalid characters".to_string(),
            ));
        }

        Ok(())
    }
}

impl FileStorage for LocalFileStorage {
    fn save<'a>(&'a self, key: &'a str, content: &'a [u8]) -> StorageFuture<'a, String> {
        Box::pin(async move {
            Self::validate_key(key)?;

            if content.len() > self.max_file_size {
                return Err(StorageError::InvalidFileSize {
                    max_bytes: self.max_file_size,
                });
            }

            let file_path = self.base_dir.join(key);
            if let Some(parent) = file_path.parent() {
                fs::create_dir_all(parent).await?;
            }
            fs::write(&file_path, content).await?;

            tracing::debug!(key = %key, bytes = content.len(), "Stored file");
            Ok(key.to_string())
        })
    }

    fn delete<'a>(&'a self, key: &'a str) -> StorageFuture<'a, ()> {
        Box::pin(async move {
            Self::validate_key(key)?;

            match fs::remove_file(self.base_dir.join(key)).await {
                Ok(_) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(e.into()),
            }
        })
    }

    fn get_url(&self, key: &str) -> Result<String, StorageError> {
        Self::validate_key(key)?;
        Ok(format!("{}/{}", self.base_url.trim_end_matches('/'), key))
    }

    fn max_file_size(&self) -> usize {
        self.max_file_size
    }
}
