//! Image upload configuration.
//!
//! # Environment Variables
//!
//! - `UPLOAD_DIR`: directory uploaded images are written to (default: `./uploads`)
//! - `UPLOAD_BASE_URL`: public URL prefix the images are served from
//!   (default: `http://localhost:3000/files`)
//! - `UPLOAD_MAX_BYTES`: largest accepted image in bytes (default: 1500000)

use std::env;
use std::path::PathBuf;

use crate::parse_var;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadConfig {
    pub dir: PathBuf,
    pub base_url: String,
    pub max_bytes: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./uploads"),
            base_url: "http://localhost:3000/files".to_string(),
            max_bytes: 1_500_000,
        }
    }
}

impl UploadConfig {
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            dir: lookup("UPLOAD_DIR").map(PathBuf::from).unwrap_or(defaults.dir),
            base_url: lookup("UPLOAD_BASE_URL").unwrap_or(defaults.base_url),
            max_bytes: parse_var(&lookup, "UPLOAD_MAX_BYTES")
                .filter(|v: &usize| *v > 0)
                .unwrap_or(defaults.max_bytes),
        }
    }
}
