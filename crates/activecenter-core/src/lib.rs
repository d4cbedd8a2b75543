//! # Active Center Core
//!
//! Core types, errors, and utilities for the Active Center API.
//!
//! - [`errors`]: Application error taxonomy with HTTP response conversion
//! - [`file_storage`]: Image upload validation and storage backends
//! - [`pagination`]: The page/limit list contract
//! - [`password`]: Password hashing and verification
//! - [`serde`]: Lenient query-string deserializers
//!
//! # Example
//!
//! ```ignore
//! use activecenter_core::errors::AppError;
//! use activecenter_core::pagination::{PageRequest, paginate};
//!
//! let error = AppError::not_found("Product not found");
//! let page = paginate(candidates, PageRequest::new(2, 5));
//! ```

pub mod errors;
pub mod file_storage;
pub mod pagination;
pub mod password;
pub mod serde;

// Re-export commonly used types at crate root
pub use errors::{AppError, ErrorKind};
pub use file_storage::{
    FileStorage, ImageUpload, LocalFileStorage, StorageError, StoredImage, discard_image,
};
pub use pagination::{PageRequest, PaginationParams, paginate};
pub use password::{hash_password, verify_password};
