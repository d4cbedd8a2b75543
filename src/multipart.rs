//! Multipart form parsing for the image upload endpoints.
//!
//! The image travels in a part named `file`; every other part is a text
//! field of the accompanying DTO.

use std::collections::HashMap;
use std::str::FromStr;

use axum::extract::multipart::MultipartError;
use axum::extract::{DefaultBodyLimit, Multipart};
use axum::http::StatusCode;

use activecenter_core::{AppError, ErrorKind, ImageUpload};

pub const IMAGE_FIELD: &str = "file";

/// Room for the text parts and multipart boundaries on top of the image.
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

/// Body limit for routes that accept an image of at most `max_image_bytes`.
pub fn upload_body_limit(max_image_bytes: usize) -> DefaultBodyLimit {
    DefaultBodyLimit::max(max_image_bytes.saturating_add(FORM_OVERHEAD_BYTES))
}

#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: HashMap<String, String>,
    image: Option<ImageUpload>,
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::new(
            ErrorKind::ValidationFailure,
            StatusCode::PAYLOAD_TOO_LARGE,
            anyhow::Error::msg("Uploaded file is too large"),
        );
    }
    AppError::bad_request(format!("Invalid multipart body: {}", err.body_text()))
}

impl MultipartForm {
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let name = field.name().unwrap_or_default().to_string();

            if name == IMAGE_FIELD {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let content = field.bytes().await.map_err(multipart_error)?;
                form.image = Some(ImageUpload::new(file_name, content_type, content.to_vec()));
            } else {
                let value = field.text().await.map_err(multipart_error)?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    pub fn with_fields<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            image: None,
        }
    }

    /// Trimmed value of a text field; blank counts as absent.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }

    pub fn required(&self, name: &str) -> Result<String, AppError> {
        self.text(name)
            .map(str::to_string)
            .ok_or_else(|| AppError::bad_request(format!("{} is required", name)))
    }

    pub fn parse<T: FromStr>(&self, name: &str) -> Result<Option<T>, AppError> {
        self.text(name)
            .map(|value| {
                value
                    .parse::<T>()
                    .map_err(|_| AppError::bad_request(format!("{} must be a number", name)))
            })
            .transpose()
    }

    pub fn parse_required<T: FromStr>(&self, name: &str) -> Result<T, AppError> {
        self.parse(name)?
            .ok_or_else(|| AppError::bad_request(format!("{} is required", name)))
    }

    /// Comma-separated items of a text field, trimmed, blanks dropped.
    pub fn list(&self, name: &str) -> Vec<String> {
        self.text(name)
            .map(|value| {
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn take_image(&mut self) -> Option<ImageUpload> {
        self.image.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use activecenter_core::ErrorKind;

    #[test]
    fn test_text_treats_blank_as_absent() {
        let form = MultipartForm::with_fields([("name", "  Ball "), ("description", "   ")]);
        assert_eq!(form.text("name"), Some("Ball"));
        assert_eq!(form.text("description"), None);
        assert_eq!(form.text("missing"), None);
    }

    #[test]
    fn test_parse_numbers() {
        let form = MultipartForm::with_fields([("price", "12.5"), ("stock", "ten")]);
        assert_eq!(form.parse::<f64>("price").unwrap(), Some(12.5));
        assert_eq!(form.parse::<i32>("missing").unwrap(), None);

        let err = form.parse::<i32>("stock").unwrap_err();
        assert_eq!(err.kind, ErrorKind::ValidationFailure);
    }

    #[test]
    fn test_list_splits_on_commas() {
        let form = MultipartForm::with_fields([("characteristics", "Lights, Roofed ,, Showers")]);
        assert_eq!(form.list("characteristics"), ["Lights", "Roofed", "Showers"]);
        assert!(form.list("missing").is_empty());
    }

    #[test]
    fn test_required_fields() {
        let form = MultipartForm::default();
        assert_eq!(form.required("name").unwrap_err().message(), "name is required");
        assert!(form.parse_required::<f64>("price").is_err());
    }
}
