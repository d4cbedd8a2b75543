//! Page-based pagination shared by every list endpoint.
//!
//! List endpoints accept `page` and `limit` query parameters and return a
//! plain JSON array holding one slice of the filtered candidate set:
//!
//! - `page`: 1-indexed page number (default: 1)
//! - `limit`: items per page (default: 5)
//!
//! Missing, non-numeric or non-positive values fall back to the default
//! instead of failing the request. A page past the end of the candidate set
//! yields an empty array.
//!
//! No total count or has-more indicator is returned; a short or empty page
//! is the only end-of-data signal.
//!
//! # Example
//!
//! ```ignore
//! use activecenter_core::pagination::{PaginationParams, paginate};
//!
//! // GET /api/products?page=3&limit=5
//! let request = params.page_request();
//! let candidates = repository.find(&filters).await?;
//! let page = paginate(candidates, request);
//! ```

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::serde::deserialize_lenient;

/// Page used when the query omits `page` or provides an invalid value.
pub const DEFAULT_PAGE: usize = 1;

/// Items per page used when the query omits `limit` or provides an invalid value.
pub const DEFAULT_LIMIT: usize = 5;

/// Raw pagination query parameters.
///
/// Values are kept as parsed from the query string; use
/// [`PaginationParams::page_request`] to obtain the coerced [`PageRequest`].
#[derive(Debug, Clone, Default, Hash, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// Page number (1-indexed, default: 1)
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub page: Option<i64>,
    /// Items per page (default: 5)
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub limit: Option<i64>,
}

impl PaginationParams {
    /// Coerces the raw values into a valid [`PageRequest`].
    #[must_use]
    pub fn page_request(&self) -> PageRequest {
        PageRequest::from_raw(self.page, self.limit)
    }
}

/// A validated page request: both `page` and `limit` are at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PageRequest {
    page: usize,
    limit: usize,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    /// Builds a request, replacing zero values with the defaults.
    #[must_use]
    pub fn new(page: usize, limit: usize) -> Self {
        Self {
            page: if page == 0 { DEFAULT_PAGE } else { page },
            limit: if limit == 0 { DEFAULT_LIMIT } else { limit },
        }
    }

    /// Builds a request from possibly-missing signed input.
    #[must_use]
    pub fn from_raw(page: Option<i64>, limit: Option<i64>) -> Self {
        let coerce = |value: Option<i64>, default: usize| {
            value
                .filter(|v| *v >= 1)
                .and_then(|v| usize::try_from(v).ok())
                .unwrap_or(default)
        };

        Self {
            page: coerce(page, DEFAULT_PAGE),
            limit: coerce(limit, DEFAULT_LIMIT),
        }
    }

    #[must_use]
    pub fn page(&self) -> usize {
        self.page
    }

    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Index of the first item on this page: `(page - 1) * limit`.
    #[must_use]
    pub fn start(&self) -> usize {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// Index one past the last item on this page: `start + limit`.
    #[must_use]
    pub fn end(&self) -> usize {
        self.start().saturating_add(self.limit)
    }
}

/// Returns the `[start, end)` slice of `candidates` for `request`.
///
/// Yields an empty vector when `start` is at or past the end.
pub fn paginate<T>(candidates: Vec<T>, request: PageRequest) -> Vec<T> {
    let start = request.start();
    if start >= candidates.len() {
        return Vec::new();
    }

    candidates
        .into_iter()
        .skip(start)
        .take(request.limit())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn products(n: usize) -> Vec<usize> {
        (0..n).collect()
    }

    #[test]
    fn test_page_request_default() {
        let request = PageRequest::default();
        assert_eq!(request.page(), 1);
        assert_eq!(request.limit(), 5);
        assert_eq!(request.start(), 0);
        assert_eq!(request.end(), 5);
    }

    #[test]
    fn test_page_request_new_replaces_zero() {
        let request = PageRequest::new(0, 0);
        assert_eq!(request, PageRequest::default());
    }

    #[test]
    fn test_from_raw_none_values() {
        assert_eq!(PageRequest::from_raw(None, None), PageRequest::default());
    }

    #[test]
    fn test_from_raw_non_positive_values() {
        let cases = [(Some(0), Some(0)), (Some(-3), Some(-1)), (Some(-1), None)];
        for (page, limit) in cases {
            assert_eq!(PageRequest::from_raw(page, limit), PageRequest::default());
        }
    }

    #[test]
    fn test_from_raw_keeps_valid_values() {
        let request = PageRequest::from_raw(Some(4), Some(20));
        assert_eq!(request.page(), 4);
        assert_eq!(request.limit(), 20);
        assert_eq!(request.start(), 60);
        assert_eq!(request.end(), 80);
    }

    #[test]
    fn test_first_page_of_twelve() {
        let page = paginate(products(12), PageRequest::new(1, 5));
        assert_eq!(page, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_last_partial_page_of_twelve() {
        let page = paginate(products(12), PageRequest::new(3, 5));
        assert_eq!(page, vec![10, 11]);
    }

    #[test]
    fn test_page_beyond_end_is_empty() {
        let page = paginate(products(12), PageRequest::new(4, 5));
        assert!(page.is_empty());

        let page = paginate(products(12), PageRequest::new(usize::MAX, usize::MAX));
        assert!(page.is_empty());
    }

    #[test]
    fn test_empty_candidates() {
        let page: Vec<usize> = paginate(Vec::new(), PageRequest::default());
        assert!(page.is_empty());
    }

    #[test]
    fn test_every_page_matches_slice() {
        let candidates = products(23);
        for limit in 1..=7 {
            for page in 1..=6 {
                let request = PageRequest::new(page, limit);
                let result = paginate(candidates.clone(), request);
                let start = ((page - 1) * limit).min(candidates.len());
                let end = (start + limit).min(candidates.len());
                assert!(result.len() <= limit);
                assert_eq!(result, candidates[start..end].to_vec());
            }
        }
    }

    #[test]
    fn test_params_deserialize_with_values() {
        let json = r#"{"page":"2","limit":"10"}"#;
        let params: PaginationParams = serde_json::from_str(json).unwrap();
        let request = params.page_request();
        assert_eq!(request.page(), 2);
        assert_eq!(request.limit(), 10);
    }

    #[test]
    fn test_params_deserialize_non_numeric() {
        let json = r#"{"page":"first","limit":"lots"}"#;
        let params: PaginationParams = serde_json::from_str(json).unwrap();
        assert_eq!(params.page_request(), PageRequest::default());
    }

    #[test]
    fn test_params_deserialize_empty_strings() {
        let json = r#"{"page":"","limit":""}"#;
        let params: PaginationParams = serde_json::from_str(json).unwrap();
        assert_eq!(params.page_request(), PageRequest::default());
    }

    #[test]
    fn test_params_deserialize_missing_fields() {
        let params: PaginationParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params.page_request(), PageRequest::default());
    }
}
