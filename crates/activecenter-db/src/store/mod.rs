//! The storage collaborator behind every resource service.
//!
//! Services see storage through [`Repository<E>`], which offers exactly three
//! operations:
//!
//! - `find(filter)`: every entity matching the filter, oldest first
//! - `find_one(criteria)`: lookup by id or by the entity's natural key
//! - `save(entity)`: insert or replace by id
//!
//! Filters are evaluated by the backend (SQL `WHERE` on PostgreSQL, predicate
//! evaluation in memory), so list endpoints only slice the result.
//!
//! Writes that read and change several rows together (stock, bookings) go
//! through [`ledger::Ledger`] instead.

use activecenter_core::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

pub mod entities;
pub mod ledger;
pub mod memory;
pub mod postgres;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique natural key is already taken by another entity.
    #[error("{0}")]
    Conflict(String),
    /// A row the operation depends on does not exist.
    #[error("{0}")]
    NotFound(String),
    /// The operation is refused in the current state (no stock, slot taken).
    #[error("{0}")]
    Rejected(String),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(message) | StoreError::Rejected(message) => {
                AppError::bad_request(message)
            }
            StoreError::NotFound(message) => AppError::not_found(message),
            StoreError::Database(e) => AppError::internal(e),
            StoreError::Unexpected(e) => AppError::internal(e),
        }
    }
}

/// A stored record type.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Backend-evaluated list filter.
    type Filter: Send + Sync;

    /// Singular name used in messages ("User", "Product").
    const NAME: &'static str;

    /// Name of the natural key field, if the entity has one.
    const KEY_FIELD: Option<&'static str>;

    /// Whether two entities may share a natural key.
    const UNIQUE_KEY: bool;

    fn id(&self) -> Uuid;

    fn key(&self) -> Option<&str>;

    fn created_at(&self) -> DateTime<Utc>;

    fn matches(&self, filter: &Self::Filter) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Criteria<'a> {
    Id(Uuid),
    /// Exact match on the natural key (email, product name, space title).
    Key(&'a str),
}

#[async_trait]
pub trait Repository<E: Entity>: Send + Sync {
    async fn find(&self, filter: &E::Filter) -> StoreResult<Vec<E>>;

    async fn find_one(&self, criteria: Criteria<'_>) -> StoreResult<Option<E>>;

    async fn save(&self, entity: E) -> StoreResult<E>;
}

pub(crate) fn conflict<E: Entity>(key: &str) -> StoreError {
    let field = E::KEY_FIELD.unwrap_or("key");
    StoreError::Conflict(format!("{} with {} '{}' already exists", E::NAME, field, key))
}
