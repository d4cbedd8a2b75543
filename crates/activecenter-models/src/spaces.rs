//! Bookable club facility models, DTOs and list filters.

use activecenter_core::PaginationParams;
use activecenter_core::serde::{deserialize_lenient, deserialize_non_blank};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::contains_ignore_case;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Space {
    pub id: Uuid,
    /// Unique display title, also the lookup key for `by-name`
    pub title: String,
    pub description: String,
    pub price_hour: f64,
    pub max_people: Option<i32>,
    pub details: Option<String>,
    /// Short feature tags shown on the facility card ("Night lighting")
    pub characteristics: Vec<String>,
    pub image: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Space {
    pub fn new(dto: CreateSpaceDto) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: dto.title,
            description: dto.description,
            price_hour: dto.price_hour,
            max_people: dto.max_people,
            details: dto.details,
            characteristics: dto.characteristics,
            image: None,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, dto: UpdateSpaceDto) {
        if let Some(title) = dto.title {
            self.title = title;
        }
        if let Some(description) = dto.description {
            self.description = description;
        }
        if let Some(price_hour) = dto.price_hour {
            self.price_hour = price_hour;
        }
        if dto.max_people.is_some() {
            self.max_people = dto.max_people;
        }
        if dto.details.is_some() {
            self.details = dto.details;
        }
        if let Some(characteristics) = dto.characteristics {
            self.characteristics = characteristics;
        }
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateSpaceDto {
    #[validate(length(min = 1, max = 100, message = "Title must be between 1 and 100 characters"))]
    pub title: String,
    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: String,
    #[validate(
        range(min = 0.0, message = "Hourly price must not be negative"),
        custom(function = "crate::finite", message = "Hourly price must be a finite number")
    )]
    pub price_hour: f64,
    #[validate(range(min = 1, message = "Capacity must be at least 1"))]
    pub max_people: Option<i32>,
    pub details: Option<String>,
    #[serde(default)]
    #[validate(length(max = 20, message = "At most 20 characteristics"))]
    pub characteristics: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateSpaceDto {
    #[validate(length(min = 1, max = 100, message = "Title must be between 1 and 100 characters"))]
    pub title: Option<String>,
    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,
    #[validate(
        range(min = 0.0, message = "Hourly price must not be negative"),
        custom(function = "crate::finite", message = "Hourly price must be a finite number")
    )]
    pub price_hour: Option<f64>,
    #[validate(range(min = 1, message = "Capacity must be at least 1"))]
    pub max_people: Option<i32>,
    pub details: Option<String>,
    /// Replaces the whole list when present
    #[validate(length(max = 20, message = "At most 20 characteristics"))]
    pub characteristics: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SpaceFilterParams {
    /// Case-insensitive substring of the title
    #[serde(default, deserialize_with = "deserialize_non_blank")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub active: Option<bool>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

impl SpaceFilterParams {
    pub fn filter(&self) -> SpaceFilter {
        SpaceFilter {
            title: self.title.clone(),
            active: self.active,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpaceFilter {
    pub title: Option<String>,
    pub active: Option<bool>,
}

impl SpaceFilter {
    pub fn matches(&self, space: &Space) -> bool {
        self.title
            .as_deref()
            .is_none_or(|title| contains_ignore_case(&space.title, title))
            && self.active.is_none_or(|active| space.active == active)
    }
}
