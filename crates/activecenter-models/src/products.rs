//! Club shop product models, DTOs and list filters.

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
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: f64,
    pub stock: i32,
    /// Public URL of the product image
    pub image: Option<String>,
    /// Retired products keep their row with `active = false`
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn new(dto: CreateProductDto) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: dto.name,
            description: dto.description,
            category: dto.category,
            price: dto.price,
            stock: dto.stock,
            image: None,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies the fields present in `dto`.
    pub fn apply(&mut self, dto: UpdateProductDto) {
        if let Some(name) = dto.name {
            self.name = name;
        }
        if let Some(description) = dto.description {
            self.description = description;
        }
        if let Some(category) = dto.category {
            self.category = category;
        }
        if let Some(price) = dto.price {
            self.price = price;
        }
        if let Some(stock) = dto.stock {
            self.stock = stock;
        }
        self.updated_at = Utc::now();
    }
}

/// Product fields sent as multipart text parts alongside the optional `file`.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateProductDto {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: String,
    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: String,
    #[validate(length(min = 1, max = 50, message = "Category must be between 1 and 50 characters"))]
    pub category: String,
    #[validate(
        range(min = 0.0, message = "Price must not be negative"),
        custom(function = "crate::finite", message = "Price must be a finite number")
    )]
    pub price: f64,
    #[validate(range(min = 0, message = "Stock must not be negative"))]
    pub stock: i32,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProductDto {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 50, message = "Category must be between 1 and 50 characters"))]
    pub category: Option<String>,
    #[validate(
        range(min = 0.0, message = "Price must not be negative"),
        custom(function = "crate::finite", message = "Price must be a finite number")
    )]
    pub price: Option<f64>,
    #[validate(range(min = 0, message = "Stock must not be negative"))]
    pub stock: Option<i32>,
}

/// `GET /products` query: filters plus pagination.
#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductFilterParams {
    /// Case-insensitive substring of the product name
    #[serde(default, deserialize_with = "deserialize_non_blank")]
    pub name: Option<String>,
    /// Category, compared case-insensitively
    #[serde(default, deserialize_with = "deserialize_non_blank")]
    pub category: Option<String>,
    /// Minimum units in stock
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub stock: Option<i32>,
    #[serde(default, alias = "minPrice", deserialize_with = "deserialize_lenient")]
    pub min_price: Option<f64>,
    #[serde(default, alias = "maxPrice", deserialize_with = "deserialize_lenient")]
    pub max_price: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub active: Option<bool>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

impl ProductFilterParams {
    pub fn filter(&self) -> ProductFilter {
        ProductFilter {
            name: self.name.clone(),
            category: self.category.clone(),
            min_stock: self.stock,
            // NaN or infinite bounds are treated as absent.
            min_price: self.min_price.filter(|min| min.is_finite()),
            max_price: self.max_price.filter(|max| max.is_finite()),
            active: self.active,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    pub name: Option<String>,
    pub category: Option<String>,
    pub min_stock: Option<i32>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub active: Option<bool>,
}

impl ProductFilter {
    pub fn matches(&self, product: &Product) -> bool {
        self.name
            .as_deref()
            .is_none_or(|name| contains_ignore_case(&product.name, name))
            && self
                .category
                .as_deref()
                .is_none_or(|category| product.category.eq_ignore_ascii_case(category))
            && self.min_stock.is_none_or(|stock| product.stock >= stock)
            && self.min_price.is_none_or(|min| product.price >= min)
            && self.max_price.is_none_or(|max| product.price <= max)
            && self.active.is_none_or(|active| product.active == active)
    }
}

/// `?name=` lookup by exact name or title.
#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NameQuery {
    pub name: String,
}
