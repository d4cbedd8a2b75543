//! User domain models and DTOs.

use activecenter_auth::{Role, UserStatus};
use activecenter_core::PaginationParams;
use activecenter_core::serde::{deserialize_lenient, deserialize_non_blank};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::contains_ignore_case;

/// A club member or administrator as stored.
///
/// Never serialised directly; responses go through [`UserResponse`] so the
/// password hash stays server-side.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub role: Role,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// A fresh active account with the given role.
    pub fn new(name: String, email: String, password_hash: String, role: Role) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            password_hash,
            phone: None,
            address: None,
            role,
            status: UserStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_banned(&self) -> bool {
        self.status == UserStatus::Banned
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub role: Role,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            phone: user.phone,
            address: user.address,
            role: user.role,
            status: user.status,
            created_at: user.created_at,
        }
    }
}

/// Result of the ban toggle: the status the server now holds.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BanStatusResponse {
    pub id: Uuid,
    pub status: UserStatus,
}

/// Result of the admin toggle: the role the server now holds.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RoleResponse {
    pub id: Uuid,
    pub role: Role,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileDto {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 30, message = "Phone must be at most 30 characters"))]
    pub phone: Option<String>,
    #[validate(length(max = 255, message = "Address must be at most 255 characters"))]
    pub address: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserFilterParams {
    /// Case-insensitive substring of the name
    #[serde(default, deserialize_with = "deserialize_non_blank")]
    pub name: Option<String>,
    /// Case-insensitive substring of the email
    #[serde(default, deserialize_with = "deserialize_non_blank")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    #[param(value_type = Option<Role>)]
    pub role: Option<Role>,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    #[param(value_type = Option<UserStatus>)]
    pub status: Option<UserStatus>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

impl UserFilterParams {
    pub fn filter(&self) -> UserFilter {
        UserFilter {
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
            status: self.status,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserFilter {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
    pub status: Option<UserStatus>,
}

impl UserFilter {
    pub fn matches(&self, user: &User) -> bool {
        self.name
            .as_deref()
            .is_none_or(|name| contains_ignore_case(&user.name, name))
            && self
                .email
                .as_deref()
                .is_none_or(|email| contains_ignore_case(&user.email, email))
            && self.role.is_none_or(|role| user.role == role)
            && self.status.is_none_or(|status| user.status == status)
    }
}
