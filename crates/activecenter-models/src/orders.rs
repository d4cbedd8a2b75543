//! Shop order models.
//!
//! Order lines are stored inline as JSON; each line records the unit price
//! at the time of purchase so later price changes do not alter the total.

use std::fmt;
use std::str::FromStr;

use activecenter_core::PaginationParams;
use activecenter_core::serde::deserialize_lenient;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "order_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Cancelled,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => f.write_str("pending"),
            Self::Cancelled => f.write_str("cancelled"),
        }
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(format!("unknown order status '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrderItem {
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    #[sqlx(json)]
    pub items: Vec<OrderItem>,
    pub total: f64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// A pending order whose total is the sum of its lines.
    pub fn new(user_id: Uuid, items: Vec<OrderItem>) -> Self {
        let total = items
            .iter()
            .map(|item| item.unit_price * f64::from(item.quantity))
            .sum();

        Self {
            id: Uuid::new_v4(),
            user_id,
            items,
            total,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct OrderLineDto {
    pub product_id: Uuid,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateOrderDto {
    #[validate(length(min = 1, message = "An order needs at least one item"), nested)]
    pub items: Vec<OrderLineDto>,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OrderFilterParams {
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub user_id: Option<Uuid>,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    #[param(value_type = Option<OrderStatus>)]
    pub status: Option<OrderStatus>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

impl OrderFilterParams {
    pub fn filter(&self) -> OrderFilter {
        OrderFilter {
            user_id: self.user_id,
            status: self.status,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderFilter {
    pub user_id: Option<Uuid>,
    pub status: Option<OrderStatus>,
}

impl OrderFilter {
    pub fn matches(&self, order: &Order) -> bool {
        self.user_id.is_none_or(|id| order.user_id == id)
            && self.status.is_none_or(|status| order.status == status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_is_sum_of_lines() {
        let order = Order::new(
            Uuid::new_v4(),
            vec![
                OrderItem { product_id: Uuid::new_v4(), quantity: 2, unit_price: 10.5 },
                OrderItem { product_id: Uuid::new_v4(), quantity: 1, unit_price: 4.0 },
            ],
        );
        assert_eq!(order.total, 25.0);
        assert_eq!(order.status, OrderStatus::Pending);
    }

    #[test]
    fn test_create_dto_validation() {
        let empty = CreateOrderDto { items: vec![] };
        assert!(empty.validate().is_err());

        let zero_quantity = CreateOrderDto {
            items: vec![OrderLineDto { product_id: Uuid::new_v4(), quantity: 0 }],
        };
        assert!(zero_quantity.validate().is_err());
    }

    #[test]
    fn test_create_dto_serializes_as_request_body() {
        let product_id = Uuid::new_v4();
        let dto = CreateOrderDto {
            items: vec![OrderLineDto { product_id, quantity: 3 }],
        };

        let body = serde_json::to_value(&dto).unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "items": [{ "product_id": product_id, "quantity": 3 }] })
        );
    }

    #[test]
    fn test_filter_matches_owner_and_status() {
        let owner = Uuid::new_v4();
        let order = Order::new(owner, vec![]);
        assert!(OrderFilter { user_id: Some(owner), status: None }.matches(&order));
        assert!(!OrderFilter { user_id: Some(Uuid::new_v4()), status: None }.matches(&order));
        assert!(!OrderFilter { user_id: None, status: Some(OrderStatus::Cancelled) }.matches(&order));
    }
}
