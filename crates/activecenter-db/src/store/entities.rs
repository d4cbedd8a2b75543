use activecenter_models::{
    Order, OrderFilter, Product, ProductFilter, Reservation, ReservationFilter, Space,
    SpaceFilter, User, UserFilter,
};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::Entity;

impl Entity for User {
    type Filter = UserFilter;
    const NAME: &'static str = "User";
    const KEY_FIELD: Option<&'static str> = Some("email");
    const UNIQUE_KEY: bool = true;

    fn id(&self) -> Uuid {
        self.id
    }

    fn key(&self) -> Option<&str> {
        Some(&self.email)
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn matches(&self, filter: &UserFilter) -> bool {
        filter.matches(self)
    }
}

impl Entity for Product {
    type Filter = ProductFilter;
    const NAME: &'static str = "Product";
    const KEY_FIELD: Option<&'static str> = Some("name");
    const UNIQUE_KEY: bool = false;

    fn id(&self) -> Uuid {
        self.id
    }

    fn key(&self) -> Option<&str> {
        Some(&self.name)
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn matches(&self, filter: &ProductFilter) -> bool {
        filter.matches(self)
    }
}

impl Entity for Space {
    type Filter = SpaceFilter;
    const NAME: &'static str = "Space";
    const KEY_FIELD: Option<&'static str> = Some("title");
    const UNIQUE_KEY: bool = true;

    fn id(&self) -> Uuid {
        self.id
    }

    fn key(&self) -> Option<&str> {
        Some(&self.title)
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn matches(&self, filter: &SpaceFilter) -> bool {
        filter.matches(self)
    }
}

impl Entity for Order {
    type Filter = OrderFilter;
    const NAME: &'static str = "Order";
    const KEY_FIELD: Option<&'static str> = None;
    const UNIQUE_KEY: bool = false;

    fn id(&self) -> Uuid {
        self.id
    }

    fn key(&self) -> Option<&str> {
        None
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn matches(&self, filter: &OrderFilter) -> bool {
        filter.matches(self)
    }
}

impl Entity for Reservation {
    type Filter = ReservationFilter;
    const NAME: &'static str = "Reservation";
    const KEY_FIELD: Option<&'static str> = None;
    const UNIQUE_KEY: bool = false;

    fn id(&self) -> Uuid {
        self.id
    }

    fn key(&self) -> Option<&str> {
        None
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn matches(&self, filter: &ReservationFilter) -> bool {
        filter.matches(self)
    }
}
