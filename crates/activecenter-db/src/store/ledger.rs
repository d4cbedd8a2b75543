//! Writes that span several rows and must land together.
//!
//! A [`Repository`](super::Repository) saves one entity at a time, which is
//! not enough when a write depends on rows it does not own:
//!
//! - placing an order takes stock from several products and stores the order
//! - cancelling an order flips its status once and returns the stock
//! - editing a product must not undo a concurrent stock change
//! - booking a space must see every other booking of that space
//!
//! [`Ledger`] runs each of these as one unit: under the entity write locks in
//! memory, inside one transaction with row locks on PostgreSQL.

use activecenter_models::{
    CreateReservationDto, Order, OrderItem, OrderLineDto, OrderStatus, Product, Reservation,
    ReservationStatus, Space, UpdateProductDto,
};
use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::memory::InMemoryRepository;
use super::{StoreError, StoreResult};

/// An edit to a product that goes through the ledger.
#[derive(Debug, Clone)]
pub enum ProductChange {
    Update(UpdateProductDto),
    /// Retire an active product or reinstate a retired one.
    ToggleActive,
}

impl ProductChange {
    pub fn apply(self, product: &mut Product) {
        match self {
            Self::Update(dto) => product.apply(dto),
            Self::ToggleActive => {
                product.active = !product.active;
                product.updated_at = Utc::now();
            }
        }
    }
}

#[async_trait]
pub trait Ledger: Send + Sync {
    /// Takes every line's quantity from stock and stores a pending order with
    /// the current unit prices. On any refusal nothing changes.
    ///
    /// `lines` must not repeat a product.
    async fn place_order(&self, user_id: Uuid, lines: &[OrderLineDto]) -> StoreResult<Order>;

    /// Cancels a pending order and returns its units to stock. `None` when
    /// the order does not exist or is no longer pending.
    async fn cancel_order(&self, id: Uuid) -> StoreResult<Option<Order>>;

    /// Applies `change` to the current row. `None` when the product does not
    /// exist.
    async fn update_product(&self, id: Uuid, change: ProductChange)
    -> StoreResult<Option<Product>>;

    /// Books an active space for a free slot within its capacity.
    async fn book_space(
        &self,
        user_id: Uuid,
        booking: &CreateReservationDto,
    ) -> StoreResult<Reservation>;

    /// Cancels a confirmed reservation. `None` when it does not exist or is
    /// already cancelled.
    async fn cancel_reservation(&self, id: Uuid) -> StoreResult<Option<Reservation>>;
}

/// Why `line` cannot be served from `product`, if it cannot.
pub(crate) fn stock_refusal(product: Option<&Product>, line: &OrderLineDto) -> Option<StoreError> {
    let Some(product) = product else {
        return Some(StoreError::NotFound(format!(
            "Product {} not found",
            line.product_id
        )));
    };

    if !product.active {
        return Some(StoreError::Rejected(format!(
            "Product '{}' is not available",
            product.name
        )));
    }

    if product.stock < line.quantity {
        return Some(StoreError::Rejected(format!(
            "Not enough stock for '{}': requested {}, available {}",
            product.name, line.quantity, product.stock
        )));
    }

    None
}

pub(crate) fn bookable<'a>(
    space: Option<&'a Space>,
    booking: &CreateReservationDto,
) -> StoreResult<&'a Space> {
    let space = space.ok_or_else(|| StoreError::NotFound("Space not found".to_string()))?;

    if !space.active {
        return Err(StoreError::Rejected(format!(
            "Space '{}' is not open for bookings",
            space.title
        )));
    }

    if let Some(max_people) = space.max_people {
        if booking.people > max_people {
            return Err(StoreError::Rejected(format!(
                "'{}' holds at most {} people",
                space.title, max_people
            )));
        }
    }

    Ok(space)
}

pub(crate) fn slot_taken(space: &Space) -> StoreError {
    StoreError::Rejected(format!(
        "'{}' is already booked for that time",
        space.title
    ))
}

/// [`Ledger`] over the in-memory repositories.
///
/// Built from clones of the repositories the services read, so both see the
/// same rows. Locks are always taken products before orders and spaces
/// before reservations.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLedger {
    products: InMemoryRepository<Product>,
    orders: InMemoryRepository<Order>,
    spaces: InMemoryRepository<Space>,
    reservations: InMemoryRepository<Reservation>,
}

impl InMemoryLedger {
    pub fn new(
        products: InMemoryRepository<Product>,
        orders: InMemoryRepository<Order>,
        spaces: InMemoryRepository<Space>,
        reservations: InMemoryRepository<Reservation>,
    ) -> Self {
        Self {
            products,
            orders,
            spaces,
            reservations,
        }
    }
}

#[async_trait]
impl Ledger for InMemoryLedger {
    async fn place_order(&self, user_id: Uuid, lines: &[OrderLineDto]) -> StoreResult<Order> {
        let mut products = self.products.write().await;
        let mut orders = self.orders.write().await;

        for line in lines {
            if let Some(refusal) = stock_refusal(products.get(&line.product_id), line) {
                return Err(refusal);
            }
        }

        let now = Utc::now();
        let mut items = Vec::with_capacity(lines.len());
        for line in lines {
            let product = products.get_mut(&line.product_id).ok_or_else(|| {
                StoreError::NotFound(format!("Product {} not found", line.product_id))
            })?;
            product.stock -= line.quantity;
            product.updated_at = now;
            items.push(OrderItem {
                product_id: product.id,
                quantity: line.quantity,
                unit_price: product.price,
            });
        }

        let order = Order::new(user_id, items);
        orders.put(order.clone());
        Ok(order)
    }

    async fn cancel_order(&self, id: Uuid) -> StoreResult<Option<Order>> {
        let mut products = self.products.write().await;
        let mut orders = self.orders.write().await;

        let Some(order) = orders.get_mut(&id) else {
            return Ok(None);
        };
        if order.status != OrderStatus::Pending {
            return Ok(None);
        }
        order.status = OrderStatus::Cancelled;

        let now = Utc::now();
        for item in &order.items {
            // A product removed since purchase has no stock to restore.
            if let Some(product) = products.get_mut(&item.product_id) {
                product.stock = product.stock.saturating_add(item.quantity);
                product.updated_at = now;
            }
        }

        Ok(Some(order.clone()))
    }

    async fn update_product(
        &self,
        id: Uuid,
        change: ProductChange,
    ) -> StoreResult<Option<Product>> {
        let mut products = self.products.write().await;
        Ok(products.get_mut(&id).map(|product| {
            change.apply(product);
            product.clone()
        }))
    }

    async fn book_space(
        &self,
        user_id: Uuid,
        booking: &CreateReservationDto,
    ) -> StoreResult<Reservation> {
        let spaces = self.spaces.write().await;
        let mut reservations = self.reservations.write().await;

        let space = bookable(spaces.get(&booking.space_id), booking)?;
        let ends_at = booking.ends_at();
        let taken = reservations.values().any(|held| {
            held.space_id == space.id && held.blocks(booking.starts_at, ends_at)
        });
        if taken {
            return Err(slot_taken(space));
        }

        let reservation = Reservation::new(space, user_id, booking);
        reservations.put(reservation.clone());
        Ok(reservation)
    }

    async fn cancel_reservation(&self, id: Uuid) -> StoreResult<Option<Reservation>> {
        let mut reservations = self.reservations.write().await;
        Ok(reservations
            .get_mut(&id)
            .filter(|reservation| reservation.status == ReservationStatus::Confirmed)
            .map(|reservation| {
                reservation.status = ReservationStatus::Cancelled;
                reservation.clone()
            }))
    }
}
