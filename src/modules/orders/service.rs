//! Shop orders.
//!
//! Placing an order hands the merged lines to the [`Ledger`], which checks
//! every line against the catalogue (exists, active, enough units), takes the
//! stock and stores the order with the unit prices seen at purchase time, all
//! as one unit. Cancelling flips a pending order once and puts the units back.

use tracing::instrument;
use uuid::Uuid;

use activecenter_auth::Principal;
use activecenter_core::{AppError, paginate};
use activecenter_db::{Criteria, Ledger, Repository};
use activecenter_models::{CreateOrderDto, Order, OrderFilterParams, OrderLineDto, OrderStatus};

pub struct OrderService;

/// Folds repeated product ids into one line, keeping first-seen order.
fn merge_lines(lines: Vec<OrderLineDto>) -> Vec<OrderLineDto> {
    let mut merged: Vec<OrderLineDto> = Vec::with_capacity(lines.len());
    for line in lines {
        match merged.iter_mut().find(|m| m.product_id == line.product_id) {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(line.quantity),
            None => merged.push(line),
        }
    }
    merged
}

impl OrderService {
    #[instrument(skip(ledger, dto), fields(lines = dto.items.len()))]
    pub async fn create_order(
        ledger: &dyn Ledger,
        user_id: Uuid,
        dto: CreateOrderDto,
    ) -> Result<Order, AppError> {
        let order = ledger.place_order(user_id, &merge_lines(dto.items)).await?;
        tracing::info!(order_id = %order.id, total = order.total, "Order placed");
        Ok(order)
    }

    #[instrument(skip(repo))]
    pub async fn get_orders(
        repo: &dyn Repository<Order>,
        filters: &OrderFilterParams,
    ) -> Result<Vec<Order>, AppError> {
        let candidates = repo.find(&filters.filter()).await?;
        Ok(paginate(candidates, filters.pagination.page_request()))
    }

    #[instrument(skip(repo))]
    pub async fn get_order(
        repo: &dyn Repository<Order>,
        caller: &Principal,
        id: Uuid,
    ) -> Result<Order, AppError> {
        let order = repo
            .find_one(Criteria::Id(id))
            .await?
            .ok_or_else(|| AppError::not_found("Order not found"))?;

        if !caller.can_access(order.user_id) {
            return Err(AppError::forbidden("You can only access your own orders"));
        }

        Ok(order)
    }

    #[instrument(skip(orders, ledger))]
    pub async fn cancel_order(
        orders: &dyn Repository<Order>,
        ledger: &dyn Ledger,
        caller: &Principal,
        id: Uuid,
    ) -> Result<Order, AppError> {
        let order = Self::get_order(orders, caller, id).await?;
        if order.status == OrderStatus::Cancelled {
            return Err(AppError::bad_request("Order is already cancelled"));
        }

        // A concurrent cancel may have won since the read above.
        let order = ledger
            .cancel_order(id)
            .await?
            .ok_or_else(|| AppError::bad_request("Order is already cancelled"))?;
        tracing::info!(order_id = %order.id, "Order cancelled");
        Ok(order)
    }
}
