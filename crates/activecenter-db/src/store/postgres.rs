//! PostgreSQL repository.
//!
//! One [`PgStore`] serves every entity type; each `Repository<E>` impl maps
//! the entity's filter onto a `WHERE` clause built with [`QueryBuilder`] and
//! saves with `INSERT ... ON CONFLICT (id) DO UPDATE`. Unique natural keys
//! (`users.email`, `spaces.title`) are enforced by the schema and surface as
//! [`StoreError::Conflict`].
//!
//! The [`Ledger`] operations each run in one transaction. Stock moves with a
//! guarded `UPDATE ... WHERE stock >= $1`; bookings lock the space row with
//! `SELECT ... FOR UPDATE` before looking for overlaps.

use std::collections::HashMap;

use activecenter_models::{
    CreateReservationDto, Order, OrderFilter, OrderItem, OrderLineDto, Product, ProductFilter,
    Reservation, ReservationFilter, Space, SpaceFilter, User, UserFilter,
};
use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::{PgExecutor, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::ledger::{Ledger, ProductChange, bookable, slot_taken, stock_refusal};
use super::{Criteria, Entity, Repository, StoreError, StoreResult, conflict};

#[derive(Clone, Debug)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = err {
        return db_err.code().map(|code| code == "23505").unwrap_or(false);
    }
    false
}

/// Maps a unique violation on `entity`'s natural key to a conflict.
fn save_error<E: Entity>(entity: &E, err: sqlx::Error) -> StoreError {
    match entity.key() {
        Some(key) if is_unique_violation(&err) => conflict::<E>(key),
        _ => StoreError::Database(err),
    }
}

/// `%value%` with LIKE wildcards in `value` escaped.
fn like_pattern(value: &str) -> String {
    let escaped = value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

fn push_criteria(query: &mut QueryBuilder<'_, Postgres>, criteria: Criteria<'_>, key_column: &str) {
    match criteria {
        Criteria::Id(id) => {
            query.push("id = ").push_bind(id);
        }
        Criteria::Key(key) => {
            query
                .push(key_column)
                .push(" = ")
                .push_bind(key.to_string());
        }
    }
}

const ORDER_BY_CREATION: &str = " ORDER BY created_at, id";

#[async_trait]
impl Repository<User> for PgStore {
    async fn find(&self, filter: &UserFilter) -> StoreResult<Vec<User>> {
        let mut query = QueryBuilder::<Postgres>::new("SELECT * FROM users WHERE TRUE");
        if let Some(name) = &filter.name {
            query.push(" AND name ILIKE ").push_bind(like_pattern(name));
        }
        if let Some(email) = &filter.email {
            query.push(" AND email ILIKE ").push_bind(like_pattern(email));
        }
        if let Some(role) = filter.role {
            query.push(" AND role = ").push_bind(role);
        }
        if let Some(status) = filter.status {
            query.push(" AND status = ").push_bind(status);
        }
        query.push(ORDER_BY_CREATION);

        Ok(query.build_query_as::<User>().fetch_all(&self.pool).await?)
    }

    async fn find_one(&self, criteria: Criteria<'_>) -> StoreResult<Option<User>> {
        let mut query = QueryBuilder::<Postgres>::new("SELECT * FROM users WHERE ");
        push_criteria(&mut query, criteria, "email");
        query.push(" LIMIT 1");

        Ok(query
            .build_query_as::<User>()
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn save(&self, user: User) -> StoreResult<User> {
        sqlx::query_as::<_, User>(
            r#"INSERT INTO users
                   (id, name, email, password_hash, phone, address, role, status, created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
               ON CONFLICT (id) DO UPDATE SET
                   name = EXCLUDED.name,
                   email = EXCLUDED.email,
                   password_hash = EXCLUDED.password_hash,
                   phone = EXCLUDED.phone,
                   address = EXCLUDED.address,
                   role = EXCLUDED.role,
                   status = EXCLUDED.status,
                   updated_at = EXCLUDED.updated_at
               RETURNING *"#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.phone)
        .bind(&user.address)
        .bind(user.role)
        .bind(user.status)
        .bind(user.created_at)
        .bind(user.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| save_error(&user, err))
    }
}

#[async_trait]
impl Repository<Product> for PgStore {
    async fn find(&self, filter: &ProductFilter) -> StoreResult<Vec<Product>> {
        let mut query = QueryBuilder::<Postgres>::new("SELECT * FROM products WHERE TRUE");
        if let Some(name) = &filter.name {
            query.push(" AND name ILIKE ").push_bind(like_pattern(name));
        }
        if let Some(category) = &filter.category {
            query
                .push(" AND LOWER(category) = LOWER(")
                .push_bind(category.clone())
                .push(")");
        }
        if let Some(stock) = filter.min_stock {
            query.push(" AND stock >= ").push_bind(stock);
        }
        if let Some(min) = filter.min_price {
            query.push(" AND price >= ").push_bind(min);
        }
        if let Some(max) = filter.max_price {
            query.push(" AND price <= ").push_bind(max);
        }
        if let Some(active) = filter.active {
            query.push(" AND active = ").push_bind(active);
        }
        query.push(ORDER_BY_CREATION);

        Ok(query
            .build_query_as::<Product>()
            .fetch_all(&self.pool)
            .await?)
    }

    async fn find_one(&self, criteria: Criteria<'_>) -> StoreResult<Option<Product>> {
        let mut query = QueryBuilder::<Postgres>::new("SELECT * FROM products WHERE ");
        push_criteria(&mut query, criteria, "name");
        query.push(ORDER_BY_CREATION).push(" LIMIT 1");

        Ok(query
            .build_query_as::<Product>()
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn save(&self, product: Product) -> StoreResult<Product> {
        write_product(&self.pool, &product).await
    }
}

#[async_trait]
impl Repository<Space> for PgStore {
    async fn find(&self, filter: &SpaceFilter) -> StoreResult<Vec<Space>> {
        let mut query = QueryBuilder::<Postgres>::new("SELECT * FROM spaces WHERE TRUE");
        if let Some(title) = &filter.title {
            query.push(" AND title ILIKE ").push_bind(like_pattern(title));
        }
        if let Some(active) = filter.active {
            query.push(" AND active = ").push_bind(active);
        }
        query.push(ORDER_BY_CREATION);

        Ok(query.build_query_as::<Space>().fetch_all(&self.pool).await?)
    }

    async fn find_one(&self, criteria: Criteria<'_>) -> StoreResult<Option<Space>> {
        let mut query = QueryBuilder::<Postgres>::new("SELECT * FROM spaces WHERE ");
        push_criteria(&mut query, criteria, "title");
        query.push(" LIMIT 1");

        Ok(query
            .build_query_as::<Space>()
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn save(&self, space: Space) -> StoreResult<Space> {
        sqlx::query_as::<_, Space>(
            r#"INSERT INTO spaces
                   (id, title, description, price_hour, max_people, details, characteristics,
                    image, active, created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
               ON CONFLICT (id) DO UPDATE SET
                   title = EXCLUDED.title,
                   description = EXCLUDED.description,
                   price_hour = EXCLUDED.price_hour,
                   max_people = EXCLUDED.max_people,
                   details = EXCLUDED.details,
                   characteristics = EXCLUDED.characteristics,
                   image = EXCLUDED.image,
                   active = EXCLUDED.active,
                   updated_at = EXCLUDED.updated_at
               RETURNING *"#,
        )
        .bind(space.id)
        .bind(&space.title)
        .bind(&space.description)
        .bind(space.price_hour)
        .bind(space.max_people)
        .bind(&space.details)
        .bind(&space.characteristics)
        .bind(&space.image)
        .bind(space.active)
        .bind(space.created_at)
        .bind(space.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| save_error(&space, err))
    }
}

#[async_trait]
impl Repository<Order> for PgStore {
    async fn find(&self, filter: &OrderFilter) -> StoreResult<Vec<Order>> {
        let mut query = QueryBuilder::<Postgres>::new("SELECT * FROM orders WHERE TRUE");
        if let Some(user_id) = filter.user_id {
            query.push(" AND user_id = ").push_bind(user_id);
        }
        if let Some(status) = filter.status {
            query.push(" AND status = ").push_bind(status);
        }
        query.push(ORDER_BY_CREATION);

        Ok(query.build_query_as::<Order>().fetch_all(&self.pool).await?)
    }

    async fn find_one(&self, criteria: Criteria<'_>) -> StoreResult<Option<Order>> {
        let Criteria::Id(id) = criteria else {
            // Orders have no natural key.
            return Ok(None);
        };

        Ok(sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn save(&self, order: Order) -> StoreResult<Order> {
        write_order(&self.pool, &order).await
    }
}

#[async_trait]
impl Repository<Reservation> for PgStore {
    async fn find(&self, filter: &ReservationFilter) -> StoreResult<Vec<Reservation>> {
        let mut query = QueryBuilder::<Postgres>::new("SELECT * FROM reservations WHERE TRUE");
        if let Some(space_id) = filter.space_id {
            query.push(" AND space_id = ").push_bind(space_id);
        }
        if let Some(user_id) = filter.user_id {
            query.push(" AND user_id = ").push_bind(user_id);
        }
        if let Some(status) = filter.status {
            query.push(" AND status = ").push_bind(status);
        }
        query.push(ORDER_BY_CREATION);

        Ok(query
            .build_query_as::<Reservation>()
            .fetch_all(&self.pool)
            .await?)
    }

    async fn find_one(&self, criteria: Criteria<'_>) -> StoreResult<Option<Reservation>> {
        let Criteria::Id(id) = criteria else {
            return Ok(None);
        };

        Ok(
            sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn save(&self, reservation: Reservation) -> StoreResult<Reservation> {
        write_reservation(&self.pool, &reservation).await
    }
}

async fn write_product<'c, X>(executor: X, product: &Product) -> StoreResult<Product>
where
    X: PgExecutor<'c>,
{
    sqlx::query_as::<_, Product>(
        r#"INSERT INTO products
               (id, name, description, category, price, stock, image, active, created_at, updated_at)
           VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
           ON CONFLICT (id) DO UPDATE SET
               name = EXCLUDED.name,
               description = EXCLUDED.description,
               category = EXCLUDED.category,
               price = EXCLUDED.price,
               stock = EXCLUDED.stock,
               image = EXCLUDED.image,
               active = EXCLUDED.active,
               updated_at = EXCLUDED.updated_at
           RETURNING *"#,
    )
    .bind(product.id)
    .bind(&product.name)
    .bind(&product.description)
    .bind(&product.category)
    .bind(product.price)
    .bind(product.stock)
    .bind(&product.image)
    .bind(product.active)
    .bind(product.created_at)
    .bind(product.updated_at)
    .fetch_one(executor)
    .await
    .map_err(|err| save_error(product, err))
}

async fn write_order<'c, X>(executor: X, order: &Order) -> StoreResult<Order>
where
    X: PgExecutor<'c>,
{
    sqlx::query_as::<_, Order>(
        r#"INSERT INTO orders (id, user_id, items, total, status, created_at)
           VALUES ($1, $2, $3, $4, $5, $6)
           ON CONFLICT (id) DO UPDATE SET
               items = EXCLUDED.items,
               total = EXCLUDED.total,
               status = EXCLUDED.status
           RETURNING *"#,
    )
    .bind(order.id)
    .bind(order.user_id)
    .bind(Json(&order.items))
    .bind(order.total)
    .bind(order.status)
    .bind(order.created_at)
    .fetch_one(executor)
    .await
    .map_err(|err| save_error(order, err))
}

async fn write_reservation<'c, X>(executor: X, reservation: &Reservation) -> StoreResult<Reservation>
where
    X: PgExecutor<'c>,
{
    sqlx::query_as::<_, Reservation>(
        r#"INSERT INTO reservations
               (id, space_id, user_id, starts_at, ends_at, people, total, status, created_at)
           VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
           ON CONFLICT (id) DO UPDATE SET
               status = EXCLUDED.status
           RETURNING *"#,
    )
    .bind(reservation.id)
    .bind(reservation.space_id)
    .bind(reservation.user_id)
    .bind(reservation.starts_at)
    .bind(reservation.ends_at)
    .bind(reservation.people)
    .bind(reservation.total)
    .bind(reservation.status)
    .bind(reservation.created_at)
    .fetch_one(executor)
    .await
    .map_err(|err| save_error(reservation, err))
}

#[async_trait]
impl Ledger for PgStore {
    async fn place_order(&self, user_id: Uuid, lines: &[OrderLineDto]) -> StoreResult<Order> {
        // Rows are locked in id order so two orders never wait on each other.
        let mut locking: Vec<&OrderLineDto> = lines.iter().collect();
        locking.sort_by_key(|line| line.product_id);

        let mut tx = self.pool.begin().await?;
        let mut prices = HashMap::with_capacity(lines.len());

        for line in locking {
            let taken = sqlx::query_as::<_, Product>(
                r#"UPDATE products
                   SET stock = stock - $1, updated_at = NOW()
                   WHERE id = $2 AND active AND stock >= $1
                   RETURNING *"#,
            )
            .bind(line.quantity)
            .bind(line.product_id)
            .fetch_optional(&mut *tx)
            .await?;

            match taken {
                Some(product) => {
                    prices.insert(product.id, product.price);
                }
                None => {
                    let current =
                        sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
                            .bind(line.product_id)
                            .fetch_optional(&mut *tx)
                            .await?;
                    // Dropping `tx` rolls back the lines already taken.
                    return Err(stock_refusal(current.as_ref(), line).unwrap_or_else(|| {
                        StoreError::Rejected(format!(
                            "Product {} changed during checkout",
                            line.product_id
                        ))
                    }));
                }
            }
        }

        let items = lines
            .iter()
            .map(|line| OrderItem {
                product_id: line.product_id,
                quantity: line.quantity,
                unit_price: prices.get(&line.product_id).copied().unwrap_or_default(),
            })
            .collect();

        let order = write_order(&mut *tx, &Order::new(user_id, items)).await?;
        tx.commit().await?;
        Ok(order)
    }

    async fn cancel_order(&self, id: Uuid) -> StoreResult<Option<Order>> {
        let mut tx = self.pool.begin().await?;

        let cancelled = sqlx::query_as::<_, Order>(
            r#"UPDATE orders SET status = 'cancelled'
               WHERE id = $1 AND status = 'pending'
               RETURNING *"#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(order) = cancelled else {
            return Ok(None);
        };

        let mut items: Vec<&OrderItem> = order.items.iter().collect();
        items.sort_by_key(|item| item.product_id);
        for item in items {
            sqlx::query("UPDATE products SET stock = stock + $1, updated_at = NOW() WHERE id = $2")
                .bind(item.quantity)
                .bind(item.product_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(Some(order))
    }

    async fn update_product(
        &self,
        id: Uuid,
        change: ProductChange,
    ) -> StoreResult<Option<Product>> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(mut product) = current else {
            return Ok(None);
        };

        change.apply(&mut product);
        let product = write_product(&mut *tx, &product).await?;
        tx.commit().await?;
        Ok(Some(product))
    }

    async fn book_space(
        &self,
        user_id: Uuid,
        booking: &CreateReservationDto,
    ) -> StoreResult<Reservation> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, Space>("SELECT * FROM spaces WHERE id = $1 FOR UPDATE")
            .bind(booking.space_id)
            .fetch_optional(&mut *tx)
            .await?;
        let space = bookable(current.as_ref(), booking)?;
        let reservation = Reservation::new(space, user_id, booking);

        let taken: bool = sqlx::query_scalar(
            r#"SELECT EXISTS (
                   SELECT 1 FROM reservations
                   WHERE space_id = $1 AND status = 'confirmed'
                     AND starts_at < $3 AND ends_at > $2
               )"#,
        )
        .bind(space.id)
        .bind(reservation.starts_at)
        .bind(reservation.ends_at)
        .fetch_one(&mut *tx)
        .await?;
        if taken {
            return Err(slot_taken(space));
        }

        let reservation = write_reservation(&mut *tx, &reservation).await?;
        tx.commit().await?;
        Ok(reservation)
    }

    async fn cancel_reservation(&self, id: Uuid) -> StoreResult<Option<Reservation>> {
        Ok(sqlx::query_as::<_, Reservation>(
            r#"UPDATE reservations SET status = 'cancelled'
               WHERE id = $1 AND status = 'confirmed'
               RETURNING *"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?)
    }
}
