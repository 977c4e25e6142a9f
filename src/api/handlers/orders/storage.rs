//! SQL storage helpers for stringing orders and user-order associations.
//!
//! All multi-step writes run inside a transaction so a partial write
//! never persists. Database failures are logged server-side and mapped
//! to a generic `500` without leaking details.

use axum::{Json, http::StatusCode, response::IntoResponse};
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::{error, info};
use uuid::Uuid;

use super::types::{ErrorMessage, OrderLinks, OrderResponse, OrderStatus};

const ORDER_COLUMNS: &str = r#"
    id::text AS id,
    sport,
    racket_model,
    string,
    tension,
    to_char(pickup_date AT TIME ZONE 'utc', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS pickup_date,
    notes,
    price,
    order_status,
    to_char(created_at AT TIME ZONE 'utc', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS created_at,
    to_char(updated_at AT TIME ZONE 'utc', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS updated_at
"#;

#[derive(Debug)]
pub(super) struct OrderRecord {
    id: String,
    sport: String,
    racket_model: String,
    string: String,
    tension: String,
    pickup_date: String,
    notes: String,
    price: f64,
    order_status: OrderStatus,
    created_at: String,
    updated_at: String,
}

impl OrderRecord {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        let raw_status: String = row.get("order_status");
        let order_status = OrderStatus::parse(&raw_status)
            .ok_or_else(|| sqlx::Error::Decode(format!("unknown order_status: {raw_status}").into()))?;

        Ok(Self {
            id: row.get("id"),
            sport: row.get("sport"),
            racket_model: row.get("racket_model"),
            string: row.get("string"),
            tension: row.get("tension"),
            pickup_date: row.get("pickup_date"),
            notes: row.get("notes"),
            price: row.get("price"),
            order_status,
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }

    pub(super) fn id(&self) -> &str {
        &self.id
    }

    pub(super) fn status(&self) -> OrderStatus {
        self.order_status
    }

    /// Converts this record into an `OrderResponse` DTO, optionally
    /// attaching hypermedia links for single-resource reads.
    pub(super) fn into_response(self, links: Option<OrderLinks>) -> OrderResponse {
        OrderResponse {
            id: self.id,
            sport: self.sport,
            racket_model: self.racket_model,
            string: self.string,
            tension: self.tension,
            pickup_date: self.pickup_date,
            notes: self.notes,
            price: self.price,
            order_status: self.order_status,
            created_at: self.created_at,
            updated_at: self.updated_at,
            links,
        }
    }
}

#[derive(Debug)]
pub(super) enum OrderError {
    Validation(Vec<String>),
    NotFound,
    Database(sqlx::Error),
}

impl IntoResponse for OrderError {
    /// Maps storage-layer failures into stable HTTP responses for handlers.
    /// Database errors are logged server-side and surfaced as `500` without leaking details.
    fn into_response(self) -> axum::response::Response {
        match self {
            Self::Validation(errors) => {
                (StatusCode::BAD_REQUEST, Json(ErrorMessage::errors(errors))).into_response()
            }
            Self::NotFound => (
                StatusCode::NOT_FOUND,
                Json(ErrorMessage::text("Order not found")),
            )
                .into_response(),
            Self::Database(err) => {
                error!("Database error: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorMessage::text("Internal server error")),
                )
                    .into_response()
            }
        }
    }
}

pub(super) struct OrderFields<'a> {
    pub sport: &'a str,
    pub racket_model: &'a str,
    pub string: &'a str,
    pub tension: &'a str,
    pub pickup_date: chrono::DateTime<chrono::Utc>,
    pub notes: &'a str,
    pub price: f64,
}

pub(super) struct OrderPatch<'a> {
    pub sport: Option<&'a str>,
    pub racket_model: Option<&'a str>,
    pub string: Option<&'a str>,
    pub tension: Option<&'a str>,
    pub pickup_date: Option<chrono::DateTime<chrono::Utc>>,
    pub notes: Option<&'a str>,
    pub price: Option<f64>,
}

#[derive(Debug)]
pub(super) struct OrderFilter<'a> {
    pub sport: Option<&'a str>,
    pub order_status: Option<OrderStatus>,
    pub skip: i64,
    pub limit: i64,
}

/// Inserts a new order with a fresh id and the given initial status.
pub(super) async fn insert_order(
    pool: &PgPool,
    fields: &OrderFields<'_>,
    status: OrderStatus,
) -> Result<OrderRecord, OrderError> {
    let query = format!(
        r"
        INSERT INTO orders (id, sport, racket_model, string, tension, pickup_date, notes, price, order_status)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING {ORDER_COLUMNS}
        "
    );
    let row = sqlx::query(&query)
        .bind(Uuid::new_v4())
        .bind(fields.sport)
        .bind(fields.racket_model)
        .bind(fields.string)
        .bind(fields.tension)
        .bind(fields.pickup_date)
        .bind(fields.notes)
        .bind(fields.price)
        .bind(status.as_str())
        .fetch_one(pool)
        .await
        .map_err(OrderError::Database)?;

    OrderRecord::from_row(&row).map_err(OrderError::Database)
}

/// Inserts an order plus its user association in one transaction.
/// Both writes succeed or both are rolled back.
pub(super) async fn insert_user_order(
    pool: &PgPool,
    user_id: Uuid,
    fields: &OrderFields<'_>,
    status: OrderStatus,
) -> Result<OrderRecord, OrderError> {
    let mut tx = pool.begin().await.map_err(OrderError::Database)?;
    let order_id = Uuid::new_v4();

    let query = format!(
        r"
        INSERT INTO orders (id, sport, racket_model, string, tension, pickup_date, notes, price, order_status)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING {ORDER_COLUMNS}
        "
    );
    let row = sqlx::query(&query)
        .bind(order_id)
        .bind(fields.sport)
        .bind(fields.racket_model)
        .bind(fields.string)
        .bind(fields.tension)
        .bind(fields.pickup_date)
        .bind(fields.notes)
        .bind(fields.price)
        .bind(status.as_str())
        .fetch_one(&mut *tx)
        .await
        .map_err(OrderError::Database)?;

    let record = OrderRecord::from_row(&row).map_err(OrderError::Database)?;

    sqlx::query(
        r"
        INSERT INTO user_orders (id, user_id, order_id)
        VALUES ($1, $2, $3)
        ",
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(order_id)
    .execute(&mut *tx)
    .await
    .map_err(OrderError::Database)?;

    tx.commit().await.map_err(OrderError::Database)?;

    Ok(record)
}

/// Fetches a single order by id, `NotFound` when absent.
pub(super) async fn fetch_order(pool: &PgPool, id: Uuid) -> Result<OrderRecord, OrderError> {
    let query = format!(
        r"
        SELECT {ORDER_COLUMNS}
        FROM orders
        WHERE id = $1
        "
    );
    let row = sqlx::query(&query)
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(OrderError::Database)?;

    match row {
        Some(row) => OrderRecord::from_row(&row).map_err(OrderError::Database),
        None => Err(OrderError::NotFound),
    }
}

/// Lists orders with conjunctive optional filters and offset/limit pagination.
pub(super) async fn fetch_orders(
    pool: &PgPool,
    filter: &OrderFilter<'_>,
) -> Result<Vec<OrderRecord>, OrderError> {
    let query = format!(
        r"
        SELECT {ORDER_COLUMNS}
        FROM orders
        WHERE ($1::text IS NULL OR sport = $1)
          AND ($2::text IS NULL OR order_status = $2)
        ORDER BY created_at
        OFFSET $3 LIMIT $4
        "
    );
    let rows = sqlx::query(&query)
        .bind(filter.sport)
        .bind(filter.order_status.map(OrderStatus::as_str))
        .bind(filter.skip.max(0))
        .bind(filter.limit.max(0))
        .fetch_all(pool)
        .await
        .map_err(OrderError::Database)?;

    rows.iter()
        .map(|row| OrderRecord::from_row(row).map_err(OrderError::Database))
        .collect()
}

/// Lists a user's orders through the association table, paginating the
/// final joined result, plus the unpaginated total for that user.
pub(super) async fn fetch_user_orders(
    pool: &PgPool,
    user_id: Uuid,
    skip: i64,
    limit: i64,
) -> Result<(Vec<OrderRecord>, i64), OrderError> {
    let query = format!(
        r"
        SELECT {ORDER_COLUMNS}
        FROM orders
        JOIN user_orders ON user_orders.order_id = orders.id
        WHERE user_orders.user_id = $1
        ORDER BY orders.created_at
        OFFSET $2 LIMIT $3
        "
    );
    let rows = sqlx::query(&query)
        .bind(user_id)
        .bind(skip.max(0))
        .bind(limit.max(0))
        .fetch_all(pool)
        .await
        .map_err(OrderError::Database)?;

    let orders = rows
        .iter()
        .map(|row| OrderRecord::from_row(row).map_err(OrderError::Database))
        .collect::<Result<Vec<_>, _>>()?;

    let total: i64 = sqlx::query(
        r"
        SELECT COUNT(*) AS total
        FROM user_orders
        WHERE user_id = $1
        ",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await
    .map_err(OrderError::Database)?
    .get("total");

    Ok((orders, total))
}

/// Applies only the supplied fields to an order and bumps `updated_at`.
/// `NotFound` when the id is absent.
pub(super) async fn update_order_fields(
    pool: &PgPool,
    id: Uuid,
    patch: &OrderPatch<'_>,
) -> Result<OrderRecord, OrderError> {
    let query = format!(
        r"
        UPDATE orders
        SET
            sport = COALESCE($2, sport),
            racket_model = COALESCE($3, racket_model),
            string = COALESCE($4, string),
            tension = COALESCE($5, tension),
            pickup_date = COALESCE($6, pickup_date),
            notes = COALESCE($7, notes),
            price = COALESCE($8, price),
            updated_at = now()
        WHERE id = $1
        RETURNING {ORDER_COLUMNS}
        "
    );
    let row = sqlx::query(&query)
        .bind(id)
        .bind(patch.sport)
        .bind(patch.racket_model)
        .bind(patch.string)
        .bind(patch.tension)
        .bind(patch.pickup_date)
        .bind(patch.notes)
        .bind(patch.price)
        .fetch_optional(pool)
        .await
        .map_err(OrderError::Database)?;

    match row {
        Some(row) => OrderRecord::from_row(&row).map_err(OrderError::Database),
        None => Err(OrderError::NotFound),
    }
}

/// Overwrites the order status unconditionally. Any status may replace
/// any other, there is no transition graph.
pub(super) async fn update_status(
    pool: &PgPool,
    id: Uuid,
    status: OrderStatus,
) -> Result<OrderRecord, OrderError> {
    let query = format!(
        r"
        UPDATE orders
        SET order_status = $2, updated_at = now()
        WHERE id = $1
        RETURNING {ORDER_COLUMNS}
        "
    );
    let row = sqlx::query(&query)
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(pool)
        .await
        .map_err(OrderError::Database)?;

    match row {
        Some(row) => OrderRecord::from_row(&row).map_err(OrderError::Database),
        None => Err(OrderError::NotFound),
    }
}

/// Hard-deletes an order, `NotFound` when absent. Association rows are
/// left in place, there is no cascading cleanup.
pub(super) async fn delete_order(pool: &PgPool, id: Uuid) -> Result<(), OrderError> {
    let result = sqlx::query("DELETE FROM orders WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .map_err(OrderError::Database)?;

    if result.rows_affected() == 0 {
        return Err(OrderError::NotFound);
    }

    Ok(())
}

/// Returns `true` when the order exists. Used to reject scheduling a
/// status advance for an unknown id.
pub(super) async fn order_exists(pool: &PgPool, id: Uuid) -> Result<bool, OrderError> {
    let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM orders WHERE id = $1) AS exists")
        .bind(id)
        .fetch_one(pool)
        .await
        .map_err(OrderError::Database)?;

    Ok(row.get("exists"))
}

/// Dispatches a fire-and-forget job that sets the order status to
/// `strung`. At-most-once, non-durable: a crash between scheduling and
/// execution drops the update, and an order deleted in the meantime
/// makes the job a no-op.
pub(super) fn spawn_status_advance(pool: PgPool, id: Uuid) {
    tokio::spawn(async move {
        let result = sqlx::query(
            r"
            UPDATE orders
            SET order_status = $2, updated_at = now()
            WHERE id = $1
            ",
        )
        .bind(id)
        .bind(OrderStatus::Strung.as_str())
        .execute(&pool)
        .await;

        match result {
            Ok(done) if done.rows_affected() == 0 => {
                info!(order_id = %id, "status advance skipped, order no longer exists");
            }
            Ok(_) => {
                info!(order_id = %id, status = OrderStatus::Strung.as_str(), "status advanced");
            }
            Err(err) => {
                error!(order_id = %id, "status advance failed: {err}");
            }
        }
    });
}

/// Applies the bundled schema on boot so a fresh database is usable
/// without a separate migration step.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(include_str!("../../../../sql/schema.sql"))
        .execute(pool)
        .await?;
    Ok(())
}
