//! Stringing order handlers.
//!
//! This module implements the order endpoints and delegates database
//! access to the shared `storage` module. Creation and field-update
//! paths always run validation first; status updates and deletes do not
//! re-validate fields they never touch.

pub(crate) mod storage;
pub mod types;
mod validate;

use axum::{
    Json,
    extract::{Extension, Path, Query},
    http::{StatusCode, header},
    response::IntoResponse,
};
use sqlx::PgPool;
use uuid::Uuid;

use self::{
    storage::{
        OrderError, OrderFields, OrderFilter, OrderPatch, delete_order as delete_order_record,
        fetch_order, fetch_orders, fetch_user_orders, insert_order, insert_user_order,
        order_exists, spawn_status_advance, update_order_fields, update_status,
    },
    types::{
        CreateOrderRequest, CreateOrderResponse, CreateUserOrderResponse, ErrorMessage,
        ListOrdersQuery, OrderLinks, OrderResponse, OrderStatus, PageQuery, ScheduledResponse,
        StatusResponse, UpdateOrderRequest, UpdateStatusRequest, UserOrdersResponse,
    },
    validate::{validate_create, validate_update},
};

fn order_location(id: &str) -> String {
    format!("/orders/orders/{id}")
}

fn order_links(id: &str) -> OrderLinks {
    OrderLinks {
        self_: order_location(id),
        update: order_location(id),
        cancel: format!("/orders/orders/{id}/status"),
    }
}

fn fields(payload: &CreateOrderRequest) -> OrderFields<'_> {
    OrderFields {
        sport: payload.sport.as_str(),
        racket_model: payload.racket_model.as_str(),
        string: payload.string.as_str(),
        tension: payload.tension.as_str(),
        pickup_date: payload.pickup_date,
        notes: payload.notes.as_deref().unwrap_or(""),
        price: payload.price,
    }
}

#[utoipa::path(
    post,
    path = "/orders/order_stringing",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Stringing order created.", body = CreateOrderResponse,
            headers(("Location" = String, description = "URL of the created order"))),
        (status = 400, description = "Validation errors.", body = ErrorMessage),
        (status = 500, description = "Internal server error.", body = ErrorMessage),
    ),
    tag = "orders"
)]
/// Creates a stringing order with a fresh id and `pending` status.
/// Every validation violation is returned at once, not just the first.
pub async fn create_order(
    pool: Extension<PgPool>,
    Json(payload): Json<CreateOrderRequest>,
) -> impl IntoResponse {
    if let Err(errors) = validate_create(&payload) {
        return OrderError::Validation(errors).into_response();
    }

    match insert_order(&pool, &fields(&payload), OrderStatus::Pending).await {
        Ok(record) => {
            let location = order_location(record.id());
            let body = CreateOrderResponse {
                message: "Stringing order created successfully".to_string(),
                order_id: record.id().to_string(),
                order_status: record.status(),
            };
            (
                StatusCode::CREATED,
                [(header::LOCATION, location)],
                Json(body),
            )
                .into_response()
        }
        Err(err) => err.into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/orders/order_stringing/user/{user_id}",
    request_body = CreateOrderRequest,
    params(("user_id" = Uuid, Path, description = "User to associate the order with")),
    responses(
        (status = 201, description = "Stringing order created for user.", body = CreateUserOrderResponse),
        (status = 400, description = "Validation errors.", body = ErrorMessage),
        (status = 500, description = "Internal server error.", body = ErrorMessage),
    ),
    tag = "orders"
)]
/// Creates a stringing order plus its user association in one transaction.
/// The initial status is `strung`, unlike the anonymous path. That asymmetry
/// is preserved from the upstream workflow on purpose.
pub async fn create_user_order(
    Path(user_id): Path<Uuid>,
    pool: Extension<PgPool>,
    Json(payload): Json<CreateOrderRequest>,
) -> impl IntoResponse {
    if let Err(errors) = validate_create(&payload) {
        return OrderError::Validation(errors).into_response();
    }

    match insert_user_order(&pool, user_id, &fields(&payload), OrderStatus::Strung).await {
        Ok(record) => {
            let body = CreateUserOrderResponse {
                message: "Stringing order created successfully".to_string(),
                order_id: record.id().to_string(),
                user_id: user_id.to_string(),
                order_status: record.status(),
            };
            (StatusCode::CREATED, Json(body)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/orders/orders/",
    params(ListOrdersQuery),
    responses(
        (status = 200, description = "List orders.", body = [OrderResponse]),
        (status = 500, description = "Internal server error.", body = ErrorMessage),
    ),
    tag = "orders"
)]
/// Lists orders with optional conjunctive filters and offset/limit pagination.
pub async fn list_orders(
    Query(query): Query<ListOrdersQuery>,
    pool: Extension<PgPool>,
) -> impl IntoResponse {
    let filter = OrderFilter {
        sport: query.sport.as_deref(),
        order_status: query.order_status,
        skip: query.skip,
        limit: query.limit,
    };

    match fetch_orders(&pool, &filter).await {
        Ok(records) => {
            let orders: Vec<OrderResponse> = records
                .into_iter()
                .map(|record| record.into_response(None))
                .collect();
            (StatusCode::OK, Json(orders)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/orders/orders/{id}",
    params(("id" = Uuid, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order detail with hypermedia links.", body = OrderResponse),
        (status = 404, description = "Order not found.", body = ErrorMessage),
        (status = 500, description = "Internal server error.", body = ErrorMessage),
    ),
    tag = "orders"
)]
/// Fetches a single order by id, attaching `self`/`update`/`cancel` links.
pub async fn get_order(Path(id): Path<Uuid>, pool: Extension<PgPool>) -> impl IntoResponse {
    match fetch_order(&pool, id).await {
        Ok(record) => {
            let links = order_links(record.id());
            (StatusCode::OK, Json(record.into_response(Some(links)))).into_response()
        }
        Err(err) => err.into_response(),
    }
}

#[utoipa::path(
    put,
    path = "/orders/orders/{id}",
    request_body = UpdateOrderRequest,
    params(("id" = Uuid, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order updated.", body = OrderResponse),
        (status = 400, description = "Validation errors.", body = ErrorMessage),
        (status = 404, description = "Order not found.", body = ErrorMessage),
        (status = 500, description = "Internal server error.", body = ErrorMessage),
    ),
    tag = "orders"
)]
/// Applies only the supplied fields to an order and bumps `updated_at`.
/// Supplied fields are validated with the same rules as creation.
pub async fn update_order(
    Path(id): Path<Uuid>,
    pool: Extension<PgPool>,
    Json(payload): Json<UpdateOrderRequest>,
) -> impl IntoResponse {
    if let Err(errors) = validate_update(&payload) {
        return OrderError::Validation(errors).into_response();
    }

    let patch = OrderPatch {
        sport: payload.sport.as_deref(),
        racket_model: payload.racket_model.as_deref(),
        string: payload.string.as_deref(),
        tension: payload.tension.as_deref(),
        pickup_date: payload.pickup_date,
        notes: payload.notes.as_deref(),
        price: payload.price,
    };

    match update_order_fields(&pool, id, &patch).await {
        Ok(record) => (StatusCode::OK, Json(record.into_response(None))).into_response(),
        Err(err) => err.into_response(),
    }
}

#[utoipa::path(
    put,
    path = "/orders/orders/{id}/status",
    request_body = UpdateStatusRequest,
    params(("id" = Uuid, Path, description = "Order id")),
    responses(
        (status = 200, description = "Status updated.", body = StatusResponse),
        (status = 404, description = "Order not found.", body = ErrorMessage),
        (status = 500, description = "Internal server error.", body = ErrorMessage),
    ),
    tag = "orders"
)]
/// Overwrites the order status. Any status may replace any other, the
/// label set carries no transition constraints.
pub async fn update_order_status(
    Path(id): Path<Uuid>,
    pool: Extension<PgPool>,
    Json(payload): Json<UpdateStatusRequest>,
) -> impl IntoResponse {
    match update_status(&pool, id, payload.order_status).await {
        Ok(record) => {
            let body = StatusResponse {
                order_id: record.id().to_string(),
                order_status: record.status(),
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/orders/order_async_update/{id}",
    params(("id" = Uuid, Path, description = "Order id")),
    responses(
        (status = 202, description = "Status advance scheduled.", body = ScheduledResponse),
        (status = 404, description = "Order not found.", body = ErrorMessage),
        (status = 500, description = "Internal server error.", body = ErrorMessage),
    ),
    tag = "orders"
)]
/// Schedules a fire-and-forget job that sets the order status to `strung`.
/// The job is at-most-once and non-durable, and no-ops if the order is
/// deleted before it runs.
pub async fn schedule_status_advance(
    Path(id): Path<Uuid>,
    pool: Extension<PgPool>,
) -> impl IntoResponse {
    match order_exists(&pool, id).await {
        Ok(true) => {}
        Ok(false) => return OrderError::NotFound.into_response(),
        Err(err) => return err.into_response(),
    }

    spawn_status_advance(pool.0.clone(), id);

    let body = ScheduledResponse {
        message: "Status update scheduled".to_string(),
        order_id: id.to_string(),
    };
    (StatusCode::ACCEPTED, Json(body)).into_response()
}

#[utoipa::path(
    delete,
    path = "/orders/orders/{id}",
    params(("id" = Uuid, Path, description = "Order id")),
    responses(
        (status = 204, description = "Order deleted."),
        (status = 404, description = "Order not found.", body = ErrorMessage),
        (status = 500, description = "Internal server error.", body = ErrorMessage),
    ),
    tag = "orders"
)]
/// Hard-deletes an order. Association rows are left in place.
pub async fn delete_order(Path(id): Path<Uuid>, pool: Extension<PgPool>) -> impl IntoResponse {
    match delete_order_record(&pool, id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => err.into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/orders/orders/user/{user_id}",
    params(
        ("user_id" = Uuid, Path, description = "User id"),
        PageQuery,
    ),
    responses(
        (status = 200, description = "Orders for the user plus total count.", body = UserOrdersResponse),
        (status = 500, description = "Internal server error.", body = ErrorMessage),
    ),
    tag = "orders"
)]
/// Lists a user's orders through the association table. Pagination is
/// applied to the final joined result; `total` counts all associations.
pub async fn list_user_orders(
    Path(user_id): Path<Uuid>,
    Query(query): Query<PageQuery>,
    pool: Extension<PgPool>,
) -> impl IntoResponse {
    match fetch_user_orders(&pool, user_id, query.skip, query.limit).await {
        Ok((records, total)) => {
            let orders: Vec<OrderResponse> = records
                .into_iter()
                .map(|record| record.into_response(None))
                .collect();
            (StatusCode::OK, Json(UserOrdersResponse { orders, total })).into_response()
        }
        Err(err) => err.into_response(),
    }
}
