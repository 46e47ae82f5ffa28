use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::order_service::{BatchOutcome, FailedLine};
use crate::domain::order::{Order, OrderDraft};
use crate::errors::AppError;
use crate::state::AppState;

use super::{blocking, ErrorResponse};

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub customer_id: Uuid,
    pub cook_id: Uuid,
    pub meal_id: Uuid,
    pub quantity: i32,
}

impl From<CreateOrderRequest> for OrderDraft {
    fn from(r: CreateOrderRequest) -> Self {
        Self {
            customer_id: r.customer_id,
            cook_id: r.cook_id,
            meal_id: r.meal_id,
            quantity: r.quantity,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BatchOrderRequest {
    pub orders: Vec<CreateOrderRequest>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    /// Placed, Completed or Cancelled
    pub status: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RateOrderRequest {
    /// 1 to 5
    pub rating: i32,
    pub review_text: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub cook_id: Uuid,
    pub meal_id: Uuid,
    pub quantity: i32,
    /// Decimal total as a string, absent on legacy orders.
    pub total_price: Option<String>,
    pub status: String,
    pub rating: Option<i32>,
    pub review_text: Option<String>,
    pub created_at: String,
}

impl From<Order> for OrderResponse {
    fn from(o: Order) -> Self {
        Self {
            id: o.id,
            customer_id: o.customer_id,
            cook_id: o.cook_id,
            meal_id: o.meal_id,
            quantity: o.quantity,
            total_price: o.total_price.map(|p| p.to_string()),
            status: o.status.as_str().to_string(),
            rating: o.rating.map(|r| r.value()),
            review_text: o.review_text,
            created_at: o.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FailedLineResponse {
    /// Position of the failed line in the request. Repeated checkout items
    /// for one meal are merged, so checkout points at the first of them.
    pub index: usize,
    pub meal_id: Uuid,
    pub cook_id: Uuid,
    pub error: String,
}

impl From<FailedLine> for FailedLineResponse {
    fn from(f: FailedLine) -> Self {
        Self {
            index: f.index,
            meal_id: f.meal_id,
            cook_id: f.cook_id,
            error: f.error,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BatchOrderResponse {
    pub message: String,
    pub orders: Vec<OrderResponse>,
    pub failed: Vec<FailedLineResponse>,
}

impl From<BatchOutcome> for BatchOrderResponse {
    fn from(outcome: BatchOutcome) -> Self {
        Self {
            message: outcome.summary(),
            orders: outcome.created.into_iter().map(Into::into).collect(),
            failed: outcome.failed.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RateOrderResponse {
    pub order: OrderResponse,
    pub cook_average_rating: f64,
    pub cook_rating_count: i32,
}

/// 201 when every line was placed, 207 when some were not.
pub(crate) fn batch_status(outcome: &BatchOutcome) -> StatusCode {
    if outcome.is_complete() {
        StatusCode::CREATED
    } else {
        StatusCode::MULTI_STATUS
    }
}

fn order_list(orders: Vec<Order>) -> Vec<OrderResponse> {
    orders.into_iter().map(OrderResponse::from).collect()
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /orders
///
/// Places one order priced from the stored meal.
#[utoipa::path(
    post,
    path = "/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order placed", body = OrderResponse),
        (status = 400, description = "Invalid quantity, wrong cook or unavailable meal", body = ErrorResponse),
        (status = 404, description = "Meal not found", body = ErrorResponse),
    ),
    tag = "orders"
)]
pub async fn create_order(
    state: web::Data<AppState>,
    body: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let draft = OrderDraft::from(body.into_inner());
    let order = blocking(move || state.orders.place(draft)).await?;
    Ok(HttpResponse::Created().json(OrderResponse::from(order)))
}

/// POST /orders/batch
///
/// Each line becomes its own order. Lines that fail are listed so the client
/// can retry just those.
#[utoipa::path(
    post,
    path = "/orders/batch",
    request_body = BatchOrderRequest,
    responses(
        (status = 201, description = "All orders placed", body = BatchOrderResponse),
        (status = 207, description = "Some orders placed", body = BatchOrderResponse),
        (status = 400, description = "Empty batch or malformed line", body = ErrorResponse),
    ),
    tag = "orders"
)]
pub async fn create_batch(
    state: web::Data<AppState>,
    body: web::Json<BatchOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let drafts: Vec<OrderDraft> = body.into_inner().orders.into_iter().map(Into::into).collect();
    let outcome = blocking(move || state.orders.submit_batch(drafts)).await?;
    Ok(HttpResponse::build(batch_status(&outcome)).json(BatchOrderResponse::from(outcome)))
}

/// GET /orders/{id}
#[utoipa::path(
    get,
    path = "/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
    ),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 400, description = "Malformed id", body = ErrorResponse),
        (status = 404, description = "Order not found", body = ErrorResponse),
    ),
    tag = "orders"
)]
pub async fn get_order(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let order = blocking(move || state.orders.get(id)).await?;
    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

/// GET /orders/user/{user_id}
///
/// A customer's orders, newest first.
#[utoipa::path(
    get,
    path = "/orders/user/{user_id}",
    params(
        ("user_id" = Uuid, Path, description = "Customer UUID"),
    ),
    responses(
        (status = 200, description = "Orders placed by the customer", body = Vec<OrderResponse>),
    ),
    tag = "orders"
)]
pub async fn orders_by_user(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let user_id = path.into_inner();
    let orders = blocking(move || state.orders.list_by_customer(user_id)).await?;
    Ok(HttpResponse::Ok().json(order_list(orders)))
}

/// GET /orders/cook/{cook_id}
///
/// Orders received by a cook, newest first.
#[utoipa::path(
    get,
    path = "/orders/cook/{cook_id}",
    params(
        ("cook_id" = Uuid, Path, description = "Cook UUID"),
    ),
    responses(
        (status = 200, description = "Orders for the cook", body = Vec<OrderResponse>),
    ),
    tag = "orders"
)]
pub async fn orders_by_cook(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let cook_id = path.into_inner();
    let orders = blocking(move || state.orders.list_by_cook(cook_id)).await?;
    Ok(HttpResponse::Ok().json(order_list(orders)))
}

/// POST /orders/{id}/status
#[utoipa::path(
    post,
    path = "/orders/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
    ),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = OrderResponse),
        (status = 400, description = "Unknown status", body = ErrorResponse),
        (status = 404, description = "Order not found", body = ErrorResponse),
        (status = 409, description = "Transition not allowed", body = ErrorResponse),
    ),
    tag = "orders"
)]
pub async fn update_status(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateStatusRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let status = body.into_inner().status;
    let order = blocking(move || state.orders.update_status(id, &status)).await?;
    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

/// POST /orders/{id}/rate
///
/// Attaches the customer's rating once and folds it into the cook's average.
#[utoipa::path(
    post,
    path = "/orders/{id}/rate",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
    ),
    request_body = RateOrderRequest,
    responses(
        (status = 200, description = "Rating recorded", body = RateOrderResponse),
        (status = 400, description = "Rating outside 1-5", body = ErrorResponse),
        (status = 404, description = "Order not found", body = ErrorResponse),
        (status = 409, description = "Already rated or cancelled", body = ErrorResponse),
    ),
    tag = "orders"
)]
pub async fn rate_order(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<RateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let RateOrderRequest {
        rating,
        review_text,
    } = body.into_inner();

    let (order, cook) = blocking(move || state.orders.rate(id, rating, review_text)).await?;
    Ok(HttpResponse::Ok().json(RateOrderResponse {
        order: order.into(),
        cook_average_rating: cook.rating.average,
        cook_rating_count: cook.rating.count,
    }))
}
