use std::str::FromStr;

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::meal::{Meal, MealCategory, NewMeal, StockUpdate};
use crate::errors::AppError;
use crate::state::AppState;

use super::{blocking, parse_amount, ErrorResponse};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateMealRequest {
    pub cook_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    /// URL of an image already uploaded to the image host.
    pub image_url: String,
    /// Decimal price as a string, e.g. "120.00"
    pub price: String,
    #[serde(default)]
    pub calories: i32,
    #[serde(default)]
    pub quantity_available: i32,
    /// Breakfast, Lunch, Dinner, Snack, Dessert or Other (default)
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStockRequest {
    pub quantity_available: Option<i32>,
    pub is_available: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MealResponse {
    pub id: Uuid,
    pub cook_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub image_url: String,
    pub price: String,
    pub calories: i32,
    pub quantity_available: i32,
    pub is_available: bool,
    pub category: String,
    pub tags: Vec<String>,
    pub created_at: String,
}

impl From<Meal> for MealResponse {
    fn from(m: Meal) -> Self {
        Self {
            id: m.id,
            cook_id: m.cook_id,
            name: m.name,
            description: m.description,
            image_url: m.image_url,
            price: m.price.to_string(),
            calories: m.calories,
            quantity_available: m.quantity_available,
            is_available: m.is_available,
            category: m.category.as_str().to_string(),
            tags: m.tags,
            created_at: m.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListMealsParams {
    pub cook_id: Option<Uuid>,
}

/// POST /meals
#[utoipa::path(
    post,
    path = "/meals",
    request_body = CreateMealRequest,
    responses(
        (status = 201, description = "Meal listed", body = MealResponse),
        (status = 400, description = "Invalid field", body = ErrorResponse),
        (status = 404, description = "Cook not found", body = ErrorResponse),
    ),
    tag = "meals"
)]
pub async fn create_meal(
    state: web::Data<AppState>,
    body: web::Json<CreateMealRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let category = match body.category.as_deref() {
        Some(c) => MealCategory::from_str(c)?,
        None => MealCategory::default(),
    };
    let meal = NewMeal {
        cook_id: body.cook_id,
        name: body.name,
        description: body.description.filter(|d| !d.trim().is_empty()),
        image_url: body.image_url,
        price: parse_amount("price", &body.price)?,
        calories: body.calories,
        quantity_available: body.quantity_available,
        category,
        tags: body.tags,
    };

    let meal = blocking(move || state.meals.create(meal)).await?;
    Ok(HttpResponse::Created().json(MealResponse::from(meal)))
}

/// GET /meals
///
/// Meals that are available and still in stock.
#[utoipa::path(
    get,
    path = "/meals",
    params(
        ("cook_id" = Option<Uuid>, Query, description = "Only this cook's meals"),
    ),
    responses(
        (status = 200, description = "Orderable meals", body = Vec<MealResponse>),
    ),
    tag = "meals"
)]
pub async fn list_meals(
    state: web::Data<AppState>,
    query: web::Query<ListMealsParams>,
) -> Result<HttpResponse, AppError> {
    let cook_id = query.into_inner().cook_id;
    let meals = blocking(move || state.meals.list(cook_id)).await?;
    let body: Vec<MealResponse> = meals.into_iter().map(MealResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /meals/{id}
#[utoipa::path(
    get,
    path = "/meals/{id}",
    params(
        ("id" = Uuid, Path, description = "Meal UUID"),
    ),
    responses(
        (status = 200, description = "Meal found", body = MealResponse),
        (status = 404, description = "Meal not found", body = ErrorResponse),
    ),
    tag = "meals"
)]
pub async fn get_meal(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let meal = blocking(move || state.meals.get(id)).await?;
    Ok(HttpResponse::Ok().json(MealResponse::from(meal)))
}

/// PUT /meals/{id}/stock
///
/// Manual stock bookkeeping; placing orders does not change stock.
#[utoipa::path(
    put,
    path = "/meals/{id}/stock",
    params(
        ("id" = Uuid, Path, description = "Meal UUID"),
    ),
    request_body = UpdateStockRequest,
    responses(
        (status = 200, description = "Stock updated", body = MealResponse),
        (status = 400, description = "Nothing to update or negative quantity", body = ErrorResponse),
        (status = 404, description = "Meal not found", body = ErrorResponse),
    ),
    tag = "meals"
)]
pub async fn update_stock(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateStockRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let body = body.into_inner();
    let update = StockUpdate {
        quantity_available: body.quantity_available,
        is_available: body.is_available,
    };

    let meal = blocking(move || state.meals.update_stock(id, update)).await?;
    Ok(HttpResponse::Ok().json(MealResponse::from(meal)))
}
