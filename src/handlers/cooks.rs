use std::str::FromStr;

use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::analytics::{CookAnalytics, Period};
use crate::application::cook_service::{CookRegistration, CookSearch};
use crate::domain::cook::{Availability, Cook, CookUpdate, NearbyCook, PaymentInfo};
use crate::domain::geo::{Coordinates, DEFAULT_SEARCH_RADIUS_KM};
use crate::domain::user::Signup;
use crate::errors::AppError;
use crate::state::AppState;

use super::auth::UserResponse;
use super::{blocking, ErrorResponse};

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct AvailabilityDto {
    #[serde(default)]
    pub morning: bool,
    #[serde(default)]
    pub afternoon: bool,
    #[serde(default)]
    pub evening: bool,
    #[serde(default)]
    pub time_slots: String,
}

impl From<AvailabilityDto> for Availability {
    fn from(a: AvailabilityDto) -> Self {
        Self {
            morning: a.morning,
            afternoon: a.afternoon,
            evening: a.evening,
            time_slots: a.time_slots,
        }
    }
}

impl From<Availability> for AvailabilityDto {
    fn from(a: Availability) -> Self {
        Self {
            morning: a.morning,
            afternoon: a.afternoon,
            evening: a.evening,
            time_slots: a.time_slots,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterCookRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub bio: String,
    #[serde(default)]
    pub specialties: Vec<String>,
    #[serde(default)]
    pub cuisine_types: Vec<String>,
    #[serde(default)]
    pub availability: AvailabilityDto,
    pub pincode: String,
    pub neighborhood: String,
    /// When both are omitted the pincode is geocoded.
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// At least three photo URLs, already uploaded.
    #[serde(default)]
    pub kitchen_image_urls: Vec<String>,
    pub upi_id: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCookRequest {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub specialties: Option<Vec<String>>,
    pub cuisine_types: Option<Vec<String>>,
    pub availability: Option<AvailabilityDto>,
    pub neighborhood: Option<String>,
    pub kitchen_image_urls: Option<Vec<String>>,
    pub upi_id: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LocationDto {
    pub latitude: f64,
    pub longitude: f64,
    pub pincode: String,
    pub neighborhood: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CookResponse {
    pub id: Uuid,
    pub account_id: Option<Uuid>,
    pub name: String,
    pub bio: String,
    pub specialties: Vec<String>,
    pub cuisine_types: Vec<String>,
    pub availability: AvailabilityDto,
    pub location: LocationDto,
    pub kitchen_image_urls: Vec<String>,
    pub upi_id: String,
    pub average_rating: f64,
    pub rating_count: i32,
    pub created_at: String,
}

impl From<Cook> for CookResponse {
    fn from(c: Cook) -> Self {
        Self {
            id: c.id,
            account_id: c.account_id,
            name: c.name,
            bio: c.bio,
            specialties: c.specialties,
            cuisine_types: c.cuisine_types,
            availability: c.availability.into(),
            location: LocationDto {
                latitude: c.location.coordinates.latitude,
                longitude: c.location.coordinates.longitude,
                pincode: c.location.pincode,
                neighborhood: c.location.neighborhood,
            },
            kitchen_image_urls: c.kitchen_image_urls,
            upi_id: c.upi_id,
            average_rating: c.rating.average,
            rating_count: c.rating.count,
            created_at: c.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterCookResponse {
    pub user: UserResponse,
    pub cook: CookResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NearbyCookResponse {
    #[serde(flatten)]
    pub cook: CookResponse,
    /// Kilometres from the search point.
    pub distance: f64,
}

impl From<NearbyCook> for NearbyCookResponse {
    fn from(n: NearbyCook) -> Self {
        Self {
            cook: n.cook.into(),
            distance: n.distance_km,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentDetailsResponse {
    pub name: String,
    pub upi_id: String,
}

impl From<PaymentInfo> for PaymentDetailsResponse {
    fn from(p: PaymentInfo) -> Self {
        Self {
            name: p.vendor_name,
            upi_id: p.payment_identifier,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListCooksParams {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub pincode: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NearbyParams {
    pub lat: f64,
    pub lng: f64,
    pub max_distance: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct AnalyticsParams {
    pub period: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MealRevenueResponse {
    pub meal_id: Uuid,
    pub meal_name: String,
    pub revenue: String,
    pub orders: usize,
    pub average_price: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DailyRevenueResponse {
    /// `YYYY-MM-DD`
    pub date: String,
    pub revenue: String,
    pub orders: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AnalyticsResponse {
    pub period: String,
    pub completed_orders: usize,
    pub pending_orders: usize,
    pub cancelled_orders: usize,
    pub total_revenue: String,
    pub average_order_value: String,
    pub average_rating: f64,
    pub meals: Vec<MealRevenueResponse>,
    pub daily: Vec<DailyRevenueResponse>,
}

impl From<CookAnalytics> for AnalyticsResponse {
    fn from(a: CookAnalytics) -> Self {
        Self {
            period: a.period.as_str().to_string(),
            completed_orders: a.completed_orders,
            pending_orders: a.pending_orders,
            cancelled_orders: a.cancelled_orders,
            total_revenue: a.total_revenue.to_string(),
            average_order_value: a.average_order_value.to_string(),
            average_rating: a.average_rating,
            meals: a
                .meals
                .into_iter()
                .map(|m| MealRevenueResponse {
                    meal_id: m.meal_id,
                    meal_name: m.meal_name,
                    revenue: m.revenue.to_string(),
                    orders: m.orders,
                    average_price: m.average_price.to_string(),
                })
                .collect(),
            daily: a
                .daily
                .into_iter()
                .map(|d| DailyRevenueResponse {
                    date: d.date.to_string(),
                    revenue: d.revenue.to_string(),
                    orders: d.orders,
                })
                .collect(),
        }
    }
}

fn cook_list(cooks: Vec<Cook>) -> Vec<CookResponse> {
    cooks.into_iter().map(CookResponse::from).collect()
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /cooks/register
///
/// Creates the cook's login account and public profile together.
#[utoipa::path(
    post,
    path = "/cooks/register",
    request_body = RegisterCookRequest,
    responses(
        (status = 201, description = "Cook registered", body = RegisterCookResponse),
        (status = 400, description = "Missing field, too few kitchen images or unknown pincode", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse),
    ),
    tag = "cooks"
)]
pub async fn register_cook(
    state: web::Data<AppState>,
    body: web::Json<RegisterCookRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let coordinates = match (body.latitude, body.longitude) {
        (Some(lat), Some(lon)) => Some(Coordinates::new(lat, lon)),
        (None, None) => None,
        _ => {
            return Err(AppError::Validation(
                "latitude and longitude must be given together".to_string(),
            ))
        }
    };
    let registration = CookRegistration {
        account: Signup {
            name: body.name,
            email: body.email,
            password: body.password,
            phone: body.phone,
        },
        bio: body.bio,
        specialties: body.specialties,
        cuisine_types: body.cuisine_types,
        availability: body.availability.into(),
        pincode: body.pincode,
        neighborhood: body.neighborhood,
        coordinates,
        kitchen_image_urls: body.kitchen_image_urls,
        upi_id: body.upi_id,
    };

    let (user, cook) = blocking(move || state.cooks.register(registration)).await?;
    Ok(HttpResponse::Created().json(RegisterCookResponse {
        user: user.into(),
        cook: cook.into(),
    }))
}

/// GET /cooks
///
/// `lat` and `lon` search a 5 km radius; `pincode` matches exactly; with
/// neither every cook is returned.
#[utoipa::path(
    get,
    path = "/cooks",
    params(
        ("lat" = Option<f64>, Query, description = "Latitude of the search point"),
        ("lon" = Option<f64>, Query, description = "Longitude of the search point"),
        ("pincode" = Option<String>, Query, description = "Exact pincode"),
    ),
    responses(
        (status = 200, description = "Matching cooks", body = Vec<CookResponse>),
        (status = 400, description = "Incomplete or out-of-range coordinates", body = ErrorResponse),
    ),
    tag = "cooks"
)]
pub async fn list_cooks(
    state: web::Data<AppState>,
    query: web::Query<ListCooksParams>,
) -> Result<HttpResponse, AppError> {
    let search = match query.into_inner() {
        ListCooksParams {
            lat: Some(lat),
            lon: Some(lon),
            ..
        } => CookSearch::Near(Coordinates::new(lat, lon)),
        ListCooksParams {
            lat: None,
            lon: None,
            pincode: Some(pincode),
        } => CookSearch::Pincode(pincode),
        ListCooksParams {
            lat: None,
            lon: None,
            pincode: None,
        } => CookSearch::All,
        _ => {
            return Err(AppError::Validation(
                "lat and lon must be given together".to_string(),
            ))
        }
    };

    let cooks = blocking(move || state.cooks.search(search)).await?;
    Ok(HttpResponse::Ok().json(cook_list(cooks)))
}

/// GET /cooks/nearby
///
/// Cooks within `max_distance` km (default 5), closest first, each with its
/// distance.
#[utoipa::path(
    get,
    path = "/cooks/nearby",
    params(
        ("lat" = f64, Query, description = "Latitude of the search point"),
        ("lng" = f64, Query, description = "Longitude of the search point"),
        ("max_distance" = Option<f64>, Query, description = "Radius in km, default 5"),
    ),
    responses(
        (status = 200, description = "Cooks sorted by distance", body = Vec<NearbyCookResponse>),
        (status = 400, description = "Missing or invalid coordinates", body = ErrorResponse),
    ),
    tag = "cooks"
)]
pub async fn nearby_cooks(
    state: web::Data<AppState>,
    query: web::Query<NearbyParams>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    let center = Coordinates::new(params.lat, params.lng);
    let radius = params.max_distance.unwrap_or(DEFAULT_SEARCH_RADIUS_KM);

    let found = blocking(move || state.cooks.nearby(center, radius)).await?;
    let body: Vec<NearbyCookResponse> = found.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /cooks/pincode/{pincode}
#[utoipa::path(
    get,
    path = "/cooks/pincode/{pincode}",
    params(
        ("pincode" = String, Path, description = "Pincode to match"),
    ),
    responses(
        (status = 200, description = "Cooks in the pincode", body = Vec<CookResponse>),
    ),
    tag = "cooks"
)]
pub async fn cooks_by_pincode(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let pincode = path.into_inner();
    let cooks = blocking(move || state.cooks.by_pincode(&pincode)).await?;
    Ok(HttpResponse::Ok().json(cook_list(cooks)))
}

/// GET /cooks/{id}
#[utoipa::path(
    get,
    path = "/cooks/{id}",
    params(
        ("id" = Uuid, Path, description = "Cook UUID"),
    ),
    responses(
        (status = 200, description = "Cook found", body = CookResponse),
        (status = 404, description = "Cook not found", body = ErrorResponse),
    ),
    tag = "cooks"
)]
pub async fn get_cook(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let cook = blocking(move || state.cooks.get(id)).await?;
    Ok(HttpResponse::Ok().json(CookResponse::from(cook)))
}

/// PUT /cooks/{id}
#[utoipa::path(
    put,
    path = "/cooks/{id}",
    params(
        ("id" = Uuid, Path, description = "Cook UUID"),
    ),
    request_body = UpdateCookRequest,
    responses(
        (status = 200, description = "Profile updated", body = CookResponse),
        (status = 400, description = "Invalid field", body = ErrorResponse),
        (status = 404, description = "Cook not found", body = ErrorResponse),
    ),
    tag = "cooks"
)]
pub async fn update_cook(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateCookRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let body = body.into_inner();
    let update = CookUpdate {
        name: body.name,
        bio: body.bio,
        specialties: body.specialties,
        cuisine_types: body.cuisine_types,
        availability: body.availability.map(Into::into),
        neighborhood: body.neighborhood,
        kitchen_image_urls: body.kitchen_image_urls,
        upi_id: body.upi_id,
    };

    let cook = blocking(move || state.cooks.update(id, update)).await?;
    Ok(HttpResponse::Ok().json(CookResponse::from(cook)))
}

/// GET /cooks/{id}/payment-details
#[utoipa::path(
    get,
    path = "/cooks/{id}/payment-details",
    params(
        ("id" = Uuid, Path, description = "Cook UUID"),
    ),
    responses(
        (status = 200, description = "Name and UPI id to pay", body = PaymentDetailsResponse),
        (status = 404, description = "Cook not found", body = ErrorResponse),
    ),
    tag = "cooks"
)]
pub async fn payment_details(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let info = blocking(move || state.cooks.payment_details(id)).await?;
    Ok(HttpResponse::Ok().json(PaymentDetailsResponse::from(info)))
}

/// GET /cooks/{id}/analytics
#[utoipa::path(
    get,
    path = "/cooks/{id}/analytics",
    params(
        ("id" = Uuid, Path, description = "Cook UUID"),
        ("period" = Option<String>, Query, description = "week, month (default), 3months or year"),
    ),
    responses(
        (status = 200, description = "Dashboard figures", body = AnalyticsResponse),
        (status = 400, description = "Unknown period", body = ErrorResponse),
        (status = 404, description = "Cook not found", body = ErrorResponse),
    ),
    tag = "cooks"
)]
pub async fn cook_analytics(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    query: web::Query<AnalyticsParams>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let period = match query.into_inner().period {
        Some(p) => Period::from_str(&p)?,
        None => Period::default(),
    };

    let stats = blocking(move || state.cooks.analytics(id, period, Utc::now())).await?;
    Ok(HttpResponse::Ok().json(AnalyticsResponse::from(stats)))
}
