use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::cook::{Availability, Cook, CookUpdate, Location, NewCook, RatingAggregate};
use crate::domain::errors::DomainError;
use crate::domain::geo::Coordinates;
use crate::domain::meal::{Meal, NewMeal, StockUpdate};
use crate::domain::order::{NewOrder, Order, OrderStatus, Rating};
use crate::domain::user::{NewUser, User};
use crate::schema::{cooks, meals, orders, users};

// ── Users ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub phone: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub struct NewUserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub phone: String,
    pub role: String,
}

impl NewUserRow {
    pub fn new(user: NewUser) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            phone: user.phone,
            role: user.role.as_str().to_string(),
        }
    }
}

impl TryFrom<UserRow> for User {
    type Error = DomainError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: row.id,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            phone: row.phone,
            role: row.role.parse()?,
            created_at: row.created_at,
        })
    }
}

// ── Cooks ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = cooks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CookRow {
    pub id: Uuid,
    pub account_id: Option<Uuid>,
    pub name: String,
    pub bio: String,
    pub specialties: Vec<String>,
    pub cuisine_types: Vec<String>,
    pub available_morning: bool,
    pub available_afternoon: bool,
    pub available_evening: bool,
    pub time_slots: String,
    pub longitude: f64,
    pub latitude: f64,
    pub pincode: String,
    pub neighborhood: String,
    pub kitchen_image_urls: Vec<String>,
    pub upi_id: String,
    pub average_rating: f64,
    pub rating_count: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = cooks)]
pub struct NewCookRow {
    pub id: Uuid,
    pub account_id: Option<Uuid>,
    pub name: String,
    pub bio: String,
    pub specialties: Vec<String>,
    pub cuisine_types: Vec<String>,
    pub available_morning: bool,
    pub available_afternoon: bool,
    pub available_evening: bool,
    pub time_slots: String,
    pub longitude: f64,
    pub latitude: f64,
    pub pincode: String,
    pub neighborhood: String,
    pub kitchen_image_urls: Vec<String>,
    pub upi_id: String,
}

impl NewCookRow {
    pub fn new(account_id: Option<Uuid>, cook: NewCook) -> Self {
        Self {
            id: Uuid::new_v4(),
            account_id,
            name: cook.name,
            bio: cook.bio,
            specialties: cook.specialties,
            cuisine_types: cook.cuisine_types,
            available_morning: cook.availability.morning,
            available_afternoon: cook.availability.afternoon,
            available_evening: cook.availability.evening,
            time_slots: cook.availability.time_slots,
            longitude: cook.location.coordinates.longitude,
            latitude: cook.location.coordinates.latitude,
            pincode: cook.location.pincode,
            neighborhood: cook.location.neighborhood,
            kitchen_image_urls: cook.kitchen_image_urls,
            upi_id: cook.upi_id,
        }
    }
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = cooks)]
pub struct CookChangeset {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub specialties: Option<Vec<String>>,
    pub cuisine_types: Option<Vec<String>>,
    pub available_morning: Option<bool>,
    pub available_afternoon: Option<bool>,
    pub available_evening: Option<bool>,
    pub time_slots: Option<String>,
    pub neighborhood: Option<String>,
    pub kitchen_image_urls: Option<Vec<String>>,
    pub upi_id: Option<String>,
}

impl From<CookUpdate> for CookChangeset {
    fn from(u: CookUpdate) -> Self {
        let availability = u.availability;
        Self {
            name: u.name,
            bio: u.bio,
            specialties: u.specialties,
            cuisine_types: u.cuisine_types,
            available_morning: availability.as_ref().map(|a| a.morning),
            available_afternoon: availability.as_ref().map(|a| a.afternoon),
            available_evening: availability.as_ref().map(|a| a.evening),
            time_slots: availability.map(|a| a.time_slots),
            neighborhood: u.neighborhood,
            kitchen_image_urls: u.kitchen_image_urls,
            upi_id: u.upi_id,
        }
    }
}

impl From<CookRow> for Cook {
    fn from(row: CookRow) -> Self {
        Cook {
            id: row.id,
            account_id: row.account_id,
            name: row.name,
            bio: row.bio,
            specialties: row.specialties,
            cuisine_types: row.cuisine_types,
            availability: Availability {
                morning: row.available_morning,
                afternoon: row.available_afternoon,
                evening: row.available_evening,
                time_slots: row.time_slots,
            },
            location: Location {
                coordinates: Coordinates::new(row.latitude, row.longitude),
                pincode: row.pincode,
                neighborhood: row.neighborhood,
            },
            kitchen_image_urls: row.kitchen_image_urls,
            upi_id: row.upi_id,
            rating: RatingAggregate {
                average: row.average_rating,
                count: row.rating_count,
            },
            created_at: row.created_at,
        }
    }
}

// ── Meals ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = meals)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MealRow {
    pub id: Uuid,
    pub cook_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub image_url: String,
    pub price: BigDecimal,
    pub calories: i32,
    pub quantity_available: i32,
    pub is_available: bool,
    pub category: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = meals)]
pub struct NewMealRow {
    pub id: Uuid,
    pub cook_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub image_url: String,
    pub price: BigDecimal,
    pub calories: i32,
    pub quantity_available: i32,
    pub category: String,
    pub tags: Vec<String>,
}

impl NewMealRow {
    pub fn new(meal: NewMeal) -> Self {
        Self {
            id: Uuid::new_v4(),
            cook_id: meal.cook_id,
            name: meal.name,
            description: meal.description,
            image_url: meal.image_url,
            price: meal.price,
            calories: meal.calories,
            quantity_available: meal.quantity_available,
            category: meal.category.as_str().to_string(),
            tags: meal.tags,
        }
    }
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = meals)]
pub struct StockChangeset {
    pub quantity_available: Option<i32>,
    pub is_available: Option<bool>,
}

impl From<StockUpdate> for StockChangeset {
    fn from(u: StockUpdate) -> Self {
        Self {
            quantity_available: u.quantity_available,
            is_available: u.is_available,
        }
    }
}

impl TryFrom<MealRow> for Meal {
    type Error = DomainError;

    fn try_from(row: MealRow) -> Result<Self, Self::Error> {
        let category = row
            .category
            .parse()
            .map_err(|e: DomainError| DomainError::Internal(e.to_string()))?;
        Ok(Meal {
            id: row.id,
            cook_id: row.cook_id,
            name: row.name,
            description: row.description,
            image_url: row.image_url,
            price: row.price,
            calories: row.calories,
            quantity_available: row.quantity_available,
            is_available: row.is_available,
            category,
            tags: row.tags,
            created_at: row.created_at,
        })
    }
}

// ── Orders ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderRow {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub cook_id: Uuid,
    pub meal_id: Uuid,
    pub quantity: i32,
    pub total_price: Option<BigDecimal>,
    pub status: String,
    pub rating: Option<i32>,
    pub review_text: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrderRow {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub cook_id: Uuid,
    pub meal_id: Uuid,
    pub quantity: i32,
    pub total_price: Option<BigDecimal>,
    pub status: String,
}

impl NewOrderRow {
    pub fn new(order: NewOrder) -> Self {
        Self {
            id: Uuid::new_v4(),
            customer_id: order.customer_id,
            cook_id: order.cook_id,
            meal_id: order.meal_id,
            quantity: order.quantity,
            total_price: Some(order.total_price),
            status: OrderStatus::Placed.as_str().to_string(),
        }
    }
}

impl TryFrom<OrderRow> for Order {
    type Error = DomainError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse()
            .map_err(|e: DomainError| DomainError::Internal(e.to_string()))?;
        let rating = row
            .rating
            .map(Rating::new)
            .transpose()
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        Ok(Order {
            id: row.id,
            customer_id: row.customer_id,
            cook_id: row.cook_id,
            meal_id: row.meal_id,
            quantity: row.quantity,
            total_price: row.total_price,
            status,
            rating,
            review_text: row.review_text,
            created_at: row.created_at,
        })
    }
}
