use std::fmt;
use std::str::FromStr;

use bigdecimal::{BigDecimal, Zero};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::errors::DomainError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MealCategory {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
    Dessert,
    #[default]
    Other,
}

impl MealCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            MealCategory::Breakfast => "Breakfast",
            MealCategory::Lunch => "Lunch",
            MealCategory::Dinner => "Dinner",
            MealCategory::Snack => "Snack",
            MealCategory::Dessert => "Dessert",
            MealCategory::Other => "Other",
        }
    }
}

impl fmt::Display for MealCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MealCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Breakfast" => Ok(MealCategory::Breakfast),
            "Lunch" => Ok(MealCategory::Lunch),
            "Dinner" => Ok(MealCategory::Dinner),
            "Snack" => Ok(MealCategory::Snack),
            "Dessert" => Ok(MealCategory::Dessert),
            "Other" => Ok(MealCategory::Other),
            other => Err(DomainError::invalid(format!("invalid meal category '{other}'"))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Meal {
    pub id: Uuid,
    pub cook_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub image_url: String,
    pub price: BigDecimal,
    pub calories: i32,
    pub quantity_available: i32,
    pub is_available: bool,
    pub category: MealCategory,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Meal {
    /// Listed to customers: flagged available and still in stock.
    pub fn is_orderable(&self) -> bool {
        self.is_available && self.quantity_available > 0
    }
}

#[derive(Debug, Clone)]
pub struct NewMeal {
    pub cook_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub image_url: String,
    pub price: BigDecimal,
    pub calories: i32,
    pub quantity_available: i32,
    pub category: MealCategory,
    pub tags: Vec<String>,
}

impl NewMeal {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.cook_id.is_nil() {
            return Err(DomainError::invalid("cook_id is required"));
        }
        if self.name.trim().is_empty() {
            return Err(DomainError::invalid("name is required"));
        }
        if self.image_url.trim().is_empty() {
            return Err(DomainError::invalid("image_url is required"));
        }
        if self.price < BigDecimal::zero() {
            return Err(DomainError::invalid("price cannot be negative"));
        }
        if self.calories < 0 {
            return Err(DomainError::invalid("calories cannot be negative"));
        }
        if self.quantity_available < 0 {
            return Err(DomainError::invalid("quantity_available cannot be negative"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct StockUpdate {
    pub quantity_available: Option<i32>,
    pub is_available: Option<bool>,
}

impl StockUpdate {
    pub fn validate(&self) -> Result<(), DomainError> {
        match self.quantity_available {
            Some(q) if q < 0 => Err(DomainError::invalid("quantity_available cannot be negative")),
            _ if self.quantity_available.is_none() && self.is_available.is_none() => Err(
                DomainError::invalid("provide quantity_available or is_available"),
            ),
            _ => Ok(()),
        }
    }

    pub fn apply(self, meal: &mut Meal) {
        if let Some(q) = self.quantity_available {
            meal.quantity_available = q;
        }
        if let Some(a) = self.is_available {
            meal.is_available = a;
        }
    }
}
