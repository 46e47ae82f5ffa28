use uuid::Uuid;

use super::cook::{Cook, CookUpdate, NewCook, PaymentInfo};
use super::errors::DomainError;
use super::geo::Coordinates;
use super::meal::{Meal, NewMeal, StockUpdate};
use super::order::{NewOrder, Order, OrderStatus, Rating};
use super::user::{NewUser, User};

pub trait UserRepository: Send + Sync + 'static {
    fn create(&self, user: NewUser) -> Result<User, DomainError>;
    fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;
}

pub trait CookRepository: Send + Sync + 'static {
    /// Create the cook's account and profile together.
    fn register(&self, account: NewUser, cook: NewCook) -> Result<(User, Cook), DomainError>;
    fn find_by_id(&self, id: Uuid) -> Result<Option<Cook>, DomainError>;
    fn list(&self) -> Result<Vec<Cook>, DomainError>;
    fn find_by_pincode(&self, pincode: &str) -> Result<Vec<Cook>, DomainError>;
    /// Candidates inside the bounding box of the search circle. Callers
    /// filter by exact distance.
    fn find_near(&self, center: Coordinates, radius_km: f64) -> Result<Vec<Cook>, DomainError>;
    fn update(&self, id: Uuid, update: CookUpdate) -> Result<Option<Cook>, DomainError>;
}

/// Where checkout looks up how to pay a vendor.
pub trait PaymentDirectory: Send + Sync + 'static {
    fn payment_info(&self, cook_id: Uuid) -> Result<Option<PaymentInfo>, DomainError>;
}

pub trait MealRepository: Send + Sync + 'static {
    fn create(&self, meal: NewMeal) -> Result<Meal, DomainError>;
    fn find_by_id(&self, id: Uuid) -> Result<Option<Meal>, DomainError>;
    /// Meals flagged available with stock left, optionally for one cook.
    fn list_orderable(&self, cook_id: Option<Uuid>) -> Result<Vec<Meal>, DomainError>;
    fn list_by_cook(&self, cook_id: Uuid) -> Result<Vec<Meal>, DomainError>;
    fn update_stock(&self, id: Uuid, update: StockUpdate) -> Result<Option<Meal>, DomainError>;
}

pub trait OrderRepository: Send + Sync + 'static {
    fn create(&self, order: NewOrder) -> Result<Order, DomainError>;
    fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, DomainError>;
    fn list_by_customer(&self, customer_id: Uuid) -> Result<Vec<Order>, DomainError>;
    fn list_by_cook(&self, cook_id: Uuid) -> Result<Vec<Order>, DomainError>;
    /// Apply a status transition while holding the order.
    fn update_status(&self, id: Uuid, status: OrderStatus) -> Result<Order, DomainError>;
    /// Attach a rating and fold it into the cook's aggregate as one unit.
    fn rate(
        &self,
        id: Uuid,
        rating: Rating,
        review_text: Option<String>,
    ) -> Result<(Order, Cook), DomainError>;
}
