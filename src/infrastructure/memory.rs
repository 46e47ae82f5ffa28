//! In-process store implementing every repository port.
//!
//! All tables sit behind one mutex, so each call is atomic with respect to
//! every other call. Used by the test suites and for running the API without
//! a database.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use uuid::Uuid;

use crate::domain::cook::{Cook, CookUpdate, NewCook, PaymentInfo, RatingAggregate};
use crate::domain::errors::DomainError;
use crate::domain::geo::Coordinates;
use crate::domain::meal::{Meal, NewMeal, StockUpdate};
use crate::domain::order::{NewOrder, Order, OrderStatus, Rating};
use crate::domain::ports::{
    CookRepository, MealRepository, OrderRepository, PaymentDirectory, UserRepository,
};
use crate::domain::user::{NewUser, User};

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    emails: HashSet<String>,
    cooks: HashMap<Uuid, Cook>,
    meals: HashMap<Uuid, Meal>,
    orders: HashMap<Uuid, Order>,
}

impl Tables {
    fn insert_user(&mut self, user: NewUser) -> Result<User, DomainError> {
        if !self.emails.insert(user.email.clone()) {
            return Err(DomainError::Conflict(format!(
                "an account with email {} already exists",
                user.email
            )));
        }
        let user = User {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            phone: user.phone,
            role: user.role,
            created_at: Utc::now(),
        };
        self.users.insert(user.id, user.clone());
        Ok(user)
    }

    fn cook_mut(&mut self, id: Uuid) -> Result<&mut Cook, DomainError> {
        self.cooks.get_mut(&id).ok_or(DomainError::NotFound("Cook"))
    }

    fn order_mut(&mut self, id: Uuid) -> Result<&mut Order, DomainError> {
        self.orders.get_mut(&id).ok_or(DomainError::NotFound("Order"))
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>, DomainError> {
        self.tables
            .lock()
            .map_err(|e| DomainError::Internal(format!("memory store poisoned: {e}")))
    }
}

fn newest_first<T>(mut items: Vec<T>, created: impl Fn(&T) -> chrono::DateTime<Utc>) -> Vec<T> {
    items.sort_by_key(|item| std::cmp::Reverse(created(item)));
    items
}

impl UserRepository for MemoryStore {
    fn create(&self, user: NewUser) -> Result<User, DomainError> {
        self.tables()?.insert_user(user)
    }

    fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let tables = self.tables()?;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }
}

impl CookRepository for MemoryStore {
    fn register(&self, account: NewUser, cook: NewCook) -> Result<(User, Cook), DomainError> {
        let mut tables = self.tables()?;
        let user = tables.insert_user(account)?;
        let cook = Cook {
            id: Uuid::new_v4(),
            account_id: Some(user.id),
            name: cook.name,
            bio: cook.bio,
            specialties: cook.specialties,
            cuisine_types: cook.cuisine_types,
            availability: cook.availability,
            location: cook.location,
            kitchen_image_urls: cook.kitchen_image_urls,
            upi_id: cook.upi_id,
            rating: RatingAggregate::default(),
            created_at: Utc::now(),
        };
        tables.cooks.insert(cook.id, cook.clone());
        Ok((user, cook))
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Cook>, DomainError> {
        Ok(self.tables()?.cooks.get(&id).cloned())
    }

    fn list(&self) -> Result<Vec<Cook>, DomainError> {
        let cooks = self.tables()?.cooks.values().cloned().collect();
        Ok(newest_first(cooks, |c| c.created_at))
    }

    fn find_by_pincode(&self, pincode: &str) -> Result<Vec<Cook>, DomainError> {
        let cooks = self
            .tables()?
            .cooks
            .values()
            .filter(|c| c.location.pincode == pincode)
            .cloned()
            .collect();
        Ok(newest_first(cooks, |c| c.created_at))
    }

    fn find_near(&self, center: Coordinates, radius_km: f64) -> Result<Vec<Cook>, DomainError> {
        let bbox = center.bounding_box(radius_km);
        Ok(self
            .tables()?
            .cooks
            .values()
            .filter(|c| bbox.contains(&c.location.coordinates))
            .cloned()
            .collect())
    }

    fn update(&self, id: Uuid, update: CookUpdate) -> Result<Option<Cook>, DomainError> {
        let mut tables = self.tables()?;
        Ok(tables.cooks.get_mut(&id).map(|cook| {
            update.apply(cook);
            cook.clone()
        }))
    }
}

impl PaymentDirectory for MemoryStore {
    fn payment_info(&self, cook_id: Uuid) -> Result<Option<PaymentInfo>, DomainError> {
        Ok(self.tables()?.cooks.get(&cook_id).map(Cook::payment_info))
    }
}

impl MealRepository for MemoryStore {
    fn create(&self, meal: NewMeal) -> Result<Meal, DomainError> {
        let mut tables = self.tables()?;
        if !tables.cooks.contains_key(&meal.cook_id) {
            return Err(DomainError::invalid(
                "referenced record does not exist (meals_cook_id_fkey)",
            ));
        }
        let meal = Meal {
            id: Uuid::new_v4(),
            cook_id: meal.cook_id,
            name: meal.name,
            description: meal.description,
            image_url: meal.image_url,
            price: meal.price,
            calories: meal.calories,
            quantity_available: meal.quantity_available,
            is_available: true,
            category: meal.category,
            tags: meal.tags,
            created_at: Utc::now(),
        };
        tables.meals.insert(meal.id, meal.clone());
        Ok(meal)
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Meal>, DomainError> {
        Ok(self.tables()?.meals.get(&id).cloned())
    }

    fn list_orderable(&self, cook_id: Option<Uuid>) -> Result<Vec<Meal>, DomainError> {
        let meals = self
            .tables()?
            .meals
            .values()
            .filter(|m| m.is_orderable() && cook_id.map_or(true, |id| m.cook_id == id))
            .cloned()
            .collect();
        Ok(newest_first(meals, |m| m.created_at))
    }

    fn list_by_cook(&self, cook_id: Uuid) -> Result<Vec<Meal>, DomainError> {
        let meals = self
            .tables()?
            .meals
            .values()
            .filter(|m| m.cook_id == cook_id)
            .cloned()
            .collect();
        Ok(newest_first(meals, |m| m.created_at))
    }

    fn update_stock(&self, id: Uuid, update: StockUpdate) -> Result<Option<Meal>, DomainError> {
        let mut tables = self.tables()?;
        Ok(tables.meals.get_mut(&id).map(|meal| {
            update.apply(meal);
            meal.clone()
        }))
    }
}

impl OrderRepository for MemoryStore {
    fn create(&self, order: NewOrder) -> Result<Order, DomainError> {
        let mut tables = self.tables()?;
        if !tables.users.contains_key(&order.customer_id) {
            return Err(DomainError::invalid(
                "referenced record does not exist (orders_customer_id_fkey)",
            ));
        }
        let order = Order::placed(Uuid::new_v4(), order, Utc::now());
        tables.orders.insert(order.id, order.clone());
        Ok(order)
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, DomainError> {
        Ok(self.tables()?.orders.get(&id).cloned())
    }

    fn list_by_customer(&self, customer_id: Uuid) -> Result<Vec<Order>, DomainError> {
        let orders = self
            .tables()?
            .orders
            .values()
            .filter(|o| o.customer_id == customer_id)
            .cloned()
            .collect();
        Ok(newest_first(orders, |o| o.created_at))
    }

    fn list_by_cook(&self, cook_id: Uuid) -> Result<Vec<Order>, DomainError> {
        let orders = self
            .tables()?
            .orders
            .values()
            .filter(|o| o.cook_id == cook_id)
            .cloned()
            .collect();
        Ok(newest_first(orders, |o| o.created_at))
    }

    fn update_status(&self, id: Uuid, status: OrderStatus) -> Result<Order, DomainError> {
        let mut tables = self.tables()?;
        let order = tables.order_mut(id)?;
        order.transition_to(status)?;
        Ok(order.clone())
    }

    fn rate(
        &self,
        id: Uuid,
        rating: Rating,
        review_text: Option<String>,
    ) -> Result<(Order, Cook), DomainError> {
        let mut tables = self.tables()?;

        // Validate against a copy so a missing cook leaves the order untouched.
        let mut order = tables.order_mut(id)?.clone();
        order.rate(rating, review_text)?;

        let cook = tables.cook_mut(order.cook_id)?;
        cook.rating = cook.rating.record(rating);
        let cook = cook.clone();

        tables.orders.insert(order.id, order.clone());
        Ok((order, cook))
    }
}
