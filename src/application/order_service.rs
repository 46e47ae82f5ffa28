use std::str::FromStr;
use std::sync::Arc;

use bigdecimal::BigDecimal;
use uuid::Uuid;

use crate::domain::cook::Cook;
use crate::domain::errors::DomainError;
use crate::domain::order::{NewOrder, Order, OrderDraft, OrderStatus, Rating};
use crate::domain::ports::{MealRepository, OrderRepository};

/// A batch line that could not be placed.
#[derive(Debug, Clone, PartialEq)]
pub struct FailedLine {
    /// Position of the line in the submitted batch. Checkout rewrites it to
    /// the line's position in the cart.
    pub index: usize,
    pub meal_id: Uuid,
    pub cook_id: Uuid,
    pub error: String,
}

/// Result of submitting several drafts. Lines are independent: created orders
/// stay created when a later line fails.
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    pub created: Vec<Order>,
    pub failed: Vec<FailedLine>,
}

impl BatchOutcome {
    pub fn submitted(&self) -> usize {
        self.created.len() + self.failed.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn summary(&self) -> String {
        if self.is_complete() {
            format!("{} orders placed", self.created.len())
        } else {
            format!(
                "{} of {} orders placed, please retry the rest",
                self.created.len(),
                self.submitted()
            )
        }
    }
}

#[derive(Clone)]
pub struct OrderService {
    orders: Arc<dyn OrderRepository>,
    meals: Arc<dyn MealRepository>,
}

impl OrderService {
    pub fn new(orders: Arc<dyn OrderRepository>, meals: Arc<dyn MealRepository>) -> Self {
        Self { orders, meals }
    }

    /// Price a draft against the stored meal and persist it as `Placed`.
    pub fn place(&self, draft: OrderDraft) -> Result<Order, DomainError> {
        draft.validate()?;

        let meal = self
            .meals
            .find_by_id(draft.meal_id)?
            .ok_or(DomainError::NotFound("Meal"))?;
        if meal.cook_id != draft.cook_id {
            return Err(DomainError::invalid(format!(
                "meal {} is not sold by cook {}",
                meal.id, draft.cook_id
            )));
        }
        if !meal.is_available {
            return Err(DomainError::invalid(format!(
                "{} is not available right now",
                meal.name
            )));
        }

        let total_price = meal.price * BigDecimal::from(draft.quantity);
        let order = self.orders.create(NewOrder {
            customer_id: draft.customer_id,
            cook_id: draft.cook_id,
            meal_id: draft.meal_id,
            quantity: draft.quantity,
            total_price,
        })?;

        log::info!(
            "Order {} placed by {} with cook {}",
            order.id,
            order.customer_id,
            order.cook_id
        );
        Ok(order)
    }

    /// Place every draft in order. Malformed drafts reject the whole batch
    /// before anything is written; after that each line stands alone.
    pub fn submit_batch(&self, drafts: Vec<OrderDraft>) -> Result<BatchOutcome, DomainError> {
        if drafts.is_empty() {
            return Err(DomainError::invalid("at least one order is required"));
        }
        for (index, draft) in drafts.iter().enumerate() {
            draft
                .validate()
                .map_err(|e| DomainError::invalid(format!("line {index}: {e}")))?;
        }

        let mut outcome = BatchOutcome::default();
        for (index, draft) in drafts.into_iter().enumerate() {
            let (meal_id, cook_id) = (draft.meal_id, draft.cook_id);
            match self.place(draft) {
                Ok(order) => outcome.created.push(order),
                Err(e) => {
                    log::warn!("Batch line {index} (meal {meal_id}) failed: {e}");
                    outcome.failed.push(FailedLine {
                        index,
                        meal_id,
                        cook_id,
                        error: e.to_string(),
                    });
                }
            }
        }

        if !outcome.is_complete() {
            log::warn!("{}", outcome.summary());
        }
        Ok(outcome)
    }

    pub fn get(&self, id: Uuid) -> Result<Order, DomainError> {
        self.orders.find_by_id(id)?.ok_or(DomainError::NotFound("Order"))
    }

    pub fn list_by_customer(&self, customer_id: Uuid) -> Result<Vec<Order>, DomainError> {
        self.orders.list_by_customer(customer_id)
    }

    pub fn list_by_cook(&self, cook_id: Uuid) -> Result<Vec<Order>, DomainError> {
        self.orders.list_by_cook(cook_id)
    }

    pub fn update_status(&self, id: Uuid, status: &str) -> Result<Order, DomainError> {
        let status = OrderStatus::from_str(status)?;
        let order = self.orders.update_status(id, status)?;
        log::info!("Order {} is now {}", order.id, order.status);
        Ok(order)
    }

    pub fn rate(
        &self,
        id: Uuid,
        rating: i32,
        review_text: Option<String>,
    ) -> Result<(Order, Cook), DomainError> {
        let rating = Rating::new(rating)?;
        let (order, cook) = self.orders.rate(id, rating, review_text)?;
        log::info!(
            "Order {} rated {}; cook {} now at {:.2} over {} ratings",
            order.id,
            rating.value(),
            cook.id,
            cook.rating.average,
            cook.rating.count
        );
        Ok((order, cook))
    }
}
