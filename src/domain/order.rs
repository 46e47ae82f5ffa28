use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::errors::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    Placed,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Placed => "Placed",
            OrderStatus::Completed => "Completed",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    /// Placed may move to Completed or Cancelled. Both of those are terminal.
    pub fn transition_to(self, next: OrderStatus) -> Result<OrderStatus, DomainError> {
        match (self, next) {
            (OrderStatus::Placed, OrderStatus::Completed | OrderStatus::Cancelled) => Ok(next),
            (from, to) => Err(DomainError::InvalidTransition { from, to }),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Placed" => Ok(OrderStatus::Placed),
            "Completed" => Ok(OrderStatus::Completed),
            "Cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(DomainError::invalid(format!(
                "invalid status '{other}', expected one of Placed, Completed, Cancelled"
            ))),
        }
    }
}

/// A customer rating between 1 and 5 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rating(u8);

impl Rating {
    pub fn new(value: i32) -> Result<Self, DomainError> {
        match u8::try_from(value) {
            Ok(v @ 1..=5) => Ok(Rating(v)),
            _ => Err(DomainError::invalid(format!(
                "rating must be between 1 and 5, got {value}"
            ))),
        }
    }

    pub fn value(self) -> i32 {
        i32::from(self.0)
    }
}

/// What a customer asks for: one meal line with a quantity.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDraft {
    pub customer_id: Uuid,
    pub cook_id: Uuid,
    pub meal_id: Uuid,
    pub quantity: i32,
}

impl OrderDraft {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.customer_id.is_nil() || self.cook_id.is_nil() || self.meal_id.is_nil() {
            return Err(DomainError::invalid(
                "customer_id, cook_id and meal_id are required",
            ));
        }
        if self.quantity < 1 {
            return Err(DomainError::invalid(format!(
                "quantity must be at least 1, got {}",
                self.quantity
            )));
        }
        Ok(())
    }
}

/// A priced draft ready to be persisted.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub customer_id: Uuid,
    pub cook_id: Uuid,
    pub meal_id: Uuid,
    pub quantity: i32,
    pub total_price: BigDecimal,
}

#[derive(Debug, Clone)]
pub struct Order {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub cook_id: Uuid,
    pub meal_id: Uuid,
    pub quantity: i32,
    pub total_price: Option<BigDecimal>,
    pub status: OrderStatus,
    pub rating: Option<Rating>,
    pub review_text: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Order {
    pub fn placed(id: Uuid, new: NewOrder, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            customer_id: new.customer_id,
            cook_id: new.cook_id,
            meal_id: new.meal_id,
            quantity: new.quantity,
            total_price: Some(new.total_price),
            status: OrderStatus::Placed,
            rating: None,
            review_text: None,
            created_at,
        }
    }

    pub fn transition_to(&mut self, next: OrderStatus) -> Result<(), DomainError> {
        self.status = self.status.transition_to(next)?;
        Ok(())
    }

    /// Attach a one-time rating. A placed order is completed by being rated;
    /// cancelled orders cannot be rated.
    pub fn rate(&mut self, rating: Rating, review_text: Option<String>) -> Result<(), DomainError> {
        if self.rating.is_some() {
            return Err(DomainError::AlreadyRated);
        }
        if self.status == OrderStatus::Placed {
            self.transition_to(OrderStatus::Completed)?;
        }
        if self.status != OrderStatus::Completed {
            return Err(DomainError::InvalidTransition {
                from: self.status,
                to: OrderStatus::Completed,
            });
        }
        self.rating = Some(rating);
        self.review_text = review_text.filter(|t| !t.trim().is_empty());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn order(status: OrderStatus) -> Order {
        let mut order = Order::placed(
            Uuid::new_v4(),
            NewOrder {
                customer_id: Uuid::new_v4(),
                cook_id: Uuid::new_v4(),
                meal_id: Uuid::new_v4(),
                quantity: 1,
                total_price: BigDecimal::from(50),
            },
            Utc::now(),
        );
        order.status = status;
        order
    }

    #[test]
    fn placed_can_complete_or_cancel() {
        assert_eq!(
            OrderStatus::Placed.transition_to(OrderStatus::Completed).unwrap(),
            OrderStatus::Completed
        );
        assert_eq!(
            OrderStatus::Placed.transition_to(OrderStatus::Cancelled).unwrap(),
            OrderStatus::Cancelled
        );
    }

    #[test]
    fn terminal_states_reject_transitions() {
        for (from, to) in [
            (OrderStatus::Completed, OrderStatus::Placed),
            (OrderStatus::Completed, OrderStatus::Cancelled),
            (OrderStatus::Cancelled, OrderStatus::Completed),
            (OrderStatus::Cancelled, OrderStatus::Placed),
            (OrderStatus::Placed, OrderStatus::Placed),
        ] {
            let err = from.transition_to(to).unwrap_err();
            assert!(
                matches!(err, DomainError::InvalidTransition { .. }),
                "{from} -> {to} should be rejected"
            );
        }
    }

    #[test]
    fn unknown_status_string_is_invalid_input() {
        assert!(matches!(
            OrderStatus::from_str("Shipped"),
            Err(DomainError::InvalidInput(_))
        ));
        assert!(matches!(
            OrderStatus::from_str("placed"),
            Err(DomainError::InvalidInput(_))
        ));
        assert_eq!(OrderStatus::from_str("Cancelled").unwrap(), OrderStatus::Cancelled);
    }

    #[test]
    fn rating_bounds() {
        assert!(Rating::new(0).is_err());
        assert!(Rating::new(6).is_err());
        assert!(Rating::new(-3).is_err());
        assert_eq!(Rating::new(5).unwrap().value(), 5);
    }

    #[test]
    fn rating_a_placed_order_completes_it() {
        let mut o = order(OrderStatus::Placed);
        o.rate(Rating::new(4).unwrap(), Some("tasty".into())).unwrap();
        assert_eq!(o.status, OrderStatus::Completed);
        assert_eq!(o.rating, Some(Rating::new(4).unwrap()));
        assert_eq!(o.review_text.as_deref(), Some("tasty"));
    }

    #[test]
    fn rating_twice_is_rejected() {
        let mut o = order(OrderStatus::Completed);
        o.rate(Rating::new(5).unwrap(), None).unwrap();
        let err = o.rate(Rating::new(1).unwrap(), None).unwrap_err();
        assert!(matches!(err, DomainError::AlreadyRated));
        assert_eq!(o.rating.map(Rating::value), Some(5));
    }

    #[test]
    fn cancelled_order_cannot_be_rated() {
        let mut o = order(OrderStatus::Cancelled);
        let err = o.rate(Rating::new(3).unwrap(), None).unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition { .. }));
        assert!(o.rating.is_none());
    }

    #[test]
    fn draft_requires_positive_quantity() {
        let draft = OrderDraft {
            customer_id: Uuid::new_v4(),
            cook_id: Uuid::new_v4(),
            meal_id: Uuid::new_v4(),
            quantity: 0,
        };
        assert!(matches!(draft.validate(), Err(DomainError::InvalidInput(_))));
    }
}
