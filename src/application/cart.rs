//! Customer cart held by the client and handed to checkout.
//!
//! The cart is plain data: callers load it with [`Cart::from_json`], mutate it
//! and store it back with [`Cart::to_json`]. Vendor and meal details on each
//! line are a display snapshot; checkout re-prices orders from stored meals.

use bigdecimal::{BigDecimal, Zero};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::order::OrderDraft;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLineItem {
    pub meal_id: Uuid,
    pub meal_name: String,
    pub unit_price: BigDecimal,
    pub quantity: i32,
    pub vendor_id: Uuid,
    pub vendor_name: String,
}

impl CartLineItem {
    pub fn line_total(&self) -> BigDecimal {
        self.unit_price.clone() * BigDecimal::from(self.quantity)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    pub items: Vec<CartLineItem>,
}

/// Cart lines for one vendor, in the order they were added.
#[derive(Debug, Clone, PartialEq)]
pub struct VendorGroup {
    pub vendor_id: Uuid,
    pub vendor_name: String,
    pub items: Vec<CartLineItem>,
    pub total_amount: BigDecimal,
}

impl VendorGroup {
    /// One draft per meal line.
    pub fn drafts(&self, customer_id: Uuid) -> impl Iterator<Item = OrderDraft> + '_ {
        self.items.iter().map(move |item| OrderDraft {
            customer_id,
            cook_id: self.vendor_id,
            meal_id: item.meal_id,
            quantity: item.quantity,
        })
    }
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a line, or bump the quantity if the meal is already in the cart.
    pub fn add(&mut self, item: CartLineItem) -> Result<(), DomainError> {
        match self.items.iter_mut().find(|i| i.meal_id == item.meal_id) {
            Some(existing) => {
                existing.quantity = existing
                    .quantity
                    .checked_add(item.quantity)
                    .ok_or_else(|| {
                        DomainError::invalid(format!(
                            "quantity for meal {} is too large",
                            item.meal_id
                        ))
                    })?;
            }
            None => self.items.push(item),
        }
        Ok(())
    }

    pub fn remove(&mut self, meal_id: Uuid) {
        self.items.retain(|i| i.meal_id != meal_id);
    }

    /// Set a line's quantity; anything below 1 removes the line.
    pub fn update_quantity(&mut self, meal_id: Uuid, quantity: i32) {
        if quantity < 1 {
            self.remove(meal_id);
            return;
        }
        if let Some(item) = self.items.iter_mut().find(|i| i.meal_id == meal_id) {
            item.quantity = quantity;
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn total(&self) -> BigDecimal {
        self.items.iter().map(CartLineItem::line_total).sum()
    }

    /// Number of portions across all lines.
    pub fn count(&self) -> i64 {
        self.items.iter().map(|i| i64::from(i.quantity)).sum()
    }

    /// Reject carts checkout cannot act on.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.items.is_empty() {
            return Err(DomainError::invalid("cart is empty"));
        }
        for (index, item) in self.items.iter().enumerate() {
            if item.meal_id.is_nil() || item.vendor_id.is_nil() {
                return Err(DomainError::invalid(format!(
                    "item {index}: meal_id and vendor_id are required"
                )));
            }
            if item.quantity < 1 {
                return Err(DomainError::invalid(format!(
                    "item {index}: quantity must be at least 1"
                )));
            }
            if item.unit_price < BigDecimal::zero() {
                return Err(DomainError::invalid(format!(
                    "item {index}: price cannot be negative"
                )));
            }
        }
        Ok(())
    }

    /// Partition lines by vendor, groups ordered by first appearance.
    pub fn group_by_vendor(&self) -> Vec<VendorGroup> {
        let mut groups: Vec<VendorGroup> = Vec::new();
        for item in &self.items {
            let group = match groups.iter().position(|g| g.vendor_id == item.vendor_id) {
                Some(pos) => &mut groups[pos],
                None => {
                    groups.push(VendorGroup {
                        vendor_id: item.vendor_id,
                        vendor_name: item.vendor_name.clone(),
                        items: Vec::new(),
                        total_amount: BigDecimal::zero(),
                    });
                    let last = groups.len() - 1;
                    &mut groups[last]
                }
            };
            group.total_amount += item.line_total();
            group.items.push(item.clone());
        }
        groups
    }

    pub fn to_json(&self) -> Result<String, DomainError> {
        serde_json::to_string(self).map_err(|e| DomainError::Internal(e.to_string()))
    }

    pub fn from_json(raw: &str) -> Result<Self, DomainError> {
        serde_json::from_str(raw).map_err(|e| DomainError::invalid(format!("unreadable cart: {e}")))
    }
}
