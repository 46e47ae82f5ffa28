//! Multi-vendor checkout: group the cart, resolve how to pay each vendor,
//! then place one order per cart line.

use std::sync::Arc;

use bigdecimal::BigDecimal;
use futures::future::join_all;
use uuid::Uuid;

use crate::domain::cook::PaymentInfo;
use crate::domain::errors::DomainError;
use crate::domain::order::OrderDraft;
use crate::domain::ports::PaymentDirectory;

use super::cart::{Cart, VendorGroup};
use super::order_service::{BatchOutcome, OrderService};

/// Looks up vendor payment details, degrading to a placeholder instead of
/// failing checkout.
#[derive(Clone)]
pub struct PaymentInfoResolver {
    directory: Arc<dyn PaymentDirectory>,
}

impl PaymentInfoResolver {
    pub fn new(directory: Arc<dyn PaymentDirectory>) -> Self {
        Self { directory }
    }

    pub fn resolve(&self, vendor_id: Uuid, fallback_name: &str) -> PaymentInfo {
        match self.directory.payment_info(vendor_id) {
            Ok(Some(info)) => info,
            Ok(None) => {
                log::warn!("No payment details for vendor {vendor_id}, using placeholder");
                PaymentInfo::unavailable(fallback_name.to_string())
            }
            Err(e) => {
                log::warn!("Payment lookup for vendor {vendor_id} failed: {e}");
                PaymentInfo::unavailable(fallback_name.to_string())
            }
        }
    }

    /// Resolve every vendor concurrently. Results line up with `vendors`.
    pub async fn resolve_all(&self, vendors: &[(Uuid, String)]) -> Vec<PaymentInfo> {
        let lookups = vendors.iter().cloned().map(|(vendor_id, name)| {
            let resolver = self.clone();
            async move {
                let fallback = name.clone();
                tokio::task::spawn_blocking(move || resolver.resolve(vendor_id, &name))
                    .await
                    .unwrap_or_else(|e| {
                        log::warn!("Payment lookup task for vendor {vendor_id} aborted: {e}");
                        PaymentInfo::unavailable(fallback)
                    })
            }
        });
        join_all(lookups).await
    }
}

#[derive(Debug, Clone)]
pub struct VendorCheckout {
    pub group: VendorGroup,
    pub payment: PaymentInfo,
}

#[derive(Debug, Clone)]
pub struct CheckoutPreview {
    pub vendors: Vec<VendorCheckout>,
    pub grand_total: BigDecimal,
}

#[derive(Debug, Clone)]
pub struct CheckoutReceipt {
    pub vendors: Vec<VendorCheckout>,
    pub grand_total: BigDecimal,
    pub outcome: BatchOutcome,
    /// The cart may be emptied only when every line became an order.
    pub clear_cart: bool,
}

#[derive(Clone)]
pub struct CheckoutService {
    resolver: PaymentInfoResolver,
    orders: OrderService,
}

impl CheckoutService {
    pub fn new(resolver: PaymentInfoResolver, orders: OrderService) -> Self {
        Self { resolver, orders }
    }

    pub async fn preview(&self, cart: &Cart) -> Result<CheckoutPreview, DomainError> {
        cart.validate()?;
        let groups = cart.group_by_vendor();
        let vendors: Vec<(Uuid, String)> = groups
            .iter()
            .map(|g| (g.vendor_id, g.vendor_name.clone()))
            .collect();
        let payments = self.resolver.resolve_all(&vendors).await;

        Ok(CheckoutPreview {
            vendors: groups
                .into_iter()
                .zip(payments)
                .map(|(group, payment)| VendorCheckout { group, payment })
                .collect(),
            grand_total: cart.total(),
        })
    }

    pub async fn place(&self, customer_id: Uuid, cart: &Cart) -> Result<CheckoutReceipt, DomainError> {
        if customer_id.is_nil() {
            return Err(DomainError::invalid("customer_id is required"));
        }
        let preview = self.preview(cart).await?;
        let drafts: Vec<OrderDraft> = preview
            .vendors
            .iter()
            .flat_map(|v| v.group.drafts(customer_id))
            .collect();

        let orders = self.orders.clone();
        let mut outcome = tokio::task::spawn_blocking(move || orders.submit_batch(drafts))
            .await
            .map_err(|e| DomainError::Internal(e.to_string()))??;

        // Drafts follow vendor grouping; report failures by cart line.
        for failed in &mut outcome.failed {
            if let Some(pos) = cart
                .items
                .iter()
                .position(|i| i.meal_id == failed.meal_id && i.vendor_id == failed.cook_id)
            {
                failed.index = pos;
            }
        }

        log::info!(
            "Checkout for {customer_id}: {} across {} vendors",
            outcome.summary(),
            preview.vendors.len()
        );
        Ok(CheckoutReceipt {
            clear_cart: outcome.is_complete(),
            vendors: preview.vendors,
            grand_total: preview.grand_total,
            outcome,
        })
    }
}
