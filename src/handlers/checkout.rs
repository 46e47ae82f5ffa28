use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::cart::{Cart, CartLineItem};
use crate::application::checkout::VendorCheckout;
use crate::errors::AppError;
use crate::state::AppState;

use super::cooks::PaymentDetailsResponse;
use super::orders::{batch_status, FailedLineResponse, OrderResponse};
use super::{parse_amount, ErrorResponse};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CartItemDto {
    pub meal_id: Uuid,
    #[serde(default)]
    pub meal_name: String,
    /// Price shown when the item was added, e.g. "50.00"
    pub unit_price: String,
    pub quantity: i32,
    pub vendor_id: Uuid,
    #[serde(default)]
    pub vendor_name: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckoutPreviewRequest {
    pub items: Vec<CartItemDto>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckoutRequest {
    pub customer_id: Uuid,
    pub items: Vec<CartItemDto>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartLineResponse {
    pub meal_id: Uuid,
    pub meal_name: String,
    pub unit_price: String,
    pub quantity: i32,
    pub line_total: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VendorGroupResponse {
    pub vendor_id: Uuid,
    pub vendor_name: String,
    pub items: Vec<CartLineResponse>,
    pub total_amount: String,
    pub payment: PaymentDetailsResponse,
}

impl From<VendorCheckout> for VendorGroupResponse {
    fn from(v: VendorCheckout) -> Self {
        Self {
            vendor_id: v.group.vendor_id,
            vendor_name: v.group.vendor_name,
            items: v
                .group
                .items
                .into_iter()
                .map(|i| CartLineResponse {
                    line_total: i.line_total().to_string(),
                    meal_id: i.meal_id,
                    meal_name: i.meal_name,
                    unit_price: i.unit_price.to_string(),
                    quantity: i.quantity,
                })
                .collect(),
            total_amount: v.group.total_amount.to_string(),
            payment: v.payment.into(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CheckoutPreviewResponse {
    pub vendors: Vec<VendorGroupResponse>,
    pub grand_total: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CheckoutResponse {
    pub message: String,
    pub vendors: Vec<VendorGroupResponse>,
    pub grand_total: String,
    pub orders: Vec<OrderResponse>,
    pub failed: Vec<FailedLineResponse>,
    /// True only when every line became an order.
    pub clear_cart: bool,
}

fn cart_from(items: Vec<CartItemDto>) -> Result<Cart, AppError> {
    let mut cart = Cart::new();
    for item in items {
        cart.add(CartLineItem {
            unit_price: parse_amount("unit_price", &item.unit_price)?,
            meal_id: item.meal_id,
            meal_name: item.meal_name,
            quantity: item.quantity,
            vendor_id: item.vendor_id,
            vendor_name: item.vendor_name,
        })?;
    }
    Ok(cart)
}

/// POST /checkout/preview
///
/// Groups the cart by cook and shows how to pay each one.
#[utoipa::path(
    post,
    path = "/checkout/preview",
    request_body = CheckoutPreviewRequest,
    responses(
        (status = 200, description = "Per-cook totals and payment details", body = CheckoutPreviewResponse),
        (status = 400, description = "Empty or malformed cart", body = ErrorResponse),
    ),
    tag = "checkout"
)]
pub async fn preview(
    state: web::Data<AppState>,
    body: web::Json<CheckoutPreviewRequest>,
) -> Result<HttpResponse, AppError> {
    let cart = cart_from(body.into_inner().items)?;
    let preview = state.checkout.preview(&cart).await?;

    Ok(HttpResponse::Ok().json(CheckoutPreviewResponse {
        vendors: preview.vendors.into_iter().map(Into::into).collect(),
        grand_total: preview.grand_total.to_string(),
    }))
}

/// POST /checkout
///
/// Places one order per cart line and returns payment details per cook.
#[utoipa::path(
    post,
    path = "/checkout",
    request_body = CheckoutRequest,
    responses(
        (status = 201, description = "Every order placed", body = CheckoutResponse),
        (status = 207, description = "Some orders placed; keep the cart", body = CheckoutResponse),
        (status = 400, description = "Empty or malformed cart", body = ErrorResponse),
    ),
    tag = "checkout"
)]
pub async fn place(
    state: web::Data<AppState>,
    body: web::Json<CheckoutRequest>,
) -> Result<HttpResponse, AppError> {
    let CheckoutRequest { customer_id, items } = body.into_inner();
    let requested: Vec<Uuid> = items.iter().map(|i| i.meal_id).collect();
    let cart = cart_from(items)?;
    let receipt = state.checkout.place(customer_id, &cart).await?;

    let status = batch_status(&receipt.outcome);
    Ok(HttpResponse::build(status).json(CheckoutResponse {
        message: receipt.outcome.summary(),
        vendors: receipt.vendors.into_iter().map(Into::into).collect(),
        grand_total: receipt.grand_total.to_string(),
        orders: receipt.outcome.created.into_iter().map(Into::into).collect(),
        failed: receipt
            .outcome
            .failed
            .into_iter()
            .map(|mut f| {
                if let Some(pos) = requested.iter().position(|id| *id == f.meal_id) {
                    f.index = pos;
                }
                FailedLineResponse::from(f)
            })
            .collect(),
        clear_cart: receipt.clear_cart,
    }))
}
