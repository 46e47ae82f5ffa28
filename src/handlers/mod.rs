pub mod auth;
pub mod checkout;
pub mod cooks;
pub mod meals;
pub mod orders;

use std::str::FromStr;

use actix_web::{web, HttpRequest};
use bigdecimal::BigDecimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::errors::DomainError;
use crate::errors::AppError;

/// Body of every error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Run a repository-backed call on the blocking pool.
pub(crate) async fn blocking<F, T>(f: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, DomainError> + Send + 'static,
    T: Send + 'static,
{
    web::block(f)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
        .map_err(AppError::from)
}

/// Decimal amounts travel as strings, e.g. "49.50".
pub(crate) fn parse_amount(field: &str, raw: &str) -> Result<BigDecimal, AppError> {
    BigDecimal::from_str(raw.trim())
        .map_err(|_| AppError::Validation(format!("{field} must be a decimal amount, got '{raw}'")))
}

// ── Extractor errors ─────────────────────────────────────────────────────────

pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req: &HttpRequest| {
        AppError::Validation(format!("Invalid request body: {err}")).into()
    })
}

/// Malformed ids in the path are client errors, not missing routes.
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req: &HttpRequest| {
        AppError::Validation(format!("Invalid path parameter: {err}")).into()
    })
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req: &HttpRequest| {
        AppError::Validation(format!("Invalid query string: {err}")).into()
    })
}
