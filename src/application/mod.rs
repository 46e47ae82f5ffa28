pub mod analytics;
pub mod auth_service;
pub mod cart;
pub mod checkout;
pub mod cook_service;
pub mod meal_service;
pub mod order_service;
pub mod password;
