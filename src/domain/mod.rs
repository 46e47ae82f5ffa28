pub mod cook;
pub mod errors;
pub mod geo;
pub mod meal;
pub mod order;
pub mod ports;
pub mod user;
