pub mod auth;
pub mod crud;
pub mod farmer;
pub mod field;
pub mod historical_yield;
pub mod product;
pub mod recommendation;
pub mod sensor;
pub mod sensor_reading;
pub mod user;
pub mod validation;
pub mod yield_prediction;

#[cfg(test)]
mod fixtures;
