use axum::{Router, response::Json as ResponseJson, routing::get};
use utils::response::MessageResponse;

use crate::AppState;

pub mod auth;
pub mod farmers;
pub mod fields;
pub mod historical_yields;
pub mod products;
pub mod recommendations;
pub mod sensor_readings;
pub mod sensors;
pub mod users;
pub mod yield_predictions;

/// GET /api
pub async fn welcome() -> ResponseJson<MessageResponse> {
    ResponseJson(MessageResponse::new("Welcome to Maize Yield Tool API"))
}

/// GET /api/v1
pub async fn welcome_v1() -> ResponseJson<MessageResponse> {
    ResponseJson(MessageResponse::new(
        "Maize Yield Tool API v1 - Ready to serve your requests",
    ))
}

pub fn router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(welcome))
        .route("/v1", get(welcome_v1))
        .merge(auth::router(state))
        .merge(users::router(state))
        .merge(products::router(state))
        .merge(farmers::router(state))
        .merge(fields::router(state))
        .merge(sensors::router(state))
        .merge(sensor_readings::router(state))
        .merge(yield_predictions::router(state))
        .merge(recommendations::router(state))
        .merge(historical_yields::router(state))
}
