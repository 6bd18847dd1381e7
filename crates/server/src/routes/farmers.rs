use axum::{
    Extension, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware::from_fn_with_state,
    response::Json as ResponseJson,
    routing::get,
};
use db::models::farmer::Farmer;
use services::services::{
    auth::UserIdentity,
    farmer::{FarmerPayload, FarmerService, NOT_FOUND},
};
use uuid::Uuid;

use crate::{
    AppState,
    error::ApiError,
    extract::{AppJson, parse_id},
    middleware::auth::require_auth,
};

/// GET /api/farmers
/// Only the caller's own farmers
pub async fn list_farmers(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> Result<ResponseJson<Vec<Farmer>>, ApiError> {
    Ok(ResponseJson(
        FarmerService::list(state.pool(), user.user_id).await?,
    ))
}

/// POST /api/farmers
pub async fn create_farmer(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    AppJson(payload): AppJson<FarmerPayload>,
) -> Result<(StatusCode, ResponseJson<Farmer>), ApiError> {
    let farmer = FarmerService::create(state.pool(), user.user_id, payload).await?;
    Ok((StatusCode::CREATED, ResponseJson(farmer)))
}

/// GET /api/farmers/{farmer_id}
pub async fn get_farmer(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(farmer_id): Path<String>,
) -> Result<ResponseJson<Farmer>, ApiError> {
    let farmer_id: Uuid = parse_id(&farmer_id, NOT_FOUND)?;
    let farmer = FarmerService::find(state.pool(), farmer_id, user.user_id).await?;
    Ok(ResponseJson(farmer))
}

/// PUT/PATCH /api/farmers/{farmer_id}
pub async fn update_farmer(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(farmer_id): Path<String>,
    AppJson(payload): AppJson<FarmerPayload>,
) -> Result<ResponseJson<Farmer>, ApiError> {
    let farmer_id: Uuid = parse_id(&farmer_id, NOT_FOUND)?;
    let farmer = FarmerService::update(state.pool(), farmer_id, user.user_id, payload).await?;
    Ok(ResponseJson(farmer))
}

/// DELETE /api/farmers/{farmer_id}
/// Cascades to the farmer's fields and everything recorded against them
pub async fn delete_farmer(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(farmer_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let farmer_id: Uuid = parse_id(&farmer_id, NOT_FOUND)?;
    FarmerService::delete(state.pool(), farmer_id, user.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router(state: &AppState) -> Router<AppState> {
    Router::new().nest(
        "/farmers",
        Router::new()
            .route("/", get(list_farmers).post(create_farmer))
            .route(
                "/{farmer_id}",
                get(get_farmer)
                    .put(update_farmer)
                    .patch(update_farmer)
                    .delete(delete_farmer),
            )
            .route_layer(from_fn_with_state(state.clone(), require_auth)),
    )
}
