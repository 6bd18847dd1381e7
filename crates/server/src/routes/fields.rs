use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::Json as ResponseJson,
    routing::get,
};
use db::models::field::Field;
use services::services::field::{FieldPayload, FieldQuery, FieldService, NOT_FOUND};
use uuid::Uuid;

use crate::{
    AppState,
    error::ApiError,
    extract::{AppJson, AppQuery, parse_id},
};

/// GET /api/fields?farmer_id=
pub async fn list_fields(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<FieldQuery>,
) -> Result<ResponseJson<Vec<Field>>, ApiError> {
    Ok(ResponseJson(FieldService::list(state.pool(), &query).await?))
}

/// POST /api/fields
pub async fn create_field(
    State(state): State<AppState>,
    AppJson(payload): AppJson<FieldPayload>,
) -> Result<(StatusCode, ResponseJson<Field>), ApiError> {
    let field = FieldService::create(state.pool(), payload).await?;
    Ok((StatusCode::CREATED, ResponseJson(field)))
}

/// GET /api/fields/{field_id}
pub async fn get_field(
    State(state): State<AppState>,
    Path(field_id): Path<String>,
) -> Result<ResponseJson<Field>, ApiError> {
    let field_id: Uuid = parse_id(&field_id, NOT_FOUND)?;
    Ok(ResponseJson(FieldService::find(state.pool(), field_id).await?))
}

/// PUT/PATCH /api/fields/{field_id}
pub async fn update_field(
    State(state): State<AppState>,
    Path(field_id): Path<String>,
    AppJson(payload): AppJson<FieldPayload>,
) -> Result<ResponseJson<Field>, ApiError> {
    let field_id: Uuid = parse_id(&field_id, NOT_FOUND)?;
    let field = FieldService::update(state.pool(), field_id, payload).await?;
    Ok(ResponseJson(field))
}

/// DELETE /api/fields/{field_id}
/// Sensors, readings, predictions and recommendations of the field go with it
pub async fn delete_field(
    State(state): State<AppState>,
    Path(field_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let field_id: Uuid = parse_id(&field_id, NOT_FOUND)?;
    FieldService::delete(state.pool(), field_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router(_state: &AppState) -> Router<AppState> {
    Router::new().nest(
        "/fields",
        Router::new()
            .route("/", get(list_fields).post(create_field))
            .route(
                "/{field_id}",
                get(get_field)
                    .put(update_field)
                    .patch(update_field)
                    .delete(delete_field),
            ),
    )
}
