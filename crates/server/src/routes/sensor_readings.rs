use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::Json as ResponseJson,
    routing::get,
};
use db::models::sensor_reading::SensorReading;
use services::services::sensor_reading::{
    NOT_FOUND, SensorReadingPayload, SensorReadingQuery, SensorReadingService,
};

use crate::{
    AppState,
    error::ApiError,
    extract::{AppJson, AppQuery, parse_id},
};

/// GET /api/sensor-readings?sensor_id=&from=&to=
pub async fn list_readings(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<SensorReadingQuery>,
) -> Result<ResponseJson<Vec<SensorReading>>, ApiError> {
    Ok(ResponseJson(SensorReadingService::list(state.pool(), query).await?))
}

/// POST /api/sensor-readings
pub async fn create_reading(
    State(state): State<AppState>,
    AppJson(payload): AppJson<SensorReadingPayload>,
) -> Result<(StatusCode, ResponseJson<SensorReading>), ApiError> {
    let reading = SensorReadingService::create(state.pool(), payload).await?;
    Ok((StatusCode::CREATED, ResponseJson(reading)))
}

/// GET /api/sensor-readings/{reading_id}
pub async fn get_reading(
    State(state): State<AppState>,
    Path(reading_id): Path<String>,
) -> Result<ResponseJson<SensorReading>, ApiError> {
    let reading_id: i64 = parse_id(&reading_id, NOT_FOUND)?;
    Ok(ResponseJson(SensorReadingService::find(state.pool(), reading_id).await?))
}

/// PUT/PATCH /api/sensor-readings/{reading_id}
pub async fn update_reading(
    State(state): State<AppState>,
    Path(reading_id): Path<String>,
    AppJson(payload): AppJson<SensorReadingPayload>,
) -> Result<ResponseJson<SensorReading>, ApiError> {
    let reading_id: i64 = parse_id(&reading_id, NOT_FOUND)?;
    let reading = SensorReadingService::update(state.pool(), reading_id, payload).await?;
    Ok(ResponseJson(reading))
}

/// DELETE /api/sensor-readings/{reading_id}
pub async fn delete_reading(
    State(state): State<AppState>,
    Path(reading_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let reading_id: i64 = parse_id(&reading_id, NOT_FOUND)?;
    SensorReadingService::delete(state.pool(), reading_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router(_state: &AppState) -> Router<AppState> {
    Router::new().nest(
        "/sensor-readings",
        Router::new()
            .route("/", get(list_readings).post(create_reading))
            .route(
                "/{reading_id}",
                get(get_reading)
                    .put(update_reading)
                    .patch(update_reading)
                    .delete(delete_reading),
            ),
    )
}
