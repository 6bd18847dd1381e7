use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::Json as ResponseJson,
    routing::get,
};
use db::models::sensor::Sensor;
use services::services::sensor::{NOT_FOUND, SensorPayload, SensorQuery, SensorService};
use uuid::Uuid;

use crate::{
    AppState,
    error::ApiError,
    extract::{AppJson, AppQuery, parse_id},
};

/// GET /api/sensors?field_id=
pub async fn list_sensors(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<SensorQuery>,
) -> Result<ResponseJson<Vec<Sensor>>, ApiError> {
    Ok(ResponseJson(SensorService::list(state.pool(), &query).await?))
}

/// POST /api/sensors
pub async fn create_sensor(
    State(state): State<AppState>,
    AppJson(payload): AppJson<SensorPayload>,
) -> Result<(StatusCode, ResponseJson<Sensor>), ApiError> {
    let sensor = SensorService::create(state.pool(), payload).await?;
    Ok((StatusCode::CREATED, ResponseJson(sensor)))
}

/// GET /api/sensors/{sensor_id}
pub async fn get_sensor(
    State(state): State<AppState>,
    Path(sensor_id): Path<String>,
) -> Result<ResponseJson<Sensor>, ApiError> {
    let sensor_id: Uuid = parse_id(&sensor_id, NOT_FOUND)?;
    Ok(ResponseJson(SensorService::find(state.pool(), sensor_id).await?))
}

/// PUT/PATCH /api/sensors/{sensor_id}
pub async fn update_sensor(
    State(state): State<AppState>,
    Path(sensor_id): Path<String>,
    AppJson(payload): AppJson<SensorPayload>,
) -> Result<ResponseJson<Sensor>, ApiError> {
    let sensor_id: Uuid = parse_id(&sensor_id, NOT_FOUND)?;
    let sensor = SensorService::update(state.pool(), sensor_id, payload).await?;
    Ok(ResponseJson(sensor))
}

/// DELETE /api/sensors/{sensor_id}
/// Readings of the sensor go with it
pub async fn delete_sensor(
    State(state): State<AppState>,
    Path(sensor_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let sensor_id: Uuid = parse_id(&sensor_id, NOT_FOUND)?;
    SensorService::delete(state.pool(), sensor_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router(_state: &AppState) -> Router<AppState> {
    Router::new().nest(
        "/sensors",
        Router::new()
            .route("/", get(list_sensors).post(create_sensor))
            .route(
                "/{sensor_id}",
                get(get_sensor)
                    .put(update_sensor)
                    .patch(update_sensor)
                    .delete(delete_sensor),
            ),
    )
}
