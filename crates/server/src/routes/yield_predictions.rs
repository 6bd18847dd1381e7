use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::Json as ResponseJson,
    routing::get,
};
use db::models::yield_prediction::YieldPrediction;
use services::services::yield_prediction::{
    NOT_FOUND, YieldPredictionPayload, YieldPredictionQuery, YieldPredictionService,
};

use crate::{
    AppState,
    error::ApiError,
    extract::{AppJson, AppQuery, parse_id},
};

/// GET /api/yield-predictions?field_id=
pub async fn list_yield_predictions(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<YieldPredictionQuery>,
) -> Result<ResponseJson<Vec<YieldPrediction>>, ApiError> {
    Ok(ResponseJson(YieldPredictionService::list(state.pool(), &query).await?))
}

/// POST /api/yield-predictions
pub async fn create_yield_prediction(
    State(state): State<AppState>,
    AppJson(payload): AppJson<YieldPredictionPayload>,
) -> Result<(StatusCode, ResponseJson<YieldPrediction>), ApiError> {
    let yield_prediction = YieldPredictionService::create(state.pool(), payload).await?;
    Ok((StatusCode::CREATED, ResponseJson(yield_prediction)))
}

/// GET /api/yield-predictions/{prediction_id}
pub async fn get_yield_prediction(
    State(state): State<AppState>,
    Path(prediction_id): Path<String>,
) -> Result<ResponseJson<YieldPrediction>, ApiError> {
    let prediction_id: i64 = parse_id(&prediction_id, NOT_FOUND)?;
    Ok(ResponseJson(YieldPredictionService::find(state.pool(), prediction_id).await?))
}

/// PUT/PATCH /api/yield-predictions/{prediction_id}
pub async fn update_yield_prediction(
    State(state): State<AppState>,
    Path(prediction_id): Path<String>,
    AppJson(payload): AppJson<YieldPredictionPayload>,
) -> Result<ResponseJson<YieldPrediction>, ApiError> {
    let prediction_id: i64 = parse_id(&prediction_id, NOT_FOUND)?;
    let yield_prediction = YieldPredictionService::update(state.pool(), prediction_id, payload).await?;
    Ok(ResponseJson(yield_prediction))
}

/// DELETE /api/yield-predictions/{prediction_id}
pub async fn delete_yield_prediction(
    State(state): State<AppState>,
    Path(prediction_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let prediction_id: i64 = parse_id(&prediction_id, NOT_FOUND)?;
    YieldPredictionService::delete(state.pool(), prediction_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router(_state: &AppState) -> Router<AppState> {
    Router::new().nest(
        "/yield-predictions",
        Router::new()
            .route("/", get(list_yield_predictions).post(create_yield_prediction))
            .route(
                "/{prediction_id}",
                get(get_yield_prediction)
                    .put(update_yield_prediction)
                    .patch(update_yield_prediction)
                    .delete(delete_yield_prediction),
            ),
    )
}
