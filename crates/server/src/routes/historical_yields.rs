use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::Json as ResponseJson,
    routing::get,
};
use db::models::historical_yield::HistoricalYield;
use services::services::historical_yield::{
    HistoricalYieldPayload, HistoricalYieldService, NOT_FOUND,
};

use crate::{
    AppState,
    error::ApiError,
    extract::{AppJson, parse_id},
};

/// GET /api/historical-yields
pub async fn list_historical_yields(
    State(state): State<AppState>,
) -> Result<ResponseJson<Vec<HistoricalYield>>, ApiError> {
    Ok(ResponseJson(HistoricalYieldService::list(state.pool()).await?))
}

/// POST /api/historical-yields
pub async fn create_historical_yield(
    State(state): State<AppState>,
    AppJson(payload): AppJson<HistoricalYieldPayload>,
) -> Result<(StatusCode, ResponseJson<HistoricalYield>), ApiError> {
    let record = HistoricalYieldService::create(state.pool(), payload).await?;
    Ok((StatusCode::CREATED, ResponseJson(record)))
}

/// GET /api/historical-yields/{hist_id}
pub async fn get_historical_yield(
    State(state): State<AppState>,
    Path(hist_id): Path<String>,
) -> Result<ResponseJson<HistoricalYield>, ApiError> {
    let hist_id: i64 = parse_id(&hist_id, NOT_FOUND)?;
    Ok(ResponseJson(
        HistoricalYieldService::find(state.pool(), hist_id).await?,
    ))
}

/// PUT/PATCH /api/historical-yields/{hist_id}
pub async fn update_historical_yield(
    State(state): State<AppState>,
    Path(hist_id): Path<String>,
    AppJson(payload): AppJson<HistoricalYieldPayload>,
) -> Result<ResponseJson<HistoricalYield>, ApiError> {
    let hist_id: i64 = parse_id(&hist_id, NOT_FOUND)?;
    let record = HistoricalYieldService::update(state.pool(), hist_id, payload).await?;
    Ok(ResponseJson(record))
}

/// DELETE /api/historical-yields/{hist_id}
pub async fn delete_historical_yield(
    State(state): State<AppState>,
    Path(hist_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let hist_id: i64 = parse_id(&hist_id, NOT_FOUND)?;
    HistoricalYieldService::delete(state.pool(), hist_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router(_state: &AppState) -> Router<AppState> {
    Router::new().nest(
        "/historical-yields",
        Router::new()
            .route("/", get(list_historical_yields).post(create_historical_yield))
            .route(
                "/{hist_id}",
                get(get_historical_yield)
                    .put(update_historical_yield)
                    .patch(update_historical_yield)
                    .delete(delete_historical_yield),
            ),
    )
}
