use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::Json as ResponseJson,
    routing::get,
};
use db::models::recommendation::Recommendation;
use services::services::recommendation::{
    NOT_FOUND, RecommendationPayload, RecommendationQuery, RecommendationService,
};

use crate::{
    AppState,
    error::ApiError,
    extract::{AppJson, AppQuery, parse_id},
};

/// GET /api/recommendations?field_id=
pub async fn list_recommendations(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<RecommendationQuery>,
) -> Result<ResponseJson<Vec<Recommendation>>, ApiError> {
    Ok(ResponseJson(RecommendationService::list(state.pool(), &query).await?))
}

/// POST /api/recommendations
pub async fn create_recommendation(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RecommendationPayload>,
) -> Result<(StatusCode, ResponseJson<Recommendation>), ApiError> {
    let recommendation = RecommendationService::create(state.pool(), payload).await?;
    Ok((StatusCode::CREATED, ResponseJson(recommendation)))
}

/// GET /api/recommendations/{rec_id}
pub async fn get_recommendation(
    State(state): State<AppState>,
    Path(rec_id): Path<String>,
) -> Result<ResponseJson<Recommendation>, ApiError> {
    let rec_id: i64 = parse_id(&rec_id, NOT_FOUND)?;
    Ok(ResponseJson(RecommendationService::find(state.pool(), rec_id).await?))
}

/// PUT/PATCH /api/recommendations/{rec_id}
pub async fn update_recommendation(
    State(state): State<AppState>,
    Path(rec_id): Path<String>,
    AppJson(payload): AppJson<RecommendationPayload>,
) -> Result<ResponseJson<Recommendation>, ApiError> {
    let rec_id: i64 = parse_id(&rec_id, NOT_FOUND)?;
    let recommendation = RecommendationService::update(state.pool(), rec_id, payload).await?;
    Ok(ResponseJson(recommendation))
}

/// DELETE /api/recommendations/{rec_id}
pub async fn delete_recommendation(
    State(state): State<AppState>,
    Path(rec_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let rec_id: i64 = parse_id(&rec_id, NOT_FOUND)?;
    RecommendationService::delete(state.pool(), rec_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router(_state: &AppState) -> Router<AppState> {
    Router::new().nest(
        "/recommendations",
        Router::new()
            .route("/", get(list_recommendations).post(create_recommendation))
            .route(
                "/{rec_id}",
                get(get_recommendation)
                    .put(update_recommendation)
                    .patch(update_recommendation)
                    .delete(delete_recommendation),
            ),
    )
}
