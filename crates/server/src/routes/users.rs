use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    middleware::from_fn_with_state,
    response::Json as ResponseJson,
    routing::get,
};
use db::models::user::User;
use services::services::user::{NOT_FOUND, UserPayload, UserService};

use crate::{
    AppState,
    error::ApiError,
    extract::{AppJson, parse_id},
    middleware::auth::require_auth,
};

/// GET /api/users
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<ResponseJson<Vec<User>>, ApiError> {
    Ok(ResponseJson(UserService::list(state.pool()).await?))
}

/// POST /api/users
pub async fn create_user(
    State(state): State<AppState>,
    AppJson(payload): AppJson<UserPayload>,
) -> Result<(StatusCode, ResponseJson<User>), ApiError> {
    let user = UserService::create(state.pool(), &state.hasher, payload).await?;
    Ok((StatusCode::CREATED, ResponseJson(user)))
}

/// GET /api/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ResponseJson<User>, ApiError> {
    let id: i64 = parse_id(&id, NOT_FOUND)?;
    Ok(ResponseJson(UserService::find(state.pool(), id).await?))
}

/// PUT/PATCH /api/users/{id}
/// A supplied password is re-hashed
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<UserPayload>,
) -> Result<ResponseJson<User>, ApiError> {
    let id: i64 = parse_id(&id, NOT_FOUND)?;
    let user = UserService::update(state.pool(), &state.hasher, id, payload).await?;
    Ok(ResponseJson(user))
}

/// DELETE /api/users/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id: i64 = parse_id(&id, NOT_FOUND)?;
    UserService::delete(state.pool(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router(state: &AppState) -> Router<AppState> {
    Router::new().nest(
        "/users",
        Router::new()
            .route("/", get(list_users).post(create_user))
            .route(
                "/{id}",
                get(get_user)
                    .put(update_user)
                    .patch(update_user)
                    .delete(delete_user),
            )
            .route_layer(from_fn_with_state(state.clone(), require_auth)),
    )
}
