use axum::{
    Extension, Router,
    extract::State,
    http::StatusCode,
    middleware::from_fn_with_state,
    response::Json as ResponseJson,
    routing::{get, post},
};
use services::services::auth::{
    LoginPayload, RegisterPayload, RegisterResponse, TokenResponse, UserIdentity, UserResponse,
};

use crate::{AppState, error::ApiError, extract::AppJson, middleware::auth::require_auth};

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RegisterPayload>,
) -> Result<(StatusCode, ResponseJson<RegisterResponse>), ApiError> {
    let registered = state.auth.register(payload).await?;
    Ok((StatusCode::CREATED, ResponseJson(registered)))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginPayload>,
) -> Result<ResponseJson<TokenResponse>, ApiError> {
    Ok(ResponseJson(state.auth.login(payload).await?))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> Result<ResponseJson<UserResponse>, ApiError> {
    Ok(ResponseJson(state.auth.me(&user).await?))
}

pub fn router(state: &AppState) -> Router<AppState> {
    Router::new().nest(
        "/auth",
        Router::new()
            .route("/register", post(register))
            .route("/login", post(login))
            .route(
                "/me",
                get(me).route_layer(from_fn_with_state(state.clone(), require_auth)),
            ),
    )
}
