use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::{AppState, error::ApiError};

/// Resolve the bearer token and attach the caller's `UserIdentity` to the request.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let authorization = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);

    let identity = state
        .authenticator
        .authenticate(authorization.as_deref())
        .await?;
    tracing::debug!(user_id = identity.user_id, "Authenticated request");

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}
