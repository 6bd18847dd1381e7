use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Json as ResponseJson, Response},
};
use serde::Serialize;
use services::services::{auth::AuthError, crud::CrudError, validation::ValidationErrors};
use thiserror::Error;
use utils::response::MessageResponse;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Crud(#[from] CrudError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Json(#[from] JsonRejection),
    #[error(transparent)]
    Query(#[from] QueryRejection),
    /// Path id that could not be parsed; such a row cannot exist.
    #[error("{0}")]
    NotFound(&'static str),
}

#[derive(Debug, Serialize)]
struct ValidationBody<'a> {
    message: String,
    errors: &'a ValidationErrors,
}

fn message(status: StatusCode, text: impl Into<String>) -> Response {
    (status, ResponseJson(MessageResponse::new(text))).into_response()
}

fn unprocessable(errors: &ValidationErrors) -> Response {
    let body = ValidationBody {
        message: errors.summary(),
        errors,
    };
    (StatusCode::UNPROCESSABLE_ENTITY, ResponseJson(body)).into_response()
}

fn server_error(err: &dyn std::error::Error) -> Response {
    tracing::error!(error = %err, "Request failed");
    message(StatusCode::INTERNAL_SERVER_ERROR, "Server Error")
}

fn crud_response(err: &CrudError) -> Response {
    match err {
        CrudError::NotFound(text) => message(StatusCode::NOT_FOUND, *text),
        CrudError::Validation(errors) => unprocessable(errors),
        CrudError::Database(_) | CrudError::Password(_) => server_error(err),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Crud(err) => crud_response(err),
            ApiError::Auth(err) => match err {
                AuthError::Unauthenticated | AuthError::InvalidCredentials => {
                    message(StatusCode::UNAUTHORIZED, err.to_string())
                }
                AuthError::Validation(errors) => unprocessable(errors),
                AuthError::Crud(err) => crud_response(err),
                AuthError::Database(_) | AuthError::Password(_) | AuthError::Token(_) => {
                    server_error(err)
                }
            },
            ApiError::Json(rejection) => message(rejection.status(), rejection.body_text()),
            ApiError::Query(rejection) => message(rejection.status(), rejection.body_text()),
            ApiError::NotFound(text) => message(StatusCode::NOT_FOUND, *text),
        }
    }
}
