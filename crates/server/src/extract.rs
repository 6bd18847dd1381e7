//! `Json` and `Query` whose rejections render as [`ApiError`] bodies.

use std::str::FromStr;

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::ApiError;

#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct AppJson<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct AppQuery<T>(pub T);

/// Parse a path id. An id that does not parse names no row, so it is a 404.
pub fn parse_id<T: FromStr>(raw: &str, not_found: &'static str) -> Result<T, ApiError> {
    raw.parse().map_err(|_| ApiError::NotFound(not_found))
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    #[test]
    fn test_parse_id() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id::<Uuid>(&id.to_string(), "Field not found").unwrap(), id);
        assert_eq!(parse_id::<i64>("42", "Sensor reading not found").unwrap(), 42);
        assert!(matches!(
            parse_id::<i64>("abc", "Sensor reading not found"),
            Err(ApiError::NotFound("Sensor reading not found"))
        ));
        assert!(parse_id::<Uuid>("not-a-uuid", "Field not found").is_err());
    }
}
