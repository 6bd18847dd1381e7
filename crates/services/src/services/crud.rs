//! Error type shared by the per-entity services.

use thiserror::Error;

use super::{auth::PasswordError, validation::ValidationErrors};

#[derive(Debug, Error)]
pub enum CrudError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("{0}")]
    NotFound(&'static str),
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error(transparent)]
    Password(#[from] PasswordError),
}

impl CrudError {
    /// Classify a failed write. The row vanishing between lookup and write is a 404;
    /// a constraint that validation could not see (a concurrent insert or delete) is
    /// reported against `field`.
    pub fn from_write(err: sqlx::Error, not_found: &'static str, field: &str) -> Self {
        if matches!(err, sqlx::Error::RowNotFound) {
            return CrudError::NotFound(not_found);
        }
        if db::is_constraint_violation(&err) {
            return CrudError::Validation(ValidationErrors::single(
                field,
                format!(
                    "The {} conflicts with existing data.",
                    super::validation::label(field)
                ),
            ));
        }
        CrudError::Database(err)
    }
}

/// Turn a lookup result into the row or a 404.
pub fn found<T>(row: Option<T>, not_found: &'static str) -> Result<T, CrudError> {
    row.ok_or(CrudError::NotFound(not_found))
}

/// Turn a delete's affected-row count into `()` or a 404.
pub fn deleted(rows: u64, not_found: &'static str) -> Result<(), CrudError> {
    if rows == 0 {
        Err(CrudError::NotFound(not_found))
    } else {
        Ok(())
    }
}
