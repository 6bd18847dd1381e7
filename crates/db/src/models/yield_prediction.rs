use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;
use uuid::Uuid;

/// Yield estimate for a field. The value comes from an external model and is stored as given.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct YieldPrediction {
    pub prediction_id: i64,
    pub field_id: Uuid,
    pub model_version: String,
    pub prediction_date: NaiveDate,
    pub predicted_yield_t_ha: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateYieldPrediction {
    pub field_id: Uuid,
    pub model_version: String,
    pub prediction_date: NaiveDate,
    pub predicted_yield_t_ha: f64,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateYieldPrediction {
    pub field_id: Option<Uuid>,
    pub model_version: Option<String>,
    pub prediction_date: Option<NaiveDate>,
    pub predicted_yield_t_ha: Option<f64>,
}

impl YieldPrediction {
    pub async fn find_all(
        pool: &SqlitePool,
        field_id: Option<Uuid>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, YieldPrediction>(
            r#"SELECT prediction_id, field_id, model_version, prediction_date, predicted_yield_t_ha, created_at, updated_at
               FROM yield_predictions
               WHERE $1 IS NULL OR field_id = $1
               ORDER BY prediction_id ASC"#,
        )
        .bind(field_id)
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, YieldPrediction>(
            r#"SELECT prediction_id, field_id, model_version, prediction_date, predicted_yield_t_ha, created_at, updated_at
               FROM yield_predictions
               WHERE prediction_id = $1"#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn create(
        pool: &SqlitePool,
        data: &CreateYieldPrediction,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, YieldPrediction>(
            r#"INSERT INTO yield_predictions (field_id, model_version, prediction_date, predicted_yield_t_ha)
               VALUES ($1, $2, $3, $4)
               RETURNING prediction_id, field_id, model_version, prediction_date, predicted_yield_t_ha, created_at, updated_at"#,
        )
        .bind(data.field_id)
        .bind(&data.model_version)
        .bind(data.prediction_date)
        .bind(data.predicted_yield_t_ha)
        .fetch_one(pool)
        .await
    }

    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        data: &UpdateYieldPrediction,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, YieldPrediction>(
            r#"UPDATE yield_predictions
               SET field_id             = COALESCE($2, field_id),
                   model_version        = COALESCE($3, model_version),
                   prediction_date      = COALESCE($4, prediction_date),
                   predicted_yield_t_ha = COALESCE($5, predicted_yield_t_ha),
                   updated_at           = datetime('now', 'subsec')
               WHERE prediction_id = $1
               RETURNING prediction_id, field_id, model_version, prediction_date, predicted_yield_t_ha, created_at, updated_at"#,
        )
        .bind(id)
        .bind(data.field_id)
        .bind(&data.model_version)
        .bind(data.prediction_date)
        .bind(data.predicted_yield_t_ha)
        .fetch_one(pool)
        .await
    }

    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM yield_predictions WHERE prediction_id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
