use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;
use uuid::Uuid;

/// Agronomic advice issued for a field
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Recommendation {
    pub rec_id: i64,
    pub field_id: Uuid,
    pub recommendation_date: NaiveDate,
    pub recommendation_type: Option<String>,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateRecommendation {
    pub field_id: Uuid,
    pub recommendation_date: NaiveDate,
    pub recommendation_type: String,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateRecommendation {
    pub field_id: Option<Uuid>,
    pub recommendation_date: Option<NaiveDate>,
    pub recommendation_type: Option<String>,
    pub message: Option<String>,
}

impl Recommendation {
    pub async fn find_all(
        pool: &SqlitePool,
        field_id: Option<Uuid>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Recommendation>(
            r#"SELECT rec_id, field_id, recommendation_date, recommendation_type, message, created_at, updated_at
               FROM recommendations
               WHERE $1 IS NULL OR field_id = $1
               ORDER BY rec_id ASC"#,
        )
        .bind(field_id)
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Recommendation>(
            r#"SELECT rec_id, field_id, recommendation_date, recommendation_type, message, created_at, updated_at
               FROM recommendations
               WHERE rec_id = $1"#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn create(
        pool: &SqlitePool,
        data: &CreateRecommendation,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Recommendation>(
            r#"INSERT INTO recommendations (field_id, recommendation_date, recommendation_type, message)
               VALUES ($1, $2, $3, $4)
               RETURNING rec_id, field_id, recommendation_date, recommendation_type, message, created_at, updated_at"#,
        )
        .bind(data.field_id)
        .bind(data.recommendation_date)
        .bind(&data.recommendation_type)
        .bind(&data.message)
        .fetch_one(pool)
        .await
    }

    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        data: &UpdateRecommendation,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Recommendation>(
            r#"UPDATE recommendations
               SET field_id            = COALESCE($2, field_id),
                   recommendation_date = COALESCE($3, recommendation_date),
                   recommendation_type = COALESCE($4, recommendation_type),
                   message             = COALESCE($5, message),
                   updated_at          = datetime('now', 'subsec')
               WHERE rec_id = $1
               RETURNING rec_id, field_id, recommendation_date, recommendation_type, message, created_at, updated_at"#,
        )
        .bind(id)
        .bind(data.field_id)
        .bind(data.recommendation_date)
        .bind(&data.recommendation_type)
        .bind(&data.message)
        .fetch_one(pool)
        .await
    }

    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM recommendations WHERE rec_id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
