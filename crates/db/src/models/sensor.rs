use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Sensor {
    pub sensor_id: Uuid,
    pub field_id: Uuid,
    pub sensor_type: String,
    pub installation_date: Option<NaiveDate>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateSensor {
    pub field_id: Uuid,
    pub sensor_type: String,
    pub installation_date: NaiveDate,
    pub status: String,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateSensor {
    pub field_id: Option<Uuid>,
    pub sensor_type: Option<String>,
    pub installation_date: Option<NaiveDate>,
    pub status: Option<String>,
}

impl Sensor {
    pub async fn find_all(
        pool: &SqlitePool,
        field_id: Option<Uuid>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Sensor>(
            r#"SELECT sensor_id, field_id, sensor_type, installation_date, status, created_at, updated_at
               FROM sensors
               WHERE $1 IS NULL OR field_id = $1
               ORDER BY created_at ASC"#,
        )
        .bind(field_id)
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Sensor>(
            r#"SELECT sensor_id, field_id, sensor_type, installation_date, status, created_at, updated_at
               FROM sensors
               WHERE sensor_id = $1"#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn exists(pool: &SqlitePool, id: Uuid) -> Result<bool, sqlx::Error> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM sensors WHERE sensor_id = $1")
                .bind(id)
                .fetch_one(pool)
                .await?;
        Ok(count > 0)
    }

    pub async fn create(
        pool: &SqlitePool,
        data: &CreateSensor,
        sensor_id: Uuid,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Sensor>(
            r#"INSERT INTO sensors (sensor_id, field_id, sensor_type, installation_date, status)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING sensor_id, field_id, sensor_type, installation_date, status, created_at, updated_at"#,
        )
        .bind(sensor_id)
        .bind(data.field_id)
        .bind(&data.sensor_type)
        .bind(data.installation_date)
        .bind(&data.status)
        .fetch_one(pool)
        .await
    }

    pub async fn update(
        pool: &SqlitePool,
        id: Uuid,
        data: &UpdateSensor,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Sensor>(
            r#"UPDATE sensors
               SET field_id          = COALESCE($2, field_id),
                   sensor_type       = COALESCE($3, sensor_type),
                   installation_date = COALESCE($4, installation_date),
                   status            = COALESCE($5, status),
                   updated_at        = datetime('now', 'subsec')
               WHERE sensor_id = $1
               RETURNING sensor_id, field_id, sensor_type, installation_date, status, created_at, updated_at"#,
        )
        .bind(id)
        .bind(data.field_id)
        .bind(&data.sensor_type)
        .bind(data.installation_date)
        .bind(&data.status)
        .fetch_one(pool)
        .await
    }

    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sensors WHERE sensor_id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
