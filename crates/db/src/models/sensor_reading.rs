use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct SensorReading {
    pub reading_id: i64,
    pub sensor_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub value: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateSensorReading {
    pub sensor_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateSensorReading {
    pub sensor_id: Option<Uuid>,
    pub timestamp: Option<DateTime<Utc>>,
    pub value: Option<f64>,
}

/// Narrows a reading listing; unset bounds are open.
#[derive(Debug, Clone, Default)]
pub struct ReadingFilter {
    pub sensor_id: Option<Uuid>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl SensorReading {
    /// Readings in chronological order (served by the (sensor_id, timestamp) index)
    pub async fn find_all(
        pool: &SqlitePool,
        filter: &ReadingFilter,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, SensorReading>(
            r#"SELECT reading_id, sensor_id, timestamp, value, created_at, updated_at
               FROM sensor_readings
               WHERE ($1 IS NULL OR sensor_id = $1)
                 AND ($2 IS NULL OR timestamp >= $2)
                 AND ($3 IS NULL OR timestamp <= $3)
               ORDER BY timestamp ASC, reading_id ASC"#,
        )
        .bind(filter.sensor_id)
        .bind(filter.from)
        .bind(filter.to)
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, SensorReading>(
            r#"SELECT reading_id, sensor_id, timestamp, value, created_at, updated_at
               FROM sensor_readings
               WHERE reading_id = $1"#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn create(
        pool: &SqlitePool,
        data: &CreateSensorReading,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, SensorReading>(
            r#"INSERT INTO sensor_readings (sensor_id, timestamp, value)
               VALUES ($1, $2, $3)
               RETURNING reading_id, sensor_id, timestamp, value, created_at, updated_at"#,
        )
        .bind(data.sensor_id)
        .bind(data.timestamp)
        .bind(data.value)
        .fetch_one(pool)
        .await
    }

    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        data: &UpdateSensorReading,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, SensorReading>(
            r#"UPDATE sensor_readings
               SET sensor_id  = COALESCE($2, sensor_id),
                   timestamp  = COALESCE($3, timestamp),
                   value      = COALESCE($4, value),
                   updated_at = datetime('now', 'subsec')
               WHERE reading_id = $1
               RETURNING reading_id, sensor_id, timestamp, value, created_at, updated_at"#,
        )
        .bind(id)
        .bind(data.sensor_id)
        .bind(data.timestamp)
        .bind(data.value)
        .fetch_one(pool)
        .await
    }

    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sensor_readings WHERE reading_id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
