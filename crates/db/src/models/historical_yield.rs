use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;

/// Recorded yield for a region or field in a given year. Not linked to any other table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct HistoricalYield {
    pub hist_id: i64,
    pub region_or_field: String,
    pub year: i32,
    pub yield_t_ha: f64,
    pub source: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateHistoricalYield {
    pub region_or_field: String,
    pub year: i32,
    pub yield_t_ha: f64,
    pub source: String,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateHistoricalYield {
    pub region_or_field: Option<String>,
    pub year: Option<i32>,
    pub yield_t_ha: Option<f64>,
    pub source: Option<String>,
}

impl HistoricalYield {
    pub async fn find_all(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, HistoricalYield>(
            r#"SELECT hist_id, region_or_field, year, yield_t_ha, source, created_at, updated_at
               FROM historical_yields
               ORDER BY hist_id ASC"#,
        )
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, HistoricalYield>(
            r#"SELECT hist_id, region_or_field, year, yield_t_ha, source, created_at, updated_at
               FROM historical_yields
               WHERE hist_id = $1"#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn create(
        pool: &SqlitePool,
        data: &CreateHistoricalYield,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, HistoricalYield>(
            r#"INSERT INTO historical_yields (region_or_field, year, yield_t_ha, source)
               VALUES ($1, $2, $3, $4)
               RETURNING hist_id, region_or_field, year, yield_t_ha, source, created_at, updated_at"#,
        )
        .bind(&data.region_or_field)
        .bind(data.year)
        .bind(data.yield_t_ha)
        .bind(&data.source)
        .fetch_one(pool)
        .await
    }

    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        data: &UpdateHistoricalYield,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, HistoricalYield>(
            r#"UPDATE historical_yields
               SET region_or_field = COALESCE($2, region_or_field),
                   year            = COALESCE($3, year),
                   yield_t_ha      = COALESCE($4, yield_t_ha),
                   source          = COALESCE($5, source),
                   updated_at      = datetime('now', 'subsec')
               WHERE hist_id = $1
               RETURNING hist_id, region_or_field, year, yield_t_ha, source, created_at, updated_at"#,
        )
        .bind(id)
        .bind(&data.region_or_field)
        .bind(data.year)
        .bind(data.yield_t_ha)
        .bind(&data.source)
        .fetch_one(pool)
        .await
    }

    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM historical_yields WHERE hist_id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
