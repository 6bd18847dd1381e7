use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;
use uuid::Uuid;

/// A plot of land belonging to a farmer
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Field {
    pub field_id: Uuid,
    pub farmer_id: Uuid, // Foreign key to Farmer
    pub name: String,
    pub area_ha: f64,
    pub soil_type: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateField {
    pub farmer_id: Uuid,
    pub name: String,
    pub area_ha: f64,
    pub soil_type: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateField {
    pub farmer_id: Option<Uuid>,
    pub name: Option<String>,
    pub area_ha: Option<f64>,
    pub soil_type: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Field {
    /// All fields, optionally only those of one farmer
    pub async fn find_all(
        pool: &SqlitePool,
        farmer_id: Option<Uuid>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Field>(
            r#"SELECT field_id, farmer_id, name, area_ha, soil_type, latitude, longitude, created_at, updated_at
               FROM fields
               WHERE $1 IS NULL OR farmer_id = $1
               ORDER BY created_at ASC"#,
        )
        .bind(farmer_id)
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Field>(
            r#"SELECT field_id, farmer_id, name, area_ha, soil_type, latitude, longitude, created_at, updated_at
               FROM fields
               WHERE field_id = $1"#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn exists(pool: &SqlitePool, id: Uuid) -> Result<bool, sqlx::Error> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM fields WHERE field_id = $1")
            .bind(id)
            .fetch_one(pool)
            .await?;
        Ok(count > 0)
    }

    pub async fn create(
        pool: &SqlitePool,
        data: &CreateField,
        field_id: Uuid,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Field>(
            r#"INSERT INTO fields (field_id, farmer_id, name, area_ha, soil_type, latitude, longitude)
               VALUES ($1, $2, $3, $4, $5, $6, $7)
               RETURNING field_id, farmer_id, name, area_ha, soil_type, latitude, longitude, created_at, updated_at"#,
        )
        .bind(field_id)
        .bind(data.farmer_id)
        .bind(&data.name)
        .bind(data.area_ha)
        .bind(&data.soil_type)
        .bind(data.latitude)
        .bind(data.longitude)
        .fetch_one(pool)
        .await
    }

    pub async fn update(
        pool: &SqlitePool,
        id: Uuid,
        data: &UpdateField,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Field>(
            r#"UPDATE fields
               SET farmer_id  = COALESCE($2, farmer_id),
                   name       = COALESCE($3, name),
                   area_ha    = COALESCE($4, area_ha),
                   soil_type  = COALESCE($5, soil_type),
                   latitude   = COALESCE($6, latitude),
                   longitude  = COALESCE($7, longitude),
                   updated_at = datetime('now', 'subsec')
               WHERE field_id = $1
               RETURNING field_id, farmer_id, name, area_ha, soil_type, latitude, longitude, created_at, updated_at"#,
        )
        .bind(id)
        .bind(data.farmer_id)
        .bind(&data.name)
        .bind(data.area_ha)
        .bind(&data.soil_type)
        .bind(data.latitude)
        .bind(data.longitude)
        .fetch_one(pool)
        .await
    }

    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM fields WHERE field_id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
