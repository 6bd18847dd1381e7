use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Farmer {
    pub farmer_id: Uuid,
    pub user_id: Option<i64>, // Owning account
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub region: Option<String>,
    pub registered_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateFarmer {
    pub user_id: Option<i64>,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub region: String,
    pub registered_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateFarmer {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub region: Option<String>,
    pub registered_at: Option<DateTime<Utc>>,
}

impl Farmer {
    pub async fn find_by_user_id(
        pool: &SqlitePool,
        user_id: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Farmer>(
            r#"SELECT farmer_id, user_id, name, email, phone, region, registered_at, created_at, updated_at
               FROM farmers
               WHERE user_id = $1
               ORDER BY created_at ASC"#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Farmer>(
            r#"SELECT farmer_id, user_id, name, email, phone, region, registered_at, created_at, updated_at
               FROM farmers
               WHERE farmer_id = $1"#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Look up a farmer only if it belongs to `user_id`
    pub async fn find_by_id_for_user(
        pool: &SqlitePool,
        id: Uuid,
        user_id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Farmer>(
            r#"SELECT farmer_id, user_id, name, email, phone, region, registered_at, created_at, updated_at
               FROM farmers
               WHERE farmer_id = $1 AND user_id = $2"#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    pub async fn exists(pool: &SqlitePool, id: Uuid) -> Result<bool, sqlx::Error> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM farmers WHERE farmer_id = $1")
                .bind(id)
                .fetch_one(pool)
                .await?;
        Ok(count > 0)
    }

    /// Whether another farmer already uses `email`. `except` excludes the farmer being updated.
    pub async fn email_taken(
        pool: &SqlitePool,
        email: &str,
        except: Option<Uuid>,
    ) -> Result<bool, sqlx::Error> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM farmers WHERE email = $1 AND ($2 IS NULL OR farmer_id != $2)",
        )
        .bind(email)
        .bind(except)
        .fetch_one(pool)
        .await?;
        Ok(count > 0)
    }

    pub async fn create(
        pool: &SqlitePool,
        data: &CreateFarmer,
        farmer_id: Uuid,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Farmer>(
            r#"INSERT INTO farmers (farmer_id, user_id, name, email, phone, region, registered_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7)
               RETURNING farmer_id, user_id, name, email, phone, region, registered_at, created_at, updated_at"#,
        )
        .bind(farmer_id)
        .bind(data.user_id)
        .bind(&data.name)
        .bind(&data.email)
        .bind(&data.phone)
        .bind(&data.region)
        .bind(data.registered_at)
        .fetch_one(pool)
        .await
    }

    pub async fn update(
        pool: &SqlitePool,
        id: Uuid,
        data: &UpdateFarmer,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Farmer>(
            r#"UPDATE farmers
               SET name          = COALESCE($2, name),
                   email         = COALESCE($3, email),
                   phone         = COALESCE($4, phone),
                   region        = COALESCE($5, region),
                   registered_at = COALESCE($6, registered_at),
                   updated_at    = datetime('now', 'subsec')
               WHERE farmer_id = $1
               RETURNING farmer_id, user_id, name, email, phone, region, registered_at, created_at, updated_at"#,
        )
        .bind(id)
        .bind(&data.name)
        .bind(&data.email)
        .bind(&data.phone)
        .bind(&data.region)
        .bind(data.registered_at)
        .fetch_one(pool)
        .await
    }

    /// Fields and everything below them go with the farmer (ON DELETE CASCADE).
    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM farmers WHERE farmer_id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
