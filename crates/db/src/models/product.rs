use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;
use utils::response::Page;
use uuid::Uuid;

/// Sensor hardware sold to farmers
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Product {
    pub product_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub firmware_version: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateProduct {
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub firmware_version: Option<String>,
    pub is_active: bool,
}

/// Outer `None` leaves a column alone, `Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct UpdateProduct {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub image_url: Option<Option<String>>,
    pub firmware_version: Option<Option<String>>,
    pub is_active: Option<bool>,
}

impl Product {
    /// `page` is 1-based
    pub async fn paginate(
        pool: &SqlitePool,
        page: i64,
        per_page: i64,
    ) -> Result<Page<Self>, sqlx::Error> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products")
            .fetch_one(pool)
            .await?;

        let products = sqlx::query_as::<_, Product>(
            r#"SELECT product_id, name, description, image_url, firmware_version, is_active, created_at, updated_at
               FROM products
               ORDER BY created_at ASC, rowid ASC
               LIMIT $1 OFFSET $2"#,
        )
        .bind(per_page)
        .bind((page - 1).saturating_mul(per_page))
        .fetch_all(pool)
        .await?;

        Ok(Page::new(products, page, per_page, total))
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Product>(
            r#"SELECT product_id, name, description, image_url, firmware_version, is_active, created_at, updated_at
               FROM products
               WHERE product_id = $1"#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn create(
        pool: &SqlitePool,
        data: &CreateProduct,
        product_id: Uuid,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Product>(
            r#"INSERT INTO products (product_id, name, description, image_url, firmware_version, is_active)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING product_id, name, description, image_url, firmware_version, is_active, created_at, updated_at"#,
        )
        .bind(product_id)
        .bind(&data.name)
        .bind(&data.description)
        .bind(&data.image_url)
        .bind(&data.firmware_version)
        .bind(data.is_active)
        .fetch_one(pool)
        .await
    }

    pub async fn update(
        pool: &SqlitePool,
        id: Uuid,
        data: &UpdateProduct,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Product>(
            r#"UPDATE products
               SET name             = COALESCE($2, name),
                   description      = CASE WHEN $3 THEN $4 ELSE description END,
                   image_url        = CASE WHEN $5 THEN $6 ELSE image_url END,
                   firmware_version = CASE WHEN $7 THEN $8 ELSE firmware_version END,
                   is_active        = COALESCE($9, is_active),
                   updated_at       = datetime('now', 'subsec')
               WHERE product_id = $1
               RETURNING product_id, name, description, image_url, firmware_version, is_active, created_at, updated_at"#,
        )
        .bind(id)
        .bind(&data.name)
        .bind(data.description.is_some())
        .bind(data.description.clone().flatten())
        .bind(data.image_url.is_some())
        .bind(data.image_url.clone().flatten())
        .bind(data.firmware_version.is_some())
        .bind(data.firmware_version.clone().flatten())
        .bind(data.is_active)
        .fetch_one(pool)
        .await
    }

    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM products WHERE product_id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
