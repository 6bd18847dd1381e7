use db::models::product::{CreateProduct, Product, UpdateProduct};
use serde::Deserialize;
use serde_with::{NoneAsEmptyString, serde_as};
use sqlx::SqlitePool;
use tracing::info;
use ts_rs::TS;
use utils::response::Page;
use uuid::Uuid;

use super::{
    crud::{CrudError, deleted, found},
    validation::{Mode, Rule, Validator, take},
};

pub const NOT_FOUND: &str = "Product not found";

pub const MAX_PER_PAGE: i64 = 100;

/// The nullable text fields distinguish "absent" (leave alone) from an explicit
/// `null` (clear). Blank strings are stored as `null`.
#[derive(Debug, Clone, Default, Deserialize, TS)]
pub struct ProductPayload {
    pub name: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[ts(type = "string | null")]
    pub description: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[ts(type = "string | null")]
    pub image_url: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[ts(type = "string | null")]
    pub firmware_version: Option<Option<String>>,
    pub is_active: Option<bool>,
}

#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductQuery {
    #[serde(default)]
    #[serde_as(as = "NoneAsEmptyString")]
    pub page: Option<i64>,
    #[serde(default)]
    #[serde_as(as = "NoneAsEmptyString")]
    pub per_page: Option<i64>,
}

fn nullable(
    v: &mut Validator,
    name: &'static str,
    value: Option<Option<String>>,
    rules: impl FnOnce(Rule<'_, String>) -> Rule<'_, String>,
) -> Option<Option<String>> {
    let inner = value?
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    match inner {
        Some(s) => Some(rules(v.field(name, Some(s))).value()),
        None => Some(None),
    }
}

fn check(v: &mut Validator, payload: ProductPayload) -> UpdateProduct {
    UpdateProduct {
        name: v.text("name", payload.name).required().max_len(120).value(),
        description: nullable(v, "description", payload.description, |rule| rule),
        image_url: nullable(v, "image_url", payload.image_url, |rule| {
            rule.max_len(2048).url()
        }),
        firmware_version: nullable(v, "firmware_version", payload.firmware_version, |rule| {
            rule.max_len(20)
        }),
        is_active: payload.is_active,
    }
}

pub struct ProductService;

impl ProductService {
    /// `per_page` falls back to `default_per_page` and is clamped to `1..=MAX_PER_PAGE`.
    /// `page` is capped so its row offset fits in an `i64`.
    pub async fn list(
        pool: &SqlitePool,
        query: &ProductQuery,
        default_per_page: i64,
    ) -> Result<Page<Product>, CrudError> {
        let per_page = query
            .per_page
            .unwrap_or(default_per_page)
            .clamp(1, MAX_PER_PAGE);
        let page = query.page.unwrap_or(1).clamp(1, i64::MAX / MAX_PER_PAGE);
        Ok(Product::paginate(pool, page, per_page).await?)
    }

    pub async fn find(pool: &SqlitePool, id: Uuid) -> Result<Product, CrudError> {
        found(Product::find_by_id(pool, id).await?, NOT_FOUND)
    }

    pub async fn create(pool: &SqlitePool, payload: ProductPayload) -> Result<Product, CrudError> {
        let mut v = Validator::new(Mode::Create);
        let fields = check(&mut v, payload);
        v.finish()?;

        let data = CreateProduct {
            name: take(fields.name, "name")?,
            description: fields.description.flatten(),
            image_url: fields.image_url.flatten(),
            firmware_version: fields.firmware_version.flatten(),
            is_active: fields.is_active.unwrap_or(true),
        };
        let product = Product::create(pool, &data, Uuid::new_v4()).await?;

        info!(product_id = %product.product_id, name = %product.name, "Created product");
        Ok(product)
    }

    pub async fn update(
        pool: &SqlitePool,
        id: Uuid,
        payload: ProductPayload,
    ) -> Result<Product, CrudError> {
        Self::find(pool, id).await?;

        let mut v = Validator::new(Mode::Update);
        let changes = check(&mut v, payload);
        v.finish()?;

        let product = Product::update(pool, id, &changes)
            .await
            .map_err(|e| CrudError::from_write(e, NOT_FOUND, "product_id"))?;

        info!(product_id = %id, "Updated product");
        Ok(product)
    }

    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<(), CrudError> {
        deleted(Product::delete(pool, id).await?, NOT_FOUND)?;
        info!(product_id = %id, "Deleted product");
        Ok(())
    }
}
