//! Farmers are scoped to the account that created them: every operation takes the
//! caller's user id, and another user's farmer is reported as not found.

use db::models::farmer::{CreateFarmer, Farmer, UpdateFarmer};
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::info;
use ts_rs::TS;
use uuid::Uuid;

use super::{
    crud::{CrudError, deleted, found},
    validation::{Mode, Validator, take},
};

pub const NOT_FOUND: &str = "Farmer not found";

#[derive(Debug, Clone, Default, Deserialize, TS)]
pub struct FarmerPayload {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub region: Option<String>,
    /// Date or date-time
    pub registered_at: Option<String>,
}

fn check(v: &mut Validator, payload: FarmerPayload) -> UpdateFarmer {
    UpdateFarmer {
        name: v.text("name", payload.name).required().max_len(100).value(),
        email: v
            .text("email", payload.email)
            .required()
            .email()
            .max_len(150)
            .value(),
        phone: v.text("phone", payload.phone).required().max_len(20).value(),
        region: v
            .text("region", payload.region)
            .required()
            .max_len(100)
            .value(),
        registered_at: v
            .text("registered_at", payload.registered_at)
            .required()
            .datetime()
            .value(),
    }
}

pub struct FarmerService;

impl FarmerService {
    pub async fn list(pool: &SqlitePool, user_id: i64) -> Result<Vec<Farmer>, CrudError> {
        Ok(Farmer::find_by_user_id(pool, user_id).await?)
    }

    pub async fn find(pool: &SqlitePool, id: Uuid, user_id: i64) -> Result<Farmer, CrudError> {
        found(
            Farmer::find_by_id_for_user(pool, id, user_id).await?,
            NOT_FOUND,
        )
    }

    pub async fn create(
        pool: &SqlitePool,
        user_id: i64,
        payload: FarmerPayload,
    ) -> Result<Farmer, CrudError> {
        let mut v = Validator::new(Mode::Create);
        let fields = check(&mut v, payload);
        if let Some(email) = fields.email.as_deref() {
            v.unique("email", Farmer::email_taken(pool, email, None).await?);
        }
        v.finish()?;

        let data = CreateFarmer {
            user_id: Some(user_id),
            name: take(fields.name, "name")?,
            email: take(fields.email, "email")?,
            phone: take(fields.phone, "phone")?,
            region: take(fields.region, "region")?,
            registered_at: take(fields.registered_at, "registered_at")?,
        };
        let farmer = Farmer::create(pool, &data, Uuid::new_v4())
            .await
            .map_err(|e| CrudError::from_write(e, NOT_FOUND, "email"))?;

        info!(farmer_id = %farmer.farmer_id, user_id, "Created farmer");
        Ok(farmer)
    }

    pub async fn update(
        pool: &SqlitePool,
        id: Uuid,
        user_id: i64,
        payload: FarmerPayload,
    ) -> Result<Farmer, CrudError> {
        Self::find(pool, id, user_id).await?;

        let mut v = Validator::new(Mode::Update);
        let changes = check(&mut v, payload);
        if let Some(email) = changes.email.as_deref() {
            v.unique("email", Farmer::email_taken(pool, email, Some(id)).await?);
        }
        v.finish()?;

        let farmer = Farmer::update(pool, id, &changes)
            .await
            .map_err(|e| CrudError::from_write(e, NOT_FOUND, "email"))?;

        info!(farmer_id = %id, "Updated farmer");
        Ok(farmer)
    }

    pub async fn delete(pool: &SqlitePool, id: Uuid, user_id: i64) -> Result<(), CrudError> {
        Self::find(pool, id, user_id).await?;
        deleted(Farmer::delete(pool, id).await?, NOT_FOUND)?;
        info!(farmer_id = %id, "Deleted farmer");
        Ok(())
    }
}
