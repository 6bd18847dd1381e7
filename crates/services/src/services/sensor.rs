use db::models::{
    field::Field,
    sensor::{CreateSensor, Sensor, UpdateSensor},
};
use serde::Deserialize;
use serde_with::{NoneAsEmptyString, serde_as};
use sqlx::SqlitePool;
use tracing::info;
use ts_rs::TS;
use uuid::Uuid;

use super::{
    crud::{CrudError, deleted, found},
    validation::{Mode, Validator, take},
};

pub const NOT_FOUND: &str = "Sensor not found";

#[derive(Debug, Clone, Default, Deserialize, TS)]
pub struct SensorPayload {
    pub field_id: Option<Uuid>,
    pub sensor_type: Option<String>,
    /// `YYYY-MM-DD`
    pub installation_date: Option<String>,
    pub status: Option<String>,
}

#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SensorQuery {
    #[serde(default)]
    #[serde_as(as = "NoneAsEmptyString")]
    pub field_id: Option<Uuid>,
}

fn check(v: &mut Validator, payload: SensorPayload) -> UpdateSensor {
    UpdateSensor {
        field_id: v.field("field_id", payload.field_id).required().value(),
        sensor_type: v
            .text("sensor_type", payload.sensor_type)
            .required()
            .max_len(50)
            .value(),
        installation_date: v
            .text("installation_date", payload.installation_date)
            .required()
            .date()
            .value(),
        status: v
            .text("status", payload.status)
            .required()
            .max_len(20)
            .value(),
    }
}

async fn check_references(
    pool: &SqlitePool,
    v: &mut Validator,
    fields: &UpdateSensor,
) -> Result<(), sqlx::Error> {
    if let Some(field_id) = fields.field_id {
        v.exists("field_id", Field::exists(pool, field_id).await?);
    }
    Ok(())
}

pub struct SensorService;

impl SensorService {
    pub async fn list(pool: &SqlitePool, query: &SensorQuery) -> Result<Vec<Sensor>, CrudError> {
        Ok(Sensor::find_all(pool, query.field_id).await?)
    }

    pub async fn find(pool: &SqlitePool, id: Uuid) -> Result<Sensor, CrudError> {
        found(Sensor::find_by_id(pool, id).await?, NOT_FOUND)
    }

    pub async fn create(pool: &SqlitePool, payload: SensorPayload) -> Result<Sensor, CrudError> {
        let mut v = Validator::new(Mode::Create);
        let fields = check(&mut v, payload);
        check_references(pool, &mut v, &fields).await?;
        v.finish()?;

        let data = CreateSensor {
            field_id: take(fields.field_id, "field_id")?,
            sensor_type: take(fields.sensor_type, "sensor_type")?,
            installation_date: take(fields.installation_date, "installation_date")?,
            status: take(fields.status, "status")?,
        };
        let sensor = Sensor::create(pool, &data, Uuid::new_v4())
            .await
            .map_err(|e| CrudError::from_write(e, NOT_FOUND, "field_id"))?;

        info!(sensor_id = %sensor.sensor_id, field_id = %sensor.field_id, sensor_type = %sensor.sensor_type, "Created sensor");
        Ok(sensor)
    }

    pub async fn update(
        pool: &SqlitePool,
        id: Uuid,
        payload: SensorPayload,
    ) -> Result<Sensor, CrudError> {
        Self::find(pool, id).await?;

        let mut v = Validator::new(Mode::Update);
        let changes = check(&mut v, payload);
        check_references(pool, &mut v, &changes).await?;
        v.finish()?;

        let sensor = Sensor::update(pool, id, &changes)
            .await
            .map_err(|e| CrudError::from_write(e, NOT_FOUND, "field_id"))?;

        info!(sensor_id = %id, "Updated sensor");
        Ok(sensor)
    }

    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<(), CrudError> {
        deleted(Sensor::delete(pool, id).await?, NOT_FOUND)?;
        info!(sensor_id = %id, "Deleted sensor");
        Ok(())
    }
}
