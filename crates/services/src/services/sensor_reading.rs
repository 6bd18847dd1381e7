use db::models::{
    sensor::Sensor,
    sensor_reading::{CreateSensorReading, ReadingFilter, SensorReading, UpdateSensorReading},
};
use serde::Deserialize;
use serde_with::{NoneAsEmptyString, serde_as};
use sqlx::SqlitePool;
use tracing::{debug, info};
use ts_rs::TS;
use uuid::Uuid;

use super::{
    crud::{CrudError, deleted, found},
    validation::{Mode, Validator, take},
};

pub const NOT_FOUND: &str = "Sensor reading not found";

#[derive(Debug, Clone, Default, Deserialize, TS)]
pub struct SensorReadingPayload {
    pub sensor_id: Option<Uuid>,
    /// RFC 3339 or `YYYY-MM-DD HH:MM:SS` (UTC)
    pub timestamp: Option<String>,
    pub value: Option<f64>,
}

/// `from` and `to` bound the timestamp inclusively.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SensorReadingQuery {
    #[serde(default)]
    #[serde_as(as = "NoneAsEmptyString")]
    pub sensor_id: Option<Uuid>,
    #[serde(default)]
    #[serde_as(as = "NoneAsEmptyString")]
    pub from: Option<String>,
    #[serde(default)]
    #[serde_as(as = "NoneAsEmptyString")]
    pub to: Option<String>,
}

fn check(v: &mut Validator, payload: SensorReadingPayload) -> UpdateSensorReading {
    UpdateSensorReading {
        sensor_id: v.field("sensor_id", payload.sensor_id).required().value(),
        timestamp: v
            .text("timestamp", payload.timestamp)
            .required()
            .datetime()
            .value(),
        value: v.field("value", payload.value).required().value(),
    }
}

async fn check_references(
    pool: &SqlitePool,
    v: &mut Validator,
    fields: &UpdateSensorReading,
) -> Result<(), sqlx::Error> {
    if let Some(sensor_id) = fields.sensor_id {
        v.exists("sensor_id", Sensor::exists(pool, sensor_id).await?);
    }
    Ok(())
}

pub struct SensorReadingService;

impl SensorReadingService {
    pub async fn list(
        pool: &SqlitePool,
        query: SensorReadingQuery,
    ) -> Result<Vec<SensorReading>, CrudError> {
        let mut v = Validator::new(Mode::Update);
        let filter = ReadingFilter {
            sensor_id: query.sensor_id,
            from: v.text("from", query.from).datetime().value(),
            to: v.text("to", query.to).datetime().value(),
        };
        v.finish()?;

        debug!(?filter, "Listing sensor readings");
        Ok(SensorReading::find_all(pool, &filter).await?)
    }

    pub async fn find(pool: &SqlitePool, id: i64) -> Result<SensorReading, CrudError> {
        found(SensorReading::find_by_id(pool, id).await?, NOT_FOUND)
    }

    pub async fn create(
        pool: &SqlitePool,
        payload: SensorReadingPayload,
    ) -> Result<SensorReading, CrudError> {
        let mut v = Validator::new(Mode::Create);
        let fields = check(&mut v, payload);
        check_references(pool, &mut v, &fields).await?;
        v.finish()?;

        let data = CreateSensorReading {
            sensor_id: take(fields.sensor_id, "sensor_id")?,
            timestamp: take(fields.timestamp, "timestamp")?,
            value: take(fields.value, "value")?,
        };
        let reading = SensorReading::create(pool, &data)
            .await
            .map_err(|e| CrudError::from_write(e, NOT_FOUND, "sensor_id"))?;

        debug!(reading_id = reading.reading_id, sensor_id = %reading.sensor_id, "Stored sensor reading");
        Ok(reading)
    }

    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        payload: SensorReadingPayload,
    ) -> Result<SensorReading, CrudError> {
        Self::find(pool, id).await?;

        let mut v = Validator::new(Mode::Update);
        let changes = check(&mut v, payload);
        check_references(pool, &mut v, &changes).await?;
        v.finish()?;

        let reading = SensorReading::update(pool, id, &changes)
            .await
            .map_err(|e| CrudError::from_write(e, NOT_FOUND, "sensor_id"))?;

        info!(reading_id = id, "Updated sensor reading");
        Ok(reading)
    }

    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<(), CrudError> {
        deleted(SensorReading::delete(pool, id).await?, NOT_FOUND)?;
        info!(reading_id = id, "Deleted sensor reading");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use db::DBService;

    use super::*;
    use crate::services::fixtures::sensor;

    fn payload(sensor_id: Uuid, timestamp: &str, value: f64) -> SensorReadingPayload {
        SensorReadingPayload {
            sensor_id: Some(sensor_id),
            timestamp: Some(timestamp.to_string()),
            value: Some(value),
        }
    }

    #[tokio::test]
    async fn test_list_is_chronological_and_windowed() {
        let db = DBService::new_in_memory().await.unwrap();
        let sensor_id = sensor(&db.pool).await;

        for (timestamp, value) in [
            ("2025-05-03 06:00:00", 0.31),
            ("2025-05-01T06:00:00Z", 0.28),
            ("2025-05-02 06:00:00", 0.35),
        ] {
            SensorReadingService::create(&db.pool, payload(sensor_id, timestamp, value))
                .await
                .unwrap();
        }

        let all = SensorReadingService::list(
            &db.pool,
            SensorReadingQuery {
                sensor_id: Some(sensor_id),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let values: Vec<f64> = all.iter().map(|r| r.value).collect();
        assert_eq!(values, [0.28, 0.35, 0.31]);

        let window = SensorReadingService::list(
            &db.pool,
            SensorReadingQuery {
                sensor_id: Some(sensor_id),
                from: Some("2025-05-02".to_string()),
                to: Some("2025-05-02 23:59:59".to_string()),
            },
        )
        .await
        .unwrap();
        assert_eq!(window.len(), 1);
        assert_eq!(window[0].value, 0.35);
    }

    #[tokio::test]
    async fn test_bad_window_bound_is_validation_error() {
        let db = DBService::new_in_memory().await.unwrap();

        let err = SensorReadingService::list(
            &db.pool,
            SensorReadingQuery {
                from: Some("last week".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, CrudError::Validation(_)));
    }

    #[tokio::test]
    async fn test_value_required_and_sensor_must_exist() {
        let db = DBService::new_in_memory().await.unwrap();

        let err = SensorReadingService::create(
            &db.pool,
            SensorReadingPayload {
                sensor_id: Some(Uuid::new_v4()),
                timestamp: Some("2025-05-01 06:00:00".to_string()),
                value: None,
            },
        )
        .await
        .unwrap_err();
        let CrudError::Validation(errors) = err else {
            panic!("expected validation error, got {err:?}");
        };
        assert_eq!(errors.fields().collect::<Vec<_>>(), ["sensor_id", "value"]);
    }
}
