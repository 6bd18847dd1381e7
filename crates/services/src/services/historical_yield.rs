use db::models::historical_yield::{CreateHistoricalYield, HistoricalYield, UpdateHistoricalYield};
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::info;
use ts_rs::TS;

use super::{
    crud::{CrudError, deleted, found},
    validation::{Mode, Validator, take},
};

pub const NOT_FOUND: &str = "Historical yield not found";

#[derive(Debug, Clone, Default, Deserialize, TS)]
pub struct HistoricalYieldPayload {
    pub region_or_field: Option<String>,
    pub year: Option<i32>,
    pub yield_t_ha: Option<f64>,
    pub source: Option<String>,
}

fn check(v: &mut Validator, payload: HistoricalYieldPayload) -> UpdateHistoricalYield {
    UpdateHistoricalYield {
        region_or_field: v
            .text("region_or_field", payload.region_or_field)
            .required()
            .max_len(100)
            .value(),
        year: v.field("year", payload.year).required().value(),
        yield_t_ha: v
            .field("yield_t_ha", payload.yield_t_ha)
            .required()
            .at_least(0.0)
            .value(),
        source: v
            .text("source", payload.source)
            .required()
            .max_len(100)
            .value(),
    }
}

pub struct HistoricalYieldService;

impl HistoricalYieldService {
    pub async fn list(pool: &SqlitePool) -> Result<Vec<HistoricalYield>, CrudError> {
        Ok(HistoricalYield::find_all(pool).await?)
    }

    pub async fn find(pool: &SqlitePool, id: i64) -> Result<HistoricalYield, CrudError> {
        found(HistoricalYield::find_by_id(pool, id).await?, NOT_FOUND)
    }

    pub async fn create(
        pool: &SqlitePool,
        payload: HistoricalYieldPayload,
    ) -> Result<HistoricalYield, CrudError> {
        let mut v = Validator::new(Mode::Create);
        let fields = check(&mut v, payload);
        v.finish()?;

        let data = CreateHistoricalYield {
            region_or_field: take(fields.region_or_field, "region_or_field")?,
            year: take(fields.year, "year")?,
            yield_t_ha: take(fields.yield_t_ha, "yield_t_ha")?,
            source: take(fields.source, "source")?,
        };
        let record = HistoricalYield::create(pool, &data).await?;

        info!(hist_id = record.hist_id, year = record.year, "Created historical yield");
        Ok(record)
    }

    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        payload: HistoricalYieldPayload,
    ) -> Result<HistoricalYield, CrudError> {
        Self::find(pool, id).await?;

        let mut v = Validator::new(Mode::Update);
        let changes = check(&mut v, payload);
        v.finish()?;

        let record = HistoricalYield::update(pool, id, &changes)
            .await
            .map_err(|e| CrudError::from_write(e, NOT_FOUND, "hist_id"))?;

        info!(hist_id = id, "Updated historical yield");
        Ok(record)
    }

    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<(), CrudError> {
        deleted(HistoricalYield::delete(pool, id).await?, NOT_FOUND)?;
        info!(hist_id = id, "Deleted historical yield");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use db::DBService;

    use super::*;

    fn payload() -> HistoricalYieldPayload {
        HistoricalYieldPayload {
            region_or_field: Some("Uasin Gishu".to_string()),
            year: Some(2023),
            yield_t_ha: Some(3.9),
            source: Some("KALRO survey".to_string()),
        }
    }

    #[tokio::test]
    async fn test_crud_cycle() {
        let db = DBService::new_in_memory().await.unwrap();

        let created = HistoricalYieldService::create(&db.pool, payload())
            .await
            .unwrap();
        assert_eq!(created.source.as_deref(), Some("KALRO survey"));

        let updated = HistoricalYieldService::update(
            &db.pool,
            created.hist_id,
            HistoricalYieldPayload {
                year: Some(2022),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.year, 2022);
        assert_eq!(updated.yield_t_ha, 3.9);
        assert_eq!(updated.region_or_field, "Uasin Gishu");

        HistoricalYieldService::delete(&db.pool, created.hist_id)
            .await
            .unwrap();
        assert!(matches!(
            HistoricalYieldService::find(&db.pool, created.hist_id).await,
            Err(CrudError::NotFound(NOT_FOUND))
        ));
    }

    #[tokio::test]
    async fn test_update_rejects_blank_source() {
        let db = DBService::new_in_memory().await.unwrap();
        let created = HistoricalYieldService::create(&db.pool, payload())
            .await
            .unwrap();

        let err = HistoricalYieldService::update(
            &db.pool,
            created.hist_id,
            HistoricalYieldPayload {
                source: Some(String::new()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, CrudError::Validation(_)));

        let unchanged = HistoricalYieldService::find(&db.pool, created.hist_id)
            .await
            .unwrap();
        assert_eq!(unchanged.source.as_deref(), Some("KALRO survey"));
    }
}
