use db::models::{
    field::Field,
    yield_prediction::{CreateYieldPrediction, UpdateYieldPrediction, YieldPrediction},
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

pub const NOT_FOUND: &str = "Yield prediction not found";

#[derive(Debug, Clone, Default, Deserialize, TS)]
pub struct YieldPredictionPayload {
    pub field_id: Option<Uuid>,
    pub model_version: Option<String>,
    pub prediction_date: Option<String>,
    /// Tonnes per hectare
    pub predicted_yield_t_ha: Option<f64>,
}

#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct YieldPredictionQuery {
    #[serde(default)]
    #[serde_as(as = "NoneAsEmptyString")]
    pub field_id: Option<Uuid>,
}

fn check(v: &mut Validator, payload: YieldPredictionPayload) -> UpdateYieldPrediction {
    UpdateYieldPrediction {
        field_id: v.field("field_id", payload.field_id).required().value(),
        model_version: v
            .text("model_version", payload.model_version)
            .required()
            .max_len(50)
            .value(),
        prediction_date: v
            .text("prediction_date", payload.prediction_date)
            .required()
            .date()
            .value(),
        predicted_yield_t_ha: v
            .field("predicted_yield_t_ha", payload.predicted_yield_t_ha)
            .required()
            .at_least(0.0)
            .value(),
    }
}

async fn check_references(
    pool: &SqlitePool,
    v: &mut Validator,
    fields: &UpdateYieldPrediction,
) -> Result<(), sqlx::Error> {
    if let Some(field_id) = fields.field_id {
        v.exists("field_id", Field::exists(pool, field_id).await?);
    }
    Ok(())
}

pub struct YieldPredictionService;

impl YieldPredictionService {
    pub async fn list(
        pool: &SqlitePool,
        query: &YieldPredictionQuery,
    ) -> Result<Vec<YieldPrediction>, CrudError> {
        Ok(YieldPrediction::find_all(pool, query.field_id).await?)
    }

    pub async fn find(pool: &SqlitePool, id: i64) -> Result<YieldPrediction, CrudError> {
        found(YieldPrediction::find_by_id(pool, id).await?, NOT_FOUND)
    }

    pub async fn create(
        pool: &SqlitePool,
        payload: YieldPredictionPayload,
    ) -> Result<YieldPrediction, CrudError> {
        let mut v = Validator::new(Mode::Create);
        let fields = check(&mut v, payload);
        check_references(pool, &mut v, &fields).await?;
        v.finish()?;

        let data = CreateYieldPrediction {
            field_id: take(fields.field_id, "field_id")?,
            model_version: take(fields.model_version, "model_version")?,
            prediction_date: take(fields.prediction_date, "prediction_date")?,
            predicted_yield_t_ha: take(fields.predicted_yield_t_ha, "predicted_yield_t_ha")?,
        };
        let prediction = YieldPrediction::create(pool, &data)
            .await
            .map_err(|e| CrudError::from_write(e, NOT_FOUND, "field_id"))?;

        info!(
            prediction_id = prediction.prediction_id,
            field_id = %prediction.field_id,
            model_version = %prediction.model_version,
            "Created yield prediction"
        );
        Ok(prediction)
    }

    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        payload: YieldPredictionPayload,
    ) -> Result<YieldPrediction, CrudError> {
        Self::find(pool, id).await?;

        let mut v = Validator::new(Mode::Update);
        let changes = check(&mut v, payload);
        check_references(pool, &mut v, &changes).await?;
        v.finish()?;

        let prediction = YieldPrediction::update(pool, id, &changes)
            .await
            .map_err(|e| CrudError::from_write(e, NOT_FOUND, "field_id"))?;

        info!(prediction_id = id, "Updated yield prediction");
        Ok(prediction)
    }

    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<(), CrudError> {
        deleted(YieldPrediction::delete(pool, id).await?, NOT_FOUND)?;
        info!(prediction_id = id, "Deleted yield prediction");
        Ok(())
    }
}
