use db::models::{
    field::Field,
    recommendation::{CreateRecommendation, Recommendation, UpdateRecommendation},
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

pub const NOT_FOUND: &str = "Recommendation not found";

#[derive(Debug, Clone, Default, Deserialize, TS)]
pub struct RecommendationPayload {
    pub field_id: Option<Uuid>,
    pub recommendation_date: Option<String>,
    /// e.g. `irrigation`, `fertilizer`
    pub recommendation_type: Option<String>,
    pub message: Option<String>,
}

#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecommendationQuery {
    #[serde(default)]
    #[serde_as(as = "NoneAsEmptyString")]
    pub field_id: Option<Uuid>,
}

fn check(v: &mut Validator, payload: RecommendationPayload) -> UpdateRecommendation {
    UpdateRecommendation {
        field_id: v.field("field_id", payload.field_id).required().value(),
        recommendation_date: v
            .text("recommendation_date", payload.recommendation_date)
            .required()
            .date()
            .value(),
        recommendation_type: v
            .text("recommendation_type", payload.recommendation_type)
            .required()
            .max_len(50)
            .value(),
        message: v.text("message", payload.message).required().value(),
    }
}

async fn check_references(
    pool: &SqlitePool,
    v: &mut Validator,
    fields: &UpdateRecommendation,
) -> Result<(), sqlx::Error> {
    if let Some(field_id) = fields.field_id {
        v.exists("field_id", Field::exists(pool, field_id).await?);
    }
    Ok(())
}

pub struct RecommendationService;

impl RecommendationService {
    pub async fn list(
        pool: &SqlitePool,
        query: &RecommendationQuery,
    ) -> Result<Vec<Recommendation>, CrudError> {
        Ok(Recommendation::find_all(pool, query.field_id).await?)
    }

    pub async fn find(pool: &SqlitePool, id: i64) -> Result<Recommendation, CrudError> {
        found(Recommendation::find_by_id(pool, id).await?, NOT_FOUND)
    }

    pub async fn create(
        pool: &SqlitePool,
        payload: RecommendationPayload,
    ) -> Result<Recommendation, CrudError> {
        let mut v = Validator::new(Mode::Create);
        let fields = check(&mut v, payload);
        check_references(pool, &mut v, &fields).await?;
        v.finish()?;

        let data = CreateRecommendation {
            field_id: take(fields.field_id, "field_id")?,
            recommendation_date: take(fields.recommendation_date, "recommendation_date")?,
            recommendation_type: take(fields.recommendation_type, "recommendation_type")?,
            message: take(fields.message, "message")?,
        };
        let recommendation = Recommendation::create(pool, &data)
            .await
            .map_err(|e| CrudError::from_write(e, NOT_FOUND, "field_id"))?;

        info!(rec_id = recommendation.rec_id, field_id = %recommendation.field_id, "Created recommendation");
        Ok(recommendation)
    }

    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        payload: RecommendationPayload,
    ) -> Result<Recommendation, CrudError> {
        Self::find(pool, id).await?;

        let mut v = Validator::new(Mode::Update);
        let changes = check(&mut v, payload);
        check_references(pool, &mut v, &changes).await?;
        v.finish()?;

        let recommendation = Recommendation::update(pool, id, &changes)
            .await
            .map_err(|e| CrudError::from_write(e, NOT_FOUND, "field_id"))?;

        info!(rec_id = id, "Updated recommendation");
        Ok(recommendation)
    }

    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<(), CrudError> {
        deleted(Recommendation::delete(pool, id).await?, NOT_FOUND)?;
        info!(rec_id = id, "Deleted recommendation");
        Ok(())
    }
}
