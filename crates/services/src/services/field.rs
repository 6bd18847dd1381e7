use db::models::{
    farmer::Farmer,
    field::{CreateField, Field, UpdateField},
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

pub const NOT_FOUND: &str = "Field not found";

/// Request body for creating or updating a field
#[derive(Debug, Clone, Default, Deserialize, TS)]
pub struct FieldPayload {
    pub farmer_id: Option<Uuid>,
    pub name: Option<String>,
    pub area_ha: Option<f64>,
    pub soil_type: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FieldQuery {
    #[serde(default)]
    #[serde_as(as = "NoneAsEmptyString")]
    pub farmer_id: Option<Uuid>,
}

fn check(v: &mut Validator, payload: FieldPayload) -> UpdateField {
    UpdateField {
        farmer_id: v.field("farmer_id", payload.farmer_id).required().value(),
        name: v.text("name", payload.name).required().max_len(100).value(),
        // fits a decimal(6,2) column
        area_ha: v
            .field("area_ha", payload.area_ha)
            .required()
            .between(0.0, 9999.99)
            .value(),
        soil_type: v
            .text("soil_type", payload.soil_type)
            .required()
            .max_len(50)
            .value(),
        latitude: v
            .field("latitude", payload.latitude)
            .required()
            .between(-90.0, 90.0)
            .value(),
        longitude: v
            .field("longitude", payload.longitude)
            .required()
            .between(-180.0, 180.0)
            .value(),
    }
}

async fn check_references(
    pool: &SqlitePool,
    v: &mut Validator,
    fields: &UpdateField,
) -> Result<(), sqlx::Error> {
    if let Some(farmer_id) = fields.farmer_id {
        v.exists("farmer_id", Farmer::exists(pool, farmer_id).await?);
    }
    Ok(())
}

pub struct FieldService;

impl FieldService {
    pub async fn list(pool: &SqlitePool, query: &FieldQuery) -> Result<Vec<Field>, CrudError> {
        Ok(Field::find_all(pool, query.farmer_id).await?)
    }

    pub async fn find(pool: &SqlitePool, id: Uuid) -> Result<Field, CrudError> {
        found(Field::find_by_id(pool, id).await?, NOT_FOUND)
    }

    pub async fn create(pool: &SqlitePool, payload: FieldPayload) -> Result<Field, CrudError> {
        let mut v = Validator::new(Mode::Create);
        let fields = check(&mut v, payload);
        check_references(pool, &mut v, &fields).await?;
        v.finish()?;

        let data = CreateField {
            farmer_id: take(fields.farmer_id, "farmer_id")?,
            name: take(fields.name, "name")?,
            area_ha: take(fields.area_ha, "area_ha")?,
            soil_type: take(fields.soil_type, "soil_type")?,
            latitude: take(fields.latitude, "latitude")?,
            longitude: take(fields.longitude, "longitude")?,
        };
        let field = Field::create(pool, &data, Uuid::new_v4())
            .await
            .map_err(|e| CrudError::from_write(e, NOT_FOUND, "farmer_id"))?;

        info!(field_id = %field.field_id, farmer_id = %field.farmer_id, "Created field");
        Ok(field)
    }

    pub async fn update(
        pool: &SqlitePool,
        id: Uuid,
        payload: FieldPayload,
    ) -> Result<Field, CrudError> {
        Self::find(pool, id).await?;

        let mut v = Validator::new(Mode::Update);
        let changes = check(&mut v, payload);
        check_references(pool, &mut v, &changes).await?;
        v.finish()?;

        let field = Field::update(pool, id, &changes)
            .await
            .map_err(|e| CrudError::from_write(e, NOT_FOUND, "farmer_id"))?;

        info!(field_id = %id, "Updated field");
        Ok(field)
    }

    /// Removes the field's sensors, readings, predictions and recommendations as well.
    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<(), CrudError> {
        deleted(Field::delete(pool, id).await?, NOT_FOUND)?;
        info!(field_id = %id, "Deleted field");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use db::DBService;

    use super::*;
    use crate::services::fixtures::farmer;

    fn payload(farmer_id: Uuid) -> FieldPayload {
        FieldPayload {
            farmer_id: Some(farmer_id),
            name: Some("North plot".to_string()),
            area_ha: Some(2.5),
            soil_type: Some("loam".to_string()),
            latitude: Some(0.5143),
            longitude: Some(35.2698),
        }
    }

    #[tokio::test]
    async fn test_create_with_unknown_farmer_writes_nothing() {
        let db = DBService::new_in_memory().await.unwrap();

        let err = FieldService::create(&db.pool, payload(Uuid::new_v4()))
            .await
            .unwrap_err();
        let CrudError::Validation(errors) = err else {
            panic!("expected validation error, got {err:?}");
        };
        assert_eq!(
            errors.get("farmer_id").unwrap(),
            ["The selected farmer id is invalid.".to_string()]
        );
        let all = FieldService::list(&db.pool, &FieldQuery::default())
            .await
            .unwrap();
        assert!(all.is_empty());
    }

    #[tokio::test]
    async fn test_create_and_filter_by_farmer() {
        let db = DBService::new_in_memory().await.unwrap();
        let farmer_id = farmer(&db.pool).await;

        let created = FieldService::create(&db.pool, payload(farmer_id))
            .await
            .unwrap();
        let fetched = FieldService::find(&db.pool, created.field_id).await.unwrap();
        assert_eq!(fetched.name, "North plot");
        assert_eq!(fetched.area_ha, 2.5);
        assert_eq!(fetched.soil_type.as_deref(), Some("loam"));

        let query = FieldQuery {
            farmer_id: Some(farmer_id),
        };
        assert_eq!(FieldService::list(&db.pool, &query).await.unwrap().len(), 1);
        let query = FieldQuery {
            farmer_id: Some(Uuid::new_v4()),
        };
        assert!(FieldService::list(&db.pool, &query).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_coordinates_out_of_range() {
        let db = DBService::new_in_memory().await.unwrap();
        let farmer_id = farmer(&db.pool).await;

        let mut bad = payload(farmer_id);
        bad.latitude = Some(-91.0);
        bad.longitude = Some(181.0);
        bad.area_ha = Some(-1.0);
        let err = FieldService::create(&db.pool, bad).await.unwrap_err();
        let CrudError::Validation(errors) = err else {
            panic!("expected validation error, got {err:?}");
        };
        assert_eq!(
            errors.fields().collect::<Vec<_>>(),
            ["area_ha", "latitude", "longitude"]
        );
    }

    #[tokio::test]
    async fn test_update_only_touches_supplied_fields() {
        let db = DBService::new_in_memory().await.unwrap();
        let farmer_id = farmer(&db.pool).await;
        let created = FieldService::create(&db.pool, payload(farmer_id))
            .await
            .unwrap();

        let updated = FieldService::update(
            &db.pool,
            created.field_id,
            FieldPayload {
                area_ha: Some(3.75),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.area_ha, 3.75);
        assert_eq!(updated.name, created.name);
        assert_eq!(updated.latitude, created.latitude);
        assert_eq!(updated.farmer_id, farmer_id);

        let err = FieldService::update(
            &db.pool,
            created.field_id,
            FieldPayload {
                farmer_id: Some(Uuid::new_v4()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, CrudError::Validation(_)));
    }

    #[tokio::test]
    async fn test_missing_field_is_not_found() {
        let db = DBService::new_in_memory().await.unwrap();
        let id = Uuid::new_v4();

        assert!(matches!(
            FieldService::find(&db.pool, id).await,
            Err(CrudError::NotFound(NOT_FOUND))
        ));
        assert!(matches!(
            FieldService::update(&db.pool, id, FieldPayload::default()).await,
            Err(CrudError::NotFound(NOT_FOUND))
        ));
        assert!(matches!(
            FieldService::delete(&db.pool, id).await,
            Err(CrudError::NotFound(NOT_FOUND))
        ));
    }

    #[test]
    fn test_empty_filter_reads_as_absent() {
        let query: FieldQuery = serde_json::from_str(r#"{"farmer_id": ""}"#).unwrap();
        assert_eq!(query.farmer_id, None);

        let id = Uuid::new_v4();
        let query: FieldQuery =
            serde_json::from_str(&format!(r#"{{"farmer_id": "{id}"}}"#)).unwrap();
        assert_eq!(query.farmer_id, Some(id));

        let query: FieldQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.farmer_id, None);
    }
}
