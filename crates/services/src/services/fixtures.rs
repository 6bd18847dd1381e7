//! Rows the service tests hang their data off.

use chrono::{NaiveDate, Utc};
use db::models::{
    farmer::{CreateFarmer, Farmer},
    field::{CreateField, Field},
    sensor::{CreateSensor, Sensor},
};
use sqlx::SqlitePool;
use uuid::Uuid;

pub async fn farmer(pool: &SqlitePool) -> Uuid {
    let data = CreateFarmer {
        user_id: None,
        name: "Grace Achieng".to_string(),
        email: format!("grace-{}@example.com", Uuid::new_v4()),
        phone: "+254700000001".to_string(),
        region: "Rift Valley".to_string(),
        registered_at: Utc::now(),
    };
    Farmer::create(pool, &data, Uuid::new_v4())
        .await
        .unwrap()
        .farmer_id
}

pub async fn field(pool: &SqlitePool) -> Uuid {
    let data = CreateField {
        farmer_id: farmer(pool).await,
        name: "North plot".to_string(),
        area_ha: 2.5,
        soil_type: "loam".to_string(),
        latitude: 0.5143,
        longitude: 35.2698,
    };
    Field::create(pool, &data, Uuid::new_v4())
        .await
        .unwrap()
        .field_id
}

pub async fn sensor(pool: &SqlitePool) -> Uuid {
    let data = CreateSensor {
        field_id: field(pool).await,
        sensor_type: "soil_moisture".to_string(),
        installation_date: NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
        status: "active".to_string(),
    };
    Sensor::create(pool, &data, Uuid::new_v4())
        .await
        .unwrap()
        .sensor_id
}
