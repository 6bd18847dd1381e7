//! Print TypeScript declarations for the API's request and response bodies.
//!
//! `cargo run --bin generate_types > ../frontend/src/types/api.ts`

use db::models::{
    farmer::Farmer, field::Field, historical_yield::HistoricalYield, product::Product,
    recommendation::Recommendation, sensor::Sensor, sensor_reading::SensorReading,
    user::{User, UserRole}, yield_prediction::YieldPrediction,
};
use services::services::{
    auth::{LoginPayload, RegisterPayload, RegisterResponse, TokenResponse, UserResponse},
    farmer::FarmerPayload,
    field::FieldPayload,
    historical_yield::HistoricalYieldPayload,
    product::ProductPayload,
    recommendation::RecommendationPayload,
    sensor::SensorPayload,
    sensor_reading::SensorReadingPayload,
    user::UserPayload,
    yield_prediction::YieldPredictionPayload,
};
use ts_rs::TS;
use utils::response::{MessageResponse, Page};

fn main() {
    let decls = [
        UserRole::decl(),
        User::decl(),
        Farmer::decl(),
        Field::decl(),
        Sensor::decl(),
        SensorReading::decl(),
        YieldPrediction::decl(),
        Recommendation::decl(),
        HistoricalYield::decl(),
        Product::decl(),
        Page::<Product>::decl(),
        MessageResponse::decl(),
        UserPayload::decl(),
        FarmerPayload::decl(),
        FieldPayload::decl(),
        SensorPayload::decl(),
        SensorReadingPayload::decl(),
        YieldPredictionPayload::decl(),
        RecommendationPayload::decl(),
        HistoricalYieldPayload::decl(),
        ProductPayload::decl(),
        RegisterPayload::decl(),
        LoginPayload::decl(),
        TokenResponse::decl(),
        UserResponse::decl(),
        RegisterResponse::decl(),
    ];

    println!("// Generated by `generate_types`. Do not edit by hand.\n");
    for decl in decls {
        println!("export {decl}\n");
    }
}
