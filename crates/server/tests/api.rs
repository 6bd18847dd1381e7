use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use db::DBService;
use http_body_util::BodyExt;
use secrecy::SecretString;
use serde_json::{Value, json};
use server::{AppState, app, config::Config};
use tower::ServiceExt;
use uuid::Uuid;

async fn test_app() -> Router {
    let db = DBService::new_in_memory().await.unwrap();
    let config = Config {
        database_url: "sqlite::memory:".to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        jwt_secret: SecretString::from("test-secret".to_string()),
        token_ttl_hours: 1,
        products_per_page: 15,
        bcrypt_cost: 4,
    };
    app(AppState::new(db, &config))
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

async fn register(app: &Router, email: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({
            "name": "Amina Otieno",
            "email": email,
            "password": "secret123",
            "password_confirmation": "secret123",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["token"].as_str().unwrap().to_string()
}

fn farmer_body(email: &str) -> Value {
    json!({
        "name": "Grace Achieng",
        "email": email,
        "phone": "+254700000001",
        "region": "Rift Valley",
        "registered_at": "2025-03-01",
    })
}

async fn create(app: &Router, uri: &str, token: Option<&str>, body: Value) -> Value {
    let (status, created) = send(app, Method::POST, uri, token, Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{uri}: {created}");
    created
}

#[tokio::test]
async fn welcome_messages() {
    let app = test_app().await;

    for uri in ["/api", "/api/"] {
        let (status, body) = send(&app, Method::GET, uri, None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Welcome to Maize Yield Tool API");
    }

    let (_, body) = send(&app, Method::GET, "/api/v1", None, None).await;
    assert_eq!(
        body["message"],
        "Maize Yield Tool API v1 - Ready to serve your requests"
    );
}

#[tokio::test]
async fn auth_flow() {
    let app = test_app().await;
    register(&app, "amina@example.com").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({"email": "amina@example.com", "password": "secret123"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap().to_string();

    let (status, body) = send(&app, Method::GET, "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], "amina@example.com");
    assert_eq!(body["user"]["role"], "user");
    assert!(body["user"].get("password_hash").is_none());

    let (status, body) = send(&app, Method::GET, "/api/auth/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({"message": "Unauthenticated."}));

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({"email": "amina@example.com", "password": "wrong-password"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({"message": "Invalid credentials"}));
}

#[tokio::test]
async fn protected_routes_require_token() {
    let app = test_app().await;

    for uri in ["/api/farmers", "/api/users"] {
        let (status, _) = send(&app, Method::GET, uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
        let (status, _) = send(&app, Method::GET, uri, Some("garbage"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
    }
}

#[tokio::test]
async fn farmers_are_scoped_to_their_owner() {
    let app = test_app().await;
    let alice = register(&app, "alice@example.com").await;
    let bob = register(&app, "bob@example.com").await;

    let farmer = create(
        &app,
        "/api/farmers",
        Some(&alice),
        farmer_body("grace@example.com"),
    )
    .await;
    let farmer_uri = format!("/api/farmers/{}", farmer["farmer_id"].as_str().unwrap());

    let (_, listed) = send(&app, Method::GET, "/api/farmers", Some(&alice), None).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
    let (_, listed) = send(&app, Method::GET, "/api/farmers", Some(&bob), None).await;
    assert_eq!(listed, json!([]));

    let (status, body) = send(&app, Method::GET, &farmer_uri, Some(&bob), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"message": "Farmer not found"}));

    let (status, _) = send(&app, Method::DELETE, &farmer_uri, Some(&bob), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, Method::GET, &farmer_uri, Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn deleting_a_farmer_cascades() {
    let app = test_app().await;
    let token = register(&app, "owner@example.com").await;

    let farmer = create(
        &app,
        "/api/farmers",
        Some(&token),
        farmer_body("grace@example.com"),
    )
    .await;
    let farmer_id = farmer["farmer_id"].as_str().unwrap();

    let field = create(
        &app,
        "/api/fields",
        None,
        json!({
            "farmer_id": farmer_id,
            "name": "North plot",
            "area_ha": 2.5,
            "soil_type": "loam",
            "latitude": 0.5143,
            "longitude": 35.2698,
        }),
    )
    .await;
    let field_id = field["field_id"].as_str().unwrap();

    let sensor = create(
        &app,
        "/api/sensors",
        None,
        json!({
            "field_id": field_id,
            "sensor_type": "soil_moisture",
            "installation_date": "2025-04-12",
            "status": "active",
        }),
    )
    .await;
    let sensor_id = sensor["sensor_id"].as_str().unwrap();

    let reading = create(
        &app,
        "/api/sensor-readings",
        None,
        json!({"sensor_id": sensor_id, "timestamp": "2025-05-01T06:00:00Z", "value": 0.31}),
    )
    .await;
    let prediction = create(
        &app,
        "/api/yield-predictions",
        None,
        json!({
            "field_id": field_id,
            "model_version": "rf-v1.2",
            "prediction_date": "2025-06-01",
            "predicted_yield_t_ha": 4.8,
        }),
    )
    .await;
    let recommendation = create(
        &app,
        "/api/recommendations",
        None,
        json!({
            "field_id": field_id,
            "recommendation_date": "2025-06-02",
            "recommendation_type": "irrigation",
            "message": "Irrigate 20mm before Friday",
        }),
    )
    .await;

    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/api/farmers/{farmer_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    for uri in [
        format!("/api/fields/{field_id}"),
        format!("/api/sensors/{sensor_id}"),
        format!("/api/sensor-readings/{}", reading["reading_id"]),
        format!("/api/yield-predictions/{}", prediction["prediction_id"]),
        format!("/api/recommendations/{}", recommendation["rec_id"]),
    ] {
        let (status, _) = send(&app, Method::GET, &uri, None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
    }
}

#[tokio::test]
async fn field_with_unknown_farmer_is_rejected() {
    let app = test_app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/fields",
        None,
        Some(json!({
            "farmer_id": Uuid::new_v4(),
            "name": "North plot",
            "area_ha": 2.5,
            "soil_type": "loam",
            "latitude": 0.5,
            "longitude": 35.2,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "The selected farmer id is invalid.");
    assert_eq!(
        body["errors"],
        json!({"farmer_id": ["The selected farmer id is invalid."]})
    );

    let (_, fields) = send(&app, Method::GET, "/api/fields", None, None).await;
    assert_eq!(fields, json!([]));
}

#[tokio::test]
async fn empty_list_filters_are_ignored() {
    let app = test_app().await;
    let token = register(&app, "grace@example.com").await;
    let farmer = create(&app, "/api/farmers", Some(&token), farmer_body("grace@example.com")).await;
    create(
        &app,
        "/api/fields",
        None,
        json!({
            "farmer_id": farmer["farmer_id"],
            "name": "North plot",
            "area_ha": 2.5,
            "soil_type": "loam",
            "latitude": 0.5,
            "longitude": 35.2,
        }),
    )
    .await;

    let (status, fields) = send(&app, Method::GET, "/api/fields?farmer_id=", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fields.as_array().unwrap().len(), 1);

    for uri in [
        "/api/sensors?field_id=",
        "/api/sensor-readings?sensor_id=&from=&to=",
        "/api/yield-predictions?field_id=",
        "/api/recommendations?field_id=",
    ] {
        let (status, body) = send(&app, Method::GET, uri, None, None).await;
        assert_eq!(status, StatusCode::OK, "{uri}: {body}");
        assert_eq!(body, json!([]), "{uri}");
    }

    let (status, page) = send(&app, Method::GET, "/api/products?page=&per_page=", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["current_page"], 1);
    assert_eq!(page["per_page"], 15);

    let (status, _) = send(&app, Method::GET, "/api/fields?farmer_id=abc", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn validation_reports_every_field() {
    let app = test_app().await;

    let (status, body) = send(&app, Method::POST, "/api/historical-yields", None, Some(json!({}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let mut fields: Vec<&str> = body["errors"]
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    fields.sort();
    assert_eq!(fields, ["region_or_field", "source", "year", "yield_t_ha"]);
    assert_eq!(
        body["message"],
        "The region or field field is required. (and 3 more errors)"
    );
}

#[tokio::test]
async fn partial_update_keeps_unsent_fields() {
    let app = test_app().await;

    let created = create(
        &app,
        "/api/historical-yields",
        None,
        json!({
            "region_or_field": "Uasin Gishu",
            "year": 2023,
            "yield_t_ha": 3.9,
            "source": "KALRO survey",
        }),
    )
    .await;
    let uri = format!("/api/historical-yields/{}", created["hist_id"]);

    for method in [Method::PUT, Method::PATCH] {
        let (status, updated) =
            send(&app, method, &uri, None, Some(json!({"yield_t_ha": 4.2}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["yield_t_ha"], 4.2);
        assert_eq!(updated["region_or_field"], "Uasin Gishu");
        assert_eq!(updated["year"], 2023);
        assert_eq!(updated["source"], "KALRO survey");
    }

    let (_, fetched) = send(&app, Method::GET, &uri, None, None).await;
    assert_eq!(fetched["yield_t_ha"], 4.2);
}

#[tokio::test]
async fn missing_ids_are_404_everywhere() {
    let app = test_app().await;
    let token = register(&app, "owner@example.com").await;
    let uuid = Uuid::new_v4();

    let cases = [
        (format!("/api/products/{uuid}"), "Product not found"),
        (format!("/api/farmers/{uuid}"), "Farmer not found"),
        (format!("/api/fields/{uuid}"), "Field not found"),
        (format!("/api/sensors/{uuid}"), "Sensor not found"),
        ("/api/sensor-readings/999".to_string(), "Sensor reading not found"),
        ("/api/yield-predictions/999".to_string(), "Yield prediction not found"),
        ("/api/recommendations/999".to_string(), "Recommendation not found"),
        ("/api/historical-yields/999".to_string(), "Historical yield not found"),
        ("/api/users/999".to_string(), "User not found"),
        ("/api/fields/not-a-uuid".to_string(), "Field not found"),
        ("/api/sensor-readings/abc".to_string(), "Sensor reading not found"),
    ];

    for (uri, message) in cases {
        for (method, body) in [
            (Method::GET, None),
            (Method::PUT, Some(json!({}))),
            (Method::DELETE, None),
        ] {
            let (status, response) = send(&app, method.clone(), &uri, Some(&token), body).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{method} {uri}");
            assert_eq!(response, json!({"message": message}), "{method} {uri}");
        }
    }
}

#[tokio::test]
async fn products_paginate_and_clear_nullable_fields() {
    let app = test_app().await;

    for i in 0..3 {
        create(
            &app,
            "/api/products",
            None,
            json!({
                "name": format!("Sensor kit {i}"),
                "description": "Capacitive moisture sensor",
                "firmware_version": "2.1.0",
            }),
        )
        .await;
    }

    let (status, page) = send(&app, Method::GET, "/api/products?page=2&per_page=2", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 3);
    assert_eq!(page["last_page"], 2);
    assert_eq!(page["current_page"], 2);
    assert_eq!(page["per_page"], 2);
    let data = page["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["name"], "Sensor kit 2");
    assert_eq!(data[0]["is_active"], true);

    let (status, far) = send(
        &app,
        Method::GET,
        "/api/products?page=9223372036854775807",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(far["data"], json!([]));
    assert_eq!(far["total"], 3);

    let uri = format!("/api/products/{}", data[0]["product_id"].as_str().unwrap());
    let (status, updated) = send(
        &app,
        Method::PUT,
        &uri,
        None,
        Some(json!({"description": null})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["description"], Value::Null);
    assert_eq!(updated["firmware_version"], "2.1.0");
}

#[tokio::test]
async fn malformed_bodies_are_rejected() {
    let app = test_app().await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/historical-yields")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["message"].is_string());

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/historical-yields",
        None,
        Some(json!({"region_or_field": "Nakuru", "year": "last year"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn users_crud_hides_password() {
    let app = test_app().await;
    let token = register(&app, "admin@example.com").await;

    let user = create(
        &app,
        "/api/users",
        Some(&token),
        json!({
            "name": "Juma Mwangi",
            "email": "juma@example.com",
            "password": "secret123",
            "role": "admin",
        }),
    )
    .await;
    assert_eq!(user["role"], "admin");
    assert!(user.get("password_hash").is_none());
    assert!(user.get("password").is_none());

    let uri = format!("/api/users/{}", user["id"]);
    let (status, updated) = send(
        &app,
        Method::PATCH,
        &uri,
        Some(&token),
        Some(json!({"name": "Juma M."})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Juma M.");
    assert_eq!(updated["email"], "juma@example.com");

    let (status, _) = send(&app, Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, Method::GET, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
