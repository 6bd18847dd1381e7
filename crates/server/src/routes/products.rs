use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::Json as ResponseJson,
    routing::get,
};
use db::models::product::Product;
use services::services::product::{NOT_FOUND, ProductPayload, ProductQuery, ProductService};
use utils::response::Page;
use uuid::Uuid;

use crate::{
    AppState,
    error::ApiError,
    extract::{AppJson, AppQuery, parse_id},
};

/// GET /api/products?page=&per_page=
pub async fn list_products(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ProductQuery>,
) -> Result<ResponseJson<Page<Product>>, ApiError> {
    let page = ProductService::list(state.pool(), &query, state.products_per_page).await?;
    Ok(ResponseJson(page))
}

/// POST /api/products
pub async fn create_product(
    State(state): State<AppState>,
    AppJson(payload): AppJson<ProductPayload>,
) -> Result<(StatusCode, ResponseJson<Product>), ApiError> {
    let product = ProductService::create(state.pool(), payload).await?;
    Ok((StatusCode::CREATED, ResponseJson(product)))
}

/// GET /api/products/{product_id}
pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<ResponseJson<Product>, ApiError> {
    let product_id: Uuid = parse_id(&product_id, NOT_FOUND)?;
    Ok(ResponseJson(
        ProductService::find(state.pool(), product_id).await?,
    ))
}

/// PUT/PATCH /api/products/{product_id}
/// `null` clears description, image_url or firmware_version; omitted fields are kept
pub async fn update_product(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    AppJson(payload): AppJson<ProductPayload>,
) -> Result<ResponseJson<Product>, ApiError> {
    let product_id: Uuid = parse_id(&product_id, NOT_FOUND)?;
    let product = ProductService::update(state.pool(), product_id, payload).await?;
    Ok(ResponseJson(product))
}

/// DELETE /api/products/{product_id}
pub async fn delete_product(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let product_id: Uuid = parse_id(&product_id, NOT_FOUND)?;
    ProductService::delete(state.pool(), product_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router(_state: &AppState) -> Router<AppState> {
    Router::new().nest(
        "/products",
        Router::new()
            .route("/", get(list_products).post(create_product))
            .route(
                "/{product_id}",
                get(get_product)
                    .put(update_product)
                    .patch(update_product)
                    .delete(delete_product),
            ),
    )
}
