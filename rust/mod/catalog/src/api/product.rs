use axum::extract::{Path, State};
use axum::routing::{get, put};
use axum::{Json, Router};

use catalog_core::ServiceError;

use super::{message, AppState};
use crate::model::Product;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route(
            "/products/{id}",
            put(update_product).get(get_product).delete(delete_product),
        )
}

async fn list_products(State(svc): State<AppState>) -> Json<Vec<Product>> {
    Json(svc.list_products().await)
}

async fn get_product(
    State(svc): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Product>, ServiceError> {
    Ok(Json(svc.get_product(id).await?))
}

async fn create_product(
    State(svc): State<AppState>,
    Json(body): Json<Product>,
) -> Result<Json<Product>, ServiceError> {
    Ok(Json(svc.create_product(body).await?))
}

async fn update_product(
    State(svc): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<serde_json::Value>,
) -> Result<Json<Product>, ServiceError> {
    Ok(Json(svc.update_product(id, patch).await?))
}

async fn delete_product(
    State(svc): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    svc.delete_product(id).await?;
    Ok(message("Product deleted"))
}
