use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};

use catalog_core::ServiceError;

use super::{message, AppState};
use crate::model::License;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/licenses", get(list_licenses).post(create_license))
        .route(
            "/licenses/{id}",
            get(get_license).put(replace_license).delete(delete_license),
        )
}

async fn list_licenses(State(svc): State<AppState>) -> Json<Vec<License>> {
    Json(svc.list_licenses().await)
}

async fn get_license(
    State(svc): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<License>, ServiceError> {
    Ok(Json(svc.get_license(id).await?))
}

async fn create_license(
    State(svc): State<AppState>,
    Json(body): Json<License>,
) -> Result<Json<License>, ServiceError> {
    Ok(Json(svc.create_license(body).await?))
}

async fn replace_license(
    State(svc): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<License>,
) -> Result<Json<License>, ServiceError> {
    Ok(Json(svc.replace_license(id, body).await?))
}

async fn delete_license(
    State(svc): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    svc.delete_license(id).await?;
    Ok(message(format!("License {} deleted successfully", id)))
}
