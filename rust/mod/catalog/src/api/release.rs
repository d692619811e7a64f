use axum::extract::{Path, State};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde_json::json;

use catalog_core::ServiceError;

use super::{message, AppState};
use crate::model::{Artifact, Release, ReleaseDependency, UpdateLog};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/releases", get(list_releases).post(save_release))
        .route(
            "/releases/{id}",
            get(get_release).put(replace_release).delete(delete_release),
        )
        .route("/releases/{id}/artifacts", post(save_artifact))
        .route("/releases/{id}/artifacts/{item}", delete(delete_artifact))
        .route("/releases/{id}/update-logs", post(save_update_log))
        .route("/releases/{id}/update-logs/{item}", delete(delete_update_log))
        .route("/releases/{id}/dependencies", post(save_dependency))
        .route("/releases/{id}/dependencies/{item}", delete(delete_dependency))
        .route("/updates", get(list_updates))
}

async fn list_releases(State(svc): State<AppState>) -> Json<Vec<Release>> {
    Json(svc.list_releases().await)
}

async fn get_release(
    State(svc): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Release>, ServiceError> {
    Ok(Json(svc.get_release(id).await?))
}

async fn save_release(
    State(svc): State<AppState>,
    Json(body): Json<Release>,
) -> Result<Json<Release>, ServiceError> {
    Ok(Json(svc.save_release(body).await?))
}

async fn replace_release(
    State(svc): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<Release>,
) -> Result<Json<Release>, ServiceError> {
    Ok(Json(svc.replace_release(id, body).await?))
}

async fn delete_release(
    State(svc): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    svc.delete_release(id).await?;
    Ok(message("deleted"))
}

async fn save_artifact(
    State(svc): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<Artifact>,
) -> Result<Json<Artifact>, ServiceError> {
    Ok(Json(svc.save_artifact(id, body).await?))
}

async fn delete_artifact(
    State(svc): State<AppState>,
    Path((id, item)): Path<(i64, i64)>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    svc.delete_artifact(id, item).await?;
    Ok(Json(json!({ "deleted": item })))
}

async fn save_update_log(
    State(svc): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateLog>,
) -> Result<Json<UpdateLog>, ServiceError> {
    Ok(Json(svc.save_update_log(id, body).await?))
}

async fn delete_update_log(
    State(svc): State<AppState>,
    Path((id, item)): Path<(i64, i64)>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    svc.delete_update_log(id, item).await?;
    Ok(Json(json!({ "deleted": item })))
}

async fn save_dependency(
    State(svc): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<ReleaseDependency>,
) -> Result<Json<ReleaseDependency>, ServiceError> {
    Ok(Json(svc.save_dependency(id, body).await?))
}

async fn delete_dependency(
    State(svc): State<AppState>,
    Path((id, item)): Path<(i64, i64)>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    svc.delete_dependency(id, item).await?;
    Ok(Json(json!({ "deleted": item })))
}

async fn list_updates(State(svc): State<AppState>) -> Json<Vec<Release>> {
    Json(svc.list_updates().await)
}
