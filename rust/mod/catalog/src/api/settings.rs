use axum::extract::{Path, State};
use axum::routing::{delete, get, post};
use axum::{Json, Router};

use catalog_core::ServiceError;

use super::{message, AppState};
use crate::model::{Notification, NotificationAdded, Settings, User, UserSaved};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/settings", get(get_settings))
        .route("/settings/user", post(save_user))
        .route("/settings/notifications", post(add_notification))
        .route("/settings/notifications/{id}", delete(delete_notification))
}

async fn get_settings(State(svc): State<AppState>) -> Result<Json<Settings>, ServiceError> {
    Ok(Json(svc.get_settings().await?))
}

async fn save_user(
    State(svc): State<AppState>,
    Json(body): Json<User>,
) -> Result<Json<UserSaved>, ServiceError> {
    let user = svc.save_user(body).await?;
    Ok(Json(UserSaved {
        message: "User updated successfully".to_string(),
        user,
    }))
}

async fn add_notification(
    State(svc): State<AppState>,
    Json(body): Json<Notification>,
) -> Result<Json<NotificationAdded>, ServiceError> {
    let notification = svc.add_notification(body).await?;
    Ok(Json(NotificationAdded {
        message: "Notification added successfully".to_string(),
        notification,
    }))
}

async fn delete_notification(
    State(svc): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    svc.delete_notification(id).await?;
    Ok(message(format!("Notification {} deleted successfully", id)))
}
