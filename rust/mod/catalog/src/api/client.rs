use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};

use catalog_core::ServiceError;

use super::{message, AppState};
use crate::model::Client;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/clients", get(list_clients).post(create_client))
        .route(
            "/clients/{id}",
            get(get_client).put(replace_client).delete(delete_client),
        )
}

async fn list_clients(State(svc): State<AppState>) -> Json<Vec<Client>> {
    Json(svc.list_clients().await)
}

async fn get_client(
    State(svc): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Client>, ServiceError> {
    Ok(Json(svc.get_client(id).await?))
}

async fn create_client(
    State(svc): State<AppState>,
    Json(body): Json<Client>,
) -> Result<Json<Client>, ServiceError> {
    Ok(Json(svc.create_client(body).await?))
}

async fn replace_client(
    State(svc): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<Client>,
) -> Result<Json<Client>, ServiceError> {
    Ok(Json(svc.replace_client(id, body).await?))
}

async fn delete_client(
    State(svc): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    svc.delete_client(id).await?;
    Ok(message("Client deleted"))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::api::test_util::{app, call};

    #[tokio::test]
    async fn test_client_crud() {
        let app = app();
        let (status, c) = call(
            &app,
            "POST",
            "/clients",
            Some(json!({"name": "Acme", "email": "a@acme.com", "primaryContact": "Jo"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(c["clientId"], 1);
        assert_eq!(c["locations"], json!([]));
        assert_eq!(c["productIds"], json!([]));

        let (status, got) = call(&app, "GET", "/clients/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(got["name"], "Acme");

        let (_, replaced) = call(
            &app,
            "PUT",
            "/clients/1",
            Some(json!({"name": "Acme Corp", "email": "a@acme.com", "primaryContact": "Jo"})),
        )
        .await;
        assert_eq!(replaced["name"], "Acme Corp");
        assert_eq!(replaced["createdAt"], c["createdAt"]);

        let (status, body) = call(&app, "DELETE", "/clients/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Client deleted");

        let (status, body) = call(&app, "GET", "/clients/1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Client not found");
    }

    #[tokio::test]
    async fn test_malformed_body_is_rejected() {
        let app = app();
        let (status, _) = call(&app, "POST", "/clients", Some(json!({"locations": 5}))).await;
        assert!(status.is_client_error());
    }
}
