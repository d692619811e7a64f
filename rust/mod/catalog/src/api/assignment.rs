use axum::extract::{Path, State};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde_json::json;

use catalog_core::ServiceError;

use super::AppState;
use crate::model::ClientProduct;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/client-products", get(list_assignments))
        .route("/client-products/{id}", delete(delete_assignment))
        .route("/clients/{id}/assign/{product_id}", post(assign_product))
}

async fn list_assignments(State(svc): State<AppState>) -> Json<Vec<ClientProduct>> {
    Json(svc.list_assignments().await)
}

async fn assign_product(
    State(svc): State<AppState>,
    Path((client_id, product_id)): Path<(i64, i64)>,
) -> Result<Json<ClientProduct>, ServiceError> {
    Ok(Json(svc.assign_product(client_id, product_id).await?))
}

async fn delete_assignment(
    State(svc): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    svc.delete_assignment(id).await?;
    Ok(Json(json!({ "success": true })))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::api::test_util::{app, call};

    #[tokio::test]
    async fn test_assign_twice_is_bad_request() {
        let app = app();
        let (status, a) = call(&app, "POST", "/clients/1/assign/2", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(a["clientId"], 1);
        assert_eq!(a["productId"], 2);

        let (status, body) = call(&app, "POST", "/clients/1/assign/2", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Already assigned");

        let (_, list) = call(&app, "GET", "/client-products", None).await;
        assert_eq!(list.as_array().unwrap().len(), 1);

        let (status, body) = call(&app, "DELETE", "/client-products/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
    }
}
