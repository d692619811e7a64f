//! Client tests against an in-process catalog server.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};

use catalog::model::{
    Artifact, Changelog, Client, ClientLocation, License, LicenseStatus, Notification,
    NotificationType, Product, Release,
};
use catalog::CatalogService;
use catalog_client::{ApiError, CatalogApi, RetryPolicy, IDEMPOTENCY_KEY};

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn start_catalog() -> CatalogApi {
    let service = Arc::new(CatalogService::in_memory());
    let app = Router::new()
        .nest("/api", catalog::router(service))
        .route("/health", get(|| async { Json(serde_json::json!({"status": "ok"})) }));
    let base = serve(app).await;
    let api = CatalogApi::new(&base);

    // Wait for the server to be ready.
    for _ in 0..50 {
        if api.health().await.is_ok() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    api
}

#[tokio::test]
async fn product_create_returns_seeded_release() {
    let api = start_catalog().await;
    let created = api
        .products()
        .create(&Product::new("Analytics Pro", "ANPR-001"))
        .await
        .unwrap();
    assert_eq!(created.product_id, 1);
    assert_eq!(created.releases[0].version, "1.0.0");

    let all = api.products().list().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].name, "Analytics Pro");
}

#[tokio::test]
async fn update_returns_server_record() {
    let api = start_catalog().await;
    api.products().create(&Product::new("A", "A-1")).await.unwrap();

    let mut patch = Product::new("Renamed", "A-1");
    patch.product_id = 1;
    let updated = api.products().update(1, &patch).await.unwrap();
    assert_eq!(updated.name, "Renamed");
    assert!(updated.last_modified.is_some());
    assert!(updated.created_at.is_some());
}

#[tokio::test]
async fn missing_records_are_http_errors() {
    let api = start_catalog().await;
    let err = api.clients().get(42).await.unwrap_err();
    assert!(matches!(err, ApiError::Http { status: 404 }));

    let err = api.licenses().remove(42).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn client_round_trip_with_location() {
    let api = start_catalog().await;
    let client = Client {
        name: "Acme".into(),
        email: "a@acme.com".into(),
        primary_contact: "Jo".into(),
        locations: vec![ClientLocation {
            client_location_id: 1_700_000_000_000,
            address: "1 Main St".into(),
            city: "Springfield".into(),
            country: "US".into(),
        }],
        ..Default::default()
    };
    let created = api.clients().create(&client).await.unwrap();
    let fetched = api.clients().get(created.client_id).await.unwrap();
    assert_eq!(fetched.locations, client.locations);

    api.clients().remove(created.client_id).await.unwrap();
    assert!(api.clients().list().await.unwrap().is_empty());
}

#[tokio::test]
async fn nested_collections() {
    let api = start_catalog().await;
    let mut release = Release::draft(1, "2.0.0", "2024-05-01");
    release.changelog = Changelog::from_texts("Launch", "New cluster");
    let release = api.releases().create(&release).await.unwrap();
    assert_eq!(release.changelog.infra(), vec!["New cluster"]);

    let artifacts = api.artifacts(release.release_id);
    let a = artifacts
        .create(&Artifact {
            file_url: "https://cdn/x.bin".into(),
            size: 10,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(a.artifact_id, 1);

    let mut bigger = a.clone();
    bigger.size = 20;
    let upserted = artifacts.update(a.artifact_id, &bigger).await.unwrap();
    assert_eq!(upserted.size, 20);

    let stored = api.releases().get(release.release_id).await.unwrap();
    assert_eq!(stored.artifacts.len(), 1);
    assert_eq!(stored.artifacts[0].size, 20);

    artifacts.remove(a.artifact_id).await.unwrap();
    assert!(api.releases().get(release.release_id).await.unwrap().artifacts.is_empty());
}

#[tokio::test]
async fn settings_and_feed() {
    let api = start_catalog().await;
    let settings = api.settings().await.unwrap();

    let mut user = settings.user.clone();
    user.name = "Ann".into();
    assert_eq!(api.save_user(&user).await.unwrap().name, "Ann");

    let n = api
        .add_notification(&Notification {
            user_id: user.user_id,
            kind: NotificationType::ReleasePublished,
            message: "v2".into(),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(n.notification_id, 1);
    api.delete_notification(n.notification_id).await.unwrap();

    api.products().create(&Product::new("Suite", "S-1")).await.unwrap();
    let feed = api.updates().await.unwrap();
    assert_eq!(feed[0].product_name.as_deref(), Some("Suite"));

    assert!(!api.server_time().await.unwrap().is_empty());
}

#[tokio::test]
async fn assignments() {
    let api = start_catalog().await;
    let a = api.assign_product(1, 2).await.unwrap();
    let err = api.assign_product(1, 2).await.unwrap_err();
    assert_eq!(err.status(), Some(400));

    assert_eq!(api.assignments().list().await.unwrap().len(), 1);
    api.assignments().remove(a.id).await.unwrap();
}

#[tokio::test]
async fn license_put_replaces() {
    let api = start_catalog().await;
    let l = api
        .licenses()
        .create(&License {
            client_id: 1,
            product_id: 1,
            license_key: "ABCDEFGH-12345678".into(),
            end_date: "2030-01-01".into(),
            ..Default::default()
        })
        .await
        .unwrap();
    let mut revoked = l.clone();
    revoked.status = LicenseStatus::Revoked;
    let saved = api.licenses().update(l.license_id, &revoked).await.unwrap();
    assert_eq!(saved.status, LicenseStatus::Revoked);
}

#[tokio::test]
async fn envelope_lists_are_unwrapped() {
    let app = Router::new().route(
        "/api/clients",
        get(|| async {
            Json(serde_json::json!({"clients": [{"clientId": 3, "name": "Acme"}]}))
        }),
    );
    let api = CatalogApi::new(&serve(app).await);
    let clients = api.clients().list().await.unwrap();
    assert_eq!(clients.len(), 1);
    assert_eq!(clients[0].client_id, 3);
}

// ── Retry policy ──

#[derive(Default)]
struct Flaky {
    calls: AtomicU32,
    keys: Mutex<Vec<Option<String>>>,
}

/// Server whose POST /api/products fails with 503 `failures` times.
async fn flaky_server(failures: u32) -> (String, Arc<Flaky>) {
    let state = Arc::new(Flaky::default());
    let s = state.clone();
    let app = Router::new().route(
        "/api/products",
        post(move |headers: HeaderMap, Json(mut body): Json<serde_json::Value>| {
            let s = s.clone();
            async move {
                let n = s.calls.fetch_add(1, Ordering::SeqCst) + 1;
                let key = headers
                    .get(IDEMPOTENCY_KEY)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string);
                s.keys.lock().unwrap().push(key);
                if n <= failures {
                    return Err(StatusCode::SERVICE_UNAVAILABLE);
                }
                body["productId"] = serde_json::json!(n);
                Ok(Json(body))
            }
        }),
    );
    (serve(app).await, state)
}

#[tokio::test]
async fn no_retry_by_default() {
    let (base, state) = flaky_server(1).await;
    let api = CatalogApi::new(&base);
    let err = api.products().create(&Product::new("A", "A-1")).await.unwrap_err();
    assert_eq!(err.status(), Some(503));
    assert_eq!(state.calls.load(Ordering::SeqCst), 1);
    assert_eq!(state.keys.lock().unwrap()[0], None);
}

#[tokio::test]
async fn retries_reuse_one_idempotency_key() {
    let (base, state) = flaky_server(2).await;
    let api = CatalogApi::with_retry(&base, RetryPolicy::exponential(3, Duration::from_millis(5)));
    let p = api.products().create(&Product::new("A", "A-1")).await.unwrap();
    assert_eq!(p.product_id, 3);
    assert_eq!(state.calls.load(Ordering::SeqCst), 3);

    let keys = state.keys.lock().unwrap();
    let first = keys[0].clone().expect("idempotency key");
    assert!(uuid_like(&first));
    assert!(keys.iter().all(|k| k.as_deref() == Some(first.as_str())));
}

#[tokio::test]
async fn retries_give_up_after_max_attempts() {
    let (base, state) = flaky_server(10).await;
    let api = CatalogApi::with_retry(&base, RetryPolicy::exponential(2, Duration::from_millis(1)));
    let err = api.products().create(&Product::new("A", "A-1")).await.unwrap_err();
    assert!(err.is_retryable());
    assert_eq!(state.calls.load(Ordering::SeqCst), 2);
}

fn uuid_like(s: &str) -> bool {
    s.len() == 36 && s.chars().filter(|c| *c == '-').count() == 4
}
