//! # ルーター構築

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::config::AppState;
use crate::endpoints::{handle_health, handle_not_found, handle_root, handle_scan};

/// Gatewayのルーターを構築する。
pub fn build_router(state: Arc<AppState>, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/", get(handle_root))
        .route("/health", get(handle_health))
        .route("/api/v1/scan", post(handle_scan))
        .fallback(handle_not_found)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use sentinel_types::{EntryStatus, PluginEntry};
    use tower::ServiceExt;

    use crate::endpoints::root::ROOT_MESSAGE;
    use crate::registry::{storage_key, MemoryRegistry, PluginRegistry, RegistryError};

    const TEST_BODY_LIMIT: usize = 64 * 1024;

    fn verified_hash() -> String {
        "ab".repeat(32)
    }

    fn test_state(registry: Arc<dyn PluginRegistry>) -> Arc<AppState> {
        Arc::new(AppState {
            registry,
            registry_concurrency: 8,
            scan_timeout: Duration::from_secs(5),
        })
    }

    fn test_app() -> Router {
        let registry = MemoryRegistry::new().with_entry(
            storage_key(&verified_hash()),
            PluginEntry {
                name: "SkyUI".to_string(),
                nexus_id: 3863,
                filename: Some("SkyUI_5_2_SE.esp".to_string()),
                author: Some("SkyUI Team".to_string()),
                status: EntryStatus::Verified,
            },
        );
        build_router(test_state(Arc::new(registry)), TEST_BODY_LIMIT)
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .unwrap();
        (status, body.to_vec())
    }

    async fn post_scan(app: Router, body: impl Into<Body>) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/scan")
            .header("content-type", "application/json")
            .body(body.into())
            .unwrap();
        let (status, bytes) = send(app, request).await;
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_root() {
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let (status, body) = send(test_app(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(String::from_utf8(body).unwrap(), ROOT_MESSAGE);
    }

    #[tokio::test]
    async fn test_health() {
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, body) = send(test_app(), request).await;
        assert_eq!(status, StatusCode::OK);

        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "ok");
        assert!(json["timestamp"].is_string());
        assert_eq!(json["version"], crate::config::VERSION);
    }

    #[tokio::test]
    async fn test_scan_rejects_invalid_json() {
        let (status, json) = post_scan(test_app(), "not valid json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "INVALID_JSON");
    }

    #[tokio::test]
    async fn test_scan_rejects_missing_hashes() {
        let (status, json) = post_scan(test_app(), r#"{"foo":"bar"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "INVALID_REQUEST");
    }

    #[tokio::test]
    async fn test_scan_rejects_empty_hashes() {
        let (status, json) = post_scan(test_app(), r#"{"hashes":[]}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "EMPTY_HASHES");
        assert!(json["error"].is_string());
    }

    #[tokio::test]
    async fn test_scan_rejects_invalid_hash_format() {
        let (status, json) =
            post_scan(test_app(), r#"{"hashes":["tooshort","invalid!@#"]}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "INVALID_HASH_FORMAT");
        assert_eq!(json["details"], "invalid entries at indices: 0, 1");
    }

    #[tokio::test]
    async fn test_scan_unknown_hash() {
        let valid = "a".repeat(64);
        let body = serde_json::json!({ "hashes": [valid] }).to_string();
        let (status, json) = post_scan(test_app(), body).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["scanned"], 1);
        assert_eq!(json["verified"], 0);
        assert_eq!(json["unknown"], 1);
        assert_eq!(json["revoked"], 0);
        assert!(json["timestamp"].is_string());
        assert_eq!(json["results"][0]["hash"], valid);
        assert_eq!(json["results"][0]["status"], "unknown");
        assert!(json["results"][0]["plugin"].is_null());
    }

    #[tokio::test]
    async fn test_scan_verified_hash_uppercase() {
        let upper = verified_hash().to_uppercase();
        let body = serde_json::json!({ "hashes": [upper, "b".repeat(64)] }).to_string();
        let (status, json) = post_scan(test_app(), body).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["scanned"], 2);
        assert_eq!(json["verified"], 1);
        assert_eq!(json["unknown"], 1);

        let first = &json["results"][0];
        assert_eq!(first["hash"], upper);
        assert_eq!(first["status"], "verified");
        assert_eq!(first["plugin"]["name"], "SkyUI");
        assert_eq!(first["plugin"]["nexusId"], 3863);
        assert_eq!(first["plugin"]["author"], "SkyUI Team");
        assert!(first["plugin"].get("status").is_none());
    }

    /// 応答しないレジストリで処理期限を超えた場合に500となることを確認
    #[tokio::test]
    async fn test_scan_deadline_is_internal_error() {
        struct StalledRegistry;

        #[async_trait::async_trait]
        impl PluginRegistry for StalledRegistry {
            async fn get(&self, _key: &str) -> Result<Option<PluginEntry>, RegistryError> {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(None)
            }

            fn backend_name(&self) -> &'static str {
                "stalled"
            }
        }

        let state = Arc::new(AppState {
            registry: Arc::new(StalledRegistry),
            registry_concurrency: 8,
            scan_timeout: Duration::from_millis(50),
        });
        let app = build_router(state, TEST_BODY_LIMIT);
        let body = serde_json::json!({ "hashes": ["c".repeat(64)] }).to_string();
        let (status, json) = post_scan(app, body).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["code"], "INTERNAL_ERROR");
        assert!(json.get("results").is_none());
    }

    #[tokio::test]
    async fn test_body_limit() {
        let hashes: Vec<String> = (0..2000).map(|_| "d".repeat(64)).collect();
        let body = serde_json::json!({ "hashes": hashes }).to_string();
        assert!(body.len() > TEST_BODY_LIMIT);

        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/scan")
            .body(Body::from(body))
            .unwrap();
        let (status, _) = send(test_app(), request).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let request = Request::builder()
            .uri("/api/v2/scan")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(test_app(), request).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_scan_wrong_method() {
        let request = Request::builder()
            .uri("/api/v1/scan")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(test_app(), request).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }
}
