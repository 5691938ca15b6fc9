pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;
use crate::views::handlers;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Browser pages
        .route("/", get(handlers::handle_home_page))
        .route("/resume/:id", get(handlers::handle_resume_page))
        .route("/views/:view_id", get(handlers::handle_view_page))
        .route(
            "/views/:view_id/panels/:item/toggle",
            post(handlers::handle_toggle_page),
        )
        .route("/blobs/:blob_id", get(handlers::handle_blob))
        // View API
        .route("/api/v1/views", post(handlers::handle_create_view))
        .route(
            "/api/v1/views/:view_id",
            get(handlers::handle_get_view).delete(handlers::handle_close_view),
        )
        .route(
            "/api/v1/views/:view_id/reload",
            post(handlers::handle_reload_view),
        )
        .route(
            "/api/v1/views/:view_id/panels/:item/toggle",
            post(handlers::handle_toggle_panel),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
        response::Response,
    };
    use async_trait::async_trait;
    use bytes::Bytes;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::auth::{AuthError, AuthProvider, AuthStatus, StaticTokenAuth};
    use crate::storage::memory::MemoryStore;
    use crate::views::blobs::BlobRegistry;
    use crate::views::session::ViewRegistry;

    const TOKEN: &str = "test-token";

    /// Auth backend that never finishes deciding.
    struct LoadingAuth;

    #[async_trait]
    impl AuthProvider for LoadingAuth {
        async fn status(&self, _token: Option<&str>) -> Result<AuthStatus, AuthError> {
            Ok(AuthStatus::LOADING)
        }
    }

    fn test_state() -> (AppState, Arc<MemoryStore>) {
        state_with_auth(Arc::new(StaticTokenAuth::new(vec![TOKEN.to_string()])))
    }

    fn state_with_auth(auth: Arc<dyn AuthProvider>) -> (AppState, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        store.put_value(
            "resume:r1",
            json!({
                "resumePath": "uploads/r1.pdf",
                "imagePath": "uploads/r1.png",
                "feedback": {
                    "overallScore": 77,
                    "ATS": {"score": 64, "tips": [{"type": "improve", "tip": "Use keywords"}]},
                    "toneAndStyle": {"score": 90, "tips": [{"type": "good", "tip": "Confident voice"}]},
                    "content": {"score": 40, "tips": []},
                    "structure": {"score": 55, "tips": []},
                    "skills": {"score": 70, "tips": []}
                }
            })
            .to_string(),
        );
        store.put_file("uploads/r1.pdf", Bytes::from_static(b"%PDF-1.7"));
        store.put_file("uploads/r1.png", Bytes::from_static(b"\x89PNG"));

        let state = AppState {
            kv: store.clone(),
            files: store.clone(),
            auth,
            blobs: BlobRegistry::new(),
            views: ViewRegistry::new(),
        };
        (state, store)
    }

    async fn send(state: &AppState, method: Method, uri: &str, body: Option<Value>) -> Response {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {TOKEN}"));
        let body = match body {
            Some(v) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(v.to_string())
            }
            None => Body::empty(),
        };
        build_router(state.clone())
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn text_body(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn create_view(state: &AppState, resume_id: &str) -> Value {
        let response = send(
            state,
            Method::POST,
            "/api/v1/views",
            Some(json!({ "resume_id": resume_id })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        json_body(response).await
    }

    #[tokio::test]
    async fn test_health() {
        let (state, _) = test_state();
        let response = send(&state, Method::GET, "/health", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_unauthenticated_page_redirects_to_auth() {
        let (state, _) = test_state();
        let response = build_router(state)
            .oneshot(Request::get("/resume/r1").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers()[header::LOCATION],
            "/auth?next=%2Fresume%2Fr1"
        );
    }

    #[tokio::test]
    async fn test_unauthenticated_api_is_401_with_redirect() {
        let (state, _) = test_state();
        let request = Request::post("/api/v1/views")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"resume_id":"r1"}"#))
            .unwrap();
        let response = build_router(state).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = json_body(response).await;
        assert_eq!(body["error"]["redirect"], "/auth?next=%2Fresume%2Fr1");
    }

    #[tokio::test]
    async fn test_session_cookie_authenticates_page() {
        let (state, _) = test_state();
        let request = Request::get("/resume/r1")
            .header(header::COOKIE, format!("session={TOKEN}"))
            .body(Body::empty())
            .unwrap();
        let response = build_router(state).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = text_body(response).await;
        assert!(html.contains("Resume Review"));
        assert!(html.contains("Use keywords"));
    }

    #[tokio::test]
    async fn test_create_view_returns_ready_model() {
        let (state, _) = test_state();
        let body = create_view(&state, "r1").await;
        assert_eq!(body["state"], "ready");
        assert_eq!(body["feedback"]["overall_score"], 77);
        assert_eq!(body["feedback"]["ats"]["badge"], "Good Start");
        assert_eq!(body["disclosure"]["open_item"], Value::Null);
        assert!(body["resume_url"].as_str().unwrap().starts_with("/blobs/"));
    }

    #[tokio::test]
    async fn test_missing_record_stays_loading() {
        let (state, _) = test_state();
        let body = create_view(&state, "unknown").await;
        assert_eq!(body["state"], "loading");
        assert_eq!(body["feedback"], Value::Null);
    }

    #[tokio::test]
    async fn test_store_outage_degrades_to_minimal_feedback() {
        let (state, store) = test_state();
        store.fail_reads();
        let body = create_view(&state, "r1").await;
        assert_eq!(body["state"], "ready");
        assert_eq!(body["feedback"]["overall_score"], 0);
        assert_eq!(
            body["feedback"]["ats"]["tips"]["items"][0]["text"],
            "Feedback could not be loaded"
        );
    }

    #[tokio::test]
    async fn test_toggle_keeps_single_panel_open() {
        let (state, _) = test_state();
        let view = create_view(&state, "r1").await;
        let view_id = view["view_id"].as_str().unwrap();
        let toggle = |item: &str| format!("/api/v1/views/{view_id}/panels/{item}/toggle");

        let body = json_body(send(&state, Method::POST, &toggle("content"), None).await).await;
        assert_eq!(body["open_item"], "content");

        let body = json_body(send(&state, Method::POST, &toggle("skills"), None).await).await;
        assert_eq!(body["open_item"], "skills");
        let expanded: Vec<&Value> = body["items"]
            .as_array()
            .unwrap()
            .iter()
            .filter(|i| i["expanded"] == true)
            .collect();
        assert_eq!(expanded.len(), 1);

        let body = json_body(send(&state, Method::POST, &toggle("skills"), None).await).await;
        assert_eq!(body["open_item"], Value::Null);
    }

    #[tokio::test]
    async fn test_toggle_unknown_panel_is_404() {
        let (state, _) = test_state();
        let view = create_view(&state, "r1").await;
        let view_id = view["view_id"].as_str().unwrap();
        let uri = format!("/api/v1/views/{view_id}/panels/ats/toggle");
        let response = send(&state, Method::POST, &uri, None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_page_toggle_redirects_back_and_renders_open_panel() {
        let (state, _) = test_state();
        let view = create_view(&state, "r1").await;
        let view_id = view["view_id"].as_str().unwrap();

        let uri = format!("/views/{view_id}/panels/tone-style/toggle");
        let response = send(&state, Method::POST, &uri, None).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], format!("/views/{view_id}").as_str());

        let page = send(&state, Method::GET, &format!("/views/{view_id}"), None).await;
        let html = text_body(page).await;
        assert!(html.contains("Confident voice"));
        // Only the open panel renders its body; the empty panels stay closed.
        assert!(!html.contains("No specific feedback"));
    }

    #[tokio::test]
    async fn test_blob_served_until_view_closed() {
        let (state, _) = test_state();
        let view = create_view(&state, "r1").await;
        let view_id = view["view_id"].as_str().unwrap().to_string();
        let resume_url = view["resume_url"].as_str().unwrap().to_string();

        let response = send(&state, Method::GET, &resume_url, None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
        assert_eq!(text_body(response).await, "%PDF-1.7");

        let response = send(&state, Method::DELETE, &format!("/api/v1/views/{view_id}"), None).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(state.blobs.len(), 0);

        let response = send(&state, Method::GET, &resume_url, None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let response = send(&state, Method::GET, &format!("/api/v1/views/{view_id}"), None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_reload_supersedes_previous_blobs() {
        let (state, _) = test_state();
        let view = create_view(&state, "r1").await;
        let view_id = view["view_id"].as_str().unwrap();
        let old_image = view["image_url"].as_str().unwrap().to_string();

        let uri = format!("/api/v1/views/{view_id}/reload");
        let body = json_body(send(&state, Method::POST, &uri, None).await).await;
        assert_ne!(body["image_url"].as_str().unwrap(), old_image);
        assert_eq!(state.blobs.len(), 2);

        let response = send(&state, Method::GET, &old_image, None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    async fn get_anonymous(state: &AppState, uri: &str) -> Response {
        build_router(state.clone())
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_redirect_escapes_control_characters() {
        let (state, _) = test_state();
        let response = get_anonymous(&state, "/resume/r1%0Aevil").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let location = response.headers()[header::LOCATION].to_str().unwrap();
        assert_eq!(location, "/auth?next=%2Fresume%2Fr1%0Aevil");
    }

    #[tokio::test]
    async fn test_redirect_cannot_inject_query_parameters() {
        let (state, _) = test_state();
        let response = get_anonymous(&state, "/resume/r1%26next%3Dhttps:%2F%2Fevil.example").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let location = response.headers()[header::LOCATION].to_str().unwrap();
        assert_eq!(location.matches("next=").count(), 1);
        assert!(location.ends_with("r1%26next%3Dhttps%3A%2F%2Fevil.example"));
    }

    #[tokio::test]
    async fn test_repeated_page_loads_reuse_one_view() {
        let (state, _) = test_state();
        for _ in 0..20 {
            let response = send(&state, Method::GET, "/resume/r1", None).await;
            assert_eq!(response.status(), StatusCode::OK);
        }
        assert_eq!(state.views.len(), 1);
        assert_eq!(state.blobs.len(), 2);
    }

    #[tokio::test]
    async fn test_pending_auth_renders_scanning_page() {
        let (state, _) = state_with_auth(Arc::new(LoadingAuth));
        let response = send(&state, Method::GET, "/resume/r1", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let html = text_body(response).await;
        assert!(html.contains("resume-scan-2.gif"));
        assert!(!html.contains("Use keywords"));
        assert_eq!(state.views.len(), 0);
    }

    #[tokio::test]
    async fn test_pending_auth_api_is_503() {
        let (state, _) = state_with_auth(Arc::new(LoadingAuth));
        let response = send(
            &state,
            Method::POST,
            "/api/v1/views",
            Some(json!({ "resume_id": "r1" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(json_body(response).await["error"]["code"], "AUTH_PENDING");
        assert_eq!(state.views.len(), 0);
    }

    #[tokio::test]
    async fn test_home_lists_resumes() {
        let (state, _) = test_state();
        let response = send(&state, Method::GET, "/", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let html = text_body(response).await;
        assert!(html.contains(r#"href="/resume/r1""#));
        assert!(html.contains("77/100 Strong"));
    }

    #[tokio::test]
    async fn test_home_requires_auth() {
        let (state, _) = test_state();
        let response = get_anonymous(&state, "/").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/auth?next=%2F");
    }

    #[tokio::test]
    async fn test_home_store_outage_is_storage_error() {
        let (state, store) = test_state();
        store.fail_reads();
        let response = send(&state, Method::GET, "/", None).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json_body(response).await["error"]["code"], "STORAGE_ERROR");
    }
}
