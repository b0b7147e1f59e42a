//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;
use vidshare_core::repository::{EventRepository, ViewCounter};
use vidshare_test_support::{
    FixedClock, InMemoryEventRepository, InMemoryViewCounter, SequentialIdGenerator,
    StaticIdentityResolver, fixed_time,
};

use vidshare_api::routes;
use vidshare_api::state::AppState;

/// Bearer tokens known to the test identity resolver, as `(token, actor)`.
pub const USERS: [(&str, &str); 4] = [
    ("token-owner", "owner"),
    ("token-u1", "u1"),
    ("token-u2", "u2"),
    ("token-u3", "u3"),
];

/// A full application over an in-memory store and view counter, with a
/// fixed clock and sequential ids. Cloning shares both, so requests observe
/// each other's writes.
#[derive(Clone)]
pub struct TestApp {
    pub store: Arc<InMemoryEventRepository>,
    pub views: Arc<InMemoryViewCounter>,
    router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryEventRepository::new());
        let views = Arc::new(InMemoryViewCounter::new());
        let router = build_app(store.clone(), views.clone());
        Self {
            store,
            views,
            router,
        }
    }

    /// Same application over other stores; `store` and `views` stay unused.
    pub fn with_stores(
        event_repository: Arc<dyn EventRepository>,
        view_counter: Arc<dyn ViewCounter>,
    ) -> Self {
        Self {
            store: Arc::new(InMemoryEventRepository::new()),
            views: Arc::new(InMemoryViewCounter::new()),
            router: build_app(event_repository, view_counter),
        }
    }

    /// Sends a request with an optional bearer token and JSON body.
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&json).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if body_bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap()
        };

        (status, json)
    }

    /// Uploads a video as `owner` and returns its id.
    pub async fn upload(&self, title: &str) -> String {
        let (status, json) = self
            .send(
                "POST",
                "/api/v1/videos",
                Some("token-owner"),
                Some(serde_json::json!({ "title": title, "description": "" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        json["video_id"].as_str().unwrap().to_owned()
    }
}

/// Build the full app router over `event_repository` and `view_counter`.
/// Uses the same route structure as `main.rs`.
pub fn build_app(
    event_repository: Arc<dyn EventRepository>,
    view_counter: Arc<dyn ViewCounter>,
) -> Router {
    let app_state = AppState::new(
        Arc::new(FixedClock(fixed_time(10, 0))),
        Arc::new(SequentialIdGenerator::default()),
        event_repository,
        view_counter,
        Arc::new(StaticIdentityResolver::new(USERS)),
    );

    routes::api_router().with_state(app_state)
}
