pub mod assertions;
pub mod fixtures;
pub mod stores;

use anyhow::Context as _;
use axum::{
    body::{Body, Bytes},
    http::{HeaderMap, HeaderName, HeaderValue, Method, Request, StatusCode},
};
use imaging_records::{
    api::{create_router, App},
    db::{InMemoryRecordStore, RecordStore},
    AppState, Config,
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt as _;

// Re-export commonly used items
pub use assertions::*;
pub use fixtures::*;
pub use stores::*;

pub struct TestApp {
    pub router: App,
    pub state: AppState,
}

impl TestApp {
    pub fn new() -> Self {
        Self::new_with_config(|_| {})
    }

    pub fn new_with_config(configure: impl FnOnce(&mut Config)) -> Self {
        Self::new_with_store(configure, Arc::new(InMemoryRecordStore::new()))
    }

    pub fn new_with_store(
        configure: impl FnOnce(&mut Config),
        store: Arc<dyn RecordStore>,
    ) -> Self {
        let mut config = Config::default();
        configure(&mut config);

        let state = AppState::with_store(config, store);
        let router = create_router(state.clone());

        Self { router, state }
    }

    pub async fn request(
        &self,
        method: Method,
        path_and_query: &str,
        body: Option<Bytes>,
    ) -> anyhow::Result<(StatusCode, HeaderMap, Bytes)> {
        self.request_with_extra_headers(method, path_and_query, body, &[])
            .await
    }

    pub async fn request_with_extra_headers(
        &self,
        method: Method,
        path_and_query: &str,
        body: Option<Bytes>,
        extra_headers: &[(&str, &str)],
    ) -> anyhow::Result<(StatusCode, HeaderMap, Bytes)> {
        let mut request = Request::builder()
            .method(method)
            .uri(path_and_query)
            .header("content-type", "application/json")
            .body(match body {
                Some(bytes) => Body::from(bytes),
                None => Body::empty(),
            })
            .context("build request")?;

        for (name, value) in extra_headers {
            request.headers_mut().insert(
                name.parse::<HeaderName>().context("parse header name")?,
                value.parse::<HeaderValue>().context("parse header value")?,
            );
        }

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .context("dispatch request")?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .context("read response body")?;

        Ok((status, headers, body))
    }

    /// Send an optional JSON body and parse the JSON response.
    pub async fn json(
        &self,
        method: Method,
        path_and_query: &str,
        body: Option<&Value>,
    ) -> anyhow::Result<(StatusCode, Value)> {
        let body = body.map(to_json_body).transpose()?;
        let (status, _headers, bytes) = self.request(method, path_and_query, body).await?;
        let value = serde_json::from_slice(&bytes)
            .with_context(|| format!("parse response body: {}", String::from_utf8_lossy(&bytes)))?;
        Ok((status, value))
    }
}

pub async fn with_test_app<F>(f: F) -> anyhow::Result<()>
where
    F: for<'a> FnOnce(
        &'a TestApp,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = anyhow::Result<()>> + 'a>,
    >,
{
    with_test_app_with_config(|_| {}, f).await
}

pub async fn with_test_app_with_config<C, F>(configure: C, f: F) -> anyhow::Result<()>
where
    C: FnOnce(&mut Config),
    F: for<'a> FnOnce(
        &'a TestApp,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = anyhow::Result<()>> + 'a>,
    >,
{
    let app = TestApp::new_with_config(configure);
    f(&app).await
}
