//! Custom Axum extractors for request bodies and pagination

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::{
    models::{PageQuery, PageRequest},
    state::AppState,
};

/// JSON body extractor that answers malformed input with `{"message": ...}`.
///
/// The content type is not checked. An empty body deserializes as
/// `T::default()`, so missing fields are reported by validation instead of
/// by the parser.
pub struct JsonBody<T>(pub T);

/// Error type for [`JsonBody`] extraction failures.
pub struct JsonBodyRejection {
    status: StatusCode,
    message: String,
}

impl IntoResponse for JsonBodyRejection {
    fn into_response(self) -> Response {
        (self.status, axum::Json(json!({ "message": self.message }))).into_response()
    }
}

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Default,
{
    type Rejection = JsonBodyRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| JsonBodyRejection {
                status: e.status(),
                message: format!("Failed to read request body: {}", e.body_text()),
            })?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(JsonBody(T::default()));
        }

        let value = serde_json::from_slice(&bytes).map_err(|e| JsonBodyRejection {
            status: StatusCode::BAD_REQUEST,
            message: format!("Invalid JSON in request body: {e}"),
        })?;

        Ok(JsonBody(value))
    }
}

/// `page` / `pageSize` resolved against the server's page size settings.
///
/// Never rejects: unusable parameters fall back to the defaults.
#[derive(Debug, Clone, Copy)]
pub struct Pagination(pub PageRequest);

#[async_trait]
impl FromRequestParts<AppState> for Pagination {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let query = Query::<PageQuery>::try_from_uri(&parts.uri)
            .map(|Query(query)| query)
            .unwrap_or_default();

        let server = &state.config.server;
        Ok(Pagination(PageRequest::resolve(
            &query,
            server.default_page_size,
            server.max_page_size,
        )))
    }
}
