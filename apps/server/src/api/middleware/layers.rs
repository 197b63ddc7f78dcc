//! Layer factories for middleware

use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    normalize_path::NormalizePathLayer,
};

/// CORS middleware
///
/// No configured origins, or a `*` entry, allows any origin.
pub fn cors(origins: &[String]) -> CorsLayer {
    let any_origin = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    if origins.is_empty() || origins.iter().any(|o| o.trim() == "*") {
        return any_origin;
    }

    let mut header_values = Vec::with_capacity(origins.len());
    for origin in origins {
        match axum::http::HeaderValue::from_str(origin.trim()) {
            Ok(value) => header_values.push(value),
            Err(_) => tracing::warn!(origin = %origin, "Ignoring invalid CORS origin"),
        }
    }

    // Every configured origin was invalid.
    if header_values.is_empty() {
        return CorsLayer::new();
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(header_values))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Compression middleware
pub fn compression() -> CompressionLayer {
    CompressionLayer::new()
}

/// `/patients/` routes like `/patients`
pub fn normalize_path() -> NormalizePathLayer {
    NormalizePathLayer::trim_trailing_slash()
}
