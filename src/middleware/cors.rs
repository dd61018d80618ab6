use axum::http::{header, HeaderName, Method};
use tower_http::cors::{Any, CorsLayer};

use crate::routes::quiz::QUIZ_SOURCE_HEADER;

/// Any origin may call the generation endpoint; only the methods and headers
/// the UI needs are allowed.
pub fn permissive_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .allow_origin(Any)
        .expose_headers([HeaderName::from_static(QUIZ_SOURCE_HEADER)])
}
