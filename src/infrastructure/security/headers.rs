use actix_web::{
    http::header::{self, HeaderValue},
    middleware::DefaultHeaders,
    HttpResponseBuilder,
};

use crate::constants::{RATE_LIMIT_LIMIT_HEADER, RATE_LIMIT_REMAINING_HEADER};
use crate::entities::rate_limit::RateLimitDecision;

/// Headers attached to every API response unless the handler set them already.
pub fn security_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add((header::CONTENT_TYPE, HeaderValue::from_static("application/json")))
        .add((header::X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff")))
        .add((header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY")))
        .add((
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store, no-cache, must-revalidate"),
        ))
        .add((header::PRAGMA, HeaderValue::from_static("no-cache")))
}

pub fn apply_rate_limit_headers(builder: &mut HttpResponseBuilder, decision: &RateLimitDecision) {
    builder
        .insert_header((RATE_LIMIT_LIMIT_HEADER, decision.limit.to_string()))
        .insert_header((RATE_LIMIT_REMAINING_HEADER, decision.remaining.to_string()));
}
