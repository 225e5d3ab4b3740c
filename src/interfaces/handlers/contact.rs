use actix_web::{
    http::header,
    web::{self, BytesMut},
    HttpRequest, HttpResponse, ResponseError,
};
use futures_util::StreamExt;

use crate::{
    constants::SUCCESS_MESSAGE,
    entities::submission::{ContactBody, ContactResponse},
    errors::AppError,
    security::{csrf, headers::apply_rate_limit_headers},
    use_cases::extractors::ClientIdentity,
    AppState,
};

/// `POST /api/contact`
///
/// Gates run in order and the first failure ends the request: rate limit,
/// body size, CSRF, content parsing, validation, persistence.
pub async fn submit_contact(
    req: HttpRequest,
    state: web::Data<AppState>,
    client: ClientIdentity,
    payload: web::Payload,
) -> Result<HttpResponse, AppError> {
    let decision = state.rate_limiter.check(client.as_str());
    if !decision.admitted {
        tracing::warn!(client = client.as_str(), "Contact submission rate limited");
        return Err(AppError::RateLimited {
            retry_after_secs: decision.retry_after_secs.unwrap_or(1),
            limit: decision.limit,
        });
    }

    let body = read_body_limited(&req, payload, state.max_body_bytes).await?;

    if !csrf::verify_request(&req) {
        tracing::warn!(client = client.as_str(), "CSRF verification failed");
        return Err(AppError::Forbidden("Invalid or missing CSRF token".into()));
    }

    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok());

    let contact_body = ContactBody::parse(content_type, &body)?;
    state.contact_handler.submit(contact_body).await?;

    let mut response = HttpResponse::Ok();
    apply_rate_limit_headers(&mut response, &decision);
    Ok(response.json(ContactResponse::ok(SUCCESS_MESSAGE)))
}

pub async fn contact_method_not_allowed() -> HttpResponse {
    AppError::MethodNotAllowed { allow: "POST" }.error_response()
}

/// Reads the request body, rejecting it once either the declared or the
/// actual length passes `limit`.
async fn read_body_limited(
    req: &HttpRequest,
    mut payload: web::Payload,
    limit: usize,
) -> Result<web::Bytes, AppError> {
    let declared = req
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<usize>().ok());

    if declared.is_some_and(|len| len > limit) {
        return Err(AppError::PayloadTooLarge);
    }

    let mut body = BytesMut::with_capacity(declared.unwrap_or(0).min(limit));
    while let Some(chunk) = payload.next().await {
        let chunk = chunk.map_err(|e| {
            tracing::debug!("Failed to read request body: {}", e);
            AppError::BadRequest("Invalid request body".into())
        })?;

        if body.len() + chunk.len() > limit {
            return Err(AppError::PayloadTooLarge);
        }
        body.extend_from_slice(&chunk);
    }

    Ok(body.freeze())
}
