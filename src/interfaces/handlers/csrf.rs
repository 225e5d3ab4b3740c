use actix_web::{HttpResponse, ResponseError};

use crate::{entities::csrf::CsrfTokenResponse, errors::AppError, security::csrf};

/// `GET /api/csrf-token`
///
/// The cookie is HttpOnly, so the client reads the token from the body and
/// echoes it in the `x-csrf-token` header on submission.
pub async fn issue_csrf_token() -> HttpResponse {
    let token = csrf::generate_token();

    HttpResponse::Ok()
        .cookie(csrf::build_csrf_cookie(&token))
        .json(CsrfTokenResponse { token })
}

pub async fn csrf_method_not_allowed() -> HttpResponse {
    AppError::MethodNotAllowed { allow: "GET" }.error_response()
}
