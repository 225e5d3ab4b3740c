use actix_web::web;

use crate::handlers::csrf::{csrf_method_not_allowed, issue_csrf_token};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/csrf-token")
            .route(web::get().to(issue_csrf_token))
            .default_service(web::to(csrf_method_not_allowed))
    );
}
