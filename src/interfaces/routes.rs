use actix_web::web;

use crate::handlers::{home::home, system::health_check};
use crate::security::headers::security_headers;

mod contact;
mod csrf;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(home);
    cfg.service(health_check);

    cfg.service(
        web::scope("/api")
            .wrap(security_headers())
            .configure(contact::config_routes)
            .configure(csrf::config_routes)
    );
}
