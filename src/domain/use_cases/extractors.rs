use actix_web::{web, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};

use crate::{constants::UNKNOWN_CLIENT, utils::get_client_ip::get_client_ip, AppState};

/// Rate-limit identity of the caller, taken from the trusted forwarding headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIdentity(pub String);

impl ClientIdentity {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromRequest for ClientIdentity {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let identity = match req.app_data::<web::Data<AppState>>() {
            Some(state) => get_client_ip(req, &state.trusted_ip_headers),
            None => {
                tracing::warn!("AppState missing, client identity defaults to unknown");
                UNKNOWN_CLIENT.to_string()
            }
        };
        ready(Ok(ClientIdentity(identity)))
    }
}
