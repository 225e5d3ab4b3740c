use actix_web::HttpRequest;

use crate::constants::UNKNOWN_CLIENT;

/// Identify the client from the first trusted forwarding header that carries
/// a value. Only the first comma-separated entry is used. Falls back to
/// `"unknown"` so that unidentified clients share a single bucket.
pub fn get_client_ip(req: &HttpRequest, trusted_headers: &[String]) -> String {
    trusted_headers
        .iter()
        .filter_map(|name| req.headers().get(name.as_str()))
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| value.split(',').next())
        .map(str::trim)
        .find(|ip| !ip.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}
