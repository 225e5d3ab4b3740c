use std::time::Duration;

use actix_web::{get, web, HttpResponse, Responder};
use chrono::Utc;
use humantime::format_duration;
use serde::Serialize;

use crate::{constants::START_TIME, repositories::submission::SubmissionRepository, AppState};

#[derive(Serialize)]
struct HealthCheckResponse {
    status: &'static str,
    uptime: String,
    timestamp: String,
    started_at: String,
    version: &'static str,
    persistence: String,
    rate_limited_clients: usize,
}

#[get("/health")]
pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let now = Utc::now();
    let uptime_secs = now.signed_duration_since(*START_TIME).num_seconds().max(0) as u64;

    let repo = &state.contact_handler.submission_repo;
    let persistence = match repo.check_connection().await {
        Ok(()) => format!("{}: OK", repo.backend()),
        Err(e) => {
            tracing::warn!("Health check persistence probe failed: {}", e);
            format!("{}: Unavailable", repo.backend())
        }
    };

    HttpResponse::Ok().json(HealthCheckResponse {
        status: "healthy",
        uptime: format_duration(Duration::from_secs(uptime_secs)).to_string(),
        timestamp: now.to_rfc3339(),
        started_at: START_TIME.to_rfc3339(),
        version: env!("CARGO_PKG_VERSION"),
        persistence,
        rate_limited_clients: state.rate_limiter.tracked_clients(),
    })
}
