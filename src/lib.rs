use std::sync::Arc;

mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod telemetry;
pub mod graceful_shutdown;
pub mod background_task;

pub use domain::{entities, use_cases};
pub use interfaces::{handlers, repositories, routes};
pub use infrastructure::{db, limiter, security, utils};

use limiter::{counter_store::InMemoryCounterStore, rate_limiter::RateLimiter};
use repositories::submission::SubmissionRepository;
use use_cases::contact::ContactHandler;

pub type SharedSubmissionRepo = Arc<dyn SubmissionRepository>;
pub type AppContactHandler = ContactHandler<SharedSubmissionRepo>;
pub type AppRateLimiter = RateLimiter<InMemoryCounterStore>;

pub struct AppState {
    pub contact_handler: AppContactHandler,
    pub rate_limiter: AppRateLimiter,
    pub trusted_ip_headers: Vec<String>,
    pub max_body_bytes: usize,
}

impl AppState {
    pub fn new(config: &settings::AppConfig, submission_repo: SharedSubmissionRepo) -> Self {
        let rate_limiter = RateLimiter::new(
            InMemoryCounterStore::new(),
            config.rate_limit_max_requests,
            config.rate_limit_window(),
            config.rate_limit_sweep_threshold,
        );

        Self::with_rate_limiter(config, submission_repo, rate_limiter)
    }

    pub fn with_rate_limiter(
        config: &settings::AppConfig,
        submission_repo: SharedSubmissionRepo,
        rate_limiter: AppRateLimiter,
    ) -> Self {
        AppState {
            contact_handler: ContactHandler::new(submission_repo, config.persistence_timeout()),
            rate_limiter,
            trusted_ip_headers: config.ip_headers(),
            max_body_bytes: config.max_body_bytes,
        }
    }
}
