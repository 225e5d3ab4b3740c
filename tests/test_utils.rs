#![allow(dead_code)]

use std::sync::Arc;

use actix_web::{
    dev::{Service, ServiceResponse},
    test::{self, TestRequest},
    web, App,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use contact_backend::{
    constants::{CSRF_COOKIE_NAME, CSRF_HEADER_NAME},
    entities::submission::{NewSubmission, StoredSubmission},
    errors::AppError,
    limiter::{
        counter_store::InMemoryCounterStore,
        rate_limiter::{Clock, RateLimiter},
    },
    repositories::submission::SubmissionRepository,
    routes::configure_routes,
    settings::{AppConfig, AppEnvironment},
    AppState,
};
use parking_lot::Mutex;
use uuid::Uuid;

pub const TEST_TOKEN: &str = "0f1e2d3c4b5a69788796a5b4c3d2e1f00f1e2d3c4b5a69788796a5b4c3d2e1f0";

/// Submission store that keeps rows in memory and can simulate an outage.
#[derive(Clone, Default)]
pub struct InMemorySubmissionRepo {
    rows: Arc<Mutex<Vec<NewSubmission>>>,
    fail: bool,
}

impl InMemorySubmissionRepo {
    pub fn failing() -> Self {
        InMemorySubmissionRepo { fail: true, ..Self::default() }
    }

    pub fn rows(&self) -> Vec<NewSubmission> {
        self.rows.lock().clone()
    }
}

#[async_trait]
impl SubmissionRepository for InMemorySubmissionRepo {
    async fn insert_submission(&self, submission: &NewSubmission) -> Result<StoredSubmission, AppError> {
        if self.fail {
            return Err(AppError::InternalError("Database error: simulated outage at db-1:5432".into()));
        }
        self.rows.lock().push(submission.clone());
        Ok(StoredSubmission { id: Uuid::new_v4(), created_at: Utc::now() })
    }

    async fn check_connection(&self) -> Result<(), AppError> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

/// Clock that only moves when told to.
pub struct ManualClock(Mutex<DateTime<Utc>>);

impl ManualClock {
    pub fn new() -> Arc<Self> {
        Arc::new(ManualClock(Mutex::new(Utc::now())))
    }

    pub fn advance(&self, by: chrono::Duration) {
        *self.0.lock() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock()
    }
}

pub struct TestApp {
    pub state: web::Data<AppState>,
    pub repo: InMemorySubmissionRepo,
    pub config: AppConfig,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_repo(InMemorySubmissionRepo::default())
    }

    pub fn with_repo(repo: InMemorySubmissionRepo) -> Self {
        let config = test_config();
        let state = web::Data::new(AppState::new(&config, Arc::new(repo.clone())));
        TestApp { state, repo, config }
    }

    pub fn with_clock(clock: Arc<ManualClock>) -> Self {
        let config = test_config();
        let repo = InMemorySubmissionRepo::default();
        let rate_limiter = RateLimiter::with_clock(
            InMemoryCounterStore::new(),
            clock,
            config.rate_limit_max_requests,
            config.rate_limit_window(),
            config.rate_limit_sweep_threshold,
        );
        let state = web::Data::new(AppState::with_rate_limiter(
            &config,
            Arc::new(repo.clone()),
            rate_limiter,
        ));
        TestApp { state, repo, config }
    }

    pub async fn service(
        &self,
    ) -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error> {
        test::init_service(
            App::new()
                .app_data(self.state.clone())
                .configure(configure_routes),
        )
        .await
    }

    pub fn stored(&self) -> Vec<NewSubmission> {
        self.repo.rows()
    }
}

pub fn test_config() -> AppConfig {
    AppConfig {
        env: AppEnvironment::Testing,
        name: "Contact API Test".to_string(),
        database_url: "postgres://unused@127.0.0.1:5432/test_db".into(),
        worker_count: 1,
        persistence_timeout_secs: 2,
        ..AppConfig::default()
    }
}

/// POST /api/contact carrying a matching CSRF cookie and header.
pub fn contact_request() -> TestRequest {
    TestRequest::post()
        .uri("/api/contact")
        .insert_header(("cookie", format!("theme=dark; {}={}", CSRF_COOKIE_NAME, TEST_TOKEN)))
        .insert_header((CSRF_HEADER_NAME, TEST_TOKEN))
}
