use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::{
    entities::submission::{NewSubmission, StoredSubmission},
    errors::AppError,
    repositories::submission::SubmissionRepository,
};

#[derive(Debug, Deserialize)]
struct RelayResponse {
    success: bool,
    #[serde(default)]
    message: String,
}

/// Forwards submissions to a third-party form relay instead of storing them.
#[derive(Clone)]
pub struct RelaySubmissionRepo {
    client: Client,
    endpoint: String,
    access_key: Zeroizing<String>,
}

impl RelaySubmissionRepo {
    pub fn new(endpoint: impl Into<String>, access_key: &str, timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(RelaySubmissionRepo {
            client,
            endpoint: endpoint.into(),
            access_key: Zeroizing::new(access_key.to_string()),
        })
    }

    fn form_fields<'a>(&'a self, submission: &'a NewSubmission) -> Vec<(&'static str, &'a str)> {
        let optional = [
            ("name", &submission.name),
            ("service", &submission.service),
            ("timeline", &submission.timeline),
            ("environment", &submission.environment),
            ("message", &submission.message),
        ];

        let mut fields = vec![
            ("access_key", self.access_key.as_str()),
            ("email", submission.email.as_str()),
        ];
        fields.extend(
            optional
                .into_iter()
                .filter_map(|(key, value)| value.as_deref().map(|v| (key, v))),
        );
        fields
    }
}

#[async_trait]
impl SubmissionRepository for RelaySubmissionRepo {
    async fn insert_submission(&self, submission: &NewSubmission) -> Result<StoredSubmission, AppError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&self.form_fields(submission))
            .send()
            .await?;

        let status = response.status();
        let body: RelayResponse = response.json().await?;

        if !status.is_success() || !body.success {
            return Err(AppError::InternalError(format!(
                "Relay rejected submission ({}): {}",
                status, body.message
            )));
        }

        Ok(StoredSubmission {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
        })
    }

    /// Any HTTP answer counts as reachable; the status code is not inspected.
    async fn check_connection(&self) -> Result<(), AppError> {
        let response = self.client.head(&self.endpoint).send().await?;
        tracing::debug!(status = %response.status(), "Relay endpoint reachable");
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "relay"
    }
}
