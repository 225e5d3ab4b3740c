use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    entities::submission::{NewSubmission, StoredSubmission},
    errors::AppError,
    repositories::sqlx_repo::SqlxSubmissionRepo,
};

#[async_trait]
pub trait SubmissionRepository: Send + Sync {
    /// Stores one submission and returns its server-assigned id and timestamp.
    async fn insert_submission(&self, submission: &NewSubmission) -> Result<StoredSubmission, AppError>;

    async fn check_connection(&self) -> Result<(), AppError>;

    /// Short label used in logs and health output.
    fn backend(&self) -> &'static str;
}

#[async_trait]
impl<T> SubmissionRepository for Arc<T>
where
    T: SubmissionRepository + ?Sized,
{
    async fn insert_submission(&self, submission: &NewSubmission) -> Result<StoredSubmission, AppError> {
        (**self).insert_submission(submission).await
    }

    async fn check_connection(&self) -> Result<(), AppError> {
        (**self).check_connection().await
    }

    fn backend(&self) -> &'static str {
        (**self).backend()
    }
}

impl SqlxSubmissionRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxSubmissionRepo { pool }
    }
}

#[async_trait]
impl SubmissionRepository for SqlxSubmissionRepo {
    async fn insert_submission(&self, submission: &NewSubmission) -> Result<StoredSubmission, AppError> {
        let stored = sqlx::query_as::<_, StoredSubmission>(
            r#"
            INSERT INTO contact_submissions (name, email, service, timeline, environment, message)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, created_at
            "#,
        )
        .bind(&submission.name)
        .bind(&submission.email)
        .bind(&submission.service)
        .bind(&submission.timeline)
        .bind(&submission.environment)
        .bind(&submission.message)
        .fetch_one(&self.pool)
        .await?;

        Ok(stored)
    }

    async fn check_connection(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}
