use std::time::Duration;

use crate::{
    entities::submission::{ContactBody, ContactField, ContactForm, NewSubmission, StoredSubmission},
    errors::AppError,
    repositories::submission::SubmissionRepository,
    utils::{email::is_valid_email, sanitize::sanitize_field},
};

const HONEYPOT_MESSAGE: &str = "Unable to process your submission.";

pub struct ContactHandler<R>
where
    R: SubmissionRepository,
{
    pub submission_repo: R,
    persist_timeout: Duration,
}

impl<R> ContactHandler<R>
where
    R: SubmissionRepository,
{
    pub fn new(submission_repo: R, persist_timeout: Duration) -> Self {
        ContactHandler { submission_repo, persist_timeout }
    }

    /// Validates, sanitizes and persists a parsed contact body.
    pub async fn submit(&self, body: ContactBody) -> Result<StoredSubmission, AppError> {
        let form = ContactForm::try_from(body)?;
        let submission = Self::validate(form)?;

        match tokio::time::timeout(self.persist_timeout, self.submission_repo.insert_submission(&submission)).await {
            Ok(Ok(stored)) => {
                tracing::info!(
                    id = %stored.id,
                    backend = self.submission_repo.backend(),
                    "Contact submission stored"
                );
                Ok(stored)
            }
            Ok(Err(e)) => Err(e),
            Err(_) => Err(AppError::InternalError(format!(
                "{} persistence timed out after {:?}",
                self.submission_repo.backend(),
                self.persist_timeout
            ))),
        }
    }

    /// Turns a raw form into a persistable submission, or the first failing check.
    pub fn validate(form: ContactForm) -> Result<NewSubmission, AppError> {
        if form.honeypot.as_deref().is_some_and(|v| !v.trim().is_empty()) {
            tracing::warn!("Honeypot field filled, dropping submission");
            return Err(AppError::Forbidden(HONEYPOT_MESSAGE.into()));
        }

        let email = form
            .email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .ok_or_else(|| AppError::BadRequest("Email is required".into()))?;

        if !is_valid_email(email) {
            return Err(AppError::BadRequest("Invalid email format".into()));
        }

        let email = sanitize_field(ContactField::Email, Some(email))
            .ok_or_else(|| AppError::BadRequest("Invalid email format".into()))?;

        Ok(NewSubmission {
            name: sanitize_field(ContactField::Name, form.field(ContactField::Name)),
            email,
            service: sanitize_field(ContactField::Service, form.field(ContactField::Service)),
            timeline: sanitize_field(ContactField::Timeline, form.field(ContactField::Timeline)),
            environment: sanitize_field(ContactField::Environment, form.field(ContactField::Environment)),
            message: sanitize_field(ContactField::Message, form.field(ContactField::Message)),
        })
    }
}
