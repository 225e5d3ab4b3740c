use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::constants::HONEYPOT_FIELD;
use crate::errors::AppError;

/// Contact form fields and the maximum length (in characters) each may carry
/// once sanitized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactField {
    Name,
    Email,
    Service,
    Timeline,
    Environment,
    Message,
}

impl ContactField {
    pub const ALL: [ContactField; 6] = [
        ContactField::Name,
        ContactField::Email,
        ContactField::Service,
        ContactField::Timeline,
        ContactField::Environment,
        ContactField::Message,
    ];

    pub fn max_len(self) -> usize {
        match self {
            ContactField::Name => 200,
            ContactField::Email => 254,
            ContactField::Service => 200,
            ContactField::Timeline => 200,
            ContactField::Environment => 500,
            ContactField::Message => 5000,
        }
    }
}

/// Request body after content-type dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum ContactBody {
    Json(Value),
    Form(Vec<(String, String)>),
    Unsupported(String),
}

impl ContactBody {
    pub fn parse(content_type: Option<&str>, body: &[u8]) -> Result<Self, AppError> {
        let content_type = content_type.unwrap_or_default().to_ascii_lowercase();

        if content_type.contains("application/json") {
            let value = serde_json::from_slice(body).map_err(|e| {
                tracing::debug!("Rejected malformed JSON body: {}", e);
                AppError::BadRequest("Invalid request body".into())
            })?;
            Ok(ContactBody::Json(value))
        } else if content_type.contains("application/x-www-form-urlencoded") {
            let pairs = url::form_urlencoded::parse(body)
                .into_owned()
                .collect();
            Ok(ContactBody::Form(pairs))
        } else {
            Ok(ContactBody::Unsupported(content_type))
        }
    }
}

const KNOWN_KEYS: [&str; 7] = [
    "name",
    "email",
    "service",
    "timeline",
    "environment",
    "message",
    HONEYPOT_FIELD,
];

/// Raw, unsanitized contact form as submitted by the client.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub service: Option<String>,
    pub timeline: Option<String>,
    pub environment: Option<String>,
    pub message: Option<String>,
    pub honeypot: Option<String>,
}

impl ContactForm {
    pub fn field(&self, field: ContactField) -> Option<&str> {
        let value = match field {
            ContactField::Name => &self.name,
            ContactField::Email => &self.email,
            ContactField::Service => &self.service,
            ContactField::Timeline => &self.timeline,
            ContactField::Environment => &self.environment,
            ContactField::Message => &self.message,
        };
        value.as_deref()
    }

    fn from_map(mut map: HashMap<String, String>) -> Self {
        ContactForm {
            name: map.remove("name"),
            email: map.remove("email"),
            service: map.remove("service"),
            timeline: map.remove("timeline"),
            environment: map.remove("environment"),
            message: map.remove("message"),
            honeypot: map.remove(HONEYPOT_FIELD),
        }
    }
}

impl TryFrom<ContactBody> for ContactForm {
    type Error = AppError;

    fn try_from(body: ContactBody) -> Result<Self, Self::Error> {
        match body {
            ContactBody::Json(Value::Object(mut object)) => {
                // Unknown keys are ignored whatever their shape.
                let mut map = HashMap::with_capacity(KNOWN_KEYS.len());
                for key in KNOWN_KEYS {
                    if let Some(text) = object.remove(key).map(scalar_text).transpose()?.flatten() {
                        map.insert(key.to_string(), text);
                    }
                }
                Ok(ContactForm::from_map(map))
            }
            ContactBody::Json(_) => Err(AppError::BadRequest("Invalid request body".into())),
            // Repeated keys: the last value wins.
            ContactBody::Form(pairs) => Ok(ContactForm::from_map(pairs.into_iter().collect())),
            ContactBody::Unsupported(content_type) => {
                tracing::debug!(%content_type, "Rejected unsupported content type");
                Err(AppError::BadRequest("Unsupported content type".into()))
            }
        }
    }
}

/// Non-string scalars keep their textual form; nested values are rejected.
fn scalar_text(value: Value) -> Result<Option<String>, AppError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Bool(b) => Ok(Some(b.to_string())),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Array(_) | Value::Object(_) => {
            Err(AppError::BadRequest("Invalid request body".into()))
        }
    }
}

/// A validated, sanitized submission ready for persistence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewSubmission {
    pub name: Option<String>,
    pub email: String,
    pub service: Option<String>,
    pub timeline: Option<String>,
    pub environment: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct StoredSubmission {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ContactResponse {
    pub success: bool,
    pub message: String,
}

impl ContactResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        ContactResponse { success: true, message: message.into() }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        ContactResponse { success: false, message: message.into() }
    }
}
