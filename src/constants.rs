use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;

pub static START_TIME: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

pub const CSRF_COOKIE_NAME: &str = "csrf-token";
pub const CSRF_HEADER_NAME: &str = "x-csrf-token";
pub const CSRF_TOKEN_BYTES: usize = 32;
pub const CSRF_TOKEN_TTL_SECS: i64 = 3600;

pub const HONEYPOT_FIELD: &str = "honeypot";

pub const UNKNOWN_CLIENT: &str = "unknown";

pub const RATE_LIMIT_LIMIT_HEADER: &str = "X-RateLimit-Limit";
pub const RATE_LIMIT_REMAINING_HEADER: &str = "X-RateLimit-Remaining";

pub const SUCCESS_MESSAGE: &str = "Your message has been received. We will get back to you soon.";
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Please try again later.";
