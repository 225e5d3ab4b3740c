pub mod cors;
pub mod csrf;
pub mod headers;
