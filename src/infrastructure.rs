pub mod db;
pub mod limiter;
pub mod security;
pub mod utils;
