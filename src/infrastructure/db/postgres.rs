use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::{info, warn};

/// Backoff policy for the initial database connection.
#[derive(Debug, Clone, Copy)]
pub struct ConnectRetry {
    pub max_retries: u32,
    pub initial_backoff: Duration,
}

impl Default for ConnectRetry {
    fn default() -> Self {
        ConnectRetry { max_retries: 5, initial_backoff: Duration::from_secs(2) }
    }
}

impl ConnectRetry {
    /// Wait before retry number `attempt` (1-based), doubling each time.
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.initial_backoff
            .saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)))
    }
}

pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    connect_with_retry(database_url, ConnectRetry::default()).await
}

pub async fn connect_with_retry(database_url: &str, retry: ConnectRetry) -> Result<PgPool, sqlx::Error> {
    let options = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5));

    let mut attempt = 0;
    loop {
        match options.clone().connect(database_url).await {
            Ok(pool) => {
                info!("Submission database connected");
                return Ok(pool);
            }
            Err(e) if attempt < retry.max_retries => {
                attempt += 1;
                let wait = retry.backoff(attempt);
                warn!(
                    attempt,
                    max_retries = retry.max_retries,
                    error = %e,
                    "Submission database unavailable, retrying in {:?}",
                    wait
                );
                tokio::time::sleep(wait).await;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Creates the `contact_submissions` table and its indexes if missing.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("Database migrations applied");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_from_initial_wait() {
        let retry = ConnectRetry::default();
        let waits: Vec<u64> = (1..=5).map(|n| retry.backoff(n).as_secs()).collect();
        assert_eq!(waits, vec![2, 4, 8, 16, 32]);
    }
}
