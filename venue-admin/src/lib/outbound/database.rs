use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::DatabaseConfig;

/// Open the connection pool and confirm the store answers.
///
/// The ping is attempted `ping_attempts` times with linear backoff; the last
/// failure is returned when all attempts fail.
///
/// # Errors
/// * `sqlx::Error` - Invalid URL or store unreachable after all attempts
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect_lazy(&config.url)?;

    ping_with_retry(&pool, config.ping_attempts).await?;

    tracing::info!(
        max_connections = config.max_connections,
        database = "postgresql",
        "Database connection pool created"
    );

    Ok(pool)
}

async fn ping_with_retry(pool: &PgPool, attempts: u32) -> Result<(), sqlx::Error> {
    let attempts = attempts.max(1);
    let mut attempt = 1;

    loop {
        match sqlx::query("SELECT 1").execute(pool).await {
            Ok(_) => return Ok(()),
            Err(e) if attempt < attempts => {
                let delay = backoff_delay(attempt);
                tracing::warn!(
                    attempt,
                    attempts,
                    retry_in_secs = delay.as_secs(),
                    error = %e,
                    "Database ping failed, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => {
                tracing::error!(attempts, error = %e, "Database unreachable");
                return Err(e);
            }
        }
    }
}

/// Delay before retry number `attempt` (1-based): one second per attempt.
fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_secs(u64::from(attempt))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_is_linear() {
        assert_eq!(backoff_delay(1), Duration::from_secs(1));
        assert_eq!(backoff_delay(2), Duration::from_secs(2));
        assert_eq!(backoff_delay(3), Duration::from_secs(3));
    }
}
