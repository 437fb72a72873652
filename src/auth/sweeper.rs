// Periodic removal of expired refresh token records

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::auth::{error::AuthError, repository::RefreshTokenRepository};

/// Run one sweep, returning how many records were removed
pub async fn sweep_expired_tokens(ledger: &dyn RefreshTokenRepository) -> Result<u64, AuthError> {
    let removed = ledger.delete_expired().await?;

    if removed > 0 {
        info!("Swept {} expired refresh tokens", removed);
    } else {
        debug!("Refresh token sweep found nothing to remove");
    }

    Ok(removed)
}

/// Sweep the ledger every `period` until the task is aborted.
/// Failures are logged and retried on the next tick.
pub fn spawn_expired_token_sweep(
    ledger: Arc<dyn RefreshTokenRepository>,
    period: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            interval.tick().await;
            if let Err(e) = sweep_expired_tokens(ledger.as_ref()).await {
                error!("Refresh token sweep failed: {}", e);
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::UserId;
    use crate::memory::InMemoryRefreshTokenRepository;
    use chrono::Utc;

    #[tokio::test]
    async fn test_sweep_removes_only_expired_records() {
        let ledger = InMemoryRefreshTokenRepository::new();
        let user_id = UserId::new();
        ledger
            .store(user_id, "expired", Utc::now() - chrono::Duration::minutes(1))
            .await
            .unwrap();
        ledger
            .store(user_id, "live", Utc::now() + chrono::Duration::days(1))
            .await
            .unwrap();

        assert_eq!(sweep_expired_tokens(&ledger).await.unwrap(), 1);
        assert_eq!(sweep_expired_tokens(&ledger).await.unwrap(), 0);
        assert_eq!(ledger.len(), 1);
    }

    #[tokio::test]
    async fn test_spawned_sweep_runs_immediately() {
        let ledger = Arc::new(InMemoryRefreshTokenRepository::new());
        ledger
            .store(UserId::new(), "expired", Utc::now() - chrono::Duration::minutes(1))
            .await
            .unwrap();

        let handle = spawn_expired_token_sweep(ledger.clone(), Duration::from_secs(3600));

        for _ in 0..50 {
            if ledger.is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        handle.abort();

        assert!(ledger.is_empty());
    }
}
