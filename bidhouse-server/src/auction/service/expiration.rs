use {
    std::time::Duration,
    time::OffsetDateTime,
};

pub const AUCTION_INTERVAL_ENV: &str = "AUCTION_INTERVAL";
pub const DEFAULT_AUCTION_INTERVAL: &str = "20s";

/// Resolves the bidding-window duration from the environment. The variable is
/// read on every call so operators can change the window without restarting
/// the server; watchers already in flight pick up the new value at their next
/// poll.
pub fn resolve_auction_interval() -> Option<Duration> {
    let raw = std::env::var(AUCTION_INTERVAL_ENV)
        .unwrap_or_else(|_| DEFAULT_AUCTION_INTERVAL.to_string());
    match humantime::parse_duration(&raw) {
        Ok(interval) => Some(interval),
        Err(err) => {
            tracing::warn!(
                error = %err,
                value = %raw,
                "Failed to parse auction interval, treating auctions as not expired"
            );
            None
        }
    }
}

/// Whether the auction's bidding window has elapsed. The boundary is
/// inclusive: elapsed time exactly equal to the interval counts as expired.
/// An unparseable interval resolves to "not expired" so a broken
/// configuration can never close auctions early.
pub fn is_auction_expired(creation_time: OffsetDateTime) -> bool {
    match resolve_auction_interval() {
        Some(interval) => OffsetDateTime::now_utc() >= creation_time + interval,
        None => false,
    }
}

#[cfg(test)]
pub(crate) fn interval_env_lock() -> &'static tokio::sync::Mutex<()> {
    // Serializes tests that touch AUCTION_INTERVAL; the variable is process-wide.
    static LOCK: tokio::sync::Mutex<()> = tokio::sync::Mutex::const_new(());
    &LOCK
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        std::time::Duration,
    };

    #[tokio::test]
    async fn test_default_interval_applies_when_unset() {
        let _env = interval_env_lock().lock().await;
        std::env::remove_var(AUCTION_INTERVAL_ENV);

        assert_eq!(resolve_auction_interval(), Some(Duration::from_secs(20)));
        // An auction created five seconds ago is nowhere near the default window.
        assert!(!is_auction_expired(
            OffsetDateTime::now_utc() - Duration::from_secs(5)
        ));
    }

    #[tokio::test]
    async fn test_configured_interval_is_resolved_on_every_call() {
        let _env = interval_env_lock().lock().await;
        std::env::set_var(AUCTION_INTERVAL_ENV, "2s");
        assert_eq!(resolve_auction_interval(), Some(Duration::from_secs(2)));

        std::env::set_var(AUCTION_INTERVAL_ENV, "3s");
        assert_eq!(resolve_auction_interval(), Some(Duration::from_secs(3)));

        std::env::remove_var(AUCTION_INTERVAL_ENV);
    }

    #[tokio::test]
    async fn test_expiration_boundary_is_inclusive() {
        let _env = interval_env_lock().lock().await;
        std::env::set_var(AUCTION_INTERVAL_ENV, "2s");

        // Elapsed time exactly equal to the interval counts as expired.
        assert!(is_auction_expired(
            OffsetDateTime::now_utc() - Duration::from_secs(2)
        ));
        // A still-running window is not expired.
        assert!(!is_auction_expired(OffsetDateTime::now_utc()));

        std::env::remove_var(AUCTION_INTERVAL_ENV);
    }

    #[tokio::test]
    async fn test_malformed_interval_never_expires() {
        let _env = interval_env_lock().lock().await;
        std::env::set_var(AUCTION_INTERVAL_ENV, "abc");

        assert_eq!(resolve_auction_interval(), None);
        // Even an auction created an hour ago stays open under a broken configuration.
        assert!(!is_auction_expired(
            OffsetDateTime::now_utc() - Duration::from_secs(3600)
        ));

        std::env::remove_var(AUCTION_INTERVAL_ENV);
    }
}
