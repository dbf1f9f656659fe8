use {
    super::Service,
    crate::auction::entities,
    std::time::Duration,
};

const CONCLUSION_RETRY_BACKOFF: Duration = Duration::from_millis(500);

pub struct ConcludeAuctionInput {
    pub auction_id: entities::AuctionId,
}

/// What happened to a completion transition. The watcher has no caller to
/// report to, so this is surfaced through tracing events rather than an error
/// return.
#[derive(Debug)]
pub enum ConcludeAuctionOutcome {
    Completed,
    /// The store updated nothing: the auction was already completed or is
    /// unknown.
    AlreadyConcluded,
    StoreUnavailable(anyhow::Error),
}

impl Service {
    /// Performs the completion transition for one auction. A failed store
    /// call is retried only as often as the service was configured for; the
    /// default of zero attempts once and leaves the auction open.
    #[tracing::instrument(skip_all, fields(auction_id = %input.auction_id, attempts))]
    pub async fn conclude_auction(&self, input: ConcludeAuctionInput) -> ConcludeAuctionOutcome {
        let mut attempt: u32 = 0;
        loop {
            match self.repo.conclude_auction(input.auction_id).await {
                Ok(true) => {
                    tracing::Span::current().record("attempts", attempt + 1);
                    tracing::info!("Auction completed");
                    return ConcludeAuctionOutcome::Completed;
                }
                Ok(false) => {
                    tracing::Span::current().record("attempts", attempt + 1);
                    tracing::warn!("Auction was already completed or does not exist");
                    return ConcludeAuctionOutcome::AlreadyConcluded;
                }
                Err(err) if attempt < self.config.conclusion_retries => {
                    attempt += 1;
                    tracing::warn!(error = ?err, attempt, "Failed to complete auction, retrying");
                    tokio::time::sleep(CONCLUSION_RETRY_BACKOFF * 2u32.saturating_pow(attempt - 1))
                        .await;
                }
                Err(err) => {
                    tracing::Span::current().record("attempts", attempt + 1);
                    tracing::error!(
                        error = ?err,
                        "Failed to complete auction, leaving it open in the store"
                    );
                    return ConcludeAuctionOutcome::StoreUnavailable(err);
                }
            }
        }
    }
}
