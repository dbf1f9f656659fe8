use {
    super::Repository,
    crate::auction::entities,
};

impl Repository {
    /// Marks the auction completed in the store. Returns whether a row actually
    /// changed; an auction that is already completed (or unknown) updates
    /// nothing because the query only touches rows still in the open status.
    ///
    /// Every completion transition in the process goes through the status
    /// mutex held here, so updates never overlap. The guard is released on
    /// every exit path, including store failures.
    #[tracing::instrument(skip_all, name = "conclude_auction_repo", fields(auction_id))]
    pub async fn conclude_auction(&self, auction_id: entities::AuctionId) -> anyhow::Result<bool> {
        tracing::Span::current().record("auction_id", auction_id.to_string());
        let _status_guard = self.status_mutex.lock().await;
        self.db
            .update_auction_status(auction_id, entities::AuctionStatus::Completed)
            .await
    }
}
