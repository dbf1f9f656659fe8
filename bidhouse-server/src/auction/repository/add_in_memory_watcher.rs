use {
    super::Repository,
    crate::auction::entities,
    tokio_util::sync::CancellationToken,
};

impl Repository {
    /// Registers a cancellation handle for the auction's watcher so the
    /// watcher can be stopped if the auction is invalidated or the process
    /// shuts down.
    pub async fn add_in_memory_watcher(
        &self,
        auction_id: entities::AuctionId,
    ) -> CancellationToken {
        let cancellation_token = CancellationToken::new();
        self.in_memory_store
            .watchers
            .write()
            .await
            .insert(auction_id, cancellation_token.clone());
        cancellation_token
    }
}
