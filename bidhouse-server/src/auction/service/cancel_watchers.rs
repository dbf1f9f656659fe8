use super::Service;

impl Service {
    /// Cancels every running expiration watcher. Used on shutdown so the task
    /// tracker can drain instead of waiting out open bidding windows.
    pub async fn cancel_watchers(&self) {
        self.repo.cancel_all_in_memory_watchers().await;
    }
}
