use super::Repository;

impl Repository {
    /// Cancels every registered watcher. Each watcher removes its own entry
    /// from the store as it winds down.
    pub async fn cancel_all_in_memory_watchers(&self) {
        for cancellation_token in self.in_memory_store.watchers.read().await.values() {
            cancellation_token.cancel();
        }
    }
}
