use {
    super::entities,
    std::collections::HashMap,
    tokio::sync::{
        Mutex,
        RwLock,
    },
    tokio_util::sync::CancellationToken,
};

mod add_auction;
mod add_in_memory_watcher;
mod cancel_all_in_memory_watchers;
mod conclude_auction;
mod get_auction_by_id;
mod get_auctions;
mod models;
mod remove_in_memory_watcher;

pub use models::*;

#[derive(Debug, Default)]
pub struct InMemoryStore {
    pub watchers: RwLock<HashMap<entities::AuctionId, CancellationToken>>,
}

#[derive(Debug)]
pub struct Repository {
    pub in_memory_store: InMemoryStore,
    db:                  Box<dyn Database>,
    // Shared by every watcher: at most one completion update is in flight
    // process-wide at any instant.
    status_mutex:        Mutex<()>,
}

impl Repository {
    pub fn new(db: impl Database) -> Self {
        Self {
            in_memory_store: InMemoryStore::default(),
            db:              Box::new(db),
            status_mutex:    Mutex::new(()),
        }
    }
}
