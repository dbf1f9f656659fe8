use {
    super::repository::{
        self,
        Repository,
    },
    std::sync::Arc,
    tokio_util::task::TaskTracker,
};

pub mod add_auction;
pub mod cancel_watchers;
pub mod conclude_auction;
pub mod conclude_auction_loop;
pub mod expiration;
pub mod get_auction_by_id;
pub mod get_auctions;

pub struct Config {
    /// Extra completion attempts after a failed status update. Zero keeps the
    /// default fire-and-never-retry behavior.
    pub conclusion_retries: u32,
}

pub struct ServiceInner {
    config:       Config,
    repo:         Arc<Repository>,
    task_tracker: TaskTracker,
}

#[derive(Clone)]
pub struct Service(Arc<ServiceInner>);
impl std::ops::Deref for Service {
    type Target = ServiceInner;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Service {
    pub fn new(db: impl repository::Database, config: Config, task_tracker: TaskTracker) -> Self {
        Self(Arc::new(ServiceInner {
            repo: Arc::new(Repository::new(db)),
            config,
            task_tracker,
        }))
    }
}
