use {
    super::{
        conclude_auction::ConcludeAuctionInput,
        expiration::is_auction_expired,
        Service,
    },
    crate::auction::entities,
    std::time::Duration,
    time::OffsetDateTime,
    tokio_util::sync::CancellationToken,
};

pub const AUCTION_POLL_INTERVAL: Duration = Duration::from_secs(1);

impl Service {
    /// Watches one auction until its bidding window elapses, then performs
    /// the completion transition and terminates. The transition is attempted
    /// exactly once per watcher lifetime (plus any configured retries);
    /// whether it succeeds or not, the watcher never re-enters the loop.
    #[tracing::instrument(skip_all, fields(auction_id = %auction_id))]
    pub async fn conclude_auction_loop(
        &self,
        auction_id: entities::AuctionId,
        creation_time: OffsetDateTime,
        cancellation_token: CancellationToken,
    ) {
        loop {
            tokio::select! {
                _ = cancellation_token.cancelled() => {
                    tracing::debug!("Auction watcher cancelled");
                    self.repo.remove_in_memory_watcher(auction_id).await;
                    return;
                }
                _ = tokio::time::sleep(AUCTION_POLL_INTERVAL) => {}
            }
            if is_auction_expired(creation_time) {
                break;
            }
        }
        self.conclude_auction(ConcludeAuctionInput { auction_id })
            .await;
        self.repo.remove_in_memory_watcher(auction_id).await;
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            api::RestError,
            auction::{
                repository::{
                    self,
                    Database,
                    MockDatabase,
                },
                service::{
                    add_auction::AddAuctionInput,
                    expiration::{
                        interval_env_lock,
                        AUCTION_INTERVAL_ENV,
                    },
                    Config,
                    Service,
                },
            },
        },
        axum::async_trait,
        std::sync::{
            atomic::{
                AtomicUsize,
                Ordering,
            },
            Arc,
        },
        tokio_util::task::TaskTracker,
    };

    fn create_auction() -> entities::CreateAuction {
        entities::CreateAuction {
            product_name: "Vintage camera".to_string(),
            category:     "Electronics".to_string(),
            description:  "A 35mm film camera".to_string(),
            condition:    entities::ProductCondition::Used,
        }
    }

    fn new_service(db: impl Database, conclusion_retries: u32) -> Service {
        Service::new(
            db,
            Config { conclusion_retries },
            TaskTracker::new(),
        )
    }

    fn mock_db_counting_updates(updates: Arc<AtomicUsize>, update_succeeds: bool) -> MockDatabase {
        let mut db = MockDatabase::default();
        db.expect_add_auction().returning(|_| Ok(()));
        db.expect_update_auction_status()
            .withf(|_, status| *status == entities::AuctionStatus::Completed)
            .returning(move |_, _| {
                updates.fetch_add(1, Ordering::SeqCst);
                if update_succeeds {
                    Ok(true)
                } else {
                    Err(anyhow::anyhow!("store unavailable"))
                }
            });
        db
    }

    #[tokio::test]
    async fn test_auction_is_completed_once_interval_elapses() {
        let _env = interval_env_lock().lock().await;
        std::env::set_var(AUCTION_INTERVAL_ENV, "2s");

        let updates = Arc::new(AtomicUsize::new(0));
        let service = new_service(mock_db_counting_updates(updates.clone(), true), 0);
        service
            .add_auction(AddAuctionInput {
                create_auction: create_auction(),
            })
            .await
            .unwrap();

        // Polling at a one second cadence observes the expiry within interval
        // plus one cadence; leave some slack on top of that.
        tokio::time::sleep(Duration::from_secs(4)).await;
        assert_eq!(updates.load(Ordering::SeqCst), 1);

        // The watcher terminated after its single transition and never fires again.
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(updates.load(Ordering::SeqCst), 1);
        assert!(service.repo.in_memory_store.watchers.read().await.is_empty());

        std::env::remove_var(AUCTION_INTERVAL_ENV);
    }

    #[tokio::test]
    async fn test_auction_stays_open_before_default_interval() {
        let _env = interval_env_lock().lock().await;
        std::env::remove_var(AUCTION_INTERVAL_ENV);

        let updates = Arc::new(AtomicUsize::new(0));
        let service = new_service(mock_db_counting_updates(updates.clone(), true), 0);
        service
            .add_auction(AddAuctionInput {
                create_auction: create_auction(),
            })
            .await
            .unwrap();

        // Well inside the default 20 second window nothing is updated.
        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(updates.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_malformed_interval_keeps_auction_open_forever() {
        let _env = interval_env_lock().lock().await;
        std::env::set_var(AUCTION_INTERVAL_ENV, "abc");

        let updates = Arc::new(AtomicUsize::new(0));
        let service = new_service(mock_db_counting_updates(updates.clone(), true), 0);
        service
            .add_auction(AddAuctionInput {
                create_auction: create_auction(),
            })
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(updates.load(Ordering::SeqCst), 0);
        assert_eq!(
            service.repo.in_memory_store.watchers.read().await.len(),
            1,
            "watcher keeps polling under a malformed interval"
        );

        std::env::remove_var(AUCTION_INTERVAL_ENV);
    }

    #[tokio::test]
    async fn test_failed_update_is_not_retried_by_default() {
        let _env = interval_env_lock().lock().await;
        std::env::set_var(AUCTION_INTERVAL_ENV, "1s");

        let updates = Arc::new(AtomicUsize::new(0));
        let service = new_service(mock_db_counting_updates(updates.clone(), false), 0);
        service
            .add_auction(AddAuctionInput {
                create_auction: create_auction(),
            })
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_secs(4)).await;
        // A single attempt was made; the auction is left open with no further tries.
        assert_eq!(updates.load(Ordering::SeqCst), 1);
        assert!(service.repo.in_memory_store.watchers.read().await.is_empty());

        std::env::remove_var(AUCTION_INTERVAL_ENV);
    }

    #[tokio::test]
    async fn test_opt_in_retries_are_bounded() {
        let _env = interval_env_lock().lock().await;
        std::env::set_var(AUCTION_INTERVAL_ENV, "1s");

        let updates = Arc::new(AtomicUsize::new(0));
        let service = new_service(mock_db_counting_updates(updates.clone(), false), 2);
        service
            .add_auction(AddAuctionInput {
                create_auction: create_auction(),
            })
            .await
            .unwrap();

        // One attempt plus two retries with 500ms and 1s of backoff.
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(updates.load(Ordering::SeqCst), 3);

        std::env::remove_var(AUCTION_INTERVAL_ENV);
    }

    #[tokio::test]
    async fn test_cancelled_watcher_never_touches_the_store() {
        let _env = interval_env_lock().lock().await;
        std::env::remove_var(AUCTION_INTERVAL_ENV);

        let updates = Arc::new(AtomicUsize::new(0));
        let service = new_service(mock_db_counting_updates(updates.clone(), true), 0);
        service
            .add_auction(AddAuctionInput {
                create_auction: create_auction(),
            })
            .await
            .unwrap();

        service.cancel_watchers().await;
        service.task_tracker.close();
        tokio::time::timeout(Duration::from_secs(2), service.task_tracker.wait())
            .await
            .expect("cancelled watcher should terminate promptly");

        assert_eq!(updates.load(Ordering::SeqCst), 0);
        assert!(service.repo.in_memory_store.watchers.read().await.is_empty());
    }

    /// A store double that records how many status updates overlap in time.
    #[derive(Debug, Default)]
    struct UpdateOverlapProbe {
        in_flight:     AtomicUsize,
        max_in_flight: AtomicUsize,
        updates:       AtomicUsize,
    }

    #[derive(Debug, Clone)]
    struct ProbeDatabase(Arc<UpdateOverlapProbe>);

    #[async_trait]
    impl Database for ProbeDatabase {
        async fn add_auction(&self, _auction: &entities::Auction) -> anyhow::Result<()> {
            Ok(())
        }

        async fn update_auction_status(
            &self,
            _auction_id: entities::AuctionId,
            _status: entities::AuctionStatus,
        ) -> anyhow::Result<bool> {
            let in_flight = self.0.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.0.max_in_flight.fetch_max(in_flight, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(50)).await;
            self.0.in_flight.fetch_sub(1, Ordering::SeqCst);
            self.0.updates.fetch_add(1, Ordering::SeqCst);
            Ok(true)
        }

        async fn get_auction(
            &self,
            _auction_id: entities::AuctionId,
        ) -> Result<repository::Auction, RestError> {
            Err(RestError::AuctionNotFound)
        }

        async fn get_auctions(
            &self,
            _status: Option<entities::AuctionStatus>,
        ) -> Result<Vec<repository::Auction>, RestError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_completions_never_overlap() {
        let _env = interval_env_lock().lock().await;
        std::env::set_var(AUCTION_INTERVAL_ENV, "1s");

        let probe = Arc::new(UpdateOverlapProbe::default());
        let service = new_service(ProbeDatabase(probe.clone()), 0);
        for _ in 0..8 {
            service
                .add_auction(AddAuctionInput {
                    create_auction: create_auction(),
                })
                .await
                .unwrap();
        }

        // All eight watchers expire on the same poll; their updates drain
        // serially behind the status mutex.
        tokio::time::sleep(Duration::from_secs(4)).await;
        assert_eq!(probe.updates.load(Ordering::SeqCst), 8);
        assert_eq!(probe.max_in_flight.load(Ordering::SeqCst), 1);

        std::env::remove_var(AUCTION_INTERVAL_ENV);
    }
}
