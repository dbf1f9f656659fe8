use {
    super::Service,
    crate::{
        api::RestError,
        auction::entities,
    },
};

pub struct AddAuctionInput {
    pub create_auction: entities::CreateAuction,
}

impl Service {
    /// Persists a new auction and spawns its expiration watcher. The watcher
    /// is only started once the store has confirmed the insert; the call
    /// itself returns without waiting for the watcher.
    #[tracing::instrument(skip_all, fields(auction_id))]
    pub async fn add_auction(&self, input: AddAuctionInput) -> Result<entities::Auction, RestError> {
        let create_auction = input.create_auction;
        if create_auction.product_name.trim().is_empty()
            || create_auction.category.trim().is_empty()
            || create_auction.description.trim().is_empty()
        {
            return Err(RestError::BadParameters(
                "product_name, category and description must not be empty".to_string(),
            ));
        }

        let auction = entities::Auction::new(create_auction);
        tracing::Span::current().record("auction_id", auction.id.to_string());
        let auction = self.repo.add_auction(auction).await.map_err(|e| {
            tracing::error!(error = ?e, "Failed to add auction");
            RestError::TemporarilyUnavailable
        })?;

        let cancellation_token = self.repo.add_in_memory_watcher(auction.id).await;
        self.task_tracker.spawn({
            let service = self.clone();
            let auction_id = auction.id;
            let creation_time = auction.creation_time;
            async move {
                service
                    .conclude_auction_loop(auction_id, creation_time, cancellation_token)
                    .await;
            }
        });
        Ok(auction)
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::auction::{
            repository::MockDatabase,
            service::{
                Config,
                Service,
            },
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

    fn new_service(db: MockDatabase) -> Service {
        Service::new(
            db,
            Config {
                conclusion_retries: 0,
            },
            TaskTracker::new(),
        )
    }

    #[tokio::test]
    async fn test_add_auction_returns_open_auction() {
        let mut db = MockDatabase::default();
        db.expect_add_auction().times(1).returning(|_| Ok(()));
        // The spawned watcher may outlive this test's assertions.
        db.expect_update_auction_status().returning(|_, _| Ok(true));
        let service = new_service(db);

        let auction = service
            .add_auction(AddAuctionInput {
                create_auction: create_auction(),
            })
            .await
            .expect("auction should be created");

        assert_eq!(auction.status, entities::AuctionStatus::Open);
        assert_eq!(auction.completion_time, None);
        assert!(service
            .repo
            .in_memory_store
            .watchers
            .read()
            .await
            .contains_key(&auction.id));
    }

    #[tokio::test]
    async fn test_add_auction_rejects_empty_fields() {
        let mut create = create_auction();
        create.product_name = "   ".to_string();
        let service = new_service(MockDatabase::default());

        let result = service
            .add_auction(AddAuctionInput {
                create_auction: create,
            })
            .await;

        assert!(matches!(result, Err(RestError::BadParameters(_))));
    }

    #[tokio::test]
    async fn test_no_watcher_is_spawned_when_persistence_fails() {
        let mut db = MockDatabase::default();
        db.expect_add_auction()
            .times(1)
            .returning(|_| Err(anyhow::anyhow!("insert failed")));
        let service = new_service(db);

        let result = service
            .add_auction(AddAuctionInput {
                create_auction: create_auction(),
            })
            .await;

        assert_eq!(result.unwrap_err(), RestError::TemporarilyUnavailable);
        assert!(service.repo.in_memory_store.watchers.read().await.is_empty());
    }
}
