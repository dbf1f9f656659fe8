use {
    super::Repository,
    crate::{
        api::RestError,
        auction::entities,
    },
};

impl Repository {
    pub async fn get_auctions(
        &self,
        status: Option<entities::AuctionStatus>,
    ) -> Result<Vec<entities::Auction>, RestError> {
        let auctions = self.db.get_auctions(status).await?;
        Ok(auctions
            .iter()
            .map(|auction| auction.get_auction_entity())
            .collect())
    }
}
