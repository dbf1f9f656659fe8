use {
    time::OffsetDateTime,
    uuid::Uuid,
};

pub type AuctionId = Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuctionStatus {
    Open,
    Completed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProductCondition {
    New,
    Used,
    Refurbished,
}

/// An auction as the rest of the crate sees it. `status` starts at `Open` and
/// moves to `Completed` exactly once, after which it never changes again.
#[derive(Clone, Debug)]
pub struct Auction {
    pub id:              AuctionId,
    pub product_name:    String,
    pub category:        String,
    pub description:     String,
    pub condition:       ProductCondition,
    pub status:          AuctionStatus,
    pub creation_time:   OffsetDateTime,
    pub completion_time: Option<OffsetDateTime>,
}

pub struct CreateAuction {
    pub product_name: String,
    pub category:     String,
    pub description:  String,
    pub condition:    ProductCondition,
}

impl Auction {
    pub fn new(create_auction: CreateAuction) -> Self {
        Self {
            id:              Uuid::new_v4(),
            product_name:    create_auction.product_name,
            category:        create_auction.category,
            description:     create_auction.description,
            condition:       create_auction.condition,
            status:          AuctionStatus::Open,
            creation_time:   OffsetDateTime::now_utc(),
            completion_time: None,
        }
    }
}
