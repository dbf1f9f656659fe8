use {
    super::{
        entities,
        service::{
            add_auction::AddAuctionInput,
            get_auction_by_id::GetAuctionByIdInput,
            get_auctions::GetAuctionsInput,
            Service,
        },
    },
    crate::api::{
        ErrorBodyResponse,
        RestError,
    },
    axum::{
        extract::{
            Path,
            Query,
            State,
        },
        Json,
    },
    serde::{
        Deserialize,
        Serialize,
    },
    time::OffsetDateTime,
    utoipa::{
        IntoParams,
        ToSchema,
    },
    uuid::Uuid,
};

#[derive(Serialize, Deserialize, ToSchema, Clone, Copy, PartialEq, Debug)]
#[serde(rename_all = "snake_case")]
pub enum AuctionStatus {
    Open,
    Completed,
}

#[derive(Serialize, Deserialize, ToSchema, Clone, Copy, PartialEq, Debug)]
#[serde(rename_all = "snake_case")]
pub enum ProductCondition {
    New,
    Used,
    Refurbished,
}

#[derive(Serialize, Deserialize, ToSchema, Clone)]
pub struct Auction {
    /// The unique id of the auction.
    #[schema(example = "a9c60b9e-6eec-4222-bf8e-47e5a0103712", value_type = String)]
    pub id:              entities::AuctionId,
    /// Name of the product being auctioned.
    #[schema(example = "Vintage camera")]
    pub product_name:    String,
    /// Category the product belongs to.
    #[schema(example = "Electronics")]
    pub category:        String,
    /// Free-form description of the product.
    #[schema(example = "A 35mm film camera in working order")]
    pub description:     String,
    pub condition:       ProductCondition,
    pub status:          AuctionStatus,
    /// When the auction was created and its bidding window started.
    #[schema(example = "2024-05-01T12:00:00Z", value_type = String)]
    #[serde(with = "time::serde::rfc3339")]
    pub creation_time:   OffsetDateTime,
    /// When the auction was completed, if it has been.
    #[schema(example = "2024-05-01T12:00:20Z", value_type = Option<String>)]
    #[serde(with = "time::serde::rfc3339::option")]
    pub completion_time: Option<OffsetDateTime>,
}

#[derive(Serialize, Deserialize, ToSchema, Clone)]
pub struct CreateAuction {
    /// Name of the product being auctioned.
    #[schema(example = "Vintage camera")]
    pub product_name: String,
    /// Category the product belongs to.
    #[schema(example = "Electronics")]
    pub category:     String,
    /// Free-form description of the product.
    #[schema(example = "A 35mm film camera in working order")]
    pub description:  String,
    pub condition:    ProductCondition,
}

impl From<entities::AuctionStatus> for AuctionStatus {
    fn from(status: entities::AuctionStatus) -> Self {
        match status {
            entities::AuctionStatus::Open => AuctionStatus::Open,
            entities::AuctionStatus::Completed => AuctionStatus::Completed,
        }
    }
}

impl From<AuctionStatus> for entities::AuctionStatus {
    fn from(status: AuctionStatus) -> Self {
        match status {
            AuctionStatus::Open => entities::AuctionStatus::Open,
            AuctionStatus::Completed => entities::AuctionStatus::Completed,
        }
    }
}

impl From<entities::ProductCondition> for ProductCondition {
    fn from(condition: entities::ProductCondition) -> Self {
        match condition {
            entities::ProductCondition::New => ProductCondition::New,
            entities::ProductCondition::Used => ProductCondition::Used,
            entities::ProductCondition::Refurbished => ProductCondition::Refurbished,
        }
    }
}

impl From<ProductCondition> for entities::ProductCondition {
    fn from(condition: ProductCondition) -> Self {
        match condition {
            ProductCondition::New => entities::ProductCondition::New,
            ProductCondition::Used => entities::ProductCondition::Used,
            ProductCondition::Refurbished => entities::ProductCondition::Refurbished,
        }
    }
}

impl From<entities::Auction> for Auction {
    fn from(auction: entities::Auction) -> Self {
        Self {
            id:              auction.id,
            product_name:    auction.product_name,
            category:        auction.category,
            description:     auction.description,
            condition:       auction.condition.into(),
            status:          auction.status.into(),
            creation_time:   auction.creation_time,
            completion_time: auction.completion_time,
        }
    }
}

impl From<CreateAuction> for entities::CreateAuction {
    fn from(create_auction: CreateAuction) -> Self {
        Self {
            product_name: create_auction.product_name,
            category:     create_auction.category,
            description:  create_auction.description,
            condition:    create_auction.condition.into(),
        }
    }
}

/// Create a new auction.
///
/// The auction starts in the open status and is completed automatically once
/// its bidding window has elapsed.
#[utoipa::path(post, path = "/v1/auctions", request_body = CreateAuction, responses(
    (status = 200, description = "The created auction", body = Auction),
    (status = 400, response = ErrorBodyResponse),
),)]
pub async fn post_auction(
    State(service): State<Service>,
    Json(create_auction): Json<CreateAuction>,
) -> Result<Json<Auction>, RestError> {
    let auction = service
        .add_auction(AddAuctionInput {
            create_auction: create_auction.into(),
        })
        .await?;
    Ok(Json(auction.into()))
}

/// Query an auction by its id.
#[utoipa::path(get, path = "/v1/auctions/{auction_id}",
    params(
        ("auction_id"=String, description = "Id of the auction to query for"),
    ),
    responses(
        (status = 200, description = "The auction with the specified id", body = Auction),
        (status = 404, description = "Auction was not found", body = ErrorBodyResponse),
    )
)]
pub async fn get_auction(
    State(service): State<Service>,
    Path(auction_id): Path<Uuid>,
) -> Result<Json<Auction>, RestError> {
    let auction = service
        .get_auction_by_id(GetAuctionByIdInput { auction_id })
        .await?;
    Ok(Json(auction.into()))
}

#[derive(Serialize, Deserialize, IntoParams)]
pub struct GetAuctionsQueryParams {
    /// Only return auctions with this status.
    #[param(example = "open", value_type = Option<String>)]
    pub status: Option<AuctionStatus>,
}

/// Query all auctions, optionally filtered by status.
#[utoipa::path(get, path = "/v1/auctions",
    params(GetAuctionsQueryParams),
    responses(
        (status = 200, description = "Array of auctions", body = Vec<Auction>),
        (status = 400, response = ErrorBodyResponse),
    )
)]
pub async fn get_auctions(
    State(service): State<Service>,
    query_params: Query<GetAuctionsQueryParams>,
) -> Result<Json<Vec<Auction>>, RestError> {
    let auctions = service
        .get_auctions(GetAuctionsInput {
            status: query_params.status.map(Into::into),
        })
        .await?;
    Ok(Json(auctions.into_iter().map(Into::into).collect()))
}
