//! # REST Handlers
//!
//! axum handlers, wire DTOs, bearer authentication, and the mapping from
//! [`ApplicationError`] to HTTP responses.
//!
//! The wire format is camelCase JSON, matching the marketplace's existing
//! payloads. Every failure body is `{"error": <code>, "message": <text>}`
//! with a stable machine-readable code.

use crate::application::error::ApplicationError;
use crate::application::services::{
    DistributionService, NewRfq, QuoteLedgerService, QuotePayload, RfqDetails,
    RfqLifecycleService, RfqPatch, SellerFeedService,
};
use crate::domain::entities::response::QuoteResponse;
use crate::domain::entities::rfq::Rfq;
use crate::domain::value_objects::{
    Attachment, CategoryId, DistributionType, Price, ProductId, Quantity, RfqId, RfqStatus,
    SellerId, Specifications, Timestamp, UserId,
};
use crate::infrastructure::collaborators::catalog::{CategorySummary, ProductSummary};
use crate::infrastructure::collaborators::identity::{Principal, PrincipalResolver, UserSummary};
use axum::extract::{Path, Query, Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use axum_extra::TypedHeader;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::Authorization;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Shared state for the REST surface.
#[derive(Clone)]
pub struct AppState {
    /// Lifecycle operations.
    pub lifecycle: RfqLifecycleService,
    /// Allow-list distribution.
    pub distribution: DistributionService,
    /// Quote submission.
    pub quote_ledger: QuoteLedgerService,
    /// Seller discovery feed.
    pub seller_feed: SellerFeedService,
    /// Bearer-token resolution via the external identity system.
    pub principal_resolver: Arc<dyn PrincipalResolver>,
}

/// Error body: stable code plus human-readable message.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
}

fn json_error(status: StatusCode, code: &str, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: code.to_string(),
            message: message.into(),
        }),
    )
        .into_response()
}

/// Wrapper mapping [`ApplicationError`] onto the HTTP surface.
#[derive(Debug)]
pub struct ApiError(pub ApplicationError);

impl From<ApplicationError> for ApiError {
    fn from(err: ApplicationError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            ApplicationError::Validation(_) => StatusCode::BAD_REQUEST,
            ApplicationError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApplicationError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApplicationError::Conflict(_) => StatusCode::CONFLICT,
            ApplicationError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self.0, "request failed");
        }
        json_error(status, self.0.code(), self.0.to_string())
    }
}

/// Resolves the bearer token into a [`Principal`] request extension.
///
/// Responds 401 when the header is missing or the identity system rejects
/// the token; approved-seller gating happens inside the resolver.
pub async fn authenticate(
    State(state): State<AppState>,
    auth: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(TypedHeader(auth)) = auth else {
        return json_error(StatusCode::UNAUTHORIZED, "unauthorized", "missing bearer token");
    };

    match state.principal_resolver.resolve(auth.token()).await {
        Ok(principal) => {
            req.extensions_mut().insert(principal);
            next.run(req).await
        }
        Err(error) => json_error(StatusCode::UNAUTHORIZED, "unauthorized", error.to_string()),
    }
}

// ========== Wire DTOs ==========

/// Body of `POST /rfqs`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRfqRequest {
    /// Headline of the requirement.
    pub title: String,
    /// Detailed description.
    pub description: String,
    /// Requested quantity.
    pub quantity: u32,
    /// Unit of measure.
    pub unit: String,
    /// Seller visibility policy.
    pub distribution_type: DistributionType,
    /// Explicit seller allow-list.
    #[serde(default)]
    pub target_seller_ids: Option<Vec<String>>,
    /// Catalog product reference.
    #[serde(default)]
    pub product_id: Option<String>,
    /// Catalog category reference.
    #[serde(default)]
    pub category_id: Option<String>,
    /// Owning buyer, honored for admin callers.
    #[serde(default)]
    pub buyer_id: Option<String>,
    /// Initial status (draft unless published).
    #[serde(default)]
    pub status: Option<RfqStatus>,
    /// Advisory expiry date.
    #[serde(default)]
    pub expiry_date: Option<DateTime<Utc>>,
    /// Ordered specification pairs.
    #[serde(default)]
    pub specifications: Option<Specifications>,
    /// File references.
    #[serde(default)]
    pub attachments: Option<Vec<Attachment>>,
}

/// Body of `PUT /rfqs/{id}`; only supplied fields are applied.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRfqRequest {
    /// New title.
    #[serde(default)]
    pub title: Option<String>,
    /// New description.
    #[serde(default)]
    pub description: Option<String>,
    /// New quantity.
    #[serde(default)]
    pub quantity: Option<u32>,
    /// New unit of measure.
    #[serde(default)]
    pub unit: Option<String>,
    /// New product reference.
    #[serde(default)]
    pub product_id: Option<String>,
    /// New category reference.
    #[serde(default)]
    pub category_id: Option<String>,
    /// New status, validated against the state machine.
    #[serde(default)]
    pub status: Option<RfqStatus>,
    /// New distribution policy.
    #[serde(default)]
    pub distribution_type: Option<DistributionType>,
    /// Replacement allow-list.
    #[serde(default)]
    pub target_seller_ids: Option<Vec<String>>,
    /// New advisory expiry date.
    #[serde(default)]
    pub expiry_date: Option<DateTime<Utc>>,
    /// Replacement specification pairs.
    #[serde(default)]
    pub specifications: Option<Specifications>,
    /// Replacement attachments.
    #[serde(default)]
    pub attachments: Option<Vec<Attachment>>,
}

/// Body of `POST /rfqs/{id}/distribute`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributeRequest {
    /// Sellers to union into the allow-list.
    pub seller_ids: Vec<String>,
}

/// Body of `POST /rfqs/{id}/quote`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitQuoteRequest {
    /// Offered unit price.
    pub quote_price: Decimal,
    /// Offered quantity; defaults to the RFQ quantity.
    #[serde(default)]
    pub quote_quantity: Option<u32>,
    /// Promised delivery time in days.
    pub delivery_time: u32,
    /// Free-text note.
    #[serde(default)]
    pub message: Option<String>,
}

/// Query parameters of the listing endpoints.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRfqsQuery {
    /// Match on status.
    #[serde(default)]
    pub status: Option<RfqStatus>,
    /// Match on owning buyer.
    #[serde(default)]
    pub buyer_id: Option<String>,
    /// Match on product reference.
    #[serde(default)]
    pub product_id: Option<String>,
    /// Match on category reference.
    #[serde(default)]
    pub category_id: Option<String>,
}

/// Query parameters of the my-rfqs feeds.
#[derive(Debug, Default, Deserialize)]
pub struct FeedQuery {
    /// Match on status.
    #[serde(default)]
    pub status: Option<RfqStatus>,
}

/// Wire representation of a quote response.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponseDto {
    /// The quoting seller.
    pub seller_id: String,
    /// Quoted unit price.
    pub quote_price: Price,
    /// Offered quantity.
    pub quote_quantity: u32,
    /// Promised delivery time in days.
    pub delivery_time_days: u32,
    /// Seller's note.
    pub message: Option<String>,
    /// Response status.
    pub status: crate::domain::value_objects::ResponseStatus,
    /// Last submission time.
    pub submitted_at: Timestamp,
}

impl From<&QuoteResponse> for QuoteResponseDto {
    fn from(response: &QuoteResponse) -> Self {
        Self {
            seller_id: response.seller_ref().as_str().to_string(),
            quote_price: response.quote_price(),
            quote_quantity: response.quote_quantity().get(),
            delivery_time_days: response.delivery_time_days(),
            message: response.message().map(str::to_string),
            status: response.status(),
            submitted_at: response.submitted_at(),
        }
    }
}

/// Wire representation of an RFQ.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RfqDto {
    /// Record id.
    pub id: RfqId,
    /// Headline.
    pub title: String,
    /// Description.
    pub description: String,
    /// Product reference.
    pub product_id: Option<String>,
    /// Category reference.
    pub category_id: Option<String>,
    /// Requested quantity.
    pub quantity: u32,
    /// Unit of measure.
    pub unit: String,
    /// Owning buyer.
    pub buyer_id: Option<String>,
    /// Creating admin.
    pub admin_id: Option<String>,
    /// Lifecycle status.
    pub status: RfqStatus,
    /// Visibility policy.
    pub distribution_type: DistributionType,
    /// Seller allow-list.
    pub target_seller_ids: Vec<String>,
    /// Collected quote responses.
    pub responses: Vec<QuoteResponseDto>,
    /// Advisory expiry date.
    pub expiry_date: Option<Timestamp>,
    /// Ordered specification pairs.
    pub specifications: Specifications,
    /// File references.
    pub attachments: Vec<Attachment>,
    /// Creation time.
    pub created_at: Timestamp,
    /// Last mutation time.
    pub updated_at: Timestamp,
}

impl From<&Rfq> for RfqDto {
    fn from(rfq: &Rfq) -> Self {
        Self {
            id: rfq.id(),
            title: rfq.title().to_string(),
            description: rfq.description().to_string(),
            product_id: rfq.product_ref().map(|p| p.as_str().to_string()),
            category_id: rfq.category_ref().map(|c| c.as_str().to_string()),
            quantity: rfq.quantity().get(),
            unit: rfq.unit().to_string(),
            buyer_id: rfq.buyer_ref().map(|b| b.as_str().to_string()),
            admin_id: rfq.admin_ref().map(|a| a.as_str().to_string()),
            status: rfq.status(),
            distribution_type: rfq.distribution_type(),
            target_seller_ids: rfq
                .target_seller_ids()
                .iter()
                .map(|s| s.as_str().to_string())
                .collect(),
            responses: rfq.responses().iter().map(QuoteResponseDto::from).collect(),
            expiry_date: rfq.expiry_date(),
            specifications: rfq.specifications().clone(),
            attachments: rfq.attachments().to_vec(),
            created_at: rfq.created_at(),
            updated_at: rfq.updated_at(),
        }
    }
}

/// Fully populated admin view of one RFQ.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RfqDetailsDto {
    /// The record itself.
    #[serde(flatten)]
    pub rfq: RfqDto,
    /// Resolved product reference.
    pub product: Option<ProductSummary>,
    /// Resolved category reference.
    pub category: Option<CategorySummary>,
    /// Resolved owning buyer.
    pub buyer: Option<UserSummary>,
    /// Resolved creating admin.
    pub admin: Option<UserSummary>,
    /// Resolved allow-list entries.
    pub target_sellers: Vec<UserSummary>,
}

impl From<RfqDetails> for RfqDetailsDto {
    fn from(details: RfqDetails) -> Self {
        Self {
            rfq: RfqDto::from(&details.rfq),
            product: details.product,
            category: details.category,
            buyer: details.buyer,
            admin: details.admin,
            target_sellers: details.target_sellers,
        }
    }
}

/// Body of a successful delete.
#[derive(Debug, Serialize, Deserialize)]
pub struct DeletedResponse {
    /// Always true.
    pub deleted: bool,
}

/// Body of `GET /health`.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
}

fn seller_ids(ids: Vec<String>) -> Vec<SellerId> {
    ids.into_iter().map(SellerId::new).collect()
}

impl CreateRfqRequest {
    fn into_new_rfq(self) -> NewRfq {
        NewRfq {
            title: self.title,
            description: self.description,
            quantity: Quantity::new(self.quantity),
            unit: self.unit,
            product_ref: self.product_id.map(ProductId::new),
            category_ref: self.category_id.map(CategoryId::new),
            buyer_ref: self.buyer_id.map(UserId::new),
            status: self.status,
            distribution_type: self.distribution_type,
            target_seller_ids: seller_ids(self.target_seller_ids.unwrap_or_default()),
            expiry_date: self.expiry_date.map(Timestamp::from_datetime),
            specifications: self.specifications.unwrap_or_default(),
            attachments: self.attachments.unwrap_or_default(),
        }
    }
}

impl UpdateRfqRequest {
    fn into_patch(self) -> RfqPatch {
        RfqPatch {
            title: self.title,
            description: self.description,
            quantity: self.quantity.map(Quantity::new),
            unit: self.unit,
            product_ref: self.product_id.map(ProductId::new),
            category_ref: self.category_id.map(CategoryId::new),
            status: self.status,
            distribution_type: self.distribution_type,
            target_seller_ids: self.target_seller_ids.map(seller_ids),
            expiry_date: self.expiry_date.map(Timestamp::from_datetime),
            specifications: self.specifications,
            attachments: self.attachments,
        }
    }
}

impl ListRfqsQuery {
    fn into_filter(self) -> crate::infrastructure::persistence::traits::RfqFilter {
        let mut filter = crate::infrastructure::persistence::traits::RfqFilter::any();
        if let Some(status) = self.status {
            filter = filter.with_status(status);
        }
        if let Some(buyer) = self.buyer_id {
            filter = filter.with_buyer(UserId::new(buyer));
        }
        if let Some(product) = self.product_id {
            filter = filter.with_product(ProductId::new(product));
        }
        if let Some(category) = self.category_id {
            filter = filter.with_category(CategoryId::new(category));
        }
        filter
    }
}

// ========== Handlers ==========

/// `POST /rfqs`: create an RFQ (admin, buyer).
pub async fn create_rfq(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(body): Json<CreateRfqRequest>,
) -> Result<(StatusCode, Json<RfqDto>), ApiError> {
    let rfq = state
        .lifecycle
        .create(&principal, body.into_new_rfq())
        .await?;
    Ok((StatusCode::CREATED, Json(RfqDto::from(&rfq))))
}

/// `GET /rfqs`: admin listing with filters.
pub async fn list_rfqs(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<ListRfqsQuery>,
) -> Result<Json<Vec<RfqDto>>, ApiError> {
    let rfqs = state
        .lifecycle
        .list(&principal, query.into_filter())
        .await?;
    Ok(Json(rfqs.iter().map(RfqDto::from).collect()))
}

/// `GET /rfqs/{id}`: fully populated admin view.
pub async fn get_rfq(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> Result<Json<RfqDetailsDto>, ApiError> {
    let details = state
        .lifecycle
        .get_details(&principal, &RfqId::new(id))
        .await?;
    Ok(Json(RfqDetailsDto::from(details)))
}

/// `PUT /rfqs/{id}`: partial update (admin, owning buyer).
pub async fn update_rfq(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateRfqRequest>,
) -> Result<Json<RfqDto>, ApiError> {
    let rfq = state
        .lifecycle
        .update(&principal, &RfqId::new(id), body.into_patch())
        .await?;
    Ok(Json(RfqDto::from(&rfq)))
}

/// `DELETE /rfqs/{id}`: hard delete (admin, owning buyer).
pub async fn delete_rfq(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeletedResponse>, ApiError> {
    state.lifecycle.delete(&principal, &RfqId::new(id)).await?;
    Ok(Json(DeletedResponse { deleted: true }))
}

/// `POST /rfqs/{id}/distribute`: union sellers into the allow-list
/// (admin).
pub async fn distribute_rfq(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
    Json(body): Json<DistributeRequest>,
) -> Result<Json<RfqDto>, ApiError> {
    let rfq = state
        .distribution
        .distribute(&principal, &RfqId::new(id), seller_ids(body.seller_ids))
        .await?;
    Ok(Json(RfqDto::from(&rfq)))
}

/// `POST /rfqs/{id}/quote`: submit or replace a quote (eligible seller).
pub async fn submit_quote(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
    Json(body): Json<SubmitQuoteRequest>,
) -> Result<Json<QuoteResponseDto>, ApiError> {
    let payload = QuotePayload {
        quote_price: body.quote_price,
        quote_quantity: body.quote_quantity.map(Quantity::new),
        delivery_time_days: body.delivery_time,
        message: body.message,
    };
    let written = state
        .quote_ledger
        .submit_quote(&principal, &RfqId::new(id), payload)
        .await?;
    Ok(Json(QuoteResponseDto::from(&written)))
}

/// `GET /rfqs/seller/my-rfqs`: the eligibility-filtered published feed.
pub async fn seller_my_rfqs(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<FeedQuery>,
) -> Result<Json<Vec<RfqDto>>, ApiError> {
    let rfqs = state
        .seller_feed
        .list_visible(&principal, query.status)
        .await?;
    Ok(Json(rfqs.iter().map(RfqDto::from).collect()))
}

/// `GET /rfqs/buyer/my-rfqs`: the caller's own records.
pub async fn buyer_my_rfqs(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<FeedQuery>,
) -> Result<Json<Vec<RfqDto>>, ApiError> {
    let rfqs = state.lifecycle.list_own(&principal, query.status).await?;
    Ok(Json(rfqs.iter().map(RfqDto::from).collect()))
}

/// `GET /health`: liveness probe, public.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn error_statuses() {
        let cases = [
            (ApplicationError::validation("x"), StatusCode::BAD_REQUEST),
            (ApplicationError::not_found("rfq", "1"), StatusCode::NOT_FOUND),
            (ApplicationError::forbidden("x"), StatusCode::FORBIDDEN),
            (ApplicationError::conflict("x"), StatusCode::CONFLICT),
            (
                ApplicationError::internal("x"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError(err).into_response().status(), status);
        }
    }

    #[test]
    fn create_request_wire_format() {
        let body: CreateRfqRequest = serde_json::from_str(
            r#"{
                "title": "Steel beams",
                "description": "IPE 200",
                "quantity": 40,
                "unit": "pcs",
                "distributionType": "specific",
                "targetSellerIds": ["s1", "s2"],
                "categoryId": "metals",
                "specifications": [["grade", "S235"]]
            }"#,
        )
        .unwrap();

        assert_eq!(body.distribution_type, DistributionType::Specific);
        let new_rfq = body.into_new_rfq();
        assert_eq!(new_rfq.target_seller_ids.len(), 2);
        assert_eq!(new_rfq.specifications.get("grade"), Some("S235"));
        assert!(new_rfq.product_ref.is_none());
    }

    #[test]
    fn quote_request_defaults() {
        let body: SubmitQuoteRequest = serde_json::from_str(
            r#"{"quotePrice": "99.50", "deliveryTime": 14}"#,
        )
        .unwrap();
        assert_eq!(body.quote_price, Decimal::new(9950, 2));
        assert!(body.quote_quantity.is_none());
        assert!(body.message.is_none());
    }

    #[test]
    fn rfq_dto_serializes_camel_case() {
        let rfq = crate::domain::entities::rfq::RfqBuilder::new(
            "t",
            "d",
            Quantity::new(1),
            "pcs",
        )
        .buyer_ref(UserId::new("b1"))
        .try_build()
        .unwrap();

        let json = serde_json::to_value(RfqDto::from(&rfq)).unwrap();
        assert_eq!(json["buyerId"], "b1");
        assert_eq!(json["distributionType"], "all");
        assert_eq!(json["status"], "draft");
        assert!(json["targetSellerIds"].as_array().unwrap().is_empty());
    }
}
