//! # REST API
//!
//! REST endpoints using axum.
//!
//! # Endpoints
//!
//! - `POST /api/v1/rfqs` - create an RFQ (admin, buyer)
//! - `GET /api/v1/rfqs` - list with filters (admin)
//! - `GET /api/v1/rfqs/{id}` - fully populated view (admin)
//! - `PUT /api/v1/rfqs/{id}` - partial update (admin, owning buyer)
//! - `DELETE /api/v1/rfqs/{id}` - hard delete (admin, owning buyer)
//! - `POST /api/v1/rfqs/{id}/distribute` - grow the allow-list (admin)
//! - `POST /api/v1/rfqs/{id}/quote` - submit a quote (eligible seller)
//! - `GET /api/v1/rfqs/seller/my-rfqs` - eligibility-filtered feed (seller)
//! - `GET /api/v1/rfqs/buyer/my-rfqs` - own records (buyer)
//! - `GET /api/v1/health` - liveness probe (public)
//!
//! # Usage
//!
//! ```ignore
//! use marketplace_rfq::api::rest::{AppState, create_router};
//!
//! let router = create_router(state);
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, router).await?;
//! ```

pub mod handlers;
pub mod routes;

pub use handlers::{
    ApiError, AppState, CreateRfqRequest, DeletedResponse, DistributeRequest, ErrorResponse,
    FeedQuery, HealthResponse, ListRfqsQuery, QuoteResponseDto, RfqDetailsDto, RfqDto,
    SubmitQuoteRequest, UpdateRfqRequest,
};
pub use routes::create_router;
