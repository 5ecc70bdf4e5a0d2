//! # REST Routes
//!
//! Router assembly for the RFQ surface.

use crate::api::rest::handlers::{
    self, AppState, authenticate, buyer_my_rfqs, create_rfq, delete_rfq, distribute_rfq, get_rfq,
    list_rfqs, seller_my_rfqs, submit_quote, update_rfq,
};
use axum::Router;
use axum::middleware;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Builds the application router.
///
/// All `/api/v1/rfqs` routes sit behind bearer authentication; role,
/// ownership, and eligibility checks happen in the application services.
/// `/api/v1/health` is public.
pub fn create_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/rfqs", post(create_rfq).get(list_rfqs))
        .route(
            "/rfqs/{id}",
            get(get_rfq).put(update_rfq).delete(delete_rfq),
        )
        .route("/rfqs/{id}/distribute", post(distribute_rfq))
        .route("/rfqs/{id}/quote", post(submit_quote))
        .route("/rfqs/seller/my-rfqs", get(seller_my_rfqs))
        .route("/rfqs/buyer/my-rfqs", get(buyer_my_rfqs))
        .layer(middleware::from_fn_with_state(state.clone(), authenticate));

    let api = Router::new()
        .merge(protected)
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::application::services::{
        DistributionService, QuoteLedgerService, RfqLifecycleService, SellerFeedService,
    };
    use crate::infrastructure::collaborators::catalog::{Catalog, InMemoryCatalog};
    use crate::infrastructure::collaborators::identity::{
        InMemoryIdentityDirectory, JwtPrincipalResolver, SellerDirectory,
    };
    use crate::infrastructure::collaborators::notifier::{EventPublisher, TracingEventPublisher};
    use crate::infrastructure::persistence::in_memory::InMemoryRfqRepository;
    use crate::infrastructure::persistence::traits::RfqRepository;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_state() -> AppState {
        let repository = Arc::new(InMemoryRfqRepository::new()) as Arc<dyn RfqRepository>;
        let catalog = Arc::new(InMemoryCatalog::new()) as Arc<dyn Catalog>;
        let directory = Arc::new(InMemoryIdentityDirectory::new()) as Arc<dyn SellerDirectory>;
        let publisher = Arc::new(TracingEventPublisher) as Arc<dyn EventPublisher>;

        AppState {
            lifecycle: RfqLifecycleService::new(
                Arc::clone(&repository),
                Arc::clone(&catalog),
                Arc::clone(&directory),
                Arc::clone(&publisher),
            ),
            distribution: DistributionService::new(
                Arc::clone(&repository),
                Arc::clone(&directory),
                Arc::clone(&publisher),
            ),
            quote_ledger: QuoteLedgerService::new(
                Arc::clone(&repository),
                Arc::clone(&catalog),
                publisher,
            ),
            seller_feed: SellerFeedService::new(repository, catalog),
            principal_resolver: Arc::new(JwtPrincipalResolver::new("test-secret")),
        }
    }

    #[tokio::test]
    async fn health_route_is_public() {
        let app = create_router(test_state());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn rfq_routes_require_authentication() {
        let app = create_router(test_state());
        for uri in [
            "/api/v1/rfqs",
            "/api/v1/rfqs/seller/my-rfqs",
            "/api/v1/rfqs/buyer/my-rfqs",
        ] {
            let response = app
                .clone()
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
        }
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let app = create_router(test_state());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/quotes")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
