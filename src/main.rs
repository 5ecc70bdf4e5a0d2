//! Server binary for the marketplace RFQ engine.

use anyhow::Context;
use marketplace_rfq::api::rest::{AppState, create_router};
use marketplace_rfq::application::services::{
    DistributionService, QuoteLedgerService, RfqLifecycleService, SellerFeedService,
};
use marketplace_rfq::config::{AppConfig, DEV_JWT_SECRET};
use marketplace_rfq::infrastructure::collaborators::catalog::{
    Catalog, HttpCatalogClient, InMemoryCatalog,
};
use marketplace_rfq::infrastructure::collaborators::identity::{
    HttpIdentityClient, InMemoryIdentityDirectory, JwtPrincipalResolver, SellerDirectory,
};
#[cfg(feature = "nats")]
use marketplace_rfq::infrastructure::collaborators::notifier::NatsEventPublisher;
use marketplace_rfq::infrastructure::collaborators::notifier::{
    EventPublisher, TracingEventPublisher,
};
use marketplace_rfq::infrastructure::persistence::in_memory::InMemoryRfqRepository;
use marketplace_rfq::infrastructure::persistence::postgres::PostgresRfqRepository;
use marketplace_rfq::infrastructure::persistence::traits::RfqRepository;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cfg = AppConfig::load().context("failed to load configuration")?;
    if cfg.auth.jwt_secret == DEV_JWT_SECRET {
        tracing::warn!("RFQ_AUTH__JWT_SECRET not set; using insecure dev default");
    }

    let repository: Arc<dyn RfqRepository> = match &cfg.database.url {
        Some(url) => {
            let pool = PgPoolOptions::new()
                .max_connections(10)
                .connect(url)
                .await
                .context("failed to connect to postgres")?;
            let repo = PostgresRfqRepository::new(pool);
            repo.migrate().await.context("failed to run migrations")?;
            tracing::info!("using postgres storage");
            Arc::new(repo)
        }
        None => {
            tracing::warn!("no database configured; RFQs are stored in memory");
            Arc::new(InMemoryRfqRepository::new())
        }
    };

    let catalog: Arc<dyn Catalog> = match &cfg.catalog.base_url {
        Some(base_url) => Arc::new(HttpCatalogClient::new(base_url.clone())),
        None => {
            tracing::warn!("no catalog configured; using empty in-memory catalog");
            Arc::new(InMemoryCatalog::new())
        }
    };

    let directory: Arc<dyn SellerDirectory> = match &cfg.identity.base_url {
        Some(base_url) => Arc::new(HttpIdentityClient::new(base_url.clone())),
        None => {
            tracing::warn!("no identity service configured; using empty in-memory directory");
            Arc::new(InMemoryIdentityDirectory::new())
        }
    };

    #[cfg(feature = "nats")]
    let publisher: Arc<dyn EventPublisher> = match &cfg.nats.url {
        Some(url) => {
            let client = async_nats::connect(url)
                .await
                .context("failed to connect to nats")?;
            tracing::info!("publishing domain events to nats");
            Arc::new(NatsEventPublisher::new(client))
        }
        None => Arc::new(TracingEventPublisher),
    };
    #[cfg(not(feature = "nats"))]
    let publisher: Arc<dyn EventPublisher> = Arc::new(TracingEventPublisher);

    let state = AppState {
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
            Arc::clone(&publisher),
        ),
        seller_feed: SellerFeedService::new(Arc::clone(&repository), Arc::clone(&catalog)),
        principal_resolver: Arc::new(JwtPrincipalResolver::new(&cfg.auth.jwt_secret)),
    };

    let app = create_router(state);
    let addr = cfg.server.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, "rfq engine listening");

    axum::serve(listener, app).await.context("server error")
}
