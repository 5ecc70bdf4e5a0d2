//! Black-box workflow tests over the application services with in-memory
//! adapters: the end-to-end distribution and quoting scenarios, the set
//! and upsert invariants, and the authorization matrix as observed from
//! the outside.

#![allow(clippy::unwrap_used)]

use marketplace_rfq::application::error::ApplicationError;
use marketplace_rfq::application::services::{
    DistributionService, NewRfq, QuoteLedgerService, QuotePayload, RfqLifecycleService, RfqPatch,
    SellerFeedService,
};
use marketplace_rfq::domain::entities::rfq::Rfq;
use marketplace_rfq::domain::value_objects::{
    CategoryId, DistributionType, Quantity, Role, RfqStatus, SellerId, Specifications,
};
use marketplace_rfq::infrastructure::collaborators::catalog::{Catalog, InMemoryCatalog};
use marketplace_rfq::infrastructure::collaborators::identity::{
    InMemoryIdentityDirectory, Principal, SellerDirectory,
};
use marketplace_rfq::infrastructure::collaborators::notifier::{
    EventPublisher, RecordingEventPublisher,
};
use marketplace_rfq::infrastructure::persistence::in_memory::InMemoryRfqRepository;
use marketplace_rfq::infrastructure::persistence::traits::RfqRepository;
use rust_decimal::Decimal;
use std::sync::Arc;

struct World {
    lifecycle: RfqLifecycleService,
    distribution: DistributionService,
    quote_ledger: QuoteLedgerService,
    seller_feed: SellerFeedService,
    repository: Arc<InMemoryRfqRepository>,
    catalog: Arc<InMemoryCatalog>,
    directory: Arc<InMemoryIdentityDirectory>,
    publisher: Arc<RecordingEventPublisher>,
}

fn world() -> World {
    let repository = Arc::new(InMemoryRfqRepository::new());
    let catalog = Arc::new(InMemoryCatalog::new());
    let directory = Arc::new(InMemoryIdentityDirectory::new());
    let publisher = Arc::new(RecordingEventPublisher::new());

    let repo = Arc::clone(&repository) as Arc<dyn RfqRepository>;
    let cat = Arc::clone(&catalog) as Arc<dyn Catalog>;
    let dir = Arc::clone(&directory) as Arc<dyn SellerDirectory>;
    let pubr = Arc::clone(&publisher) as Arc<dyn EventPublisher>;

    World {
        lifecycle: RfqLifecycleService::new(
            Arc::clone(&repo),
            Arc::clone(&cat),
            Arc::clone(&dir),
            Arc::clone(&pubr),
        ),
        distribution: DistributionService::new(
            Arc::clone(&repo),
            Arc::clone(&dir),
            Arc::clone(&pubr),
        ),
        quote_ledger: QuoteLedgerService::new(Arc::clone(&repo), Arc::clone(&cat), pubr),
        seller_feed: SellerFeedService::new(repo, cat),
        repository,
        catalog,
        directory,
        publisher,
    }
}

fn admin() -> Principal {
    Principal::new("admin-1", Role::Admin)
}

fn buyer() -> Principal {
    Principal::new("buyer-1", Role::Buyer)
}

fn seller(id: &str) -> Principal {
    Principal::new(id, Role::Seller)
}

fn new_rfq(distribution: DistributionType) -> NewRfq {
    NewRfq {
        title: "Stainless fasteners".to_string(),
        description: "M8 bolts, A2".to_string(),
        quantity: Quantity::new(1000),
        unit: "pcs".to_string(),
        product_ref: None,
        category_ref: None,
        buyer_ref: None,
        status: Some(RfqStatus::Published),
        distribution_type: distribution,
        target_seller_ids: Vec::new(),
        expiry_date: None,
        specifications: Specifications::new(),
        attachments: Vec::new(),
    }
}

fn quote(price: i64) -> QuotePayload {
    QuotePayload {
        quote_price: Decimal::new(price, 0),
        quote_quantity: None,
        delivery_time_days: 10,
        message: None,
    }
}

fn ids(raw: &[&str]) -> Vec<SellerId> {
    raw.iter().map(|id| SellerId::new(*id)).collect()
}

/// Scenario 1: specific distribution gates quoting to the allow-list.
#[tokio::test]
async fn specific_distribution_gates_quote_submission() {
    let w = world();
    w.directory.add_seller("S1", "Seller One");

    let mut fields = new_rfq(DistributionType::Specific);
    fields.target_seller_ids = ids(&["S1"]);
    let rfq = w.lifecycle.create(&buyer(), fields).await.unwrap();

    let err = w
        .quote_ledger
        .submit_quote(&seller("S2"), &rfq.id(), quote(100))
        .await
        .unwrap_err();
    assert!(matches!(err, ApplicationError::Forbidden(_)));

    let written = w
        .quote_ledger
        .submit_quote(&seller("S1"), &rfq.id(), quote(100))
        .await
        .unwrap();
    assert_eq!(written.quote_price().get(), Decimal::new(100, 0));

    let stored = w.repository.get(&rfq.id()).await.unwrap().unwrap();
    assert_eq!(stored.responses().len(), 1);
    assert_eq!(stored.responses()[0].seller_ref(), &SellerId::new("S1"));
}

/// Scenario 2: category eligibility is dynamic; listing a product in the
/// matching category makes the RFQ visible without any RFQ mutation.
#[tokio::test]
async fn category_feed_updates_without_rfq_mutation() {
    let w = world();
    w.catalog.add_category("electronics", "Electronics");

    let mut fields = new_rfq(DistributionType::Category);
    fields.category_ref = Some(CategoryId::new("electronics"));
    let rfq = w.lifecycle.create(&buyer(), fields).await.unwrap();
    let stored_before = w.repository.get(&rfq.id()).await.unwrap().unwrap();

    let feed = w.seller_feed.list_visible(&seller("S3"), None).await.unwrap();
    assert!(feed.is_empty());

    w.catalog.add_seller_category("S3", "electronics");

    let feed = w.seller_feed.list_visible(&seller("S3"), None).await.unwrap();
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0].id(), rfq.id());

    // the RFQ record itself did not change
    let stored_after = w.repository.get(&rfq.id()).await.unwrap().unwrap();
    assert_eq!(stored_before, stored_after);
}

/// Scenario 3 plus the set invariant: unions never inflate the count.
#[tokio::test]
async fn distribute_unions_and_never_duplicates() {
    let w = world();
    for (id, name) in [("S1", "One"), ("S2", "Two"), ("S3", "Three")] {
        w.directory.add_seller(id, name);
    }
    let rfq = w
        .lifecycle
        .create(&admin(), new_rfq(DistributionType::Specific))
        .await
        .unwrap();

    w.distribution
        .distribute(&admin(), &rfq.id(), ids(&["S1", "S2"]))
        .await
        .unwrap();
    let after_second = w
        .distribution
        .distribute(&admin(), &rfq.id(), ids(&["S2", "S3"]))
        .await
        .unwrap();
    assert_eq!(after_second.target_seller_ids(), &ids(&["S1", "S2", "S3"])[..]);

    // idempotence: repeating a call leaves the set unchanged
    let after_repeat = w
        .distribution
        .distribute(&admin(), &rfq.id(), ids(&["S1", "S2"]))
        .await
        .unwrap();
    assert_eq!(after_repeat.target_seller_ids().len(), 3);
}

/// Scenario 4 plus the upsert invariant: resubmission replaces.
#[tokio::test]
async fn resubmission_keeps_exactly_one_entry_per_seller() {
    let w = world();
    let rfq = w
        .lifecycle
        .create(&buyer(), new_rfq(DistributionType::All))
        .await
        .unwrap();

    w.quote_ledger
        .submit_quote(&seller("S1"), &rfq.id(), quote(50))
        .await
        .unwrap();
    w.quote_ledger
        .submit_quote(&seller("S1"), &rfq.id(), quote(75))
        .await
        .unwrap();

    let stored = w.repository.get(&rfq.id()).await.unwrap().unwrap();
    assert_eq!(stored.responses().len(), 1);
    assert_eq!(
        stored.responses()[0].quote_price().get(),
        Decimal::new(75, 0)
    );
}

/// Role matrix, observed through the services.
#[tokio::test]
async fn authorization_matrix_is_enforced_end_to_end() {
    let w = world();
    let rfq = w
        .lifecycle
        .create(&buyer(), new_rfq(DistributionType::All))
        .await
        .unwrap();

    // sellers cannot create, update, delete, distribute, or list all
    assert!(w
        .lifecycle
        .create(&seller("S1"), new_rfq(DistributionType::All))
        .await
        .is_err());
    assert!(w
        .lifecycle
        .update(&seller("S1"), &rfq.id(), RfqPatch::default())
        .await
        .is_err());
    assert!(w.lifecycle.delete(&seller("S1"), &rfq.id()).await.is_err());
    assert!(w
        .distribution
        .distribute(&seller("S1"), &rfq.id(), ids(&["S1"]))
        .await
        .is_err());

    // buyers cannot distribute or quote
    assert!(w
        .distribution
        .distribute(&buyer(), &rfq.id(), ids(&["S1"]))
        .await
        .is_err());
    assert!(w
        .quote_ledger
        .submit_quote(&buyer(), &rfq.id(), quote(10))
        .await
        .is_err());

    // admins cannot quote
    assert!(w
        .quote_ledger
        .submit_quote(&admin(), &rfq.id(), quote(10))
        .await
        .is_err());

    // a non-owning buyer cannot touch someone else's record
    let other_buyer = Principal::new("buyer-2", Role::Buyer);
    assert!(w
        .lifecycle
        .update(&other_buyer, &rfq.id(), RfqPatch::default())
        .await
        .is_err());
}

/// The full lifecycle: draft → published → closed, with the ledger and
/// feed reacting to each step.
#[tokio::test]
async fn full_lifecycle_with_feed_and_ledger() {
    let w = world();
    let mut fields = new_rfq(DistributionType::All);
    fields.status = None; // draft
    let rfq = w.lifecycle.create(&buyer(), fields).await.unwrap();

    // drafts are invisible and unquotable
    assert!(w.seller_feed.list_visible(&seller("S1"), None).await.unwrap().is_empty());
    assert!(w
        .quote_ledger
        .submit_quote(&seller("S1"), &rfq.id(), quote(10))
        .await
        .is_err());

    // publish
    let patch = RfqPatch {
        status: Some(RfqStatus::Published),
        ..RfqPatch::default()
    };
    w.lifecycle.update(&buyer(), &rfq.id(), patch).await.unwrap();

    assert_eq!(w.seller_feed.list_visible(&seller("S1"), None).await.unwrap().len(), 1);
    w.quote_ledger
        .submit_quote(&seller("S1"), &rfq.id(), quote(10))
        .await
        .unwrap();

    // close; the feed empties and quoting stops
    let patch = RfqPatch {
        status: Some(RfqStatus::Closed),
        ..RfqPatch::default()
    };
    w.lifecycle.update(&buyer(), &rfq.id(), patch).await.unwrap();

    assert!(w.seller_feed.list_visible(&seller("S1"), None).await.unwrap().is_empty());
    assert!(w
        .quote_ledger
        .submit_quote(&seller("S2"), &rfq.id(), quote(12))
        .await
        .is_err());

    // terminal: no way back
    let patch = RfqPatch {
        status: Some(RfqStatus::Published),
        ..RfqPatch::default()
    };
    let err = w.lifecycle.update(&buyer(), &rfq.id(), patch).await.unwrap_err();
    assert!(err.is_conflict());

    // events observed along the way
    let topics = w.publisher.topics();
    assert!(topics.contains(&"rfq.created"));
    assert!(topics.contains(&"rfq.status-changed"));
    assert!(topics.contains(&"rfq.quote-submitted"));
}

/// Hard delete removes the aggregate and its responses.
#[tokio::test]
async fn delete_removes_responses_with_the_aggregate() {
    let w = world();
    let rfq = w
        .lifecycle
        .create(&buyer(), new_rfq(DistributionType::All))
        .await
        .unwrap();
    w.quote_ledger
        .submit_quote(&seller("S1"), &rfq.id(), quote(10))
        .await
        .unwrap();

    w.lifecycle.delete(&buyer(), &rfq.id()).await.unwrap();
    assert!(w.repository.get(&rfq.id()).await.unwrap().is_none());
    assert_eq!(w.repository.count().await.unwrap(), 0);
}

/// Concurrent submissions from the same seller: exactly one survives, and
/// it is one of the submitted payloads in full.
#[tokio::test]
async fn concurrent_quotes_serialize_per_seller() {
    let w = world();
    let rfq = w
        .lifecycle
        .create(&buyer(), new_rfq(DistributionType::All))
        .await
        .unwrap();

    let mut handles = Vec::new();
    for price in 1..=24i64 {
        let ledger = w.quote_ledger.clone();
        let id = rfq.id();
        handles.push(tokio::spawn(async move {
            ledger.submit_quote(&seller("S1"), &id, quote(price)).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let stored: Rfq = w.repository.get(&rfq.id()).await.unwrap().unwrap();
    assert_eq!(stored.responses().len(), 1);
    let survivor = stored.responses()[0].quote_price().get();
    assert!(survivor >= Decimal::ONE && survivor <= Decimal::new(24, 0));
}
