//! Property tests for the two collection invariants of the engine:
//! the allow-list behaves as a set under any sequence of distributions,
//! and the response ledger holds exactly one entry per seller, equal to
//! the last submission.

#![allow(clippy::unwrap_used)]

use marketplace_rfq::domain::entities::response::QuoteResponse;
use marketplace_rfq::domain::entities::rfq::{Rfq, RfqBuilder};
use marketplace_rfq::domain::value_objects::{
    DistributionType, Price, Quantity, SellerId,
};
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};

fn base_rfq(distribution: DistributionType) -> Rfq {
    RfqBuilder::new("t", "d", Quantity::new(10), "pcs")
        .distribution_type(distribution)
        .try_build()
        .unwrap()
}

/// A small id universe so batches overlap often.
fn seller_id_strategy() -> impl Strategy<Value = String> {
    (0u8..12).prop_map(|n| format!("s{n}"))
}

fn batches_strategy() -> impl Strategy<Value = Vec<Vec<String>>> {
    prop::collection::vec(prop::collection::vec(seller_id_strategy(), 0..6), 0..8)
}

proptest! {
    /// For any sequence of distribute calls the stored list equals the
    /// mathematical union: duplicates never inflate the count and order
    /// of first appearance is preserved.
    #[test]
    fn target_list_is_a_set_under_unions(batches in batches_strategy()) {
        let mut rfq = base_rfq(DistributionType::Specific);
        let mut expected: Vec<String> = Vec::new();

        for batch in &batches {
            let ids: Vec<SellerId> = batch.iter().map(SellerId::new).collect();
            rfq.add_target_sellers(&ids);
            for id in batch {
                if !expected.contains(id) {
                    expected.push(id.clone());
                }
            }
        }

        let stored: Vec<String> = rfq
            .target_seller_ids()
            .iter()
            .map(|s| s.as_str().to_string())
            .collect();
        prop_assert_eq!(&stored, &expected);

        let unique: HashSet<&String> = stored.iter().collect();
        prop_assert_eq!(unique.len(), stored.len());
    }

    /// Re-applying every batch a second time changes nothing.
    #[test]
    fn distribution_is_idempotent(batches in batches_strategy()) {
        let mut rfq = base_rfq(DistributionType::Specific);
        for batch in &batches {
            let ids: Vec<SellerId> = batch.iter().map(SellerId::new).collect();
            rfq.add_target_sellers(&ids);
        }
        let first_pass = rfq.target_seller_ids().to_vec();

        for batch in &batches {
            let ids: Vec<SellerId> = batch.iter().map(SellerId::new).collect();
            let added = rfq.add_target_sellers(&ids);
            prop_assert_eq!(added, 0);
        }
        prop_assert_eq!(rfq.target_seller_ids(), &first_pass[..]);
    }

    /// For any sequence of submissions, the ledger holds exactly one
    /// response per distinct seller, carrying that seller's last price.
    #[test]
    fn ledger_keeps_last_submission_per_seller(
        submissions in prop::collection::vec((seller_id_strategy(), 1i64..10_000), 0..24)
    ) {
        let mut rfq = base_rfq(DistributionType::All);
        let mut last_price: HashMap<String, i64> = HashMap::new();

        for (seller, price) in &submissions {
            let response = QuoteResponse::submitted(
                SellerId::new(seller),
                Price::new(Decimal::new(*price, 0)).unwrap(),
                Quantity::new(1),
                7,
                None,
            );
            rfq.upsert_response(response);
            last_price.insert(seller.clone(), *price);
        }

        prop_assert_eq!(rfq.responses().len(), last_price.len());
        for response in rfq.responses() {
            let seller = response.seller_ref().as_str();
            let expected = last_price.get(seller).copied().unwrap();
            prop_assert_eq!(response.quote_price().get(), Decimal::new(expected, 0));
        }
    }
}
