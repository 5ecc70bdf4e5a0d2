//! # Eligibility Resolver
//!
//! Pure predicate answering "may this seller see and quote this RFQ".
//!
//! The resolver is stateless and side-effect free. It is applied twice per
//! quote: once when building a seller's feed (read-time filter) and again
//! inside quote submission (write-time authorization), because a seller can
//! attempt to quote on any RFQ id they discover out-of-band.
//!
//! The seller's category membership is computed by the external catalog at
//! call time and passed in, never cached on the RFQ, so `Category`
//! eligibility is dynamic: a seller who lists a product in the matching
//! category becomes eligible without any RFQ mutation.

use crate::domain::entities::rfq::Rfq;
use crate::domain::value_objects::{CategoryId, DistributionType, SellerId};
use std::collections::HashSet;

/// Stateless eligibility predicate over the three distribution policies.
///
/// # Examples
///
/// ```
/// use marketplace_rfq::domain::entities::rfq::RfqBuilder;
/// use marketplace_rfq::domain::services::eligibility::EligibilityResolver;
/// use marketplace_rfq::domain::value_objects::{DistributionType, Quantity, SellerId};
/// use std::collections::HashSet;
///
/// let rfq = RfqBuilder::new("t", "d", Quantity::new(1), "pcs")
///     .distribution_type(DistributionType::Specific)
///     .target_seller_ids(vec![SellerId::new("s1")])
///     .try_build()
///     .unwrap();
///
/// let no_categories = HashSet::new();
/// assert!(EligibilityResolver::is_eligible(&rfq, &SellerId::new("s1"), &no_categories));
/// assert!(!EligibilityResolver::is_eligible(&rfq, &SellerId::new("s2"), &no_categories));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct EligibilityResolver;

impl EligibilityResolver {
    /// Returns true if `seller_id` may see and quote `rfq`.
    ///
    /// - `All`: every seller is eligible.
    /// - `Category`: eligible iff the RFQ carries a category reference and
    ///   the seller's current categories contain it. An RFQ with
    ///   `Category` distribution but no category reference matches no one.
    /// - `Specific`: eligible iff the seller is on the explicit allow-list.
    ///
    /// Distribution values outside these three are unrepresentable; they
    /// are rejected at the parse boundary, which is where eligibility
    /// fails closed.
    #[must_use]
    pub fn is_eligible(
        rfq: &Rfq,
        seller_id: &SellerId,
        seller_category_ids: &HashSet<CategoryId>,
    ) -> bool {
        match rfq.distribution_type() {
            DistributionType::All => true,
            DistributionType::Category => rfq
                .category_ref()
                .is_some_and(|category| seller_category_ids.contains(category)),
            DistributionType::Specific => rfq.targets_seller(seller_id),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::entities::rfq::RfqBuilder;
    use crate::domain::value_objects::Quantity;

    fn rfq_with(distribution: DistributionType) -> RfqBuilder {
        RfqBuilder::new("t", "d", Quantity::new(1), "pcs").distribution_type(distribution)
    }

    fn categories(ids: &[&str]) -> HashSet<CategoryId> {
        ids.iter().map(|id| CategoryId::new(*id)).collect()
    }

    #[test]
    fn all_matches_every_seller() {
        let rfq = rfq_with(DistributionType::All).try_build().unwrap();
        for seller in ["s1", "s2", "anyone"] {
            assert!(EligibilityResolver::is_eligible(
                &rfq,
                &SellerId::new(seller),
                &HashSet::new()
            ));
        }
    }

    #[test]
    fn category_requires_membership() {
        let rfq = rfq_with(DistributionType::Category)
            .category_ref(CategoryId::new("electronics"))
            .try_build()
            .unwrap();
        let seller = SellerId::new("s1");

        assert!(!EligibilityResolver::is_eligible(&rfq, &seller, &categories(&["textiles"])));
        assert!(EligibilityResolver::is_eligible(
            &rfq,
            &seller,
            &categories(&["textiles", "electronics"])
        ));
    }

    #[test]
    fn category_without_reference_matches_no_one() {
        let rfq = rfq_with(DistributionType::Category).try_build().unwrap();
        assert!(!EligibilityResolver::is_eligible(
            &rfq,
            &SellerId::new("s1"),
            &categories(&["electronics"])
        ));
    }

    #[test]
    fn specific_requires_allow_list_membership() {
        let rfq = rfq_with(DistributionType::Specific)
            .target_seller_ids(vec![SellerId::new("s1")])
            .try_build()
            .unwrap();

        assert!(EligibilityResolver::is_eligible(
            &rfq,
            &SellerId::new("s1"),
            &HashSet::new()
        ));
        assert!(!EligibilityResolver::is_eligible(
            &rfq,
            &SellerId::new("s2"),
            &categories(&["electronics"])
        ));
    }

    #[test]
    fn specific_ignores_categories() {
        let rfq = rfq_with(DistributionType::Specific)
            .category_ref(CategoryId::new("electronics"))
            .try_build()
            .unwrap();

        // seller has a matching category but is not on the allow-list
        assert!(!EligibilityResolver::is_eligible(
            &rfq,
            &SellerId::new("s1"),
            &categories(&["electronics"])
        ));
    }
}
