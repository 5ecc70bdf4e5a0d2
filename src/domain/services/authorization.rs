//! # Authorization Gate
//!
//! Declarative role-capability matrix consumed by every operation.
//!
//! The gate answers the pure role question only. Two refinements are
//! applied by the owning service after the role gate passes, because they
//! need data the gate does not hold: buyer *ownership* (update/delete on
//! someone else's RFQ) and seller *eligibility* (quote submission).
//!
//! | Action        | admin | buyer | seller |
//! |---------------|-------|-------|--------|
//! | Create        | ✓     | ✓     | ✗      |
//! | Update        | ✓     | ✓*    | ✗      |
//! | Delete        | ✓     | ✓*    | ✗      |
//! | Distribute    | ✓     | ✗     | ✗      |
//! | ListAll       | ✓     | ✗     | ✗      |
//! | ListOwn       | ✓     | ✓     | ✗      |
//! | ListVisible   | ✓     | ✗     | ✓      |
//! | SubmitQuote   | ✗     | ✗     | ✓*     |
//! | ViewDetails   | ✓     | ✗     | ✗      |
//!
//! `*` subject to the ownership/eligibility refinement.

use crate::domain::value_objects::Role;
use std::fmt;

/// Operations of the RFQ core, as seen by the authorization gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RfqAction {
    /// Create a new RFQ.
    Create,
    /// Patch an existing RFQ.
    Update,
    /// Hard-delete an RFQ.
    Delete,
    /// Grow an RFQ's seller allow-list.
    Distribute,
    /// List every RFQ with arbitrary filters.
    ListAll,
    /// List the caller's own RFQs.
    ListOwn,
    /// List published RFQs visible to the calling seller.
    ListVisible,
    /// Submit or replace a quote response.
    SubmitQuote,
    /// Fetch the fully populated admin view of one RFQ.
    ViewDetails,
}

impl fmt::Display for RfqAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Distribute => "distribute",
            Self::ListAll => "list-all",
            Self::ListOwn => "list-own",
            Self::ListVisible => "list-visible",
            Self::SubmitQuote => "submit-quote",
            Self::ViewDetails => "view-details",
        };
        f.write_str(name)
    }
}

/// Role-capability matrix for the RFQ core.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthorizationGate;

impl AuthorizationGate {
    /// Returns true if the role may perform the action at all.
    #[must_use]
    pub const fn allows(role: Role, action: RfqAction) -> bool {
        match action {
            RfqAction::Create | RfqAction::Update | RfqAction::Delete | RfqAction::ListOwn => {
                matches!(role, Role::Admin | Role::Buyer)
            }
            RfqAction::Distribute | RfqAction::ListAll | RfqAction::ViewDetails => {
                matches!(role, Role::Admin)
            }
            RfqAction::ListVisible => matches!(role, Role::Admin | Role::Seller),
            RfqAction::SubmitQuote => matches!(role, Role::Seller),
        }
    }
}
