//! # Domain Enums
//!
//! Enumeration types for the RFQ domain:
//!
//! - [`RfqStatus`] - RFQ lifecycle states with an enforced transition table
//! - [`DistributionType`] - policy controlling which sellers may see an RFQ
//! - [`ResponseStatus`] - lifecycle of a seller's quote response
//! - [`Role`] - marketplace principal roles
//!
//! All enums implement `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`,
//! `Display`, `FromStr`, and Serde traits. Wire values are lowercase, which
//! keeps them compatible with the marketplace's existing JSON payloads, and
//! any unrecognized value is rejected at the parse boundary.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when parsing an enum from a string fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {0} value: {1}")]
pub struct ParseEnumError(&'static str, String);

/// Lifecycle status of an RFQ.
///
/// The status follows a strict state machine:
///
/// ```text
/// Draft → Published → Closed
///             └─────→ Cancelled
/// ```
///
/// `Closed` and `Cancelled` are terminal.
///
/// # Examples
///
/// ```
/// use marketplace_rfq::domain::value_objects::RfqStatus;
///
/// assert!(RfqStatus::Draft.can_transition_to(RfqStatus::Published));
/// assert!(!RfqStatus::Closed.can_transition_to(RfqStatus::Published));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum RfqStatus {
    /// Not yet visible to sellers.
    Draft = 0,
    /// Open for quoting by eligible sellers.
    Published = 1,
    /// Sourcing finished normally. Terminal.
    Closed = 2,
    /// Withdrawn by the owner. Terminal.
    Cancelled = 3,
}

impl RfqStatus {
    /// Returns true if the transition from `self` to `target` is allowed.
    ///
    /// A "transition" to the current status is not a transition and is
    /// handled by callers as a no-op; this method only answers for actual
    /// state changes.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Draft, Self::Published)
                | (Self::Published, Self::Closed)
                | (Self::Published, Self::Cancelled)
        )
    }

    /// Returns true if this status is terminal.
    #[inline]
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Closed | Self::Cancelled)
    }

    /// Returns true if sellers may currently see and quote the RFQ.
    #[inline]
    #[must_use]
    pub const fn is_published(self) -> bool {
        matches!(self, Self::Published)
    }
}

impl fmt::Display for RfqStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Draft => write!(f, "draft"),
            Self::Published => write!(f, "published"),
            Self::Closed => write!(f, "closed"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl FromStr for RfqStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(Self::Draft),
            "published" => Ok(Self::Published),
            "closed" => Ok(Self::Closed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(ParseEnumError("RfqStatus", s.to_string())),
        }
    }
}

/// Policy controlling which sellers may see and quote an RFQ.
///
/// The distribution type is the immutable intent of the record; it selects
/// the eligibility algorithm applied on every read and every write. Values
/// outside the three policies are rejected at the parse boundary, so
/// eligibility fails closed for anything unrecognized.
///
/// # Examples
///
/// ```
/// use marketplace_rfq::domain::value_objects::DistributionType;
///
/// let t: DistributionType = "category".parse().unwrap();
/// assert_eq!(t, DistributionType::Category);
/// assert!("open-to-everyone".parse::<DistributionType>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum DistributionType {
    /// Any seller may see and quote.
    All = 0,
    /// Sellers with a product in the RFQ's category may see and quote.
    Category = 1,
    /// Only sellers on the explicit allow-list may see and quote.
    Specific = 2,
}

impl fmt::Display for DistributionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Category => write!(f, "category"),
            Self::Specific => write!(f, "specific"),
        }
    }
}

impl FromStr for DistributionType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "category" => Ok(Self::Category),
            "specific" => Ok(Self::Specific),
            _ => Err(ParseEnumError("DistributionType", s.to_string())),
        }
    }
}

/// Status of a seller's quote response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum ResponseStatus {
    /// Reserved for responses staged before submission.
    Pending = 0,
    /// Submitted by the seller. The only status this core produces.
    Submitted = 1,
    /// Accepted by the buyer.
    Accepted = 2,
    /// Rejected by the buyer.
    Rejected = 3,
}

impl fmt::Display for ResponseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Submitted => write!(f, "submitted"),
            Self::Accepted => write!(f, "accepted"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

impl FromStr for ResponseStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "submitted" => Ok(Self::Submitted),
            "accepted" => Ok(Self::Accepted),
            "rejected" => Ok(Self::Rejected),
            _ => Err(ParseEnumError("ResponseStatus", s.to_string())),
        }
    }
}

/// Role of an authenticated marketplace principal.
///
/// Roles are assigned by the external identity system and consulted by the
/// authorization gate on every operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Role {
    /// Marketplace operator; full curation rights.
    Admin = 0,
    /// Publishes RFQs and owns the ones they create.
    Buyer = 1,
    /// Quotes on RFQs they are eligible for.
    Seller = 2,
}

impl Role {
    /// Returns true for the admin role.
    #[inline]
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Returns true for the buyer role.
    #[inline]
    #[must_use]
    pub const fn is_buyer(self) -> bool {
        matches!(self, Self::Buyer)
    }

    /// Returns true for the seller role.
    #[inline]
    #[must_use]
    pub const fn is_seller(self) -> bool {
        matches!(self, Self::Seller)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::Buyer => write!(f, "buyer"),
            Self::Seller => write!(f, "seller"),
        }
    }
}

impl FromStr for Role {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "buyer" => Ok(Self::Buyer),
            "seller" => Ok(Self::Seller),
            _ => Err(ParseEnumError("Role", s.to_string())),
        }
    }
}
