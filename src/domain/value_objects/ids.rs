//! # Identifier Value Objects
//!
//! Strongly-typed identifiers for the marketplace domain.
//!
//! UUID-backed identifiers ([`RfqId`], [`EventId`]) are generated by this
//! core. String-backed identifiers ([`UserId`], [`SellerId`], [`ProductId`],
//! [`CategoryId`]) are opaque references owned by the external identity and
//! catalog systems; this core never interprets their contents.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for an RFQ.
///
/// # Examples
///
/// ```
/// use marketplace_rfq::domain::value_objects::RfqId;
///
/// let id = RfqId::new_v4();
/// assert_ne!(id, RfqId::new_v4());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RfqId(Uuid);

/// Unique identifier for a domain event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(Uuid);

macro_rules! uuid_id {
    ($name:ident) => {
        impl $name {
            /// Creates an identifier from an existing UUID.
            #[must_use]
            pub const fn new(id: Uuid) -> Self {
                Self(id)
            }

            /// Generates a new random identifier.
            #[must_use]
            pub fn new_v4() -> Self {
                Self(Uuid::new_v4())
            }

            /// Returns the underlying UUID.
            #[inline]
            #[must_use]
            pub const fn as_uuid(&self) -> Uuid {
                self.0
            }

            /// Parses an identifier from its string form.
            #[must_use]
            pub fn parse(s: &str) -> Option<Self> {
                Uuid::parse_str(s).ok().map(Self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }
    };
}

uuid_id!(RfqId);
uuid_id!(EventId);

/// Identifier of a marketplace user (buyer or admin).
///
/// Opaque reference into the external identity system.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

/// Identifier of a seller account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SellerId(String);

/// Identifier of a product in the external catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

/// Identifier of a category in the external catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(String);

macro_rules! string_id {
    ($name:ident) => {
        impl $name {
            /// Creates an identifier from a string value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the identifier as a string slice.
            #[inline]
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

string_id!(UserId);
string_id!(SellerId);
string_id!(ProductId);
string_id!(CategoryId);

impl UserId {
    /// Views this user as a seller identity.
    ///
    /// Seller principals arrive from the identity system as users; seller
    /// operations key on [`SellerId`].
    #[must_use]
    pub fn as_seller(&self) -> SellerId {
        SellerId::new(self.0.clone())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn rfq_id_roundtrips_through_string() {
        let id = RfqId::new_v4();
        let parsed = RfqId::parse(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn rfq_id_parse_rejects_garbage() {
        assert!(RfqId::parse("not-a-uuid").is_none());
    }

    #[test]
    fn string_ids_compare_by_value() {
        assert_eq!(SellerId::new("s1"), SellerId::from("s1"));
        assert_ne!(SellerId::new("s1"), SellerId::new("s2"));
    }

    #[test]
    fn user_id_as_seller_preserves_value() {
        let user = UserId::new("seller-7");
        assert_eq!(user.as_seller().as_str(), "seller-7");
    }

    #[test]
    fn ids_serialize_transparently() {
        let json = serde_json::to_string(&SellerId::new("s1")).unwrap();
        assert_eq!(json, "\"s1\"");

        let id = RfqId::new_v4();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{id}\""));
    }
}
