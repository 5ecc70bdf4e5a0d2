//! # Identity Collaborator
//!
//! Ports onto the external identity system.
//!
//! Account management, approval workflows, and session issuance live
//! outside this core. Two narrow capabilities are consumed here:
//!
//! - [`PrincipalResolver`]: turn a bearer token into an authenticated
//!   principal (id + role). The external system only issues seller tokens
//!   for approved sellers; the JWT adapter re-checks the claim and rejects
//!   unapproved sellers defensively at the boundary.
//! - [`SellerDirectory`]: existence and display lookups for seller/user
//!   references embedded in RFQs.

use crate::domain::value_objects::{Role, SellerId, UserId};
use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// An authenticated marketplace principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// The principal's identity.
    pub id: UserId,
    /// The principal's role.
    pub role: Role,
}

impl Principal {
    /// Creates a principal.
    #[must_use]
    pub fn new(id: impl Into<UserId>, role: Role) -> Self {
        Self {
            id: id.into(),
            role,
        }
    }

    /// Views this principal as a seller identity.
    #[must_use]
    pub fn seller_id(&self) -> SellerId {
        self.id.as_seller()
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.role, self.id)
    }
}

/// Display summary of a user or seller, for denormalized views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    /// The account id.
    pub id: UserId,
    /// Display name.
    pub name: String,
}

/// Error type for identity operations.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// The bearer token could not be verified.
    #[error("invalid token: {0}")]
    InvalidToken(String),

    /// A seller principal that the identity system has not approved.
    #[error("seller not approved: {0}")]
    NotApproved(String),

    /// The identity system could not be reached.
    #[error("identity lookup failed: {0}")]
    Lookup(String),
}

/// Resolves bearer tokens into principals.
#[async_trait]
pub trait PrincipalResolver: Send + Sync + fmt::Debug {
    /// Resolves a bearer token.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::InvalidToken` for unverifiable tokens and
    /// `IdentityError::NotApproved` for sellers the identity system has
    /// not cleared to act.
    async fn resolve(&self, token: &str) -> Result<Principal, IdentityError>;
}

/// Existence and display lookups against the identity system.
#[async_trait]
pub trait SellerDirectory: Send + Sync + fmt::Debug {
    /// Returns true if the id references a known seller account.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::Lookup` if the identity system is
    /// unreachable.
    async fn seller_exists(&self, id: &SellerId) -> Result<bool, IdentityError>;

    /// Returns the display summary of a user account, if known.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::Lookup` if the identity system is
    /// unreachable.
    async fn user_summary(&self, id: &UserId) -> Result<Option<UserSummary>, IdentityError>;
}

/// Claims carried by the marketplace's bearer tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the account id.
    pub sub: String,
    /// Assigned role.
    pub role: Role,
    /// Approval flag, meaningful for sellers.
    #[serde(default)]
    pub approved: bool,
    /// Expiry as seconds since the Unix epoch.
    pub exp: i64,
}

/// [`PrincipalResolver`] backed by the identity system's signed JWTs.
///
/// This adapter only *verifies* tokens; it never mints them.
#[derive(Clone)]
pub struct JwtPrincipalResolver {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtPrincipalResolver {
    /// Creates a resolver for HS256 tokens signed with `secret`.
    #[must_use]
    pub fn new(secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }
}

impl fmt::Debug for JwtPrincipalResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtPrincipalResolver").finish_non_exhaustive()
    }
}

#[async_trait]
impl PrincipalResolver for JwtPrincipalResolver {
    async fn resolve(&self, token: &str) -> Result<Principal, IdentityError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| IdentityError::InvalidToken(e.to_string()))?;

        let claims = data.claims;
        if claims.role.is_seller() && !claims.approved {
            return Err(IdentityError::NotApproved(claims.sub));
        }

        Ok(Principal::new(claims.sub, claims.role))
    }
}

/// [`SellerDirectory`] backed by the identity service's HTTP API.
#[derive(Debug, Clone)]
pub struct HttpIdentityClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpIdentityClient {
    /// Creates a client against the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    async fn fetch_optional<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Option<T>, IdentityError> {
        let url = format!("{}{path}", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| IdentityError::Lookup(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = response
            .error_for_status()
            .map_err(|e| IdentityError::Lookup(e.to_string()))?;
        let body = response
            .json::<T>()
            .await
            .map_err(|e| IdentityError::Lookup(e.to_string()))?;
        Ok(Some(body))
    }
}

#[async_trait]
impl SellerDirectory for HttpIdentityClient {
    async fn seller_exists(&self, id: &SellerId) -> Result<bool, IdentityError> {
        let summary: Option<UserSummary> =
            self.fetch_optional(&format!("/sellers/{id}")).await?;
        Ok(summary.is_some())
    }

    async fn user_summary(&self, id: &UserId) -> Result<Option<UserSummary>, IdentityError> {
        self.fetch_optional(&format!("/users/{id}")).await
    }
}

/// In-memory [`SellerDirectory`] for tests and local runs.
#[derive(Debug, Default)]
pub struct InMemoryIdentityDirectory {
    sellers: RwLock<HashMap<SellerId, String>>,
    users: RwLock<HashMap<UserId, String>>,
}

impl InMemoryIdentityDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an approved seller account.
    pub fn add_seller(&self, id: impl Into<SellerId>, name: impl Into<String>) {
        let id = id.into();
        let name = name.into();
        self.users
            .write()
            .insert(UserId::new(id.as_str()), name.clone());
        self.sellers.write().insert(id, name);
    }

    /// Registers a buyer or admin account.
    pub fn add_user(&self, id: impl Into<UserId>, name: impl Into<String>) {
        self.users.write().insert(id.into(), name.into());
    }
}

#[async_trait]
impl SellerDirectory for InMemoryIdentityDirectory {
    async fn seller_exists(&self, id: &SellerId) -> Result<bool, IdentityError> {
        Ok(self.sellers.read().contains_key(id))
    }

    async fn user_summary(&self, id: &UserId) -> Result<Option<UserSummary>, IdentityError> {
        Ok(self.users.read().get(id).map(|name| UserSummary {
            id: id.clone(),
            name: name.clone(),
        }))
    }
}
