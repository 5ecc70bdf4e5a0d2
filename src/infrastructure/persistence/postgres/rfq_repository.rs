//! # PostgreSQL RFQ Repository
//!
//! PostgreSQL implementation of [`RfqRepository`] using sqlx.
//!
//! Nested collections (responses, specifications, attachments) are stored
//! as JSONB documents; the seller allow-list is a text array.
//!
//! Concurrency strategy:
//!
//! - [`add_target_sellers`](RfqRepository::add_target_sellers) is a single
//!   UPDATE that appends only the ids not already present, so two admins
//!   distributing concurrently both land without a read-modify-write.
//! - [`upsert_response`](RfqRepository::upsert_response) runs a bounded
//!   optimistic loop: load, apply the keyed upsert in the aggregate,
//!   version-guarded write, retry on conflict. Each retry re-runs the
//!   whole upsert against fresh state, so the final record always holds
//!   exactly one response per seller, equal to one submission in full.

use crate::domain::entities::response::QuoteResponse;
use crate::domain::entities::rfq::Rfq;
use crate::domain::value_objects::{
    CategoryId, ProductId, Quantity, RfqId, SellerId, Specifications, Timestamp, UserId,
};
use crate::infrastructure::persistence::traits::{
    RepositoryError, RepositoryResult, RfqFilter, RfqRepository,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::str::FromStr;

/// Attempts for the optimistic upsert loop before giving up.
const MAX_UPSERT_ATTEMPTS: u32 = 5;

const SELECT_COLUMNS: &str = "id, title, description, product_ref, category_ref, quantity, unit, \
     buyer_ref, admin_ref, status, distribution_type, target_seller_ids, \
     responses, expiry_date, specifications, attachments, version, \
     created_at, updated_at";

/// PostgreSQL implementation of [`RfqRepository`].
///
/// # Examples
///
/// ```ignore
/// use sqlx::PgPool;
/// use marketplace_rfq::infrastructure::persistence::postgres::PostgresRfqRepository;
///
/// let pool = PgPool::connect("postgres://...").await?;
/// let repo = PostgresRfqRepository::new(pool);
/// repo.migrate().await?;
/// ```
#[derive(Debug, Clone)]
pub struct PostgresRfqRepository {
    pool: PgPool,
}

impl PostgresRfqRepository {
    /// Creates a new PostgreSQL repository.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Applies pending schema migrations.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Query` if a migration fails.
    pub async fn migrate(&self) -> RepositoryResult<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| RepositoryError::query(e.to_string()))
    }

    async fn fetch_row(&self, id: &RfqId) -> RepositoryResult<Option<RfqRow>> {
        let query = format!("SELECT {SELECT_COLUMNS} FROM rfqs WHERE id = $1");
        sqlx::query_as::<_, RfqRow>(&query)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::query(e.to_string()))
    }

    async fn stored_version(&self, id: &RfqId) -> RepositoryResult<Option<u64>> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT version FROM rfqs WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::query(e.to_string()))?;
        Ok(row.map(|(v,)| v as u64))
    }

    /// Version-guarded whole-record write. Returns true if a row matched.
    async fn write_guarded(&self, rfq: &Rfq, expected_version: u64) -> RepositoryResult<bool> {
        let fields = RfqFields::try_from_rfq(rfq)?;
        let result = sqlx::query(
            r#"
            UPDATE rfqs SET
                title = $2, description = $3, product_ref = $4, category_ref = $5,
                quantity = $6, unit = $7, buyer_ref = $8, admin_ref = $9,
                status = $10, distribution_type = $11, target_seller_ids = $12,
                responses = $13, expiry_date = $14, specifications = $15,
                attachments = $16, version = $17, updated_at = $18
            WHERE id = $1 AND version = $19
            "#,
        )
        .bind(rfq.id().as_uuid())
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(&fields.product_ref)
        .bind(&fields.category_ref)
        .bind(fields.quantity)
        .bind(&fields.unit)
        .bind(&fields.buyer_ref)
        .bind(&fields.admin_ref)
        .bind(&fields.status)
        .bind(&fields.distribution_type)
        .bind(&fields.target_seller_ids)
        .bind(&fields.responses)
        .bind(fields.expiry_date)
        .bind(&fields.specifications)
        .bind(&fields.attachments)
        .bind(fields.version)
        .bind(fields.updated_at)
        .bind(expected_version as i64)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::query(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl RfqRepository for PostgresRfqRepository {
    async fn insert(&self, rfq: &Rfq) -> RepositoryResult<()> {
        let fields = RfqFields::try_from_rfq(rfq)?;
        let result = sqlx::query(
            r#"
            INSERT INTO rfqs (
                id, title, description, product_ref, category_ref, quantity,
                unit, buyer_ref, admin_ref, status, distribution_type,
                target_seller_ids, responses, expiry_date, specifications,
                attachments, version, created_at, updated_at
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                $11, $12, $13, $14, $15, $16, $17, $18, $19
            )
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(rfq.id().as_uuid())
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(&fields.product_ref)
        .bind(&fields.category_ref)
        .bind(fields.quantity)
        .bind(&fields.unit)
        .bind(&fields.buyer_ref)
        .bind(&fields.admin_ref)
        .bind(&fields.status)
        .bind(&fields.distribution_type)
        .bind(&fields.target_seller_ids)
        .bind(&fields.responses)
        .bind(fields.expiry_date)
        .bind(&fields.specifications)
        .bind(&fields.attachments)
        .bind(fields.version)
        .bind(fields.created_at)
        .bind(fields.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::Duplicate(rfq.id()));
        }
        Ok(())
    }

    async fn get(&self, id: &RfqId) -> RepositoryResult<Option<Rfq>> {
        match self.fetch_row(id).await? {
            Some(row) => Ok(Some(row.try_into_rfq()?)),
            None => Ok(None),
        }
    }

    async fn update(&self, rfq: &Rfq, expected_version: u64) -> RepositoryResult<()> {
        if self.write_guarded(rfq, expected_version).await? {
            return Ok(());
        }
        match self.stored_version(&rfq.id()).await? {
            None => Err(RepositoryError::NotFound(rfq.id())),
            Some(actual) => Err(RepositoryError::VersionConflict {
                id: rfq.id(),
                expected: expected_version,
                actual,
            }),
        }
    }

    async fn delete(&self, id: &RfqId) -> RepositoryResult<bool> {
        let result = sqlx::query("DELETE FROM rfqs WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::query(e.to_string()))?;
        Ok(result.rows_affected() > 0)
    }

    async fn find(&self, filter: &RfqFilter) -> RepositoryResult<Vec<Rfq>> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {SELECT_COLUMNS} FROM rfqs WHERE TRUE"));

        if let Some(status) = filter.status {
            builder.push(" AND status = ").push_bind(status.to_string());
        }
        if let Some(buyer) = &filter.buyer_ref {
            builder.push(" AND buyer_ref = ").push_bind(buyer.as_str().to_string());
        }
        if let Some(admin) = &filter.admin_ref {
            builder.push(" AND admin_ref = ").push_bind(admin.as_str().to_string());
        }
        if let Some(product) = &filter.product_ref {
            builder
                .push(" AND product_ref = ")
                .push_bind(product.as_str().to_string());
        }
        if let Some(category) = &filter.category_ref {
            builder
                .push(" AND category_ref = ")
                .push_bind(category.as_str().to_string());
        }
        builder.push(" ORDER BY created_at DESC");

        let rows: Vec<RfqRow> = builder
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepositoryError::query(e.to_string()))?;

        rows.into_iter().map(RfqRow::try_into_rfq).collect()
    }

    async fn find_published(&self) -> RepositoryResult<Vec<Rfq>> {
        let filter =
            RfqFilter::any().with_status(crate::domain::value_objects::RfqStatus::Published);
        self.find(&filter).await
    }

    async fn add_target_sellers(
        &self,
        id: &RfqId,
        seller_ids: &[SellerId],
    ) -> RepositoryResult<Rfq> {
        let ids: Vec<String> = seller_ids.iter().map(|s| s.as_str().to_string()).collect();

        // Single-statement union: append only the ids not already present,
        // so concurrent distributions cannot lose each other's writes.
        let query = format!(
            r#"
            UPDATE rfqs SET
                target_seller_ids = target_seller_ids || (
                    SELECT COALESCE(array_agg(DISTINCT s), '{{}}')
                    FROM unnest($2::text[]) AS s
                    WHERE s <> ALL (rfqs.target_seller_ids)
                ),
                version = version + 1,
                updated_at = $3
            WHERE id = $1
            RETURNING {SELECT_COLUMNS}
            "#
        );

        let row: Option<RfqRow> = sqlx::query_as(&query)
            .bind(id.as_uuid())
            .bind(&ids)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::query(e.to_string()))?;

        row.ok_or(RepositoryError::NotFound(*id))?.try_into_rfq()
    }

    async fn upsert_response(
        &self,
        id: &RfqId,
        response: QuoteResponse,
    ) -> RepositoryResult<Rfq> {
        let mut last_seen = 0;
        for _ in 0..MAX_UPSERT_ATTEMPTS {
            let row = self
                .fetch_row(id)
                .await?
                .ok_or(RepositoryError::NotFound(*id))?;
            let mut rfq = row.try_into_rfq()?;
            let expected = rfq.version();
            last_seen = expected;

            rfq.upsert_response(response.clone());

            if self.write_guarded(&rfq, expected).await? {
                return Ok(rfq);
            }
            // lost the race; reload and re-apply the whole upsert
        }

        Err(RepositoryError::VersionConflict {
            id: *id,
            expected: last_seen,
            actual: last_seen,
        })
    }

    async fn count(&self) -> RepositoryResult<u64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM rfqs")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RepositoryError::query(e.to_string()))?;
        Ok(count as u64)
    }
}

/// Column values for a whole-record write.
struct RfqFields {
    title: String,
    description: String,
    product_ref: Option<String>,
    category_ref: Option<String>,
    quantity: i64,
    unit: String,
    buyer_ref: Option<String>,
    admin_ref: Option<String>,
    status: String,
    distribution_type: String,
    target_seller_ids: Vec<String>,
    responses: serde_json::Value,
    expiry_date: Option<DateTime<Utc>>,
    specifications: serde_json::Value,
    attachments: serde_json::Value,
    version: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl RfqFields {
    fn try_from_rfq(rfq: &Rfq) -> RepositoryResult<Self> {
        Ok(Self {
            title: rfq.title().to_string(),
            description: rfq.description().to_string(),
            product_ref: rfq.product_ref().map(|p| p.as_str().to_string()),
            category_ref: rfq.category_ref().map(|c| c.as_str().to_string()),
            quantity: i64::from(rfq.quantity().get()),
            unit: rfq.unit().to_string(),
            buyer_ref: rfq.buyer_ref().map(|b| b.as_str().to_string()),
            admin_ref: rfq.admin_ref().map(|a| a.as_str().to_string()),
            status: rfq.status().to_string(),
            distribution_type: rfq.distribution_type().to_string(),
            target_seller_ids: rfq
                .target_seller_ids()
                .iter()
                .map(|s| s.as_str().to_string())
                .collect(),
            responses: serde_json::to_value(rfq.responses())
                .map_err(|e| RepositoryError::serialization(e.to_string()))?,
            expiry_date: rfq.expiry_date().map(|t| t.as_datetime()),
            specifications: serde_json::to_value(rfq.specifications())
                .map_err(|e| RepositoryError::serialization(e.to_string()))?,
            attachments: serde_json::to_value(rfq.attachments())
                .map_err(|e| RepositoryError::serialization(e.to_string()))?,
            version: rfq.version() as i64,
            created_at: rfq.created_at().as_datetime(),
            updated_at: rfq.updated_at().as_datetime(),
        })
    }
}

/// Row type for RFQ queries.
#[derive(Debug, sqlx::FromRow)]
struct RfqRow {
    id: uuid::Uuid,
    title: String,
    description: String,
    product_ref: Option<String>,
    category_ref: Option<String>,
    quantity: i64,
    unit: String,
    buyer_ref: Option<String>,
    admin_ref: Option<String>,
    status: String,
    distribution_type: String,
    target_seller_ids: Vec<String>,
    responses: serde_json::Value,
    expiry_date: Option<DateTime<Utc>>,
    specifications: serde_json::Value,
    attachments: serde_json::Value,
    version: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl RfqRow {
    fn try_into_rfq(self) -> RepositoryResult<Rfq> {
        let status = FromStr::from_str(&self.status)
            .map_err(|e: crate::domain::value_objects::ParseEnumError| {
                RepositoryError::serialization(e.to_string())
            })?;
        let distribution_type = FromStr::from_str(&self.distribution_type)
            .map_err(|e: crate::domain::value_objects::ParseEnumError| {
                RepositoryError::serialization(e.to_string())
            })?;

        let responses: Vec<QuoteResponse> = serde_json::from_value(self.responses)
            .map_err(|e| RepositoryError::serialization(e.to_string()))?;
        let specifications: Specifications = serde_json::from_value(self.specifications)
            .map_err(|e| RepositoryError::serialization(e.to_string()))?;
        let attachments = serde_json::from_value(self.attachments)
            .map_err(|e| RepositoryError::serialization(e.to_string()))?;

        let quantity = u32::try_from(self.quantity)
            .map_err(|_| RepositoryError::serialization("quantity out of range".to_string()))?;

        Ok(Rfq::from_parts(
            RfqId::new(self.id),
            self.title,
            self.description,
            self.product_ref.map(ProductId::new),
            self.category_ref.map(CategoryId::new),
            Quantity::new(quantity),
            self.unit,
            self.buyer_ref.map(UserId::new),
            self.admin_ref.map(UserId::new),
            status,
            distribution_type,
            self.target_seller_ids.into_iter().map(SellerId::new).collect(),
            responses,
            self.expiry_date.map(Timestamp::from_datetime),
            specifications,
            attachments,
            self.version as u64,
            Timestamp::from_datetime(self.created_at),
            Timestamp::from_datetime(self.updated_at),
        ))
    }
}
