//! Port for fulfillment address persistence.
//!
//! The [`FulfillmentAddressRepository`] trait defines how addresses are
//! stored, looked up and soft-deleted. Adapters implement it against durable
//! storage (PostgreSQL via Diesel) or in memory for tests.
//!
//! Soft deletion is the only removal path: no operation here removes rows.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{FulfillmentAddress, FulfillmentAddressId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by fulfillment address repository adapters.
    pub enum FulfillmentAddressRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "address repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "address repository query failed: {message}",
        /// No live row matched the id.
        NotFound { id: String } =>
            "address {id} not found",
        /// A row with the same primary key already exists.
        Duplicate { id: String } =>
            "address {id} already exists",
    }
}

/// Which rows a lookup may return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeletedVisibility {
    /// Only rows whose `deleted_at` is null.
    #[default]
    LiveOnly,
    /// Live and soft-deleted rows.
    IncludeDeleted,
}

impl DeletedVisibility {
    /// Whether a row with the given deletion marker is visible.
    pub fn admits(self, deleted_at: Option<DateTime<Utc>>) -> bool {
        match self {
            Self::LiveOnly => deleted_at.is_none(),
            Self::IncludeDeleted => true,
        }
    }
}

/// Port for fulfillment address storage and retrieval.
///
/// # Ordering
///
/// List operations return rows in a stable order so callers and tests can
/// compare results directly: live lists by `created_at` then `id`, deleted
/// lists by `deleted_at` then `id`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FulfillmentAddressRepository: Send + Sync {
    /// Insert a new address with every column as given.
    async fn insert(&self, address: &FulfillmentAddress)
    -> Result<(), FulfillmentAddressRepositoryError>;

    /// Fetch one address by id.
    async fn find_by_id(
        &self,
        id: &FulfillmentAddressId,
        visibility: DeletedVisibility,
    ) -> Result<Option<FulfillmentAddress>, FulfillmentAddressRepositoryError>;

    /// List live addresses attached to a fulfillment.
    async fn list_by_fulfillment_id(
        &self,
        fulfillment_id: &str,
    ) -> Result<Vec<FulfillmentAddress>, FulfillmentAddressRepositoryError>;

    /// List soft-deleted addresses whose `deleted_at` is at or before `cutoff`.
    async fn list_deleted_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<FulfillmentAddress>, FulfillmentAddressRepositoryError>;

    /// Persist the mutable columns and `updated_at` of a live address.
    ///
    /// Returns [`FulfillmentAddressRepositoryError::NotFound`] when no live
    /// row carries the address id.
    async fn update(&self, address: &FulfillmentAddress)
    -> Result<(), FulfillmentAddressRepositoryError>;

    /// Set `deleted_at = at` on the live rows among `ids`.
    ///
    /// `updated_at` moves to `at` as well, never behind `created_at`. Returns
    /// the changed ids sorted; already-deleted or unknown ids are skipped.
    async fn soft_delete(
        &self,
        ids: &[FulfillmentAddressId],
        at: DateTime<Utc>,
    ) -> Result<Vec<FulfillmentAddressId>, FulfillmentAddressRepositoryError>;

    /// Clear `deleted_at` on the soft-deleted rows among `ids` and stamp
    /// `updated_at` with `at`.
    ///
    /// Returns the changed ids sorted.
    async fn restore(
        &self,
        ids: &[FulfillmentAddressId],
        at: DateTime<Utc>,
    ) -> Result<Vec<FulfillmentAddressId>, FulfillmentAddressRepositoryError>;
}

/// Fixture implementation for testing without a real database.
///
/// Lookups find nothing and mutations are accepted and discarded. Use it where
/// address persistence is not under test.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureFulfillmentAddressRepository;

#[async_trait]
impl FulfillmentAddressRepository for FixtureFulfillmentAddressRepository {
    async fn insert(
        &self,
        _address: &FulfillmentAddress,
    ) -> Result<(), FulfillmentAddressRepositoryError> {
        Ok(())
    }

    async fn find_by_id(
        &self,
        _id: &FulfillmentAddressId,
        _visibility: DeletedVisibility,
    ) -> Result<Option<FulfillmentAddress>, FulfillmentAddressRepositoryError> {
        Ok(None)
    }

    async fn list_by_fulfillment_id(
        &self,
        _fulfillment_id: &str,
    ) -> Result<Vec<FulfillmentAddress>, FulfillmentAddressRepositoryError> {
        Ok(Vec::new())
    }

    async fn list_deleted_before(
        &self,
        _cutoff: DateTime<Utc>,
    ) -> Result<Vec<FulfillmentAddress>, FulfillmentAddressRepositoryError> {
        Ok(Vec::new())
    }

    async fn update(
        &self,
        _address: &FulfillmentAddress,
    ) -> Result<(), FulfillmentAddressRepositoryError> {
        Ok(())
    }

    async fn soft_delete(
        &self,
        _ids: &[FulfillmentAddressId],
        _at: DateTime<Utc>,
    ) -> Result<Vec<FulfillmentAddressId>, FulfillmentAddressRepositoryError> {
        Ok(Vec::new())
    }

    async fn restore(
        &self,
        _ids: &[FulfillmentAddressId],
        _at: DateTime<Utc>,
    ) -> Result<Vec<FulfillmentAddressId>, FulfillmentAddressRepositoryError> {
        Ok(Vec::new())
    }
}
