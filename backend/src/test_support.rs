//! Test utilities for the fulfillment crate.
//!
//! This module provides shared helpers for both unit tests (in `src/`) and
//! integration tests (in `tests/`). It is compiled for `cfg(test)` and when the
//! `test-support` feature is enabled.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeDelta, Utc};
use mockable::Clock;

use crate::domain::ports::{
    DeletedVisibility, FulfillmentAddressRepository, FulfillmentAddressRepositoryError,
};
use crate::domain::{FulfillmentAddress, FulfillmentAddressId};

/// Clock whose current time is set by the test.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    /// Start the clock at `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    /// Move the clock forward by whole seconds.
    pub fn advance_seconds(&self, seconds: i64) {
        *self.lock_clock() += TimeDelta::seconds(seconds);
    }

    /// Jump to an absolute time.
    pub fn set(&self, now: DateTime<Utc>) {
        *self.lock_clock() = now;
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// In-process [`FulfillmentAddressRepository`] with the same visibility and
/// ordering rules as the PostgreSQL adapter.
#[derive(Default)]
pub struct InMemoryFulfillmentAddressRepository {
    rows: Mutex<BTreeMap<FulfillmentAddressId, FulfillmentAddress>>,
}

impl InMemoryFulfillmentAddressRepository {
    /// Number of stored rows, live or deleted.
    pub fn len(&self) -> usize {
        self.lock_rows().len()
    }

    /// Whether no rows are stored.
    pub fn is_empty(&self) -> bool {
        self.lock_rows().is_empty()
    }

    fn lock_rows(&self) -> MutexGuard<'_, BTreeMap<FulfillmentAddressId, FulfillmentAddress>> {
        match self.rows.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("address store mutex"),
        }
    }
}

#[async_trait]
impl FulfillmentAddressRepository for InMemoryFulfillmentAddressRepository {
    async fn insert(
        &self,
        address: &FulfillmentAddress,
    ) -> Result<(), FulfillmentAddressRepositoryError> {
        let mut rows = self.lock_rows();
        if rows.contains_key(address.id()) {
            return Err(FulfillmentAddressRepositoryError::duplicate(
                address.id().as_str(),
            ));
        }
        rows.insert(address.id().clone(), address.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &FulfillmentAddressId,
        visibility: DeletedVisibility,
    ) -> Result<Option<FulfillmentAddress>, FulfillmentAddressRepositoryError> {
        Ok(self
            .lock_rows()
            .get(id)
            .filter(|row| visibility.admits(row.deleted_at()))
            .cloned())
    }

    async fn list_by_fulfillment_id(
        &self,
        fulfillment_id: &str,
    ) -> Result<Vec<FulfillmentAddress>, FulfillmentAddressRepositoryError> {
        let mut matches: Vec<FulfillmentAddress> = self
            .lock_rows()
            .values()
            .filter(|row| row.is_live() && row.fulfillment_id() == Some(fulfillment_id))
            .cloned()
            .collect();
        matches.sort_by(|a, b| {
            a.created_at()
                .cmp(&b.created_at())
                .then_with(|| a.id().cmp(b.id()))
        });
        Ok(matches)
    }

    async fn list_deleted_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<FulfillmentAddress>, FulfillmentAddressRepositoryError> {
        let mut matches: Vec<FulfillmentAddress> = self
            .lock_rows()
            .values()
            .filter(|row| row.deleted_at().is_some_and(|deleted_at| deleted_at <= cutoff))
            .cloned()
            .collect();
        matches.sort_by(|a, b| {
            a.deleted_at()
                .cmp(&b.deleted_at())
                .then_with(|| a.id().cmp(b.id()))
        });
        Ok(matches)
    }

    async fn update(
        &self,
        address: &FulfillmentAddress,
    ) -> Result<(), FulfillmentAddressRepositoryError> {
        let mut rows = self.lock_rows();
        let Some(stored) = rows.get_mut(address.id()).filter(|row| row.is_live()) else {
            return Err(FulfillmentAddressRepositoryError::not_found(
                address.id().as_str(),
            ));
        };
        *stored = FulfillmentAddress::from_parts(
            address.id().clone(),
            address.fields().clone(),
            crate::domain::AddressTimestamps {
                created_at: stored.created_at(),
                updated_at: address.updated_at(),
                deleted_at: None,
            },
        );
        Ok(())
    }

    async fn soft_delete(
        &self,
        ids: &[FulfillmentAddressId],
        at: DateTime<Utc>,
    ) -> Result<Vec<FulfillmentAddressId>, FulfillmentAddressRepositoryError> {
        let mut rows = self.lock_rows();
        let mut changed = Vec::new();
        for id in ids {
            if rows.get_mut(id).is_some_and(|row| row.soft_delete(at)) {
                changed.push(id.clone());
            }
        }
        changed.sort();
        Ok(changed)
    }

    async fn restore(
        &self,
        ids: &[FulfillmentAddressId],
        at: DateTime<Utc>,
    ) -> Result<Vec<FulfillmentAddressId>, FulfillmentAddressRepositoryError> {
        let mut rows = self.lock_rows();
        let mut changed = Vec::new();
        for id in ids {
            if rows.get_mut(id).is_some_and(|row| row.restore(at)) {
                changed.push(id.clone());
            }
        }
        changed.sort();
        Ok(changed)
    }
}
