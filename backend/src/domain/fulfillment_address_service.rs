//! Fulfillment address domain service.
//!
//! This module owns the address lifecycle rules that sit above the record
//! itself: stamping timestamps from the injected clock, refusing to update
//! soft-deleted rows, and translating repository failures into domain errors.

use std::sync::Arc;

use mockable::Clock;
use serde_json::json;
use tracing::info;

use crate::domain::ports::{
    DeletedVisibility, FulfillmentAddressRepository, FulfillmentAddressRepositoryError,
};
use crate::domain::{
    AddressFields, AddressPatch, Error, FulfillmentAddress, FulfillmentAddressId, stored_instant,
};

/// Address service used by the owning fulfillment workflow.
#[derive(Clone)]
pub struct FulfillmentAddressService<R> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> FulfillmentAddressService<R> {
    /// Create a new service over the given repository and clock.
    ///
    /// ```rust,no_run
    /// # use std::sync::Arc;
    /// # use fulfillment::domain::ports::FixtureFulfillmentAddressRepository;
    /// # use mockable::DefaultClock;
    /// let service = fulfillment::domain::FulfillmentAddressService::new(
    ///     Arc::new(FixtureFulfillmentAddressRepository),
    ///     Arc::new(DefaultClock),
    /// );
    /// # let _ = service;
    /// ```
    pub fn new(repository: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }
}

impl<R> FulfillmentAddressService<R>
where
    R: FulfillmentAddressRepository,
{
    fn map_repository_error(error: FulfillmentAddressRepositoryError) -> Error {
        match error {
            FulfillmentAddressRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("address repository unavailable: {message}"))
            }
            FulfillmentAddressRepositoryError::Query { message } => {
                Error::internal(format!("address repository error: {message}"))
            }
            FulfillmentAddressRepositoryError::NotFound { id } => Self::not_found(&id),
            FulfillmentAddressRepositoryError::Duplicate { id } => {
                Error::conflict(format!("address {id} already exists"))
                    .with_details(json!({ "id": id, "code": "duplicate_address" }))
            }
        }
    }

    fn not_found(id: &str) -> Error {
        Error::not_found(format!("address {id} not found")).with_details(json!({ "id": id }))
    }

    /// Create and persist a new address.
    pub async fn create(&self, fields: AddressFields) -> Result<FulfillmentAddress, Error> {
        let address = FulfillmentAddress::new(fields, self.clock.utc());
        self.repository
            .insert(&address)
            .await
            .map_err(Self::map_repository_error)?;
        info!(
            address_id = %address.id(),
            fulfillment_id = address.fulfillment_id(),
            "created fulfillment address"
        );
        Ok(address)
    }

    /// Fetch a live address.
    pub async fn retrieve(&self, id: &FulfillmentAddressId) -> Result<FulfillmentAddress, Error> {
        self.repository
            .find_by_id(id, DeletedVisibility::LiveOnly)
            .await
            .map_err(Self::map_repository_error)?
            .ok_or_else(|| Self::not_found(id.as_str()))
    }

    /// List the live addresses of a fulfillment.
    pub async fn list_for_fulfillment(
        &self,
        fulfillment_id: &str,
    ) -> Result<Vec<FulfillmentAddress>, Error> {
        if fulfillment_id.trim().is_empty() {
            return Err(Error::invalid_request("fulfillment id must not be empty"));
        }
        self.repository
            .list_by_fulfillment_id(fulfillment_id)
            .await
            .map_err(Self::map_repository_error)
    }

    /// Apply `patch` to a live address and persist it.
    pub async fn update(
        &self,
        id: &FulfillmentAddressId,
        patch: AddressPatch,
    ) -> Result<FulfillmentAddress, Error> {
        let mut address = self.retrieve(id).await?;
        address.apply(patch, self.clock.utc());
        self.repository
            .update(&address)
            .await
            .map_err(Self::map_repository_error)?;
        Ok(address)
    }

    /// Soft-delete the live addresses among `ids`.
    ///
    /// Returns the ids that were live before the call.
    pub async fn soft_delete(
        &self,
        ids: &[FulfillmentAddressId],
    ) -> Result<Vec<FulfillmentAddressId>, Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let deleted = self
            .repository
            .soft_delete(ids, stored_instant(self.clock.utc()))
            .await
            .map_err(Self::map_repository_error)?;
        info!(
            requested = ids.len(),
            deleted = deleted.len(),
            "soft-deleted fulfillment addresses"
        );
        Ok(deleted)
    }

    /// Restore soft-deleted addresses among `ids`.
    pub async fn restore(
        &self,
        ids: &[FulfillmentAddressId],
    ) -> Result<Vec<FulfillmentAddressId>, Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let restored = self
            .repository
            .restore(ids, stored_instant(self.clock.utc()))
            .await
            .map_err(Self::map_repository_error)?;
        info!(
            requested = ids.len(),
            restored = restored.len(),
            "restored fulfillment addresses"
        );
        Ok(restored)
    }
}

#[cfg(test)]
#[path = "fulfillment_address_service_tests.rs"]
mod tests;
