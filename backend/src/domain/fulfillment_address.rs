//! Fulfillment address record.
//!
//! Purpose: model the shipping address attached to a fulfillment. The record
//! is passive: it owns its identifier and timestamps and never deletes
//! itself. Soft deletion is requested by the owning workflow through
//! [`FulfillmentAddress::soft_delete`].
//!
//! Identifier assignment happens through one idempotent rule,
//! [`FulfillmentAddressId::ensure`], used on every construction path: fresh
//! records, rows rehydrated from storage and serde payloads.
//!
//! Every instant the record holds is truncated to microseconds, the
//! resolution of a PostgreSQL `timestamptz`, so a record reads back from
//! storage unchanged.

mod id;
mod patch;

use chrono::{DateTime, DurationRound, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use self::id::{FulfillmentAddressId, FulfillmentAddressIdError};
pub use self::patch::{AddressPatch, FieldUpdate};

/// Opaque extension bag stored in the `metadata` JSONB column.
pub type AddressMetadata = serde_json::Map<String, Value>;

/// The mutable, nullable columns of an address.
///
/// No field is validated here; format checks (country codes, postal codes)
/// belong to whichever input layer accepts the data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddressFields {
    /// Fulfillment this address belongs to.
    pub fulfillment_id: Option<String>,
    pub company: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub address_1: Option<String>,
    pub address_2: Option<String>,
    pub city: Option<String>,
    /// Country code as supplied by the caller.
    pub country_code: Option<String>,
    pub province: Option<String>,
    pub postal_code: Option<String>,
    pub phone: Option<String>,
    pub metadata: Option<AddressMetadata>,
}

/// Truncate `instant` to the microsecond resolution of the timestamp columns.
pub fn stored_instant(instant: DateTime<Utc>) -> DateTime<Utc> {
    instant
        .duration_trunc(TimeDelta::microseconds(1))
        .unwrap_or(instant)
}

/// Audit timestamps as stored alongside an address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressTimestamps {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl AddressTimestamps {
    /// Timestamps for a record created at `now`.
    pub fn created(now: DateTime<Utc>) -> Self {
        Self {
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }
}

/// A shipping/fulfillment address.
///
/// ## Invariants
/// - `id` is always a valid [`FulfillmentAddressId`] and never changes.
/// - `updated_at >= created_at`.
/// - The record is live iff `deleted_at` is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "FulfillmentAddressDto", into = "FulfillmentAddressDto")]
pub struct FulfillmentAddress {
    id: FulfillmentAddressId,
    fields: AddressFields,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl FulfillmentAddress {
    /// Create a new live address stamped with `now`.
    pub fn new(fields: AddressFields, now: DateTime<Utc>) -> Self {
        let now = stored_instant(now);
        Self {
            id: FulfillmentAddressId::generate(),
            fields,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    /// Rebuild an address from stored parts.
    ///
    /// A missing or empty `raw_id` is replaced by a freshly generated id; a
    /// present one must be a valid address id. `updated_at` is raised to
    /// `created_at` if the stored value is earlier.
    pub fn rehydrate(
        raw_id: Option<&str>,
        fields: AddressFields,
        timestamps: AddressTimestamps,
    ) -> Result<Self, FulfillmentAddressIdError> {
        let id = FulfillmentAddressId::ensure(raw_id)?;
        Ok(Self::from_parts(id, fields, timestamps))
    }

    /// Assemble an address from an already validated id.
    pub fn from_parts(
        id: FulfillmentAddressId,
        fields: AddressFields,
        timestamps: AddressTimestamps,
    ) -> Self {
        let AddressTimestamps {
            created_at,
            updated_at,
            deleted_at,
        } = timestamps;
        let created_at = stored_instant(created_at);
        Self {
            id,
            fields,
            created_at,
            updated_at: stored_instant(updated_at).max(created_at),
            deleted_at: deleted_at.map(stored_instant),
        }
    }

    pub fn id(&self) -> &FulfillmentAddressId {
        &self.id
    }

    pub fn fields(&self) -> &AddressFields {
        &self.fields
    }

    /// Fulfillment reference, if any.
    pub fn fulfillment_id(&self) -> Option<&str> {
        self.fields.fulfillment_id.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    /// Snapshot of the audit timestamps.
    pub fn timestamps(&self) -> AddressTimestamps {
        AddressTimestamps {
            created_at: self.created_at,
            updated_at: self.updated_at,
            deleted_at: self.deleted_at,
        }
    }

    /// Whether the record has not been soft-deleted.
    pub fn is_live(&self) -> bool {
        self.deleted_at.is_none()
    }

    /// Apply `patch` and refresh `updated_at`.
    ///
    /// `updated_at` is refreshed even for an empty patch; it never moves
    /// behind `created_at`.
    pub fn apply(&mut self, patch: AddressPatch, now: DateTime<Utc>) {
        patch.apply_to(&mut self.fields);
        self.touch(now);
    }

    /// Mark the record deleted at `now` and refresh `updated_at`.
    ///
    /// Returns `false` and leaves both timestamps alone when the record was
    /// already deleted.
    pub fn soft_delete(&mut self, now: DateTime<Utc>) -> bool {
        if self.deleted_at.is_some() {
            return false;
        }
        self.deleted_at = Some(stored_instant(now));
        self.touch(now);
        true
    }

    /// Clear the deletion marker and refresh `updated_at`.
    ///
    /// Returns `false` if the record was live.
    pub fn restore(&mut self, now: DateTime<Utc>) -> bool {
        if self.deleted_at.take().is_none() {
            return false;
        }
        self.touch(now);
        true
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = stored_instant(now).max(self.created_at);
    }
}

/// Wire shape of [`FulfillmentAddress`]; `id` may be absent on input.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct FulfillmentAddressDto {
    #[serde(default)]
    id: Option<String>,
    #[serde(flatten)]
    fields: AddressFields,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(default)]
    deleted_at: Option<DateTime<Utc>>,
}

impl From<FulfillmentAddress> for FulfillmentAddressDto {
    fn from(value: FulfillmentAddress) -> Self {
        Self {
            id: Some(value.id.into()),
            fields: value.fields,
            created_at: value.created_at,
            updated_at: value.updated_at,
            deleted_at: value.deleted_at,
        }
    }
}

impl TryFrom<FulfillmentAddressDto> for FulfillmentAddress {
    type Error = FulfillmentAddressIdError;

    fn try_from(value: FulfillmentAddressDto) -> Result<Self, Self::Error> {
        let FulfillmentAddressDto {
            id,
            fields,
            created_at,
            updated_at,
            deleted_at,
        } = value;
        Self::rehydrate(
            id.as_deref(),
            fields,
            AddressTimestamps {
                created_at,
                updated_at,
                deleted_at,
            },
        )
    }
}

#[cfg(test)]
mod tests;
