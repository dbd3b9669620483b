//! Domain primitives and aggregates.
//!
//! Purpose: Define the fulfillment address record, its identifier rules and
//! the service that drives its lifecycle. Persistence concerns stay behind the
//! ports in [`ports`].
//!
//! Public surface:
//! - Error (alias to `error::Error`) — domain error payload.
//! - ErrorCode (alias to `error::ErrorCode`) — stable error identifier.
//! - FulfillmentAddress — the address record with soft-delete marker.
//! - FulfillmentAddressService — create, update and soft-delete workflow.

pub mod entity_id;
pub mod error;
pub mod fulfillment_address;
pub mod fulfillment_address_service;
pub mod ports;

pub use self::entity_id::{ENTITY_ID_SEPARATOR, generate_entity_id};
pub use self::error::{Error, ErrorCode};
pub use self::fulfillment_address::{
    AddressFields, AddressMetadata, AddressPatch, AddressTimestamps, FieldUpdate,
    FulfillmentAddress, FulfillmentAddressId, FulfillmentAddressIdError, stored_instant,
};
pub use self::fulfillment_address_service::FulfillmentAddressService;

/// Convenient domain result alias.
///
/// # Examples
/// ```
/// use fulfillment::domain::{DomainResult, Error};
///
/// fn lookup() -> DomainResult<()> {
///     Err(Error::not_found("address fuladdr_01 not found"))
/// }
/// # assert!(lookup().is_err());
/// ```
pub type DomainResult<T> = Result<T, Error>;
