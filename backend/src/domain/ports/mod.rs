//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod fulfillment_address_repository;

#[cfg(test)]
pub use fulfillment_address_repository::MockFulfillmentAddressRepository;
pub use fulfillment_address_repository::{
    DeletedVisibility, FixtureFulfillmentAddressRepository, FulfillmentAddressRepository,
    FulfillmentAddressRepositoryError,
};
