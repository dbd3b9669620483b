//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! This module provides the concrete implementation of the fulfillment address
//! repository port backed by PostgreSQL via Diesel with async support through
//! `diesel-async` and `bb8` connection pooling.
//!
//! # Architecture
//!
//! - **Thin adapters**: the repository only translates between Diesel rows
//!   and domain types. Lifecycle rules live in the domain service.
//! - **Internal models**: row structs (`models.rs`) and the `table!` schema
//!   (`schema.rs`) never leave this module.
//! - **Explicit schema**: [`table_descriptor`] records defaults and partial
//!   indexes, and renders the DDL the migration ships.
//!
//! # Example
//!
//! ```ignore
//! use fulfillment::outbound::persistence::{
//!     DbPool, DieselFulfillmentAddressRepository, PoolConfig,
//! };
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/fulfillment")).await?;
//! let repo = DieselFulfillmentAddressRepository::new(pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_fulfillment_address_repository;
mod migrations;
mod models;
mod pool;
mod schema;
pub mod table_descriptor;

pub use diesel_fulfillment_address_repository::DieselFulfillmentAddressRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
pub use table_descriptor::FULFILLMENT_ADDRESS_TABLE;
