//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::fulfillment_address;

/// Row struct for reading from the fulfillment_address table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = fulfillment_address)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct FulfillmentAddressRow {
    pub id: String,
    pub fulfillment_id: Option<String>,
    pub company: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub address_1: Option<String>,
    pub address_2: Option<String>,
    pub city: Option<String>,
    pub country_code: Option<String>,
    pub province: Option<String>,
    pub postal_code: Option<String>,
    pub phone: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Insertable struct carrying every column of a new address.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = fulfillment_address)]
pub(crate) struct NewFulfillmentAddressRow<'a> {
    pub id: &'a str,
    pub fulfillment_id: Option<&'a str>,
    pub company: Option<&'a str>,
    pub first_name: Option<&'a str>,
    pub last_name: Option<&'a str>,
    pub address_1: Option<&'a str>,
    pub address_2: Option<&'a str>,
    pub city: Option<&'a str>,
    pub country_code: Option<&'a str>,
    pub province: Option<&'a str>,
    pub postal_code: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub metadata: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Changeset for the mutable columns of a live address.
///
/// `treat_none_as_null` makes a cleared field write SQL `NULL` rather than
/// leave the column untouched.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = fulfillment_address)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct FulfillmentAddressUpdate<'a> {
    pub fulfillment_id: Option<&'a str>,
    pub company: Option<&'a str>,
    pub first_name: Option<&'a str>,
    pub last_name: Option<&'a str>,
    pub address_1: Option<&'a str>,
    pub address_2: Option<&'a str>,
    pub city: Option<&'a str>,
    pub country_code: Option<&'a str>,
    pub province: Option<&'a str>,
    pub postal_code: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub metadata: Option<serde_json::Value>,
    pub updated_at: DateTime<Utc>,
}
