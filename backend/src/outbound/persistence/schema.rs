//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the migrations exactly. The table descriptor
//! in [`super::table_descriptor`] is checked against the same column list in
//! tests, so a change here without a matching migration fails fast.

diesel::table! {
    /// Postal addresses attached to fulfillments.
    ///
    /// Rows are never removed by the application; `deleted_at` marks a row as
    /// soft-deleted.
    fulfillment_address (id) {
        /// Primary key: `fuladdr_` followed by a ULID.
        id -> Text,
        /// Owning fulfillment, when attached.
        fulfillment_id -> Nullable<Text>,
        company -> Nullable<Text>,
        first_name -> Nullable<Text>,
        last_name -> Nullable<Text>,
        address_1 -> Nullable<Text>,
        address_2 -> Nullable<Text>,
        city -> Nullable<Text>,
        country_code -> Nullable<Text>,
        province -> Nullable<Text>,
        postal_code -> Nullable<Text>,
        phone -> Nullable<Text>,
        /// Free-form key/value bag.
        metadata -> Nullable<Jsonb>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
        /// Soft-delete marker; null for live rows.
        deleted_at -> Nullable<Timestamptz>,
    }
}
