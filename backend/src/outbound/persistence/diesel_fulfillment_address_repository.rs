//! PostgreSQL-backed `FulfillmentAddressRepository` implementation using Diesel ORM.
//!
//! Live lookups filter on `deleted_at IS NULL`, matching the partial index on
//! `fulfillment_id`. Soft deletion and restore are single `UPDATE ...
//! RETURNING id` statements so the changed ids come back without a second
//! round trip. Both also move `updated_at`, never behind `created_at`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{
    DeletedVisibility, FulfillmentAddressRepository, FulfillmentAddressRepositoryError,
};
use crate::domain::{
    AddressFields, AddressTimestamps, FulfillmentAddress, FulfillmentAddressId, stored_instant,
};

use super::diesel_basic_error_mapping::{
    is_unique_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{FulfillmentAddressRow, FulfillmentAddressUpdate, NewFulfillmentAddressRow};
use super::pool::{DbPool, PoolError};
use super::schema::fulfillment_address;

diesel::define_sql_function! {
    /// PostgreSQL `GREATEST` over two timestamps.
    fn greatest(
        left: diesel::sql_types::Timestamptz,
        right: diesel::sql_types::Timestamptz,
    ) -> diesel::sql_types::Timestamptz;
}

/// Diesel-backed implementation of the `FulfillmentAddressRepository` port.
#[derive(Clone)]
pub struct DieselFulfillmentAddressRepository {
    pool: DbPool,
}

impl DieselFulfillmentAddressRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> FulfillmentAddressRepositoryError {
    map_basic_pool_error(error, FulfillmentAddressRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> FulfillmentAddressRepositoryError {
    map_basic_diesel_error(
        error,
        FulfillmentAddressRepositoryError::query,
        FulfillmentAddressRepositoryError::connection,
    )
}

/// Convert a database row into the domain record.
///
/// A stored id without the address prefix is reported as a query error
/// rather than silently replaced.
fn row_to_address(
    row: FulfillmentAddressRow,
) -> Result<FulfillmentAddress, FulfillmentAddressRepositoryError> {
    let metadata = match row.metadata {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::Object(map)) => Some(map),
        Some(other) => {
            warn!(
                address_id = %row.id,
                kind = json_kind(&other),
                "ignoring non-object address metadata"
            );
            None
        }
    };

    let fields = AddressFields {
        fulfillment_id: row.fulfillment_id,
        company: row.company,
        first_name: row.first_name,
        last_name: row.last_name,
        address_1: row.address_1,
        address_2: row.address_2,
        city: row.city,
        country_code: row.country_code,
        province: row.province,
        postal_code: row.postal_code,
        phone: row.phone,
        metadata,
    };
    let timestamps = AddressTimestamps {
        created_at: row.created_at,
        updated_at: row.updated_at,
        deleted_at: row.deleted_at,
    };

    FulfillmentAddress::rehydrate(Some(row.id.as_str()), fields, timestamps).map_err(|err| {
        FulfillmentAddressRepositoryError::query(format!("stored address id {}: {err}", row.id))
    })
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

fn metadata_value(fields: &AddressFields) -> Option<serde_json::Value> {
    fields.metadata.clone().map(serde_json::Value::Object)
}

fn new_row(address: &FulfillmentAddress) -> NewFulfillmentAddressRow<'_> {
    let fields = address.fields();
    NewFulfillmentAddressRow {
        id: address.id().as_str(),
        fulfillment_id: fields.fulfillment_id.as_deref(),
        company: fields.company.as_deref(),
        first_name: fields.first_name.as_deref(),
        last_name: fields.last_name.as_deref(),
        address_1: fields.address_1.as_deref(),
        address_2: fields.address_2.as_deref(),
        city: fields.city.as_deref(),
        country_code: fields.country_code.as_deref(),
        province: fields.province.as_deref(),
        postal_code: fields.postal_code.as_deref(),
        phone: fields.phone.as_deref(),
        metadata: metadata_value(fields),
        created_at: address.created_at(),
        updated_at: address.updated_at(),
        deleted_at: address.deleted_at(),
    }
}

fn update_changeset(address: &FulfillmentAddress) -> FulfillmentAddressUpdate<'_> {
    let fields = address.fields();
    FulfillmentAddressUpdate {
        fulfillment_id: fields.fulfillment_id.as_deref(),
        company: fields.company.as_deref(),
        first_name: fields.first_name.as_deref(),
        last_name: fields.last_name.as_deref(),
        address_1: fields.address_1.as_deref(),
        address_2: fields.address_2.as_deref(),
        city: fields.city.as_deref(),
        country_code: fields.country_code.as_deref(),
        province: fields.province.as_deref(),
        postal_code: fields.postal_code.as_deref(),
        phone: fields.phone.as_deref(),
        metadata: metadata_value(fields),
        updated_at: address.updated_at(),
    }
}

fn rows_to_addresses(
    rows: Vec<FulfillmentAddressRow>,
) -> Result<Vec<FulfillmentAddress>, FulfillmentAddressRepositoryError> {
    rows.into_iter().map(row_to_address).collect()
}

fn ids_to_strings(ids: &[FulfillmentAddressId]) -> Vec<&str> {
    ids.iter().map(FulfillmentAddressId::as_str).collect()
}

fn strings_to_ids(
    raw: Vec<String>,
) -> Result<Vec<FulfillmentAddressId>, FulfillmentAddressRepositoryError> {
    raw.into_iter()
        .map(|id| {
            FulfillmentAddressId::new(&id).map_err(|err| {
                FulfillmentAddressRepositoryError::query(format!("stored address id {id}: {err}"))
            })
        })
        .collect()
}

#[async_trait]
impl FulfillmentAddressRepository for DieselFulfillmentAddressRepository {
    async fn insert(
        &self,
        address: &FulfillmentAddress,
    ) -> Result<(), FulfillmentAddressRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::insert_into(fulfillment_address::table)
            .values(&new_row(address))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| {
                if is_unique_violation(&err) {
                    FulfillmentAddressRepositoryError::duplicate(address.id().as_str())
                } else {
                    map_diesel_error(err)
                }
            })
    }

    async fn find_by_id(
        &self,
        id: &FulfillmentAddressId,
        visibility: DeletedVisibility,
    ) -> Result<Option<FulfillmentAddress>, FulfillmentAddressRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = fulfillment_address::table
            .filter(fulfillment_address::id.eq(id.as_str()))
            .select(FulfillmentAddressRow::as_select())
            .into_boxed();
        if visibility == DeletedVisibility::LiveOnly {
            query = query.filter(fulfillment_address::deleted_at.is_null());
        }

        let row: Option<FulfillmentAddressRow> = query
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_address).transpose()
    }

    async fn list_by_fulfillment_id(
        &self,
        fulfillment_id: &str,
    ) -> Result<Vec<FulfillmentAddress>, FulfillmentAddressRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<FulfillmentAddressRow> = fulfillment_address::table
            .filter(fulfillment_address::fulfillment_id.eq(fulfillment_id))
            .filter(fulfillment_address::deleted_at.is_null())
            .order((
                fulfillment_address::created_at.asc(),
                fulfillment_address::id.asc(),
            ))
            .select(FulfillmentAddressRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_addresses(rows)
    }

    async fn list_deleted_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<FulfillmentAddress>, FulfillmentAddressRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<FulfillmentAddressRow> = fulfillment_address::table
            .filter(fulfillment_address::deleted_at.le(cutoff))
            .order((
                fulfillment_address::deleted_at.asc(),
                fulfillment_address::id.asc(),
            ))
            .select(FulfillmentAddressRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_addresses(rows)
    }

    async fn update(
        &self,
        address: &FulfillmentAddress,
    ) -> Result<(), FulfillmentAddressRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let updated_rows = diesel::update(fulfillment_address::table)
            .filter(fulfillment_address::id.eq(address.id().as_str()))
            .filter(fulfillment_address::deleted_at.is_null())
            .set(&update_changeset(address))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        if updated_rows == 0 {
            return Err(FulfillmentAddressRepositoryError::not_found(
                address.id().as_str(),
            ));
        }
        Ok(())
    }

    async fn soft_delete(
        &self,
        ids: &[FulfillmentAddressId],
        at: DateTime<Utc>,
    ) -> Result<Vec<FulfillmentAddressId>, FulfillmentAddressRepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let at = stored_instant(at);
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut changed: Vec<String> = diesel::update(fulfillment_address::table)
            .filter(fulfillment_address::id.eq_any(ids_to_strings(ids)))
            .filter(fulfillment_address::deleted_at.is_null())
            .set((
                fulfillment_address::deleted_at.eq(Some(at)),
                fulfillment_address::updated_at.eq(greatest(at, fulfillment_address::created_at)),
            ))
            .returning(fulfillment_address::id)
            .get_results(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        changed.sort();

        strings_to_ids(changed)
    }

    async fn restore(
        &self,
        ids: &[FulfillmentAddressId],
        at: DateTime<Utc>,
    ) -> Result<Vec<FulfillmentAddressId>, FulfillmentAddressRepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let at = stored_instant(at);
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut changed: Vec<String> = diesel::update(fulfillment_address::table)
            .filter(fulfillment_address::id.eq_any(ids_to_strings(ids)))
            .filter(fulfillment_address::deleted_at.is_not_null())
            .set((
                fulfillment_address::deleted_at.eq(None::<DateTime<Utc>>),
                fulfillment_address::updated_at.eq(greatest(at, fulfillment_address::created_at)),
            ))
            .returning(fulfillment_address::id)
            .get_results(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        changed.sort();

        strings_to_ids(changed)
    }
}
