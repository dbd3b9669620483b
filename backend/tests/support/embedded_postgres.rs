//! Database provisioning helpers for embedded PostgreSQL suites.
//!
//! Databases are dropped and recreated through the `postgres` client so
//! `DROP DATABASE` runs outside any Diesel transaction. Schema setup reuses
//! the crate's embedded migrations so test schemas cannot drift.

use fulfillment::outbound::persistence::run_pending_migrations;
use pg_embedded_setup_unpriv::TestCluster;
use postgres::{Client, NoTls};

use super::format_postgres_error;

/// Drop `name` if it exists and create it empty.
pub fn reset_database(cluster: &TestCluster, name: &str) -> Result<(), String> {
    let admin_url = cluster.connection().database_url("postgres");
    let mut client = Client::connect(&admin_url, NoTls).map_err(|err| format_postgres_error(&err))?;
    // One statement per call: CREATE DATABASE cannot share an implicit
    // transaction block with another statement.
    client
        .batch_execute(&format!("DROP DATABASE IF EXISTS \"{name}\" WITH (FORCE)"))
        .map_err(|err| format_postgres_error(&err))?;
    client
        .batch_execute(&format!("CREATE DATABASE \"{name}\""))
        .map_err(|err| format_postgres_error(&err))
}

/// Run every embedded migration against `url`.
pub fn migrate_schema(url: &str) -> Result<usize, String> {
    run_pending_migrations(url).map_err(|err| err.to_string())
}
