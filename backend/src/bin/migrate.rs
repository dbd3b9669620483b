//! Apply pending fulfillment address migrations.
//!
//! Reads `FULFILLMENT_DB_*` settings, so `FULFILLMENT_DB_URL` must be set.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use color_eyre::eyre::{Result, eyre};
use fulfillment::config::DatabaseSettings;
use fulfillment::outbound::persistence::run_pending_migrations;
use fulfillment::telemetry::init_tracing;
use ortho_config::OrthoConfig;
use tracing::info;

fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();

    let settings = DatabaseSettings::load_from_iter(std::env::args_os())
        .map_err(|err| eyre!("failed to load database settings: {err}"))?;
    let url = settings.database_url()?;
    let applied = run_pending_migrations(url)?;
    info!(applied, "fulfillment schema is up to date");
    Ok(())
}
