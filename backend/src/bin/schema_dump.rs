//! Print the `fulfillment_address` DDL rendered from the schema descriptor.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]
//!
//! # Examples
//! ```sh
//! cargo run --manifest-path backend/Cargo.toml --bin fulfillment-schema-dump -- --output schema.sql
//! ```

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use cap_std::{ambient_authority, fs::Dir};
use clap::Parser;
use color_eyre::eyre::{Context, Result, eyre};
use fulfillment::outbound::persistence::FULFILLMENT_ADDRESS_TABLE;

/// `fulfillment-schema-dump` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "fulfillment-schema-dump",
    about = "Render the fulfillment address table DDL",
    version
)]
struct CliArgs {
    /// Write the DDL to this file instead of standard output.
    #[arg(long, value_name = "path")]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = CliArgs::parse();
    let ddl = FULFILLMENT_ADDRESS_TABLE.ddl();

    match args.output {
        Some(path) => write_ddl(&path, &ddl),
        None => io::stdout()
            .lock()
            .write_all(ddl.as_bytes())
            .wrap_err("failed to write DDL to stdout"),
    }
}

fn write_ddl(path: &Path, ddl: &str) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| eyre!("output path {} has no file name", path.display()))?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority())
        .wrap_err_with(|| format!("failed to open output directory {}", parent.display()))?;
    dir.write(file_name, ddl)
        .wrap_err_with(|| format!("failed to write {}", path.display()))
}
