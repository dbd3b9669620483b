//! Embedded PostgreSQL worker used by the integration tests.
//!
//! `pg_embedded_setup_unpriv` re-executes this binary as an unprivileged user
//! when the test process runs as root. It is invoked as
//! `pg_worker <setup|start|stop> <payload.json>`.

use std::env;
use std::path::PathBuf;

use cap_std::{ambient_authority, fs::Dir};
use clap::{Parser, ValueEnum};
use color_eyre::eyre::{Context, Report, Result, eyre};
use pg_embedded_setup_unpriv::worker::{PlainSecret, WorkerPayload};
use postgresql_embedded::PostgreSQL;
use tokio::runtime::Builder;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Operation {
    Setup,
    Start,
    Stop,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Setup => "setup",
            Self::Start => "start",
            Self::Stop => "stop",
        })
    }
}

#[derive(Debug, Parser)]
#[command(name = "pg_worker", about = "Run one embedded PostgreSQL lifecycle step")]
struct WorkerArgs {
    #[arg(value_enum)]
    operation: Operation,
    /// JSON payload describing settings and environment.
    config: PathBuf,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = WorkerArgs::try_parse()?;
    let payload = load_payload(&args.config)?;
    execute(args.operation, payload)
}

fn load_payload(path: &PathBuf) -> Result<WorkerPayload> {
    let parent = path
        .parent()
        .ok_or_else(|| eyre!("worker config path {path:?} has no parent"))?;
    let file_name = path
        .file_name()
        .ok_or_else(|| eyre!("worker config path {path:?} has no file name"))?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority())
        .with_context(|| format!("failed to open worker config directory {parent:?}"))?;
    let payload = dir
        .read(file_name)
        .with_context(|| format!("failed to read worker config at {path:?}"))?;
    serde_json::from_slice(&payload)
        .with_context(|| format!("failed to parse worker config at {path:?}"))
}

fn execute(operation: Operation, payload: WorkerPayload) -> Result<()> {
    let settings = payload
        .settings
        .into_settings()
        .map_err(|err| Report::new(err).wrap_err("failed to rebuild postgres settings"))?;
    apply_environment(payload.environment);

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("failed to build pg worker runtime")?;

    let mut postgres = PostgreSQL::new(settings);
    runtime
        .block_on(async move {
            match operation {
                Operation::Setup => postgres.setup().await,
                Operation::Start => postgres.start().await,
                Operation::Stop => postgres.stop().await,
            }
        })
        .with_context(|| format!("postgresql_embedded {operation} failed"))
}

#[expect(
    unsafe_code,
    reason = "environment is applied before the runtime spawns any threads"
)]
fn apply_environment(environment: Vec<(String, Option<PlainSecret>)>) {
    for (key, value) in environment {
        // SAFETY: single-threaded at this point.
        match value {
            Some(val) => unsafe { env::set_var(&key, val.expose()) },
            None => unsafe { env::remove_var(&key) },
        }
    }
}
