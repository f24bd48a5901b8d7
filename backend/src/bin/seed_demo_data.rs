//! Insert the bundled demo accounts and professional profiles.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::env;
use std::io;
use std::sync::Arc;

use clap::Parser;
use mentecare::demo_data::seed_demo_data;
use mentecare::outbound::persistence::{
    DbPool, DieselAccountRepository, PoolConfig, run_pending_migrations,
};
use mentecare::outbound::security::Argon2CredentialHasher;
use tokio::runtime::Builder;

/// `seed-demo-data` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "seed-demo-data",
    about = "Seed the MenteCare database with demo patients and professionals",
    version
)]
struct CliArgs {
    /// Database connection URL. Falls back to `MENTECARE_DATABASE_URL`, then
    /// `DATABASE_URL`.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
    /// Assume the schema is current and skip embedded migrations.
    #[arg(long = "skip-migrations")]
    skip_migrations: bool,
}

fn main() -> io::Result<()> {
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main())
}

async fn async_main() -> io::Result<()> {
    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let database_url = resolve_database_url(args.database_url)?;

    if !args.skip_migrations {
        run_pending_migrations(&database_url)
            .await
            .map_err(|error| io::Error::other(format!("apply migrations: {error}")))?;
    }

    let pool = DbPool::new(PoolConfig::new(&database_url))
        .await
        .map_err(|error| io::Error::other(format!("create database pool: {error}")))?;
    let accounts = Arc::new(DieselAccountRepository::new(pool));

    let outcome = seed_demo_data(accounts, Arc::new(Argon2CredentialHasher::default()))
        .await
        .map_err(|error| io::Error::other(format!("seed demo data: {error}")))?;
    println!("inserted={}", outcome.inserted);
    println!("skipped={}", outcome.skipped);
    Ok(())
}

fn resolve_database_url(flag: Option<String>) -> io::Result<String> {
    flag.or_else(|| env::var("MENTECARE_DATABASE_URL").ok())
        .or_else(|| env::var("DATABASE_URL").ok())
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| {
            io::Error::other("database url missing; pass --database-url or set DATABASE_URL")
        })
}
