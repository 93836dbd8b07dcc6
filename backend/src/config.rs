//! Runtime configuration, read from the command line with environment
//! variable fallbacks.

use clap::Parser;
use std::net::SocketAddr;

pub const DEFAULT_DATABASE_URL: &str = "sqlite:ledger.db";

#[derive(Debug, Clone, Parser)]
#[command(name = "ledger-server", version, about = "Shared-expense ledger for households")]
pub struct Config {
    /// SQLite database URL, created on first start
    #[arg(long, env = "LEDGER_DATABASE_URL", default_value = DEFAULT_DATABASE_URL)]
    pub database_url: String,

    /// Address to listen on
    #[arg(long, env = "LEDGER_BIND", default_value = "127.0.0.1:3000")]
    pub bind: SocketAddr,

    /// Origin allowed by CORS
    #[arg(long, env = "LEDGER_CORS_ORIGIN", default_value = "http://localhost:8080")]
    pub cors_origin: String,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, env = "LEDGER_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}
