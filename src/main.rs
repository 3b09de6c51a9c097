use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::control;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod error;
mod models;
mod output;
mod services;

use config::AuditConfig;
use models::AuditMode;

#[derive(Parser)]
#[command(name = "pageaudit")]
#[command(version = "0.1.0")]
#[command(about = "Audit a web page for security, performance, SEO and accessibility")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format: table (default) or json
    #[arg(short, long, default_value = "table", global = true)]
    output: String,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Request timeout in seconds, per fetch attempt
    #[arg(long, default_value = "30", global = true)]
    timeout: u64,

    /// Log pipeline progress to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Audit a single page
    Audit {
        /// URL to audit (https:// prefix optional)
        url: String,

        /// Device profile to report
        #[arg(short, long, value_enum, default_value_t = AuditMode::Desktop)]
        mode: AuditMode,

        /// Attempts per browser identity before rotating
        #[arg(long, default_value = "3")]
        attempts: usize,
    },
}

/// Set SSL_CERT_FILE so vendored OpenSSL can find the system CA trust store.
fn init_ssl_certs() {
    if std::env::var_os("SSL_CERT_FILE").is_some() {
        return;
    }

    // Try openssl-probe first (works well on Linux)
    let probe = openssl_probe::probe();
    if let Some(cert_file) = probe.cert_file {
        std::env::set_var("SSL_CERT_FILE", cert_file);
        return;
    }

    // Fallback for macOS and other systems where probe misses the cert bundle
    for path in ["/etc/ssl/cert.pem", "/usr/local/etc/openssl@3/cert.pem"] {
        if std::path::Path::new(path).exists() {
            std::env::set_var("SSL_CERT_FILE", path);
            return;
        }
    }
}

/// RUST_LOG wins; otherwise --verbose picks debug.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "pageaudit=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_ssl_certs();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Handle color output
    if cli.no_color {
        control::set_override(false);
    }

    let json_output = cli.output == "json";

    match cli.command {
        Commands::Audit {
            url,
            mode,
            attempts,
        } => {
            let mut config = AuditConfig::default();
            config.fetch.request_timeout = Duration::from_secs(cli.timeout);
            config.fetch.attempts_per_identity = attempts;

            commands::run_audit(&url, mode, json_output, config).await?;
        }
    }

    Ok(())
}
