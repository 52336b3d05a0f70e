//! rolegraph CLI - Seed an in-memory role graph and query it
//!
//! Usage:
//!   rolegraph --seed seed.yaml roles                        - List roles with their permissions
//!   rolegraph --seed seed.yaml permissions                  - List permissions with their roles
//!   rolegraph --seed seed.yaml user roles <id>              - Roles held by a user
//!   rolegraph --seed seed.yaml user permissions <id>        - Permissions reached by a user
//!   rolegraph --seed seed.yaml check -u <id> -p <name>      - Exit 0 when granted, 1 when denied

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use rolegraph_adapter::InMemoryStore;
use rolegraph_cli::commands::{CheckCommand, PermissionsCommand, RolesCommand, UserCommand};
use rolegraph_cli::SeedConfig;
use rolegraph_rbac::AccessControl;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rolegraph")]
#[command(about = "rolegraph - Role based access control over a user / role / permission graph")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Seed file (.yaml, .yml or .json) loaded before the command runs
    #[arg(short, long, global = true)]
    seed: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List roles
    Roles(RolesCommand),
    /// List permissions
    Permissions(PermissionsCommand),
    /// Inspect a user
    User(UserCommand),
    /// Check a user's access
    Check(CheckCommand),
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let seed = match &cli.seed {
        Some(path) => SeedConfig::from_file(path)
            .with_context(|| format!("Failed to load seed file {}", path.display()))?,
        None => SeedConfig::default(),
    };

    // --log-level wins over the seed's logLevel
    let level = cli
        .log_level
        .clone()
        .or_else(|| seed.log_level.clone())
        .unwrap_or_else(|| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .init();

    let acl = AccessControl::new(InMemoryStore::new());
    let report = seed.apply(&acl).context("Failed to apply seed")?;
    tracing::debug!(
        roles = report.roles,
        permissions = report.permissions,
        "graph ready"
    );

    match cli.command {
        Commands::Roles(cmd) => cmd.run(&acl, cli.json)?,
        Commands::Permissions(cmd) => cmd.run(&acl, cli.json)?,
        Commands::User(cmd) => cmd.run(&acl, cli.json)?,
        Commands::Check(cmd) => {
            if !cmd.run(&acl, cli.json)? {
                return Ok(ExitCode::FAILURE);
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}
