//! Tollgate CLI - inspect remembered tool policies and the audit trail.
//!
//! The runtime is embedded by host applications; this binary is the
//! operator's view onto the state it leaves behind: the durable policy
//! file, the hash-chained audit log and the layered configuration.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tollgate_config::Config;

mod commands;
mod theme;

use commands::{audit, config, policy};

/// Tollgate - permission gate for tool calls
#[derive(Parser)]
#[command(name = "tollgate")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Workspace root used for layered config (defaults to current directory)
    #[arg(long, global = true, env = "TOLLGATE_WORKSPACE")]
    workspace: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect and edit remembered tool policies
    Policy {
        /// Policy file to use instead of `policy.path` from config
        #[arg(long, global = true)]
        policy_file: Option<PathBuf>,

        #[command(subcommand)]
        command: PolicyCommands,
    },

    /// View and verify the audit log
    Audit {
        /// Audit log to use instead of `audit.path` from config
        #[arg(long, global = true)]
        audit_file: Option<PathBuf>,

        #[command(subcommand)]
        command: AuditCommands,
    },

    /// View configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum PolicyCommands {
    /// List remembered choices
    List,
    /// Remember a choice for a tool
    Set {
        /// Tool name
        tool: String,
        /// One of allow, deny or ask
        policy: String,
    },
    /// Forget the choice for a tool
    Forget {
        /// Tool name
        tool: String,
    },
    /// Forget every remembered choice
    Reset,
}

#[derive(Subcommand)]
enum AuditCommands {
    /// Show audit records
    Show {
        /// Only records for this tool
        #[arg(short, long)]
        tool: Option<String>,
        /// Only records with this decision (allowed, denied or asked)
        #[arg(short, long)]
        decision: Option<String>,
        /// Only records completed at or after this time
        #[arg(long)]
        since: Option<String>,
        /// Only records completed at or before this time
        #[arg(long)]
        until: Option<String>,
        /// Print records as JSON
        #[arg(long)]
        json: bool,
    },
    /// Verify audit chain integrity
    Verify,
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show resolved configuration with source annotations
    Show {
        /// Output format (toml or json)
        #[arg(short, long, default_value = "toml")]
        format: String,
        /// Show only a specific section (e.g. policy, audit, logging)
        #[arg(short, long)]
        section: Option<String>,
    },
    /// Validate the current configuration
    Validate,
    /// Show config file paths being checked
    Paths,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let workspace = cli.workspace.clone().or_else(|| std::env::current_dir().ok());
    let loaded = Config::load(workspace.as_deref()).map(|r| r.config);

    // Set up logging from config, with --verbose override.
    let log_config = if let Ok(cfg) = &loaded {
        let mut lc = tollgate_runtime::config_bridge::to_log_config(cfg);
        if cli.verbose {
            "debug".clone_into(&mut lc.level);
        }
        lc
    } else {
        // Fallback if config loading fails.
        let level = if cli.verbose { "debug" } else { "warn" };
        tollgate_telemetry::LogConfig::new(level)
            .with_format(tollgate_telemetry::LogFormat::Compact)
    };
    if let Err(e) = tollgate_telemetry::setup_logging(&log_config) {
        eprintln!("Failed to initialize logging: {e}");
    }

    match cli.command {
        Commands::Policy {
            policy_file,
            command,
        } => {
            let path = resolve_path(policy_file, &loaded, "policy.path", |c| {
                c.policy.resolved_path()
            })?;
            handle_policy(command, &path).await?;
        },
        Commands::Audit {
            audit_file,
            command,
        } => {
            let path = resolve_path(audit_file, &loaded, "audit.path", |c| {
                c.audit.resolved_path()
            })?;
            handle_audit(command, &path)?;
        },
        Commands::Config { command } => {
            handle_config(command, workspace.as_deref())?;
        },
    }

    Ok(())
}

/// Pick the explicit path if given, otherwise the configured one.
fn resolve_path(
    explicit: Option<PathBuf>,
    loaded: &tollgate_config::ConfigResult<Config>,
    field: &str,
    from_config: impl FnOnce(&Config) -> Option<PathBuf>,
) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path);
    }
    let cfg = loaded
        .as_ref()
        .map_err(|e| anyhow::anyhow!("failed to load configuration: {e}"))?;
    from_config(cfg).ok_or_else(|| {
        anyhow::anyhow!("no file given and `{field}` is not set in configuration")
    })
}

async fn handle_policy(command: PolicyCommands, path: &Path) -> Result<()> {
    match command {
        PolicyCommands::List => policy::list_policies(path).await,
        PolicyCommands::Set { tool, policy } => policy::set_policy(path, &tool, &policy).await,
        PolicyCommands::Forget { tool } => policy::forget_policy(path, &tool).await,
        PolicyCommands::Reset => policy::reset_policies(path).await,
    }
}

fn handle_audit(command: AuditCommands, path: &Path) -> Result<()> {
    match command {
        AuditCommands::Show {
            tool,
            decision,
            since,
            until,
            json,
        } => {
            let args = audit::ShowArgs {
                tool,
                decision,
                since,
                until,
                json,
            };
            audit::show_audit_records(path, &args)
        },
        AuditCommands::Verify => audit::verify_audit_chain(path),
    }
}

fn handle_config(command: ConfigCommands, workspace: Option<&Path>) -> Result<()> {
    match command {
        ConfigCommands::Show { format, section } => {
            config::show_config(workspace, &format, section.as_deref())
        },
        ConfigCommands::Validate => config::validate_config(workspace),
        ConfigCommands::Paths => config::show_paths(workspace),
    }
}
