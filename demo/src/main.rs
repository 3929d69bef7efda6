//! caseshare walkthrough CLI
//!
//! Runs one or all of the reference sharing scenarios, or validates an
//! engine configuration file.
//!
//! Usage:
//!   cargo run -p demo -- run-all
//!   cargo run -p demo -- private-mention
//!   cargo run -p demo -- public-toggle
//!   cargo run -p demo -- revocation
//!   cargo run -p demo -- audit-trail
//!   cargo run -p demo -- check-config caseshare.toml

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use caseshare_config::EngineConfig;
use caseshare_contracts::error::CaseResult;
use caseshare_ref::scenarios::{audit_trail, private_mention, public_toggle, revocation};

// ── CLI definition ────────────────────────────────────────────────────────────

/// caseshare: case-level visibility for patient-to-doctor sharing.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "caseshare access-control engine walkthroughs",
    long_about = "Runs caseshare reference scenarios showing private mentions, public sharing,\n\
                  revocation, all-or-nothing exports, and the hash-chained access ledger."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run all four scenarios in sequence.
    RunAll,
    /// Scenario 1: mention one doctor on a private case.
    PrivateMention,
    /// Scenario 2: share with all doctors, then withdraw.
    PublicToggle,
    /// Scenario 3: revoke one of three mentions and export.
    Revocation,
    /// Scenario 4: export and verify the audit ledger.
    AuditTrail,
    /// Load and validate an engine configuration file.
    CheckConfig {
        /// Path to the TOML file.
        path: PathBuf,
    },
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Set RUST_LOG=info (or debug) to follow grants and decisions.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::CheckConfig { path } => check_config(&path),
        scenario => {
            print_banner();
            run(scenario)
        }
    };

    match result {
        Ok(()) => println!("Done."),
        Err(e) => {
            eprintln!("Demo error: {}", e);
            std::process::exit(1);
        }
    }
}

// ── Dispatch ──────────────────────────────────────────────────────────────────

fn run(command: Command) -> CaseResult<()> {
    match command {
        Command::RunAll => {
            private_mention::run_scenario()?;
            public_toggle::run_scenario()?;
            revocation::run_scenario()?;
            audit_trail::run_scenario()
        }
        Command::PrivateMention => private_mention::run_scenario(),
        Command::PublicToggle => public_toggle::run_scenario(),
        Command::Revocation => revocation::run_scenario(),
        Command::AuditTrail => audit_trail::run_scenario(),
        Command::CheckConfig { path } => check_config(&path),
    }
}

fn check_config(path: &std::path::Path) -> CaseResult<()> {
    let config = EngineConfig::from_file(path)?;
    info!(path = %path.display(), "configuration loaded");

    println!("Configuration {} is valid:", path.display());
    println!("  denial disclosure:       {:?}", config.access.denial_disclosure);
    println!("  verify index per case:   {}", config.access.verify_index_on_decision);
    println!("  mention batch limit:     {}", config.mentions.max_batch);
    println!("  audit ledger id:         {}", config.audit.ledger_id);
    println!("  record view decisions:   {}", config.audit.record_views);
    Ok(())
}

// ── Banner ────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("caseshare: Case-level Visibility Engine");
    println!("=======================================");
    println!();
    println!("A doctor may view, comment on, or export a case when:");
    println!("  [1] the patient shared it with all doctors, or");
    println!("  [2] the patient mentioned that doctor on that case (and has not revoked it).");
    println!("Every grant, revocation, and export decision is written to a SHA-256 chained ledger.");
    println!();
}
