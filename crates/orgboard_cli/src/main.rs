//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `orgboard_core` linkage with deterministic output.
//! - Print a read-only summary of one owner's boards.
//!
//! Usage:
//! - `orgboard_cli` prints ping/version.
//! - `orgboard_cli summary <owner_id> [--db-path <path>]` lists organizations,
//!   projects and per-column card counts.

use clap::{Parser, Subcommand};
use log::info;
use orgboard_core::config::DB_PATH_VAR;
use orgboard_core::{
    init_from_config, open_db, AccessGate, CoreConfig, Directory, GateState, SqliteStore,
};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "orgboard_cli")]
#[command(version, about = "OrgBoard core smoke and summary tool")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print organizations, projects and card counts for one owner
    Summary {
        owner_id: String,
        /// SQLite database file (defaults to the core's temp-dir path)
        #[arg(long, env = DB_PATH_VAR)]
        db_path: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    println!("orgboard_core ping={}", orgboard_core::ping());
    println!("orgboard_core version={}", orgboard_core::core_version());

    match cli.command {
        None => ExitCode::SUCCESS,
        Some(Commands::Summary { owner_id, db_path }) => match summary(&owner_id, db_path) {
            Ok(()) => ExitCode::SUCCESS,
            Err(message) => {
                eprintln!("error: {message}");
                ExitCode::FAILURE
            }
        },
    }
}

fn summary(owner_id: &str, db_path: Option<PathBuf>) -> Result<(), String> {
    let config = CoreConfig::from_env().map_err(|err| err.to_string())?;
    if let Err(err) = init_from_config(&config) {
        eprintln!("warning: logging disabled: {err}");
    }
    let db_path = db_path.unwrap_or(config.db_path);

    let conn = open_db(&db_path).map_err(|err| err.to_string())?;
    let store = SqliteStore::try_new(&conn).map_err(|err| err.to_string())?;
    let mut directory = Directory::new(store);
    let mut gate = AccessGate::new();

    let organizations = directory
        .load_organizations(owner_id)
        .map_err(|err| err.to_string())?;
    info!(
        "event=cli_summary module=cli status=start organizations={}",
        organizations.len()
    );
    println!("db={}", db_path.display());
    println!("organizations={}", organizations.len());

    for organization in &organizations {
        println!(
            "- {} protected={} id={}",
            organization.name, organization.is_password_protected, organization.id
        );
        let state = gate.select(organization).map_err(|err| err.to_string())?;
        if state != GateState::Unlocked {
            println!("  (locked)");
            gate.cancel().map_err(|err| err.to_string())?;
            continue;
        }
        let projects = directory
            .load_projects(&gate, organization.id)
            .map_err(|err| err.to_string())?;
        for project in &projects {
            let counts: Vec<String> = project
                .columns
                .iter()
                .map(|column| format!("{}={}", column.id, column.cards.len()))
                .collect();
            println!("  - {} {}", project.name, counts.join(" "));
        }
    }
    Ok(())
}
