//! CLI module - argument parsing and command dispatch

pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "clearops", version, about = "Customs clearance back-office")]
pub struct Cli {
    /// Path to the SQLite database
    #[arg(long, global = true, env = "CLEAROPS_DB", default_value = "clearops.db")]
    pub db: PathBuf,

    /// Path to the configuration file
    #[arg(long, global = true, env = "CLEAROPS_CONFIG", default_value = "clearops.yaml")]
    pub config: PathBuf,

    /// Actor name recorded on timeline events
    #[arg(long, global = true, default_value = "ops")]
    pub actor: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the database (and optionally seed demo data)
    Init(commands::InitArgs),
    /// Register a new shipment
    New(commands::NewArgs),
    /// List active shipments of a company
    List(commands::ListArgs),
    /// Show one shipment: status, milestones, next steps
    Show(commands::ShowArgs),
    /// Generate the alert feed for a company
    Alerts(commands::AlertsArgs),
    /// Attach a document and run the workflow triggers
    AddDoc(commands::AddDocArgs),
    /// Record an expense line on a shipment
    AddExpense(commands::AddExpenseArgs),
    /// Mark an expense paid and run the workflow triggers
    PayExpense(commands::PayExpenseArgs),
    /// Compute a duty liquidation for a CAF value
    Duty(commands::DutyArgs),
}
