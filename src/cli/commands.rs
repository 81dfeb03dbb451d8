//! Command implementations for the operator CLI

use chrono::{Duration, Utc};
use clap::Args;
use console::style;
use miette::{IntoDiagnostic, Result};
use tabled::{Table, Tabled};

use crate::alerts::AlertEngine;
use crate::cli::Cli;
use crate::core::config::Config;
use crate::core::identity::{ExpenseId, ShipmentId, UserId};
use crate::core::status::ShipmentStatus;
use crate::duty;
use crate::entities::document::{Document, DocumentType};
use crate::entities::expense::{Expense, ExpenseCategory, ExpenseType};
use crate::entities::shipment::Shipment;
use crate::store::{ShipmentStore, SqliteStore};
use crate::workflow::{next_steps, AdvanceOutcome, WorkflowEngine};

fn open(cli: &Cli) -> Result<(SqliteStore, Config)> {
    let store = SqliteStore::open(&cli.db).into_diagnostic()?;
    let config = Config::load(&cli.config).into_diagnostic()?;
    Ok((store, config))
}

fn actor(store: &SqliteStore, name: &str) -> Result<UserId> {
    let id = UserId::new();
    store.put_user(id, name).into_diagnostic()?;
    Ok(id)
}

fn parse_shipment_id(raw: &str) -> Result<ShipmentId> {
    raw.parse()
        .map_err(|_| miette::miette!("Invalid shipment id: {}", raw))
}

fn report_outcome(outcome: AdvanceOutcome) {
    match outcome {
        AdvanceOutcome::Advanced { from, to } => {
            println!(
                "{} Status advanced: {} {} {}",
                style("✓").green(),
                from,
                style("→").dim(),
                style(to).bold()
            );
        }
        AdvanceOutcome::NotAdvanced(reason) => {
            println!("{} Status unchanged ({:?})", style("·").dim(), reason);
        }
    }
}

// =========================================================================
// init
// =========================================================================

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Seed a demo company with a few shipments
    #[arg(long)]
    pub seed: bool,
}

pub fn init(cli: &Cli, args: &InitArgs) -> Result<()> {
    let (store, _) = open(cli)?;
    if args.seed {
        seed_demo(&store)?;
        println!("{} Database ready with demo data", style("✓").green());
    } else {
        println!("{} Database ready", style("✓").green());
    }
    Ok(())
}

fn seed_demo(store: &SqliteStore) -> Result<()> {
    let uploader = actor(store, "demo")?;

    let mut arriving = Shipment::new("demo", "MAEU2204581");
    arriving.vessel_name = Some("MAERSK CABINDA".to_string());
    arriving.status = ShipmentStatus::Pending;
    arriving.eta = Some(Utc::now() + Duration::hours(36));
    store.put_shipment(&arriving).into_diagnostic()?;
    store
        .add_document(&Document::new(
            arriving.id,
            DocumentType::Bl,
            "bl-2204581.pdf",
            uploader,
        ))
        .into_diagnostic()?;

    let mut on_quay = Shipment::new("demo", "MSCU7811903");
    on_quay.vessel_name = Some("MSC ANIELLO".to_string());
    on_quay.status = ShipmentStatus::BaeIssued;
    on_quay.eta = Some(Utc::now() - Duration::days(6));
    on_quay.ata = Some(Utc::now() - Duration::days(6));
    store.put_shipment(&on_quay).into_diagnostic()?;
    let mut acconage = Expense::new(
        on_quay.id,
        ExpenseType::Disbursement,
        ExpenseCategory::Acconage,
        "Acconage",
        4_800_000,
    );
    acconage.paid = false;
    store.add_expense(&acconage).into_diagnostic()?;

    Ok(())
}

// =========================================================================
// new
// =========================================================================

#[derive(Args, Debug)]
pub struct NewArgs {
    /// Owning company id
    #[arg(long)]
    pub company: String,

    /// Carrier tracking number
    #[arg(long)]
    pub tracking: String,

    /// Vessel name
    #[arg(long)]
    pub vessel: Option<String>,
}

pub fn new(cli: &Cli, args: &NewArgs) -> Result<()> {
    let (store, _) = open(cli)?;
    let mut shipment = Shipment::new(&args.company, &args.tracking);
    shipment.vessel_name = args.vessel.clone();
    store.put_shipment(&shipment).into_diagnostic()?;
    println!(
        "{} Created shipment {} ({})",
        style("✓").green(),
        style(shipment.id).bold(),
        shipment.tracking_number
    );
    Ok(())
}

// =========================================================================
// list
// =========================================================================

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Company to list
    #[arg(long)]
    pub company: String,
}

#[derive(Tabled)]
struct ShipmentRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Tracking")]
    tracking: String,
    #[tabled(rename = "Status")]
    status: &'static str,
    #[tabled(rename = "Docs")]
    documents: usize,
    #[tabled(rename = "Unpaid (GNF)")]
    unpaid: i64,
}

pub fn list(cli: &Cli, args: &ListArgs) -> Result<()> {
    let (store, config) = open(cli)?;
    let details = store
        .list_active(&args.company, config.working_set_limit)
        .into_diagnostic()?;
    if details.is_empty() {
        println!("No active shipments for {}", args.company);
        return Ok(());
    }

    let rows: Vec<ShipmentRow> = details
        .iter()
        .map(|d| ShipmentRow {
            id: d.shipment.id.to_string(),
            tracking: d.shipment.tracking_number.clone(),
            status: d.shipment.status.label(),
            documents: d.documents.len(),
            unpaid: d.unpaid_disbursements(),
        })
        .collect();
    println!("{}", Table::new(rows));
    Ok(())
}

// =========================================================================
// show
// =========================================================================

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Shipment id
    pub id: String,

    /// Output JSON instead of text
    #[arg(long)]
    pub json: bool,
}

pub fn show(cli: &Cli, args: &ShowArgs) -> Result<()> {
    let (store, _) = open(cli)?;
    let id = parse_shipment_id(&args.id)?;
    let detail = store.get_detail(id).into_diagnostic()?;
    let steps = next_steps(detail.shipment.status, &detail.documents, &detail.expenses);

    if args.json {
        let payload = serde_json::json!({
            "shipment": detail,
            "next_steps": steps,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).into_diagnostic()?
        );
        return Ok(());
    }

    let shipment = &detail.shipment;
    println!(
        "{} {} — {}",
        style(&shipment.tracking_number).bold(),
        shipment.vessel_name.as_deref().unwrap_or(""),
        style(shipment.status.label()).cyan()
    );

    let current = shipment.status.rank();
    for status in ShipmentStatus::ORDER {
        let mark = if status.rank() <= current {
            style("●").green()
        } else {
            style("○").dim()
        };
        println!("  {} {}", mark, status.label());
    }

    if !steps.is_empty() {
        println!("\nNext steps:");
        for step in &steps {
            println!(
                "  [{:?}] {}",
                step.priority,
                step.label
            );
        }
    }

    let events = store.timeline(id).into_diagnostic()?;
    if !events.is_empty() {
        println!("\nTimeline:");
        for event in events {
            println!(
                "  {}  {}  {} ({})",
                event.timestamp.format("%Y-%m-%d %H:%M"),
                event.action,
                event.description,
                event.actor_name
            );
        }
    }
    Ok(())
}

// =========================================================================
// alerts
// =========================================================================

#[derive(Args, Debug)]
pub struct AlertsArgs {
    /// Company to scan
    #[arg(long)]
    pub company: String,

    /// Output JSON instead of text
    #[arg(long)]
    pub json: bool,
}

pub fn alerts(cli: &Cli, args: &AlertsArgs) -> Result<()> {
    let (store, config) = open(cli)?;
    let engine = AlertEngine::new(&store, config);
    let feed = engine.generate(&args.company);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&feed).into_diagnostic()?);
        return Ok(());
    }

    if feed.is_empty() {
        println!("{} No alerts", style("✓").green());
        return Ok(());
    }
    for alert in feed {
        let tag = match alert.severity {
            crate::alerts::Severity::Danger => style("DANGER ").red().bold(),
            crate::alerts::Severity::Warning => style("WARNING").yellow(),
            crate::alerts::Severity::Info => style("INFO   ").dim(),
        };
        println!("{} {:<14} {}", tag, alert.tracking_number, alert.message);
    }
    Ok(())
}

// =========================================================================
// add-doc / add-expense / pay-expense
// =========================================================================

#[derive(Args, Debug)]
pub struct AddDocArgs {
    /// Shipment id
    pub id: String,

    /// Document type, e.g. BL, DDI, QUITTANCE
    #[arg(value_name = "TYPE")]
    pub doc_type: String,

    /// Stored file name
    #[arg(long, default_value = "document.pdf")]
    pub file: String,
}

pub fn add_doc(cli: &Cli, args: &AddDocArgs) -> Result<()> {
    let (store, _) = open(cli)?;
    let id = parse_shipment_id(&args.id)?;
    // DocumentType parsing is total: unknown labels become Other.
    let doc_type: DocumentType = args.doc_type.parse().unwrap_or(DocumentType::Other);
    let actor_id = actor(&store, &cli.actor)?;

    let document = Document::new(id, doc_type, &args.file, actor_id);
    store.add_document(&document).into_diagnostic()?;
    println!("{} Added {} document", style("✓").green(), doc_type);

    // The upload has committed; the trigger runs best-effort after it.
    let engine = WorkflowEngine::new(&store);
    report_outcome(engine.advance_on_document(id, doc_type, actor_id));
    Ok(())
}

#[derive(Args, Debug)]
pub struct AddExpenseArgs {
    /// Shipment id
    pub id: String,

    /// Expense category, e.g. DD, ACCONAGE
    pub category: String,

    /// Amount in GNF
    pub amount: i64,

    /// Record as a provision instead of a disbursement
    #[arg(long)]
    pub provision: bool,

    /// Line label
    #[arg(long)]
    pub label: Option<String>,
}

pub fn add_expense(cli: &Cli, args: &AddExpenseArgs) -> Result<()> {
    let (store, _) = open(cli)?;
    let id = parse_shipment_id(&args.id)?;
    let category: ExpenseCategory = args
        .category
        .parse()
        .map_err(|e: String| miette::miette!("{}", e))?;
    let expense_type = if args.provision {
        ExpenseType::Provision
    } else {
        ExpenseType::Disbursement
    };

    let expense = Expense::new(
        id,
        expense_type,
        category,
        args.label.clone().unwrap_or_else(|| category.to_string()),
        args.amount,
    );
    store.add_expense(&expense).into_diagnostic()?;
    println!(
        "{} Added {} {} of {} GNF ({})",
        style("✓").green(),
        expense_type,
        category,
        args.amount,
        style(expense.id).dim()
    );
    Ok(())
}

#[derive(Args, Debug)]
pub struct PayExpenseArgs {
    /// Expense id
    pub id: String,

    /// Shipment the expense belongs to
    #[arg(long)]
    pub shipment: String,
}

pub fn pay_expense(cli: &Cli, args: &PayExpenseArgs) -> Result<()> {
    let (store, _) = open(cli)?;
    let expense_id: ExpenseId = args
        .id
        .parse()
        .map_err(|_| miette::miette!("Invalid expense id: {}", args.id))?;
    let shipment_id = parse_shipment_id(&args.shipment)?;

    let detail = store.get_detail(shipment_id).into_diagnostic()?;
    let expense = detail
        .expenses
        .iter()
        .find(|e| e.id == expense_id)
        .ok_or_else(|| miette::miette!("Expense {} not on shipment {}", args.id, args.shipment))?;
    let category = expense.category;

    store.set_expense_paid(expense_id).into_diagnostic()?;
    println!("{} Expense {} marked paid", style("✓").green(), category);

    let actor_id = actor(&store, &cli.actor)?;
    let engine = WorkflowEngine::new(&store);
    report_outcome(engine.advance_on_expense_paid(shipment_id, category, actor_id));
    Ok(())
}

// =========================================================================
// duty
// =========================================================================

#[derive(Args, Debug)]
pub struct DutyArgs {
    /// CAF value in GNF
    pub caf: i64,

    /// Droit de douane rate in basis points (overrides config)
    #[arg(long)]
    pub dd_bp: Option<u32>,
}

pub fn duty(cli: &Cli, args: &DutyArgs) -> Result<()> {
    let config = Config::load(&cli.config).into_diagnostic()?;
    let mut rates = config.duty;
    if let Some(dd_bp) = args.dd_bp {
        rates.dd_bp = dd_bp;
    }

    let breakdown = duty::compute(args.caf, &rates);
    println!("Liquidation for CAF {} GNF", args.caf);
    for line in &breakdown.lines {
        println!("  {:<20} {:>15} GNF", line.category.to_string(), line.amount);
    }
    println!(
        "  {:<20} {:>15} GNF",
        style("TOTAL").bold(),
        style(breakdown.total).bold()
    );
    Ok(())
}
