use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use foia_core::dates::{format_date, parse_date};
use foia_core::snapshot::{find_request, load_requests};
use foia_core::{
    AgencyType, AppealStatus, Derived, NewRequest, Priority, Request, RequestUpdate,
    ResponseWindows, Selection, Status,
};
use schemars::schema_for;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use time::format_description::well_known::Rfc3339;
use time::{Date, OffsetDateTime};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "foia")]
#[command(about = "FOIA request tracker CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the response deadline for a filing
    Deadline {
        /// Filing date (YYYY-MM-DD)
        #[arg(long)]
        filed_date: String,
        /// Federal, State or Local
        #[arg(long)]
        agency_type: AgencyType,
        #[arg(long)]
        state_code: Option<String>,
        /// Response window table (.toml or .yaml)
        #[arg(long)]
        windows: Option<PathBuf>,
    },
    /// Build a new Filed request record and print it as JSON
    Create {
        #[arg(long)]
        request_id: String,
        #[arg(long)]
        agency_name: String,
        #[arg(long)]
        agency_type: AgencyType,
        #[arg(long)]
        state_code: Option<String>,
        #[arg(long)]
        subject: String,
        #[arg(long, default_value = "Medium")]
        priority: Priority,
        /// Filing date (default: today)
        #[arg(long)]
        filed_date: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        #[arg(long)]
        windows: Option<PathBuf>,
    },
    /// Dashboard metrics for a request snapshot
    Metrics {
        /// Snapshot exported from the record store (.json or .yaml)
        #[arg(long)]
        requests: PathBuf,
        /// Reference date (default: today)
        #[arg(long)]
        today: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// List requests matching a search term and filters
    List {
        #[arg(long)]
        requests: PathBuf,
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value = "all")]
        status: Selection<Status>,
        #[arg(long, default_value = "all")]
        priority: Selection<Priority>,
        #[arg(long)]
        today: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Change the status of one request and print the updated record as JSON
    Transition {
        #[arg(long)]
        requests: PathBuf,
        #[arg(long)]
        request_id: String,
        #[arg(long)]
        status: Status,
        #[arg(long)]
        denial_reason: Option<String>,
        #[arg(long)]
        appeal_status: Option<AppealStatus>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Export canonical JSON Schemas to the ./schemas directory
    Schema {
        #[command(subcommand)]
        command: SchemaCommands,
    },
}

#[derive(Subcommand)]
enum SchemaCommands {
    /// Export JSON Schema files for canonical types
    Export {
        /// Output directory (default: ./schemas)
        #[arg(long, default_value = "schemas")]
        out_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "foia_core=info,foia=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let now = OffsetDateTime::now_utc();

    match cli.command {
        Commands::Deadline {
            filed_date,
            agency_type,
            state_code,
            windows,
        } => deadline(&filed_date, agency_type, state_code.as_deref(), windows.as_deref()),
        Commands::Create {
            request_id,
            agency_name,
            agency_type,
            state_code,
            subject,
            priority,
            filed_date,
            notes,
            windows,
        } => {
            let filed_date = match filed_date {
                Some(raw) => raw,
                None => format_date(now.date())?,
            };
            let new = NewRequest {
                request_id,
                agency_name,
                agency_type,
                state_code,
                filed_date,
                subject,
                priority,
                investigation: None,
                contact_name: None,
                contact_email: None,
                notes,
            };
            create(new, windows.as_deref(), now)
        }
        Commands::Metrics {
            requests,
            today,
            json,
        } => metrics(&requests, resolve_today(today.as_deref(), now)?, json),
        Commands::List {
            requests,
            search,
            status,
            priority,
            today,
            json,
        } => list(
            &requests,
            &search,
            status,
            priority,
            resolve_today(today.as_deref(), now)?,
            json,
        ),
        Commands::Transition {
            requests,
            request_id,
            status,
            denial_reason,
            appeal_status,
            notes,
        } => {
            let update = RequestUpdate {
                status: Some(status),
                denial_reason,
                appeal_status,
                notes,
                updated_at: Some(now.format(&Rfc3339)?),
                ..RequestUpdate::default()
            };
            transition(&requests, &request_id, &update)
        }
        Commands::Schema { command } => match command {
            SchemaCommands::Export { out_dir } => schema_export(out_dir),
        },
    }
}

fn resolve_today(today: Option<&str>, now: OffsetDateTime) -> Result<Date> {
    match today {
        Some(raw) => Ok(parse_date("today", raw)?),
        None => Ok(now.date()),
    }
}

fn load_windows(path: Option<&Path>) -> Result<ResponseWindows> {
    match path {
        Some(path) => ResponseWindows::load(path),
        None => Ok(ResponseWindows::default()),
    }
}

fn deadline(
    filed_date: &str,
    agency_type: AgencyType,
    state_code: Option<&str>,
    windows: Option<&Path>,
) -> Result<()> {
    let windows = load_windows(windows)?;
    let filed = parse_date("filed_date", filed_date)?;
    let days = windows.window_for(agency_type, state_code);
    let deadline = windows.deadline(filed, agency_type, state_code)?;
    println!("{} ({days} business days)", format_date(deadline)?);
    Ok(())
}

fn create(new: NewRequest, windows: Option<&Path>, now: OffsetDateTime) -> Result<()> {
    let windows = load_windows(windows)?;
    let created_at = now.format(&Rfc3339)?;
    let created = foia_core::create_request(new, &windows, Some(&created_at))?;
    println!("{}", serde_json::to_string_pretty(&created.value)?);
    Ok(())
}

fn metrics(requests: &Path, today: Date, json: bool) -> Result<()> {
    let requests = load_requests(requests)?;
    let metrics = foia_core::compute_metrics(&requests, today)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&metrics)?);
        return Ok(());
    }

    println!("Metrics as of {}", format_date(today)?);
    println!("  Total requests:      {}", metrics.total);
    println!("  Overdue:             {}", metrics.overdue);
    println!("  Critical:            {}", metrics.critical);
    println!("  Appeals needed:      {}", metrics.appeals_needed);
    println!("  Avg days pending:    {}", metrics.avg_days_pending);
    println!("  Longest pending:     {}", metrics.longest_pending);
    println!("  Avg days in status:  {}", metrics.avg_days_in_status);
    println!();
    println!("Status breakdown");
    for entry in &metrics.status_breakdown {
        println!(
            "  {:<14} {:>4}  {:>3}%",
            entry.status.as_str(),
            entry.count,
            entry.percentage
        );
    }
    Ok(())
}

#[derive(Serialize)]
struct ListedRequest<'a> {
    #[serde(flatten)]
    request: &'a Request,
    derived: Derived,
}

fn list(
    requests: &Path,
    search: &str,
    status: Selection<Status>,
    priority: Selection<Priority>,
    today: Date,
    json: bool,
) -> Result<()> {
    let requests = load_requests(requests)?;
    let matched = foia_core::filter(&requests, search, status, priority);

    let mut listed = Vec::with_capacity(matched.len());
    for request in matched {
        let derived = foia_core::derive(request, today)?;
        listed.push(ListedRequest { request, derived });
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&listed)?);
        return Ok(());
    }
    if listed.is_empty() {
        println!("No requests found");
        return Ok(());
    }
    for item in &listed {
        let request = item.request;
        let overdue = if item.derived.overdue { " OVERDUE" } else { "" };
        println!(
            "{}  [{}] {}  {} days  due {}{overdue}",
            request.request_id,
            request.priority,
            request.status,
            item.derived.days_pending,
            item.derived.response_deadline.as_deref().unwrap_or("N/A"),
        );
        println!("    {} | {}", request.agency_name, request.subject);
        if let Some(tracking) = &request.tracking_number {
            println!("    Tracking # {tracking}");
        }
        if let Some(next_action_date) = &request.next_action_date {
            let action = request.next_action.as_deref().unwrap_or("Next action");
            println!("    {action} by {next_action_date}");
        }
    }
    Ok(())
}

fn transition(requests: &Path, request_id: &str, update: &RequestUpdate) -> Result<()> {
    let requests = load_requests(requests)?;
    let request = find_request(&requests, request_id)
        .ok_or_else(|| anyhow!("Request {request_id} not found in snapshot"))?;
    let updated = foia_core::apply_update(request, update)?;
    println!("{}", serde_json::to_string_pretty(&updated.value)?);
    Ok(())
}

fn schema_export(out_dir: PathBuf) -> Result<()> {
    fs::create_dir_all(&out_dir)?;

    let request_schema = schema_for!(foia_core::Request);
    fs::write(
        out_dir.join("Request.schema.json"),
        serde_json::to_string_pretty(&request_schema)?,
    )?;

    let new_request_schema = schema_for!(foia_core::NewRequest);
    fs::write(
        out_dir.join("NewRequest.schema.json"),
        serde_json::to_string_pretty(&new_request_schema)?,
    )?;

    let update_schema = schema_for!(foia_core::RequestUpdate);
    fs::write(
        out_dir.join("RequestUpdate.schema.json"),
        serde_json::to_string_pretty(&update_schema)?,
    )?;

    let metrics_schema = schema_for!(foia_core::Metrics);
    fs::write(
        out_dir.join("Metrics.schema.json"),
        serde_json::to_string_pretty(&metrics_schema)?,
    )?;

    tracing::info!(out_dir = %out_dir.display(), "exported schemas");
    println!("Exported schemas to {}", out_dir.display());
    Ok(())
}
