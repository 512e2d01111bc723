//! `booking` CLI — inspect table availability from a booking data dump.
//!
//! ## Usage
//!
//! ```sh
//! # Tier strip for one day (data document on stdin)
//! curl -s .../snapshot.json | booking availability --date 2019-01-02
//!
//! # Tier strip plus occupied/free tables at 18:30, as JSON
//! booking availability -i data.json --date 2019-01-02 --hour 18:30 --json
//!
//! # The three read URLs for a window
//! booking queries --window-start 2019-01-01 --window-end 2019-01-15
//!
//! # Validate a selection and print the booking payload
//! booking payload -i data.json --date 2019-01-02 --hour 12:00 --table 2 --people 4
//! ```
//!
//! The data document has the shape
//! `{"booking": [...], "eventsCurrent": [...], "eventsRepeat": [...]}`.

use anyhow::{Context, Result};
use booking_engine::source::{submit_url, ReadQueries};
use booking_engine::{
    availability_tiers, free_tables, histogram, hour_to_slot, occupied_tables, parse_date, slot::slots_between,
    BookingWidget, ContactDetails, DataSnapshot, NullRenderer, OccupancyIndex, SlotSpan, TableId, WidgetConfig,
    Window,
};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io::{self, Read};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "booking", version, about = "Restaurant table availability CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML configuration file (opening hours, tables, capacity, data source)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Log rebuild details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the availability tier strip for a date
    Availability {
        /// Data document (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Date to inspect (YYYY-MM-DD)
        #[arg(long)]
        date: String,
        /// First date of the fetched window (defaults to --date)
        #[arg(long)]
        window_start: Option<String>,
        /// Last date of the fetched window (defaults to the configured days ahead)
        #[arg(long)]
        window_end: Option<String>,
        /// Also list occupied and free tables at this hour (H:MM)
        #[arg(long)]
        hour: Option<String>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Print the data-source URLs for a window
    Queries {
        #[arg(long)]
        window_start: String,
        /// Defaults to the configured days ahead
        #[arg(long)]
        window_end: Option<String>,
    },
    /// Validate a table selection and print its submission payload
    Payload {
        /// Data document (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        #[arg(long)]
        date: String,
        #[arg(long)]
        hour: String,
        #[arg(long)]
        table: u32,
        #[arg(long)]
        people: Option<u32>,
        /// Duration in hours (multiples of 0.5)
        #[arg(long)]
        duration: Option<f64>,
        #[arg(long, default_value = "")]
        address: String,
        #[arg(long, default_value = "")]
        phone: String,
        /// Starter to include (repeatable)
        #[arg(long = "starter")]
        starters: Vec<String>,
    },
}

#[derive(Serialize)]
struct AvailabilityReport {
    date: NaiveDate,
    open: String,
    close: String,
    counts: Vec<usize>,
    tiers: Vec<booking_engine::Tier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    hour: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    occupied: Option<Vec<TableId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    free: Option<Vec<TableId>>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match cli.config.as_deref() {
        Some(path) => WidgetConfig::from_path(path).with_context(|| format!("Failed to load config: {}", path))?,
        None => WidgetConfig::default(),
    };

    match cli.command {
        Commands::Availability {
            input,
            date,
            window_start,
            window_end,
            hour,
            json,
        } => {
            let date = parse_date(&date).context("Invalid --date")?;
            let start = match window_start.as_deref() {
                Some(start) => parse_date(start).context("Invalid --window-start")?,
                None => date,
            };
            let window = resolve_window(&config, start, window_end.as_deref())?;
            let snapshot = read_snapshot(input.as_deref())?;
            let index = OccupancyIndex::from_snapshot(&snapshot.on_floor_plan(&config.tables), &window);

            let report = availability_report(&config, &index, date, hour.as_deref())?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&config, &report);
            }
        }
        Commands::Queries {
            window_start,
            window_end,
        } => {
            let start = parse_date(&window_start).context("Invalid --window-start")?;
            let window = resolve_window(&config, start, window_end.as_deref())?;
            let urls = ReadQueries::for_window(&window, &config.source).urls(&config.source);
            println!("booking         {}", urls.booking);
            println!("events-current  {}", urls.events_current);
            println!("events-repeat   {}", urls.events_repeat);
            println!("submit          {}", submit_url(&config.source));
        }
        Commands::Payload {
            input,
            date,
            hour,
            table,
            people,
            duration,
            address,
            phone,
            starters,
        } => {
            let date = parse_date(&date).context("Invalid --date")?;
            let hour = hour_to_slot(&hour).context("Invalid --hour")?;
            let window = Window::starting(date, config.days_ahead);
            let snapshot = read_snapshot(input.as_deref())?;

            let mut widget = BookingWidget::new(config, window, NullRenderer)?;
            let ticket = widget.begin_refresh(window);
            widget.complete_refresh(ticket, &snapshot);
            widget.set_date(date)?;
            widget.set_hour(hour)?;
            if let Some(people) = people {
                widget.set_people(people);
            }
            if let Some(hours) = duration {
                widget.set_duration(SlotSpan::from_hours(hours).context("Invalid --duration")?);
            }

            if !widget.click_table(TableId(table)) {
                anyhow::bail!(
                    "Table {} is not available on {} at {}",
                    table,
                    date,
                    hour
                );
            }

            let details = ContactDetails {
                address,
                phone,
                starters,
            };
            let payload = widget.prepare_submission(&details)?;
            tracing::info!(url = %submit_url(&widget.config().source), "payload ready to post");
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(io::stderr)
        .init();
}

/// An explicit `--window-end`, or `start` plus the configured days ahead.
fn resolve_window(config: &WidgetConfig, start: NaiveDate, end: Option<&str>) -> Result<Window> {
    match end {
        Some(end) => {
            let end = parse_date(end).context("Invalid --window-end")?;
            Ok(Window::new(start, end)?)
        }
        None => Ok(Window::starting(start, config.days_ahead)),
    }
}

fn availability_report(
    config: &WidgetConfig,
    index: &OccupancyIndex,
    date: NaiveDate,
    hour: Option<&str>,
) -> Result<AvailabilityReport> {
    let slot = hour.map(hour_to_slot).transpose().context("Invalid --hour")?;

    Ok(AvailabilityReport {
        date,
        open: config.open.to_string(),
        close: config.close.to_string(),
        counts: histogram(index, date, config.open, config.close),
        tiers: availability_tiers(index, date, config.open, config.close, config.capacity),
        hour: slot.map(|s| s.to_string()),
        occupied: slot.map(|s| occupied_tables(index, date, s).into_iter().collect()),
        free: slot.map(|s| free_tables(index, date, s, &config.tables)),
    })
}

fn print_report(config: &WidgetConfig, report: &AvailabilityReport) {
    println!("{}  {}-{}", report.date, report.open, report.close);
    for ((slot, count), tier) in slots_between(config.open, config.close)
        .zip(&report.counts)
        .zip(&report.tiers)
    {
        println!("{:>5}  {:<6}  {}", slot.to_string(), tier.as_str(), count);
    }
    if let (Some(hour), Some(occupied), Some(free)) = (&report.hour, &report.occupied, &report.free) {
        println!("at {}", hour);
        println!("occupied: {}", join_tables(occupied));
        println!("free:     {}", join_tables(free));
    }
}

fn join_tables(tables: &[TableId]) -> String {
    if tables.is_empty() {
        return "-".to_string();
    }
    tables.iter().map(|t| t.to_string()).collect::<Vec<_>>().join(", ")
}

fn read_snapshot(path: Option<&str>) -> Result<DataSnapshot> {
    let json = read_input(path)?;
    let snapshot = DataSnapshot::from_json(&json).context("Failed to parse booking data")?;
    tracing::debug!(
        bookings = snapshot.bookings.len(),
        events_current = snapshot.events_current.len(),
        events_repeat = snapshot.events_repeat.len(),
        "booking data loaded"
    );
    Ok(snapshot)
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}
