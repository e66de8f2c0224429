//! securesight CLI: incident timeline dashboard and inspection commands

use chrono::{DateTime, SecondsFormat, Utc};
use clap::{Parser, Subcommand};
use securesight_engine::{
    layout, locate, locate_all, resolve, sample_incidents, Axis, Incident, IncidentStore,
    ResolvedFilter, TimelineConfig, Timestamp,
};
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

type CmdResult = Result<(), Box<dyn std::error::Error>>;

const DEFAULT_DATA: &str = ".securesight/incidents.json";
const DEFAULT_CONFIG: &str = ".securesight/config.json";
const LOG_ENV: &str = "SECURESIGHT_LOG";

/// Security incident timeline with a terminal dashboard
#[derive(Parser)]
#[command(name = "securesight")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Timeline config file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Incident data file
    #[arg(long, global = true, default_value = DEFAULT_DATA)]
    data: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the dashboard (default when no command specified)
    Tui,

    /// Write sample cameras and incidents to the data file
    Seed {
        /// Overwrite an existing data file
        #[arg(long)]
        force: bool,
    },

    /// List incidents, most recent first (unresolved only by default)
    List {
        /// Include resolved incidents
        #[arg(long, conflicts_with = "resolved")]
        all: bool,

        /// Only resolved incidents
        #[arg(long)]
        resolved: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Toggle the resolved flag of an incident
    Resolve {
        /// Incident ID
        id: String,
    },

    /// Print the timeline window for the current incidents
    Window {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print lanes and mark geometry for a track width
    Layout {
        /// Track width in pixels
        #[arg(long)]
        width: f64,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Find the incident active at a time
    Locate {
        /// RFC 3339 timestamp, e.g. 2024-05-01T10:30:00Z
        #[arg(value_parser = parse_time)]
        time: Timestamp,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let command = cli.command.unwrap_or(Commands::Tui);
    if !matches!(command, Commands::Tui) {
        // The dashboard owns the terminal, so only line-oriented commands log.
        init_logging();
    }

    let result = load_config(cli.config.as_deref()).and_then(|config| match command {
        Commands::Tui => cmd_tui(&cli.data, config),
        Commands::Seed { force } => cmd_seed(&cli.data, force),
        Commands::List {
            all,
            resolved,
            json,
        } => {
            let filter = if all {
                ResolvedFilter::All
            } else if resolved {
                ResolvedFilter::Resolved
            } else {
                ResolvedFilter::Unresolved
            };
            cmd_list(&cli.data, filter, json)
        }
        Commands::Resolve { id } => cmd_resolve(&cli.data, &id),
        Commands::Window { json } => cmd_window(&cli.data, &config, json),
        Commands::Layout { width, json } => cmd_layout(&cli.data, &config, width, json),
        Commands::Locate { time, json } => cmd_locate(&cli.data, time, json),
    });

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_config(path: Option<&Path>) -> Result<TimelineConfig, Box<dyn std::error::Error>> {
    let config = match path {
        Some(path) => TimelineConfig::load(path)?,
        None => TimelineConfig::load_or_default(Path::new(DEFAULT_CONFIG))?,
    };
    debug!(?config, "Loaded timeline config");
    Ok(config)
}

fn parse_time(value: &str) -> Result<Timestamp, String> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| format!("invalid RFC 3339 timestamp '{value}': {e}"))
}

fn format_time(t: Timestamp) -> String {
    t.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn cmd_tui(data: &Path, config: TimelineConfig) -> CmdResult {
    let store = IncidentStore::open(data)?;
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(securesight_tui::run_tui(store, config))
}

fn cmd_seed(data: &Path, force: bool) -> CmdResult {
    if data.exists() && !force {
        return Err(format!(
            "{} already exists (use --force to overwrite)",
            data.display()
        )
        .into());
    }

    let store = IncidentStore::create(data, sample_incidents(Utc::now()))?;
    println!(
        "Seeded {} incidents ({} unresolved) into {}",
        store.len(),
        store.unresolved_count(),
        data.display()
    );
    Ok(())
}

fn cmd_list(data: &Path, filter: ResolvedFilter, json: bool) -> CmdResult {
    let store = IncidentStore::open(data)?;
    let incidents = store.list(filter);

    if json {
        println!("{}", serde_json::to_string_pretty(&incidents)?);
        return Ok(());
    }

    println!(
        "{} unresolved, {} resolved\n",
        store.unresolved_count(),
        store.resolved_count()
    );
    if incidents.is_empty() {
        println!("No incidents found.");
    }
    for incident in &incidents {
        println!("{}", incident_line(incident));
    }
    Ok(())
}

fn cmd_resolve(data: &Path, id: &str) -> CmdResult {
    let mut store = IncidentStore::open(data)?;
    let updated = store.toggle_resolved(id)?;
    println!("{}", serde_json::to_string_pretty(&updated)?);
    Ok(())
}

fn cmd_window(data: &Path, config: &TimelineConfig, json: bool) -> CmdResult {
    let store = IncidentStore::open(data)?;
    let window = resolve(&store.snapshot(), config);

    if json {
        println!("{}", serde_json::to_string_pretty(&window)?);
    } else {
        println!("Start: {}", format_time(window.start()));
        println!("End:   {}", format_time(window.end()));
        let span = window.span();
        println!("Span:  {}h {:02}m", span.num_hours(), span.num_minutes() % 60);
    }
    Ok(())
}

fn cmd_layout(data: &Path, config: &TimelineConfig, width: f64, json: bool) -> CmdResult {
    let store = IncidentStore::open(data)?;
    let incidents = store.snapshot();
    let window = resolve(&incidents, config);
    let timeline = layout(&incidents, window, Axis::new(width), config)?;

    if json {
        let output = json!({
            "window": window,
            "width": width,
            "lanes": timeline,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!(
        "Window {} .. {} on {width}px\n",
        format_time(window.start()),
        format_time(window.end())
    );
    for row in timeline.rows() {
        let location = row.lane.location();
        if location.is_empty() {
            println!("{}", row.lane.label());
        } else {
            println!("{} ({location})", row.lane.label());
        }
        for mark in &row.marks {
            let label = if mark.shows_label(config) { "  [label]" } else { "" };
            println!(
                "  {:>9.2} +{:<8.2} {}{label}",
                mark.left,
                mark.width,
                incident_line(mark.incident)
            );
        }
    }
    Ok(())
}

fn cmd_locate(data: &Path, time: Timestamp, json: bool) -> CmdResult {
    let store = IncidentStore::open(data)?;
    let incidents = store.snapshot();
    let found = locate(&incidents, time);

    if json {
        println!("{}", serde_json::to_string_pretty(&found)?);
        return Ok(());
    }

    let Some(incident) = found else {
        println!("no incident at {}", format_time(time));
        return Ok(());
    };
    println!("{}", incident_line(incident));

    let overlapping: Vec<&Incident> = locate_all(&incidents, time).skip(1).collect();
    if !overlapping.is_empty() {
        println!("\nAlso active:");
        for other in overlapping {
            println!("  {}", incident_line(other));
        }
    }
    Ok(())
}

fn incident_line(incident: &Incident) -> String {
    let status = if incident.resolved { " (resolved)" } else { "" };
    format!(
        "{}  {} .. {}  {} · {}{status}",
        incident.id,
        format_time(incident.start),
        format_time(incident.end),
        incident.kind,
        incident.camera_name()
    )
}
