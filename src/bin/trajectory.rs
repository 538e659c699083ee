//! Survey trajectory replay tool.
//!
//! Reads a directional survey listing from CSV (md, inclination, azimuth
//! columns, one station per line) and prints the minimum-curvature
//! trajectory with dogleg/build/turn rates, plus any diagnostics.
//!
//! Usage:
//!   cargo run --bin trajectory -- --input surveys/well-a.csv
//!   cargo run --bin trajectory -- --input surveys/well-a.csv --json

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::warn;

use wellgeom::{SurveyLog, SurveyPoint};

/// Minimum-curvature survey trajectory calculator.
#[derive(Parser)]
#[command(name = "trajectory")]
struct Args {
    /// Path to the survey CSV (header optional; columns: md, inclination, azimuth).
    #[arg(long, short)]
    input: PathBuf,

    /// Emit the computed stations as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let contents = std::fs::read_to_string(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;

    let points = parse_survey_csv(&contents)?;
    if points.is_empty() {
        bail!("{} contains no survey stations", args.input.display());
    }

    let log = SurveyLog::from_points(points);
    let report = log.validate();
    for diagnostic in &report.diagnostics {
        warn!("{diagnostic}");
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(log.points())?);
    } else {
        print_table(&log);
    }

    if !report.is_valid() {
        bail!("survey failed validation with {} error(s)", report.errors().count());
    }
    Ok(())
}

/// Parse `md,inclination,azimuth` lines. The first candidate row that does
/// not parse as numbers is treated as a header and skipped, wherever it
/// falls after leading comments or blank lines.
fn parse_survey_csv(contents: &str) -> Result<Vec<SurveyPoint>> {
    let mut points = Vec::new();
    let mut header_skipped = false;
    for (line_no, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        let parsed: Result<Vec<f64>, _> = fields.iter().take(3).map(|f| f.parse::<f64>()).collect();
        match parsed {
            Ok(values) if values.len() == 3 => {
                points.push(SurveyPoint::new(values[0], values[1], values[2]));
            }
            _ if points.is_empty() && !header_skipped => {
                header_skipped = true;
            }
            Ok(_) => bail!("line {}: expected 3 columns, got {}", line_no + 1, fields.len()),
            Err(e) => bail!("line {}: {e}", line_no + 1),
        }
    }
    Ok(points)
}


fn print_table(log: &SurveyLog) {
    println!(
        "{:>10} {:>8} {:>8} {:>10} {:>10} {:>10} {:>10} {:>8} {:>8} {:>8}",
        "MD", "Inc", "Azi", "TVD", "North", "East", "VSect", "DLS", "Build", "Turn"
    );
    for p in log.points() {
        println!(
            "{:>10.2} {:>8.2} {:>8.2} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>8.2} {:>8.2} {:>8.2}",
            p.md,
            p.hole_angle_deg,
            p.azimuth_deg,
            p.tvd,
            p.northing,
            p.easting,
            p.vertical_section,
            p.dogleg_severity,
            p.build_rate,
            p.turn_rate
        );
    }
}
