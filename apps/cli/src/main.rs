// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ifc-roof - extract planar roof segments from an IFC model.
//!
//! Prints each segment's area, tilt and azimuth as a table, or the full
//! report as JSON with `--json`. Logs go to stderr; set `RUST_LOG` to
//! change the level.
//!
//! Usage:
//!   ifc-roof <model.ifc> [options]

mod config;

use anyhow::{Context, Result};
use config::{parse_args, roof_config_from_env, CliConfig, Command, USAGE};
use ifc_roof_processing::{analyze_file, RoofReport};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let base = roof_config_from_env(|name| std::env::var(name).ok());
    let config = match parse_args(std::env::args().skip(1), base) {
        Ok(Command::Analyze(config)) => config,
        Ok(Command::Help) => {
            println!("{}", USAGE);
            return Ok(());
        }
        Err(e) => {
            eprintln!("{}", USAGE);
            return Err(e);
        }
    };

    tracing::info!(
        tolerance = config.roof.cluster_tolerance,
        min_area = config.roof.min_segment_area,
        min_nz = config.roof.min_upward_nz,
        policy = %config.roof.policy,
        "Starting roof extraction"
    );

    let report = analyze_file(&config.path, &config.roof)
        .with_context(|| format!("could not analyze {}", config.path.display()))?;

    print_report(&config, &report)
}

fn print_report(config: &CliConfig, report: &RoofReport) -> Result<()> {
    if config.json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    if report.segments.is_empty() {
        println!("No segments extracted.");
        return Ok(());
    }

    println!(
        "{:>15}  {:>8}  {:>6}  {:>8}  {:>5}  Source",
        "ID", "Area", "Tilt", "Azimuth", "Faces"
    );
    println!("{}", "-".repeat(70));
    for segment in &report.segments {
        println!(
            "{:>15}  {:>8.2}  {:>6.1}  {:>8.1}  {:>5}  {}",
            segment.id,
            segment.area,
            segment.tilt,
            segment.azimuth,
            segment.face_count,
            segment.source_element
        );
    }
    for skipped in &report.skipped {
        println!("  skipped #{} {}: {}", skipped.element_id, skipped.label, skipped.reason);
    }

    println!(
        "\nParsed {} segment(s), total usable area: {:.2} m²",
        report.segments.len(),
        report.total_area()
    );
    Ok(())
}
