// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Command-line configuration: defaults, then environment, then flags.

use anyhow::{anyhow, bail, Context, Result};
use ifc_roof_processing::{AssignmentPolicy, RoofConfig};
use std::path::PathBuf;

pub const USAGE: &str = "Usage: ifc-roof <model.ifc> [options]

Options:
  --tolerance DEG     Angular clustering tolerance in degrees (default 25)
  --min-area M2       Minimum segment area in m² (default 1.0)
  --min-nz VALUE      Minimum upward normal component (default 0.05)
  --best-match        Assign faces to the nearest cluster instead of the first
  --json              Print the report as JSON
  -h, --help          Show this help

Environment:
  IFC_ROOF_CLUSTER_TOLERANCE, IFC_ROOF_MIN_SEGMENT_AREA,
  IFC_ROOF_MIN_UPWARD_NZ, IFC_ROOF_POLICY, RUST_LOG";

/// What the command line asked for
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    Analyze(CliConfig),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CliConfig {
    pub path: PathBuf,
    pub roof: RoofConfig,
    pub json: bool,
}

/// Extraction settings from `IFC_ROOF_*` variables
///
/// Missing or unparseable values keep the default.
pub fn roof_config_from_env<F>(var: F) -> RoofConfig
where
    F: Fn(&str) -> Option<String>,
{
    let defaults = RoofConfig::default();
    let number = |name: &str, default: f64| {
        var(name)
            .and_then(|value| value.trim().parse().ok())
            .unwrap_or(default)
    };

    RoofConfig {
        cluster_tolerance: number("IFC_ROOF_CLUSTER_TOLERANCE", defaults.cluster_tolerance),
        min_segment_area: number("IFC_ROOF_MIN_SEGMENT_AREA", defaults.min_segment_area),
        min_upward_nz: number("IFC_ROOF_MIN_UPWARD_NZ", defaults.min_upward_nz),
        policy: var("IFC_ROOF_POLICY")
            .and_then(|value| value.parse().ok())
            .unwrap_or(defaults.policy),
    }
}

/// Parse arguments (without the program name) on top of `base`
pub fn parse_args<I>(args: I, base: RoofConfig) -> Result<Command>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let mut path = None;
    let mut roof = base;
    let mut json = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "--tolerance" => roof.cluster_tolerance = number(&arg, args.next())?,
            "--min-area" => roof.min_segment_area = number(&arg, args.next())?,
            "--min-nz" => roof.min_upward_nz = number(&arg, args.next())?,
            "--best-match" => roof.policy = AssignmentPolicy::BestMatch,
            "--json" => json = true,
            other if other.starts_with('-') => bail!("unknown option: {}", other),
            other => {
                if path.is_some() {
                    bail!("unexpected argument: {}", other);
                }
                path = Some(PathBuf::from(other));
            }
        }
    }

    let path = path.ok_or_else(|| anyhow!("missing IFC file path"))?;
    roof.validate()?;
    Ok(Command::Analyze(CliConfig { path, roof, json }))
}

fn number(flag: &str, value: Option<String>) -> Result<f64> {
    let value = value.with_context(|| format!("{} needs a value", flag))?;
    value
        .parse()
        .with_context(|| format!("invalid value for {}: {}", flag, value))
}
