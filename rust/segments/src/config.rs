// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Extraction parameters.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default angular clustering tolerance in degrees
pub const DEFAULT_CLUSTER_TOLERANCE: f64 = 25.0;
/// Default minimum segment area in square metres
pub const DEFAULT_MIN_SEGMENT_AREA: f64 = 1.0;
/// Default minimum vertical normal component for a face to count as roof
pub const DEFAULT_MIN_UPWARD_NZ: f64 = 0.05;

/// How a face picks among several clusters within tolerance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssignmentPolicy {
    /// First cluster in creation order within tolerance
    #[default]
    FirstMatch,
    /// Nearest cluster within tolerance; ties go to the earliest cluster
    BestMatch,
}

impl FromStr for AssignmentPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "first-match" | "first" => Ok(Self::FirstMatch),
            "best-match" | "best" => Ok(Self::BestMatch),
            other => Err(Error::InvalidConfig(format!(
                "unknown assignment policy '{}' (expected first-match or best-match)",
                other
            ))),
        }
    }
}

impl fmt::Display for AssignmentPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::FirstMatch => "first-match",
            Self::BestMatch => "best-match",
        })
    }
}

/// Roof segment extraction configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoofConfig {
    /// Faces within this angle (degrees) of a cluster centroid join it
    pub cluster_tolerance: f64,
    /// Clusters below this area (m²) are dropped
    pub min_segment_area: f64,
    /// Faces whose normal Z component is below this are ignored
    pub min_upward_nz: f64,
    /// Cluster assignment policy
    pub policy: AssignmentPolicy,
}

impl Default for RoofConfig {
    fn default() -> Self {
        Self {
            cluster_tolerance: DEFAULT_CLUSTER_TOLERANCE,
            min_segment_area: DEFAULT_MIN_SEGMENT_AREA,
            min_upward_nz: DEFAULT_MIN_UPWARD_NZ,
            policy: AssignmentPolicy::FirstMatch,
        }
    }
}

impl RoofConfig {
    pub fn with_cluster_tolerance(mut self, degrees: f64) -> Self {
        self.cluster_tolerance = degrees;
        self
    }

    pub fn with_min_segment_area(mut self, area: f64) -> Self {
        self.min_segment_area = area;
        self
    }

    pub fn with_min_upward_nz(mut self, nz: f64) -> Self {
        self.min_upward_nz = nz;
        self
    }

    pub fn with_policy(mut self, policy: AssignmentPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Reject values that would make the clustering meaningless
    pub fn validate(&self) -> Result<()> {
        if !self.cluster_tolerance.is_finite()
            || self.cluster_tolerance <= 0.0
            || self.cluster_tolerance > 180.0
        {
            return Err(Error::InvalidConfig(format!(
                "cluster tolerance must be in (0, 180] degrees, got {}",
                self.cluster_tolerance
            )));
        }
        if !self.min_segment_area.is_finite() || self.min_segment_area < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "minimum segment area must be a non-negative number, got {}",
                self.min_segment_area
            )));
        }
        if !self.min_upward_nz.is_finite() {
            return Err(Error::InvalidConfig(format!(
                "minimum upward normal component must be finite, got {}",
                self.min_upward_nz
            )));
        }
        Ok(())
    }
}
