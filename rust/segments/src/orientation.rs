// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tilt and compass azimuth of a plane normal
//!
//! World frame: +Z up, +Y north, +X east. Azimuth is measured clockwise
//! from north, so a south-facing plane has azimuth 180.

use nalgebra::Vector3;

/// Azimuths at or above this snap back to north
pub const AZIMUTH_SNAP_THRESHOLD: f64 = 359.95;

/// Tilt from horizontal in degrees, in [0, 90]
pub fn tilt_degrees(normal: &Vector3<f64>) -> f64 {
    normal.z.abs().clamp(-1.0, 1.0).acos().to_degrees()
}

/// Compass azimuth in degrees, in [0, 360)
pub fn azimuth_degrees(normal: &Vector3<f64>) -> f64 {
    let azimuth = normal.x.atan2(normal.y).to_degrees().rem_euclid(360.0);
    // Also folds negative zero from atan2(-0.0, y)
    if azimuth >= AZIMUTH_SNAP_THRESHOLD || azimuth == 0.0 {
        0.0
    } else {
        azimuth
    }
}

/// `(tilt, azimuth)` in degrees
pub fn orientation(normal: &Vector3<f64>) -> (f64, f64) {
    (tilt_degrees(normal), azimuth_degrees(normal))
}
