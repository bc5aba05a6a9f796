// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Greedy single-pass clustering of face normals
//!
//! Faces are visited in order. Each joins a cluster whose centroid lies
//! within the angular tolerance, or starts a new one. Centroids are the
//! area-weighted mean of member normals, renormalized after every merge.

use crate::config::AssignmentPolicy;
use crate::faces::Face;
use nalgebra::Vector3;

/// A group of faces sharing roughly the same orientation
#[derive(Debug, Clone, PartialEq)]
pub struct FaceCluster {
    /// Area-weighted mean normal, always unit length
    pub centroid: Vector3<f64>,
    /// Sum of member face areas
    pub area: f64,
    /// Original face indices, in assignment order
    pub members: Vec<usize>,
}

impl FaceCluster {
    fn seed(face: &Face) -> Self {
        Self {
            centroid: face.normal.normalize(),
            area: face.area,
            members: vec![face.index],
        }
    }

    /// Merge a face into the cluster
    ///
    /// Keeps the previous centroid when the weighted sum has no length,
    /// which only happens for exactly opposing contributions.
    fn absorb(&mut self, face: &Face) {
        let weighted = self.centroid * self.area + face.normal * face.area;
        let length = weighted.norm();
        if length > 0.0 && length.is_finite() {
            self.centroid = weighted / length;
        }
        self.area += face.area;
        self.members.push(face.index);
    }

    pub fn face_count(&self) -> usize {
        self.members.len()
    }
}

/// Angle in degrees between two unit vectors
pub fn angular_distance(a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
    a.dot(b).clamp(-1.0, 1.0).acos().to_degrees()
}

/// Group faces by normal direction
///
/// `tolerance` is in degrees; a face joins a cluster only when its distance
/// to the centroid is strictly below it. Clusters come out in creation order.
pub fn cluster_faces(faces: &[Face], tolerance: f64, policy: AssignmentPolicy) -> Vec<FaceCluster> {
    let mut clusters: Vec<FaceCluster> = Vec::new();

    for face in faces {
        let target = match policy {
            AssignmentPolicy::FirstMatch => clusters
                .iter()
                .position(|c| angular_distance(&face.normal, &c.centroid) < tolerance),
            AssignmentPolicy::BestMatch => nearest_within(&clusters, face, tolerance),
        };

        match target {
            Some(i) => clusters[i].absorb(face),
            None => clusters.push(FaceCluster::seed(face)),
        }
    }

    clusters
}

fn nearest_within(clusters: &[FaceCluster], face: &Face, tolerance: f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, cluster) in clusters.iter().enumerate() {
        let distance = angular_distance(&face.normal, &cluster.centroid);
        if distance >= tolerance {
            continue;
        }
        // Strict comparison keeps the earliest cluster on ties
        if best.map_or(true, |(_, d)| distance < d) {
            best = Some((i, distance));
        }
    }
    best.map(|(i, _)| i)
}
