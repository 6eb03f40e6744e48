use glam::DVec3;
use globe_common::GeoPoint;

use super::versor::{cartesian, spherical};

pub const DEFAULT_ARC_SAMPLES: usize = 51;

/// Endpoints closer than this (radians) produce a zero-length arc.
const DEGENERATE_ANGLE: f64 = 1e-9;
/// Below this the endpoints are treated as exactly opposite.
const ANTIPODAL_TANGENT: f64 = 1e-9;

/// Great-circle route between two points, sampled at equal angular steps.
///
/// The first sample is always exactly the source and the last exactly the
/// target. Cartesian unit vectors are kept alongside the geographic points so
/// per-frame projection doesn't redo the trigonometry.
#[derive(Clone, Debug, PartialEq)]
pub struct ArcSample {
    points: Vec<GeoPoint>,
    vectors: Vec<DVec3>,
}

impl ArcSample {
    /// At least two samples are always produced.
    pub fn build(source: GeoPoint, target: GeoPoint, sample_count: usize) -> Self {
        let sample_count = sample_count.max(2);
        let from = cartesian(source);
        let to = cartesian(target);
        let angle = from.cross(to).length().atan2(from.dot(to));

        if !(angle > DEGENERATE_ANGLE) {
            return Self {
                points: vec![source; sample_count],
                vectors: vec![from; sample_count],
            };
        }

        // unit tangent at `from` pointing along the great circle towards `to`
        let tangent = to - from * angle.cos();
        let tangent = if tangent.length() > ANTIPODAL_TANGENT {
            tangent.normalize()
        } else {
            antipodal_tangent(from)
        };

        let last = sample_count - 1;
        let vectors = (0..sample_count)
            .map(|i| {
                let (sin, cos) = (angle * i as f64 / last as f64).sin_cos();
                from * cos + tangent * sin
            })
            .collect::<Vec<_>>();

        let mut points = vectors.iter().copied().map(spherical).collect::<Vec<_>>();
        points[0] = source;
        points[last] = target;

        let mut vectors = vectors;
        vectors[0] = from;
        vectors[last] = to;

        Self { points, vectors }
    }

    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    pub fn vectors(&self) -> &[DVec3] {
        &self.vectors
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Position at parameter `t` in [0, 1], interpolated between the two
    /// neighbouring samples.
    pub fn vector_at(&self, t: f64) -> DVec3 {
        let last = self.vectors.len() - 1;
        let position = t.clamp(0.0, 1.0) * last as f64;
        let index = (position.floor() as usize).min(last.saturating_sub(1));
        let fraction = position - index as f64;
        let a = self.vectors[index];
        let b = self.vectors[(index + 1).min(last)];
        a.lerp(b, fraction).try_normalize().unwrap_or(a)
    }
}

/// Opposite points have no unique great circle; route through the meridian
/// plane (or the equator, from a pole) so the result is deterministic.
fn antipodal_tangent(from: DVec3) -> DVec3 {
    (DVec3::Z - from * from.z)
        .try_normalize()
        .unwrap_or_else(|| from.any_orthonormal_vector())
}
