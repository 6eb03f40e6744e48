use glam::{DQuat, DVec3};
use globe_common::GeoPoint;

use super::rotation::RotationState;

/// Below this cross-product length two unit vectors count as parallel.
const PARALLEL_EPSILON: f64 = 1e-12;

/// Unit quaternion describing a globe rotation.
///
/// Components follow the `[w, x, y, z]` layout used by the globe's Euler
/// convention (yaw about the polar axis, then pitch, then roll), which is not
/// the frame glam uses for its own axis rotations. Only the Hamilton product
/// is borrowed from [`DQuat`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Versor(DQuat);

impl Default for Versor {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Versor {
    pub const IDENTITY: Versor = Versor(DQuat::IDENTITY);

    pub fn from_wxyz(w: f64, x: f64, y: f64, z: f64) -> Self {
        Self(DQuat::from_xyzw(x, y, z, w))
    }

    pub fn to_wxyz(&self) -> [f64; 4] {
        [self.0.w, self.0.x, self.0.y, self.0.z]
    }

    pub fn norm(&self) -> f64 {
        self.0.length()
    }

    /// Rescales to unit length. Degenerate or non-finite input collapses to
    /// the identity rather than propagating NaN.
    pub fn normalized(&self) -> Self {
        let norm = self.norm();
        if !norm.is_finite() || norm < PARALLEL_EPSILON {
            return Self::IDENTITY;
        }
        Self(self.0 / norm)
    }

    pub fn from_euler(rotation: RotationState) -> Self {
        let (sl, cl) = (rotation.yaw.to_radians() / 2.0).sin_cos();
        let (sp, cp) = (rotation.pitch.to_radians() / 2.0).sin_cos();
        let (sg, cg) = (rotation.roll.to_radians() / 2.0).sin_cos();

        Self::from_wxyz(
            cl * cp * cg + sl * sp * sg,
            sl * cp * cg - cl * sp * sg,
            cl * sp * cg + sl * cp * sg,
            cl * cp * sg - sl * sp * cg,
        )
        .normalized()
    }

    pub fn to_euler(&self) -> RotationState {
        let [w, x, y, z] = self.normalized().to_wxyz();

        RotationState::new(
            (2.0 * (w * x + y * z))
                .atan2(1.0 - 2.0 * (x * x + y * y))
                .to_degrees(),
            (2.0 * (w * y - z * x)).clamp(-1.0, 1.0).asin().to_degrees(),
            (2.0 * (w * z + x * y))
                .atan2(1.0 - 2.0 * (y * y + z * z))
                .to_degrees(),
        )
    }

    /// Minimal rotation taking unit vector `from` onto unit vector `to`.
    ///
    /// The half angle comes from `atan2(|from x to|, from . to)`, which stays
    /// accurate for both nearly parallel and nearly opposite vectors. Exactly
    /// opposite vectors have no unique axis, so a half turn about an arbitrary
    /// perpendicular is returned.
    pub fn between(from: DVec3, to: DVec3) -> Self {
        let axis = from.cross(to);
        let axis_length = axis.length();
        let dot = from.dot(to);

        if !axis_length.is_finite() || !dot.is_finite() {
            return Self::IDENTITY;
        }

        if axis_length < PARALLEL_EPSILON {
            if dot >= 0.0 {
                return Self::IDENTITY;
            }
            let perpendicular = from.any_orthonormal_vector();
            return Self::from_axis_components(perpendicular, 0.0, 1.0);
        }

        let half_angle = axis_length.atan2(dot) / 2.0;
        let (sin, cos) = half_angle.sin_cos();
        Self::from_axis_components(axis / axis_length, cos, sin).normalized()
    }

    /// Quaternion for rotating `sin`/`cos` of the half angle about a unit
    /// cartesian axis, remapped into the versor's component layout.
    fn from_axis_components(axis: DVec3, cos: f64, sin: f64) -> Self {
        Self::from_wxyz(cos, axis.z * sin, -axis.y * sin, axis.x * sin)
    }

    /// `self` followed by `other`, renormalized.
    pub fn compose(&self, other: Versor) -> Self {
        Self(self.0 * other.0).normalized()
    }
}

/// Unit vector for a geographic point: x towards (0, 0), y towards (90E, 0),
/// z towards the north pole.
pub fn cartesian(point: GeoPoint) -> DVec3 {
    let (sin_lon, cos_lon) = point.longitude().to_radians().sin_cos();
    let (sin_lat, cos_lat) = point.latitude().to_radians().sin_cos();
    DVec3::new(cos_lat * cos_lon, cos_lat * sin_lon, sin_lat)
}

pub fn spherical(vector: DVec3) -> GeoPoint {
    let length = vector.length();
    if !length.is_finite() || length == 0.0 {
        return GeoPoint::new(0.0, 0.0);
    }
    GeoPoint::new(
        vector.y.atan2(vector.x).to_degrees(),
        (vector.z / length).clamp(-1.0, 1.0).asin().to_degrees(),
    )
}
