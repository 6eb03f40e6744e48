use glam::{DQuat, DVec3};
use globe_common::GeoPoint;

/// Orientation of the globe as Euler angles in degrees.
///
/// Applied to a point as yaw about the polar axis (added to longitude),
/// then pitch about the east-west axis, then roll about the viewing axis.
/// The view center therefore sits at `(-yaw, -pitch)`.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct RotationState {
    pub yaw: f64,
    pub pitch: f64,
    pub roll: f64,
}

impl RotationState {
    pub fn new(yaw: f64, pitch: f64, roll: f64) -> Self {
        Self { yaw, pitch, roll }
    }

    /// Rotation that brings `point` to the middle of the view.
    pub fn centered_on(point: GeoPoint) -> Self {
        Self::new(-point.longitude(), -point.latitude(), 0.0)
    }

    pub fn is_finite(&self) -> bool {
        self.yaw.is_finite() && self.pitch.is_finite() && self.roll.is_finite()
    }

    /// Same rotation as a glam quaternion acting on cartesian vectors
    /// (x towards the viewer, y right, z up).
    pub fn to_quat(&self) -> DQuat {
        DQuat::from_rotation_x(self.roll.to_radians())
            * DQuat::from_rotation_y(-self.pitch.to_radians())
            * DQuat::from_rotation_z(self.yaw.to_radians())
    }

    pub fn rotate(&self, vector: DVec3) -> DVec3 {
        self.to_quat() * vector
    }

    pub fn unrotate(&self, vector: DVec3) -> DVec3 {
        self.to_quat().inverse() * vector
    }
}
