use glam::{DQuat, DVec2, DVec3};
use globe_common::GeoPoint;

use super::rotation::RotationState;
use super::versor::{cartesian, spherical};
use crate::data::Size;

/// Device pixel coordinates, y growing downwards.
pub type ScreenPoint = DVec2;

/// Sphere radius and center derived from the drawing surface size.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    size: Size<f64>,
    margin: f64,
}

impl Viewport {
    pub fn new(size: Size<f64>, margin: f64) -> Self {
        Self { size, margin }
    }

    pub fn size(&self) -> Size<f64> {
        self.size
    }

    pub fn scale(&self) -> f64 {
        (self.margin * 0.5 * self.size.width.min(self.size.height)).max(0.0)
    }

    pub fn center(&self) -> ScreenPoint {
        DVec2::new(self.size.width * 0.5, self.size.height * 0.5)
    }

    pub fn with_size(&self, size: Size<f64>) -> Self {
        Self::new(size, self.margin)
    }
}

/// Orthographic globe projection for one rotation and viewport.
///
/// Only the hemisphere facing the viewer is projected; everything beyond 90
/// degrees from the view center is reported as not visible.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct OrthographicProjection {
    rotation: RotationState,
    quat: DQuat,
    scale: f64,
    center: ScreenPoint,
}

impl OrthographicProjection {
    pub fn new(rotation: RotationState, scale: f64, center: ScreenPoint) -> Self {
        Self {
            rotation,
            quat: rotation.to_quat(),
            scale,
            center,
        }
    }

    pub fn for_viewport(rotation: RotationState, viewport: &Viewport) -> Self {
        Self::new(rotation, viewport.scale(), viewport.center())
    }

    pub fn with_rotation(&self, rotation: RotationState) -> Self {
        Self::new(rotation, self.scale, self.center)
    }

    pub fn rotation(&self) -> RotationState {
        self.rotation
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn center(&self) -> ScreenPoint {
        self.center
    }

    pub fn project(&self, point: GeoPoint) -> Option<ScreenPoint> {
        self.project_cartesian(cartesian(point))
    }

    /// Projects a unit vector. Points with negative depth lie on the far
    /// hemisphere and yield `None`.
    pub fn project_cartesian(&self, vector: DVec3) -> Option<ScreenPoint> {
        let rotated = self.quat * vector;
        if !(rotated.x >= 0.0) {
            return None;
        }
        let screen = self.center + self.scale * DVec2::new(rotated.y, -rotated.z);
        screen.is_finite().then_some(screen)
    }

    /// Like [`Self::project_cartesian`], but far-side points are pulled onto
    /// the silhouette circle. Used to close filled outlines that cross the
    /// horizon.
    pub fn project_to_limb(&self, vector: DVec3) -> Option<ScreenPoint> {
        let rotated = self.quat * vector;
        let planar = if rotated.x >= 0.0 {
            DVec2::new(rotated.y, -rotated.z)
        } else {
            DVec2::new(rotated.y, -rotated.z).try_normalize()?
        };
        let screen = self.center + self.scale * planar;
        screen.is_finite().then_some(screen)
    }

    /// Recovers the front-hemisphere point under `screen`, or `None` outside
    /// the sphere's silhouette.
    pub fn invert(&self, screen: ScreenPoint) -> Option<GeoPoint> {
        if !(self.scale > 0.0) {
            return None;
        }
        let offset = (screen - self.center) / self.scale;
        let (x, y) = (offset.x, -offset.y);
        let rho_squared = x * x + y * y;
        if !(rho_squared <= 1.0) {
            return None;
        }
        let depth = (1.0 - rho_squared).sqrt();
        let unrotated = self.quat.inverse() * DVec3::new(depth, x, y);
        unrotated.is_finite().then(|| spherical(unrotated))
    }

    /// Cosine of the angular distance between `point` and the view center.
    pub fn depth(&self, point: GeoPoint) -> f64 {
        (self.quat * cartesian(point)).x
    }
}
