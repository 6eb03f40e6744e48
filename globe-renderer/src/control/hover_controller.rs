use globe_common::GeoPoint;

use crate::common::projection::{OrthographicProjection, ScreenPoint};

/// Marker under the pointer.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HoverHit {
    pub marker_index: usize,
    pub screen_position: ScreenPoint,
    pub distance: f64,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HoverController {
    threshold_px: f64,
}

impl HoverController {
    pub fn new(threshold_px: f64) -> Self {
        Self { threshold_px }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold_px
    }

    /// Nearest visible marker within the threshold (inclusive). Equally near
    /// markers resolve to the one listed first.
    pub fn hit_test<I>(
        &self,
        pointer: ScreenPoint,
        markers: I,
        projection: &OrthographicProjection,
    ) -> Option<HoverHit>
    where
        I: IntoIterator<Item = GeoPoint>,
    {
        if !pointer.is_finite() {
            return None;
        }

        markers
            .into_iter()
            .enumerate()
            .filter_map(|(marker_index, marker)| {
                let screen_position = projection.project(marker)?;
                Some(HoverHit {
                    marker_index,
                    screen_position,
                    distance: screen_position.distance(pointer),
                })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
            .filter(|hit| hit.distance <= self.threshold_px)
    }
}
