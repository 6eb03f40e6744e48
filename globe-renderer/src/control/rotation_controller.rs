use glam::DVec3;
use log::{debug, trace};

use crate::common::{
    projection::{OrthographicProjection, ScreenPoint},
    rotation::RotationState,
    versor::{Versor, cartesian},
};

/// Snapshot taken when a drag begins. Every move of the drag is resolved
/// against this snapshot, never against the live rotation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DragAnchor {
    pub reference_rotation: RotationState,
    pub reference_versor: Versor,
    pub anchor_vector: DVec3,
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum GestureState {
    #[default]
    Idle,
    Dragging(DragAnchor),
}

/// Drag-to-rotate state machine (Idle / Dragging).
#[derive(Clone, Debug, Default)]
pub struct RotationController {
    state: GestureState,
    last_composed: Option<Versor>,
}

impl RotationController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, GestureState::Dragging(_))
    }

    pub fn anchor(&self) -> Option<&DragAnchor> {
        match &self.state {
            GestureState::Dragging(anchor) => Some(anchor),
            GestureState::Idle => None,
        }
    }

    /// Quaternion behind the most recent rotation update.
    pub fn last_composed(&self) -> Option<Versor> {
        self.last_composed
    }

    /// Starts a drag if the pointer is over the sphere. Returns whether a
    /// drag is now in progress.
    pub fn pointer_down(
        &mut self,
        pointer: ScreenPoint,
        projection: &OrthographicProjection,
    ) -> bool {
        let Some(point) = projection.invert(pointer) else {
            trace!("Pointer down at {pointer} is off the globe");
            return false;
        };

        let reference_rotation = projection.rotation();
        self.state = GestureState::Dragging(DragAnchor {
            reference_rotation,
            reference_versor: Versor::from_euler(reference_rotation),
            anchor_vector: cartesian(point),
        });
        debug!("Drag started at {point}");
        true
    }

    /// New rotation for the pointer's current position, or `None` when idle
    /// or when the pointer has left the sphere (the drag stays active).
    pub fn pointer_move(
        &mut self,
        pointer: ScreenPoint,
        projection: &OrthographicProjection,
    ) -> Option<RotationState> {
        let GestureState::Dragging(anchor) = self.state else {
            return None;
        };

        let reference = projection.with_rotation(anchor.reference_rotation);
        let Some(point) = reference.invert(pointer) else {
            trace!("Pointer {pointer} left the globe, rotation frozen");
            return None;
        };

        let delta = Versor::between(anchor.anchor_vector, cartesian(point));
        let composed = anchor.reference_versor.compose(delta);
        self.last_composed = Some(composed);

        let rotation = composed.to_euler();
        rotation.is_finite().then_some(rotation)
    }

    /// Ends the drag, discarding the anchor. Returns whether one was active.
    pub fn pointer_up(&mut self) -> bool {
        let was_dragging = self.is_dragging();
        self.state = GestureState::Idle;
        if was_dragging {
            debug!("Drag ended");
        }
        was_dragging
    }

    pub fn pointer_leave(&mut self) -> bool {
        self.pointer_up()
    }
}
