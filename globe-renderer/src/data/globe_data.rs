use rand::Rng;

use crate::{
    common::{
        projection::{OrthographicProjection, Viewport},
        rotation::RotationState,
    },
    control::hover_controller::HoverHit,
};

/// Progress of one route's particle along its arc, always in [0, 1).
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ParticleState {
    progress: f64,
}

impl ParticleState {
    pub fn new(progress: f64) -> Self {
        Self {
            progress: wrap_unit(progress),
        }
    }

    pub fn random(rng: &mut impl Rng) -> Self {
        Self::new(rng.r#gen::<f64>())
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn advance(&mut self, increment: f64) {
        self.progress = wrap_unit(self.progress + increment);
    }
}

fn wrap_unit(value: f64) -> f64 {
    let wrapped = value.rem_euclid(1.0);
    // rem_euclid can round up to exactly 1.0 for tiny negative inputs
    if wrapped.is_finite() && wrapped < 1.0 {
        wrapped
    } else {
        0.0
    }
}

/// Everything the render loop reads each tick and the event handlers mutate.
#[derive(Clone, Debug, PartialEq)]
pub struct GlobeData {
    pub rotation: RotationState,
    pub viewport: Viewport,
    pub particles: Vec<ParticleState>,
    pub hover: Option<HoverHit>,
}

impl GlobeData {
    pub fn new(
        rotation: RotationState,
        viewport: Viewport,
        particles: Vec<ParticleState>,
    ) -> Self {
        Self {
            rotation,
            viewport,
            particles,
            hover: None,
        }
    }

    pub fn projection(&self) -> OrthographicProjection {
        OrthographicProjection::for_viewport(self.rotation, &self.viewport)
    }

    pub fn advance_particles(&mut self, increment: f64) {
        self.particles
            .iter_mut()
            .for_each(|particle| particle.advance(increment));
    }
}
