use std::{cell::Cell, collections::VecDeque, rc::Rc};

use log::{debug, trace, warn};

use super::{canvas::Canvas, scene::draw_frame};
use crate::data::{globe_data::GlobeData, scene_data::GlobeScene};

/// Handle of one requested display refresh.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct FrameRequest(pub u64);

/// The host's display-refresh callback registration.
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameRequest;
    fn cancel_frame(&mut self, request: FrameRequest);
}

/// Queue-backed scheduler. Frames fire only when the driver pops them.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: u64,
    pending: VecDeque<FrameRequest>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn next_due(&mut self) -> Option<FrameRequest> {
        self.pending.pop_front()
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameRequest {
        let request = FrameRequest(self.next_id);
        self.next_id += 1;
        self.pending.push_back(request);
        request
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        self.pending.retain(|pending| *pending != request);
    }
}

/// Shared stop flag. Once cancelled it stays cancelled.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken(Rc<Cell<bool>>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

/// Self-rescheduling per-frame task. At most one frame request is
/// outstanding at any time, so two loops can never run side by side.
#[derive(Debug)]
pub struct RenderLoop {
    particle_increment: f64,
    pending: Option<FrameRequest>,
    token: CancellationToken,
    frames_drawn: u64,
}

impl RenderLoop {
    pub fn new(particle_increment: f64) -> Self {
        Self {
            particle_increment,
            pending: None,
            token: CancellationToken::new(),
            frames_drawn: 0,
        }
    }

    pub fn start<S: FrameScheduler>(&mut self, scheduler: &mut S) {
        if self.is_running() {
            debug!("Render loop already running");
            return;
        }
        if self.token.is_cancelled() {
            self.token = CancellationToken::new();
        }
        self.pending = Some(scheduler.request_frame());
        debug!("Render loop started");
    }

    pub fn cancel<S: FrameScheduler>(&mut self, scheduler: &mut S) {
        self.token.cancel();
        if let Some(request) = self.pending.take() {
            scheduler.cancel_frame(request);
        }
        debug!("Render loop cancelled after {} frames", self.frames_drawn);
    }

    pub fn is_running(&self) -> bool {
        self.pending.is_some() && !self.token.is_cancelled()
    }

    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    /// Display refresh callback. Reschedules first, then advances the
    /// particles and draws. Returns whether a frame was drawn.
    pub fn on_frame<S: FrameScheduler, C: Canvas>(
        &mut self,
        request: FrameRequest,
        scheduler: &mut S,
        canvas: &mut C,
        data: &mut GlobeData,
        scene: &GlobeScene,
    ) -> bool {
        if self.token.is_cancelled() {
            self.pending = None;
            trace!("Frame {request:?} after cancellation");
            return false;
        }
        if self.pending != Some(request) {
            warn!("Ignoring stale frame {request:?}, expected {:?}", self.pending);
            return false;
        }

        self.pending = Some(scheduler.request_frame());
        data.advance_particles(self.particle_increment);
        draw_frame(canvas, data, scene);
        self.frames_drawn += 1;
        trace!("Drew frame {}", self.frames_drawn);
        true
    }
}
