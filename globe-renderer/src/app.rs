use globe_common::{DatasetStats, Facility, Supplier};
use log::{debug, info, warn};
use rand::{SeedableRng, rngs::StdRng};

use crate::{
    common::{
        projection::{ScreenPoint, Viewport},
        rotation::RotationState,
    },
    control::{
        hover_controller::{HoverController, HoverHit},
        input::GlobeEvent,
        rotation_controller::RotationController,
    },
    data::{
        Size,
        globe_data::{GlobeData, ParticleState},
        scene_data::GlobeScene,
    },
    render::{
        canvas::Canvas,
        render_loop::{FrameRequest, FrameScheduler, RenderLoop},
    },
    settings::{GlobeSettings, SettingsError},
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    Mounted,
    TornDown,
}

#[derive(Clone, Debug, PartialEq)]
pub struct HoveredSupplier {
    pub marker_index: usize,
    pub marker_position: ScreenPoint,
    pub supplier: Supplier,
}

/// What an external tooltip needs: where the pointer is and what, if
/// anything, is under it.
#[derive(Clone, Debug, PartialEq)]
pub struct HoverPayload {
    pub screen_position: ScreenPoint,
    pub hovered: Option<HoveredSupplier>,
}

/// Interactive supplier-route globe.
///
/// Owns all frame state. The host forwards pointer and resize events to
/// [`GlobeView::handle_event`] and display refreshes to
/// [`GlobeView::on_frame`], both on the same thread.
pub struct GlobeView {
    scene: GlobeScene,
    data: GlobeData,
    rotation_controller: RotationController,
    hover_controller: HoverController,
    render_loop: RenderLoop,
    last_hover: Option<HoverPayload>,
    lifecycle: Lifecycle,
}

impl GlobeView {
    /// Builds the scene, centers the globe on the facility and starts the
    /// render loop.
    pub fn mount<S: FrameScheduler>(
        facility: Facility,
        suppliers: Vec<Supplier>,
        viewport_size: Size<f64>,
        settings: &GlobeSettings,
        scheduler: &mut S,
    ) -> Result<Self, SettingsError> {
        let scene = GlobeScene::new(facility, suppliers, settings)?;

        let mut rng = match settings.particle_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let particles = scene
            .routes()
            .iter()
            .map(|_| ParticleState::random(&mut rng))
            .collect();

        let data = GlobeData::new(
            RotationState::centered_on(scene.facility().location()),
            Viewport::new(viewport_size, settings.globe_margin),
            particles,
        );

        let mut render_loop = RenderLoop::new(settings.particle_increment);
        render_loop.start(scheduler);

        info!(
            "Mounted globe for {} with {} suppliers",
            scene.facility().name,
            scene.suppliers().len()
        );

        Ok(Self {
            scene,
            data,
            rotation_controller: RotationController::new(),
            hover_controller: HoverController::new(settings.hover_threshold_px),
            render_loop,
            last_hover: None,
            lifecycle: Lifecycle::Mounted,
        })
    }

    /// Applies one host event. Returns the hover payload when the event
    /// produced one: every pointer move outside a drag does, and so does
    /// anything that clears the hover.
    pub fn handle_event(&mut self, event: GlobeEvent) -> Option<HoverPayload> {
        if self.lifecycle == Lifecycle::TornDown {
            warn!("Ignoring {event:?} after teardown");
            return None;
        }

        let projection = self.data.projection();
        match event {
            GlobeEvent::PointerDown(pointer) => {
                if self.rotation_controller.pointer_down(pointer, &projection) {
                    self.set_hover(pointer, None)
                } else {
                    None
                }
            }
            GlobeEvent::PointerMove(pointer) if self.rotation_controller.is_dragging() => {
                if let Some(rotation) = self.rotation_controller.pointer_move(pointer, &projection)
                {
                    self.data.rotation = rotation;
                }
                None
            }
            GlobeEvent::PointerMove(pointer) => {
                let hit = self.hover_controller.hit_test(
                    pointer,
                    self.scene.supplier_locations(),
                    &projection,
                );
                self.set_hover(pointer, hit)
            }
            GlobeEvent::PointerUp => {
                self.rotation_controller.pointer_up();
                None
            }
            GlobeEvent::PointerLeave => {
                self.rotation_controller.pointer_leave();
                let pointer = self
                    .last_hover
                    .as_ref()
                    .map_or(projection.center(), |hover| hover.screen_position);
                self.set_hover(pointer, None)
            }
            GlobeEvent::Resize(size) => {
                self.data.viewport = self.data.viewport.with_size(size);
                debug!(
                    "Resized to {}x{}, globe radius {:.1}",
                    size.width,
                    size.height,
                    self.data.viewport.scale()
                );
                None
            }
        }
    }

    fn set_hover(&mut self, pointer: ScreenPoint, hit: Option<HoverHit>) -> Option<HoverPayload> {
        self.data.hover = hit;
        let payload = HoverPayload {
            screen_position: pointer,
            hovered: hit.and_then(|hit| {
                let supplier = self.scene.suppliers().get(hit.marker_index)?;
                Some(HoveredSupplier {
                    marker_index: hit.marker_index,
                    marker_position: hit.screen_position,
                    supplier: supplier.clone(),
                })
            }),
        };
        self.last_hover = Some(payload.clone());
        Some(payload)
    }

    /// Display refresh callback. Returns whether a frame was drawn.
    pub fn on_frame<S: FrameScheduler, C: Canvas>(
        &mut self,
        request: FrameRequest,
        scheduler: &mut S,
        canvas: &mut C,
    ) -> bool {
        if self.lifecycle == Lifecycle::TornDown {
            return false;
        }
        self.render_loop
            .on_frame(request, scheduler, canvas, &mut self.data, &self.scene)
    }

    /// Stops the render loop, ends any drag and drops the hover. Further
    /// events and frames are ignored.
    pub fn teardown<S: FrameScheduler>(&mut self, scheduler: &mut S) {
        if self.lifecycle == Lifecycle::TornDown {
            return;
        }
        self.render_loop.cancel(scheduler);
        self.rotation_controller.pointer_leave();
        self.data.hover = None;
        self.last_hover = None;
        self.lifecycle = Lifecycle::TornDown;
        info!("Globe torn down after {} frames", self.render_loop.frames_drawn());
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn rotation(&self) -> RotationState {
        self.data.rotation
    }

    pub fn is_dragging(&self) -> bool {
        self.rotation_controller.is_dragging()
    }

    pub fn hover_payload(&self) -> Option<&HoverPayload> {
        self.last_hover.as_ref()
    }

    pub fn stats(&self) -> &DatasetStats {
        self.scene.stats()
    }

    pub fn scene(&self) -> &GlobeScene {
        &self.scene
    }

    pub fn data(&self) -> &GlobeData {
        &self.data
    }

    pub fn frames_drawn(&self) -> u64 {
        self.render_loop.frames_drawn()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use glam::DVec2;

    use super::*;
    use crate::{
        data::suppliers::tests::sample_suppliers,
        render::{
            canvas::{DrawList, Layer},
            render_loop::ManualScheduler,
        },
    };

    fn mount(scheduler: &mut ManualScheduler) -> GlobeView {
        let settings = GlobeSettings {
            particle_seed: Some(5),
            ..GlobeSettings::default()
        };
        GlobeView::mount(
            Facility::new("Plant", -98.5795, 39.8283),
            sample_suppliers(),
            (800.0, 600.0).into(),
            &settings,
            scheduler,
        )
        .unwrap()
    }

    fn run_frames(view: &mut GlobeView, scheduler: &mut ManualScheduler, canvas: &mut DrawList) {
        for _ in 0..3 {
            let request = scheduler.next_due().unwrap();
            assert!(view.on_frame(request, scheduler, canvas));
        }
    }

    #[test]
    fn mount_centers_on_the_facility_and_starts_drawing() {
        let mut scheduler = ManualScheduler::new();
        let mut canvas = DrawList::new();
        let mut view = mount(&mut scheduler);

        assert_abs_diff_eq!(view.rotation().yaw, 98.5795);
        assert_abs_diff_eq!(view.rotation().pitch, -39.8283);
        assert_eq!(view.stats().entry_count, 5);

        run_frames(&mut view, &mut scheduler, &mut canvas);
        assert_eq!(view.frames_drawn(), 3);
        assert!(canvas.in_layer(Layer::Routes).count() > 0);
    }

    #[test]
    fn seeded_particles_are_reproducible() {
        let a = mount(&mut ManualScheduler::new());
        let b = mount(&mut ManualScheduler::new());
        assert_eq!(a.data().particles, b.data().particles);
    }

    #[test]
    fn drag_rotates_and_suppresses_hover() {
        let mut scheduler = ManualScheduler::new();
        let mut view = mount(&mut scheduler);
        let center = view.data().viewport.center();
        let before = view.rotation();

        let payload = view.handle_event(GlobeEvent::PointerDown(center)).unwrap();
        assert_eq!(payload.hovered, None);
        assert!(view.is_dragging());

        assert_eq!(
            view.handle_event(GlobeEvent::PointerMove(center + DVec2::new(40.0, 0.0))),
            None
        );
        assert!(view.rotation().yaw > before.yaw);

        view.handle_event(GlobeEvent::PointerUp);
        assert!(!view.is_dragging());
    }

    #[test]
    fn hovering_a_marker_reports_the_supplier() {
        let mut scheduler = ManualScheduler::new();
        let mut view = mount(&mut scheduler);
        let projection = view.data().projection();

        // Toronto faces the viewer from the facility
        let toronto = &view.scene().suppliers()[3];
        let marker = projection.project(toronto.location()).unwrap();
        let pointer = marker + DVec2::new(3.0, -4.0);

        let payload = view.handle_event(GlobeEvent::PointerMove(pointer)).unwrap();
        let hovered = payload.hovered.unwrap();
        assert_eq!(payload.screen_position, pointer);
        assert_eq!(hovered.supplier.name, "Toronto Glass");
        assert_eq!(hovered.marker_position, marker);
        assert_eq!(view.data().hover.map(|hit| hit.marker_index), Some(3));

        let payload = view.handle_event(GlobeEvent::PointerLeave).unwrap();
        assert_eq!(payload.hovered, None);
        assert_eq!(view.data().hover, None);
    }

    #[test]
    fn resize_takes_effect_on_the_next_frame() {
        let mut scheduler = ManualScheduler::new();
        let mut canvas = DrawList::new();
        let mut view = mount(&mut scheduler);

        view.handle_event(GlobeEvent::Resize((400.0, 400.0).into()));
        assert_abs_diff_eq!(view.data().projection().scale(), 180.0, epsilon = 1e-9);
        assert_eq!(view.data().projection().center(), DVec2::new(200.0, 200.0));

        // still a single loop
        assert_eq!(scheduler.pending(), 1);
        run_frames(&mut view, &mut scheduler, &mut canvas);
    }

    #[test]
    fn teardown_stops_everything() {
        let mut scheduler = ManualScheduler::new();
        let mut canvas = DrawList::new();
        let mut view = mount(&mut scheduler);
        let center = view.data().viewport.center();

        view.handle_event(GlobeEvent::PointerDown(center));
        let request = scheduler.next_due().unwrap();
        view.teardown(&mut scheduler);

        assert_eq!(view.lifecycle(), Lifecycle::TornDown);
        assert!(!view.is_dragging());
        assert_eq!(scheduler.pending(), 0);
        assert!(!view.on_frame(request, &mut scheduler, &mut canvas));

        let rotation = view.rotation();
        assert_eq!(
            view.handle_event(GlobeEvent::PointerMove(center + DVec2::new(40.0, 0.0))),
            None
        );
        assert_eq!(view.rotation(), rotation);
    }
}
