use glam::{DVec3, Vec3, Vec4};
use globe_common::TransportMode;
use itertools::Itertools;

use super::canvas::{Canvas, Layer};
use crate::{
    common::projection::{OrthographicProjection, ScreenPoint},
    data::{globe_data::GlobeData, scene_data::GlobeScene},
};

const OCEAN: Vec4 = Vec4::new(0.059, 0.090, 0.165, 1.0);
const SPHERE_OUTLINE: Vec4 = Vec4::new(0.278, 0.333, 0.412, 1.0);
const GRATICULE: Vec4 = Vec4::new(1.0, 1.0, 1.0, 0.08);
const LANDMASS: Vec4 = Vec4::new(0.118, 0.161, 0.231, 1.0);
const FACILITY: Vec4 = Vec4::new(0.231, 0.510, 0.965, 1.0);
const HIGHLIGHT: Vec4 = Vec4::new(1.0, 1.0, 1.0, 1.0);

const FACILITY_RADIUS: f64 = 6.0;
const SUPPLIER_RADIUS: f64 = 3.5;
const PARTICLE_RADIUS: f64 = 2.0;
const HOVER_ENLARGEMENT: f64 = 1.6;

fn route_width(mode: TransportMode) -> f64 {
    match mode {
        TransportMode::Ship => 1.6,
        TransportMode::Rail => 1.4,
        TransportMode::Truck => 1.2,
        TransportMode::Air => 1.0,
    }
}

/// Splits a projected polyline wherever a vertex is hidden. A segment is
/// never drawn across a hidden vertex.
pub fn visible_runs<I>(points: I) -> Vec<Vec<ScreenPoint>>
where
    I: IntoIterator<Item = Option<ScreenPoint>>,
{
    let chunks = points.into_iter().chunk_by(Option::is_some);
    chunks
        .into_iter()
        .filter(|(visible, _)| *visible)
        .map(|(_, run)| run.flatten().collect_vec())
        .collect()
}

fn stroke_visible<C: Canvas>(
    canvas: &mut C,
    projection: &OrthographicProjection,
    layer: Layer,
    vectors: &[DVec3],
    width: f64,
    color: Vec4,
) {
    let runs = visible_runs(vectors.iter().map(|&v| projection.project_cartesian(v)));
    for run in runs {
        canvas.stroke_polyline(layer, &run, width, color);
    }
}

/// Draws one complete frame for the current state, back to front.
///
/// Particle progress is only read here; advancing it is the render loop's
/// job.
pub fn draw_frame<C: Canvas>(canvas: &mut C, data: &GlobeData, scene: &GlobeScene) {
    let projection = data.projection();
    canvas.clear();

    draw_base_map(canvas, &projection, scene);
    draw_routes(canvas, &projection, scene);
    draw_particles(canvas, &projection, data, scene);
    draw_markers(canvas, &projection, data, scene);
}

fn draw_base_map<C: Canvas>(
    canvas: &mut C,
    projection: &OrthographicProjection,
    scene: &GlobeScene,
) {
    let (center, scale) = (projection.center(), projection.scale());
    canvas.fill_circle(Layer::Sphere, center, scale, OCEAN);
    canvas.stroke_circle(Layer::Sphere, center, scale, 1.0, SPHERE_OUTLINE);

    for line in scene.base_map().graticule() {
        stroke_visible(canvas, projection, Layer::Graticule, line, 0.5, GRATICULE);
    }

    for ring in scene.base_map().landmasses() {
        let any_visible = ring
            .iter()
            .any(|&v| projection.project_cartesian(v).is_some());
        if !any_visible {
            continue;
        }
        let outline = ring
            .iter()
            .filter_map(|&v| projection.project_to_limb(v))
            .collect_vec();
        canvas.fill_polygon(Layer::Landmass, &outline, LANDMASS);
    }
}

fn draw_routes<C: Canvas>(
    canvas: &mut C,
    projection: &OrthographicProjection,
    scene: &GlobeScene,
) {
    for route in scene.routes() {
        stroke_visible(
            canvas,
            projection,
            Layer::Routes,
            route.arc.vectors(),
            route_width(route.transport_mode),
            route.color.extend(0.85),
        );
    }
}

fn draw_particles<C: Canvas>(
    canvas: &mut C,
    projection: &OrthographicProjection,
    data: &GlobeData,
    scene: &GlobeScene,
) {
    for (route, particle) in scene.routes().iter().zip(&data.particles) {
        let position = route.arc.vector_at(particle.progress());
        if let Some(screen) = projection.project_cartesian(position) {
            let color = route.color.lerp(Vec3::ONE, 0.35).extend(1.0);
            canvas.fill_circle(Layer::Particles, screen, PARTICLE_RADIUS, color);
        }
    }
}

fn draw_markers<C: Canvas>(
    canvas: &mut C,
    projection: &OrthographicProjection,
    data: &GlobeData,
    scene: &GlobeScene,
) {
    if let Some(screen) = projection.project(scene.facility().location()) {
        canvas.fill_circle(Layer::Markers, screen, FACILITY_RADIUS, FACILITY);
        canvas.stroke_circle(Layer::Markers, screen, FACILITY_RADIUS, 1.5, HIGHLIGHT);
    }

    let hovered = data.hover.map(|hit| hit.marker_index);
    for (index, supplier) in scene.suppliers().iter().enumerate() {
        let Some(screen) = projection.project(supplier.location()) else {
            continue;
        };
        let color = scene.encoder().encode(supplier.magnitude()).extend(1.0);
        let radius = SUPPLIER_RADIUS
            + 2.0 * scene.encoder().ramp_position(supplier.magnitude()) as f64;

        if hovered == Some(index) {
            let radius = radius * HOVER_ENLARGEMENT;
            canvas.fill_circle(Layer::Markers, screen, radius, color);
            canvas.stroke_circle(Layer::Markers, screen, radius + 2.0, 1.5, HIGHLIGHT);
        } else {
            canvas.fill_circle(Layer::Markers, screen, radius, color);
        }
    }
}

/// Screen positions of the supplier markers in dataset order, `None` for
/// markers on the far side.
pub fn supplier_positions(
    projection: &OrthographicProjection,
    scene: &GlobeScene,
) -> Vec<Option<ScreenPoint>> {
    scene
        .supplier_locations()
        .map(|point| projection.project(point))
        .collect()
}

#[cfg(test)]
mod tests {
    use glam::DVec2;
    use globe_common::{Facility, GeoPoint};
    use rstest::rstest;

    use super::*;
    use crate::{
        common::{projection::Viewport, rotation::RotationState},
        control::hover_controller::HoverHit,
        data::{globe_data::ParticleState, suppliers::tests::sample_suppliers},
        render::canvas::{DrawCommand, DrawList},
        settings::GlobeSettings,
    };

    fn facility_location() -> GeoPoint {
        GeoPoint::new(-98.5795, 39.8283)
    }

    fn fixture(rotation: RotationState) -> (GlobeData, GlobeScene) {
        let facility = Facility::new("Plant", -98.5795, 39.8283);
        let scene =
            GlobeScene::new(facility, sample_suppliers(), &GlobeSettings::default()).unwrap();
        let particles = (0..scene.routes().len())
            .map(|i| ParticleState::new(i as f64 * 0.2))
            .collect();
        let data = GlobeData::new(
            rotation,
            Viewport::new((800.0, 600.0).into(), 0.9),
            particles,
        );
        (data, scene)
    }

    #[rstest]
    #[case(vec![], 0)]
    #[case(vec![None, None], 0)]
    #[case(vec![Some(DVec2::ZERO), Some(DVec2::X)], 1)]
    #[case(vec![Some(DVec2::ZERO), Some(DVec2::X), None, Some(DVec2::Y), Some(DVec2::ONE), Some(DVec2::ZERO), None], 2)]
    #[case(vec![Some(DVec2::ZERO), None, Some(DVec2::X), None, Some(DVec2::Y)], 3)]
    fn runs_split_at_hidden_vertices(
        #[case] points: Vec<Option<ScreenPoint>>,
        #[case] expected: usize,
    ) {
        let visible = points.iter().flatten().count();
        let runs = visible_runs(points);
        assert_eq!(runs.len(), expected);
        assert_eq!(runs.iter().map(Vec::len).sum::<usize>(), visible);
    }

    #[test]
    fn layers_are_drawn_back_to_front() {
        let (data, scene) = fixture(RotationState::centered_on(facility_location()));
        let mut list = DrawList::new();
        draw_frame(&mut list, &data, &scene);

        assert_eq!(list.commands()[0], DrawCommand::Clear);
        let layers = list
            .commands()
            .iter()
            .filter_map(DrawCommand::layer)
            .collect_vec();
        assert!(layers.windows(2).all(|pair| pair[0] <= pair[1]));
        assert!(layers.contains(&Layer::Routes));
        assert!(layers.contains(&Layer::Markers));
    }

    #[test]
    fn route_runs_only_contain_visible_samples() {
        // looking at the antimeridian, the routes cross the horizon
        let (data, scene) = fixture(RotationState::new(-170.0, -20.0, 0.0));
        let projection = data.projection();
        let mut list = DrawList::new();
        draw_frame(&mut list, &data, &scene);

        // a visible sample with no visible neighbour cannot form a segment
        let drawable_samples = scene
            .routes()
            .iter()
            .map(|route| {
                let visible = route
                    .arc
                    .vectors()
                    .iter()
                    .map(|&v| projection.project_cartesian(v).is_some())
                    .collect_vec();
                (0..visible.len())
                    .filter(|&i| {
                        visible[i]
                            && ((i > 0 && visible[i - 1])
                                || visible.get(i + 1).copied().unwrap_or(false))
                    })
                    .count()
            })
            .sum::<usize>();
        let hidden_samples = scene
            .routes()
            .iter()
            .flat_map(|route| route.arc.vectors())
            .filter(|&&v| projection.project_cartesian(v).is_none())
            .count();
        let drawn_samples = list
            .in_layer(Layer::Routes)
            .map(|command| match command {
                DrawCommand::StrokePolyline { points, .. } => points.len(),
                other => panic!("unexpected route command {other:?}"),
            })
            .sum::<usize>();
        assert_eq!(drawn_samples, drawable_samples);
        assert!(drawn_samples > 0);
        assert!(hidden_samples > 0);
    }

    #[test]
    fn only_visible_particles_are_drawn() {
        let (mut data, scene) = fixture(RotationState::new(-170.0, -20.0, 0.0));
        let projection = data.projection();
        let (mut drawn_total, mut hidden_total) = (0, 0);

        for step in 0..20 {
            data.particles = (0..scene.routes().len())
                .map(|i| ParticleState::new(i as f64 * 0.2 + step as f64 * 0.05))
                .collect();
            let mut list = DrawList::new();
            draw_frame(&mut list, &data, &scene);

            let expected = scene
                .routes()
                .iter()
                .zip(&data.particles)
                .filter(|(route, particle)| {
                    projection
                        .project_cartesian(route.arc.vector_at(particle.progress()))
                        .is_some()
                })
                .count();
            let drawn = list
                .in_layer(Layer::Particles)
                .filter(|command| matches!(command, DrawCommand::FillCircle { .. }))
                .count();

            assert_eq!(drawn, expected);
            drawn_total += drawn;
            hidden_total += scene.routes().len() - drawn;
        }
        // the sweep saw both sides of the horizon
        assert!(drawn_total > 0);
        assert!(hidden_total > 0);
    }

    #[test]
    fn hidden_suppliers_have_no_marker() {
        let (data, scene) = fixture(RotationState::default());
        let mut list = DrawList::new();
        draw_frame(&mut list, &data, &scene);

        let expected = supplier_positions(&data.projection(), &scene)
            .iter()
            .flatten()
            .count();
        let drawn = list
            .in_layer(Layer::Markers)
            .filter(|command| matches!(command, DrawCommand::FillCircle { .. }))
            .count();
        // the facility is behind the globe at this rotation
        assert_eq!(data.projection().project(facility_location()), None);
        assert_eq!(drawn, expected);
        assert!(expected < scene.suppliers().len());
    }

    #[test]
    fn hovered_supplier_gets_a_ring() {
        let (mut data, scene) = fixture(RotationState::centered_on(facility_location()));
        let mut plain = DrawList::new();
        draw_frame(&mut plain, &data, &scene);

        // Monterrey faces the viewer from the facility
        data.hover = Some(HoverHit {
            marker_index: 2,
            screen_position: DVec2::ZERO,
            distance: 0.0,
        });
        let mut hovered = DrawList::new();
        draw_frame(&mut hovered, &data, &scene);

        let rings = |list: &DrawList| {
            list.in_layer(Layer::Markers)
                .filter(|command| matches!(command, DrawCommand::StrokeCircle { .. }))
                .count()
        };
        assert_eq!(rings(&hovered), rings(&plain) + 1);
    }
}
