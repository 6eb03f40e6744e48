use std::path::PathBuf;

use color_eyre::{Result, eyre::Context};
use glam::DVec2;
use globe_renderer::{
    app::GlobeView,
    control::input::GlobeEvent,
    data::suppliers::{read_suppliers, read_suppliers_from_path},
    render::{
        canvas::DrawList,
        mesh::{DEFAULT_TOLERANCE, tessellate},
        render_loop::ManualScheduler,
    },
    settings::GlobeSettings,
};

const DEFAULT_FRAMES: u32 = 120;
const DRAG_STEPS: u32 = 20;

const DEMO_SUPPLIERS: &str = "id,name,country,longitude,latitude,material,transport_mode,distance_km,emissions
d1,Shanghai Steel,China,121.4737,31.2304,steel,ship,11500,420.5
d2,Rotterdam Polymers,Netherlands,4.4792,51.9225,polymer,ship,8100,210
d3,Monterrey Castings,Mexico,-100.3161,25.6866,aluminium,truck,1600,95.25
d4,Toronto Glass,Canada,-79.3832,43.6532,glass,rail,1900,40
d5,Munich Electronics,Germany,11.5820,48.1351,electronics,air,8300,610
d6,Sao Paulo Textiles,Brazil,-46.6333,-23.5505,textile,ship,9000,180
d7,Busan Batteries,South Korea,129.0756,35.1796,lithium,air,10200,530";

/// Replays a scripted session against the globe without a window:
/// `globe-replay [suppliers.csv] [frames]`.
fn main() -> Result<()> {
    color_eyre::install()?;
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let dataset = args.next().map(PathBuf::from);
    let frames = args
        .next()
        .map(|frames| frames.parse::<u32>())
        .transpose()
        .wrap_err("frame count must be a non-negative integer")?
        .unwrap_or(DEFAULT_FRAMES);

    let settings = GlobeSettings::load(None).wrap_err("unable to load settings")?;
    let suppliers = match &dataset {
        Some(path) => read_suppliers_from_path(path)?,
        None => read_suppliers(DEMO_SUPPLIERS.as_bytes())?,
    };

    let mut scheduler = ManualScheduler::new();
    let mut canvas = DrawList::new();
    let mut view = GlobeView::mount(
        settings.facility.clone(),
        suppliers,
        (1280.0, 720.0).into(),
        &settings,
        &mut scheduler,
    )?;

    let stats = view.stats();
    log::info!(
        "{} suppliers, {:.1} total emissions over {:.0} km",
        stats.entry_count,
        stats.total_emissions,
        stats.total_distance_km
    );
    for (mode, emissions) in &stats.emissions_by_mode {
        log::info!("  {mode}: {emissions:.1}");
    }

    let center = view.data().viewport.center();
    view.handle_event(GlobeEvent::PointerDown(center));
    for frame in 0..frames {
        if frame < DRAG_STEPS {
            let step = (frame + 1) as f64;
            view.handle_event(GlobeEvent::PointerMove(center + DVec2::new(6.0 * step, 2.0 * step)));
        } else if frame == DRAG_STEPS {
            view.handle_event(GlobeEvent::PointerUp);
            log::info!("Drag released at rotation {:?}", view.rotation());
        }

        let Some(request) = scheduler.next_due() else {
            log::warn!("Render loop stopped at frame {frame}");
            break;
        };
        view.on_frame(request, &mut scheduler, &mut canvas);
    }
    // a run shorter than the drag still releases the pointer
    view.handle_event(GlobeEvent::PointerUp);

    let projection = view.data().projection();
    let first_visible = view
        .scene()
        .suppliers()
        .iter()
        .find_map(|supplier| projection.project(supplier.location()));
    match first_visible.and_then(|marker| view.handle_event(GlobeEvent::PointerMove(marker))) {
        Some(payload) => match payload.hovered {
            Some(hovered) => log::info!(
                "Hovering {} ({}, {} by {}) at {}",
                hovered.supplier.name,
                hovered.supplier.country,
                hovered.supplier.material,
                hovered.supplier.transport_mode,
                payload.screen_position
            ),
            None => log::info!("Nothing under the pointer at {}", payload.screen_position),
        },
        None => log::info!("No supplier faces the viewer"),
    }

    let mesh = tessellate(&canvas, DEFAULT_TOLERANCE).wrap_err("unable to tessellate frame")?;
    log::info!(
        "Last frame: {} draw commands, {} vertices, {} indices",
        canvas.len(),
        mesh.vertices.len(),
        mesh.indices.len()
    );

    view.teardown(&mut scheduler);
    Ok(())
}
