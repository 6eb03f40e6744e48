use glam::Vec3;
use globe_common::{DatasetStats, Facility, GeoPoint, Supplier, TransportMode};

use crate::{
    common::arc::ArcSample,
    render::{base_map::BaseMap, color::ColorEncoder},
    settings::{GlobeSettings, SettingsError},
};

/// Supplier-to-facility route. Endpoints never change, so the sampled arc
/// and its color are computed once.
#[derive(Clone, Debug, PartialEq)]
pub struct RouteEdge {
    pub supplier_index: usize,
    pub source: GeoPoint,
    pub target: GeoPoint,
    pub magnitude: f64,
    pub transport_mode: TransportMode,
    pub color: Vec3,
    pub arc: ArcSample,
}

/// Static part of the globe: dataset, derived routes and decorative
/// geometry. Supplied at mount and never mutated afterwards.
#[derive(Clone, Debug)]
pub struct GlobeScene {
    facility: Facility,
    suppliers: Vec<Supplier>,
    routes: Vec<RouteEdge>,
    base_map: BaseMap,
    stats: DatasetStats,
    encoder: ColorEncoder,
}

impl GlobeScene {
    pub fn new(
        facility: Facility,
        suppliers: Vec<Supplier>,
        settings: &GlobeSettings,
    ) -> Result<Self, SettingsError> {
        let (low, high) = settings.emission_colors()?;
        let encoder = ColorEncoder::new(low, high, DatasetStats::max_emissions(&suppliers));
        let target = facility.location();

        let routes = suppliers
            .iter()
            .enumerate()
            .map(|(supplier_index, supplier)| {
                let source = supplier.location();
                RouteEdge {
                    supplier_index,
                    source,
                    target,
                    magnitude: supplier.magnitude(),
                    transport_mode: supplier.transport_mode,
                    color: encoder.encode(supplier.magnitude()),
                    arc: ArcSample::build(source, target, settings.arc_samples),
                }
            })
            .collect::<Vec<_>>();

        let stats = DatasetStats::from_suppliers(&suppliers);
        log::debug!(
            "Built globe scene: {} routes to {}, total emissions {:.2}",
            routes.len(),
            facility.name,
            stats.total_emissions
        );

        Ok(Self {
            facility,
            suppliers,
            routes,
            base_map: BaseMap::new(settings.graticule_step_deg),
            stats,
            encoder,
        })
    }

    pub fn facility(&self) -> &Facility {
        &self.facility
    }

    pub fn suppliers(&self) -> &[Supplier] {
        &self.suppliers
    }

    pub fn routes(&self) -> &[RouteEdge] {
        &self.routes
    }

    pub fn base_map(&self) -> &BaseMap {
        &self.base_map
    }

    pub fn stats(&self) -> &DatasetStats {
        &self.stats
    }

    pub fn encoder(&self) -> &ColorEncoder {
        &self.encoder
    }

    pub fn supplier_locations(&self) -> impl Iterator<Item = GeoPoint> + '_ {
        self.suppliers.iter().map(Supplier::location)
    }
}
