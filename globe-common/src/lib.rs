use std::collections::BTreeMap;

use approx::{AbsDiffEq, UlpsEq};
use serde::{Deserialize, Deserializer};
use strum::{Display, EnumIter, EnumString};

/// Geographic coordinate in degrees.
///
/// Longitude is kept in (-180, 180] and latitude in [-90, 90], whatever the
/// caller passes in.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct GeoPoint {
    longitude: f64,
    latitude: f64,
}

impl GeoPoint {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude: normalize_longitude(longitude),
            latitude: latitude.clamp(-90.0, 90.0),
        }
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (lon, lon_dir) = if self.longitude < 0.0 {
            (-self.longitude, 'W')
        } else {
            (self.longitude, 'E')
        };
        let (lat, lat_dir) = if self.latitude < 0.0 {
            (-self.latitude, 'S')
        } else {
            (self.latitude, 'N')
        };
        write!(f, "{lat:.4}{lat_dir} {lon:.4}{lon_dir}")
    }
}

impl<'de> Deserialize<'de> for GeoPoint {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            longitude: f64,
            latitude: f64,
        }

        let Raw {
            longitude,
            latitude,
        } = Raw::deserialize(deserializer)?;
        Ok(GeoPoint::new(longitude, latitude))
    }
}

impl AbsDiffEq for GeoPoint {
    type Epsilon = <f64 as AbsDiffEq>::Epsilon;

    fn default_epsilon() -> Self::Epsilon {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        // -180 and 180 are the same meridian
        let dlon = normalize_longitude(self.longitude - other.longitude);
        f64::abs_diff_eq(&dlon, &0.0, epsilon)
            && f64::abs_diff_eq(&self.latitude, &other.latitude, epsilon)
    }
}

impl UlpsEq for GeoPoint {
    fn default_max_ulps() -> u32 {
        f64::default_max_ulps()
    }

    fn ulps_eq(&self, other: &Self, epsilon: Self::Epsilon, max_ulps: u32) -> bool {
        let dlon = normalize_longitude(self.longitude - other.longitude);
        f64::ulps_eq(&dlon, &0.0, epsilon, max_ulps)
            && f64::ulps_eq(&self.latitude, &other.latitude, epsilon, max_ulps)
    }
}

/// Wraps any longitude into (-180, 180].
pub fn normalize_longitude(longitude: f64) -> f64 {
    let wrapped = (longitude + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped == -180.0 { 180.0 } else { wrapped }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    EnumString,
    Display,
    EnumIter,
    Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    Ship,
    Truck,
    Rail,
    Air,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Supplier {
    pub id: String,
    pub name: String,
    pub country: String,
    pub longitude: f64,
    pub latitude: f64,
    pub material: String,
    pub transport_mode: TransportMode,
    pub distance_km: f64,
    pub emissions: f64,
}

impl Supplier {
    pub fn location(&self) -> GeoPoint {
        GeoPoint::new(self.longitude, self.latitude)
    }

    /// Emissions clamped to be non-negative.
    pub fn magnitude(&self) -> f64 {
        self.emissions.max(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Facility {
    pub name: String,
    pub longitude: f64,
    pub latitude: f64,
}

impl Facility {
    pub fn new(name: impl Into<String>, longitude: f64, latitude: f64) -> Self {
        Self {
            name: name.into(),
            longitude,
            latitude,
        }
    }

    pub fn location(&self) -> GeoPoint {
        GeoPoint::new(self.longitude, self.latitude)
    }
}

/// Totals shown next to the globe. Computed once per dataset.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DatasetStats {
    pub total_emissions: f64,
    pub total_distance_km: f64,
    pub entry_count: usize,
    pub emissions_by_mode: BTreeMap<TransportMode, f64>,
}

impl DatasetStats {
    pub fn from_suppliers(suppliers: &[Supplier]) -> Self {
        suppliers
            .iter()
            .fold(DatasetStats::default(), |mut stats, supplier| {
                stats.total_emissions += supplier.magnitude();
                stats.total_distance_km += supplier.distance_km.max(0.0);
                stats.entry_count += 1;
                *stats
                    .emissions_by_mode
                    .entry(supplier.transport_mode)
                    .or_insert(0.0) += supplier.magnitude();
                stats
            })
    }

    pub fn max_emissions(suppliers: &[Supplier]) -> f64 {
        suppliers
            .iter()
            .map(Supplier::magnitude)
            .fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use approx::{assert_abs_diff_eq, assert_ulps_eq, assert_ulps_ne};

    use super::*;

    fn supplier(id: &str, mode: TransportMode, distance_km: f64, emissions: f64) -> Supplier {
        Supplier {
            id: id.to_owned(),
            name: format!("Supplier {id}"),
            country: "CN".to_owned(),
            longitude: 121.4737,
            latitude: 31.2304,
            material: "steel".to_owned(),
            transport_mode: mode,
            distance_km,
            emissions,
        }
    }

    #[test]
    fn geo_point_normalizes_longitude_and_clamps_latitude() {
        let point = GeoPoint::new(190.0, 95.0);
        assert_abs_diff_eq!(point.longitude(), -170.0);
        assert_abs_diff_eq!(point.latitude(), 90.0);

        assert_abs_diff_eq!(GeoPoint::new(-180.0, 0.0).longitude(), 180.0);
        assert_abs_diff_eq!(GeoPoint::new(540.0, 0.0).longitude(), 180.0);
        assert_abs_diff_eq!(GeoPoint::new(-540.5, -91.0).latitude(), -90.0);
        assert_abs_diff_eq!(GeoPoint::new(-540.5, 0.0).longitude(), 179.5);
    }

    #[test]
    fn geo_points_across_antimeridian_compare_equal() {
        assert_abs_diff_eq!(
            GeoPoint::new(180.0, 10.0),
            GeoPoint::new(-179.999_999_999_9, 10.0),
            epsilon = 1e-9
        );
        assert_ulps_eq!(
            GeoPoint::new(180.0, 10.0),
            GeoPoint::new(-179.999_999_999_9, 10.0),
            epsilon = 1e-9
        );
        assert_ulps_eq!(GeoPoint::new(-180.0, 5.0), GeoPoint::new(180.0, 5.0));
        assert_ulps_ne!(GeoPoint::new(179.0, 5.0), GeoPoint::new(-179.0, 5.0));
    }

    #[test]
    fn deserialize_supplier() {
        let json = r#"{
            "id": "s1",
            "name": "Shanghai Steel",
            "country": "China",
            "longitude": 121.4737,
            "latitude": 31.2304,
            "material": "steel",
            "transport_mode": "ship",
            "distance_km": 11000.0,
            "emissions": 42.5
        }"#;
        let supplier: Supplier = serde_json::from_str(json).unwrap();
        assert_eq!(supplier.transport_mode, TransportMode::Ship);
        assert_abs_diff_eq!(
            supplier.location(),
            GeoPoint::new(121.4737, 31.2304),
            epsilon = 1e-12
        );
    }

    #[test]
    fn deserialize_geo_point_normalizes() {
        let point: GeoPoint =
            serde_json::from_str(r#"{"longitude": 200.0, "latitude": -100.0}"#).unwrap();
        assert_abs_diff_eq!(point, GeoPoint::new(-160.0, -90.0));
    }

    #[test]
    fn transport_mode_parses_case_insensitively() {
        assert_eq!(TransportMode::from_str("Rail").unwrap(), TransportMode::Rail);
        assert_eq!(TransportMode::Air.to_string(), "air");
        assert!(TransportMode::from_str("bicycle").is_err());
    }

    #[test]
    fn stats_sum_dataset() {
        let suppliers = vec![
            supplier("a", TransportMode::Ship, 1000.0, 10.0),
            supplier("b", TransportMode::Truck, 250.0, 5.0),
            supplier("c", TransportMode::Ship, 750.0, -1.0),
        ];
        let stats = DatasetStats::from_suppliers(&suppliers);

        assert_eq!(stats.entry_count, 3);
        assert_abs_diff_eq!(stats.total_emissions, 15.0);
        assert_abs_diff_eq!(stats.total_distance_km, 2000.0);
        assert_abs_diff_eq!(stats.emissions_by_mode[&TransportMode::Ship], 10.0);
        assert_abs_diff_eq!(stats.emissions_by_mode[&TransportMode::Truck], 5.0);
        assert!(!stats.emissions_by_mode.contains_key(&TransportMode::Air));
        assert_abs_diff_eq!(DatasetStats::max_emissions(&suppliers), 10.0);
    }

    #[test]
    fn stats_of_empty_dataset() {
        assert_eq!(DatasetStats::from_suppliers(&[]), DatasetStats::default());
    }
}
