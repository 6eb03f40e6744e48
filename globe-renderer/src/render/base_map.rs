use glam::DVec3;
use globe_common::GeoPoint;
use itertools::Itertools;

use crate::common::versor::cartesian;

/// Angular spacing of the vertices along graticule lines, in degrees.
const GRATICULE_RESOLUTION: f64 = 2.0;

/// Very coarse continent outlines as (longitude, latitude) rings. Decorative
/// context only.
const LANDMASSES: &[&[(f64, f64)]] = &[
    // North America
    &[
        (-168.0, 65.0),
        (-140.0, 70.0),
        (-95.0, 72.0),
        (-75.0, 62.0),
        (-55.0, 52.0),
        (-70.0, 43.0),
        (-81.0, 25.0),
        (-97.0, 26.0),
        (-105.0, 20.0),
        (-87.0, 14.0),
        (-79.0, 8.0),
        (-106.0, 23.0),
        (-117.0, 32.0),
        (-124.0, 40.0),
        (-125.0, 49.0),
        (-150.0, 60.0),
    ],
    // South America
    &[
        (-79.0, 8.0),
        (-60.0, 10.0),
        (-35.0, -5.0),
        (-39.0, -15.0),
        (-48.0, -26.0),
        (-58.0, -38.0),
        (-68.0, -55.0),
        (-75.0, -45.0),
        (-71.0, -18.0),
        (-81.0, -5.0),
    ],
    // Europe and Asia
    &[
        (-9.0, 43.0),
        (-9.0, 37.0),
        (3.0, 43.0),
        (15.0, 38.0),
        (28.0, 41.0),
        (35.0, 36.0),
        (48.0, 30.0),
        (57.0, 25.0),
        (67.0, 24.0),
        (77.0, 8.0),
        (88.0, 22.0),
        (98.0, 16.0),
        (104.0, 1.0),
        (109.0, 12.0),
        (122.0, 31.0),
        (122.0, 40.0),
        (130.0, 42.0),
        (141.0, 53.0),
        (163.0, 60.0),
        (180.0, 68.0),
        (140.0, 72.0),
        (105.0, 78.0),
        (70.0, 73.0),
        (40.0, 67.0),
        (25.0, 71.0),
        (5.0, 62.0),
        (8.0, 54.0),
        (-4.0, 48.0),
    ],
    // Africa
    &[
        (-17.0, 21.0),
        (-10.0, 35.0),
        (10.0, 37.0),
        (32.0, 31.0),
        (43.0, 12.0),
        (51.0, 11.0),
        (40.0, -15.0),
        (35.0, -25.0),
        (20.0, -35.0),
        (12.0, -17.0),
        (9.0, 4.0),
        (-8.0, 4.0),
        (-17.0, 14.0),
    ],
    // Australia
    &[
        (114.0, -22.0),
        (130.0, -12.0),
        (137.0, -12.0),
        (142.0, -11.0),
        (153.0, -25.0),
        (150.0, -37.0),
        (140.0, -38.0),
        (131.0, -31.0),
        (115.0, -34.0),
    ],
];

/// Static decorative geometry: graticule lines and landmass outlines,
/// converted to unit vectors once at mount.
#[derive(Clone, Debug, PartialEq)]
pub struct BaseMap {
    graticule: Vec<Vec<DVec3>>,
    landmasses: Vec<Vec<DVec3>>,
}

impl BaseMap {
    pub fn new(step_deg: f64) -> Self {
        Self {
            graticule: graticule(step_deg),
            landmasses: LANDMASSES
                .iter()
                .map(|ring| {
                    ring.iter()
                        .map(|&(lon, lat)| cartesian(GeoPoint::new(lon, lat)))
                        .collect()
                })
                .collect(),
        }
    }

    pub fn graticule(&self) -> &[Vec<DVec3>] {
        &self.graticule
    }

    pub fn landmasses(&self) -> &[Vec<DVec3>] {
        &self.landmasses
    }
}

/// Evenly spaced values in [start, end], both ends included.
fn steps(start: f64, end: f64, step: f64) -> impl Iterator<Item = f64> + Clone {
    let count = ((end - start) / step).round() as usize;
    (0..=count).map(move |i| start + (end - start) * i as f64 / count.max(1) as f64)
}

fn graticule(step_deg: f64) -> Vec<Vec<DVec3>> {
    if !(step_deg > 0.0) {
        return Vec::new();
    }

    // meridians stop short of the poles, where they all meet
    let meridians = steps(-180.0, 180.0 - step_deg, step_deg).map(|lon| {
        steps(-90.0 + step_deg, 90.0 - step_deg, GRATICULE_RESOLUTION)
            .map(|lat| cartesian(GeoPoint::new(lon, lat)))
            .collect_vec()
    });
    let parallels = steps(-90.0 + step_deg, 90.0 - step_deg, step_deg).map(|lat| {
        steps(-180.0, 180.0, GRATICULE_RESOLUTION)
            .map(|lon| cartesian(GeoPoint::new(lon, lat)))
            .collect_vec()
    });

    meridians
        .chain(parallels)
        .filter(|line| line.len() >= 2)
        .collect()
}
