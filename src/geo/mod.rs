use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::models::location::GeoPoint;

pub const FOCUS_DELTA: f64 = 0.05;

#[derive(Debug, Clone, Copy)]
pub struct BoundingBox {
    pub min_latitude: f64,
    pub max_latitude: f64,
    pub min_longitude: f64,
    pub max_longitude: f64,
}

pub const NYC_BOUNDS: BoundingBox = BoundingBox {
    min_latitude: 40.70,
    max_latitude: 40.80,
    min_longitude: -74.02,
    max_longitude: -73.92,
};

impl BoundingBox {
    pub fn contains(&self, point: &GeoPoint) -> bool {
        (self.min_latitude..=self.max_latitude).contains(&point.latitude)
            && (self.min_longitude..=self.max_longitude).contains(&point.longitude)
    }

    pub fn random_point<R: Rng + ?Sized>(&self, rng: &mut R) -> GeoPoint {
        GeoPoint {
            latitude: uniform(rng, self.min_latitude, self.max_latitude),
            longitude: uniform(rng, self.min_longitude, self.max_longitude),
        }
    }
}

fn uniform<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> f64 {
    min + rng.gen_range(0.0..1.0) * (max - min)
}

pub fn format_coordinates(point: &GeoPoint) -> String {
    format!("{:.4}, {:.4}", point.latitude, point.longitude)
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MapRegion {
    pub latitude: f64,
    pub longitude: f64,
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}

impl MapRegion {
    pub const DEFAULT: MapRegion = MapRegion {
        latitude: 40.75,
        longitude: -73.97,
        latitude_delta: 0.0,
        longitude_delta: 0.0,
    };

    pub fn around(point: &GeoPoint) -> Self {
        Self {
            latitude: point.latitude,
            longitude: point.longitude,
            latitude_delta: FOCUS_DELTA,
            longitude_delta: FOCUS_DELTA,
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::{MapRegion, NYC_BOUNDS, format_coordinates};
    use crate::models::location::GeoPoint;

    #[test]
    fn random_points_stay_inside_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let p = NYC_BOUNDS.random_point(&mut rng);
            assert!(NYC_BOUNDS.contains(&p), "{p:?} escaped the box");
        }
    }

    #[test]
    fn coordinates_are_rendered_with_four_decimals() {
        let p = GeoPoint::new(40.712_776, -74.005_974);
        assert_eq!(format_coordinates(&p), "40.7128, -74.0060");
    }

    #[test]
    fn region_around_point_uses_focus_delta() {
        let region = MapRegion::around(&GeoPoint::new(40.71, -74.0));
        assert_eq!(region.latitude, 40.71);
        assert_eq!(region.latitude_delta, 0.05);
        assert_eq!(region.longitude_delta, 0.05);
    }
}
