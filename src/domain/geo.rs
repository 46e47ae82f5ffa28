//! Great-circle distance between points on the Earth's surface.

/// Mean Earth radius used by the haversine formula, in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Default search radius for nearby cook lookups, in kilometres.
pub const DEFAULT_SEARCH_RADIUS_KM: f64 = 5.0;

/// A point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Distance to `other` in kilometres.
    pub fn distance_to(&self, other: &Coordinates) -> f64 {
        haversine_km(self.latitude, self.longitude, other.latitude, other.longitude)
    }

    /// Latitude/longitude box that fully contains the circle of `radius_km`
    /// around this point. Longitude bounds are `None` when the box would wrap
    /// past a pole or the antimeridian.
    pub fn bounding_box(&self, radius_km: f64) -> BoundingBox {
        let lat_delta = (radius_km / EARTH_RADIUS_KM).to_degrees();
        let min_lat = (self.latitude - lat_delta).max(-90.0);
        let max_lat = (self.latitude + lat_delta).min(90.0);

        let cos_lat = self.latitude.to_radians().cos();
        let longitude = if min_lat <= -90.0 || max_lat >= 90.0 || cos_lat <= f64::EPSILON {
            None
        } else {
            let lon_delta = lat_delta / cos_lat;
            let (min_lon, max_lon) = (self.longitude - lon_delta, self.longitude + lon_delta);
            (min_lon >= -180.0 && max_lon <= 180.0).then_some((min_lon, max_lon))
        };

        BoundingBox {
            latitude: (min_lat, max_lat),
            longitude,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub latitude: (f64, f64),
    pub longitude: Option<(f64, f64)>,
}

impl BoundingBox {
    pub fn contains(&self, point: &Coordinates) -> bool {
        let (min_lat, max_lat) = self.latitude;
        let lat_ok = point.latitude >= min_lat && point.latitude <= max_lat;
        let lon_ok = match self.longitude {
            Some((min_lon, max_lon)) => point.longitude >= min_lon && point.longitude <= max_lon,
            None => true,
        };
        lat_ok && lon_ok
    }
}

/// Haversine distance in kilometres between two points given in decimal
/// degrees. NaN inputs propagate.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    const MUMBAI: Coordinates = Coordinates {
        latitude: 18.9220,
        longitude: 72.8311,
    };
    const DELHI: Coordinates = Coordinates {
        latitude: 28.6139,
        longitude: 77.2090,
    };

    #[test]
    fn distance_to_self_is_zero() {
        assert_eq!(MUMBAI.distance_to(&MUMBAI), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let there = MUMBAI.distance_to(&DELHI);
        let back = DELHI.distance_to(&MUMBAI);
        assert!((there - back).abs() < 1e-9);
    }

    #[test]
    fn mumbai_to_delhi_is_about_1166_km() {
        let d = MUMBAI.distance_to(&DELHI);
        assert!((d - 1165.8).abs() < 1.0, "got {d}");
    }

    #[test]
    fn one_hundredth_degree_of_latitude_is_about_1_1_km() {
        let north = Coordinates::new(MUMBAI.latitude + 0.01, MUMBAI.longitude);
        let d = MUMBAI.distance_to(&north);
        assert!((d - 1.112).abs() < 0.01, "got {d}");
    }

    #[test]
    fn nan_propagates() {
        assert!(haversine_km(f64::NAN, 0.0, 0.0, 0.0).is_nan());
    }

    #[test]
    fn bounding_box_contains_points_within_radius() {
        let bbox = MUMBAI.bounding_box(5.0);
        let near = Coordinates::new(18.9310, 72.8311);
        assert!(MUMBAI.distance_to(&near) < 5.0);
        assert!(bbox.contains(&near));
        assert!(!bbox.contains(&DELHI));
    }

    #[test]
    fn bounding_box_near_pole_drops_longitude_filter() {
        let bbox = Coordinates::new(89.99, 10.0).bounding_box(5.0);
        assert_eq!(bbox.longitude, None);
        assert_eq!(bbox.latitude.1, 90.0);
    }
}
