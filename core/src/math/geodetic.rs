//! Spherical-earth geometry between a ground observer and an airborne target.
//!
//! All angles at the API boundary are degrees; distances and heights are meters.

use crate::interface::{ObserverLocation, TelemetryRecord};
use serde::{Deserialize, Serialize};

/// Latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl From<&ObserverLocation> for GeoPoint {
    fn from(observer: &ObserverLocation) -> Self {
        Self::new(observer.latitude, observer.longitude)
    }
}

impl From<&TelemetryRecord> for GeoPoint {
    fn from(record: &TelemetryRecord) -> Self {
        Self::new(record.latitude, record.longitude)
    }
}

/// Initial great-circle bearing from `observer` to `target`, in [0, 360).
///
/// Coincident points give `atan2(0, 0) == 0`, so the result is 0 rather than NaN.
pub fn bearing(observer: GeoPoint, target: GeoPoint) -> f64 {
    let lat_o = observer.latitude.to_radians();
    let lat_t = target.latitude.to_radians();
    let d_lon = (target.longitude - observer.longitude).to_radians();

    let y = d_lon.sin() * lat_t.cos();
    let x = lat_o.cos() * lat_t.sin() - lat_o.sin() * lat_t.cos() * d_lon.cos();

    let azimuth = (y.atan2(x).to_degrees() + 360.0) % 360.0;
    // -1e-15 + 360 rounds to exactly 360
    if azimuth >= 360.0 {
        0.0
    } else {
        azimuth
    }
}

/// Great-circle distance along the surface (spherical law of cosines).
pub fn surface_distance(observer: GeoPoint, target: GeoPoint, earth_radius_m: f64) -> f64 {
    if observer == target {
        return 0.0;
    }
    let lat_o = observer.latitude.to_radians();
    let lat_t = target.latitude.to_radians();
    let d_lon = (target.longitude - observer.longitude).to_radians();

    let cos_angle = lat_o.sin() * lat_t.sin() + lat_o.cos() * lat_t.cos() * d_lon.cos();
    earth_radius_m * cos_angle.clamp(-1.0, 1.0).acos()
}

/// How far the surface falls below the observer's tangent plane after
/// `surface_distance_m` of travel.
pub fn curvature_height_drop(surface_distance_m: f64, earth_radius_m: f64) -> f64 {
    let central_angle = surface_distance_m / earth_radius_m;
    earth_radius_m * (1.0 - central_angle.cos())
}

/// Elevation above the observer's horizon in degrees, corrected by `curvature_drop_m`.
///
/// A target straight overhead (zero surface distance) is at +90, straight
/// below at -90, and level with the observer at 0.
pub fn elevation_angle(
    target_alt_m: f64,
    observer_alt_m: f64,
    surface_distance_m: f64,
    curvature_drop_m: f64,
) -> f64 {
    let rise = target_alt_m - observer_alt_m - curvature_drop_m;
    if surface_distance_m == 0.0 {
        return if rise > 0.0 {
            90.0
        } else if rise < 0.0 {
            -90.0
        } else {
            0.0
        };
    }
    (rise / surface_distance_m).atan().to_degrees()
}

/// Line-of-sight distance used for SNR normalization.
///
/// Uses the target's absolute altitude, not its height above the observer.
pub fn slant_range(surface_distance_m: f64, target_alt_m: f64) -> f64 {
    surface_distance_m.hypot(target_alt_m)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::EARTH_RADIUS_M;

    fn observer() -> GeoPoint {
        GeoPoint::new(46.4, 8.9)
    }

    #[test]
    fn bearing_stays_in_compass_range() {
        let origin = observer();
        for lat in (-90..=90).step_by(15) {
            for lon in (-180..=180).step_by(20) {
                let azimuth = bearing(origin, GeoPoint::new(lat as f64, lon as f64));
                assert!(
                    (0.0..360.0).contains(&azimuth),
                    "bearing to ({lat}, {lon}) was {azimuth}"
                );
            }
        }
    }

    #[test]
    fn bearing_to_self_is_zero() {
        let origin = observer();
        let azimuth = bearing(origin, origin);
        assert!(!azimuth.is_nan());
        assert_eq!(azimuth, 0.0);
    }

    #[test]
    fn bearing_cardinal_directions() {
        let origin = GeoPoint::new(0.0, 0.0);
        assert!((bearing(origin, GeoPoint::new(1.0, 0.0)) - 0.0).abs() < 1e-9);
        assert!((bearing(origin, GeoPoint::new(0.0, 1.0)) - 90.0).abs() < 1e-9);
        assert!((bearing(origin, GeoPoint::new(-1.0, 0.0)) - 180.0).abs() < 1e-9);
        assert!((bearing(origin, GeoPoint::new(0.0, -1.0)) - 270.0).abs() < 1e-9);
    }

    #[test]
    fn surface_distance_is_symmetric() {
        let a = observer();
        let b = GeoPoint::new(47.3, 7.1);
        let ab = surface_distance(a, b, EARTH_RADIUS_M);
        let ba = surface_distance(b, a, EARTH_RADIUS_M);
        assert!((ab - ba).abs() < 1e-6);
    }

    #[test]
    fn surface_distance_to_self_is_zero() {
        assert_eq!(surface_distance(observer(), observer(), EARTH_RADIUS_M), 0.0);
    }

    #[test]
    fn surface_distance_never_nan_for_close_points() {
        let a = observer();
        for step in 1..50 {
            let b = GeoPoint::new(a.latitude + step as f64 * 1e-9, a.longitude - 1e-10);
            let distance = surface_distance(a, b, EARTH_RADIUS_M);
            assert!(distance.is_finite(), "distance {distance} at step {step}");
            assert!(distance < 1.0);
        }
    }

    #[test]
    fn one_degree_of_latitude_is_about_111_km() {
        let distance = surface_distance(
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(1.0, 0.0),
            EARTH_RADIUS_M,
        );
        assert!((distance - 111_194.9).abs() < 1.0);
    }

    #[test]
    fn curvature_drop_matches_degree_per_meter_constant() {
        // 8.993e-6 degrees of arc per meter of ground distance
        for distance in [1_000.0, 13_503.2, 100_000.0, 250_000.0] {
            let exact = curvature_height_drop(distance, EARTH_RADIUS_M);
            let legacy =
                EARTH_RADIUS_M * (1.0 - (8.993e-6_f64 * distance).to_radians().cos());
            assert!(
                ((exact - legacy) / exact).abs() < 1e-4,
                "{distance} m: {exact} vs {legacy}"
            );
        }
    }

    #[test]
    fn curvature_drop_is_zero_at_observer() {
        assert_eq!(curvature_height_drop(0.0, EARTH_RADIUS_M), 0.0);
    }

    #[test]
    fn elevation_overhead_and_underfoot() {
        assert_eq!(elevation_angle(15_000.0, 470.0, 0.0, 0.0), 90.0);
        assert_eq!(elevation_angle(100.0, 470.0, 0.0, 0.0), -90.0);
        assert_eq!(elevation_angle(470.0, 470.0, 0.0, 0.0), 0.0);
    }

    #[test]
    fn elevation_drops_with_curvature() {
        let flat = elevation_angle(500.0, 0.0, 100_000.0, 0.0);
        let drop = curvature_height_drop(100_000.0, EARTH_RADIUS_M);
        let curved = elevation_angle(500.0, 0.0, 100_000.0, drop);
        assert!(curved < flat);
        assert!(curved < 0.0);
    }

    #[test]
    fn slant_range_uses_absolute_altitude() {
        assert_eq!(slant_range(3_000.0, 4_000.0), 5_000.0);
        assert_eq!(slant_range(0.0, 0.0), 0.0);
    }
}
