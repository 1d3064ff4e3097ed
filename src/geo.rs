//! Great-circle math between geographic coordinates.
//!
//! This module is the computational core of the tracker: given two
//! (latitude, longitude) pairs in decimal degrees it computes the
//! great-circle surface distance in kilometers ([`haversine_distance_km`])
//! and the initial compass bearing from the first point toward the second
//! ([`initial_bearing_deg`]), which [`CompassPoint::from_bearing`] turns
//! into one of the sixteen principal compass labels shown in the UI.
//!
//! All functions are total over real-valued degrees. Latitudes beyond ±90
//! are accepted without validation; callers are expected to supply sane
//! geocoordinates (ours come straight from the geolocation API).

use std::fmt;

/// Mean Earth radius in kilometers, as used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two points, in kilometers.
///
/// Uses the haversine formula over a sphere of radius [`EARTH_RADIUS_KM`].
/// The result is non-negative, symmetric in its arguments, and zero (up to
/// floating-point epsilon) for coincident points.
///
/// # Arguments
///
/// * `lat1`, `lon1` - First point in decimal degrees (WGS84).
/// * `lat2`, `lon2` - Second point in decimal degrees (WGS84).
pub fn haversine_distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let a = (d_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    // Rounding can push `a` a hair past 1.0 for near-antipodal points,
    // which would make the sqrt below NaN.
    let a = a.min(1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Initial bearing from the first point toward the second, in degrees.
///
/// 0° is due north, increasing clockwise; the result is normalized into
/// `[0, 360)`. Bearing is deliberately not symmetric: the bearing back from
/// the second point is roughly the reciprocal (offset by 180°), drifting
/// further apart as the great circle curves over long distances.
///
/// Coincident points have no defined bearing; `atan2(0, 0)` is +0, so this
/// returns 0° (due north) for them by convention.
pub fn initial_bearing_deg(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let y = d_lambda.sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * d_lambda.cos();

    let deg = y.atan2(x).to_degrees().rem_euclid(360.0);
    // rem_euclid rounds back up to exactly 360.0 for tiny negative angles.
    if deg >= 360.0 {
        0.0
    } else {
        deg
    }
}

/// Compass direction from the first point toward the second.
///
/// Convenience over [`initial_bearing_deg`] + [`CompassPoint::from_bearing`].
pub fn compass_between(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> CompassPoint {
    CompassPoint::from_bearing(initial_bearing_deg(lat1, lon1, lat2, lon2))
}

/// One of the sixteen principal compass points, N through NNW.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompassPoint {
    N,
    NNE,
    NE,
    ENE,
    E,
    ESE,
    SE,
    SSE,
    S,
    SSW,
    SW,
    WSW,
    W,
    WNW,
    NW,
    NNW,
}

impl CompassPoint {
    /// All sixteen points, clockwise starting at north.
    pub const SEQUENCE: [CompassPoint; 16] = [
        CompassPoint::N,
        CompassPoint::NNE,
        CompassPoint::NE,
        CompassPoint::ENE,
        CompassPoint::E,
        CompassPoint::ESE,
        CompassPoint::SE,
        CompassPoint::SSE,
        CompassPoint::S,
        CompassPoint::SSW,
        CompassPoint::SW,
        CompassPoint::WSW,
        CompassPoint::W,
        CompassPoint::WNW,
        CompassPoint::NW,
        CompassPoint::NNW,
    ];

    /// Maps a bearing in degrees to its compass point.
    ///
    /// The circle is divided into sixteen 22.5° sectors centered on each
    /// point, so north covers [348.75, 360) and [0, 11.25). A bearing exactly
    /// on a sector boundary belongs to the clockwise neighbor (11.25° is
    /// NNE). Any real value is accepted; it is wrapped into [0, 360) first.
    pub fn from_bearing(deg: f64) -> Self {
        let sector = (deg.rem_euclid(360.0) / 22.5).round() as usize % 16;
        Self::SEQUENCE[sector]
    }

    /// Short label, e.g. "ESE".
    pub fn label(self) -> &'static str {
        match self {
            CompassPoint::N => "N",
            CompassPoint::NNE => "NNE",
            CompassPoint::NE => "NE",
            CompassPoint::ENE => "ENE",
            CompassPoint::E => "E",
            CompassPoint::ESE => "ESE",
            CompassPoint::SE => "SE",
            CompassPoint::SSE => "SSE",
            CompassPoint::S => "S",
            CompassPoint::SSW => "SSW",
            CompassPoint::SW => "SW",
            CompassPoint::WSW => "WSW",
            CompassPoint::W => "W",
            CompassPoint::WNW => "WNW",
            CompassPoint::NW => "NW",
            CompassPoint::NNW => "NNW",
        }
    }
}

impl fmt::Display for CompassPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DHAKA: (f64, f64) = (23.8103, 90.4125);
    const LONDON: (f64, f64) = (51.5074, -0.1278);

    #[test]
    fn distance_from_a_point_to_itself_is_zero() {
        for (lat, lon) in [DHAKA, LONDON, (0.0, 0.0), (-33.8688, 151.2093)] {
            assert!(haversine_distance_km(lat, lon, lat, lon).abs() < 1e-9);
        }
    }

    #[test]
    fn distance_is_symmetric() {
        let pairs = [
            (DHAKA, LONDON),
            ((37.7749, -122.4194), (40.7128, -74.0060)),
            ((-54.8019, -68.3030), (64.1466, -21.9426)),
        ];
        for ((lat1, lon1), (lat2, lon2)) in pairs {
            let there = haversine_distance_km(lat1, lon1, lat2, lon2);
            let back = haversine_distance_km(lat2, lon2, lat1, lon1);
            assert!((there - back).abs() < 1e-9, "{there} vs {back}");
        }
    }

    #[test]
    fn dhaka_to_london_is_about_eight_thousand_km() {
        let d = haversine_distance_km(DHAKA.0, DHAKA.1, LONDON.0, LONDON.1);
        assert!((d - 8000.0).abs() < 50.0, "got {d} km");
    }

    #[test]
    fn bearing_stays_in_range_and_always_has_a_label() {
        let points = [
            DHAKA,
            LONDON,
            (0.0, 0.0),
            (89.9, 45.0),
            (-89.9, -45.0),
            (10.0, 179.9),
            (10.0, -179.9),
        ];
        for &(lat1, lon1) in &points {
            for &(lat2, lon2) in &points {
                let b = initial_bearing_deg(lat1, lon1, lat2, lon2);
                assert!((0.0..360.0).contains(&b), "bearing {b} out of range");
                let point = CompassPoint::from_bearing(b);
                assert!(CompassPoint::SEQUENCE.contains(&point));
            }
        }
    }

    #[test]
    fn due_south_from_a_point_near_the_north_pole() {
        let b = initial_bearing_deg(89.9, 0.0, 0.0, 0.0);
        assert!((b - 180.0).abs() < 1e-9, "got {b}");
        assert_eq!(compass_between(89.9, 0.0, 0.0, 0.0), CompassPoint::S);
    }

    #[test]
    fn reciprocal_bearings_differ_by_about_half_a_turn() {
        // Nearby points, where the great circle is locally straight.
        let there = initial_bearing_deg(10.0, 10.0, 10.5, 10.5);
        let back = initial_bearing_deg(10.5, 10.5, 10.0, 10.0);
        assert!(
            ((back - there).rem_euclid(360.0) - 180.0).abs() < 2.0,
            "{there} vs {back}"
        );
        assert!((there - back).abs() > 1.0, "must not be equal");

        // Same meridian: exactly reciprocal.
        assert_eq!(initial_bearing_deg(10.0, 20.0, 30.0, 20.0), 0.0);
        let south = initial_bearing_deg(30.0, 20.0, 10.0, 20.0);
        assert!((south - 180.0).abs() < 1e-9, "got {south}");
    }

    #[test]
    fn coincident_points_fall_back_to_north() {
        let b = initial_bearing_deg(DHAKA.0, DHAKA.1, DHAKA.0, DHAKA.1);
        assert_eq!(b, 0.0);
        assert_eq!(CompassPoint::from_bearing(b), CompassPoint::N);
    }

    #[test]
    fn sector_boundaries_belong_to_the_clockwise_label() {
        assert_eq!(CompassPoint::from_bearing(0.0), CompassPoint::N);
        assert_eq!(CompassPoint::from_bearing(11.24), CompassPoint::N);
        assert_eq!(CompassPoint::from_bearing(11.25), CompassPoint::NNE);
        assert_eq!(CompassPoint::from_bearing(348.75), CompassPoint::N);
        assert_eq!(CompassPoint::from_bearing(348.74), CompassPoint::NNW);
        assert_eq!(CompassPoint::from_bearing(359.9), CompassPoint::N);
        assert_eq!(CompassPoint::from_bearing(101.25), CompassPoint::ESE);
        assert_eq!(CompassPoint::from_bearing(112.5), CompassPoint::ESE);
    }

    #[test]
    fn from_bearing_wraps_values_outside_the_circle() {
        assert_eq!(CompassPoint::from_bearing(360.0), CompassPoint::N);
        assert_eq!(CompassPoint::from_bearing(450.0), CompassPoint::E);
        assert_eq!(CompassPoint::from_bearing(-90.0), CompassPoint::W);
    }
}
