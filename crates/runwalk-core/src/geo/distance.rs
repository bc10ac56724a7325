//! Great-circle distance on a spherical earth.

use super::position::Position;

/// Mean earth radius in miles.
pub const EARTH_RADIUS_MILES: f64 = 3958.8;

/// Haversine distance between two fixes, in miles.
pub fn great_circle_miles(a: &Position, b: &Position) -> f64 {
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();

    let h = f64::sin(d_lat / 2.).powi(2)
        + f64::cos(lat1) * f64::cos(lat2) * f64::sin(d_lon / 2.).powi(2);
    // Rounding can push h a hair past 1 for antipodal points.
    let c = 2. * f64::asin(f64::sqrt(h.clamp(0., 1.)));

    EARTH_RADIUS_MILES * c
}

/// Distance travelled since the previous sample.
///
/// Zero for the first sample of a session.
pub fn distance_delta(previous: Option<&Position>, current: &Position) -> f64 {
    match previous {
        Some(prev) => great_circle_miles(prev, current),
        None => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn first_sample_has_no_delta() {
        assert_eq!(distance_delta(None, &Position::new(51.5, -0.12)), 0.0);
    }

    #[test]
    fn one_degree_of_latitude_is_about_69_miles() {
        let d = great_circle_miles(&Position::new(0.0, 0.0), &Position::new(1.0, 0.0));
        assert!((d - 69.09).abs() < 0.01, "got {d}");
    }

    #[test]
    fn london_to_paris() {
        let london = Position::new(51.5074, -0.1278);
        let paris = Position::new(48.8566, 2.3522);
        let d = great_circle_miles(&london, &paris);
        assert!((d - 213.5).abs() < 1.0, "got {d}");
    }

    #[test]
    fn antipodes_are_half_the_circumference() {
        let d = great_circle_miles(&Position::new(0.0, 0.0), &Position::new(0.0, 180.0));
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_MILES).abs() < 1e-6);
    }

    fn coordinate() -> impl Strategy<Value = Position> {
        (-90.0f64..=90.0, -180.0f64..=180.0).prop_map(|(lat, lon)| Position::new(lat, lon))
    }

    proptest! {
        #[test]
        fn identical_positions_have_zero_delta(p in coordinate()) {
            prop_assert_eq!(distance_delta(Some(&p), &p), 0.0);
        }

        #[test]
        fn delta_is_symmetric(a in coordinate(), b in coordinate()) {
            let ab = distance_delta(Some(&a), &b);
            let ba = distance_delta(Some(&b), &a);
            prop_assert!((ab - ba).abs() < 1e-9, "{} vs {}", ab, ba);
        }

        #[test]
        fn delta_is_bounded(a in coordinate(), b in coordinate()) {
            let d = distance_delta(Some(&a), &b);
            prop_assert!(d >= 0.0);
            prop_assert!(d <= std::f64::consts::PI * EARTH_RADIUS_MILES + 1e-6);
        }
    }
}
