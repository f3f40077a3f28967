use crate::matching::domain::Coordinates;

/// Mean Earth radius used for every distance the service reports.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance in kilometres using the haversine formula.
pub fn distance_km(from: Coordinates, to: Coordinates) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let d_lat = (to.latitude - from.latitude).to_radians();
    let d_lon = (to.longitude - from.longitude).to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    // Rounding can push `a` past 1 for near-antipodal points.
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    const JAKARTA: Coordinates = Coordinates::new(-6.2, 106.8166);
    const LONDON: Coordinates = Coordinates::new(51.5074, -0.1278);

    #[test]
    fn identical_points_are_zero_apart() {
        assert_eq!(distance_km(JAKARTA, JAKARTA), 0.0);
        assert_eq!(distance_km(LONDON, LONDON), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let samples = [
            JAKARTA,
            LONDON,
            Coordinates::new(0.0, 0.0),
            Coordinates::new(89.9, 179.9),
            Coordinates::new(-89.9, -179.9),
            Coordinates::new(35.6762, 139.6503),
        ];
        for a in samples {
            for b in samples {
                assert_eq!(distance_km(a, b), distance_km(b, a), "{a:?} vs {b:?}");
            }
        }
    }

    #[test]
    fn one_degree_of_longitude_at_equator() {
        let d = distance_km(Coordinates::new(0.0, 0.0), Coordinates::new(0.0, 1.0));
        assert!((d - 111.19).abs() < 0.01, "got {d}");
    }

    #[test]
    fn antipodes_are_half_the_circumference() {
        let d = distance_km(Coordinates::new(0.0, 0.0), Coordinates::new(0.0, 180.0));
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-6);
    }

    #[test]
    fn antipodal_sweep_stays_finite() {
        let half_circumference = std::f64::consts::PI * EARTH_RADIUS_KM;
        for step in 0..=1800 {
            let latitude = -90.0 + f64::from(step) * 0.1;
            for longitude in [0.0, 45.0, 179.5] {
                let from = Coordinates::new(latitude, longitude);
                let to = Coordinates::new(-latitude, longitude - 180.0);
                let d = distance_km(from, to);
                assert!(d.is_finite(), "{from:?} vs {to:?} gave {d}");
                assert!(
                    (d - half_circumference).abs() < 0.01,
                    "{from:?} vs {to:?} gave {d}"
                );
            }
        }
    }

    #[test]
    fn rounding_case_near_the_pole_is_half_the_circumference() {
        let d = distance_km(
            Coordinates::new(-87.5, 0.0),
            Coordinates::new(87.5, -180.0),
        );
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 0.01, "got {d}");
    }

    #[test]
    fn london_to_jakarta_is_roughly_eleven_thousand_km() {
        let d = distance_km(LONDON, JAKARTA);
        assert!((11_600.0..11_800.0).contains(&d), "got {d}");
    }
}
