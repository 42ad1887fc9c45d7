//! Unit tests for mts-core primitives.

#[cfg(test)]
mod ids {
    use crate::{EdgeId, NodeId, VehicleId};

    #[test]
    fn index_roundtrip() {
        let id = NodeId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(NodeId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(NodeId::INVALID.0, u32::MAX);
        assert_eq!(EdgeId::INVALID.0, u32::MAX);
        assert!(!VehicleId::default().is_valid());
        assert!(VehicleId(0).is_valid());
    }

    #[test]
    fn display() {
        assert_eq!(EdgeId(7).to_string(), "EdgeId(7)");
    }
}

#[cfg(test)]
mod geo {
    use crate::{Bounds, GeoPoint};

    #[test]
    fn zero_distance() {
        let p = GeoPoint::new(48.78, 9.18);
        assert!(p.distance_m(p) < 0.01);
    }

    #[test]
    fn one_degree_latitude() {
        let a = GeoPoint::new(48.0, 9.0);
        let b = GeoPoint::new(49.0, 9.0);
        let d = a.distance_m(b);
        assert!((d - 111_195.0).abs() < 500.0, "got {d}");
    }

    #[test]
    fn bearing_quadrants() {
        let o = GeoPoint::new(0.0, 0.0);
        let east = o.bearing_to(GeoPoint::new(0.0, 1.0));
        let north = o.bearing_to(GeoPoint::new(1.0, 0.0));
        assert!(east.abs() < 1e-6);
        assert!((north - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn lerp_clamps() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(2.0, 4.0);
        assert_eq!(a.lerp(b, 0.5), GeoPoint::new(1.0, 2.0));
        assert_eq!(a.lerp(b, 3.0), b);
    }

    #[test]
    fn bounds_from_points() {
        let b = Bounds::from_points([GeoPoint::new(1.0, 5.0), GeoPoint::new(-1.0, 7.0)]);
        assert_eq!(b, Bounds::new(-1.0, 5.0, 1.0, 7.0));
        assert!(b.contains(GeoPoint::new(0.0, 6.0)));
        assert!(!b.contains(GeoPoint::new(2.0, 6.0)));
        assert!(Bounds::from_points(std::iter::empty()).is_empty());
    }

    #[test]
    fn polygon_membership() {
        let square = [
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0, 2.0),
            GeoPoint::new(2.0, 2.0),
            GeoPoint::new(2.0, 0.0),
        ];
        assert!(crate::point_in_polygon(GeoPoint::new(1.0, 1.0), &square));
        assert!(!crate::point_in_polygon(GeoPoint::new(3.0, 1.0), &square));
        assert!(!crate::point_in_polygon(GeoPoint::new(1.0, 1.0), &square[..2]));
    }
}

#[cfg(test)]
mod config {
    use crate::ScenarioConfig;

    #[test]
    fn defaults_are_valid() {
        let cfg = ScenarioConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.meters_per_cell, 7.5);
        assert!(cfg.crossing.driving_on_the_right);
        assert!(!cfg.crossing.only_one_vehicle_enabled);
    }

    #[test]
    fn rejects_bad_values() {
        let mut cfg = ScenarioConfig::default();
        cfg.meters_per_cell = 0.0;
        assert!(cfg.validate().is_err());

        let mut cfg = ScenarioConfig::default();
        cfg.dawdle_factor = 1.5;
        assert!(cfg.validate().is_err());

        let mut cfg = ScenarioConfig::default();
        cfg.global_max_velocity = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn crossing_bits_round_trip() {
        use crate::CrossingLogicConfig;

        let cfg = CrossingLogicConfig {
            priority_to_the_right_enabled: false,
            only_one_vehicle_enabled: true,
            ..CrossingLogicConfig::default()
        };
        assert_eq!(cfg.to_bits(), 0b1_1011);
        assert_eq!(CrossingLogicConfig::from_bits(cfg.to_bits()), cfg);
    }

    #[test]
    fn cells_round_up() {
        let cfg = ScenarioConfig::default();
        assert_eq!(cfg.cells_for(7.5), 1);
        assert_eq!(cfg.cells_for(7.6), 2);
        assert_eq!(cfg.cells_for(0.0), 1);
    }
}

#[cfg(test)]
mod rng {
    use crate::{SimRng, VehicleId, VehicleRng};

    #[test]
    fn deterministic_same_seed() {
        let mut r1 = VehicleRng::new(12345, VehicleId(0));
        let mut r2 = VehicleRng::new(12345, VehicleId(0));
        for _ in 0..100 {
            assert_eq!(r1.gen_bool(0.5), r2.gen_bool(0.5));
        }
    }

    #[test]
    fn different_vehicles_differ() {
        let mut r0 = VehicleRng::new(1, VehicleId(0));
        let mut r1 = VehicleRng::new(1, VehicleId(1));
        let a: Vec<bool> = (0..64).map(|_| r0.gen_bool(0.5)).collect();
        let b: Vec<bool> = (0..64).map(|_| r1.gen_bool(0.5)).collect();
        assert_ne!(a, b);
    }

    #[test]
    fn gen_bool_extremes() {
        let mut rng = VehicleRng::new(0, VehicleId(0));
        assert!(!rng.gen_bool(0.0));
        assert!(rng.gen_bool(1.0));
    }

    #[test]
    fn choose_empty_is_none() {
        let mut rng = SimRng::new(3);
        let empty: [u8; 0] = [];
        assert!(rng.choose(&empty).is_none());
        assert_eq!(rng.choose(&[9]), Some(&9));
    }
}

#[cfg(test)]
mod metrics {
    use crate::Metrics;

    #[test]
    fn counters_accumulate() {
        let m = Metrics::new();
        m.record_route(10);
        m.record_route(5);
        m.record_spawn();
        m.record_despawn();
        m.record_crossings(3);
        let s = m.snapshot();
        assert_eq!(s.routes_computed, 2);
        assert_eq!(s.labels_settled, 15);
        assert_eq!(s.vehicles_spawned, 1);
        assert_eq!(s.vehicles_despawned, 1);
        assert_eq!(s.crossings_granted, 3);
    }
}
