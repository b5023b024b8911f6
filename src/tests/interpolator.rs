use std::sync::Arc;

use crate::{
    constants::FT_TO_M,
    prelude::{
        AircraftIcaoCode, AircraftModel, Callsign, ElevationCache, ElevationPlane,
        InMemoryInterpolationLogger, InterpolationSetup, Interpolator, InterpolatorMode, IsOnGround,
        OnGroundDetails, RemoteAircraftStore, WakeCategory, Epoch,
    },
    tests::{init_logger, situation_at, StaticHistory},
};

use rstest::*;

fn b738(callsign: &str) -> AircraftModel {
    let icao = AircraftIcaoCode::new("B738", "L2J", WakeCategory::Medium);
    AircraftModel::new(Callsign::new(callsign), "B738", icao)
}

fn interpolator(callsign: &str, store: &Arc<RemoteAircraftStore>) -> Interpolator {
    Interpolator::new(Callsign::new(callsign), store.clone(), store.clone(), None)
}

#[test]
fn empty_history() {
    init_logger();
    let store = Arc::new(RemoteAircraftStore::new());
    store.add_aircraft(b738("BAW1"));

    let mut interpolator = interpolator("BAW1", &store);
    let setup = InterpolationSetup::default();

    for t in [0.0, 1.0, 2.0] {
        let result = interpolator.get_interpolation(Epoch::from_gpst_seconds(t), &setup, 0);
        assert!(result.situation.is_null());
        assert!(!result.interpolation_status.is_interpolated());
        assert!(!result.interpolation_status.has_valid_situation());
        assert_eq!(result.interpolation_status.extra_info(), "no situations");
        assert!(result.parts.is_none());
    }

    assert_eq!(interpolator.interpolated_situations_counter(), 0);
    assert_eq!(interpolator.invalid_situations(), 0);
    assert!(interpolator.interpolation_messages().is_empty());
}

#[test]
fn unknown_aircraft() {
    init_logger();
    let store = Arc::new(RemoteAircraftStore::new());
    let mut interpolator = interpolator("UNK1", &store);

    let result = interpolator.get_interpolation(
        Epoch::from_gpst_seconds(10.0),
        &InterpolationSetup::default(),
        0,
    );
    assert!(result.situation.is_null());
    assert!(!result.interpolation_status.is_interpolated());
    assert_eq!(
        result.interpolation_status.extra_info(),
        "unknown aircraft 'UNK1'"
    );
}

#[rstest]
#[case(InterpolatorMode::Linear)]
#[case(InterpolatorMode::Spline)]
fn fast_cruise_midpoint(#[case] mode: InterpolatorMode) {
    init_logger();
    let store = Arc::new(RemoteAircraftStore::new());

    // adjusted: 6s and 11s
    let old = situation_at("DAL1", 0.0, 0.0, 0.0, 1000.0).with_ground_speed_kts(250.0);
    let new = situation_at("DAL1", 5.0, 0.0, 0.01, 1000.0).with_ground_speed_kts(250.0);
    store.insert_situation(old).unwrap();
    store.insert_situation(new).unwrap();

    let mut interpolator = interpolator("DAL1", &store);
    let setup = InterpolationSetup::default().with_mode(mode);
    let result = interpolator.get_interpolation(Epoch::from_gpst_seconds(8.5), &setup, 0);

    let status = &result.interpolation_status;
    assert!(status.is_interpolated(), "{}", status);
    assert!(status.is_interpolated_and_changed());
    assert_eq!(status.situations_count(), 2);

    let situation = &result.situation;
    let position = situation.position().unwrap();
    assert!(position.latitude_deg.abs() < 1.0E-9);
    assert!((position.longitude_deg - 0.005).abs() < 1.0E-6);
    assert!((position.altitude.value_m - 1000.0 * FT_TO_M).abs() < 1.0E-6);
    assert!((situation.ground_speed_kts - 250.0).abs() < 1.0E-9);

    assert_eq!(situation.on_ground(), IsOnGround::NotOnGround);
    assert_eq!(situation.on_ground_details(), OnGroundDetails::ByGuessing);

    assert_eq!(interpolator.interpolated_situations_counter(), 1);
    assert_eq!(interpolator.last_interpolated_situation(), Some(situation));
}

#[test]
fn same_situation_is_reported() {
    init_logger();
    let store = Arc::new(RemoteAircraftStore::new());
    store
        .insert_situation(
            situation_at("KLM1", 0.0, 52.3, 4.76, 2000.0).with_ground_speed_kts(180.0),
        )
        .unwrap();

    let mut interpolator = interpolator("KLM1", &store);
    let setup = InterpolationSetup::default();

    // a single situation is held
    let first = interpolator.get_interpolation(Epoch::from_gpst_seconds(7.0), &setup, 0);
    assert!(first.interpolation_status.is_interpolated());
    assert!(first.interpolation_status.is_interpolated_and_changed());

    let second = interpolator.get_interpolation(Epoch::from_gpst_seconds(7.1), &setup, 0);
    assert!(second.interpolation_status.is_interpolated());
    assert!(second.interpolation_status.is_same_situation());
    assert!(first.situation.is_same_state(&second.situation));
    assert_eq!(second.situation.adjusted_epoch(), Epoch::from_gpst_seconds(7.1));
}

#[test]
fn new_situations_are_picked_up() {
    init_logger();
    let store = Arc::new(RemoteAircraftStore::new());
    store
        .insert_situation(situation_at("AFR1", 0.0, 49.0, 2.5, 3000.0).with_ground_speed_kts(200.0))
        .unwrap();

    let mut interpolator = interpolator("AFR1", &store);
    let setup = InterpolationSetup::default();

    let result = interpolator.get_interpolation(Epoch::from_gpst_seconds(8.0), &setup, 0);
    assert_eq!(result.interpolation_status.situations_count(), 1);

    store
        .insert_situation(
            situation_at("AFR1", 5.0, 49.0, 2.51, 3000.0).with_ground_speed_kts(200.0),
        )
        .unwrap();

    let result = interpolator.get_interpolation(Epoch::from_gpst_seconds(8.5), &setup, 0);
    assert_eq!(result.interpolation_status.situations_count(), 2);
    let position = result.situation.position().unwrap();
    assert!((position.longitude_deg - 2.505).abs() < 1.0E-4);
}

#[test]
fn invalid_situation_keeps_last_valid_one() {
    init_logger();
    let callsign = Callsign::new("QFA1");

    // antipodal positions: the midpoint n-vector cannot be normalized
    let history = Arc::new(StaticHistory {
        situations: vec![
            situation_at("QFA1", 5.0, 0.0, 180.0, 35000.0).with_ground_speed_kts(480.0),
            situation_at("QFA1", 0.0, 0.0, 0.0, 35000.0).with_ground_speed_kts(480.0),
        ],
        ..Default::default()
    });

    let mut interpolator = Interpolator::new(callsign, history.clone(), history, None);
    let setup = InterpolationSetup::default();

    // old situation is held at its own time
    let valid = interpolator.get_interpolation(Epoch::from_gpst_seconds(6.0), &setup, 0);
    assert!(valid.interpolation_status.is_interpolated());
    assert!(valid.interpolation_status.has_valid_situation());

    let invalid = interpolator.get_interpolation(Epoch::from_gpst_seconds(8.5), &setup, 0);
    assert!(!invalid.interpolation_status.is_interpolated());
    assert!(invalid.interpolation_status.is_same_situation());
    assert!(invalid.interpolation_status.has_valid_situation());
    assert_eq!(invalid.situation, valid.situation);
    assert_eq!(interpolator.invalid_situations(), 1);

    let messages = interpolator.interpolation_messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("2500ms since last valid one"), "{}", messages[0]);

    // rate limited: at most once per time offset
    let _ = interpolator.get_interpolation(Epoch::from_gpst_seconds(8.5), &setup, 0);
    assert_eq!(interpolator.invalid_situations(), 2);
    assert_eq!(interpolator.interpolation_messages().len(), 1);

    // valid again, past the singularity
    let valid = interpolator.get_interpolation(Epoch::from_gpst_seconds(9.0), &setup, 0);
    assert!(valid.interpolation_status.is_interpolated());
    assert_eq!(interpolator.invalid_situations(), 2);
}

#[test]
fn never_valid_situation() {
    init_logger();
    let history = Arc::new(StaticHistory {
        situations: vec![
            situation_at("QFA2", 5.0, 0.0, 180.0, 35000.0),
            situation_at("QFA2", 0.0, 0.0, 0.0, 35000.0),
        ],
        ..Default::default()
    });

    let mut interpolator =
        Interpolator::new(Callsign::new("QFA2"), history.clone(), history, None);

    let result = interpolator.get_interpolation(
        Epoch::from_gpst_seconds(8.5),
        &InterpolationSetup::default(),
        0,
    );
    assert!(result.situation.is_null());
    assert!(!result.interpolation_status.is_interpolated());

    let messages = interpolator.interpolation_messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("never had a valid one"), "{}", messages[0]);
}

#[test]
fn taxiing_aircraft_below_scenery() {
    init_logger();
    const ELEVATION_M: f64 = 100.0;
    const CG_M: f64 = 3.0;

    let store = Arc::new(RemoteAircraftStore::new());
    store.add_aircraft(b738("EZY1").with_cg_m(CG_M));

    // network reports on ground, below the local scenery
    for (t, lon) in [(0.0, 8.5), (5.0, 8.5001)] {
        let mut situation =
            situation_at("EZY1", t, 47.45, lon, (ELEVATION_M + CG_M - 2.0) / FT_TO_M)
                .with_ground_speed_kts(15.0);
        situation.set_on_ground(IsOnGround::OnGround, OnGroundDetails::InFromNetwork);
        store.insert_situation(situation).unwrap();
    }

    let elevations = Arc::new(ElevationCache::default());
    elevations.insert(ElevationPlane::new(47.45, 8.50005, ELEVATION_M, 100.0));

    let mut interpolator = Interpolator::new(
        Callsign::new("EZY1"),
        store.clone(),
        store.clone(),
        Some(elevations),
    );

    let result = interpolator.get_interpolation(
        Epoch::from_gpst_seconds(8.5),
        &InterpolationSetup::default().with_pitch_on_ground_deg(Some(0.5)),
        0,
    );

    let situation = &result.situation;
    assert!(result.interpolation_status.is_interpolated());
    assert_eq!(situation.on_ground(), IsOnGround::OnGround);
    assert!(situation.has_ground_elevation());
    let altitude_m = situation.altitude().unwrap().value_m;
    assert!((altitude_m - (ELEVATION_M + CG_M)).abs() < 1.0E-6, "{}", altitude_m);
    assert!((situation.pitch_deg() - 0.5).abs() < 1.0E-9);
}

#[test]
fn interpolation_logs() {
    init_logger();
    let store = Arc::new(RemoteAircraftStore::new());
    store
        .insert_situation(situation_at("SWR1", 0.0, 46.0, 7.0, 9000.0).with_ground_speed_kts(300.0))
        .unwrap();
    store
        .insert_situation(
            situation_at("SWR1", 5.0, 46.0, 7.02, 9500.0).with_ground_speed_kts(300.0),
        )
        .unwrap();

    let logger = Arc::new(InMemoryInterpolationLogger::default());
    let mut interpolator = Interpolator::new(
        Callsign::new("SWR1"),
        store.clone(),
        store.clone(),
        None,
    )
    .with_logger(logger.clone());

    // logging disabled
    let setup = InterpolationSetup::default();
    let _ = interpolator.get_interpolation(Epoch::from_gpst_seconds(7.0), &setup, 0);
    assert!(logger.situation_logs(&Callsign::new("SWR1")).is_empty());

    let setup = setup.with_logging(true);
    let result = interpolator.get_interpolation(Epoch::from_gpst_seconds(8.5), &setup, 0);

    let log = logger
        .latest_situation_log(&Callsign::new("SWR1"))
        .unwrap();
    assert_eq!(log.mode, InterpolatorMode::Linear);
    assert!((log.fraction - 0.5).abs() < 1.0E-9);
    assert_eq!(log.situations_count, 2);
    assert_eq!(log.interpolated, result.situation);
    assert_eq!(logger.parts_logs(&Callsign::new("SWR1")).len(), 1);
}
