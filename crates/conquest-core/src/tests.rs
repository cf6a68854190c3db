//! Tests for the shared vocabulary: geometry helpers and wire formats.

use crate::enums::*;
use crate::events::*;
use crate::state::*;
use crate::types::*;

// ---- Geometry ----

#[test]
fn test_range_to() {
    let a = Position::new(0.0, 0.0);
    let b = Position::new(3.0, 4.0);
    assert!((a.range_to(&b) - 5.0).abs() < 1e-12);
}

#[test]
fn test_bearing_axes() {
    let origin = Position::new(0.0, 0.0);
    assert!((origin.bearing_deg_to(&Position::new(1.0, 0.0)) - 0.0).abs() < 1e-12);
    assert!((origin.bearing_deg_to(&Position::new(0.0, 1.0)) - 90.0).abs() < 1e-12);
    assert!((origin.bearing_deg_to(&Position::new(0.0, -1.0)) + 90.0).abs() < 1e-12);
    // Due west is +180, never -180.
    assert!((origin.bearing_deg_to(&Position::new(-1.0, 0.0)) - 180.0).abs() < 1e-12);
    assert!((origin.bearing_deg_to(&Position::new(-1.0, -0.0)) - 180.0).abs() < 1e-12);
}

#[test]
fn test_normalize_degrees_range() {
    for deg in [-720.0, -540.0, -180.0, -90.0, 0.0, 179.9, 180.0, 360.0, 725.0] {
        let n = normalize_degrees(deg);
        assert!(n > -180.0 && n <= 180.0, "{deg} normalized to {n}");
    }
    assert!((normalize_degrees(-180.0) - 180.0).abs() < 1e-12);
    assert!((normalize_degrees(370.0) - 10.0).abs() < 1e-12);
}

#[test]
fn test_angle_diff_wraps() {
    assert!((angle_diff_deg(170.0, -170.0) - -20.0).abs() < 1e-9);
    assert!((angle_diff_deg(-170.0, 170.0) - 20.0).abs() < 1e-9);
    assert!((angle_diff_deg(10.0, 350.0) - 20.0).abs() < 1e-9);
}

#[test]
fn test_sim_time_has_no_drift() {
    let mut time = SimTime::default();
    for _ in 0..10_000 {
        time.advance(0.1);
    }
    assert_eq!(time.tick, 10_000);
    assert!((time.elapsed_secs - 1000.0).abs() < 1e-9);
}

// ---- Enums ----

#[test]
fn test_target_kind_integer_tags() {
    for (tag, kind) in [
        (1u8, TargetKind::City),
        (2, TargetKind::DefensiveBuilding),
        (3, TargetKind::GenerativeBuilding),
    ] {
        assert_eq!(TargetKind::try_from(tag), Ok(kind));
        assert_eq!(serde_json::to_string(&kind).unwrap(), tag.to_string());
        let back: TargetKind = serde_json::from_str(&tag.to_string()).unwrap();
        assert_eq!(back, kind);
    }
}

#[test]
fn test_target_kind_rejects_unknown_tag() {
    assert_eq!(TargetKind::try_from(4), Err(UnknownTargetKind(4)));
    assert!(serde_json::from_str::<TargetKind>("0").is_err());
    assert!(serde_json::from_str::<TargetKind>("7").is_err());
}

#[test]
fn test_troop_phase_terminal() {
    assert!(!TroopPhase::Scheduled.is_terminal());
    assert!(!TroopPhase::Moving.is_terminal());
    assert!(TroopPhase::ReachedTarget.is_terminal());
    assert!(TroopPhase::Destroyed.is_terminal());
    assert!(TroopPhase::ReachedPathEnd.is_terminal());
}

// ---- Events ----

#[test]
fn test_troop_event_wire_shape() {
    let event = TroopEvent {
        timestamp: 1.5,
        troop_id: 3,
        attack_unit_id: 1,
        path_id: 2,
        kind: TroopEventKind::Damage {
            damage: 60.0,
            remaining_health: 40.0,
        },
    };
    let value = serde_json::to_value(&event).unwrap();
    assert_eq!(value["event_type"], "damage");
    assert_eq!(value["troop_id"], 3);
    assert_eq!(value["damage"], 60.0);
    assert_eq!(value["remaining_health"], 40.0);

    let end = TroopEvent {
        kind: TroopEventKind::ReachedEndOfPath,
        ..event
    };
    let value = serde_json::to_value(&end).unwrap();
    assert_eq!(value["event_type"], "reached_end_of_path");
}

#[test]
fn test_turret_rotate_event_carries_angle() {
    let event = TurretEvent {
        timestamp: 0.2,
        turret_id: 1,
        defensive_building_id: 2,
        kind: TurretEventKind::Rotate { angle: -45.0 },
    };
    let value = serde_json::to_value(&event).unwrap();
    assert_eq!(value["event_type"], "rotate");
    assert_eq!(value["angle"], -45.0);
    let back: TurretEvent = serde_json::from_value(value).unwrap();
    assert_eq!(back, event);
}

// ---- Request contract ----

const REQUEST_JSON: &str = r#"{
    "map_id": 1,
    "attacks": [{
        "path_id": 7,
        "territory_id": 4,
        "outpost_id": 9,
        "attack_units": {
            "5": {"count": 2, "overall_delay": 1.0, "unit_delay": 0.5,
                  "targets": {"0.7": {"type": 2, "id": 11}, "0.3": {"type": 1, "id": 4}}},
            "3": {"count": 1, "overall_delay": 0.0, "unit_delay": 0.0,
                  "targets": [{"priority": 1.0, "type": 3, "id": 21}]}
        }
    }],
    "game_defensive_buildings": [{
        "id": 11, "defensive_building_id": 2, "damage": 20, "health_points": 300,
        "max_health_points": 300, "range": 3, "firerate": 6, "accuracy": 80,
        "location": [400, 1512]
    }],
    "attack_unit_types": [
        {"id": 5, "type": "infantry", "health_points": 100, "damage": 10, "speed": 2, "accuracy": 50},
        {"id": 3, "type": "jet", "health_points": 80, "damage": 30, "speed": 4, "accuracy": 70, "is_air": true}
    ],
    "buildings_data": {
        "defensive_buildings": {"11": {"targeting_path_ids": {"7": 0.4}}},
        "generative_buildings": {"21": {"generative_building_id": 8, "hp": "250.5",
                                        "targeting_path_ids": {"7": 0.6}}}
    }
}"#;

#[test]
fn test_request_parses_original_field_names() {
    let request: SimulationRequest = serde_json::from_str(REQUEST_JSON).unwrap();
    assert_eq!(request.map_id, 1);
    assert_eq!(request.attack_waves.len(), 1);
    assert_eq!(request.defensive_buildings.len(), 1);
    assert_eq!(request.unit_types.len(), 2);

    let turret = &request.defensive_buildings[0];
    assert!(turret.can_attack_air && turret.can_attack_ground);
    assert_eq!(turret.cone_angle, None);
    assert!(request.unit_types[1].is_air);
}

#[test]
fn test_attack_units_keep_document_order() {
    let request: SimulationRequest = serde_json::from_str(REQUEST_JSON).unwrap();
    let ids: Vec<u32> = request.attack_waves[0]
        .attack_units
        .iter()
        .map(|(id, _)| *id)
        .collect();
    assert_eq!(ids, vec![5, 3]);
}

#[test]
fn test_target_priorities_both_forms() {
    let request: SimulationRequest = serde_json::from_str(REQUEST_JSON).unwrap();
    let groups = &request.attack_waves[0].attack_units;

    let keyed = groups.get_index(0).unwrap().1.targets.to_weighted().unwrap();
    assert_eq!(keyed.len(), 2);
    assert_eq!(keyed[0].kind, TargetKind::DefensiveBuilding);
    assert!((keyed[0].priority - 0.7).abs() < 1e-12);
    assert_eq!(keyed[1].kind, TargetKind::City);

    let listed = groups.get_index(1).unwrap().1.targets.to_weighted().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].kind, TargetKind::GenerativeBuilding);
    assert_eq!(listed[0].id, 21);
}

#[test]
fn test_repeated_priority_key_keeps_last_target() {
    let targets: TargetPriorities = serde_json::from_str(
        r#"{"2": {"type": 2, "id": 11}, "1": {"type": 1, "id": 4}, "2": {"type": 3, "id": 21}}"#,
    )
    .unwrap();
    let weighted = targets.to_weighted().unwrap();
    assert_eq!(weighted.len(), 2);
    assert_eq!((weighted[0].kind, weighted[0].id), (TargetKind::GenerativeBuilding, 21));
    assert_eq!((weighted[1].kind, weighted[1].id), (TargetKind::City, 4));
}

#[test]
fn test_target_priorities_reports_bad_key() {
    let targets: TargetPriorities =
        serde_json::from_str(r#"{"high": {"type": 1, "id": 1}}"#).unwrap();
    assert_eq!(targets.to_weighted(), Err("high".to_string()));
}

#[test]
fn test_generative_hp_accepts_string_and_number() {
    let request: SimulationRequest = serde_json::from_str(REQUEST_JSON).unwrap();
    let building = &request.buildings_data.generative_buildings[&21];
    assert!((building.hp - 250.5).abs() < 1e-12);
    assert!((building.targeting_path_ids[&7] - 0.6).abs() < 1e-12);

    let numeric: GenerativeBuildingData =
        serde_json::from_str(r#"{"generative_building_id": 1, "hp": 40}"#).unwrap();
    assert!((numeric.hp - 40.0).abs() < 1e-12);

    let bad = serde_json::from_str::<GenerativeBuildingData>(
        r#"{"generative_building_id": 1, "hp": "lots"}"#,
    );
    assert!(bad.is_err());
}

#[test]
fn test_invalid_target_type_is_rejected() {
    let bad = REQUEST_JSON.replace(r#""type": 2, "id": 11"#, r#""type": 9, "id": 11"#);
    assert!(serde_json::from_str::<SimulationRequest>(&bad).is_err());
}
