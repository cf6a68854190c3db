//! Path geometry, map parsing and offset precompute.

use conquest_core::constants::{DEMO_MAP_ID, DEMO_PATH_ID, DEMO_PATH_POINTS};
use conquest_core::types::Position;

use crate::error::PathError;
use crate::map::{MapCatalog, MapDocument};
use crate::offsets::{closest_offset, target_offsets};
use crate::path::{polyline_length, PathData};

const MAP_JSON: &str = r#"{
  "continents": {
    "1": {
      "continent_territories": {
        "4": {
          "paths": {
            "7": { "points": [ {"x": 0, "y": 0}, {"x": 100, "y": 0}, {"x": 200, "y": 0}, {"x": 300, "y": 0} ] },
            "8": { "points": [ {"x": 0, "y": 50}, {"x": 0, "y": 150} ] }
          },
          "building_slots": {
            "11": { "location": [210, 30], "targeting_path_ids": [7] },
            "12": { "location": [5, 140], "targeting_path_ids": [7, 8] },
            "13": { "location": [0, 0] }
          }
        }
      }
    }
  },
  "name": "ignored"
}"#;

fn straight(samples: usize) -> PathData {
    let cps = [Position::new(0.0, 0.0), Position::new(300.0, 400.0)];
    PathData::from_control_points(1, &cps, samples).unwrap()
}

fn demo_control_points() -> Vec<Position> {
    DEMO_PATH_POINTS
        .iter()
        .map(|&(x, y)| Position::new(x, y))
        .collect()
}

// ---- Resampling ----

#[test]
fn test_straight_line_length_and_heading() {
    let path = straight(1000);
    assert_eq!(path.points.len(), 1000);
    assert!((path.length - 500.0).abs() < 1e-9);
    let expected = 4.0_f64.atan2(3.0).to_degrees();
    for p in &path.points {
        assert!((p.angle - expected).abs() < 1e-9);
    }
}

#[test]
fn test_endpoints_match_control_points() {
    let cps = demo_control_points();
    let path = PathData::from_control_points(DEMO_PATH_ID, &cps, 1000).unwrap();
    let first = path.start();
    let last = path.end();
    assert!(first.range_to(&cps[0]) < 1e-9);
    assert!(last.range_to(&cps[4]) < 1e-9);
}

#[test]
fn test_curve_passes_through_interior_control_points() {
    // 5 knots over 1001 samples put knot k exactly on sample 250 * k.
    let cps = demo_control_points();
    let path = PathData::from_control_points(DEMO_PATH_ID, &cps, 1001).unwrap();
    for (k, cp) in cps.iter().enumerate() {
        let p = path.points[250 * k];
        assert!(
            Position::new(p.x, p.y).range_to(cp) < 1e-6,
            "knot {k} missed: {p:?}"
        );
    }
}

#[test]
fn test_last_heading_repeats_previous() {
    let path = PathData::from_control_points(DEMO_PATH_ID, &demo_control_points(), 500).unwrap();
    let n = path.points.len();
    assert_eq!(path.points[n - 1].angle, path.points[n - 2].angle);
}

#[test]
fn test_headings_in_range() {
    let path = PathData::from_control_points(DEMO_PATH_ID, &demo_control_points(), 1000).unwrap();
    for p in &path.points {
        assert!(p.angle > -180.0 && p.angle <= 180.0, "angle {}", p.angle);
    }
}

#[test]
fn test_length_is_sum_of_segments() {
    let path = PathData::from_control_points(DEMO_PATH_ID, &demo_control_points(), 200).unwrap();
    assert_eq!(path.length, polyline_length(&path.points));
    // At least as long as the chord between consecutive control points.
    let chords: f64 = demo_control_points()
        .windows(2)
        .map(|w| w[0].range_to(&w[1]))
        .sum();
    assert!(path.length >= chords - 1e-6);
}

#[test]
fn test_length_converges_with_sample_count() {
    let cps = demo_control_points();
    let coarse = PathData::from_control_points(DEMO_PATH_ID, &cps, 4000).unwrap();
    let fine = PathData::from_control_points(DEMO_PATH_ID, &cps, 8000).unwrap();
    let rel = (fine.length - coarse.length).abs() / fine.length;
    assert!(rel < 1e-4, "relative change {rel}");
}

#[test]
fn test_sample_index_rounds_to_nearest() {
    let path = straight(11);
    assert_eq!(path.sample_index(0.0), 0);
    assert_eq!(path.sample_index(0.04), 0);
    assert_eq!(path.sample_index(0.06), 1);
    assert_eq!(path.sample_index(1.0), 10);
    assert_eq!(path.sample_index(1.5), 10);
    assert_eq!(path.sample_index(-0.2), 0);
}

#[test]
fn test_two_samples_is_minimum() {
    let path = straight(2);
    assert_eq!(path.points.len(), 2);
    assert!((path.length - 500.0).abs() < 1e-9);
}

// ---- Errors ----

#[test]
fn test_too_few_samples_rejected() {
    let cps = [Position::new(0.0, 0.0), Position::new(1.0, 1.0)];
    let err = PathData::from_control_points(1, &cps, 1).unwrap_err();
    assert!(matches!(err, PathError::TooFewSamples(1)));
}

#[test]
fn test_too_few_control_points_rejected() {
    let cps = [Position::new(0.0, 0.0)];
    let err = PathData::from_control_points(3, &cps, 100).unwrap_err();
    assert!(matches!(
        err,
        PathError::TooFewControlPoints { path_id: 3, count: 1 }
    ));
}

#[test]
fn test_non_finite_control_point_rejected() {
    let cps = [Position::new(0.0, 0.0), Position::new(f64::NAN, 1.0)];
    let err = PathData::from_control_points(3, &cps, 100).unwrap_err();
    assert!(matches!(err, PathError::NonFiniteControlPoint { path_id: 3 }));
}

#[test]
fn test_unknown_map_and_path() {
    let catalog = MapCatalog::with_demo_map();
    assert!(matches!(
        catalog.path_data(99, DEMO_PATH_ID, 100),
        Err(PathError::MapNotFound { map_id: 99 })
    ));
    assert!(matches!(
        catalog.path_data(DEMO_MAP_ID, 99, 100),
        Err(PathError::PathNotFound { map_id: _, path_id: 99 })
    ));
}

// ---- Maps ----

#[test]
fn test_map_document_parses_nested_layout() {
    let map = MapDocument::from_json_str(MAP_JSON).unwrap();
    assert_eq!(map.territories().count(), 1);
    assert_eq!(map.control_points(7).map(<[Position]>::len), Some(4));
    assert_eq!(map.control_points(8).map(<[Position]>::len), Some(2));
    assert!(map.control_points(9).is_none());
}

#[test]
fn test_catalog_paths_data() {
    let mut catalog = MapCatalog::new();
    catalog.insert(3, MapDocument::from_json_str(MAP_JSON).unwrap());
    let paths = catalog.paths_data(3, [8, 7], 101).unwrap();
    assert_eq!(paths.keys().copied().collect::<Vec<_>>(), vec![7, 8]);
    assert!((paths[&7].length - 300.0).abs() < 1e-9);
    assert!((paths[&8].length - 100.0).abs() < 1e-9);
    assert!((paths[&8].heading_at(0.5) - 90.0).abs() < 1e-9);
}

#[test]
fn test_demo_map_registered() {
    let catalog = MapCatalog::with_demo_map();
    let path = catalog.path_data(DEMO_MAP_ID, DEMO_PATH_ID, 1000).unwrap();
    assert_eq!(path.path_id, DEMO_PATH_ID);
    assert!(path.length > 1400.0);
}

#[test]
fn test_load_dir_reads_only_map_files() {
    let dir = std::env::temp_dir().join(format!("conquest-maps-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("map12.json"), MAP_JSON).unwrap();
    std::fs::write(dir.join("notes.txt"), "not a map").unwrap();
    std::fs::write(dir.join("mapx.json"), "{}").unwrap();

    let catalog = MapCatalog::load_dir(&dir).unwrap();
    std::fs::remove_dir_all(&dir).unwrap();

    assert!(catalog.map(12).is_ok());
    assert!(matches!(catalog.map(0), Err(PathError::MapNotFound { map_id: 0 })));
    assert_eq!(catalog.path_data(12, 8, 11).unwrap().points.len(), 11);
}

// ---- Offsets ----

#[test]
fn test_closest_offset_divides_by_len() {
    let points = [
        Position::new(0.0, 0.0),
        Position::new(10.0, 0.0),
        Position::new(20.0, 0.0),
        Position::new(30.0, 0.0),
    ];
    assert_eq!(closest_offset(&Position::new(29.0, 3.0), &points), Some(0.75));
    assert_eq!(closest_offset(&Position::new(-5.0, 0.0), &points), Some(0.0));
    // Equidistant: first wins.
    assert_eq!(closest_offset(&Position::new(5.0, 0.0), &points), Some(0.0));
    assert_eq!(closest_offset(&Position::new(5.0, 0.0), &[]), None);
}

#[test]
fn test_target_offsets_for_map() {
    let map = MapDocument::from_json_str(MAP_JSON).unwrap();
    let table = target_offsets(&map).unwrap();
    assert_eq!(table.len(), 2, "slots without targeting paths are skipped");
    assert_eq!(table[&11][&7], 0.5);
    assert_eq!(table[&12][&7], 0.0);
    assert_eq!(table[&12][&8], 0.5);
}

#[test]
fn test_target_offsets_missing_path() {
    let json = MAP_JSON.replace("[7, 8]", "[7, 99]");
    let map = MapDocument::from_json_str(&json).unwrap();
    assert!(matches!(
        target_offsets(&map),
        Err(PathError::SlotPathMissing { slot_id: 12, path_id: 99 })
    ));
}
