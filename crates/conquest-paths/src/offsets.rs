//! Precomputed path offsets at which troops reach building slots.
//!
//! The offset of a slot on a path is the fraction `index / len` of the
//! raw waypoint nearest to the slot. These tables feed the
//! `targeting_path_ids` entries of the buildings data sent with a
//! simulation request.

use std::collections::BTreeMap;

use conquest_core::types::Position;

use crate::error::PathError;
use crate::map::MapDocument;

/// slot id → (path id → offset in `[0, 1)`).
pub type TargetOffsets = BTreeMap<u32, BTreeMap<u32, f64>>;

/// Compute the offset table for every building slot on the map.
///
/// A slot may only target paths of its own territory.
pub fn target_offsets(map: &MapDocument) -> Result<TargetOffsets, PathError> {
    let mut table = TargetOffsets::new();
    for (_, territory) in map.territories() {
        for (&slot_id, slot) in &territory.building_slots {
            if slot.targeting_path_ids.is_empty() {
                continue;
            }
            let location = Position::new(slot.location[0], slot.location[1]);
            let entry = table.entry(slot_id).or_default();
            for &path_id in &slot.targeting_path_ids {
                let raw = territory
                    .paths
                    .get(&path_id)
                    .ok_or(PathError::SlotPathMissing { slot_id, path_id })?;
                let offset = closest_offset(&location, &raw.points).ok_or(
                    PathError::TooFewControlPoints {
                        path_id,
                        count: 0,
                    },
                )?;
                entry.insert(path_id, offset);
            }
        }
    }
    Ok(table)
}

/// Fraction `index / len` of the point nearest to `target`.
/// The first point wins ties. `None` for an empty path.
pub fn closest_offset(target: &Position, points: &[Position]) -> Option<f64> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, point) in points.iter().enumerate() {
        let d = point.range_to(target);
        if best.map_or(true, |(_, best_d)| d < best_d) {
            best = Some((idx, d));
        }
    }
    best.map(|(idx, _)| idx as f64 / points.len() as f64)
}
