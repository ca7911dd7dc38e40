use engine::{DrawSink, MapPlacement, Vec2};
use tracing::{info, warn};

use crate::config::{MapConfig, ViewerConfig};
use crate::farm::Farm;
use crate::snapshot::MapSnapshot;

/// Most farms a single match can have.
pub const MAX_FARMS: usize = 6;

/// Placements for `count` farms spread evenly on a ring around `center`.
///
/// Farm `i` sits at angle `i * 360 / count` and is rotated by the same angle,
/// so every farm's local +x axis points away from the center.
pub fn ring_layout(count: usize, config: &MapConfig) -> Vec<MapPlacement> {
    if count == 0 {
        return Vec::new();
    }
    let center = config.center();
    let step = 360.0 / count as f32;
    (0..count)
        .map(|index| {
            let angle_degrees = index as f32 * step;
            let (sin, cos) = angle_degrees.to_radians().sin_cos();
            MapPlacement::new(
                Vec2 {
                    x: center.x + config.ring_radius * cos,
                    y: center.y + config.ring_radius * sin,
                },
                angle_degrees,
            )
        })
        .collect()
}

/// Every farm of a match on one shared map, one per player slot.
#[derive(Debug)]
pub struct FarmMap {
    config: ViewerConfig,
    farms: Vec<Farm>,
}

impl FarmMap {
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            config,
            farms: Vec::new(),
        }
    }

    pub fn farms(&self) -> &[Farm] {
        &self.farms
    }

    pub fn farm(&self, slot: usize) -> Option<&Farm> {
        self.farms.get(slot)
    }

    /// Applies one tick to every farm, by slot order. Farms absent from the
    /// snapshot keep their current state.
    pub fn apply(&mut self, snapshot: &MapSnapshot) {
        let wanted = snapshot.farms.len();
        if wanted > MAX_FARMS {
            warn!(
                farms = wanted,
                max = MAX_FARMS,
                "snapshot_has_too_many_farms; ignoring extra slots"
            );
        }
        self.ensure_farms(wanted.min(MAX_FARMS));

        for (farm, farm_snapshot) in self.farms.iter_mut().zip(&snapshot.farms) {
            farm.update(farm_snapshot);
        }
    }

    pub fn draw<S: DrawSink + ?Sized>(&mut self, sink: &mut S) {
        for farm in &mut self.farms {
            farm.draw(sink);
        }
    }

    fn ensure_farms(&mut self, count: usize) {
        if count <= self.farms.len() {
            return;
        }
        let placements = ring_layout(count, &self.config.map);
        for (farm, placement) in self.farms.iter_mut().zip(&placements) {
            farm.set_placement(*placement);
        }
        for (slot, placement) in placements.iter().enumerate().skip(self.farms.len()) {
            self.farms.push(Farm::new(slot, *placement, &self.config));
        }
        info!(farms = count, "map_layout_updated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::RecordingSink;
    use serde_json::json;

    fn map_snapshot(value: serde_json::Value) -> MapSnapshot {
        serde_json::from_value(value).expect("map snapshot")
    }

    fn assert_close(actual: f32, expected: f32) {
        assert!((actual - expected).abs() < 1e-3, "{actual} vs {expected}");
    }

    #[test]
    fn ring_layout_spreads_farms_evenly() {
        let config = MapConfig {
            center_x: 10.0,
            center_y: 20.0,
            ring_radius: 100.0,
        };
        let placements = ring_layout(4, &config);
        let angles = placements
            .iter()
            .map(|placement| placement.angle_degrees)
            .collect::<Vec<_>>();
        assert_eq!(angles, vec![0.0, 90.0, 180.0, 270.0]);
        assert_close(placements[0].origin.x, 110.0);
        assert_close(placements[0].origin.y, 20.0);
        assert_close(placements[1].origin.x, 10.0);
        assert_close(placements[1].origin.y, 120.0);
        assert_close(placements[2].origin.x, -90.0);
    }

    #[test]
    fn ring_layout_of_zero_is_empty() {
        assert!(ring_layout(0, &MapConfig::default()).is_empty());
    }

    #[test]
    fn apply_creates_one_farm_per_slot_with_independent_state() {
        let mut map = FarmMap::new(ViewerConfig::default());
        map.apply(&map_snapshot(json!({
            "farms": [
                { "blocked": true, "employees": [{ "id": 1, "location": "FARM" }] },
                { "employees": [{ "id": 1, "location": "FIELD1" }, { "id": 2, "location": "FIELD1" }] },
            ],
        })));
        assert_eq!(map.farms().len(), 2);
        let first = map.farm(0).expect("farm 0");
        let second = map.farm(1).expect("farm 1");
        assert!(first.blocked());
        assert!(!second.blocked());
        assert_eq!(first.employee_ids(), vec![1]);
        assert_eq!(second.employee_ids(), vec![1, 2]);
        assert_eq!(first.placement().angle_degrees, 0.0);
        assert_eq!(second.placement().angle_degrees, 180.0);
    }

    #[test]
    fn growing_player_count_relayouts_existing_farms() {
        let mut map = FarmMap::new(ViewerConfig::default());
        map.apply(&map_snapshot(json!({ "farms": [{}] })));
        assert_eq!(map.farm(0).expect("farm").placement().angle_degrees, 0.0);

        map.apply(&map_snapshot(json!({ "farms": [{}, {}, {}] })));
        let angles = map
            .farms()
            .iter()
            .map(|farm| farm.placement().angle_degrees)
            .collect::<Vec<_>>();
        assert_eq!(angles, vec![0.0, 120.0, 240.0]);
        assert_eq!(map.farms()[2].slot(), 2);
    }

    #[test]
    fn missing_farms_keep_previous_state() {
        let mut map = FarmMap::new(ViewerConfig::default());
        map.apply(&map_snapshot(json!({
            "farms": [{}, { "employees": [{ "id": 4, "location": "FARM" }] }],
        })));
        map.apply(&map_snapshot(json!({ "farms": [{}] })));
        assert_eq!(map.farms().len(), 2);
        assert_eq!(map.farm(1).expect("farm").employee_ids(), vec![4]);
    }

    #[test]
    fn extra_farms_beyond_max_are_ignored() {
        let mut map = FarmMap::new(ViewerConfig::default());
        let farms = vec![json!({}); MAX_FARMS + 2];
        map.apply(&map_snapshot(json!({ "farms": farms })));
        assert_eq!(map.farms().len(), MAX_FARMS);
    }

    #[test]
    fn draw_visits_every_farm() {
        let mut map = FarmMap::new(ViewerConfig::default());
        map.apply(&map_snapshot(json!({
            "farms": [
                { "tractors": [{ "id": 1, "location": "FARM" }] },
                { "tractors": [{ "id": 1, "location": "FARM" }], "blocked": true },
            ],
        })));
        let mut sink = RecordingSink::default();
        map.draw(&mut sink);
        assert_eq!(sink.len(), 3);
    }
}
