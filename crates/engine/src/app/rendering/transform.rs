use crate::app::Vec2;

/// Fraction of the remaining distance covered by one approach step.
pub const APPROACH_FACTOR: f32 = 0.2;

/// Where one local frame (a farm) sits on the shared map.
///
/// Local points are rotated by `angle_degrees` around the local origin and
/// then translated by `origin`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapPlacement {
    pub origin: Vec2,
    pub angle_degrees: f32,
}

impl Default for MapPlacement {
    fn default() -> Self {
        Self {
            origin: Vec2::default(),
            angle_degrees: 0.0,
        }
    }
}

impl MapPlacement {
    pub fn new(origin: Vec2, angle_degrees: f32) -> Self {
        Self {
            origin,
            angle_degrees,
        }
    }

    pub fn to_map(&self, local: Vec2) -> Vec2 {
        let (sin, cos) = self.angle_degrees.to_radians().sin_cos();
        Vec2 {
            x: cos * local.x - sin * local.y + self.origin.x,
            y: sin * local.x + cos * local.y + self.origin.y,
        }
    }
}

/// One exponential-smoothing step from `current` toward `target`.
pub fn approach(current: Vec2, target: Vec2, factor: f32) -> Vec2 {
    Vec2 {
        x: approach_scalar(current.x, target.x, factor),
        y: approach_scalar(current.y, target.y, factor),
    }
}

pub fn approach_scalar(current: f32, target: f32, factor: f32) -> f32 {
    (target - current) * factor + current
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_vec2_close(actual: Vec2, expected: Vec2, epsilon: f32) {
        assert!(
            (actual.x - expected.x).abs() <= epsilon,
            "x {} vs {}",
            actual.x,
            expected.x
        );
        assert!(
            (actual.y - expected.y).abs() <= epsilon,
            "y {} vs {}",
            actual.y,
            expected.y
        );
    }

    #[test]
    fn zero_angle_is_pure_translation() {
        let placement = MapPlacement::new(Vec2 { x: 10.0, y: -5.0 }, 0.0);
        let mapped = placement.to_map(Vec2 { x: 2.5, y: 4.0 });
        assert_eq!(mapped, Vec2 { x: 12.5, y: -1.0 });
    }

    #[test]
    fn quarter_turn_rotates_counter_clockwise_then_translates() {
        let placement = MapPlacement::new(Vec2 { x: 100.0, y: 50.0 }, 90.0);
        let mapped = placement.to_map(Vec2 { x: 10.0, y: 0.0 });
        assert_vec2_close(mapped, Vec2 { x: 100.0, y: 60.0 }, 1e-4);

        let mapped = placement.to_map(Vec2 { x: 0.0, y: 10.0 });
        assert_vec2_close(mapped, Vec2 { x: 90.0, y: 50.0 }, 1e-4);
    }

    #[test]
    fn half_turn_mirrors_around_origin() {
        let placement = MapPlacement::new(Vec2::default(), 180.0);
        let mapped = placement.to_map(Vec2 { x: 3.0, y: -2.0 });
        assert_vec2_close(mapped, Vec2 { x: -3.0, y: 2.0 }, 1e-4);
    }

    #[test]
    fn approach_covers_a_fifth_of_the_gap() {
        let next = approach(
            Vec2 { x: 0.0, y: 100.0 },
            Vec2 { x: 50.0, y: 0.0 },
            APPROACH_FACTOR,
        );
        assert_vec2_close(next, Vec2 { x: 10.0, y: 80.0 }, 1e-4);
    }

    #[test]
    fn approach_distance_strictly_decreases_without_reaching_target() {
        let target = Vec2 { x: 500.0, y: 130.0 };
        let mut current = Vec2 { x: 100.0, y: 150.0 };
        let mut last_distance = current.distance(target);
        for frame in 0..40 {
            current = approach(current, target, APPROACH_FACTOR);
            let distance = current.distance(target);
            assert!(distance < last_distance, "frame {frame}: {distance} >= {last_distance}");
            assert!(distance > 0.0, "frame {frame} reached the target");
            last_distance = distance;
        }
    }

    #[test]
    fn approach_retargets_mid_flight() {
        let mut current = Vec2::default();
        current = approach(current, Vec2 { x: 100.0, y: 0.0 }, APPROACH_FACTOR);
        current = approach(current, Vec2 { x: -100.0, y: 0.0 }, APPROACH_FACTOR);
        assert_vec2_close(current, Vec2 { x: -4.0, y: 0.0 }, 1e-4);
    }
}
