//! Fixed kinematic constants. Not stock- or weight-dependent.

/// Cruise speed: 40 km/h in m/s.
pub const TRAIN_SPEED: f64 = 40.0 / 3.6;
/// m/s².
pub const ACCELERATION: f64 = 1.0;
/// m/s². Shared by service braking, coasting and buffer-stop braking.
pub const DECELERATION: f64 = 3.0;
/// A `MoveTo` completes when the head is this close to its goal, in meters.
pub const ARRIVAL_THRESHOLD: f64 = 0.5;
/// ...and no faster than this, in m/s.
pub const ARRIVAL_SPEED: f64 = 1.0;
/// Floor for the braking curve so the last centimeters are still covered.
pub const MIN_APPROACH_SPEED: f64 = 0.5;
/// Frame deltas above this are clamped before scaling by the time multiplier.
pub const MAX_FRAME_MS: f64 = 100.0;

/// Distance needed to stop from `speed` at [`DECELERATION`].
pub fn braking_distance(speed: f64) -> f64 {
    speed * speed / (2.0 * DECELERATION)
}

/// Highest speed from which the train can still stop within `distance`.
pub fn stopping_speed_limit(distance: f64) -> f64 {
    (2.0 * DECELERATION * distance.max(0.0)).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn braking_formula_is_consistent() {
        let speed = 9.0;
        let distance = braking_distance(speed);
        assert!((distance - 13.5).abs() < 1e-9);
        assert!((stopping_speed_limit(distance) - speed).abs() < 1e-9);
    }

    #[test]
    fn negative_distance_allows_no_speed() {
        assert!(stopping_speed_limit(-3.0).abs() < 1e-12);
    }
}
