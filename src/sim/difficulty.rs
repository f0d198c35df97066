//! Difficulty scaling
//!
//! Level is a pure function of score. Spawn rate, hazard speed and trail
//! length all derive from it.

use std::ops::RangeInclusive;

use rand::Rng;

use crate::tuning::Tuning;

/// `floor(score / level_step) + 1`
pub fn level_for_score(tuning: &Tuning, score: u64) -> u32 {
    let tier = score / tuning.level_step.max(1);
    u32::try_from(tier).unwrap_or(u32::MAX).saturating_add(1)
}

/// Progress toward the next level in `[0, 1)`
pub fn level_progress(tuning: &Tuning, score: u64) -> f32 {
    let step = tuning.level_step.max(1);
    (score % step) as f32 / step as f32
}

/// Ticks between hazard spawns: `max(min, base - step * level)`
pub fn spawn_interval(tuning: &Tuning, level: u32) -> u32 {
    tuning
        .spawn_interval_base
        .saturating_sub(tuning.spawn_interval_step.saturating_mul(level))
        .max(tuning.spawn_interval_min)
}

/// Roll a hazard speed: `uniform(min, max) + per_level * level`
pub fn hazard_speed<R: Rng>(tuning: &Tuning, level: u32, rng: &mut R) -> f32 {
    let base = if tuning.hazard_speed_max > tuning.hazard_speed_min {
        rng.random_range(tuning.hazard_speed_min..tuning.hazard_speed_max)
    } else {
        tuning.hazard_speed_min
    };
    base + tuning.hazard_speed_per_level * level as f32
}

/// Maximum number of trail points at `level`
pub fn trail_capacity(tuning: &Tuning, level: u32) -> usize {
    tuning
        .trail_base
        .saturating_add(tuning.trail_per_level.saturating_mul(level as usize))
}

/// Levels reached by moving from `old_score` to `new_score`, in order.
///
/// Yields one entry per threshold crossed, so a bonus that skips past a
/// multiple of the level step still levels up, and a score resting on a
/// threshold never fires twice.
pub fn level_ups(tuning: &Tuning, old_score: u64, new_score: u64) -> RangeInclusive<u32> {
    let from = level_for_score(tuning, old_score);
    let to = level_for_score(tuning, new_score);
    if to > from {
        (from + 1)..=to
    } else {
        RangeInclusive::new(1, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_level_thresholds() {
        let t = Tuning::default();
        assert_eq!(level_for_score(&t, 0), 1);
        assert_eq!(level_for_score(&t, 499), 1);
        assert_eq!(level_for_score(&t, 500), 2);
        assert_eq!(level_for_score(&t, 2400), 5);
        assert_eq!(level_for_score(&t, u64::MAX), u32::MAX);
    }

    #[test]
    fn test_spawn_interval_scenarios() {
        let t = Tuning::default();
        assert_eq!(spawn_interval(&t, 1), 42);
        assert_eq!(spawn_interval(&t, 5), 30);
        assert_eq!(spawn_interval(&t, 10), 15);
        assert_eq!(spawn_interval(&t, 20), 15);
        assert_eq!(spawn_interval(&t, u32::MAX), 15);
    }

    #[test]
    fn test_trail_capacity_grows_with_level() {
        let t = Tuning::default();
        assert_eq!(trail_capacity(&t, 1), 7);
        assert_eq!(trail_capacity(&t, 4), 13);
    }

    #[test]
    fn test_level_up_fires_once_per_crossing() {
        let t = Tuning::default();
        assert_eq!(level_ups(&t, 400, 500).collect::<Vec<_>>(), vec![2]);
        // Resting on the threshold does not re-fire
        assert_eq!(level_ups(&t, 500, 500).count(), 0);
        assert_eq!(level_ups(&t, 500, 600).count(), 0);
        // A bonus that jumps over a multiple still counts
        assert_eq!(level_ups(&t, 450, 550).collect::<Vec<_>>(), vec![2]);
        assert_eq!(level_ups(&t, 900, 2100).collect::<Vec<_>>(), vec![3, 4, 5]);
        // Scores never go down, but a reset must not fire either
        assert_eq!(level_ups(&t, 1500, 0).count(), 0);
    }

    #[test]
    fn test_no_level_up_past_level_cap() {
        let t = Tuning::default();
        let capped = 500 * u32::MAX as u64;
        assert_eq!(level_for_score(&t, capped), u32::MAX);
        assert_eq!(level_ups(&t, capped, capped + 100).count(), 0);
        assert_eq!(level_ups(&t, u64::MAX - 100, u64::MAX).count(), 0);
        assert_eq!(
            level_ups(&t, capped - 600, capped - 500).collect::<Vec<_>>(),
            vec![u32::MAX]
        );
    }

    #[test]
    fn test_hazard_speed_range() {
        let t = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(3);
        for _ in 0..200 {
            let speed = hazard_speed(&t, 4, &mut rng);
            assert!((4.0..7.0).contains(&speed), "speed {speed} out of range");
        }
    }

    proptest! {
        #[test]
        fn level_matches_formula(score in 0u64..10_000_000) {
            let t = Tuning::default();
            prop_assert_eq!(level_for_score(&t, score) as u64, score / 500 + 1);
        }

        #[test]
        fn level_is_monotonic(a in 0u64..10_000_000, b in 0u64..10_000_000) {
            let t = Tuning::default();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(level_for_score(&t, lo) <= level_for_score(&t, hi));
        }

        #[test]
        fn level_ups_count_matches_level_delta(old in 0u64..100_000, gain in 0u64..5_000) {
            let t = Tuning::default();
            let new = old + gain;
            let ups = level_ups(&t, old, new).count() as u32;
            prop_assert_eq!(ups, level_for_score(&t, new) - level_for_score(&t, old));
        }

        #[test]
        fn spawn_interval_never_below_floor(level in 0u32..1_000) {
            let t = Tuning::default();
            let interval = spawn_interval(&t, level);
            prop_assert!(interval >= 15);
            prop_assert!(interval <= 45);
        }
    }
}
