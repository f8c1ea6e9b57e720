// Copyright (c) 2026 rezky_nightky

use glam::Vec3;
use rand::Rng;

use crate::env::Viewport;
use crate::params::{AtmosParams, MAX_ATMOS_PARTICLES};

// no pool holds more than this, so a larger per-tick budget is never spendable
const MAX_SPAWNS_PER_TICK: f64 = MAX_ATMOS_PARTICLES as f64;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SpawnAccumulator {
    accumulated: f64,
}

impl SpawnAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn remainder(&self) -> f64 {
        self.accumulated
    }

    pub fn reset(&mut self) {
        self.accumulated = 0.0;
    }

    /// Adds one tick's worth of spawn budget and returns how many particles
    /// to create now. A NaN (or negative, or infinite) speed adds nothing; a
    /// budget above the largest pool is capped.
    pub fn accumulate(&mut self, rate: f64, game_speed: f64) -> u32 {
        let mut add = rate * game_speed;
        if add > MAX_SPAWNS_PER_TICK && add.is_finite() {
            log::debug!("spawn budget {} capped at {}", add, MAX_SPAWNS_PER_TICK);
            add = MAX_SPAWNS_PER_TICK;
        }
        if add.is_finite() && add > 0.0 {
            self.accumulated += add;
        }

        let whole = self.accumulated.floor();
        self.accumulated -= whole;
        whole as u32
    }
}

pub fn spawn_position<V, R>(view: &V, params: &AtmosParams, rng: &mut R) -> Vec3
where
    V: Viewport + ?Sized,
    R: Rng + ?Sized,
{
    let cam = view.camera_position();
    let (vx, vy) = view.visible_tiles();
    let vx = vx.max(1) as i32;
    let vy = vy.max(1) as i32;

    let tx = rng.random_range(0..vx) - vx / 2;
    let tz = rng.random_range(0..vy) - vy / 2;

    Vec3::new(
        cam.x + params.world_coord(tx) as f32,
        params.spawn_height,
        cam.z + params.world_coord(tz) as f32,
    )
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::testing::FixedView;

    #[test]
    fn whole_rates_leave_no_remainder() {
        let mut acc = SpawnAccumulator::new();
        assert_eq!(acc.accumulate(2.0, 1.0), 2);
        assert_eq!(acc.remainder(), 0.0);
        assert_eq!(acc.accumulate(4.0, 1.0), 4);
        assert_eq!(acc.remainder(), 0.0);
    }

    #[test]
    fn slow_game_speed_spreads_spawns_over_ticks() {
        let mut acc = SpawnAccumulator::new();
        let counts: Vec<u32> = (0..4).map(|_| acc.accumulate(2.0, 0.25)).collect();
        assert_eq!(counts, vec![0, 1, 0, 1]);
        assert_eq!(acc.remainder(), 0.0);
    }

    #[test]
    fn nan_speed_is_ignored() {
        let mut acc = SpawnAccumulator::new();
        acc.accumulate(4.0, 0.1);
        let before = acc.remainder();
        assert_eq!(acc.accumulate(4.0, f64::NAN), 0);
        assert_eq!(acc.remainder(), before);
        assert!(!acc.remainder().is_nan());
    }

    #[test]
    fn negative_speed_never_produces_negative_counts() {
        let mut acc = SpawnAccumulator::new();
        acc.accumulate(2.0, 0.3);
        assert_eq!(acc.accumulate(2.0, -5.0), 0);
        assert!(acc.remainder() >= 0.0);
    }

    #[test]
    fn spawn_points_cover_the_visible_window_at_spawn_height() {
        let view = FixedView::at(Vec3::new(4096.0, 0.0, 2048.0), (8, 4));
        let params = AtmosParams::default();
        let mut rng = StdRng::seed_from_u64(5);
        let mut xs = std::collections::BTreeSet::new();
        let mut zs = std::collections::BTreeSet::new();
        for _ in 0..400 {
            let p = spawn_position(&view, &params, &mut rng);
            assert_eq!(p.y, 1000.0);
            xs.insert(p.x as i32);
            zs.insert(p.z as i32);
        }
        let want_x: Vec<i32> = (-4..4).map(|t| 4096 + t * 128).collect();
        let want_z: Vec<i32> = (-2..2).map(|t| 2048 + t * 128).collect();
        assert_eq!(xs.into_iter().collect::<Vec<_>>(), want_x);
        assert_eq!(zs.into_iter().collect::<Vec<_>>(), want_z);
    }

    #[test]
    fn huge_finite_speed_is_capped_at_largest_pool() {
        let mut acc = SpawnAccumulator::new();
        acc.accumulate(2.0, 0.25);
        assert_eq!(acc.accumulate(4.0, 1e300), MAX_ATMOS_PARTICLES as u32);
        assert_eq!(acc.remainder(), 0.5);
        assert_eq!(acc.accumulate(1.0, f64::MAX), MAX_ATMOS_PARTICLES as u32);
        assert_eq!(acc.remainder(), 0.5);
        assert_eq!(acc.accumulate(2.0, f64::INFINITY), 0);
    }

    fn tick_speed() -> impl Strategy<Value = f64> {
        prop_oneof![
            8 => (0u32..64).prop_map(|k| k as f64 / 8.0),
            1 => Just(f64::NAN),
            1 => Just(-1.5),
        ]
    }

    proptest! {
        #[test]
        fn accumulator_conserves_total_rate(
            rate in prop_oneof![Just(2.0f64), Just(4.0f64)],
            speeds in prop::collection::vec(tick_speed(), 1..100),
        ) {
            let mut acc = SpawnAccumulator::new();
            let mut total = 0.0f64;
            let mut spawned = 0u64;
            for s in speeds {
                let add = rate * s;
                if add.is_finite() && add > 0.0 {
                    total += add;
                }
                spawned += acc.accumulate(rate, s) as u64;
                prop_assert!((0.0..1.0).contains(&acc.remainder()));
            }
            prop_assert_eq!(spawned, total.floor() as u64);
            prop_assert!((total - spawned as f64 - acc.remainder()).abs() < 1e-9);
        }
    }
}
