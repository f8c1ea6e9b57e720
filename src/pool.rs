// Copyright (c) 2026 rezky_nightky

use glam::Vec3;
use rand::Rng;

use crate::particle::{BillboardAssets, Particle, ParticleKind, ParticleStatus};

#[derive(Debug)]
pub struct ParticlePool {
    slots: Box<[Particle]>,
    cursor: usize,
    active: usize,
}

impl ParticlePool {
    pub fn new(capacity: usize) -> Self {
        let slots = vec![Particle::default(); capacity].into_boxed_slice();
        log::debug!("allocated atmospherics pool with {} slots", capacity);
        Self {
            slots,
            cursor: 0,
            active: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn active_count(&self) -> usize {
        self.active
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn reset_cursor(&mut self) {
        self.cursor = 0;
    }

    pub fn slots(&self) -> &[Particle] {
        &self.slots
    }

    pub fn get(&self, index: usize) -> Option<&Particle> {
        self.slots.get(index)
    }

    pub fn iter_active(&self) -> impl Iterator<Item = &Particle> {
        self.slots.iter().filter(|p| p.is_active())
    }

    /// Scans from the cursor, wrapping once. Returns `None` when only the
    /// reserved free slot is left.
    pub fn allocate<R: Rng + ?Sized>(
        &mut self,
        position: Vec3,
        kind: ParticleKind,
        assets: &BillboardAssets,
        rng: &mut R,
    ) -> Option<usize> {
        let cap = self.slots.len();
        let reserve = cap.saturating_sub(1);
        if cap == 0 || self.active >= reserve {
            log::trace!("atmospherics pool saturated, dropping {:?}", kind);
            return None;
        }

        let mut i = self.cursor % cap;
        let mut scanned = 0usize;
        while self.slots[i].is_active() && scanned < cap {
            scanned += 1;
            i = (i + 1) % cap;
        }
        if scanned >= reserve {
            log::trace!("no free atmospherics slot after {} active, dropping", scanned);
            return None;
        }

        self.cursor = i;
        self.slots[i] = Particle {
            kind,
            status: ParticleStatus::Active,
            position,
            velocity: kind.random_velocity(rng),
            size: kind.size(),
            model: assets.model_for(kind),
        };
        self.active += 1;
        Some(i)
    }

    pub fn release(&mut self, index: usize) {
        if let Some(p) = self.slots.get_mut(index) {
            if p.is_active() {
                p.deactivate();
                self.active -= 1;
            }
        }
    }

    pub fn update_active<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut Particle),
    {
        for p in self.slots.iter_mut() {
            if !p.is_active() {
                continue;
            }
            f(p);
            if !p.is_active() {
                self.active -= 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    fn spawn(pool: &mut ParticlePool, rng: &mut StdRng) -> Option<usize> {
        pool.allocate(
            Vec3::new(10.0, 1000.0, 10.0),
            ParticleKind::Rain,
            &BillboardAssets::default(),
            rng,
        )
    }

    #[test]
    fn new_pool_is_all_inactive() {
        let pool = ParticlePool::new(16);
        assert_eq!(pool.capacity(), 16);
        assert_eq!(pool.active_count(), 0);
        assert!(pool.slots().iter().all(|p| !p.is_active()));
    }

    #[test]
    fn fills_slots_in_order_and_keeps_one_free() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut pool = ParticlePool::new(6);
        let got: Vec<_> = (0..5).filter_map(|_| spawn(&mut pool, &mut rng)).collect();
        assert_eq!(got, vec![0, 1, 2, 3, 4]);
        assert_eq!(spawn(&mut pool, &mut rng), None);
        assert!(!pool.slots()[5].is_active());
        assert_eq!(pool.cursor(), 4);
    }

    #[test]
    fn allocation_resumes_after_cursor_and_wraps() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut pool = ParticlePool::new(4);
        for _ in 0..3 {
            spawn(&mut pool, &mut rng);
        }
        pool.release(0);
        assert_eq!(spawn(&mut pool, &mut rng), Some(3));
        assert_eq!(spawn(&mut pool, &mut rng), None);
        pool.release(1);
        pool.release(2);
        assert_eq!(spawn(&mut pool, &mut rng), Some(0));
        assert_eq!(spawn(&mut pool, &mut rng), Some(1));
    }

    #[test]
    fn spawned_particle_takes_kind_parameters() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut pool = ParticlePool::new(4);
        let assets = BillboardAssets::default();
        let i = pool
            .allocate(Vec3::new(1.0, 2.0, 3.0), ParticleKind::Snow, &assets, &mut rng)
            .unwrap();
        let p = pool.get(i).unwrap();
        assert!(p.is_active());
        assert_eq!(p.kind, ParticleKind::Snow);
        assert_eq!(p.size, 80);
        assert_eq!(p.model, assets.snow);
        assert_eq!(p.position, Vec3::new(1.0, 2.0, 3.0));
        assert!(p.velocity.y < 0.0);
    }

    #[test]
    fn update_active_tracks_deactivations() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut pool = ParticlePool::new(8);
        for _ in 0..5 {
            spawn(&mut pool, &mut rng);
        }
        let mut seen = 0;
        pool.update_active(|p| {
            seen += 1;
            if seen % 2 == 0 {
                p.deactivate();
            }
        });
        assert_eq!(seen, 5);
        assert_eq!(pool.active_count(), 3);
        assert_eq!(pool.iter_active().count(), 3);
    }

    #[test]
    fn release_is_idempotent() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut pool = ParticlePool::new(4);
        spawn(&mut pool, &mut rng);
        pool.release(0);
        pool.release(0);
        pool.release(99);
        assert_eq!(pool.active_count(), 0);
    }

    proptest! {
        #[test]
        fn active_never_exceeds_capacity_minus_one(
            cap in 2usize..40,
            ops in prop::collection::vec(prop_oneof![Just(None), (0usize..40).prop_map(Some)], 0..200),
            seed in any::<u64>(),
        ) {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut pool = ParticlePool::new(cap);
            for op in ops {
                match op {
                    None => { spawn(&mut pool, &mut rng); }
                    Some(i) => pool.release(i),
                }
                let active = pool.iter_active().count();
                prop_assert!(active <= cap - 1);
                prop_assert_eq!(active, pool.active_count());
            }
        }
    }
}
