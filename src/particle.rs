// Copyright (c) 2026 rezky_nightky

use glam::Vec3;
use rand::Rng;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParticleKind {
    Rain,
    Snow,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ParticleStatus {
    #[default]
    Inactive,
    Active,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ModelHandle(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BillboardAssets {
    pub rain: ModelHandle,
    pub snow: ModelHandle,
}

impl Default for BillboardAssets {
    fn default() -> Self {
        Self {
            rain: ModelHandle(0),
            snow: ModelHandle(1),
        }
    }
}

impl BillboardAssets {
    pub fn model_for(&self, kind: ParticleKind) -> ModelHandle {
        match kind {
            ParticleKind::Rain => self.rain,
            ParticleKind::Snow => self.snow,
        }
    }
}

impl ParticleKind {
    pub fn size(self) -> u32 {
        match self {
            ParticleKind::Rain => 50,
            ParticleKind::Snow => 80,
        }
    }

    pub fn drift_limit(self) -> f32 {
        match self {
            ParticleKind::Rain => 25.0,
            ParticleKind::Snow => 40.0,
        }
    }

    pub fn fall_range(self) -> (f32, f32) {
        match self {
            ParticleKind::Rain => (-1000.0, -700.0),
            ParticleKind::Snow => (-120.0, -80.0),
        }
    }

    pub fn spawn_rate(self) -> f64 {
        match self {
            ParticleKind::Rain => 4.0,
            ParticleKind::Snow => 2.0,
        }
    }

    pub fn random_drift<R: Rng + ?Sized>(self, rng: &mut R) -> f32 {
        let limit = self.drift_limit();
        rng.random_range(-limit..=limit)
    }

    pub fn random_velocity<R: Rng + ?Sized>(self, rng: &mut R) -> Vec3 {
        let (lo, hi) = self.fall_range();
        let x = self.random_drift(rng);
        let y = rng.random_range(lo..=hi);
        let z = self.random_drift(rng);
        Vec3::new(x, y, z)
    }
}

/// One slot of the particle pool. Fields other than `status` are stale
/// while the slot is inactive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub kind: ParticleKind,
    pub status: ParticleStatus,
    pub position: Vec3,
    pub velocity: Vec3,
    pub size: u32,
    pub model: ModelHandle,
}

impl Default for Particle {
    fn default() -> Self {
        Self {
            kind: ParticleKind::Rain,
            status: ParticleStatus::Inactive,
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            size: 0,
            model: ModelHandle::default(),
        }
    }
}

impl Particle {
    pub fn is_active(&self) -> bool {
        self.status == ParticleStatus::Active
    }

    pub fn deactivate(&mut self) {
        self.status = ParticleStatus::Inactive;
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    #[test]
    fn rain_falls_faster_than_it_drifts() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let v = ParticleKind::Rain.random_velocity(&mut rng);
            assert!((-1000.0..=-700.0).contains(&v.y));
            assert!(v.x.abs() <= 25.0 && v.z.abs() <= 25.0);
            assert!(v.x.abs() < v.y.abs());
        }
    }

    #[test]
    fn snow_drifts_wider_and_falls_slower() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut widest: f32 = 0.0;
        for _ in 0..500 {
            let v = ParticleKind::Snow.random_velocity(&mut rng);
            assert!((-120.0..=-80.0).contains(&v.y));
            assert!(v.x.abs() <= 40.0 && v.z.abs() <= 40.0);
            widest = widest.max(v.x.abs()).max(v.z.abs());
        }
        assert!(widest > 25.0);
    }

    #[test]
    fn default_slot_is_inactive() {
        assert!(!Particle::default().is_active());
    }

    #[test]
    fn assets_map_kind_to_model() {
        let assets = BillboardAssets {
            rain: ModelHandle(9),
            snow: ModelHandle(4),
        };
        assert_eq!(assets.model_for(ParticleKind::Rain), ModelHandle(9));
        assert_eq!(assets.model_for(ParticleKind::Snow), ModelHandle(4));
    }
}
