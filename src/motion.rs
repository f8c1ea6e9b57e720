// Copyright (c) 2026 rezky_nightky

use glam::{IVec3, Vec3};
use rand::Rng;

use crate::env::{EffectSink, GameClock, TerrainKind, TerrainMap, Viewport};
use crate::params::AtmosParams;
use crate::particle::{Particle, ParticleKind};

const SNOW_REDRIFT_ODDS: u32 = 30;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    Alive,
    LeftWorld,
    Landed,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WrapWindow {
    pub center_x: f32,
    pub center_z: f32,
    pub width: f32,
    pub depth: f32,
}

impl WrapWindow {
    pub fn from_viewport<V: Viewport + ?Sized>(view: &V, params: &AtmosParams) -> Self {
        let cam = view.camera_position();
        let (tx, ty) = view.visible_tiles();
        Self {
            center_x: cam.x,
            center_z: cam.z,
            width: params.world_coord(tx as i32) as f32,
            depth: params.world_coord(ty as i32) as f32,
        }
    }

    pub fn wrap(&self, position: &mut Vec3) {
        let half_w = self.width / 2.0;
        let half_d = self.depth / 2.0;

        if position.x < self.center_x - half_w {
            position.x += self.width;
        } else if position.x > self.center_x + half_w {
            position.x -= self.width;
        }

        if position.z < self.center_z - half_d {
            position.z += self.depth;
        } else if position.z > self.center_z + half_d {
            position.z -= self.depth;
        }
    }
}

/// Playable area in world units, `[0, (tiles - 1) * tile_units]` on each axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldBounds {
    pub max_x: f32,
    pub max_z: f32,
}

impl WorldBounds {
    pub fn from_map<M: TerrainMap + ?Sized>(map: &M, params: &AtmosParams) -> Self {
        Self {
            max_x: params.world_coord(map.width() - 1) as f32,
            max_z: params.world_coord(map.height() - 1) as f32,
        }
    }

    pub fn contains(&self, position: Vec3) -> bool {
        position.x >= 0.0 && position.z >= 0.0 && position.x <= self.max_x && position.z <= self.max_z
    }

    pub fn strictly_contains(&self, position: Vec3) -> bool {
        position.x > 0.0 && position.z > 0.0 && position.x < self.max_x && position.z < self.max_z
    }
}

pub struct StepCtx<'a, C: ?Sized, M: ?Sized> {
    pub clock: &'a C,
    pub map: &'a M,
    pub window: WrapWindow,
    pub bounds: WorldBounds,
    pub params: &'a AtmosParams,
}

pub fn step_particle<C, M, E, R>(
    p: &mut Particle,
    ctx: &StepCtx<'_, C, M>,
    effects: &mut E,
    rng: &mut R,
) -> StepOutcome
where
    C: GameClock + ?Sized,
    M: TerrainMap + ?Sized,
    E: EffectSink + ?Sized,
    R: Rng + ?Sized,
{
    p.position.x += ctx.clock.time_adjusted(p.velocity.x);
    p.position.y += ctx.clock.time_adjusted(p.velocity.y);
    p.position.z += ctx.clock.time_adjusted(p.velocity.z);

    ctx.window.wrap(&mut p.position);

    if !ctx.bounds.contains(p.position) {
        p.deactivate();
        return StepOutcome::LeftWorld;
    }

    if p.position.y < ctx.params.near_ground_height {
        let x = p.position.x as i32;
        let z = p.position.z as i32;
        let ground = ctx.map.ground_height(x, z);

        if p.position.y < ground as f32 || p.position.y < 0.0 {
            p.deactivate();
            if p.kind == ParticleKind::Rain {
                let tile = ctx
                    .map
                    .tile_at(ctx.params.map_coord(x), ctx.params.map_coord(z));
                // display-only: hidden water never shows a splash
                if ctx.map.terrain_kind(&tile) == TerrainKind::Water
                    && ctx.map.is_tile_visible(&tile)
                {
                    effects.spawn_splash(IVec3::new(x, ground, z), ctx.params.splash_size);
                }
            }
            return StepOutcome::Landed;
        }
    }

    if p.kind == ParticleKind::Snow {
        if rng.random_ratio(1, SNOW_REDRIFT_ODDS) {
            p.velocity.z = p.kind.random_drift(rng);
        }
        if rng.random_ratio(1, SNOW_REDRIFT_ODDS) {
            p.velocity.x = p.kind.random_drift(rng);
        }
    }

    StepOutcome::Alive
}
