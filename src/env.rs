// Copyright (c) 2026 rezky_nightky

use glam::{IVec3, Mat4, Vec3, Vec4};

use crate::particle::ModelHandle;

pub const WHITE: Vec4 = Vec4::ONE;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TerrainKind {
    Water,
    Land,
    Cliff,
}

pub trait GameClock {
    fn is_paused(&self) -> bool;

    fn time_adjusted(&self, value: f32) -> f32;

    /// Current game speed multiplier. NaN means the speed is undefined this tick.
    fn game_speed(&self) -> f64;
}

pub trait TerrainMap {
    type Tile;

    fn ground_height(&self, x: i32, z: i32) -> i32;

    fn tile_at(&self, tx: i32, ty: i32) -> Self::Tile;

    fn terrain_kind(&self, tile: &Self::Tile) -> TerrainKind;

    fn is_tile_visible(&self, tile: &Self::Tile) -> bool;

    fn width(&self) -> i32;

    fn height(&self) -> i32;
}

pub trait Viewport {
    fn camera_position(&self) -> Vec3;

    fn camera_rotation(&self) -> (f32, f32);

    fn visible_tiles(&self) -> (u32, u32);

    fn is_visible(&self, position: Vec3, perspective_view: &Mat4) -> bool;
}

pub trait EffectSink {
    fn spawn_splash(&mut self, position: IVec3, size: u32);
}

pub trait BillboardRenderer {
    fn draw_billboard(&mut self, model: ModelHandle, color: Vec4, model_matrix: &Mat4, view: &Mat4);
}
