// Copyright (c) 2026 rezky_nightky

//! Scripted collaborators for unit tests.

use std::cell::Cell;

use glam::{IVec3, Mat4, Vec3, Vec4};

use crate::env::{BillboardRenderer, EffectSink, GameClock, TerrainKind, TerrainMap, Viewport};
use crate::particle::ModelHandle;

#[derive(Clone, Copy, Debug)]
pub struct FixedClock {
    pub scale: f32,
    pub paused: bool,
    pub speed: f64,
}

impl FixedClock {
    pub fn scale(scale: f32) -> Self {
        Self {
            scale,
            paused: false,
            speed: 1.0,
        }
    }

    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }
}

impl GameClock for FixedClock {
    fn is_paused(&self) -> bool {
        self.paused
    }

    fn time_adjusted(&self, value: f32) -> f32 {
        value * self.scale
    }

    fn game_speed(&self) -> f64 {
        self.speed
    }
}

#[derive(Debug)]
pub struct ScriptedMap {
    pub width: i32,
    pub height: i32,
    pub ground: i32,
    pub water: Option<bool>,
    queries: Cell<usize>,
}

impl ScriptedMap {
    pub fn flat(width: i32, height: i32, ground: i32) -> Self {
        Self {
            width,
            height,
            ground,
            water: None,
            queries: Cell::new(0),
        }
    }

    pub fn with_water(mut self, visible: bool) -> Self {
        self.water = Some(visible);
        self
    }

    pub fn height_queries(&self) -> usize {
        self.queries.get()
    }
}

impl TerrainMap for ScriptedMap {
    type Tile = (i32, i32);

    fn ground_height(&self, _x: i32, _z: i32) -> i32 {
        self.queries.set(self.queries.get() + 1);
        self.ground
    }

    fn tile_at(&self, tx: i32, ty: i32) -> Self::Tile {
        (tx, ty)
    }

    fn terrain_kind(&self, _tile: &Self::Tile) -> TerrainKind {
        if self.water.is_some() {
            TerrainKind::Water
        } else {
            TerrainKind::Land
        }
    }

    fn is_tile_visible(&self, _tile: &Self::Tile) -> bool {
        self.water.unwrap_or(true)
    }

    fn width(&self) -> i32 {
        self.width
    }

    fn height(&self) -> i32 {
        self.height
    }
}

#[derive(Clone, Copy, Debug)]
pub struct FixedView {
    pub position: Vec3,
    pub rotation: (f32, f32),
    pub tiles: (u32, u32),
    pub visible: Option<fn(Vec3) -> bool>,
}

impl FixedView {
    pub fn at(position: Vec3, tiles: (u32, u32)) -> Self {
        Self {
            position,
            rotation: (0.0, 0.0),
            tiles,
            visible: None,
        }
    }

    pub fn rotated(mut self, yaw: f32, pitch: f32) -> Self {
        self.rotation = (yaw, pitch);
        self
    }

    pub fn visible_when(mut self, f: fn(Vec3) -> bool) -> Self {
        self.visible = Some(f);
        self
    }
}

impl Viewport for FixedView {
    fn camera_position(&self) -> Vec3 {
        self.position
    }

    fn camera_rotation(&self) -> (f32, f32) {
        self.rotation
    }

    fn visible_tiles(&self) -> (u32, u32) {
        self.tiles
    }

    fn is_visible(&self, position: Vec3, _perspective_view: &Mat4) -> bool {
        self.visible.map_or(true, |f| f(position))
    }
}

#[derive(Debug, Default)]
pub struct SplashLog(pub Vec<(IVec3, u32)>);

impl EffectSink for SplashLog {
    fn spawn_splash(&mut self, position: IVec3, size: u32) {
        self.0.push((position, size));
    }
}

#[derive(Debug, Default)]
pub struct DrawLog(pub Vec<(ModelHandle, Vec4, Mat4, Mat4)>);

impl BillboardRenderer for DrawLog {
    fn draw_billboard(&mut self, model: ModelHandle, color: Vec4, model_matrix: &Mat4, view: &Mat4) {
        self.0.push((model, color, *model_matrix, *view));
    }
}
