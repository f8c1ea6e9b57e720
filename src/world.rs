// Copyright (c) 2026 rezky_nightky

use std::time::{Duration, Instant};

use glam::{Mat4, Vec3, Vec4};

use atmos::{GameClock, TerrainKind, TerrainMap, Viewport};

const WATER_LEVEL: f32 = 110.0;
pub const MAX_GROUND: f32 = 500.0;

fn terrain_noise(x: f32, z: f32) -> f32 {
    let h = 170.0
        + 150.0 * (x * 0.23).sin() * (z * 0.19).cos()
        + 70.0 * ((x + z) * 0.11).sin()
        + 40.0 * (x * 0.05 - z * 0.07).cos();
    h.clamp(0.0, MAX_GROUND)
}

pub struct DemoMap {
    width: i32,
    height: i32,
    tile_units: i32,
    corners: Vec<f32>,
    water: Vec<bool>,
    observer: (i32, i32),
    sight: i32,
}

impl DemoMap {
    pub fn new(width: i32, height: i32, tile_units: i32, sight: i32) -> Self {
        let cw = (width + 1) as usize;
        let ch = (height + 1) as usize;
        let mut corners = Vec::with_capacity(cw * ch);
        for cz in 0..ch {
            for cx in 0..cw {
                corners.push(terrain_noise(cx as f32, cz as f32).max(WATER_LEVEL));
            }
        }
        let mut water = Vec::with_capacity((width * height) as usize);
        for ty in 0..height {
            for tx in 0..width {
                water.push(terrain_noise(tx as f32 + 0.5, ty as f32 + 0.5) < WATER_LEVEL);
            }
        }
        Self {
            width,
            height,
            tile_units,
            corners,
            water,
            observer: (width / 2, height / 2),
            sight,
        }
    }

    pub fn tile_units(&self) -> i32 {
        self.tile_units
    }

    pub fn set_observer(&mut self, tx: i32, ty: i32) {
        self.observer = (tx, ty);
    }

    pub fn corner_height(&self, cx: i32, cz: i32) -> f32 {
        let cx = cx.clamp(0, self.width) as usize;
        let cz = cz.clamp(0, self.height) as usize;
        self.corners[cz * (self.width as usize + 1) + cx]
    }

    pub fn is_water(&self, tx: i32, ty: i32) -> bool {
        if tx < 0 || ty < 0 || tx >= self.width || ty >= self.height {
            return false;
        }
        self.water[(ty * self.width + tx) as usize]
    }

    fn in_sight(&self, tx: i32, ty: i32) -> bool {
        let dx = tx - self.observer.0;
        let dy = ty - self.observer.1;
        dx * dx + dy * dy <= self.sight * self.sight
    }
}

impl TerrainMap for DemoMap {
    type Tile = (i32, i32);

    fn ground_height(&self, x: i32, z: i32) -> i32 {
        let tu = self.tile_units as f32;
        let fx = (x as f32 / tu).clamp(0.0, self.width as f32);
        let fz = (z as f32 / tu).clamp(0.0, self.height as f32);
        let cx = fx.floor() as i32;
        let cz = fz.floor() as i32;
        let (ox, oz) = (fx - cx as f32, fz - cz as f32);

        let h00 = self.corner_height(cx, cz);
        let h10 = self.corner_height(cx + 1, cz);
        let h01 = self.corner_height(cx, cz + 1);
        let h11 = self.corner_height(cx + 1, cz + 1);
        let top = h00 + (h10 - h00) * ox;
        let bottom = h01 + (h11 - h01) * ox;
        (top + (bottom - top) * oz) as i32
    }

    fn tile_at(&self, tx: i32, ty: i32) -> Self::Tile {
        (tx.clamp(0, self.width - 1), ty.clamp(0, self.height - 1))
    }

    fn terrain_kind(&self, tile: &Self::Tile) -> TerrainKind {
        if self.is_water(tile.0, tile.1) {
            return TerrainKind::Water;
        }
        let h = self.corner_height(tile.0, tile.1);
        if h > 360.0 {
            TerrainKind::Cliff
        } else {
            TerrainKind::Land
        }
    }

    fn is_tile_visible(&self, tile: &Self::Tile) -> bool {
        self.in_sight(tile.0, tile.1)
    }

    fn width(&self) -> i32 {
        self.width
    }

    fn height(&self) -> i32 {
        self.height
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenPoint {
    pub col: f32,
    pub row: f32,
    pub depth: f32,
}

/// Orbit camera over the map, looking down at `target`.
///
/// Matrices live in render space, where z is the negated world z.
pub struct DemoCamera {
    pub target: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
    pub visible: (u32, u32),
    cols: u16,
    rows: u16,
    view: Mat4,
    projection: Mat4,
}

impl DemoCamera {
    pub fn new(target: Vec3, visible: (u32, u32), tile_units: i32) -> Self {
        let span = visible.0.max(visible.1) as f32 * tile_units as f32;
        let mut cam = Self {
            target,
            yaw: 0.35,
            pitch: 0.95,
            distance: span * 0.9,
            visible,
            cols: 80,
            rows: 24,
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
        };
        cam.refresh();
        cam
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols.max(1);
        self.rows = rows.max(1);
        self.refresh();
    }

    pub fn eye(&self) -> Vec3 {
        let flat = self.distance * self.pitch.cos();
        let t = Vec3::new(self.target.x, self.target.y, -self.target.z);
        t + Vec3::new(
            -self.yaw.sin() * flat,
            self.distance * self.pitch.sin(),
            self.yaw.cos() * flat,
        )
    }

    pub fn refresh(&mut self) {
        let t = Vec3::new(self.target.x, self.target.y, -self.target.z);
        self.view = Mat4::look_at_rh(self.eye(), t, Vec3::Y);
        // terminal cells are about twice as tall as they are wide
        let aspect = self.cols as f32 * 0.5 / self.rows as f32;
        self.projection = Mat4::perspective_rh_gl(0.9, aspect, 10.0, self.distance * 4.0);
    }

    pub fn view(&self) -> Mat4 {
        self.view
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    pub fn perspective_view(&self) -> Mat4 {
        self.projection * self.view
    }

    pub fn pan(&mut self, dx: f32, dz: f32, max_x: f32, max_z: f32) {
        let (s, c) = self.yaw.sin_cos();
        self.target.x = (self.target.x + dx * c - dz * s).clamp(0.0, max_x);
        self.target.z = (self.target.z + dx * s + dz * c).clamp(0.0, max_z);
    }

    pub fn turn(&mut self, dyaw: f32) {
        self.yaw = (self.yaw + dyaw).rem_euclid(std::f32::consts::TAU);
    }

    pub fn tilt(&mut self, dpitch: f32) {
        self.pitch = (self.pitch + dpitch).clamp(0.35, 1.45);
    }

    pub fn to_screen(&self, clip: Vec4) -> Option<ScreenPoint> {
        if clip.w <= 0.0 {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        if !(-1.0..=1.0).contains(&ndc.x) || !(-1.0..=1.0).contains(&ndc.y) || !(-1.0..=1.0).contains(&ndc.z) {
            return None;
        }
        Some(ScreenPoint {
            col: (ndc.x + 1.0) * 0.5 * self.cols as f32,
            row: (1.0 - ndc.y) * 0.5 * self.rows as f32,
            depth: ndc.z,
        })
    }

    // same association as the billboard path so glyphs and splashes share cells
    pub fn project_world(&self, world: Vec3) -> Option<ScreenPoint> {
        let r = Vec4::new(world.x, world.y, -world.z, 1.0);
        self.to_screen(self.projection * (self.view * r))
    }
}

impl Viewport for DemoCamera {
    fn camera_position(&self) -> Vec3 {
        self.target
    }

    fn camera_rotation(&self) -> (f32, f32) {
        (self.yaw, self.pitch)
    }

    fn visible_tiles(&self) -> (u32, u32) {
        self.visible
    }

    fn is_visible(&self, position: Vec3, perspective_view: &Mat4) -> bool {
        let r = Vec4::new(position.x, position.y, -position.z, 1.0);
        self.to_screen(*perspective_view * r).is_some()
    }
}

pub struct DemoClock {
    pub speed: f64,
    paused: bool,
    dt: f32,
    last: Instant,
    max_dt: Duration,
}

impl DemoClock {
    pub fn new(speed: f64, max_dt: Duration) -> Self {
        Self {
            speed,
            paused: false,
            dt: 0.0,
            last: Instant::now(),
            max_dt,
        }
    }

    pub fn tick(&mut self, now: Instant) {
        let elapsed = now.saturating_duration_since(self.last).min(self.max_dt);
        self.last = now;
        self.dt = if self.paused { 0.0 } else { elapsed.as_secs_f32() };
    }

    pub fn frame_seconds(&self) -> f32 {
        self.dt
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        self.last = Instant::now();
    }

    pub fn faster(&mut self) {
        self.speed = (self.speed * 2.0).min(8.0);
    }

    pub fn slower(&mut self) {
        self.speed = (self.speed / 2.0).max(0.125);
    }
}

impl GameClock for DemoClock {
    fn is_paused(&self) -> bool {
        self.paused
    }

    fn time_adjusted(&self, value: f32) -> f32 {
        let speed = if self.speed.is_finite() { self.speed as f32 } else { 1.0 };
        value * self.dt * speed
    }

    fn game_speed(&self) -> f64 {
        self.speed
    }
}
