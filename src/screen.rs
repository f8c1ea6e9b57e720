// Copyright (c) 2026 rezky_nightky

use std::collections::VecDeque;

use glam::{IVec3, Mat4, Vec3, Vec4};

use atmos::{BillboardAssets, BillboardRenderer, EffectSink, ModelHandle, TerrainKind, TerrainMap, WeatherMode};

use crate::cell::Cell;
use crate::frame::Frame;
use crate::palette::Palette;
use crate::world::{DemoCamera, DemoMap, MAX_GROUND};

const SPLASH_LIFE_S: f32 = 0.4;
const MAX_SPLASHES: usize = 4096;

pub struct Billboards<'a> {
    frame: &'a mut Frame,
    camera: &'a DemoCamera,
    palette: &'a Palette,
    assets: BillboardAssets,
    far_w: f32,
    pub drawn: usize,
}

impl<'a> Billboards<'a> {
    pub fn new(frame: &'a mut Frame, camera: &'a DemoCamera, palette: &'a Palette, assets: BillboardAssets) -> Self {
        Self {
            frame,
            camera,
            palette,
            assets,
            far_w: camera.distance * 1.4,
            drawn: 0,
        }
    }
}

impl BillboardRenderer for Billboards<'_> {
    fn draw_billboard(&mut self, model: ModelHandle, color: Vec4, model_matrix: &Mat4, view: &Mat4) {
        if color.w <= 0.0 {
            return;
        }
        let clip = self.camera.projection() * (*view * model_matrix.w_axis);
        let Some(p) = self.camera.to_screen(clip) else {
            return;
        };
        let Some((x, y)) = self.frame.index_f(p.col, p.row) else {
            return;
        };
        let far = clip.w > self.far_w;
        let (ch, fg) = if model == self.assets.snow {
            (if far { '.' } else { '*' }, self.palette.snow)
        } else {
            (if far { '\'' } else { '|' }, self.palette.rain)
        };
        self.frame.put(x, y, ch, fg, !far);
        self.drawn += 1;
    }
}

#[derive(Clone, Copy, Debug)]
struct Splash {
    at: IVec3,
    size: u32,
    age: f32,
}

#[derive(Debug, Default)]
pub struct Splashes {
    live: VecDeque<Splash>,
}

impl Splashes {
    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn age(&mut self, dt: f32) {
        for s in &mut self.live {
            s.age += dt;
        }
        self.live.retain(|s| s.age < SPLASH_LIFE_S);
    }

    pub fn paint(&self, frame: &mut Frame, camera: &DemoCamera, palette: &Palette) {
        for s in &self.live {
            let world = Vec3::new(s.at.x as f32, s.at.y as f32, s.at.z as f32);
            let Some(p) = camera.project_world(world) else {
                continue;
            };
            let Some((x, y)) = frame.index_f(p.col, p.row) else {
                continue;
            };
            let ch = if s.age < SPLASH_LIFE_S * 0.5 {
                if s.size >= 60 {
                    'O'
                } else {
                    'o'
                }
            } else {
                '~'
            };
            frame.put(x, y, ch, palette.splash, false);
        }
    }
}

impl EffectSink for Splashes {
    fn spawn_splash(&mut self, position: IVec3, size: u32) {
        if self.live.len() >= MAX_SPLASHES {
            self.live.pop_front();
        }
        self.live.push_back(Splash {
            at: position,
            size,
            age: 0.0,
        });
    }
}

pub fn paint_terrain(frame: &mut Frame, map: &DemoMap, camera: &DemoCamera, palette: &Palette) {
    let tu = map.tile_units();
    let (vw, vh) = camera.visible;
    let cx = camera.target.x as i32 / tu;
    let cz = camera.target.z as i32 / tu;
    let half_w = vw as i32 / 2 + 2;
    let half_h = vh as i32 / 2 + 2;

    let pv = camera.perspective_view();
    let mut quads: Vec<(f32, u16, u16, u16, u16, Cell)> = Vec::new();

    for tz in (cz - half_h).max(0)..(cz + half_h).min(map.height()) {
        for tx in (cx - half_w).max(0)..(cx + half_w).min(map.width()) {
            let mut lo = (f32::MAX, f32::MAX);
            let mut hi = (f32::MIN, f32::MIN);
            let mut height = 0.0;
            let mut seen = 0;
            for (dx, dz) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
                let h = map.corner_height(tx + dx, tz + dz);
                height += h;
                let world = Vec3::new(((tx + dx) * tu) as f32, h, ((tz + dz) * tu) as f32);
                if let Some(p) = camera.project_world(world) {
                    lo = (lo.0.min(p.col), lo.1.min(p.row));
                    hi = (hi.0.max(p.col), hi.1.max(p.row));
                    seen += 1;
                }
            }
            if seen < 2 {
                continue;
            }
            let height = height / 4.0;

            let tile = map.tile_at(tx, tz);
            let in_sight = map.is_tile_visible(&tile);
            let cell = match (map.terrain_kind(&tile), palette.mono) {
                (TerrainKind::Water, true) => glyph_cell(if in_sight { '~' } else { '-' }),
                (TerrainKind::Cliff, true) => glyph_cell('^'),
                (TerrainKind::Land, true) => glyph_cell(if in_sight { '.' } else { ' ' }),
                (TerrainKind::Water, false) => {
                    Cell::blank_with_bg(if in_sight { palette.water } else { palette.water_far })
                }
                (_, false) => Cell::blank_with_bg(palette.land_shade(height, MAX_GROUND)),
            };

            let centre = Vec4::new(
                (tx as f32 + 0.5) * tu as f32,
                height,
                -(tz as f32 + 0.5) * tu as f32,
                1.0,
            );
            let depth = (pv * centre).w;
            let x0 = lo.0.max(0.0) as u16;
            let y0 = lo.1.max(0.0) as u16;
            let x1 = hi.0.min(frame.width as f32) as u16;
            let y1 = hi.1.min(frame.height as f32) as u16;
            quads.push((depth, x0, y0, x1, y1, cell));
        }
    }

    quads.sort_by(|a, b| b.0.total_cmp(&a.0));
    for (_, x0, y0, x1, y1, cell) in quads {
        frame.fill_rect(x0, y0, x1, y1, cell);
    }
}

fn glyph_cell(ch: char) -> Cell {
    Cell {
        ch,
        fg: None,
        bg: None,
        bold: false,
    }
}

#[derive(Clone, Copy, Debug)]
pub struct HudStats {
    pub mode: WeatherMode,
    pub active: usize,
    pub capacity: usize,
    pub splashes: usize,
    pub speed: f64,
    pub paused: bool,
    pub fps: f32,
}

pub fn paint_hud(frame: &mut Frame, palette: &Palette, stats: &HudStats) {
    let line = format!(
        " atmos{}  weather: {}  particles: {}/{}  splashes: {}  x{}  fps {:.0}",
        if stats.paused { " [paused]" } else { "" },
        stats.mode,
        stats.active,
        stats.capacity,
        stats.splashes,
        stats.speed,
        stats.fps
    );
    frame.put_str(0, 0, &line, palette.hud, palette.bg);

    if frame.height > 2 {
        frame.put_str(
            0,
            frame.height - 1,
            " q quit  p pause  r/s/n weather  arrows pan  [ ] turn  PgUp/PgDn tilt  +/- speed",
            palette.hud,
            palette.bg,
        );
    }
}
