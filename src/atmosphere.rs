// Copyright (c) 2026 rezky_nightky

use std::fmt;
use std::str::FromStr;

use glam::Mat4;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::env::{BillboardRenderer, EffectSink, GameClock, TerrainMap, Viewport};
use crate::motion::{step_particle, StepCtx, StepOutcome, WorldBounds, WrapWindow};
use crate::params::{AtmosParams, ParamError};
use crate::particle::{BillboardAssets, ParticleKind};
use crate::pool::ParticlePool;
use crate::render;
use crate::spawn::{spawn_position, SpawnAccumulator};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WeatherMode {
    #[default]
    None,
    Raining,
    Snowing,
}

impl WeatherMode {
    pub fn particle_kind(self) -> Option<ParticleKind> {
        match self {
            WeatherMode::None => None,
            WeatherMode::Raining => Some(ParticleKind::Rain),
            WeatherMode::Snowing => Some(ParticleKind::Snow),
        }
    }
}

impl fmt::Display for WeatherMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WeatherMode::None => "none",
            WeatherMode::Raining => "rain",
            WeatherMode::Snowing => "snow",
        })
    }
}

impl FromStr for WeatherMode {
    type Err = ParamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "clear" | "off" => Ok(WeatherMode::None),
            "rain" | "raining" => Ok(WeatherMode::Raining),
            "snow" | "snowing" => Ok(WeatherMode::Snowing),
            _ => Err(ParamError::UnknownWeather(s.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    pub spawned: u32,
    pub dropped: u32,
    pub landed: u32,
    pub left_world: u32,
}

#[derive(Debug)]
pub struct Atmosphere<R = StdRng> {
    params: AtmosParams,
    assets: BillboardAssets,
    mode: WeatherMode,
    pool: Option<ParticlePool>,
    spawn: SpawnAccumulator,
    rng: R,
}

impl Atmosphere<StdRng> {
    pub fn new(params: AtmosParams) -> Result<Self, ParamError> {
        let rng = StdRng::seed_from_u64(params.seed);
        Self::with_rng(params, rng)
    }
}

impl<R: Rng> Atmosphere<R> {
    pub fn with_rng(params: AtmosParams, rng: R) -> Result<Self, ParamError> {
        params.validate()?;
        Ok(Self {
            params,
            assets: BillboardAssets::default(),
            mode: WeatherMode::None,
            pool: None,
            spawn: SpawnAccumulator::new(),
            rng,
        })
    }

    pub fn with_assets(mut self, assets: BillboardAssets) -> Self {
        self.assets = assets;
        self
    }

    pub fn params(&self) -> &AtmosParams {
        &self.params
    }

    pub fn weather_mode(&self) -> WeatherMode {
        self.mode
    }

    pub fn set_weather_mode(&mut self, mode: WeatherMode) {
        if mode != self.mode {
            log::info!("weather changed: {} -> {}", self.mode, mode);
            self.mode = mode;
            self.init_system();
        }
        if mode == WeatherMode::None && self.pool.take().is_some() {
            self.spawn.reset();
            log::debug!("released atmospherics pool");
        }
    }

    pub fn init_system(&mut self) {
        if self.pool.is_none() && self.mode != WeatherMode::None {
            self.pool = Some(ParticlePool::new(self.params.capacity));
        }
        if let Some(pool) = self.pool.as_mut() {
            pool.reset_cursor();
        }
    }

    pub fn pool(&self) -> Option<&ParticlePool> {
        self.pool.as_ref()
    }

    pub fn capacity(&self) -> usize {
        self.params.capacity
    }

    pub fn active_count(&self) -> usize {
        self.pool.as_ref().map_or(0, ParticlePool::active_count)
    }

    pub fn spawn_remainder(&self) -> f64 {
        self.spawn.remainder()
    }

    pub fn update<C, M, V, E>(&mut self, clock: &C, map: &M, view: &V, effects: &mut E) -> TickReport
    where
        C: GameClock + ?Sized,
        M: TerrainMap + ?Sized,
        V: Viewport + ?Sized,
        E: EffectSink + ?Sized,
    {
        let mut report = TickReport::default();
        if clock.is_paused() {
            return report;
        }
        let Some(kind) = self.mode.particle_kind() else {
            return report;
        };
        let Some(pool) = self.pool.as_mut() else {
            return report;
        };

        let ctx = StepCtx {
            clock,
            map,
            window: WrapWindow::from_viewport(view, &self.params),
            bounds: WorldBounds::from_map(map, &self.params),
            params: &self.params,
        };

        let rng = &mut self.rng;
        pool.update_active(|p| match step_particle(p, &ctx, effects, rng) {
            StepOutcome::Alive => {}
            StepOutcome::Landed => report.landed += 1,
            StepOutcome::LeftWorld => report.left_world += 1,
        });

        let to_add = self.spawn.accumulate(kind.spawn_rate(), clock.game_speed());
        for _ in 0..to_add {
            let pos = spawn_position(view, &self.params, rng);
            if !ctx.bounds.strictly_contains(pos) {
                continue;
            }
            if pool.allocate(pos, kind, &self.assets, rng).is_some() {
                report.spawned += 1;
            } else {
                report.dropped += 1;
            }
        }

        report
    }

    pub fn draw<V, B>(&self, viewport: &V, view: &Mat4, perspective_view: &Mat4, out: &mut B) -> usize
    where
        V: Viewport + ?Sized,
        B: BillboardRenderer + ?Sized,
    {
        if self.mode == WeatherMode::None {
            return 0;
        }
        match self.pool.as_ref() {
            Some(pool) => render::draw_particles(pool, viewport, view, perspective_view, out),
            None => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::testing::{DrawLog, FixedClock, FixedView, ScriptedMap, SplashLog};

    fn small() -> Atmosphere {
        Atmosphere::new(AtmosParams {
            capacity: 64,
            ..AtmosParams::default()
        })
        .unwrap()
    }

    fn world() -> (ScriptedMap, FixedView) {
        (
            ScriptedMap::flat(64, 64, 0),
            FixedView::at(Vec3::new(4096.0, 0.0, 4096.0), (8, 8)),
        )
    }

    #[test]
    fn pool_exists_only_while_weather_is_active() {
        let mut atmos = small();
        assert!(atmos.pool().is_none());
        atmos.init_system();
        assert!(atmos.pool().is_none());

        atmos.set_weather_mode(WeatherMode::Raining);
        assert_eq!(atmos.pool().map(ParticlePool::capacity), Some(64));

        atmos.set_weather_mode(WeatherMode::Snowing);
        assert!(atmos.pool().is_some());

        atmos.set_weather_mode(WeatherMode::None);
        assert!(atmos.pool().is_none());
        assert_eq!(atmos.weather_mode(), WeatherMode::None);
    }

    #[test]
    fn switching_kind_keeps_pool_and_rewinds_cursor() {
        let (map, view) = world();
        let clock = FixedClock::scale(0.0);
        let mut atmos = small();
        atmos.set_weather_mode(WeatherMode::Raining);
        atmos.update(&clock, &map, &view, &mut SplashLog::default());
        atmos.update(&clock, &map, &view, &mut SplashLog::default());
        assert_eq!(atmos.active_count(), 8);
        assert!(atmos.pool().unwrap().cursor() > 0);

        atmos.set_weather_mode(WeatherMode::Snowing);
        assert_eq!(atmos.active_count(), 8);
        assert_eq!(atmos.pool().unwrap().cursor(), 0);
    }

    #[test]
    fn snowing_from_clear_adds_two_per_tick() {
        let (map, view) = world();
        let clock = FixedClock::scale(1.0 / 60.0);
        let mut atmos = small();
        atmos.set_weather_mode(WeatherMode::None);
        atmos.set_weather_mode(WeatherMode::Snowing);

        let first = atmos.update(&clock, &map, &view, &mut SplashLog::default());
        assert_eq!(first.spawned, 2);
        assert_eq!(atmos.active_count(), 2);
        assert_eq!(atmos.spawn_remainder(), 0.0);

        let second = atmos.update(&clock, &map, &view, &mut SplashLog::default());
        assert_eq!(second.spawned, 2);
        assert_eq!(atmos.active_count(), 4);
        assert_eq!(atmos.spawn_remainder(), 0.0);
        assert!(atmos
            .pool()
            .unwrap()
            .iter_active()
            .all(|p| p.kind == ParticleKind::Snow));
    }

    #[test]
    fn paused_clock_freezes_everything() {
        let (map, view) = world();
        let mut clock = FixedClock::scale(1.0);
        let mut atmos = small();
        atmos.set_weather_mode(WeatherMode::Raining);
        atmos.update(&clock, &map, &view, &mut SplashLog::default());
        let before: Vec<_> = atmos.pool().unwrap().slots().to_vec();

        clock.paused = true;
        let report = atmos.update(&clock, &map, &view, &mut SplashLog::default());
        assert_eq!(report, TickReport::default());
        assert_eq!(atmos.pool().unwrap().slots(), &before[..]);
    }

    #[test]
    fn nan_game_speed_spawns_nothing() {
        let (map, view) = world();
        let clock = FixedClock::scale(0.0).with_speed(f64::NAN);
        let mut atmos = small();
        atmos.set_weather_mode(WeatherMode::Raining);
        let report = atmos.update(&clock, &map, &view, &mut SplashLog::default());
        assert_eq!(report.spawned, 0);
        assert_eq!(atmos.spawn_remainder(), 0.0);
    }

    #[test]
    fn spawns_off_the_map_are_discarded() {
        let map = ScriptedMap::flat(64, 64, 0);
        // camera far outside the map: every drop point is out of bounds
        let view = FixedView::at(Vec3::new(-50_000.0, 0.0, -50_000.0), (8, 8));
        let mut atmos = small();
        atmos.set_weather_mode(WeatherMode::Raining);
        let report = atmos.update(&FixedClock::scale(0.0), &map, &view, &mut SplashLog::default());
        assert_eq!(report.spawned, 0);
        assert_eq!(atmos.active_count(), 0);
    }

    #[test]
    fn full_pool_drops_spawns_silently() {
        let (map, view) = world();
        let clock = FixedClock::scale(0.0).with_speed(10.0);
        let mut atmos = Atmosphere::new(AtmosParams {
            capacity: 16,
            ..AtmosParams::default()
        })
        .unwrap();
        atmos.set_weather_mode(WeatherMode::Raining);
        let report = atmos.update(&clock, &map, &view, &mut SplashLog::default());
        assert_eq!(report.spawned, 15);
        assert_eq!(report.dropped, 25);
        assert_eq!(atmos.active_count(), 15);
    }

    #[test]
    fn rain_reaches_the_ground_and_dies() {
        let map = ScriptedMap::flat(64, 64, 100);
        let view = FixedView::at(Vec3::new(4096.0, 0.0, 4096.0), (8, 8));
        let clock = FixedClock::scale(0.1);
        let mut atmos = small();
        atmos.set_weather_mode(WeatherMode::Raining);

        let mut landed = 0;
        for _ in 0..40 {
            landed += atmos.update(&clock, &map, &view, &mut SplashLog::default()).landed;
        }
        assert!(landed > 0);
        assert!(atmos
            .pool()
            .unwrap()
            .iter_active()
            .all(|p| p.position.y >= 100.0));
    }

    #[test]
    fn draw_is_skipped_without_weather() {
        let (map, view) = world();
        let mut atmos = small();
        atmos.set_weather_mode(WeatherMode::Snowing);
        atmos.update(&FixedClock::scale(0.0), &map, &view, &mut SplashLog::default());

        let mut log = DrawLog::default();
        assert_eq!(atmos.draw(&view, &Mat4::IDENTITY, &Mat4::IDENTITY, &mut log), 2);

        atmos.set_weather_mode(WeatherMode::None);
        let mut log = DrawLog::default();
        assert_eq!(atmos.draw(&view, &Mat4::IDENTITY, &Mat4::IDENTITY, &mut log), 0);
        assert!(log.0.is_empty());
    }

    #[test]
    fn same_seed_gives_same_weather() {
        let (map, view) = world();
        let clock = FixedClock::scale(1.0 / 30.0);
        let run = || {
            let mut atmos = small();
            atmos.set_weather_mode(WeatherMode::Snowing);
            for _ in 0..20 {
                atmos.update(&clock, &map, &view, &mut SplashLog::default());
            }
            atmos.pool().unwrap().slots().to_vec()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn weather_mode_parses_names() {
        assert_eq!("Rain".parse::<WeatherMode>(), Ok(WeatherMode::Raining));
        assert_eq!("snowing".parse::<WeatherMode>(), Ok(WeatherMode::Snowing));
        assert_eq!("none".parse::<WeatherMode>(), Ok(WeatherMode::None));
        assert!("hail".parse::<WeatherMode>().is_err());
        assert_eq!(WeatherMode::Snowing.to_string(), "snow");
    }

    #[test]
    fn invalid_params_are_rejected() {
        let err = Atmosphere::new(AtmosParams {
            capacity: 0,
            ..AtmosParams::default()
        })
        .unwrap_err();
        assert_eq!(err, ParamError::CapacityTooSmall(0));
    }
}
