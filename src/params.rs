// Copyright (c) 2026 rezky_nightky

use thiserror::Error;

pub const MAP_MAX_WIDTH: usize = 256;
pub const MAP_MAX_HEIGHT: usize = 256;
pub const MAX_ATMOS_PARTICLES: usize = MAP_MAX_WIDTH * MAP_MAX_HEIGHT;

pub const TILE_UNITS: i32 = 128;

pub const TILE_MAX_HEIGHT: f32 = 510.0;

pub const SPAWN_HEIGHT: f32 = 1000.0;

pub const SPLASH_SIZE: u32 = 60;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParamError {
    #[error("particle capacity {0} is too small (min 2, one slot is always kept free)")]
    CapacityTooSmall(usize),
    #[error("tile units must be positive, got {0}")]
    TileUnits(i32),
    #[error("{name} must be a finite number, got {value}")]
    NotFinite { name: &'static str, value: f32 },
    #[error("unknown weather mode: {0} (expected none, rain or snow)")]
    UnknownWeather(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct AtmosParams {
    pub capacity: usize,
    pub tile_units: i32,
    pub spawn_height: f32,
    pub near_ground_height: f32,
    pub splash_size: u32,
    pub seed: u64,
}

impl Default for AtmosParams {
    fn default() -> Self {
        Self {
            capacity: MAX_ATMOS_PARTICLES,
            tile_units: TILE_UNITS,
            spawn_height: SPAWN_HEIGHT,
            near_ground_height: TILE_MAX_HEIGHT,
            splash_size: SPLASH_SIZE,
            seed: 0x1234567,
        }
    }
}

impl AtmosParams {
    pub fn validate(&self) -> Result<(), ParamError> {
        if self.capacity < 2 {
            return Err(ParamError::CapacityTooSmall(self.capacity));
        }
        if self.tile_units <= 0 {
            return Err(ParamError::TileUnits(self.tile_units));
        }
        for (name, value) in [
            ("spawn height", self.spawn_height),
            ("near-ground height", self.near_ground_height),
        ] {
            if !value.is_finite() {
                return Err(ParamError::NotFinite { name, value });
            }
        }
        Ok(())
    }

    pub fn world_coord(&self, tiles: i32) -> i32 {
        tiles * self.tile_units
    }

    pub fn map_coord(&self, world: i32) -> i32 {
        world.div_euclid(self.tile_units)
    }
}
