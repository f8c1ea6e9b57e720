// Copyright (c) 2026 rezky_nightky

//! Rain and snow for a tile-map 3D renderer.
//!
//! An [`Atmosphere`] owns a fixed pool of weather particles. Each frame the
//! host calls [`Atmosphere::update`] with its clock, map, camera and effects
//! system, then [`Atmosphere::draw`] with its billboard renderer. The pool only
//! exists while it is raining or snowing.

pub mod atmosphere;
pub mod env;
pub mod motion;
pub mod params;
pub mod particle;
pub mod pool;
pub mod render;
pub mod spawn;

#[cfg(test)]
mod testing;

pub use atmosphere::{Atmosphere, TickReport, WeatherMode};
pub use env::{BillboardRenderer, EffectSink, GameClock, TerrainKind, TerrainMap, Viewport, WHITE};
pub use params::{AtmosParams, ParamError};
pub use particle::{BillboardAssets, ModelHandle, Particle, ParticleKind, ParticleStatus};
pub use pool::ParticlePool;
