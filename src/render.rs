// Copyright (c) 2026 rezky_nightky

use glam::{Mat4, Vec3};

use crate::env::{BillboardRenderer, Viewport, WHITE};
use crate::particle::Particle;
use crate::pool::ParticlePool;

pub fn billboard_rotation<V: Viewport + ?Sized>(view: &V) -> Mat4 {
    let (yaw, pitch) = view.camera_rotation();
    Mat4::from_rotation_y(-yaw) * Mat4::from_rotation_x(-pitch)
}

fn size_scale(size: u32) -> Mat4 {
    Mat4::from_scale(Vec3::splat(size as f32 / 100.0))
}

pub fn model_matrix(p: &Particle, rotate_scale: &Mat4) -> Mat4 {
    let dv = Vec3::new(p.position.x, p.position.y, -p.position.z);
    Mat4::from_translation(dv) * *rotate_scale
}

// rotate-scale is only rebuilt when the size differs from the last drawn particle
pub fn draw_particles<V, B>(
    pool: &ParticlePool,
    viewport: &V,
    view: &Mat4,
    perspective_view: &Mat4,
    out: &mut B,
) -> usize
where
    V: Viewport + ?Sized,
    B: BillboardRenderer + ?Sized,
{
    let rotate = billboard_rotation(viewport);
    let mut rotate_scale = rotate;
    let mut last_size = 0u32;
    let mut drawn = 0usize;

    for p in pool.iter_active() {
        if !viewport.is_visible(p.position, perspective_view) {
            continue;
        }
        if p.size != last_size {
            rotate_scale = rotate * size_scale(p.size);
            last_size = p.size;
        }
        out.draw_billboard(p.model, WHITE, &model_matrix(p, &rotate_scale), view);
        drawn += 1;
    }
    drawn
}

pub fn render_particle<V, B>(p: &Particle, viewport: &V, view: &Mat4, out: &mut B)
where
    V: Viewport + ?Sized,
    B: BillboardRenderer + ?Sized,
{
    let rotate_scale = billboard_rotation(viewport) * size_scale(p.size);
    out.draw_billboard(p.model, WHITE, &model_matrix(p, &rotate_scale), view);
}
