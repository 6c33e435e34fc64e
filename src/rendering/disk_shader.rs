//! CPU twin of the accretion disk fragment shader.
//!
//! `shade_disk` computes exactly what `fs_disk` in `shaders/disk.wgsl`
//! outputs, so disk colors can be checked without a GPU.

use glam::{Vec2, Vec3};

pub(crate) const DISK_INNER_RADIUS: f32 = 0.3;
pub(crate) const DISK_OUTER_RADIUS: f32 = 1.0;

const INNER_COLOR: Vec3 = Vec3::new(1.0, 0.8, 0.4);
const MIDDLE_COLOR: Vec3 = Vec3::new(1.0, 0.4, 0.2);
const OUTER_COLOR: Vec3 = Vec3::new(0.8, 0.2, 0.6);

const TURBULENCE_BANDS: f32 = 8.0;
const TURBULENCE_SPEED: f32 = 2.0;
const TURBULENCE_DEPTH: f32 = 0.1;
const ALPHA_SCALE: f32 = 0.8;

/// One shaded disk fragment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct DiskSample {
    pub color: Vec3,
    pub alpha: f32,
}

/// Shades the disk surface at `uv` for the given time and brightness.
///
/// Returns `None` where the fragment is discarded (outside the ring band).
pub(crate) fn shade_disk(uv: Vec2, time: f32, brightness: f32) -> Option<DiskSample> {
    let offset = uv - Vec2::splat(0.5);
    let radius = offset.length() * 2.0;

    if radius < DISK_INNER_RADIUS || radius > DISK_OUTER_RADIUS {
        return None;
    }

    let normalized = (radius - DISK_INNER_RADIUS) / (DISK_OUTER_RADIUS - DISK_INNER_RADIUS);
    let mut intensity = 1.0 - normalized;

    let color = if normalized < 0.5 {
        INNER_COLOR.lerp(MIDDLE_COLOR, normalized * 2.0)
    } else {
        MIDDLE_COLOR.lerp(OUTER_COLOR, (normalized - 0.5) * 2.0)
    };

    let angle = offset.y.atan2(offset.x);
    let turbulence =
        (angle * TURBULENCE_BANDS + time * TURBULENCE_SPEED).sin() * TURBULENCE_DEPTH + (1.0 - TURBULENCE_DEPTH);
    intensity *= turbulence;

    Some(DiskSample {
        color: color * intensity * brightness,
        alpha: intensity * ALPHA_SCALE,
    })
}
