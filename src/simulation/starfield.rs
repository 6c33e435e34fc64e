use std::f32::consts::{PI, TAU};

use rand::Rng;

use crate::simulation::types::{
    PointInstance, STAR_COUNT, STAR_MAX_RADIUS, STAR_MIN_RADIUS, STAR_SIZE,
};

/// Scatters the static background stars on a thick spherical shell.
pub(crate) fn create_stars<R: Rng>(rng: &mut R) -> Vec<PointInstance> {
    (0..STAR_COUNT)
        .map(|_| {
            let radius = rng.gen_range(STAR_MIN_RADIUS..STAR_MAX_RADIUS);
            let azimuth = rng.gen_range(0.0..TAU);
            let polar = rng.gen_range(0.0..PI);

            let x = radius * polar.sin() * azimuth.cos();
            let y = radius * polar.cos();
            let z = radius * polar.sin() * azimuth.sin();

            // Grey stars of varying brightness
            let brightness = rng.gen_range(0.2..1.0);

            PointInstance {
                position: [x, y, z, STAR_SIZE],
                color: [brightness, brightness, brightness, 1.0],
            }
        })
        .collect()
}
