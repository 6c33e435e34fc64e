//! Gravity-driven particle swarm orbiting the central body.
//!
//! The model is a visually tuned approximation: a softened inverse-square pull
//! toward the origin, a damped vertical component that keeps the swarm flat,
//! and a fixed integration step per tick. Particles that fall in or fly off
//! are recycled onto fresh orbits in the same tick.

use std::f32::consts::TAU;

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::simulation::types::{
    CAPTURE_RADIUS, CAPTURED_RESPAWN_RADIUS, COLOR_FALLOFF_DISTANCE, ESCAPE_RADIUS,
    ESCAPED_RESPAWN_RADIUS, GRAVITY_SOFTENING, INTEGRATION_STEP, ORBITAL_SPEED_SCALE,
    PARTICLE_SIZE, PointInstance, RESPAWN_HALF_THICKNESS, SPAWN_HALF_THICKNESS,
    SPAWN_MAX_RADIUS, SPAWN_MIN_RADIUS, VERTICAL_DAMPING,
};

/// Why a particle was put back onto a fresh orbit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Recycle {
    /// Fell inside the capture radius.
    Captured,
    /// Left the escape radius.
    Escaped,
}

/// Recycle counts for a single tick.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RecycleStats {
    pub captured: usize,
    pub escaped: usize,
}

/// Owns the position, velocity and color channels of every particle.
///
/// All three channels always hold exactly `len()` entries. The collection is
/// never resized in place: a new count means a new `ParticleSystem`.
pub(crate) struct ParticleSystem {
    positions: Vec<Vec3>,
    velocities: Vec<Vec3>,
    colors: Vec<Vec3>,
    rng: StdRng,
}

impl ParticleSystem {
    pub(crate) fn new(count: u32) -> Self {
        Self::with_rng(count, StdRng::from_entropy())
    }

    /// Populates `count` particles on a thin disk around the origin.
    pub(crate) fn with_rng(count: u32, mut rng: StdRng) -> Self {
        let count = count as usize;
        let mut positions = Vec::with_capacity(count);
        let mut velocities = Vec::with_capacity(count);
        let mut colors = Vec::with_capacity(count);

        for _ in 0..count {
            let radius = rng.gen_range(SPAWN_MIN_RADIUS..SPAWN_MAX_RADIUS);
            let (position, velocity) = place_on_orbit(&mut rng, radius, SPAWN_HALF_THICKNESS);

            positions.push(position);
            velocities.push(velocity);
            colors.push(gradient_color(radius / SPAWN_MAX_RADIUS));
        }

        Self {
            positions,
            velocities,
            colors,
            rng,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.positions.len()
    }

    #[cfg(test)]
    pub(crate) fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    #[cfg(test)]
    pub(crate) fn velocities(&self) -> &[Vec3] {
        &self.velocities
    }

    #[cfg(test)]
    pub(crate) fn colors(&self) -> &[Vec3] {
        &self.colors
    }

    /// Advances every particle by one fixed step and recycles strays.
    ///
    /// The step is fixed per tick and not scaled by wall-clock time, so the
    /// apparent speed follows the frame rate.
    pub(crate) fn update(&mut self, gravity_effect: f32) -> RecycleStats {
        let Self {
            positions,
            velocities,
            colors,
            rng,
        } = self;
        let mut stats = RecycleStats::default();

        for ((position, velocity), color) in positions
            .iter_mut()
            .zip(velocities.iter_mut())
            .zip(colors.iter_mut())
        {
            let distance = position.length();
            let force = gravity_effect / (distance * distance + GRAVITY_SOFTENING);
            let mut acceleration = -*position * force;
            acceleration.y *= VERTICAL_DAMPING;

            *velocity += acceleration * INTEGRATION_STEP;
            *position += *velocity;

            let distance = position.length();
            let recycle = if distance < CAPTURE_RADIUS {
                Some(Recycle::Captured)
            } else if distance > ESCAPE_RADIUS || distance.is_nan() {
                Some(Recycle::Escaped)
            } else {
                None
            };

            if let Some(kind) = recycle {
                let (new_position, new_velocity) = respawn(rng, kind);
                *position = new_position;
                *velocity = new_velocity;
                match kind {
                    Recycle::Captured => stats.captured += 1,
                    Recycle::Escaped => stats.escaped += 1,
                }
            }

            let normalized = (position.length() / COLOR_FALLOFF_DISTANCE).min(1.0);
            *color = gradient_color(normalized);
        }

        stats
    }

    /// Refills `out` with one billboard per particle.
    pub(crate) fn write_instances(&self, out: &mut Vec<PointInstance>) {
        out.clear();
        out.extend(
            self.positions
                .iter()
                .zip(&self.colors)
                .map(|(position, color)| PointInstance {
                    position: position.extend(PARTICLE_SIZE).to_array(),
                    color: color.extend(1.0).to_array(),
                }),
        );
    }
}

/// Draws a fresh orbit for a recycled particle.
pub(crate) fn respawn<R: Rng>(rng: &mut R, kind: Recycle) -> (Vec3, Vec3) {
    let (min, max) = match kind {
        Recycle::Captured => CAPTURED_RESPAWN_RADIUS,
        Recycle::Escaped => ESCAPED_RESPAWN_RADIUS,
    };
    let radius = rng.gen_range(min..max);
    place_on_orbit(rng, radius, RESPAWN_HALF_THICKNESS)
}

// Random azimuth and height at the given radius, moving on the
// Keplerian-approximation tangential velocity
fn place_on_orbit<R: Rng>(rng: &mut R, radius: f32, half_thickness: f32) -> (Vec3, Vec3) {
    let azimuth = rng.gen_range(0.0..TAU);
    let y = rng.gen_range(-half_thickness..=half_thickness);
    let (sin, cos) = azimuth.sin_cos();

    let position = Vec3::new(cos * radius, y, sin * radius);
    let speed = (1.0 / radius).sqrt() * ORBITAL_SPEED_SCALE;
    let velocity = Vec3::new(-sin * speed, 0.0, cos * speed);

    (position, velocity)
}

// Warm white-orange near the center fading to blue at the rim
fn gradient_color(normalized: f32) -> Vec3 {
    Vec3::new(
        1.0 - normalized * 0.3,
        0.8 - normalized * 0.4,
        0.4 + normalized * 0.4,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(count: u32, seed: u64) -> ParticleSystem {
        ParticleSystem::with_rng(count, StdRng::seed_from_u64(seed))
    }

    fn horizontal_radius(position: Vec3) -> f32 {
        (position.x * position.x + position.z * position.z).sqrt()
    }

    fn assert_in_envelope(system: &ParticleSystem) {
        for position in system.positions() {
            let distance = position.length();
            assert!(
                (CAPTURE_RADIUS..=ESCAPE_RADIUS).contains(&distance),
                "particle at distance {} escaped the envelope",
                distance
            );
        }
    }

    #[test]
    fn test_init_populates_thin_disk() {
        let system = seeded(2000, 1);

        assert_eq!(system.len(), 2000);
        assert_eq!(system.velocities().len(), 2000);
        assert_eq!(system.colors().len(), 2000);

        for (position, velocity) in system.positions().iter().zip(system.velocities()) {
            let radius = horizontal_radius(*position);
            assert!((SPAWN_MIN_RADIUS - 1e-4..=SPAWN_MAX_RADIUS + 1e-4).contains(&radius));
            assert!(position.y.abs() <= SPAWN_HALF_THICKNESS);

            // Tangential, horizontal and Keplerian in magnitude
            assert_eq!(velocity.y, 0.0);
            let radial = Vec3::new(position.x, 0.0, position.z).normalize();
            assert!(radial.dot(*velocity).abs() < 1e-5);
            let expected = (1.0 / radius).sqrt() * ORBITAL_SPEED_SCALE;
            assert!((velocity.length() - expected).abs() < 1e-4);
        }
    }

    #[test]
    fn test_init_colors_follow_radius_gradient() {
        let system = seeded(500, 2);
        for (position, color) in system.positions().iter().zip(system.colors()) {
            let expected = gradient_color(horizontal_radius(*position) / SPAWN_MAX_RADIUS);
            assert!((*color - expected).abs().max_element() < 1e-3);
            assert!(color.min_element() >= 0.0 && color.max_element() <= 1.0);
        }
    }

    #[test]
    fn test_envelope_holds_every_tick() {
        for (seed, gravity) in [(3, 0.1), (4, 1.0), (5, 2.0)] {
            let mut system = seeded(3000, seed);
            for _ in 0..300 {
                system.update(gravity);
                assert_in_envelope(&system);
            }
        }
    }

    #[test]
    fn test_no_divergence_over_thousand_ticks() {
        let mut system = seeded(5000, 6);
        for _ in 0..1000 {
            system.update(1.0);
        }
        for (position, velocity) in system.positions().iter().zip(system.velocities()) {
            assert!(position.is_finite());
            assert!(velocity.is_finite());
        }
    }

    #[test]
    fn test_captured_particle_respawns_in_inner_band() {
        let mut system = seeded(1000, 7);
        system.positions[0] = Vec3::new(0.05, 0.0, 0.0);
        system.velocities[0] = Vec3::ZERO;

        let stats = system.update(1.0);

        assert!(stats.captured >= 1);
        let radius = horizontal_radius(system.positions()[0]);
        assert!((6.0 - 1e-4..=14.0 + 1e-4).contains(&radius));
        assert!(system.positions()[0].y.abs() <= RESPAWN_HALF_THICKNESS);
    }

    #[test]
    fn test_escaped_particle_respawns_in_outer_band() {
        let mut system = seeded(1000, 8);
        system.positions[0] = Vec3::new(14.9, 0.0, 0.0);
        system.velocities[0] = Vec3::new(1.0, 0.0, 0.0);

        let stats = system.update(0.1);

        assert!(stats.escaped >= 1);
        let radius = horizontal_radius(system.positions()[0]);
        assert!((8.0 - 1e-4..=11.0 + 1e-4).contains(&radius));
    }

    #[test]
    fn test_respawn_azimuth_is_uniform() {
        const SAMPLES: usize = 20_000;
        const BINS: usize = 16;

        let mut rng = StdRng::seed_from_u64(9);
        for kind in [Recycle::Captured, Recycle::Escaped] {
            let (min, max) = match kind {
                Recycle::Captured => CAPTURED_RESPAWN_RADIUS,
                Recycle::Escaped => ESCAPED_RESPAWN_RADIUS,
            };
            let mut bins = [0usize; BINS];

            for _ in 0..SAMPLES {
                let (position, _) = respawn(&mut rng, kind);
                let radius = horizontal_radius(position);
                assert!((min - 1e-4..=max + 1e-4).contains(&radius));

                let azimuth = position.z.atan2(position.x).rem_euclid(TAU);
                let bin = ((azimuth / TAU) * BINS as f32) as usize;
                bins[bin.min(BINS - 1)] += 1;
            }

            // Pearson chi-square, 15 degrees of freedom; 37.7 is the 0.1% tail
            let expected = SAMPLES as f32 / BINS as f32;
            let chi_square: f32 = bins
                .iter()
                .map(|&observed| (observed as f32 - expected).powi(2) / expected)
                .sum();
            assert!(chi_square < 37.7, "azimuth bins {:?} are not uniform", bins);
        }
    }

    #[test]
    fn test_colors_warm_near_center_and_cool_far_out() {
        let mut system = seeded(1000, 10);
        system.update(1.0);

        for (position, color) in system.positions().iter().zip(system.colors()) {
            let normalized = (position.length() / COLOR_FALLOFF_DISTANCE).min(1.0);
            assert!((*color - gradient_color(normalized)).abs().max_element() < 1e-5);
        }

        let warm = gradient_color(0.0);
        let cool = gradient_color(1.0);
        assert!(warm.x > warm.z);
        assert!(cool.z > warm.z && cool.x < warm.x);
    }

    #[test]
    fn test_write_instances_matches_particle_count() {
        let system = seeded(1500, 11);
        let mut instances = vec![PointInstance {
            position: [9.0; 4],
            color: [9.0; 4],
        }; 4000];

        system.write_instances(&mut instances);

        assert_eq!(instances.len(), 1500);
        assert_eq!(instances[0].position[3], PARTICLE_SIZE);
        assert_eq!(instances[0].position[0], system.positions()[0].x);
    }
}
