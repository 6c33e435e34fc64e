//! Runtime tunables exposed to the user interface.
//!
//! Every setter clamps its input into the documented range instead of
//! rejecting it, so a misbehaving control can never push the scene into an
//! unsupported state.

use std::ops::RangeInclusive;

pub(crate) const ROTATION_SPEED_RANGE: RangeInclusive<f32> = 0.0..=0.02;
pub(crate) const DISK_BRIGHTNESS_RANGE: RangeInclusive<f32> = 0.1..=3.0;
pub(crate) const PARTICLE_COUNT_RANGE: RangeInclusive<u32> = 1000..=10000;
pub(crate) const GRAVITY_EFFECT_RANGE: RangeInclusive<f32> = 0.1..=2.0;

pub(crate) const ROTATION_SPEED_STEP: f32 = 0.001;
pub(crate) const DISK_BRIGHTNESS_STEP: f32 = 0.1;
pub(crate) const PARTICLE_COUNT_STEP: u32 = 500;
pub(crate) const GRAVITY_EFFECT_STEP: f32 = 0.1;

/// Addresses one tunable for relative slider steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Slider {
    RotationSpeed,
    DiskBrightness,
    ParticleCount,
    GravityEffect,
}

/// The four visualization tunables.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Parameters {
    rotation_speed: f32,
    disk_brightness: f32,
    particle_count: u32,
    gravity_effect: f32,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            rotation_speed: 0.005,
            disk_brightness: 1.5,
            particle_count: 5000,
            gravity_effect: 1.0,
        }
    }
}

impl Parameters {
    pub(crate) fn rotation_speed(&self) -> f32 {
        self.rotation_speed
    }

    pub(crate) fn disk_brightness(&self) -> f32 {
        self.disk_brightness
    }

    pub(crate) fn particle_count(&self) -> u32 {
        self.particle_count
    }

    pub(crate) fn gravity_effect(&self) -> f32 {
        self.gravity_effect
    }

    pub(crate) fn set_rotation_speed(&mut self, value: f32) {
        self.rotation_speed = clamp_f32(value, ROTATION_SPEED_RANGE, self.rotation_speed);
    }

    pub(crate) fn set_disk_brightness(&mut self, value: f32) {
        self.disk_brightness = clamp_f32(value, DISK_BRIGHTNESS_RANGE, self.disk_brightness);
    }

    pub(crate) fn set_gravity_effect(&mut self, value: f32) {
        self.gravity_effect = clamp_f32(value, GRAVITY_EFFECT_RANGE, self.gravity_effect);
    }

    /// Sets the particle count, snapped to the slider step.
    ///
    /// Returns `true` when the stored count actually changed.
    pub(crate) fn set_particle_count(&mut self, value: u32) -> bool {
        let clamped = value.clamp(*PARTICLE_COUNT_RANGE.start(), *PARTICLE_COUNT_RANGE.end());
        let base = *PARTICLE_COUNT_RANGE.start();
        let steps = ((clamped - base) as f32 / PARTICLE_COUNT_STEP as f32).round() as u32;
        let snapped = (base + steps * PARTICLE_COUNT_STEP).min(*PARTICLE_COUNT_RANGE.end());

        let changed = snapped != self.particle_count;
        self.particle_count = snapped;
        changed
    }

    /// Moves `slider` by `steps` increments from its current value, clamped
    /// like the matching setter.
    pub(crate) fn step(&mut self, slider: Slider, steps: i32) {
        match slider {
            Slider::RotationSpeed => {
                self.set_rotation_speed(self.rotation_speed + steps as f32 * ROTATION_SPEED_STEP)
            }
            Slider::DiskBrightness => {
                self.set_disk_brightness(self.disk_brightness + steps as f32 * DISK_BRIGHTNESS_STEP)
            }
            Slider::GravityEffect => {
                self.set_gravity_effect(self.gravity_effect + steps as f32 * GRAVITY_EFFECT_STEP)
            }
            Slider::ParticleCount => {
                let target = i64::from(self.particle_count)
                    + i64::from(steps) * i64::from(PARTICLE_COUNT_STEP);
                self.set_particle_count(target.clamp(0, i64::from(u32::MAX)) as u32);
            }
        }
    }
}

// NaN input keeps the previous value
fn clamp_f32(value: f32, range: RangeInclusive<f32>, previous: f32) -> f32 {
    if value.is_nan() {
        previous
    } else {
        value.clamp(*range.start(), *range.end())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_in_range() {
        let params = Parameters::default();
        assert!(ROTATION_SPEED_RANGE.contains(&params.rotation_speed()));
        assert!(DISK_BRIGHTNESS_RANGE.contains(&params.disk_brightness()));
        assert!(PARTICLE_COUNT_RANGE.contains(&params.particle_count()));
        assert!(GRAVITY_EFFECT_RANGE.contains(&params.gravity_effect()));
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let mut params = Parameters::default();

        params.set_rotation_speed(1.0);
        assert_eq!(params.rotation_speed(), 0.02);
        params.set_rotation_speed(-1.0);
        assert_eq!(params.rotation_speed(), 0.0);

        params.set_disk_brightness(10.0);
        assert_eq!(params.disk_brightness(), 3.0);
        params.set_disk_brightness(0.0);
        assert_eq!(params.disk_brightness(), 0.1);

        params.set_gravity_effect(f32::INFINITY);
        assert_eq!(params.gravity_effect(), 2.0);
        params.set_gravity_effect(f32::NAN);
        assert_eq!(params.gravity_effect(), 2.0);
    }

    #[test]
    fn test_particle_count_snaps_to_step() {
        let mut params = Parameters::default();

        assert!(params.set_particle_count(7240));
        assert_eq!(params.particle_count(), 7000);

        assert!(params.set_particle_count(7260));
        assert_eq!(params.particle_count(), 7500);

        // Exactly between two steps rounds up
        assert!(params.set_particle_count(2250));
        assert_eq!(params.particle_count(), 2500);

        assert!(params.set_particle_count(50));
        assert_eq!(params.particle_count(), 1000);

        assert!(params.set_particle_count(u32::MAX));
        assert_eq!(params.particle_count(), 10000);
    }

    #[test]
    fn test_steps_accumulate_and_clamp() {
        let mut params = Parameters::default();

        params.step(Slider::ParticleCount, 1);
        params.step(Slider::ParticleCount, 1);
        assert_eq!(params.particle_count(), 6000);

        params.step(Slider::ParticleCount, -100);
        assert_eq!(params.particle_count(), 1000);

        params.step(Slider::DiskBrightness, -2);
        assert!((params.disk_brightness() - 1.3).abs() < 1e-5);

        params.step(Slider::RotationSpeed, -10);
        assert_eq!(params.rotation_speed(), 0.0);

        params.step(Slider::GravityEffect, 50);
        assert_eq!(params.gravity_effect(), 2.0);
    }

    #[test]
    fn test_particle_count_same_value_reports_no_change() {
        let mut params = Parameters::default();
        assert!(!params.set_particle_count(5000));
        assert!(!params.set_particle_count(5100));
        assert_eq!(params.particle_count(), 5000);
    }
}
