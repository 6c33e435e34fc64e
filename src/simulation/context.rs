//! All mutable scene state, owned in one place.
//!
//! Input callbacks never touch the particles or the camera directly. They
//! push [`SceneCommand`]s through a [`CommandSender`]; the tick drains the
//! queue once, before advancing anything, so every tick sees a consistent
//! snapshot and a particle rebuild is never observed half-done.

use std::f32::consts::FRAC_PI_2;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

use glam::Mat4;

use crate::rendering::camera::OrbitCamera;
use crate::simulation::params::{Parameters, Slider};
use crate::simulation::particles::{ParticleSystem, RecycleStats};
use crate::simulation::types::SceneUniforms;

/// Input-driven mutations, applied at the start of the next tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum SceneCommand {
    PointerDown { x: f32, y: f32 },
    PointerMove { x: f32, y: f32 },
    PointerUp,
    Wheel { delta_y: f32 },
    Resize { width: u32, height: u32 },
    SetRotationSpeed(f32),
    SetDiskBrightness(f32),
    SetParticleCount(u32),
    SetGravityEffect(f32),
    /// Relative slider move, resolved against the value current at drain time.
    Step { slider: Slider, steps: i32 },
}

/// Cloneable producer side of the command queue.
#[derive(Clone)]
pub(crate) struct CommandSender(Sender<SceneCommand>);

impl CommandSender {
    pub(crate) fn send(&self, command: SceneCommand) {
        // The receiver only goes away on teardown; late input is dropped
        if self.0.send(command).is_err() {
            log::trace!("dropping {:?} after teardown", command);
        }
    }
}

/// What the renderer needs from one tick.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FrameOutput {
    pub scene: SceneUniforms,
    pub disk_model: Mat4,
    pub recycled: RecycleStats,
    pub particles_rebuilt: bool,
}

pub(crate) struct SimulationContext {
    params: Parameters,
    particles: ParticleSystem,
    camera: OrbitCamera,
    elapsed: f32,
    disk_rotation: f32,
    commands: Receiver<SceneCommand>,
    sender: CommandSender,
}

impl SimulationContext {
    pub(crate) fn new(params: Parameters, width: u32, height: u32) -> Self {
        let particles = ParticleSystem::new(params.particle_count());
        Self::with_particles(params, particles, width, height)
    }

    /// Builds the context around an existing particle collection.
    pub(crate) fn with_particles(
        params: Parameters,
        particles: ParticleSystem,
        width: u32,
        height: u32,
    ) -> Self {
        let (sender, commands) = mpsc::channel();
        Self {
            params,
            particles,
            camera: OrbitCamera::new(width, height),
            elapsed: 0.0,
            disk_rotation: 0.0,
            commands,
            sender: CommandSender(sender),
        }
    }

    pub(crate) fn sender(&self) -> CommandSender {
        self.sender.clone()
    }

    #[cfg(test)]
    pub(crate) fn params(&self) -> &Parameters {
        &self.params
    }

    pub(crate) fn particles(&self) -> &ParticleSystem {
        &self.particles
    }

    #[cfg(test)]
    pub(crate) fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    #[cfg(test)]
    pub(crate) fn elapsed(&self) -> f32 {
        self.elapsed
    }

    #[cfg(test)]
    pub(crate) fn disk_rotation(&self) -> f32 {
        self.disk_rotation
    }

    /// Runs one tick: apply queued input, advance time and disk spin, step the
    /// particles and re-aim the camera.
    pub(crate) fn tick(&mut self, delta: Duration) -> FrameOutput {
        let particles_rebuilt = self.drain_commands();

        self.elapsed += delta.as_secs_f32();
        self.disk_rotation += self.params.rotation_speed();

        let recycled = self.particles.update(self.params.gravity_effect());

        self.camera.look_at_origin();

        FrameOutput {
            scene: self.scene_uniforms(),
            disk_model: self.disk_model(),
            recycled,
            particles_rebuilt,
        }
    }

    // Returns true if the particle collection was replaced
    fn drain_commands(&mut self) -> bool {
        let previous_count = self.params.particle_count();
        while let Ok(command) = self.commands.try_recv() {
            self.apply(command);
        }

        // Only the count left after the whole batch matters
        let rebuild = self.params.particle_count() != previous_count;

        if rebuild {
            let count = self.params.particle_count();
            // Build the replacement fully, then swap
            let replacement = ParticleSystem::new(count);
            self.particles = replacement;
            log::info!("rebuilt particle buffers with {} particles", count);
        }
        rebuild
    }

    fn apply(&mut self, command: SceneCommand) {
        match command {
            SceneCommand::PointerDown { x, y } => self.camera.handle_mouse_press([x, y]),
            SceneCommand::PointerMove { x, y } => {
                self.camera.handle_mouse_move([x, y]);
            }
            SceneCommand::PointerUp => {
                self.camera.handle_mouse_release();
                log::trace!(
                    "camera azimuth = {}, polar = {}",
                    self.camera.azimuth(),
                    self.camera.polar()
                );
            }
            SceneCommand::Wheel { delta_y } => {
                self.camera.handle_mouse_wheel(delta_y);
                log::trace!("camera distance = {}", self.camera.distance());
            }
            SceneCommand::Resize { width, height } => {
                if self.camera.set_viewport(width, height) {
                    log::debug!("camera aspect = {}", self.camera.aspect());
                } else {
                    log::debug!("ignoring zero-area resize {}x{}", width, height);
                }
            }
            SceneCommand::SetRotationSpeed(value) => {
                self.params.set_rotation_speed(value);
                log::debug!("rotation speed = {}", self.params.rotation_speed());
            }
            SceneCommand::SetDiskBrightness(value) => {
                self.params.set_disk_brightness(value);
                log::debug!("disk brightness = {}", self.params.disk_brightness());
            }
            SceneCommand::SetGravityEffect(value) => {
                self.params.set_gravity_effect(value);
                log::debug!("gravity effect = {}", self.params.gravity_effect());
            }
            SceneCommand::SetParticleCount(value) => {
                self.params.set_particle_count(value);
                log::debug!("particle count = {}", self.params.particle_count());
            }
            SceneCommand::Step { slider, steps } => {
                self.params.step(slider, steps);
                log::debug!("{:?} stepped by {} to {:?}", slider, steps, self.params);
            }
        }
    }

    pub(crate) fn scene_uniforms(&self) -> SceneUniforms {
        let (right, up) = self.camera.billboard_axes();
        SceneUniforms {
            view_projection: self.camera.view_projection().to_cols_array(),
            camera_right: right.extend(0.0).to_array(),
            camera_up: up.extend(0.0).to_array(),
            time: self.elapsed,
            brightness: self.params.disk_brightness(),
            _padding: [0.0; 2],
        }
    }

    // Flat in the horizontal plane, spun about its own normal
    fn disk_model(&self) -> Mat4 {
        Mat4::from_rotation_x(-FRAC_PI_2) * Mat4::from_rotation_z(self.disk_rotation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::types::{CAPTURE_RADIUS, ESCAPE_RADIUS};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use glam::Vec3;

    const FRAME: Duration = Duration::from_millis(16);

    fn disk_normal(model: Mat4) -> Vec3 {
        model.transform_vector3(Vec3::Z).normalize()
    }

    fn context(params: Parameters, seed: u64) -> SimulationContext {
        let particles = ParticleSystem::with_rng(params.particle_count(), StdRng::seed_from_u64(seed));
        SimulationContext::with_particles(params, particles, 800, 600)
    }

    #[test]
    fn test_single_tick_scenario() {
        let mut params = Parameters::default();
        params.set_particle_count(1000);
        params.set_gravity_effect(0.1);
        params.set_rotation_speed(0.0);
        let mut ctx = context(params, 1);

        let output = ctx.tick(FRAME);

        assert_eq!(ctx.disk_rotation(), 0.0);
        assert_eq!(output.disk_model, Mat4::from_rotation_x(-FRAC_PI_2));
        assert_eq!(ctx.particles().len(), 1000);
        for position in ctx.particles().positions() {
            let distance = position.length();
            assert!((CAPTURE_RADIUS..=ESCAPE_RADIUS).contains(&distance));
        }
    }

    #[test]
    fn test_time_and_rotation_advance_each_tick() {
        let mut ctx = context(Parameters::default(), 2);

        let first = ctx.tick(FRAME);
        let second = ctx.tick(FRAME);

        assert!(second.scene.time > first.scene.time);
        assert!((ctx.disk_rotation() - 0.01).abs() < 1e-6);
        assert_eq!(second.scene.brightness, 1.5);
        assert!((disk_normal(second.disk_model) - Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn test_same_particle_count_keeps_buffers() {
        let mut ctx = context(Parameters::default(), 3);
        let before: Vec<Vec3> = ctx.particles().positions().to_vec();
        let buffer = ctx.particles().positions().as_ptr();

        ctx.sender().send(SceneCommand::SetParticleCount(5000));
        let rebuilt = ctx.drain_commands();

        assert!(!rebuilt);
        assert_eq!(ctx.particles().positions().as_ptr(), buffer);
        assert_eq!(ctx.particles().positions(), &before[..]);
    }

    #[test]
    fn test_new_particle_count_rebuilds_exactly() {
        let mut ctx = context(Parameters::default(), 4);
        let sender = ctx.sender();

        sender.send(SceneCommand::SetParticleCount(2500));
        let output = ctx.tick(FRAME);

        assert!(output.particles_rebuilt);
        assert_eq!(ctx.params().particle_count(), 2500);
        assert_eq!(ctx.particles().len(), 2500);
        assert_eq!(ctx.particles().velocities().len(), 2500);
        assert_eq!(ctx.particles().colors().len(), 2500);

        sender.send(SceneCommand::SetParticleCount(1000));
        ctx.tick(FRAME);
        assert_eq!(ctx.particles().len(), 1000);
    }

    #[test]
    fn test_count_round_trip_within_tick_keeps_buffers() {
        let mut ctx = context(Parameters::default(), 9);
        let buffer = ctx.particles().positions().as_ptr();
        let sender = ctx.sender();

        sender.send(SceneCommand::SetParticleCount(2500));
        sender.send(SceneCommand::SetParticleCount(5000));
        let output = ctx.tick(FRAME);

        assert!(!output.particles_rebuilt);
        assert_eq!(ctx.particles().len(), 5000);
        assert_eq!(ctx.particles().positions().as_ptr(), buffer);
    }

    #[test]
    fn test_queued_steps_accumulate() {
        let mut ctx = context(Parameters::default(), 10);
        let sender = ctx.sender();

        for _ in 0..2 {
            sender.send(SceneCommand::Step {
                slider: Slider::ParticleCount,
                steps: 1,
            });
        }
        let output = ctx.tick(FRAME);

        assert!(output.particles_rebuilt);
        assert_eq!(ctx.params().particle_count(), 6000);
        assert_eq!(ctx.particles().len(), 6000);
    }

    #[test]
    fn test_commands_apply_only_at_tick_start() {
        let mut ctx = context(Parameters::default(), 5);
        let distance = ctx.camera().distance();

        ctx.sender().send(SceneCommand::Wheel { delta_y: 300.0 });
        assert_eq!(ctx.camera().distance(), distance);

        ctx.tick(FRAME);
        assert!((ctx.camera().distance() - (distance + 3.0)).abs() < 1e-5);
    }

    #[test]
    fn test_pointer_commands_orbit_camera() {
        let mut ctx = context(Parameters::default(), 6);
        let azimuth = ctx.camera().azimuth();
        let sender = ctx.sender();

        sender.send(SceneCommand::PointerDown { x: 10.0, y: 10.0 });
        sender.send(SceneCommand::PointerMove { x: 60.0, y: 10.0 });
        sender.send(SceneCommand::PointerUp);
        sender.send(SceneCommand::PointerMove { x: 500.0, y: 10.0 });
        ctx.tick(FRAME);

        assert!((ctx.camera().azimuth() - (azimuth - 0.5)).abs() < 1e-5);
    }

    #[test]
    fn test_parameter_commands_are_clamped() {
        let mut ctx = context(Parameters::default(), 7);
        let sender = ctx.sender();

        sender.send(SceneCommand::SetRotationSpeed(5.0));
        sender.send(SceneCommand::SetDiskBrightness(-1.0));
        sender.send(SceneCommand::SetGravityEffect(9.0));
        ctx.tick(FRAME);

        assert_eq!(ctx.params().rotation_speed(), 0.02);
        assert_eq!(ctx.params().disk_brightness(), 0.1);
        assert_eq!(ctx.params().gravity_effect(), 2.0);
    }

    #[test]
    fn test_resize_keeps_scene_state() {
        let mut ctx = context(Parameters::default(), 8);
        ctx.tick(FRAME);
        let positions: Vec<Vec3> = ctx.particles().positions().to_vec();
        let pose = (ctx.camera().distance(), ctx.camera().azimuth(), ctx.camera().polar());

        ctx.sender().send(SceneCommand::Resize { width: 0, height: 0 });
        ctx.drain_commands();
        assert_eq!(ctx.camera().aspect(), 800.0 / 600.0);

        ctx.sender().send(SceneCommand::Resize { width: 1000, height: 500 });
        ctx.drain_commands();
        assert_eq!(ctx.camera().aspect(), 2.0);
        assert_eq!(ctx.particles().positions(), &positions[..]);
        assert_eq!(
            (ctx.camera().distance(), ctx.camera().azimuth(), ctx.camera().polar()),
            pose
        );
    }
}
