use bytemuck::{Pod, Zeroable};
use glam::Mat4;

// Particle envelope: anything inside the capture radius or beyond the escape
// radius is recycled before the tick ends
pub(crate) const CAPTURE_RADIUS: f32 = 1.2;
pub(crate) const ESCAPE_RADIUS: f32 = 15.0;

// Initial disk population
pub(crate) const SPAWN_MIN_RADIUS: f32 = 2.0;
pub(crate) const SPAWN_MAX_RADIUS: f32 = 14.0;
pub(crate) const SPAWN_HALF_THICKNESS: f32 = 0.25;

// Respawn bands for recycled particles
pub(crate) const CAPTURED_RESPAWN_RADIUS: (f32, f32) = (6.0, 14.0);
pub(crate) const ESCAPED_RESPAWN_RADIUS: (f32, f32) = (8.0, 11.0);
pub(crate) const RESPAWN_HALF_THICKNESS: f32 = 0.15;

// Gravity model
pub(crate) const GRAVITY_SOFTENING: f32 = 0.1; // keeps the force finite at the origin
pub(crate) const VERTICAL_DAMPING: f32 = 0.1;
pub(crate) const INTEGRATION_STEP: f32 = 0.01;
pub(crate) const ORBITAL_SPEED_SCALE: f32 = 0.5;

// Distance at which the particle color gradient saturates
pub(crate) const COLOR_FALLOFF_DISTANCE: f32 = 10.0;

// Starfield backdrop
pub(crate) const STAR_COUNT: usize = 2000;
pub(crate) const STAR_MIN_RADIUS: f32 = 50.0;
pub(crate) const STAR_MAX_RADIUS: f32 = 250.0;

// Billboard sizes in world units
pub(crate) const PARTICLE_SIZE: f32 = 0.05;
pub(crate) const STAR_SIZE: f32 = 0.5;

// One billboard as seen by the point shaders
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(crate) struct PointInstance {
    pub position: [f32; 4], // xyz = position, w = billboard size
    pub color: [f32; 4],    // rgba color
}

// Per-frame uniforms shared by every pipeline
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(crate) struct SceneUniforms {
    pub view_projection: [f32; 16],
    pub camera_right: [f32; 4],
    pub camera_up: [f32; 4],
    pub time: f32,
    pub brightness: f32,
    pub _padding: [f32; 2], // Padding to a 16 byte boundary
}

// Per-mesh uniforms: model transform and flat color
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(crate) struct MeshUniforms {
    pub model: [f32; 16],
    pub color: [f32; 4],
}

impl MeshUniforms {
    pub(crate) fn new(model: Mat4, color: [f32; 4]) -> Self {
        Self {
            model: model.to_cols_array(),
            color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_layouts_are_16_byte_aligned() {
        assert_eq!(std::mem::size_of::<PointInstance>(), 32);
        assert_eq!(std::mem::size_of::<SceneUniforms>() % 16, 0);
        assert_eq!(std::mem::size_of::<SceneUniforms>(), 112);
        assert_eq!(std::mem::size_of::<MeshUniforms>(), 80);
    }

    #[test]
    fn test_respawn_bands_sit_inside_envelope() {
        let captured_far =
            (CAPTURED_RESPAWN_RADIUS.1.powi(2) + RESPAWN_HALF_THICKNESS.powi(2)).sqrt();
        let escaped_far = (ESCAPED_RESPAWN_RADIUS.1.powi(2) + RESPAWN_HALF_THICKNESS.powi(2)).sqrt();
        assert!(CAPTURED_RESPAWN_RADIUS.0 > CAPTURE_RADIUS);
        assert!(ESCAPED_RESPAWN_RADIUS.0 > CAPTURE_RADIUS);
        assert!(captured_far < ESCAPE_RADIUS);
        assert!(escaped_far < ESCAPE_RADIUS);
    }
}
