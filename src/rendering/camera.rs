use std::f32::consts::{FRAC_PI_2, PI};

use glam::{Mat4, Vec3};

pub(crate) const MIN_DISTANCE: f32 = 3.0;
pub(crate) const MAX_DISTANCE: f32 = 50.0;

// The polar angle stays strictly inside (0.1, PI - 0.1) so the camera never
// flips over a pole
const POLAR_MARGIN: f32 = 0.1;
const POLAR_EPSILON: f32 = 1e-4;
pub(crate) const MIN_POLAR: f32 = POLAR_MARGIN + POLAR_EPSILON;
pub(crate) const MAX_POLAR: f32 = PI - POLAR_MARGIN - POLAR_EPSILON;

const DRAG_SENSITIVITY: f32 = 0.01;
const ZOOM_SENSITIVITY: f32 = 0.01;

const FOV_Y_DEGREES: f32 = 75.0;
const Z_NEAR: f32 = 0.1;
const Z_FAR: f32 = 1000.0;

const DEFAULT_DISTANCE: f32 = 15.0;

/// Orbit camera that always looks at the origin.
///
/// `(distance, azimuth, polar)` is the only stored pose. The cartesian
/// position is recomputed from it whenever it is needed, and the angles are
/// never re-derived from that position, so long drag sessions do not drift.
pub(crate) struct OrbitCamera {
    distance: f32,
    azimuth: f32,
    polar: f32,
    aspect: f32,
    view: Mat4,

    // Mouse interaction state for camera control
    mouse_pressed: bool,
    last_mouse_position: [f32; 2],
}

impl OrbitCamera {
    pub(crate) fn new(width: u32, height: u32) -> Self {
        let mut camera = Self {
            distance: DEFAULT_DISTANCE,
            // Above and in front of the disk, like a viewer at (0, 8, 15)
            azimuth: FRAC_PI_2,
            polar: (8.0f32 / 17.0).acos(),
            aspect: 1.0,
            view: Mat4::IDENTITY,
            mouse_pressed: false,
            last_mouse_position: [0.0, 0.0],
        };
        camera.set_viewport(width, height);
        camera.look_at_origin();
        camera
    }

    pub(crate) fn distance(&self) -> f32 {
        self.distance
    }

    pub(crate) fn azimuth(&self) -> f32 {
        self.azimuth
    }

    pub(crate) fn polar(&self) -> f32 {
        self.polar
    }

    pub(crate) fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Cartesian eye position derived from the spherical pose.
    pub(crate) fn position(&self) -> Vec3 {
        let (sin_polar, cos_polar) = self.polar.sin_cos();
        let (sin_azimuth, cos_azimuth) = self.azimuth.sin_cos();
        self.distance * Vec3::new(sin_polar * cos_azimuth, cos_polar, sin_polar * sin_azimuth)
    }

    /// Re-targets the view at the origin from the current pose.
    pub(crate) fn look_at_origin(&mut self) {
        self.view = Mat4::look_at_rh(self.position(), Vec3::ZERO, Vec3::Y);
    }

    #[cfg(test)]
    pub(crate) fn view_matrix(&self) -> Mat4 {
        self.view
    }

    pub(crate) fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(FOV_Y_DEGREES.to_radians(), self.aspect, Z_NEAR, Z_FAR)
    }

    pub(crate) fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view
    }

    /// World-space right and up vectors of the image plane, for billboards.
    pub(crate) fn billboard_axes(&self) -> (Vec3, Vec3) {
        let forward = (-self.position()).normalize();
        let right = forward.cross(Vec3::Y).normalize();
        let up = right.cross(forward);
        (right, up)
    }

    /// Refits the projection to a new surface size.
    ///
    /// Returns `false` and keeps the previous aspect for a zero-area surface.
    pub(crate) fn set_viewport(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        self.aspect = width as f32 / height as f32;
        true
    }

    // Input handling methods
    pub(crate) fn handle_mouse_press(&mut self, position: [f32; 2]) {
        self.mouse_pressed = true;
        self.last_mouse_position = position;
    }

    pub(crate) fn handle_mouse_release(&mut self) {
        self.mouse_pressed = false;
    }

    /// Orbits while the button is held. Returns `true` if the pose changed.
    pub(crate) fn handle_mouse_move(&mut self, position: [f32; 2]) -> bool {
        if !self.mouse_pressed {
            return false;
        }

        let delta_x = position[0] - self.last_mouse_position[0];
        let delta_y = position[1] - self.last_mouse_position[1];

        self.azimuth -= delta_x * DRAG_SENSITIVITY;
        self.polar = (self.polar + delta_y * DRAG_SENSITIVITY).clamp(MIN_POLAR, MAX_POLAR);
        self.look_at_origin();

        self.last_mouse_position = position;
        true
    }

    /// Zooms along the current direction; positive deltas move away.
    pub(crate) fn handle_mouse_wheel(&mut self, delta_y: f32) {
        if !delta_y.is_finite() {
            return;
        }
        self.distance = (self.distance + delta_y * ZOOM_SENSITIVITY).clamp(MIN_DISTANCE, MAX_DISTANCE);
        self.look_at_origin();
    }
}
