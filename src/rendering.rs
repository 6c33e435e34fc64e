pub(crate) mod camera;
// CPU twin of the disk fragment shader, checked headlessly in tests
#[cfg_attr(not(test), allow(dead_code))]
pub(crate) mod disk_shader;
pub(crate) mod frame_clock;
pub(crate) mod geometry;
pub(crate) mod render_config;
mod render_pass;
mod renderer;
pub(crate) mod resources;
mod surface;

pub(crate) use renderer::Renderer;
