use std::sync::Arc;

use winit::window::Window;

use crate::error::GpuError;
use crate::rendering::render_config::RenderConfig;
use crate::rendering::render_pass::create_scene_render_pass;
use crate::rendering::resources::SceneResources;
use crate::rendering::surface::{configure_surface, create_depth_view};
use crate::simulation::context::FrameOutput;
use crate::simulation::particles::ParticleSystem;
use crate::simulation::types::{PointInstance, SceneUniforms};

pub(crate) struct Renderer {
    window: Arc<Window>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    size: winit::dpi::PhysicalSize<u32>,
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    depth_view: wgpu::TextureView,

    // Pipelines and bind group layouts
    render_config: RenderConfig,

    // Buffers and bind groups for every drawable
    resources: SceneResources,
}

impl Renderer {
    pub(crate) async fn new(
        window: Arc<Window>,
        scene: &SceneUniforms,
        particles: &ParticleSystem,
        stars: &[PointInstance],
    ) -> Result<Self, GpuError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            #[cfg(not(target_arch = "wasm32"))]
            backends: wgpu::Backends::PRIMARY,
            #[cfg(target_arch = "wasm32")]
            backends: wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        log::info!("using adapter {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                required_features: wgpu::Features::empty(),
                // WebGL doesn't support all of wgpu's features, so if
                // we're building for the web, we'll have to disable some.
                required_limits: if cfg!(target_arch = "wasm32") {
                    wgpu::Limits::downlevel_webgl2_defaults()
                } else {
                    wgpu::Limits::default()
                },
                label: Some("Black Hole Device"),
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);

        // Configure surface for the first time
        let surface_config = configure_surface(&device, &size, &surface, &surface_caps)?;
        let depth_view = create_depth_view(&device, &surface_config);

        let render_config = RenderConfig::new(&device, surface_config.format);
        let resources = SceneResources::new(&device, &render_config, scene, particles, stars);

        Ok(Self {
            window,
            device,
            queue,
            size,
            surface,
            surface_config,
            depth_view,
            render_config,
            resources,
        })
    }

    pub(crate) fn get_window(&self) -> &Window {
        &self.window
    }

    /// Reconfigures the surface and depth buffer. A zero-area size (minimized
    /// window) is ignored and the previous configuration stays in place.
    pub(crate) fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) -> bool {
        if new_size.width == 0 || new_size.height == 0 {
            return false;
        }
        self.size = new_size;
        self.surface_config.width = new_size.width;
        self.surface_config.height = new_size.height;
        self.reconfigure();
        true
    }

    fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.surface_config);
        self.depth_view = create_depth_view(&self.device, &self.surface_config);
    }

    /// Uploads one tick's state and draws it. Returns false if no frame was
    /// presented; the next tick simply tries again.
    pub(crate) fn render(&mut self, frame: &FrameOutput, particles: &ParticleSystem) -> bool {
        self.resources.update_scene(&self.queue, &frame.scene);
        self.resources.update_disk(&self.queue, frame.disk_model);
        self.resources
            .update_particles(&self.device, &self.queue, &self.render_config, particles);

        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("surface lost or outdated at {:?}; reconfiguring", self.size);
                self.reconfigure();
                return false;
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("timed out acquiring the next frame; skipping");
                return false;
            }
            Err(err) => {
                log::warn!("failed to acquire the next frame: {}", err);
                return false;
            }
        };

        let texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor {
                format: Some(self.render_config.surface_format.add_srgb_suffix()),
                ..Default::default()
            });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Scene Command Encoder"),
            });

        {
            let mut render_pass = create_scene_render_pass(
                &mut encoder,
                &texture_view,
                &self.depth_view,
                wgpu::Color::BLACK,
            );
            render_pass.set_bind_group(0, &self.resources.scene_bind_group, &[]);

            // Backdrop first, then the opaque body so its depth hides what lies behind
            render_pass.set_pipeline(&self.render_config.star_pipeline);
            self.resources.stars.draw(&mut render_pass);

            render_pass.set_pipeline(&self.render_config.body_pipeline);
            self.resources.body.draw(&mut render_pass);

            render_pass.set_pipeline(&self.render_config.glow_pipeline);
            self.resources.glow.draw(&mut render_pass);

            render_pass.set_pipeline(&self.render_config.disk_pipeline);
            self.resources.disk.draw(&mut render_pass);

            render_pass.set_pipeline(&self.render_config.particle_pipeline);
            self.resources.particles.draw(&mut render_pass);
        }

        // submit will accept anything that implements IntoIter
        self.queue.submit(std::iter::once(encoder.finish()));
        self.window.pre_present_notify();
        surface_texture.present();

        true
    }
}
