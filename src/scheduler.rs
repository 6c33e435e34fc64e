//! Per-frame driver: one simulation tick, one draw and the telemetry update,
//! always in that order.

use std::sync::Arc;
use std::time::Instant;

use rand::SeedableRng;
use rand::rngs::StdRng;
use winit::window::Window;

use crate::error::GpuError;
use crate::rendering::Renderer;
use crate::rendering::frame_clock::FrameClock;
use crate::simulation::context::{CommandSender, SceneCommand, SimulationContext};
use crate::simulation::params::Parameters;
use crate::simulation::particles::RecycleStats;
use crate::simulation::starfield::create_stars;

pub(crate) const WINDOW_TITLE: &str = "Black Hole";

pub(crate) struct FrameScheduler {
    context: SimulationContext,
    renderer: Renderer,
    clock: FrameClock,
    sender: CommandSender,
    loaded: bool,
    shown_fps: Option<u32>,
}

impl FrameScheduler {
    /// Builds the scene and its GPU resources for `window`.
    pub(crate) async fn new(window: Arc<Window>, params: Parameters) -> Result<Self, GpuError> {
        let size = window.inner_size();
        let context = SimulationContext::new(params, size.width, size.height);
        let stars = create_stars(&mut StdRng::from_entropy());

        let renderer = Renderer::new(
            window,
            &context.scene_uniforms(),
            context.particles(),
            &stars,
        )
        .await?;

        renderer
            .get_window()
            .set_title(&format!("{WINDOW_TITLE} | Loading..."));
        log::info!(
            "scene ready: {} particles, {} stars",
            context.particles().len(),
            stars.len()
        );

        Ok(Self {
            sender: context.sender(),
            context,
            renderer,
            clock: FrameClock::new(Instant::now()),
            loaded: false,
            shown_fps: None,
        })
    }

    pub(crate) fn sender(&self) -> &CommandSender {
        &self.sender
    }

    pub(crate) fn request_redraw(&self) {
        self.renderer.get_window().request_redraw();
    }

    /// Resizes the surface now; the camera picks up the new aspect on the
    /// next tick.
    pub(crate) fn resize(&mut self, size: winit::dpi::PhysicalSize<u32>) {
        if self.renderer.resize(size) {
            self.sender.send(SceneCommand::Resize {
                width: size.width,
                height: size.height,
            });
        }
    }

    pub(crate) fn frame(&mut self) {
        let delta = self.clock.tick(Instant::now());
        let output = self.context.tick(delta);
        if output.particles_rebuilt {
            log::debug!("uploading rebuilt particle set");
        }
        if output.recycled != RecycleStats::default() {
            log::trace!(
                "recycled {} captured, {} escaped",
                output.recycled.captured,
                output.recycled.escaped
            );
        }

        let presented = self.renderer.render(&output, self.context.particles());
        if presented && !self.loaded {
            self.loaded = true;
            log::info!("first frame presented");
        }

        self.update_telemetry();
    }

    fn update_telemetry(&mut self) {
        if !self.loaded {
            return;
        }
        let fps = self.clock.fps();
        if self.shown_fps != Some(fps) {
            self.shown_fps = Some(fps);
            self.renderer
                .get_window()
                .set_title(&format!("{WINDOW_TITLE} | FPS: {fps}"));
        }
    }
}

impl Drop for FrameScheduler {
    fn drop(&mut self) {
        log::info!("stopping frame loop and releasing GPU resources");
    }
}
