use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::error::AppError;
use crate::scheduler::{FrameScheduler, WINDOW_TITLE};
use crate::simulation::context::SceneCommand;
use crate::simulation::params::{Parameters, Slider};

// Line-based wheels report notches; scale them to pixel-like units
const WHEEL_LINE_HEIGHT: f32 = 100.0;

#[derive(Default)]
enum AppState {
    #[default]
    Uninitialized,
    Running(Box<FrameScheduler>),
    Stopped,
}

#[derive(Default)]
pub(crate) struct App {
    state: AppState,
    last_cursor: [f32; 2],
    error: Option<AppError>,
}

impl App {
    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<(), AppError> {
        let attributes = Window::default_attributes().with_title(WINDOW_TITLE);
        let window = Arc::new(event_loop.create_window(attributes)?);

        let scheduler = pollster::block_on(FrameScheduler::new(window.clone(), Parameters::default()))?;
        self.state = AppState::Running(Box::new(scheduler));

        window.request_redraw();
        Ok(())
    }

    // Dropping the scheduler releases the surface, buffers and pipelines
    fn stop(&mut self, event_loop: &ActiveEventLoop) {
        if matches!(self.state, AppState::Running(_)) {
            self.state = AppState::Stopped;
        }
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if !matches!(self.state, AppState::Uninitialized) {
            return;
        }
        if let Err(err) = self.start(event_loop) {
            log::error!("failed to start: {}", err);
            self.error = Some(err);
            self.state = AppState::Stopped;
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let AppState::Running(scheduler) = &mut self.state else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                log::info!("The close button was pressed; stopping");
                self.stop(event_loop);
            }
            WindowEvent::RedrawRequested => {
                scheduler.frame();
                // Emits a new redraw requested event.
                scheduler.request_redraw();
            }
            WindowEvent::Resized(size) => {
                // Reconfigures the size of the surface. We do not re-render
                // here as this event is always followed up by redraw request.
                scheduler.resize(size);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                // Positive delta_y zooms out, matching browser wheel events
                let delta_y = match delta {
                    MouseScrollDelta::LineDelta(_, y) => -y * WHEEL_LINE_HEIGHT,
                    MouseScrollDelta::PixelDelta(position) => -position.y as f32,
                };
                scheduler.sender().send(SceneCommand::Wheel { delta_y });
            }
            WindowEvent::MouseInput {
                state: button_state,
                button: MouseButton::Left,
                ..
            } => {
                let command = match button_state {
                    ElementState::Pressed => {
                        // Use the last known position from CursorMoved events
                        let [x, y] = self.last_cursor;
                        SceneCommand::PointerDown { x, y }
                    }
                    ElementState::Released => SceneCommand::PointerUp,
                };
                scheduler.sender().send(command);
            }
            WindowEvent::CursorMoved { position, .. } => {
                let x = position.x as f32;
                let y = position.y as f32;
                self.last_cursor = [x, y];
                scheduler.sender().send(SceneCommand::PointerMove { x, y });
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key_code),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                if key_code == KeyCode::Escape {
                    self.stop(event_loop);
                } else if key_code == KeyCode::Home {
                    for command in reset_commands() {
                        scheduler.sender().send(command);
                    }
                } else if let Some(command) = slider_step(key_code) {
                    scheduler.sender().send(command);
                }
            }
            _ => (),
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        // Stops the frame loop even when the platform ends the loop for us
        self.state = AppState::Stopped;
    }
}

/// Maps the slider keys to relative steps, resolved when the queue is drained.
///
/// Q/A rotation speed, W/S disk brightness, E/D particle count, R/F gravity.
fn slider_step(key_code: KeyCode) -> Option<SceneCommand> {
    let (slider, steps) = match key_code {
        KeyCode::KeyQ => (Slider::RotationSpeed, 1),
        KeyCode::KeyA => (Slider::RotationSpeed, -1),
        KeyCode::KeyW => (Slider::DiskBrightness, 1),
        KeyCode::KeyS => (Slider::DiskBrightness, -1),
        KeyCode::KeyE => (Slider::ParticleCount, 1),
        KeyCode::KeyD => (Slider::ParticleCount, -1),
        KeyCode::KeyR => (Slider::GravityEffect, 1),
        KeyCode::KeyF => (Slider::GravityEffect, -1),
        _ => return None,
    };
    Some(SceneCommand::Step { slider, steps })
}

// Home puts every slider back to its start-up value
fn reset_commands() -> [SceneCommand; 4] {
    let defaults = Parameters::default();
    [
        SceneCommand::SetRotationSpeed(defaults.rotation_speed()),
        SceneCommand::SetDiskBrightness(defaults.disk_brightness()),
        SceneCommand::SetParticleCount(defaults.particle_count()),
        SceneCommand::SetGravityEffect(defaults.gravity_effect()),
    ]
}

pub(crate) fn run() -> Result<(), AppError> {
    // Initialize logger
    env_logger::init();

    // Create event loop
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    // Create app
    let mut app = App::default();
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slider_keys_send_relative_steps() {
        assert_eq!(
            slider_step(KeyCode::KeyE),
            Some(SceneCommand::Step {
                slider: Slider::ParticleCount,
                steps: 1
            })
        );
        assert_eq!(
            slider_step(KeyCode::KeyS),
            Some(SceneCommand::Step {
                slider: Slider::DiskBrightness,
                steps: -1
            })
        );
        assert_eq!(slider_step(KeyCode::KeyZ), None);
    }

    #[test]
    fn test_repeated_presses_before_a_tick_all_count() {
        let mut params = Parameters::default();
        let presses = [KeyCode::KeyE, KeyCode::KeyE, KeyCode::KeyE];

        for command in presses.into_iter().filter_map(slider_step) {
            let SceneCommand::Step { slider, steps } = command else {
                panic!("expected a step command");
            };
            params.step(slider, steps);
        }
        assert_eq!(params.particle_count(), 6500);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut params = Parameters::default();
        params.step(Slider::GravityEffect, 5);
        params.step(Slider::ParticleCount, -4);

        for command in reset_commands() {
            match command {
                SceneCommand::SetRotationSpeed(value) => params.set_rotation_speed(value),
                SceneCommand::SetDiskBrightness(value) => params.set_disk_brightness(value),
                SceneCommand::SetGravityEffect(value) => params.set_gravity_effect(value),
                SceneCommand::SetParticleCount(value) => {
                    params.set_particle_count(value);
                }
                _ => panic!("unexpected command {:?}", command),
            }
        }
        assert_eq!(params, Parameters::default());
    }
}
