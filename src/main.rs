use anyhow::Result;
use clap::Parser;
use glam::{UVec2, Vec2};
use winit::{
    event::*,
    keyboard::{KeyCode, PhysicalKey},
    window::{CursorGrabMode, Window, WindowBuilder},
};
use vr_plane_viewer::{
    model::{HemisphereMesh, PlaneMesh},
    scene::{Settings, StereoType, SurfaceKind, SurfaceOptions},
    State, ViewerOptions,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Surface the video frame is projected on
    #[arg(long, value_enum, default_value_t = SurfaceKind::Hemisphere)]
    surface: SurfaceKind,

    /// Treat frames as a single image instead of side-by-side stereo
    #[arg(long)]
    mono: bool,

    /// Plane width and height in meters
    #[arg(long, num_args = 2, default_values_t = [1.0, 1.0])]
    plane_size: Vec<f32>,

    /// Vertices along each plane axis
    #[arg(long, default_value_t = 16)]
    plane_grid: u32,

    /// Hemisphere radius in meters
    #[arg(long, default_value_t = 10.0)]
    radius: f32,

    #[arg(long, default_value_t = 128)]
    segments: u32,

    #[arg(long, default_value_t = 256)]
    rings: u32,

    /// Depth used for the surface bounds
    #[arg(long)]
    max_depth: Option<f32>,
}

impl Args {
    fn viewer_options(&self) -> Result<ViewerOptions> {
        let plane = PlaneMesh::new(
            Vec2::new(self.plane_size[0], self.plane_size[1]),
            UVec2::splat(self.plane_grid),
            self.max_depth.unwrap_or(1.0),
        )?;
        let hemisphere = HemisphereMesh::new(
            self.radius,
            self.segments,
            self.rings,
            self.max_depth.unwrap_or(1000.0),
        )?;

        let settings = Settings {
            stereo_type: if self.mono { StereoType::Mono } else { StereoType::Stereo },
            ..Settings::default()
        };

        Ok(ViewerOptions {
            surface: SurfaceOptions {
                kind: self.surface,
                plane,
                hemisphere,
            },
            settings,
        })
    }
}

fn set_cursor_grab(window: &Window, grabbed: bool) {
    if grabbed {
        if window.set_cursor_grab(CursorGrabMode::Confined).is_err() {
            let _ = window.set_cursor_grab(CursorGrabMode::Locked);
        }
        window.set_cursor_visible(false);
    } else {
        let _ = window.set_cursor_grab(CursorGrabMode::None);
        window.set_cursor_visible(true);
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let options = args.viewer_options()?;

    let event_loop = winit::event_loop::EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title("VR Plane Viewer")
        .with_visible(true)
        .build(&event_loop)?;

    let mut state = State::new(window, &options)?;
    let mut mouse_captured = false;

    log::info!("Arrows/PageUp/PageDown move the surface, R resets, M switches layout, T toggles stereo");

    event_loop.run(move |event, window_target| {
        match event {
            Event::WindowEvent { window_id, event } if window_id == state.window().id() => {
                match event {
                    WindowEvent::KeyboardInput {
                        event: KeyEvent {
                            physical_key: PhysicalKey::Code(key_code),
                            state: key_state,
                            ..
                        },
                        ..
                    } => {
                        let pressed = key_state == ElementState::Pressed;
                        match key_code {
                            KeyCode::Escape => {
                                if pressed {
                                    mouse_captured = false;
                                    set_cursor_grab(state.window(), false);
                                }
                            }
                            _ => {
                                state.scene.process_keyboard(key_code, pressed);
                            }
                        }
                    }
                    WindowEvent::MouseInput {
                        state: ElementState::Pressed,
                        button: MouseButton::Left,
                        ..
                    } => {
                        mouse_captured = true;
                        set_cursor_grab(state.window(), true);
                    }
                    WindowEvent::CloseRequested => {
                        window_target.exit();
                    }
                    WindowEvent::Resized(new_size) => {
                        state.resize(new_size);
                    }
                    WindowEvent::RedrawRequested => match state.render() {
                        Ok(()) => {}
                        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                            let size = state.size();
                            state.resize(size);
                        }
                        Err(wgpu::SurfaceError::OutOfMemory) => {
                            log::error!("Out of GPU memory, exiting");
                            window_target.exit();
                        }
                        Err(e) => log::warn!("Render error: {:?}", e),
                    },
                    _ => {}
                }
            }
            Event::DeviceEvent {
                event: DeviceEvent::MouseMotion { delta },
                ..
            } if mouse_captured => {
                state.scene.process_mouse(delta.0 as f32, delta.1 as f32);
            }
            Event::AboutToWait => {
                state.window().request_redraw();
            }
            _ => {}
        }
    })?;

    Ok(())
}
