use std::sync::Arc;

use anyhow::{Context, Result};
use glam::Vec3;
use winit::window::Window;

pub mod model;
pub mod scene;
pub mod shader_utils;

use scene::{Camera, Renderer, Scene, Settings, SurfaceOptions};

/// Size of the generated side-by-side test frame.
pub const TEST_FRAME_SIZE: (u32, u32) = (2048, 1024);

#[derive(Debug, Clone, Default)]
pub struct ViewerOptions {
    pub surface: SurfaceOptions,
    pub settings: Settings,
}

pub struct State {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pub scene: Scene,
    renderer: Renderer,
}

impl State {
    pub fn new(window: Window, options: &ViewerOptions) -> Result<Self> {
        let window = Arc::new(window);
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::default());
        let surface = instance
            .create_surface(window.clone())
            .context("Failed to create surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("Failed to find appropriate adapter")?;

        let info = adapter.get_info();
        log::info!("Using adapter: {} ({:?})", info.name, info.backend);

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("Primary Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_defaults().using_resolution(adapter.limits()),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("Failed to create device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(surface_caps.formats[0]);
        log::debug!("Selected surface format: {:?}", surface_format);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: surface_caps.present_modes[0],
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let mesh_data = options.surface.build_mesh();
        log::info!(
            "Built {:?} surface: {} vertices, {} triangles",
            options.surface.kind,
            mesh_data.vertices.len(),
            mesh_data.triangle_count()
        );

        let mut renderer = Renderer::new(&device, &config, &mesh_data)?;

        let (frame_width, frame_height) = TEST_FRAME_SIZE;
        renderer.write_frame(
            &device,
            &queue,
            &create_test_frame(frame_width, frame_height),
            frame_width,
            frame_height,
        )?;

        let camera = Camera::new(Vec3::ZERO, config.width as f32 / config.height as f32);
        let scene = Scene::new(camera, &options.surface, options.settings.clone());

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            scene,
            renderer,
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn size(&self) -> winit::dpi::PhysicalSize<u32> {
        winit::dpi::PhysicalSize::new(self.config.width, self.config.height)
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.renderer.resize(&self.device, &self.config);
            self.scene.resize(new_size.width, new_size.height);
        }
    }

    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        self.renderer.render(&self.device, &self.queue, &view, &self.scene);
        output.present();
        Ok(())
    }
}

/// Side-by-side checkerboard: warm squares for the left eye, cool squares for
/// the right eye, so a wrong eye split is obvious on screen.
pub fn create_test_frame(width: u32, height: u32) -> Vec<u8> {
    let mut data = Vec::with_capacity((width * height * 4) as usize);
    let squares_per_eye = 16;
    let square_size = ((width / 2) / squares_per_eye).max(1);

    for y in 0..height {
        for x in 0..width {
            let is_light = ((x / square_size) + (y / square_size)) % 2 == 0;
            let left_eye = x < width / 2;

            let color = match (left_eye, is_light) {
                (true, true) => [230u8, 180u8, 160u8, 255u8],
                (true, false) => [120u8, 60u8, 40u8, 255u8],
                (false, true) => [160u8, 190u8, 230u8, 255u8],
                (false, false) => [40u8, 70u8, 120u8, 255u8],
            };

            data.extend_from_slice(&color);
        }
    }
    data
}
