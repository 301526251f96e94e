pub mod camera;
pub mod renderer;
pub mod settings;
pub mod transform;
#[cfg(test)]
mod tests;

pub use camera::Camera;
pub use renderer::{PlaneUniforms, Renderer};
pub use settings::{Settings, StereoType};
pub use transform::Transform;

use glam::Vec3;
use winit::keyboard::KeyCode;

use crate::model::{HemisphereMesh, MeshData, PlaneMesh};

/// Distance between the viewer and a flat surface.
pub const PLANE_DISTANCE: f32 = 1.5;

/// Step applied by one key press when nudging the surface, in meters.
pub const TRANSLATION_STEP: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SurfaceKind {
    /// Flat screen in front of the viewer
    Plane,
    /// 180° dome around the viewer for VR-180 footage
    Hemisphere,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceOptions {
    pub kind: SurfaceKind,
    pub plane: PlaneMesh,
    pub hemisphere: HemisphereMesh,
}

impl Default for SurfaceOptions {
    fn default() -> Self {
        Self {
            kind: SurfaceKind::Hemisphere,
            plane: PlaneMesh::default(),
            hemisphere: HemisphereMesh::default(),
        }
    }
}

impl SurfaceOptions {
    pub fn build_mesh(&self) -> MeshData {
        match self.kind {
            SurfaceKind::Plane => self.plane.build(),
            SurfaceKind::Hemisphere => self.hemisphere.build(),
        }
    }

    /// Where the surface sits before any user translation.
    pub fn base_transform(&self) -> Transform {
        match self.kind {
            SurfaceKind::Plane => Transform::from_position(Vec3::new(0.0, 0.0, -PLANE_DISTANCE)),
            SurfaceKind::Hemisphere => Transform::new(),
        }
    }
}

pub struct Scene {
    pub camera: Camera,
    pub settings: Settings,
    pub surface: SurfaceKind,
    base_transform: Transform,
}

impl Scene {
    pub fn new(camera: Camera, surface: &SurfaceOptions, settings: Settings) -> Self {
        Self {
            camera,
            settings,
            surface: surface.kind,
            base_transform: surface.base_transform(),
        }
    }

    pub fn surface_transform(&self) -> Transform {
        self.base_transform.translated(self.settings.translation())
    }

    /// Applies a key press to the settings. Returns whether the key was used.
    pub fn process_keyboard(&mut self, key: KeyCode, pressed: bool) -> bool {
        if !pressed {
            return false;
        }

        let step = TRANSLATION_STEP;
        match key {
            KeyCode::ArrowLeft => self.settings.translate(Vec3::new(-step, 0.0, 0.0)),
            KeyCode::ArrowRight => self.settings.translate(Vec3::new(step, 0.0, 0.0)),
            KeyCode::ArrowDown => self.settings.translate(Vec3::new(0.0, -step, 0.0)),
            KeyCode::ArrowUp => self.settings.translate(Vec3::new(0.0, step, 0.0)),
            KeyCode::PageDown => self.settings.translate(Vec3::new(0.0, 0.0, -step)),
            KeyCode::PageUp => self.settings.translate(Vec3::new(0.0, 0.0, step)),
            KeyCode::KeyR => {
                self.settings.reset_translations();
                log::info!("Surface translation reset");
            }
            KeyCode::KeyM => {
                self.settings.stereo_type = self.settings.stereo_type.toggled();
                log::info!("Frame layout: {:?}", self.settings.stereo_type);
            }
            KeyCode::KeyT => {
                self.settings.stereo_on = !self.settings.stereo_on;
                log::info!("Stereo {}", if self.settings.stereo_on { "on" } else { "off" });
            }
            _ => return false,
        }

        log::debug!("Surface translation now {:?}", self.settings.translation());
        true
    }

    pub fn process_mouse(&mut self, dx: f32, dy: f32) {
        self.camera.process_mouse(dx, dy);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.camera.aspect = width as f32 / height as f32;
        }
    }
}
