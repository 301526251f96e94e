use glam::Vec3;

use crate::model::shader_enum::shader_enum;

/// How far the surface may be pushed along any axis, in meters.
pub const TRANSLATION_LIMIT: f32 = 10.0;

shader_enum! {
    /// Layout of the incoming video frame.
    pub enum StereoType {
        /// One image for both eyes.
        Mono = 0,
        /// Left and right eye side by side.
        Stereo = 1,
    }
}

impl Default for StereoType {
    fn default() -> Self {
        StereoType::Stereo
    }
}

impl StereoType {
    pub fn toggled(self) -> Self {
        match self {
            StereoType::Mono => StereoType::Stereo,
            StereoType::Stereo => StereoType::Mono,
        }
    }

    pub fn eye_count(self) -> u32 {
        match self {
            StereoType::Mono => 1,
            StereoType::Stereo => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub translate_x: f32,
    pub translate_y: f32,
    pub translate_z: f32,
    pub stereo_type: StereoType,
    pub stereo_on: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            translate_x: 0.0,
            translate_y: 0.0,
            translate_z: 0.0,
            stereo_type: StereoType::default(),
            stereo_on: true,
        }
    }
}

impl Settings {
    pub fn translation(&self) -> Vec3 {
        Vec3::new(self.translate_x, self.translate_y, self.translate_z)
    }

    pub fn set_translation(&mut self, translation: Vec3) {
        let clamped = translation.clamp(
            Vec3::splat(-TRANSLATION_LIMIT),
            Vec3::splat(TRANSLATION_LIMIT),
        );
        self.translate_x = clamped.x;
        self.translate_y = clamped.y;
        self.translate_z = clamped.z;
    }

    pub fn translate(&mut self, delta: Vec3) {
        self.set_translation(self.translation() + delta);
    }

    pub fn reset_translations(&mut self) {
        self.translate_x = 0.0;
        self.translate_y = 0.0;
        self.translate_z = 0.0;
    }

    /// What the renderer should do with the frame right now.
    pub fn active_stereo_type(&self) -> StereoType {
        if self.stereo_on {
            self.stereo_type
        } else {
            StereoType::Mono
        }
    }
}
