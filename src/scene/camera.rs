use glam::{Mat4, Vec3};

/// Viewer camera. It sits at the center of the surface and only looks
/// around; the surface is moved through [`super::Settings`] instead.
pub struct Camera {
    pub position: Vec3,
    pub yaw: f32,   // Rotation around Y axis
    pub pitch: f32, // Rotation around X axis
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(position: Vec3, aspect: f32) -> Self {
        Self {
            position,
            yaw: -90.0,
            pitch: 0.0,
            fov: 70.0,
            aspect,
            near: 0.05,
            far: 2000.0,
        }
    }

    pub fn build_view_projection_matrix(&self) -> Mat4 {
        self.view_projection(self.aspect)
    }

    /// View-projection for a viewport whose aspect differs from the window's,
    /// such as one eye of a side-by-side preview.
    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        let projection = Mat4::perspective_rh(self.fov.to_radians(), aspect, self.near, self.far);

        let target = self.position + self.get_view_direction();
        let view = Mat4::look_at_rh(self.position, target, Vec3::Y);

        projection * view
    }

    pub fn get_view_direction(&self) -> Vec3 {
        let (yaw_sin, yaw_cos) = self.yaw.to_radians().sin_cos();
        let (pitch_sin, pitch_cos) = self.pitch.to_radians().sin_cos();
        Vec3::new(
            yaw_cos * pitch_cos,
            pitch_sin,
            yaw_sin * pitch_cos,
        ).normalize()
    }

    pub fn process_mouse(&mut self, dx: f32, dy: f32) {
        const MOUSE_SENSITIVITY: f32 = 0.2;

        self.yaw += dx * MOUSE_SENSITIVITY;
        let new_pitch = self.pitch - dy * MOUSE_SENSITIVITY;
        self.pitch = new_pitch.clamp(-89.0, 89.0);
    }
}
