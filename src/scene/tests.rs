use super::*;
use super::renderer::eye_viewport;
use crate::model::{EnumBackingType, HemisphereMesh, PlaneMesh};
use glam::{UVec2, Vec2, Vec3, Vec4Swizzles};
use pollster::FutureExt;
use winit::keyboard::KeyCode;

struct TestContext {
    device: wgpu::Device,
    queue: wgpu::Queue,
}

impl TestContext {
    fn new() -> Self {
        let instance = wgpu::Instance::default();

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                force_fallback_adapter: false,
                compatible_surface: None,
            })
            .block_on()
            .expect("Failed to find an appropriate adapter");

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: None,
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::downlevel_defaults(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .block_on()
            .expect("Failed to create device");

        Self { device, queue }
    }
}

fn test_scene(kind: SurfaceKind) -> Scene {
    let options = SurfaceOptions {
        kind,
        ..SurfaceOptions::default()
    };
    Scene::new(Camera::new(Vec3::ZERO, 1.0), &options, Settings::default())
}

#[test]
fn test_settings_defaults() {
    let settings = Settings::default();
    assert_eq!(settings.translation(), Vec3::ZERO);
    assert_eq!(settings.stereo_type, StereoType::Stereo);
    assert!(settings.stereo_on);
    assert_eq!(settings.active_stereo_type(), StereoType::Stereo);
}

#[test]
fn test_settings_translation_is_clamped() {
    let mut settings = Settings::default();
    settings.set_translation(Vec3::new(25.0, -25.0, 3.0));
    assert_eq!(settings.translation(), Vec3::new(10.0, -10.0, 3.0));

    settings.translate(Vec3::new(-1.0, 0.5, 20.0));
    assert_eq!(settings.translation(), Vec3::new(9.0, -9.5, 10.0));
}

#[test]
fn test_reset_translations() {
    let mut settings = Settings::default();
    settings.set_translation(Vec3::new(1.0, 2.0, 3.0));
    settings.stereo_type = StereoType::Mono;
    settings.reset_translations();
    assert_eq!(settings.translation(), Vec3::ZERO);
    assert_eq!(settings.stereo_type, StereoType::Mono, "reset only touches translation");
}

#[test]
fn test_stereo_off_renders_mono() {
    let mut settings = Settings::default();
    settings.stereo_on = false;
    assert_eq!(settings.active_stereo_type(), StereoType::Mono);
    assert_eq!(settings.active_stereo_type().eye_count(), 1);
}

#[test]
fn test_stereo_type_is_shader_visible() {
    assert_eq!(std::mem::size_of::<StereoType>(), std::mem::size_of::<EnumBackingType>());
    assert_eq!(StereoType::Mono.to_raw(), 0);
    assert_eq!(StereoType::Stereo.to_raw(), 1);
    assert_eq!(StereoType::try_from(1_i32).unwrap(), StereoType::Stereo);
    assert!(StereoType::try_from(2_i32).is_err());
    assert_eq!(
        StereoType::wgsl_constants(),
        "const STEREO_TYPE_MONO: i32 = 0;\nconst STEREO_TYPE_STEREO: i32 = 1;\n"
    );
    assert_eq!(StereoType::Mono.toggled(), StereoType::Stereo);
}

#[test]
fn test_transform_new() {
    let transform = Transform::new();
    assert_eq!(transform.position, Vec3::ZERO);
    assert_eq!(transform.rotation, Vec3::ZERO);
    assert_eq!(transform.scale, Vec3::ONE);
}

#[test]
fn test_transform_matrix() {
    let mut transform = Transform::new();

    transform.position = Vec3::new(1.0, 2.0, 3.0);
    let matrix = transform.to_matrix();
    assert_eq!(matrix.col(3).xyz(), Vec3::new(1.0, 2.0, 3.0));

    transform = Transform::new();
    transform.scale = Vec3::new(2.0, 2.0, 2.0);
    let matrix = transform.to_matrix();
    assert_eq!(matrix.col(0).x, 2.0);
    assert_eq!(matrix.col(1).y, 2.0);
    assert_eq!(matrix.col(2).z, 2.0);
}

#[test]
fn test_surface_transform_follows_settings() {
    let mut scene = test_scene(SurfaceKind::Plane);
    assert_eq!(scene.surface_transform().position, Vec3::new(0.0, 0.0, -PLANE_DISTANCE));

    scene.settings.set_translation(Vec3::new(0.5, -0.5, 1.0));
    assert_eq!(
        scene.surface_transform().position,
        Vec3::new(0.5, -0.5, 1.0 - PLANE_DISTANCE)
    );

    let hemisphere = test_scene(SurfaceKind::Hemisphere);
    assert_eq!(hemisphere.surface_transform().position, Vec3::ZERO);
}

#[test]
fn test_keyboard_controls() {
    let mut scene = test_scene(SurfaceKind::Plane);

    assert!(scene.process_keyboard(KeyCode::ArrowRight, true));
    assert!(scene.process_keyboard(KeyCode::PageUp, true));
    assert!(!scene.process_keyboard(KeyCode::ArrowRight, false), "releases are ignored");
    assert_eq!(
        scene.settings.translation(),
        Vec3::new(TRANSLATION_STEP, 0.0, TRANSLATION_STEP)
    );

    assert!(scene.process_keyboard(KeyCode::KeyR, true));
    assert_eq!(scene.settings.translation(), Vec3::ZERO);

    assert!(scene.process_keyboard(KeyCode::KeyM, true));
    assert_eq!(scene.settings.stereo_type, StereoType::Mono);

    assert!(scene.process_keyboard(KeyCode::KeyT, true));
    assert!(!scene.settings.stereo_on);

    assert!(!scene.process_keyboard(KeyCode::KeyQ, true));
}

#[test]
fn test_scene_resize() {
    let mut scene = test_scene(SurfaceKind::Hemisphere);
    scene.resize(1600, 900);
    assert!((scene.camera.aspect - 1600.0 / 900.0).abs() < f32::EPSILON);

    // zero-sized windows keep the last aspect
    scene.resize(0, 900);
    assert!((scene.camera.aspect - 1600.0 / 900.0).abs() < f32::EPSILON);
}

#[test]
fn test_surface_options_build_mesh() {
    let mut options = SurfaceOptions::default();
    options.kind = SurfaceKind::Plane;
    assert_eq!(options.build_mesh().vertices.len(), options.plane.vertex_count());

    options.kind = SurfaceKind::Hemisphere;
    options.hemisphere = crate::model::HemisphereMesh::new(1.0, 4, 4, 1.0).unwrap();
    assert_eq!(options.build_mesh().vertices.len(), 25);
}

#[test]
fn test_eye_viewports() {
    assert_eq!(eye_viewport(1920, 1080, 0, 1), (0.0, 0.0, 1920.0, 1080.0));
    assert_eq!(eye_viewport(1920, 1080, 0, 2), (0.0, 0.0, 960.0, 1080.0));
    assert_eq!(eye_viewport(1920, 1080, 1, 2), (960.0, 0.0, 960.0, 1080.0));
}

#[test]
fn test_plane_uniforms() {
    let uniforms = PlaneUniforms::new(
        glam::Mat4::IDENTITY,
        glam::Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0)),
        StereoType::Stereo,
        1,
    );
    assert_eq!(uniforms.model[3], [1.0, 2.0, 3.0, 1.0]);
    assert_eq!(uniforms.stereo_type, 1);
    assert_eq!(uniforms.eye_index, 1);

    let bytes = bytemuck::bytes_of(&uniforms);
    assert_eq!(bytes.len(), 144);
    assert_eq!(&bytes[128..132], &1_i32.to_le_bytes());
}

/// Frame coordinates (origin top-left) that `plane.wgsl` samples for a
/// vertex texture coordinate.
fn sampled_frame_uv(tex_coord: [f32; 2], stereo_type: StereoType, eye: u32) -> Vec2 {
    let mut uv = Vec2::from_array(tex_coord);
    if stereo_type == StereoType::Stereo {
        uv.x = uv.x * 0.5 + eye as f32 * 0.5;
    }
    Vec2::new(uv.x, 1.0 - uv.y)
}

/// Window pixel (origin top-left) a surface vertex lands on, or `None` when
/// it is not in front of the camera.
fn window_position(scene: &Scene, position: [f32; 3], viewport: (f32, f32, f32, f32)) -> Option<Vec2> {
    let (x, y, width, height) = viewport;
    let clip = scene.camera.view_projection(width / height)
        * scene.surface_transform().to_matrix()
        * Vec3::from_array(position).extend(1.0);
    if clip.w < 1e-3 {
        return None;
    }
    let ndc = clip.xy() / clip.w;
    Some(Vec2::new(
        x + (ndc.x + 1.0) * 0.5 * width,
        y + (1.0 - ndc.y) * 0.5 * height,
    ))
}

/// Every vertex must show its part of the frame in the matching quadrant of
/// its eye's viewport: frame left on screen left, frame top on screen top.
fn assert_frame_upright(kind: SurfaceKind, stereo_type: StereoType) {
    let options = SurfaceOptions {
        kind,
        plane: PlaneMesh::new(Vec2::ONE, UVec2::splat(5), 1.0).unwrap(),
        hemisphere: HemisphereMesh::new(10.0, 8, 8, 1000.0).unwrap(),
    };
    let settings = Settings {
        stereo_type,
        ..Settings::default()
    };
    let scene = Scene::new(Camera::new(Vec3::ZERO, 2.0), &options, settings);
    let data = options.build_mesh();
    let eye_count = stereo_type.eye_count();
    let mut checked = 0;

    for eye in 0..eye_count {
        let viewport = eye_viewport(1600, 800, eye, eye_count);
        let center = Vec2::new(viewport.0 + viewport.2 / 2.0, viewport.1 + viewport.3 / 2.0);

        for vertex in &data.vertices {
            let [u, v] = vertex.tex_coord;
            if (u - 0.5).abs() < 1e-3 || (v - 0.5).abs() < 1e-3 {
                continue;
            }
            let Some(pixel) = window_position(&scene, vertex.position, viewport) else {
                continue;
            };
            let frame = sampled_frame_uv(vertex.tex_coord, stereo_type, eye);

            if stereo_type == StereoType::Stereo {
                let half_start = eye as f32 * 0.5;
                assert!(
                    frame.x >= half_start && frame.x <= half_start + 0.5,
                    "eye {} sampled frame u = {}",
                    eye,
                    frame.x
                );
            }
            assert_eq!(
                u < 0.5,
                pixel.x < center.x,
                "{:?} eye {}: u = {} landed at x = {} (viewport center {})",
                kind,
                eye,
                u,
                pixel.x,
                center.x
            );
            assert_eq!(
                frame.y < 0.5,
                pixel.y < center.y,
                "{:?} eye {}: frame v = {} landed at y = {} (viewport center {})",
                kind,
                eye,
                frame.y,
                pixel.y,
                center.y
            );
            checked += 1;
        }
    }
    assert!(checked > 8, "only {} vertices were in front of the camera", checked);
}

#[test]
fn test_plane_shows_frame_upright_mono() {
    assert_frame_upright(SurfaceKind::Plane, StereoType::Mono);
}

#[test]
fn test_plane_shows_frame_upright_per_eye() {
    assert_frame_upright(SurfaceKind::Plane, StereoType::Stereo);
}

#[test]
fn test_hemisphere_shows_frame_upright_mono() {
    assert_frame_upright(SurfaceKind::Hemisphere, StereoType::Mono);
}

#[test]
fn test_hemisphere_shows_frame_upright_per_eye() {
    assert_frame_upright(SurfaceKind::Hemisphere, StereoType::Stereo);
}

#[test]
fn test_plane_left_edge_is_screen_left() {
    let scene = test_scene(SurfaceKind::Plane);
    let view_proj = scene.camera.view_projection(1.0) * scene.surface_transform().to_matrix();

    let left_edge: Vec<_> = PlaneMesh::default()
        .build()
        .vertices
        .into_iter()
        .filter(|v| v.tex_coord[0] == 0.0)
        .collect();
    assert_eq!(left_edge.len(), 16);
    for vertex in left_edge {
        let clip = view_proj * Vec3::from_array(vertex.position).extend(1.0);
        assert!(clip.x / clip.w < 0.0, "u = 0 edge at clip x = {}", clip.x / clip.w);
    }
}

#[test]
#[ignore = "needs a GPU adapter"]
fn test_renderer_creation() {
    let ctx = TestContext::new();

    let config = wgpu::SurfaceConfiguration {
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        format: wgpu::TextureFormat::Bgra8UnormSrgb,
        width: 800,
        height: 600,
        present_mode: wgpu::PresentMode::Fifo,
        alpha_mode: wgpu::CompositeAlphaMode::Auto,
        view_formats: vec![],
        desired_maximum_frame_latency: 2,
    };

    let mesh_data = crate::model::PlaneMesh::default().build();
    let mut renderer = Renderer::new(&ctx.device, &config, &mesh_data).unwrap();
    assert_eq!(renderer.mesh.num_elements as usize, mesh_data.indices.len());

    let frame = crate::create_test_frame(64, 32);
    renderer.write_frame(&ctx.device, &ctx.queue, &frame, 64, 32).unwrap();
    assert!(renderer.write_frame(&ctx.device, &ctx.queue, &frame, 63, 32).is_err());
}
