use std::mem::{offset_of, size_of};

use glam::{Vec2, Vec3};
use static_assertions::const_assert_eq;

/// One vertex of a video surface mesh.
///
/// This is the only definition of the layout. The WGSL side gets its
/// `PlaneVertex` struct from [`PlaneVertex::wgsl_declaration`] and the
/// pipeline gets its attributes from [`PlaneVertex::desc`], so neither can
/// drift from the bytes written here.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PlaneVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coord: [f32; 2],
}

const_assert_eq!(size_of::<PlaneVertex>(), 32);
const_assert_eq!(offset_of!(PlaneVertex, position), 0);
const_assert_eq!(offset_of!(PlaneVertex, normal), 12);
const_assert_eq!(offset_of!(PlaneVertex, tex_coord), 24);

/// Attribute shapes `PlaneVertex` is built from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum AttributeType {
    Vec2,
    Vec3,
}

impl AttributeType {
    const fn format(self) -> wgpu::VertexFormat {
        match self {
            AttributeType::Vec2 => wgpu::VertexFormat::Float32x2,
            AttributeType::Vec3 => wgpu::VertexFormat::Float32x3,
        }
    }

    const fn wgsl(self) -> &'static str {
        match self {
            AttributeType::Vec2 => "vec2<f32>",
            AttributeType::Vec3 => "vec3<f32>",
        }
    }
}

impl PlaneVertex {
    /// Field names in declaration order, indexed by shader location.
    pub const FIELD_NAMES: [&'static str; 3] = ["position", "normal", "tex_coord"];

    const FIELD_TYPES: [AttributeType; 3] = [AttributeType::Vec3, AttributeType::Vec3, AttributeType::Vec2];

    pub const ATTRIBUTES: [wgpu::VertexAttribute; 3] = [
        wgpu::VertexAttribute {
            format: Self::FIELD_TYPES[0].format(),
            offset: offset_of!(PlaneVertex, position) as wgpu::BufferAddress,
            shader_location: 0,
        },
        wgpu::VertexAttribute {
            format: Self::FIELD_TYPES[1].format(),
            offset: offset_of!(PlaneVertex, normal) as wgpu::BufferAddress,
            shader_location: 1,
        },
        wgpu::VertexAttribute {
            format: Self::FIELD_TYPES[2].format(),
            offset: offset_of!(PlaneVertex, tex_coord) as wgpu::BufferAddress,
            shader_location: 2,
        },
    ];

    pub fn new(position: Vec3, normal: Vec3, tex_coord: Vec2) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
            tex_coord: tex_coord.to_array(),
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: size_of::<PlaneVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }

    /// WGSL vertex-input struct matching [`PlaneVertex::ATTRIBUTES`].
    pub fn wgsl_declaration() -> String {
        let mut wgsl = String::from("struct PlaneVertex {\n");
        for ((name, ty), attribute) in Self::FIELD_NAMES
            .iter()
            .zip(Self::FIELD_TYPES)
            .zip(Self::ATTRIBUTES.iter())
        {
            wgsl.push_str(&format!(
                "    @location({}) {}: {},\n",
                attribute.shader_location,
                name,
                ty.wgsl(),
            ));
        }
        wgsl.push_str("};\n");
        wgsl
    }
}
