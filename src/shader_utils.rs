//! WGSL assembly and reflection.
//!
//! Shaders never declare shared types themselves: [`compose_wgsl`] prepends
//! the declarations generated from the Rust side, and the reflection helpers
//! let callers prove the result still agrees with the host layouts.

use anyhow::{anyhow, bail, Context, Result};
use naga::{Binding, Scalar, ScalarKind, TypeInner, VectorSize};

use crate::model::PlaneVertex;
use crate::scene::StereoType;

pub const PLANE_SHADER_BODY: &str = include_str!("shaders/plane.wgsl");

pub fn compose_wgsl(body: &str) -> String {
    let mut source = String::new();
    source.push_str(&PlaneVertex::wgsl_declaration());
    source.push('\n');
    source.push_str(&StereoType::wgsl_constants());
    source.push('\n');
    source.push_str(body);
    source
}

pub fn plane_shader_source() -> String {
    compose_wgsl(PLANE_SHADER_BODY)
}

pub fn parse_and_validate(source: &str) -> Result<naga::Module> {
    let module = naga::front::wgsl::parse_str(source)
        .map_err(|e| anyhow!("Failed to parse WGSL:\n{}", e.emit_to_string(source)))?;

    naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::default(),
    )
    .validate(&module)
    .context("Shader validation failed")?;

    Ok(module)
}

/// Parses the plane shader and checks its vertex inputs against
/// [`PlaneVertex::desc`].
pub fn load_plane_shader() -> Result<String> {
    let source = plane_shader_source();
    let module = parse_and_validate(&source)?;
    check_vertex_layout(&module, "vs_main", &PlaneVertex::desc())?;
    Ok(source)
}

fn vertex_format(inner: &TypeInner) -> Result<wgpu::VertexFormat> {
    use wgpu::VertexFormat as F;

    let format = match *inner {
        TypeInner::Scalar(Scalar { kind, width: 4 }) => match kind {
            ScalarKind::Float => F::Float32,
            ScalarKind::Sint => F::Sint32,
            ScalarKind::Uint => F::Uint32,
            _ => bail!("Unsupported vertex input scalar {:?}", kind),
        },
        TypeInner::Vector { size, scalar: Scalar { kind, width: 4 } } => match (kind, size) {
            (ScalarKind::Float, VectorSize::Bi) => F::Float32x2,
            (ScalarKind::Float, VectorSize::Tri) => F::Float32x3,
            (ScalarKind::Float, VectorSize::Quad) => F::Float32x4,
            (ScalarKind::Sint, VectorSize::Bi) => F::Sint32x2,
            (ScalarKind::Sint, VectorSize::Tri) => F::Sint32x3,
            (ScalarKind::Sint, VectorSize::Quad) => F::Sint32x4,
            (ScalarKind::Uint, VectorSize::Bi) => F::Uint32x2,
            (ScalarKind::Uint, VectorSize::Tri) => F::Uint32x3,
            (ScalarKind::Uint, VectorSize::Quad) => F::Uint32x4,
            _ => bail!("Unsupported vertex input vector {:?}x{:?}", kind, size),
        },
        ref other => bail!("Unsupported vertex input type {:?}", other),
    };
    Ok(format)
}

/// `(location, format)` for every `@location` input of a vertex entry point,
/// sorted by location.
pub fn reflect_vertex_inputs(
    module: &naga::Module,
    entry_point: &str,
) -> Result<Vec<(u32, wgpu::VertexFormat)>> {
    let entry = module
        .entry_points
        .iter()
        .find(|ep| ep.name == entry_point && ep.stage == naga::ShaderStage::Vertex)
        .ok_or_else(|| anyhow!("No vertex entry point named '{}'", entry_point))?;

    let mut inputs = Vec::new();
    let mut push = |binding: Option<&Binding>, ty: naga::Handle<naga::Type>| -> Result<()> {
        if let Some(Binding::Location { location, .. }) = binding {
            inputs.push((*location, vertex_format(&module.types[ty].inner)?));
        }
        Ok(())
    };

    for argument in &entry.function.arguments {
        match &module.types[argument.ty].inner {
            TypeInner::Struct { members, .. } if argument.binding.is_none() => {
                for member in members {
                    push(member.binding.as_ref(), member.ty)?;
                }
            }
            _ => push(argument.binding.as_ref(), argument.ty)?,
        }
    }

    inputs.sort_by_key(|(location, _)| *location);
    Ok(inputs)
}

/// Fails unless every buffer attribute feeds a shader input of the same
/// format and every shader input is fed.
pub fn check_vertex_layout(
    module: &naga::Module,
    entry_point: &str,
    layout: &wgpu::VertexBufferLayout<'_>,
) -> Result<()> {
    let inputs = reflect_vertex_inputs(module, entry_point)?;

    for attribute in layout.attributes {
        match inputs.iter().find(|(location, _)| *location == attribute.shader_location) {
            Some((_, format)) if *format == attribute.format => {}
            Some((_, format)) => bail!(
                "Location {} is {:?} in '{}' but the vertex buffer provides {:?}",
                attribute.shader_location,
                format,
                entry_point,
                attribute.format
            ),
            None => bail!(
                "Vertex attribute at location {} is not read by '{}'",
                attribute.shader_location,
                entry_point
            ),
        }
    }

    for (location, _) in &inputs {
        if !layout.attributes.iter().any(|a| a.shader_location == *location) {
            bail!("Shader input location {} of '{}' has no vertex attribute", location, entry_point);
        }
    }

    log::debug!("'{}' vertex inputs match the buffer layout: {:?}", entry_point, inputs);
    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructLayout {
    /// `(name, byte offset)` in declaration order.
    pub members: Vec<(String, u32)>,
    pub span: u32,
}

impl StructLayout {
    pub fn offset_of(&self, member: &str) -> Option<u32> {
        self.members
            .iter()
            .find(|(name, _)| name == member)
            .map(|(_, offset)| *offset)
    }
}

/// WGSL memory layout of the named struct, as the shader compiler sees it.
pub fn reflect_struct_layout(module: &naga::Module, name: &str) -> Result<StructLayout> {
    module
        .types
        .iter()
        .find_map(|(_, ty)| match &ty.inner {
            TypeInner::Struct { members, span } if ty.name.as_deref() == Some(name) => {
                Some(StructLayout {
                    members: members
                        .iter()
                        .map(|m| (m.name.clone().unwrap_or_default(), m.offset))
                        .collect(),
                    span: *span,
                })
            }
            _ => None,
        })
        .ok_or_else(|| anyhow!("No struct named '{}' in shader module", name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::PlaneUniforms;
    use std::mem::{offset_of, size_of};

    #[test_log::test]
    fn test_plane_shader_validates() {
        let source = load_plane_shader().unwrap();
        assert!(source.starts_with("struct PlaneVertex {"));
        assert!(source.contains("const STEREO_TYPE_STEREO: i32 = 1;"));
    }

    #[test]
    fn test_reflected_inputs_match_vertex_attributes() {
        let module = parse_and_validate(&plane_shader_source()).unwrap();
        let inputs = reflect_vertex_inputs(&module, "vs_main").unwrap();

        let expected: Vec<_> = PlaneVertex::ATTRIBUTES
            .iter()
            .map(|a| (a.shader_location, a.format))
            .collect();
        assert_eq!(inputs, expected);
    }

    #[test]
    fn test_uniform_layout_matches_host() {
        let module = parse_and_validate(&plane_shader_source()).unwrap();
        let layout = reflect_struct_layout(&module, "Uniforms").unwrap();

        assert_eq!(layout.span as usize, size_of::<PlaneUniforms>());
        assert_eq!(layout.offset_of("view_proj"), Some(offset_of!(PlaneUniforms, view_proj) as u32));
        assert_eq!(layout.offset_of("model"), Some(offset_of!(PlaneUniforms, model) as u32));
        assert_eq!(layout.offset_of("stereo_type"), Some(offset_of!(PlaneUniforms, stereo_type) as u32));
        assert_eq!(layout.offset_of("eye_index"), Some(offset_of!(PlaneUniforms, eye_index) as u32));
    }

    #[test]
    fn test_mismatched_format_is_rejected() {
        let source = r#"
            struct Wrong {
                @location(0) position: vec3<f32>,
                @location(1) normal: vec3<f32>,
                @location(2) tex_coord: vec3<f32>,
            };

            @vertex
            fn vs_main(v: Wrong) -> @builtin(position) vec4<f32> {
                return vec4<f32>(v.position, 1.0);
            }
        "#;
        let module = parse_and_validate(source).unwrap();
        let err = check_vertex_layout(&module, "vs_main", &PlaneVertex::desc()).unwrap_err();
        assert!(err.to_string().contains("Location 2"), "{}", err);
    }

    #[test]
    fn test_missing_input_is_rejected() {
        let source = r#"
            @vertex
            fn vs_main(@location(0) position: vec3<f32>) -> @builtin(position) vec4<f32> {
                return vec4<f32>(position, 1.0);
            }
        "#;
        let module = parse_and_validate(source).unwrap();
        let err = check_vertex_layout(&module, "vs_main", &PlaneVertex::desc()).unwrap_err();
        assert!(err.to_string().contains("location 1"), "{}", err);
    }

    #[test]
    fn test_unknown_entry_point() {
        let module = parse_and_validate(&plane_shader_source()).unwrap();
        assert!(reflect_vertex_inputs(&module, "vs_missing").is_err());
        assert!(reflect_vertex_inputs(&module, "fs_main").is_err());
    }

    #[test]
    fn test_vec3_struct_members_are_padded_in_wgsl() {
        // Why PlaneVertex reaches the shader as vertex attributes and not as
        // a host-shareable struct: WGSL aligns vec3<f32> to 16 bytes.
        let source = r#"
            struct Padded {
                position: vec3<f32>,
                normal: vec3<f32>,
                tex_coord: vec2<f32>,
            };
            @group(0) @binding(0) var<storage, read> vertices: array<Padded>;
        "#;
        let module = parse_and_validate(source).unwrap();
        let layout = reflect_struct_layout(&module, "Padded").unwrap();
        assert_eq!(layout.offset_of("normal"), Some(16));
        assert_eq!(layout.offset_of("tex_coord"), Some(32));
        assert_eq!(layout.span, 48);
        assert_ne!(layout.span as usize, size_of::<PlaneVertex>());
    }

    #[test]
    fn test_parse_error_is_reported() {
        let err = parse_and_validate("fn broken( {").unwrap_err();
        assert!(err.to_string().contains("Failed to parse WGSL"));
    }
}
