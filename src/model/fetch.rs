//! Reads a raw vertex buffer the way the GPU input assembler does: from the
//! `VertexBufferLayout` alone, with no knowledge of the Rust vertex type.

use anyhow::{anyhow, bail, Result};

/// Components fetched for one attribute of one vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeValue {
    pub shader_location: u32,
    pub components: Vec<f32>,
}

fn component_count(format: wgpu::VertexFormat) -> Result<usize> {
    match format {
        wgpu::VertexFormat::Float32 => Ok(1),
        wgpu::VertexFormat::Float32x2 => Ok(2),
        wgpu::VertexFormat::Float32x3 => Ok(3),
        wgpu::VertexFormat::Float32x4 => Ok(4),
        other => bail!("Unsupported vertex format {:?}", other),
    }
}

/// Fetches every attribute of vertex `index` from `bytes`.
pub fn fetch_vertex(
    bytes: &[u8],
    layout: &wgpu::VertexBufferLayout<'_>,
    index: usize,
) -> Result<Vec<AttributeValue>> {
    let base = index as u64 * layout.array_stride;

    layout
        .attributes
        .iter()
        .map(|attribute| -> Result<AttributeValue> {
            let count = component_count(attribute.format)?;
            let start = (base + attribute.offset) as usize;
            let end = start + count * 4;
            let raw = bytes.get(start..end).ok_or_else(|| {
                anyhow!(
                    "Vertex {} location {} reads bytes {}..{} of a {} byte buffer",
                    index,
                    attribute.shader_location,
                    start,
                    end,
                    bytes.len()
                )
            })?;

            let components = raw
                .chunks_exact(4)
                .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
                .collect();

            Ok(AttributeValue {
                shader_location: attribute.shader_location,
                components,
            })
        })
        .collect()
}

/// Number of whole vertices `bytes` holds under `layout`.
pub fn vertex_count(bytes: &[u8], layout: &wgpu::VertexBufferLayout<'_>) -> usize {
    if layout.array_stride == 0 {
        return 0;
    }
    (bytes.len() as u64 / layout.array_stride) as usize
}
