use anyhow::{bail, Result};
use glam::{UVec2, Vec2, Vec3};

use super::{Aabb, MeshData, PlaneVertex};

/// A flat grid in the XY plane, centered on the origin, facing +Z.
///
/// Texture coordinates run left to right and bottom to top.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneMesh {
    pub size: Vec2,
    /// Number of vertices along each axis.
    pub dimensions: UVec2,
    pub max_vertex_depth: f32,
}

impl Default for PlaneMesh {
    fn default() -> Self {
        Self {
            size: Vec2::ONE,
            dimensions: UVec2::splat(16),
            max_vertex_depth: 1.0,
        }
    }
}

impl PlaneMesh {
    pub fn new(size: Vec2, dimensions: UVec2, max_vertex_depth: f32) -> Result<Self> {
        if dimensions.x < 2 || dimensions.y < 2 {
            bail!("Plane needs at least 2x2 vertices, got {}x{}", dimensions.x, dimensions.y);
        }
        if !size.is_finite() || size.x <= 0.0 || size.y <= 0.0 {
            bail!("Plane size must be positive, got {:?}", size);
        }
        let vertices = dimensions.x.checked_mul(dimensions.y);
        let indices = ((dimensions.x - 1) as usize)
            .checked_mul((dimensions.y - 1) as usize)
            .and_then(|cells| cells.checked_mul(6));
        if vertices.is_none() || indices.is_none() {
            bail!(
                "Plane of {}x{} vertices does not fit 32-bit indices",
                dimensions.x,
                dimensions.y
            );
        }
        Ok(Self {
            size,
            dimensions,
            max_vertex_depth,
        })
    }

    fn vertex_index(&self, x: u32, y: u32) -> u32 {
        x + self.dimensions.x * y
    }

    pub fn vertex_count(&self) -> usize {
        self.dimensions.x as usize * self.dimensions.y as usize
    }

    pub fn index_count(&self) -> usize {
        6 * (self.dimensions.x as usize - 1) * (self.dimensions.y as usize - 1)
    }

    pub fn bounds(&self) -> Aabb {
        let half = self.size / 2.0;
        Aabb {
            min: Vec3::new(-half.x, -half.y, 0.0),
            max: Vec3::new(half.x, half.y, self.max_vertex_depth),
        }
    }

    pub fn build(&self) -> MeshData {
        let mut vertices = vec![PlaneVertex::default(); self.vertex_count()];
        let last = (self.dimensions - UVec2::ONE).as_vec2();

        for x in 0..self.dimensions.x {
            for y in 0..self.dimensions.y {
                let uv = Vec2::new(x as f32, y as f32) / last;
                let position = self.size * uv - self.size / 2.0;

                vertices[self.vertex_index(x, y) as usize] = PlaneVertex::new(
                    position.extend(0.0),
                    Vec3::Z,
                    uv,
                );
            }
        }

        let mut indices = Vec::with_capacity(self.index_count());
        for x in 0..self.dimensions.x - 1 {
            for y in 0..self.dimensions.y - 1 {
                let bottom_left = self.vertex_index(x, y);
                let bottom_right = self.vertex_index(x + 1, y);
                let top_left = self.vertex_index(x, y + 1);
                let top_right = self.vertex_index(x + 1, y + 1);

                indices.extend_from_slice(&[
                    bottom_left, bottom_right, top_left,
                    top_left, bottom_right, top_right,
                ]);
            }
        }

        MeshData {
            vertices,
            indices,
            bounds: self.bounds(),
        }
    }
}
