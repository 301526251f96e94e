use std::f32::consts::PI;

use anyhow::{bail, Result};
use glam::{Vec2, Vec3};

use super::{Aabb, MeshData, PlaneVertex};

/// Inside of a 180° dome for VR-180 footage, centered on the viewer and
/// covering the half space in front of it (-Z). Texture coordinates are
/// equirectangular, U growing to the viewer's right and V towards the top.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HemisphereMesh {
    pub radius: f32,
    pub segments: u32,
    pub rings: u32,
    pub max_vertex_depth: f32,
}

impl Default for HemisphereMesh {
    fn default() -> Self {
        Self {
            radius: 10.0,
            segments: 128,
            rings: 256,
            max_vertex_depth: 1000.0,
        }
    }
}

impl HemisphereMesh {
    pub fn new(radius: f32, segments: u32, rings: u32, max_vertex_depth: f32) -> Result<Self> {
        if segments == 0 || rings == 0 {
            bail!("Hemisphere needs at least one segment and ring, got {} and {}", segments, rings);
        }
        if !radius.is_finite() || radius <= 0.0 {
            bail!("Hemisphere radius must be positive, got {}", radius);
        }
        let vertices = (segments as u64 + 1) * (rings as u64 + 1);
        let indices = (segments as usize)
            .checked_mul(rings as usize)
            .and_then(|cells| cells.checked_mul(6));
        if vertices > u32::MAX as u64 || indices.is_none() {
            bail!(
                "Hemisphere of {} segments and {} rings does not fit 32-bit indices",
                segments,
                rings
            );
        }
        Ok(Self {
            radius,
            segments,
            rings,
            max_vertex_depth,
        })
    }

    fn vertex_index(&self, segment: u32, ring: u32) -> u32 {
        segment + (self.segments + 1) * ring
    }

    pub fn vertex_count(&self) -> usize {
        (self.segments as usize + 1) * (self.rings as usize + 1)
    }

    pub fn index_count(&self) -> usize {
        6 * self.segments as usize * self.rings as usize
    }

    pub fn bounds(&self) -> Aabb {
        Aabb {
            min: Vec3::splat(-self.radius),
            max: Vec3::new(self.radius, self.radius, self.max_vertex_depth),
        }
    }

    pub fn build(&self) -> MeshData {
        let mut vertices = vec![PlaneVertex::default(); self.vertex_count()];

        for ring in 0..=self.rings {
            for segment in 0..=self.segments {
                let u = segment as f32 / self.segments as f32;
                let v = ring as f32 / self.rings as f32;

                // theta sweeps -90°..90° from the left, phi 0°..180° from the top
                let theta = (u - 0.5) * PI;
                let phi = v * PI;

                let position = Vec3::new(
                    self.radius * theta.sin() * phi.sin(),
                    self.radius * phi.cos(),
                    -self.radius * theta.cos() * phi.sin(),
                );

                vertices[self.vertex_index(segment, ring) as usize] = PlaneVertex::new(
                    position,
                    position.normalize(),
                    Vec2::new(u, 1.0 - v),
                );
            }
        }

        let mut indices = Vec::with_capacity(self.index_count());
        for ring in 0..self.rings {
            for segment in 0..self.segments {
                let bottom_left = self.vertex_index(segment, ring);
                let bottom_right = self.vertex_index(segment + 1, ring);
                let top_left = self.vertex_index(segment, ring + 1);
                let top_right = self.vertex_index(segment + 1, ring + 1);

                indices.extend_from_slice(&[
                    bottom_left, top_left, bottom_right,
                    top_left, top_right, bottom_right,
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
