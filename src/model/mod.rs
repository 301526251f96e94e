pub mod shader_enum;
pub mod fetch;
mod vertex;
mod mesh;
mod plane;
mod hemisphere;

pub use shader_enum::EnumBackingType;
pub use vertex::PlaneVertex;
pub use mesh::{Aabb, Mesh, MeshData};
pub use plane::PlaneMesh;
pub use hemisphere::HemisphereMesh;
