//! Mesh topology and connectivity consumed by the limiter.

mod adjacency;
mod element;
mod limited_plus;
mod mesh1d;

pub use adjacency::{FaceCoupling, MeshAdjacency};
pub use element::ElementType;
pub use limited_plus::LimitedPlusConnect;
pub use mesh1d::LineMesh;
