pub mod normal;

pub use normal::triangle_normal;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Dynamically sized square matrix holding a per-vertex Gamma field.
///
/// The dimension is the region count of the current frame's mesh, which is
/// only known at runtime and can change across frames.
pub type GammaMatrix = nalgebra::DMatrix<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;
