use super::{Point3, Vector3, TOLERANCE};

/// Unit normal of the triangle `(p0, p1, p2)`, following the right-hand rule
/// on the corner order.
///
/// Degenerate triangles (collinear or coincident corners) yield the zero
/// vector rather than an error, so a single sliver triangle cannot abort a
/// whole-mesh rebuild.
#[must_use]
pub fn triangle_normal(p0: &Point3, p1: &Point3, p2: &Point3) -> Vector3 {
    (p1 - p0)
        .cross(&(p2 - p0))
        .try_normalize(TOLERANCE)
        .unwrap_or_else(Vector3::zeros)
}
