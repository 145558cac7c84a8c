use tracing::debug;

use crate::error::WriteError;
use crate::math::{triangle_normal, Vector3};
use crate::mesh::{names, AttributeScope, HostMesh};
use crate::orientation::flip_winding;
use crate::tracker::SurfaceTracker;

/// Rebuilds host geometry from a tracker's post-step state.
///
/// A frame's step can change vertex and triangle counts arbitrarily, so no
/// incremental patching is attempted: the result is a brand-new mesh and the
/// caller swaps it in whole. Points are allocated to the tracker's current
/// vertex count; faces are wired through the inverse orientation mapping;
/// per-face normals are re-derived from current positions and flipped where
/// the label pair is inverted relative to the canonical `labelA > labelB`
/// order, so orientation stays consistent across the mesh. Per-point mass,
/// velocity (refreshed first), the fully-solid flag, and the flattened
/// row-major Gamma field are baked into attributes for the next frame.
///
/// # Errors
///
/// Returns [`WriteError::AttributeCreation`] when a required output
/// attribute cannot be created. No further writing happens for the frame;
/// attributes written before the failure exist only on the abandoned mesh,
/// which is dropped here.
pub fn write_result(tracker: &mut dyn SurfaceTracker) -> Result<HostMesh, WriteError> {
    let mut mesh = HostMesh::new();

    let start = mesh.append_point_block(tracker.vertex_count());
    for vertex in 0..tracker.vertex_count() {
        mesh.set_position(start + vertex, tracker.position(vertex));
    }

    for triangle in 0..tracker.triangle_count() {
        let corners = flip_winding(tracker.triangle(triangle));
        mesh.append_face([
            start + corners[0],
            start + corners[1],
            start + corners[2],
        ]);
    }

    let face_count = mesh.face_count();
    let point_count = mesh.point_count();

    // Region labels, one pair per face.
    {
        let labels =
            mesh.attributes_mut()
                .int_pair_mut(AttributeScope::Face, names::LABEL, face_count)?;
        for (triangle, pair) in labels.iter_mut().enumerate() {
            *pair = tracker.triangle_label(triangle);
        }
    }

    // Flat per-face normals, oriented by label order, on every corner.
    let normals: Vec<Vector3> = mesh
        .faces()
        .iter()
        .enumerate()
        .map(|(triangle, corners)| {
            let positions = mesh.positions();
            let normal = triangle_normal(
                &positions[corners[0]],
                &positions[corners[1]],
                &positions[corners[2]],
            );
            let label = tracker.triangle_label(triangle);
            if label[0] < label[1] {
                -normal
            } else {
                normal
            }
        })
        .collect();
    {
        let corner_normals = mesh.attributes_mut().vec3_mut(
            AttributeScope::FaceCorner,
            names::NORMAL,
            3 * face_count,
        )?;
        for (triangle, normal) in normals.iter().enumerate() {
            for corner in 0..3 {
                corner_normals[3 * triangle + corner] = *normal;
            }
        }
    }

    // Velocities are derived lazily; refresh before reading them out.
    tracker.refresh_derived_quantities();

    {
        let masses =
            mesh.attributes_mut()
                .vec3_mut(AttributeScope::Point, names::MASS, point_count)?;
        for (vertex, mass) in masses.iter_mut().enumerate() {
            *mass = tracker.mass(vertex);
        }
    }
    {
        let velocities =
            mesh.attributes_mut()
                .vec3_mut(AttributeScope::Point, names::VELOCITY, point_count)?;
        for (vertex, velocity) in velocities.iter_mut().enumerate() {
            *velocity = tracker.velocity(vertex);
        }
    }
    {
        let solid =
            mesh.attributes_mut()
                .int_mut(AttributeScope::Point, names::CONSTRAINED, point_count)?;
        for (vertex, flag) in solid.iter_mut().enumerate() {
            *flag = i32::from(tracker.is_fully_solid(vertex));
        }
    }
    {
        let rows = mesh.attributes_mut().float_array_mut(
            AttributeScope::Point,
            names::GAMMA,
            point_count,
        )?;
        let r = tracker.region_count();
        for (vertex, row) in rows.iter_mut().enumerate() {
            let gamma = tracker.gamma(vertex);
            let mut flat = Vec::with_capacity(r * r);
            for i in 0..r {
                for j in 0..r {
                    flat.push(gamma[(i, j)]);
                }
            }
            *row = flat;
        }
    }

    debug!(
        vertices = point_count,
        triangles = face_count,
        regions = tracker.region_count(),
        "rebuilt host mesh from tracker"
    );

    Ok(mesh)
}
