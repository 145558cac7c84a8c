use tracing::debug;

use crate::error::ExtractError;
use crate::math::{Point3, Vector3};
use crate::mesh::{names, AttributeScope, HostMesh};
use crate::orientation::flip_winding;

/// Label pair assumed for faces with no label attribute: region 1 in front
/// of the face, region 0 (ambient) behind it.
pub const DEFAULT_LABEL: [i32; 2] = [1, 0];

/// Boundary conditions gathered from constrained host points.
///
/// The three arrays are parallel: entry `k` of each describes the same
/// constrained vertex. `indices` are vertex indices in extraction order.
#[derive(Debug, Clone, Default)]
pub struct ConstraintSet {
    /// Vertex indices of constrained points.
    pub indices: Vec<usize>,
    /// Imposed positions.
    pub positions: Vec<Point3>,
    /// Imposed velocities (zero when the host carries no velocity).
    pub velocities: Vec<Vector3>,
}

impl ConstraintSet {
    /// Number of constrained vertices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// `true` when no vertex is constrained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Host mesh data marshalled into the form the surface tracker consumes.
///
/// Triangles are stored in tracker winding; vertex indices are host point
/// iteration order and remain the index space for the whole frame.
#[derive(Debug, Clone)]
pub struct MeshBundle {
    /// Vertex positions in host point iteration order.
    pub vertices: Vec<Point3>,
    /// Triangles as vertex index triples, tracker winding.
    pub triangles: Vec<[usize; 3]>,
    /// Region label pair per triangle, parallel to `triangles`.
    pub labels: Vec<[i32; 2]>,
    /// Boundary conditions for constrained vertices.
    pub constraints: ConstraintSet,
}

/// Reads a host mesh into tracker input arrays.
///
/// The host mesh is not touched; points become vertices in iteration order,
/// triangle corners pass through [`flip_winding`], face labels default to
/// [`DEFAULT_LABEL`] when the host has none, and points with a truthy
/// `const` attribute are collected into the constraint set together with
/// their position and velocity.
///
/// # Errors
///
/// Returns [`ExtractError::EmptyInput`] when the host point set is empty;
/// no tracker can be built from nothing.
pub fn extract(mesh: &HostMesh) -> Result<MeshBundle, ExtractError> {
    if mesh.point_count() == 0 {
        return Err(ExtractError::EmptyInput);
    }

    let constrained = mesh.attributes().int(AttributeScope::Point, names::CONSTRAINED);
    let velocities = mesh.attributes().vec3(AttributeScope::Point, names::VELOCITY);

    let mut constraints = ConstraintSet::default();
    let vertices: Vec<Point3> = mesh.positions().to_vec();

    for (index, position) in mesh.positions().iter().enumerate() {
        let is_constrained =
            constrained.is_some_and(|flags| flags.get(index).is_some_and(|&flag| flag != 0));
        if is_constrained {
            constraints.indices.push(index);
            constraints.positions.push(*position);
            constraints.velocities.push(
                velocities
                    .and_then(|v| v.get(index))
                    .copied()
                    .unwrap_or_else(Vector3::zeros),
            );
        }
    }

    let labels_attr = mesh.attributes().int_pair(AttributeScope::Face, names::LABEL);

    let mut triangles = Vec::with_capacity(mesh.face_count());
    let mut labels = Vec::with_capacity(mesh.face_count());
    for (face, corners) in mesh.faces().iter().enumerate() {
        triangles.push(flip_winding(*corners));
        labels.push(
            labels_attr
                .and_then(|pairs| pairs.get(face))
                .copied()
                .unwrap_or(DEFAULT_LABEL),
        );
    }

    debug!(
        vertices = vertices.len(),
        triangles = triangles.len(),
        constrained = constraints.len(),
        "extracted host mesh"
    );

    Ok(MeshBundle {
        vertices,
        triangles,
        labels,
        constraints,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn triangle_mesh() -> HostMesh {
        let mut mesh = HostMesh::new();
        mesh.append_point_block(3);
        mesh.set_position(0, p(0.0, 0.0, 0.0));
        mesh.set_position(1, p(1.0, 0.0, 0.0));
        mesh.set_position(2, p(0.0, 1.0, 0.0));
        mesh.append_face([0, 1, 2]);
        mesh
    }

    #[test]
    fn empty_point_set_fails() {
        let mesh = HostMesh::new();
        assert!(matches!(extract(&mesh), Err(ExtractError::EmptyInput)));
    }

    #[test]
    fn vertices_follow_point_iteration_order() {
        let mesh = triangle_mesh();
        let bundle = extract(&mesh).unwrap();
        assert_eq!(bundle.vertices.len(), 3);
        assert_relative_eq!(bundle.vertices[1], p(1.0, 0.0, 0.0));
    }

    #[test]
    fn triangles_are_rewound_for_the_tracker() {
        let mesh = triangle_mesh();
        let bundle = extract(&mesh).unwrap();
        assert_eq!(bundle.triangles, vec![[2, 1, 0]]);
    }

    #[test]
    fn missing_label_attribute_defaults_to_one_zero() {
        let mesh = triangle_mesh();
        let bundle = extract(&mesh).unwrap();
        assert_eq!(bundle.labels, vec![[1, 0]]);
    }

    #[test]
    fn label_attribute_passes_through() {
        let mut mesh = triangle_mesh();
        mesh.attributes_mut()
            .int_pair_mut(AttributeScope::Face, names::LABEL, 1)
            .unwrap()[0] = [2, 3];
        let bundle = extract(&mesh).unwrap();
        assert_eq!(bundle.labels, vec![[2, 3]]);
    }

    #[test]
    fn constrained_points_carry_position_and_velocity() {
        let mut mesh = triangle_mesh();
        mesh.attributes_mut()
            .int_mut(AttributeScope::Point, names::CONSTRAINED, 3)
            .unwrap()[1] = 1;
        mesh.attributes_mut()
            .vec3_mut(AttributeScope::Point, names::VELOCITY, 3)
            .unwrap()[1] = Vector3::new(0.0, 1.0, 0.0);

        let bundle = extract(&mesh).unwrap();
        assert_eq!(bundle.constraints.indices, vec![1]);
        assert_relative_eq!(bundle.constraints.positions[0], p(1.0, 0.0, 0.0));
        assert_relative_eq!(bundle.constraints.velocities[0], Vector3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn constrained_point_without_velocity_attribute_gets_zero() {
        let mut mesh = triangle_mesh();
        mesh.attributes_mut()
            .int_mut(AttributeScope::Point, names::CONSTRAINED, 3)
            .unwrap()[2] = 1;
        let bundle = extract(&mesh).unwrap();
        assert_eq!(bundle.constraints.velocities, vec![Vector3::zeros()]);
    }

    #[test]
    fn two_constrained_points_keep_extraction_order() {
        let mut mesh = triangle_mesh();
        {
            let flags = mesh
                .attributes_mut()
                .int_mut(AttributeScope::Point, names::CONSTRAINED, 3)
                .unwrap();
            flags[0] = 1;
            flags[2] = 1;
        }
        {
            let v = mesh
                .attributes_mut()
                .vec3_mut(AttributeScope::Point, names::VELOCITY, 3)
                .unwrap();
            v[0] = Vector3::new(0.0, 1.0, 0.0);
            v[2] = Vector3::new(0.0, 1.0, 0.0);
        }

        let bundle = extract(&mesh).unwrap();
        assert_eq!(bundle.constraints.indices, vec![0, 2]);
        assert_eq!(
            bundle.constraints.velocities,
            vec![Vector3::new(0.0, 1.0, 0.0), Vector3::new(0.0, 1.0, 0.0)]
        );
    }

    #[test]
    fn extracted_constraints_ignore_later_host_mutation() {
        let mut mesh = triangle_mesh();
        mesh.attributes_mut()
            .int_mut(AttributeScope::Point, names::CONSTRAINED, 3)
            .unwrap()[0] = 1;

        let bundle = extract(&mesh).unwrap();
        mesh.set_position(0, p(9.0, 9.0, 9.0));
        assert_relative_eq!(bundle.constraints.positions[0], p(0.0, 0.0, 0.0));
    }

    #[test]
    fn points_appended_after_attribute_creation_are_unconstrained() {
        let mut mesh = triangle_mesh();
        mesh.attributes_mut()
            .int_mut(AttributeScope::Point, names::CONSTRAINED, 3)
            .unwrap()[1] = 1;

        // Growing the point set must not leave the attribute short.
        let start = mesh.append_point_block(2);
        mesh.set_position(start, p(2.0, 0.0, 0.0));
        mesh.set_position(start + 1, p(2.0, 1.0, 0.0));

        let bundle = extract(&mesh).unwrap();
        assert_eq!(bundle.vertices.len(), 5);
        assert_eq!(bundle.constraints.indices, vec![1]);
    }

    #[test]
    fn faces_appended_after_label_creation_read_their_default_element() {
        let mut mesh = triangle_mesh();
        mesh.append_point_block(1);
        mesh.set_position(3, p(1.0, 1.0, 0.0));
        mesh.attributes_mut()
            .int_pair_mut(AttributeScope::Face, names::LABEL, 1)
            .unwrap()[0] = [2, 1];

        mesh.append_face([2, 1, 3]);

        let bundle = extract(&mesh).unwrap();
        assert_eq!(bundle.labels, vec![[2, 1], [0, 0]]);
    }

    #[test]
    fn mistyped_constrained_attribute_is_ignored() {
        let mut mesh = triangle_mesh();
        // A vec3 "const" attribute binds no int read handle.
        mesh.attributes_mut()
            .vec3_mut(AttributeScope::Point, names::CONSTRAINED, 3)
            .unwrap();
        let bundle = extract(&mesh).unwrap();
        assert!(bundle.constraints.is_empty());
    }
}
