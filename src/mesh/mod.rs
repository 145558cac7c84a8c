pub mod attribute;

pub use attribute::{AttrId, Attribute, AttributeKind, AttributeScope, AttributeStore};

use crate::error::WriteError;
use crate::math::Point3;

/// Well-known attribute names shared by the ingest and egress passes.
pub mod names {
    /// Per-point constrained flag on ingest; fully-solid flag on egress.
    pub const CONSTRAINED: &str = "const";
    /// Per-point velocity.
    pub const VELOCITY: &str = "v";
    /// Per-face region label pair.
    pub const LABEL: &str = "label";
    /// Per-point mass vector (one mass per axis).
    pub const MASS: &str = "mass";
    /// Per-point flattened row-major Gamma field.
    pub const GAMMA: &str = "Gamma";
    /// Per-face-corner normal.
    pub const NORMAL: &str = "N";
}

/// An unstructured triangle mesh with named attributes, standing in for the
/// host application's geometry container.
///
/// Points and faces live in contiguous arrays; a point's index in iteration
/// order is its identity for the duration of a frame. Positions are
/// first-class rather than an attribute, but carry a data id of their own so
/// consumers can detect rewrites. The topology data id covers point/face
/// addition and removal.
#[derive(Debug, Clone, Default)]
pub struct HostMesh {
    positions: Vec<Point3>,
    faces: Vec<[usize; 3]>,
    attributes: AttributeStore,
    position_data_id: u64,
    topology_data_id: u64,
}

impl HostMesh {
    /// Creates a new, empty mesh.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of points.
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of faces.
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Number of attribute elements in a scope.
    #[must_use]
    pub fn element_count(&self, scope: AttributeScope) -> usize {
        match scope {
            AttributeScope::Point => self.point_count(),
            AttributeScope::Face => self.face_count(),
            AttributeScope::FaceCorner => 3 * self.face_count(),
        }
    }

    /// Appends `count` points at the origin and returns the index of the
    /// first one.
    ///
    /// Existing point attributes grow to the new point count, zero-filled.
    pub fn append_point_block(&mut self, count: usize) -> usize {
        let start = self.positions.len();
        self.positions
            .resize_with(start + count, || Point3::new(0.0, 0.0, 0.0));
        self.attributes
            .resize_scope(AttributeScope::Point, self.positions.len());
        self.position_data_id += 1;
        self.topology_data_id += 1;
        start
    }

    /// Point positions in iteration order.
    #[must_use]
    pub fn positions(&self) -> &[Point3] {
        &self.positions
    }

    /// Overwrites the position of point `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn set_position(&mut self, index: usize, position: Point3) {
        self.positions[index] = position;
        self.position_data_id += 1;
    }

    /// Appends a 3-corner face and returns its index.
    ///
    /// Corners are point indices in host winding order. Existing face and
    /// face-corner attributes grow to the new face count, zero-filled.
    pub fn append_face(&mut self, corners: [usize; 3]) -> usize {
        self.faces.push(corners);
        self.attributes
            .resize_scope(AttributeScope::Face, self.faces.len());
        self.attributes
            .resize_scope(AttributeScope::FaceCorner, 3 * self.faces.len());
        self.topology_data_id += 1;
        self.faces.len() - 1
    }

    /// Faces in iteration order, each as 3 corner point indices.
    #[must_use]
    pub fn faces(&self) -> &[[usize; 3]] {
        &self.faces
    }

    /// Read access to the attribute store.
    #[must_use]
    pub fn attributes(&self) -> &AttributeStore {
        &self.attributes
    }

    /// Write access to the attribute store.
    pub fn attributes_mut(&mut self) -> &mut AttributeStore {
        &mut self.attributes
    }

    /// Looks up an attribute by scope and name.
    #[must_use]
    pub fn find_attribute(&self, scope: AttributeScope, name: &str) -> Option<&Attribute> {
        self.attributes.get(self.attributes.find(scope, name)?)
    }

    /// Finds an attribute or creates it sized to the scope's element count.
    ///
    /// # Errors
    ///
    /// Returns [`WriteError::AttributeCreation`] when an attribute with the
    /// same scope and name exists with a different storage kind.
    pub fn find_or_create_attribute(
        &mut self,
        scope: AttributeScope,
        name: &str,
        kind: AttributeKind,
    ) -> Result<AttrId, WriteError> {
        let len = self.element_count(scope);
        self.attributes.find_or_create(scope, name, kind, len)
    }

    /// Data id of the point position array.
    #[must_use]
    pub fn position_data_id(&self) -> u64 {
        self.position_data_id
    }

    /// Data id covering point/face addition and removal.
    #[must_use]
    pub fn topology_data_id(&self) -> u64 {
        self.topology_data_id
    }

    /// Data id of a named attribute, if present.
    #[must_use]
    pub fn attribute_data_id(&self, scope: AttributeScope, name: &str) -> Option<u64> {
        self.find_attribute(scope, name).map(Attribute::data_id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn point_block_is_appended_at_the_end() {
        let mut mesh = HostMesh::new();
        assert_eq!(mesh.append_point_block(3), 0);
        assert_eq!(mesh.append_point_block(2), 3);
        assert_eq!(mesh.point_count(), 5);
    }

    #[test]
    fn geometry_edits_bump_data_ids() {
        let mut mesh = HostMesh::new();
        let topo0 = mesh.topology_data_id();
        mesh.append_point_block(1);
        assert!(mesh.topology_data_id() > topo0);

        let pos0 = mesh.position_data_id();
        mesh.set_position(0, Point3::new(1.0, 2.0, 3.0));
        assert!(mesh.position_data_id() > pos0);

        let topo1 = mesh.topology_data_id();
        mesh.append_face([0, 0, 0]);
        assert!(mesh.topology_data_id() > topo1);
    }

    #[test]
    fn face_corner_scope_counts_three_per_face() {
        let mut mesh = HostMesh::new();
        mesh.append_point_block(3);
        mesh.append_face([0, 1, 2]);
        assert_eq!(mesh.element_count(AttributeScope::FaceCorner), 3);
        assert_eq!(mesh.element_count(AttributeScope::Face), 1);
        assert_eq!(mesh.element_count(AttributeScope::Point), 3);
    }

    #[test]
    fn appending_points_grows_point_attributes() {
        let mut mesh = HostMesh::new();
        mesh.append_point_block(3);
        let id = mesh
            .find_or_create_attribute(
                AttributeScope::Point,
                names::CONSTRAINED,
                AttributeKind::Int,
            )
            .unwrap();
        let data_id = mesh.attributes().get(id).unwrap().data_id();

        mesh.append_point_block(2);
        let attr = mesh.attributes().get(id).unwrap();
        assert_eq!(attr.len(), 5);
        assert!(attr.data_id() > data_id);
        // New elements are unset.
        let flags = mesh
            .attributes()
            .int(AttributeScope::Point, names::CONSTRAINED)
            .unwrap();
        assert_eq!(&flags[3..], &[0, 0]);
    }

    #[test]
    fn appending_faces_grows_face_and_corner_attributes() {
        let mut mesh = HostMesh::new();
        mesh.append_point_block(4);
        mesh.append_face([0, 1, 2]);
        let label_id = mesh
            .find_or_create_attribute(AttributeScope::Face, names::LABEL, AttributeKind::IntPair)
            .unwrap();
        let normal_id = mesh
            .find_or_create_attribute(
                AttributeScope::FaceCorner,
                names::NORMAL,
                AttributeKind::Vec3,
            )
            .unwrap();

        mesh.append_face([2, 1, 3]);
        assert_eq!(mesh.attributes().get(label_id).unwrap().len(), 2);
        assert_eq!(mesh.attributes().get(normal_id).unwrap().len(), 6);
    }

    #[test]
    fn find_or_create_sizes_to_element_count() {
        let mut mesh = HostMesh::new();
        mesh.append_point_block(4);
        let id = mesh
            .find_or_create_attribute(AttributeScope::Point, names::MASS, AttributeKind::Vec3)
            .unwrap();
        assert_eq!(mesh.attributes().get(id).unwrap().len(), 4);
    }
}
