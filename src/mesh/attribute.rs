use std::collections::HashMap;
use std::fmt;

use slotmap::SlotMap;

use crate::error::WriteError;
use crate::math::Vector3;

slotmap::new_key_type! {
    /// Unique identifier for an attribute in the attribute store.
    pub struct AttrId;
}

/// Element class an attribute is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeScope {
    /// One element per point.
    Point,
    /// One element per face.
    Face,
    /// One element per face corner (three per triangular face).
    FaceCorner,
}

impl fmt::Display for AttributeScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Point => "point",
            Self::Face => "face",
            Self::FaceCorner => "face-corner",
        };
        f.write_str(s)
    }
}

/// Underlying storage type of an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    /// One 3-vector per element.
    Vec3,
    /// One integer per element.
    Int,
    /// Two integers per element.
    IntPair,
    /// One flat float array per element (lengths may vary per element).
    FloatArray,
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Vec3 => "vec3",
            Self::Int => "int",
            Self::IntPair => "int-pair",
            Self::FloatArray => "float-array",
        };
        f.write_str(s)
    }
}

/// Typed per-element storage backing an attribute.
#[derive(Debug, Clone)]
enum AttributeData {
    Vec3(Vec<Vector3>),
    Int(Vec<i32>),
    IntPair(Vec<[i32; 2]>),
    FloatArray(Vec<Vec<f64>>),
}

impl AttributeData {
    fn zeroed(kind: AttributeKind, len: usize) -> Self {
        match kind {
            AttributeKind::Vec3 => Self::Vec3(vec![Vector3::zeros(); len]),
            AttributeKind::Int => Self::Int(vec![0; len]),
            AttributeKind::IntPair => Self::IntPair(vec![[0, 0]; len]),
            AttributeKind::FloatArray => Self::FloatArray(vec![Vec::new(); len]),
        }
    }

    fn kind(&self) -> AttributeKind {
        match self {
            Self::Vec3(_) => AttributeKind::Vec3,
            Self::Int(_) => AttributeKind::Int,
            Self::IntPair(_) => AttributeKind::IntPair,
            Self::FloatArray(_) => AttributeKind::FloatArray,
        }
    }
}

/// A named, typed attribute with a data-id version counter.
///
/// The data id starts at 1 and is bumped on every write-handle bind, so a
/// downstream consumer can detect new data by comparing ids across frames.
#[derive(Debug, Clone)]
pub struct Attribute {
    scope: AttributeScope,
    name: String,
    data: AttributeData,
    data_id: u64,
}

impl Attribute {
    fn new(scope: AttributeScope, name: &str, kind: AttributeKind, len: usize) -> Self {
        Self {
            scope,
            name: name.to_owned(),
            data: AttributeData::zeroed(kind, len),
            data_id: 1,
        }
    }

    /// Element class this attribute is bound to.
    #[must_use]
    pub fn scope(&self) -> AttributeScope {
        self.scope
    }

    /// Attribute name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Underlying storage type.
    #[must_use]
    pub fn kind(&self) -> AttributeKind {
        self.data.kind()
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        match &self.data {
            AttributeData::Vec3(v) => v.len(),
            AttributeData::Int(v) => v.len(),
            AttributeData::IntPair(v) => v.len(),
            AttributeData::FloatArray(v) => v.len(),
        }
    }

    /// `true` if the attribute has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current data-id version.
    #[must_use]
    pub fn data_id(&self) -> u64 {
        self.data_id
    }
}

/// Named-attribute arena for a host mesh.
///
/// Attributes are addressed by `(scope, name)` and held behind generational
/// [`AttrId`] keys. Read access mirrors a read handle: it yields `None` when
/// the attribute is absent *or* has a different storage kind, so callers
/// treat a mistyped attribute the same as a missing one. Write access binds
/// a write handle: it creates the attribute on demand, rejects a kind
/// conflict, and bumps the data id.
#[derive(Debug, Clone, Default)]
pub struct AttributeStore {
    attributes: SlotMap<AttrId, Attribute>,
    index: HashMap<AttributeScope, HashMap<String, AttrId>>,
}

impl AttributeStore {
    /// Creates a new, empty attribute store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up an attribute id by scope and name.
    #[must_use]
    pub fn find(&self, scope: AttributeScope, name: &str) -> Option<AttrId> {
        self.index.get(&scope)?.get(name).copied()
    }

    /// Returns the attribute behind an id, if still present.
    #[must_use]
    pub fn get(&self, id: AttrId) -> Option<&Attribute> {
        self.attributes.get(id)
    }

    /// Finds an attribute, or creates it zero-filled with `len` elements.
    ///
    /// # Errors
    ///
    /// Returns [`WriteError::AttributeCreation`] when an attribute with the
    /// same scope and name exists with a different storage kind.
    pub fn find_or_create(
        &mut self,
        scope: AttributeScope,
        name: &str,
        kind: AttributeKind,
        len: usize,
    ) -> Result<AttrId, WriteError> {
        if let Some(id) = self.find(scope, name) {
            let found = self.attributes[id].kind();
            if found == kind {
                Ok(id)
            } else {
                Err(WriteError::AttributeCreation {
                    scope,
                    name: name.to_owned(),
                    expected: kind,
                    found,
                })
            }
        } else {
            let id = self.attributes.insert(Attribute::new(scope, name, kind, len));
            self.index
                .entry(scope)
                .or_default()
                .insert(name.to_owned(), id);
            Ok(id)
        }
    }

    /// Resizes every attribute in `scope` to `len` elements.
    ///
    /// New elements are zero-filled. Attributes whose length changes get
    /// their data id bumped, the same as an add-or-remove on the geometry
    /// they are bound to.
    pub fn resize_scope(&mut self, scope: AttributeScope, len: usize) {
        for attr in self.attributes.values_mut() {
            if attr.scope != scope || attr.len() == len {
                continue;
            }
            match &mut attr.data {
                AttributeData::Vec3(values) => values.resize(len, Vector3::zeros()),
                AttributeData::Int(values) => values.resize(len, 0),
                AttributeData::IntPair(values) => values.resize(len, [0, 0]),
                AttributeData::FloatArray(values) => values.resize(len, Vec::new()),
            }
            attr.data_id += 1;
        }
    }

    // --- Read handles ---

    /// Binds a read handle to a vec3 attribute.
    #[must_use]
    pub fn vec3(&self, scope: AttributeScope, name: &str) -> Option<&[Vector3]> {
        match &self.get(self.find(scope, name)?)?.data {
            AttributeData::Vec3(values) => Some(values),
            _ => None,
        }
    }

    /// Binds a read handle to an int attribute.
    #[must_use]
    pub fn int(&self, scope: AttributeScope, name: &str) -> Option<&[i32]> {
        match &self.get(self.find(scope, name)?)?.data {
            AttributeData::Int(values) => Some(values),
            _ => None,
        }
    }

    /// Binds a read handle to an int-pair attribute.
    #[must_use]
    pub fn int_pair(&self, scope: AttributeScope, name: &str) -> Option<&[[i32; 2]]> {
        match &self.get(self.find(scope, name)?)?.data {
            AttributeData::IntPair(values) => Some(values),
            _ => None,
        }
    }

    /// Binds a read handle to a float-array attribute.
    #[must_use]
    pub fn float_array(&self, scope: AttributeScope, name: &str) -> Option<&[Vec<f64>]> {
        match &self.get(self.find(scope, name)?)?.data {
            AttributeData::FloatArray(values) => Some(values),
            _ => None,
        }
    }

    // --- Write handles ---

    /// Binds a write handle to a vec3 attribute, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns [`WriteError::AttributeCreation`] on a storage-kind conflict.
    pub fn vec3_mut(
        &mut self,
        scope: AttributeScope,
        name: &str,
        len: usize,
    ) -> Result<&mut Vec<Vector3>, WriteError> {
        let id = self.find_or_create(scope, name, AttributeKind::Vec3, len)?;
        let attr = &mut self.attributes[id];
        attr.data_id += 1;
        match &mut attr.data {
            AttributeData::Vec3(values) => Ok(values),
            _ => unreachable!("kind checked by find_or_create"),
        }
    }

    /// Binds a write handle to an int attribute, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns [`WriteError::AttributeCreation`] on a storage-kind conflict.
    pub fn int_mut(
        &mut self,
        scope: AttributeScope,
        name: &str,
        len: usize,
    ) -> Result<&mut Vec<i32>, WriteError> {
        let id = self.find_or_create(scope, name, AttributeKind::Int, len)?;
        let attr = &mut self.attributes[id];
        attr.data_id += 1;
        match &mut attr.data {
            AttributeData::Int(values) => Ok(values),
            _ => unreachable!("kind checked by find_or_create"),
        }
    }

    /// Binds a write handle to an int-pair attribute, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns [`WriteError::AttributeCreation`] on a storage-kind conflict.
    pub fn int_pair_mut(
        &mut self,
        scope: AttributeScope,
        name: &str,
        len: usize,
    ) -> Result<&mut Vec<[i32; 2]>, WriteError> {
        let id = self.find_or_create(scope, name, AttributeKind::IntPair, len)?;
        let attr = &mut self.attributes[id];
        attr.data_id += 1;
        match &mut attr.data {
            AttributeData::IntPair(values) => Ok(values),
            _ => unreachable!("kind checked by find_or_create"),
        }
    }

    /// Binds a write handle to a float-array attribute, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns [`WriteError::AttributeCreation`] on a storage-kind conflict.
    pub fn float_array_mut(
        &mut self,
        scope: AttributeScope,
        name: &str,
        len: usize,
    ) -> Result<&mut Vec<Vec<f64>>, WriteError> {
        let id = self.find_or_create(scope, name, AttributeKind::FloatArray, len)?;
        let attr = &mut self.attributes[id];
        attr.data_id += 1;
        match &mut attr.data {
            AttributeData::FloatArray(values) => Ok(values),
            _ => unreachable!("kind checked by find_or_create"),
        }
    }
}
