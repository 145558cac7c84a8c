use tracing::debug;

use crate::error::FieldError;
use crate::mesh::{names, AttributeScope, HostMesh};
use crate::tracker::SurfaceTracker;

/// Per-vertex Gamma state carried across the destroy-and-rebuild cycle.
///
/// The tracker itself never survives a frame; its only persistent state is
/// the Gamma field baked into the host mesh on egress. Whether a frame is a
/// continuation is an explicit value the caller passes into the pipeline,
/// not something the pipeline sniffs out of the mesh's attribute schema.
/// [`FieldContinuity::read`] is the one sanctioned bridge from host storage
/// to this value.
#[derive(Debug, Clone, Default)]
pub enum FieldContinuity {
    /// No prior state; every vertex's Gamma starts at the engine default.
    #[default]
    FirstFrame,
    /// Prior-frame state: one flat row-major `R×R` array per point, in
    /// point iteration order.
    Resumed(Vec<Vec<f64>>),
}

impl FieldContinuity {
    /// Reads persisted field state out of a host mesh.
    ///
    /// An absent `Gamma` attribute means the simulation is starting fresh.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::MalformedAttribute`] when the attribute exists
    /// but is not float-array typed.
    pub fn read(mesh: &HostMesh) -> Result<Self, FieldError> {
        let Some(attr) = mesh.find_attribute(AttributeScope::Point, names::GAMMA) else {
            return Ok(Self::FirstFrame);
        };
        mesh.attributes()
            .float_array(AttributeScope::Point, names::GAMMA)
            .map_or_else(
                || {
                    Err(FieldError::MalformedAttribute {
                        name: names::GAMMA.to_owned(),
                        found: attr.kind(),
                    })
                },
                |rows| Ok(Self::Resumed(rows.to_vec())),
            )
    }

    /// `true` when no prior-frame state is carried.
    #[must_use]
    pub fn is_first_frame(&self) -> bool {
        matches!(self, Self::FirstFrame)
    }

    /// Seeds the tracker's per-vertex Gamma matrices from the carried state.
    ///
    /// Must run after tracker construction, when the region count `R` is
    /// known. Each flat array is reshaped row-major into the vertex's `R×R`
    /// matrix. A first frame seeds nothing and leaves the engine defaults.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::DimensionMismatch`] when a persisted array's
    /// length differs from the current frame's `R²`. The region count can
    /// change between frames after topological operations; no
    /// reconciliation (truncate, pad, reset) is attempted.
    pub fn seed(&self, tracker: &mut dyn SurfaceTracker) -> Result<(), FieldError> {
        let Self::Resumed(rows) = self else {
            return Ok(());
        };

        let r = tracker.region_count();
        let expected = r * r;
        for (vertex, row) in rows.iter().enumerate().take(tracker.vertex_count()) {
            if row.len() != expected {
                return Err(FieldError::DimensionMismatch {
                    vertex,
                    expected,
                    found: row.len(),
                });
            }
            let gamma = tracker.gamma_mut(vertex);
            for i in 0..r {
                for j in 0..r {
                    gamma[(i, j)] = row[i * r + j];
                }
            }
        }

        debug!(points = rows.len(), regions = r, "seeded Gamma field");
        Ok(())
    }
}
