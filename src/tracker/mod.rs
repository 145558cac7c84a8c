pub mod passthrough;

pub use passthrough::{PassthroughFactory, PassthroughTracker};

use crate::error::TrackerError;
use crate::extract::MeshBundle;
use crate::math::{GammaMatrix, Point3, Vector3};
use crate::options::SimOptions;

/// Capability interface of a non-manifold surface-tracking engine.
///
/// The engine owns its topology-changing mesh representation; one step may
/// collapse and split edges, merge regions, and perform T1 transitions, so
/// vertex and triangle counts and indices after [`step`](Self::step) bear no
/// relation to the ones it was constructed from. A tracker lives for one
/// frame: constructed from extracted arrays, stepped once, read out, and
/// dropped. Any conforming engine can be substituted without touching the
/// marshalling layer.
pub trait SurfaceTracker {
    /// Advances the simulation by one synchronous step of length `dt`.
    fn step(&mut self, dt: f64);

    /// Number of vertices after the last step.
    fn vertex_count(&self) -> usize;

    /// Position of vertex `vertex`.
    fn position(&self, vertex: usize) -> Point3;

    /// Number of triangles after the last step.
    fn triangle_count(&self) -> usize;

    /// Vertex index triple of triangle `triangle`, tracker winding.
    fn triangle(&self, triangle: usize) -> [usize; 3];

    /// Region label pair of triangle `triangle`.
    fn triangle_label(&self, triangle: usize) -> [i32; 2];

    /// Per-axis mass of vertex `vertex`.
    fn mass(&self, vertex: usize) -> Vector3;

    /// Velocity of vertex `vertex`.
    ///
    /// Derived lazily; call
    /// [`refresh_derived_quantities`](Self::refresh_derived_quantities)
    /// first or the value is stale.
    fn velocity(&self, vertex: usize) -> Vector3;

    /// `true` iff every region incident to `vertex` is solid.
    fn is_fully_solid(&self, vertex: usize) -> bool;

    /// The Gamma field of vertex `vertex`, an `R×R` matrix.
    fn gamma(&self, vertex: usize) -> &GammaMatrix;

    /// Mutable access to the Gamma field of vertex `vertex`.
    fn gamma_mut(&mut self, vertex: usize) -> &mut GammaMatrix;

    /// Recomputes lazily derived per-vertex quantities (velocities among
    /// them) so subsequent reads observe the post-step state.
    fn refresh_derived_quantities(&mut self);

    /// Number of distinct regions `R`; the Gamma dimension.
    fn region_count(&self) -> usize;
}

/// Constructs a [`SurfaceTracker`] from marshalled host data.
pub trait TrackerFactory {
    /// Builds a tracker owning `bundle`, configured by `options`.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Construction`] when the engine rejects the
    /// input.
    fn build(
        &self,
        bundle: MeshBundle,
        options: &SimOptions,
    ) -> Result<Box<dyn SurfaceTracker>, TrackerError>;
}
