use tracing::{info, info_span};

use crate::error::Result;
use crate::extract::extract;
use crate::field::FieldContinuity;
use crate::mesh::HostMesh;
use crate::options::SimOptions;
use crate::tracker::TrackerFactory;
use crate::write::write_result;

/// Runs one complete extract → step → write frame.
///
/// Pure with respect to the input mesh: a new host mesh is returned and the
/// caller swaps it in on success, so a failed frame leaves the old mesh
/// untouched. The tracker is built, stepped exactly once with the
/// caller-supplied `dt`, read out, and dropped before this returns; no
/// engine state survives the call except what is baked into the returned
/// mesh's attributes. The whole cycle is synchronous and single-threaded,
/// and the step blocks for as long as remeshing and collision resolution
/// take.
///
/// `continuity` carries the prior frame's Gamma state; pass
/// [`FieldContinuity::FirstFrame`] to start fresh, or feed the previous
/// output through [`FieldContinuity::read`].
///
/// # Errors
///
/// Fails when the options are invalid, the host mesh is empty, the tracker
/// refuses construction, the carried field state does not fit the current
/// region count, or an output attribute cannot be created. All failures are
/// terminal for this frame only; every frame is an independent attempt.
pub fn step_frame(
    mesh: &HostMesh,
    factory: &dyn TrackerFactory,
    options: &SimOptions,
    dt: f64,
    continuity: &FieldContinuity,
) -> Result<HostMesh> {
    let _span = info_span!("step_frame", dt).entered();

    options.validate()?;

    let bundle = extract(mesh)?;
    let mut tracker = factory.build(bundle, options)?;
    continuity.seed(tracker.as_mut())?;

    tracker.step(dt);

    let rebuilt = write_result(tracker.as_mut())?;

    info!(
        vertices_in = mesh.point_count(),
        vertices_out = rebuilt.point_count(),
        triangles_in = mesh.face_count(),
        triangles_out = rebuilt.face_count(),
        regions = tracker.region_count(),
        "frame complete"
    );

    Ok(rebuilt)
}
