//! Winding-order conversion between the host mesh and the surface tracker.
//!
//! The tracker expects the reverse of the host's corner order. The mapping
//! is its own inverse, so the one function below is applied at ingest and
//! again at egress; a mesh marshalled in and straight back out reproduces
//! the original host winding exactly.

/// Maps host corner order `(a, b, c)` to tracker corner order `(c, b, a)`,
/// and back.
#[must_use]
pub const fn flip_winding(corners: [usize; 3]) -> [usize; 3] {
    [corners[2], corners[1], corners[0]]
}
