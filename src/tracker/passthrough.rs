use std::collections::BTreeSet;

use crate::error::TrackerError;
use crate::extract::{ConstraintSet, MeshBundle};
use crate::math::{GammaMatrix, Point3, Vector3};
use crate::options::SimOptions;

use super::{SurfaceTracker, TrackerFactory};

/// Reference [`SurfaceTracker`] with no topology changes.
///
/// Holds the marshalled arrays verbatim, advects constrained vertices by
/// their imposed velocity, and leaves free vertices where they are. Serves
/// as the substitution example for the tracker interface and as the test
/// engine for the marshalling round trip: with `dt = 0` its output equals
/// its input.
#[derive(Debug)]
pub struct PassthroughTracker {
    positions: Vec<Point3>,
    triangles: Vec<[usize; 3]>,
    labels: Vec<[i32; 2]>,
    constrained_velocity: Vec<Option<Vector3>>,
    gammas: Vec<GammaMatrix>,
    velocity_cache: Vec<Vector3>,
    region_count: usize,
}

impl PassthroughTracker {
    /// Builds the tracker from a marshalled bundle.
    ///
    /// The region count is the number of distinct label values in use; each
    /// vertex starts with a zero `R×R` Gamma field.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Construction`] when a triangle or constraint
    /// references a vertex out of range, or when the bundle's parallel
    /// arrays disagree in length.
    pub fn new(bundle: MeshBundle, _options: &SimOptions) -> Result<Self, TrackerError> {
        let MeshBundle {
            vertices,
            triangles,
            labels,
            constraints,
        } = bundle;

        if labels.len() != triangles.len() {
            return Err(TrackerError::Construction(format!(
                "{} triangles but {} label pairs",
                triangles.len(),
                labels.len()
            )));
        }
        for (index, corners) in triangles.iter().enumerate() {
            if corners.iter().any(|&c| c >= vertices.len()) {
                return Err(TrackerError::Construction(format!(
                    "triangle {index} references a vertex out of range"
                )));
            }
        }

        let ConstraintSet {
            indices,
            positions,
            velocities,
        } = constraints;
        if indices.len() != positions.len() || indices.len() != velocities.len() {
            return Err(TrackerError::Construction(
                "constraint arrays are not parallel".to_owned(),
            ));
        }

        let mut constrained_velocity = vec![None; vertices.len()];
        for (k, &vertex) in indices.iter().enumerate() {
            if vertex >= vertices.len() {
                return Err(TrackerError::Construction(format!(
                    "constraint references vertex {vertex} out of range"
                )));
            }
            constrained_velocity[vertex] = Some(velocities[k]);
        }

        let regions: BTreeSet<i32> = labels.iter().flatten().copied().collect();
        let region_count = regions.len();

        let gammas = vec![GammaMatrix::zeros(region_count, region_count); vertices.len()];
        let velocity_cache = vec![Vector3::zeros(); vertices.len()];

        Ok(Self {
            positions: vertices,
            triangles,
            labels,
            constrained_velocity,
            gammas,
            velocity_cache,
            region_count,
        })
    }
}

impl SurfaceTracker for PassthroughTracker {
    fn step(&mut self, dt: f64) {
        for (vertex, constrained) in self.constrained_velocity.iter().enumerate() {
            if let Some(velocity) = constrained {
                self.positions[vertex] += velocity * dt;
            }
        }
        // Derived quantities are stale until the next refresh.
        for cached in &mut self.velocity_cache {
            *cached = Vector3::zeros();
        }
    }

    fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    fn position(&self, vertex: usize) -> Point3 {
        self.positions[vertex]
    }

    fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    fn triangle(&self, triangle: usize) -> [usize; 3] {
        self.triangles[triangle]
    }

    fn triangle_label(&self, triangle: usize) -> [i32; 2] {
        self.labels[triangle]
    }

    fn mass(&self, vertex: usize) -> Vector3 {
        if self.constrained_velocity[vertex].is_some() {
            Vector3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY)
        } else {
            Vector3::new(1.0, 1.0, 1.0)
        }
    }

    fn velocity(&self, vertex: usize) -> Vector3 {
        self.velocity_cache[vertex]
    }

    fn is_fully_solid(&self, vertex: usize) -> bool {
        self.constrained_velocity[vertex].is_some()
    }

    fn gamma(&self, vertex: usize) -> &GammaMatrix {
        &self.gammas[vertex]
    }

    fn gamma_mut(&mut self, vertex: usize) -> &mut GammaMatrix {
        &mut self.gammas[vertex]
    }

    fn refresh_derived_quantities(&mut self) {
        for (vertex, constrained) in self.constrained_velocity.iter().enumerate() {
            self.velocity_cache[vertex] = constrained.unwrap_or_else(Vector3::zeros);
        }
    }

    fn region_count(&self) -> usize {
        self.region_count
    }
}

/// Factory for [`PassthroughTracker`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughFactory;

impl TrackerFactory for PassthroughFactory {
    fn build(
        &self,
        bundle: MeshBundle,
        options: &SimOptions,
    ) -> Result<Box<dyn SurfaceTracker>, TrackerError> {
        Ok(Box::new(PassthroughTracker::new(bundle, options)?))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn bundle() -> MeshBundle {
        MeshBundle {
            vertices: vec![p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(0.0, 1.0, 0.0)],
            triangles: vec![[2, 1, 0]],
            labels: vec![[1, 0]],
            constraints: ConstraintSet::default(),
        }
    }

    #[test]
    fn region_count_is_number_of_distinct_labels() {
        let tracker = PassthroughTracker::new(bundle(), &SimOptions::default()).unwrap();
        assert_eq!(tracker.region_count(), 2);
        assert_eq!(tracker.gamma(0).nrows(), 2);
    }

    #[test]
    fn zero_dt_step_moves_nothing() {
        let mut tracker = PassthroughTracker::new(bundle(), &SimOptions::default()).unwrap();
        tracker.step(0.0);
        assert_relative_eq!(tracker.position(1), p(1.0, 0.0, 0.0));
    }

    #[test]
    fn constrained_vertices_advect_by_their_velocity() {
        let mut b = bundle();
        b.constraints.indices.push(0);
        b.constraints.positions.push(p(0.0, 0.0, 0.0));
        b.constraints.velocities.push(Vector3::new(0.0, 2.0, 0.0));

        let mut tracker = PassthroughTracker::new(b, &SimOptions::default()).unwrap();
        tracker.step(0.5);
        assert_relative_eq!(tracker.position(0), p(0.0, 1.0, 0.0));
        // Free vertices stay put.
        assert_relative_eq!(tracker.position(1), p(1.0, 0.0, 0.0));
    }

    #[test]
    fn velocity_is_stale_until_refreshed() {
        let mut b = bundle();
        b.constraints.indices.push(1);
        b.constraints.positions.push(p(1.0, 0.0, 0.0));
        b.constraints.velocities.push(Vector3::new(3.0, 0.0, 0.0));

        let mut tracker = PassthroughTracker::new(b, &SimOptions::default()).unwrap();
        tracker.step(0.1);
        assert_eq!(tracker.velocity(1), Vector3::zeros());
        tracker.refresh_derived_quantities();
        assert_relative_eq!(tracker.velocity(1), Vector3::new(3.0, 0.0, 0.0));
    }

    #[test]
    fn constrained_vertices_are_fully_solid_with_infinite_mass() {
        let mut b = bundle();
        b.constraints.indices.push(2);
        b.constraints.positions.push(p(0.0, 1.0, 0.0));
        b.constraints.velocities.push(Vector3::zeros());

        let tracker = PassthroughTracker::new(b, &SimOptions::default()).unwrap();
        assert!(tracker.is_fully_solid(2));
        assert!(!tracker.is_fully_solid(0));
        assert!(tracker.mass(2).x.is_infinite());
        assert_relative_eq!(tracker.mass(0), Vector3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn out_of_range_triangle_index_fails_construction() {
        let mut b = bundle();
        b.triangles[0] = [0, 1, 9];
        assert!(matches!(
            PassthroughTracker::new(b, &SimOptions::default()),
            Err(TrackerError::Construction(_))
        ));
    }

    #[test]
    fn label_count_mismatch_fails_construction() {
        let mut b = bundle();
        b.labels.clear();
        assert!(PassthroughTracker::new(b, &SimOptions::default()).is_err());
    }
}
