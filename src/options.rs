use crate::error::OptionsError;
use crate::math::Vector3;

/// Velocity integration scheme requested from the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Integration {
    /// Explicit integration.
    #[default]
    Explicit,
    /// Fully implicit integration.
    Implicit,
    /// Position-based-dynamics style implicit integration.
    PbdImplicit,
    /// Fourth-order Runge-Kutta velocity integration.
    Rk4,
}

/// Parameters handed to the surface tracker at construction.
///
/// Groups the physics coefficients, remeshing targets, and topology-change
/// policies of one simulation frame.
#[derive(Debug, Clone)]
pub struct SimOptions {
    /// Velocity integration scheme.
    pub integration: Integration,
    /// Velocity-field smoothing coefficient.
    pub smoothing_coef: f64,
    /// Velocity damping coefficient.
    pub damping_coef: f64,
    /// Surface tension coefficient.
    pub sigma: f64,
    /// Bending stiffness.
    pub bending: f64,
    /// Stretching stiffness.
    pub stretching: f64,
    /// Gravitational acceleration vector.
    pub gravity: Vector3,
    /// Characteristic bubble radius.
    pub radius: f64,
    /// Film material density.
    pub density: f64,
    /// Target edge length for remeshing.
    pub remesh_resolution: f64,
    /// Remeshing passes per step.
    pub remesh_iterations: u32,
    /// Collision epsilon as a fraction of mean edge length.
    pub collision_epsilon_fraction: f64,
    /// Merge proximity epsilon as a fraction of mean edge length.
    pub merge_proximity_epsilon_fraction: f64,
    /// Whether the tracker smooths the surface during a step.
    pub perform_smoothing: bool,
    /// Maximum allowed volume change during a remeshing operation, as a
    /// fraction of mean edge length cubed.
    pub max_volume_change_fraction: f64,
    /// Minimum triangle angle in degrees.
    pub min_triangle_angle: f64,
    /// Maximum triangle angle in degrees.
    pub max_triangle_angle: f64,
    /// Angle threshold in degrees above which triangles are split.
    pub large_triangle_angle_to_split: f64,
    /// Minimum allowed triangle area as a fraction of mean edge length
    /// squared.
    pub min_triangle_area_fraction: f64,
    /// Whether T1 topological transitions are performed.
    pub t1_transition_enabled: bool,
    /// T1 pull-apart distance as a fraction of mean edge length.
    pub t1_pull_apart_distance_fraction: f64,
    /// Whether remeshing uses smooth subdivision.
    pub smooth_subdivision: bool,
    /// Whether non-manifold geometry is permitted.
    pub allow_non_manifold: bool,
    /// Whether topology-changing operations are permitted.
    pub allow_topology_changes: bool,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            integration: Integration::Explicit,
            smoothing_coef: 1.0,
            damping_coef: 1.0,
            sigma: 1.0,
            bending: 100.0,
            stretching: 100.0,
            gravity: Vector3::zeros(),
            radius: 0.1,
            density: 1.32e3,
            remesh_resolution: 0.1,
            remesh_iterations: 2,
            collision_epsilon_fraction: 0.1,
            merge_proximity_epsilon_fraction: 0.1,
            perform_smoothing: false,
            max_volume_change_fraction: 0.1,
            min_triangle_angle: 3.0,
            max_triangle_angle: 180.0,
            large_triangle_angle_to_split: 180.0,
            min_triangle_area_fraction: 0.1,
            t1_transition_enabled: true,
            t1_pull_apart_distance_fraction: 0.1,
            smooth_subdivision: false,
            allow_non_manifold: true,
            allow_topology_changes: true,
        }
    }
}

impl SimOptions {
    /// Checks the options for values the tracker cannot work with.
    ///
    /// # Errors
    ///
    /// Returns an error for non-finite coefficients, non-positive density or
    /// remeshing resolution, or triangle angles outside `[0, 180]` degrees.
    pub fn validate(&self) -> Result<(), OptionsError> {
        let finite = [
            ("smoothing_coef", self.smoothing_coef),
            ("damping_coef", self.damping_coef),
            ("sigma", self.sigma),
            ("bending", self.bending),
            ("stretching", self.stretching),
            ("radius", self.radius),
        ];
        for (parameter, value) in finite {
            if !value.is_finite() {
                return Err(OptionsError::NonFinite { parameter, value });
            }
        }
        for (parameter, value) in [
            ("gravity.x", self.gravity.x),
            ("gravity.y", self.gravity.y),
            ("gravity.z", self.gravity.z),
        ] {
            if !value.is_finite() {
                return Err(OptionsError::NonFinite { parameter, value });
            }
        }

        if !(self.density > 0.0 && self.density.is_finite()) {
            return Err(OptionsError::ParameterOutOfRange {
                parameter: "density",
                value: self.density,
                min: 0.0,
                max: f64::INFINITY,
            });
        }
        if !(self.remesh_resolution > 0.0 && self.remesh_resolution.is_finite()) {
            return Err(OptionsError::ParameterOutOfRange {
                parameter: "remesh_resolution",
                value: self.remesh_resolution,
                min: 0.0,
                max: f64::INFINITY,
            });
        }

        let fractions = [
            ("collision_epsilon_fraction", self.collision_epsilon_fraction),
            (
                "merge_proximity_epsilon_fraction",
                self.merge_proximity_epsilon_fraction,
            ),
            ("max_volume_change_fraction", self.max_volume_change_fraction),
            ("min_triangle_area_fraction", self.min_triangle_area_fraction),
            (
                "t1_pull_apart_distance_fraction",
                self.t1_pull_apart_distance_fraction,
            ),
        ];
        for (parameter, value) in fractions {
            if !(value.is_finite() && value >= 0.0) {
                return Err(OptionsError::ParameterOutOfRange {
                    parameter,
                    value,
                    min: 0.0,
                    max: f64::INFINITY,
                });
            }
        }

        let angles = [
            ("min_triangle_angle", self.min_triangle_angle),
            ("max_triangle_angle", self.max_triangle_angle),
            (
                "large_triangle_angle_to_split",
                self.large_triangle_angle_to_split,
            ),
        ];
        for (parameter, value) in angles {
            if !(value.is_finite() && (0.0..=180.0).contains(&value)) {
                return Err(OptionsError::ParameterOutOfRange {
                    parameter,
                    value,
                    min: 0.0,
                    max: 180.0,
                });
            }
        }
        if self.min_triangle_angle > self.max_triangle_angle {
            return Err(OptionsError::ParameterOutOfRange {
                parameter: "min_triangle_angle",
                value: self.min_triangle_angle,
                min: 0.0,
                max: self.max_triangle_angle,
            });
        }

        Ok(())
    }
}
