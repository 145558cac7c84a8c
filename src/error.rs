use thiserror::Error;

use crate::mesh::{AttributeKind, AttributeScope};

/// Top-level error type for the lamella marshalling layer.
///
/// The wrapping variant names the frame phase that failed, so a caller can
/// surface "unable to build surface tracker" versus "unable to convert
/// tracker result" without inspecting the inner error.
#[derive(Debug, Error)]
pub enum LamellaError {
    #[error("unable to build surface tracker: {0}")]
    Extract(#[from] ExtractError),

    #[error("unable to build surface tracker: {0}")]
    Tracker(#[from] TrackerError),

    #[error("unable to build surface tracker: {0}")]
    Field(#[from] FieldError),

    #[error("unable to convert tracker result: {0}")]
    Write(#[from] WriteError),

    #[error(transparent)]
    Options(#[from] OptionsError),
}

/// Errors raised while extracting the host mesh into tracker input arrays.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("host mesh has no points")]
    EmptyInput,
}

/// Errors raised while constructing the surface tracker.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("tracker construction failed: {0}")]
    Construction(String),
}

/// Errors raised while restoring per-vertex field state from a prior frame.
#[derive(Debug, Error)]
pub enum FieldError {
    #[error("attribute \"{name}\" is not a float-array attribute (found {found})")]
    MalformedAttribute { name: String, found: AttributeKind },

    #[error(
        "point {vertex}: persisted field length {found} does not match \
         region count squared ({expected})"
    )]
    DimensionMismatch {
        vertex: usize,
        expected: usize,
        found: usize,
    },
}

/// Errors raised while writing tracker results back into a host mesh.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error(
        "cannot create {scope} attribute \"{name}\": \
         existing attribute has kind {found}, expected {expected}"
    )]
    AttributeCreation {
        scope: AttributeScope,
        name: String,
        expected: AttributeKind,
        found: AttributeKind,
    },
}

/// Errors raised when validating simulation options.
#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("parameter {parameter} = {value} must be finite")]
    NonFinite { parameter: &'static str, value: f64 },

    #[error("parameter {parameter} = {value} is out of range [{min}, {max}]")]
    ParameterOutOfRange {
        parameter: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

/// Convenience type alias for results using [`LamellaError`].
pub type Result<T> = std::result::Result<T, LamellaError>;
