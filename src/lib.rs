pub mod driver;
pub mod error;
pub mod extract;
pub mod field;
pub mod math;
pub mod mesh;
pub mod options;
pub mod orientation;
pub mod tracker;
pub mod write;

pub use driver::step_frame;
pub use error::{LamellaError, Result};
