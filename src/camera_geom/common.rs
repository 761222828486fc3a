//! Common utilities module
//!
//! Error type and result alias shared by every stage of the camera geometry pipeline.

pub mod error;

pub use error::{CameraGeomError, Result};
