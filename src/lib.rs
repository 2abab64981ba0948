//! Assignment checking pipeline: validate a submitted assignment with the
//! grading service, check it inside the course's container image, and
//! report the result back in a separate, later invocation.

pub mod config;
pub mod course;
pub mod docker;
pub mod error;
pub mod pipeline;
pub mod remote;
pub mod routes;
pub mod state;

pub use error::{CheckError, Result};
