//! Boundary layer: the batch command file format and its runner.

pub mod batch;
pub mod csv;
