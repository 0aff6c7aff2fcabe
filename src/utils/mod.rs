//! Utility modules shared by the sync pipeline.

pub mod fs;
pub mod log;
pub mod path;
