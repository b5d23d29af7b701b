//! Shared building blocks for every crate in the workspace:
//! logging setup and the transport types that cross crate boundaries.

pub mod types;
pub mod utils;
