//! File-backed store implementations.

pub mod blessing_wall;
