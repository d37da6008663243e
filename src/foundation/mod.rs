/// Geometry primitives shared by every module.
pub mod core;
/// Serde-backed settings.
pub mod config;
/// Error taxonomy.
pub mod error;
