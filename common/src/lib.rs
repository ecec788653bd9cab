pub mod config;
pub mod misc;
pub mod serde_impls;
