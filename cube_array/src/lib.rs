//! Builds cube meshes, tiles them into grids and splits requested cube counts
//! into grid sized batches that are exported as STL files.

use nalgebra::Vector3;

pub mod array;
pub mod batch;
pub mod cube;
pub mod export;
pub mod mesh;
pub mod preview;

pub type Pos = Vector3<f32>;
