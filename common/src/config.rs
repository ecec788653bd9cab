use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{ensure, Context, Result};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::serde_impls::{axes, vector3u};

pub const DEFAULT_FOLDER: &str = "meshes";

/// Describes how cubes are sized and laid out in a grid.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ArrayConfig {
    /// Size of each cube along the X, Y, and Z axes.
    #[serde(with = "axes")]
    pub multiplier: Vector3<f32>,
    /// Distance between the origins of neighboring cubes along each axis.
    #[serde(with = "axes")]
    pub offset: Vector3<f32>,
    /// Number of grid cells along each axis.
    #[serde(with = "vector3u")]
    pub count_by_axis: Vector3<u32>,
}

/// One requested cube count and the base name of the files it is saved to.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct OutputConfig {
    pub count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// A batch job, normally loaded from a TOML file:
///
/// ```toml
/// folder = "meshes"
///
/// [layout]
/// multiplier = 5
/// offset = 6
/// count_by_axis = [8, 8, 1]
///
/// [[output]]
/// count = 43
/// ```
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct JobConfig {
    pub folder: PathBuf,
    pub layout: ArrayConfig,
    #[serde(rename = "output")]
    pub outputs: Vec<OutputConfig>,
}

impl ArrayConfig {
    /// Number of cubes a completely filled grid holds.
    pub fn grid_size(&self) -> u64 {
        (self.count_by_axis.iter()).fold(1_u64, |acc, &x| acc.saturating_mul(x as u64))
    }
}

impl OutputConfig {
    pub fn new(count: u32) -> Self {
        Self { count, name: None }
    }

    /// The file base name, falling back to the cube count.
    pub fn name(&self) -> String {
        self.name.clone().unwrap_or_else(|| self.count.to_string())
    }
}

impl JobConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read job file `{}`", path.display()))?;
        let config = Self::from_toml(&raw)
            .with_context(|| format!("Invalid job file `{}`", path.display()))?;
        info!(
            "Loaded job file `{}` with {} outputs",
            path.display(),
            config.outputs.len()
        );
        Ok(config)
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        let config = toml::from_str::<Self>(raw)?;
        ensure!(!config.outputs.is_empty(), "Job defines no outputs");
        Ok(config)
    }

    pub fn counts(&self) -> Vec<u32> {
        self.outputs.iter().map(|x| x.count).collect()
    }

    pub fn names(&self) -> Vec<String> {
        self.outputs.iter().map(OutputConfig::name).collect()
    }
}

impl Default for ArrayConfig {
    fn default() -> Self {
        Self {
            multiplier: Vector3::repeat(1.0),
            offset: Vector3::zeros(),
            count_by_axis: Vector3::repeat(1),
        }
    }
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            folder: PathBuf::from(DEFAULT_FOLDER),
            layout: ArrayConfig::default(),
            outputs: Vec::new(),
        }
    }
}
