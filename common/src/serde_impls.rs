use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// A per-axis value that may be written as a single number, which is
/// broadcast to all three axes, or as a `[x, y, z]` list.
pub mod axes {
    use super::*;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Scalar(f32),
        Triple([f32; 3]),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vector3<f32>, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Ok(match Raw::deserialize(deserializer)? {
            Raw::Scalar(value) => Vector3::repeat(value),
            Raw::Triple([x, y, z]) => Vector3::new(x, y, z),
        })
    }

    pub fn serialize<S>(data: &Vector3<f32>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        data.as_slice().serialize(serializer)
    }
}

pub mod vector3u {
    use super::*;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vector3<u32>, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let [x, y, z] = <[u32; 3]>::deserialize(deserializer)?;
        Ok(Vector3::new(x, y, z))
    }

    pub fn serialize<S>(data: &Vector3<u32>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        data.as_slice().serialize(serializer)
    }
}
