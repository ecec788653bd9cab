use anyhow::{ensure, Result};
use common::config::ArrayConfig;
use tracing::debug;

use crate::{array::cube_array, mesh::Mesh};

/// Splits `count` cubes into grids holding at most `grid_size` cubes each.
/// Every batch is full except possibly the last one.
pub fn batch_sizes(count: u32, grid_size: u64) -> Result<Vec<u32>> {
    ensure!(
        count == 0 || grid_size > 0,
        "Can't fit {count} cubes into an empty grid"
    );

    let mut sizes = Vec::new();
    let mut remaining = count as u64;
    while remaining > 0 {
        sizes.push(remaining.min(grid_size) as u32);
        remaining = remaining.saturating_sub(grid_size);
    }

    Ok(sizes)
}

/// Builds the cube arrays for each requested count. Each entry in the result
/// lists the meshes of one count, one mesh per grid.
pub fn many_cube_arrays(counts: &[u32], layout: &ArrayConfig) -> Result<Vec<Vec<Mesh>>> {
    let grid_size = layout.grid_size();

    let mut out = Vec::with_capacity(counts.len());
    for &count in counts {
        let sizes = batch_sizes(count, grid_size)?;
        debug!("Splitting {count} cubes into batches of {sizes:?}");

        let meshes = sizes
            .into_iter()
            .map(|size| cube_array(layout, Some(size)))
            .collect();
        out.push(meshes);
    }

    Ok(out)
}
