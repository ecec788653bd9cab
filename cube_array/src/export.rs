use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::{ensure, Context, Result};
use tracing::info;

use crate::mesh::Mesh;

/// File names for a group of `mesh_count` meshes saved under `name`. A single
/// mesh keeps the plain name; otherwise each file gets a 1-based suffix.
pub fn file_names(name: &str, mesh_count: usize) -> Vec<String> {
    if mesh_count == 1 {
        return vec![format!("{name}.stl")];
    }

    (1..=mesh_count)
        .map(|idx| format!("{name}_{idx}.stl"))
        .collect()
}

/// Writes a mesh as a binary STL file.
pub fn save_mesh(mesh: &Mesh, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create `{}`", path.display()))?;
    let mut writer = BufWriter::new(file);

    stl_io::write_stl(&mut writer, mesh.to_stl_triangles().iter())
        .with_context(|| format!("Failed to write `{}`", path.display()))?;
    writer.flush()?;

    Ok(())
}

/// Saves each group of meshes under the matching file name in `folder`,
/// creating the folder if needed. Returns the written paths in order.
pub fn save_meshes<T: AsRef<str>>(
    meshes: &[Vec<Mesh>],
    filenames: &[T],
    folder: &Path,
) -> Result<Vec<PathBuf>> {
    ensure!(
        meshes.len() == filenames.len(),
        "Got {} mesh groups but {} file names",
        meshes.len(),
        filenames.len()
    );

    fs::create_dir_all(folder)
        .with_context(|| format!("Failed to create folder `{}`", folder.display()))?;

    let mut written = Vec::new();
    for (group, name) in meshes.iter().zip(filenames) {
        let names = file_names(name.as_ref(), group.len());
        for (mesh, name) in group.iter().zip(names) {
            let path = folder.join(name);
            save_mesh(mesh, &path)?;
            info!(
                "Saved `{}` ({} triangles)",
                path.display(),
                mesh.triangle_count()
            );
            written.push(path);
        }
    }

    Ok(written)
}

/// Loads an ASCII or binary STL file.
pub fn load_mesh(path: &Path) -> Result<Mesh> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open `{}`", path.display()))?;
    let mut reader = BufReader::new(file);

    let indexed = stl_io::read_stl(&mut reader)
        .with_context(|| format!("Failed to read `{}`", path.display()))?;
    Ok(Mesh::from_indexed(&indexed))
}
