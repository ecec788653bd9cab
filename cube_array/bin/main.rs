use std::{path::Path, time::Instant};

use anyhow::Result;
use clap::Parser;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{filter, layer::SubscriberExt, util::SubscriberInitExt};

use args::{Args, BatchArgs, Command};
use common::misc::human_duration;
use cube_array::{
    array::cube_array,
    batch::{batch_sizes, many_cube_arrays},
    cube::cube_mesh,
    export::{file_names, load_mesh, save_mesh, save_meshes},
    mesh::Mesh,
    preview::{show_mesh, PreviewConfig},
};

mod args;

fn main() -> Result<()> {
    let args = Args::parse();

    let level = args.log_level();
    let filter = filter::Targets::new()
        .with_default(LevelFilter::OFF)
        .with_target("cube_array", level)
        .with_target("common", level);
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let now = Instant::now();
    match args.command {
        Command::Cube {
            shape,
            output,
            preview,
        } => {
            let mesh = cube_mesh(shape.multiplier, shape.offset);
            write_single(&mesh, &output, preview.as_deref())?;
        }
        Command::Array {
            layout,
            max_count,
            output,
            preview,
        } => {
            let mesh = cube_array(&layout.non_empty_array_config()?, max_count);
            write_single(&mesh, &output, preview.as_deref())?;
        }
        Command::Batch(batch) => run_batch(&batch)?,
        Command::Preview {
            input,
            output,
            open,
        } => {
            let mesh = load_mesh(&input)?;
            info!(
                "Loaded `{}` ({} triangles)",
                input.display(),
                mesh.triangle_count()
            );
            let output = output.unwrap_or_else(|| input.with_extension("svg"));
            show_mesh(&mesh, &output, &PreviewConfig::default(), open)?;
        }
    }

    info!("Done. Elapsed: {}", human_duration(now.elapsed()));
    Ok(())
}

fn write_single(mesh: &Mesh, output: &Path, preview: Option<&Path>) -> Result<()> {
    save_mesh(mesh, output)?;
    info!(
        "Saved `{}` ({} triangles)",
        output.display(),
        mesh.triangle_count()
    );

    if let Some(preview) = preview {
        show_mesh(mesh, preview, &PreviewConfig::default(), false)?;
    }

    Ok(())
}

fn run_batch(batch: &BatchArgs) -> Result<()> {
    let job = batch.job()?;
    let (counts, names) = (job.counts(), job.names());

    if batch.dry_run {
        let grid_size = job.layout.grid_size();
        for (&count, name) in counts.iter().zip(&names) {
            let sizes = batch_sizes(count, grid_size)?;
            for (file, size) in file_names(name, sizes.len()).iter().zip(&sizes) {
                info!("Would write {size} cubes to `{}`", job.folder.join(file).display());
            }
        }
        return Ok(());
    }

    let meshes = many_cube_arrays(&counts, &job.layout)?;
    let written = save_meshes(&meshes, &names, &job.folder)?;
    info!(
        "Wrote {} files to `{}`",
        written.len(),
        job.folder.display()
    );

    Ok(())
}
