use std::{path::PathBuf, str::FromStr};

use anyhow::{bail, ensure, Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use common::config::{ArrayConfig, JobConfig, OutputConfig, DEFAULT_FOLDER};
use nalgebra::{Scalar, Vector3};
use num_traits::Zero;
use tracing::level_filters::LevelFilter;

#[derive(Debug, Parser)]
/// Generate arrays of cubes and export them as STL files.
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, action = ArgAction::Count, global = true)]
    /// Log more details, repeat for even more.
    pub verbose: u8,
    #[arg(short, long, global = true)]
    /// Only log warnings and errors.
    pub quiet: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a single cube.
    Cube {
        #[command(flatten)]
        shape: ShapeArgs,
        #[arg(short, long, default_value = "cube.stl")]
        /// File to save the cube to.
        output: PathBuf,
        #[arg(long)]
        /// Also render an SVG preview to this path.
        preview: Option<PathBuf>,
    },
    /// Generate a grid of cubes as one mesh.
    Array {
        #[command(flatten)]
        layout: LayoutArgs,
        #[arg(long)]
        /// Stop after this many cubes, even if the grid is not full.
        max_count: Option<u32>,
        #[arg(short, long, default_value = "cube_array.stl")]
        /// File to save the array to.
        output: PathBuf,
        #[arg(long)]
        /// Also render an SVG preview to this path.
        preview: Option<PathBuf>,
    },
    /// Split cube counts into grid sized files.
    Batch(BatchArgs),
    /// Render an existing STL file to an SVG image.
    Preview {
        /// Path to a .stl file.
        input: PathBuf,
        #[arg(short, long)]
        /// Where to save the image, defaults to the input path with an .svg
        /// extension.
        output: Option<PathBuf>,
        #[arg(long)]
        /// Open the image in the default viewer.
        open: bool,
    },
}

#[derive(clap::Args, Debug)]
pub struct ShapeArgs {
    #[arg(long, default_value = "1", value_parser = axes_value_parser)]
    /// Size of each cube. Either one number for all axes or `x,y,z`.
    pub multiplier: Vector3<f32>,
    #[arg(long, default_value = "0", value_parser = axes_value_parser)]
    /// Distance between neighboring cubes' origins. Either one number for
    /// all axes or `x,y,z`.
    pub offset: Vector3<f32>,
}

#[derive(clap::Args, Debug)]
pub struct LayoutArgs {
    #[command(flatten)]
    pub shape: ShapeArgs,
    #[arg(long, default_value = "1, 1, 1", value_parser = vector_value_parser::<u32, 3>)]
    /// Number of cubes along the X, Y, and Z axes.
    pub count_by_axis: Vector3<u32>,
}

#[derive(clap::Args, Debug)]
pub struct BatchArgs {
    #[arg(long, value_delimiter = ',', required_unless_present = "config")]
    /// Number of cubes to generate for each output.
    pub counts: Vec<u32>,
    #[arg(long, value_delimiter = ',')]
    /// File base name for each count. Defaults to the count itself.
    pub names: Vec<String>,
    #[arg(long)]
    /// Folder to write the files into.
    pub folder: Option<PathBuf>,
    #[arg(long, conflicts_with_all = ["counts", "names"])]
    /// TOML job file describing the layout and outputs.
    pub config: Option<PathBuf>,
    #[arg(long)]
    /// Only log which files would be written.
    pub dry_run: bool,

    #[command(flatten)]
    pub layout: LayoutArgs,
}

impl Args {
    pub fn log_level(&self) -> LevelFilter {
        match (self.quiet, self.verbose) {
            (true, _) => LevelFilter::WARN,
            (false, 0) => LevelFilter::INFO,
            (false, 1) => LevelFilter::DEBUG,
            (false, _) => LevelFilter::TRACE,
        }
    }
}

impl LayoutArgs {
    pub fn array_config(&self) -> ArrayConfig {
        ArrayConfig {
            multiplier: self.shape.multiplier,
            offset: self.shape.offset,
            count_by_axis: self.count_by_axis,
        }
    }

    /// Like [`LayoutArgs::array_config`], but rejects grids without any cells.
    pub fn non_empty_array_config(&self) -> Result<ArrayConfig> {
        let config = self.array_config();
        ensure!(
            config.grid_size() > 0,
            "Count by axis {:?} leaves an empty grid",
            config.count_by_axis.as_slice()
        );
        Ok(config)
    }
}

impl BatchArgs {
    /// Builds the job from either the job file or the command line. An
    /// explicit `--folder` overrides the job file's folder.
    pub fn job(&self) -> Result<JobConfig> {
        let mut job = match &self.config {
            Some(path) => JobConfig::load(path)?,
            None => {
                ensure!(
                    self.names.is_empty() || self.names.len() == self.counts.len(),
                    "Got {} counts but {} names",
                    self.counts.len(),
                    self.names.len()
                );

                let outputs = (self.counts.iter().enumerate())
                    .map(|(idx, &count)| OutputConfig {
                        count,
                        name: self.names.get(idx).cloned(),
                    })
                    .collect();
                JobConfig {
                    folder: PathBuf::from(DEFAULT_FOLDER),
                    layout: self.layout.array_config(),
                    outputs,
                }
            }
        };

        if let Some(folder) = &self.folder {
            job.folder = folder.clone();
        }

        Ok(job)
    }
}

/// Parses `x,y,z` or a single number used for every axis.
fn axes_value_parser(raw: &str) -> Result<Vector3<f32>> {
    let parts = raw.split(',').map(str::trim).collect::<Vec<_>>();
    let parse = |part: &str| {
        part.parse::<f32>()
            .with_context(|| format!("Can't convert `{part}` to a number"))
    };

    Ok(match parts.as_slice() {
        &[value] => Vector3::repeat(parse(value)?),
        &[x, y, z] => Vector3::new(parse(x)?, parse(y)?, parse(z)?),
        _ => bail!("Expected one or three comma separated numbers"),
    })
}

fn vector_value_parser<T, const N: usize>(raw: &str) -> Result<nalgebra::SVector<T, N>>
where
    T: FromStr + Scalar + Zero,
    T::Err: Send + Sync + std::error::Error + 'static,
{
    let mut vec = nalgebra::SVector::<T, N>::zeros();

    let mut parts = raw.split(',');
    for i in 0..N {
        let element = parts.next().context("Missing vector element")?.trim();
        vec[i] = element
            .parse()
            .context("Can't convert element from string")?;
    }
    ensure!(parts.next().is_none(), "Too many vector elements");

    Ok(vec)
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn verify_cli() {
        Args::command().debug_assert();
    }

    #[test]
    fn parses_scalar_or_triple_axes() {
        assert_eq!(axes_value_parser("5").unwrap(), Vector3::repeat(5.0));
        assert_eq!(
            axes_value_parser("10, 10, 5").unwrap(),
            Vector3::new(10.0, 10.0, 5.0)
        );
        assert!(axes_value_parser("1,2").is_err());
        assert!(axes_value_parser("1,2,3,4").is_err());
        assert!(axes_value_parser("big").is_err());
    }

    #[test]
    fn count_by_axis_needs_three_values() {
        assert_eq!(
            vector_value_parser::<u32, 3>("8, 8, 1").unwrap(),
            Vector3::new(8, 8, 1)
        );
        assert!(vector_value_parser::<u32, 3>("8").is_err());
        assert!(vector_value_parser::<u32, 3>("1,2,3,4").is_err());
        assert!(vector_value_parser::<u32, 3>("1,-2,3").is_err());
    }

    #[test]
    fn batch_job_from_flags() {
        let args = Args::try_parse_from([
            "cube_array",
            "batch",
            "--counts",
            "43,88",
            "--names",
            "small,large",
            "--multiplier",
            "5",
            "--offset",
            "6",
            "--count-by-axis",
            "8,8,1",
        ])
        .unwrap();

        let Command::Batch(batch) = args.command else {
            panic!("expected batch command");
        };
        let job = batch.job().unwrap();
        assert_eq!(job.folder, PathBuf::from("meshes"));
        assert_eq!(job.counts(), vec![43, 88]);
        assert_eq!(job.names(), vec!["small".to_owned(), "large".to_owned()]);
        assert_eq!(job.layout.grid_size(), 64);
        assert_eq!(job.layout.multiplier, Vector3::repeat(5.0));
    }

    #[test]
    fn batch_rejects_mismatched_names() {
        let args = Args::try_parse_from([
            "cube_array",
            "batch",
            "--counts",
            "1,2",
            "--names",
            "only",
        ])
        .unwrap();

        let Command::Batch(batch) = args.command else {
            panic!("expected batch command");
        };
        assert!(batch.job().is_err());
    }

    #[test]
    fn folder_flag_overrides_job_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("job.toml");
        std::fs::write(&path, "folder = \"from_file\"\n\n[[output]]\ncount = 3\n").unwrap();
        let path = path.to_string_lossy().into_owned();

        let args =
            Args::try_parse_from(["cube_array", "batch", "--config", path.as_str()]).unwrap();
        let Command::Batch(batch) = args.command else {
            panic!("expected batch command");
        };
        assert_eq!(batch.job().unwrap().folder, PathBuf::from("from_file"));

        let args = Args::try_parse_from([
            "cube_array",
            "batch",
            "--config",
            path.as_str(),
            "--folder",
            "other",
        ])
        .unwrap();
        let Command::Batch(batch) = args.command else {
            panic!("expected batch command");
        };
        let job = batch.job().unwrap();
        assert_eq!(job.folder, PathBuf::from("other"));
        assert_eq!(job.counts(), vec![3]);
    }

    #[test]
    fn missing_job_file_is_reported() {
        let args = Args::try_parse_from([
            "cube_array",
            "batch",
            "--config",
            "does/not/exist.toml",
        ])
        .unwrap();
        let Command::Batch(batch) = args.command else {
            panic!("expected batch command");
        };
        assert!(batch.job().is_err());
    }

    #[test]
    fn array_rejects_empty_grid() {
        let args = Args::try_parse_from(["cube_array", "array", "--count-by-axis", "4,0,1"])
            .unwrap();
        let Command::Array { layout, .. } = args.command else {
            panic!("expected array command");
        };
        assert!(layout.non_empty_array_config().is_err());
        assert_eq!(layout.array_config().grid_size(), 0);

        let args = Args::try_parse_from(["cube_array", "array", "--count-by-axis", "4,2,1"])
            .unwrap();
        let Command::Array { layout, .. } = args.command else {
            panic!("expected array command");
        };
        assert_eq!(layout.non_empty_array_config().unwrap().grid_size(), 8);
    }

    #[test]
    fn batch_needs_counts_or_config() {
        assert!(Args::try_parse_from(["cube_array", "batch"]).is_err());
    }

    #[test]
    fn verbosity_flags() {
        let args = Args::try_parse_from(["cube_array", "-vv", "cube"]).unwrap();
        assert_eq!(args.log_level(), LevelFilter::TRACE);

        let args = Args::try_parse_from(["cube_array", "cube", "--quiet"]).unwrap();
        assert_eq!(args.log_level(), LevelFilter::WARN);
    }
}
