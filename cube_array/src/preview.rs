//! Renders meshes to SVG images for a quick look at the generated geometry.
//!
//! The mesh is drawn with a fixed orthographic camera. Triangles are painted
//! back to front and shaded by how directly they face a light placed at the
//! camera. All axes share one scale factor so cubes keep their proportions.

use std::path::Path;

use anyhow::{Context, Result};
use nalgebra::Vector2;
use svg::{node::element::Polygon, Document};
use tracing::info;

use crate::{mesh::Mesh, Pos};

#[derive(Debug, Clone)]
pub struct PreviewConfig {
    /// Width and height of the square image in pixels.
    pub size: u32,
    /// Empty border around the mesh in pixels.
    pub margin: f32,
    /// Camera rotation around the Z axis in degrees.
    pub azimuth: f32,
    /// Camera angle above the XY plane in degrees.
    pub elevation: f32,
    pub color: [u8; 3],
    /// Fraction of the color applied to faces turned away from the light.
    pub ambient: f32,
    /// Skip triangles facing away from the camera.
    pub cull_back_faces: bool,
}

/// Camera basis. `eye` points from the scene towards the camera.
struct View {
    right: Pos,
    up: Pos,
    eye: Pos,
}

impl View {
    fn new(config: &PreviewConfig) -> Self {
        let (azimuth, elevation) = (config.azimuth.to_radians(), config.elevation.to_radians());
        let eye = Pos::new(
            elevation.cos() * azimuth.cos(),
            elevation.cos() * azimuth.sin(),
            elevation.sin(),
        );

        // Looking straight down leaves Z parallel to the eye, so fall back to X.
        let right = Pos::z()
            .cross(&eye)
            .try_normalize(1e-6)
            .unwrap_or_else(Pos::x);
        let up = eye.cross(&right);
        Self { right, up, eye }
    }

    fn project(&self, pos: &Pos) -> Vector2<f32> {
        Vector2::new(pos.dot(&self.right), pos.dot(&self.up))
    }

    fn depth(&self, pos: &Pos) -> f32 {
        pos.dot(&self.eye)
    }
}

/// Draws the mesh into an SVG document.
pub fn render_svg(mesh: &Mesh, config: &PreviewConfig) -> Document {
    let size = config.size as f32;
    let mut document = Document::new()
        .set("viewBox", (0, 0, config.size, config.size))
        .set("width", config.size)
        .set("height", config.size);

    let view = View::new(config);
    let Some((min, max)) = projected_bounds(mesh, &view) else {
        return document;
    };

    let extent = (max - min).max();
    let scale = if extent > 0.0 {
        (size - 2.0 * config.margin).max(1.0) / extent
    } else {
        1.0
    };
    let center = (min + max) / 2.0;
    // SVG y grows downwards.
    let to_screen = |pos: &Pos| {
        let p = (view.project(pos) - center) * scale;
        (size / 2.0 + p.x, size / 2.0 - p.y)
    };

    let mut faces = (0..mesh.triangle_count())
        .map(|idx| (idx, mesh.normal(idx)))
        .filter(|(_, normal)| !config.cull_back_faces || normal.dot(&view.eye) > 1e-6)
        .map(|(idx, normal)| {
            let depth = mesh.triangle(idx).iter().map(|v| view.depth(v)).sum::<f32>() / 3.0;
            (idx, normal, depth)
        })
        .collect::<Vec<_>>();
    faces.sort_by(|a, b| a.2.total_cmp(&b.2));

    for (idx, normal, _) in faces {
        let points = mesh
            .triangle(idx)
            .iter()
            .map(&to_screen)
            .collect::<Vec<_>>();
        let fill = shade(config, normal.dot(&view.eye).abs());
        let polygon = Polygon::new()
            .set("points", points)
            .set("fill", fill.clone())
            .set("stroke", fill)
            .set("stroke-linejoin", "round");
        document = document.add(polygon);
    }

    document
}

/// Renders the mesh to `path` and optionally opens it in the default viewer.
pub fn show_mesh(mesh: &Mesh, path: &Path, config: &PreviewConfig, open_viewer: bool) -> Result<()> {
    let document = render_svg(mesh, config);
    svg::save(path, &document)
        .with_context(|| format!("Failed to write preview `{}`", path.display()))?;
    info!("Saved preview to `{}`", path.display());

    if open_viewer {
        open::that(path).with_context(|| format!("Failed to open `{}`", path.display()))?;
    }

    Ok(())
}

fn projected_bounds(mesh: &Mesh, view: &View) -> Option<(Vector2<f32>, Vector2<f32>)> {
    let mut points = mesh.points().map(|v| view.project(v));
    let first = points.next()?;
    Some(points.fold((first, first), |(min, max), p| {
        (min.inf(&p), max.sup(&p))
    }))
}

fn shade(config: &PreviewConfig, light: f32) -> String {
    let intensity = config.ambient + (1.0 - config.ambient) * light.clamp(0.0, 1.0);
    let [r, g, b] = config
        .color
        .map(|c| (c as f32 * intensity).round().clamp(0.0, 255.0) as u8);
    format!("rgb({r},{g},{b})")
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            size: 800,
            margin: 20.0,
            azimuth: 45.0,
            elevation: 35.264,
            color: [70, 130, 220],
            ambient: 0.35,
            cull_back_faces: true,
        }
    }
}
