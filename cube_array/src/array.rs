use common::config::ArrayConfig;
use itertools::iproduct;
use nalgebra::Vector3;

use crate::{cube::cube_mesh, mesh::Mesh};

/// Grid cells in generation order. X is the outermost loop and Z the
/// innermost, so consecutive cubes stack along Z first.
pub fn cells(layout: &ArrayConfig) -> impl Iterator<Item = Vector3<u32>> {
    let count = layout.count_by_axis;
    iproduct!(0..count.x, 0..count.y, 0..count.z).map(|(x, y, z)| Vector3::new(x, y, z))
}

/// Builds a grid of cubes as one mesh. Generation stops once `max_count`
/// cubes have been made. With `None`, a cap of zero, or a cap above the grid
/// size, the full grid is built.
pub fn cube_array(layout: &ArrayConfig, max_count: Option<u32>) -> Mesh {
    let limit = (max_count.filter(|&x| x > 0)).map_or(usize::MAX, |x| x as usize);
    let cubes = cells(layout).take(limit).map(|cell| {
        let offset = layout.offset.component_mul(&cell.cast::<f32>());
        cube_mesh(layout.multiplier, offset)
    });
    Mesh::concat(cubes)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::Pos;

    fn layout(multiplier: Pos, offset: Pos, count_by_axis: [u32; 3]) -> ArrayConfig {
        ArrayConfig {
            multiplier,
            offset,
            count_by_axis: Vector3::from(count_by_axis),
        }
    }

    #[test]
    fn stacks_along_z_first() {
        let layout = layout(Pos::repeat(1.0), Pos::repeat(2.0), [2, 2, 2]);
        let cells = cells(&layout).collect::<Vec<_>>();
        assert_eq!(cells.len(), 8);
        assert_eq!(cells[0], Vector3::new(0, 0, 0));
        assert_eq!(cells[1], Vector3::new(0, 0, 1));
        assert_eq!(cells[2], Vector3::new(0, 1, 0));
        assert_eq!(cells[4], Vector3::new(1, 0, 0));
    }

    #[test]
    fn capped_array() {
        let layout = layout(Pos::new(10.0, 10.0, 5.0), Pos::repeat(15.0), [1, 2, 4]);
        let mesh = cube_array(&layout, Some(5));

        assert_eq!(mesh.triangle_count(), 5 * 12);
        assert_eq!(
            mesh.bounds(),
            Some((Pos::zeros(), Pos::new(10.0, 25.0, 50.0)))
        );

        // The fifth cube starts the second column.
        let fifth = Mesh::new(mesh.triangles()[4 * 12..].to_vec());
        assert_eq!(
            fifth.bounds(),
            Some((Pos::new(0.0, 15.0, 0.0), Pos::new(10.0, 25.0, 5.0)))
        );
    }

    #[test]
    fn full_grid_without_cap() {
        let layout = layout(Pos::repeat(5.0), Pos::repeat(6.0), [8, 8, 1]);
        assert_eq!(cube_array(&layout, None).triangle_count(), 64 * 12);
        assert_eq!(cube_array(&layout, Some(1000)).triangle_count(), 64 * 12);
    }

    #[test]
    fn empty_grid() {
        let layout = layout(Pos::repeat(1.0), Pos::zeros(), [3, 0, 3]);
        assert!(cube_array(&layout, None).is_empty());
        assert!(cube_array(&layout, Some(4)).is_empty());
    }

    #[test]
    fn zero_cap_builds_full_grid() {
        let layout = layout(Pos::repeat(1.0), Pos::repeat(2.0), [2, 2, 1]);
        let mesh = cube_array(&layout, Some(0));
        assert_eq!(mesh.triangle_count(), 4 * 12);
        assert_eq!(mesh, cube_array(&layout, None));
    }

    proptest! {
        #[test]
        fn cube_count_is_capped(
            cx in 0_u32..5, cy in 0_u32..5, cz in 0_u32..5,
            max_count in proptest::option::of(0_u32..150),
        ) {
            let layout = layout(Pos::repeat(1.0), Pos::repeat(1.5), [cx, cy, cz]);
            let grid = (cx * cy * cz) as usize;
            let expected = match max_count {
                Some(max) if max > 0 => grid.min(max as usize),
                _ => grid,
            };
            prop_assert_eq!(cube_array(&layout, max_count).triangle_count(), expected * 12);
        }
    }
}
