//! Per-cell random colors.

use rand::Rng;

use crate::geometry::VERTICES_PER_CELL;

/// Floats per vertex in the color buffer (`r`, `g`, `b`).
pub const COLOR_COMPONENTS: usize = 3;

/// Floats per cell in the color buffer.
pub const FLOATS_PER_CELL: usize = VERTICES_PER_CELL * COLOR_COMPONENTS;

/// Computes the color buffer for `cells` cells.
///
/// Each cell gets one RGB triple with components uniform in `[0, 1)`, repeated
/// once per vertex so it lines up with [`vertex_data`](crate::vertex_data).
pub fn color_data<R>(cells: usize, rng: &mut R) -> Vec<f32>
where
    R: Rng + ?Sized,
{
    let mut colors = Vec::with_capacity(cells * FLOATS_PER_CELL);

    for _ in 0..cells {
        let rgb: [f32; COLOR_COMPONENTS] = [rng.r#gen(), rng.r#gen(), rng.r#gen()];
        for _ in 0..VERTICES_PER_CELL {
            colors.extend_from_slice(&rgb);
        }
    }

    colors
}
