//! Grid vertex geometry.
//!
//! Coordinates are in normalized document space: origin top-left, +Y down,
//! both axes spanning `[0, 1]`. Conversion to clip space happens in the vertex
//! shader.

use crate::config::GridConfig;

/// Vertices emitted per cell (two triangles).
pub const VERTICES_PER_CELL: usize = 6;

/// Floats per vertex in the vertex buffer (`x`, `y`).
pub const POSITION_COMPONENTS: usize = 2;

/// Floats per cell in the vertex buffer.
pub const FLOATS_PER_CELL: usize = VERTICES_PER_CELL * POSITION_COMPONENTS;

/// Size and stride of a cell along one axis.
#[derive(Debug, Copy, Clone, PartialEq)]
struct AxisLayout {
    size: f64,
    stride: f64,
}

impl AxisLayout {
    /// `count` cells and `count - 1` gutters exactly fill the unit interval.
    fn new(count: u32, ratio: f64) -> Self {
        let count = count as f64;
        let size = 1.0 / (count + ratio * (count - 1.0));
        let gutter = size * ratio;
        Self { size, stride: size + gutter }
    }
}

/// Computes the vertex buffer for `config`.
///
/// Row-major over cells. Within a cell: triangle 1 is
/// (top-left, bottom-left, bottom-right), triangle 2 is
/// (top-left, top-right, bottom-right).
pub fn vertex_data(config: &GridConfig) -> Vec<f32> {
    let ratio = config.square_to_gutter_ratio() as f64;
    let x_axis = AxisLayout::new(config.columns(), ratio);
    let y_axis = AxisLayout::new(config.rows(), ratio);

    let mut vertices = Vec::with_capacity(config.cell_count() * FLOATS_PER_CELL);

    for row in 0..config.rows() {
        let top = row as f64 * y_axis.stride;
        for column in 0..config.columns() {
            let left = column as f64 * x_axis.stride;
            push_cell(&mut vertices, left, top, x_axis.size, y_axis.size);
        }
    }

    vertices
}

fn push_cell(out: &mut Vec<f32>, left: f64, top: f64, width: f64, height: f64) {
    let (l, t) = (left as f32, top as f32);
    let (r, b) = ((left + width) as f32, (top + height) as f32);

    out.extend_from_slice(&[
        l, t, l, b, r, b, // first triangle
        l, t, r, t, r, b, // second triangle
    ]);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(columns: u32, rows: u32, ratio: f32) -> GridConfig {
        GridConfig::new(columns, rows, ratio).unwrap()
    }

    #[test]
    fn two_by_one_without_gutter() {
        let v = vertex_data(&cfg(2, 1, 0.0));
        #[rustfmt::skip]
        let expected = [
            0.0, 0.0,  0.0, 1.0,  0.5, 1.0,
            0.0, 0.0,  0.5, 0.0,  0.5, 1.0,
            0.5, 0.0,  0.5, 1.0,  1.0, 1.0,
            0.5, 0.0,  1.0, 0.0,  1.0, 1.0,
        ];
        assert_eq!(v, expected);
    }

    #[test]
    fn single_cell_spans_unit_square() {
        let v = vertex_data(&cfg(1, 1, 0.0));
        assert_eq!(v, [0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn length_matches_cell_count() {
        for (c, r, ratio) in [(1, 1, 0.0), (3, 7, 0.2), (100, 56, 0.2), (5, 2, 1.5)] {
            let v = vertex_data(&cfg(c, r, ratio));
            assert_eq!(v.len(), (c * r) as usize * 12, "{c}x{r} ratio {ratio}");
        }
    }

    #[test]
    fn coordinates_stay_in_unit_range() {
        let v = vertex_data(&cfg(37, 21, 0.2));
        for chunk in v.chunks_exact(FLOATS_PER_CELL) {
            // Top-left corner of every cell is strictly inside [0, 1).
            assert!((0.0..1.0).contains(&chunk[0]));
            assert!((0.0..1.0).contains(&chunk[1]));
        }
        // Far edges land on 1.0 up to rounding.
        assert!(v.iter().all(|&x| (0.0..=1.0 + 1e-5).contains(&x)));
        let max = v.iter().copied().fold(0.0f32, f32::max);
        assert!((max - 1.0).abs() < 1e-5);
    }

    #[test]
    fn gutter_separates_neighbours() {
        // Two columns with ratio 1: square, gutter and square each take a third.
        let v = vertex_data(&cfg(2, 1, 1.0));
        let first_right = v[4];
        let second_left = v[12];
        assert!((first_right - 1.0 / 3.0).abs() < 1e-6);
        assert!((second_left - 2.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn cells_are_row_major() {
        let v = vertex_data(&cfg(2, 2, 0.0));
        let top_left = |cell: usize| (v[cell * FLOATS_PER_CELL], v[cell * FLOATS_PER_CELL + 1]);
        assert_eq!(top_left(0), (0.0, 0.0));
        assert_eq!(top_left(1), (0.5, 0.0));
        assert_eq!(top_left(2), (0.0, 0.5));
        assert_eq!(top_left(3), (0.5, 0.5));
    }

    #[test]
    fn deterministic() {
        let c = cfg(13, 9, 0.2);
        assert_eq!(vertex_data(&c), vertex_data(&c));
    }
}
