use crate::error::{GridError, Result};

/// Grid dimensions and gutter ratio.
///
/// Immutable once generation starts. Rows are normally derived from the
/// viewport aspect ratio with [`GridConfig::for_viewport`] so that cells come
/// out square on screen.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GridConfig {
    columns: u32,
    rows: u32,
    square_to_gutter_ratio: f32,
}

impl GridConfig {
    /// Creates a validated configuration.
    ///
    /// `columns` and `rows` must be positive; the ratio must be finite and
    /// non-negative (zero means no gutter).
    pub fn new(columns: u32, rows: u32, square_to_gutter_ratio: f32) -> Result<Self> {
        if columns == 0 || rows == 0 {
            return Err(GridError::InvalidConfig(format!(
                "grid must have at least one column and one row, got {columns}x{rows}"
            )));
        }
        if !square_to_gutter_ratio.is_finite() || square_to_gutter_ratio < 0.0 {
            return Err(GridError::InvalidConfig(format!(
                "square to gutter ratio must be finite and non-negative, got {square_to_gutter_ratio}"
            )));
        }
        Ok(Self { columns, rows, square_to_gutter_ratio })
    }

    /// Derives the row count from a viewport size: `floor(height / width * columns)`.
    ///
    /// Very wide viewports would floor to zero rows; the result is clamped to one.
    pub fn for_viewport(
        columns: u32,
        square_to_gutter_ratio: f32,
        width: f32,
        height: f32,
    ) -> Result<Self> {
        if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()) {
            return Err(GridError::InvalidConfig(format!(
                "viewport must have a positive finite size, got {width}x{height}"
            )));
        }
        let rows = (height / width * columns as f32).floor().max(1.0) as u32;
        Self::new(columns, rows, square_to_gutter_ratio)
    }

    #[inline]
    pub fn columns(&self) -> u32 {
        self.columns
    }

    #[inline]
    pub fn rows(&self) -> u32 {
        self.rows
    }

    #[inline]
    pub fn square_to_gutter_ratio(&self) -> f32 {
        self.square_to_gutter_ratio
    }

    /// Total number of cells (`columns * rows`).
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.columns as usize * self.rows as usize
    }
}
