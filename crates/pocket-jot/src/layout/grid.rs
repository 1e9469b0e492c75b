//! Sheet grid geometry
//!
//! This module handles the geometric layout of the page grid on a sheet:
//! cell bounds and the positions of the fold guides.

use crate::constants::{GRID_COLS, GRID_ROWS, SHEET_HEIGHT_MM, SHEET_WIDTH_MM};

use super::{GridPosition, GuideLine, Rect};

// =============================================================================
// Sheet Geometry
// =============================================================================

/// Physical sheet and its page grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SheetGeometry {
    /// Sheet width in mm
    pub width_mm: f32,
    /// Sheet height in mm
    pub height_mm: f32,
    /// Number of columns in the page grid
    pub cols: usize,
    /// Number of rows in the page grid
    pub rows: usize,
}

impl Default for SheetGeometry {
    fn default() -> Self {
        Self::a4_landscape()
    }
}

impl SheetGeometry {
    /// A4 landscape (297 × 210mm) with a 4 × 2 page grid
    pub fn a4_landscape() -> Self {
        Self {
            width_mm: SHEET_WIDTH_MM,
            height_mm: SHEET_HEIGHT_MM,
            cols: GRID_COLS,
            rows: GRID_ROWS,
        }
    }

    /// Width of each cell in mm
    pub fn cell_width(&self) -> f32 {
        self.width_mm / self.cols as f32
    }

    /// Height of each cell in mm
    pub fn cell_height(&self) -> f32 {
        self.height_mm / self.rows as f32
    }

    /// Total number of cells in the grid
    pub fn cell_count(&self) -> usize {
        self.cols * self.rows
    }

    // =========================================================================
    // Cell Calculations
    // =========================================================================

    /// Bounds of the cell at `pos`, top-left origin
    pub fn cell_rect(&self, pos: GridPosition) -> Rect {
        let width = self.cell_width();
        let height = self.cell_height();
        Rect::new(pos.col as f32 * width, pos.row as f32 * height, width, height)
    }

    // =========================================================================
    // Fold Guides
    // =========================================================================

    /// Dashed guides between the cells: one horizontal line across the
    /// middle row boundary, then one vertical line per column boundary
    pub fn fold_guides(&self) -> Vec<GuideLine> {
        let cell_width = self.cell_width();
        let cell_height = self.cell_height();

        let horizontal = (1..self.rows).map(|row| {
            let y = row as f32 * cell_height;
            GuideLine::new(0.0, y, self.width_mm, y)
        });
        let vertical = (1..self.cols).map(|col| {
            let x = col as f32 * cell_width;
            GuideLine::new(x, 0.0, x, self.height_mm)
        });

        horizontal.chain(vertical).collect()
    }
}

// =============================================================================
// Tests
// =============================================================================
