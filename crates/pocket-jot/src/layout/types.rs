//! Layout data types for the booklet sheet
//!
//! Sheet coordinates are millimetres with the origin in the top-left corner
//! of the sheet, matching how the page grid is described. Conversion to PDF
//! space (points, bottom-left origin) happens in the export stage.

/// Position within the sheet grid (row, column)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridPosition {
    /// Row index (0 = top row)
    pub row: usize,
    /// Column index (0 = leftmost column)
    pub col: usize,
}

impl GridPosition {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Where a logical page lands on the printed sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookletPosition {
    /// Logical page number (1..=8)
    pub page: usize,
    /// Row index (0 = top row)
    pub row: usize,
    /// Column index (0..4)
    pub col: usize,
    /// Whether the page is printed upside down (180°)
    pub rotated: bool,
}

impl BookletPosition {
    pub const fn new(page: usize, row: usize, col: usize, rotated: bool) -> Self {
        Self {
            page,
            row,
            col,
            rotated,
        }
    }

    pub fn grid_pos(&self) -> GridPosition {
        GridPosition::new(self.row, self.col)
    }
}

/// A rectangular area in millimetres, top-left origin
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// X position (left edge)
    pub x: f32,
    /// Y position (top edge)
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge x coordinate
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge y coordinate
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// A straight guide line on the sheet, in millimetres
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuideLine {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl GuideLine {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn is_horizontal(&self) -> bool {
        self.y1 == self.y2
    }

    pub fn is_vertical(&self) -> bool {
        self.x1 == self.x2
    }
}
