//! Pocket booklet page positions
//!
//! A single sheet is folded in half lengthwise, then twice across, and slit
//! along the centre of the middle fold. The 8 cells of the sheet map to the
//! booklet pages like this (↻ = printed upside down):
//!
//! ```text
//! ┌────┬────┬────┬────┐
//! │ 8↻ │ 1  │ 2  │ 7↻ │
//! ├────┼────┼────┼────┤
//! │ 5  │ 4↻ │ 3↻ │ 6  │
//! └────┴────┴────┴────┘
//! ```

use crate::constants::TOTAL_PAGES;

use super::{BookletPosition, GridPosition};

/// Placement of every logical page, in row-major sheet order
pub const POCKET_MOD_LAYOUT: [BookletPosition; TOTAL_PAGES] = [
    BookletPosition::new(8, 0, 0, true),
    BookletPosition::new(1, 0, 1, false),
    BookletPosition::new(2, 0, 2, false),
    BookletPosition::new(7, 0, 3, true),
    BookletPosition::new(5, 1, 0, false),
    BookletPosition::new(4, 1, 1, true),
    BookletPosition::new(3, 1, 2, true),
    BookletPosition::new(6, 1, 3, false),
];

/// Where logical page `page` (1-based) is printed
pub fn position_for_page(page: usize) -> Option<&'static BookletPosition> {
    POCKET_MOD_LAYOUT.iter().find(|pos| pos.page == page)
}

/// Which page is printed in a grid cell
pub fn position_at(grid_pos: GridPosition) -> Option<&'static BookletPosition> {
    POCKET_MOD_LAYOUT
        .iter()
        .find(|pos| pos.grid_pos() == grid_pos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_page_has_one_cell() {
        let pages: HashSet<usize> = POCKET_MOD_LAYOUT.iter().map(|p| p.page).collect();
        let cells: HashSet<GridPosition> = POCKET_MOD_LAYOUT.iter().map(|p| p.grid_pos()).collect();

        assert_eq!(pages, (1..=TOTAL_PAGES).collect());
        assert_eq!(cells.len(), TOTAL_PAGES);
        assert!(POCKET_MOD_LAYOUT.iter().all(|p| p.row < 2 && p.col < 4));
    }

    #[test]
    fn test_rotated_pages() {
        let mut rotated: Vec<usize> = POCKET_MOD_LAYOUT
            .iter()
            .filter(|p| p.rotated)
            .map(|p| p.page)
            .collect();
        rotated.sort_unstable();
        assert_eq!(rotated, vec![3, 4, 7, 8]);
    }

    #[test]
    fn test_lookups() {
        let cover = position_for_page(1).unwrap();
        assert_eq!(cover.grid_pos(), GridPosition::new(0, 1));
        assert!(!cover.rotated);

        assert_eq!(position_at(GridPosition::new(1, 2)).unwrap().page, 3);
        assert!(position_for_page(0).is_none());
        assert!(position_for_page(9).is_none());
    }
}
