//! Booklet composition
//!
//! Places the 8 rasterized pages into their sheet cells, turning the pages
//! printed upside down, and collects the fold guides to draw.

use image::RgbaImage;

use crate::constants::TOTAL_PAGES;
use crate::layout::{BookletPosition, GuideLine, POCKET_MOD_LAYOUT, Rect, SheetGeometry};
use crate::render::rotate_half_turn;
use crate::types::{BookletError, Result};

/// A page image placed in its sheet cell
#[derive(Debug, Clone)]
pub struct PlacedPage {
    pub position: BookletPosition,
    /// Cell bounds in mm, top-left origin
    pub rect_mm: Rect,
    /// Page image, already rotated when the position requires it
    pub image: RgbaImage,
}

/// Everything needed to draw the printed sheet
#[derive(Debug, Clone)]
pub struct ComposedSheet {
    pub geometry: SheetGeometry,
    /// Placed pages in sheet order (row-major)
    pub pages: Vec<PlacedPage>,
    pub fold_guides: Vec<GuideLine>,
}

/// Compose page images, given in logical order 1..=8, onto the sheet
pub fn compose(
    images: Vec<RgbaImage>,
    geometry: SheetGeometry,
    show_fold_lines: bool,
) -> Result<ComposedSheet> {
    if images.len() != TOTAL_PAGES {
        return Err(BookletError::PageCount {
            expected: TOTAL_PAGES,
            found: images.len(),
        });
    }

    let mut images: Vec<Option<RgbaImage>> = images.into_iter().map(Some).collect();
    let mut pages = Vec::with_capacity(TOTAL_PAGES);

    for position in POCKET_MOD_LAYOUT {
        let image = images
            .get_mut(position.page - 1)
            .and_then(Option::take)
            .ok_or(BookletError::PageCount {
                expected: TOTAL_PAGES,
                found: position.page - 1,
            })?;
        let image = if position.rotated {
            rotate_half_turn(&image)
        } else {
            image
        };

        pages.push(PlacedPage {
            position,
            rect_mm: geometry.cell_rect(position.grid_pos()),
            image,
        });
    }

    let fold_guides = if show_fold_lines {
        geometry.fold_guides()
    } else {
        Vec::new()
    };

    Ok(ComposedSheet {
        geometry,
        pages,
        fold_guides,
    })
}
