//! Fold guide rendering
//!
//! Generates PDF content stream operations for the dashed guides that show
//! where the sheet is folded.

use crate::constants::{FOLD_LINE_DASH_MM, FOLD_LINE_GRAY, FOLD_LINE_WIDTH_MM, mm_to_pt};
use crate::layout::GuideLine;

/// Generate fold guides as PDF content stream operations.
///
/// Guide coordinates are in millimetres with a top-left origin; they are
/// flipped into PDF space using `sheet_height_mm`.
pub fn generate_fold_lines(guides: &[GuideLine], sheet_height_mm: f32) -> String {
    if guides.is_empty() {
        return String::new();
    }

    let mut ops = String::new();

    ops.push_str("q\n");
    ops.push_str(&format!("{g:.4} {g:.4} {g:.4} RG\n", g = FOLD_LINE_GRAY));
    ops.push_str(&format!("{:.4} w\n", mm_to_pt(FOLD_LINE_WIDTH_MM)));
    let dash = mm_to_pt(FOLD_LINE_DASH_MM);
    ops.push_str(&format!("[{:.4} {:.4}] 0 d\n", dash, dash));

    for guide in guides {
        let x1 = mm_to_pt(guide.x1);
        let y1 = mm_to_pt(sheet_height_mm - guide.y1);
        let x2 = mm_to_pt(guide.x2);
        let y2 = mm_to_pt(sheet_height_mm - guide.y2);
        ops.push_str(&format!("{:.4} {:.4} m {:.4} {:.4} l S\n", x1, y1, x2, y2));
    }

    ops.push_str("Q\n");
    ops
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::SheetGeometry;

    #[test]
    fn test_fold_lines_are_dashed_grey() {
        let sheet = SheetGeometry::a4_landscape();
        let ops = generate_fold_lines(&sheet.fold_guides(), sheet.height_mm);

        assert!(ops.starts_with("q\n"));
        assert!(ops.ends_with("Q\n"));
        assert!(ops.contains("0.7843 0.7843 0.7843 RG"));
        assert!(ops.contains("5.6693 5.6693] 0 d"));
        assert_eq!(ops.matches(" l S").count(), 4);
    }

    #[test]
    fn test_horizontal_fold_is_mid_sheet() {
        let sheet = SheetGeometry::a4_landscape();
        let ops = generate_fold_lines(&sheet.fold_guides()[..1], sheet.height_mm);

        // 105mm from the top of a 210mm sheet is 105mm from the bottom
        assert!(ops.contains("0.0000 297.6378 m 841.8898 297.6378 l S"));
    }

    #[test]
    fn test_no_guides_no_ops() {
        assert!(generate_fold_lines(&[], 210.0).is_empty());
    }
}
