pub mod compose;
pub mod constants;
pub mod export;
pub mod layout;
pub mod markdown;
mod marks;
mod options;
pub mod pages;
pub mod reflow;
pub mod render;
mod types;

pub use compose::{ComposedSheet, PlacedPage, compose};
pub use export::{generate_booklet, load_document, page_markups, save_pdf};
pub use layout::{
    ApproximateMetrics, BookletPosition, FontMetrics, GridPosition, LayoutMeasurer,
    POCKET_MOD_LAYOUT, PageBox, SheetGeometry, TextMetrics, system_fonts,
};
pub use markdown::{PrintMarkup, to_print_markup};
pub use options::*;
pub use pages::{SEPARATORS, combine_pages, overflow_sections, parse_into_pages, update_page};
pub use reflow::{HeightMeasurer, ReflowConfig, ReflowReport, Reflower, reflow, reflow_pages};
pub use render::{RasterSpec, Rasterizer, SvgRasterizer, rotate_half_turn};
pub use resvg::usvg::fontdb;
pub use types::*;
