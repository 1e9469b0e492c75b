//! Layout calculation modules
//!
//! - Sheet grid (cell bounds, fold guides)
//! - Pocket booklet page positions
//! - Page box layout shared by measurement and rasterization
//! - Text advance metrics

mod grid;
mod metrics;
mod page;
mod positions;
mod types;

pub use grid::*;
pub use metrics::*;
pub use page::*;
pub use positions::*;
pub use types::*;
