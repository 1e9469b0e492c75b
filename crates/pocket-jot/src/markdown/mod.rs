//! Restricted markdown for booklet pages
//!
//! - Line classification shared by reflow and rendering
//! - Inline spans (strong, emphasis, code, links)
//! - Print markup block tree and its HTML form

mod classify;
mod inline;
mod markup;

pub use classify::*;
pub use inline::{Inline, escape_markup, parse_inline, plain_text};
pub use markup::*;
