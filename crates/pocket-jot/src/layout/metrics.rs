//! Text advance metrics
//!
//! Layout measures text with the horizontal glyph advances of the font faces
//! the rasterizer draws with, read through `fontdb` and `ttf-parser`. When a
//! style has no installed face (or a face lacks a glyph) a per-face character
//! width ratio stands in for the missing advances.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use resvg::usvg::fontdb::{self, Database, Family, Query, Stretch, Style, Weight};

use super::TextStyle;
use crate::constants::{BOLD_CHAR_WIDTH_RATIO, MONO_CHAR_WIDTH_RATIO, SANS_CHAR_WIDTH_RATIO};

/// Preferred proportional faces, most preferred first
pub const SANS_FAMILIES: [&str; 4] = ["DejaVu Sans", "Liberation Sans", "Arial", "Helvetica"];

/// Preferred monospace faces, most preferred first
pub const MONO_FAMILIES: [&str; 3] = ["DejaVu Sans Mono", "Liberation Mono", "Courier New"];

/// Source of text advance widths
pub trait TextMetrics: Send + Sync {
    /// Advance width of `text` set in `style`, in CSS pixels
    fn text_width(&self, text: &str, style: &TextStyle) -> f32;
}

/// CSS `font-family` value matching the faces [`FontMetrics`] measures with
pub fn font_family(monospace: bool) -> String {
    let (names, generic) = if monospace {
        (&MONO_FAMILIES[..], "monospace")
    } else {
        (&SANS_FAMILIES[..], "sans-serif")
    };
    let mut family = names.join(", ");
    family.push_str(", ");
    family.push_str(generic);
    family
}

/// Load the installed system fonts
pub fn system_fonts() -> Arc<Database> {
    let mut fontdb = Database::new();
    fontdb.load_system_fonts();
    if fontdb.is_empty() {
        log::warn!("No system fonts found, page text will not be drawn");
    } else {
        log::debug!("Loaded {} font faces", fontdb.len());
    }
    Arc::new(fontdb)
}

/// Fixed advance per character for `style`
pub fn approximate_char_width(style: &TextStyle) -> f32 {
    let ratio = if style.monospace {
        MONO_CHAR_WIDTH_RATIO
    } else if style.bold {
        BOLD_CHAR_WIDTH_RATIO
    } else {
        SANS_CHAR_WIDTH_RATIO
    };
    style.size * ratio
}

/// Font-independent metrics: every character has the same advance
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproximateMetrics;

impl TextMetrics for ApproximateMetrics {
    fn text_width(&self, text: &str, style: &TextStyle) -> f32 {
        text.chars().count() as f32 * approximate_char_width(style)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct FaceKey {
    monospace: bool,
    bold: bool,
    italic: bool,
}

impl FaceKey {
    fn of(style: &TextStyle) -> Self {
        Self {
            monospace: style.monospace,
            bold: style.bold,
            italic: style.italic,
        }
    }

    fn all() -> impl Iterator<Item = Self> {
        (0u8..8).map(|bits| Self {
            monospace: bits & 1 != 0,
            bold: bits & 2 != 0,
            italic: bits & 4 != 0,
        })
    }
}

/// Metrics read from installed font faces
pub struct FontMetrics {
    fontdb: Arc<Database>,
    faces: HashMap<FaceKey, fontdb::ID>,
    /// Advances in em, `None` when the face has no glyph for the character
    advances: Mutex<HashMap<(FaceKey, char), Option<f32>>>,
}

impl FontMetrics {
    pub fn new(fontdb: Arc<Database>) -> Self {
        let faces: HashMap<_, _> = FaceKey::all()
            .filter_map(|key| query_face(&fontdb, key).map(|id| (key, id)))
            .collect();
        log::debug!("Resolved {} of 8 text faces", faces.len());

        Self {
            fontdb,
            faces,
            advances: Mutex::new(HashMap::new()),
        }
    }

    /// Whether at least one style resolved to an installed face
    pub fn has_faces(&self) -> bool {
        !self.faces.is_empty()
    }

    fn advance_em(&self, key: FaceKey, ch: char) -> Option<f32> {
        let id = *self.faces.get(&key)?;
        let mut advances = self.advances.lock().unwrap_or_else(PoisonError::into_inner);
        *advances
            .entry((key, ch))
            .or_insert_with(|| glyph_advance(&self.fontdb, id, ch))
    }
}

impl TextMetrics for FontMetrics {
    fn text_width(&self, text: &str, style: &TextStyle) -> f32 {
        let key = FaceKey::of(style);
        let fallback = approximate_char_width(style);
        text.chars()
            .map(|ch| {
                self.advance_em(key, ch)
                    .map_or(fallback, |em| em * style.size)
            })
            .sum()
    }
}

fn query_face(fontdb: &Database, key: FaceKey) -> Option<fontdb::ID> {
    let (names, generic) = if key.monospace {
        (&MONO_FAMILIES[..], Family::Monospace)
    } else {
        (&SANS_FAMILIES[..], Family::SansSerif)
    };
    let families: Vec<Family<'_>> = names
        .iter()
        .map(|&name| Family::Name(name))
        .chain([generic])
        .collect();

    fontdb.query(&Query {
        families: &families,
        weight: if key.bold {
            Weight::BOLD
        } else {
            Weight::NORMAL
        },
        stretch: Stretch::Normal,
        style: if key.italic {
            Style::Italic
        } else {
            Style::Normal
        },
    })
}

fn glyph_advance(fontdb: &Database, id: fontdb::ID, ch: char) -> Option<f32> {
    fontdb
        .with_face_data(id, |data, index| {
            let face = ttf_parser::Face::parse(data, index).ok()?;
            let glyph = face.glyph_index(ch)?;
            let advance = face.glyph_hor_advance(glyph)?;
            Some(f32::from(advance) / f32::from(face.units_per_em()))
        })
        .flatten()
}
