//! SVG-based page rasterizer
//!
//! Pages are laid out with [`layout_markup`], written out as an SVG document
//! and drawn with resvg. Layout measures text with the same font database
//! resvg draws from, and every text element is pinned to its measured width.

use std::fmt::Write;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use image::{Rgba, RgbaImage};
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg;

use crate::layout::{
    Decoration, FontMetrics, PageLayout, TextRun, font_family, layout_markup, system_fonts,
};
use crate::markdown::{PrintMarkup, escape_markup};
use crate::types::{BookletError, Result, Theme};

use super::{RasterSpec, Rasterizer};

/// Off-screen drawing state kept between attach and detach
struct Surface {
    fontdb: Arc<usvg::fontdb::Database>,
    metrics: FontMetrics,
    /// Scratch pixmap reused while the page size stays the same
    pixmap: Option<Pixmap>,
}

/// Rasterizer drawing pages through resvg
#[derive(Default)]
pub struct SvgRasterizer {
    /// Fonts to draw with; system fonts are loaded on attach when unset
    fonts: Option<Arc<usvg::fontdb::Database>>,
    surface: Mutex<Option<Surface>>,
}

impl SvgRasterizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw with an already loaded font database
    pub fn with_fonts(fonts: Arc<usvg::fontdb::Database>) -> Self {
        Self {
            fonts: Some(fonts),
            surface: Mutex::default(),
        }
    }

    /// Whether a surface is currently attached
    pub fn is_attached(&self) -> bool {
        self.surface().is_some()
    }

    // A panic while rasterizing must not keep the surface from being released
    fn surface(&self) -> MutexGuard<'_, Option<Surface>> {
        self.surface.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Rasterizer for SvgRasterizer {
    fn attach(&self) -> Result<()> {
        let fontdb = self.fonts.clone().unwrap_or_else(system_fonts);
        let metrics = FontMetrics::new(Arc::clone(&fontdb));

        *self.surface() = Some(Surface {
            fontdb,
            metrics,
            pixmap: None,
        });
        Ok(())
    }

    fn rasterize(&self, markup: &PrintMarkup, spec: &RasterSpec) -> Result<RgbaImage> {
        let mut guard = self.surface();
        let surface = guard
            .as_mut()
            .ok_or_else(|| BookletError::Raster("raster surface is not attached".to_string()))?;

        let layout = layout_markup(markup, &spec.page_box, &surface.metrics);
        let svg = page_svg(&layout, spec);

        let mut options = usvg::Options::default();
        options.fontdb = Arc::clone(&surface.fontdb);
        let tree = usvg::Tree::from_str(&svg, &options)
            .map_err(|e| BookletError::Raster(format!("SVG parsing failed: {}", e)))?;

        let (width, height) = spec.pixel_size();
        let reuse = surface
            .pixmap
            .as_ref()
            .is_some_and(|p| p.width() == width && p.height() == height);
        if !reuse {
            surface.pixmap = Some(Pixmap::new(width, height).ok_or_else(|| {
                BookletError::Raster(format!("Failed to create pixmap ({}x{})", width, height))
            })?);
        }
        let pixmap = surface
            .pixmap
            .as_mut()
            .ok_or_else(|| BookletError::Raster("raster surface has no pixmap".to_string()))?;

        pixmap.fill(resvg::tiny_skia::Color::TRANSPARENT);
        let transform = Transform::from_scale(spec.pixel_ratio, spec.pixel_ratio);
        resvg::render(&tree, transform, &mut pixmap.as_mut());

        let mut image = RgbaImage::new(width, height);
        for (dst, src) in image.pixels_mut().zip(pixmap.pixels()) {
            let color = src.demultiply();
            *dst = Rgba([color.red(), color.green(), color.blue(), color.alpha()]);
        }
        Ok(image)
    }

    fn detach(&self) {
        *self.surface() = None;
    }
}

// =============================================================================
// SVG Output
// =============================================================================

/// SVG document for a laid out page, in CSS pixels
pub fn page_svg(layout: &PageLayout, spec: &RasterSpec) -> String {
    let theme = spec.theme;
    let width = spec.page_box.width;
    let height = spec.page_box.height;

    let mut svg = String::with_capacity(4096);
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = width,
        h = height
    );
    let _ = write!(
        svg,
        r#"<rect x="0" y="0" width="{}" height="{}" fill="{}"/>"#,
        width,
        height,
        theme.background()
    );

    for decoration in &layout.decorations {
        write_decoration(&mut svg, decoration, theme);
    }
    for run in &layout.runs {
        write_run(&mut svg, run, theme);
    }

    svg.push_str("</svg>");
    svg
}

fn write_decoration(svg: &mut String, decoration: &Decoration, theme: Theme) {
    let _ = match *decoration {
        Decoration::Rule { x, y, width } => write!(
            svg,
            r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="1" fill="{}"/>"#,
            x,
            y,
            width,
            theme.muted()
        ),
        Decoration::QuoteBar { x, y, height } => write!(
            svg,
            r#"<rect x="{:.2}" y="{:.2}" width="2" height="{:.2}" fill="{}"/>"#,
            x,
            y,
            height,
            theme.muted()
        ),
        Decoration::CodeBackground {
            x,
            y,
            width,
            height,
        } => write!(
            svg,
            r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" rx="2" fill="{}"/>"#,
            x,
            y,
            width,
            height,
            theme.code_background()
        ),
        Decoration::Underline { x, y, width } => write!(
            svg,
            r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="0.6" fill="{}"/>"#,
            x,
            y,
            width,
            theme.link()
        ),
        Decoration::CoverFrame {
            x,
            y,
            width,
            height,
        } => {
            // Double border: two thin strokes inside a 2px band
            let stroke = 2.0 / 3.0;
            for offset in [stroke / 2.0, 2.0 - stroke / 2.0] {
                let _ = write!(
                    svg,
                    r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" rx="2" fill="none" stroke="{}" stroke-width="{:.3}"/>"#,
                    x + offset,
                    y + offset,
                    width - 2.0 * offset,
                    height - 2.0 * offset,
                    theme.foreground(),
                    stroke
                );
            }
            Ok(())
        }
    };
}

fn write_run(svg: &mut String, run: &TextRun, theme: Theme) {
    let style = &run.style;
    let family = font_family(style.monospace);
    let fill = if style.link {
        theme.link()
    } else {
        theme.foreground()
    };

    let _ = write!(
        svg,
        r#"<text x="{:.2}" y="{:.2}" textLength="{:.2}" lengthAdjust="spacingAndGlyphs" font-family="{}" font-size="{}" font-weight="{}" font-style="{}" fill="{}">{}</text>"#,
        run.x,
        run.baseline,
        run.width,
        family,
        style.size,
        if style.bold { "bold" } else { "normal" },
        if style.italic { "italic" } else { "normal" },
        fill,
        escape_markup(&run.text)
    );
}
