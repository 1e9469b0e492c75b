//! Booklet export
//!
//! This module orchestrates the export:
//! 1. Render every page to print markup (cover frame on page 1 if requested)
//! 2. Rasterize the pages one at a time on the blocking pool
//! 3. Compose the images onto the sheet
//! 4. Assemble and serialize the PDF

mod io;
mod pdf;

pub use io::{load_document, save_pdf};

use std::sync::Arc;

use crate::compose::compose;
use crate::layout::{PageBox, SheetGeometry};
use crate::markdown::PrintMarkup;
use crate::options::ExportOptions;
use crate::render::{RasterSpec, Rasterizer};
use crate::types::*;

/// Print markup for every page
pub fn page_markups(pages: &[PageContent], options: &ExportOptions) -> Vec<PrintMarkup> {
    pages
        .iter()
        .map(|page| {
            PrintMarkup::from_markdown(&page.content)
                .framed(options.highlight_cover && page.page_number == 1)
        })
        .collect()
}

/// Generate the booklet PDF for `pages`.
///
/// Any failure aborts the whole export; no partial document is returned and
/// the error is left to the caller to report.
/// The rasterizer is attached for the duration of the rasterization and
/// detached before this function returns, on success and failure alike.
pub async fn generate_booklet(
    pages: &[PageContent],
    options: &ExportOptions,
    rasterizer: Arc<dyn Rasterizer>,
) -> Result<Vec<u8>> {
    let bytes = generate(pages, options, rasterizer).await?;
    log::info!("Generated booklet PDF ({} bytes)", bytes.len());
    Ok(bytes)
}

async fn generate(
    pages: &[PageContent],
    options: &ExportOptions,
    rasterizer: Arc<dyn Rasterizer>,
) -> Result<Vec<u8>> {
    options.validate()?;

    let pages = normalize_pages(pages.to_vec());
    let markups = page_markups(&pages, options);
    let spec = RasterSpec {
        page_box: PageBox::default(),
        pixel_ratio: options.pixel_ratio,
        theme: options.theme,
    };

    let images = {
        let surface = RasterSurface::attach(rasterizer)?;
        let mut images = Vec::with_capacity(markups.len());
        for (idx, markup) in markups.into_iter().enumerate() {
            let rasterizer = surface.rasterizer();
            let image =
                tokio::task::spawn_blocking(move || rasterizer.rasterize(&markup, &spec)).await??;
            log::debug!(
                "Rasterized page {} ({}x{})",
                idx + 1,
                image.width(),
                image.height()
            );
            images.push(image);
        }
        images
    };

    let show_fold_lines = options.show_fold_lines;
    let jpeg_quality = options.jpeg_quality;
    tokio::task::spawn_blocking(move || {
        let sheet = compose(images, SheetGeometry::a4_landscape(), show_fold_lines)?;
        let doc = pdf::build_document(&sheet, jpeg_quality)?;
        pdf::document_bytes(doc)
    })
    .await?
}

/// Attached rasterizer, detached when dropped
struct RasterSurface {
    rasterizer: Arc<dyn Rasterizer>,
}

impl RasterSurface {
    fn attach(rasterizer: Arc<dyn Rasterizer>) -> Result<Self> {
        if let Err(e) = rasterizer.attach() {
            rasterizer.detach();
            return Err(e);
        }
        Ok(Self { rasterizer })
    }

    fn rasterizer(&self) -> Arc<dyn Rasterizer> {
        Arc::clone(&self.rasterizer)
    }
}

impl Drop for RasterSurface {
    fn drop(&mut self) {
        self.rasterizer.detach();
    }
}
