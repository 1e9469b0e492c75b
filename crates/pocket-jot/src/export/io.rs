//! Booklet file I/O

use crate::types::*;
use lopdf::Document;
use std::path::Path;

/// Write generated PDF bytes to `path`
pub async fn save_pdf(bytes: &[u8], path: impl AsRef<Path>) -> Result<()> {
    tokio::fs::write(path.as_ref(), bytes).await?;
    log::debug!("Wrote {} bytes to {}", bytes.len(), path.as_ref().display());
    Ok(())
}

/// Load a PDF document, e.g. to inspect an exported booklet
pub async fn load_document(path: impl AsRef<Path>) -> Result<Document> {
    let path = path.as_ref().to_owned();
    let bytes = tokio::fs::read(&path).await?;
    let doc = tokio::task::spawn_blocking(move || Document::load_mem(&bytes)).await??;
    Ok(doc)
}
