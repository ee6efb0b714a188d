//! Reading page images from PDFs and image files, and writing results

pub mod pdf;
pub mod save;

pub use save::{indexed_path, save, save_all};

use crate::error::TilerError;
use image::DynamicImage;
use lopdf::Document;
use std::fs::File;
use std::io::Read;
use std::path::Path;

const PDF_MAGIC: &[u8] = b"%PDF-";

/// Load the pages of a PDF, or a single image file as a one-page list
pub fn load(path: &Path) -> Result<Vec<DynamicImage>, TilerError> {
    let pages = if is_pdf(path)? {
        let doc = Document::load(path)
            .map_err(|e| TilerError::LoadError(format!("Failed to load PDF: {}", e)))?;
        pdf::extract_pages(&doc)?
    } else {
        let img = image::open(path)
            .map_err(|e| TilerError::LoadError(format!("Failed to load image: {}", e)))?;
        vec![img]
    };

    tracing::info!("Loaded {} page(s) from {}", pages.len(), path.display());
    Ok(pages)
}

/// Load pages from an in-memory PDF or image
pub fn load_bytes(data: &[u8]) -> Result<Vec<DynamicImage>, TilerError> {
    if data.starts_with(PDF_MAGIC) {
        let doc = Document::load_mem(data)
            .map_err(|e| TilerError::LoadError(format!("Failed to load PDF: {}", e)))?;
        return pdf::extract_pages(&doc);
    }

    let img = image::load_from_memory(data)
        .map_err(|e| TilerError::LoadError(format!("Failed to load image: {}", e)))?;
    Ok(vec![img])
}

/// Check if a file is a PDF by its extension or magic bytes
pub fn is_pdf(path: &Path) -> Result<bool, TilerError> {
    if let Some(ext) = path.extension() {
        if ext.to_string_lossy().eq_ignore_ascii_case("pdf") {
            return Ok(true);
        }
    }

    let mut file = File::open(path)
        .map_err(|e| TilerError::LoadError(format!("Failed to open {}: {}", path.display(), e)))?;

    let mut magic = [0u8; 5];
    if file.read_exact(&mut magic).is_ok() {
        return Ok(magic == PDF_MAGIC);
    }

    Ok(false)
}
