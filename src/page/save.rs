use crate::error::TilerError;
use image::DynamicImage;
use std::path::{Path, PathBuf};

/// Insert `index` between the file stem and extension: `out.png` -> `out3.png`
pub fn indexed_path(path: &Path, index: usize) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{}{}.{}", stem, index, ext.to_string_lossy()),
        None => format!("{}{}", stem, index),
    };
    path.with_file_name(name)
}

/// Save an image; the format follows the extension
pub fn save(image: &DynamicImage, path: &Path) -> Result<(), TilerError> {
    image
        .save(path)
        .map_err(|e| TilerError::SaveError(format!("{}: {}", path.display(), e)))
}

/// Save every image with its index embedded in the file name
pub fn save_all(images: &[DynamicImage], path: &Path) -> Result<Vec<PathBuf>, TilerError> {
    let mut written = Vec::with_capacity(images.len());
    for (index, image) in images.iter().enumerate() {
        let target = indexed_path(path, index);
        save(image, &target)?;
        written.push(target);
    }

    tracing::info!("Saved {} image(s) next to {}", written.len(), path.display());
    Ok(written)
}
