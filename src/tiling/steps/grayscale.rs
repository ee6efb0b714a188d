use crate::error::{single, TilerError};
use image::DynamicImage;

/// Convert every image to 8-bit luma with alpha
pub fn to_grayscale_all(images: &[DynamicImage]) -> Vec<DynamicImage> {
    images
        .iter()
        .map(|image| DynamicImage::ImageLumaA8(image.to_luma_alpha8()))
        .collect()
}

/// Convert a single image to 8-bit luma with alpha
pub fn to_grayscale(image: &DynamicImage) -> Result<DynamicImage, TilerError> {
    single(to_grayscale_all(std::slice::from_ref(image)))
}
