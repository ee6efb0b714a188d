use crate::error::{single, TilerError};
use image::{DynamicImage, Rgb, RgbImage};
use imageproc::geometric_transformations::{warp_into, Interpolation, Projection};

/// Rotate every image clockwise by `degrees`, growing the canvas to fit.
///
/// Right angles are exact and keep the pixel type. Other angles are
/// interpolated onto a black RGB canvas.
pub fn rotate_clockwise_all(images: &[DynamicImage], degrees: f32) -> Vec<DynamicImage> {
    let normalized = degrees.rem_euclid(360.0);
    images
        .iter()
        .map(|image| match normalized {
            d if d == 0.0 => image.clone(),
            d if d == 90.0 => image.rotate90(),
            d if d == 180.0 => image.rotate180(),
            d if d == 270.0 => image.rotate270(),
            d => rotate_expanded(&image.to_rgb8(), d.to_radians()),
        })
        .collect()
}

/// Rotate a single image clockwise by `degrees`
pub fn rotate_clockwise(image: &DynamicImage, degrees: f32) -> Result<DynamicImage, TilerError> {
    single(rotate_clockwise_all(std::slice::from_ref(image), degrees))
}

fn rotate_expanded(image: &RgbImage, theta: f32) -> DynamicImage {
    let (width, height) = (image.width() as f32, image.height() as f32);
    let (sin, cos) = (theta.sin().abs(), theta.cos().abs());
    let new_width = (width * cos + height * sin).ceil().max(1.0);
    let new_height = (width * sin + height * cos).ceil().max(1.0);

    // Move the source centre to the origin, rotate, then onto the new centre
    let projection = Projection::translate(new_width / 2.0, new_height / 2.0)
        * Projection::rotate(theta)
        * Projection::translate(-width / 2.0, -height / 2.0);

    let mut out = RgbImage::new(new_width as u32, new_height as u32);
    warp_into(
        image,
        &projection,
        Interpolation::Bilinear,
        Rgb([0, 0, 0]),
        &mut out,
    );
    DynamicImage::ImageRgb8(out)
}
