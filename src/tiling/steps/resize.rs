use crate::error::{single, TilerError};
use image::{imageops::FilterType, DynamicImage};
use std::fmt;
use std::str::FromStr;

/// Resampling method used when resizing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Resampling {
    #[default]
    Nearest,
    Bilinear,
    Bicubic,
    Lanczos,
}

impl Resampling {
    pub const ALL: [Resampling; 4] = [
        Self::Nearest,
        Self::Bilinear,
        Self::Bicubic,
        Self::Lanczos,
    ];

    /// Get the method name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nearest => "nearest",
            Self::Bilinear => "bilinear",
            Self::Bicubic => "bicubic",
            Self::Lanczos => "lanczos",
        }
    }

    /// The `image` filter implementing this method
    pub fn filter(&self) -> FilterType {
        match self {
            Self::Nearest => FilterType::Nearest,
            Self::Bilinear => FilterType::Triangle,
            Self::Bicubic => FilterType::CatmullRom,
            Self::Lanczos => FilterType::Lanczos3,
        }
    }
}

impl FromStr for Resampling {
    type Err = TilerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "nearest" => Ok(Self::Nearest),
            "bilinear" => Ok(Self::Bilinear),
            "bicubic" => Ok(Self::Bicubic),
            "lanczos" => Ok(Self::Lanczos),
            _ => Err(TilerError::InvalidResampling(s.to_string())),
        }
    }
}

impl fmt::Display for Resampling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resize every image to `size` x `size`, ignoring aspect ratio
pub fn resize_all(
    images: &[DynamicImage],
    size: u32,
    resampling: Resampling,
) -> Result<Vec<DynamicImage>, TilerError> {
    if size == 0 {
        return Err(TilerError::InvalidTargetSize(size));
    }

    let filter = resampling.filter();
    Ok(images
        .iter()
        .map(|image| image.resize_exact(size, size, filter))
        .collect())
}

/// Resize a single image to `size` x `size`
pub fn resize(
    image: &DynamicImage,
    size: u32,
    resampling: Resampling,
) -> Result<DynamicImage, TilerError> {
    single(resize_all(std::slice::from_ref(image), size, resampling)?)
}
