use crate::error::{single, TilerError};
use image::{DynamicImage, GenericImageView};

/// Square window side length and stride
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSpec {
    size: u32,
    step: u32,
}

impl WindowSpec {
    pub fn new(size: u32, step: u32) -> Result<Self, TilerError> {
        if size == 0 {
            return Err(TilerError::InvalidWindow("size must be positive".to_string()));
        }
        if step == 0 {
            return Err(TilerError::InvalidWindow("step must be positive".to_string()));
        }
        Ok(Self { size, step })
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn step(&self) -> u32 {
        self.step
    }

    /// Top-left offsets of every window that fits strictly inside `width` x `height`
    pub fn positions(&self, width: u32, height: u32) -> Positions {
        Positions {
            x_limit: width.saturating_sub(self.size),
            y_limit: height.saturating_sub(self.size),
            step: self.step,
            x: 0,
            y: 0,
        }
    }

    /// Number of windows [`positions`](Self::positions) yields
    pub fn count(&self, width: u32, height: u32) -> usize {
        let per_axis = |limit: u32| limit.div_ceil(self.step) as usize;
        per_axis(width.saturating_sub(self.size)) * per_axis(height.saturating_sub(self.size))
    }
}

/// Lazy iterator over window offsets, x-major
#[derive(Debug, Clone)]
pub struct Positions {
    x_limit: u32,
    y_limit: u32,
    step: u32,
    x: u32,
    y: u32,
}

impl Iterator for Positions {
    type Item = (u32, u32);

    fn next(&mut self) -> Option<Self::Item> {
        if self.x >= self.x_limit || self.y_limit == 0 {
            return None;
        }

        let item = (self.x, self.y);
        match self.y.checked_add(self.step) {
            Some(y) if y < self.y_limit => self.y = y,
            _ => {
                self.y = 0;
                self.x = self.x.checked_add(self.step).unwrap_or(u32::MAX);
            }
        }
        Some(item)
    }
}

/// A square region cut from a page
#[derive(Debug, Clone)]
pub struct Crop {
    pub x: u32,
    pub y: u32,
    pub image: DynamicImage,
}

impl Crop {
    pub fn into_image(self) -> DynamicImage {
        self.image
    }
}

/// Cut windows from every page. Windows that would reach the border are dropped.
pub fn sliding_window_all(images: &[DynamicImage], spec: WindowSpec) -> Vec<Vec<Crop>> {
    images
        .iter()
        .map(|image| {
            let (width, height) = image.dimensions();
            let crops: Vec<Crop> = spec
                .positions(width, height)
                .map(|(x, y)| Crop {
                    x,
                    y,
                    image: image.crop_imm(x, y, spec.size, spec.size),
                })
                .collect();

            tracing::debug!(
                "Cut {} windows of {}px (step {}) from {}x{} page",
                crops.len(),
                spec.size,
                spec.step,
                width,
                height
            );
            crops
        })
        .collect()
}

/// Cut windows from a single page
pub fn sliding_window(image: &DynamicImage, spec: WindowSpec) -> Result<Vec<Crop>, TilerError> {
    single(sliding_window_all(std::slice::from_ref(image), spec))
}
