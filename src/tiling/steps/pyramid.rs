use super::resize::Resampling;
use super::window::WindowSpec;
use crate::error::{single, TilerError};
use image::{DynamicImage, GenericImageView};

/// A level's step is its window size divided by this
pub const DEFAULT_STEP_DIVISOR: u32 = 10;

/// Window sizes normalized to one target resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PyramidSpec {
    levels: Vec<WindowSpec>,
    target_size: u32,
    resampling: Resampling,
}

impl PyramidSpec {
    /// Build a pyramid using [`DEFAULT_STEP_DIVISOR`]
    pub fn new(
        input_sizes: &[u32],
        target_size: u32,
        resampling: Resampling,
    ) -> Result<Self, TilerError> {
        Self::with_step_divisor(input_sizes, target_size, resampling, DEFAULT_STEP_DIVISOR)
    }

    /// Build a pyramid whose level steps are `size / divisor`.
    ///
    /// Every level is checked up front so a bad level fails before any image work.
    pub fn with_step_divisor(
        input_sizes: &[u32],
        target_size: u32,
        resampling: Resampling,
        divisor: u32,
    ) -> Result<Self, TilerError> {
        if target_size == 0 {
            return Err(TilerError::InvalidTargetSize(target_size));
        }
        if divisor == 0 {
            return Err(TilerError::InvalidWindow(
                "step divisor must be positive".to_string(),
            ));
        }

        let levels = input_sizes
            .iter()
            .map(|&size| {
                let step = size / divisor;
                if step == 0 {
                    return Err(TilerError::DegeneratePyramidLevel { size, divisor });
                }
                WindowSpec::new(size, step)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            levels,
            target_size,
            resampling,
        })
    }

    pub fn levels(&self) -> &[WindowSpec] {
        &self.levels
    }

    pub fn target_size(&self) -> u32 {
        self.target_size
    }

    pub fn resampling(&self) -> Resampling {
        self.resampling
    }
}

/// Build the pyramid for every page. Levels are appended in the order given.
///
/// Each window is resized as soon as it is cut, so only one full-size crop
/// is alive at a time.
pub fn pyramids_all(
    images: &[DynamicImage],
    spec: &PyramidSpec,
) -> Result<Vec<Vec<DynamicImage>>, TilerError> {
    let filter = spec.resampling.filter();
    let target = spec.target_size;

    Ok(images
        .iter()
        .map(|image| {
            let (width, height) = image.dimensions();
            let expected = spec.levels.iter().map(|l| l.count(width, height)).sum();
            let mut sliced = Vec::with_capacity(expected);

            for level in &spec.levels {
                let before = sliced.len();
                sliced.extend(level.positions(width, height).map(|(x, y)| {
                    image
                        .crop_imm(x, y, level.size(), level.size())
                        .resize_exact(target, target, filter)
                }));
                tracing::debug!(
                    "Pyramid level {}px (step {}): {} crops",
                    level.size(),
                    level.step(),
                    sliced.len() - before
                );
            }
            sliced
        })
        .collect())
}

/// Build the pyramid for a single page
pub fn pyramids(image: &DynamicImage, spec: &PyramidSpec) -> Result<Vec<DynamicImage>, TilerError> {
    single(pyramids_all(std::slice::from_ref(image), spec)?)
}
