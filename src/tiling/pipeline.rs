use crate::error::TilerError;
use image::DynamicImage;
use serde::Serialize;
use std::time::Instant;

use super::steps;
use super::steps::pyramid::PyramidSpec;
use super::steps::resize::Resampling;
use super::steps::window::WindowSpec;

/// A single pipeline stage
#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    /// Rotate pages clockwise by degrees
    Rotate(f32),
    /// Convert to luma + alpha
    Grayscale,
    /// Cut fixed-size windows from every page
    Window(WindowSpec),
    /// Cut windows at several sizes and resize them to one target
    Pyramid(PyramidSpec),
    /// Resize every image to a square
    Resize { size: u32, resampling: Resampling },
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Rotate(_) => "rotate",
            Self::Grayscale => "grayscale",
            Self::Window(_) => "window",
            Self::Pyramid(_) => "pyramid",
            Self::Resize { .. } => "resize",
        }
    }

    /// Whether the stage turns pages into crops
    pub fn is_tiling(&self) -> bool {
        matches!(self, Self::Window(_) | Self::Pyramid(_))
    }
}

/// Timing information for a single stage
#[derive(Debug, Clone, Serialize)]
pub struct StepTiming {
    pub name: String,
    pub time_ms: u64,
    /// Number of images after the stage ran
    pub images: usize,
}

/// Result of running a pipeline including timing stats
#[derive(Debug, Clone, Serialize)]
pub struct PipelineResult {
    /// Output images (not serialized)
    #[serde(skip)]
    pub images: Vec<DynamicImage>,
    /// Number of input pages
    pub pages: usize,
    /// Number of output images
    pub image_count: usize,
    /// Total processing time in milliseconds
    pub total_time_ms: u64,
    /// Individual stage timings
    pub steps: Vec<StepTiming>,
}

/// Ordered stages applied to a batch of pages.
///
/// Tiling stages flatten the crops of all pages into one batch, page by page.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    pub fn new(stages: Vec<Stage>) -> Self {
        Self { stages }
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Run every stage over `pages`
    pub fn process(&self, pages: Vec<DynamicImage>) -> Result<PipelineResult, TilerError> {
        let start = Instant::now();
        let page_count = pages.len();
        let mut timings = Vec::with_capacity(self.stages.len());

        let mut images = pages;
        for stage in &self.stages {
            images = self.run_step(stage, images, &mut timings)?;
        }

        tracing::info!(
            "Pipeline produced {} images from {} pages in {}ms",
            images.len(),
            page_count,
            start.elapsed().as_millis()
        );

        Ok(PipelineResult {
            pages: page_count,
            image_count: images.len(),
            images,
            total_time_ms: start.elapsed().as_millis() as u64,
            steps: timings,
        })
    }

    fn run_step(
        &self,
        stage: &Stage,
        images: Vec<DynamicImage>,
        timings: &mut Vec<StepTiming>,
    ) -> Result<Vec<DynamicImage>, TilerError> {
        let step_start = Instant::now();

        let result = match stage {
            Stage::Rotate(degrees) => steps::rotate::rotate_clockwise_all(&images, *degrees),
            Stage::Grayscale => steps::grayscale::to_grayscale_all(&images),
            Stage::Window(spec) => steps::window::sliding_window_all(&images, *spec)
                .into_iter()
                .flatten()
                .map(|crop| crop.into_image())
                .collect(),
            Stage::Pyramid(spec) => steps::pyramid::pyramids_all(&images, spec)?
                .into_iter()
                .flatten()
                .collect(),
            Stage::Resize { size, resampling } => {
                steps::resize::resize_all(&images, *size, *resampling)?
            }
        };

        tracing::debug!(
            "Stage {}: {} -> {} images",
            stage.name(),
            images.len(),
            result.len()
        );
        timings.push(StepTiming {
            name: stage.name().to_string(),
            time_ms: step_start.elapsed().as_millis() as u64,
            images: result.len(),
        });
        Ok(result)
    }
}
