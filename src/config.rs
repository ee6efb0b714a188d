use crate::Args;
use page_tiler::tiling::{PyramidSpec, Resampling, Stage, WindowSpec};
use page_tiler::TilerError;
use std::path::PathBuf;

/// Validated run configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub input: PathBuf,
    pub output: PathBuf,
    pub stages: Vec<Stage>,
    pub report: bool,
}

impl TryFrom<Args> for Config {
    type Error = TilerError;

    fn try_from(args: Args) -> Result<Self, Self::Error> {
        let resampling: Resampling = args.resampling.parse()?;
        let mut stages = Vec::new();

        if let Some(degrees) = args.rotate {
            stages.push(Stage::Rotate(degrees));
        }
        if args.grayscale {
            stages.push(Stage::Grayscale);
        }

        if !args.pyramid_sizes.is_empty() {
            let target = args
                .target_size
                .ok_or(TilerError::InvalidTargetSize(0))?;
            stages.push(Stage::Pyramid(PyramidSpec::with_step_divisor(
                &args.pyramid_sizes,
                target,
                resampling,
                args.step_divisor,
            )?));
        } else {
            if let Some(size) = args.window_size {
                let step = match args.step {
                    Some(step) => step,
                    None => size.checked_div(args.step_divisor).ok_or_else(|| {
                        TilerError::InvalidWindow("step divisor must be positive".to_string())
                    })?,
                };
                stages.push(Stage::Window(WindowSpec::new(size, step)?));
            }
            if let Some(size) = args.target_size {
                if size == 0 {
                    return Err(TilerError::InvalidTargetSize(size));
                }
                stages.push(Stage::Resize { size, resampling });
            }
        }

        Ok(Self {
            input: args.input,
            output: args.output,
            stages,
            report: args.report,
        })
    }
}
