//! Cut scanned document pages into uniform square crops.
//!
//! Pages come from PDFs or image files ([`page::load`]). They can be rotated
//! and converted to grayscale, then tiled with a sliding window or an image
//! pyramid whose levels are all resized to one target size. Every operation
//! has a batch form (`*_all`) and a single-image form.
//!
//! ```no_run
//! use page_tiler::page;
//! use page_tiler::tiling::{pyramids_all, PyramidSpec, Resampling};
//! use std::path::Path;
//!
//! let pages = page::load(Path::new("scan.pdf"))?;
//! let spec = PyramidSpec::new(&[200, 300], 64, Resampling::Lanczos)?;
//! for (i, crops) in pyramids_all(&pages, &spec)?.iter().enumerate() {
//!     page::save_all(crops, Path::new(&format!("out/page{}_.png", i)))?;
//! }
//! # Ok::<(), page_tiler::TilerError>(())
//! ```

pub mod error;
pub mod page;
pub mod tiling;

pub use error::TilerError;
