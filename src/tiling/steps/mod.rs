//! Individual tiling and page transform steps

pub mod grayscale;
pub mod pyramid;
pub mod resize;
pub mod rotate;
pub mod window;
