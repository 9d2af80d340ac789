//! Software rasterizer
//!
//! - Model/view/projection matrix builders
//! - Write-once geometry buffers addressed by handles
//! - Triangle fill with depth testing and barycentric color interpolation

mod error;
mod geometry;
mod math;
mod render;
mod transform;
mod types;

pub use error::*;
pub use geometry::*;
pub use math::*;
pub use render::*;
pub use transform::*;
pub use types::*;

/// Default framebuffer dimensions
pub const WIDTH: usize = 700;
pub const HEIGHT: usize = 700;
