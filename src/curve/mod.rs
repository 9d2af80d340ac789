//! Bezier curve evaluation and anti-aliased curve plotting

mod bezier;
mod canvas;

pub use bezier::*;
pub use canvas::*;
