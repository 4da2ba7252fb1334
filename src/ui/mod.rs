//! egui overlays drawn on top of the globe viewport

mod labels;
mod overlay;

pub use labels::*;
pub use overlay::*;
