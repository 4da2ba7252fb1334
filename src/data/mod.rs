//! Location data: built-in points of interest and file loading

mod loader;
mod location;

pub use loader::*;
pub use location::*;
