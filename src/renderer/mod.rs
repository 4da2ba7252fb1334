//! 3D rendering module using wgpu
//!
//! Globe mesh, point markers, camera and the egui_wgpu callback that draws them.

mod camera;
mod earth;
mod markers;
mod textures;
mod view;
mod wgpu_callback;

pub use camera::*;
pub use markers::*;
pub use textures::*;
pub use view::*;
pub use wgpu_callback::*;
