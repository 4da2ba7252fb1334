//! Globe interaction core: projection, hover picking, rotation state and the
//! session that ties them to a scene controller.

mod hover;
mod projection;
mod rotation;
mod session;

pub use hover::*;
pub use projection::*;
pub use rotation::*;
pub use session::*;
