//! CPU-side rendering support: camera math and vertex packing.
//!
//! Nothing here touches a GPU API; the web viewer uploads what these
//! functions produce.

pub mod camera;
pub mod renderer;

pub use camera::*;
pub use renderer::*;
