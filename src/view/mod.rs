// VIEW: rendering and graphics
pub mod compositor;
pub mod gpu_init;
pub mod raster;

pub use compositor::{load_background, Compositor, TextureLedger};
pub use gpu_init::GpuContext;
pub use raster::Surface;
