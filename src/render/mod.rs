pub(crate) mod backend;
pub(crate) mod context;
#[cfg(feature = "gpu")]
pub(crate) mod gpu;
pub(crate) mod raster;
pub(crate) mod shader;
pub(crate) mod shading;
pub(crate) mod software;
pub(crate) mod surface;
