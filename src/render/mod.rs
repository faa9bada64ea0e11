pub(crate) mod cpu;
pub(crate) mod pixels;
pub(crate) mod pool;
pub(crate) mod readback;
pub(crate) mod renderer;
pub(crate) mod surface;
