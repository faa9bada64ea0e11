use std::fmt;

use crate::foundation::core::BitDepth;
use crate::foundation::error::{BakeError, BakeResult};
use crate::render::pixels::PixelData;

/// Identity of one acquired surface; unique per pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SurfaceId(pub(crate) u64);

impl SurfaceId {
    /// Raw value.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// Texel format of a transient surface. Both formats store linear values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SurfaceFormat {
    /// 8-bit unorm, B,G,R,A.
    Bgra8Linear,
    /// 16-bit float, R,G,B,A.
    Rgba16FloatLinear,
}

impl SurfaceFormat {
    /// Format matching a bake bit depth.
    pub fn for_depth(depth: BitDepth) -> Self {
        match depth {
            BitDepth::Int8 => Self::Bgra8Linear,
            BitDepth::Float16 => Self::Rgba16FloatLinear,
        }
    }

    /// Bit depth stored by this format.
    pub fn bit_depth(self) -> BitDepth {
        match self {
            Self::Bgra8Linear => BitDepth::Int8,
            Self::Rgba16FloatLinear => BitDepth::Float16,
        }
    }
}

/// Size and format of a square transient surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SurfaceDesc {
    /// Edge length in pixels.
    pub resolution: u32,
    /// Texel format.
    pub format: SurfaceFormat,
}

impl SurfaceDesc {
    /// Descriptor for a `resolution²` surface at `depth`.
    pub fn new(resolution: u32, depth: BitDepth) -> Self {
        Self {
            resolution,
            format: SurfaceFormat::for_depth(depth),
        }
    }

    pub(crate) fn pixel_count(self) -> Option<usize> {
        let side = self.resolution as usize;
        side.checked_mul(side)
    }

    pub(crate) fn byte_len(self) -> Option<usize> {
        self.pixel_count()?
            .checked_mul(self.format.bit_depth().bytes_per_pixel())
    }
}

/// Synchronization state of a surface.
///
/// Only a `Ready` surface may be read back: it has been drawn into and the renderer's
/// completion barrier has been passed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SurfaceState {
    /// Fresh from the pool, contents undefined.
    Allocated,
    /// Cleared to a background color, nothing drawn yet.
    Cleared,
    /// Draw submitted, completion not yet confirmed.
    Pending,
    /// Draw complete and synchronized.
    Ready,
}

impl fmt::Display for SurfaceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Allocated => "allocated",
            Self::Cleared => "cleared",
            Self::Pending => "pending",
            Self::Ready => "ready",
        })
    }
}

/// Offscreen render target owned by one in-flight bake.
#[derive(Debug)]
pub struct RenderSurface {
    id: SurfaceId,
    desc: SurfaceDesc,
    data: PixelData,
    state: SurfaceState,
}

impl RenderSurface {
    pub(crate) fn new(id: SurfaceId, desc: SurfaceDesc, data: PixelData) -> Self {
        Self {
            id,
            desc,
            data,
            state: SurfaceState::Allocated,
        }
    }

    /// Empty stand-in left behind once a lease hands its surface back to the pool.
    pub(crate) fn detached() -> Self {
        Self {
            id: SurfaceId(u64::MAX),
            desc: SurfaceDesc::new(0, BitDepth::Int8),
            data: PixelData::Bgra8(Vec::new()),
            state: SurfaceState::Allocated,
        }
    }

    /// Surface identity.
    pub fn id(&self) -> SurfaceId {
        self.id
    }

    /// Size and format.
    pub fn desc(&self) -> SurfaceDesc {
        self.desc
    }

    /// Edge length in pixels.
    pub fn resolution(&self) -> u32 {
        self.desc.resolution
    }

    /// Precision of the texels.
    pub fn bit_depth(&self) -> BitDepth {
        self.desc.format.bit_depth()
    }

    /// Always `true`: surfaces store values as rendered, never display-gamma encoded.
    pub fn is_linear(&self) -> bool {
        true
    }

    /// Current synchronization state.
    pub fn state(&self) -> SurfaceState {
        self.state
    }

    /// Borrow the texels.
    pub fn data(&self) -> &PixelData {
        &self.data
    }

    /// Mutable texels for renderers drawing synchronously.
    pub fn data_mut(&mut self) -> &mut PixelData {
        &mut self.data
    }

    /// Swap in a complete texel set produced elsewhere; layout must match the surface.
    pub fn replace_data(&mut self, data: PixelData) -> BakeResult<()> {
        if data.bit_depth() != self.bit_depth() || data.sample_len() != self.data.sample_len() {
            return Err(BakeError::render(format!(
                "texel data ({}, {} samples) does not match surface ({}, {} samples)",
                data.bit_depth(),
                data.sample_len(),
                self.bit_depth(),
                self.data.sample_len()
            )));
        }
        self.data = data;
        Ok(())
    }

    /// Fill with a linear background color.
    pub fn clear(&mut self, rgba: [f32; 4]) {
        self.data.fill_linear(rgba);
        self.state = SurfaceState::Cleared;
    }

    pub(crate) fn begin_frame(&mut self) {
        self.state = SurfaceState::Pending;
    }

    pub(crate) fn end_frame(&mut self) {
        self.state = SurfaceState::Ready;
    }

    pub(crate) fn into_data(self) -> PixelData {
        self.data
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
