use crate::foundation::core::BitDepth;
use crate::foundation::error::{BakeError, BakeResult};
use crate::render::pixels::PixelBuffer;
use crate::render::surface::{RenderSurface, SurfaceState};

/// Copy a synchronized surface into a CPU [`PixelBuffer`].
///
/// No transfer curve is applied on either path: `Int8` yields the BGRA bytes exactly as
/// rendered, `Float16` yields linear RGBA halves with alpha untouched. The surface must have
/// passed its renderer's completion barrier; anything else is reported as
/// [`BakeError::ReadbackFailed`].
pub fn read_pixels(
    surface: &RenderSurface,
    resolution: u32,
    bit_depth: BitDepth,
) -> BakeResult<PixelBuffer> {
    match surface.state() {
        SurfaceState::Ready => {}
        SurfaceState::Pending => {
            return Err(BakeError::readback(
                "no synchronized frame available: draw submitted but not completed",
            ));
        }
        state => {
            return Err(BakeError::readback(format!(
                "no synchronized frame available: surface is {state}, nothing was rendered"
            )));
        }
    }
    if !surface.is_linear() {
        return Err(BakeError::readback("surface is not linear"));
    }
    if surface.resolution() != resolution {
        return Err(BakeError::readback(format!(
            "surface is {0}x{0}, requested {1}x{1}",
            surface.resolution(),
            resolution
        )));
    }
    if surface.bit_depth() != bit_depth {
        return Err(BakeError::readback(format!(
            "surface holds {} texels, requested {bit_depth}",
            surface.bit_depth()
        )));
    }

    tracing::debug!(
        surface = surface.id().as_u64(),
        resolution,
        %bit_depth,
        "reading back surface"
    );
    PixelBuffer::new(resolution, surface.data().clone())
}

#[cfg(test)]
#[path = "../../tests/unit/render/readback.rs"]
mod tests;
