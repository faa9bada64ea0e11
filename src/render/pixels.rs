use half::f16;

use crate::foundation::core::BitDepth;
use crate::foundation::error::{BakeError, BakeResult};
use crate::foundation::math::quantize_unorm8;

/// Raw samples in one of the two supported layouts.
#[derive(Clone, Debug, PartialEq)]
pub enum PixelData {
    /// 4×u8 per pixel in B,G,R,A order.
    Bgra8(Vec<u8>),
    /// 4×f16 per pixel in R,G,B,A order, linear light, unclamped.
    Rgba16F(Vec<f16>),
}

impl PixelData {
    /// Layout precision.
    pub fn bit_depth(&self) -> BitDepth {
        match self {
            Self::Bgra8(_) => BitDepth::Int8,
            Self::Rgba16F(_) => BitDepth::Float16,
        }
    }

    /// Number of pixels (samples / 4).
    pub fn pixel_count(&self) -> usize {
        match self {
            Self::Bgra8(v) => v.len() / 4,
            Self::Rgba16F(v) => v.len() / 4,
        }
    }

    /// Number of scalar samples.
    pub fn sample_len(&self) -> usize {
        match self {
            Self::Bgra8(v) => v.len(),
            Self::Rgba16F(v) => v.len(),
        }
    }

    /// Fill every pixel with a linear RGBA color.
    pub fn fill_linear(&mut self, rgba: [f32; 4]) {
        match self {
            Self::Bgra8(v) => {
                let px = [
                    quantize_unorm8(rgba[2]),
                    quantize_unorm8(rgba[1]),
                    quantize_unorm8(rgba[0]),
                    quantize_unorm8(rgba[3]),
                ];
                for chunk in v.chunks_exact_mut(4) {
                    chunk.copy_from_slice(&px);
                }
            }
            Self::Rgba16F(v) => {
                let px = rgba.map(f16::from_f32);
                for chunk in v.chunks_exact_mut(4) {
                    chunk.copy_from_slice(&px);
                }
            }
        }
    }
}

/// CPU-side copy of a baked square surface.
///
/// Always holds exactly `resolution * resolution` pixels, row-major, origin top-left.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelBuffer {
    resolution: u32,
    data: PixelData,
}

impl PixelBuffer {
    /// Wrap `data` after checking it holds exactly `resolution²` pixels.
    pub fn new(resolution: u32, data: PixelData) -> BakeResult<Self> {
        let expected = expected_sample_len(resolution)?;
        if data.sample_len() != expected {
            return Err(BakeError::readback(format!(
                "pixel buffer for {resolution}x{resolution} needs {expected} samples, got {}",
                data.sample_len()
            )));
        }
        Ok(Self { resolution, data })
    }

    /// Convenience constructor for BGRA8 samples.
    pub fn from_bgra8(resolution: u32, bgra: Vec<u8>) -> BakeResult<Self> {
        Self::new(resolution, PixelData::Bgra8(bgra))
    }

    /// Convenience constructor for linear RGBA16F samples.
    pub fn from_rgba16f(resolution: u32, rgba: Vec<f16>) -> BakeResult<Self> {
        Self::new(resolution, PixelData::Rgba16F(rgba))
    }

    /// Edge length in pixels.
    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Layout precision.
    pub fn bit_depth(&self) -> BitDepth {
        self.data.bit_depth()
    }

    /// Borrow the samples.
    pub fn data(&self) -> &PixelData {
        &self.data
    }

    /// Take ownership of the samples.
    pub fn into_data(self) -> PixelData {
        self.data
    }

    /// BGRA8 samples, if this is an 8-bit buffer.
    pub fn bgra8(&self) -> Option<&[u8]> {
        match &self.data {
            PixelData::Bgra8(v) => Some(v),
            PixelData::Rgba16F(_) => None,
        }
    }

    /// RGBA16F samples, if this is a half-float buffer.
    pub fn rgba16f(&self) -> Option<&[f16]> {
        match &self.data {
            PixelData::Rgba16F(v) => Some(v),
            PixelData::Bgra8(_) => None,
        }
    }
}

/// Scalar sample count of a `resolution²` RGBA surface, or an error on overflow.
pub(crate) fn expected_sample_len(resolution: u32) -> BakeResult<usize> {
    let side = resolution as usize;
    side.checked_mul(side)
        .and_then(|px| px.checked_mul(4))
        .ok_or_else(|| BakeError::readback(format!("{resolution}x{resolution} overflows")))
}
