use std::io::Cursor;

use half::f16;

use crate::foundation::core::ImageFormat;
use crate::foundation::error::{BakeError, BakeResult};
use crate::foundation::math::quantize_unorm8;
use crate::render::pixels::{PixelBuffer, PixelData, expected_sample_len};

/// Bytes of one encoded image container.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedImage {
    format: ImageFormat,
    bytes: Vec<u8>,
}

impl EncodedImage {
    /// Container format of `bytes`.
    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// Encoded bytes; never empty.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Take the encoded bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Encoded size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always `false` for values returned by [`encode`].
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum AlphaPolicy {
    ForceOpaque,
    Preserve,
}

/// Encode a baked buffer into `format`, entirely in memory.
///
/// | format | `Int8` input            | `Float16` input                  |
/// |--------|-------------------------|----------------------------------|
/// | PNG    | RGBA8, alpha forced 255 | rejected                         |
/// | EXR    | rejected                | half-float RGBA, linear          |
/// | TGA    | RGBA8, alpha kept       | RGBA8, linear clamp + round      |
/// | TIFF   | RGBA8, alpha kept       | 32-bit float RGBA, linear        |
pub fn encode(buffer: PixelBuffer, format: ImageFormat) -> BakeResult<EncodedImage> {
    let depth = buffer.bit_depth();
    if !format.accepts(depth) {
        return Err(BakeError::encode(
            format,
            format!("{format} cannot store {depth} pixels"),
        ));
    }

    let resolution = buffer.resolution();
    let expected =
        expected_sample_len(resolution).map_err(|e| BakeError::encode(format, e.to_string()))?;
    if buffer.data().sample_len() != expected {
        return Err(BakeError::encode(
            format,
            format!(
                "buffer holds {} samples, {resolution}x{resolution} needs {expected}",
                buffer.data().sample_len()
            ),
        ));
    }

    let bytes = match (format, buffer.into_data()) {
        (ImageFormat::Png, PixelData::Bgra8(bgra)) => {
            write_rgba8(bgra_to_rgba(bgra, AlphaPolicy::ForceOpaque), resolution, format)?
        }
        (ImageFormat::Tga | ImageFormat::Tiff, PixelData::Bgra8(bgra)) => {
            write_rgba8(bgra_to_rgba(bgra, AlphaPolicy::Preserve), resolution, format)?
        }
        (ImageFormat::Exr, PixelData::Rgba16F(rgba)) => write_exr_half(&rgba, resolution)?,
        (ImageFormat::Tiff, PixelData::Rgba16F(rgba)) => {
            let wide = rgba.iter().map(|v| v.to_f32()).collect();
            write_rgba32f(wide, resolution, format)?
        }
        (ImageFormat::Tga, PixelData::Rgba16F(rgba)) => {
            let narrow = rgba.iter().map(|v| quantize_unorm8(v.to_f32())).collect();
            write_rgba8(narrow, resolution, format)?
        }
        (format, data) => {
            return Err(BakeError::encode(
                format,
                format!("{format} cannot store {} pixels", data.bit_depth()),
            ));
        }
    };

    if bytes.is_empty() {
        return Err(BakeError::encode(format, "codec produced no output"));
    }
    tracing::debug!(%format, resolution, bytes = bytes.len(), "image encoded");
    Ok(EncodedImage { format, bytes })
}

fn bgra_to_rgba(mut px: Vec<u8>, alpha: AlphaPolicy) -> Vec<u8> {
    for chunk in px.chunks_exact_mut(4) {
        chunk.swap(0, 2);
        if alpha == AlphaPolicy::ForceOpaque {
            chunk[3] = u8::MAX;
        }
    }
    px
}

fn container(format: ImageFormat) -> image::ImageFormat {
    match format {
        ImageFormat::Png => image::ImageFormat::Png,
        ImageFormat::Exr => image::ImageFormat::OpenExr,
        ImageFormat::Tga => image::ImageFormat::Tga,
        ImageFormat::Tiff => image::ImageFormat::Tiff,
    }
}

fn write_rgba8(rgba: Vec<u8>, resolution: u32, format: ImageFormat) -> BakeResult<Vec<u8>> {
    let img = image::RgbaImage::from_raw(resolution, resolution, rgba)
        .ok_or_else(|| BakeError::encode(format, "rgba8 buffer does not match dimensions"))?;
    let mut out = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut out, container(format))
        .map_err(|e| BakeError::encode(format, e.to_string()))?;
    Ok(out.into_inner())
}

fn write_rgba32f(rgba: Vec<f32>, resolution: u32, format: ImageFormat) -> BakeResult<Vec<u8>> {
    let img = image::Rgba32FImage::from_raw(resolution, resolution, rgba)
        .ok_or_else(|| BakeError::encode(format, "rgba32f buffer does not match dimensions"))?;
    let mut out = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba32F(img)
        .write_to(&mut out, container(format))
        .map_err(|e| BakeError::encode(format, e.to_string()))?;
    Ok(out.into_inner())
}

fn write_exr_half(rgba: &[f16], resolution: u32) -> BakeResult<Vec<u8>> {
    use exr::prelude::*;

    let side = resolution as usize;
    let mut list = smallvec::SmallVec::<[AnyChannel<FlatSamples>; 4]>::new();
    for (offset, channel) in ["R", "G", "B", "A"].into_iter().enumerate() {
        let samples: Vec<f16> = rgba.iter().skip(offset).step_by(4).copied().collect();
        let name = Text::new_or_none(channel).ok_or_else(|| {
            BakeError::encode(ImageFormat::Exr, format!("invalid channel name {channel}"))
        })?;
        list.push(AnyChannel {
            name,
            sample_data: FlatSamples::F16(samples),
            quantize_linearly: false,
            sampling: Vec2(1, 1),
        });
    }

    let image = Image::from_channels((side, side), AnyChannels::sort(list));
    let mut out = Cursor::new(Vec::new());
    image
        .write()
        .to_buffered(&mut out)
        .map_err(|e| BakeError::encode(ImageFormat::Exr, e.to_string()))?;
    Ok(out.into_inner())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/codec.rs"]
mod tests;
