use std::io::Read as _;
use std::path::Path;

use anyhow::{Context as _, bail, ensure};
use half::f16;
use serde::{Deserialize, Serialize};

use crate::asset::path::{AssetId, AssetPath};
use crate::foundation::core::{BitDepth, CompressionHint};
use crate::foundation::error::BakeResult;
use crate::render::pixels::PixelData;

/// Leading bytes of every `.texasset` file.
pub const TEXASSET_MAGIC: [u8; 4] = *b"TXAS";
/// Current `.texasset` layout version.
pub const TEXASSET_VERSION: u32 = 1;
/// File extension of serialized records, without the dot.
pub const TEXASSET_EXTENSION: &str = "texasset";

const PREAMBLE_LEN: usize = 12;

/// Sample layout of a record's source data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceFormat {
    /// 4×u8, B,G,R,A.
    #[serde(rename = "bgra8")]
    Bgra8,
    /// 4×f16, R,G,B,A, linear.
    #[serde(rename = "rgba16f")]
    Rgba16F,
}

impl SourceFormat {
    fn bit_depth(self) -> BitDepth {
        match self {
            Self::Bgra8 => BitDepth::Int8,
            Self::Rgba16F => BitDepth::Float16,
        }
    }
}

/// Mip generation policy. Baked textures carry a single level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MipPolicy {
    /// Single level, no generated chain.
    #[default]
    NoMipmaps,
}

/// Baked texture asset: authoritative source samples plus import metadata.
#[derive(Clone, Debug, PartialEq)]
pub struct TextureAssetRecord {
    /// Stable identity, kept across updates.
    pub id: AssetId,
    /// Where the record lives.
    pub path: AssetPath,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Source samples, same layout as the baked buffer.
    pub source: PixelData,
    /// Requested runtime compression.
    pub compression: CompressionHint,
    /// Whether samples are display-gamma encoded; always `false` for baked records.
    pub srgb: bool,
    /// Mip policy.
    pub mip_policy: MipPolicy,
    /// Bumped on every committed update, starting at 1.
    pub revision: u32,
}

/// JSON header stored ahead of the samples.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecordHeader {
    /// Stable identity.
    pub id: AssetId,
    /// Normalized package path.
    pub package: String,
    /// Record name.
    pub name: String,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Sample layout.
    pub source_format: SourceFormat,
    /// Requested runtime compression.
    pub compression: CompressionHint,
    /// Display-gamma flag.
    pub srgb: bool,
    /// Mip policy.
    pub mip_policy: MipPolicy,
    /// Update counter.
    pub revision: u32,
}

impl TextureAssetRecord {
    /// Sample layout of `source`.
    pub fn source_format(&self) -> SourceFormat {
        match self.source {
            PixelData::Bgra8(_) => SourceFormat::Bgra8,
            PixelData::Rgba16F(_) => SourceFormat::Rgba16F,
        }
    }

    /// Full identifier, e.g. `/Game/Textures/T_Rock`.
    pub fn identifier(&self) -> String {
        self.path.identifier()
    }

    /// Header describing this record.
    pub fn header(&self) -> RecordHeader {
        RecordHeader {
            id: self.id,
            package: self.path.package().to_string(),
            name: self.path.name().to_string(),
            width: self.width,
            height: self.height,
            source_format: self.source_format(),
            compression: self.compression,
            srgb: self.srgb,
            mip_policy: self.mip_policy,
            revision: self.revision,
        }
    }

    /// Serialize into the `.texasset` layout: magic, version, header length, JSON header,
    /// then little-endian samples.
    pub fn to_bytes(&self) -> BakeResult<Vec<u8>> {
        let header = serde_json::to_vec(&self.header()).context("serialize record header")?;
        let header_len = u32::try_from(header.len()).context("record header too large")?;

        let payload_len = self.source.sample_len() * self.source.bit_depth().bytes_per_pixel() / 4;
        let mut out = Vec::with_capacity(PREAMBLE_LEN + header.len() + payload_len);
        out.extend_from_slice(&TEXASSET_MAGIC);
        out.extend_from_slice(&TEXASSET_VERSION.to_le_bytes());
        out.extend_from_slice(&header_len.to_le_bytes());
        out.extend_from_slice(&header);
        match &self.source {
            PixelData::Bgra8(v) => out.extend_from_slice(v),
            PixelData::Rgba16F(v) => {
                for s in v {
                    out.extend_from_slice(&s.to_le_bytes());
                }
            }
        }
        Ok(out)
    }

    /// Parse a complete `.texasset` byte image.
    pub fn from_bytes(bytes: &[u8]) -> BakeResult<Self> {
        Ok(parse_record(bytes)?)
    }
}

fn parse_preamble(preamble: &[u8]) -> anyhow::Result<usize> {
    ensure!(preamble.len() >= PREAMBLE_LEN, "texasset is truncated");
    ensure!(preamble[0..4] == TEXASSET_MAGIC, "not a texasset file");
    let version = u32::from_le_bytes([preamble[4], preamble[5], preamble[6], preamble[7]]);
    if version != TEXASSET_VERSION {
        bail!("unsupported texasset version {version}");
    }
    let header_len = u32::from_le_bytes([preamble[8], preamble[9], preamble[10], preamble[11]]);
    Ok(header_len as usize)
}

fn parse_record(bytes: &[u8]) -> anyhow::Result<TextureAssetRecord> {
    let header_len = parse_preamble(bytes)?;
    let header_end = PREAMBLE_LEN
        .checked_add(header_len)
        .filter(|&end| end <= bytes.len())
        .context("texasset header is truncated")?;
    let header: RecordHeader = serde_json::from_slice(&bytes[PREAMBLE_LEN..header_end])
        .context("parse texasset header")?;
    let payload = &bytes[header_end..];

    let depth = header.source_format.bit_depth();
    let expected = (header.width as usize)
        .checked_mul(header.height as usize)
        .and_then(|px| px.checked_mul(depth.bytes_per_pixel()))
        .context("texasset dimensions overflow")?;
    ensure!(
        payload.len() == expected,
        "texasset payload holds {} bytes, expected {expected}",
        payload.len()
    );

    let source = match header.source_format {
        SourceFormat::Bgra8 => PixelData::Bgra8(payload.to_vec()),
        SourceFormat::Rgba16F => PixelData::Rgba16F(
            payload
                .chunks_exact(2)
                .map(|b| f16::from_le_bytes([b[0], b[1]]))
                .collect(),
        ),
    };
    let path = AssetPath::new(&header.package, &header.name, &header.package)
        .map_err(|e| anyhow::anyhow!("texasset path: {e}"))?;

    Ok(TextureAssetRecord {
        id: header.id,
        path,
        width: header.width,
        height: header.height,
        source,
        compression: header.compression,
        srgb: header.srgb,
        mip_policy: header.mip_policy,
        revision: header.revision,
    })
}

/// Read only the header of a `.texasset` file.
pub fn read_record_header(file: &Path) -> BakeResult<RecordHeader> {
    let mut f = std::fs::File::open(file)
        .with_context(|| format!("open texasset '{}'", file.display()))?;
    let mut preamble = [0u8; PREAMBLE_LEN];
    f.read_exact(&mut preamble)
        .with_context(|| format!("read texasset preamble '{}'", file.display()))?;
    let header_len = parse_preamble(&preamble)?;
    let mut header = vec![0u8; header_len];
    f.read_exact(&mut header)
        .with_context(|| format!("read texasset header '{}'", file.display()))?;
    let header: RecordHeader =
        serde_json::from_slice(&header).context("parse texasset header")?;
    Ok(header)
}

/// Read a complete `.texasset` file.
pub fn read_record_file(file: &Path) -> BakeResult<TextureAssetRecord> {
    let bytes =
        std::fs::read(file).with_context(|| format!("read texasset '{}'", file.display()))?;
    Ok(parse_record(&bytes).with_context(|| format!("decode texasset '{}'", file.display()))?)
}

#[cfg(test)]
#[path = "../../tests/unit/asset/record.rs"]
mod tests;
