use super::*;

use crate::shading::graph::{Material, ShaderNode};

fn material() -> Material {
    Material::new("M_Test", ShaderNode::TexCoord)
}

#[test]
fn defaults_are_half_float_assets() {
    let c = BakeConfig::<Material>::new("T_Test", "/Game/Textures");
    assert!(c.source.is_none());
    assert_eq!(c.output, OutputKind::Asset);
    assert_eq!(c.resolution, DEFAULT_RESOLUTION);
    assert_eq!(c.bit_depth, BitDepth::Float16);
    assert_eq!(c.compression, CompressionHint::Default);
}

#[test]
fn missing_source_is_reported_first() {
    let c = BakeConfig::<Material>::new("", "").with_resolution(0);
    assert!(matches!(
        c.validate(),
        Err(BakeError::InvalidConfig(InvalidConfigReason::NoSource))
    ));
}

#[test]
fn blank_name_is_rejected() {
    let m = material();
    let c = BakeConfig::new("   ", "/Game").with_source(&m);
    assert!(matches!(
        c.validate(),
        Err(BakeError::InvalidConfig(InvalidConfigReason::EmptyName))
    ));
}

#[test]
fn unusable_settings_are_rejected() {
    let m = material();
    let base = BakeConfig::new("T_Test", "out").with_source(&m);

    let cases = [
        base.clone().with_resolution(0),
        base.clone()
            .with_output(OutputKind::EncodedFile(ImageFormat::Png))
            .with_bit_depth(BitDepth::Float16),
        base.clone()
            .with_output(OutputKind::EncodedFile(ImageFormat::Exr))
            .with_bit_depth(BitDepth::Int8),
        BakeConfig::new("a/b", "out").with_source(&m),
        BakeConfig::new("T_Test", "out/../elsewhere").with_source(&m),
    ];
    for c in &cases {
        assert!(
            matches!(
                c.validate(),
                Err(BakeError::InvalidConfig(InvalidConfigReason::InvalidSettings(_)))
            ),
            "{c:?}"
        );
    }
}

#[test]
fn parent_segments_only_refused_for_asset_packages() {
    let m = material();
    BakeConfig::new("T_Red", "../renders")
        .with_source(&m)
        .with_output(OutputKind::EncodedFile(ImageFormat::Png))
        .with_bit_depth(BitDepth::Int8)
        .validate()
        .unwrap();

    let asset = BakeConfig::new("T_Red", "../renders").with_source(&m);
    assert!(matches!(
        asset.validate(),
        Err(BakeError::InvalidConfig(InvalidConfigReason::InvalidSettings(_)))
    ));
}

#[test]
fn flexible_formats_accept_both_depths() {
    let m = material();
    for format in [ImageFormat::Tga, ImageFormat::Tiff] {
        for depth in [BitDepth::Int8, BitDepth::Float16] {
            BakeConfig::new("T_Test", "out")
                .with_source(&m)
                .with_output(OutputKind::EncodedFile(format))
                .with_bit_depth(depth)
                .validate()
                .unwrap();
        }
    }
}

#[test]
fn file_path_joins_directory_name_and_extension() {
    let c = BakeConfig::<Material>::new(" T_Rock ", "baked");
    assert_eq!(
        c.file_path(ImageFormat::Exr),
        std::path::Path::new("baked").join("T_Rock.exr")
    );
}

#[test]
fn debug_names_the_source() {
    let m = material();
    let c = BakeConfig::new("T_Test", "/Game").with_source(&m);
    let dbg = format!("{c:?}");
    assert!(dbg.contains("M_Test"));
    assert!(dbg.contains("T_Test"));
}
