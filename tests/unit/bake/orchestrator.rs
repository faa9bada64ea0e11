use super::*;

use std::path::Path;

use crate::asset::store::MemoryAssetStore;
use crate::bake::progress::NoProgress;
use crate::encode::sink::InMemoryByteSink;
use crate::foundation::core::BitDepth;
use crate::render::cpu::CpuShaderRenderer;
use crate::render::surface::RenderSurface;
use crate::shading::graph::{Material, ShaderNode};

#[derive(Default)]
struct Recorder {
    phases: Vec<BakePhase>,
    cancel_after: Option<usize>,
}

impl BakeProgress for Recorder {
    fn enter_phase(&mut self, phase: BakePhase) {
        self.phases.push(phase);
    }

    fn is_cancelled(&self) -> bool {
        self.cancel_after.is_some_and(|n| self.phases.len() >= n)
    }
}

struct LostDevice;

impl SurfaceRenderer for LostDevice {
    type Source = Material;

    fn draw(&mut self, _: &Material, _: &mut RenderSurface) -> BakeResult<()> {
        Err(BakeError::render("device lost"))
    }

    fn wait_idle(&mut self, _: &mut RenderSurface) -> BakeResult<()> {
        Ok(())
    }
}

fn material() -> Material {
    Material::new(
        "M_Red",
        ShaderNode::Constant {
            rgba: [1.0, 0.0, 0.0, 1.0],
        },
    )
}

fn png_config(m: &Material) -> BakeConfig<'_, Material> {
    BakeConfig::new("T_Unit", "out")
        .with_source(m)
        .with_output(OutputKind::EncodedFile(ImageFormat::Png))
        .with_resolution(4)
        .with_bit_depth(BitDepth::Int8)
}

fn baker() -> Baker<CpuShaderRenderer, MemoryAssetStore, InMemoryByteSink> {
    Baker::new(
        CpuShaderRenderer::new(),
        MemoryAssetStore::default(),
        InMemoryByteSink::new(),
    )
}

#[test]
fn successful_bake_walks_every_phase() {
    let m = material();
    let mut baker = baker();
    let mut rec = Recorder::default();

    let out = baker.execute_bake(&png_config(&m), &mut rec).unwrap();
    assert_eq!(
        rec.phases,
        vec![
            BakePhase::Validating,
            BakePhase::SurfaceAcquired,
            BakePhase::Rendering,
            BakePhase::ReadingBack,
            BakePhase::Persisting,
            BakePhase::Done,
        ]
    );

    let path = Path::new("out").join("T_Unit.png");
    let BakeOutput::File {
        path: written,
        format,
        byte_len,
    } = &out
    else {
        panic!("expected file output");
    };
    assert_eq!(written, &path);
    assert_eq!(*format, ImageFormat::Png);
    assert_eq!(baker.sink().get(&path).map(<[u8]>::len), Some(*byte_len));
    assert_eq!(out.message(), format!("Texture saved to '{}'.", path.display()));

    let stats = baker.surface_stats();
    assert_eq!((stats.acquired, stats.released, stats.live), (1, 1, 0));
}

#[test]
fn invalid_config_never_acquires_a_surface() {
    let mut baker = baker();
    let mut rec = Recorder::default();
    let config = BakeConfig::<Material>::new("T_Unit", "out");

    let err = baker.execute_bake(&config, &mut rec).unwrap_err();
    assert!(matches!(
        err,
        BakeError::InvalidConfig(InvalidConfigReason::NoSource)
    ));
    assert_eq!(rec.phases, vec![BakePhase::Validating, BakePhase::Failed]);
    assert_eq!(baker.surface_stats().acquired, 0);
    assert_eq!(baker.renderer().draw_count(), 0);
}

#[test]
fn cancellation_stops_at_the_next_boundary_and_releases_the_surface() {
    let m = material();
    let mut baker = baker();
    let mut rec = Recorder {
        cancel_after: Some(2),
        ..Recorder::default()
    };

    let err = baker.execute_bake(&png_config(&m), &mut rec).unwrap_err();
    assert!(matches!(
        err,
        BakeError::Cancelled {
            phase: BakePhase::Rendering
        }
    ));
    assert_eq!(err.phase(), BakePhase::Rendering);
    assert_eq!(
        rec.phases,
        vec![
            BakePhase::Validating,
            BakePhase::SurfaceAcquired,
            BakePhase::Failed
        ]
    );
    assert_eq!(baker.renderer().draw_count(), 0);
    assert_eq!(baker.surface_stats().live, 0);
    assert_eq!(baker.surface_stats().released, 1);
    assert!(baker.sink().files().is_empty());
}

#[test]
fn render_failure_releases_the_surface_and_persists_nothing() {
    let m = material();
    let mut baker = Baker::new(
        LostDevice,
        MemoryAssetStore::default(),
        InMemoryByteSink::new(),
    );
    let mut rec = Recorder::default();

    let err = baker.execute_bake(&png_config(&m), &mut rec).unwrap_err();
    assert!(matches!(err, BakeError::RenderFailed(_)));
    assert_eq!(rec.phases.last(), Some(&BakePhase::Failed));
    assert_eq!(baker.surface_stats().live, 0);
    assert!(baker.sink().files().is_empty());
    assert!(baker.store().is_empty());
}

#[test]
fn rejected_write_reports_a_save_failure() {
    let m = material();
    let mut baker = Baker::new(
        CpuShaderRenderer::new(),
        MemoryAssetStore::default(),
        InMemoryByteSink::rejecting(),
    );
    let mut rec = Recorder::default();

    let err = baker.execute_bake(&png_config(&m), &mut rec).unwrap_err();
    let path = Path::new("out").join("T_Unit.png");
    assert!(matches!(&err, BakeError::WriteFailed { path: p, .. } if p == &path));
    assert_eq!(err.phase(), BakePhase::Persisting);
    assert_eq!(
        err.user_message(),
        format!("Failed to save file to disk: '{}'.", path.display())
    );
    assert_eq!(rec.phases.last(), Some(&BakePhase::Failed));
    assert_eq!(baker.renderer().draw_count(), 1);
    assert_eq!(baker.surface_stats().live, 0);
    assert!(baker.sink().files().is_empty());
    assert!(baker.store().is_empty());
}

#[test]
fn asset_messages_distinguish_create_and_update() {
    let m = material();
    let mut baker = baker();
    let config = png_config(&m).with_output(OutputKind::Asset);

    let first = baker.execute_bake(&config, &mut NoProgress).unwrap();
    assert_eq!(
        first.message(),
        "Texture asset created at '/Game/out/T_Unit'."
    );
    let second = baker.execute_bake(&config, &mut NoProgress).unwrap();
    assert_eq!(
        second.message(),
        "Texture asset '/Game/out/T_Unit' updated (revision 2)."
    );
    assert_eq!(baker.surface_stats().allocated, 1);
}
