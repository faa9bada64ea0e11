use crate::foundation::error::BakeResult;
use crate::render::surface::RenderSurface;

/// Something a renderer can draw over a full-surface quad, e.g. a material.
pub trait SurfaceSource {
    /// Display name, used to derive default texture names.
    fn source_name(&self) -> &str;
}

/// Renderer collaborator that draws a [`SurfaceSource`] into a transient surface.
///
/// `draw` may only submit the work: implementations are free to finish it on another thread or
/// device. `wait_idle` is the completion barrier; when it returns `Ok`, every texel written by
/// previously submitted draws must be visible in `target`.
pub trait SurfaceRenderer {
    /// Source type this renderer understands.
    type Source: SurfaceSource + ?Sized;

    /// Submit a draw of `source` covering all of `target`.
    fn draw(&mut self, source: &Self::Source, target: &mut RenderSurface) -> BakeResult<()>;

    /// Block until all work submitted against `target` has completed.
    fn wait_idle(&mut self, target: &mut RenderSurface) -> BakeResult<()>;
}

impl<R: SurfaceRenderer + ?Sized> SurfaceRenderer for &mut R {
    type Source = R::Source;

    fn draw(&mut self, source: &Self::Source, target: &mut RenderSurface) -> BakeResult<()> {
        (**self).draw(source, target)
    }

    fn wait_idle(&mut self, target: &mut RenderSurface) -> BakeResult<()> {
        (**self).wait_idle(target)
    }
}
