//! Scroll geometry predicates.
//!
//! Geometry is a sampled import from the host environment; the engine never
//! measures anything itself. The two predicates here are the entire trigger
//! logic: the host wires its scroll events to [`near_end`] and the engine's
//! autofill loop polls [`page_unfilled`].

/// One sample of viewport/content geometry, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Geometry {
    /// Document scroll offset.
    pub scroll_top: f64,
    /// Height of the visible viewport.
    pub viewport_height: f64,
    /// Offset of the content container from the document top.
    pub container_top: f64,
    /// Total height of rendered content.
    pub content_height: f64,
}

/// Supplies geometry samples from the host environment.
pub trait GeometrySource {
    fn sample(&mut self) -> Geometry;
}

impl<F> GeometrySource for F
where
    F: FnMut() -> Geometry,
{
    fn sample(&mut self) -> Geometry {
        self()
    }
}

/// True when the remaining scroll distance is within `offset_px` of the end
/// of content, i.e. the host should trigger a fetch.
pub fn near_end(geometry: &Geometry, offset_px: u32) -> bool {
    geometry.scroll_top + geometry.viewport_height
        >= geometry.container_top + geometry.content_height - f64::from(offset_px)
}

/// True while rendered content does not yet exceed the viewport plus
/// `offset_px`, i.e. the autofill loop should keep fetching.
pub fn page_unfilled(geometry: &Geometry, offset_px: u32) -> bool {
    geometry.container_top + geometry.content_height
        <= geometry.viewport_height + f64::from(offset_px)
}
