/// Per-line band extents and neighbour comparison.
pub mod metrics;
/// Closed outline construction for a single band.
pub mod path;

use palette::Srgba;

pub use metrics::{CornerPolicy, LineBand, NeighborWidth, extract};
pub use path::{ClosedPath, PathSegment, build};

use crate::text::TextLayout;

/// Fill colour used when the caller does not pick one (`#3126AB`, opaque).
pub fn default_fill() -> Srgba<u8> {
    Srgba::new(0x31, 0x26, 0xab, 0xff)
}

/// Appearance of the backgrounds painted behind text.
#[derive(Clone, Debug, PartialEq)]
pub struct BackgroundStyle {
    /// Padding added on both sides of every line, in layout units.
    pub horizontal_margin: f32,
    /// Added to each line's bottom so consecutive bands overlap.
    pub vertical_overlap_fix: f32,
    pub corner_radius: f32,
    pub radius_mode: RadiusMode,
    pub fill: Srgba<u8>,
}

impl Default for BackgroundStyle {
    fn default() -> Self {
        Self {
            horizontal_margin: 20.0,
            vertical_overlap_fix: 1.0,
            corner_radius: 30.0,
            radius_mode: RadiusMode::Unclamped,
            fill: default_fill(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
/// What to do with a corner radius that does not fit inside a band.
pub enum RadiusMode {
    /// Use the radius as given even if the corners overlap.
    #[default]
    Unclamped,
    /// Shrink the radius to half of the band's shorter side.
    ClampToBand,
}

impl BackgroundStyle {
    /// Radius actually used for `band` under this style's [`RadiusMode`].
    pub fn effective_radius(&self, band: &LineBand) -> f32 {
        let half_side = (band.width().min(band.height()) / 2.0).max(0.0);
        match self.radius_mode {
            RadiusMode::Unclamped => {
                if self.corner_radius > half_side {
                    log::debug!(
                        "Corner radius {} exceeds half of band {:?}; corners will overlap.",
                        self.corner_radius,
                        band
                    );
                }
                self.corner_radius
            }
            RadiusMode::ClampToBand => self.corner_radius.min(half_side),
        }
    }
}

/// Receiver of filled background paths.
///
/// Paths arrive in line order and must be composited beneath any glyphs the
/// caller draws afterwards.
pub trait FillSurface {
    fn fill_path(&mut self, path: &ClosedPath, color: Srgba<u8>);
}

impl<F> FillSurface for F
where
    F: FnMut(&ClosedPath, Srgba<u8>),
{
    fn fill_path(&mut self, path: &ClosedPath, color: Srgba<u8>) {
        self(path, color)
    }
}

/// Builds the outline of every line's background, top to bottom.
pub fn background_paths<L: TextLayout + ?Sized>(
    layout: &L,
    canvas_width: f32,
    style: &BackgroundStyle,
) -> Vec<ClosedPath> {
    extract(
        layout,
        canvas_width,
        style.horizontal_margin,
        style.vertical_overlap_fix,
    )
    .into_iter()
    .map(|(band, policy)| {
        build(
            &band,
            style.effective_radius(&band),
            policy.top_pinch(),
            policy.bottom_pinch(),
        )
    })
    .collect()
}

/// Fills every line's background into `surface` with `style.fill`.
///
/// Each call is a full repaint of the given snapshot; nothing is retained.
pub fn paint_background<L, S>(layout: &L, canvas_width: f32, style: &BackgroundStyle, surface: &mut S)
where
    L: TextLayout + ?Sized,
    S: FillSurface + ?Sized,
{
    let paths = background_paths(layout, canvas_width, style);
    log::trace!("Painting {} background band(s).", paths.len());

    for path in &paths {
        surface.fill_path(path, style.fill);
    }
}
