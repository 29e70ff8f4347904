/// The line-extents view consumed by the background pipeline.
pub mod layout;
/// A small measuring engine that turns strings into line layouts.
pub mod measure;

pub use layout::{LineExtents, TextLayout};
pub use measure::{
    GlyphMetrics, GlyphSource, HorizontalAlign, MeasuredLine, MeasuredText, PlacedGlyph,
    SourceLineMetrics, TextStyle, WrapStyle, measure,
};
