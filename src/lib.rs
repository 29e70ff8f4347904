//! # Fukidashi
//!
//! Chat-bubble backgrounds for multi-line text.
//!
//! ## Overview
//!
//! Every line of laid-out text gets its own closed outline that hugs the
//! line's width. Corners are rounded with a fixed radius and either *pinch*
//! (the horizontal edge stops inside the band) or *flare* (the edge stops
//! outside it), depending on whether the neighbouring line above or below is
//! at least as wide. Stacked together the outlines read as one speech bubble.
//!
//! The pipeline has two explicit phases:
//!
//! 1. Measure: any [`text::TextLayout`] works; [`text::measure`] builds one
//!    from a string and a `fontdue` font.
//! 2. Paint: [`background::paint_background`] turns the layout into
//!    [`background::ClosedPath`]s and hands them to a
//!    [`background::FillSurface`], such as the [`renderer::CpuCanvas`].
//!
//! ## Usage
//!
//! ```rust
//! use fukidashi::background::{BackgroundStyle, ClosedPath, paint_background};
//! use fukidashi::text::LineExtents;
//!
//! let layout = vec![
//!     LineExtents::new(60.0, 140.0, 0.0, 30.0),
//!     LineExtents::new(20.0, 180.0, 30.0, 60.0),
//! ];
//!
//! let mut outlines = Vec::new();
//! paint_background(
//!     &layout,
//!     200.0,
//!     &BackgroundStyle::default(),
//!     &mut |path: &ClosedPath, _color: fukidashi::palette::Srgba<u8>| outlines.push(path.clone()),
//! );
//! assert_eq!(outlines.len(), 2);
//! ```
//!
//! [`BubbleSystem`] bundles font loading, measuring and painting behind a
//! thread-safe handle.

pub mod background;
pub mod bubble_system;
pub mod font_storage;
pub mod renderer;
pub mod text;

// common re-exports
pub use background::{BackgroundStyle, ClosedPath, FillSurface, RadiusMode};
pub use bubble_system::BubbleSystem;
pub use font_storage::FontStorage;
pub use renderer::{CpuCanvas, GlyphRasterizer};

// re-export dependencies
pub use euclid;
pub use fontdb;
pub use fontdue;
pub use palette;
pub use parking_lot;
pub use tiny_skia;
