use palette::Srgba;
use tiny_skia::{ColorU8, FillRule, Paint, PathBuilder, Pixmap, PixmapPaint, Transform};

use crate::background::{ClosedPath, FillSurface, PathSegment};
use crate::text::MeasuredText;

/// Coverage bitmap of one glyph, one byte per pixel, row-major.
pub struct GlyphBitmap {
    pub width: usize,
    pub height: usize,
    pub coverage: Vec<u8>,
}

/// Turns glyph indices into coverage bitmaps.
pub trait GlyphRasterizer {
    fn rasterize(&self, glyph_index: u16, font_size: f32) -> GlyphBitmap;
}

impl GlyphRasterizer for fontdue::Font {
    fn rasterize(&self, glyph_index: u16, font_size: f32) -> GlyphBitmap {
        let (metrics, coverage) = self.rasterize_indexed(glyph_index, font_size);
        GlyphBitmap {
            width: metrics.width,
            height: metrics.height,
            coverage,
        }
    }
}

/// RGBA canvas backed by a `tiny_skia::Pixmap`.
///
/// The origin is the top-left corner. Everything drawn is composited with
/// source-over, so backgrounds must be filled before glyphs.
pub struct CpuCanvas {
    pixmap: Pixmap,
}

impl CpuCanvas {
    /// Creates a fully transparent canvas.
    ///
    /// Returns `None` when either side is zero.
    pub fn new(width: u32, height: u32) -> Option<Self> {
        Pixmap::new(width, height).map(|pixmap| Self { pixmap })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    #[inline]
    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn into_pixmap(self) -> Pixmap {
        self.pixmap
    }

    /// Overwrites every pixel with `color`.
    pub fn clear(&mut self, color: Srgba<u8>) {
        let color = tiny_skia::Color::from_rgba8(color.red, color.green, color.blue, color.alpha);
        self.pixmap.fill(color);
    }

    /// Returns the pixel at `(x, y)` with straight alpha, or `None` outside
    /// the canvas.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Srgba<u8>> {
        let p = self.pixmap.pixel(x, y)?.demultiply();
        Some(Srgba::new(p.red(), p.green(), p.blue(), p.alpha()))
    }

    /// Straight-alpha RGBA8 bytes, row-major.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixmap
            .pixels()
            .iter()
            .flat_map(|p| {
                let p = p.demultiply();
                [p.red(), p.green(), p.blue(), p.alpha()]
            })
            .collect()
    }

    /// Composites every glyph of `text` on top of the canvas.
    ///
    /// `glyphs` must rasterize the face `text` was measured with.
    pub fn draw_glyphs(
        &mut self,
        text: &MeasuredText,
        glyphs: &(impl GlyphRasterizer + ?Sized),
        color: Srgba<u8>,
    ) {
        for line in &text.lines {
            for glyph in &line.glyphs {
                let bitmap = glyphs.rasterize(glyph.glyph_index, text.font_size);
                let Some(tinted) = tint(&bitmap, color) else {
                    continue;
                };

                self.pixmap.draw_pixmap(
                    glyph.x.floor() as i32,
                    glyph.y.floor() as i32,
                    tinted.as_ref(),
                    &PixmapPaint::default(),
                    Transform::identity(),
                    None,
                );
            }
        }
    }
}

/// Premultiplied `color` scaled by the glyph's coverage.
///
/// `None` for empty glyphs such as spaces.
fn tint(bitmap: &GlyphBitmap, color: Srgba<u8>) -> Option<Pixmap> {
    let mut pixmap = Pixmap::new(bitmap.width as u32, bitmap.height as u32)?;

    for (pixel, &coverage) in pixmap.pixels_mut().iter_mut().zip(&bitmap.coverage) {
        let alpha = (color.alpha as u32 * coverage as u32 + 127) / 255;
        *pixel = ColorU8::from_rgba(color.red, color.green, color.blue, alpha as u8).premultiply();
    }

    Some(pixmap)
}

fn to_skia_path(path: &ClosedPath) -> Option<tiny_skia::Path> {
    let mut pb = PathBuilder::new();

    for segment in path.segments() {
        match *segment {
            PathSegment::MoveTo(p) => pb.move_to(p.x, p.y),
            PathSegment::LineTo(p) => pb.line_to(p.x, p.y),
            PathSegment::CubicTo { ctrl1, ctrl2, to } => {
                pb.cubic_to(ctrl1.x, ctrl1.y, ctrl2.x, ctrl2.y, to.x, to.y)
            }
            PathSegment::Close => pb.close(),
        }
    }

    pb.finish()
}

impl FillSurface for CpuCanvas {
    /// Fills `path` anti-aliased with the non-zero winding rule.
    fn fill_path(&mut self, path: &ClosedPath, color: Srgba<u8>) {
        let Some(path) = to_skia_path(path) else {
            log::trace!("Skipping degenerate background path.");
            return;
        };

        let mut paint = Paint::default();
        paint.set_color_rgba8(color.red, color.green, color.blue, color.alpha);
        paint.anti_alias = true;

        self.pixmap
            .fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::background::{LineBand, build, default_fill};
    use crate::text::{LineExtents, MeasuredLine, PlacedGlyph};

    fn band(left: f32, right: f32, top: f32, bottom: f32) -> LineBand {
        LineBand {
            left,
            right,
            top,
            bottom,
        }
    }

    /// Every glyph is a solid square.
    struct BlockGlyphs {
        size: usize,
    }

    impl GlyphRasterizer for BlockGlyphs {
        fn rasterize(&self, glyph_index: u16, _font_size: f32) -> GlyphBitmap {
            // Glyph 0 stands in for a space.
            let size = if glyph_index == 0 { 0 } else { self.size };
            GlyphBitmap {
                width: size,
                height: size,
                coverage: vec![255; size * size],
            }
        }
    }

    fn one_line(glyphs: Vec<PlacedGlyph>) -> MeasuredText {
        MeasuredText {
            font_size: 10.0,
            width: 40.0,
            height: 20.0,
            lines: vec![MeasuredLine {
                extents: LineExtents::new(0.0, 40.0, 0.0, 20.0),
                baseline: 15.0,
                glyphs,
            }],
        }
    }

    #[test]
    fn test_new_canvas_is_transparent() {
        let canvas = CpuCanvas::new(3, 2).unwrap();
        assert_eq!(canvas.to_rgba8().len(), 24);
        assert_eq!(canvas.pixel(2, 1), Some(Srgba::new(0, 0, 0, 0)));
        assert_eq!(canvas.pixel(3, 0), None);
    }

    #[test]
    fn test_zero_sized_canvas_is_rejected() {
        assert!(CpuCanvas::new(0, 4).is_none());
        assert!(CpuCanvas::new(4, 0).is_none());
    }

    #[test]
    fn test_clear_sets_every_pixel() {
        let mut canvas = CpuCanvas::new(4, 4).unwrap();
        canvas.clear(Srgba::new(1, 2, 3, 255));
        assert!(canvas.to_rgba8().chunks_exact(4).all(|p| p == [1, 2, 3, 255]));
    }

    #[test]
    fn test_pinched_band_fills_inside_only() {
        let mut canvas = CpuCanvas::new(100, 60).unwrap();
        let path = build(&band(10.0, 90.0, 10.0, 50.0), 5.0, true, true);
        canvas.fill_path(&path, default_fill());

        assert_eq!(canvas.pixel(50, 30), Some(default_fill()));
        assert_eq!(canvas.pixel(5, 30).map(|p| p.alpha), Some(0));
        assert_eq!(canvas.pixel(50, 55).map(|p| p.alpha), Some(0));
        // Rounded corner leaves the extreme corner pixel partly uncovered.
        let corner = canvas.pixel(10, 10).map(|p| p.alpha);
        assert!(corner.is_some_and(|alpha| alpha < 255));
    }

    #[test]
    fn test_flared_corner_overhangs_band() {
        let mut canvas = CpuCanvas::new(200, 80).unwrap();
        let path = build(&band(40.0, 160.0, 20.0, 60.0), 20.0, false, false);
        canvas.fill_path(&path, default_fill());

        assert_eq!(canvas.pixel(162, 20), Some(default_fill()));
        assert_eq!(canvas.pixel(165, 35).map(|p| p.alpha), Some(0));
    }

    #[test]
    fn test_skia_path_keeps_cubic_end_points() {
        let path = build(&band(0.0, 100.0, 0.0, 40.0), 10.0, true, false);
        let skia = to_skia_path(&path).unwrap();

        let bounds = skia.bounds();
        // Flared bottom corners reach r past the band sides.
        assert_eq!(bounds.left(), -10.0);
        assert_eq!(bounds.right(), 110.0);
        assert_eq!(bounds.top(), 0.0);
        assert_eq!(bounds.bottom(), 40.0);
        assert_eq!(skia.len(), path.segments().len());
    }

    #[test]
    fn test_glyphs_land_on_top_of_background() {
        let mut canvas = CpuCanvas::new(40, 20).unwrap();
        let path = build(&band(0.0, 40.0, 0.0, 20.0), 2.0, true, true);
        canvas.fill_path(&path, default_fill());

        let text = one_line(vec![
            PlacedGlyph {
                glyph_index: 1,
                x: 10.0,
                y: 5.0,
            },
            PlacedGlyph {
                glyph_index: 0,
                x: 20.0,
                y: 5.0,
            },
        ]);
        let white = Srgba::new(255, 255, 255, 255);
        canvas.draw_glyphs(&text, &BlockGlyphs { size: 4 }, white);

        assert_eq!(canvas.pixel(10, 5), Some(white));
        assert_eq!(canvas.pixel(13, 8), Some(white));
        assert_eq!(canvas.pixel(14, 8), Some(default_fill()));
        assert_eq!(canvas.pixel(21, 6), Some(default_fill()));
    }

    #[test]
    fn test_translucent_glyph_blends_with_fill() {
        let mut canvas = CpuCanvas::new(20, 20).unwrap();
        canvas.clear(Srgba::new(0, 0, 0, 255));

        let text = one_line(vec![PlacedGlyph {
            glyph_index: 1,
            x: 2.0,
            y: 2.0,
        }]);
        canvas.draw_glyphs(&text, &BlockGlyphs { size: 2 }, Srgba::new(255, 255, 255, 128));

        let p = canvas.pixel(2, 2).unwrap();
        assert_eq!(p.alpha, 255);
        assert!((126..=130).contains(&p.red));
        assert_eq!(canvas.pixel(5, 5), Some(Srgba::new(0, 0, 0, 255)));
    }

    #[test]
    fn test_glyphs_clip_at_canvas_edge() {
        let mut canvas = CpuCanvas::new(8, 8).unwrap();
        let text = one_line(vec![PlacedGlyph {
            glyph_index: 1,
            x: 6.0,
            y: -2.0,
        }]);
        let red = Srgba::new(255, 0, 0, 255);
        canvas.draw_glyphs(&text, &BlockGlyphs { size: 4 }, red);

        assert_eq!(canvas.pixel(7, 0), Some(red));
        assert_eq!(canvas.pixel(7, 2).map(|p| p.alpha), Some(0));
        assert_eq!(canvas.pixel(5, 0).map(|p| p.alpha), Some(0));
    }
}
