use crate::text::{LineExtents, TextLayout};

/// Style knobs honored by [`measure`].
///
/// Colours and font choice belong to the caller; only the parameters that
/// change line geometry live here.
#[derive(Clone, Debug, PartialEq)]
pub struct TextStyle {
    pub font_size: f32,
    /// Absolute distance between consecutive line tops. `None` uses the
    /// font's own `ascent - descent + line_gap`.
    pub line_height: Option<f32>,
    pub horizontal_align: HorizontalAlign,
    /// Width of the box the text is aligned (and possibly wrapped) inside.
    pub max_width: Option<f32>,
    pub wrap_style: WrapStyle,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size: 26.0,
            line_height: None,
            horizontal_align: HorizontalAlign::Center,
            max_width: None,
            wrap_style: WrapStyle::WordWrap,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Horizontal justification applied after each line is assembled.
pub enum HorizontalAlign {
    Left,
    Center,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Where line breaks may occur besides explicit `\n`.
pub enum WrapStyle {
    NoWrap,
    WordWrap,
}

/// Horizontal metrics of one glyph at a given size.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GlyphMetrics {
    pub xmin: f32,
    pub ymin: f32,
    pub width: f32,
    pub height: f32,
    pub advance_width: f32,
}

/// Vertical metrics shared by every line set in one font and size.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SourceLineMetrics {
    pub ascent: f32,
    /// Negative below the baseline, as fonts report it.
    pub descent: f32,
    pub line_gap: f32,
}

/// Anything that can answer glyph metric questions for the measurer.
///
/// Implemented for [`fontdue::Font`]; tests plug in fixed-advance fakes.
pub trait GlyphSource {
    fn glyph_index(&self, ch: char) -> u16;
    fn glyph_metrics(&self, glyph_index: u16, font_size: f32) -> GlyphMetrics;
    fn kerning(&self, left: u16, right: u16, font_size: f32) -> Option<f32>;
    fn line_metrics(&self, font_size: f32) -> Option<SourceLineMetrics>;
}

impl GlyphSource for fontdue::Font {
    fn glyph_index(&self, ch: char) -> u16 {
        self.lookup_glyph_index(ch)
    }

    fn glyph_metrics(&self, glyph_index: u16, font_size: f32) -> GlyphMetrics {
        let metrics = self.metrics_indexed(glyph_index, font_size);
        GlyphMetrics {
            xmin: metrics.xmin as f32,
            ymin: metrics.ymin as f32,
            width: metrics.width as f32,
            height: metrics.height as f32,
            advance_width: metrics.advance_width,
        }
    }

    fn kerning(&self, left: u16, right: u16, font_size: f32) -> Option<f32> {
        self.horizontal_kern_indexed(left, right, font_size)
    }

    fn line_metrics(&self, font_size: f32) -> Option<SourceLineMetrics> {
        self.horizontal_line_metrics(font_size)
            .map(|metrics| SourceLineMetrics {
                ascent: metrics.ascent,
                descent: metrics.descent,
                line_gap: metrics.line_gap,
            })
    }
}

/// Immutable snapshot produced by [`measure`].
///
/// **Y-axis goes down.** Glyph positions are the top-left corner of each
/// glyph's bitmap so renderers can blit them without further transforms.
#[derive(Clone, Debug, PartialEq)]
pub struct MeasuredText {
    pub font_size: f32,
    /// Width of the alignment box (the widest line when no `max_width` is set).
    pub width: f32,
    pub height: f32,
    pub lines: Vec<MeasuredLine>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MeasuredLine {
    pub extents: LineExtents,
    pub baseline: f32,
    pub glyphs: Vec<PlacedGlyph>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacedGlyph {
    pub glyph_index: u16,
    pub x: f32,
    pub y: f32,
}

impl TextLayout for MeasuredText {
    fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn line_left(&self, index: usize) -> f32 {
        self.lines[index].extents.left
    }

    fn line_right(&self, index: usize) -> f32 {
        self.lines[index].extents.right
    }

    fn line_top(&self, index: usize) -> f32 {
        self.lines[index].extents.top
    }

    fn line_bottom(&self, index: usize) -> f32 {
        self.lines[index].extents.bottom
    }
}

/// Lays out `text` with a single font and returns per-line extents.
///
/// The work is split in two stages:
/// 1. Each paragraph (split on `\n`) is cut into runs of whitespace and
///    non-whitespace which are appended to line buffers, wrapping at word
///    boundaries when the style asks for it.
/// 2. The finished buffers are stacked vertically and shifted by the
///    alignment offset.
///
/// A font without horizontal line metrics produces an empty layout.
pub fn measure(text: &str, source: &impl GlyphSource, style: &TextStyle) -> MeasuredText {
    let font_size = style.font_size;

    let Some(line_metrics) = source.line_metrics(font_size) else {
        log::warn!("Font has no horizontal line metrics at size {font_size}; nothing measured.");
        return MeasuredText {
            font_size,
            width: 0.0,
            height: 0.0,
            lines: Vec::new(),
        };
    };

    let limit = match style.wrap_style {
        WrapStyle::NoWrap => None,
        WrapStyle::WordWrap => style.max_width,
    };

    // Stage 1
    let mut buffers: Vec<LineBuffer> = Vec::new();
    for paragraph in text.split('\n') {
        let mut line = LineBuffer::default();

        for run in runs(paragraph) {
            let shaped = shape_run(run, source, font_size);

            // Whitespace never breaks a line; it trails the word before it.
            if run.is_space {
                line.push_run(&shaped, source, font_size, false);
                continue;
            }

            if let Some(limit_width) = limit
                && !line.is_blank()
                && line.projected_width(&shaped, source, font_size) > limit_width
            {
                buffers.push(std::mem::take(&mut line));
            }

            line.push_run(&shaped, source, font_size, true);
        }

        buffers.push(line);
    }

    // Stage 2
    let natural_height = line_metrics.ascent - line_metrics.descent;
    let line_height = style
        .line_height
        .unwrap_or(natural_height + line_metrics.line_gap)
        .max(0.0);

    let widest = buffers
        .iter()
        .map(|line| line.content_width)
        .fold(0.0f32, f32::max);
    let target_width = style.max_width.unwrap_or(widest);

    let mut lines = Vec::with_capacity(buffers.len());
    let mut cursor_y = 0.0;

    for buffer in buffers {
        let width = buffer.content_width;
        let offset = match style.horizontal_align {
            HorizontalAlign::Left => 0.0,
            HorizontalAlign::Center => (target_width - width) / 2.0,
            HorizontalAlign::Right => target_width - width,
        };

        let top = cursor_y;
        let bottom = top + line_height;
        // Glyphs sit centred inside the line box, as in most UI toolkits.
        let baseline = top + (line_height - natural_height) / 2.0 + line_metrics.ascent;

        let glyphs = buffer
            .glyphs
            .iter()
            .map(|glyph| PlacedGlyph {
                glyph_index: glyph.glyph_index,
                x: offset + glyph.origin_x + glyph.metrics.xmin,
                y: baseline - (glyph.metrics.ymin + glyph.metrics.height),
            })
            .collect();

        lines.push(MeasuredLine {
            extents: LineExtents {
                left: offset,
                right: offset + width,
                top,
                bottom,
            },
            baseline,
            glyphs,
        });

        cursor_y = bottom;
    }

    log::trace!(
        "Measured {} line(s), {}x{}",
        lines.len(),
        target_width,
        cursor_y
    );

    MeasuredText {
        font_size,
        width: target_width,
        height: cursor_y,
        lines,
    }
}

#[derive(Clone, Copy)]
struct Run<'a> {
    text: &'a str,
    is_space: bool,
}

/// Splits a paragraph into alternating whitespace and word runs.
fn runs(paragraph: &str) -> impl Iterator<Item = Run<'_>> {
    let mut rest = paragraph;
    std::iter::from_fn(move || {
        let first = rest.chars().next()?;
        let is_space = first.is_whitespace();
        let end = rest
            .char_indices()
            .find(|(_, ch)| ch.is_whitespace() != is_space)
            .map(|(index, _)| index)
            .unwrap_or(rest.len());
        let (text, tail) = rest.split_at(end);
        rest = tail;
        Some(Run { text, is_space })
    })
}

struct ShapedGlyph {
    glyph_index: u16,
    metrics: GlyphMetrics,
}

fn shape_run(run: Run<'_>, source: &impl GlyphSource, font_size: f32) -> Vec<ShapedGlyph> {
    run.text
        .chars()
        .map(|ch| {
            let glyph_index = source.glyph_index(ch);
            ShapedGlyph {
                glyph_index,
                metrics: source.glyph_metrics(glyph_index, font_size),
            }
        })
        .collect()
}

struct BufferedGlyph {
    glyph_index: u16,
    origin_x: f32,
    metrics: GlyphMetrics,
}

/// Glyphs of one line with their pen positions relative to the line start.
#[derive(Default)]
struct LineBuffer {
    glyphs: Vec<BufferedGlyph>,
    pen_x: f32,
    /// Pen position after the last non-whitespace glyph; trailing spaces do
    /// not widen the line.
    content_width: f32,
    has_content: bool,
}

impl LineBuffer {
    fn is_blank(&self) -> bool {
        !self.has_content
    }

    fn kerning_before(&self, next: u16, source: &impl GlyphSource, font_size: f32) -> f32 {
        self.glyphs
            .last()
            .and_then(|last| source.kerning(last.glyph_index, next, font_size))
            .unwrap_or(0.0)
    }

    /// Content width if `run` were appended, without mutating the buffer.
    fn projected_width(
        &self,
        run: &[ShapedGlyph],
        source: &impl GlyphSource,
        font_size: f32,
    ) -> f32 {
        let Some(first) = run.first() else {
            return self.content_width;
        };

        let mut pen = self.pen_x + self.kerning_before(first.glyph_index, source, font_size);
        let mut previous: Option<u16> = None;
        for glyph in run {
            if let Some(prev) = previous {
                pen += source
                    .kerning(prev, glyph.glyph_index, font_size)
                    .unwrap_or(0.0);
            }
            pen += glyph.metrics.advance_width;
            previous = Some(glyph.glyph_index);
        }
        pen
    }

    fn push_run(
        &mut self,
        run: &[ShapedGlyph],
        source: &impl GlyphSource,
        font_size: f32,
        counts_as_content: bool,
    ) {
        for glyph in run {
            self.pen_x += self.kerning_before(glyph.glyph_index, source, font_size);
            self.glyphs.push(BufferedGlyph {
                glyph_index: glyph.glyph_index,
                origin_x: self.pen_x,
                metrics: glyph.metrics,
            });
            self.pen_x += glyph.metrics.advance_width;
        }

        if counts_as_content && !run.is_empty() {
            self.content_width = self.pen_x;
            self.has_content = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Monospace fake: every glyph advances by `advance`, glyph index is the
    /// char code, and "AV" kerns by -2.
    struct FixedSource {
        advance: f32,
    }

    impl GlyphSource for FixedSource {
        fn glyph_index(&self, ch: char) -> u16 {
            ch as u16
        }

        fn glyph_metrics(&self, glyph_index: u16, _font_size: f32) -> GlyphMetrics {
            let is_space = char::from_u32(glyph_index as u32)
                .map(char::is_whitespace)
                .unwrap_or(false);
            GlyphMetrics {
                xmin: 1.0,
                ymin: 0.0,
                width: if is_space { 0.0 } else { self.advance - 2.0 },
                height: if is_space { 0.0 } else { 8.0 },
                advance_width: self.advance,
            }
        }

        fn kerning(&self, left: u16, right: u16, _font_size: f32) -> Option<f32> {
            (left == 'A' as u16 && right == 'V' as u16).then_some(-2.0)
        }

        fn line_metrics(&self, _font_size: f32) -> Option<SourceLineMetrics> {
            Some(SourceLineMetrics {
                ascent: 8.0,
                descent: -2.0,
                line_gap: 0.0,
            })
        }
    }

    struct NoMetrics;

    impl GlyphSource for NoMetrics {
        fn glyph_index(&self, _ch: char) -> u16 {
            0
        }

        fn glyph_metrics(&self, _glyph_index: u16, _font_size: f32) -> GlyphMetrics {
            GlyphMetrics::default()
        }

        fn kerning(&self, _left: u16, _right: u16, _font_size: f32) -> Option<f32> {
            None
        }

        fn line_metrics(&self, _font_size: f32) -> Option<SourceLineMetrics> {
            None
        }
    }

    fn left_style() -> TextStyle {
        TextStyle {
            font_size: 10.0,
            line_height: None,
            horizontal_align: HorizontalAlign::Left,
            max_width: None,
            wrap_style: WrapStyle::NoWrap,
        }
    }

    fn widths(text: &MeasuredText) -> Vec<f32> {
        (0..text.line_count()).map(|i| text.line_width(i)).collect()
    }

    #[test]
    fn test_hard_breaks_make_lines() {
        let source = FixedSource { advance: 10.0 };
        let text = measure("ab\nabcd\n", &source, &left_style());

        assert_eq!(text.line_count(), 3);
        assert_eq!(widths(&text), vec![20.0, 40.0, 0.0]);
        assert_eq!(text.width, 40.0);
        assert_eq!(text.height, 30.0);
        assert_eq!(text.line_top(1), 10.0);
        assert_eq!(text.line_bottom(1), 20.0);
    }

    #[test]
    fn test_trailing_spaces_do_not_widen_line() {
        let source = FixedSource { advance: 10.0 };
        let text = measure("ab   ", &source, &left_style());

        assert_eq!(widths(&text), vec![20.0]);
        assert_eq!(text.lines[0].glyphs.len(), 5);
    }

    #[test]
    fn test_word_wrap_breaks_after_trailing_space() {
        let source = FixedSource { advance: 10.0 };
        let style = TextStyle {
            max_width: Some(50.0),
            wrap_style: WrapStyle::WordWrap,
            ..left_style()
        };
        let text = measure("the words made", &source, &style);

        assert_eq!(widths(&text), vec![30.0, 50.0, 40.0]);
        // The separating space stays on the line it ends.
        assert_eq!(text.lines[0].glyphs.len(), 4);
        assert_eq!(text.lines[1].glyphs.len(), 6);
        // "words" starts its line at x = 0 rather than after a space.
        assert_eq!(text.lines[1].glyphs[0].x, 1.0);
    }

    #[test]
    fn test_overlong_word_keeps_its_own_line() {
        let source = FixedSource { advance: 10.0 };
        let style = TextStyle {
            max_width: Some(30.0),
            wrap_style: WrapStyle::WordWrap,
            ..left_style()
        };
        let text = measure("a abcdef b", &source, &style);

        assert_eq!(widths(&text), vec![10.0, 60.0, 10.0]);
    }

    #[test]
    fn test_no_wrap_ignores_max_width() {
        let source = FixedSource { advance: 10.0 };
        let style = TextStyle {
            max_width: Some(30.0),
            ..left_style()
        };
        let text = measure("a abcdef b", &source, &style);

        assert_eq!(text.line_count(), 1);
        assert_eq!(text.width, 30.0);
    }

    #[test]
    fn test_center_alignment_offsets_lines() {
        let source = FixedSource { advance: 10.0 };
        let style = TextStyle {
            horizontal_align: HorizontalAlign::Center,
            max_width: Some(100.0),
            ..left_style()
        };
        let text = measure("ab\nabcd", &source, &style);

        assert_eq!(text.line_left(0), 40.0);
        assert_eq!(text.line_right(0), 60.0);
        assert_eq!(text.line_left(1), 30.0);
        assert_eq!(text.line_right(1), 70.0);
    }

    #[test]
    fn test_centred_wrapped_lines_share_canvas_midline() {
        let source = FixedSource { advance: 10.0 };
        let style = TextStyle {
            horizontal_align: HorizontalAlign::Center,
            max_width: Some(480.0),
            wrap_style: WrapStyle::WordWrap,
            ..left_style()
        };
        let text = measure("In the\nbeginning were\nthe words", &source, &style);

        for i in 0..text.line_count() {
            assert_eq!((text.line_left(i) + text.line_right(i)) / 2.0, 240.0);
        }
    }

    #[test]
    fn test_right_alignment_uses_widest_line() {
        let source = FixedSource { advance: 10.0 };
        let style = TextStyle {
            horizontal_align: HorizontalAlign::Right,
            ..left_style()
        };
        let text = measure("ab\nabcd", &source, &style);

        assert_eq!(text.line_left(0), 20.0);
        assert_eq!(text.line_right(0), 40.0);
        assert_eq!(text.line_left(1), 0.0);
    }

    #[test]
    fn test_kerning_applies_between_glyphs() {
        let source = FixedSource { advance: 10.0 };
        let text = measure("AV", &source, &left_style());

        assert_eq!(widths(&text), vec![18.0]);
        assert_eq!(text.lines[0].glyphs[1].x, 9.0);
    }

    #[test]
    fn test_custom_line_height_centres_glyphs() {
        let source = FixedSource { advance: 10.0 };
        let style = TextStyle {
            line_height: Some(30.0),
            ..left_style()
        };
        let text = measure("a\nb", &source, &style);

        assert_eq!(text.line_top(1), 30.0);
        assert_eq!(text.line_bottom(1), 60.0);
        // (30 - 10) / 2 + ascent 8
        assert_eq!(text.lines[0].baseline, 18.0);
        assert_eq!(text.lines[0].glyphs[0].y, 10.0);
    }

    #[test]
    fn test_missing_line_metrics_yield_empty_layout() {
        let text = measure("hello", &NoMetrics, &left_style());
        assert_eq!(text.line_count(), 0);
    }
}
