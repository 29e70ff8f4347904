use euclid::default::Box2D;

use crate::text::TextLayout;

/// Padded rectangle behind one line of text.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LineBand {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl LineBand {
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn to_box2d(&self) -> Box2D<f32> {
        Box2D::new(
            euclid::point2(self.left, self.top),
            euclid::point2(self.right, self.bottom),
        )
    }
}

/// How a neighbouring line's width compares with the current line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NeighborWidth {
    /// First line has no previous line, last line has no next one.
    Absent,
    /// The neighbour is strictly narrower than the current line.
    Narrower,
    /// The neighbour is as wide as, or wider than, the current line.
    NotNarrower,
}

impl NeighborWidth {
    fn compare(current: f32, neighbor: Option<f32>) -> Self {
        match neighbor {
            None => Self::Absent,
            Some(width) if current > width => Self::Narrower,
            Some(_) => Self::NotNarrower,
        }
    }

    /// Corners facing this neighbour pinch only when it is at least as wide.
    pub fn pinches(self) -> bool {
        matches!(self, Self::NotNarrower)
    }
}

/// Per-line corner decision handed to the path builder.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CornerPolicy {
    pub previous: NeighborWidth,
    pub next: NeighborWidth,
}

impl CornerPolicy {
    pub fn top_pinch(&self) -> bool {
        self.previous.pinches()
    }

    pub fn bottom_pinch(&self) -> bool {
        self.next.pinches()
    }
}

/// Computes the background band and corner policy of every line.
///
/// Bands are widened by `horizontal_margin` on both sides and clamped to
/// `[0, canvas_width]`. Their top and bottom are truncated toward zero, with
/// `vertical_overlap_fix` added to the bottom first so adjacent bands overlap
/// instead of leaving hairline seams.
///
/// Widths are compared on the raw, unpadded line extents.
pub fn extract<L: TextLayout + ?Sized>(
    layout: &L,
    canvas_width: f32,
    horizontal_margin: f32,
    vertical_overlap_fix: f32,
) -> Vec<(LineBand, CornerPolicy)> {
    let line_count = layout.line_count();
    let mut out = Vec::with_capacity(line_count);

    for i in 0..line_count {
        let line_left = layout.line_left(i);
        let line_right = layout.line_right(i);
        debug_assert!(line_left <= line_right, "line {i} has right < left");

        let width = line_right - line_left;
        let previous = (i > 0).then(|| layout.line_width(i - 1));
        let next = (i + 1 < line_count).then(|| layout.line_width(i + 1));

        let band = LineBand {
            left: (line_left - horizontal_margin).max(0.0),
            right: (line_right + horizontal_margin).min(canvas_width),
            top: layout.line_top(i).trunc(),
            bottom: (layout.line_bottom(i) + vertical_overlap_fix).trunc(),
        };

        let policy = CornerPolicy {
            previous: NeighborWidth::compare(width, previous),
            next: NeighborWidth::compare(width, next),
        };

        out.push((band, policy));
    }

    out
}
