/// Read-only view over measured text, one entry per visual line.
///
/// The background pipeline only ever needs the horizontal and vertical
/// extents of each line, so any layout engine can feed it by implementing
/// this trait. All coordinates live in the same space as the target canvas
/// with the **Y-axis going down**.
///
/// Implementors must uphold `line_left(i) <= line_right(i)` and
/// `line_top(i) <= line_bottom(i)`, and order lines from top to bottom.
/// Indices outside `0..line_count()` may panic.
pub trait TextLayout {
    fn line_count(&self) -> usize;
    fn line_left(&self, index: usize) -> f32;
    fn line_right(&self, index: usize) -> f32;
    fn line_top(&self, index: usize) -> f32;
    fn line_bottom(&self, index: usize) -> f32;

    /// Width of the line's ink, without any background padding.
    fn line_width(&self, index: usize) -> f32 {
        self.line_right(index) - self.line_left(index)
    }
}

/// Bounding extents of a single laid-out line.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LineExtents {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl LineExtents {
    pub fn new(left: f32, right: f32, top: f32, bottom: f32) -> Self {
        debug_assert!(left <= right, "line extents must satisfy left <= right");
        debug_assert!(top <= bottom, "line extents must satisfy top <= bottom");
        Self {
            left,
            right,
            top,
            bottom,
        }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }
}

impl TextLayout for [LineExtents] {
    fn line_count(&self) -> usize {
        self.len()
    }

    fn line_left(&self, index: usize) -> f32 {
        self[index].left
    }

    fn line_right(&self, index: usize) -> f32 {
        self[index].right
    }

    fn line_top(&self, index: usize) -> f32 {
        self[index].top
    }

    fn line_bottom(&self, index: usize) -> f32 {
        self[index].bottom
    }
}

impl TextLayout for Vec<LineExtents> {
    fn line_count(&self) -> usize {
        self.as_slice().line_count()
    }

    fn line_left(&self, index: usize) -> f32 {
        self.as_slice().line_left(index)
    }

    fn line_right(&self, index: usize) -> f32 {
        self.as_slice().line_right(index)
    }

    fn line_top(&self, index: usize) -> f32 {
        self.as_slice().line_top(index)
    }

    fn line_bottom(&self, index: usize) -> f32 {
        self.as_slice().line_bottom(index)
    }
}
