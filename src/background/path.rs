use euclid::default::Point2D;

use super::metrics::LineBand;

/// One drawing command of a [`ClosedPath`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathSegment {
    MoveTo(Point2D<f32>),
    LineTo(Point2D<f32>),
    CubicTo {
        ctrl1: Point2D<f32>,
        ctrl2: Point2D<f32>,
        to: Point2D<f32>,
    },
    Close,
}

/// A single closed contour built from straight edges and cubic corners.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClosedPath {
    segments: Vec<PathSegment>,
}

impl ClosedPath {
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Point the contour starts from.
    pub fn start(&self) -> Option<Point2D<f32>> {
        match self.segments.first()? {
            PathSegment::MoveTo(point) => Some(*point),
            _ => None,
        }
    }

    /// Last explicit end point before the closing command.
    pub fn end(&self) -> Option<Point2D<f32>> {
        self.segments.iter().rev().find_map(|segment| match segment {
            PathSegment::MoveTo(to) | PathSegment::LineTo(to) | PathSegment::CubicTo { to, .. } => {
                Some(*to)
            }
            PathSegment::Close => None,
        })
    }

    /// Every point referenced by the path, control points included.
    pub fn points(&self) -> impl Iterator<Item = Point2D<f32>> + '_ {
        self.segments.iter().flat_map(|segment| {
            let (points, len) = match *segment {
                PathSegment::MoveTo(p) | PathSegment::LineTo(p) => ([p; 3], 1),
                PathSegment::CubicTo { ctrl1, ctrl2, to } => ([ctrl1, ctrl2, to], 3),
                PathSegment::Close => ([Point2D::origin(); 3], 0),
            };
            points.into_iter().take(len)
        })
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.segments.push(PathSegment::MoveTo(euclid::point2(x, y)));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.segments.push(PathSegment::LineTo(euclid::point2(x, y)));
    }

    /// Cubic whose two control points coincide at `corner`.
    fn corner_to(&mut self, corner: Point2D<f32>, x: f32, y: f32) {
        self.segments.push(PathSegment::CubicTo {
            ctrl1: corner,
            ctrl2: corner,
            to: euclid::point2(x, y),
        });
    }

    fn close(&mut self) {
        self.segments.push(PathSegment::Close);
    }
}

/// Builds the clockwise outline of one line band.
///
/// Every corner is a cubic of radius `corner_radius` with both control points
/// on the band's true corner. Pinching only moves where the neighbouring
/// horizontal edge stops: a pinched corner ends the edge `radius` inside the
/// band, a flared one ends it `radius` outside, so the curve bends back
/// toward the band and overhangs it.
///
/// The contour starts at the top-left terminus of the top edge, which makes
/// the final corner land exactly on the starting point.
///
/// Radii above half the band's width or height are not guarded against and
/// yield overlapping corners.
pub fn build(band: &LineBand, corner_radius: f32, top_pinch: bool, bottom_pinch: bool) -> ClosedPath {
    let LineBand {
        left,
        right,
        top,
        bottom,
    } = *band;
    let r = corner_radius;

    // Horizontal offset applied to the right-hand terminus; mirrored on the left.
    let top_shift = if top_pinch { -r } else { r };
    let bottom_shift = if bottom_pinch { -r } else { r };

    let mut path = ClosedPath {
        segments: Vec::with_capacity(10),
    };

    path.move_to(left - top_shift, top);

    // top edge, top-right corner
    path.line_to(right + top_shift, top);
    path.corner_to(euclid::point2(right, top), right, top + r);

    // right edge, bottom-right corner
    path.line_to(right, bottom - r);
    path.corner_to(euclid::point2(right, bottom), right + bottom_shift, bottom);

    // bottom edge, bottom-left corner
    path.line_to(left - bottom_shift, bottom);
    path.corner_to(euclid::point2(left, bottom), left, bottom - r);

    // left edge, top-left corner
    path.line_to(left, top + r);
    path.corner_to(euclid::point2(left, top), left - top_shift, top);

    path.close();
    path
}
