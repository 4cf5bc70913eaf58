//! Planar predicates the validator is built on. All functions work on linearized point sequences.

use sfgeom_types::cartesian::{CartesianClosedContour, Segment, SegmentIntersection};
use sfgeom_types::Point;

/// Common part of two ring boundaries.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct BoundaryIntersection {
    pub location: Point,
    pub single_point: bool,
}

/// Removes consecutive points with equal x and y.
pub(crate) fn dedup_points(mut points: Vec<Point>) -> Vec<Point> {
    points.dedup_by(|a, b| a.equals_2d(b));
    points
}

/// Finds a place where the line string crosses or touches itself. Consecutive points must be distinct.
///
/// Neighbouring segments share a vertex and only count when they overlap. In a closed line string the first and
/// the last segments are neighbours too.
pub(crate) fn find_self_intersection(points: &[Point]) -> Option<Point> {
    let segments: Vec<Segment<Point>> = points
        .windows(2)
        .map(|pair| Segment(&pair[0], &pair[1]))
        .collect();
    let closed = points.len() > 3 && points[0].equals_2d(&points[points.len() - 1]);
    let last = segments.len().saturating_sub(1);

    for i in 0..segments.len() {
        for j in (i + 1)..segments.len() {
            let adjacent = j == i + 1 || (closed && i == 0 && j == last);
            match segments[i].intersection(&segments[j]) {
                None => {}
                Some(SegmentIntersection::Point(_)) if adjacent => {}
                Some(intersection) => {
                    let location = intersection.location();
                    return Some(Point::new(location.x, location.y));
                }
            }
        }
    }

    None
}

/// Intersection of the boundaries of two rings, if any.
pub(crate) fn boundary_intersection(a: &[Point], b: &[Point]) -> Option<BoundaryIntersection> {
    let mut found: Option<BoundaryIntersection> = None;
    for sa in a.windows(2) {
        for sb in b.windows(2) {
            let Some(intersection) = Segment(&sa[0], &sa[1]).intersection(&Segment(&sb[0], &sb[1]))
            else {
                continue;
            };

            let location = intersection.location();
            let location = Point::new(location.x, location.y);
            let overlap = matches!(intersection, SegmentIntersection::Overlap(..));
            match &mut found {
                None => {
                    found = Some(BoundaryIntersection {
                        location,
                        single_point: !overlap,
                    })
                }
                Some(existing) => {
                    if overlap || !existing.location.equals_2d(&location) {
                        existing.single_point = false;
                    }
                }
            }
        }
    }

    found
}

/// True if the ring `inner` lies inside the ring `outer`: none of its points is outside and at least one is
/// strictly inside.
///
/// Every segment of `inner` is cut at the points where it meets the boundary of `outer`. A piece between two cuts
/// is either inside, outside or on the boundary as a whole, so it is enough to probe its middle.
pub(crate) fn is_within(inner: &[Point], outer: &[Point]) -> bool {
    let mut interior_hit = false;
    for pair in inner.windows(2) {
        for point in probe_points(&pair[0], &pair[1], outer) {
            if !outer.contains_point(&point) {
                return false;
            }

            if !outer.is_on_boundary(&point) {
                interior_hit = true;
            }
        }
    }

    interior_hit
}

/// Start of the segment `a-b` and the middles of its pieces between the crossings with the `ring` boundary.
fn probe_points(a: &Point, b: &Point, ring: &[Point]) -> Vec<Point> {
    let mut cuts = vec![0.0, 1.0];
    for edge in ring.windows(2) {
        match Segment(a, b).intersection(&Segment(&edge[0], &edge[1])) {
            None => {}
            Some(SegmentIntersection::Point(p)) => cuts.push(position_on(a, b, p.x, p.y)),
            Some(SegmentIntersection::Overlap(p1, p2)) => {
                cuts.push(position_on(a, b, p1.x, p1.y));
                cuts.push(position_on(a, b, p2.x, p2.y));
            }
        }
    }

    cuts.sort_by(f64::total_cmp);
    cuts.dedup();

    let at = |t: f64| Point::new(a.x() + (b.x() - a.x()) * t, a.y() + (b.y() - a.y()) * t);
    std::iter::once(a.clone())
        .chain(cuts.windows(2).map(|pair| at((pair[0] + pair[1]) / 2.0)))
        .collect()
}

/// Position of the point `(x, y)` on the segment `a-b` as a fraction of its length.
fn position_on(a: &Point, b: &Point, x: f64, y: f64) -> f64 {
    let (dx, dy) = (b.x() - a.x(), b.y() - a.y());
    let length_sq = dx * dx + dy * dy;
    if length_sq == 0.0 {
        return 0.0;
    }

    (((x - a.x()) * dx + (y - a.y()) * dy) / length_sq).clamp(0.0, 1.0)
}
