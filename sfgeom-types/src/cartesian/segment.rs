use nalgebra::Point2;
use num_traits::{One, Zero};

use crate::cartesian::{CartesianPoint2d, Orientation};

/// A straight line segment between two points.
#[derive(Debug, PartialEq)]
pub struct Segment<'a, Point>(pub &'a Point, pub &'a Point);

/// Common part of two segments.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum SegmentIntersection {
    /// Segments meet in one point.
    Point(Point2<f64>),
    /// Segments are collinear and share a stretch between the two points.
    Overlap(Point2<f64>, Point2<f64>),
}

impl SegmentIntersection {
    /// A point of the intersection.
    pub fn location(&self) -> Point2<f64> {
        match self {
            SegmentIntersection::Point(p) => *p,
            SegmentIntersection::Overlap(p, _) => *p,
        }
    }
}

impl<'a, P: CartesianPoint2d> Segment<'a, P> {
    /// Shortest euclidian distance (squared) between a point and the segment:
    ///
    /// * if the normal from the point to the segment ends inside the segment, the returned value is the squared length
    ///   of the normal
    /// * if the normal from the point to the segment ends outside of the segment, the returned value is the smaller one
    ///   of the distances between the point and the segment's endpoints
    pub fn distance_to_point_sq<Point: CartesianPoint2d<Num = P::Num>>(
        &self,
        point: &Point,
    ) -> P::Num {
        if self.0.equal(self.1) {
            return self.0.distance_sq(point);
        }

        let ds = self.1.sub(self.0);
        let dp = point.sub(self.0);
        let ds_len = ds.x * ds.x + ds.y * ds.y;

        let r = (dp.x * ds.x + dp.y * ds.y) / ds_len;
        if r <= P::Num::zero() {
            self.0.distance_sq(point)
        } else if r >= P::Num::one() {
            self.1.distance_sq(point)
        } else {
            let s = (dp.y * ds.x - dp.x * ds.y) / ds_len;
            (s * s) * ds_len
        }
    }

    /// Returns true, if the segment has at least one common point with the `other` segment.
    pub fn intersects<Point: CartesianPoint2d<Num = P::Num>>(
        &self,
        other: &Segment<Point>,
    ) -> bool {
        let o1 = Orientation::triplet(self.0, other.0, self.1);
        let o2 = Orientation::triplet(self.0, other.1, self.1);
        let o3 = Orientation::triplet(other.0, self.0, other.1);
        let o4 = Orientation::triplet(other.0, self.1, other.1);

        if o1 != o2 && o3 != o4 {
            return true;
        }

        (o1 == Orientation::Collinear && on_segment(self.0, other.0, self.1))
            || (o2 == Orientation::Collinear && on_segment(self.0, other.1, self.1))
            || (o3 == Orientation::Collinear && on_segment(other.0, self.0, other.1))
            || (o4 == Orientation::Collinear && on_segment(other.0, self.1, other.1))
    }
}

impl<'a, P: CartesianPoint2d<Num = f64>> Segment<'a, P> {
    /// Computes the common part of two segments, if there is one.
    pub fn intersection<Point: CartesianPoint2d<Num = f64>>(
        &self,
        other: &Segment<Point>,
    ) -> Option<SegmentIntersection> {
        if !self.intersects(other) {
            return None;
        }

        let r = self.1.sub(self.0);
        let s = other.1.sub(other.0);
        let qp = other.0.sub(self.0);
        let denominator = r.x * s.y - r.y * s.x;

        if denominator != 0.0 {
            let t = ((qp.x * s.y - qp.y * s.x) / denominator).clamp(0.0, 1.0);
            // Touching segments report the exact shared endpoint.
            let location = if t == 0.0 {
                to_point2(self.0)
            } else if t == 1.0 {
                to_point2(self.1)
            } else {
                Point2::new(self.0.x() + t * r.x, self.0.y() + t * r.y)
            };
            return Some(SegmentIntersection::Point(location));
        }

        // Collinear: the common part is bounded by the endpoints lying on the other segment.
        let mut shared: Vec<Point2<f64>> = Vec::with_capacity(4);
        for p in [
            to_point2(self.0),
            to_point2(self.1),
            to_point2(other.0),
            to_point2(other.1),
        ] {
            let on_self = on_segment(self.0, &p, self.1);
            let on_other = on_segment(other.0, &p, other.1);
            if on_self && on_other && !shared.contains(&p) {
                shared.push(p);
            }
        }

        match shared.as_slice() {
            [] => None,
            [p] => Some(SegmentIntersection::Point(*p)),
            [first, rest @ ..] => {
                let farthest = rest
                    .iter()
                    .copied()
                    .max_by(|a, b| {
                        a.distance_sq(first)
                            .total_cmp(&b.distance_sq(first))
                    })
                    .unwrap_or(*first);
                Some(SegmentIntersection::Overlap(*first, farthest))
            }
        }
    }
}

/// True if `q` lies within the bounding box of `p` and `r`. Meant to be called for collinear triplets.
fn on_segment<Num: num_traits::Num + PartialOrd + Copy>(
    p: &impl CartesianPoint2d<Num = Num>,
    q: &impl CartesianPoint2d<Num = Num>,
    r: &impl CartesianPoint2d<Num = Num>,
) -> bool {
    let x_max = if p.x() >= r.x() { p.x() } else { r.x() };
    let x_min = if p.x() <= r.x() { p.x() } else { r.x() };
    let y_max = if p.y() >= r.y() { p.y() } else { r.y() };
    let y_min = if p.y() <= r.y() { p.y() } else { r.y() };

    q.x() <= x_max && q.x() >= x_min && q.y() <= y_max && q.y() >= y_min
}

fn to_point2(p: &impl CartesianPoint2d<Num = f64>) -> Point2<f64> {
    Point2::new(p.x(), p.y())
}
