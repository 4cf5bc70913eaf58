use nalgebra::Point2;
use num_traits::{One, Zero};
use serde::{Deserialize, Serialize};

use crate::cartesian::{CartesianPoint2d, Segment};

/// Direction in which a closed contour goes around its interior.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Winding {
    /// Clockwise
    Clockwise,
    /// Counterclockwise
    CounterClockwise,
}

/// Closed sequence of points in 2d cartesian space.
///
/// The contour is closed implicitly: if the last point is not equal to the first one, the segment between them is
/// still a part of the contour. This trait is implemented for slices of any cartesian points.
pub trait CartesianClosedContour {
    /// Type of the points of the contour.
    type Point: CartesianPoint2d;

    /// Iterates over the segments of the contour, including the closing one if the contour is not closed explicitly.
    fn iter_segments_closing(&self) -> impl Iterator<Item = Segment<'_, Self::Point>>;

    /// Signed area of the contour: positive for counterclockwise contours, negative for clockwise ones.
    fn area_signed(&self) -> <Self::Point as CartesianPoint2d>::Num;

    /// Winding of the contour. Degenerate contours (zero area) are considered clockwise.
    fn winding(&self) -> Winding {
        if self.area_signed() <= Zero::zero() {
            Winding::Clockwise
        } else {
            Winding::CounterClockwise
        }
    }

    /// Returns true if the `point` lies on one of the contour's segments.
    fn is_on_boundary<P>(&self, point: &P) -> bool
    where
        P: CartesianPoint2d<Num = <Self::Point as CartesianPoint2d>::Num>,
    {
        self.iter_segments_closing()
            .any(|segment| segment.distance_to_point_sq(point) == Zero::zero())
    }

    /// Returns true if the `point` lies inside the contour or on one of its segments.
    fn contains_point<P>(&self, point: &P) -> bool
    where
        P: CartesianPoint2d<Num = <Self::Point as CartesianPoint2d>::Num>;
}

impl<P: CartesianPoint2d> CartesianClosedContour for [P] {
    type Point = P;

    fn iter_segments_closing(&self) -> impl Iterator<Item = Segment<'_, P>> {
        let closing = match (self.first(), self.last()) {
            (Some(first), Some(last)) if self.len() > 1 && !first.equal(last) => {
                Some(Segment(last, first))
            }
            _ => None,
        };

        self.windows(2)
            .map(|pair| Segment(&pair[0], &pair[1]))
            .chain(closing)
    }

    fn area_signed(&self) -> P::Num {
        let mut aggr = P::Num::zero();
        for Segment(prev, p) in self.iter_segments_closing() {
            aggr = aggr + prev.x() * p.y() - p.x() * prev.y();
        }

        aggr / (P::Num::one() + P::Num::one())
    }

    fn contains_point<Point: CartesianPoint2d<Num = P::Num>>(&self, point: &Point) -> bool {
        if self.is_on_boundary(point) {
            return true;
        }

        let mut wn = 0i64;
        let x = point.x();
        let y = point.y();

        for segment in self.iter_segments_closing() {
            if segment.0.x() < x && segment.1.x() < x {
                continue;
            }

            let is_to_right = segment.0.x() > x && segment.1.x() > x || {
                let x_max = if segment.0.x() > segment.1.x() {
                    segment.0.x()
                } else {
                    segment.1.x()
                };
                let ray_p1 = Point2::new(x, y);
                let ray_p2 = Point2::new(x_max, y);
                let ray = Segment(&ray_p1, &ray_p2);

                segment.intersects(&ray)
            };

            if is_to_right {
                if segment.0.y() < y && segment.1.y() >= y {
                    wn += 1;
                } else if segment.0.y() >= y && segment.1.y() < y {
                    wn -= 1;
                }
            }
        }

        wn != 0
    }
}
