//! Computational geometry primitives in 2d cartesian space: orientation of point triplets, segment intersection,
//! ring winding and point-in-ring tests, bounding rectangles.

mod contour;
mod orient;
mod point;
mod rect;
mod segment;

pub use contour::{CartesianClosedContour, Winding};
pub use orient::Orientation;
pub use point::CartesianPoint2d;
pub use rect::Rect;
pub use segment::{Segment, SegmentIntersection};
