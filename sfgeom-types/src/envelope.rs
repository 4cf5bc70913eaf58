use serde::{Deserialize, Serialize};

use crate::cartesian::Rect;
use crate::point::{CrsRef, Point};

/// Axis aligned bounding box of a geometry in the geometry's CRS.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    bounds: Rect,
    crs: Option<CrsRef>,
}

impl Envelope {
    /// Creates a new envelope from the given bounds.
    pub fn new(bounds: Rect, crs: Option<CrsRef>) -> Self {
        Self { bounds, crs }
    }

    /// Envelope of the points. `None` if there are no points.
    pub fn from_points<'a>(
        points: impl Iterator<Item = &'a Point>,
        crs: Option<CrsRef>,
    ) -> Option<Self> {
        Rect::from_points(points).map(|bounds| Self::new(bounds, crs))
    }

    /// Corner with minimal ordinates.
    pub fn min(&self) -> Point {
        Point::new(self.bounds.x_min, self.bounds.y_min).with_crs(self.crs.clone())
    }

    /// Corner with maximal ordinates.
    pub fn max(&self) -> Point {
        Point::new(self.bounds.x_max, self.bounds.y_max).with_crs(self.crs.clone())
    }

    /// Bounds as a rectangle.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// CRS of the envelope, if specified.
    pub fn crs(&self) -> Option<&CrsRef> {
        self.crs.as_ref()
    }

    /// Smallest envelope containing both envelopes. The CRS of `self` is kept.
    pub fn merge(&self, other: &Envelope) -> Self {
        Self::new(self.bounds.merge(other.bounds), self.crs.clone())
    }

    /// True if the point is inside or on the border of the envelope.
    pub fn contains(&self, point: &Point) -> bool {
        self.bounds.contains(point)
    }
}
