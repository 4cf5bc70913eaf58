use serde::{Deserialize, Serialize};

use crate::error::{EntityKind, MalformedGeometryError, Violation};
use crate::geometry_type::SegmentType;
use crate::map::{map_all, MapPoints};
use crate::point::{check_dimensions, CrsRef, Point};

/// Sequence of at least two points interpolated linearly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineStringSegment {
    points: Vec<Point>,
}

impl LineStringSegment {
    /// Creates a new segment.
    pub fn new(points: Vec<Point>) -> Result<Self, MalformedGeometryError> {
        if points.len() < 2 {
            return Err(MalformedGeometryError::new(
                EntityKind::LineStringSegment,
                Violation::TooFewPoints {
                    required: 2,
                    found: points.len(),
                },
            ));
        }

        check_dimensions(&points, EntityKind::LineStringSegment)?;
        Ok(Self { points })
    }

    /// Control points of the segment.
    pub fn control_points(&self) -> &[Point] {
        &self.points
    }

    /// First point.
    pub fn start_point(&self) -> &Point {
        &self.points[0]
    }

    /// Last point.
    pub fn end_point(&self) -> &Point {
        &self.points[self.points.len() - 1]
    }
}

/// Sequence of circular arcs. Each consecutive triple of control points (start, mid, end) defines one arc, the end
/// point of an arc being the start point of the next one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArcString {
    points: Vec<Point>,
}

impl ArcString {
    /// Creates a new arc string. The number of points must be odd and not less than 3.
    pub fn new(points: Vec<Point>) -> Result<Self, MalformedGeometryError> {
        if points.len() < 3 || points.len() % 2 == 0 {
            return Err(MalformedGeometryError::new(
                EntityKind::ArcString,
                Violation::ArcStringPointCount(points.len()),
            ));
        }

        check_dimensions(&points, EntityKind::ArcString)?;
        Ok(Self { points })
    }

    /// Control points of the arc string.
    pub fn control_points(&self) -> &[Point] {
        &self.points
    }

    /// Number of arcs.
    pub fn num_arcs(&self) -> usize {
        self.points.len() / 2
    }

    /// Iterates over (start, mid, end) triples of the arcs.
    pub fn arcs(&self) -> impl Iterator<Item = (&Point, &Point, &Point)> {
        (0..self.num_arcs()).map(|i| {
            (
                &self.points[2 * i],
                &self.points[2 * i + 1],
                &self.points[2 * i + 2],
            )
        })
    }

    /// First point.
    pub fn start_point(&self) -> &Point {
        &self.points[0]
    }

    /// Last point.
    pub fn end_point(&self) -> &Point {
        &self.points[self.points.len() - 1]
    }
}

/// Part of a curve with a uniform interpolation method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CurveSegment {
    /// Linear interpolation.
    LineStringSegment(LineStringSegment),
    /// Circular arcs.
    ArcString(ArcString),
}

impl CurveSegment {
    /// Kind of the segment.
    pub fn segment_type(&self) -> SegmentType {
        match self {
            CurveSegment::LineStringSegment(_) => SegmentType::LineStringSegment,
            CurveSegment::ArcString(_) => SegmentType::ArcString,
        }
    }

    /// Control points of the segment.
    pub fn control_points(&self) -> &[Point] {
        match self {
            CurveSegment::LineStringSegment(s) => s.control_points(),
            CurveSegment::ArcString(s) => s.control_points(),
        }
    }

    /// First point.
    pub fn start_point(&self) -> &Point {
        match self {
            CurveSegment::LineStringSegment(s) => s.start_point(),
            CurveSegment::ArcString(s) => s.start_point(),
        }
    }

    /// Last point.
    pub fn end_point(&self) -> &Point {
        match self {
            CurveSegment::LineStringSegment(s) => s.end_point(),
            CurveSegment::ArcString(s) => s.end_point(),
        }
    }

    /// True if the points of the segment have the third ordinate.
    pub fn has_z(&self) -> bool {
        self.start_point().has_z()
    }
}

impl From<LineStringSegment> for CurveSegment {
    fn from(value: LineStringSegment) -> Self {
        Self::LineStringSegment(value)
    }
}

impl From<ArcString> for CurveSegment {
    fn from(value: ArcString) -> Self {
        Self::ArcString(value)
    }
}

impl MapPoints for CurveSegment {
    fn try_map_points<E, F>(&self, crs: &Option<CrsRef>, f: &mut F) -> Result<Self, E>
    where
        F: FnMut(&Point) -> Result<Point, E>,
    {
        Ok(match self {
            CurveSegment::LineStringSegment(s) => {
                CurveSegment::LineStringSegment(LineStringSegment {
                    points: map_all(&s.points, crs, f)?,
                })
            }
            CurveSegment::ArcString(s) => CurveSegment::ArcString(ArcString {
                points: map_all(&s.points, crs, f)?,
            }),
        })
    }
}
