use serde::{Deserialize, Serialize};

use crate::curve_segment::{ArcString, CurveSegment, LineStringSegment};
use crate::error::{EntityKind, MalformedGeometryError, Violation};
use crate::geometry_type::{CurveType, SegmentType};
use crate::map::{map_all, MapPoints};
use crate::point::{uniform_dimensions, CrsRef, Point};

/// Curve with exactly one [`LineStringSegment`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineString {
    segment: CurveSegment,
    crs: Option<CrsRef>,
}

impl LineString {
    /// Creates a new line string from at least two points.
    pub fn new(points: Vec<Point>) -> Result<Self, MalformedGeometryError> {
        Ok(Self::from_segment(LineStringSegment::new(points)?))
    }

    /// Wraps the segment into a line string.
    pub fn from_segment(segment: LineStringSegment) -> Self {
        Self {
            segment: CurveSegment::LineStringSegment(segment),
            crs: None,
        }
    }

    /// Control points of the line string.
    pub fn control_points(&self) -> &[Point] {
        self.segment.control_points()
    }

    /// The only segment of the line string.
    pub fn segment(&self) -> &CurveSegment {
        &self.segment
    }

    pub(crate) fn into_parts(self) -> (CurveSegment, Option<CrsRef>) {
        (self.segment, self.crs)
    }
}

/// Curve built of one or more contiguous segments of any kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentedCurve {
    segments: Vec<CurveSegment>,
    crs: Option<CrsRef>,
}

impl SegmentedCurve {
    /// Creates a new curve. The end point of each segment must be equal to the start point of the next one.
    pub fn new(segments: Vec<CurveSegment>) -> Result<Self, MalformedGeometryError> {
        if segments.is_empty() {
            return Err(MalformedGeometryError::new(
                EntityKind::Curve,
                Violation::TooFewMembers {
                    required: 1,
                    found: 0,
                },
            ));
        }

        uniform_dimensions(segments.iter().map(|s| Some(s.has_z())), EntityKind::Curve)?;
        if let Some(member) = segments
            .windows(2)
            .position(|pair| pair[0].end_point() != pair[1].start_point())
        {
            return Err(MalformedGeometryError::new(
                EntityKind::Curve,
                Violation::CurveDiscontinuity { member },
            ));
        }

        Ok(Self::new_unchecked(segments))
    }

    /// Creates a new curve without checking any invariants. Intended for feeding deliberately broken geometries to
    /// the validator.
    pub fn new_unchecked(segments: Vec<CurveSegment>) -> Self {
        Self {
            segments,
            crs: None,
        }
    }

    /// Segments of the curve.
    pub fn segments(&self) -> &[CurveSegment] {
        &self.segments
    }
}

/// Sequence of curves, each member starting where the previous one ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeCurve {
    members: Vec<Curve>,
    crs: Option<CrsRef>,
}

/// In SQL/MM text the composite curve is called compound curve.
pub type CompoundCurve = CompositeCurve;

impl CompositeCurve {
    /// Creates a new composite curve from at least two contiguous members.
    pub fn new(members: Vec<Curve>) -> Result<Self, MalformedGeometryError> {
        if members.len() < 2 {
            return Err(MalformedGeometryError::new(
                EntityKind::CompositeCurve,
                Violation::TooFewMembers {
                    required: 2,
                    found: members.len(),
                },
            ));
        }

        uniform_dimensions(
            members.iter().map(Curve::has_z),
            EntityKind::CompositeCurve,
        )?;
        if let Some(member) = members
            .windows(2)
            .position(|pair| pair[0].end_point() != pair[1].start_point())
        {
            return Err(MalformedGeometryError::new(
                EntityKind::CompositeCurve,
                Violation::CurveDiscontinuity { member },
            ));
        }

        Ok(Self::new_unchecked(members))
    }

    /// Creates a new composite curve without checking any invariants. Intended for feeding deliberately broken
    /// geometries to the validator.
    pub fn new_unchecked(members: Vec<Curve>) -> Self {
        Self { members, crs: None }
    }

    /// Member curves.
    pub fn members(&self) -> &[Curve] {
        &self.members
    }
}

/// A 1-dimensional geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Curve {
    /// Single line string segment.
    LineString(LineString),
    /// Arbitrary segments, typically a single arc string.
    Curve(SegmentedCurve),
    /// Contiguous sequence of curves.
    CompositeCurve(CompositeCurve),
}

impl Curve {
    /// Creates a line string curve.
    pub fn line_string(points: Vec<Point>) -> Result<Self, MalformedGeometryError> {
        Ok(Self::LineString(LineString::new(points)?))
    }

    /// Creates a curve with a single arc string segment.
    pub fn arc_string(points: Vec<Point>) -> Result<Self, MalformedGeometryError> {
        let segment = CurveSegment::ArcString(ArcString::new(points)?);
        Ok(Self::Curve(SegmentedCurve::new_unchecked(vec![segment])))
    }

    /// Creates a composite curve.
    pub fn composite(members: Vec<Curve>) -> Result<Self, MalformedGeometryError> {
        Ok(Self::CompositeCurve(CompositeCurve::new(members)?))
    }

    /// Kind of the curve.
    pub fn curve_type(&self) -> CurveType {
        match self {
            Curve::LineString(_) => CurveType::LineString,
            Curve::Curve(_) => CurveType::Curve,
            Curve::CompositeCurve(_) => CurveType::CompositeCurve,
        }
    }

    /// All segments of the curve, with composite members flattened.
    pub fn curve_segments(&self) -> Vec<&CurveSegment> {
        let mut segments = Vec::new();
        self.collect_segments(&mut segments);
        segments
    }

    fn collect_segments<'a>(&'a self, target: &mut Vec<&'a CurveSegment>) {
        match self {
            Curve::LineString(ls) => target.push(&ls.segment),
            Curve::Curve(c) => target.extend(c.segments.iter()),
            Curve::CompositeCurve(c) => {
                for member in &c.members {
                    member.collect_segments(target);
                }
            }
        }
    }

    /// All control points of the curve: the points of all segments in order. Junction points of contiguous
    /// segments are listed twice.
    pub fn control_points(&self) -> impl Iterator<Item = &Point> {
        self.curve_segments()
            .into_iter()
            .flat_map(|segment| segment.control_points().iter())
    }

    /// First control point. `None` only for curves constructed without invariant checks.
    pub fn start_point(&self) -> Option<&Point> {
        match self {
            Curve::LineString(ls) => Some(ls.segment.start_point()),
            Curve::Curve(c) => c.segments.first().map(CurveSegment::start_point),
            Curve::CompositeCurve(c) => c.members.first().and_then(Curve::start_point),
        }
    }

    /// Last control point. `None` only for curves constructed without invariant checks.
    pub fn end_point(&self) -> Option<&Point> {
        match self {
            Curve::LineString(ls) => Some(ls.segment.end_point()),
            Curve::Curve(c) => c.segments.last().map(CurveSegment::end_point),
            Curve::CompositeCurve(c) => c.members.last().and_then(Curve::end_point),
        }
    }

    /// True if the first and the last control points are equal.
    pub fn is_closed(&self) -> bool {
        match (self.start_point(), self.end_point()) {
            (Some(start), Some(end)) => start == end,
            _ => false,
        }
    }

    /// True if the curve has no arc segments.
    pub fn is_linear(&self) -> bool {
        self.curve_segments()
            .iter()
            .all(|s| s.segment_type() == SegmentType::LineStringSegment)
    }

    /// Whether the points of the curve have the third ordinate. `None` for an empty curve.
    pub fn has_z(&self) -> Option<bool> {
        self.start_point().map(Point::has_z)
    }

    /// CRS of the curve, if specified.
    pub fn crs(&self) -> Option<&CrsRef> {
        match self {
            Curve::LineString(ls) => ls.crs.as_ref(),
            Curve::Curve(c) => c.crs.as_ref(),
            Curve::CompositeCurve(c) => c.crs.as_ref(),
        }
    }

    /// Sets the CRS of the curve and all of its parts.
    pub fn with_crs(self, crs: Option<CrsRef>) -> Self {
        self.replace_crs(crs)
    }
}

impl From<LineString> for Curve {
    fn from(value: LineString) -> Self {
        Self::LineString(value)
    }
}

impl From<SegmentedCurve> for Curve {
    fn from(value: SegmentedCurve) -> Self {
        Self::Curve(value)
    }
}

impl From<CompositeCurve> for Curve {
    fn from(value: CompositeCurve) -> Self {
        Self::CompositeCurve(value)
    }
}

impl MapPoints for Curve {
    fn try_map_points<E, F>(&self, crs: &Option<CrsRef>, f: &mut F) -> Result<Self, E>
    where
        F: FnMut(&Point) -> Result<Point, E>,
    {
        Ok(match self {
            Curve::LineString(ls) => Curve::LineString(LineString {
                segment: ls.segment.try_map_points(crs, f)?,
                crs: crs.clone(),
            }),
            Curve::Curve(c) => Curve::Curve(SegmentedCurve {
                segments: map_all(&c.segments, crs, f)?,
                crs: crs.clone(),
            }),
            Curve::CompositeCurve(c) => Curve::CompositeCurve(CompositeCurve {
                members: map_all(&c.members, crs, f)?,
                crs: crs.clone(),
            }),
        })
    }
}
