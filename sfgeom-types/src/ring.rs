use serde::{Deserialize, Serialize};

use crate::curve::{CompositeCurve, Curve};
use crate::curve_segment::{CurveSegment, LineStringSegment};
use crate::error::{EntityKind, MalformedGeometryError, Violation};
use crate::geometry_type::{CurveType, RingType};
use crate::map::MapPoints;
use crate::point::{CrsRef, Point};

/// Closed line string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearRing {
    segment: CurveSegment,
    crs: Option<CrsRef>,
}

impl LinearRing {
    /// Control points of the ring.
    pub fn control_points(&self) -> &[Point] {
        self.segment.control_points()
    }
}

/// Closed ring with a single curve member that may contain arcs.
///
/// When a ring is built of several curves, they are wrapped into one [`CompositeCurve`], so the ring always has
/// exactly one member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveRing {
    member: Curve,
    crs: Option<CrsRef>,
}

impl CurveRing {
    /// The only member of the ring.
    pub fn member(&self) -> &Curve {
        &self.member
    }

    /// Members of the ring. Always contains exactly one curve.
    pub fn members(&self) -> &[Curve] {
        std::slice::from_ref(&self.member)
    }
}

/// A closed curve: boundary of a surface patch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Ring {
    /// Closed line string.
    LinearRing(LinearRing),
    /// Closed curve of arbitrary segments.
    Ring(CurveRing),
}

impl Ring {
    /// Creates a linear ring. The first and the last points must be equal.
    pub fn linear(points: Vec<Point>) -> Result<Self, MalformedGeometryError> {
        let ring = Self::linear_unchecked(LineStringSegment::new(points).map_err(as_ring_error)?);
        ring.check_closed()
    }

    /// Creates a ring from curve members. The first point of the first member must be equal to the last point of
    /// the last one.
    ///
    /// A single line string member produces a [`LinearRing`]. A single curve of any other kind becomes the only
    /// member of the ring, several curves are first combined into a [`CompositeCurve`].
    pub fn from_curves(mut members: Vec<Curve>) -> Result<Self, MalformedGeometryError> {
        let member = match members.len() {
            0 => {
                return Err(MalformedGeometryError::new(
                    EntityKind::Ring,
                    Violation::TooFewMembers {
                        required: 1,
                        found: 0,
                    },
                ))
            }
            1 => members.remove(0),
            _ => Curve::CompositeCurve(CompositeCurve::new(members)?),
        };

        Self::from_curve_unchecked(member).check_closed()
    }

    /// Creates a linear ring without checking that it is closed. Intended for feeding deliberately broken geometries
    /// to the validator.
    pub fn linear_unchecked(segment: LineStringSegment) -> Self {
        Self::LinearRing(LinearRing {
            segment: CurveSegment::LineStringSegment(segment),
            crs: None,
        })
    }

    /// Creates a ring from a single curve without checking that it is closed.
    pub fn from_curve_unchecked(member: Curve) -> Self {
        match member {
            Curve::LineString(ls) => {
                let (segment, crs) = ls.into_parts();
                Self::LinearRing(LinearRing { segment, crs })
            }
            member => {
                let crs = member.crs().cloned();
                Self::Ring(CurveRing { member, crs })
            }
        }
    }

    fn check_closed(self) -> Result<Self, MalformedGeometryError> {
        if self.is_closed() {
            Ok(self)
        } else {
            Err(MalformedGeometryError::new(
                EntityKind::Ring,
                Violation::RingNotClosed,
            ))
        }
    }

    /// Kind of the ring.
    pub fn ring_type(&self) -> RingType {
        match self {
            Ring::LinearRing(_) => RingType::LinearRing,
            Ring::Ring(_) => RingType::Ring,
        }
    }

    /// Curve type of the only member for [`Ring::Ring`], `None` for a linear ring.
    pub fn member_type(&self) -> Option<CurveType> {
        match self {
            Ring::LinearRing(_) => None,
            Ring::Ring(r) => Some(r.member.curve_type()),
        }
    }

    /// All segments of the ring.
    pub fn curve_segments(&self) -> Vec<&CurveSegment> {
        match self {
            Ring::LinearRing(r) => vec![&r.segment],
            Ring::Ring(r) => r.member.curve_segments(),
        }
    }

    /// All control points of the ring.
    pub fn control_points(&self) -> impl Iterator<Item = &Point> {
        self.curve_segments()
            .into_iter()
            .flat_map(|segment| segment.control_points().iter())
    }

    /// First control point.
    pub fn start_point(&self) -> Option<&Point> {
        match self {
            Ring::LinearRing(r) => Some(r.segment.start_point()),
            Ring::Ring(r) => r.member.start_point(),
        }
    }

    /// Last control point.
    pub fn end_point(&self) -> Option<&Point> {
        match self {
            Ring::LinearRing(r) => Some(r.segment.end_point()),
            Ring::Ring(r) => r.member.end_point(),
        }
    }

    /// True if the first and the last control points are equal. Always true for rings built with invariant checks.
    pub fn is_closed(&self) -> bool {
        match (self.start_point(), self.end_point()) {
            (Some(start), Some(end)) => start == end,
            _ => false,
        }
    }

    /// True if the ring has no arc segments.
    pub fn is_linear(&self) -> bool {
        match self {
            Ring::LinearRing(_) => true,
            Ring::Ring(r) => r.member.is_linear(),
        }
    }

    /// Whether the points of the ring have the third ordinate.
    pub fn has_z(&self) -> Option<bool> {
        self.start_point().map(Point::has_z)
    }

    /// CRS of the ring, if specified.
    pub fn crs(&self) -> Option<&CrsRef> {
        match self {
            Ring::LinearRing(r) => r.crs.as_ref(),
            Ring::Ring(r) => r.crs.as_ref(),
        }
    }

    /// Sets the CRS of the ring and all of its parts.
    pub fn with_crs(self, crs: Option<CrsRef>) -> Self {
        self.replace_crs(crs)
    }
}

fn as_ring_error(error: MalformedGeometryError) -> MalformedGeometryError {
    MalformedGeometryError::new(EntityKind::Ring, error.violation)
}

impl MapPoints for Ring {
    fn try_map_points<E, F>(&self, crs: &Option<CrsRef>, f: &mut F) -> Result<Self, E>
    where
        F: FnMut(&Point) -> Result<Point, E>,
    {
        Ok(match self {
            Ring::LinearRing(r) => Ring::LinearRing(LinearRing {
                segment: r.segment.try_map_points(crs, f)?,
                crs: crs.clone(),
            }),
            Ring::Ring(r) => Ring::Ring(CurveRing {
                member: r.member.try_map_points(crs, f)?,
                crs: crs.clone(),
            }),
        })
    }
}
