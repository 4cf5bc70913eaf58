//! Error types used by the crate.

use std::fmt::{Display, Formatter};

use thiserror::Error;

/// Kind of the entity that failed structural validation during construction.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// [`Point`](crate::Point).
    Point,
    /// [`LineStringSegment`](crate::LineStringSegment).
    LineStringSegment,
    /// [`ArcString`](crate::ArcString).
    ArcString,
    /// [`SegmentedCurve`](crate::SegmentedCurve).
    Curve,
    /// [`CompositeCurve`](crate::CompositeCurve).
    CompositeCurve,
    /// [`Ring`](crate::Ring).
    Ring,
    /// [`Polygon`](crate::Polygon).
    Polygon,
    /// [`MultiGeometry`](crate::MultiGeometry).
    MultiGeometry,
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EntityKind::Point => "point",
            EntityKind::LineStringSegment => "line string segment",
            EntityKind::ArcString => "arc string",
            EntityKind::Curve => "curve",
            EntityKind::CompositeCurve => "composite curve",
            EntityKind::Ring => "ring",
            EntityKind::Polygon => "polygon",
            EntityKind::MultiGeometry => "multi geometry",
        };

        f.write_str(name)
    }
}

/// Structural invariant that was violated.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Error)]
pub enum Violation {
    /// A point must have 2 or 3 ordinates.
    #[error("a point must have 2 or 3 ordinates, got {0}")]
    OrdinateCount(usize),
    /// Not enough points to build the entity.
    #[error("at least {required} points are required, got {found}")]
    TooFewPoints {
        /// Minimal number of points.
        required: usize,
        /// Number of points given.
        found: usize,
    },
    /// Arc string must have an odd number of control points that is at least 3.
    #[error("arc string must have an odd number (>= 3) of control points, got {0}")]
    ArcStringPointCount(usize),
    /// First and last control points of a ring differ.
    #[error("first and last control points are not equal")]
    RingNotClosed,
    /// End point of the member does not match start point of the next one.
    #[error("end of member {member} does not match the start of the next member")]
    CurveDiscontinuity {
        /// Index of the member whose end point is off.
        member: usize,
    },
    /// Not enough members in a composite.
    #[error("at least {required} members are required, got {found}")]
    TooFewMembers {
        /// Minimal number of members.
        required: usize,
        /// Number of members given.
        found: usize,
    },
    /// Some points of the geometry have ordinate 2 and some do not.
    #[error("points of mixed dimensionality")]
    MixedDimensions,
    /// Member of a multi geometry is of a kind the collection does not allow.
    #[error("member {member} has a type not allowed in this collection")]
    MemberType {
        /// Index of the offending member.
        member: usize,
    },
}

/// Structural invariant was violated while constructing a geometry. Construction fails atomically: no partial
/// object is ever returned together with this error.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Error)]
#[error("malformed {entity}: {violation}")]
pub struct MalformedGeometryError {
    /// Entity that failed validation.
    pub entity: EntityKind,
    /// Invariant that was violated.
    pub violation: Violation,
}

impl MalformedGeometryError {
    /// Creates a new error.
    pub fn new(entity: EntityKind, violation: Violation) -> Self {
        Self { entity, violation }
    }
}

/// Requested operation has no defined semantics for the given geometry kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{geometry} is not supported: {reason}")]
pub struct UnsupportedGeometryError {
    /// Name of the geometry kind.
    pub geometry: String,
    /// Reason the geometry cannot be processed.
    pub reason: String,
}

impl UnsupportedGeometryError {
    /// Creates a new error.
    pub fn new(geometry: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            geometry: geometry.into(),
            reason: reason.into(),
        }
    }
}

/// Errors of geometry reprojection.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransformError {
    /// No transformation path exists between the two CRSs.
    #[error("no transformation is available from {from} to {to}")]
    UnsupportedTransformation {
        /// Source CRS name.
        from: String,
        /// Target CRS name.
        to: String,
    },
    /// CRS of the geometry cannot be determined.
    #[error("geometry has no coordinate reference system")]
    AmbiguousCrs,
    /// Projection of a point failed (e.g. the point is outside of the projection domain).
    #[error("point ({x} {y}) cannot be projected")]
    ProjectionFailed {
        /// First ordinate of the point.
        x: f64,
        /// Second ordinate of the point.
        y: f64,
    },
}
