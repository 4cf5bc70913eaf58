//! Closed enumerations used to dispatch over geometry kinds.
//!
//! Every family of the geometry model is a sum type, so consumers can `match` on it directly. These discriminants
//! are for consumers that drive their own output format (writers, converters) and want a cheap, copyable tag.
//! Enumerations marked `#[non_exhaustive]` may get more variants; a consumer must treat a value it does not know as
//! an [`UnsupportedGeometryError`](crate::error::UnsupportedGeometryError).
use serde::{Deserialize, Serialize};

/// Top level kind of a [`Geometry`](crate::Geometry).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum GeometryType {
    /// Point, curve, ring or surface.
    Primitive,
    /// Homogeneous collection of primitives.
    Multi,
}

/// Kind of a primitive geometry.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum PrimitiveType {
    /// 0-dimensional primitive.
    Point,
    /// 1-dimensional primitive (curves and rings).
    Curve,
    /// 2-dimensional primitive.
    Surface,
}

/// Kind of a [`Curve`](crate::Curve).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum CurveType {
    /// Curve with exactly one line string segment.
    LineString,
    /// Curve built of arbitrary segments (typically one arc string).
    Curve,
    /// Sequence of contiguous curves.
    CompositeCurve,
}

/// Kind of a [`Ring`](crate::Ring).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum RingType {
    /// Closed line string.
    LinearRing,
    /// Ring with a curve member that may contain arcs.
    Ring,
}

/// Kind of a [`CurveSegment`](crate::CurveSegment).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum SegmentType {
    /// Linearly interpolated sequence of points.
    LineStringSegment,
    /// Sequence of circular arcs.
    ArcString,
}

/// Kind of a [`Surface`](crate::Surface).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[non_exhaustive]
pub enum SurfaceType {
    /// Surface with a single planar patch bounded by rings.
    Polygon,
}

/// Kind of a [`MultiGeometry`](crate::MultiGeometry).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum MultiGeometryType {
    /// Collection of points.
    MultiPoint,
    /// Collection of line strings.
    MultiLineString,
    /// Collection of curves of any kind.
    MultiCurve,
    /// Collection of polygons with linear boundaries.
    MultiPolygon,
    /// Collection of surfaces of any kind.
    MultiSurface,
}
