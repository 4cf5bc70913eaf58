use serde::{Deserialize, Serialize};

use crate::curve::Curve;
use crate::envelope::Envelope;
use crate::geometry_type::{CurveType, GeometryType, MultiGeometryType, PrimitiveType, SurfaceType};
use crate::map::MapPoints;
use crate::multi::MultiGeometry;
use crate::point::{CrsRef, Point};
use crate::ring::Ring;
use crate::surface::Surface;

/// Any geometry of the model.
///
/// An empty singular geometry (`POINT EMPTY` and the like) is not a value of this type: it is represented by the
/// absence of a geometry (`Option::None`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    /// Point.
    Point(Point),
    /// Curve.
    Curve(Curve),
    /// Closed curve.
    Ring(Ring),
    /// Surface.
    Surface(Surface),
    /// Homogeneous collection.
    Multi(MultiGeometry),
}

impl Geometry {
    /// Top level kind of the geometry.
    pub fn geometry_type(&self) -> GeometryType {
        match self {
            Geometry::Multi(_) => GeometryType::Multi,
            _ => GeometryType::Primitive,
        }
    }

    /// Kind of the primitive. `None` for collections.
    pub fn primitive_type(&self) -> Option<PrimitiveType> {
        match self {
            Geometry::Point(_) => Some(PrimitiveType::Point),
            Geometry::Curve(_) | Geometry::Ring(_) => Some(PrimitiveType::Curve),
            Geometry::Surface(_) => Some(PrimitiveType::Surface),
            Geometry::Multi(_) => None,
        }
    }

    /// Kind of the curve. `None` if the geometry is not a [`Curve`].
    pub fn curve_type(&self) -> Option<CurveType> {
        match self {
            Geometry::Curve(c) => Some(c.curve_type()),
            _ => None,
        }
    }

    /// Kind of the surface. `None` if the geometry is not a [`Surface`].
    pub fn surface_type(&self) -> Option<SurfaceType> {
        match self {
            Geometry::Surface(s) => Some(s.surface_type()),
            _ => None,
        }
    }

    /// Kind of the collection. `None` if the geometry is a primitive.
    pub fn multi_geometry_type(&self) -> Option<MultiGeometryType> {
        match self {
            Geometry::Multi(m) => Some(m.multi_geometry_type()),
            _ => None,
        }
    }

    /// CRS of the geometry, if specified.
    pub fn crs(&self) -> Option<&CrsRef> {
        match self {
            Geometry::Point(p) => p.crs(),
            Geometry::Curve(c) => c.crs(),
            Geometry::Ring(r) => r.crs(),
            Geometry::Surface(s) => s.crs(),
            Geometry::Multi(m) => m.crs(),
        }
    }

    /// True if the geometry has no circular arcs.
    pub fn is_linear(&self) -> bool {
        match self {
            Geometry::Point(_) => true,
            Geometry::Curve(c) => c.is_linear(),
            Geometry::Ring(r) => r.is_linear(),
            Geometry::Surface(s) => s.is_linear(),
            Geometry::Multi(m) => m.is_linear(),
        }
    }

    /// Sets the CRS of the geometry and all of its parts.
    pub fn with_crs(self, crs: Option<CrsRef>) -> Self {
        self.replace_crs(crs)
    }

    /// Calls `f` for every control point of the geometry in order.
    pub fn for_each_point<'a>(&'a self, f: &mut impl FnMut(&'a Point)) {
        match self {
            Geometry::Point(p) => f(p),
            Geometry::Curve(c) => c.control_points().for_each(f),
            Geometry::Ring(r) => r.control_points().for_each(f),
            Geometry::Surface(s) => surface_points(s, f),
            Geometry::Multi(MultiGeometry::MultiPoint(m)) => m.iter().for_each(f),
            Geometry::Multi(MultiGeometry::MultiLineString(m) | MultiGeometry::MultiCurve(m)) => {
                m.iter().flat_map(Curve::control_points).for_each(f)
            }
            Geometry::Multi(MultiGeometry::MultiPolygon(m) | MultiGeometry::MultiSurface(m)) => {
                m.iter().for_each(|s| surface_points(s, f))
            }
        }
    }

    /// Bounding box of the control points of the geometry. `None` if the geometry has no points (e.g. a collection
    /// of empty members).
    ///
    /// Arcs may bulge outside of the box of their control points; linearize the geometry first if exact bounds of
    /// curved geometries are required.
    pub fn envelope(&self) -> Option<Envelope> {
        let mut points = Vec::new();
        self.for_each_point(&mut |p| points.push(p));
        Envelope::from_points(points.into_iter(), self.crs().cloned())
    }

    /// Whether the points of the geometry have the third ordinate. `None` if the geometry has no points.
    pub fn has_z(&self) -> Option<bool> {
        let mut has_z = None;
        self.for_each_point(&mut |p| {
            if has_z.is_none() {
                has_z = Some(p.has_z());
            }
        });
        has_z
    }
}

fn surface_points<'a>(surface: &'a Surface, f: &mut impl FnMut(&'a Point)) {
    surface
        .patches()
        .iter()
        .flat_map(|patch| patch.rings())
        .flat_map(Ring::control_points)
        .for_each(f)
}

impl MapPoints for Geometry {
    fn try_map_points<E, F>(&self, crs: &Option<CrsRef>, f: &mut F) -> Result<Self, E>
    where
        F: FnMut(&Point) -> Result<Point, E>,
    {
        Ok(match self {
            Geometry::Point(p) => Geometry::Point(p.try_map_points(crs, f)?),
            Geometry::Curve(c) => Geometry::Curve(c.try_map_points(crs, f)?),
            Geometry::Ring(r) => Geometry::Ring(r.try_map_points(crs, f)?),
            Geometry::Surface(s) => Geometry::Surface(s.try_map_points(crs, f)?),
            Geometry::Multi(m) => Geometry::Multi(m.try_map_points(crs, f)?),
        })
    }
}

impl From<Point> for Geometry {
    fn from(value: Point) -> Self {
        Self::Point(value)
    }
}

impl From<Curve> for Geometry {
    fn from(value: Curve) -> Self {
        Self::Curve(value)
    }
}

impl From<Ring> for Geometry {
    fn from(value: Ring) -> Self {
        Self::Ring(value)
    }
}

impl From<Surface> for Geometry {
    fn from(value: Surface) -> Self {
        Self::Surface(value)
    }
}

impl From<MultiGeometry> for Geometry {
    fn from(value: MultiGeometry) -> Self {
        Self::Multi(value)
    }
}
