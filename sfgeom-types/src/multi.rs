use serde::{Deserialize, Serialize};

use crate::curve::Curve;
use crate::error::{EntityKind, MalformedGeometryError, Violation};
use crate::geometry_type::{CurveType, MultiGeometryType};
use crate::map::{map_optional, MapPoints};
use crate::point::{uniform_dimensions, CrsRef, Point};
use crate::surface::Surface;

/// Ordered homogeneous collection of geometries.
///
/// A member slot may be `None`: this is how an `EMPTY` member of a collection is represented. Such a slot still
/// counts towards [`Multi::len`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Multi<T> {
    members: Vec<Option<T>>,
    crs: Option<CrsRef>,
}

impl<T> Multi<T> {
    fn new(members: Vec<Option<T>>) -> Self {
        Self { members, crs: None }
    }

    /// All member slots, including empty ones.
    pub fn members(&self) -> &[Option<T>] {
        &self.members
    }

    /// Member at the given index. `None` if the slot is empty or out of bounds.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.members.get(index).and_then(Option::as_ref)
    }

    /// Iterates over non-empty members.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.members.iter().flatten()
    }

    /// Number of member slots.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// True if the collection has no member slots.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// CRS of the collection, if specified.
    pub fn crs(&self) -> Option<&CrsRef> {
        self.crs.as_ref()
    }
}

impl<T: MapPoints> MapPoints for Multi<T> {
    fn try_map_points<E, F>(&self, crs: &Option<CrsRef>, f: &mut F) -> Result<Self, E>
    where
        F: FnMut(&Point) -> Result<Point, E>,
    {
        Ok(Self {
            members: map_optional(&self.members, crs, f)?,
            crs: crs.clone(),
        })
    }
}

/// Homogeneous collection of primitives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MultiGeometry {
    /// Points.
    MultiPoint(Multi<Point>),
    /// Curves of [`CurveType::LineString`] type.
    MultiLineString(Multi<Curve>),
    /// Curves of any type.
    MultiCurve(Multi<Curve>),
    /// Surfaces with linear boundaries only.
    MultiPolygon(Multi<Surface>),
    /// Surfaces of any type.
    MultiSurface(Multi<Surface>),
}

impl MultiGeometry {
    /// Creates a multi point.
    pub fn multi_point(members: Vec<Option<Point>>) -> Result<Self, MalformedGeometryError> {
        uniform_dimensions(
            members.iter().map(|m| m.as_ref().map(Point::has_z)),
            EntityKind::MultiGeometry,
        )?;
        Ok(Self::MultiPoint(Multi::new(members)))
    }

    /// Creates a multi line string. All members must be line strings.
    pub fn multi_line_string(members: Vec<Option<Curve>>) -> Result<Self, MalformedGeometryError> {
        check_members(&members, |c| c.curve_type() == CurveType::LineString)?;
        check_curve_dimensions(&members)?;
        Ok(Self::MultiLineString(Multi::new(members)))
    }

    /// Creates a multi curve.
    pub fn multi_curve(members: Vec<Option<Curve>>) -> Result<Self, MalformedGeometryError> {
        check_curve_dimensions(&members)?;
        Ok(Self::MultiCurve(Multi::new(members)))
    }

    /// Creates a multi polygon. All rings of the members must be linear rings.
    pub fn multi_polygon(members: Vec<Option<Surface>>) -> Result<Self, MalformedGeometryError> {
        check_members(&members, Surface::has_linear_rings)?;
        check_surface_dimensions(&members)?;
        Ok(Self::MultiPolygon(Multi::new(members)))
    }

    /// Creates a multi surface.
    pub fn multi_surface(members: Vec<Option<Surface>>) -> Result<Self, MalformedGeometryError> {
        check_surface_dimensions(&members)?;
        Ok(Self::MultiSurface(Multi::new(members)))
    }

    /// Kind of the collection.
    pub fn multi_geometry_type(&self) -> MultiGeometryType {
        match self {
            MultiGeometry::MultiPoint(_) => MultiGeometryType::MultiPoint,
            MultiGeometry::MultiLineString(_) => MultiGeometryType::MultiLineString,
            MultiGeometry::MultiCurve(_) => MultiGeometryType::MultiCurve,
            MultiGeometry::MultiPolygon(_) => MultiGeometryType::MultiPolygon,
            MultiGeometry::MultiSurface(_) => MultiGeometryType::MultiSurface,
        }
    }

    /// Number of member slots, including empty ones.
    pub fn len(&self) -> usize {
        match self {
            MultiGeometry::MultiPoint(m) => m.len(),
            MultiGeometry::MultiLineString(m) | MultiGeometry::MultiCurve(m) => m.len(),
            MultiGeometry::MultiPolygon(m) | MultiGeometry::MultiSurface(m) => m.len(),
        }
    }

    /// True if the collection has no member slots.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True if the member slot at `index` exists and is not empty.
    pub fn has_member(&self, index: usize) -> bool {
        match self {
            MultiGeometry::MultiPoint(m) => m.get(index).is_some(),
            MultiGeometry::MultiLineString(m) | MultiGeometry::MultiCurve(m) => {
                m.get(index).is_some()
            }
            MultiGeometry::MultiPolygon(m) | MultiGeometry::MultiSurface(m) => {
                m.get(index).is_some()
            }
        }
    }

    /// True if no member has circular arcs.
    pub fn is_linear(&self) -> bool {
        match self {
            MultiGeometry::MultiPoint(_) => true,
            MultiGeometry::MultiLineString(m) | MultiGeometry::MultiCurve(m) => {
                m.iter().all(Curve::is_linear)
            }
            MultiGeometry::MultiPolygon(m) | MultiGeometry::MultiSurface(m) => {
                m.iter().all(Surface::is_linear)
            }
        }
    }

    /// CRS of the collection, if specified.
    pub fn crs(&self) -> Option<&CrsRef> {
        match self {
            MultiGeometry::MultiPoint(m) => m.crs(),
            MultiGeometry::MultiLineString(m) | MultiGeometry::MultiCurve(m) => m.crs(),
            MultiGeometry::MultiPolygon(m) | MultiGeometry::MultiSurface(m) => m.crs(),
        }
    }

    /// Sets the CRS of the collection and all of its members.
    pub fn with_crs(self, crs: Option<CrsRef>) -> Self {
        self.replace_crs(crs)
    }
}

fn check_members<T>(
    members: &[Option<T>],
    allowed: impl Fn(&T) -> bool,
) -> Result<(), MalformedGeometryError> {
    match members
        .iter()
        .position(|m| m.as_ref().is_some_and(|m| !allowed(m)))
    {
        Some(member) => Err(MalformedGeometryError::new(
            EntityKind::MultiGeometry,
            Violation::MemberType { member },
        )),
        None => Ok(()),
    }
}

fn check_curve_dimensions(members: &[Option<Curve>]) -> Result<(), MalformedGeometryError> {
    uniform_dimensions(
        members.iter().map(|m| m.as_ref().and_then(Curve::has_z)),
        EntityKind::MultiGeometry,
    )
    .map(|_| ())
}

fn check_surface_dimensions(members: &[Option<Surface>]) -> Result<(), MalformedGeometryError> {
    uniform_dimensions(
        members.iter().map(|m| m.as_ref().and_then(Surface::has_z)),
        EntityKind::MultiGeometry,
    )
    .map(|_| ())
}

impl MapPoints for MultiGeometry {
    fn try_map_points<E, F>(&self, crs: &Option<CrsRef>, f: &mut F) -> Result<Self, E>
    where
        F: FnMut(&Point) -> Result<Point, E>,
    {
        Ok(match self {
            MultiGeometry::MultiPoint(m) => MultiGeometry::MultiPoint(m.try_map_points(crs, f)?),
            MultiGeometry::MultiLineString(m) => {
                MultiGeometry::MultiLineString(m.try_map_points(crs, f)?)
            }
            MultiGeometry::MultiCurve(m) => MultiGeometry::MultiCurve(m.try_map_points(crs, f)?),
            MultiGeometry::MultiPolygon(m) => {
                MultiGeometry::MultiPolygon(m.try_map_points(crs, f)?)
            }
            MultiGeometry::MultiSurface(m) => {
                MultiGeometry::MultiSurface(m.try_map_points(crs, f)?)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::ring::Ring;
    use crate::surface::Polygon;

    #[test]
    fn empty_slots_count() {
        let multi = MultiGeometry::multi_point(vec![None]).expect("valid");
        assert_eq!(multi.len(), 1);
        assert!(!multi.has_member(0));
        assert!(!multi.is_empty());

        let multi = MultiGeometry::multi_point(vec![]).expect("valid");
        assert_eq!(multi.len(), 0);
        assert!(multi.is_empty());
    }

    #[test]
    fn multi_line_string_members_must_be_line_strings() {
        let line = Curve::line_string(vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)]).expect("valid");
        let arc = Curve::arc_string(vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(2.0, 0.0),
        ])
        .expect("valid");

        assert!(MultiGeometry::multi_line_string(vec![Some(line.clone()), None]).is_ok());
        assert_matches!(
            MultiGeometry::multi_line_string(vec![Some(line.clone()), Some(arc.clone())]),
            Err(MalformedGeometryError {
                violation: Violation::MemberType { member: 1 },
                ..
            })
        );

        let multi = MultiGeometry::multi_curve(vec![Some(line), Some(arc)]).expect("valid");
        assert_eq!(multi.multi_geometry_type(), MultiGeometryType::MultiCurve);
        let MultiGeometry::MultiCurve(curves) = &multi else {
            panic!("expected multi curve");
        };
        assert_eq!(curves.iter().count(), 2);
        assert_eq!(curves.get(1).map(Curve::curve_type), Some(CurveType::Curve));
    }

    #[test]
    fn multi_polygon_members_must_have_linear_rings() {
        let p = |x, y| Point::new(x, y);
        let square = Ring::linear(vec![p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0), p(0.0, 0.0)])
            .expect("closed");
        let composite = Ring::from_curves(vec![
            Curve::line_string(vec![p(0.0, 0.0), p(1.0, 0.0)]).expect("valid"),
            Curve::line_string(vec![p(1.0, 0.0), p(1.0, 1.0), p(0.0, 0.0)]).expect("valid"),
        ])
        .expect("closed");
        let polygon = |ring| Surface::from(Polygon::new(ring, vec![]).expect("valid polygon"));

        let straight_composite = polygon(composite);
        assert!(straight_composite.is_linear());
        assert!(!straight_composite.has_linear_rings());

        assert!(MultiGeometry::multi_polygon(vec![Some(polygon(square.clone()))]).is_ok());
        assert_matches!(
            MultiGeometry::multi_polygon(vec![Some(polygon(square)), Some(straight_composite.clone())]),
            Err(MalformedGeometryError {
                violation: Violation::MemberType { member: 1 },
                ..
            })
        );
        assert!(MultiGeometry::multi_surface(vec![Some(straight_composite)]).is_ok());
    }

    #[test]
    fn members_must_have_same_dimensions() {
        assert_matches!(
            MultiGeometry::multi_point(vec![
                Some(Point::new(0.0, 0.0)),
                None,
                Some(Point::new_3d(0.0, 0.0, 1.0)),
            ]),
            Err(MalformedGeometryError {
                violation: Violation::MixedDimensions,
                ..
            })
        );
    }
}
