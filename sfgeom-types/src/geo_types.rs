//! Conversions between the model and [`geo_types`] geometries.
//!
//! `geo_types` has no arcs, so curves are linearized with the default [`CurveLinearizer`] on the way out. Its
//! collections cannot hold empty members, so multi geometries with null members are not converted.

use geo_types::{Coord, CoordNum, LineString, MultiLineString, MultiPoint, MultiPolygon};
use nalgebra::Scalar;
use num_traits::{Bounded, FromPrimitive};

use crate::cartesian::CartesianPoint2d;
use crate::curve::Curve;
use crate::error::UnsupportedGeometryError;
use crate::geometry::Geometry;
use crate::linearization::CurveLinearizer;
use crate::multi::{Multi, MultiGeometry};
use crate::point::Point;
use crate::ring::Ring;
use crate::surface::Surface;

impl<T: CoordNum + Bounded + Scalar + FromPrimitive> CartesianPoint2d for Coord<T> {
    type Num = T;

    fn x(&self) -> Self::Num {
        self.x
    }

    fn y(&self) -> Self::Num {
        self.y
    }
}

impl From<Coord<f64>> for Point {
    fn from(value: Coord<f64>) -> Self {
        Point::new(value.x, value.y)
    }
}

impl From<geo_types::Point<f64>> for Point {
    fn from(value: geo_types::Point<f64>) -> Self {
        value.0.into()
    }
}

impl From<&Point> for Coord<f64> {
    fn from(value: &Point) -> Self {
        Coord {
            x: value.x(),
            y: value.y(),
        }
    }
}

impl TryFrom<&Geometry> for geo_types::Geometry<f64> {
    type Error = UnsupportedGeometryError;

    fn try_from(value: &Geometry) -> Result<Self, Self::Error> {
        let converter = Converter::default();
        Ok(match value {
            Geometry::Point(p) => geo_types::Geometry::Point(geo_types::Point(p.into())),
            Geometry::Curve(c) => geo_types::Geometry::LineString(converter.curve(c)),
            Geometry::Ring(r) => geo_types::Geometry::LineString(converter.ring(r)),
            Geometry::Surface(s) => geo_types::Geometry::Polygon(converter.surface(s)?),
            Geometry::Multi(m) => converter.multi(m)?,
        })
    }
}

#[derive(Default)]
struct Converter {
    linearizer: CurveLinearizer,
}

impl Converter {
    fn curve(&self, curve: &Curve) -> LineString<f64> {
        self.linearizer
            .linearize_points(curve.curve_segments())
            .iter()
            .map(Coord::<f64>::from)
            .collect()
    }

    fn ring(&self, ring: &Ring) -> LineString<f64> {
        self.linearizer
            .linearize_points(ring.curve_segments())
            .iter()
            .map(Coord::<f64>::from)
            .collect()
    }

    fn surface(&self, surface: &Surface) -> Result<geo_types::Polygon<f64>, UnsupportedGeometryError> {
        match surface.patches() {
            [patch] => Ok(geo_types::Polygon::new(
                self.ring(patch.exterior()),
                patch.interiors().iter().map(|r| self.ring(r)).collect(),
            )),
            patches => Err(UnsupportedGeometryError::new(
                format!("{:?}", surface.surface_type()),
                format!("surface with {} patches", patches.len()),
            )),
        }
    }

    fn multi(&self, multi: &MultiGeometry) -> Result<geo_types::Geometry<f64>, UnsupportedGeometryError> {
        let kind = multi.multi_geometry_type();
        let no_null = |has_null: bool| {
            if has_null {
                Err(UnsupportedGeometryError::new(
                    format!("{kind:?}"),
                    "collection with an empty member",
                ))
            } else {
                Ok(())
            }
        };

        Ok(match multi {
            MultiGeometry::MultiPoint(m) => {
                no_null(has_null(m))?;
                geo_types::Geometry::MultiPoint(MultiPoint(
                    m.iter().map(|p| geo_types::Point(p.into())).collect(),
                ))
            }
            MultiGeometry::MultiLineString(m) | MultiGeometry::MultiCurve(m) => {
                no_null(has_null(m))?;
                geo_types::Geometry::MultiLineString(MultiLineString(
                    m.iter().map(|c| self.curve(c)).collect(),
                ))
            }
            MultiGeometry::MultiPolygon(m) | MultiGeometry::MultiSurface(m) => {
                no_null(has_null(m))?;
                geo_types::Geometry::MultiPolygon(MultiPolygon(
                    m.iter()
                        .map(|s| self.surface(s))
                        .collect::<Result<_, _>>()?,
                ))
            }
        })
    }
}

fn has_null<T>(multi: &Multi<T>) -> bool {
    multi.members().iter().any(Option::is_none)
}
