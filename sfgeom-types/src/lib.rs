//! Geometry model of simple features extended with SQL/MM circular arcs.
//!
//! A [`Geometry`] is a tree of immutable nodes: [`Point`]s, [`Curve`]s made of [`CurveSegment`]s (straight line
//! strings or circular arc strings given by their control points), closed [`Ring`]s, [`Surface`]s bounded by
//! rings, and homogeneous [`MultiGeometry`] collections. Constructors check the structural invariants (point counts,
//! contiguity, ring closure, uniform dimensionality) and fail with [`MalformedGeometryError`].
//!
//! Every node can carry a [`Crs`] descriptor. The crate inspects CRS axes (see [`is_left_handed`]) and can
//! [`reproject`](transform::reproject) geometries between the CRSs it knows. Arcs are never tessellated implicitly:
//! use [`CurveLinearizer`] for that.
//!
//! ```
//! use sfgeom_types::{Curve, CurveLinearizer, Point};
//!
//! let circle = Curve::arc_string(vec![
//!     Point::new(0.0, 0.0),
//!     Point::new(2.0, 0.0),
//!     Point::new(0.0, 0.0),
//! ])?;
//!
//! assert_eq!(circle.control_points().count(), 3);
//! assert_eq!(CurveLinearizer::default().linearize_curve(&circle).control_points().count(), 100);
//! # Ok::<(), sfgeom_types::error::MalformedGeometryError>(())
//! ```

pub mod cartesian;
pub mod crs;
pub mod datum;
pub mod error;
pub mod geometry_type;
pub mod linearization;
pub mod transform;

mod curve;
mod curve_segment;
mod envelope;
mod geometry;
mod map;
mod multi;
mod point;
mod ring;
mod surface;

#[cfg(feature = "geo-types")]
mod geo_types;

pub use crs::{is_left_handed, Axis, AxisOrientation, Crs, ProjectionType};
pub use curve::{CompositeCurve, CompoundCurve, Curve, LineString, SegmentedCurve};
pub use curve_segment::{ArcString, CurveSegment, LineStringSegment};
pub use datum::Datum;
pub use envelope::Envelope;
pub use error::{MalformedGeometryError, TransformError, UnsupportedGeometryError};
pub use geometry::Geometry;
pub use linearization::{CurveLinearizer, LinearizationCriterion};
pub use multi::{Multi, MultiGeometry};
pub use point::{CrsRef, Point};
pub use ring::{CurveRing, LinearRing, Ring};
pub use surface::{Polygon, PolygonPatch, Surface};
