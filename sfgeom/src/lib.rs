//! Simple feature geometries extended with SQL/MM curves.
//!
//! This crate bundles:
//! * the geometry model of [`sfgeom_types`], re-exported as [`types`] (and its main types at the crate root);
//! * the WKT/EWKT codec of [`sfgeom_wkt`], re-exported as [`wkt`];
//! * topology [`validation`] of geometries.
//!
//! ```
//! use sfgeom::validation::GeometryValidator;
//! use sfgeom::wkt::{from_wkt, to_wkt};
//!
//! let geometry = from_wkt("CURVEPOLYGON (CIRCULARSTRING (0 0,4 0,0 0),(1 -1,1 1,3 1,3 -1,1 -1))")?
//!     .expect("not empty");
//!
//! assert!(GeometryValidator::new().is_valid(&geometry));
//! assert_eq!(
//!     to_wkt(&geometry)?,
//!     "CURVEPOLYGON (CIRCULARSTRING (0 0,4 0,0 0),(1 -1,1 1,3 1,3 -1,1 -1))"
//! );
//! # Ok::<(), sfgeom::wkt::error::WktError>(())
//! ```

pub mod validation;

pub use sfgeom_types as types;
pub use sfgeom_types::{
    is_left_handed, Crs, Curve, CurveLinearizer, Geometry, MultiGeometry, Point, Ring, Surface,
};
pub use sfgeom_wkt as wkt;
