//! Reader and writer of the Well-Known Text representation of [`sfgeom_types`] geometries.
//!
//! Besides the simple feature vocabulary (`POINT`, `LINESTRING`, `POLYGON` and their multi variants) the codec
//! supports SQL/MM curves (`CIRCULARSTRING`, `COMPOUNDCURVE`, `CURVEPOLYGON`, `MULTICURVE`, `MULTISURFACE`) and
//! the EWKT `SRID=<code>;` prefix.
//!
//! ```
//! use sfgeom_wkt::{from_wkt, to_wkt};
//!
//! let geometry = from_wkt("CIRCULARSTRING(0 0, 1 1, 2 0)")?.expect("not empty");
//! assert_eq!(to_wkt(&geometry)?, "CIRCULARSTRING (0 0,1 1,2 0)");
//!
//! assert!(from_wkt("POINT EMPTY")?.is_none());
//! # Ok::<(), sfgeom_wkt::error::WktError>(())
//! ```

pub mod error;
mod format;
mod lexer;
mod reader;
mod writer;

pub use format::{CoordinateFormatter, DecimalCoordinateFormatter};
pub use reader::WktReader;
use sfgeom_types::Geometry;
pub use writer::{WktFlags, WktWriter};

use crate::error::WktError;

/// Parses WKT text with the default [`WktReader`]. Returns `None` for empty singular geometries like `POINT EMPTY`.
pub fn from_wkt(input: &str) -> Result<Option<Geometry>, WktError> {
    WktReader::new().read(input)
}

/// Writes the geometry with the default [`WktWriter`].
pub fn to_wkt(geometry: &Geometry) -> Result<String, WktError> {
    WktWriter::default().write(geometry)
}
