use std::fmt::Write;

use serde::{Deserialize, Serialize};
use sfgeom_types::error::UnsupportedGeometryError;
use sfgeom_types::{
    CrsRef, Curve, CurveLinearizer, CurveSegment, Envelope, Geometry, Multi, MultiGeometry, Point,
    Ring, Surface,
};

use crate::error::WktError;
use crate::format::{CoordinateFormatter, DecimalCoordinateFormatter};

/// Output options of [`WktWriter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WktFlags {
    sql_mm: bool,
    use_3d: bool,
    linearization: bool,
    envelope: bool,
    srid: bool,
}

impl Default for WktFlags {
    fn default() -> Self {
        Self {
            sql_mm: true,
            use_3d: true,
            linearization: false,
            envelope: false,
            srid: false,
        }
    }
}

impl WktFlags {
    /// Write arcs, compound curves, curve polygons, multi curves and multi surfaces with SQL/MM keywords.
    ///
    /// Without SQL/MM, multi curves and multi surfaces are written as multi line strings and multi polygons, and
    /// straight compound curves as line strings. Geometries with arcs cannot be written unless linearization is
    /// enabled.
    pub fn with_sql_mm(mut self, sql_mm: bool) -> Self {
        self.sql_mm = sql_mm;
        self
    }

    /// Write the third ordinate of points that have one.
    pub fn with_3d(mut self, use_3d: bool) -> Self {
        self.use_3d = use_3d;
        self
    }

    /// Linearize arcs if SQL/MM output is disabled.
    pub fn with_linearization(mut self, linearization: bool) -> Self {
        self.linearization = linearization;
        self
    }

    /// Write envelopes with the `ENVELOPE` keyword instead of as polygons.
    pub fn with_envelope(mut self, envelope: bool) -> Self {
        self.envelope = envelope;
        self
    }

    /// Prefix the output with `SRID=<code>;` if the CRS of the geometry has an EPSG code.
    pub fn with_srid(mut self, srid: bool) -> Self {
        self.srid = srid;
        self
    }

    /// See [`WktFlags::with_sql_mm`].
    pub fn sql_mm(&self) -> bool {
        self.sql_mm
    }

    /// See [`WktFlags::with_3d`].
    pub fn use_3d(&self) -> bool {
        self.use_3d
    }

    /// See [`WktFlags::with_linearization`].
    pub fn linearization(&self) -> bool {
        self.linearization
    }

    /// See [`WktFlags::with_envelope`].
    pub fn envelope(&self) -> bool {
        self.envelope
    }

    /// See [`WktFlags::with_srid`].
    pub fn srid(&self) -> bool {
        self.srid
    }
}

/// Writes geometries as WKT or EWKT text.
///
/// The output puts exactly one space between a keyword and the following parenthesis or `EMPTY`, a space between
/// ordinates of a point and no spaces around commas: `MULTIPOINT (1 2,3 4)`.
#[derive(Debug, Clone)]
pub struct WktWriter<F = DecimalCoordinateFormatter> {
    flags: WktFlags,
    formatter: F,
    linearizer: CurveLinearizer,
}

impl Default for WktWriter {
    fn default() -> Self {
        Self::new(WktFlags::default(), DecimalCoordinateFormatter::shortest())
    }
}

impl<F: CoordinateFormatter> WktWriter<F> {
    /// Creates a new writer.
    pub fn new(flags: WktFlags, formatter: F) -> Self {
        Self {
            flags,
            formatter,
            linearizer: CurveLinearizer::default(),
        }
    }

    /// Sets the linearizer used when arcs are written without SQL/MM support.
    pub fn with_linearizer(mut self, linearizer: CurveLinearizer) -> Self {
        self.linearizer = linearizer;
        self
    }

    /// Output options.
    pub fn flags(&self) -> WktFlags {
        self.flags
    }

    /// Writes the geometry into a string.
    pub fn write(&self, geometry: &Geometry) -> Result<String, WktError> {
        let mut out = String::new();
        self.write_to(geometry, &mut out)?;
        Ok(out)
    }

    /// Writes the geometry into the output.
    pub fn write_to(&self, geometry: &Geometry, out: &mut dyn Write) -> Result<(), WktError> {
        self.write_srid(geometry.crs(), out)?;

        if self.flags.sql_mm || geometry.is_linear() {
            return self.write_geometry(geometry, out);
        }

        if !self.flags.linearization {
            return Err(UnsupportedGeometryError::new(
                type_name(geometry),
                "circular arcs cannot be written without SQL/MM support",
            )
            .into());
        }

        self.write_geometry(&self.linearizer.linearize(geometry), out)
    }

    /// Writes the envelope as `ENVELOPE (minx miny,maxx maxy)` if [`WktFlags::envelope`] is set, or as a polygon
    /// (a point for envelopes of zero size) otherwise.
    pub fn write_envelope(&self, envelope: &Envelope) -> Result<String, WktError> {
        let mut out = String::new();
        self.write_srid(envelope.crs(), &mut out)?;

        let (min, max) = (envelope.min(), envelope.max());
        if self.flags.envelope {
            out.write_str("ENVELOPE ")?;
            self.write_points([&min, &max], &mut out)?;
        } else if envelope.bounds().width() == 0.0 && envelope.bounds().height() == 0.0 {
            out.write_str("POINT ")?;
            self.write_points([&min], &mut out)?;
        } else {
            let corners = [
                min.clone(),
                Point::new(max.x(), min.y()),
                max.clone(),
                Point::new(min.x(), max.y()),
                min,
            ];
            out.write_str("POLYGON (")?;
            self.write_points(&corners, &mut out)?;
            out.write_char(')')?;
        }

        Ok(out)
    }

    fn write_srid(&self, crs: Option<&CrsRef>, out: &mut dyn Write) -> Result<(), WktError> {
        if !self.flags.srid {
            return Ok(());
        }

        if let Some(srid) = crs.and_then(|crs| crs.srid()) {
            write!(out, "SRID={srid};")?;
        }

        Ok(())
    }

    fn write_geometry(&self, geometry: &Geometry, out: &mut dyn Write) -> Result<(), WktError> {
        match geometry {
            Geometry::Point(p) => {
                out.write_str("POINT ")?;
                self.write_points([p], out)
            }
            Geometry::Curve(c) => self.write_curve(c, true, out),
            Geometry::Ring(Ring::LinearRing(r)) => {
                out.write_str("LINESTRING ")?;
                self.write_points(r.control_points(), out)
            }
            Geometry::Ring(Ring::Ring(r)) => self.write_curve(r.member(), true, out),
            Geometry::Surface(s) => self.write_surface(s, true, out),
            Geometry::Multi(m) => self.write_multi(m, out),
        }
    }

    /// Writes a curve. If `tag_line` is not set, a straight curve is written as a plain coordinate list, which is the
    /// way line strings are written inside multi curves, compound curves and curve polygons.
    fn write_curve(&self, curve: &Curve, tag_line: bool, out: &mut dyn Write) -> Result<(), WktError> {
        let segments = curve.curve_segments();
        let line_tag = if tag_line { "LINESTRING " } else { "" };

        match segments.as_slice() {
            [] => {
                write!(out, "{line_tag}EMPTY")?;
            }
            [segment] => self.write_segment(segment, line_tag, out)?,
            _ if !self.flags.sql_mm && curve.is_linear() => {
                out.write_str(line_tag)?;
                let points = self.linearizer.linearize_points(segments.iter().copied());
                self.write_points(&points, out)?;
            }
            _ => {
                out.write_str("COMPOUNDCURVE (")?;
                for (index, segment) in segments.iter().enumerate() {
                    if index > 0 {
                        out.write_char(',')?;
                    }
                    self.write_segment(segment, "", out)?;
                }
                out.write_char(')')?;
            }
        }

        Ok(())
    }

    fn write_segment(
        &self,
        segment: &CurveSegment,
        line_tag: &str,
        out: &mut dyn Write,
    ) -> Result<(), WktError> {
        match segment {
            CurveSegment::LineStringSegment(s) => {
                out.write_str(line_tag)?;
                self.write_points(s.control_points(), out)
            }
            CurveSegment::ArcString(_) if !self.flags.sql_mm => Err(UnsupportedGeometryError::new(
                "ArcString",
                "circular arcs cannot be written without SQL/MM support",
            )
            .into()),
            CurveSegment::ArcString(s) => {
                out.write_str("CIRCULARSTRING ")?;
                self.write_points(s.control_points(), out)
            }
        }
    }

    /// Writes a polygon or a curve polygon. Straight polygons get the `POLYGON` keyword only if `tag_polygon` is set.
    ///
    /// A ring made of several curves is written as `COMPOUNDCURVE` even if it has no arcs, so such a patch needs the
    /// `CURVEPOLYGON` keyword as well.
    fn write_surface(
        &self,
        surface: &Surface,
        tag_polygon: bool,
        out: &mut dyn Write,
    ) -> Result<(), WktError> {
        let [patch] = surface.patches() else {
            return Err(UnsupportedGeometryError::new(
                format!("{:?}", surface.surface_type()),
                "only surfaces with a single patch can be written",
            )
            .into());
        };

        let curved = !patch.is_linear() || (self.flags.sql_mm && !patch.has_linear_rings());
        if curved {
            out.write_str("CURVEPOLYGON ")?;
        } else if tag_polygon {
            out.write_str("POLYGON ")?;
        }

        out.write_char('(')?;
        for (index, ring) in patch.rings().enumerate() {
            if index > 0 {
                out.write_char(',')?;
            }

            match ring {
                Ring::LinearRing(r) => self.write_points(r.control_points(), out)?,
                Ring::Ring(r) => self.write_curve(r.member(), false, out)?,
            }
        }
        out.write_char(')')?;

        Ok(())
    }

    fn write_multi(&self, multi: &MultiGeometry, out: &mut dyn Write) -> Result<(), WktError> {
        let sql_mm = self.flags.sql_mm;
        match multi {
            MultiGeometry::MultiPoint(m) => {
                self.write_members("MULTIPOINT", m, out, |p, out| self.write_point(p, out))
            }
            MultiGeometry::MultiLineString(m) => {
                self.write_members("MULTILINESTRING", m, out, |c, out| {
                    self.write_curve(c, false, out)
                })
            }
            MultiGeometry::MultiCurve(m) => {
                let keyword = if sql_mm { "MULTICURVE" } else { "MULTILINESTRING" };
                self.write_members(keyword, m, out, |c, out| self.write_curve(c, false, out))
            }
            MultiGeometry::MultiPolygon(m) => {
                self.write_members("MULTIPOLYGON", m, out, |s, out| {
                    self.write_surface(s, false, out)
                })
            }
            MultiGeometry::MultiSurface(m) => {
                let keyword = if sql_mm { "MULTISURFACE" } else { "MULTIPOLYGON" };
                self.write_members(keyword, m, out, |s, out| self.write_surface(s, false, out))
            }
        }
    }

    fn write_members<T>(
        &self,
        keyword: &str,
        multi: &Multi<T>,
        out: &mut dyn Write,
        write_member: impl Fn(&T, &mut dyn Write) -> Result<(), WktError>,
    ) -> Result<(), WktError> {
        if multi.is_empty() {
            write!(out, "{keyword} EMPTY")?;
            return Ok(());
        }

        write!(out, "{keyword} (")?;
        for (index, member) in multi.members().iter().enumerate() {
            if index > 0 {
                out.write_char(',')?;
            }

            match member {
                Some(member) => write_member(member, out)?,
                None => out.write_str("EMPTY")?,
            }
        }
        out.write_char(')')?;

        Ok(())
    }

    /// Writes `(x y,x y,...)`.
    fn write_points<'a>(
        &self,
        points: impl IntoIterator<Item = &'a Point>,
        out: &mut dyn Write,
    ) -> Result<(), WktError> {
        out.write_char('(')?;
        for (index, point) in points.into_iter().enumerate() {
            if index > 0 {
                out.write_char(',')?;
            }
            self.write_point(point, out)?;
        }
        out.write_char(')')?;

        Ok(())
    }

    /// Writes `x y` or `x y z`.
    fn write_point(&self, point: &Point, out: &mut dyn Write) -> Result<(), WktError> {
        let dimension = if self.flags.use_3d { point.dimension() } else { 2 };
        for index in 0..dimension {
            if index > 0 {
                out.write_char(' ')?;
            }

            let value = point.ordinate(index);
            if !value.is_finite() {
                return Err(WktError::NonFinite(value));
            }
            self.formatter.write_ordinate(out, value)?;
        }

        Ok(())
    }
}

fn type_name(geometry: &Geometry) -> String {
    match geometry {
        Geometry::Point(_) => "Point".into(),
        Geometry::Curve(c) => format!("{:?}", c.curve_type()),
        Geometry::Ring(r) => format!("{:?}", r.ring_type()),
        Geometry::Surface(s) => format!("{:?}", s.surface_type()),
        Geometry::Multi(m) => format!("{:?}", m.multi_geometry_type()),
    }
}
