use std::sync::Arc;

use sfgeom_types::{
    Crs, CrsRef, Curve, Geometry, MultiGeometry, Point, Polygon, Ring, Surface,
};

use crate::error::{SyntaxError, WktError};
use crate::lexer::{Lexer, TokenKind};

const GEOMETRY_KEYWORDS: &[&str] = &[
    "POINT",
    "LINESTRING",
    "POLYGON",
    "MULTIPOINT",
    "MULTILINESTRING",
    "MULTIPOLYGON",
    "CIRCULARSTRING",
    "COMPOUNDCURVE",
    "CURVEPOLYGON",
    "MULTICURVE",
    "MULTISURFACE",
];

/// Parses WKT and EWKT text into geometries.
///
/// `EMPTY` singular geometries (`POINT EMPTY`, `LINESTRING EMPTY` etc.) are read as `None`. Empty collections are
/// read as collections with no members, and `EMPTY` members of collections are kept as empty slots.
///
/// The CRS of the result is taken from the `SRID=<code>;` prefix if present, or from the reader's default CRS
/// otherwise. The CRS is set on every node of the geometry.
#[derive(Debug, Clone, Default)]
pub struct WktReader {
    crs: Option<CrsRef>,
}

impl WktReader {
    /// Creates a reader without a default CRS.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the CRS for geometries without an `SRID` prefix.
    pub fn with_crs(mut self, crs: CrsRef) -> Self {
        self.crs = Some(crs);
        self
    }

    /// Parses the text. The whole input must be a single geometry.
    pub fn read(&self, input: &str) -> Result<Option<Geometry>, WktError> {
        let mut lexer = Lexer::new(input);
        let srid = read_srid(&mut lexer)?;
        let geometry = read_tagged(&mut lexer)?;
        lexer.expect(TokenKind::End, "end of input")?;

        let crs = match srid {
            Some(srid) => Some(Arc::new(Crs::from_srid(srid))),
            None => self.crs.clone(),
        };

        Ok(match crs {
            Some(crs) => geometry.map(|g| g.with_crs(Some(crs))),
            None => geometry,
        })
    }
}

fn read_srid(lexer: &mut Lexer) -> Result<Option<u32>, WktError> {
    if !lexer.next_if_word("SRID")? {
        return Ok(None);
    }

    lexer.expect(TokenKind::Equals, "'='")?;
    let token = lexer.next_token()?;
    let srid = match token.kind {
        TokenKind::Number(value)
            if (0.0..=u32::MAX as f64).contains(&value) && value.fract() == 0.0 =>
        {
            value as u32
        }
        _ => return Err(token.unexpected(&["integer SRID"]).into()),
    };
    lexer.expect(TokenKind::Semicolon, "';'")?;

    Ok(Some(srid))
}

fn read_tagged(lexer: &mut Lexer) -> Result<Option<Geometry>, WktError> {
    let (keyword, offset) = lexer.expect_word(GEOMETRY_KEYWORDS)?;
    skip_dimension_tag(lexer)?;

    Ok(match keyword.as_str() {
        "POINT" => read_point_text(lexer)?.map(Geometry::Point),
        "LINESTRING" | "CIRCULARSTRING" | "COMPOUNDCURVE" => {
            read_curve_body(lexer, &keyword)?.map(Geometry::Curve)
        }
        "POLYGON" | "CURVEPOLYGON" => read_polygon_body(lexer, &keyword)?.map(Geometry::Surface),
        "MULTIPOINT" => Some(Geometry::Multi(read_multi_point(lexer)?)),
        "MULTILINESTRING" => Some(Geometry::Multi(MultiGeometry::multi_line_string(
            read_members(lexer, |l| read_curve_body(l, "LINESTRING"))?,
        )?)),
        "MULTICURVE" => Some(Geometry::Multi(MultiGeometry::multi_curve(read_members(
            lexer,
            read_curve_member,
        )?)?)),
        "MULTIPOLYGON" => Some(Geometry::Multi(MultiGeometry::multi_polygon(
            read_members(lexer, |l| read_polygon_body(l, "POLYGON"))?,
        )?)),
        "MULTISURFACE" => Some(Geometry::Multi(MultiGeometry::multi_surface(
            read_members(lexer, read_surface_member)?,
        )?)),
        _ => {
            return Err(SyntaxError {
                offset,
                found: format!("'{keyword}'"),
                expected: GEOMETRY_KEYWORDS.to_vec(),
            }
            .into())
        }
    })
}

fn skip_dimension_tag(lexer: &mut Lexer) -> Result<(), WktError> {
    lexer.next_if_word("Z")?;
    Ok(())
}

/// Returns false if the next token is `EMPTY` (and consumes it), or true if it is an opening parenthesis.
fn open_or_empty(lexer: &mut Lexer) -> Result<bool, WktError> {
    if lexer.next_if_word("EMPTY")? {
        return Ok(false);
    }

    let token = lexer.next_token()?;
    match token.kind {
        TokenKind::LeftParen => Ok(true),
        _ => Err(token.unexpected(&["'('", "'EMPTY'"]).into()),
    }
}

/// Reads a comma separated list of items until the closing parenthesis. The opening parenthesis must be already
/// consumed.
fn read_list<T>(
    lexer: &mut Lexer,
    mut read_item: impl FnMut(&mut Lexer) -> Result<T, WktError>,
) -> Result<Vec<T>, WktError> {
    let mut items = vec![read_item(lexer)?];
    loop {
        let token = lexer.next_token()?;
        match token.kind {
            TokenKind::Comma => items.push(read_item(lexer)?),
            TokenKind::RightParen => return Ok(items),
            _ => return Err(token.unexpected(&["','", "')'"]).into()),
        }
    }
}

/// Reads `x y` or `x y z`.
fn read_point(lexer: &mut Lexer) -> Result<Point, WktError> {
    let (x, y) = (lexer.expect_number()?, lexer.expect_number()?);
    let z = match lexer.peek()?.kind {
        TokenKind::Number(z) => z,
        _ => return Ok(Point::new(x, y)),
    };
    lexer.next_token()?;

    let next = lexer.peek()?;
    if let TokenKind::Number(_) = next.kind {
        return Err(next.unexpected(&["','", "')'"]).into());
    }

    Ok(Point::new_3d(x, y, z))
}

fn read_point_text(lexer: &mut Lexer) -> Result<Option<Point>, WktError> {
    if !open_or_empty(lexer)? {
        return Ok(None);
    }

    let point = read_point(lexer)?;
    lexer.expect(TokenKind::RightParen, "')'")?;
    Ok(Some(point))
}

/// Reads `(x y, x y, ...)` or `EMPTY`.
fn read_point_list(lexer: &mut Lexer) -> Result<Option<Vec<Point>>, WktError> {
    if !open_or_empty(lexer)? {
        return Ok(None);
    }

    read_list(lexer, read_point).map(Some)
}

/// Reads the body of a curve of the given type (the keyword must be already consumed).
fn read_curve_body(lexer: &mut Lexer, keyword: &str) -> Result<Option<Curve>, WktError> {
    Ok(match keyword {
        "CIRCULARSTRING" => match read_point_list(lexer)? {
            Some(points) => Some(Curve::arc_string(points)?),
            None => None,
        },
        "COMPOUNDCURVE" => match read_compound_members(lexer)? {
            Some(mut members) if members.len() == 1 => {
                log::debug!("Compound curve with a single member is read as the member curve");
                members.pop()
            }
            Some(members) => Some(Curve::composite(members)?),
            None => None,
        },
        _ => match read_point_list(lexer)? {
            Some(points) => Some(Curve::line_string(points)?),
            None => None,
        },
    })
}

fn read_compound_members(lexer: &mut Lexer) -> Result<Option<Vec<Curve>>, WktError> {
    if !open_or_empty(lexer)? {
        return Ok(None);
    }

    let members = read_list(lexer, |lexer| {
        let offset = lexer.peek()?.offset;
        let tagged = matches!(
            &lexer.peek()?.kind,
            TokenKind::Word(word) if word == "CIRCULARSTRING" || word == "LINESTRING"
        );
        let member = if tagged {
            let (keyword, _) = lexer.expect_word(&[])?;
            skip_dimension_tag(lexer)?;
            read_curve_body(lexer, &keyword)?
        } else {
            read_curve_body(lexer, "LINESTRING")?
        };

        member.ok_or_else(|| {
            WktError::from(SyntaxError {
                offset,
                found: "'EMPTY'".into(),
                expected: vec!["compound curve member"],
            })
        })
    })?;

    Ok(Some(members))
}

/// Reads a member of a multi curve: an untagged line string or a tagged curve of any type.
fn read_curve_member(lexer: &mut Lexer) -> Result<Option<Curve>, WktError> {
    if !is_tagged(lexer)? {
        return read_curve_body(lexer, "LINESTRING");
    }

    let (keyword, offset) = lexer.expect_word(&[])?;
    if !matches!(
        keyword.as_str(),
        "LINESTRING" | "CIRCULARSTRING" | "COMPOUNDCURVE"
    ) {
        return Err(SyntaxError {
            offset,
            found: format!("'{keyword}'"),
            expected: vec!["LINESTRING", "CIRCULARSTRING", "COMPOUNDCURVE"],
        }
        .into());
    }

    skip_dimension_tag(lexer)?;
    read_curve_body(lexer, &keyword)
}

/// True if the next token is a geometry keyword (and not `EMPTY`).
fn is_tagged(lexer: &mut Lexer) -> Result<bool, WktError> {
    Ok(matches!(&lexer.peek()?.kind, TokenKind::Word(word) if word != "EMPTY"))
}

/// Reads a ring of a curve polygon: an untagged coordinate list or a tagged curve.
fn read_ring(lexer: &mut Lexer, keyword: &str) -> Result<Ring, WktError> {
    let offset = lexer.peek()?.offset;
    let ring = if keyword == "CURVEPOLYGON" {
        read_curve_member(lexer)?.map(|curve| Ring::from_curves(vec![curve]))
    } else {
        read_point_list(lexer)?.map(Ring::linear)
    };

    match ring {
        Some(ring) => Ok(ring?),
        None => Err(SyntaxError {
            offset,
            found: "'EMPTY'".into(),
            expected: vec!["ring"],
        }
        .into()),
    }
}

/// Reads the body of a polygon or curve polygon.
fn read_polygon_body(lexer: &mut Lexer, keyword: &str) -> Result<Option<Surface>, WktError> {
    if !open_or_empty(lexer)? {
        return Ok(None);
    }

    let mut rings = read_list(lexer, |l| read_ring(l, keyword))?;
    let exterior = rings.remove(0);
    Ok(Some(Polygon::new(exterior, rings)?.into()))
}

/// Reads a member of a multi surface: an untagged polygon, or a tagged polygon or curve polygon.
fn read_surface_member(lexer: &mut Lexer) -> Result<Option<Surface>, WktError> {
    if !is_tagged(lexer)? {
        return read_polygon_body(lexer, "POLYGON");
    }

    let (keyword, offset) = lexer.expect_word(&[])?;
    if !matches!(keyword.as_str(), "POLYGON" | "CURVEPOLYGON") {
        return Err(SyntaxError {
            offset,
            found: format!("'{keyword}'"),
            expected: vec!["POLYGON", "CURVEPOLYGON"],
        }
        .into());
    }

    skip_dimension_tag(lexer)?;
    read_polygon_body(lexer, &keyword)
}

fn read_members<T>(
    lexer: &mut Lexer,
    read_member: impl FnMut(&mut Lexer) -> Result<Option<T>, WktError>,
) -> Result<Vec<Option<T>>, WktError> {
    if !open_or_empty(lexer)? {
        return Ok(vec![]);
    }

    read_list(lexer, read_member)
}

/// Multi point members can be written either as `(x y)` or as `x y`.
fn read_multi_point(lexer: &mut Lexer) -> Result<MultiGeometry, WktError> {
    let members = read_members(lexer, |lexer| {
        let bare = matches!(lexer.peek()?.kind, TokenKind::Number(_));
        if bare {
            read_point(lexer).map(Some)
        } else {
            read_point_text(lexer)
        }
    })?;

    Ok(MultiGeometry::multi_point(members)?)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use sfgeom_types::error::{MalformedGeometryError, Violation};
    use sfgeom_types::geometry_type::{CurveType, MultiGeometryType, RingType, SegmentType};

    use super::*;

    fn read(input: &str) -> Option<Geometry> {
        WktReader::new().read(input).expect("valid wkt")
    }

    fn read_err(input: &str) -> WktError {
        WktReader::new().read(input).expect_err("invalid wkt")
    }

    #[test]
    fn point() {
        assert_eq!(read("POINT (1 2)"), Some(Geometry::Point(Point::new(1.0, 2.0))));
        assert_eq!(
            read("point z(1 2 3)"),
            Some(Geometry::Point(Point::new_3d(1.0, 2.0, 3.0)))
        );
        assert_eq!(
            read("  POINT(1e3   -2.5)  "),
            Some(Geometry::Point(Point::new(1000.0, -2.5)))
        );
    }

    #[test]
    fn empty_singular_geometries() {
        assert_eq!(read("POINT EMPTY"), None);
        assert_eq!(read("LINESTRING EMPTY"), None);
        assert_eq!(read("POLYGON EMPTY"), None);
        assert_eq!(read("CIRCULARSTRING EMPTY"), None);
        assert_eq!(read("COMPOUNDCURVE EMPTY"), None);
        assert_eq!(read("CURVEPOLYGON EMPTY"), None);
    }

    #[test]
    fn empty_collections() {
        let Some(Geometry::Multi(multi)) = read("MULTIPOINT EMPTY") else {
            panic!("not a multi geometry");
        };
        assert_eq!(multi.len(), 0);

        let Some(Geometry::Multi(multi)) = read("MULTIPOINT (EMPTY)") else {
            panic!("not a multi geometry");
        };
        assert_eq!(multi.len(), 1);
        assert!(!multi.has_member(0));

        let Some(Geometry::Multi(multi)) = read("MULTIPOLYGON (((0 0,1 0,1 1,0 0)),EMPTY)") else {
            panic!("not a multi geometry");
        };
        assert_eq!(multi.len(), 2);
        assert!(multi.has_member(0));
        assert!(!multi.has_member(1));
    }

    #[test]
    fn arc_string_keeps_control_points() {
        let Some(Geometry::Curve(curve)) = read(
            "CIRCULARSTRING(220268.439465645 6243434.35907056,220227.333675399 6243492.13893796,220190.089548258 6243435.22560966)",
        ) else {
            panic!("not a curve");
        };

        assert_eq!(curve.curve_type(), CurveType::Curve);
        let segments = curve.curve_segments();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].segment_type(), SegmentType::ArcString);
        assert_eq!(segments[0].control_points().len(), 3);
    }

    #[test]
    fn compound_curve() {
        let Some(Geometry::Curve(curve)) =
            read("COMPOUNDCURVE ((0 0,1 0),CIRCULARSTRING (1 0,2 1,3 0),(3 0,4 0))")
        else {
            panic!("not a curve");
        };

        assert_eq!(curve.curve_type(), CurveType::CompositeCurve);
        let types: Vec<_> = curve
            .curve_segments()
            .iter()
            .map(|s| s.segment_type())
            .collect();
        assert_eq!(
            types,
            vec![
                SegmentType::LineStringSegment,
                SegmentType::ArcString,
                SegmentType::LineStringSegment
            ]
        );
    }

    #[test]
    fn single_member_compound_curve_is_collapsed() {
        let geometry = read("COMPOUNDCURVE (CIRCULARSTRING (0 0,1 1,2 0))");
        assert_eq!(geometry.and_then(|g| g.curve_type()), Some(CurveType::Curve));
    }

    #[test]
    fn discontinuous_compound_curve() {
        assert_matches!(
            read_err("COMPOUNDCURVE ((0 0,1 0),(2 0,3 0))"),
            WktError::Malformed(MalformedGeometryError {
                violation: Violation::CurveDiscontinuity { member: 0 },
                ..
            })
        );
    }

    #[test]
    fn curve_polygon() {
        let Some(Geometry::Surface(surface)) = read(
            "CURVEPOLYGON (CIRCULARSTRING (0 0,4 0,0 0),(1 0,2 0,2 1,1 0),COMPOUNDCURVE (CIRCULARSTRING (1 -1,2 -2,3 -1),(3 -1,1 -1)))",
        ) else {
            panic!("not a surface");
        };

        let patch = &surface.patches()[0];
        assert_eq!(patch.exterior().ring_type(), RingType::Ring);
        assert_eq!(patch.exterior().member_type(), Some(CurveType::Curve));
        assert_eq!(patch.interiors()[0].ring_type(), RingType::LinearRing);
        assert_eq!(
            patch.interiors()[1].member_type(),
            Some(CurveType::CompositeCurve)
        );
    }

    #[test]
    fn multi_geometries() {
        let types = [
            ("MULTIPOINT ((1 2),(3 4))", MultiGeometryType::MultiPoint),
            ("MULTIPOINT (1 2,3 4)", MultiGeometryType::MultiPoint),
            ("MULTILINESTRING ((1 2,3 4))", MultiGeometryType::MultiLineString),
            (
                "MULTICURVE ((1 2,3 4),CIRCULARSTRING (0 0,1 1,2 0))",
                MultiGeometryType::MultiCurve,
            ),
            ("MULTIPOLYGON (((0 0,1 0,1 1,0 0)))", MultiGeometryType::MultiPolygon),
            (
                "MULTISURFACE (((0 0,1 0,1 1,0 0)),CURVEPOLYGON (CIRCULARSTRING (0 0,4 0,0 0)))",
                MultiGeometryType::MultiSurface,
            ),
        ];

        for (wkt, expected) in types {
            let geometry = read(wkt).expect("not empty");
            assert_eq!(geometry.multi_geometry_type(), Some(expected), "{wkt}");
        }
    }

    #[test]
    fn srid_prefix() {
        let geometry = read("SRID=4326;POINT (52 10)").expect("not empty");
        let crs = geometry.crs().expect("crs is set");
        assert_eq!(crs.srid(), Some(4326));
        assert!(crs.is_lat_first());

        let geometry = read("SRID=1234;LINESTRING (0 0,1 1)").expect("not empty");
        let Geometry::Curve(curve) = &geometry else {
            panic!("not a curve");
        };
        assert!(curve
            .control_points()
            .all(|p| p.crs().and_then(|crs| crs.srid()) == Some(1234)));
    }

    #[test]
    fn default_crs() {
        let reader = WktReader::new().with_crs(Arc::new(Crs::epsg3857()));
        let geometry = reader.read("POINT (1 2)").expect("valid").expect("not empty");
        assert_eq!(geometry.crs().and_then(|c| c.srid()), Some(3857));

        let geometry = reader
            .read("SRID=4326;POINT (1 2)")
            .expect("valid")
            .expect("not empty");
        assert_eq!(geometry.crs().and_then(|c| c.srid()), Some(4326));
    }

    #[test]
    fn syntax_errors() {
        assert_matches!(
            read_err("POINT (1 2"),
            WktError::Syntax(SyntaxError { offset: 10, .. })
        );
        assert_matches!(
            read_err("TRIANGLE ((0 0,1 0,0 1,0 0))"),
            WktError::Syntax(SyntaxError { offset: 0, .. })
        );
        assert_matches!(
            read_err("POINT (1 2) POINT"),
            WktError::Syntax(SyntaxError { offset: 12, .. })
        );
        assert_matches!(
            read_err("POINT (1 x)"),
            WktError::Syntax(SyntaxError { offset: 9, ref expected, .. }) if expected == &vec!["number"]
        );
        assert_matches!(
            read_err("POINT (1 2 3 4)"),
            WktError::Syntax(SyntaxError { offset: 13, ref expected, .. }) if expected == &vec!["','", "')'"]
        );
        assert_matches!(
            read_err("LINESTRING (0 0;1 1)"),
            WktError::Syntax(SyntaxError { offset: 15, ref expected, .. }) if expected == &vec!["','", "')'"]
        );
        assert_matches!(
            read_err("POLYGON ((0 0,1 0,1 1,0 0)) x"),
            WktError::Syntax(SyntaxError { offset: 28, ref expected, .. }) if expected == &vec!["end of input"]
        );
        assert_matches!(
            read_err("SRID=1.5;POINT (1 2)"),
            WktError::Syntax(SyntaxError { offset: 5, .. })
        );
    }

    #[test]
    fn invalid_geometries() {
        assert_matches!(
            read_err("POLYGON ((0 0,1 0,1 1))"),
            WktError::Malformed(MalformedGeometryError {
                violation: Violation::RingNotClosed,
                ..
            })
        );
        assert_matches!(
            read_err("CIRCULARSTRING (0 0,1 1)"),
            WktError::Malformed(MalformedGeometryError {
                violation: Violation::ArcStringPointCount(2),
                ..
            })
        );
        assert_matches!(
            read_err("LINESTRING (0 0,1 1 1)"),
            WktError::Malformed(MalformedGeometryError {
                violation: Violation::MixedDimensions,
                ..
            })
        );
    }
}
