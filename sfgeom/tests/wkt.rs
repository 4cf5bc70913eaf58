use std::sync::Arc;

use approx::assert_relative_eq;
use assert_matches::assert_matches;
use sfgeom::types::error::{MalformedGeometryError, Violation};
use sfgeom::types::geometry_type::{CurveType, SegmentType};
use sfgeom::types::transform::reproject;
use sfgeom::types::{Crs, CurveSegment, MultiGeometry, Ring};
use sfgeom::wkt::{from_wkt, to_wkt, DecimalCoordinateFormatter, WktFlags, WktWriter};
use sfgeom::{CurveLinearizer, Geometry, Point};

fn parse(wkt: &str) -> Geometry {
    from_wkt(wkt)
        .expect("valid wkt")
        .expect("not empty geometry")
}

#[test]
fn canonical_text_round_trips() {
    let samples = [
        "POINT (1 2)",
        "POINT (1 2 3)",
        "LINESTRING (0 0,1.5 2.25,-3 4)",
        "POLYGON ((0 0,10 0,10 10,0 10,0 0),(2 2,2 4,4 4,4 2,2 2))",
        "MULTIPOINT (0 0,1 1)",
        "MULTILINESTRING ((0 0,1 1),(2 2,3 3))",
        "MULTIPOLYGON (((0 0,1 0,1 1,0 0)),((5 5,6 5,6 6,5 5)))",
        "CIRCULARSTRING (0 0,1 1,2 0)",
        "COMPOUNDCURVE ((0 0,1 0),CIRCULARSTRING (1 0,2 1,3 0),(3 0,4 0))",
        "CURVEPOLYGON (CIRCULARSTRING (0 0,4 0,0 0),(1 0,2 0,2 1,1 0))",
        "CURVEPOLYGON ((-10 -10,10 -10,10 10,-10 10,-10 -10),CIRCULARSTRING (0 0,4 0,0 0))",
        "MULTICURVE ((0 0,5 5),CIRCULARSTRING (4 0,4 4,8 4))",
        "MULTISURFACE (((0 0,1 0,1 1,0 0)),CURVEPOLYGON (CIRCULARSTRING (0 0,4 0,0 0)))",
        "CURVEPOLYGON (COMPOUNDCURVE ((0 0,1 0),(1 0,1 1,0 0)))",
        "MULTISURFACE (CURVEPOLYGON (COMPOUNDCURVE ((0 0,1 0),(1 0,1 1,0 0))),((5 5,6 5,6 6,5 5)))",
        "MULTIPOLYGON EMPTY",
        "MULTILINESTRING EMPTY",
    ];

    for sample in samples {
        assert_eq!(to_wkt(&parse(sample)).expect("writable"), sample);
    }
}

#[test]
fn empty_singular_geometry_is_absent() {
    assert_eq!(from_wkt("POINT EMPTY").expect("valid wkt"), None);
    assert_eq!(from_wkt("LINESTRING EMPTY").expect("valid wkt"), None);
    assert_eq!(from_wkt("POLYGON EMPTY").expect("valid wkt"), None);
}

#[test]
fn empty_collection_and_empty_member() {
    let Geometry::Multi(empty) = parse("MULTIPOINT EMPTY") else {
        panic!("multi point expected");
    };
    assert_eq!(empty.len(), 0);

    let Geometry::Multi(with_empty) = parse("MULTIPOINT (EMPTY)") else {
        panic!("multi point expected");
    };
    assert_eq!(with_empty.len(), 1);
    assert!(!with_empty.has_member(0));

    assert_eq!(to_wkt(&Geometry::Multi(empty)).expect("writable"), "MULTIPOINT EMPTY");
    assert_eq!(
        to_wkt(&Geometry::Multi(with_empty)).expect("writable"),
        "MULTIPOINT (EMPTY)"
    );
}

#[test]
fn straight_compound_ring_keeps_curve_polygon_keyword() {
    let Geometry::Surface(surface) =
        parse("CURVEPOLYGON (COMPOUNDCURVE ((0 0,1 0),(1 0,1 1,0 0)))")
    else {
        panic!("surface expected");
    };
    assert!(surface.is_linear());
    assert!(!surface.has_linear_rings());

    let geometry = Geometry::Surface(surface);
    let text = to_wkt(&geometry).expect("writable");
    assert_eq!(parse(&text), geometry);

    let Geometry::Multi(multi) =
        parse("MULTISURFACE (CURVEPOLYGON (COMPOUNDCURVE ((0 0,1 0),(1 0,1 1,0 0))))")
    else {
        panic!("multi surface expected");
    };
    let text = to_wkt(&Geometry::Multi(multi.clone())).expect("writable");
    assert_eq!(parse(&text), Geometry::Multi(multi));
}

#[test]
fn empty_collections_have_no_members() {
    for wkt in ["MULTIPOLYGON EMPTY", "MULTILINESTRING EMPTY", "MULTICURVE EMPTY", "MULTISURFACE EMPTY"] {
        let Geometry::Multi(multi) = parse(wkt) else {
            panic!("multi geometry expected");
        };
        assert_eq!(multi.len(), 0, "{wkt}");
        assert!(multi.is_empty(), "{wkt}");
    }
}

#[test]
fn syntax_error_lists_expected_tokens() {
    let error = from_wkt("MULTIPOLYGON ((0 0,1 0,1 1,0 0))").expect_err("ring expected");
    insta::assert_snapshot!(error, @"unexpected number 0 at offset 15, expected '(' or 'EMPTY'");

    let error = from_wkt("POINT (1 2 3 4)").expect_err("too many ordinates");
    insta::assert_snapshot!(error, @"unexpected number 4 at offset 13, expected ',' or ')'");
}

#[test]
fn arc_control_points_are_kept() {
    let geometry = parse(
        "CIRCULARSTRING(220268.439465645 150415.359530563, 220227.333322076 150505.561285879, \
         220227.353105332 150406.434743975)",
    );
    let Geometry::Curve(curve) = &geometry else {
        panic!("curve expected");
    };

    let segments = curve.curve_segments();
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].segment_type(), SegmentType::ArcString);
    assert_eq!(segments[0].control_points().len(), 3);
    assert_eq!(
        segments[0].control_points()[1],
        Point::new(220227.333322076, 150505.561285879)
    );
}

#[test]
fn full_circle_is_linearized_to_100_points() {
    let Geometry::Curve(curve) = parse("CIRCULARSTRING (0 0,1 1,0 0)") else {
        panic!("curve expected");
    };

    let linearized = CurveLinearizer::default().linearize_curve(&curve);
    assert_eq!(linearized.curve_type(), CurveType::LineString);
    assert_eq!(linearized.control_points().count(), 100);
    assert_eq!(linearized.start_point(), linearized.end_point());
}

#[test]
fn open_ring_is_rejected() {
    let result = Ring::linear(vec![
        Point::new(0.0, 0.0),
        Point::new(1.0, 0.0),
        Point::new(1.0, 1.0),
    ]);
    assert_matches!(
        result,
        Err(MalformedGeometryError {
            violation: Violation::RingNotClosed,
            ..
        })
    );

    assert_matches!(
        from_wkt("POLYGON ((0 0,1 0,1 1))"),
        Err(sfgeom::wkt::error::WktError::Malformed(_))
    );
}

#[test]
fn multi_curve_members_keep_their_types() {
    let Geometry::Multi(MultiGeometry::MultiCurve(multi)) =
        parse("MULTICURVE((0 0,5 5),CIRCULARSTRING(4 0,4 4,8 4))")
    else {
        panic!("multi curve expected");
    };

    assert_eq!(multi.len(), 2);
    let first = multi.get(0).expect("first member");
    let second = multi.get(1).expect("second member");
    assert_eq!(first.curve_type(), CurveType::LineString);
    assert_eq!(second.curve_type(), CurveType::Curve);
    assert_matches!(second.curve_segments()[..], [CurveSegment::ArcString(_)]);
}

#[test]
fn straight_curve_polygon_reads_back_as_polygon() {
    let geometry = parse("CURVEPOLYGON ((0 0,1 0,1 1,0 0))");
    insta::assert_snapshot!(to_wkt(&geometry).expect("writable"), @"POLYGON ((0 0,1 0,1 1,0 0))");
}

#[test]
fn plain_wkt_linearizes_curves() {
    let geometry = parse("MULTICURVE ((0 0,5 5),CIRCULARSTRING (0 0,1 1,2 0))");
    let writer = WktWriter::new(
        WktFlags::default()
            .with_sql_mm(false)
            .with_linearization(true),
        DecimalCoordinateFormatter::shortest(),
    );

    let text = writer.write(&geometry).expect("writable");
    assert!(text.starts_with("MULTILINESTRING ((0 0,5 5),(0 0,"));
    assert!(text.ends_with(",2 0))"));
}

#[test]
fn srid_prefix() {
    let geometry = parse("SRID=4326;POINT (52 10)");
    assert_eq!(geometry.crs().and_then(|crs| crs.srid()), Some(4326));
    assert!(geometry.crs().is_some_and(|crs| sfgeom::is_left_handed(crs)));

    let writer = WktWriter::new(
        WktFlags::default().with_srid(true),
        DecimalCoordinateFormatter::shortest(),
    );
    insta::assert_snapshot!(writer.write(&geometry).expect("writable"), @"SRID=4326;POINT (52 10)");
}

#[test]
fn parsed_geometry_is_reprojected() {
    let geometry = parse("SRID=4326;POINT (52 10)");
    let projected = reproject(&geometry, &Arc::new(Crs::epsg3857())).expect("known transformation");

    let Geometry::Point(point) = &projected else {
        panic!("point expected");
    };
    assert_relative_eq!(point.x(), 1113194.9079327357, epsilon = 1e-2);
    assert_relative_eq!(point.y(), 6800125.454397307, epsilon = 1e-2);
    assert_eq!(projected.crs().and_then(|crs| crs.srid()), Some(3857));
}
