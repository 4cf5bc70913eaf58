use std::sync::Arc;

use assert_matches::assert_matches;
use sfgeom::types::{Crs, LineStringSegment, MultiGeometry, Ring};
use sfgeom::validation::{GeometryParticle, GeometryValidator, ValidationEvent};
use sfgeom::wkt::{from_wkt, WktReader};
use sfgeom::{Geometry, Point};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn parse(wkt: &str) -> Geometry {
    from_wkt(wkt)
        .expect("valid wkt")
        .expect("not empty geometry")
}

fn defects(geometry: &Geometry) -> Vec<ValidationEvent<'_>> {
    GeometryValidator::new()
        .validate(geometry)
        .filter(ValidationEvent::is_defect)
        .collect()
}

#[test]
fn not_closed_ring_is_reported_once() {
    init_logger();

    let segment = LineStringSegment::new(vec![
        Point::new(0.0, 0.0),
        Point::new(10.0, 0.0),
        Point::new(10.0, 10.0),
        Point::new(0.0, 10.0),
    ])
    .expect("valid segment");
    let geometry = Geometry::Ring(Ring::linear_unchecked(segment));
    let Geometry::Ring(ring) = &geometry else {
        unreachable!()
    };

    let events: Vec<_> = GeometryValidator::new().validate(&geometry).collect();
    let not_closed: Vec<_> = events
        .iter()
        .filter(|event| matches!(event, ValidationEvent::RingNotClosed { .. }))
        .collect();

    assert_eq!(not_closed.len(), 1);
    assert_matches!(not_closed[0], ValidationEvent::RingNotClosed { ring: r, .. } if *r == ring);
}

#[test]
fn clockwise_exterior_in_right_handed_crs() {
    init_logger();

    let geometry = WktReader::new()
        .with_crs(Arc::new(Crs::epsg3857()))
        .read("POLYGON ((0 0,0 10,10 10,10 0,0 0))")
        .expect("valid wkt")
        .expect("not empty geometry");

    let event = GeometryValidator::new()
        .validate(&geometry)
        .next()
        .expect("orientation event");
    assert_matches!(event, ValidationEvent::ExteriorRingOrientation(e) if e.is_clockwise && !e.is_exterior());
}

#[test]
fn clockwise_exterior_in_left_handed_crs() {
    init_logger();

    let geometry = parse("SRID=4326;POLYGON ((0 0,0 10,10 10,10 0,0 0))");
    let event = GeometryValidator::new()
        .validate(&geometry)
        .next()
        .expect("orientation event");
    assert_matches!(event, ValidationEvent::ExteriorRingOrientation(e) if e.is_clockwise && e.is_exterior());
    assert!(GeometryValidator::new().is_valid(&geometry));
}

#[test]
fn events_follow_patch_order() {
    init_logger();

    let geometry = parse(
        "POLYGON ((0 0,10 0,10 10,0 10,0 0),(1 1,1 1,1 3,3 3,3 1,1 1),(2 2,2 5,5 5,5 2,2 2))",
    );

    let names: Vec<_> = GeometryValidator::new()
        .validate(&geometry)
        .map(|event| match event {
            ValidationEvent::DuplicatePoints { .. } => "duplicate",
            ValidationEvent::ExteriorRingOrientation(_) => "exterior",
            ValidationEvent::InteriorRingOrientation(_) => "interior",
            ValidationEvent::InteriorRingsIntersect { .. } => "intersect",
            _ => "other",
        })
        .collect();

    assert_eq!(
        names,
        ["exterior", "duplicate", "interior", "interior", "intersect"]
    );
}

#[test]
fn hole_sharing_exterior_edge() {
    init_logger();

    let geometry = parse("POLYGON ((0 0,10 0,10 10,0 10,0 0),(0 2,0 4,3 4,3 2,0 2))");
    let events = defects(&geometry);

    assert_eq!(events.len(), 1);
    assert_matches!(
        events[0],
        ValidationEvent::InteriorRingTouchesExterior {
            ring_index: 0,
            single_point: false,
            ..
        }
    );
}

#[test]
fn hole_equal_to_exterior() {
    init_logger();

    let geometry = parse("POLYGON ((0 0,10 0,10 10,0 10,0 0),(0 0,0 10,10 10,10 0,0 0))");
    let events = defects(&geometry);

    assert_eq!(events.len(), 2);
    assert_matches!(events[0], ValidationEvent::InteriorRingTouchesExterior { .. });
    assert_matches!(events[1], ValidationEvent::InteriorRingOutsideExterior { ring_index: 0, .. });
}

#[test]
fn hole_crossing_notch_of_exterior() {
    init_logger();

    let geometry = parse(
        "POLYGON ((0 0,10 0,10 10,3.5 10,3 2,2.5 10,0 10,0 0),(1 5,9 5,9 1,1 1,1 5))",
    );
    let events = defects(&geometry);

    assert_eq!(events.len(), 2, "{events:?}");
    assert_matches!(
        events[0],
        ValidationEvent::InteriorRingTouchesExterior {
            ring_index: 0,
            single_point: false,
            ..
        }
    );
    assert_matches!(events[1], ValidationEvent::InteriorRingOutsideExterior { ring_index: 0, .. });

    let below_notch = parse(
        "POLYGON ((0 0,10 0,10 10,3.5 10,3 2,2.5 10,0 10,0 0),(1 1.5,9 1.5,9 1,1 1,1 1.5))",
    );
    assert!(GeometryValidator::new().is_valid(&below_notch));
}

#[test]
fn self_intersecting_arc_curve() {
    init_logger();

    let geometry = parse("COMPOUNDCURVE (CIRCULARSTRING (0 0,2 2,4 0),(4 0,2 4))");
    let events = defects(&geometry);

    assert_eq!(events.len(), 1);
    assert_matches!(
        &events[0],
        ValidationEvent::CurveSelfIntersection { location: Some(_), curve: GeometryParticle::Curve(_), .. }
    );
}

#[test]
fn multi_surface_hierarchy() {
    init_logger();

    let geometry = parse(
        "MULTISURFACE (((0 0,10 0,10 10,0 10,0 0)),CURVEPOLYGON (CIRCULARSTRING (20 0,24 0,20 0),(21 1,21 1,22 0,21 -1,21 1)))",
    );
    let events = defects(&geometry);

    assert_eq!(events.len(), 1);
    let ValidationEvent::DuplicatePoints { curve, hierarchy, .. } = &events[0] else {
        panic!("duplicate points expected");
    };

    assert_matches!(curve, GeometryParticle::Ring(_));
    assert_eq!(hierarchy.len(), 4);
    assert_matches!(hierarchy[0], GeometryParticle::Geometry(Geometry::Multi(_)));
    assert_matches!(hierarchy[1], GeometryParticle::Surface(_));
    assert_matches!(hierarchy[2], GeometryParticle::Patch(_));
    assert_eq!(hierarchy[3], *curve);
}

#[test]
fn parent_hierarchy_is_prepended() {
    init_logger();

    let parent = parse("MULTICURVE ((0 0,1 1),(0 0,1 1,1 1))");
    let Geometry::Multi(MultiGeometry::MultiCurve(curves)) = &parent else {
        unreachable!()
    };
    let member = Geometry::Curve(curves.get(1).expect("member").clone());

    let events: Vec<_> = GeometryValidator::new()
        .validate_with_hierarchy(&member, vec![GeometryParticle::Geometry(&parent)])
        .collect();

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].hierarchy().len(), 2);
    assert_eq!(events[0].hierarchy()[0], GeometryParticle::Geometry(&parent));
}
