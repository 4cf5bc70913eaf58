//! Topology validation of geometries.
//!
//! [`GeometryValidator::validate`] walks a geometry depth first and returns a lazy iterator of
//! [`ValidationEvent`]s. The validator never rejects a geometry: everything it finds is reported as an event, and
//! the caller decides what counts as fatal.
//!
//! Order of events: parents before children, members of collections in order. For a surface patch: the checks of
//! the exterior ring and its winding, then the checks and the winding of each interior ring, then the relations of
//! each interior ring to the exterior one, then the relations of every pair of interior rings.

use std::collections::VecDeque;

use sfgeom_types::cartesian::{CartesianClosedContour, Winding};
use sfgeom_types::{
    CurveLinearizer, CurveSegment, Geometry, LinearizationCriterion, MultiGeometry, Point,
    PolygonPatch, Ring, Surface,
};

mod checks;
mod event;

pub use event::{
    ExteriorRingOrientation, GeometryParticle, Hierarchy, InteriorRingOrientation, ValidationEvent,
};

use checks::{boundary_intersection, dedup_points, find_self_intersection, is_within};

/// Inspects geometries for topological defects.
///
/// Arcs are linearized with the validator's criterion before any planar check is done.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeometryValidator {
    linearizer: CurveLinearizer,
}

impl GeometryValidator {
    /// Creates a validator that linearizes arcs with the default criterion.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a validator that linearizes arcs with the given criterion.
    pub fn with_criterion(criterion: LinearizationCriterion) -> Self {
        Self {
            linearizer: CurveLinearizer::new(criterion),
        }
    }

    /// Validates a geometry. The events are computed as the iterator is advanced.
    ///
    /// ```
    /// use sfgeom::validation::{GeometryValidator, ValidationEvent};
    /// use sfgeom::wkt::from_wkt;
    ///
    /// let geometry = from_wkt("LINESTRING (0 0,2 2,2 0,0 2)")?.expect("not empty");
    /// let events: Vec<_> = GeometryValidator::new().validate(&geometry).collect();
    ///
    /// assert_eq!(events.len(), 1);
    /// assert!(matches!(events[0], ValidationEvent::CurveSelfIntersection { .. }));
    /// # Ok::<(), sfgeom::wkt::error::WktError>(())
    /// ```
    pub fn validate<'a>(&self, geometry: &'a Geometry) -> ValidationEvents<'a> {
        self.validate_with_hierarchy(geometry, Vec::new())
    }

    /// Validates a geometry that is a part of a larger tree. `hierarchy` is the path to the geometry, it is
    /// prepended to the hierarchy of every event.
    pub fn validate_with_hierarchy<'a>(
        &self,
        geometry: &'a Geometry,
        hierarchy: Hierarchy<'a>,
    ) -> ValidationEvents<'a> {
        ValidationEvents {
            linearizer: self.linearizer,
            tasks: vec![Task::Geometry(geometry, hierarchy)],
            pending: VecDeque::new(),
        }
    }

    /// True if validation of the geometry reports no defects.
    pub fn is_valid(&self, geometry: &Geometry) -> bool {
        !self.validate(geometry).any(|event| event.is_defect())
    }
}

enum Task<'a> {
    Geometry(&'a Geometry, Hierarchy<'a>),
    Surface(&'a Surface, Hierarchy<'a>),
    Patch(&'a PolygonPatch, Hierarchy<'a>),
    Curve(GeometryParticle<'a>, Hierarchy<'a>),
    ExteriorOrientation(&'a PolygonPatch, Hierarchy<'a>),
    InteriorOrientation(&'a PolygonPatch, usize, Hierarchy<'a>),
    RingRelations(&'a PolygonPatch, Hierarchy<'a>),
}

/// Lazy sequence of validation events of one geometry.
///
/// Created by [`GeometryValidator::validate`]. The sequence is finite and cannot be restarted: validate the
/// geometry again to get a new one.
pub struct ValidationEvents<'a> {
    linearizer: CurveLinearizer,
    tasks: Vec<Task<'a>>,
    pending: VecDeque<ValidationEvent<'a>>,
}

impl<'a> Iterator for ValidationEvents<'a> {
    type Item = ValidationEvent<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Some(event);
            }

            let task = self.tasks.pop()?;
            self.run(task);
        }
    }
}

impl<'a> ValidationEvents<'a> {
    fn run(&mut self, task: Task<'a>) {
        match task {
            Task::Geometry(geometry, hierarchy) => self.descend_geometry(geometry, hierarchy),
            Task::Surface(surface, hierarchy) => self.descend_surface(surface, hierarchy),
            Task::Patch(patch, hierarchy) => self.descend_patch(patch, hierarchy),
            Task::Curve(curve, hierarchy) => self.check_curve(curve, hierarchy),
            Task::ExteriorOrientation(patch, hierarchy) => {
                let is_clockwise = self.is_clockwise(patch.exterior());
                log::debug!("Exterior ring clockwise: {is_clockwise}");
                self.pending
                    .push_back(ValidationEvent::ExteriorRingOrientation(
                        ExteriorRingOrientation {
                            patch,
                            is_clockwise,
                            hierarchy,
                        },
                    ));
            }
            Task::InteriorOrientation(patch, ring_index, hierarchy) => {
                let Some(ring) = patch.interiors().get(ring_index) else {
                    return;
                };

                let is_clockwise = self.is_clockwise(ring);
                log::debug!("Interior ring {ring_index} clockwise: {is_clockwise}");
                self.pending
                    .push_back(ValidationEvent::InteriorRingOrientation(
                        InteriorRingOrientation {
                            patch,
                            ring_index,
                            is_clockwise,
                            hierarchy,
                        },
                    ));
            }
            Task::RingRelations(patch, hierarchy) => self.check_ring_relations(patch, hierarchy),
        }
    }

    /// Schedules tasks so that they are run in the given order.
    fn schedule(&mut self, tasks: Vec<Task<'a>>) {
        self.tasks.extend(tasks.into_iter().rev());
    }

    fn descend_geometry(&mut self, geometry: &'a Geometry, hierarchy: Hierarchy<'a>) {
        match geometry {
            Geometry::Point(_) => log::debug!("Nothing to validate for a point"),
            Geometry::Curve(curve) => self.schedule(vec![Task::Curve(
                GeometryParticle::Curve(curve),
                hierarchy,
            )]),
            Geometry::Ring(ring) => {
                self.schedule(vec![Task::Curve(GeometryParticle::Ring(ring), hierarchy)])
            }
            Geometry::Surface(surface) => self.schedule(vec![Task::Surface(surface, hierarchy)]),
            Geometry::Multi(multi) => {
                let hierarchy = extend(&hierarchy, GeometryParticle::Geometry(geometry));
                let tasks = match multi {
                    MultiGeometry::MultiPoint(_) => vec![],
                    MultiGeometry::MultiLineString(curves) | MultiGeometry::MultiCurve(curves) => {
                        curves
                            .iter()
                            .map(|curve| {
                                Task::Curve(GeometryParticle::Curve(curve), hierarchy.clone())
                            })
                            .collect()
                    }
                    MultiGeometry::MultiPolygon(surfaces)
                    | MultiGeometry::MultiSurface(surfaces) => surfaces
                        .iter()
                        .map(|surface| Task::Surface(surface, hierarchy.clone()))
                        .collect(),
                };

                self.schedule(tasks);
            }
        }
    }

    fn descend_surface(&mut self, surface: &'a Surface, hierarchy: Hierarchy<'a>) {
        let hierarchy = extend(&hierarchy, GeometryParticle::Surface(surface));
        let patches = surface.patches();
        if patches.len() > 1 {
            log::warn!(
                "Surface has {} patches, topology between patches is not validated",
                patches.len()
            );
        }

        self.schedule(
            patches
                .iter()
                .map(|patch| Task::Patch(patch, hierarchy.clone()))
                .collect(),
        );
    }

    fn descend_patch(&mut self, patch: &'a PolygonPatch, hierarchy: Hierarchy<'a>) {
        let hierarchy = extend(&hierarchy, GeometryParticle::Patch(patch));
        let mut tasks = vec![
            Task::Curve(GeometryParticle::Ring(patch.exterior()), hierarchy.clone()),
            Task::ExteriorOrientation(patch, hierarchy.clone()),
        ];

        for (index, ring) in patch.interiors().iter().enumerate() {
            tasks.push(Task::Curve(GeometryParticle::Ring(ring), hierarchy.clone()));
            tasks.push(Task::InteriorOrientation(patch, index, hierarchy.clone()));
        }

        tasks.push(Task::RingRelations(patch, hierarchy));
        self.schedule(tasks);
    }

    fn check_curve(&mut self, curve: GeometryParticle<'a>, hierarchy: Hierarchy<'a>) {
        let hierarchy = extend(&hierarchy, curve);
        let segments: Vec<&'a CurveSegment> = match curve {
            GeometryParticle::Curve(c) => c.curve_segments(),
            GeometryParticle::Ring(r) => r.curve_segments(),
            _ => return,
        };

        log::debug!("Checking {curve} for duplicate points");
        for segment in segments.iter().copied() {
            match segment {
                CurveSegment::LineStringSegment(line) => {
                    for pair in line.control_points().windows(2) {
                        if pair[0] == pair[1] {
                            self.pending.push_back(ValidationEvent::DuplicatePoints {
                                curve,
                                point: &pair[0],
                                hierarchy: hierarchy.clone(),
                            });
                        }
                    }
                }
                CurveSegment::ArcString(_) => {
                    log::debug!("Skipping duplicate point check for an arc string segment")
                }
            }
        }

        log::debug!("Checking {curve} for continuity");
        for (segment_index, pair) in segments.windows(2).enumerate() {
            if !pair[0].end_point().equals_2d(pair[1].start_point()) {
                self.pending.push_back(ValidationEvent::CurveDiscontinuity {
                    curve,
                    segment_index,
                    hierarchy: hierarchy.clone(),
                });
            }
        }

        log::debug!("Checking {curve} for self intersection");
        let points = dedup_points(self.linearizer.linearize_points(segments.iter().copied()));
        if let Some(location) = find_self_intersection(&points) {
            self.pending
                .push_back(ValidationEvent::CurveSelfIntersection {
                    curve,
                    location: Some(location),
                    hierarchy: hierarchy.clone(),
                });
        }

        if let GeometryParticle::Ring(ring) = curve {
            log::debug!("Checking ring closure");
            if !ring.is_closed() {
                self.pending
                    .push_back(ValidationEvent::RingNotClosed { ring, hierarchy });
            }
        }
    }

    fn check_ring_relations(&mut self, patch: &'a PolygonPatch, hierarchy: Hierarchy<'a>) {
        if patch.interiors().is_empty() {
            return;
        }

        log::debug!("Checking relations of {} interior rings", patch.interiors().len());
        let exterior = self.ring_points(patch.exterior());
        let interiors: Vec<Vec<Point>> = patch
            .interiors()
            .iter()
            .map(|ring| self.ring_points(ring))
            .collect();

        for (ring_index, interior) in interiors.iter().enumerate() {
            if let Some(intersection) = boundary_intersection(interior, &exterior) {
                self.pending
                    .push_back(ValidationEvent::InteriorRingTouchesExterior {
                        patch,
                        ring_index,
                        location: Some(intersection.location),
                        single_point: intersection.single_point,
                        hierarchy: hierarchy.clone(),
                    });
            }

            if !is_within(interior, &exterior) || is_within(&exterior, interior) {
                self.pending
                    .push_back(ValidationEvent::InteriorRingOutsideExterior {
                        patch,
                        ring_index,
                        hierarchy: hierarchy.clone(),
                    });
            }
        }

        for (i, first) in interiors.iter().enumerate() {
            for (j, second) in interiors.iter().enumerate().skip(i + 1) {
                if let Some(intersection) = boundary_intersection(first, second) {
                    self.pending
                        .push_back(ValidationEvent::InteriorRingsIntersect {
                            patch,
                            ring1_index: i,
                            ring2_index: j,
                            location: Some(intersection.location),
                            single_point: intersection.single_point,
                            hierarchy: hierarchy.clone(),
                        });
                }

                if is_within(first, second) {
                    self.pending.push_back(ValidationEvent::InteriorRingsNested {
                        patch,
                        ring1_index: j,
                        ring2_index: i,
                        hierarchy: hierarchy.clone(),
                    });
                }

                if is_within(second, first) {
                    self.pending.push_back(ValidationEvent::InteriorRingsNested {
                        patch,
                        ring1_index: i,
                        ring2_index: j,
                        hierarchy: hierarchy.clone(),
                    });
                }
            }
        }
    }

    fn ring_points(&self, ring: &Ring) -> Vec<Point> {
        dedup_points(self.linearizer.linearize_points(ring.curve_segments()))
    }

    fn is_clockwise(&self, ring: &Ring) -> bool {
        self.ring_points(ring).as_slice().winding() == Winding::Clockwise
    }
}

fn extend<'a>(hierarchy: &Hierarchy<'a>, particle: GeometryParticle<'a>) -> Hierarchy<'a> {
    let mut extended = Vec::with_capacity(hierarchy.len() + 1);
    extended.extend_from_slice(hierarchy);
    extended.push(particle);
    extended
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use assert_matches::assert_matches;
    use sfgeom_types::{
        Crs, Curve, LineStringSegment, Polygon, SegmentedCurve,
    };

    use super::*;

    fn points(coords: &[(f64, f64)]) -> Vec<Point> {
        coords.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    fn ring(coords: &[(f64, f64)]) -> Ring {
        Ring::linear(points(coords)).expect("closed ring")
    }

    fn polygon(exterior: Ring, interiors: Vec<Ring>) -> Geometry {
        Geometry::Surface(Surface::from(
            Polygon::new(exterior, interiors).expect("valid polygon"),
        ))
    }

    const CCW_SQUARE: &[(f64, f64)] = &[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0), (0.0, 0.0)];
    const CW_HOLE: &[(f64, f64)] = &[(2.0, 2.0), (2.0, 4.0), (4.0, 4.0), (4.0, 2.0), (2.0, 2.0)];

    #[test]
    fn valid_polygon() {
        let geometry = polygon(ring(CCW_SQUARE), vec![ring(CW_HOLE)]);
        let events: Vec<_> = GeometryValidator::new().validate(&geometry).collect();

        assert_eq!(events.len(), 2);
        assert_matches!(&events[0], ValidationEvent::ExteriorRingOrientation(e) if e.is_exterior());
        assert_matches!(&events[1], ValidationEvent::InteriorRingOrientation(e) if e.is_interior() && e.ring_index == 0);
        assert!(GeometryValidator::new().is_valid(&geometry));
    }

    #[test]
    fn hierarchy_of_patch_events() {
        let geometry = polygon(ring(CCW_SQUARE), vec![]);
        let Geometry::Surface(surface) = &geometry else {
            unreachable!()
        };

        let events: Vec<_> = GeometryValidator::new().validate(&geometry).collect();
        assert_eq!(
            events[0].hierarchy(),
            &[
                GeometryParticle::Surface(surface),
                GeometryParticle::Patch(&surface.patches()[0])
            ]
        );
    }

    #[test]
    fn duplicate_points() {
        let geometry = Geometry::Curve(
            Curve::line_string(points(&[(0.0, 0.0), (1.0, 0.0), (1.0, 0.0), (2.0, 0.0)]))
                .expect("valid"),
        );

        let events: Vec<_> = GeometryValidator::new().validate(&geometry).collect();
        assert_eq!(events.len(), 1);
        assert_matches!(events[0], ValidationEvent::DuplicatePoints { point, .. } if *point == Point::new(1.0, 0.0));
    }

    #[test]
    fn discontinuity() {
        let segments = vec![
            CurveSegment::from(LineStringSegment::new(points(&[(0.0, 0.0), (1.0, 0.0)])).expect("valid")),
            CurveSegment::from(LineStringSegment::new(points(&[(1.0, 1.0), (2.0, 1.0)])).expect("valid")),
        ];
        let geometry = Geometry::Curve(Curve::Curve(SegmentedCurve::new_unchecked(segments)));

        let events: Vec<_> = GeometryValidator::new().validate(&geometry).collect();
        assert_eq!(events.len(), 1);
        assert_matches!(
            events[0],
            ValidationEvent::CurveDiscontinuity {
                segment_index: 0,
                ..
            }
        );
    }

    #[test]
    fn segments_meeting_in_plane_are_continuous() {
        let segments = vec![
            CurveSegment::from(
                LineStringSegment::new(vec![Point::new_3d(0.0, 0.0, 0.0), Point::new_3d(1.0, 0.0, 0.0)])
                    .expect("valid"),
            ),
            CurveSegment::from(
                LineStringSegment::new(vec![Point::new_3d(1.0, 0.0, 5.0), Point::new_3d(2.0, 1.0, 5.0)])
                    .expect("valid"),
            ),
        ];
        let geometry = Geometry::Curve(Curve::Curve(SegmentedCurve::new_unchecked(segments)));

        assert!(GeometryValidator::new().validate(&geometry).next().is_none());
    }

    #[test]
    fn self_intersecting_ring() {
        let geometry = Geometry::Ring(ring(&[(0.0, 0.0), (2.0, 2.0), (2.0, 0.0), (0.0, 2.0), (0.0, 0.0)]));

        let events: Vec<_> = GeometryValidator::new().validate(&geometry).collect();
        assert_eq!(events.len(), 1);
        assert_matches!(
            &events[0],
            ValidationEvent::CurveSelfIntersection { location: Some(p), .. } if *p == Point::new(1.0, 1.0)
        );
    }

    #[test]
    fn not_closed_ring() {
        let segment = LineStringSegment::new(points(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]))
            .expect("valid");
        let geometry = Geometry::Ring(Ring::linear_unchecked(segment));

        let events: Vec<_> = GeometryValidator::new().validate(&geometry).collect();
        assert_eq!(events.len(), 1);
        assert_matches!(events[0], ValidationEvent::RingNotClosed { .. });
    }

    #[test]
    fn wrong_orientation() {
        let exterior: Vec<_> = CCW_SQUARE.iter().rev().copied().collect();
        let interior: Vec<_> = CW_HOLE.iter().rev().copied().collect();
        let geometry = polygon(ring(&exterior), vec![ring(&interior)]);

        let events: Vec<_> = GeometryValidator::new().validate(&geometry).collect();
        assert_matches!(&events[0], ValidationEvent::ExteriorRingOrientation(e) if e.is_clockwise && !e.is_exterior());
        assert_matches!(&events[1], ValidationEvent::InteriorRingOrientation(e) if !e.is_clockwise && !e.is_interior());
        assert!(!GeometryValidator::new().is_valid(&geometry));
    }

    #[test]
    fn orientation_in_left_handed_crs() {
        let crs = Arc::new(Crs::epsg4326());
        let exterior: Vec<_> = CCW_SQUARE.iter().rev().copied().collect();
        let geometry = polygon(ring(&exterior), vec![]).with_crs(Some(crs));

        let events: Vec<_> = GeometryValidator::new().validate(&geometry).collect();
        assert_matches!(&events[0], ValidationEvent::ExteriorRingOrientation(e) if e.is_clockwise && e.is_exterior());
    }

    #[test]
    fn hole_touching_exterior() {
        let hole = ring(&[(0.0, 5.0), (5.0, 6.0), (5.0, 4.0), (0.0, 5.0)]);
        let geometry = polygon(ring(CCW_SQUARE), vec![hole]);

        let events: Vec<_> = GeometryValidator::new()
            .validate(&geometry)
            .filter(ValidationEvent::is_defect)
            .collect();
        assert_eq!(events.len(), 1);
        assert_matches!(
            &events[0],
            ValidationEvent::InteriorRingTouchesExterior {
                ring_index: 0,
                single_point: true,
                location: Some(p),
                ..
            } if *p == Point::new(0.0, 5.0)
        );
    }

    #[test]
    fn hole_outside_exterior() {
        let hole = ring(&[(20.0, 20.0), (20.0, 30.0), (30.0, 30.0), (30.0, 20.0), (20.0, 20.0)]);
        let geometry = polygon(ring(CCW_SQUARE), vec![hole]);

        let events: Vec<_> = GeometryValidator::new()
            .validate(&geometry)
            .filter(ValidationEvent::is_defect)
            .collect();
        assert_eq!(events.len(), 1);
        assert_matches!(
            events[0],
            ValidationEvent::InteriorRingOutsideExterior { ring_index: 0, .. }
        );
    }

    #[test]
    fn nested_holes() {
        let outer_hole = ring(&[(1.0, 1.0), (1.0, 9.0), (9.0, 9.0), (9.0, 1.0), (1.0, 1.0)]);
        let geometry = polygon(ring(CCW_SQUARE), vec![ring(CW_HOLE), outer_hole]);

        let events: Vec<_> = GeometryValidator::new()
            .validate(&geometry)
            .filter(ValidationEvent::is_defect)
            .collect();
        assert_eq!(events.len(), 1);
        assert_matches!(
            events[0],
            ValidationEvent::InteriorRingsNested {
                ring1_index: 1,
                ring2_index: 0,
                ..
            }
        );
    }

    #[test]
    fn intersecting_holes() {
        let second = ring(&[(3.0, 3.0), (3.0, 5.0), (5.0, 5.0), (5.0, 3.0), (3.0, 3.0)]);
        let geometry = polygon(ring(CCW_SQUARE), vec![ring(CW_HOLE), second]);

        let events: Vec<_> = GeometryValidator::new()
            .validate(&geometry)
            .filter(ValidationEvent::is_defect)
            .collect();
        assert_eq!(events.len(), 1);
        assert_matches!(
            events[0],
            ValidationEvent::InteriorRingsIntersect {
                ring1_index: 0,
                ring2_index: 1,
                single_point: false,
                ..
            }
        );
    }

    #[test]
    fn multi_geometry_members_in_order() {
        let first = Curve::line_string(points(&[(0.0, 0.0), (0.0, 0.0), (1.0, 1.0)])).expect("valid");
        let second =
            Curve::line_string(points(&[(0.0, 0.0), (2.0, 2.0), (2.0, 0.0), (0.0, 2.0)])).expect("valid");
        let geometry = Geometry::Multi(
            MultiGeometry::multi_curve(vec![Some(first), None, Some(second)]).expect("valid"),
        );

        let events: Vec<_> = GeometryValidator::new().validate(&geometry).collect();
        assert_eq!(events.len(), 2);
        assert_matches!(events[0], ValidationEvent::DuplicatePoints { .. });
        assert_matches!(events[1], ValidationEvent::CurveSelfIntersection { .. });
        assert_eq!(events[1].hierarchy().len(), 2);
        assert_eq!(events[1].hierarchy()[0], GeometryParticle::Geometry(&geometry));
    }

    #[test]
    fn circle_ring_is_valid() {
        let circle = Ring::from_curves(vec![Curve::arc_string(points(&[
            (0.0, 0.0),
            (4.0, 0.0),
            (0.0, 0.0),
        ]))
        .expect("valid")])
        .expect("closed");
        let hole = ring(&[(1.0, -0.5), (1.0, 0.5), (2.0, 0.5), (2.0, -0.5), (1.0, -0.5)]);
        let geometry = polygon(circle, vec![hole]);

        assert!(GeometryValidator::new().is_valid(&geometry));
    }

    #[test]
    fn events_are_lazy() {
        let geometry = Geometry::Ring(ring(&[(0.0, 0.0), (2.0, 2.0), (2.0, 0.0), (0.0, 2.0), (0.0, 0.0)]));
        let mut events = GeometryValidator::new().validate(&geometry);

        assert_eq!(events.tasks.len(), 1);
        assert!(events.next().is_some());
        assert!(events.next().is_none());
        assert!(events.next().is_none());
    }
}
