use std::fmt::{Display, Formatter};

use sfgeom_types::{is_left_handed, Curve, Geometry, Point, PolygonPatch, Ring, Surface};

/// A node of the geometry tree referenced by validation events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeometryParticle<'a> {
    /// Top level geometry or a collection.
    Geometry(&'a Geometry),
    /// Curve.
    Curve(&'a Curve),
    /// Ring, either a surface boundary or a standalone one.
    Ring(&'a Ring),
    /// Surface.
    Surface(&'a Surface),
    /// Patch of a surface.
    Patch(&'a PolygonPatch),
}

impl Display for GeometryParticle<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            GeometryParticle::Geometry(_) => "geometry",
            GeometryParticle::Curve(_) => "curve",
            GeometryParticle::Ring(_) => "ring",
            GeometryParticle::Surface(_) => "surface",
            GeometryParticle::Patch(_) => "patch",
        };

        write!(f, "{name}")
    }
}

/// Path from the validated geometry down to the particle an event is about. The last element is the particle
/// itself (or its closest container for events about parts of a patch).
pub type Hierarchy<'a> = Vec<GeometryParticle<'a>>;

/// Winding of the exterior ring of a patch.
#[derive(Debug, Clone, PartialEq)]
pub struct ExteriorRingOrientation<'a> {
    /// Patch of the ring.
    pub patch: &'a PolygonPatch,
    /// Raw winding of the ring in its coordinate space.
    pub is_clockwise: bool,
    /// Path to the patch.
    pub hierarchy: Hierarchy<'a>,
}

impl ExteriorRingOrientation<'_> {
    /// Whether the winding is the one expected of an exterior ring.
    ///
    /// Exterior rings go counterclockwise. In a left-handed CRS of the ring the expectation is reversed.
    pub fn is_exterior(&self) -> bool {
        let left_handed = self
            .patch
            .exterior()
            .crs()
            .is_some_and(|crs| is_left_handed(crs));
        !self.is_clockwise ^ left_handed
    }
}

/// Winding of one of the interior rings of a patch.
#[derive(Debug, Clone, PartialEq)]
pub struct InteriorRingOrientation<'a> {
    /// Patch of the ring.
    pub patch: &'a PolygonPatch,
    /// Index of the ring among the interior rings of the patch.
    pub ring_index: usize,
    /// Raw winding of the ring in its coordinate space.
    pub is_clockwise: bool,
    /// Path to the patch.
    pub hierarchy: Hierarchy<'a>,
}

impl InteriorRingOrientation<'_> {
    /// Whether the winding is the one expected of an interior ring.
    ///
    /// Interior rings go clockwise, unless the CRS of this ring is left-handed.
    pub fn is_interior(&self) -> bool {
        let left_handed = self
            .patch
            .interiors()
            .get(self.ring_index)
            .and_then(Ring::crs)
            .is_some_and(|crs| is_left_handed(crs));
        self.is_clockwise ^ left_handed
    }
}

/// Finding of the [`GeometryValidator`](super::GeometryValidator).
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationEvent<'a> {
    /// First and last control points of a ring differ.
    RingNotClosed {
        /// The ring.
        ring: &'a Ring,
        /// Path to the ring.
        hierarchy: Hierarchy<'a>,
    },
    /// Two consecutive control points of a line string segment are equal.
    DuplicatePoints {
        /// Curve or ring containing the segment.
        curve: GeometryParticle<'a>,
        /// The repeated point.
        point: &'a Point,
        /// Path to the curve.
        hierarchy: Hierarchy<'a>,
    },
    /// End point of a segment is not the start point of the next one.
    CurveDiscontinuity {
        /// Curve or ring.
        curve: GeometryParticle<'a>,
        /// Index of the segment whose end point is off.
        segment_index: usize,
        /// Path to the curve.
        hierarchy: Hierarchy<'a>,
    },
    /// Linework of a curve crosses or touches itself.
    CurveSelfIntersection {
        /// Curve or ring.
        curve: GeometryParticle<'a>,
        /// Where the intersection was found.
        location: Option<Point>,
        /// Path to the curve.
        hierarchy: Hierarchy<'a>,
    },
    /// Winding of an exterior ring.
    ExteriorRingOrientation(ExteriorRingOrientation<'a>),
    /// Winding of an interior ring.
    InteriorRingOrientation(InteriorRingOrientation<'a>),
    /// Boundary of an interior ring intersects the exterior ring.
    InteriorRingTouchesExterior {
        /// Patch of the rings.
        patch: &'a PolygonPatch,
        /// Index of the interior ring.
        ring_index: usize,
        /// A common point of the boundaries.
        location: Option<Point>,
        /// True if the boundaries have exactly one common point.
        single_point: bool,
        /// Path to the patch.
        hierarchy: Hierarchy<'a>,
    },
    /// Interior ring is not inside the exterior one.
    InteriorRingOutsideExterior {
        /// Patch of the rings.
        patch: &'a PolygonPatch,
        /// Index of the interior ring.
        ring_index: usize,
        /// Path to the patch.
        hierarchy: Hierarchy<'a>,
    },
    /// Boundaries of two interior rings intersect.
    InteriorRingsIntersect {
        /// Patch of the rings.
        patch: &'a PolygonPatch,
        /// Index of the first ring.
        ring1_index: usize,
        /// Index of the second ring.
        ring2_index: usize,
        /// A common point of the boundaries.
        location: Option<Point>,
        /// True if the boundaries have exactly one common point.
        single_point: bool,
        /// Path to the patch.
        hierarchy: Hierarchy<'a>,
    },
    /// One interior ring lies inside another one.
    InteriorRingsNested {
        /// Patch of the rings.
        patch: &'a PolygonPatch,
        /// Index of the enclosing ring.
        ring1_index: usize,
        /// Index of the enclosed ring.
        ring2_index: usize,
        /// Path to the patch.
        hierarchy: Hierarchy<'a>,
    },
}

impl<'a> ValidationEvent<'a> {
    /// Path from the validated geometry to the particle of the event.
    pub fn hierarchy(&self) -> &[GeometryParticle<'a>] {
        match self {
            ValidationEvent::RingNotClosed { hierarchy, .. }
            | ValidationEvent::DuplicatePoints { hierarchy, .. }
            | ValidationEvent::CurveDiscontinuity { hierarchy, .. }
            | ValidationEvent::CurveSelfIntersection { hierarchy, .. }
            | ValidationEvent::InteriorRingTouchesExterior { hierarchy, .. }
            | ValidationEvent::InteriorRingOutsideExterior { hierarchy, .. }
            | ValidationEvent::InteriorRingsIntersect { hierarchy, .. }
            | ValidationEvent::InteriorRingsNested { hierarchy, .. } => hierarchy,
            ValidationEvent::ExteriorRingOrientation(event) => &event.hierarchy,
            ValidationEvent::InteriorRingOrientation(event) => &event.hierarchy,
        }
    }

    /// True if the event reports a defect. Orientation events are defects only when the winding contradicts the
    /// convention for the ring.
    pub fn is_defect(&self) -> bool {
        match self {
            ValidationEvent::ExteriorRingOrientation(event) => !event.is_exterior(),
            ValidationEvent::InteriorRingOrientation(event) => !event.is_interior(),
            _ => true,
        }
    }
}

impl Display for ValidationEvent<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationEvent::RingNotClosed { .. } => write!(f, "ring is not closed"),
            ValidationEvent::DuplicatePoints { curve, point, .. } => {
                write!(f, "{curve} has duplicate point {point}")
            }
            ValidationEvent::CurveDiscontinuity {
                curve,
                segment_index,
                ..
            } => write!(
                f,
                "{curve} is discontinuous after segment {segment_index}"
            ),
            ValidationEvent::CurveSelfIntersection {
                curve, location, ..
            } => match location {
                Some(location) => write!(f, "{curve} intersects itself at {location}"),
                None => write!(f, "{curve} intersects itself"),
            },
            ValidationEvent::ExteriorRingOrientation(event) => {
                let expected = if event.is_exterior() { "" } else { "un" };
                write!(
                    f,
                    "exterior ring is {} ({expected}expected)",
                    winding_name(event.is_clockwise)
                )
            }
            ValidationEvent::InteriorRingOrientation(event) => {
                let expected = if event.is_interior() { "" } else { "un" };
                write!(
                    f,
                    "interior ring {} is {} ({expected}expected)",
                    event.ring_index,
                    winding_name(event.is_clockwise)
                )
            }
            ValidationEvent::InteriorRingTouchesExterior {
                ring_index,
                single_point,
                ..
            } => {
                write!(f, "interior ring {ring_index} touches exterior ring")?;
                if *single_point {
                    write!(f, " in one point")?;
                }
                Ok(())
            }
            ValidationEvent::InteriorRingOutsideExterior { ring_index, .. } => {
                write!(f, "interior ring {ring_index} is outside of exterior ring")
            }
            ValidationEvent::InteriorRingsIntersect {
                ring1_index,
                ring2_index,
                ..
            } => write!(
                f,
                "interior rings {ring1_index} and {ring2_index} intersect"
            ),
            ValidationEvent::InteriorRingsNested {
                ring1_index,
                ring2_index,
                ..
            } => write!(
                f,
                "interior ring {ring2_index} is inside interior ring {ring1_index}"
            ),
        }
    }
}

fn winding_name(is_clockwise: bool) -> &'static str {
    if is_clockwise {
        "clockwise"
    } else {
        "counterclockwise"
    }
}
