//! Approximation of circular arcs by straight line segments.
//!
//! Control points are always kept exactly: the first and the last point of every arc appear unchanged in the result,
//! only the points between them are computed.

use std::f64::consts::{PI, TAU};

use serde::{Deserialize, Serialize};

use crate::cartesian::Orientation;
use crate::curve::{Curve, LineString};
use crate::curve_segment::{CurveSegment, LineStringSegment};
use crate::geometry::Geometry;
use crate::multi::{Multi, MultiGeometry};
use crate::point::Point;
use crate::ring::Ring;
use crate::surface::{Polygon, PolygonPatch, Surface};

/// Collinearity tolerance, relative to the squared length of the longest side of the control point triangle.
const EPSILON: f64 = 1e-12;

/// Determines how many points are used to approximate an arc.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub enum LinearizationCriterion {
    /// Fixed number of points for a full circle; arcs get a share proportional to their sweep angle.
    PointsPerCircle(usize),
    /// Maximum distance between the arc and its approximation, in CRS units.
    MaxError {
        /// Maximum allowed deviation.
        error: f64,
        /// Upper limit of points per arc.
        max_points: usize,
    },
}

impl Default for LinearizationCriterion {
    fn default() -> Self {
        Self::PointsPerCircle(100)
    }
}

impl LinearizationCriterion {
    /// Number of points (including both ends) to approximate an arc with the given sweep angle and radius.
    pub fn num_points(&self, sweep: f64, radius: f64) -> usize {
        let count = match *self {
            LinearizationCriterion::PointsPerCircle(per_circle) => {
                let intervals = (sweep / TAU * per_circle.saturating_sub(1) as f64).ceil();
                intervals as usize + 1
            }
            LinearizationCriterion::MaxError { error, max_points } => {
                let step = if error > 0.0 && error < radius {
                    2.0 * (1.0 - error / radius).acos()
                } else {
                    PI
                };
                ((sweep / step).ceil() as usize + 1).min(max_points)
            }
        };

        count.max(2)
    }
}

/// Converts curves and everything that contains curves into linear geometries.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurveLinearizer {
    criterion: LinearizationCriterion,
}

impl CurveLinearizer {
    /// Creates a new linearizer.
    pub fn new(criterion: LinearizationCriterion) -> Self {
        Self { criterion }
    }

    /// Criterion of the linearizer.
    pub fn criterion(&self) -> LinearizationCriterion {
        self.criterion
    }

    /// Approximates a single arc given by its start, mid and end points.
    ///
    /// * Three equal points (a point arc) give the start and the end point.
    /// * Equal start and end points give a full circle through the mid point, traversed counterclockwise from the
    ///   start point.
    /// * Collinear points are returned as is.
    pub fn linearize_arc(&self, p0: &Point, p1: &Point, p2: &Point) -> Vec<Point> {
        if p0.equals_2d(p2) {
            if p0.equals_2d(p1) {
                return vec![p0.clone(), p2.clone()];
            }

            let center = (
                (p0.x() + p1.x()) / 2.0,
                (p0.y() + p1.y()) / 2.0,
            );
            return self.interpolate(p0, p2, center, TAU, false);
        }

        if are_collinear(p0, p1, p2) {
            return vec![p0.clone(), p1.clone(), p2.clone()];
        }

        let (ox, oy) = shift(p0, p1, p2);
        let (cx, cy) = circle_center(
            (p0.x() - ox, p0.y() - oy),
            (p1.x() - ox, p1.y() - oy),
            (p2.x() - ox, p2.y() - oy),
        );
        let center = (cx + ox, cy + oy);

        let start_angle = (p0.y() - center.1).atan2(p0.x() - center.0);
        let end_angle = (p2.y() - center.1).atan2(p2.x() - center.0);
        let clockwise = is_clockwise(p0, p1, p2);

        let mut sweep = if clockwise {
            start_angle - end_angle
        } else {
            end_angle - start_angle
        };
        if sweep <= 0.0 {
            sweep += TAU;
        }

        self.interpolate(p0, p2, center, sweep, clockwise)
    }

    fn interpolate(
        &self,
        start: &Point,
        end: &Point,
        center: (f64, f64),
        sweep: f64,
        clockwise: bool,
    ) -> Vec<Point> {
        let dx = start.x() - center.0;
        let dy = start.y() - center.1;
        let radius = dx.hypot(dy);
        let start_angle = dy.atan2(dx);
        let num_points = self.criterion.num_points(sweep, radius);
        let step = if clockwise { -sweep } else { sweep } / (num_points - 1) as f64;

        let mut points = Vec::with_capacity(num_points);
        points.push(start.clone());
        for i in 1..num_points - 1 {
            let angle = start_angle + i as f64 * step;
            let x = center.0 + angle.cos() * radius;
            let y = center.1 + angle.sin() * radius;
            let point = if start.has_z() {
                let t = i as f64 / (num_points - 1) as f64;
                Point::new_3d(x, y, start.z() + (end.z() - start.z()) * t)
            } else {
                Point::new(x, y)
            };
            points.push(point.with_crs(start.crs().cloned()));
        }
        points.push(end.clone());

        points
    }

    /// Approximates an arc string. Junction points between arcs are not repeated.
    pub fn linearize_arc_string(&self, control_points: &[Point]) -> Vec<Point> {
        let mut points: Vec<Point> = control_points.iter().take(1).cloned().collect();
        for triple in control_points.windows(3).step_by(2) {
            let arc = self.linearize_arc(&triple[0], &triple[1], &triple[2]);
            points.extend(arc.into_iter().skip(1));
        }

        points
    }

    /// Points of the linearized segment.
    pub fn linearize_segment(&self, segment: &CurveSegment) -> Vec<Point> {
        match segment {
            CurveSegment::LineStringSegment(s) => s.control_points().to_vec(),
            CurveSegment::ArcString(s) => self.linearize_arc_string(s.control_points()),
        }
    }

    /// Points of the linearized curve. When the end point of a segment is equal to the start point of the next
    /// one, it is listed once.
    pub fn linearize_points<'a>(
        &self,
        segments: impl IntoIterator<Item = &'a CurveSegment>,
    ) -> Vec<Point> {
        let mut points: Vec<Point> = Vec::new();
        for segment in segments {
            let linearized = self.linearize_segment(segment);
            let skip = match (points.last(), linearized.first()) {
                (Some(last), Some(first)) if last == first => 1,
                _ => 0,
            };
            points.extend(linearized.into_iter().skip(skip));
        }

        points
    }

    /// Linearizes the curve into a line string. Curves without arcs are only flattened.
    pub fn linearize_curve(&self, curve: &Curve) -> Curve {
        if let Curve::LineString(_) = curve {
            return curve.clone();
        }

        let points = self.linearize_points(curve.curve_segments());
        match LineStringSegment::new(points) {
            Ok(segment) => {
                Curve::LineString(LineString::from_segment(segment)).with_crs(curve.crs().cloned())
            }
            // only reachable for curves built without checks
            Err(_) => curve.clone(),
        }
    }

    /// Linearizes the ring into a linear ring.
    pub fn linearize_ring(&self, ring: &Ring) -> Ring {
        match ring {
            Ring::LinearRing(_) => ring.clone(),
            Ring::Ring(_) => {
                let points = self.linearize_points(ring.curve_segments());
                match LineStringSegment::new(points) {
                    Ok(segment) => Ring::linear_unchecked(segment).with_crs(ring.crs().cloned()),
                    Err(_) => ring.clone(),
                }
            }
        }
    }

    /// Linearizes all rings of the surface.
    pub fn linearize_surface(&self, surface: &Surface) -> Surface {
        match surface {
            Surface::Polygon(polygon) => {
                let patch = polygon.patch();
                let exterior = self.linearize_ring(patch.exterior());
                let interiors = patch
                    .interiors()
                    .iter()
                    .map(|r| self.linearize_ring(r))
                    .collect();
                let patch = match PolygonPatch::new(exterior, interiors) {
                    Ok(patch) => patch,
                    Err(_) => patch.clone(),
                };
                Surface::Polygon(Polygon::from_patch(patch)).with_crs(surface.crs().cloned())
            }
        }
    }

    /// Linearizes every curve, ring and surface of the geometry.
    ///
    /// Collections keep their type, except for multi curves and multi surfaces that become multi line strings and
    /// multi polygons.
    pub fn linearize(&self, geometry: &Geometry) -> Geometry {
        match geometry {
            Geometry::Point(_) => geometry.clone(),
            Geometry::Curve(c) => Geometry::Curve(self.linearize_curve(c)),
            Geometry::Ring(r) => Geometry::Ring(self.linearize_ring(r)),
            Geometry::Surface(s) => Geometry::Surface(self.linearize_surface(s)),
            Geometry::Multi(m) => Geometry::Multi(self.linearize_multi(m)),
        }
    }

    fn linearize_multi(&self, multi: &MultiGeometry) -> MultiGeometry {
        let linearized = match multi {
            MultiGeometry::MultiPoint(_) => return multi.clone(),
            MultiGeometry::MultiLineString(m) | MultiGeometry::MultiCurve(m) => {
                MultiGeometry::multi_line_string(self.map_members(m, Self::linearize_curve))
            }
            MultiGeometry::MultiPolygon(m) | MultiGeometry::MultiSurface(m) => {
                MultiGeometry::multi_polygon(self.map_members(m, Self::linearize_surface))
            }
        };

        match linearized {
            Ok(linearized) => linearized.with_crs(multi.crs().cloned()),
            Err(_) => multi.clone(),
        }
    }

    fn map_members<T>(&self, multi: &Multi<T>, f: impl Fn(&Self, &T) -> T) -> Vec<Option<T>> {
        multi
            .members()
            .iter()
            .map(|m| m.as_ref().map(|m| f(self, m)))
            .collect()
    }
}

/// Midpoint of the bounding box of the three points. Computations are done relative to it to reduce floating point
/// errors with large coordinates.
fn shift(p0: &Point, p1: &Point, p2: &Point) -> (f64, f64) {
    let xs = [p0.x(), p1.x(), p2.x()];
    let ys = [p0.y(), p1.y(), p2.y()];
    let mid = |values: [f64; 3]| {
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        (min + max) / 2.0
    };

    (mid(xs), mid(ys))
}

/// True if the three points lie on one line (within a small tolerance).
pub fn are_collinear(p0: &Point, p1: &Point, p2: &Point) -> bool {
    let (ox, oy) = shift(p0, p1, p2);
    let (ax, ay) = (p0.x() - ox, p0.y() - oy);
    let (bx, by) = (p1.x() - ox, p1.y() - oy);
    let (cx, cy) = (p2.x() - ox, p2.y() - oy);

    let doubled_area = (cx - ax) * (cy + ay) + (bx - cx) * (by + cy) + (ax - bx) * (ay + by);
    let side_sq = |(x1, y1): (f64, f64), (x2, y2): (f64, f64)| (x2 - x1).powi(2) + (y2 - y1).powi(2);
    let longest_sq = side_sq((ax, ay), (bx, by))
        .max(side_sq((bx, by), (cx, cy)))
        .max(side_sq((cx, cy), (ax, ay)));

    (doubled_area / 2.0).abs() <= EPSILON * longest_sq
}

/// True if the arc through the three points goes clockwise.
pub fn is_clockwise(p0: &Point, p1: &Point, p2: &Point) -> bool {
    Orientation::triplet(p0, p1, p2) == Orientation::Clockwise
}

fn circle_center(a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> (f64, f64) {
    let d = 2.0 * (a.0 * (b.1 - c.1) + b.0 * (c.1 - a.1) + c.0 * (a.1 - b.1));
    let a_sq = a.0 * a.0 + a.1 * a.1;
    let b_sq = b.0 * b.0 + b.1 * b.1;
    let c_sq = c.0 * c.0 + c.1 * c.1;

    let x = (a_sq * (b.1 - c.1) + b_sq * (c.1 - a.1) + c_sq * (a.1 - b.1)) / d;
    let y = (a_sq * (c.0 - b.0) + b_sq * (a.0 - c.0) + c_sq * (b.0 - a.0)) / d;
    (x, y)
}
