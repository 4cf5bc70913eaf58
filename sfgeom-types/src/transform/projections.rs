use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

use crate::datum::Datum;
use crate::point::Point;
use crate::transform::Projection;

/// Projection that returns the point unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct IdentityProjection;

impl Projection for IdentityProjection {
    type InPoint = Point;
    type OutPoint = Point;

    fn project(&self, input: &Self::InPoint) -> Option<Self::OutPoint> {
        Some(input.clone())
    }

    fn unproject(&self, input: &Self::OutPoint) -> Option<Self::InPoint> {
        Some(input.clone())
    }
}

/// Projection that swaps the first two ordinates of a point, e.g. to convert latitude-first coordinates into
/// longitude-first ones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AxisSwapProjection;

impl Projection for AxisSwapProjection {
    type InPoint = Point;
    type OutPoint = Point;

    fn project(&self, input: &Self::InPoint) -> Option<Self::OutPoint> {
        Some(swap(input))
    }

    fn unproject(&self, input: &Self::OutPoint) -> Option<Self::InPoint> {
        Some(swap(input))
    }
}

fn swap(point: &Point) -> Point {
    let swapped = if point.has_z() {
        Point::new_3d(point.y(), point.x(), point.z())
    } else {
        Point::new(point.y(), point.x())
    };
    swapped.with_crs(point.crs().cloned())
}

/// Spherical Web Mercator projection of geographic coordinates in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WebMercator {
    datum: Datum,
    lat_first: bool,
}

impl WebMercator {
    /// Creates a new projection. If `lat_first` is set, the input points store latitude as the first ordinate.
    pub fn new(datum: Datum, lat_first: bool) -> Self {
        Self { datum, lat_first }
    }

    fn lat_lon(&self, point: &Point) -> (f64, f64) {
        if self.lat_first {
            (point.x(), point.y())
        } else {
            (point.y(), point.x())
        }
    }
}

impl Default for WebMercator {
    fn default() -> Self {
        Self::new(Datum::WGS84, false)
    }
}

impl Projection for WebMercator {
    type InPoint = Point;
    type OutPoint = Point;

    fn project(&self, input: &Self::InPoint) -> Option<Self::OutPoint> {
        let (lat, lon) = self.lat_lon(input);
        let x = self.datum.semimajor() * lon.to_radians();
        let y = self.datum.semimajor()
            * (std::f64::consts::FRAC_PI_4 + lat.to_radians() / 2.0)
                .tan()
                .ln();

        if x.is_finite() && y.is_finite() {
            Some(with_ordinates(input, x, y))
        } else {
            None
        }
    }

    fn unproject(&self, input: &Self::OutPoint) -> Option<Self::InPoint> {
        let lat = std::f64::consts::FRAC_PI_2
            - 2.0 * (-input.y() / self.datum.semimajor()).exp().atan();
        let lon = input.x() / self.datum.semimajor();
        let (lat, lon) = (lat.to_degrees(), lon.to_degrees());

        if !lat.is_finite() || !lon.is_finite() {
            return None;
        }

        Some(if self.lat_first {
            with_ordinates(input, lat, lon)
        } else {
            with_ordinates(input, lon, lat)
        })
    }
}

/// Replaces the first two ordinates of the point keeping the third one.
pub(crate) fn with_ordinates(point: &Point, x: f64, y: f64) -> Point {
    if point.has_z() {
        Point::new_3d(x, y, point.z())
    } else {
        Point::new(x, y)
    }
}

/// Projection that runs the inner projection backwards.
pub struct InvertedProjection<P, In, Out> {
    inner: P,
    phantom_in: PhantomData<In>,
    phantom_out: PhantomData<Out>,
}

impl<P, In, Out> InvertedProjection<P, In, Out> {
    /// Wraps the projection.
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            phantom_in: Default::default(),
            phantom_out: Default::default(),
        }
    }
}

impl<In, Out, P: Projection<InPoint = In, OutPoint = Out>> Projection
    for InvertedProjection<P, In, Out>
{
    type InPoint = Out;
    type OutPoint = In;

    fn project(&self, input: &Self::InPoint) -> Option<Self::OutPoint> {
        self.inner.unproject(input)
    }

    fn unproject(&self, input: &Self::OutPoint) -> Option<Self::InPoint> {
        self.inner.project(input)
    }
}

/// Projection that applies the first projection and then the second one.
pub struct ChainProjection<In, Mid, Out> {
    first: Box<dyn Projection<InPoint = In, OutPoint = Mid>>,
    second: Box<dyn Projection<InPoint = Mid, OutPoint = Out>>,
}

impl<In, Mid, Out> ChainProjection<In, Mid, Out> {
    /// Creates a chain of two projections.
    pub fn new(
        first: Box<dyn Projection<InPoint = In, OutPoint = Mid>>,
        second: Box<dyn Projection<InPoint = Mid, OutPoint = Out>>,
    ) -> Self {
        Self { first, second }
    }
}

impl<In, Mid, Out> Projection for ChainProjection<In, Mid, Out> {
    type InPoint = In;
    type OutPoint = Out;

    fn project(&self, input: &Self::InPoint) -> Option<Self::OutPoint> {
        self.second.project(&self.first.project(input)?)
    }

    fn unproject(&self, input: &Self::OutPoint) -> Option<Self::InPoint> {
        self.first.unproject(&self.second.unproject(input)?)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn web_mercator_projects_known_points() {
        let projection = WebMercator::default();

        let origin = projection.project(&Point::new(0.0, 0.0)).expect("projected");
        assert_abs_diff_eq!(origin, Point::new(0.0, 0.0), epsilon = 1e-9);

        let projected = projection.project(&Point::new(180.0, 0.0)).expect("projected");
        assert_abs_diff_eq!(projected.x(), 20037508.342789244, epsilon = 1e-6);

        let projected = projection.project(&Point::new(10.0, 52.0)).expect("projected");
        assert_abs_diff_eq!(projected.x(), 1113194.9079327357, epsilon = 1e-6);
        assert_abs_diff_eq!(projected.y(), 6800125.454397307, epsilon = 1e-2);
    }

    #[test]
    fn web_mercator_round_trip() {
        let projection = WebMercator::new(Datum::WGS84, true);
        let point = Point::new_3d(52.0, 10.0, 100.0);
        let projected = projection.project(&point).expect("projected");
        assert_abs_diff_eq!(projected.x(), 1113194.9079327357, epsilon = 1e-6);
        assert_eq!(projected.z(), 100.0);

        let unprojected = projection.unproject(&projected).expect("unprojected");
        assert_abs_diff_eq!(unprojected, point, epsilon = 1e-9);
    }

    #[test]
    fn web_mercator_rejects_invalid_latitude() {
        assert!(WebMercator::default()
            .project(&Point::new(0.0, -100.0))
            .is_none());
    }

    #[test]
    fn axis_swap_keeps_z() {
        let swapped = AxisSwapProjection
            .project(&Point::new_3d(1.0, 2.0, 3.0))
            .expect("projected");
        assert_eq!(swapped, Point::new_3d(2.0, 1.0, 3.0));
    }

    #[test]
    fn chain_and_invert() {
        let chain: ChainProjection<Point, Point, Point> = ChainProjection::new(
            Box::new(AxisSwapProjection),
            Box::new(WebMercator::default()),
        );
        let projected = chain.project(&Point::new(0.0, 180.0)).expect("projected");
        assert_abs_diff_eq!(projected.x(), 20037508.342789244, epsilon = 1e-6);

        let inverted: InvertedProjection<_, Point, Point> = InvertedProjection::new(chain);
        let back = inverted.project(&projected).expect("projected");
        assert_abs_diff_eq!(back, Point::new(0.0, 180.0), epsilon = 1e-9);
    }
}
