use geodesy::prelude::*;

use crate::point::Point;
use crate::transform::projections::with_ordinates;
use crate::transform::Projection;

/// Projection of geographic coordinates (in degrees) given by a `geodesy` operator definition, e.g. `utm zone=32`.
pub struct GeodesyProjection {
    context: Minimal,
    op: OpHandle,
    lat_first: bool,
}

impl GeodesyProjection {
    /// Creates a new projection. Returns `None` if the definition cannot be parsed.
    ///
    /// If `lat_first` is set, the geographic points store latitude as the first ordinate.
    pub fn new(definition: &str, lat_first: bool) -> Option<Self> {
        let mut context = Minimal::new();
        let op = match context.op(definition) {
            Ok(op) => op,
            Err(err) => {
                log::debug!("Failed to parse projection definition '{definition}': {err}");
                return None;
            }
        };

        Some(Self {
            context,
            op,
            lat_first,
        })
    }
}

impl Projection for GeodesyProjection {
    type InPoint = Point;
    type OutPoint = Point;

    fn project(&self, input: &Self::InPoint) -> Option<Self::OutPoint> {
        let (lat, lon) = if self.lat_first {
            (input.x(), input.y())
        } else {
            (input.y(), input.x())
        };

        let mut data = [Coor2D::geo(lat, lon)];
        self.context.apply(self.op, Fwd, &mut data).ok()?;

        let [x, y] = data[0].0;
        if !x.is_finite() || !y.is_finite() {
            return None;
        }

        Some(with_ordinates(input, x, y))
    }

    fn unproject(&self, input: &Self::OutPoint) -> Option<Self::InPoint> {
        let mut data = [Coor2D([input.x(), input.y()])];
        self.context.apply(self.op, Inv, &mut data).ok()?;

        let [lon, lat] = data[0].0;
        let (lon, lat) = (lon.to_degrees(), lat.to_degrees());
        if !lon.is_finite() || !lat.is_finite() {
            return None;
        }

        Some(if self.lat_first {
            with_ordinates(input, lat, lon)
        } else {
            with_ordinates(input, lon, lat)
        })
    }
}
