use crate::crs::{Crs, ProjectionType};
use crate::point::Point;
use crate::transform::projections::{
    AxisSwapProjection, ChainProjection, IdentityProjection, InvertedProjection, WebMercator,
};
use crate::transform::Projection;

/// Boxed projection between two point spaces of the model.
pub type BoxedProjection = Box<dyn Projection<InPoint = Point, OutPoint = Point>>;

/// Source of projections between coordinate reference systems.
pub trait TransformationProvider {
    /// Returns a projection that converts points from the `from` CRS into the `to` CRS, or `None` if no
    /// transformation path is known.
    fn transformation(&self, from: &Crs, to: &Crs) -> Option<BoxedProjection>;
}

/// Provider of the projections implemented by this crate.
///
/// Every known CRS is reached from the geographic longitude/latitude space of its datum:
/// * geographic CRS by an axis swap if it is latitude-first,
/// * Web Mercator by [`WebMercator`],
/// * other projections by a `geodesy` operator (with the `geodesy` feature enabled).
///
/// Transformations go through that space. Datum shifts are not supported, so the datums of the two CRSs must
/// match (Web Mercator only requires the same semimajor axis). A CRS with [`ProjectionType::Unknown`] can only be
/// transformed into an equal CRS or its axis swap.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultTransformationProvider;

impl DefaultTransformationProvider {
    fn from_lon_lat(&self, crs: &Crs) -> Option<BoxedProjection> {
        match crs.projection_type() {
            _ if crs.is_geographic() && crs.is_lat_first() => Some(Box::new(AxisSwapProjection)),
            _ if crs.is_geographic() => Some(Box::new(IdentityProjection)),
            ProjectionType::WebMercator => Some(Box::new(WebMercator::new(crs.datum(), false))),
            #[cfg(feature = "geodesy")]
            ProjectionType::Other(definition) => {
                crate::transform::GeodesyProjection::new(definition, false)
                    .map(|p| Box::new(p) as BoxedProjection)
            }
            _ => None,
        }
    }

    fn datums_compatible(from: &Crs, to: &Crs) -> bool {
        let spherical = |crs: &Crs| crs.projection_type() == &ProjectionType::WebMercator;
        if spherical(from) || spherical(to) {
            from.datum().semimajor() == to.datum().semimajor()
        } else {
            from.datum() == to.datum()
        }
    }
}

impl TransformationProvider for DefaultTransformationProvider {
    fn transformation(&self, from: &Crs, to: &Crs) -> Option<BoxedProjection> {
        if from == to {
            return Some(Box::new(IdentityProjection));
        }

        if from.is_axis_swap_of(to) {
            return Some(Box::new(AxisSwapProjection));
        }

        if !Self::datums_compatible(from, to) {
            return None;
        }

        let unproject: InvertedProjection<_, Point, Point> =
            InvertedProjection::new(self.from_lon_lat(from)?);
        let project = self.from_lon_lat(to)?;
        Some(Box::new(ChainProjection::new(Box::new(unproject), project)))
    }
}
