//! Reprojection of geometries between coordinate reference systems.
//!
//! The model itself knows nothing about coordinate transformations. A [`TransformationProvider`] supplies a
//! [`Projection`] for a pair of CRSs, and [`GeometryTransformer`] applies it to every control point of a geometry.
//! Arcs are transformed by their control points and stay arcs.

use crate::error::TransformError;
use crate::geometry::Geometry;
use crate::map::MapPoints;
use crate::point::{CrsRef, Point};

mod projections;
mod provider;

#[cfg(feature = "geodesy")]
mod geodesy;

#[cfg(feature = "geodesy")]
pub use self::geodesy::GeodesyProjection;
pub use projections::{
    AxisSwapProjection, ChainProjection, IdentityProjection, InvertedProjection, WebMercator,
};
pub use provider::{BoxedProjection, DefaultTransformationProvider, TransformationProvider};

/// Conversion of points from one coordinate space into another.
pub trait Projection {
    /// Points of the source space.
    type InPoint;
    /// Points of the target space.
    type OutPoint;

    /// Projects a point into the target space. Returns `None` if the point cannot be projected.
    fn project(&self, input: &Self::InPoint) -> Option<Self::OutPoint>;
    /// Converts a point of the target space back into the source space.
    fn unproject(&self, input: &Self::OutPoint) -> Option<Self::InPoint>;
}

impl<T: Projection + ?Sized> Projection for Box<T> {
    type InPoint = T::InPoint;
    type OutPoint = T::OutPoint;

    fn project(&self, input: &Self::InPoint) -> Option<Self::OutPoint> {
        (**self).project(input)
    }

    fn unproject(&self, input: &Self::OutPoint) -> Option<Self::InPoint> {
        (**self).unproject(input)
    }
}

/// Reprojects geometries using the projections of a [`TransformationProvider`].
#[derive(Debug, Default, Clone)]
pub struct GeometryTransformer<P = DefaultTransformationProvider> {
    provider: P,
}

impl GeometryTransformer {
    /// Creates a transformer with the [`DefaultTransformationProvider`].
    pub fn new() -> Self {
        Self::with_provider(DefaultTransformationProvider)
    }
}

impl<P: TransformationProvider> GeometryTransformer<P> {
    /// Creates a transformer with the given provider.
    pub fn with_provider(provider: P) -> Self {
        Self { provider }
    }

    /// Returns a copy of the geometry with every point converted into the `target` CRS.
    ///
    /// Fails with [`TransformError::AmbiguousCrs`] if the geometry has no CRS, with
    /// [`TransformError::UnsupportedTransformation`] if the provider knows no way between the CRSs and with
    /// [`TransformError::ProjectionFailed`] if some point is outside the domain of the projection.
    pub fn reproject(
        &self,
        geometry: &Geometry,
        target: &CrsRef,
    ) -> Result<Geometry, TransformError> {
        let source = geometry.crs().ok_or(TransformError::AmbiguousCrs)?;
        let projection = self
            .provider
            .transformation(source, target)
            .ok_or_else(|| TransformError::UnsupportedTransformation {
                from: source.to_string(),
                to: target.to_string(),
            })?;

        log::debug!("Reprojecting {:?} from {source} to {target}", geometry.geometry_type());

        geometry.try_map_points(&Some(target.clone()), &mut |point: &Point| {
            projection
                .project(point)
                .ok_or(TransformError::ProjectionFailed {
                    x: point.x(),
                    y: point.y(),
                })
        })
    }
}

/// Reprojects the geometry into the `target` CRS with the [`DefaultTransformationProvider`].
pub fn reproject(geometry: &Geometry, target: &CrsRef) -> Result<Geometry, TransformError> {
    GeometryTransformer::new().reproject(geometry, target)
}
