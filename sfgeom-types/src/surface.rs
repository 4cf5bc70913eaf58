use serde::{Deserialize, Serialize};

use crate::error::{EntityKind, MalformedGeometryError};
use crate::geometry_type::{RingType, SurfaceType};
use crate::map::{map_all, MapPoints};
use crate::point::{uniform_dimensions, CrsRef, Point};
use crate::ring::Ring;

/// Planar surface patch bounded by one exterior ring and any number of interior rings (holes).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolygonPatch {
    exterior: Ring,
    interiors: Vec<Ring>,
}

impl PolygonPatch {
    /// Creates a new patch. All rings must have the same dimensionality.
    pub fn new(exterior: Ring, interiors: Vec<Ring>) -> Result<Self, MalformedGeometryError> {
        uniform_dimensions(
            std::iter::once(&exterior)
                .chain(interiors.iter())
                .map(Ring::has_z),
            EntityKind::Polygon,
        )?;

        Ok(Self {
            exterior,
            interiors,
        })
    }

    /// Exterior ring.
    pub fn exterior(&self) -> &Ring {
        &self.exterior
    }

    /// Interior rings in declaration order.
    pub fn interiors(&self) -> &[Ring] {
        &self.interiors
    }

    /// Exterior ring followed by the interior rings.
    pub fn rings(&self) -> impl Iterator<Item = &Ring> {
        std::iter::once(&self.exterior).chain(self.interiors.iter())
    }

    /// True if none of the rings has arc segments.
    pub fn is_linear(&self) -> bool {
        self.rings().all(Ring::is_linear)
    }

    /// True if every ring is a [`Ring::LinearRing`], so the patch can be written as a plain polygon.
    pub fn has_linear_rings(&self) -> bool {
        self.rings()
            .all(|ring| ring.ring_type() == RingType::LinearRing)
    }
}

impl MapPoints for PolygonPatch {
    fn try_map_points<E, F>(&self, crs: &Option<CrsRef>, f: &mut F) -> Result<Self, E>
    where
        F: FnMut(&Point) -> Result<Point, E>,
    {
        Ok(Self {
            exterior: self.exterior.try_map_points(crs, f)?,
            interiors: map_all(&self.interiors, crs, f)?,
        })
    }
}

/// Surface with a single patch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    patch: PolygonPatch,
    crs: Option<CrsRef>,
}

impl Polygon {
    /// Creates a new polygon.
    pub fn new(exterior: Ring, interiors: Vec<Ring>) -> Result<Self, MalformedGeometryError> {
        Ok(Self::from_patch(PolygonPatch::new(exterior, interiors)?))
    }

    /// Creates a polygon with the given patch.
    pub fn from_patch(patch: PolygonPatch) -> Self {
        Self { patch, crs: None }
    }

    /// The only patch of the polygon.
    pub fn patch(&self) -> &PolygonPatch {
        &self.patch
    }

    /// Exterior ring.
    pub fn exterior(&self) -> &Ring {
        self.patch.exterior()
    }

    /// Interior rings.
    pub fn interiors(&self) -> &[Ring] {
        self.patch.interiors()
    }

    /// CRS of the polygon, if specified.
    pub fn crs(&self) -> Option<&CrsRef> {
        self.crs.as_ref()
    }
}

/// A 2-dimensional geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Surface {
    /// Single planar patch bounded by rings (linear or curved).
    Polygon(Polygon),
}

impl Surface {
    /// Kind of the surface.
    pub fn surface_type(&self) -> SurfaceType {
        match self {
            Surface::Polygon(_) => SurfaceType::Polygon,
        }
    }

    /// Patches of the surface.
    pub fn patches(&self) -> &[PolygonPatch] {
        match self {
            Surface::Polygon(p) => std::slice::from_ref(&p.patch),
        }
    }

    /// True if none of the boundaries has arc segments.
    pub fn is_linear(&self) -> bool {
        self.patches().iter().all(PolygonPatch::is_linear)
    }

    /// True if all patches are bounded by linear rings only.
    pub fn has_linear_rings(&self) -> bool {
        self.patches().iter().all(PolygonPatch::has_linear_rings)
    }

    /// Whether the points of the surface have the third ordinate.
    pub fn has_z(&self) -> Option<bool> {
        self.patches().first().and_then(|p| p.exterior().has_z())
    }

    /// CRS of the surface, if specified.
    pub fn crs(&self) -> Option<&CrsRef> {
        match self {
            Surface::Polygon(p) => p.crs.as_ref(),
        }
    }

    /// Sets the CRS of the surface and all of its parts.
    pub fn with_crs(self, crs: Option<CrsRef>) -> Self {
        self.replace_crs(crs)
    }
}

impl From<Polygon> for Surface {
    fn from(value: Polygon) -> Self {
        Self::Polygon(value)
    }
}

impl MapPoints for Surface {
    fn try_map_points<E, F>(&self, crs: &Option<CrsRef>, f: &mut F) -> Result<Self, E>
    where
        F: FnMut(&Point) -> Result<Point, E>,
    {
        Ok(match self {
            Surface::Polygon(p) => Surface::Polygon(Polygon {
                patch: p.patch.try_map_points(crs, f)?,
                crs: crs.clone(),
            }),
        })
    }
}
