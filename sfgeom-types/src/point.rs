use std::fmt::{Display, Formatter};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::crs::Crs;
use crate::error::{EntityKind, MalformedGeometryError, Violation};

/// Shared reference to a CRS descriptor. Geometries hold it by reference count, so cloning a geometry never copies
/// the descriptor.
pub type CrsRef = Arc<Crs>;

/// A 2d or 3d point.
///
/// Absence of the third ordinate is stored as `NaN`, so [`Point::ordinate`] can always be probed for index 2.
/// Equality compares ordinates exactly and ignores the CRS reference. Two absent third ordinates are equal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Point {
    x: f64,
    y: f64,
    #[serde(with = "absent_ordinate")]
    z: f64,
    crs: Option<CrsRef>,
}

impl Point {
    /// Creates a 2d point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            z: f64::NAN,
            crs: None,
        }
    }

    /// Creates a 3d point.
    pub const fn new_3d(x: f64, y: f64, z: f64) -> Self {
        Self {
            x,
            y,
            z,
            crs: None,
        }
    }

    /// Creates a point from a slice of 2 or 3 ordinates.
    pub fn from_ordinates(ordinates: &[f64]) -> Result<Self, MalformedGeometryError> {
        match *ordinates {
            [x, y] => Ok(Self::new(x, y)),
            [x, y, z] => Ok(Self::new_3d(x, y, z)),
            _ => Err(MalformedGeometryError::new(
                EntityKind::Point,
                Violation::OrdinateCount(ordinates.len()),
            )),
        }
    }

    /// Sets the CRS of the point.
    pub fn with_crs(mut self, crs: Option<CrsRef>) -> Self {
        self.crs = crs;
        self
    }

    /// First ordinate.
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Second ordinate.
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Third ordinate, `NaN` if the point is 2d.
    pub fn z(&self) -> f64 {
        self.z
    }

    /// Ordinate by index. Returns `NaN` for any index the point does not have.
    pub fn ordinate(&self, index: usize) -> f64 {
        match index {
            0 => self.x,
            1 => self.y,
            2 => self.z,
            _ => f64::NAN,
        }
    }

    /// True if the point has the third ordinate.
    pub fn has_z(&self) -> bool {
        !self.z.is_nan()
    }

    /// Number of ordinates: 2 or 3.
    pub fn dimension(&self) -> usize {
        if self.has_z() {
            3
        } else {
            2
        }
    }

    /// CRS of the point, if specified.
    pub fn crs(&self) -> Option<&CrsRef> {
        self.crs.as_ref()
    }

    /// True if both points have the same first two ordinates.
    pub fn equals_2d(&self, other: &Point) -> bool {
        self.x == other.x && self.y == other.y
    }
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        self.equals_2d(other) && (self.z == other.z || self.z.is_nan() && other.z.is_nan())
    }
}

impl Display for Point {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.x, self.y)?;
        if self.has_z() {
            write!(f, " {}", self.z)?;
        }

        Ok(())
    }
}

impl approx::AbsDiffEq for Point {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        f64::EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.x.abs_diff_eq(&other.x, epsilon)
            && self.y.abs_diff_eq(&other.y, epsilon)
            && (self.z.is_nan() && other.z.is_nan() || self.z.abs_diff_eq(&other.z, epsilon))
    }
}

/// Checks that either all or none of the points have the third ordinate. Returns `None` for an empty set.
pub(crate) fn check_dimensions<'a>(
    points: impl IntoIterator<Item = &'a Point>,
    entity: EntityKind,
) -> Result<Option<bool>, MalformedGeometryError> {
    uniform_dimensions(points.into_iter().map(|p| Some(p.has_z())), entity)
}

/// Same as [`check_dimensions`] for a set of children that already know their own dimensionality.
pub(crate) fn uniform_dimensions(
    has_z: impl IntoIterator<Item = Option<bool>>,
    entity: EntityKind,
) -> Result<Option<bool>, MalformedGeometryError> {
    let mut result = None;
    for value in has_z.into_iter().flatten() {
        match result {
            None => result = Some(value),
            Some(v) if v != value => {
                return Err(MalformedGeometryError::new(
                    entity,
                    Violation::MixedDimensions,
                ))
            }
            Some(_) => {}
        }
    }

    Ok(result)
}

mod absent_ordinate {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_nan() {
            serializer.serialize_none()
        } else {
            serializer.serialize_some(value)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
    }
}
