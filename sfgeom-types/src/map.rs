use std::convert::Infallible;

use crate::point::{CrsRef, Point};

/// Rebuilds a geometry node with every point replaced, keeping the structure of the node as is.
///
/// Structural invariants are not re-checked: the mapping is expected to be a deterministic function of a point, so
/// equal points stay equal and closed rings stay closed.
pub(crate) trait MapPoints: Sized {
    fn try_map_points<E, F>(&self, crs: &Option<CrsRef>, f: &mut F) -> Result<Self, E>
    where
        F: FnMut(&Point) -> Result<Point, E>;

    fn replace_crs(&self, crs: Option<CrsRef>) -> Self {
        let result: Result<Self, Infallible> = self.try_map_points(&crs, &mut |p| Ok(p.clone()));
        match result {
            Ok(mapped) => mapped,
            Err(never) => match never {},
        }
    }
}

impl MapPoints for Point {
    fn try_map_points<E, F>(&self, crs: &Option<CrsRef>, f: &mut F) -> Result<Self, E>
    where
        F: FnMut(&Point) -> Result<Point, E>,
    {
        Ok(f(self)?.with_crs(crs.clone()))
    }
}

pub(crate) fn map_all<T, E, F>(
    items: &[T],
    crs: &Option<CrsRef>,
    f: &mut F,
) -> Result<Vec<T>, E>
where
    T: MapPoints,
    F: FnMut(&Point) -> Result<Point, E>,
{
    items.iter().map(|item| item.try_map_points(crs, f)).collect()
}

pub(crate) fn map_optional<T, E, F>(
    items: &[Option<T>],
    crs: &Option<CrsRef>,
    f: &mut F,
) -> Result<Vec<Option<T>>, E>
where
    T: MapPoints,
    F: FnMut(&Point) -> Result<Point, E>,
{
    items
        .iter()
        .map(|item| item.as_ref().map(|v| v.try_map_points(crs, f)).transpose())
        .collect()
}
