//! Coordinate reference system descriptors and axis handedness inspection.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::datum::Datum;

/// Direction of a coordinate system axis.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AxisOrientation {
    /// Towards east.
    East,
    /// Towards west.
    West,
    /// Towards north.
    North,
    /// Towards south.
    South,
    /// Upwards.
    Up,
    /// Downwards.
    Down,
    /// Unknown or not applicable.
    Other,
}

/// Axis of a coordinate reference system.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Axis {
    name: String,
    orientation: AxisOrientation,
}

impl Axis {
    /// Creates a new axis.
    pub fn new(name: impl Into<String>, orientation: AxisOrientation) -> Self {
        Self {
            name: name.into(),
            orientation,
        }
    }

    /// Abbreviated name of the axis.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Direction of the axis.
    pub fn orientation(&self) -> AxisOrientation {
        self.orientation
    }
}

/// Projection used by a CRS to map the datum ellipsoid onto a plane.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ProjectionType {
    /// Nothing is known about the projection.
    Unknown,
    /// Geographic coordinates (no projection).
    None,
    /// Spherical Web Mercator.
    WebMercator,
    /// Projection given by a `geodesy` operator definition, e.g. `utm zone=32`.
    Other(String),
}

/// Coordinate reference system descriptor.
///
/// The descriptor knows its axes (in the order ordinates are stored in points), its datum and projection. It carries
/// no transformation logic: see [`transform`](crate::transform) for that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Crs {
    name: String,
    srid: Option<u32>,
    datum: Datum,
    projection_type: ProjectionType,
    axes: Vec<Axis>,
}

impl Crs {
    /// Creates a new CRS descriptor.
    pub fn new(
        name: impl Into<String>,
        datum: Datum,
        projection_type: ProjectionType,
        axes: Vec<Axis>,
    ) -> Self {
        Self {
            name: name.into(),
            srid: None,
            datum,
            projection_type,
            axes,
        }
    }

    /// Sets the numeric EPSG code of the CRS.
    pub fn with_srid(mut self, srid: u32) -> Self {
        self.srid = Some(srid);
        self
    }

    /// EPSG:4326, WGS84 geographic coordinates with latitude first.
    pub fn epsg4326() -> Self {
        Self::new("EPSG:4326", Datum::WGS84, ProjectionType::None, lat_lon())
            .with_srid(4326)
    }

    /// OGC CRS:84, WGS84 geographic coordinates with longitude first.
    pub fn crs84() -> Self {
        Self::new("CRS:84", Datum::WGS84, ProjectionType::None, lon_lat())
    }

    /// EPSG:3857, Web Mercator projection.
    pub fn epsg3857() -> Self {
        Self::new(
            "EPSG:3857",
            Datum::WGS84,
            ProjectionType::WebMercator,
            east_north(),
        )
        .with_srid(3857)
    }

    /// EPSG:4258, ETRS89 geographic coordinates with latitude first.
    pub fn epsg4258() -> Self {
        Self::new("EPSG:4258", Datum::GRS80, ProjectionType::None, lat_lon())
            .with_srid(4258)
    }

    /// EPSG:25832, ETRS89 / UTM zone 32N.
    pub fn epsg25832() -> Self {
        Self::new(
            "EPSG:25832",
            Datum::GRS80,
            ProjectionType::Other("utm zone=32".into()),
            east_north(),
        )
        .with_srid(25832)
    }

    /// Returns the descriptor for a known EPSG code, or an opaque 2d descriptor that carries only the code.
    pub fn from_srid(srid: u32) -> Self {
        match srid {
            4326 => Self::epsg4326(),
            3857 | 900913 => Self::epsg3857(),
            4258 => Self::epsg4258(),
            25832 => Self::epsg25832(),
            _ => Self::opaque(srid),
        }
    }

    /// 2d CRS with the given code about which nothing else is known.
    pub fn opaque(srid: u32) -> Self {
        Self::new(
            format!("EPSG:{srid}"),
            Datum::default(),
            ProjectionType::Unknown,
            vec![
                Axis::new("x", AxisOrientation::Other),
                Axis::new("y", AxisOrientation::Other),
            ],
        )
        .with_srid(srid)
    }

    /// Name of the CRS, e.g. `EPSG:4326`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Numeric EPSG code, if known.
    pub fn srid(&self) -> Option<u32> {
        self.srid
    }

    /// Datum of the CRS.
    pub fn datum(&self) -> Datum {
        self.datum
    }

    /// Projection of the CRS.
    pub fn projection_type(&self) -> &ProjectionType {
        &self.projection_type
    }

    /// Axes in ordinate order.
    pub fn axes(&self) -> &[Axis] {
        &self.axes
    }

    /// Number of axes.
    pub fn dimension(&self) -> usize {
        self.axes.len()
    }

    /// True if the CRS is geographic (not projected).
    pub fn is_geographic(&self) -> bool {
        self.projection_type == ProjectionType::None
    }

    /// True if the first axis is a latitude-like (north or south pointing) axis.
    pub fn is_lat_first(&self) -> bool {
        matches!(
            self.axes.first().map(Axis::orientation),
            Some(AxisOrientation::North | AxisOrientation::South)
        )
    }

    /// True if `other` describes the same coordinate space with the first two axes swapped.
    pub fn is_axis_swap_of(&self, other: &Crs) -> bool {
        self.datum == other.datum
            && self.projection_type == other.projection_type
            && self.dimension() == 2
            && other.dimension() == 2
            && self.axes[0].orientation == other.axes[1].orientation
            && self.axes[1].orientation == other.axes[0].orientation
            && self.axes[0].orientation != self.axes[1].orientation
    }

    /// See [`is_left_handed`].
    pub fn is_left_handed(&self) -> bool {
        is_left_handed(self)
    }
}

impl Display for Crs {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// Returns true if the axes of a 2d CRS form a left-handed coordinate system.
///
/// Any CRS that is not 2-dimensional, or whose axis pair is not one of the known left-handed combinations, is
/// considered right-handed.
pub fn is_left_handed(crs: &Crs) -> bool {
    use AxisOrientation::*;

    let [axis0, axis1] = crs.axes() else {
        return false;
    };

    matches!(
        (axis0.orientation(), axis1.orientation()),
        (East, South | Down) | (West, North | Up) | (South | Down, West) | (North | Up, East)
    )
}

fn lat_lon() -> Vec<Axis> {
    vec![
        Axis::new("Lat", AxisOrientation::North),
        Axis::new("Lon", AxisOrientation::East),
    ]
}

fn lon_lat() -> Vec<Axis> {
    vec![
        Axis::new("Lon", AxisOrientation::East),
        Axis::new("Lat", AxisOrientation::North),
    ]
}

fn east_north() -> Vec<Axis> {
    vec![
        Axis::new("E", AxisOrientation::East),
        Axis::new("N", AxisOrientation::North),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crs_2d(axis0: AxisOrientation, axis1: AxisOrientation) -> Crs {
        Crs::new(
            "test",
            Datum::WGS84,
            ProjectionType::Unknown,
            vec![Axis::new("a", axis0), Axis::new("b", axis1)],
        )
    }

    #[test]
    fn left_handed_combinations() {
        use AxisOrientation::*;

        let left = [
            (East, South),
            (East, Down),
            (West, North),
            (West, Up),
            (South, West),
            (Down, West),
            (North, East),
            (Up, East),
        ];
        for (a, b) in left {
            assert!(is_left_handed(&crs_2d(a, b)), "{a:?} {b:?}");
        }

        let right = [
            (East, North),
            (East, Up),
            (North, West),
            (West, South),
            (South, East),
            (Other, Other),
            (East, East),
            (Other, North),
        ];
        for (a, b) in right {
            assert!(!is_left_handed(&crs_2d(a, b)), "{a:?} {b:?}");
        }
    }

    #[test]
    fn not_2d_is_right_handed() {
        let crs = Crs::new(
            "3d",
            Datum::WGS84,
            ProjectionType::None,
            vec![
                Axis::new("Lat", AxisOrientation::North),
                Axis::new("Lon", AxisOrientation::East),
                Axis::new("h", AxisOrientation::Up),
            ],
        );
        assert!(!is_left_handed(&crs));

        let crs = Crs::new("1d", Datum::WGS84, ProjectionType::None, vec![]);
        assert!(!is_left_handed(&crs));
    }

    #[test]
    fn known_crs() {
        assert!(Crs::epsg4326().is_left_handed());
        assert!(!Crs::crs84().is_left_handed());
        assert!(!Crs::epsg3857().is_left_handed());
        assert!(!Crs::from_srid(31467).is_left_handed());
        assert_eq!(Crs::from_srid(4326), Crs::epsg4326());
        assert_eq!(Crs::from_srid(31467).srid(), Some(31467));
    }

    #[test]
    fn axis_swap() {
        assert!(Crs::epsg4326().is_axis_swap_of(&Crs::crs84()));
        assert!(Crs::crs84().is_axis_swap_of(&Crs::epsg4326()));
        assert!(!Crs::epsg4326().is_axis_swap_of(&Crs::epsg3857()));
        assert!(!Crs::epsg4258().is_axis_swap_of(&Crs::crs84()));
    }
}
