use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

use approx::abs_diff_eq;

/// Functional Road Class.
/// The functional road class (FRC) of a line is a road classification
/// based on the importance of the road represented by the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Frc {
    /// Main road, highest importance.
    Frc0 = 0,
    /// First class road.
    Frc1 = 1,
    /// Second class road.
    Frc2 = 2,
    /// Third class road.
    Frc3 = 3,
    /// Fourth class road.
    Frc4 = 4,
    /// Fifth class road.
    Frc5 = 5,
    /// Sixth class road.
    Frc6 = 6,
    /// Other class road, lowest importance.
    Frc7 = 7,
}

impl Default for Frc {
    fn default() -> Self {
        Self::Frc7
    }
}

impl Frc {
    pub const fn value(&self) -> u8 {
        *self as u8
    }

    pub const fn from_value(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Frc0),
            1 => Some(Self::Frc1),
            2 => Some(Self::Frc2),
            3 => Some(Self::Frc3),
            4 => Some(Self::Frc4),
            5 => Some(Self::Frc5),
            6 => Some(Self::Frc6),
            7 => Some(Self::Frc7),
            _ => None,
        }
    }

    /// Relaxes this FRC by `slack` classes towards less important roads,
    /// saturating at [`Frc::Frc7`].
    pub const fn relaxed_by(&self, slack: u8) -> Self {
        match Self::from_value(self.value().saturating_add(slack)) {
            Some(frc) => frc,
            None => Self::Frc7,
        }
    }
}

/// Form of Way.
/// The form of way (FOW) describes the physical road type of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Fow {
    /// The physical road type is unknown.
    Undefined = 0,
    /// A Motorway is defined as a road permitted for motorized vehicles
    /// only in combination with a prescribed minimum speed. It has two
    /// or more physically separated carriageways and no single level-crossings.
    Motorway = 1,
    /// A multiple carriageway is defined as a road with physically separated
    /// carriageways regardless of the number of lanes. If a road is also a
    /// motorway, it should be coded as such and not as a multiple carriageway.
    MultipleCarriageway = 2,
    /// All roads without separate carriageways are considered as roads with
    /// a single carriageway.
    SingleCarriageway = 3,
    /// A Roundabout is a road which forms a ring on which traffic traveling
    /// in only one direction is allowed.
    Roundabout = 4,
    /// A Traffic Square is an open area (partly) enclosed by roads which is
    /// used for non-traffic purposes and which is not a Roundabout.
    TrafficSquare = 5,
    /// A Slip Road is a road especially designed to enter or leave a line.
    SlipRoad = 6,
    /// The physical road type is known but does not fit into one of the
    /// other categories.
    Other = 7,
}

impl Default for Fow {
    fn default() -> Self {
        Self::Other
    }
}

/// The side of road information (SOR) describes the relationship between the
/// point of interest and a referenced line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum SideOfRoad {
    /// Point is directly on (or above) the road, or determination of
    /// right/left side is not applicable.
    OnRoadOrUnknown = 0,
    /// Point is on right side of the road.
    Right = 1,
    /// Point is on left side of the road.
    Left = 2,
    /// Point is on both sides of the road.
    Both = 3,
}

impl Default for SideOfRoad {
    fn default() -> Self {
        Self::OnRoadOrUnknown
    }
}

/// The orientation information (ORI) describes the relationship between the
/// point of interest and the direction of a referenced line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Orientation {
    /// Point has no sense of orientation, or determination of orientation
    /// is not applicable.
    Unknown = 0,
    /// Point has orientation from first LRP towards second LRP.
    Forward = 1,
    /// Point has orientation from second LRP towards first LRP.
    Backward = 2,
    /// Point has orientation in both directions.
    Both = 3,
}

impl Default for Orientation {
    fn default() -> Self {
        Self::Unknown
    }
}

/// A distance measured in meters.
///
/// Wraps an `f64` with a total order so lengths can key binary heaps and
/// sorted collections.
#[derive(Debug, Clone, Copy, Default)]
pub struct Length(f64);

impl Length {
    pub const ZERO: Self = Self(0.0);
    pub const MAX: Self = Self(f64::MAX);

    pub const fn from_meters(meters: f64) -> Self {
        Self(meters)
    }

    pub const fn meters(&self) -> f64 {
        self.0
    }

    pub fn min(self, other: Self) -> Self {
        Self(self.0.min(other.0))
    }

    pub fn max(self, other: Self) -> Self {
        Self(self.0.max(other.0))
    }

    pub fn abs_diff(self, other: Self) -> Self {
        Self((self.0 - other.0).abs())
    }
}

impl PartialEq for Length {
    fn eq(&self, other: &Self) -> bool {
        self.0.total_cmp(&other.0).is_eq()
    }
}

impl Eq for Length {}

impl PartialOrd for Length {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Length {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Add for Length {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Length {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Length {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Length {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Mul<f64> for Length {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        Self(self.0 * rhs)
    }
}

impl Sum for Length {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        Self(iter.map(|length| length.0).sum())
    }
}

/// The bearing describes the angle between the true North and the road,
/// measured clockwise in degrees. Values are normalized into [0, 360).
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct Bearing(f64);

impl Bearing {
    pub fn from_degrees(degrees: f64) -> Self {
        Self(degrees.rem_euclid(360.0))
    }

    pub const fn degrees(&self) -> f64 {
        self.0
    }

    /// The undirected difference between two bearings, in [0, 180].
    pub fn difference(&self, other: &Self) -> f64 {
        let difference = (self.0 - other.0).abs() % 360.0;
        difference.min(360.0 - difference)
    }
}

/// Coordinate pair stands for a pair of WGS84 longitude (lon) and latitude
/// (lat) values. This coordinate pair specifies a geometric point in a
/// digital map.
#[derive(Debug, Clone, Copy, Default)]
pub struct Coordinate {
    pub lon: f64,
    pub lat: f64,
}

impl PartialEq for Coordinate {
    fn eq(&self, other: &Self) -> bool {
        const EPSILON: f64 = 1e-5;
        abs_diff_eq!(self.lon, other.lon, epsilon = EPSILON)
            && abs_diff_eq!(self.lat, other.lat, epsilon = EPSILON)
    }
}

/// Line attributes are part of a location reference point and consist of
/// functional road class (FRC), form of way (FOW) and bearing (BEAR) data.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LineAttributes {
    pub frc: Frc,
    pub fow: Fow,
    pub bearing: Bearing,
}

/// The path attributes are part of a location reference point (except for the
/// last location reference point) and consist of lowest functional road class
/// to next point (LFRCNP) and distance to next point (DNP) data.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PathAttributes {
    /// Lowest functional road class to next point.
    pub lfrcnp: Frc,
    /// Distance to next point.
    pub dnp: Length,
}

/// A single point of a location reference, anchored to a WGS84 coordinate and
/// carrying the attributes of the outgoing line towards the next point.
///
/// The last point of a reference has no path attributes and its line
/// attributes describe the *incoming* line, with the bearing measured in the
/// reversed direction of travel.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LocationReferencePoint {
    pub coordinate: Coordinate,
    pub line: LineAttributes,
    pub path: Option<PathAttributes>,
}

impl LocationReferencePoint {
    /// Lowest FRC to the next point; `Frc7` when the point carries no path
    /// attributes.
    pub fn lfrcnp(&self) -> Frc {
        self.path.map(|path| path.lfrcnp).unwrap_or_default()
    }

    /// Distance to the next point; zero when the point carries no path
    /// attributes.
    pub fn dnp(&self) -> Length {
        self.path.map(|path| path.dnp).unwrap_or_default()
    }
}

/// Offsets trim the decoded location reference path down to the size of the
/// actual location. Both operate along the lines of the location and are
/// measured in meters.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Offsets {
    /// Distance from the start of the path to the start of the location.
    pub pos: Length,
    /// Distance from the end of the path back to the end of the location.
    pub neg: Length,
}

/// A line location reference describes a path within a map and consists of
/// two or more location reference points and offset data.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LineReference {
    pub points: Vec<LocationReferencePoint>,
    pub offsets: Offsets,
}

/// Point along line is a point location defined by a line and an offset
/// value. The line is referenced by two location reference points and the
/// concrete position on that line is given as a fraction of the decoded path
/// length.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PointAlongLineReference {
    pub points: [LocationReferencePoint; 2],
    /// Position of the point along the decoded path, in [0, 1].
    pub offset: f64,
    pub orientation: Orientation,
    pub side: SideOfRoad,
}

/// Point of interest with an access point on the road network. The access
/// point is referenced like a point along line location and the POI itself is
/// an arbitrary coordinate next to it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PoiReference {
    pub point: PointAlongLineReference,
    pub poi: Coordinate,
}
