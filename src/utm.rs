use num::Integer;

use crate::{grid::PolarZone, utility::GeoMath};

pub(crate) mod zonespec {
    pub(crate) const MINUTMZONE: u8 = 1;
    pub(crate) const MAXUTMZONE: u8 = 60;
    pub(crate) const ZONE_WIDTH: f64 = 6.;
}

/// [UTM](https://en.wikipedia.org/wiki/Universal_Transverse_Mercator_coordinate_system)
/// point. Easting includes the 500,000m false easting; northing has no
/// false northing, so it is negative south of the equator.
#[allow(clippy::module_name_repetitions)]
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UtmPoint {
    pub(crate) zone: u8,
    pub(crate) easting: f64,
    pub(crate) northing: f64,
}

impl UtmPoint {
    pub(crate) fn new(zone: u8, easting: f64, northing: f64) -> UtmPoint {
        Self { zone, easting, northing }
    }

    pub fn zone(&self) -> u8 {
        self.zone
    }

    pub fn easting(&self) -> f64 {
        self.easting
    }

    pub fn northing(&self) -> f64 {
        self.northing
    }
}

/// [UPS](https://en.wikipedia.org/wiki/Universal_polar_stereographic_coordinate_system)
/// point in one of the four polar grid zones. `x` and `y` include the
/// 2,000,000m false origin.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UpsPoint {
    pub(crate) grid_zone: PolarZone,
    pub(crate) x: f64,
    pub(crate) y: f64,
}

impl UpsPoint {
    pub(crate) fn new(grid_zone: PolarZone, x: f64, y: f64) -> UpsPoint {
        Self { grid_zone, x, y }
    }

    pub fn grid_zone(&self) -> PolarZone {
        self.grid_zone
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }
}

pub(crate) fn central_meridian(zone: u8) -> f64 {
    zonespec::ZONE_WIDTH * f64::from(zone) - 183.
}

/// UTM zone whose 6° strip contains `lon`. No Norway/Svalbard exceptions:
/// USNG uses the regular grid.
///
/// ```
/// use usng::utm::utm_zone_for;
///
/// assert_eq!(utm_zone_for(-180.0), 1);
/// assert_eq!(utm_zone_for(-93.16), 15);
/// assert_eq!(utm_zone_for(179.9), 60);
/// assert_eq!(utm_zone_for(180.0), 1);
/// ```
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn utm_zone_for(lon: f64) -> u8 {
    let lon = lon.ang_normalize();
    let zone = ((lon + 180.) / zonespec::ZONE_WIDTH).floor() as i32 + 1;
    zone.clamp(i32::from(zonespec::MINUTMZONE), i32::from(zonespec::MAXUTMZONE)) as u8
}

/// Wraps any integer onto the `1..=60` zone ring.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn wrap_zone(zone: i32) -> u8 {
    ((zone - 1).mod_floor(&i32::from(zonespec::MAXUTMZONE)) + 1) as u8
}

/// Distance between two zones around the ring.
pub(crate) fn zone_drift(a: u8, b: u8) -> u8 {
    let diff = a.abs_diff(b);
    diff.min(zonespec::MAXUTMZONE - diff)
}
