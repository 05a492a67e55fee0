// Semi-major axis a (NAD83 / GRS80)
pub(crate) const NAD83_A: f64 = 6_378_137.;
// Semi-minor axis b, as used by the meridian distance series
pub(crate) const NAD83_B: f64 = 6_356_752.3;
// WGS84 flattening, used by the polar stereographic backend
#[allow(clippy::unreadable_literal)]
pub(crate) const WGS84_F: f64 = 1.0 / 298.257223563;

// UTM central scale factor
pub(crate) const UTM_K0: f64 = 9996.0 / 10_000.;
// UPS central scale factor
pub(crate) const UPS_K0: f64 = 994.0 / 1000.;

// Side of a 100km grid square in meters
pub(crate) const TILE: f64 = 100_000.;
// UTM false easting
pub(crate) const UTM_FALSE_EASTING: f64 = 500_000.;
// Northing letters repeat every 2,000,000m
pub(crate) const UTM_ROW_SPAN: f64 = 2_000_000.;
// UPS false origin (both x and y)
pub(crate) const UPS_FALSE_ORIGIN: f64 = 2_000_000.;

// Latitude limits of the UTM grid zones
pub(crate) const UTM_MIN_LAT: f64 = -80.;
pub(crate) const UTM_MAX_LAT: f64 = 84.;

/// Digits per coordinate in a 1m reference
pub const METER_PRECISION: u8 = 5;
/// Maximum digits per coordinate (1 micrometer)
pub const MAX_PRECISION: u8 = 5 + 6;
