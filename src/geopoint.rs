use std::fmt::Display;

use crate::{utility::GeoMath, Error};

/// Mean radius of Earth in meters
///
/// <https://en.wikipedia.org/wiki/Earth_radius#Arithmetic_mean_radius>
const EARTH_MEAN_RADIUS_M: f64 = 6371.0088 * 1000.0;

/// Longitude/latitude point in decimal degrees on the NAD83/WGS84 datum.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    #[cfg_attr(feature = "serde", serde(alias = "longitude"))]
    pub(crate) lon: f64,
    #[cfg_attr(feature = "serde", serde(alias = "latitude"))]
    pub(crate) lat: f64,
}

impl GeoPoint {
    /// Internal-only constructor that doesn't check the bounds of lon/lat
    pub(crate) fn new(lon: f64, lat: f64) -> GeoPoint {
        Self { lon, lat }
    }

    /// Tries to create a point from a lon/lat pair. Longitude is normalized
    /// into `[-180, 180)`; latitude must be in `[-90, 90]`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if the latitude is outside `[-90, 90]`
    /// or either value is not finite.
    ///
    /// # Usage
    ///
    /// ```
    /// use usng::GeoPoint;
    ///
    /// let point = GeoPoint::create(-93.16, 44.55).unwrap();
    /// assert_eq!(point.lon(), -93.16);
    /// assert_eq!(point.lat(), 44.55);
    ///
    /// let wrapped = GeoPoint::create(190.0, 0.0).unwrap();
    /// assert!((wrapped.lon() + 170.0).abs() < 1e-9);
    ///
    /// assert!(GeoPoint::create(0.0, 91.0).is_err());
    /// assert!(GeoPoint::create(f64::NAN, 0.0).is_err());
    /// ```
    pub fn create(lon: f64, lat: f64) -> Result<GeoPoint, Error> {
        if !lon.is_finite() || !lat.is_finite() {
            Err(Error::OutOfRange(format!("Coordinate ({lon}, {lat}) is not finite")))
        } else if !(-90_f64..=90_f64).contains(&lat) {
            Err(Error::OutOfRange(format!("Latitude {lat} outside of valid range [-90, 90]")))
        } else {
            Ok(GeoPoint::new(lon.ang_normalize(), lat))
        }
    }

    #[inline]
    pub fn lon(&self) -> f64 {
        self.lon
    }

    #[inline]
    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn is_north(&self) -> bool {
        self.lat > 0.0
    }

    /// Great-circle angle in radians between two points. Only used to rank
    /// candidate points, so no ellipsoidal correction is applied.
    ///
    /// ```
    /// use usng::GeoPoint;
    ///
    /// let a = GeoPoint::create(0.0, 0.0).unwrap();
    /// let b = GeoPoint::create(90.0, 0.0).unwrap();
    /// assert!((a.angular_distance(&b) - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    /// assert_eq!(a.angular_distance(&a), 0.0);
    /// ```
    pub fn angular_distance(&self, other: &GeoPoint) -> f64 {
        let (sin_s, cos_s) = self.lat.to_radians().sin_cos();
        let (sin_f, cos_f) = other.lat.to_radians().sin_cos();
        let (sin_d, cos_d) = (other.lon - self.lon).to_radians().sin_cos();

        let y = (cos_f * sin_d).hypot(cos_s * sin_f - sin_s * cos_f * cos_d);
        let x = sin_s * sin_f + cos_s * cos_f * cos_d;

        y.atan2(x)
    }

    /// Returns the distance in meters between two points using the
    /// [haversine formula](https://en.wikipedia.org/wiki/Haversine_formula)
    /// on a sphere of Earth's mean radius.
    pub fn haversine(&self, other: &GeoPoint) -> f64 {
        let lat1_r = self.lat.to_radians();
        let lat2_r = other.lat.to_radians();

        2.0 * EARTH_MEAN_RADIUS_M * (
            ((other.lat - self.lat).to_radians() / 2.0).sin().powi(2) +
            lat1_r.cos() * lat2_r.cos() *
            ((other.lon - self.lon).to_radians() / 2.0).sin().powi(2)
        ).sqrt().asin()
    }
}

impl Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut buf = ryu::Buffer::new();
        let lon = buf.format(self.lon);
        let mut buf = ryu::Buffer::new();
        let lat = buf.format(self.lat);
        write!(f, "{lon} {lat}")
    }
}
