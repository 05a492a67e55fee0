use crate::constants::{NAD83_A, NAD83_B, UTM_K0};

/// Reference ellipsoid used by the UTM series.
///
/// Only the NAD83 figure is supported: the meridian distance series below
/// is truncated at `e⁶`, which is only accurate for ellipsoids of Earth's
/// flattening.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ellipsoid {
    /// Semi-major axis in meters
    pub a: f64,
    /// Semi-minor axis in meters
    pub b: f64,
    /// First eccentricity squared
    pub e2: f64,
    /// Second eccentricity squared, `e² / (1 - e²)`
    pub ep2: f64,
    /// Central scale factor
    pub k0: f64,
}

impl Ellipsoid {
    pub fn nad83() -> Ellipsoid {
        let e2 = (NAD83_A * NAD83_A - NAD83_B * NAD83_B) / (NAD83_A * NAD83_A);

        Self {
            a: NAD83_A,
            b: NAD83_B,
            e2,
            ep2: e2 / (1.0 - e2),
            k0: UTM_K0,
        }
    }

    #[inline]
    pub fn e4(&self) -> f64 {
        self.e2 * self.e2
    }

    #[inline]
    pub fn e6(&self) -> f64 {
        self.e2 * self.e4()
    }

    /// Leading coefficient of the meridian distance series. Dividing a
    /// distance along the meridian by this gives the rectifying latitude.
    pub(crate) fn rectifying_radius(&self) -> f64 {
        self.a * (1.0 - self.e2 / 4.0 - 3.0 * self.e4() / 64.0 - 5.0 * self.e6() / 256.0)
    }

    /// Distance along the meridian from the equator to `lat` (radians), in
    /// meters. See equation 3-21, USGS Professional Paper 1395.
    ///
    /// ```
    /// use usng::Ellipsoid;
    ///
    /// let ellipsoid = Ellipsoid::nad83();
    /// assert_eq!(ellipsoid.meridian_arc_length(0.0), 0.0);
    ///
    /// // Quarter meridian is roughly 10,002km
    /// let quarter = ellipsoid.meridian_arc_length(std::f64::consts::FRAC_PI_2);
    /// assert!((quarter - 10_001_965.7).abs() < 1.0);
    /// ```
    pub fn meridian_arc_length(&self, lat: f64) -> f64 {
        let (e2, e4, e6) = (self.e2, self.e4(), self.e6());

        let c1 = self.rectifying_radius();
        let c2 = -self.a * (3.0 * e2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0);
        let c3 = self.a * (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0);
        let c4 = -self.a * 35.0 * e6 / 3072.0;

        c1 * lat + c2 * (2.0 * lat).sin() + c3 * (4.0 * lat).sin() + c4 * (6.0 * lat).sin()
    }
}

impl Default for Ellipsoid {
    fn default() -> Self {
        Self::nad83()
    }
}
