use crate::{
    constants::{UPS_FALSE_ORIGIN, UPS_K0, UTM_MAX_LAT, UTM_MIN_LAT, NAD83_A, WGS84_F},
    geopoint::GeoPoint,
    utility::{dms, GeoMath},
    Error, ThisOrThat,
};

const F: f64 = WGS84_F;
const E2: f64 = F * (2. - F);

/// Pole a polar stereographic projection is centered on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Pole {
    North,
    South,
}

impl Pole {
    pub fn is_north(self) -> bool {
        self == Pole::North
    }
}

/// Backend for the UPS half of the converter. Coordinates include the
/// 2,000,000m false origin.
///
/// The crate ships [`PolarStereographic`]; [`NoPolarSupport`] stands in
/// when polar references should be rejected outright.
pub trait PolarProjector {
    /// Projects a point onto the plane of `pole`.
    ///
    /// # Errors
    ///
    /// Implementations return [`Error::OutOfRange`] if the point is not in
    /// the polar cap for `pole`, or [`Error::UnsupportedProjection`] if
    /// polar projections are unavailable.
    fn project(&self, pole: Pole, point: &GeoPoint) -> Result<(f64, f64), Error>;

    /// Inverse of [`PolarProjector::project`].
    ///
    /// # Errors
    ///
    /// Implementations return [`Error::UnsupportedProjection`] if polar
    /// projections are unavailable.
    fn unproject(&self, pole: Pole, x: f64, y: f64) -> Result<GeoPoint, Error>;
}

/// Universal Polar Stereographic on the WGS84 ellipsoid, `k0 = 0.994`.
#[derive(Clone, Copy, Debug)]
pub struct PolarStereographic {
    a: f64,
    k0: f64,
    es: f64,
    c: f64,
}

impl PolarStereographic {
    pub fn ups() -> PolarStereographic {
        let es = (F < 0.).ternary(-1., 1.) * E2.abs().sqrt();
        let c = (1. - F) * 1_f64.eatanhe(es).exp();

        Self {
            a: NAD83_A,
            k0: UPS_K0,
            es,
            c,
        }
    }

    fn from_geo(&self, northp: bool, lat: f64, lon: f64) -> (f64, f64) {
        let lat = lat * northp.ternary(1., -1.);

        let tau = lat.to_radians().tan();
        let taup = tau.taupf(self.es);
        let mut rho = 1_f64.hypot(taup) + taup.abs();
        rho = (taup >= 0.).ternary_lazy(
            || lat.eps_eq(f64::from(dms::QD)).ternary(0., 1. / rho),
            || rho,
        );
        rho *= 2. * self.k0 * self.a / self.c;

        let (x, y) = lon.to_radians().sin_cos();

        (x * rho, y * northp.ternary(-rho, rho))
    }

    fn to_geo(&self, northp: bool, x: f64, y: f64) -> GeoPoint {
        let rho = x.hypot(y);
        let t = (rho != 0.).ternary_lazy(
            || rho / (2. * self.k0 * self.a / self.c),
            || f64::EPSILON.powi(2),
        );
        let taup = (1. / t - t) / 2.;
        let tau = taup.tauf(self.es);

        let lat = northp.ternary(1., -1.) * tau.atan().to_degrees();
        let lon = x.atan2(northp.ternary(-y, y)).to_degrees();

        GeoPoint::new(lon.ang_normalize(), lat)
    }
}

impl Default for PolarStereographic {
    fn default() -> Self {
        Self::ups()
    }
}

impl PolarProjector for PolarStereographic {
    /// ```
    /// use usng::{GeoPoint, PolarProjector, PolarStereographic, Pole};
    ///
    /// let ups = PolarStereographic::ups();
    /// let pole = GeoPoint::create(0.0, 90.0).unwrap();
    /// let (x, y) = ups.project(Pole::North, &pole).unwrap();
    /// assert!((x - 2_000_000.0).abs() < 1e-6);
    /// assert!((y - 2_000_000.0).abs() < 1e-6);
    ///
    /// // Mid-latitudes belong to UTM
    /// let utm = GeoPoint::create(0.0, 45.0).unwrap();
    /// assert!(ups.project(Pole::North, &utm).is_err());
    /// ```
    fn project(&self, pole: Pole, point: &GeoPoint) -> Result<(f64, f64), Error> {
        let in_cap = match pole {
            Pole::North => point.lat >= UTM_MAX_LAT,
            Pole::South => point.lat <= UTM_MIN_LAT,
        };
        if !in_cap {
            let wrong_hemisphere = pole.is_north() != point.is_north();
            return Err(Error::OutOfRange(format!(
                "Latitude {} is {} for a {:?} polar projection",
                point.lat,
                wrong_hemisphere.ternary("in the wrong hemisphere", "inside the UTM domain"),
                pole,
            )));
        }

        let (x, y) = self.from_geo(pole.is_north(), point.lat, point.lon);
        Ok((x + UPS_FALSE_ORIGIN, y + UPS_FALSE_ORIGIN))
    }

    fn unproject(&self, pole: Pole, x: f64, y: f64) -> Result<GeoPoint, Error> {
        Ok(self.to_geo(pole.is_north(), x - UPS_FALSE_ORIGIN, y - UPS_FALSE_ORIGIN))
    }
}

/// Polar backend for hosts that do not support UPS. Every call fails with
/// [`Error::UnsupportedProjection`].
#[derive(Clone, Copy, Debug, Default)]
pub struct NoPolarSupport;

impl PolarProjector for NoPolarSupport {
    fn project(&self, _pole: Pole, _point: &GeoPoint) -> Result<(f64, f64), Error> {
        Err(Error::UnsupportedProjection)
    }

    fn unproject(&self, _pole: Pole, _x: f64, _y: f64) -> Result<GeoPoint, Error> {
        Err(Error::UnsupportedProjection)
    }
}

