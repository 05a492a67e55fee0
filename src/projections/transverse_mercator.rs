use crate::{
    constants::UTM_FALSE_EASTING,
    ellipsoid::Ellipsoid,
    geopoint::GeoPoint,
    utility::GeoMath,
    utm::{central_meridian, UtmPoint},
};

/// Closed-form Transverse Mercator series (USGS Professional Paper 1395,
/// equations 8-9 to 8-10 forward and 8-17 to 8-18 inverse). Accurate to
/// well under a meter within a few degrees of the central meridian.
///
/// No false northing is applied: southern hemisphere northings come out
/// negative and are unwrapped by the grid letter logic instead.
#[derive(Clone, Copy, Debug, Default)]
pub struct TransverseMercator {
    ellipsoid: Ellipsoid,
}

impl TransverseMercator {
    pub fn utm() -> TransverseMercator {
        Self {
            ellipsoid: Ellipsoid::nad83(),
        }
    }

    pub fn ellipsoid(&self) -> &Ellipsoid {
        &self.ellipsoid
    }

    /// Projects a point into the given UTM zone. The zone is not checked
    /// against the point's longitude.
    ///
    /// ```
    /// use usng::{GeoPoint, projections::transverse_mercator::TransverseMercator};
    ///
    /// let tm = TransverseMercator::utm();
    /// // On the central meridian of zone 15 easting is the false easting
    /// let utm = tm.project(15, &GeoPoint::create(-93.0, 45.0).unwrap());
    /// assert!((utm.easting() - 500_000.0).abs() < 1e-6);
    /// assert!(utm.northing() > 4_980_000.0 && utm.northing() < 4_990_000.0);
    /// ```
    #[allow(clippy::similar_names)]
    pub fn project(&self, zone: u8, point: &GeoPoint) -> UtmPoint {
        let Ellipsoid { a, e2, ep2, k0, .. } = self.ellipsoid;

        let lat = point.lat.to_radians();
        let lon = point.lon.to_radians();
        let lon0 = central_meridian(zone).to_radians();

        let (lat_sin, lat_cos) = lat.sin_cos();
        let lat_tan = lat_sin / lat_cos;
        let t = lat_tan * lat_tan;
        let t2 = t * t;

        let n = a / (1.0 - e2 * lat_sin * lat_sin).sqrt();
        let c = ep2 * lat_cos * lat_cos;
        let big_a = lat_cos * (lon - lon0);
        let m = self.ellipsoid.meridian_arc_length(lat);

        let a2 = big_a * big_a;
        let a3 = a2 * big_a;
        let a4 = a3 * big_a;
        let a5 = a4 * big_a;
        let a6 = a5 * big_a;

        let easting = k0 * n * (
            big_a
            + (1.0 - t + c) * a3 / 6.0
            + (5.0 - 18.0 * t + t2 + 72.0 * c - 58.0 * ep2) * a5 / 120.0
        ) + UTM_FALSE_EASTING;

        let northing = k0 * (m + n * lat_tan * (
            a2 / 2.0
            + (5.0 - t + 9.0 * c + 4.0 * c * c) * a4 / 24.0
            + (61.0 - 58.0 * t + t2 + 600.0 * c - 330.0 * ep2) * a6 / 720.0
        ));

        UtmPoint::new(zone, easting, northing)
    }

    /// Inverse of [`TransverseMercator::project`]. Negative northings map to
    /// the southern hemisphere.
    ///
    /// ```
    /// use usng::{GeoPoint, projections::transverse_mercator::TransverseMercator};
    ///
    /// let tm = TransverseMercator::utm();
    /// let point = GeoPoint::create(-93.16, 44.55).unwrap();
    /// let back = tm.unproject(&tm.project(15, &point));
    /// assert!(point.haversine(&back) < 0.01);
    /// ```
    #[allow(clippy::similar_names)]
    pub fn unproject(&self, utm: &UtmPoint) -> GeoPoint {
        let Ellipsoid { a, e2, ep2, k0, .. } = self.ellipsoid;
        let lon0 = central_meridian(utm.zone).to_radians();

        let root = (1.0 - e2).sqrt();
        let ecc1 = (1.0 - root) / (1.0 + root);
        let ecc12 = ecc1 * ecc1;
        let ecc13 = ecc12 * ecc1;
        let ecc14 = ecc12 * ecc12;

        let x = utm.easting - UTM_FALSE_EASTING;
        let mu = utm.northing / k0 / self.ellipsoid.rectifying_radius();

        // Footpoint latitude
        let lat1 = mu
            + (1.5 * ecc1 - 27.0 / 32.0 * ecc13) * (2.0 * mu).sin()
            + (21.0 / 16.0 * ecc12 - 55.0 / 32.0 * ecc14) * (4.0 * mu).sin()
            + (151.0 * ecc13 / 96.0) * (6.0 * mu).sin();

        let (sin1, cos1) = lat1.sin_cos();
        let tan1 = sin1 / cos1;
        let w = 1.0 - e2 * sin1 * sin1;
        let n1 = a / w.sqrt();
        let r1 = a * (1.0 - e2) / (w * w * w).sqrt();
        let t1 = tan1 * tan1;
        let t12 = t1 * t1;
        let c1 = ep2 * cos1 * cos1;
        let c12 = c1 * c1;

        let d = x / (n1 * k0);
        let d2 = d * d;
        let d3 = d2 * d;
        let d4 = d2 * d2;
        let d5 = d4 * d;
        let d6 = d3 * d3;

        let lat = lat1 - (n1 * tan1 / r1) * (
            d2 / 2.0
            - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c12 - 9.0 * ep2) * d4 / 24.0
            + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t12 - 252.0 * ep2 - 3.0 * c12) * d6 / 720.0
        );
        let lon = lon0 + (
            d
            - (1.0 + 2.0 * t1 + c1) * d3 / 6.0
            + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c12 + 8.0 * ep2 + 24.0 * t12) * d5 / 120.0
        ) / cos1;

        GeoPoint::new(lon.to_degrees().ang_normalize(), lat.to_degrees())
    }
}
