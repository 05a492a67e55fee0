use std::str::FromStr;

use crate::{
    constants::{MAX_PRECISION, METER_PRECISION, TILE, UPS_FALSE_ORIGIN, UTM_MAX_LAT, UTM_MIN_LAT, UTM_ROW_SPAN},
    geopoint::GeoPoint,
    grid::{self, PolarZone},
    projections::{
        polar_stereographic::{NoPolarSupport, PolarProjector, PolarStereographic, Pole},
        transverse_mercator::TransverseMercator,
    },
    search,
    usng::{PartialUsngRecord, UsngRecord},
    utm::{utm_zone_for, zone_drift, UpsPoint, UtmPoint},
    Error, ThisOrThat,
};

/// How far a reconstructed point may stray from the grid zone it was
/// given in before non-strict conversion rejects it.
///
/// The defaults follow the UTM/UPS overlap and the uniqueness range of the
/// 100km square letters. They are policy, not geodesy.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LooseTolerance {
    /// Lowest latitude accepted for a UTM grid zone
    pub south_limit: f64,
    /// Highest latitude accepted for a UTM grid zone
    pub north_limit: f64,
    /// Zones between the given and computed UTM zone, wrapping at 60
    pub max_zone_drift: u8,
    /// Letters between the given and computed latitude band
    pub max_band_drift: u8,
}

impl Default for LooseTolerance {
    fn default() -> Self {
        Self {
            south_limit: -79.5,
            north_limit: 84.5,
            max_zone_drift: 2,
            max_band_drift: 1,
        }
    }
}

/// Projection frame a reference is resolved in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Frame {
    Utm(u8),
    Ups(PolarZone),
}

/// A full reference placed on its projection plane: the south-west corner
/// of the addressed cell, its side, and the center on the ellipsoid.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Placement {
    pub(crate) frame: Frame,
    pub(crate) x: f64,
    pub(crate) y: f64,
    pub(crate) size: f64,
    pub(crate) center: GeoPoint,
}

/// Result of resolving a USNG string to a point.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UsngLocation {
    point: GeoPoint,
    record: UsngRecord,
}

impl UsngLocation {
    /// Center of the addressed cell.
    pub fn point(&self) -> GeoPoint {
        self.point
    }

    pub fn lon(&self) -> f64 {
        self.point.lon
    }

    pub fn lat(&self) -> f64 {
        self.point.lat
    }

    pub fn precision(&self) -> u8 {
        self.record.precision
    }

    /// The full reference the string resolved to, with any missing prefix
    /// filled in.
    pub fn record(&self) -> &UsngRecord {
        &self.record
    }

    pub fn usng_string(&self) -> String {
        self.record.to_string()
    }
}

/// Corners of the cell addressed by a USNG reference.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UsngCell {
    sw: GeoPoint,
    se: GeoPoint,
    ne: GeoPoint,
    nw: GeoPoint,
    center: GeoPoint,
    record: UsngRecord,
}

impl UsngCell {
    pub fn sw(&self) -> GeoPoint {
        self.sw
    }

    pub fn se(&self) -> GeoPoint {
        self.se
    }

    pub fn ne(&self) -> GeoPoint {
        self.ne
    }

    pub fn nw(&self) -> GeoPoint {
        self.nw
    }

    pub fn center(&self) -> GeoPoint {
        self.center
    }

    pub fn record(&self) -> &UsngRecord {
        &self.record
    }

    /// Closed ring SW, SE, NE, NW, SW.
    pub fn ring(&self) -> [GeoPoint; 5] {
        [self.sw, self.se, self.ne, self.nw, self.sw]
    }
}

/// Coarsest precision whose cells are no larger than one display unit of
/// `resolution` meters, clamped to whole meters.
///
/// ```
/// use usng::precision_for_resolution;
///
/// assert_eq!(precision_for_resolution(1.0), 5);
/// assert_eq!(precision_for_resolution(0.01), 5);
/// assert_eq!(precision_for_resolution(10.0), 4);
/// assert_eq!(precision_for_resolution(150.0), 3);
/// assert_eq!(precision_for_resolution(100_000.0), 0);
/// assert_eq!(precision_for_resolution(1e7), 0);
/// ```
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn precision_for_resolution(resolution: f64) -> u8 {
    if resolution.is_nan() || resolution <= 0. {
        return METER_PRECISION;
    }
    let digits = (TILE / resolution).log10().ceil();
    digits.clamp(0., f64::from(METER_PRECISION)) as u8
}

/// Converts between geographic points and USNG references.
///
/// The UTM half is built in. The UPS half is supplied by a
/// [`PolarProjector`]; the default is [`PolarStereographic`], and
/// [`UsngConverter::without_polar`] builds one that rejects polar zones.
#[derive(Clone, Copy, Debug)]
pub struct UsngConverter<P: PolarProjector = PolarStereographic> {
    polar: P,
    tm: TransverseMercator,
    tolerance: LooseTolerance,
}

impl UsngConverter {
    pub fn new() -> UsngConverter {
        Self {
            polar: PolarStereographic::ups(),
            tm: TransverseMercator::utm(),
            tolerance: LooseTolerance::default(),
        }
    }

    /// Converter with no polar backend. Points and references in the A, B,
    /// Y and Z zones fail with [`Error::UnsupportedProjection`] or
    /// [`Error::OutOfRange`].
    pub fn without_polar() -> UsngConverter<NoPolarSupport> {
        UsngConverter::new().with_polar(NoPolarSupport)
    }
}

impl Default for UsngConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: PolarProjector> UsngConverter<P> {
    /// Swaps the polar backend.
    pub fn with_polar<Q: PolarProjector>(self, polar: Q) -> UsngConverter<Q> {
        UsngConverter {
            polar,
            tm: self.tm,
            tolerance: self.tolerance,
        }
    }

    /// Replaces the non-strict tolerances.
    pub fn with_tolerance(mut self, tolerance: LooseTolerance) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn tolerance(&self) -> &LooseTolerance {
        &self.tolerance
    }

    pub fn polar(&self) -> &P {
        &self.polar
    }

    /// Encodes a point as a USNG reference with `precision` digits per
    /// coordinate (0 names the 100km square, 5 is 1m, up to 11).
    ///
    /// Latitudes strictly between 80°S and 84°N use UTM, the rest use the
    /// polar backend. Without one, the seams at exactly 80°S and 84°N stay
    /// in UTM.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if `precision` is above 11, or if the
    /// point is polar and no polar backend is configured.
    ///
    /// # Usage
    ///
    /// ```
    /// use usng::{GeoPoint, UsngConverter};
    ///
    /// let converter = UsngConverter::new();
    /// let point = GeoPoint::create(-93.16, 44.55).unwrap();
    ///
    /// let record = converter.from_lonlat(&point, 5).unwrap();
    /// assert_eq!(record.utm_zone(), Some(15));
    /// assert_eq!(record.grid_zone(), 'T');
    /// assert_eq!(record.grid_square().to_string(), "VK");
    ///
    /// let coarse = converter.from_lonlat(&point, 0).unwrap();
    /// assert_eq!(coarse.to_string(), "15T VK");
    ///
    /// let pole = GeoPoint::create(10.0, 89.0).unwrap();
    /// assert_eq!(converter.from_lonlat(&pole, 3).unwrap().grid_zone(), 'Z');
    /// assert!(UsngConverter::without_polar().from_lonlat(&pole, 3).is_err());
    /// ```
    pub fn from_lonlat(&self, point: &GeoPoint, precision: u8) -> Result<UsngRecord, Error> {
        if precision > MAX_PRECISION {
            return Err(Error::OutOfRange(format!(
                "Precision {precision} outside of [0, {MAX_PRECISION}]"
            )));
        }

        let lat = point.lat;
        if lat <= UTM_MIN_LAT || lat >= UTM_MAX_LAT {
            let pole = (lat > 0.).ternary(Pole::North, Pole::South);
            match self.polar.project(pole, point) {
                Ok((x, y)) => {
                    // West or east of the origin column; longitude -180 lands east
                    let grid_zone = PolarZone::around(pole)[usize::from(x >= UPS_FALSE_ORIGIN)];
                    return UsngRecord::from_ups(&UpsPoint::new(grid_zone, x, y), precision);
                }
                // The seams themselves still have a UTM band
                Err(Error::UnsupportedProjection) if (UTM_MIN_LAT..=UTM_MAX_LAT).contains(&lat) => {}
                Err(Error::UnsupportedProjection) => {
                    return Err(Error::OutOfRange(format!(
                        "Latitude {lat} is in polar grid zone {} but polar projections are not supported",
                        PolarZone::for_point(point.lon, lat)
                    )));
                }
                Err(e) => return Err(e),
            }
        }

        let zone = utm_zone_for(point.lon);
        let grid_zone = grid::grid_zone_letter(lat)?;
        let utm = self.tm.project(zone, point);

        UsngRecord::from_utm(grid_zone, &utm, precision)
    }

    /// Resolves a full or truncated USNG string to the center of the cell it
    /// addresses.
    ///
    /// A truncated string is completed from `reference`: the candidate grid
    /// zones and squares around it are tried and the one closest to it wins.
    /// With `strict` the computed point must lie in the grid zone it was
    /// given in; otherwise the overlap allowed by [`LooseTolerance`] is
    /// accepted.
    ///
    /// # Errors
    ///
    /// * [`Error::Malformed`] or [`Error::InsufficientInput`] if the string
    ///   cannot be parsed.
    /// * [`Error::ReferencePointRequired`] if the string is truncated and
    ///   no reference is given.
    /// * [`Error::AmbiguousReference`] if no candidate completion is valid.
    /// * [`Error::InvalidGridSquare`], [`Error::ZoneMismatch`] or
    ///   [`Error::OutOfRange`] if a full reference does not validate.
    ///
    /// # Usage
    ///
    /// ```
    /// use usng::{GeoPoint, UsngConverter};
    ///
    /// let converter = UsngConverter::new();
    /// let full = converter.to_lonlat("15T VK 87291 32975", None, true).unwrap();
    /// assert_eq!(full.precision(), 5);
    /// assert!((full.lon() + 93.16).abs() < 1e-4);
    /// assert!((full.lat() - 44.55).abs() < 1e-4);
    ///
    /// let near = GeoPoint::create(-93.0, 44.0).unwrap();
    /// let truncated = converter.to_lonlat("VK 87291 32975", Some(&near), true).unwrap();
    /// assert_eq!(truncated.usng_string(), "15T VK 87291 32975");
    ///
    /// assert!(converter.to_lonlat("VK 87291 32975", None, true).is_err());
    /// ```
    pub fn to_lonlat(&self, usng: &str, reference: Option<&GeoPoint>, strict: bool) -> Result<UsngLocation, Error> {
        let partial = PartialUsngRecord::from_str(usng)?;
        let (record, placement) = search::resolve(self, &partial, reference, strict)?;

        Ok(UsngLocation {
            point: placement.center,
            record,
        })
    }

    /// Like [`UsngConverter::to_lonlat`], but returns the four corners of
    /// the addressed cell.
    ///
    /// # Errors
    ///
    /// Same as [`UsngConverter::to_lonlat`].
    ///
    /// # Usage
    ///
    /// ```
    /// use usng::UsngConverter;
    ///
    /// let cell = UsngConverter::new().to_bounds("15T VK 876 322", None, true).unwrap();
    /// let ring = cell.ring();
    /// assert_eq!(ring[0], ring[4]);
    /// assert!(cell.sw().lat() < cell.nw().lat());
    /// assert!(cell.sw().lon() < cell.se().lon());
    /// assert!((cell.sw().haversine(&cell.se()) - 100.0).abs() < 1.0);
    /// ```
    pub fn to_bounds(&self, usng: &str, reference: Option<&GeoPoint>, strict: bool) -> Result<UsngCell, Error> {
        let partial = PartialUsngRecord::from_str(usng)?;
        let (record, placement) = search::resolve(self, &partial, reference, strict)?;
        let Placement { frame, x, y, size, center } = placement;

        Ok(UsngCell {
            sw: self.unproject(frame, x, y)?,
            se: self.unproject(frame, x + size, y)?,
            ne: self.unproject(frame, x + size, y + size)?,
            nw: self.unproject(frame, x, y + size)?,
            center,
            record,
        })
    }

    /// Places a full reference and checks that its center falls in the grid
    /// zone it names.
    pub(crate) fn place(&self, record: &UsngRecord, strict: bool) -> Result<Placement, Error> {
        match (record.polar_zone(), record.utm_zone) {
            (Some(zone), _) => self.place_ups(zone, record),
            (None, Some(zone)) => self.place_utm(zone, record, strict),
            (None, None) => Err(Error::InsufficientInput(format!(
                "Grid zone {} needs a UTM zone number", record.grid_zone
            ))),
        }
    }

    fn place_utm(&self, zone: u8, record: &UsngRecord, strict: bool) -> Result<Placement, Error> {
        let grid_zone = record.grid_zone;
        let (easting_index, northing_index) = grid::parse_grid_square(zone, &record.grid_square)?;
        let (de, dn) = record.offset_meters();
        let size = record.cell_size();

        let easting = f64::from(easting_index) * TILE + de;
        let mut northing = f64::from(northing_index) * TILE + dn;

        // Unwrap northing into the 2,000,000m cycle of the band
        let min_northing = grid::band_min_northing(grid_zone)
            .ok_or_else(|| Error::Malformed(format!("{grid_zone} is not a latitude band")))?;
        northing += UTM_ROW_SPAN * ((min_northing - northing) / UTM_ROW_SPAN).ceil();

        let in_band = |cell: &[GeoPoint; 5]| {
            cell.iter().any(|p| grid::band_letter_for(p.lat) == Some(grid_zone))
        };
        let mut cell = self.cell_points(Frame::Utm(zone), easting, northing, size)?;
        // Band minimums are taken on the central meridian; one cycle lower
        // may be the right one
        if !in_band(&cell) {
            northing -= UTM_ROW_SPAN;
            cell = self.cell_points(Frame::Utm(zone), easting, northing, size)?;
        }

        self.check_utm(zone, grid_zone, easting, &cell, strict)?;

        Ok(Placement {
            frame: Frame::Utm(zone),
            x: easting,
            y: northing,
            size,
            center: cell[0],
        })
    }

    /// Center, then the SW, SE, NE and NW corners of a cell.
    fn cell_points(&self, frame: Frame, x: f64, y: f64, size: f64) -> Result<[GeoPoint; 5], Error> {
        let half = size / 2.;
        Ok([
            self.unproject(frame, x + half, y + half)?,
            self.unproject(frame, x, y)?,
            self.unproject(frame, x + size, y)?,
            self.unproject(frame, x + size, y + size)?,
            self.unproject(frame, x, y + size)?,
        ])
    }

    // Strict mode accepts a cell if any of its points lies in the given zone
    // and band, so cells straddling a zone meridian or band edge validate.
    // The other checks use the center.
    fn check_utm(&self, zone: u8, grid_zone: char, easting: f64, cell: &[GeoPoint; 5], strict: bool) -> Result<(), Error> {
        let center = &cell[0];
        let computed_zone = utm_zone_for(center.lon);
        let computed_band = grid::band_letter_for(center.lat);
        let mismatch = || Error::ZoneMismatch(format!(
            "Given {zone}{grid_zone}, computed {computed_zone}{}",
            computed_band.map_or_else(|| "?".to_string(), |c| c.to_string()),
        ));

        let (south, north) = strict.ternary(
            (UTM_MIN_LAT, UTM_MAX_LAT),
            (self.tolerance.south_limit, self.tolerance.north_limit),
        );
        if center.lat < south || center.lat > north {
            return Err(Error::OutOfRange(format!(
                "Latitude {} outside of UTM range [{south}, {north}]", center.lat
            )));
        }

        if strict {
            let in_zone = cell.iter().any(|p| utm_zone_for(p.lon) == zone);
            let in_band = cell.iter().any(|p| grid::band_letter_for(p.lat) == Some(grid_zone));
            if !(in_zone && in_band) {
                return Err(mismatch());
            }
            return Ok(());
        }

        // Square letters are unique over 800km of easting around the
        // central meridian
        if !(TILE..=9. * TILE).contains(&easting) {
            return Err(mismatch());
        }
        if zone_drift(computed_zone, zone) > self.tolerance.max_zone_drift {
            return Err(mismatch());
        }
        let band_drift = computed_band
            .and_then(grid::band_position)
            .zip(grid::band_position(grid_zone))
            .map(|(a, b)| a.abs_diff(b));
        match band_drift {
            Some(drift) if drift <= usize::from(self.tolerance.max_band_drift) => Ok(()),
            _ => Err(mismatch()),
        }
    }

    fn place_ups(&self, zone: PolarZone, record: &UsngRecord) -> Result<Placement, Error> {
        let (x_index, y_index) = grid::parse_polar_grid_square(zone, &record.grid_square)?;
        let (dx, dy) = record.offset_meters();
        let size = record.cell_size();

        let x = UPS_FALSE_ORIGIN + f64::from(x_index) * TILE + dx;
        let y = UPS_FALSE_ORIGIN + f64::from(y_index) * TILE + dy;

        let cell = self.cell_points(Frame::Ups(zone), x, y, size)?;
        let north = zone.pole().is_north();
        let in_cap = cell
            .iter()
            .any(|p| north.ternary(p.lat >= UTM_MAX_LAT, p.lat <= UTM_MIN_LAT));
        if !in_cap {
            return Err(Error::ZoneMismatch(format!(
                "Polar grid zone {zone} but latitude {} is inside the UTM range", cell[0].lat
            )));
        }

        Ok(Placement {
            frame: Frame::Ups(zone),
            x,
            y,
            size,
            center: cell[0],
        })
    }

    fn unproject(&self, frame: Frame, x: f64, y: f64) -> Result<GeoPoint, Error> {
        match frame {
            Frame::Utm(zone) => Ok(self.tm.unproject(&UtmPoint::new(zone, x, y))),
            Frame::Ups(zone) => self.polar.unproject(zone.pole(), x, y),
        }
    }
}
