use std::{fmt::Display, str::FromStr};

use num::Integer;

use crate::{
    constants::{MAX_PRECISION, METER_PRECISION, UPS_FALSE_ORIGIN},
    grid::{self, GridSquare, PolarZone},
    utm::{zonespec::{MAXUTMZONE, MINUTMZONE}, UpsPoint, UtmPoint},
    Error,
};

// Fixed-point scale for splitting meters into grid digits, 1 unit = 1µm
const MULT: f64 = 1_000_000.;
const TILE_UNITS: i64 = 100_000 * 1_000_000;

/// Size in meters of one unit of the last digit at `precision`.
pub(crate) fn digit_scale(precision: u8) -> f64 {
    10_f64.powi(i32::from(METER_PRECISION) - i32::from(precision))
}

/// Meters addressed by a digit run at `precision`.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn digits_to_meters(digits: u64, precision: u8) -> f64 {
    if precision <= METER_PRECISION {
        digits as f64 * digit_scale(precision)
    } else {
        digits as f64 / 10_f64.powi(i32::from(precision - METER_PRECISION))
    }
}

// Splits a coordinate into its 100km tile index and the truncated digits
// inside the tile. Negative coordinates count tiles down from zero.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn split_coordinate(value: f64, precision: u8) -> (i64, u64) {
    let units = (value * MULT).floor() as i64;
    let (tile, rem) = units.div_mod_floor(&TILE_UNITS);
    let divisor = 10_i64.pow(u32::from(MAX_PRECISION - precision));

    (tile, (rem / divisor) as u64)
}

/// A complete USNG reference.
///
/// `easting` and `northing` are the digit runs as integers: with
/// `precision` p each is p digits long and counts units of `10^(5-p)`
/// meters within the 100km square.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RecordFields"))]
pub struct UsngRecord {
    pub(crate) utm_zone: Option<u8>,
    pub(crate) grid_zone: char,
    pub(crate) grid_square: GridSquare,
    pub(crate) easting: u64,
    pub(crate) northing: u64,
    pub(crate) precision: u8,
}

impl UsngRecord {
    /// Tries to build a record from its parts. The grid square letters are
    /// not checked against the zone; conversion does that.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Malformed`] if the zone number is missing for a UTM
    /// band, present for a polar zone, or outside `[1, 60]`, if the letter
    /// is not a grid zone letter, or if a digit run does not fit in
    /// `precision` digits.
    ///
    /// # Usage
    ///
    /// ```
    /// use usng::{GridSquare, UsngRecord};
    ///
    /// let record = UsngRecord::create(Some(15), 'T', GridSquare::new('V', 'K'), 876, 322, 3).unwrap();
    /// assert_eq!(record.to_string(), "15T VK 876 322");
    ///
    /// let padded = UsngRecord::create(Some(5), 'Q', GridSquare::new('K', 'B'), 12, 7, 4).unwrap();
    /// assert_eq!(padded.to_string(), "5Q KB 0012 0007");
    ///
    /// let polar = UsngRecord::create(None, 'Z', GridSquare::new('A', 'H'), 0, 0, 0).unwrap();
    /// assert_eq!(polar.to_string(), "Z AH");
    ///
    /// assert!(UsngRecord::create(None, 'T', GridSquare::new('V', 'K'), 0, 0, 0).is_err());
    /// assert!(UsngRecord::create(Some(15), 'T', GridSquare::new('V', 'K'), 1000, 0, 3).is_err());
    /// ```
    pub fn create(
        utm_zone: Option<u8>,
        grid_zone: char,
        grid_square: GridSquare,
        easting: u64,
        northing: u64,
        precision: u8,
    ) -> Result<UsngRecord, Error> {
        let grid_zone = grid_zone.to_ascii_uppercase();
        let polar = PolarZone::from_letter(grid_zone).is_some();

        if !polar && !grid::is_band_letter(grid_zone) {
            return Err(Error::Malformed(format!("{grid_zone} is not a grid zone letter")));
        }
        match utm_zone {
            Some(zone) if polar => {
                return Err(Error::Malformed(format!("Polar grid zone {grid_zone} does not take UTM zone {zone}")));
            }
            Some(zone) if !(MINUTMZONE..=MAXUTMZONE).contains(&zone) => {
                return Err(Error::Malformed(format!("Zone {zone} not in [1,60]")));
            }
            None if !polar => {
                return Err(Error::Malformed(format!("Grid zone {grid_zone} needs a UTM zone number")));
            }
            _ => {}
        }
        if precision > MAX_PRECISION {
            return Err(Error::Malformed(format!("Precision {precision} above {MAX_PRECISION}")));
        }
        let limit = 10_u64.pow(u32::from(precision));
        if easting >= limit || northing >= limit {
            return Err(Error::Malformed(format!(
                "Digits {easting} {northing} do not fit in precision {precision}"
            )));
        }

        Ok(Self {
            utm_zone,
            grid_zone,
            grid_square,
            easting,
            northing,
            precision,
        })
    }

    /// UTM zone number, `None` for the polar zones.
    pub fn utm_zone(&self) -> Option<u8> {
        self.utm_zone
    }

    pub fn grid_zone(&self) -> char {
        self.grid_zone
    }

    pub fn grid_square(&self) -> GridSquare {
        self.grid_square
    }

    pub fn easting(&self) -> u64 {
        self.easting
    }

    pub fn northing(&self) -> u64 {
        self.northing
    }

    pub fn precision(&self) -> u8 {
        self.precision
    }

    pub fn polar_zone(&self) -> Option<PolarZone> {
        PolarZone::from_letter(self.grid_zone)
    }

    /// Canonical spaced form, e.g. `15T VK 87664 32296`.
    pub fn usng_string(&self) -> String {
        self.to_string()
    }

    /// Meters from the south-west corner of the 100km square to the
    /// south-west corner of the addressed cell.
    pub fn offset_meters(&self) -> (f64, f64) {
        (
            digits_to_meters(self.easting, self.precision),
            digits_to_meters(self.northing, self.precision),
        )
    }

    /// Side of the addressed cell in meters.
    pub fn cell_size(&self) -> f64 {
        digit_scale(self.precision)
    }

    /// Encodes a UTM point already assigned to `zone` and band `grid_zone`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if the easting is outside the lettered
    /// columns `[100000, 900000)`.
    pub(crate) fn from_utm(grid_zone: char, utm: &UtmPoint, precision: u8) -> Result<UsngRecord, Error> {
        let (column, easting) = split_coordinate(utm.easting, precision);
        let (row, northing) = split_coordinate(utm.northing, precision);

        let easting_index = u8::try_from(column)
            .ok()
            .filter(|idx| (1..=8).contains(idx))
            .ok_or_else(|| Error::OutOfRange(format!(
                "Easting {:.0} outside the 100km columns of zone {}",
                utm.easting, utm.zone
            )))?;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let northing_index = row.mod_floor(&20) as u8;

        Ok(Self {
            utm_zone: Some(utm.zone),
            grid_zone,
            grid_square: grid::grid_square_letters(utm.zone, easting_index, northing_index)?,
            easting,
            northing,
            precision,
        })
    }

    /// Encodes a UPS point.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if the point lies outside its polar
    /// grid zone.
    #[allow(clippy::cast_possible_truncation)]
    pub(crate) fn from_ups(ups: &UpsPoint, precision: u8) -> Result<UsngRecord, Error> {
        let (column, easting) = split_coordinate(ups.x - UPS_FALSE_ORIGIN, precision);
        let (row, northing) = split_coordinate(ups.y - UPS_FALSE_ORIGIN, precision);

        Ok(Self {
            utm_zone: None,
            grid_zone: ups.grid_zone.letter(),
            grid_square: grid::polar_grid_square(ups.grid_zone, column as i32, row as i32)?,
            easting,
            northing,
            precision,
        })
    }
}

impl Display for UsngRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(zone) = self.utm_zone {
            write!(f, "{zone}")?;
        }
        write!(f, "{} {}", self.grid_zone, self.grid_square)?;

        if self.precision > 0 {
            let width = usize::from(self.precision);
            write!(f, " {:0width$} {:0width$}", self.easting, self.northing)?;
        }

        Ok(())
    }
}

// Deserialized records go through the same checks as `create`
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RecordFields {
    utm_zone: Option<u8>,
    grid_zone: char,
    grid_square: GridSquare,
    easting: u64,
    northing: u64,
    precision: u8,
}

#[cfg(feature = "serde")]
impl TryFrom<RecordFields> for UsngRecord {
    type Error = Error;

    fn try_from(fields: RecordFields) -> Result<Self, Self::Error> {
        let square = GridSquare::new(fields.grid_square.column(), fields.grid_square.row());
        UsngRecord::create(
            fields.utm_zone,
            fields.grid_zone,
            square,
            fields.easting,
            fields.northing,
            fields.precision,
        )
    }
}

/// A parsed, possibly truncated, USNG reference. Any of the prefix fields
/// may be missing; see [`crate::UsngConverter::to_lonlat`] for how they are
/// filled in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "PartialRecordFields"))]
pub struct PartialUsngRecord {
    pub(crate) utm_zone: Option<u8>,
    pub(crate) grid_zone: Option<char>,
    pub(crate) grid_square: Option<GridSquare>,
    pub(crate) easting: u64,
    pub(crate) northing: u64,
    pub(crate) precision: u8,
}

impl PartialUsngRecord {
    pub fn utm_zone(&self) -> Option<u8> {
        self.utm_zone
    }

    pub fn grid_zone(&self) -> Option<char> {
        self.grid_zone
    }

    pub fn grid_square(&self) -> Option<GridSquare> {
        self.grid_square
    }

    pub fn easting(&self) -> u64 {
        self.easting
    }

    pub fn northing(&self) -> u64 {
        self.northing
    }

    pub fn precision(&self) -> u8 {
        self.precision
    }

    pub fn polar_zone(&self) -> Option<PolarZone> {
        self.grid_zone.and_then(PolarZone::from_letter)
    }

    /// Whether the record can be converted without a reference point.
    pub fn is_complete(&self) -> bool {
        self.grid_square.is_some()
            && (self.polar_zone().is_some() || (self.utm_zone.is_some() && self.grid_zone.is_some()))
    }

    /// Fills in the prefix fields to get a full record.
    pub(crate) fn complete(&self, utm_zone: Option<u8>, grid_zone: char, grid_square: GridSquare) -> UsngRecord {
        UsngRecord {
            utm_zone,
            grid_zone,
            grid_square,
            easting: self.easting,
            northing: self.northing,
            precision: self.precision,
        }
    }

    /// Parses a USNG string, full or truncated. Whitespace is ignored and
    /// letters may be lowercase.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InsufficientInput`] if the string has neither a grid
    /// zone letter nor digits, and [`Error::Malformed`] if it does not
    /// follow `[zone][letter][square][digits]`.
    ///
    /// # Usage
    ///
    /// ```
    /// use usng::PartialUsngRecord;
    ///
    /// let full = PartialUsngRecord::parse_str("15T VK 87664 32296").unwrap();
    /// assert_eq!(full.utm_zone(), Some(15));
    /// assert_eq!(full.grid_zone(), Some('T'));
    /// assert_eq!(full.grid_square().unwrap().to_string(), "VK");
    /// assert_eq!((full.easting(), full.northing(), full.precision()), (87664, 32296, 5));
    ///
    /// let truncated = PartialUsngRecord::parse_str("vk8732").unwrap();
    /// assert_eq!(truncated.utm_zone(), None);
    /// assert_eq!(truncated.grid_zone(), None);
    /// assert_eq!(truncated.precision(), 2);
    ///
    /// let polar = PartialUsngRecord::parse_str("Z AH 1234 5678").unwrap();
    /// assert_eq!(polar.grid_zone(), Some('Z'));
    ///
    /// assert!(PartialUsngRecord::parse_str("15T VK 123").is_err());
    /// assert!(PartialUsngRecord::parse_str("   ").is_err());
    /// ```
    pub fn parse_str(usng: &str) -> Result<PartialUsngRecord, Error> {
        Self::from_str(usng)
    }
}

/// Compact form without spaces, e.g. `TVK8732`.
impl Display for PartialUsngRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(zone) = self.utm_zone {
            write!(f, "{zone}")?;
        }
        if let Some(letter) = self.grid_zone {
            write!(f, "{letter}")?;
        }
        if let Some(square) = self.grid_square {
            write!(f, "{square}")?;
        }
        if self.precision > 0 {
            let width = usize::from(self.precision);
            write!(f, "{:0width$}{:0width$}", self.easting, self.northing)?;
        }

        Ok(())
    }
}

// Deserialized partial records must read back from their own string form
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct PartialRecordFields {
    utm_zone: Option<u8>,
    grid_zone: Option<char>,
    grid_square: Option<GridSquare>,
    easting: u64,
    northing: u64,
    precision: u8,
}

#[cfg(feature = "serde")]
impl TryFrom<PartialRecordFields> for PartialUsngRecord {
    type Error = Error;

    fn try_from(fields: PartialRecordFields) -> Result<Self, Self::Error> {
        let precision = fields.precision;
        if precision > MAX_PRECISION {
            return Err(Error::Malformed(format!("Precision {precision} above {MAX_PRECISION}")));
        }
        let limit = 10_u64.pow(u32::from(precision));
        if fields.easting >= limit || fields.northing >= limit {
            return Err(Error::Malformed(format!(
                "Digits {} {} do not fit in precision {precision}",
                fields.easting, fields.northing
            )));
        }

        let expected = Self {
            utm_zone: fields.utm_zone,
            grid_zone: fields.grid_zone.map(|c| c.to_ascii_uppercase()),
            grid_square: fields.grid_square.map(|sq| GridSquare::new(sq.column(), sq.row())),
            easting: fields.easting,
            northing: fields.northing,
            precision,
        };
        let parsed = Self::from_str(&expected.to_string())?;
        if parsed != expected {
            return Err(Error::Malformed(format!("{expected} does not parse back to the same fields")));
        }

        Ok(parsed)
    }
}

impl FromStr for PartialUsngRecord {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_uppercase();

        if value.is_empty() {
            return Err(Error::InsufficientInput("Empty USNG string".to_string()));
        }
        if !value.is_ascii() {
            return Err(Error::Malformed(format!("Unexpected characters in {value}")));
        }

        let chars = value.as_bytes();

        // Trailing digit run: easting digits then northing digits
        let digit_start = chars
            .iter()
            .rposition(|c| !c.is_ascii_digit())
            .map_or(0, |p| p + 1);
        let digits = &value[digit_start..];

        if digits.len() % 2 == 1 {
            return Err(Error::Malformed(format!("Not an even number of digits in {digits}")));
        }
        let precision = u8::try_from(digits.len() / 2)
            .ok()
            .filter(|p| *p <= MAX_PRECISION)
            .ok_or_else(|| Error::Malformed(format!("More than {} digits in {digits}", 2 * MAX_PRECISION)))?;

        let (easting, northing) = if precision > 0 {
            let (e, n) = digits.split_at(usize::from(precision));
            let parse = |d: &str| d.parse::<u64>()
                .map_err(|_| Error::Malformed(format!("Invalid digits {d}")));
            (parse(e)?, parse(n)?)
        } else {
            (0, 0)
        };

        // 100km square: the two letters before the digits
        let rest = &chars[..digit_start];
        let has_square = rest.len() >= 2
            && rest[rest.len() - 2..].iter().all(u8::is_ascii_alphabetic);
        let (prefix, grid_square) = if has_square {
            let n = rest.len();
            (&rest[..n - 2], Some(GridSquare::new(char::from(rest[n - 2]), char::from(rest[n - 1]))))
        } else {
            (rest, None)
        };

        // Grid zone: up to two digits of UTM zone, then one letter
        let zone_len = prefix.iter().take_while(|c| c.is_ascii_digit()).count();
        if zone_len > 2 {
            return Err(Error::Malformed(format!("More than 2 digits of UTM zone in {value}")));
        }
        let utm_zone = if zone_len > 0 {
            let zone_str = &value[..zone_len];
            let zone = zone_str
                .parse::<u8>()
                .map_err(|_| Error::Malformed(format!("Invalid UTM zone {zone_str}")))?;
            if !(MINUTMZONE..=MAXUTMZONE).contains(&zone) {
                return Err(Error::Malformed(format!("Zone {zone} not in [1,60]")));
            }
            Some(zone)
        } else {
            None
        };

        let grid_zone = match &prefix[zone_len..] {
            [] => None,
            [letter] if letter.is_ascii_alphabetic() => Some(char::from(*letter)),
            _ => return Err(Error::Malformed(format!("Unexpected characters in {value}"))),
        };

        if let Some(letter) = grid_zone {
            let polar = PolarZone::from_letter(letter).is_some();
            if !polar && !grid::is_band_letter(letter) {
                return Err(Error::Malformed(format!("{letter} is not a grid zone letter")));
            }
            if polar && utm_zone.is_some() {
                return Err(Error::Malformed(format!(
                    "Polar grid zone {letter} does not take a UTM zone number"
                )));
            }
        }

        if grid_zone.is_none() && digits.is_empty() {
            return Err(Error::InsufficientInput(format!(
                "{value} has neither a grid zone letter nor coordinate digits"
            )));
        }

        Ok(Self {
            utm_zone,
            grid_zone,
            grid_square,
            easting,
            northing,
            precision,
        })
    }
}

