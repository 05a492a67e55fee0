//! Letter tables for USNG grid zones and 100km grid squares.
//!
//! Grid square letters name the south-west corner of each square, counted
//! from the false origin of the zone: easting letters from 100,000m and
//! northing letters from the equator (repeating every 2,000,000m).

use std::fmt::Display;

use lazy_static::lazy_static;
use num::Integer;

use crate::{
    constants::{UTM_MAX_LAT, UTM_MIN_LAT},
    projections::polar_stereographic::Pole,
    Error, ThisOrThat,
};

//                                   0    1    2    3    4    5    6    7    8    9   10   11   12   13   14   15   16   17   18   19   x 100,000m northing
const NS_LETTERS_135: [char; 20] = ['A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'J', 'K', 'L', 'M', 'N', 'P', 'Q', 'R', 'S', 'T', 'U', 'V'];
const NS_LETTERS_246: [char; 20] = ['F', 'G', 'H', 'J', 'K', 'L', 'M', 'N', 'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'A', 'B', 'C', 'D', 'E'];

//                                  1    2    3    4    5    6    7    8   x 100,000m easting
const EW_LETTERS_14: [char; 8] = ['A', 'B', 'C', 'D', 'E', 'F', 'G', 'H'];
const EW_LETTERS_25: [char; 8] = ['J', 'K', 'L', 'M', 'N', 'P', 'Q', 'R'];
const EW_LETTERS_36: [char; 8] = ['S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z'];

// Bands are 8° tall from 80°S; the last entry repeats X for the 12° band 72°N-84°N
const GRID_ZONES: [char; 21] = ['C', 'D', 'E', 'F', 'G', 'H', 'J', 'K', 'L', 'M', 'N', 'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'X'];
pub(crate) const BAND_COUNT: usize = 20;
const BAND_HEIGHT: f64 = 8.;

// Approximate northing per degree of latitude, 2π·6356752.3 / 360
const NORTHING_PER_DEGREE: f64 = 110_946.259;

const UPS_X_LETTERS: [char; 18] = ['A', 'B', 'C', 'F', 'G', 'H', 'J', 'K', 'L', 'P', 'Q', 'R', 'S', 'T', 'U', 'X', 'Y', 'Z'];
const UPS_YN_LETTERS: [char; 14] = ['H', 'J', 'K', 'L', 'M', 'N', 'P', 'A', 'B', 'C', 'D', 'E', 'F', 'G'];
const UPS_YS_LETTERS: [char; 24] = [
    'N', 'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z',
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'J', 'K', 'L', 'M',
];

lazy_static! {
    // Northing of the southern edge of each band along the central meridian.
    // Only good enough to pick the right 2,000,000m cycle.
    static ref GRID_ZONES_NORTHING: [f64; BAND_COUNT] = {
        let mut northing = [0.; BAND_COUNT];
        for (band, value) in northing.iter_mut().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let lat = UTM_MIN_LAT + BAND_HEIGHT * band as f64;
            *value = NORTHING_PER_DEGREE * lat;
        }
        northing
    };
}

/// One of the four UPS grid zones around the poles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PolarZone {
    /// South pole, western hemisphere
    A,
    /// South pole, eastern hemisphere
    B,
    /// North pole, western hemisphere
    Y,
    /// North pole, eastern hemisphere
    Z,
}

impl PolarZone {
    pub const ALL: [PolarZone; 4] = [PolarZone::A, PolarZone::B, PolarZone::Y, PolarZone::Z];

    pub fn from_letter(letter: char) -> Option<PolarZone> {
        match letter {
            'A' => Some(PolarZone::A),
            'B' => Some(PolarZone::B),
            'Y' => Some(PolarZone::Y),
            'Z' => Some(PolarZone::Z),
            _ => None,
        }
    }

    pub fn letter(self) -> char {
        match self {
            PolarZone::A => 'A',
            PolarZone::B => 'B',
            PolarZone::Y => 'Y',
            PolarZone::Z => 'Z',
        }
    }

    pub fn pole(self) -> Pole {
        match self {
            PolarZone::A | PolarZone::B => Pole::South,
            PolarZone::Y | PolarZone::Z => Pole::North,
        }
    }

    /// Whether the zone covers the western (negative longitude) half.
    pub fn is_west(self) -> bool {
        matches!(self, PolarZone::A | PolarZone::Y)
    }

    /// Polar zone containing the point, by hemisphere and sign of longitude.
    pub fn for_point(lon: f64, lat: f64) -> PolarZone {
        match (lat > 0., lon < 0.) {
            (true, true) => PolarZone::Y,
            (true, false) => PolarZone::Z,
            (false, true) => PolarZone::A,
            (false, false) => PolarZone::B,
        }
    }

    /// Both zones around a pole, west first.
    pub fn around(pole: Pole) -> [PolarZone; 2] {
        pole.is_north().ternary([PolarZone::Y, PolarZone::Z], [PolarZone::A, PolarZone::B])
    }

    fn rows(self) -> &'static [char] {
        self.pole().is_north().ternary(&UPS_YN_LETTERS[..], &UPS_YS_LETTERS[..])
    }

    // Valid signed column offsets from the pole, in 100km
    fn column_range(self) -> std::ops::RangeInclusive<i32> {
        match self {
            PolarZone::A => -12..=-1,
            PolarZone::B => 0..=11,
            PolarZone::Y => -7..=-1,
            PolarZone::Z => 0..=6,
        }
    }

    // Valid signed row offsets from the pole, in 100km
    fn row_range(self) -> std::ops::RangeInclusive<i32> {
        self.pole().is_north().ternary(-7..=6, -12..=11)
    }
}

impl Display for PolarZone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Two-letter 100km grid square designator: column (easting) letter then
/// row (northing) letter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridSquare {
    column: char,
    row: char,
}

impl GridSquare {
    pub fn new(column: char, row: char) -> GridSquare {
        Self {
            column: column.to_ascii_uppercase(),
            row: row.to_ascii_uppercase(),
        }
    }

    pub fn column(&self) -> char {
        self.column
    }

    pub fn row(&self) -> char {
        self.row
    }
}

impl Display for GridSquare {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.column, self.row)
    }
}

/// Index of the latitude band containing `lat`, counting the 12° X band as
/// two entries (19 and 20). `None` outside `[-80, 88)`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn band_index(lat: f64) -> Option<usize> {
    let idx = ((lat - UTM_MIN_LAT) / BAND_HEIGHT).floor();
    (0. ..=20.).contains(&idx).then_some(idx as usize)
}

/// Band letter for a latitude without range checks beyond the table; used
/// to re-derive the band of a computed point.
pub(crate) fn band_letter_for(lat: f64) -> Option<char> {
    band_index(lat).map(|idx| GRID_ZONES[idx])
}

/// Position of a band letter in `C..X`.
pub(crate) fn band_position(letter: char) -> Option<usize> {
    GRID_ZONES[..BAND_COUNT].iter().position(|&c| c == letter)
}

pub(crate) fn band_letter(position: usize) -> Option<char> {
    (position < BAND_COUNT).then(|| GRID_ZONES[position])
}

pub(crate) fn is_band_letter(letter: char) -> bool {
    band_position(letter).is_some()
}

/// Approximate minimum northing of a band, used to unwrap the 2,000,000m
/// northing cycle.
pub(crate) fn band_min_northing(letter: char) -> Option<f64> {
    band_position(letter).map(|idx| GRID_ZONES_NORTHING[idx])
}

/// Grid zone (latitude band) letter for a latitude.
///
/// # Errors
///
/// Returns [`Error::OutOfRange`] outside `[-80, 84]`; those latitudes belong
/// to the polar zones.
///
/// ```
/// use usng::grid::grid_zone_letter;
///
/// assert_eq!(grid_zone_letter(-80.0).unwrap(), 'C');
/// assert_eq!(grid_zone_letter(44.55).unwrap(), 'T');
/// assert_eq!(grid_zone_letter(0.0).unwrap(), 'N');
/// assert_eq!(grid_zone_letter(-0.1).unwrap(), 'M');
/// assert_eq!(grid_zone_letter(83.9).unwrap(), 'X');
/// assert_eq!(grid_zone_letter(84.0).unwrap(), 'X');
/// assert!(grid_zone_letter(84.1).is_err());
/// assert!(grid_zone_letter(-80.1).is_err());
/// ```
pub fn grid_zone_letter(lat: f64) -> Result<char, Error> {
    if !(UTM_MIN_LAT..=UTM_MAX_LAT).contains(&lat) {
        return Err(Error::OutOfRange(format!(
            "Latitude {lat} outside of UTM range [{UTM_MIN_LAT}, {UTM_MAX_LAT}]"
        )));
    }

    band_letter_for(lat)
        .ok_or_else(|| Error::OutOfRange(format!("Latitude {lat} has no grid zone")))
}

// Easting and northing alphabets for a zone. The pattern repeats every 6
// zones: set 0 behaves as set 6.
fn square_alphabets(zone: u8) -> (&'static [char; 8], &'static [char; 20]) {
    match zone % 6 {
        1 => (&EW_LETTERS_14, &NS_LETTERS_135),
        2 => (&EW_LETTERS_25, &NS_LETTERS_246),
        3 => (&EW_LETTERS_36, &NS_LETTERS_135),
        4 => (&EW_LETTERS_14, &NS_LETTERS_246),
        5 => (&EW_LETTERS_25, &NS_LETTERS_135),
        _ => (&EW_LETTERS_36, &NS_LETTERS_246),
    }
}

/// Letters of the 100km square at `easting_index` (1..=8, hundreds of km of
/// easting) and `northing_index` (0..=19, hundreds of km of northing modulo
/// 2,000,000m) in `zone`.
///
/// # Errors
///
/// Returns [`Error::OutOfRange`] if either index is outside its range.
///
/// ```
/// use usng::grid::grid_square_letters;
///
/// assert_eq!(grid_square_letters(15, 4, 9).unwrap().to_string(), "VK");
/// assert_eq!(grid_square_letters(18, 3, 3).unwrap().to_string(), "UJ");
/// // Same letters six zones later
/// assert_eq!(grid_square_letters(21, 4, 9).unwrap().to_string(), "VK");
/// assert!(grid_square_letters(15, 9, 0).is_err());
/// ```
pub fn grid_square_letters(zone: u8, easting_index: u8, northing_index: u8) -> Result<GridSquare, Error> {
    let (ew, ns) = square_alphabets(zone);

    if !(1..=8).contains(&easting_index) || usize::from(northing_index) >= ns.len() {
        return Err(Error::OutOfRange(format!(
            "Grid square index ({easting_index}, {northing_index}) outside of [1, 8] x [0, 19]"
        )));
    }

    Ok(GridSquare::new(
        ew[usize::from(easting_index - 1)],
        ns[usize::from(northing_index)],
    ))
}

/// Inverse of [`grid_square_letters`]: `(easting_index, northing_index)`.
///
/// # Errors
///
/// Returns [`Error::InvalidGridSquare`] if the letters are not used in
/// `zone`.
///
/// ```
/// use usng::grid::{parse_grid_square, GridSquare};
///
/// assert_eq!(parse_grid_square(15, &GridSquare::new('V', 'K')).unwrap(), (4, 9));
/// // Column letter V belongs to zones 3 and 6 of the pattern only
/// assert!(parse_grid_square(14, &GridSquare::new('V', 'K')).is_err());
/// ```
#[allow(clippy::cast_possible_truncation)]
pub fn parse_grid_square(zone: u8, square: &GridSquare) -> Result<(u8, u8), Error> {
    let (ew, ns) = square_alphabets(zone);

    let ew_idx = ew.iter().position(|&c| c == square.column);
    let ns_idx = ns.iter().position(|&c| c == square.row);

    match (ew_idx, ns_idx) {
        (Some(e), Some(n)) => Ok((e as u8 + 1, n as u8)),
        _ => Err(Error::InvalidGridSquare(format!(
            "{square} is not a 100km grid square of UTM zone {zone}"
        ))),
    }
}

/// Every grid square of a UTM zone, easting letter first, in alphabet order.
pub(crate) fn utm_squares(zone: u8) -> impl Iterator<Item = GridSquare> {
    let (ew, ns) = square_alphabets(zone);
    ew.iter()
        .flat_map(move |&column| ns.iter().map(move |&row| GridSquare::new(column, row)))
}

/// Letters of the UPS square whose south-west corner is `x_index`, `y_index`
/// hundreds of km from the pole (negative to the west/south).
///
/// # Errors
///
/// Returns [`Error::OutOfRange`] if the offsets fall outside `zone`.
///
/// ```
/// use usng::grid::{polar_grid_square, PolarZone};
///
/// // The squares touching the north pole
/// assert_eq!(polar_grid_square(PolarZone::Z, 0, 0).unwrap().to_string(), "AH");
/// assert_eq!(polar_grid_square(PolarZone::Y, -1, -1).unwrap().to_string(), "ZG");
/// assert_eq!(polar_grid_square(PolarZone::B, 0, 0).unwrap().to_string(), "AN");
/// assert!(polar_grid_square(PolarZone::Z, -1, 0).is_err());
/// ```
#[allow(clippy::cast_sign_loss)]
pub fn polar_grid_square(zone: PolarZone, x_index: i32, y_index: i32) -> Result<GridSquare, Error> {
    if !zone.column_range().contains(&x_index) || !zone.row_range().contains(&y_index) {
        return Err(Error::OutOfRange(format!(
            "Offset ({x_index}, {y_index}) is outside UPS grid zone {zone}"
        )));
    }

    let rows = zone.rows();
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    let row_count = rows.len() as i32;
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    let column_count = UPS_X_LETTERS.len() as i32;

    let column = UPS_X_LETTERS[x_index.mod_floor(&column_count) as usize];
    let row = rows[y_index.mod_floor(&row_count) as usize];

    Ok(GridSquare::new(column, row))
}

/// Inverse of [`polar_grid_square`]: signed `(x_index, y_index)` offsets of
/// the square from the pole.
///
/// # Errors
///
/// Returns [`Error::InvalidGridSquare`] if the letters are not used in
/// `zone`.
///
/// ```
/// use usng::grid::{parse_polar_grid_square, GridSquare, PolarZone};
///
/// assert_eq!(parse_polar_grid_square(PolarZone::Y, &GridSquare::new('Z', 'G')).unwrap(), (-1, -1));
/// assert_eq!(parse_polar_grid_square(PolarZone::B, &GridSquare::new('A', 'N')).unwrap(), (0, 0));
/// // Z is a western column, so it cannot appear in the eastern zone
/// assert!(parse_polar_grid_square(PolarZone::B, &GridSquare::new('Z', 'N')).is_err());
/// ```
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub fn parse_polar_grid_square(zone: PolarZone, square: &GridSquare) -> Result<(i32, i32), Error> {
    let invalid = || Error::InvalidGridSquare(format!("{square} is not a grid square of UPS zone {zone}"));

    let rows = zone.rows();
    let row_count = rows.len() as i32;

    let mut x_idx = UPS_X_LETTERS
        .iter()
        .position(|&c| c == square.column)
        .ok_or_else(invalid)? as i32;
    let mut y_idx = rows
        .iter()
        .position(|&c| c == square.row)
        .ok_or_else(invalid)? as i32;

    if zone.is_west() {
        x_idx -= UPS_X_LETTERS.len() as i32;
    }
    // Upper half of the row alphabet lies south of the pole
    if y_idx > row_count / 2 - 1 {
        y_idx -= row_count;
    }

    if !zone.column_range().contains(&x_idx) {
        return Err(invalid());
    }

    Ok((x_idx, y_idx))
}

/// Every letter pair of the UPS alphabets for a zone's pole, column letter
/// first. Pairs that are not valid in the zone are left for the caller to
/// reject.
pub(crate) fn polar_squares(zone: PolarZone) -> impl Iterator<Item = GridSquare> {
    let rows = zone.rows();
    UPS_X_LETTERS
        .iter()
        .flat_map(move |&column| rows.iter().map(move |&row| GridSquare::new(column, row)))
}
