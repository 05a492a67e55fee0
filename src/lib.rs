#![warn(clippy::pedantic)]
#![allow(
    clippy::must_use_candidate,
    clippy::return_self_not_must_use
)]

//! Conversion between longitude/latitude and the US National Grid.
//!
//! ```
//! use usng::GeoPoint;
//!
//! let point = GeoPoint::create(-77.0353, 38.8895).unwrap();
//! let record = usng::from_lonlat(&point, 5).unwrap();
//! assert_eq!(record.to_string(), "18S UJ 23478 06483");
//!
//! let location = usng::to_lonlat("18S UJ 23478 06483", None, true).unwrap();
//! assert!(location.point().haversine(&point) < 1.0);
//! ```

use thiserror::Error;

pub mod converter;
pub mod ellipsoid;
pub mod geopoint;
pub mod grid;
pub mod usng;
pub mod utm;
pub(crate) mod utility;

mod search;

pub use converter::{precision_for_resolution, LooseTolerance, UsngCell, UsngConverter, UsngLocation};
pub use ellipsoid::Ellipsoid;
pub use geopoint::GeoPoint;
pub use grid::{GridSquare, PolarZone};
pub use projections::polar_stereographic::{NoPolarSupport, PolarProjector, PolarStereographic, Pole};
pub use usng::{PartialUsngRecord, UsngRecord};
pub use utm::{UpsPoint, UtmPoint};

pub use constants::{MAX_PRECISION, METER_PRECISION};

pub mod projections {
    pub mod transverse_mercator;
    pub mod polar_stereographic;
}

pub(crate) mod constants;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Coordinate outside of the supported range: {0}")]
    OutOfRange(String),
    #[error("Not enough information in USNG string: {0}")]
    InsufficientInput(String),
    #[error("A reference point is required: {0}")]
    ReferencePointRequired(String),
    #[error("No valid completion near the reference point: {0}")]
    AmbiguousReference(String),
    #[error("Invalid 100km grid square: {0}")]
    InvalidGridSquare(String),
    #[error("Computed point is not in the given grid zone: {0}")]
    ZoneMismatch(String),
    #[error("Polar (UPS) projections are not supported")]
    UnsupportedProjection,
    #[error("USNG string is invalid: {0}")]
    Malformed(String),
}

/// Encodes a point with the default converter. See
/// [`UsngConverter::from_lonlat`].
///
/// # Errors
///
/// See [`UsngConverter::from_lonlat`].
pub fn from_lonlat(point: &GeoPoint, precision: u8) -> Result<UsngRecord, Error> {
    UsngConverter::new().from_lonlat(point, precision)
}

/// Resolves a USNG string with the default converter. See
/// [`UsngConverter::to_lonlat`].
///
/// # Errors
///
/// See [`UsngConverter::to_lonlat`].
pub fn to_lonlat<S: AsRef<str>>(usng: S, reference: Option<&GeoPoint>, strict: bool) -> Result<UsngLocation, Error> {
    UsngConverter::new().to_lonlat(usng.as_ref(), reference, strict)
}

trait ThisOrThat {
    fn ternary<T>(&self, r#true: T, r#false: T) -> T;
    fn ternary_lazy<F, E, T>(&self, r#true: F, r#false: E) -> T
    where
        F: Fn() -> T,
        E: Fn() -> T;
}

impl ThisOrThat for bool {
    fn ternary<T>(&self, r#true: T, r#false: T) -> T {
        if *self { r#true } else { r#false }
    }

    fn ternary_lazy<F, E, T>(&self, r#true: F, r#false: E) -> T
    where
        F: Fn() -> T,
        E: Fn() -> T,
    {
        if *self { r#true() } else { r#false() }
    }
}
