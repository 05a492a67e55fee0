//! Completion of truncated USNG references against a reference point.
//!
//! Candidates are tried in a fixed order: UTM zone (west to east around
//! the reference), latitude band south to north, easting letter, northing
//! letter, then the polar zones alphabetically with their squares column
//! first. The closest valid candidate wins; on a tie the earlier one is
//! kept.

use log::{debug, trace};

use crate::{
    constants::{UTM_MAX_LAT, UTM_MIN_LAT},
    converter::{Placement, UsngConverter},
    geopoint::GeoPoint,
    grid::{self, PolarZone, BAND_COUNT},
    projections::polar_stereographic::{PolarProjector, Pole},
    usng::{PartialUsngRecord, UsngRecord},
    utility::GeoMath,
    utm::{utm_zone_for, wrap_zone},
    Error, ThisOrThat,
};

/// Resolves `partial` to a full record and its placement. Complete records
/// are converted directly and need no reference.
pub(crate) fn resolve<P: PolarProjector>(
    converter: &UsngConverter<P>,
    partial: &PartialUsngRecord,
    reference: Option<&GeoPoint>,
    strict: bool,
) -> Result<(UsngRecord, Placement), Error> {
    if let Some(record) = full_record(partial) {
        let placement = converter.place(&record, strict)?;
        return Ok((record, placement));
    }

    let Some(reference) = reference else {
        return Err(match partial.grid_zone {
            None => Error::InsufficientInput(format!(
                "Truncated reference {partial} without a grid zone letter needs a reference point"
            )),
            Some(_) => Error::ReferencePointRequired(format!(
                "Truncated reference {partial} needs a reference point"
            )),
        });
    };

    let candidates = candidates(partial, reference);
    debug!(
        "Completing {partial} around {reference} ({} candidates, strict: {strict})",
        candidates.len()
    );

    let mut best: Option<(f64, UsngRecord, Placement)> = None;
    let mut rejected = 0_usize;

    for record in candidates {
        let placement = match converter.place(&record, strict) {
            Ok(placement) => placement,
            Err(e) => {
                trace!("Rejected {record}: {e}");
                rejected += 1;
                continue;
            }
        };

        let distance = reference.angular_distance(&placement.center);
        if best.as_ref().map_or(true, |(d, ..)| distance < *d) {
            best = Some((distance, record, placement));
        }
        if distance.is_zero() {
            break;
        }
    }

    match best {
        Some((distance, record, placement)) => {
            debug!("Resolved to {record} at {distance:e} rad from the reference ({rejected} rejected)");
            Ok((record, placement))
        }
        None => Err(Error::AmbiguousReference(format!(
            "No grid zone near {reference} gives a valid point for {partial}"
        ))),
    }
}

fn full_record(partial: &PartialUsngRecord) -> Option<UsngRecord> {
    let square = partial.grid_square?;
    match (partial.polar_zone(), partial.utm_zone, partial.grid_zone) {
        (Some(zone), _, _) => Some(partial.complete(None, zone.letter(), square)),
        (None, Some(zone), Some(letter)) => Some(partial.complete(Some(zone), letter, square)),
        _ => None,
    }
}

/// Every completion of `partial` worth trying around `reference`, in
/// search order.
fn candidates(partial: &PartialUsngRecord, reference: &GeoPoint) -> Vec<UsngRecord> {
    let mut out = Vec::new();

    if let Some(zone) = partial.polar_zone() {
        push_polar(&mut out, partial, zone);
        return out;
    }

    for zone in utm_zones(partial, reference) {
        for letter in bands(partial, reference) {
            match partial.grid_square {
                Some(square) => out.push(partial.complete(Some(zone), letter, square)),
                None => out.extend(
                    grid::utm_squares(zone).map(|square| partial.complete(Some(zone), letter, square)),
                ),
            }
        }
    }

    // A UTM prefix rules out the polar zones
    if partial.utm_zone.is_none() && partial.grid_zone.is_none() {
        let pole = reference.is_north().ternary(Pole::North, Pole::South);
        for zone in PolarZone::around(pole) {
            push_polar(&mut out, partial, zone);
        }
    }

    out
}

fn push_polar(out: &mut Vec<UsngRecord>, partial: &PartialUsngRecord, zone: PolarZone) {
    match partial.grid_square {
        Some(square) => out.push(partial.complete(None, zone.letter(), square)),
        None => out.extend(
            grid::polar_squares(zone).map(|square| partial.complete(None, zone.letter(), square)),
        ),
    }
}

fn utm_zones(partial: &PartialUsngRecord, reference: &GeoPoint) -> Vec<u8> {
    match partial.utm_zone {
        Some(zone) => vec![zone],
        None => {
            let z0 = i32::from(utm_zone_for(reference.lon));
            (z0 - 1..=z0 + 1).map(wrap_zone).collect()
        }
    }
}

fn bands(partial: &PartialUsngRecord, reference: &GeoPoint) -> Vec<char> {
    if let Some(letter) = partial.grid_zone {
        return vec![letter];
    }

    let positions = if partial.grid_square.is_some() {
        0..=BAND_COUNT - 1
    } else {
        // The 12° X band counts once
        let b0 = grid::band_index(reference.lat.clamp(UTM_MIN_LAT, UTM_MAX_LAT))
            .map_or(0, |idx| idx.min(BAND_COUNT - 1));
        b0.saturating_sub(1)..=(b0 + 1).min(BAND_COUNT - 1)
    };

    positions.filter_map(grid::band_letter).collect()
}
