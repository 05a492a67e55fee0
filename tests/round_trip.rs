use approx::assert_abs_diff_eq;
use usng::{Error, GeoPoint, UsngConverter};

// One point per latitude band, away from zone and band edges
const BAND_POINTS: [(f64, f64); 20] = [
    (-175.3, -76.0),
    (-155.6, -68.0),
    (-135.9, -60.0),
    (-116.2, -52.0),
    (-96.5, -44.0),
    (-76.8, -36.0),
    (-57.1, -28.0),
    (-37.4, -20.0),
    (-17.7, -12.0),
    (2.0, -4.0),
    (21.7, 4.0),
    (41.4, 12.0),
    (61.1, 20.0),
    (80.8, 28.0),
    (100.5, 36.0),
    (120.2, 44.0),
    (139.9, 52.0),
    (159.6, 60.0),
    (179.3, 68.0),
    (-161.0, 78.0),
];

const POLAR_POINTS: [(f64, f64); 6] = [
    (10.0, 89.0),
    (-45.0, 86.0),
    (179.9, 84.2),
    (135.0, -85.0),
    (-100.0, -82.5),
    (0.0, -89.0),
];

fn point(lon: f64, lat: f64) -> GeoPoint {
    GeoPoint::create(lon, lat).unwrap()
}

#[test]
fn every_band_round_trips_within_a_meter() {
    let converter = UsngConverter::new();
    let mut letters = Vec::new();

    for (lon, lat) in BAND_POINTS {
        let p = point(lon, lat);
        let record = converter.from_lonlat(&p, 5).unwrap();
        letters.push(record.grid_zone());

        let back = converter.to_lonlat(&record.usng_string(), Some(&p), true).unwrap();
        assert_eq!(back.record(), &record);
        assert!(back.point().haversine(&p) < 1.0, "{record} came back {}", back.point());
    }

    assert_eq!(letters.into_iter().collect::<String>(), "CDEFGHJKLMNPQRSTUVWX");
}

#[test]
fn polar_caps_round_trip_within_a_meter() {
    let converter = UsngConverter::new();

    for (lon, lat) in POLAR_POINTS {
        let p = point(lon, lat);
        let record = converter.from_lonlat(&p, 5).unwrap();
        assert_eq!(record.utm_zone(), None);
        assert!(record.polar_zone().is_some());

        let back = converter.to_lonlat(&record.usng_string(), None, true).unwrap();
        assert!(back.point().haversine(&p) < 1.0, "{record} came back {}", back.point());
    }
}

#[test]
fn polar_zone_follows_hemisphere_and_longitude() {
    let converter = UsngConverter::new();
    let zone = |lon, lat| converter.from_lonlat(&point(lon, lat), 0).unwrap().grid_zone();

    assert_eq!(zone(-45.0, 86.0), 'Y');
    assert_eq!(zone(10.0, 89.0), 'Z');
    assert_eq!(zone(-100.0, -82.5), 'A');
    assert_eq!(zone(135.0, -85.0), 'B');

    let record = converter.from_lonlat(&point(10.0, 89.0), 5).unwrap();
    assert_eq!(record.grid_square().to_string(), "AF");
    assert!(record.to_string().starts_with("Z AF "));
}

#[test]
fn precision_bounds_round_trip_error() {
    let converter = UsngConverter::new();
    let p = point(-93.16, 44.55);
    let mut last_bound = f64::INFINITY;

    for precision in 0..=5 {
        let record = converter.from_lonlat(&p, precision).unwrap();
        let back = converter.to_lonlat(&record.usng_string(), None, true).unwrap();
        assert_eq!(back.precision(), precision);

        // Half the cell diagonal, with room for grid scale and the spherical distance
        let bound = record.cell_size() * std::f64::consts::FRAC_1_SQRT_2 * 1.01 + 0.5;
        assert!(bound < last_bound);
        assert!(back.point().haversine(&p) <= bound, "precision {precision}");
        last_bound = bound;
    }
}

#[test]
fn sub_meter_precision_extends_meter_digits() {
    let converter = UsngConverter::new();
    let p = point(-93.16, 44.55);

    let meters = converter.from_lonlat(&p, 5).unwrap();
    let fine = converter.from_lonlat(&p, 7).unwrap();
    assert_eq!(meters.to_string(), "15T VK 87291 32975");
    assert_eq!(fine.to_string(), "15T VK 8729123 3297551");

    let finest = converter.from_lonlat(&p, 11).unwrap();
    let digits = finest.to_string().split(' ').skip(2).map(str::len).collect::<Vec<_>>();
    assert_eq!(digits, [11, 11]);

    let back = converter.to_lonlat(&fine.usng_string(), None, true).unwrap();
    assert!(back.point().haversine(&p) < 0.05);

    assert!(matches!(converter.from_lonlat(&p, 12), Err(Error::OutOfRange(_))));
}

#[test]
fn concrete_minnesota_point() {
    let p = point(-93.16, 44.55);
    let record = usng::from_lonlat(&p, 5).unwrap();

    assert_eq!(record.utm_zone(), Some(15));
    assert_eq!(record.grid_zone(), 'T');
    assert_eq!(record.grid_square().to_string(), "VK");
    assert_eq!((record.easting(), record.northing()), (87291, 32975));

    let back = usng::to_lonlat(record.usng_string(), None, true).unwrap();
    assert_abs_diff_eq!(back.lon(), -93.16, epsilon = 1e-5);
    assert_abs_diff_eq!(back.lat(), 44.55, epsilon = 1e-5);
    assert!(back.point().haversine(&p) < 1.0);
}

#[test]
fn known_references() {
    let converter = UsngConverter::new();
    let encode = |lon, lat| converter.from_lonlat(&point(lon, lat), 5).unwrap().to_string();

    assert_eq!(encode(-77.0353, 38.8895), "18S UJ 23478 06483");
    assert_eq!(encode(151.2093, -33.8688), "56H LH 34368 50948");
}

#[test]
fn seams_between_utm_and_ups() {
    let converter = UsngConverter::new();
    let zone = |lon, lat| converter.from_lonlat(&point(lon, lat), 3).unwrap().grid_zone();

    assert_eq!(zone(-93.0, 83.99), 'X');
    assert_eq!(zone(-93.0, 84.0), 'Y');
    assert_eq!(zone(-60.0, -79.99), 'C');
    assert_eq!(zone(-60.0, -80.0), 'A');
}

#[test]
fn without_polar_support() {
    let converter = UsngConverter::without_polar();

    // The seams keep their UTM band
    let seam = converter.from_lonlat(&point(-93.0, 84.0), 3).unwrap();
    assert_eq!(seam.grid_zone(), 'X');
    assert_eq!(seam.utm_zone(), Some(15));

    assert!(matches!(
        converter.from_lonlat(&point(10.0, 89.0), 3),
        Err(Error::OutOfRange(_))
    ));
    assert!(matches!(
        converter.to_lonlat("Z AF 19279 90660", None, true),
        Err(Error::UnsupportedProjection)
    ));

    // UTM is unaffected
    let back = converter.to_lonlat("15T VK 87291 32975", None, true).unwrap();
    assert!(back.point().haversine(&point(-93.16, 44.55)) < 1.0);
}

#[test]
fn zone_meridians_round_trip_strictly() {
    let converter = UsngConverter::new();
    let latitudes = [-76.0, -44.3, -12.7, 0.5, 18.2, 44.55, 60.1, 71.5, 83.5];

    for meridian in (-180..180).step_by(6) {
        let meridian = f64::from(meridian);
        for lat in latitudes {
            // On the meridian and a centimeter to either side of it
            for lon in [meridian, meridian - 1e-7, meridian + 1e-7] {
                if lon < -180.0 {
                    continue;
                }
                let p = point(lon, lat);
                let record = converter.from_lonlat(&p, 5).unwrap();

                let back = converter.to_lonlat(&record.usng_string(), Some(&p), true).unwrap();
                assert_eq!(back.record(), &record);
                assert!(back.point().haversine(&p) < 1.0, "{record} came back {}", back.point());
            }
        }
    }

    let edge = converter.from_lonlat(&point(-96.000_000_1, 44.55), 5).unwrap();
    assert_eq!(edge.to_string(), "14T QQ 38291 37341");
    assert!(converter.to_lonlat("14T QQ 38291 37341", None, true).is_ok());
    assert!(converter.to_lonlat("2T KQ 61708 37341", None, true).is_ok());
}

#[test]
fn zone_and_band_corners_round_trip_strictly() {
    let converter = UsngConverter::new();

    for meridian in (-180..180).step_by(6) {
        for lat in [-72.0, -8.0, 0.0, 8.0, 48.0, 72.0] {
            for (dlon, dlat) in [(0.0, 0.0), (1e-7, 0.0), (0.0, -1e-7), (1e-7, -1e-7)] {
                let p = point(f64::from(meridian) + dlon, lat + dlat);
                let record = converter.from_lonlat(&p, 5).unwrap();

                let back = converter.to_lonlat(&record.usng_string(), None, true).unwrap();
                assert!(back.point().haversine(&p) < 1.0, "{record} came back {}", back.point());
            }
        }
    }
}

#[test]
fn polar_seams_round_trip_strictly() {
    let converter = UsngConverter::new();
    let longitudes = [-180.0, -179.999_999_9, -135.0, -90.0, -45.0, -1e-7, 0.0, 45.0, 90.0, 135.0, 179.999_999_9];

    for lon in longitudes {
        for lat in [84.0, -80.0, 84.000_000_1, -80.000_000_1, 89.9999, -89.9999] {
            let p = point(lon, lat);
            let record = converter.from_lonlat(&p, 5).unwrap();
            assert!(record.polar_zone().is_some(), "{record}");

            let back = converter.to_lonlat(&record.usng_string(), None, true).unwrap();
            assert!(back.point().haversine(&p) < 1.0, "{record} came back {}", back.point());
        }
    }
}

#[test]
fn antimeridian_in_the_polar_caps() {
    let converter = UsngConverter::new();

    // 180 and -180 are the same meridian, east of the origin column
    for lon in [-180.0, 180.0] {
        let record = converter.from_lonlat(&point(lon, 85.0), 5).unwrap();
        assert_eq!(record.to_string(), "Z AN 00000 55457");
    }
    assert_eq!(converter.from_lonlat(&point(-180.0, -85.0), 0).unwrap().grid_zone(), 'B');
}
