use usng::{Error, GeoPoint, LooseTolerance, UsngConverter};

fn point(lon: f64, lat: f64) -> GeoPoint {
    GeoPoint::create(lon, lat).unwrap()
}

// Full references spread over the bands, with the points they encode
const REFERENCES: [(&str, f64, f64); 8] = [
    ("1C ER 45902 64153", -175.3, -76.0),
    ("14G QS 00437 25088", -96.5, -44.0),
    ("28L BM 05980 72005", -17.7, -12.0),
    ("34N EK 77705 42160", 21.7, 4.0),
    ("51T TJ 75509 75684", 120.2, 44.0),
    ("60W WA 96132 44653", 179.3, 68.0),
    ("4X DM 53588 59161", -161.0, 78.0),
    ("15T VK 87291 32975", -93.16, 44.55),
];

fn split(usng: &str) -> (&str, &str) {
    let (zone, rest) = usng.split_once(' ').unwrap();
    (zone, rest)
}

#[test]
fn square_and_digits_recover_zone_and_band() {
    let converter = UsngConverter::new();

    for (full, lon, lat) in REFERENCES {
        let p = point(lon, lat);
        let (_, truncated) = split(full);

        let location = converter.to_lonlat(truncated, Some(&p), true).unwrap();
        assert_eq!(location.usng_string(), full);
        assert!(location.point().haversine(&p) < 1.0);
    }
}

#[test]
fn digits_alone_recover_the_whole_reference() {
    let converter = UsngConverter::new();

    for (full, lon, lat) in REFERENCES {
        let p = point(lon, lat);
        let digits = full.split(' ').skip(2).collect::<String>();

        let location = converter.to_lonlat(&digits, Some(&p), true).unwrap();
        assert_eq!(location.usng_string(), full);
        assert!(location.point().haversine(&p) < 1.0);
    }
}

#[test]
fn band_letter_without_zone_number() {
    let p = point(-93.16, 44.55);
    let location = usng::to_lonlat("TVK8729132975", Some(&p), true).unwrap();

    assert_eq!(location.usng_string(), "15T VK 87291 32975");
}

#[test]
fn grid_zone_without_square() {
    let p = point(-93.16, 44.55);
    let location = usng::to_lonlat("15T 87 32", Some(&p), true).unwrap();

    assert_eq!(location.usng_string(), "15T VK 87 32");
    assert!(location.point().haversine(&p) < 1000.0);
}

#[test]
fn reference_far_from_zone_center() {
    // Reference in the neighbouring zone still finds the square
    let reference = point(-89.5, 44.0);
    let location = usng::to_lonlat("VK 87291 32975", Some(&reference), true).unwrap();

    assert_eq!(location.usng_string(), "15T VK 87291 32975");
}

#[test]
fn polar_truncations() {
    let converter = UsngConverter::new();

    for (lon, lat) in [(10.0, 89.0), (-45.0, 86.0), (135.0, -85.0), (-100.0, -82.5)] {
        let p = point(lon, lat);
        let full = converter.from_lonlat(&p, 5).unwrap().usng_string();
        let (_, truncated) = split(&full);

        let location = converter.to_lonlat(truncated, Some(&p), true).unwrap();
        assert_eq!(location.usng_string(), full);

        let digits = full.split(' ').skip(2).collect::<String>();
        let location = converter.to_lonlat(&digits, Some(&p), true).unwrap();
        assert_eq!(location.usng_string(), full);
    }
}

#[test]
fn polar_letter_without_square() {
    let p = point(10.0, 89.0);
    let location = usng::to_lonlat("Z 19279 90660", Some(&p), true).unwrap();

    assert_eq!(location.usng_string(), "Z AF 19279 90660");
}

#[test]
fn loose_mode_prefers_the_closest_band() {
    let p = point(-93.16, 44.55);
    let location = usng::to_lonlat("VK 87291 32975", Some(&p), false).unwrap();

    assert_eq!(location.usng_string(), "15T VK 87291 32975");
    assert!(location.point().haversine(&p) < 1.0);
}

#[test]
fn resolution_is_deterministic() {
    let converter = UsngConverter::new();
    let reference = point(-93.0, 44.0);

    let first = converter.to_lonlat("87291 32975", Some(&reference), true).unwrap();
    for _ in 0..3 {
        let again = converter.to_lonlat("87291 32975", Some(&reference), true).unwrap();
        assert_eq!(again, first);
    }
}

#[test]
fn truncated_without_reference() {
    // Nothing anchors a bare square
    assert!(matches!(
        usng::to_lonlat("ZZ99", None, true),
        Err(Error::InsufficientInput(_))
    ));
    assert!(matches!(
        usng::to_lonlat("VK 87291 32975", None, true),
        Err(Error::InsufficientInput(_))
    ));
    assert!(matches!(
        usng::to_lonlat("T VK 87291 32975", None, true),
        Err(Error::ReferencePointRequired(_))
    ));
    assert!(matches!(
        usng::to_lonlat("15T", None, true),
        Err(Error::ReferencePointRequired(_))
    ));
}

#[test]
fn no_valid_candidate() {
    // I and O are never square letters
    let reference = point(0.0, 0.0);
    assert!(matches!(
        usng::to_lonlat("IO 1234 5678", Some(&reference), true),
        Err(Error::AmbiguousReference(_))
    ));
}

#[test]
fn full_references_are_validated() {
    let converter = UsngConverter::new();

    // Band U does not contain this square's point
    assert!(matches!(
        converter.to_lonlat("15U VK 87291 32975", None, true),
        Err(Error::ZoneMismatch(_))
    ));
    let loose = converter.to_lonlat("15U VK 87291 32975", None, false).unwrap();
    assert!(loose.point().haversine(&point(-93.16, 44.55)) < 1.0);

    // Column A is not used in zone 15
    assert!(matches!(
        converter.to_lonlat("15T AK 12 34", None, true),
        Err(Error::InvalidGridSquare(_))
    ));
}

#[test]
fn overlap_above_84_north() {
    let converter = UsngConverter::new();
    let usng = "15X WP 00000 61585";

    assert!(matches!(converter.to_lonlat(usng, None, true), Err(Error::OutOfRange(_))));

    let location = converter.to_lonlat(usng, None, false).unwrap();
    assert!(location.lat() > 84.0 && location.lat() < 84.5);

    let tight = converter.with_tolerance(LooseTolerance {
        north_limit: 84.0,
        ..LooseTolerance::default()
    });
    assert!(matches!(tight.to_lonlat(usng, None, false), Err(Error::OutOfRange(_))));
}

#[test]
fn default_tolerance() {
    let tolerance = LooseTolerance::default();

    assert_eq!(tolerance.south_limit, -79.5);
    assert_eq!(tolerance.north_limit, 84.5);
    assert_eq!(tolerance.max_zone_drift, 2);
    assert_eq!(tolerance.max_band_drift, 1);
    assert_eq!(UsngConverter::new().tolerance(), &tolerance);
}

#[test]
fn overlap_below_79_30_south() {
    let converter = UsngConverter::new();
    let wide = converter.with_tolerance(LooseTolerance {
        south_limit: -80.5,
        ..LooseTolerance::default()
    });

    // Band C cells centered between 80°S and 79°30'S
    for (usng, lon, lat) in [
        ("21C WM 00000 29575", -57.0, -79.9),
        ("21C VM 41292 28062", -60.0, -79.9),
        ("21C WM 00000 63059", -57.0, -79.6),
    ] {
        let p = point(lon, lat);
        assert_eq!(converter.from_lonlat(&p, 5).unwrap().to_string(), usng);

        let strict = converter.to_lonlat(usng, None, true).unwrap();
        assert!(strict.point().haversine(&p) < 1.0, "{usng}");

        assert!(
            matches!(converter.to_lonlat(usng, None, false), Err(Error::OutOfRange(_))),
            "{usng}"
        );

        let loose = wide.to_lonlat(usng, None, false).unwrap();
        assert_eq!(loose.point(), strict.point());
    }
}
