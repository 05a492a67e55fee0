use approx::assert_relative_eq;
use usng::{precision_for_resolution, Error, GridSquare, PartialUsngRecord, UsngConverter, UsngRecord};

#[test]
fn parses_every_truncation() {
    let cases = [
        ("14TPU3467", Some(14), Some('T'), Some("PU"), 2),
        ("TPU3467", None, Some('T'), Some("PU"), 2),
        ("PU3467", None, None, Some("PU"), 2),
        ("3467", None, None, None, 2),
        ("14TPU", Some(14), Some('T'), Some("PU"), 0),
        ("14T", Some(14), Some('T'), None, 0),
        ("Y", None, Some('Y'), None, 0),
        ("b an 12345678901 12345678901", None, Some('B'), Some("AN"), 11),
    ];

    for (usng, zone, letter, square, precision) in cases {
        let parsed: PartialUsngRecord = usng.parse().unwrap();
        assert_eq!(parsed.utm_zone(), zone, "{usng}");
        assert_eq!(parsed.grid_zone(), letter, "{usng}");
        assert_eq!(parsed.grid_square().map(|s| s.to_string()).as_deref(), square, "{usng}");
        assert_eq!(parsed.precision(), precision, "{usng}");
    }

    let parsed = PartialUsngRecord::parse_str("14T PU 34 67").unwrap();
    assert_eq!((parsed.easting(), parsed.northing()), (34, 67));
    assert!(parsed.is_complete());
    assert!(!PartialUsngRecord::parse_str("PU 34 67").unwrap().is_complete());
    assert!(PartialUsngRecord::parse_str("Z AH").unwrap().is_complete());
}

#[test]
fn rejects_malformed_strings() {
    for usng in ["15T VK 123", "61T VK 12 34", "0T VK 12 34", "15Z AH 12 34", "15I VK", "15TV1K", "115T VK", "15T VK 1é", "1T1VK"] {
        assert!(
            matches!(PartialUsngRecord::parse_str(usng), Err(Error::Malformed(_))),
            "{usng}"
        );
    }

    let too_long = format!("15T VK {0} {0}", "1".repeat(12));
    assert!(matches!(PartialUsngRecord::parse_str(&too_long), Err(Error::Malformed(_))));

    for usng in ["", "  ", "VK"] {
        assert!(
            matches!(PartialUsngRecord::parse_str(usng), Err(Error::InsufficientInput(_))),
            "{usng:?}"
        );
    }
}

#[test]
fn formats_records() {
    let record = UsngRecord::create(Some(14), 't', GridSquare::new('p', 'u'), 3400, 670, 4).unwrap();
    assert_eq!(record.to_string(), "14T PU 3400 0670");
    assert_eq!(record.usng_string(), "14T PU 3400 0670");
    assert_eq!(record.cell_size(), 10.0);
    assert_eq!(record.offset_meters(), (34_000.0, 6_700.0));

    let fine = UsngRecord::create(Some(14), 'T', GridSquare::new('P', 'U'), 3_400_012, 5, 7).unwrap();
    assert_eq!(fine.to_string(), "14T PU 3400012 0000005");
    assert_relative_eq!(fine.offset_meters().0, 34_000.12, max_relative = 1e-12);
    assert_relative_eq!(fine.cell_size(), 0.01, max_relative = 1e-12);

    let parsed = PartialUsngRecord::parse_str(&fine.to_string()).unwrap();
    assert_eq!((parsed.easting(), parsed.northing(), parsed.precision()), (3_400_012, 5, 7));

    assert!(UsngRecord::create(Some(14), 'Y', GridSquare::new('P', 'U'), 0, 0, 0).is_err());
    assert!(UsngRecord::create(Some(14), 'T', GridSquare::new('P', 'U'), 0, 0, 12).is_err());
}

#[test]
fn cell_bounds() {
    let converter = UsngConverter::new();
    let cell = converter.to_bounds("15T VK 8 3", None, true).unwrap();

    let ring = cell.ring();
    assert_eq!(ring.len(), 5);
    assert_eq!(ring[0], ring[4]);
    assert_eq!(cell.record().to_string(), "15T VK 8 3");

    // 10km cell; spherical distances stay within half a percent
    assert!((cell.sw().haversine(&cell.se()) - 10_000.0).abs() < 50.0);
    assert!((cell.sw().haversine(&cell.nw()) - 10_000.0).abs() < 50.0);
    assert!(cell.sw().lat() < cell.center().lat() && cell.center().lat() < cell.ne().lat());
    assert!(cell.sw().lon() < cell.center().lon() && cell.center().lon() < cell.ne().lon());

    let location = converter.to_lonlat("15T VK 8 3", None, true).unwrap();
    assert_eq!(location.point(), cell.center());

    let polar = converter.to_bounds("Z AH 0 0", None, true).unwrap();
    assert!(polar.sw().lat() > 89.0);
}

#[test]
fn resolution_to_precision() {
    assert_eq!(precision_for_resolution(0.5), 5);
    assert_eq!(precision_for_resolution(2.0), 5);
    assert_eq!(precision_for_resolution(20.0), 4);
    assert_eq!(precision_for_resolution(2_000.0), 2);
    assert_eq!(precision_for_resolution(50_000.0), 1);
    assert_eq!(precision_for_resolution(500_000.0), 0);
    assert_eq!(precision_for_resolution(0.0), 5);
}

#[test]
fn sub_meter_digits_are_truncated() {
    // Easting 452314.891m, northing 5410984.871m; rounding would give 523149 109849
    let p = usng::GeoPoint::create(2.35, 48.85).unwrap();
    let record = usng::from_lonlat(&p, 6).unwrap();
    assert_eq!(record.to_string(), "31U DQ 523148 109848");

    let cell = UsngConverter::new().to_bounds(&record.usng_string(), None, true).unwrap();
    assert!(cell.sw().lon() <= p.lon() && p.lon() <= cell.ne().lon());
    assert!(cell.sw().lat() <= p.lat() && p.lat() <= cell.ne().lat());
}

#[cfg(feature = "serde")]
#[test]
fn deserialized_records_are_validated() {
    let record = UsngRecord::create(Some(15), 'T', GridSquare::new('V', 'K'), 87291, 32975, 5).unwrap();
    let json = serde_json::to_string(&record).unwrap();
    assert_eq!(serde_json::from_str::<UsngRecord>(&json).unwrap(), record);

    let bad_zone = json.replace("\"utm_zone\":15", "\"utm_zone\":61");
    assert!(serde_json::from_str::<UsngRecord>(&bad_zone).is_err());
    let too_many_digits = json.replace("\"easting\":87291", "\"easting\":187291");
    assert!(serde_json::from_str::<UsngRecord>(&too_many_digits).is_err());
    let polar_with_zone = json.replace("\"grid_zone\":\"T\"", "\"grid_zone\":\"Z\"");
    assert!(serde_json::from_str::<UsngRecord>(&polar_with_zone).is_err());

    let partial = PartialUsngRecord::parse_str("T VK 87 32").unwrap();
    let json = serde_json::to_string(&partial).unwrap();
    assert_eq!(serde_json::from_str::<PartialUsngRecord>(&json).unwrap(), partial);

    let bad_letter = json.replace("\"grid_zone\":\"T\"", "\"grid_zone\":\"I\"");
    assert!(serde_json::from_str::<PartialUsngRecord>(&bad_letter).is_err());
    let bad_square = json.replace("\"column\":\"V\"", "\"column\":\"7\"");
    assert!(serde_json::from_str::<PartialUsngRecord>(&bad_square).is_err());
    let empty = r#"{"utm_zone":null,"grid_zone":null,"grid_square":null,"easting":0,"northing":0,"precision":0}"#;
    assert!(serde_json::from_str::<PartialUsngRecord>(empty).is_err());
}
