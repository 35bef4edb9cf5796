//! End-to-end behaviour of the converters through the public API, with an
//! in-memory query store standing in for the URL.

use eth_devkit_wasm::{
    Integer, Scale,
    config::PageConfig,
    converter::{
        FixedClock, HexConverter, HexField, Outcome, TimestampConverter, TimestampField,
        UnitConverter, UnitField,
    },
    format_units, normalize_scientific, parse_units,
    selection::{Seed, route},
    store::MemoryStore,
    trim_fraction_zeros,
};
use proptest::prelude::*;

proptest! {
    #[test]
    fn scaled_codec_round_trips(digits in "[1-9][0-9]{0,80}", d in 0u32..=30) {
        let value = Integer::parse_decimal(&digits).unwrap();
        let scale = Scale::new(d).unwrap();

        prop_assert_eq!(parse_units(&format_units(&value, scale), scale).unwrap(), value);
    }

    #[test]
    fn trimmed_rendering_parses_back(digits in "[0-9]{1,40}", d in 0u32..=30) {
        let value = Integer::parse_decimal(&digits).unwrap();
        let scale = Scale::new(d).unwrap();
        let shown = format_units(&value, scale);

        prop_assert_eq!(parse_units(trim_fraction_zeros(&shown), scale).unwrap(), value);
    }
}

#[test]
fn scientific_notation_keeps_magnitude() {
    assert_eq!(normalize_scientific("1.23e5").unwrap(), "123000");
    assert_eq!(normalize_scientific("1.23e-5").unwrap(), "0.0000123");
}

#[test]
fn trimmer_examples() {
    assert_eq!(trim_fraction_zeros("1.200"), "1.2");
    assert_eq!(trim_fraction_zeros("1.000"), "1");
    assert_eq!(trim_fraction_zeros("5"), "5");
    assert_eq!(trim_fraction_zeros(trim_fraction_zeros("1.200")), "1.2");
}

#[test]
fn unit_scale_change_from_eighteen_to_six() {
    let mut store = MemoryStore::with_entries([("unit", "1000000000000000000")]);
    let mut unit = UnitConverter::restore(&PageConfig::default(), &mut store);
    assert_eq!(unit.text(UnitField::TokenUnits), "1");

    unit.edit_scale("6", &mut store);
    assert_eq!(unit.text(UnitField::TokenUnits), "1000000000000");
}

#[test]
fn unit_negative_base_resets_to_zero() {
    let mut store = MemoryStore::new();
    let mut unit = UnitConverter::restore(&PageConfig::default(), &mut store);

    unit.edit_base("-5", &mut store);
    assert_eq!(unit.text(UnitField::BaseUnits), "0");
    assert_eq!(unit.text(UnitField::TokenUnits), "0");
}

#[test]
fn hex_and_decimal_cross_edit() {
    let mut store = MemoryStore::new();
    let mut hex = HexConverter::restore(&PageConfig::default(), &mut store);

    hex.edit(HexField::Decimal, "255", &mut store);
    assert_eq!(hex.text(HexField::Hex), "0xff");

    hex.edit(HexField::Hex, "0xFF", &mut store);
    assert_eq!(hex.text(HexField::Decimal), "255");
}

#[test]
fn hex_garbage_keeps_decimal_and_ether() {
    let mut store = MemoryStore::new();
    let mut hex = HexConverter::restore(&PageConfig::default(), &mut store);
    hex.edit(HexField::Decimal, "4096", &mut store);

    let outcome = hex.edit(HexField::Hex, "0x10g", &mut store);
    assert!(matches!(outcome, Outcome::Ignored(_)));
    assert_eq!(hex.text(HexField::Decimal), "4096");
    assert_eq!(hex.text(HexField::Ether), "0.000000000000004096");
}

#[test]
fn timestamp_epoch_round_trip() {
    let mut store = MemoryStore::with_entries([("timestamp", "0")]);
    let mut ts = TimestampConverter::restore(Box::new(FixedClock::utc(1)), &mut store);
    assert_eq!(ts.text(TimestampField::Utc), "1970-01-01 00:00:00");

    ts.edit(TimestampField::Seconds, "5", &mut store);
    ts.edit(TimestampField::Local, "1970-01-01 00:00:00", &mut store);
    assert_eq!(ts.value(), 0);
}

#[test]
fn selection_seeds_the_right_converter() {
    let mut store = MemoryStore::new();
    let mut unit = UnitConverter::restore(&PageConfig::default(), &mut store);
    let mut ts = TimestampConverter::restore(Box::new(FixedClock::utc(0)), &mut store);

    match route("1600000000") {
        Some(Seed::Timestamp(seconds)) => assert!(ts.seed(seconds, &mut store).is_applied()),
        other => panic!("unexpected route {other:?}"),
    }
    match route("123456789012") {
        Some(Seed::Amount(value)) => assert!(unit.seed(value, &mut store).is_applied()),
        other => panic!("unexpected route {other:?}"),
    }

    assert_eq!(store.get("timestamp"), Some("1600000000"));
    assert_eq!(store.get("unit"), Some("123456789012"));
    assert_eq!(unit.text(UnitField::TokenUnits), "0.000000123456789012");
}
