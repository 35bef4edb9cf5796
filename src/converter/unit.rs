use super::{Codec, FieldId, LinkedFields, Outcome, Persist};
use crate::{
    config::PageConfig,
    error::{ConvertError, Result},
    numeric::{Integer, Scale, format_units, parse_units, trim_fraction_zeros},
    store::{StateStore, keys},
};
use log::{debug, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnitField {
    BaseUnits,
    TokenUnits,
}

impl FieldId for UnitField {
    fn id(self) -> &'static str {
        match self {
            Self::BaseUnits => "base-units",
            Self::TokenUnits => "unit-custom",
        }
    }
}

// the scale input is owned by `UnitConverter`, not the codec
pub const SCALE_FIELD_ID: &str = "unit-decimals";

///
/// UnitCodec
/// smallest units <-> token units at the current scale
///

#[derive(Debug)]
pub struct UnitCodec {
    scale: Scale,
}

impl UnitCodec {
    #[must_use]
    pub const fn new(scale: Scale) -> Self {
        Self { scale }
    }

    #[must_use]
    pub const fn scale(&self) -> Scale {
        self.scale
    }
}

impl Codec for UnitCodec {
    type Value = Integer;
    type Field = UnitField;

    fn fields(&self) -> &'static [UnitField] {
        &[UnitField::BaseUnits, UnitField::TokenUnits]
    }

    fn parse(&self, field: UnitField, text: &str) -> Result<Integer> {
        match field {
            // a cleared base field means zero
            UnitField::BaseUnits if text.trim().is_empty() => Ok(Integer::zero()),
            UnitField::BaseUnits => parse_units(text, Scale::ZERO),
            UnitField::TokenUnits => parse_units(text, self.scale),
        }
    }

    fn check(&self, value: &Integer) -> Result<()> {
        if value.is_negative() {
            return Err(ConvertError::NegativeValue(value.to_decimal_string()));
        }

        Ok(())
    }

    fn render(&self, value: &Integer, field: UnitField) -> String {
        let scale = match field {
            UnitField::BaseUnits => Scale::ZERO,
            UnitField::TokenUnits => self.scale,
        };

        trim_fraction_zeros(&format_units(value, scale)).to_string()
    }

    fn entries(&self, value: &Integer) -> Vec<(&'static str, String)> {
        vec![
            (keys::UNIT, value.to_decimal_string()),
            (keys::UNIT_DECIMALS, self.scale.to_string()),
        ]
    }

    fn reset_text(&self, _field: UnitField) -> Option<String> {
        Some("0".to_string())
    }
}

///
/// UnitConverter
///
/// Base-unit and token-unit fields over one smallest-unit amount, plus the
/// scale field. Token text the user typed is remembered so that changing
/// the scale re-reads that text at the new scale; token text that was only
/// rendered is re-rendered from the canonical amount instead.
///

#[derive(Debug)]
pub struct UnitConverter {
    fields: LinkedFields<UnitCodec>,
    scale_text: String,
    typed_token: Option<String>,
    default_scale: Scale,
}

impl UnitConverter {
    /// Restores `unit`/`unitDecimals` from `store` and renders silently.
    pub fn restore(config: &PageConfig, store: &mut dyn StateStore) -> Self {
        let value = store
            .restore(keys::UNIT)
            .and_then(|text| match Integer::parse_any(&text) {
                Ok(value) => Some(value),
                Err(err) => {
                    warn!("query {}={text:?} ignored: {err}", keys::UNIT);
                    None
                }
            })
            .unwrap_or_else(|| config.default_unit_value());

        let scale = store
            .restore(keys::UNIT_DECIMALS)
            .and_then(|text| Scale::sanitize(&text))
            .unwrap_or(config.default_scale);

        let mut converter = Self {
            fields: LinkedFields::new(UnitCodec::new(scale), Integer::zero()),
            scale_text: scale.to_string(),
            typed_token: None,
            default_scale: config.default_scale,
        };
        converter.fields.commit(value, Persist::Silent, store);

        converter
    }

    #[must_use]
    pub const fn value(&self) -> &Integer {
        self.fields.value()
    }

    #[must_use]
    pub const fn scale(&self) -> Scale {
        self.fields.codec().scale()
    }

    #[must_use]
    pub fn text(&self, field: UnitField) -> &str {
        self.fields.text(field)
    }

    #[must_use]
    pub fn scale_text(&self) -> &str {
        &self.scale_text
    }

    /// Every field including the scale, in page order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<(&'static str, String)> {
        let mut snapshot = self.fields.snapshot();
        snapshot.push((SCALE_FIELD_ID, self.scale_text.clone()));
        snapshot
    }

    pub fn edit_base(&mut self, text: &str, store: &mut dyn StateStore) -> Outcome {
        let outcome = self.fields.edit(UnitField::BaseUnits, text, store);
        if outcome.is_applied() {
            self.typed_token = None;
        }

        outcome
    }

    pub fn edit_token(&mut self, text: &str, store: &mut dyn StateStore) -> Outcome {
        if text.trim().is_empty() {
            self.fields.set_text(UnitField::TokenUnits, text);
            self.typed_token = None;
            return Outcome::Ignored(ConvertError::invalid(text, "empty"));
        }

        let outcome = self.fields.edit(UnitField::TokenUnits, text, store);
        self.typed_token = match outcome {
            Outcome::Rejected(_) => None,
            Outcome::Applied | Outcome::Ignored(_) => Some(text.to_string()),
        };

        outcome
    }

    /// Input on the scale field. Text without a leading integer is held
    /// until blur; anything else is clamped into range, written back if it
    /// changed, and applied.
    pub fn edit_scale(&mut self, text: &str, store: &mut dyn StateStore) -> Outcome {
        text.clone_into(&mut self.scale_text);

        let Some(scale) = Scale::sanitize(text) else {
            debug!("scale edit {text:?} held until blur");
            return Outcome::Ignored(ConvertError::invalid(text, "no scale digits"));
        };

        let canonical = scale.to_string();
        if self.scale_text != canonical {
            self.scale_text = canonical;
        }

        self.rescale(scale, store)
    }

    /// Focus left the scale field; an empty field snaps back to the
    /// default scale.
    pub fn blur_scale(&mut self, store: &mut dyn StateStore) -> Option<Outcome> {
        if !self.scale_text.is_empty() {
            return None;
        }

        self.scale_text = self.default_scale.to_string();
        Some(self.rescale(self.default_scale, store))
    }

    /// One-shot hand-off from outside (a selection in decoded output).
    pub fn seed(&mut self, value: Integer, store: &mut dyn StateStore) -> Outcome {
        let outcome = self.fields.commit(value, Persist::Write, store);
        if outcome.is_applied() {
            self.typed_token = None;
        }

        outcome
    }

    fn rescale(&mut self, scale: Scale, store: &mut dyn StateStore) -> Outcome {
        self.fields.codec_mut().scale = scale;

        let derived = self
            .typed_token
            .as_deref()
            .and_then(|text| parse_units(text, scale).ok())
            .unwrap_or_else(|| self.fields.value().clone());

        self.fields.commit(derived, Persist::Write, store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn converter(store: &mut MemoryStore) -> UnitConverter {
        UnitConverter::restore(&PageConfig::default(), store)
    }

    #[test]
    fn default_is_one_ether_without_touching_url() {
        let mut store = MemoryStore::new();
        let unit = converter(&mut store);

        assert_eq!(unit.value(), &Integer::pow10(18));
        assert_eq!(unit.text(UnitField::BaseUnits), "1000000000000000000");
        assert_eq!(unit.text(UnitField::TokenUnits), "1");
        assert_eq!(unit.scale_text(), "18");
        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn restores_from_query() {
        let mut store =
            MemoryStore::with_entries([("unit", "1500000"), ("unitDecimals", "6")]);
        let unit = converter(&mut store);

        assert_eq!(unit.scale(), Scale::new(6).unwrap());
        assert_eq!(unit.text(UnitField::TokenUnits), "1.5");
        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn unparsable_query_falls_back() {
        let mut store = MemoryStore::with_entries([("unit", "lots"), ("unitDecimals", "x")]);
        let unit = converter(&mut store);

        assert_eq!(unit.value(), &Integer::pow10(18));
        assert_eq!(unit.scale(), Scale::ETHER);
    }

    #[test]
    fn base_edit_renders_token_and_persists() {
        let mut store = MemoryStore::new();
        let mut unit = converter(&mut store);

        assert!(unit.edit_base("2500000000000000000", &mut store).is_applied());
        assert_eq!(unit.text(UnitField::TokenUnits), "2.5");
        assert_eq!(store.get("unit"), Some("2500000000000000000"));
        assert_eq!(store.get("unitDecimals"), Some("18"));
    }

    #[test]
    fn token_edit_accepts_scientific_notation() {
        let mut store = MemoryStore::new();
        let mut unit = converter(&mut store);

        assert!(unit.edit_token("1.5e-3", &mut store).is_applied());
        assert_eq!(unit.text(UnitField::BaseUnits), "1500000000000000");
        assert_eq!(unit.text(UnitField::TokenUnits), "0.0015");
    }

    #[test]
    fn scale_change_rerenders_canonical_value() {
        let mut store = MemoryStore::new();
        let mut unit = converter(&mut store);
        assert_eq!(unit.text(UnitField::TokenUnits), "1");

        assert!(unit.edit_scale("6", &mut store).is_applied());
        assert_eq!(unit.text(UnitField::TokenUnits), "1000000000000");
        assert_eq!(unit.value(), &Integer::pow10(18));
        assert_eq!(store.get("unitDecimals"), Some("6"));
    }

    #[test]
    fn scale_change_rereads_typed_token_text() {
        let mut store = MemoryStore::new();
        let mut unit = converter(&mut store);

        unit.edit_token("2.5", &mut store);
        assert!(unit.edit_scale("6", &mut store).is_applied());
        assert_eq!(unit.value(), &Integer::from(2_500_000i64));
        assert_eq!(unit.text(UnitField::TokenUnits), "2.5");
        assert_eq!(unit.text(UnitField::BaseUnits), "2500000");
    }

    #[test]
    fn scale_is_clamped_and_written_back() {
        let mut store = MemoryStore::new();
        let mut unit = converter(&mut store);

        unit.edit_scale("45", &mut store);
        assert_eq!(unit.scale(), Scale::new(30).unwrap());
        assert_eq!(unit.scale_text(), "30");
    }

    #[test]
    fn empty_scale_waits_for_blur() {
        let mut store = MemoryStore::new();
        let mut unit = converter(&mut store);
        unit.edit_scale("6", &mut store);

        let outcome = unit.edit_scale("", &mut store);
        assert!(matches!(outcome, Outcome::Ignored(_)));
        assert_eq!(unit.scale(), Scale::new(6).unwrap());
        assert_eq!(unit.scale_text(), "");

        assert!(unit.blur_scale(&mut store).unwrap().is_applied());
        assert_eq!(unit.scale(), Scale::ETHER);
        assert_eq!(unit.scale_text(), "18");
        assert_eq!(unit.text(UnitField::TokenUnits), "1");
    }

    #[test]
    fn blur_with_text_is_noop() {
        let mut store = MemoryStore::new();
        let mut unit = converter(&mut store);
        assert!(unit.blur_scale(&mut store).is_none());
    }

    #[test]
    fn negative_amount_resets_fields_to_zero() {
        let mut store = MemoryStore::new();
        let mut unit = converter(&mut store);

        let outcome = unit.edit_base("-5", &mut store);
        assert!(matches!(outcome, Outcome::Rejected(ConvertError::NegativeValue(_))));
        assert_eq!(unit.text(UnitField::BaseUnits), "0");
        assert_eq!(unit.text(UnitField::TokenUnits), "0");
        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn garbage_token_text_is_ignored() {
        let mut store = MemoryStore::new();
        let mut unit = converter(&mut store);

        let outcome = unit.edit_token("1.2.3", &mut store);
        assert!(matches!(outcome, Outcome::Ignored(_)));
        assert_eq!(unit.text(UnitField::BaseUnits), "1000000000000000000");
        assert_eq!(unit.value(), &Integer::pow10(18));
    }

    #[test]
    fn cleared_base_field_reads_as_zero() {
        let mut store = MemoryStore::new();
        let mut unit = converter(&mut store);

        assert!(unit.edit_base("", &mut store).is_applied());
        assert!(unit.value().is_zero());
        assert_eq!(unit.text(UnitField::BaseUnits), "0");
        assert_eq!(unit.text(UnitField::TokenUnits), "0");
    }

    #[test]
    fn seed_replaces_value_and_persists() {
        let mut store = MemoryStore::new();
        let mut unit = converter(&mut store);

        assert!(unit.seed(Integer::from(42i64), &mut store).is_applied());
        assert_eq!(unit.text(UnitField::BaseUnits), "42");
        assert_eq!(store.get("unit"), Some("42"));
    }

    #[test]
    fn snapshot_lists_scale_last() {
        let mut store = MemoryStore::new();
        let unit = converter(&mut store);

        let ids: Vec<_> = unit.snapshot().into_iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["base-units", "unit-custom", "unit-decimals"]);
    }
}
