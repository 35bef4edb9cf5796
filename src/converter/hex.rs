use super::{Codec, FieldId, LinkedFields, Outcome, Persist};
use crate::{
    config::PageConfig,
    error::{ConvertError, Result},
    numeric::{Integer, Scale, format_units},
    store::{StateStore, keys},
};
use log::warn;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HexField {
    Hex,
    Decimal,
    Ether,
}

impl FieldId for HexField {
    fn id(self) -> &'static str {
        match self {
            Self::Hex => "hexadecimal",
            Self::Decimal => "decimal",
            Self::Ether => "hexadecimal-eth",
        }
    }
}

///
/// HexCodec
///

#[derive(Debug, Default)]
pub struct HexCodec;

impl Codec for HexCodec {
    type Value = Integer;
    type Field = HexField;

    fn fields(&self) -> &'static [HexField] {
        &[HexField::Hex, HexField::Decimal, HexField::Ether]
    }

    fn parse(&self, field: HexField, text: &str) -> Result<Integer> {
        match field {
            HexField::Hex => Integer::parse_hex(text),
            HexField::Decimal => Integer::parse_any(text),
            HexField::Ether => Err(ConvertError::invalid(text, "read-only field")),
        }
    }

    fn render(&self, value: &Integer, field: HexField) -> String {
        match field {
            HexField::Hex => value.to_hex_string(),
            HexField::Decimal => value.to_decimal_string(),
            HexField::Ether => format_units(value, Scale::ETHER),
        }
    }

    fn entries(&self, value: &Integer) -> Vec<(&'static str, String)> {
        vec![(keys::HEXADECIMAL, value.to_hex_string())]
    }
}

///
/// HexConverter
/// hex, decimal and a fixed 18-decimal reading of one integer
///

#[derive(Debug)]
pub struct HexConverter {
    fields: LinkedFields<HexCodec>,
}

impl HexConverter {
    pub fn restore(config: &PageConfig, store: &mut dyn StateStore) -> Self {
        let value = store
            .restore(keys::HEXADECIMAL)
            .and_then(|text| match Integer::parse_any(&text) {
                Ok(value) => Some(value),
                Err(err) => {
                    warn!("query {}={text:?} ignored: {err}", keys::HEXADECIMAL);
                    None
                }
            })
            .unwrap_or_else(|| config.default_hex_value());

        let mut fields = LinkedFields::new(HexCodec, Integer::zero());
        fields.commit(value, Persist::Silent, store);

        Self { fields }
    }

    #[must_use]
    pub const fn value(&self) -> &Integer {
        self.fields.value()
    }

    #[must_use]
    pub fn text(&self, field: HexField) -> &str {
        self.fields.text(field)
    }

    #[must_use]
    pub fn snapshot(&self) -> Vec<(&'static str, String)> {
        self.fields.snapshot()
    }

    pub fn edit(&mut self, field: HexField, text: &str, store: &mut dyn StateStore) -> Outcome {
        self.fields.edit(field, text, store)
    }
}
