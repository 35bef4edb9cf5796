// One linked-field state machine shared by every converter on the page.
// A converter is a `Codec`: how each field parses into the canonical value,
// how the value renders back into each field, and what gets persisted.
mod hex;
mod timestamp;
mod unit;

pub use hex::{HexCodec, HexConverter, HexField};
pub use timestamp::{
    BrowserClock, Clock, FixedClock, TimestampCodec, TimestampConverter, TimestampField,
};
pub use unit::{UnitCodec, UnitConverter, UnitField};

use crate::{error::ConvertError, store::StateStore};
use log::debug;
use std::fmt::Debug;

///
/// Persist
/// whether a render writes through to the query state
///

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Persist {
    Write,
    // initial render from the URL must not rewrite that same URL
    Silent,
}

///
/// Outcome
///

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// New canonical value, every field re-rendered.
    Applied,

    /// Text could not be parsed; only the edited field holds the new text.
    Ignored(ConvertError),

    /// Parsed but not representable; the codec's reset text (if any) was
    /// written and the canonical value kept.
    Rejected(ConvertError),
}

impl Outcome {
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

///
/// FieldId
/// stable identifier of a visible field (the page's element id)
///

pub trait FieldId: Copy + Debug + Eq + 'static {
    fn id(self) -> &'static str;
}

///
/// Codec
///

pub trait Codec {
    type Value: Clone + Debug;
    type Field: FieldId;

    /// Every linked field, in display order.
    fn fields(&self) -> &'static [Self::Field];

    fn parse(&self, field: Self::Field, text: &str) -> Result<Self::Value, ConvertError>;

    /// Representability check run before a value is committed.
    fn check(&self, _value: &Self::Value) -> Result<(), ConvertError> {
        Ok(())
    }

    fn render(&self, value: &Self::Value, field: Self::Field) -> String;

    /// Query entries describing `value`.
    fn entries(&self, value: &Self::Value) -> Vec<(&'static str, String)>;

    /// Text written into `field` when `check` rejects a value.
    fn reset_text(&self, _field: Self::Field) -> Option<String> {
        None
    }
}

///
/// LinkedFields
///

#[derive(Debug)]
pub struct LinkedFields<C: Codec> {
    codec: C,
    value: C::Value,
    display: Vec<String>,
}

impl<C: Codec> LinkedFields<C> {
    /// Fields start empty; the owner performs the first render.
    pub fn new(codec: C, value: C::Value) -> Self {
        let display = vec![String::new(); codec.fields().len()];

        Self {
            codec,
            value,
            display,
        }
    }

    pub const fn value(&self) -> &C::Value {
        &self.value
    }

    pub const fn codec(&self) -> &C {
        &self.codec
    }

    pub const fn codec_mut(&mut self) -> &mut C {
        &mut self.codec
    }

    pub fn text(&self, field: C::Field) -> &str {
        self.index(field).map_or("", |i| self.display[i].as_str())
    }

    /// Puts text into a field without touching the canonical value, as
    /// typing into an input does.
    pub fn set_text(&mut self, field: C::Field, text: &str) {
        if let Some(i) = self.index(field) {
            text.clone_into(&mut self.display[i]);
        }
    }

    pub fn snapshot(&self) -> Vec<(&'static str, String)> {
        self.codec
            .fields()
            .iter()
            .zip(&self.display)
            .map(|(field, text)| (field.id(), text.clone()))
            .collect()
    }

    /// A user edit: the field keeps what was typed, then the text is parsed
    /// and, if it parses, committed.
    pub fn edit(&mut self, field: C::Field, text: &str, store: &mut dyn StateStore) -> Outcome {
        self.set_text(field, text);

        match self.codec.parse(field, text) {
            Ok(value) => self.commit(value, Persist::Write, store),
            Err(err) => {
                debug!("{} edit ignored: {err}", field.id());
                Outcome::Ignored(err)
            }
        }
    }

    /// Adopts `value` as canonical and rewrites every field.
    pub fn commit(
        &mut self,
        value: C::Value,
        persist: Persist,
        store: &mut dyn StateStore,
    ) -> Outcome {
        if let Err(err) = self.codec.check(&value) {
            debug!("value {value:?} rejected: {err}");
            for (i, field) in self.codec.fields().iter().enumerate() {
                if let Some(text) = self.codec.reset_text(*field) {
                    self.display[i] = text;
                }
            }

            return Outcome::Rejected(err);
        }

        self.value = value;
        self.render_all();

        if persist == Persist::Write {
            store.persist(&self.codec.entries(&self.value));
        }

        Outcome::Applied
    }

    fn render_all(&mut self) {
        for (i, field) in self.codec.fields().iter().enumerate() {
            self.display[i] = self.codec.render(&self.value, *field);
        }
    }

    fn index(&self, field: C::Field) -> Option<usize> {
        self.codec.fields().iter().position(|f| *f == field)
    }
}
