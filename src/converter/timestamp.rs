use super::{Codec, FieldId, LinkedFields, Outcome, Persist};
use crate::{
    error::{ConvertError, Result},
    numeric::{f64_to_i64, leading_integer},
    store::{StateStore, keys},
};
use log::warn;
use std::fmt::Debug;
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset, macros::format_description};

///
/// Clock
/// wall-clock reading and the viewer's UTC offset at a given instant
///

pub trait Clock: Debug {
    fn now_unix_seconds(&self) -> Result<i64>;

    fn local_offset(&self, unix_seconds: i64) -> UtcOffset;
}

///
/// FixedClock
///

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedClock {
    pub now: i64,
    pub offset: UtcOffset,
}

impl FixedClock {
    #[must_use]
    pub const fn utc(now: i64) -> Self {
        Self {
            now,
            offset: UtcOffset::UTC,
        }
    }
}

impl Clock for FixedClock {
    fn now_unix_seconds(&self) -> Result<i64> {
        Ok(self.now)
    }

    fn local_offset(&self, _unix_seconds: i64) -> UtcOffset {
        self.offset
    }
}

///
/// BrowserClock
/// `Date.now()` and `Date#getTimezoneOffset()`
///

#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserClock;

impl Clock for BrowserClock {
    fn now_unix_seconds(&self) -> Result<i64> {
        f64_to_i64((js_sys::Date::now() / 1000.0).ceil())
    }

    #[allow(clippy::cast_precision_loss)]
    fn local_offset(&self, unix_seconds: i64) -> UtcOffset {
        let date = js_sys::Date::new(&wasm_bindgen::JsValue::from_f64(unix_seconds as f64 * 1000.0));

        // minutes west of UTC
        f64_to_i64(-date.get_timezone_offset() * 60.0)
            .ok()
            .and_then(|secs| i32::try_from(secs).ok())
            .and_then(|secs| UtcOffset::from_whole_seconds(secs).ok())
            .unwrap_or(UtcOffset::UTC)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimestampField {
    Seconds,
    Utc,
    Local,
}

impl FieldId for TimestampField {
    fn id(self) -> &'static str {
        match self {
            Self::Seconds => "timestamp",
            Self::Utc => "date",
            Self::Local => "localeDate",
        }
    }
}

///
/// TimestampCodec
///
/// Seconds since the epoch <-> `YYYY-MM-DD HH:MM:SS` (UTC) and
/// `YYYY-MM-DDTHH:MM` (viewer's local time).
///

#[derive(Debug)]
pub struct TimestampCodec {
    clock: Box<dyn Clock>,
}

impl TimestampCodec {
    #[must_use]
    pub fn new(clock: Box<dyn Clock>) -> Self {
        Self { clock }
    }

    fn parse_seconds(text: &str) -> Result<i64> {
        let (negative, digits) =
            leading_integer(text).ok_or_else(|| ConvertError::non_finite(text))?;
        let magnitude: i64 = digits
            .parse()
            .map_err(|_| ConvertError::non_finite(text))?;

        Ok(if negative { -magnitude } else { magnitude })
    }

    fn parse_calendar(text: &str) -> Result<PrimitiveDateTime> {
        let text = text.trim().replacen(' ', "T", 1);

        PrimitiveDateTime::parse(
            &text,
            format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
        )
        .or_else(|_| {
            PrimitiveDateTime::parse(&text, format_description!("[year]-[month]-[day]T[hour]:[minute]"))
        })
        .map_err(|_| ConvertError::non_finite(text))
    }

    // the offset is read at a first guess of the instant, then again at the
    // instant that guess implies, so wall times just past a DST change land
    // on the offset in force at that wall time
    fn parse_local(&self, text: &str) -> Result<i64> {
        let naive = Self::parse_calendar(text)?;
        let wall = naive.assume_utc().unix_timestamp();
        let guess = wall - i64::from(self.clock.local_offset(wall).whole_seconds());
        let offset = self.clock.local_offset(guess);

        Ok(naive.assume_offset(offset).unix_timestamp())
    }

    fn shifted(&self, seconds: i64) -> Option<OffsetDateTime> {
        let offset = i64::from(self.clock.local_offset(seconds).whole_seconds());
        OffsetDateTime::from_unix_timestamp(seconds.checked_add(offset)?).ok()
    }
}

impl Codec for TimestampCodec {
    type Value = i64;
    type Field = TimestampField;

    fn fields(&self) -> &'static [TimestampField] {
        &[
            TimestampField::Seconds,
            TimestampField::Utc,
            TimestampField::Local,
        ]
    }

    fn parse(&self, field: TimestampField, text: &str) -> Result<i64> {
        match field {
            TimestampField::Seconds => Self::parse_seconds(text),
            TimestampField::Utc => Ok(Self::parse_calendar(text)?.assume_utc().unix_timestamp()),
            TimestampField::Local => self.parse_local(text),
        }
    }

    // both renderings must exist on the calendar
    fn check(&self, value: &i64) -> Result<()> {
        if OffsetDateTime::from_unix_timestamp(*value).is_err() || self.shifted(*value).is_none() {
            return Err(ConvertError::non_finite(value.to_string()));
        }

        Ok(())
    }

    fn render(&self, value: &i64, field: TimestampField) -> String {
        let text = match field {
            TimestampField::Seconds => return value.to_string(),
            TimestampField::Utc => OffsetDateTime::from_unix_timestamp(*value)
                .ok()
                .and_then(|dt| {
                    dt.format(format_description!(
                        "[year]-[month]-[day] [hour]:[minute]:[second]"
                    ))
                    .ok()
                }),
            TimestampField::Local => self.shifted(*value).and_then(|dt| {
                dt.format(format_description!("[year]-[month]-[day]T[hour]:[minute]"))
                    .ok()
            }),
        };

        text.unwrap_or_default()
    }

    fn entries(&self, value: &i64) -> Vec<(&'static str, String)> {
        vec![(keys::TIMESTAMP, value.to_string())]
    }
}

///
/// TimestampConverter
///

#[derive(Debug)]
pub struct TimestampConverter {
    fields: LinkedFields<TimestampCodec>,
}

impl TimestampConverter {
    /// Restores `timestamp` from `store`, else starts at the current second
    /// (rounded up), and renders silently.
    pub fn restore(clock: Box<dyn Clock>, store: &mut dyn StateStore) -> Self {
        let codec = TimestampCodec::new(clock);
        let restored = store.restore(keys::TIMESTAMP).and_then(|text| {
            text.trim()
                .parse::<i64>()
                .map_err(ConvertError::decode)
                .and_then(|value| codec.check(&value).map(|()| value))
                .map_err(|err| warn!("query {}={text:?} ignored: {err}", keys::TIMESTAMP))
                .ok()
        });

        let value = restored.unwrap_or_else(|| {
            codec.clock.now_unix_seconds().unwrap_or_else(|err| {
                warn!("clock unavailable: {err}");
                0
            })
        });

        let mut fields = LinkedFields::new(codec, 0);
        fields.commit(value, Persist::Silent, store);

        Self { fields }
    }

    #[must_use]
    pub const fn value(&self) -> i64 {
        *self.fields.value()
    }

    #[must_use]
    pub fn text(&self, field: TimestampField) -> &str {
        self.fields.text(field)
    }

    #[must_use]
    pub fn snapshot(&self) -> Vec<(&'static str, String)> {
        self.fields.snapshot()
    }

    pub fn edit(
        &mut self,
        field: TimestampField,
        text: &str,
        store: &mut dyn StateStore,
    ) -> Outcome {
        self.fields.edit(field, text, store)
    }

    pub fn seed(&mut self, seconds: i64, store: &mut dyn StateStore) -> Outcome {
        self.fields.commit(seconds, Persist::Write, store)
    }
}
