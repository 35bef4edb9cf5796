// This is src/lib.rs
use wasm_bindgen::prelude::*;
use serde::Serialize;

pub mod config;
pub mod converter;
pub mod debounce;
pub mod error;
pub mod js;
pub mod logging;
pub mod numeric;
pub mod panel;
pub mod selection;
pub mod store;

use config::PageConfig;
use converter::{
    BrowserClock, HexConverter, HexField, Outcome, TimestampConverter, TimestampField,
    UnitConverter,
};
use selection::Seed;
use store::{StateStore, UrlQueryStore, keys};

pub use error::ConvertError;
pub use numeric::{Integer, Scale, format_units, normalize_scientific, parse_units, trim_fraction_zeros};

#[wasm_bindgen(start)]
pub fn start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    logging::init(PageConfig::default().log_level);
}

#[derive(Serialize)]
struct FieldText {
    id: &'static str,
    text: String,
}

// [{ id, text }] in page order, ready to be written into the inputs
fn snapshot_to_js(snapshot: Vec<(&'static str, String)>) -> Result<JsValue, JsValue> {
    let fields: Vec<FieldText> = snapshot
        .into_iter()
        .map(|(id, text)| FieldText { id, text })
        .collect();

    serde_wasm_bindgen::to_value(&fields)
        .map_err(|e| JsValue::from_str(&format!("Failed to serialize fields: {}", e)))
}

/// The page's three converters and the URL query they share.
#[wasm_bindgen]
pub struct AppState {
    config: PageConfig,
    query: UrlQueryStore,
    unit: UnitConverter,
    hex: HexConverter,
    timestamp: TimestampConverter,
}

#[wasm_bindgen]
impl AppState {
    /// Restores every converter from the current URL. `config` may be
    /// `undefined` or a partial config object.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<AppState, JsValue> {
        let config: PageConfig = if config.is_undefined() || config.is_null() {
            PageConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsValue::from_str(&format!("Invalid page config: {}", e)))?
        };
        logging::init(config.log_level);

        let mut query = UrlQueryStore::new();
        let unit = UnitConverter::restore(&config, &mut query);
        let hex = HexConverter::restore(&config, &mut query);
        let timestamp = TimestampConverter::restore(Box::new(BrowserClock), &mut query);

        Ok(AppState {
            config,
            query,
            unit,
            hex,
            timestamp,
        })
    }

    #[wasm_bindgen(js_name = unitFields)]
    pub fn unit_fields(&self) -> Result<JsValue, JsValue> {
        snapshot_to_js(self.unit.snapshot())
    }

    #[wasm_bindgen(js_name = editBaseUnits)]
    pub fn edit_base_units(&mut self, text: &str) -> Result<JsValue, JsValue> {
        self.unit.edit_base(text, &mut self.query);
        self.unit_fields()
    }

    #[wasm_bindgen(js_name = editTokenUnits)]
    pub fn edit_token_units(&mut self, text: &str) -> Result<JsValue, JsValue> {
        self.unit.edit_token(text, &mut self.query);
        self.unit_fields()
    }

    #[wasm_bindgen(js_name = editUnitDecimals)]
    pub fn edit_unit_decimals(&mut self, text: &str) -> Result<JsValue, JsValue> {
        self.unit.edit_scale(text, &mut self.query);
        self.unit_fields()
    }

    #[wasm_bindgen(js_name = blurUnitDecimals)]
    pub fn blur_unit_decimals(&mut self) -> Result<JsValue, JsValue> {
        self.unit.blur_scale(&mut self.query);
        self.unit_fields()
    }

    #[wasm_bindgen(js_name = hexFields)]
    pub fn hex_fields(&self) -> Result<JsValue, JsValue> {
        snapshot_to_js(self.hex.snapshot())
    }

    #[wasm_bindgen(js_name = editHexadecimal)]
    pub fn edit_hexadecimal(&mut self, text: &str) -> Result<JsValue, JsValue> {
        self.hex.edit(HexField::Hex, text, &mut self.query);
        self.hex_fields()
    }

    #[wasm_bindgen(js_name = editDecimal)]
    pub fn edit_decimal(&mut self, text: &str) -> Result<JsValue, JsValue> {
        self.hex.edit(HexField::Decimal, text, &mut self.query);
        self.hex_fields()
    }

    #[wasm_bindgen(js_name = timestampFields)]
    pub fn timestamp_fields(&self) -> Result<JsValue, JsValue> {
        snapshot_to_js(self.timestamp.snapshot())
    }

    #[wasm_bindgen(js_name = editTimestamp)]
    pub fn edit_timestamp(&mut self, text: &str) -> Result<JsValue, JsValue> {
        self.timestamp
            .edit(TimestampField::Seconds, text, &mut self.query);
        self.timestamp_fields()
    }

    #[wasm_bindgen(js_name = editUtcDate)]
    pub fn edit_utc_date(&mut self, text: &str) -> Result<JsValue, JsValue> {
        self.timestamp.edit(TimestampField::Utc, text, &mut self.query);
        self.timestamp_fields()
    }

    #[wasm_bindgen(js_name = editLocalDate)]
    pub fn edit_local_date(&mut self, text: &str) -> Result<JsValue, JsValue> {
        self.timestamp
            .edit(TimestampField::Local, text, &mut self.query);
        self.timestamp_fields()
    }

    /// Seeds a converter from text selected in decoded output. Returns
    /// `"timestamp"` or `"unit"` for the converter that changed.
    #[wasm_bindgen(js_name = seedFromSelection)]
    pub fn seed_from_selection(&mut self, selected: &str) -> Option<String> {
        let (target, outcome) = match selection::route(selected)? {
            Seed::Timestamp(seconds) => ("timestamp", self.timestamp.seed(seconds, &mut self.query)),
            Seed::Amount(value) => ("unit", self.unit.seed(value, &mut self.query)),
        };

        matches!(outcome, Outcome::Applied).then(|| target.to_string())
    }

    #[wasm_bindgen(js_name = decoderDebounceMs)]
    pub fn decoder_debounce_ms(&self) -> u32 {
        self.config.decoder_debounce_ms
    }

    #[wasm_bindgen(js_name = jsonDebounceMs)]
    pub fn json_debounce_ms(&self) -> u32 {
        self.config.json_debounce_ms
    }

    /// Contract address carried in the URL, to be fetched on load.
    #[wasm_bindgen(js_name = restoredContract)]
    pub fn restored_contract(&self) -> Option<String> {
        self.query.restore(keys::CONTRACT)
    }

    #[wasm_bindgen(js_name = abiRequestUrl)]
    pub fn abi_request_url(&self, address: &str) -> String {
        panel::abi_request_url(&self.config.abi_endpoint, address)
    }

    /// Turns a fetched ABI response into ABI text and, on success, records
    /// the contract in the URL. Errors carry the alert text to show.
    #[wasm_bindgen(js_name = loadContractAbi)]
    pub fn load_contract_abi(&mut self, address: &str, body: &str) -> Result<String, JsValue> {
        match panel::parse_abi_response(body) {
            Ok(abi) => {
                self.query
                    .persist(&[(keys::CONTRACT, address.trim().to_string())]);
                Ok(abi)
            }
            Err(e) => {
                log::warn!("abi lookup for {} failed: {}", address, e);
                Err(JsValue::from_str(panel::ABI_FETCH_ALERT))
            }
        }
    }
}
