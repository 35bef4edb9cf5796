// JavaScript-side collaborators and page helpers exposed to the host.
use crate::{
    debounce::{BrowserTimer, Debouncer, debounce},
    error::{self, ConvertError},
    panel::{
        self, Account, AccountGenerator, DecodedCall, InputDataDecoder, Keccak256, PermissiveJson,
        StrictJson, TransactionDecoder,
    },
    store::{CollapseState, LocalStorageStore, section},
};
use js_sys::{Function, JSON, Uint8Array};
use log::warn;
use serde_json::Value;
use wasm_bindgen::prelude::*;

fn call_failed(e: JsValue) -> ConvertError {
    ConvertError::DecodeFailure(format!("{:?}", e))
}

fn to_js(value: &Value) -> error::Result<JsValue> {
    JSON::parse(&value.to_string()).map_err(call_failed)
}

fn from_js<T: serde::de::DeserializeOwned>(value: JsValue) -> error::Result<T> {
    serde_wasm_bindgen::from_value(value).map_err(ConvertError::decode)
}

/// `(abi, callData) => { method, types, inputs }`
struct JsInputDataDecoder(Function);

impl InputDataDecoder for JsInputDataDecoder {
    fn decode(&self, abi: &Value, call_data: &str) -> error::Result<DecodedCall> {
        let result = self
            .0
            .call2(&JsValue::NULL, &to_js(abi)?, &JsValue::from_str(call_data))
            .map_err(call_failed)?;

        from_js(result)
    }
}

/// `(rawTx) => object`
struct JsTransactionDecoder(Function);

impl TransactionDecoder for JsTransactionDecoder {
    fn decode(&self, raw: &str) -> error::Result<Value> {
        let result = self
            .0
            .call1(&JsValue::NULL, &JsValue::from_str(raw))
            .map_err(call_failed)?;

        from_js(result)
    }
}

/// `(text) => value`, e.g. JSON5.parse
struct JsPermissiveJson(Function);

impl PermissiveJson for JsPermissiveJson {
    fn parse(&self, text: &str) -> error::Result<Value> {
        let result = self
            .0
            .call1(&JsValue::NULL, &JsValue::from_str(text))
            .map_err(call_failed)?;

        from_js(result)
    }
}

/// `(entropy: Uint8Array) => { address, privateKey, mnemonic }`
struct JsAccountGenerator(Function);

impl AccountGenerator for JsAccountGenerator {
    fn generate(&self, entropy: &[u8; 32]) -> error::Result<Account> {
        let entropy = Uint8Array::from(&entropy[..]);
        let result = self
            .0
            .call1(&JsValue::NULL, &entropy)
            .map_err(call_failed)?;

        from_js(result)
    }
}

#[wasm_bindgen(js_name = decodeInputData)]
pub fn decode_input_data(decoder: Function, abi_text: &str, data_text: &str) -> Result<JsValue, JsValue> {
    let out = panel::decode_input_data(&JsInputDataDecoder(decoder), abi_text, data_text);
    serde_wasm_bindgen::to_value(&out)
        .map_err(|e| JsValue::from_str(&format!("Failed to serialize decoded call: {}", e)))
}

#[wasm_bindgen(js_name = decodeTransaction)]
pub fn decode_transaction(decoder: Function, raw: &str) -> String {
    panel::decode_transaction(&JsTransactionDecoder(decoder), raw)
}

#[wasm_bindgen]
pub fn keccak256(text: &str) -> String {
    panel::hash_text(&Keccak256, text)
}

/// Pretty-prints relaxed JSON through `parser`, or strict JSON when no
/// parser is given.
#[wasm_bindgen(js_name = parseJson)]
pub fn parse_json(parser: Option<Function>, text: &str) -> String {
    match parser {
        Some(parser) => panel::parse_json(&JsPermissiveJson(parser), text),
        None => panel::parse_json(&StrictJson, text),
    }
}

/// Fresh account from 32 bytes of `crypto.getRandomValues` entropy.
#[wasm_bindgen(js_name = randomAccount)]
pub fn random_account(generator: Function) -> Result<JsValue, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let mut entropy = [0u8; 32];
    window.crypto()?.get_random_values_with_u8_array(&mut entropy)?;

    let account = panel::generate_account(&JsAccountGenerator(generator), &entropy)
        .map_err(|e| JsValue::from_str(&format!("Account generation failed: {}", e)))?;

    serde_wasm_bindgen::to_value(&account)
        .map_err(|e| JsValue::from_str(&format!("Failed to serialize account: {}", e)))
}

fn collapse_state() -> Result<CollapseState<LocalStorageStore>, JsValue> {
    Ok(CollapseState::new(LocalStorageStore::open()?))
}

#[wasm_bindgen(js_name = isSectionCollapsed)]
pub fn is_section_collapsed(id: &str) -> Result<bool, JsValue> {
    let section = section(id).ok_or_else(|| JsValue::from_str(&format!("Unknown section: {}", id)))?;
    Ok(collapse_state()?.is_collapsed(section))
}

/// Flips a section's flag and returns whether it is now collapsed.
#[wasm_bindgen(js_name = toggleSection)]
pub fn toggle_section(id: &str) -> Result<bool, JsValue> {
    let section = section(id).ok_or_else(|| JsValue::from_str(&format!("Unknown section: {}", id)))?;
    Ok(collapse_state()?.toggle(section))
}

#[wasm_bindgen(js_name = sectionLabel)]
pub fn section_label(id: &str) -> Option<String> {
    section(id).map(|s| s.label.to_string())
}

/// A JS callback wrapped in a debounce window.
#[wasm_bindgen]
pub struct Debounced {
    inner: Debouncer<BrowserTimer>,
}

#[wasm_bindgen]
impl Debounced {
    #[wasm_bindgen(constructor)]
    pub fn new(action: Function, delay_ms: u32) -> Debounced {
        let inner = debounce(
            BrowserTimer,
            move || {
                if let Err(e) = action.call0(&JsValue::NULL) {
                    warn!("debounced action threw: {:?}", e);
                }
            },
            delay_ms,
        );

        Debounced { inner }
    }

    pub fn trigger(&self) {
        self.inner.trigger();
    }

    pub fn cancel(&self) {
        self.inner.cancel();
    }
}
