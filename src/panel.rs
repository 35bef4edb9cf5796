// Glue around the page's external collaborators (ABI decoding, transaction
// decoding, hashing, account generation, relaxed JSON). The collaborators
// themselves live behind the traits below; this module cleans their inputs,
// stringifies big-number leaves in their outputs and maps every failure to
// the panel's fixed sentinel text.
use crate::{
    error::{ConvertError, Result},
    numeric::Integer,
};
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha3::{Digest, Keccak256 as KeccakState};

pub const INVALID_CALL: &str = "Invalid ABI or Input Data";
pub const INVALID_TRANSACTION: &str = "Invalid transaction";
pub const INVALID_HASH_INPUT: &str = "Invalid Input";
pub const INVALID_JSON: &str = "Invalid JSON";
pub const ABI_FETCH_ALERT: &str = "Could not fetch contract ABI from Etherscan";

lazy_static! {
    // block-explorer "MethodID: 0x…" header and "[n]:" word prefixes
    static ref EXPLORER_DECORATION: Regex =
        Regex::new(r"(?i)(?:[\s\S]*MethodID: (.*)[\s\S])?[\s\S]?\[\d+\]:(.*)")
            .expect("static regex");
}

///
/// DecodedCall
///

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct DecodedCall {
    pub method: Option<String>,
    pub types: Vec<String>,
    pub inputs: Vec<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub names: Vec<Value>,
}

///
/// Account
///

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub address: String,
    pub private_key: String,
    pub mnemonic: String,
}

pub trait InputDataDecoder {
    fn decode(&self, abi: &Value, call_data: &str) -> Result<DecodedCall>;
}

pub trait TransactionDecoder {
    fn decode(&self, raw: &str) -> Result<Value>;
}

pub trait Hasher {
    fn digest(&self, text: &str) -> Result<String>;
}

pub trait AccountGenerator {
    fn generate(&self, entropy: &[u8; 32]) -> Result<Account>;
}

pub trait PermissiveJson {
    fn parse(&self, text: &str) -> Result<Value>;
}

///
/// Keccak256
/// keccak-256 of the UTF-8 bytes, `0x` + 64 lower-case hex digits
///

#[derive(Clone, Copy, Debug, Default)]
pub struct Keccak256;

impl Hasher for Keccak256 {
    fn digest(&self, text: &str) -> Result<String> {
        Ok(format!("0x{}", hex::encode(KeccakState::digest(text.as_bytes()))))
    }
}

///
/// StrictJson
/// standard JSON only; stands in when no relaxed parser is supplied
///

#[derive(Clone, Copy, Debug, Default)]
pub struct StrictJson;

impl PermissiveJson for StrictJson {
    fn parse(&self, text: &str) -> Result<Value> {
        serde_json::from_str(text).map_err(ConvertError::decode)
    }
}

/// Strips explorer decorations and whitespace from pasted call data.
#[must_use]
pub fn clean_input_data(text: &str) -> String {
    EXPLORER_DECORATION
        .replace_all(text.trim(), "${1}${2}")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

/// Replaces serialized big-number objects (`{"_hex": "0x…"}`) with their
/// decimal strings, recursively.
#[must_use]
pub fn stringify_big_numbers(value: Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.into_iter().map(stringify_big_numbers).collect()),
        Value::Object(map) => match big_number_text(&map) {
            Some(decimal) => Value::String(decimal),
            None => Value::Object(
                map.into_iter()
                    .map(|(k, v)| (k, stringify_big_numbers(v)))
                    .collect(),
            ),
        },
        other => other,
    }
}

fn big_number_text(map: &Map<String, Value>) -> Option<String> {
    let hex = map.get("_hex")?.as_str()?;
    Integer::parse_hex(hex).ok().map(|v| v.to_decimal_string())
}

/// Two-space indented JSON, the format every panel prints.
#[must_use]
pub fn pretty_json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

///
/// CallOutput
/// cleaned call data to write back into the input, plus the output text
///

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CallOutput {
    pub data: String,
    pub output: String,
}

pub fn try_decode_input_data(
    decoder: &dyn InputDataDecoder,
    abi_text: &str,
    call_data: &str,
) -> Result<String> {
    let abi: Value = serde_json::from_str(abi_text.trim()).map_err(ConvertError::decode)?;
    let mut call = decoder.decode(&abi, call_data)?;
    call.inputs = call.inputs.into_iter().map(stringify_big_numbers).collect();

    let value = serde_json::to_value(&call).map_err(ConvertError::decode)?;
    Ok(pretty_json(&value))
}

#[must_use]
pub fn decode_input_data(
    decoder: &dyn InputDataDecoder,
    abi_text: &str,
    data_text: &str,
) -> CallOutput {
    let data = clean_input_data(data_text);
    let output = try_decode_input_data(decoder, abi_text, &data).unwrap_or_else(|err| {
        debug!("call data not decoded: {err}");
        INVALID_CALL.to_string()
    });

    CallOutput { data, output }
}

#[must_use]
pub fn decode_transaction(decoder: &dyn TransactionDecoder, raw: &str) -> String {
    match decoder.decode(raw.trim()) {
        Ok(tx) => pretty_json(&stringify_big_numbers(tx)),
        Err(err) => {
            debug!("transaction not decoded: {err}");
            INVALID_TRANSACTION.to_string()
        }
    }
}

#[must_use]
pub fn hash_text(hasher: &dyn Hasher, text: &str) -> String {
    hasher
        .digest(text)
        .unwrap_or_else(|_| INVALID_HASH_INPUT.to_string())
}

#[must_use]
pub fn parse_json(parser: &dyn PermissiveJson, text: &str) -> String {
    match parser.parse(text.trim()) {
        Ok(value) => pretty_json(&value),
        Err(err) => {
            debug!("json not parsed: {err}");
            INVALID_JSON.to_string()
        }
    }
}

pub fn generate_account(generator: &dyn AccountGenerator, entropy: &[u8; 32]) -> Result<Account> {
    generator.generate(entropy)
}

/// Contract-ABI lookup URL for `address`.
#[must_use]
pub fn abi_request_url(endpoint: &str, address: &str) -> String {
    format!(
        "{endpoint}?module=contract&action=getabi&address={}",
        address.trim()
    )
}

#[derive(Deserialize)]
struct AbiResponse {
    status: String,
    #[serde(default)]
    result: Value,
}

/// Unwraps an ABI lookup response body into pretty-printed ABI JSON.
/// Any non-`"1"` status is a network failure; the caller alerts once and
/// does not retry.
pub fn parse_abi_response(body: &str) -> Result<String> {
    let response: AbiResponse =
        serde_json::from_str(body).map_err(|err| ConvertError::NetworkFailure(err.to_string()))?;

    if response.status != "1" {
        let detail = response.result.as_str().unwrap_or("unexpected status").to_string();
        return Err(ConvertError::NetworkFailure(detail));
    }

    // the ABI arrives as a JSON document inside a string
    let abi: Value = match response.result {
        Value::String(text) => serde_json::from_str(&text).map_err(ConvertError::decode)?,
        other => other,
    };

    Ok(pretty_json(&abi))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct EchoDecoder;

    impl InputDataDecoder for EchoDecoder {
        fn decode(&self, abi: &Value, call_data: &str) -> Result<DecodedCall> {
            if !abi.is_array() || !call_data.starts_with("0xa9059cbb") {
                return Err(ConvertError::DecodeFailure("no matching method".to_string()));
            }

            Ok(DecodedCall {
                method: Some("transfer".to_string()),
                types: vec!["address".to_string(), "uint256".to_string()],
                inputs: vec![
                    json!("5a0b54d5dc17e0aadc383d2db43b0a0d3e029c4c"),
                    json!({ "_hex": "0x0de0b6b3a7640000", "_isBigNumber": true }),
                ],
                names: Vec::new(),
            })
        }
    }

    struct FailingTx;

    impl TransactionDecoder for FailingTx {
        fn decode(&self, raw: &str) -> Result<Value> {
            Err(ConvertError::DecodeFailure(raw.to_string()))
        }
    }

    #[test]
    fn explorer_paste_is_cleaned() {
        let pasted = "Function: transfer(address _to, uint256 _value)\n\n\
                      MethodID: 0xa9059cbb\n\
                      [0]:  0000000000000000000000005a0b54d5dc17e0aadc383d2db43b0a0d3e029c4c\n\
                      [1]:  0000000000000000000000000000000000000000000000000de0b6b3a7640000";

        assert_eq!(
            clean_input_data(pasted),
            "0xa9059cbb\
             0000000000000000000000005a0b54d5dc17e0aadc383d2db43b0a0d3e029c4c\
             0000000000000000000000000000000000000000000000000de0b6b3a7640000"
        );
    }

    #[test]
    fn explorer_paste_cleaning_ignores_case() {
        let pasted = "methodid: 0xa9059cbb\n[0]:  00ff\n[1]:  0a";

        assert_eq!(clean_input_data(pasted), "0xa9059cbb00ff0a");
    }

    #[test]
    fn raw_call_data_is_untouched() {
        assert_eq!(clean_input_data("  0xa9059cbb00ff \n"), "0xa9059cbb00ff");
    }

    #[test]
    fn big_numbers_become_decimal_strings() {
        let value = json!({
            "value": { "_hex": "0x0de0b6b3a7640000", "_isBigNumber": true },
            "list": [{ "_hex": "0xff" }, 7, "text"],
            "nested": { "gas": { "_hex": "0x5208" } },
        });

        assert_eq!(
            stringify_big_numbers(value),
            json!({
                "value": "1000000000000000000",
                "list": ["255", 7, "text"],
                "nested": { "gas": "21000" },
            })
        );
    }

    #[test]
    fn decoded_call_prints_decimal_amounts() {
        let out = decode_input_data(&EchoDecoder, "[]", "0xa9059cbb00");
        assert_eq!(out.data, "0xa9059cbb00");
        assert!(out.output.contains("\"method\": \"transfer\""));
        assert!(out.output.contains("\"1000000000000000000\""));
    }

    #[test]
    fn failures_show_sentinels() {
        assert_eq!(decode_input_data(&EchoDecoder, "not json", "0x").output, INVALID_CALL);
        assert_eq!(decode_input_data(&EchoDecoder, "[]", "0xdeadbeef").output, INVALID_CALL);
        assert_eq!(decode_transaction(&FailingTx, "0xf86c"), INVALID_TRANSACTION);
        assert_eq!(parse_json(&StrictJson, "{ unquoted: 1 }"), INVALID_JSON);
    }

    #[test]
    fn json_is_pretty_printed() {
        assert_eq!(parse_json(&StrictJson, r#" {"a":[1,2]} "#), "{\n  \"a\": [\n    1,\n    2\n  ]\n}");
    }

    #[test]
    fn keccak_of_empty_string() {
        assert_eq!(
            hash_text(&Keccak256, ""),
            "0xc5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn keccak_of_transfer_signature() {
        assert!(hash_text(&Keccak256, "transfer(address,uint256)").starts_with("0xa9059cbb"));
    }

    #[test]
    fn abi_url_has_address() {
        assert_eq!(
            abi_request_url("https://api.etherscan.io/api", " 0xabc "),
            "https://api.etherscan.io/api?module=contract&action=getabi&address=0xabc"
        );
    }

    #[test]
    fn abi_response_unwraps_embedded_json() {
        let body = r#"{"status":"1","message":"OK","result":"[{\"type\":\"function\"}]"}"#;
        let abi = parse_abi_response(body).unwrap();
        assert_eq!(serde_json::from_str::<Value>(&abi).unwrap(), json!([{ "type": "function" }]));
    }

    #[test]
    fn abi_response_failure_is_network_error() {
        let body = r#"{"status":"0","message":"NOTOK","result":"Invalid Address format"}"#;
        assert_eq!(
            parse_abi_response(body),
            Err(ConvertError::NetworkFailure("Invalid Address format".to_string()))
        );
        assert!(matches!(
            parse_abi_response("<html>"),
            Err(ConvertError::NetworkFailure(_))
        ));
    }
}
