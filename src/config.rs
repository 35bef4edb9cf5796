use crate::numeric::{Integer, Scale};
use anyhow::{Context, Result};
use log::{LevelFilter, warn};
use serde::{Deserialize, Serialize};

///
/// PageConfig
///
/// Everything the host page may override. Missing keys take their
/// defaults, so an empty object is a valid config.
///

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageConfig {
    // scale the unit converter starts with and resets to on blur
    pub default_scale: Scale,

    // smallest-unit value when the URL carries no `unit`
    pub default_unit: String,

    // value when the URL carries no `hexadecimal`
    pub default_hex: String,

    pub decoder_debounce_ms: u32,
    pub json_debounce_ms: u32,

    pub abi_endpoint: String,

    pub log_level: LevelFilter,
}

impl Default for PageConfig {
    fn default() -> Self {
        let one_ether = Integer::pow10(Scale::ETHER.get()).to_decimal_string();

        Self {
            default_scale: Scale::ETHER,
            default_unit: one_ether.clone(),
            default_hex: one_ether,
            decoder_debounce_ms: 100,
            json_debounce_ms: 150,
            abi_endpoint: "https://api.etherscan.io/api".to_string(),
            log_level: LevelFilter::Info,
        }
    }
}

impl PageConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_json::from_str(text).context("invalid page config")
    }

    #[must_use]
    pub fn default_unit_value(&self) -> Integer {
        Self::value_or_ether("defaultUnit", &self.default_unit)
    }

    #[must_use]
    pub fn default_hex_value(&self) -> Integer {
        Self::value_or_ether("defaultHex", &self.default_hex)
    }

    fn value_or_ether(name: &str, text: &str) -> Integer {
        Integer::parse_any(text).unwrap_or_else(|err| {
            warn!("config {name} ignored: {err}");
            Integer::pow10(Scale::ETHER.get())
        })
    }
}
