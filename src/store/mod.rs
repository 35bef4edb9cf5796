// Key/value state that outlives a single edit: the shareable URL query and
// the per-section collapse flags.
mod browser;

pub use browser::{LocalStorageStore, UrlQueryStore};

use std::collections::BTreeMap;

/// Query keys the converters persist under.
pub mod keys {
    pub const UNIT: &str = "unit";
    pub const UNIT_DECIMALS: &str = "unitDecimals";
    pub const HEXADECIMAL: &str = "hexadecimal";
    pub const TIMESTAMP: &str = "timestamp";
    pub const CONTRACT: &str = "contract";
}

///
/// StateStore
///
/// `restore` reads one key; `persist` replaces or inserts every given entry
/// in a single update. Backends swallow their own I/O failures (logging
/// them) because a failed write must never break an edit.
///

pub trait StateStore {
    fn restore(&self, key: &str) -> Option<String>;

    fn persist(&mut self, entries: &[(&str, String)]);

    fn remove(&mut self, key: &str);
}

///
/// MemoryStore
/// in-process store for tests and non-browser hosts
///

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
    writes: usize,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            writes: 0,
        }
    }

    /// Number of `persist`/`remove` calls so far.
    #[must_use]
    pub const fn writes(&self) -> usize {
        self.writes
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl StateStore for MemoryStore {
    fn restore(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn persist(&mut self, entries: &[(&str, String)]) {
        for (key, value) in entries {
            self.entries.insert((*key).to_string(), value.clone());
        }
        self.writes += 1;
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
        self.writes += 1;
    }
}

///
/// Section
/// a collapsible page section and the storage key holding its flag
///

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Section {
    pub id: &'static str,
    pub storage_key: &'static str,
    pub label: &'static str,
}

pub const SECTIONS: &[Section] = &[
    Section {
        id: "input-data-decoder",
        storage_key: "decoder-collapsed",
        label: "Ethereum Input Data Decoder",
    },
    Section {
        id: "unit-converter",
        storage_key: "unit-collapsed",
        label: "Unit Converter",
    },
    Section {
        id: "timestamp-converter",
        storage_key: "timestamp-collapsed",
        label: "Timestamp Date Converter",
    },
    Section {
        id: "hexadecimal-converter",
        storage_key: "hexadecimal-collapsed",
        label: "Hexadecimal Converter",
    },
    Section {
        id: "random-account",
        storage_key: "random-account-collapsed",
        label: "Random Ethereum Account",
    },
    Section {
        id: "keccak256-hasher",
        storage_key: "keccak256-collapsed",
        label: "Keccak256 Hasher",
    },
    Section {
        id: "tx-decoder",
        storage_key: "tx-decoder",
        label: "Transaction Decoder",
    },
    Section {
        id: "json-parser",
        storage_key: "json-parser",
        label: "JSON5 Parser",
    },
];

#[must_use]
pub fn section(id: &str) -> Option<&'static Section> {
    SECTIONS.iter().find(|s| s.id == id)
}

///
/// CollapseState
/// boolean flags over any store; only `"true"` counts as collapsed
///

pub struct CollapseState<S: StateStore> {
    store: S,
}

impl<S: StateStore> CollapseState<S> {
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    pub fn is_collapsed(&self, section: &Section) -> bool {
        self.store.restore(section.storage_key).as_deref() == Some("true")
    }

    pub fn set(&mut self, section: &Section, collapsed: bool) {
        if collapsed {
            self.store
                .persist(&[(section.storage_key, "true".to_string())]);
        } else {
            self.store.remove(section.storage_key);
        }
    }

    /// Flips the flag and returns the new state.
    pub fn toggle(&mut self, section: &Section) -> bool {
        let collapsed = !self.is_collapsed(section);
        self.set(section, collapsed);
        collapsed
    }

    pub const fn store(&self) -> &S {
        &self.store
    }
}
