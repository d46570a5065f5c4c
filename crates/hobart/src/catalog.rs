//! Stock catalog.
//!
//! A read-only mapping from display names to tickers. The bundled list can
//! be replaced by a JSON object file of the form `{"Name": "TICKER", ...}`;
//! [`DEFAULT_STOCK`] is always part of a loaded catalog.

use crate::error::{PipelineError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Stock selected when nothing else is requested.
pub const DEFAULT_STOCK: &str = "MASCO (MAS)";

/// Ticker of [`DEFAULT_STOCK`].
pub const DEFAULT_TICKER: &str = "MAS";

/// One selectable stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockEntry {
    /// Display name
    pub name: String,
    /// Ticker symbol
    pub ticker: String,
}

impl StockEntry {
    /// Create a new entry.
    pub fn new(name: impl Into<String>, ticker: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ticker: ticker.into(),
        }
    }
}

/// Display name to ticker lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockCatalog {
    entries: Vec<StockEntry>,
}

impl StockCatalog {
    /// Catalog with the bundled stock list.
    pub fn new() -> Self {
        Self::from_entries(Self::default_entries())
    }

    /// Catalog over the given entries; later duplicates of a name are dropped.
    pub fn from_entries(entries: impl IntoIterator<Item = StockEntry>) -> Self {
        let mut out: Vec<StockEntry> = Vec::new();
        for entry in entries {
            if !out.iter().any(|e| e.name == entry.name) {
                out.push(entry);
            }
        }
        Self { entries: out }
    }

    /// Parse a JSON object of name/ticker pairs, adding [`DEFAULT_STOCK`].
    /// Entries are ordered by name.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut map: BTreeMap<String, String> = serde_json::from_str(json)?;
        map.insert(DEFAULT_STOCK.to_string(), DEFAULT_TICKER.to_string());
        Ok(Self::from_entries(
            map.into_iter().map(|(name, ticker)| StockEntry::new(name, ticker)),
        ))
    }

    /// Read a JSON catalog file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// All entries in catalog order.
    pub fn entries(&self) -> &[StockEntry] {
        &self.entries
    }

    /// Iterate over entries.
    pub fn iter(&self) -> impl Iterator<Item = &StockEntry> {
        self.entries.iter()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry by display name, ignoring ASCII case.
    pub fn get(&self, name: &str) -> Option<&StockEntry> {
        self.entries.iter().find(|e| e.name.eq_ignore_ascii_case(name))
    }

    /// Ticker for a display name.
    pub fn ticker(&self, name: &str) -> Option<&str> {
        self.get(name).map(|e| e.ticker.as_str())
    }

    /// First entry carrying `ticker`.
    pub fn by_ticker(&self, ticker: &str) -> Option<&StockEntry> {
        self.entries.iter().find(|e| e.ticker.eq_ignore_ascii_case(ticker))
    }

    /// [`DEFAULT_STOCK`] if listed, otherwise the first entry.
    pub fn default_entry(&self) -> Option<&StockEntry> {
        self.get(DEFAULT_STOCK).or_else(|| self.entries.first())
    }

    /// Pick the stock to analyze.
    ///
    /// An explicit ticker wins and need not be listed; its display name is
    /// taken from the catalog when available. A stock name must be listed.
    /// With neither, the default entry is used.
    ///
    /// # Errors
    ///
    /// [`PipelineError::UnknownStock`] for an unlisted name or an empty catalog.
    pub fn resolve(&self, stock: Option<&str>, ticker: Option<&str>) -> Result<StockEntry> {
        if let Some(ticker) = ticker {
            let ticker = ticker.trim().to_uppercase();
            let name = self
                .by_ticker(&ticker)
                .map_or_else(|| ticker.clone(), |e| e.name.clone());
            return Ok(StockEntry::new(name, ticker));
        }

        let entry = match stock {
            Some(name) => self.get(name.trim()),
            None => self.default_entry(),
        };
        entry
            .cloned()
            .ok_or_else(|| PipelineError::UnknownStock(stock.unwrap_or_default().to_string()))
    }

    fn default_entries() -> Vec<StockEntry> {
        [
            (DEFAULT_STOCK, DEFAULT_TICKER),
            ("PCG", "PCG"),
            ("WABTEC", "WAB"),
            ("ETR", "ETR"),
            ("DOV", "DOV"),
            ("General Dynamics", "GD"),
            ("PAR", "PAR"),
            ("OKE", "OKE"),
            ("LVS", "LVS"),
            ("MCO", "MCO"),
            ("LMT", "LMT"),
            ("EIX", "EIX"),
            ("SYK", "SYK"),
            ("HOLX", "HOLX"),
            ("MHK", "MHK"),
            ("NOC", "NOC"),
            ("IFF", "IFF"),
            ("AZO", "AZO"),
            ("Southern Company", "SO"),
            ("TTWO", "TTWO"),
            ("Kimberly Clark", "KMB"),
            ("CHD", "CHD"),
            ("EXR", "EXR"),
            ("CRL", "CRL"),
            ("Texas Instruments", "TXN"),
        ]
        .into_iter()
        .map(|(name, ticker)| StockEntry::new(name, ticker))
        .collect()
    }
}

impl Default for StockCatalog {
    fn default() -> Self {
        Self::new()
    }
}
