//! Stock record definition.
//!
//! Field names follow the quote feed the API mocks, so the single-letter
//! price fields keep their wire names.

use serde::{Deserialize, Serialize};

/// One stock/instrument entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Numeric instrument identifier.
    pub oid: i64,

    /// Ticker.
    pub short_name: String,

    /// Registered company name.
    pub full_name: String,

    /// Opening price.
    pub o: f64,

    /// Last (closing) price.
    pub c: f64,

    /// Session low.
    pub min: f64,

    /// Session high.
    pub max: f64,

    /// Traded volume.
    pub v: i64,

    /// Market capitalisation.
    pub mc: f64,

    /// Previous close.
    pub pc: f64,

    /// Number of trades.
    pub tr: i64,

    /// Lots of open positions.
    pub lop: i64,

    /// Quote timestamp, unix seconds.
    pub ts: i64,

    pub medium_name: String,

    pub display_name: String,

    pub ut: String,

    /// Index membership flag, `-1` when not part of an index.
    pub ind: i64,

    /// Price precision, kept as the feed sends it.
    pub qp: String,
}

impl Record {
    /// The store key for this record.
    pub fn key(&self) -> String {
        self.oid.to_string()
    }
}
