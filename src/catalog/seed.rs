//! Built-in fixture catalog.
//!
//! Every entry shares the same placeholder quote and company identity; only
//! `oid` and `displayName` differ between records.

use std::collections::BTreeMap;

use crate::catalog::Record;

/// `(oid, display name)` for every built-in record.
pub const BUILTIN: &[(i64, &str)] = &[
    (9537, "LVC (LIVECHAT)"),
    (221, "AMBRA"),
    (8789, "PKP Cargo"),
    (3972, "JSW"),
    (348, "CCC"),
    (29136, "Orlen"),
    (41, "PZU"),
    (308, "Oponeo"),
    (17347, "Kruk"),
    (66, "CDProject"),
    (3567, "11Bit"),
    (27169, "TenSquareGames"),
    (231, "Tauron"),
    (5730, "Platige Image"),
    (149, "Lena"),
    (9820, "PCC Rokita"),
];

/// Build one fixture record.
pub fn fixture(oid: i64, display_name: &str) -> Record {
    Record {
        oid,
        short_name: "LVC".to_string(),
        full_name: "LIVECHAT SOFTWARE SPÓŁKA AKCYJNA".to_string(),
        o: 35.5,
        c: 36.05,
        min: 35.1,
        max: 36.4,
        v: 12049,
        mc: 429201.3,
        pc: 36.75,
        tr: 92,
        lop: 0,
        ts: 1569837932,
        medium_name: "LIVECHAT".to_string(),
        display_name: display_name.to_string(),
        ut: "LIVECHAT".to_string(),
        ind: -1,
        qp: "2".to_string(),
    }
}

/// The built-in table keyed by identifier.
pub fn builtin_records() -> BTreeMap<String, Record> {
    BUILTIN
        .iter()
        .map(|&(oid, name)| {
            let record = fixture(oid, name);
            (record.key(), record)
        })
        .collect()
}
