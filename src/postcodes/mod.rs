use lazy_static::lazy_static;
use log::{info, warn};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::error::Result;
use crate::models::LocationData;

const BUNDLED_TABLE: &str = include_str!("../../data/postcodes.sample.json");

lazy_static! {
    static ref POSTCODE_RE: Regex = Regex::new(r"^[0-9]{5}$").unwrap();
}

// One row of the reference dataset.
#[derive(Debug, Deserialize)]
struct PostcodeRow {
    subdistrict: String,
    district: String,
    province: String,
    postcode: String,
    #[serde(default)]
    region: Option<String>,
}

/// Result of resolving a typed postcode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LookupOutcome {
    /// Not a five digit code yet. Nothing to show.
    Incomplete,
    NotFound,
    /// Exactly one area uses this code.
    Resolved { location: LocationData },
    /// The respondent has to pick one of these.
    Ambiguous { candidates: Vec<LocationData> },
}

impl LookupOutcome {
    pub fn candidates(&self) -> Vec<LocationData> {
        match self {
            LookupOutcome::Resolved { location } => vec![location.clone()],
            LookupOutcome::Ambiguous { candidates } => candidates.clone(),
            LookupOutcome::Incomplete | LookupOutcome::NotFound => Vec::new(),
        }
    }
}

/// Postcode to location index, built once at startup.
#[derive(Debug, Default)]
pub struct PostcodeTable {
    by_code: HashMap<String, Vec<LocationData>>,
}

impl PostcodeTable {
    /// Reads the table from `path`, or the bundled sample when no path is set.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let table = match path {
            Some(path) => {
                info!("Loading postcode table from {}", path.display());
                let raw = std::fs::read_to_string(path)?;
                Self::from_json(&raw)?
            }
            None => {
                warn!("POSTCODE_TABLE_PATH not set, using the bundled sample table");
                Self::from_json(BUNDLED_TABLE)?
            }
        };
        info!("Postcode table ready with {} codes", table.by_code.len());
        Ok(table)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let rows: Vec<PostcodeRow> = serde_json::from_str(raw)?;
        let mut by_code: HashMap<String, Vec<LocationData>> = HashMap::new();

        for row in rows {
            let entries = by_code.entry(row.postcode.clone()).or_default();
            // Keep the first row for each (subdistrict, district) pair.
            if entries
                .iter()
                .any(|e| e.subdistrict == row.subdistrict && e.district == row.district)
            {
                continue;
            }
            entries.push(LocationData {
                subdistrict: row.subdistrict,
                district: row.district,
                province: row.province,
                zipcode: row.postcode,
                region: row.region.filter(|r| !r.trim().is_empty()),
            });
        }

        Ok(Self { by_code })
    }

    pub fn lookup(&self, code: &str) -> LookupOutcome {
        let code = code.trim();
        if !POSTCODE_RE.is_match(code) {
            return LookupOutcome::Incomplete;
        }

        match self.by_code.get(code).map(Vec::as_slice) {
            None | Some([]) => LookupOutcome::NotFound,
            Some([single]) => LookupOutcome::Resolved {
                location: single.clone(),
            },
            Some(many) => LookupOutcome::Ambiguous {
                candidates: many.to_vec(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> PostcodeTable {
        PostcodeTable::from_json(BUNDLED_TABLE).unwrap()
    }

    #[test]
    fn codes_that_are_not_five_digits_are_incomplete() {
        let table = table();
        for code in ["", "1", "1033", "103300", "1033a", "๑๐๓๓๐"] {
            let outcome = table.lookup(code);
            assert_eq!(outcome, LookupOutcome::Incomplete, "{:?}", code);
            assert!(outcome.candidates().is_empty());
        }
    }

    #[test]
    fn unknown_code_is_not_found() {
        assert_eq!(table().lookup("99999"), LookupOutcome::NotFound);
    }

    #[test]
    fn single_row_resolves() {
        match table().lookup("40000") {
            LookupOutcome::Resolved { location } => {
                assert_eq!(location.province, "ขอนแก่น");
                assert_eq!(location.region.as_deref(), Some("ภาคตะวันออกเฉียงเหนือ"));
            }
            other => panic!("expected a single match, got {:?}", other),
        }
    }

    #[test]
    fn shared_code_is_ambiguous_and_deduplicated() {
        match table().lookup("10330") {
            LookupOutcome::Ambiguous { candidates } => {
                // The sample lists ลุมพินี twice.
                assert_eq!(candidates.len(), 4);
                assert_eq!(candidates[0].subdistrict, "ลุมพินี");
            }
            other => panic!("expected several matches, got {:?}", other),
        }
    }

    #[test]
    fn same_subdistrict_in_different_districts_is_kept() {
        let raw = r#"[
            {"subdistrict": "ในเมือง", "district": "A", "province": "P", "postcode": "12345"},
            {"subdistrict": "ในเมือง", "district": "B", "province": "P", "postcode": "12345"}
        ]"#;
        let table = PostcodeTable::from_json(raw).unwrap();
        assert_eq!(table.lookup("12345").candidates().len(), 2);
    }

    #[test]
    fn missing_region_is_none() {
        let location = table().lookup("11000").candidates().remove(0);
        assert_eq!(location.region, None);
    }
}
