//! Project-level metadata used to filter and rank queue status results.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Project affiliation fractions keyed by project then affiliation code.
///
/// A project belongs to an affiliation when the code is present with a
/// positive fraction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AffiliationTable(HashMap<String, HashMap<String, f64>>);

impl AffiliationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `fraction` of `projectid` under `affiliation`.
    pub fn insert(
        &mut self,
        projectid: impl Into<String>,
        affiliation: impl Into<String>,
        fraction: f64,
    ) {
        self.0
            .entry(projectid.into())
            .or_default()
            .insert(affiliation.into(), fraction);
    }

    /// Merge every entry of `other` into this table.
    pub fn extend(&mut self, other: AffiliationTable) {
        for (projectid, codes) in other.0 {
            self.0.entry(projectid).or_default().extend(codes);
        }
    }

    pub fn has_affiliation(&self, projectid: &str, affiliation: &str) -> bool {
        self.0
            .get(projectid)
            .and_then(|codes| codes.get(affiliation))
            .is_some_and(|fraction| *fraction > 0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Queue membership of a project and its TAG priority adjustments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectQueue {
    pub projectid: String,
    /// Queue (country) code the project is primarily scheduled under.
    pub primary_queue: String,
    /// Priority adjustment per queue code.
    #[serde(default)]
    pub tag_adjustments: BTreeMap<String, f64>,
}

impl ProjectQueue {
    /// Adjustment for the primary queue, zero when none is on record.
    pub fn primary_adjustment(&self) -> f64 {
        self.tag_adjustments
            .get(&self.primary_queue)
            .copied()
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_affiliation_membership() {
        let mut table = AffiliationTable::new();
        table.insert("M22AU01", "uk", 1.0);
        table.insert("M22AU02", "uk", 0.0);

        assert!(table.has_affiliation("M22AU01", "uk"));
        assert!(!table.has_affiliation("M22AU01", "cn"));
        assert!(!table.has_affiliation("M22AU02", "uk"));
        assert!(!table.has_affiliation("M22AU03", "uk"));
        assert!(!table.is_empty());
    }

    #[test]
    fn test_affiliation_table_json_is_nested_map() {
        let json = r#"{"M22AU01": {"uk": 0.6, "cn": 0.4}}"#;
        let table: AffiliationTable = serde_json::from_str(json).unwrap();
        assert!(table.has_affiliation("M22AU01", "cn"));
    }

    #[test]
    fn test_primary_adjustment_defaults_to_zero() {
        let queue = ProjectQueue {
            projectid: "M22AU01".to_string(),
            primary_queue: "UK".to_string(),
            tag_adjustments: BTreeMap::from([("CN".to_string(), 3.0)]),
        };
        assert_eq!(queue.primary_adjustment(), 0.0);
    }

    #[test]
    fn test_primary_adjustment_lookup() {
        let queue = ProjectQueue {
            projectid: "M22AU01".to_string(),
            primary_queue: "UK".to_string(),
            tag_adjustments: BTreeMap::from([("UK".to_string(), -2.5)]),
        };
        assert_eq!(queue.primary_adjustment(), -2.5);
    }
}
