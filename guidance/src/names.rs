use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Index into a `NameTable`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NameID(pub usize);

impl fmt::Display for NameID {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "NameID({})", self.0)
    }
}

/// Interned street names. IDs are dense, so edges sharing an ID trivially
/// share a name; different IDs still need the announcement check, since "NE
/// Main St" and "Main Street" are the same street.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct NameTable {
    names: Vec<String>,
}

impl NameTable {
    pub fn new() -> NameTable {
        NameTable { names: Vec::new() }
    }

    pub fn insert(&mut self, name: &str) -> NameID {
        if let Some(idx) = self.names.iter().position(|n| n == name) {
            return NameID(idx);
        }
        self.names.push(name.to_string());
        NameID(self.names.len() - 1)
    }

    pub fn get(&self, id: NameID) -> &str {
        &self.names[id.0]
    }
}

/// Name suffixes (street types, cardinal directions) that don't make two
/// names different streets.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SuffixTable {
    suffixes: BTreeSet<String>,
}

impl SuffixTable {
    pub fn new(suffixes: Vec<&str>) -> SuffixTable {
        SuffixTable {
            suffixes: suffixes.into_iter().map(|s| s.to_lowercase()).collect(),
        }
    }

    pub fn is_suffix(&self, word: &str) -> bool {
        self.suffixes.contains(&word.to_lowercase())
    }
}

/// Does switching from `from` to `to` deserve an announcement? Losing the
/// name entirely doesn't; gaining one or changing the core name does.
pub fn requires_name_announced(from: &str, to: &str, suffixes: &SuffixTable) -> bool {
    let from_core = core_name(from, suffixes);
    let to_core = core_name(to, suffixes);
    if to_core.is_empty() {
        return false;
    }
    if from_core.is_empty() {
        return true;
    }
    from_core != to_core
}

// Case-folded name with suffix words stripped from either end.
fn core_name(name: &str, suffixes: &SuffixTable) -> String {
    let words: Vec<&str> = name.split_whitespace().collect();
    let mut start = 0;
    let mut end = words.len();
    while start < end && suffixes.is_suffix(words[start]) {
        start += 1;
    }
    while end > start && suffixes.is_suffix(words[end - 1]) {
        end -= 1;
    }
    words[start..end].join(" ").to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suffixes() -> SuffixTable {
        SuffixTable::new(vec!["st", "street", "ave", "avenue", "n", "e", "s", "w", "ne", "nw", "se", "sw"])
    }

    #[test]
    fn test_interning() {
        let mut table = NameTable::new();
        let a = table.insert("Main St");
        let b = table.insert("Broadway");
        let again = table.insert("Main St");
        assert_eq!(a, again);
        assert_ne!(a, b);
        assert_eq!(table.get(b), "Broadway");
    }

    #[test]
    fn test_requires_name_announced() {
        let suffixes = suffixes();
        for (from, to, announced) in vec![
            ("Main St", "Main Street", false),
            ("NE Main St", "Main Street", false),
            ("main street", "Main St", false),
            ("Main St", "Broadway", true),
            ("", "Broadway", true),
            ("Main St", "", false),
            ("", "", false),
        ] {
            assert_eq!(
                requires_name_announced(from, to, &suffixes),
                announced,
                "{:?} -> {:?}",
                from,
                to
            );
        }
    }
}
