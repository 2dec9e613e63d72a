mod hierarchy;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub use hierarchy::{HierarchyTable, ProviderCategory};

/// Names a 3 digit subgroup when the code has no finer leaf.
const SUBGROUP_SENTINEL: &str = "000";
/// Names a 2 digit group when the code has no finer subgroup.
const GROUP_SENTINEL: &str = "000000";

/// A node of a category taxonomy: either a label, or a group of nodes keyed by code segments.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum TaxonomyEntry {
    Label(String),
    Group(HashMap<String, TaxonomyEntry>),
}

impl TaxonomyEntry {
    fn label(&self) -> Option<&str> {
        match self {
            Self::Label(label) => Some(label),
            Self::Group(_) => None,
        }
    }
}

/// Maps category code prefixes (2 digit group, 5 digit subgroup or a full code) to labels.
///
/// A user taxonomy only needs to list the parts of the code space it wants to rename,
/// everything else falls back to the breadcrumb already on the transaction.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct Taxonomy {
    entries: HashMap<String, TaxonomyEntry>,
}

impl Taxonomy {
    pub fn new(entries: HashMap<String, TaxonomyEntry>) -> Self {
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn get(&self, key: &str) -> Option<&TaxonomyEntry> {
        self.entries.get(key)
    }
}

/// Decode `category_id` into a category path.
///
/// Lookups go from the most to the least specific prefix: the full code, the 5 digit
/// subgroup, then the 2 digit group. Whenever the taxonomy doesn't cover the part of the
/// code being looked at, `fallback` (the provider's breadcrumb) fills in. This never fails,
/// a code that matches nothing returns `fallback` unchanged.
pub fn resolve_category(category_id: &str, fallback: &[String], taxonomy: &Taxonomy) -> Vec<String> {
    if let Some(TaxonomyEntry::Label(label)) = taxonomy.get(category_id) {
        return vec![label.clone()];
    }

    if let Some(entry) = taxonomy.get(segment(category_id, 0, 5)) {
        let Some(subgroup) = NamedGroup::new(entry, SUBGROUP_SENTINEL) else {
            return fallback.to_vec();
        };
        return subgroup
            .path(segment(category_id, 5, 8))
            .unwrap_or_else(|| subgroup.path_with_fallback_leaf(fallback));
    }

    if let Some(entry) = taxonomy.get(segment(category_id, 0, 2)) {
        let Some(group) = NamedGroup::new(entry, GROUP_SENTINEL) else {
            return fallback.to_vec();
        };
        if let Some(path) = group.path(segment(category_id, 2, usize::MAX)) {
            return path;
        }
        let Some(entry) = group.entries.get(segment(category_id, 2, 5)) else {
            return std::iter::once(group.name.to_string())
                .chain(fallback.iter().skip(1).cloned())
                .collect();
        };
        let Some(subgroup) = NamedGroup::new(entry, SUBGROUP_SENTINEL) else {
            return fallback.to_vec();
        };
        let subpath = subgroup
            .path(segment(category_id, 5, usize::MAX))
            .unwrap_or_else(|| subgroup.path_with_fallback_leaf(fallback));
        return std::iter::once(group.name.to_string())
            .chain(subpath)
            .collect();
    }

    fallback.to_vec()
}

/// A group entry together with the label its sentinel key gives it.
struct NamedGroup<'a> {
    name: &'a str,
    sentinel: &'static str,
    entries: &'a HashMap<String, TaxonomyEntry>,
}

impl<'a> NamedGroup<'a> {
    /// Returns None if `entry` is a plain label or has no label under `sentinel`.
    fn new(entry: &'a TaxonomyEntry, sentinel: &'static str) -> Option<Self> {
        let TaxonomyEntry::Group(entries) = entry else {
            return None;
        };
        let name = entries.get(sentinel)?.label()?;
        Some(Self {
            name,
            sentinel,
            entries,
        })
    }

    /// Path for a code within this group, or None if the group doesn't list the code.
    fn path(&self, code: &str) -> Option<Vec<String>> {
        let label = self.entries.get(code)?.label()?;
        if code == self.sentinel {
            Some(vec![self.name.to_string()])
        } else {
            Some(vec![self.name.to_string(), label.to_string()])
        }
    }

    fn path_with_fallback_leaf(&self, fallback: &[String]) -> Vec<String> {
        std::iter::once(self.name.to_string())
            .chain(fallback.last().cloned())
            .collect()
    }
}

/// `code[start..end]`, clamped to the code length. Malformed codes yield empty segments.
fn segment(code: &str, start: usize, end: usize) -> &str {
    let end = end.min(code.len());
    code.get(start.min(end)..end).unwrap_or("")
}
