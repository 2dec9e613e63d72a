use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Plaid's own description of a category code, as returned by `/categories/get`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ProviderCategory {
    #[serde(default)]
    pub group: String,
    pub hierarchy: Vec<String>,
}

/// Pre-resolved category paths keyed by the exact category code.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct HierarchyTable {
    categories: HashMap<String, ProviderCategory>,
}

impl HierarchyTable {
    pub fn hierarchy(&self, category_id: &str) -> Option<&[String]> {
        self.categories
            .get(category_id)
            .map(|category| category.hierarchy.as_slice())
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Entries sorted by category code.
    pub fn iter_sorted(&self) -> impl Iterator<Item = (&String, &ProviderCategory)> {
        let mut categories: Vec<_> = self.categories.iter().collect();
        categories.sort_by_key(|(id, _)| *id);
        categories.into_iter()
    }
}

impl FromIterator<(String, ProviderCategory)> for HierarchyTable {
    fn from_iter<T: IntoIterator<Item = (String, ProviderCategory)>>(iter: T) -> Self {
        Self {
            categories: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parse_cached_file() {
        let table: HierarchyTable = serde_json::from_value(json!({
            "13005000": {"group": "place", "hierarchy": ["Food and Drink", "Restaurants"]},
            "10000000": {"hierarchy": ["Bank Fees"]},
        }))
        .unwrap();

        assert_eq!(2, table.len());
        assert_eq!(
            Some(&["Food and Drink".to_string(), "Restaurants".to_string()][..]),
            table.hierarchy("13005000")
        );
        assert_eq!(None, table.hierarchy("99999999"));
    }

    #[test]
    fn iter_sorted_by_code() {
        let table: HierarchyTable = [
            ("2", vec!["B"]),
            ("1", vec!["A"]),
            ("3", vec!["C"]),
        ]
        .into_iter()
        .map(|(id, hierarchy)| {
            (
                id.to_string(),
                ProviderCategory {
                    group: "special".to_string(),
                    hierarchy: hierarchy.into_iter().map(String::from).collect(),
                },
            )
        })
        .collect();

        let ids: Vec<_> = table.iter_sorted().map(|(id, _)| id.as_str()).collect();
        assert_eq!(vec!["1", "2", "3"], ids);
    }
}
