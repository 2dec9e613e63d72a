use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::category::{resolve_category, HierarchyTable, Taxonomy};
use crate::error::ConvertError;
use crate::transaction::Transaction;

/// Field rewrites keyed by the payee name the provider reports.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct PayeeOverrides {
    payees: HashMap<String, Map<String, Value>>,
}

impl PayeeOverrides {
    pub fn new(payees: HashMap<String, Map<String, Value>>) -> Self {
        Self { payees }
    }

    pub fn get(&self, name: &str) -> Option<&Map<String, Value>> {
        self.payees.get(name)
    }

    pub fn len(&self) -> usize {
        self.payees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payees.is_empty()
    }
}

/// If the transaction's payee has an override, copy every overridden field onto it.
/// Overrides win over provider data for any field, `name` and `amount` included.
pub fn apply_payee(
    xact: Transaction,
    payees: &PayeeOverrides,
) -> Result<Transaction, ConvertError> {
    let Some(fields) = payees.get(&xact.name) else {
        return Ok(xact);
    };
    let payee = xact.name.clone();
    let invalid = |source| ConvertError::InvalidPayeeOverride {
        payee: payee.clone(),
        source,
    };

    let mut record = match serde_json::to_value(xact).map_err(invalid)? {
        Value::Object(record) => record,
        _ => unreachable!("Transaction always serializes to an object"),
    };
    for (field, value) in fields {
        record.insert(field.clone(), value.clone());
    }
    serde_json::from_value(Value::Object(record)).map_err(invalid)
}

/// Replace the category with the provider's pre-resolved path for this exact code.
/// Codes the table doesn't know keep their category.
pub fn apply_hierarchy(xact: &mut Transaction, hierarchies: &HierarchyTable) {
    if let Some(hierarchy) = hierarchies.hierarchy(&xact.category_id) {
        xact.category = hierarchy.to_vec();
    }
}

/// Decode the category code with `taxonomy`, using the current category as fallback.
pub fn apply_category(xact: &mut Transaction, taxonomy: &Taxonomy) {
    xact.category = resolve_category(&xact.category_id, &xact.category, taxonomy);
}

/// Run all configured overrides in their fixed order: payee, hierarchy table, taxonomy.
/// The taxonomy also runs on categories the hierarchy table already set, with that path as its
/// fallback, so a taxonomy entry always wins over the provider's path.
pub fn apply_overrides(
    xact: Transaction,
    payees: Option<&PayeeOverrides>,
    hierarchies: Option<&HierarchyTable>,
    taxonomy: Option<&Taxonomy>,
) -> Result<Transaction, ConvertError> {
    let mut xact = match payees {
        Some(payees) => apply_payee(xact, payees)?,
        None => xact,
    };
    if let Some(hierarchies) = hierarchies {
        apply_hierarchy(&mut xact, hierarchies);
    }
    if let Some(taxonomy) = taxonomy {
        apply_category(&mut xact, taxonomy);
    }
    Ok(xact)
}
