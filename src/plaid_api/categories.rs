use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::client::Plaid;
use crate::category::{HierarchyTable, ProviderCategory};

#[derive(Serialize)]
struct CategoriesGetRequest {}

#[derive(Deserialize)]
struct CategoriesGetResponse {
    categories: Vec<CategoryItem>,
}

#[derive(Deserialize)]
struct CategoryItem {
    category_id: String,
    #[serde(flatten)]
    category: ProviderCategory,
}

/// Download Plaid's category list, keyed by category code.
pub async fn get_categories(client: &Plaid) -> Result<HierarchyTable> {
    log::info!("Requesting categories...");

    let response: CategoriesGetResponse = client
        .post("categories/get", &CategoriesGetRequest {})
        .await?;
    let result: HierarchyTable = to_table(response);

    log::info!("Requesting categories...done ({} categories)", result.len());
    Ok(result)
}

fn to_table(response: CategoriesGetResponse) -> HierarchyTable {
    response
        .categories
        .into_iter()
        .map(|item| (item.category_id, item.category))
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parse_response() {
        let response: CategoriesGetResponse = serde_json::from_value(json!({
            "categories": [
                {"category_id": "10000000", "group": "special", "hierarchy": ["Bank Fees"]},
                {"category_id": "13005000", "group": "place", "hierarchy": ["Food and Drink", "Restaurants"]},
            ],
            "request_id": "req",
        }))
        .unwrap();

        let table = to_table(response);
        assert_eq!(2, table.len());
        assert_eq!(
            Some(&["Food and Drink".to_string(), "Restaurants".to_string()][..]),
            table.hierarchy("13005000")
        );
    }
}
