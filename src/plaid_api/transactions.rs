use anyhow::{ensure, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

use super::{client::Plaid, AccessToken};

const PAGE_SIZE: usize = 500;

/// Which transactions to download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionsQuery {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Restrict to these accounts, or all accounts of the connection if None.
    pub account_ids: Option<Vec<String>>,
}

#[derive(Serialize, Debug)]
struct TransactionsGetRequest<'a> {
    access_token: &'a str,
    start_date: NaiveDate,
    end_date: NaiveDate,
    options: TransactionsGetOptions<'a>,
}

#[derive(Serialize, Debug)]
struct TransactionsGetOptions<'a> {
    count: usize,
    offset: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    account_ids: Option<&'a [String]>,
}

#[derive(Deserialize, Debug)]
struct TransactionsPage {
    transactions: Vec<Value>,
    total_transactions: usize,
}

/// Source of transaction pages, addressed by offset into the full result set.
trait TransactionPager {
    async fn page(&self, offset: usize) -> Result<TransactionsPage>;
}

struct TransactionsGet<'a> {
    client: &'a Plaid,
    access_token: &'a AccessToken,
    query: &'a TransactionsQuery,
}

impl TransactionsGet<'_> {
    fn request(&self, offset: usize) -> TransactionsGetRequest<'_> {
        TransactionsGetRequest {
            access_token: self.access_token.get(),
            start_date: self.query.start_date,
            end_date: self.query.end_date,
            options: TransactionsGetOptions {
                count: PAGE_SIZE,
                offset,
                // Every page needs the same filter, otherwise offsets index a different result set
                account_ids: self.query.account_ids.as_deref(),
            },
        }
    }
}

impl TransactionPager for TransactionsGet<'_> {
    async fn page(&self, offset: usize) -> Result<TransactionsPage> {
        self.client
            .post("transactions/get", &self.request(offset))
            .await
    }
}

/// Download all transactions matching `query`, oldest page first.
///
/// Transactions are returned as the raw json records Plaid sends so that saving them loses
/// nothing. Records with a transaction id we've already seen are dropped.
pub async fn get_transactions(
    client: &Plaid,
    access_token: &AccessToken,
    query: &TransactionsQuery,
) -> Result<Vec<Value>> {
    collect_pages(&TransactionsGet {
        client,
        access_token,
        query,
    })
    .await
}

async fn collect_pages(pager: &impl TransactionPager) -> Result<Vec<Value>> {
    log::info!("Requesting transactions...");
    log::info!("Requesting transactions...page 1...");

    let mut page = pager.page(0).await?;
    let total = page.total_transactions;
    log::info!("Plaid reports {total} transactions");

    let mut result = Vec::with_capacity(total);
    let mut seen_ids = HashSet::new();
    let mut offset = 0;
    let mut pagenum = 1;
    loop {
        offset += page.transactions.len();
        for transaction in page.transactions {
            let id = transaction
                .get("transaction_id")
                .and_then(Value::as_str)
                .map(str::to_string);
            match id {
                Some(id) if !seen_ids.insert(id.clone()) => {
                    log::warn!("Dropping duplicate transaction {id}");
                }
                _ => result.push(transaction),
            }
        }

        if offset >= total {
            break;
        }

        pagenum += 1;
        log::info!("Requesting transactions...page {pagenum}...");
        page = pager.page(offset).await?;
        ensure!(
            !page.transactions.is_empty(),
            "Plaid returned an empty page at offset {offset} but reported {total} transactions",
        );
    }

    log::info!("Requesting transactions...done");

    Ok(result)
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use std::sync::Mutex;

    use super::*;
    use crate::config::Credentials;

    struct FakePager {
        transactions: Vec<Value>,
        page_size: usize,
        requested_offsets: Mutex<Vec<usize>>,
    }

    impl FakePager {
        fn new(ids: &[&str], page_size: usize) -> Self {
            Self {
                transactions: ids
                    .iter()
                    .map(|id| json!({"transaction_id": id}))
                    .collect(),
                page_size,
                requested_offsets: Mutex::new(vec![]),
            }
        }
    }

    impl TransactionPager for FakePager {
        async fn page(&self, offset: usize) -> Result<TransactionsPage> {
            self.requested_offsets.lock().unwrap().push(offset);
            Ok(TransactionsPage {
                transactions: self
                    .transactions
                    .iter()
                    .skip(offset)
                    .take(self.page_size)
                    .cloned()
                    .collect(),
                total_transactions: self.transactions.len(),
            })
        }
    }

    fn ids(transactions: &[Value]) -> Vec<&str> {
        transactions
            .iter()
            .map(|t| t["transaction_id"].as_str().unwrap())
            .collect()
    }

    #[tokio::test]
    async fn single_page() {
        let pager = FakePager::new(&["a", "b"], 10);
        let transactions = collect_pages(&pager).await.unwrap();
        assert_eq!(vec!["a", "b"], ids(&transactions));
        assert_eq!(vec![0], *pager.requested_offsets.lock().unwrap());
    }

    #[tokio::test]
    async fn multiple_pages_in_order() {
        let pager = FakePager::new(&["a", "b", "c", "d", "e"], 2);
        let transactions = collect_pages(&pager).await.unwrap();
        assert_eq!(vec!["a", "b", "c", "d", "e"], ids(&transactions));
        assert_eq!(vec![0, 2, 4], *pager.requested_offsets.lock().unwrap());
    }

    #[tokio::test]
    async fn drops_duplicates() {
        let pager = FakePager::new(&["a", "b", "b", "c"], 3);
        let transactions = collect_pages(&pager).await.unwrap();
        assert_eq!(vec!["a", "b", "c"], ids(&transactions));
    }

    #[tokio::test]
    async fn empty_result() {
        let pager = FakePager::new(&[], 3);
        assert!(collect_pages(&pager).await.unwrap().is_empty());
    }

    struct StuckPager;

    impl TransactionPager for StuckPager {
        async fn page(&self, offset: usize) -> Result<TransactionsPage> {
            Ok(TransactionsPage {
                transactions: if offset == 0 {
                    vec![json!({"transaction_id": "a"})]
                } else {
                    vec![]
                },
                total_transactions: 5,
            })
        }
    }

    #[tokio::test]
    async fn empty_page_stops() {
        let err = collect_pages(&StuckPager).await.unwrap_err().to_string();
        assert!(err.contains("empty page at offset 1"), "{err}");
    }

    #[test]
    fn every_page_keeps_the_account_filter() {
        let credentials: Credentials =
            serde_json::from_value(json!({"client_id": "id", "secret": "secret"})).unwrap();
        let client = Plaid::new(&credentials);
        let access_token = AccessToken::new("token".to_string());
        let query = TransactionsQuery {
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
            account_ids: Some(vec!["acc-1".to_string(), "acc-2".to_string()]),
        };
        let pager = TransactionsGet {
            client: &client,
            access_token: &access_token,
            query: &query,
        };

        for offset in [0, 500, 1000] {
            let request = serde_json::to_value(pager.request(offset)).unwrap();
            assert_eq!(
                json!({
                    "access_token": "token",
                    "start_date": "2024-01-01",
                    "end_date": "2024-12-31",
                    "options": {
                        "count": 500,
                        "offset": offset,
                        "account_ids": ["acc-1", "acc-2"],
                    },
                }),
                request
            );
        }
    }

    #[test]
    fn no_account_filter() {
        let credentials: Credentials =
            serde_json::from_value(json!({"client_id": "id", "secret": "secret"})).unwrap();
        let client = Plaid::new(&credentials);
        let access_token = AccessToken::new("token".to_string());
        let query = TransactionsQuery {
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
            account_ids: None,
        };
        let pager = TransactionsGet {
            client: &client,
            access_token: &access_token,
            query: &query,
        };

        let request = serde_json::to_value(pager.request(500)).unwrap();
        assert_eq!(json!({"count": 500, "offset": 500}), request["options"]);
    }
}
