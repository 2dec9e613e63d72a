use anyhow::{bail, Context as _, Result};
use serde::{de::DeserializeOwned, Serialize};

use crate::config::Credentials;

const PLAID_VERSION: &str = "2020-09-14";

pub struct Plaid {
    http: reqwest::Client,
    base_url: String,
    client_id: String,
    secret: String,
}

impl Plaid {
    pub fn new(credentials: &Credentials) -> Plaid {
        Self::with_base_url(credentials, credentials.environment.base_url())
    }

    pub fn with_base_url(credentials: &Credentials, base_url: &str) -> Plaid {
        Plaid {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            client_id: credentials.client_id.clone(),
            secret: credentials.secret.clone(),
        }
    }

    /// POST `body` to a Plaid endpoint like `transactions/get` and parse the json response.
    pub(super) async fn post<Req, Resp>(&self, endpoint: &str, body: &Req) -> Result<Resp>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let url = format!("{}/{}", self.base_url, endpoint);
        log::debug!("POST {url}");
        let response = self
            .http
            .post(&url)
            .header("PLAID-CLIENT-ID", &self.client_id)
            .header("PLAID-SECRET", &self.secret)
            .header("Plaid-Version", PLAID_VERSION)
            .json(body)
            .send()
            .await
            .with_context(|| format!("Request to {endpoint} failed"))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            bail!("Plaid returned {status} for {endpoint}: {text}");
        }

        response
            .json()
            .await
            .with_context(|| format!("Failed to parse response of {endpoint}"))
    }
}
