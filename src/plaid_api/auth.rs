use anyhow::Result;
use serde::Serialize;
use serde_json::Value;

use super::{client::Plaid, AccessToken};

#[derive(Serialize)]
struct AuthGetRequest<'a> {
    access_token: &'a str,
}

/// Accounts and account numbers of a bank connection, as Plaid returns them.
pub async fn get_auth(client: &Plaid, access_token: &AccessToken) -> Result<Value> {
    log::info!("Requesting accounts...");

    let response = client
        .post(
            "auth/get",
            &AuthGetRequest {
                access_token: access_token.get(),
            },
        )
        .await?;

    log::info!("Requesting accounts...done");
    Ok(response)
}
