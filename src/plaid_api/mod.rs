mod access_token;
mod auth;
mod categories;
mod client;
mod transactions;

pub use access_token::AccessToken;
pub use auth::get_auth;
pub use categories::get_categories;
pub use client::Plaid;
pub use transactions::{get_transactions, TransactionsQuery};
