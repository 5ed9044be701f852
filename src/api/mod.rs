//! Client side of the bookkeeping REST API.

pub mod client;
pub mod credentials;
pub mod payload;
pub mod retry;

use crate::core::model::{PriceRecord, Product, Transaction};
use async_trait::async_trait;
use payload::{NewPriceRecord, NewTransaction, NewUser, ProductDraft};
use reqwest::StatusCode;

pub use client::ApiClient;
pub use credentials::{CredentialProvider, SessionInvalidated, StaticToken, TokenFile};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The token was missing or rejected. The session-invalidated callback has
    /// already run when this is returned.
    #[error("Session is no longer valid (401 Unauthorized) for {endpoint}")]
    Unauthorized { endpoint: String },

    #[error("HTTP error: {status} for {endpoint}: {message}")]
    Status {
        status: StatusCode,
        endpoint: String,
        message: String,
    },

    #[error("Request error for {endpoint}: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to parse JSON response for {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }
}

/// Operations the CLI needs from the backend.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn list_transactions(&self) -> Result<Vec<Transaction>, ApiError>;
    async fn create_transaction(&self, transaction: &NewTransaction) -> Result<(), ApiError>;

    async fn list_products(&self) -> Result<Vec<Product>, ApiError>;
    async fn create_product(&self, draft: &ProductDraft) -> Result<(), ApiError>;
    async fn update_product(&self, id: &str, draft: &ProductDraft) -> Result<(), ApiError>;
    async fn delete_product(&self, id: &str) -> Result<(), ApiError>;

    async fn list_prices(&self) -> Result<Vec<PriceRecord>, ApiError>;
    async fn record_price(&self, price: &NewPriceRecord) -> Result<(), ApiError>;

    async fn register(&self, user: &NewUser) -> Result<(), ApiError>;
}
