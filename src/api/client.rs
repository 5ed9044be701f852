use super::credentials::{CredentialProvider, SessionInvalidated};
use super::payload::{NewPriceRecord, NewTransaction, NewUser, ProductDraft};
use super::retry::with_retry;
use super::{ApiError, Backend};
use crate::core::config::ApiConfig;
use crate::core::model::{PriceRecord, Product, Transaction};
use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

const USER_AGENT: &str = concat!("kastoko/", env!("CARGO_PKG_VERSION"));

#[derive(Deserialize, Debug)]
struct DataEnvelope<T> {
    data: T,
}

#[derive(Deserialize, Debug)]
struct ErrorBody {
    message: Option<String>,
}

/// HTTP client for the bookkeeping API.
///
/// The token is read from the credential provider for every request. Any 401
/// answer runs the session-invalidated callback and surfaces as
/// [`ApiError::Unauthorized`].
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
    credentials: Arc<dyn CredentialProvider>,
    on_session_invalidated: SessionInvalidated,
    retries: usize,
    retry_delay_ms: u64,
}

impl ApiClient {
    pub fn new(
        base_url: &str,
        credentials: Arc<dyn CredentialProvider>,
        on_session_invalidated: SessionInvalidated,
    ) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self::with_http(base_url, http, credentials, on_session_invalidated))
    }

    pub fn from_config(
        config: &ApiConfig,
        credentials: Arc<dyn CredentialProvider>,
        on_session_invalidated: SessionInvalidated,
    ) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(
            Self::with_http(&config.base_url, http, credentials, on_session_invalidated)
                .with_retry_policy(config.retries, config.retry_delay_ms),
        )
    }

    fn with_http(
        base_url: &str,
        http: reqwest::Client,
        credentials: Arc<dyn CredentialProvider>,
        on_session_invalidated: SessionInvalidated,
    ) -> Self {
        ApiClient {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
            credentials,
            on_session_invalidated,
            retries: 0,
            retry_delay_ms: 0,
        }
    }

    /// Retry policy for GET requests that fail before any response arrives.
    pub fn with_retry_policy(mut self, retries: usize, delay_ms: u64) -> Self {
        self.retries = retries;
        self.retry_delay_ms = delay_ms;
        self
    }

    fn request(&self, method: Method, endpoint: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, endpoint);
        let builder = self.http.request(method, url);
        match self.credentials.bearer_token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn fetch_list<T: DeserializeOwned>(&self, endpoint: &str) -> Result<Vec<T>, ApiError> {
        debug!("Requesting {}{}", self.base_url, endpoint);

        let response = with_retry(
            || self.request(Method::GET, endpoint).send(),
            self.retries,
            self.retry_delay_ms,
        )
        .await
        .map_err(|source| ApiError::Transport {
            endpoint: endpoint.to_string(),
            source,
        })?;

        let text = self.read_body(endpoint, response).await?;
        let envelope: DataEnvelope<Vec<T>> =
            serde_json::from_str(&text).map_err(|source| ApiError::Decode {
                endpoint: endpoint.to_string(),
                source,
            })?;

        debug!(count = envelope.data.len(), "Received {}", endpoint);
        Ok(envelope.data)
    }

    async fn submit(&self, request: RequestBuilder, endpoint: &str) -> Result<(), ApiError> {
        let response = request.send().await.map_err(|source| ApiError::Transport {
            endpoint: endpoint.to_string(),
            source,
        })?;
        self.read_body(endpoint, response).await?;
        Ok(())
    }

    async fn read_body(&self, endpoint: &str, response: Response) -> Result<String, ApiError> {
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            warn!(endpoint = %endpoint, "Request unauthorized, invalidating session");
            (self.on_session_invalidated)();
            return Err(ApiError::Unauthorized {
                endpoint: endpoint.to_string(),
            });
        }

        let text = response.text().await.map_err(|source| ApiError::Transport {
            endpoint: endpoint.to_string(),
            source,
        })?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&text)
                .ok()
                .and_then(|body| body.message)
                .unwrap_or(text);
            return Err(ApiError::Status {
                status,
                endpoint: endpoint.to_string(),
                message,
            });
        }

        Ok(text)
    }
}

#[async_trait]
impl Backend for ApiClient {
    #[instrument(name = "ListTransactions", skip(self))]
    async fn list_transactions(&self) -> Result<Vec<Transaction>, ApiError> {
        self.fetch_list("/transactions").await
    }

    #[instrument(name = "CreateTransaction", skip(self, transaction))]
    async fn create_transaction(&self, transaction: &NewTransaction) -> Result<(), ApiError> {
        let endpoint = "/transactions";
        self.submit(self.request(Method::POST, endpoint).json(transaction), endpoint)
            .await
    }

    #[instrument(name = "ListProducts", skip(self))]
    async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        self.fetch_list("/products").await
    }

    #[instrument(name = "CreateProduct", skip(self, draft))]
    async fn create_product(&self, draft: &ProductDraft) -> Result<(), ApiError> {
        let endpoint = "/products";
        self.submit(self.request(Method::POST, endpoint).json(draft), endpoint)
            .await
    }

    #[instrument(name = "UpdateProduct", skip(self, draft), fields(id = %id))]
    async fn update_product(&self, id: &str, draft: &ProductDraft) -> Result<(), ApiError> {
        let endpoint = format!("/products/{id}");
        self.submit(self.request(Method::PUT, &endpoint).json(draft), &endpoint)
            .await
    }

    #[instrument(name = "DeleteProduct", skip(self), fields(id = %id))]
    async fn delete_product(&self, id: &str) -> Result<(), ApiError> {
        let endpoint = format!("/products/{id}");
        self.submit(self.request(Method::DELETE, &endpoint), &endpoint)
            .await
    }

    #[instrument(name = "ListPrices", skip(self))]
    async fn list_prices(&self) -> Result<Vec<PriceRecord>, ApiError> {
        self.fetch_list("/prices").await
    }

    #[instrument(name = "RecordPrice", skip(self, price), fields(product = %price.product_id))]
    async fn record_price(&self, price: &NewPriceRecord) -> Result<(), ApiError> {
        let endpoint = "/prices";
        self.submit(self.request(Method::POST, endpoint).json(price), endpoint)
            .await
    }

    #[instrument(name = "Register", skip(self, user), fields(email = %user.email))]
    async fn register(&self, user: &NewUser) -> Result<(), ApiError> {
        let endpoint = "/users";
        self.submit(self.request(Method::POST, endpoint).json(user), endpoint)
            .await
    }
}
