use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::{
    config::FeedConfig,
    env::get_env_var,
    errors::FeedError,
    models::{
        history::{HistoryFetch, NoDataReason},
        instrument::InstrumentDescriptor,
    },
    providers::{
        FeedClient,
        cryptocompare::response::{interpret_coin_list, interpret_history},
    },
};

const COIN_LIST_PATH: &str = "data/all/coinlist";
const HISTODAY_PATH: &str = "data/v2/histoday";

/// REST client for the CryptoCompare min-api.
pub struct CryptoCompareClient {
    client: Client,
    config: FeedConfig,
    api_key: SecretString,
    limiter: DefaultDirectRateLimiter,
}

impl CryptoCompareClient {
    /// Creates a client, reading the API key from `config.api_key_env`.
    pub fn new(config: FeedConfig) -> Result<Self, FeedError> {
        let api_key = SecretString::new(get_env_var(&config.api_key_env)?.into());
        Self::with_api_key(config, api_key)
    }

    /// Creates a client with an explicit API key.
    pub fn with_api_key(config: FeedConfig, api_key: SecretString) -> Result<Self, FeedError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .pool_max_idle_per_host(50)
            .build()
            .map_err(|e| FeedError::Config(e.to_string()))?;

        let limiter = RateLimiter::direct(Quota::per_second(config.requests_per_second));

        Ok(Self {
            client,
            config,
            api_key,
            limiter,
        })
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    async fn get(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<(u16, Vec<u8>), reqwest::Error> {
        self.limiter.until_ready().await;

        let response = self
            .client
            .get(self.config.endpoint(path))
            .query(query)
            .query(&[("api_key", self.api_key.expose_secret())])
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.bytes().await?;
        Ok((status, body.to_vec()))
    }
}

#[async_trait]
impl FeedClient for CryptoCompareClient {
    async fn list_instruments(&self) -> Result<Vec<InstrumentDescriptor>, FeedError> {
        let (status, body) = self.get(COIN_LIST_PATH, &[]).await?;
        let list = interpret_coin_list(status, &body)?;
        debug!(count = list.len(), "fetched coin list");
        Ok(list)
    }

    async fn fetch_history(&self, symbol: &str, limit: u32) -> HistoryFetch {
        let limit = limit.to_string();
        let query = [
            ("fsym", symbol),
            ("tsym", self.config.quote_currency.as_str()),
            ("limit", limit.as_str()),
        ];

        match self.get(HISTODAY_PATH, &query).await {
            Ok((status, body)) => interpret_history(status, &body),
            Err(e) => HistoryFetch::NoData(NoDataReason::Transport(e.to_string())),
        }
    }
}
