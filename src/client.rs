use chrono::NaiveDate;
use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::{ClientConfig, Credentials};
use crate::error::{MarketplaceError, Result};
use crate::models::{ItemSummary, QueryParams, SearchPage, TokenResponse};
use crate::paging::PageCursor;
use crate::stats::{RequestStats, StatsSnapshot};

// ==================== MARKETPLACE CLIENT ====================

/// Authenticated client for the Mercado Livre REST API.
///
/// The access token is obtained once in [`MarketplaceClient::connect`] and sent
/// unchanged with every request afterwards. It is never refreshed, so an
/// expired token shows up as `None` from the query methods.
#[derive(Debug, Clone)]
pub struct MarketplaceClient {
    http: Client,
    config: ClientConfig,
    access_token: String,
    stats: RequestStats,
}

impl MarketplaceClient {
    pub async fn connect(credentials: &Credentials) -> Result<Self> {
        Self::connect_with(ClientConfig::default(), credentials).await
    }

    /// Exchanges the refresh token for an access token. One POST, no retry.
    pub async fn connect_with(config: ClientConfig, credentials: &Credentials) -> Result<Self> {
        let http = Client::new();
        let access_token = Self::fetch_access_token(&http, &config, credentials).await?;
        info!(client_id = %credentials.client_id, "obtained access token");
        Ok(Self {
            http,
            config,
            access_token,
            stats: RequestStats::new(),
        })
    }

    async fn fetch_access_token(
        http: &Client,
        config: &ClientConfig,
        credentials: &Credentials,
    ) -> Result<String> {
        let form = [
            ("grant_type", "refresh_token"),
            ("client_id", credentials.client_id.as_str()),
            ("client_secret", credentials.client_secret.as_str()),
            ("refresh_token", credentials.refresh_token.as_str()),
        ];
        let resp = http
            .post(&config.token_url)
            .header(ACCEPT, "application/json")
            .form(&form)
            .send()
            .await?;

        let status = resp.status();
        let token: TokenResponse = resp.json().await?;
        token
            .access_token
            .ok_or(MarketplaceError::MissingAccessToken { status })
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Issues an authenticated GET against `endpoint`.
    ///
    /// Returns the decoded body only when the status is exactly 200. Network
    /// errors, any other status and undecodable bodies all yield `None`.
    pub async fn request(&self, endpoint: &str, params: &[(&'static str, String)]) -> Option<Value> {
        let url = self.config.url_for(endpoint);
        self.stats.increment_request();
        debug!(
            "GET {} [{}]",
            url,
            params.iter().map(|(k, _)| *k).collect::<Vec<_>>().join(", ")
        );

        let resp = match self
            .http
            .get(&url)
            .header(AUTHORIZATION, self.access_token.as_str())
            .header(USER_AGENT, self.config.user_agent.as_str())
            .query(params)
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                self.stats.increment_failure();
                warn!("GET {} failed: {}", endpoint, e);
                return None;
            }
        };

        let status = resp.status();
        if status != StatusCode::OK {
            self.stats.increment_failure();
            warn!("GET {} returned {}", endpoint, status);
            return None;
        }

        match resp.json::<Value>().await {
            Ok(body) => Some(body),
            Err(e) => {
                self.stats.increment_failure();
                warn!("GET {} returned an undecodable body: {}", endpoint, e);
                None
            }
        }
    }

    fn site_endpoint(&self, resource: &str) -> String {
        format!("sites/{}/{}", self.config.site_id, resource)
    }

    /// Requests every page of a search, threading the offset into each request.
    ///
    /// A failed page ends the walk; whatever was gathered before it is returned.
    async fn collect_pages(&self, endpoint: &str, params: QueryParams, limit: u32) -> Vec<Value> {
        let mut cursor = PageCursor::new(limit);
        let mut results = Vec::new();

        loop {
            let mut page_params = params.clone();
            page_params.extend(cursor.params());

            let Some(body) = self.request(endpoint, &page_params).await else {
                break;
            };
            let page = SearchPage::from_body(body);
            if page.paging.and_then(|p| p.total).is_none() {
                debug!("{} page has no paging total, stopping after it", endpoint);
            }

            let received = page.results.len();
            results.extend(page.results);
            if !cursor.advance(received, page.paging) {
                break;
            }
        }

        info!("{}: collected {} results", endpoint, results.len());
        results
    }

    // ==================== ORDERS ====================

    /// Orders of a seller.
    pub async fn sales(&self, seller_id: &str) -> Option<Value> {
        let params = vec![
            ("seller", seller_id.to_string()),
            ("access_token", self.access_token.clone()),
        ];
        self.request("orders/search", &params).await
    }

    /// Orders of a seller created between the start of `from` and the end of `to`.
    pub async fn sales_in_range(
        &self,
        seller_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Option<Value> {
        let params = sales_range_params(seller_id, from, to, &self.access_token);
        self.request("orders/search", &params).await
    }

    pub async fn paid_orders(&self, seller_id: &str) -> Option<Value> {
        let params = vec![
            ("seller", seller_id.to_string()),
            ("order.status", "paid".to_string()),
        ];
        self.request("orders/search", &params).await
    }

    // ==================== SEARCH ====================

    pub async fn search_products(&self, keyword: &str) -> Option<Value> {
        let params = vec![("q", keyword.to_string())];
        self.request(&self.site_endpoint("search"), &params).await
    }

    /// Every listing matching `keyword`, fetched `limit` at a time.
    pub async fn search_products_paged(&self, keyword: &str, limit: u32) -> Vec<Value> {
        let params = vec![("q", keyword.to_string())];
        self.collect_pages(&self.site_endpoint("search"), params, limit)
            .await
    }

    /// Listings of a seller, cheapest first.
    pub async fn items_by_seller(&self, seller_id: &str) -> Option<Value> {
        let params = vec![
            ("seller_id", seller_id.to_string()),
            ("sort", "price_asc".to_string()),
        ];
        self.request(&self.site_endpoint("search"), &params).await
    }

    pub async fn items_by_category(&self, category_id: &str) -> Option<Value> {
        let params = vec![("category", category_id.to_string())];
        self.request(&self.site_endpoint("search"), &params).await
    }

    /// Every listing in a category, fetched `limit` at a time.
    pub async fn items_by_category_paged(&self, category_id: &str, limit: u32) -> Vec<Value> {
        let params = vec![("category", category_id.to_string())];
        self.collect_pages(&self.site_endpoint("search"), params, limit)
            .await
    }

    pub async fn items_by_seller_in_category(
        &self,
        seller_id: &str,
        category_id: &str,
    ) -> Option<Value> {
        let params = vec![
            ("seller_id", seller_id.to_string()),
            ("category", category_id.to_string()),
        ];
        self.request(&self.site_endpoint("search"), &params).await
    }

    pub async fn categories(&self) -> Option<Value> {
        self.request(&self.site_endpoint("categories"), &[]).await
    }

    // ==================== ITEMS ====================

    /// Creation date, seller and sold quantity of a listing.
    pub async fn item_details(&self, item_id: &str) -> Result<ItemSummary> {
        let endpoint = format!("items/{}", item_id);
        let item = self
            .request(&endpoint, &[])
            .await
            .ok_or_else(|| MarketplaceError::NoResult {
                endpoint: endpoint.clone(),
            })?;
        ItemSummary::from_item(&endpoint, &item)
    }

    /// Daily visits of a listing over the `days` days ending at `ending`.
    pub async fn item_visits(&self, item_id: &str, days: u32, ending: NaiveDate) -> Option<Value> {
        let endpoint = format!("items/{}/visits/time_window", item_id);
        let params = vec![
            ("last", days.to_string()),
            ("unit", "day".to_string()),
            ("ending", ending.format("%Y-%m-%d").to_string()),
        ];
        self.request(&endpoint, &params).await
    }
}

fn sales_range_params(
    seller_id: &str,
    from: NaiveDate,
    to: NaiveDate,
    access_token: &str,
) -> QueryParams {
    vec![
        ("seller", seller_id.to_string()),
        (
            "order.date_created.from",
            format!("{}T00:00:00.000-00:00", from.format("%Y-%m-%d")),
        ),
        (
            "order.date_created.to",
            format!("{}T23:59:59.000-00:00", to.format("%Y-%m-%d")),
        ),
        ("access_token", access_token.to_string()),
    ]
}
