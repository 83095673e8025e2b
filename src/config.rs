use std::fmt;

use crate::error::{MarketplaceError, Result};

// ==================== CONFIGURATION ====================
pub struct Config;
impl Config {
    pub const BASE_URL: &'static str = "https://api.mercadolibre.com/";
    pub const TOKEN_URL: &'static str = "https://api.mercadolibre.com/oauth/token";
    pub const USER_AGENT: &'static str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/117.0.0.0 Safari/537.36";
    pub const SITE_ID: &'static str = "MLB";
    pub const DEFAULT_PAGE_LIMIT: u32 = 50;
}

/// Where the client sends its requests and how it identifies itself.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub token_url: String,
    pub site_id: String,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Config::BASE_URL.to_string(),
            token_url: Config::TOKEN_URL.to_string(),
            site_id: Config::SITE_ID.to_string(),
            user_agent: Config::USER_AGENT.to_string(),
        }
    }
}

impl ClientConfig {
    /// Points both the resource endpoints and the token endpoint at `base_url`.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        self.base_url = format!("{}/", base);
        self.token_url = format!("{}/oauth/token", base);
        self
    }

    pub fn with_site(mut self, site_id: &str) -> Self {
        self.site_id = site_id.to_string();
        self
    }

    /// Joins an endpoint such as `orders/search` onto the base URL.
    pub fn url_for(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }
}

pub const CLIENT_ID_VAR: &str = "ML_CLIENT_ID";
pub const CLIENT_SECRET_VAR: &str = "ML_CLIENT_SECRET";
pub const REFRESH_TOKEN_VAR: &str = "ML_REFRESH_TOKEN";

/// OAuth2 application credentials, used once to obtain an access token.
#[derive(Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        refresh_token: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            refresh_token: refresh_token.into(),
        }
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads all three variables through `lookup`, reporting every missing one at once.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = [CLIENT_ID_VAR, CLIENT_SECRET_VAR, REFRESH_TOKEN_VAR];
        let values: Vec<Option<String>> = required
            .iter()
            .map(|k| lookup(*k).filter(|v| !v.is_empty()))
            .collect();
        let missing: Vec<&str> = required
            .iter()
            .zip(values.iter())
            .filter(|(_, v)| v.is_none())
            .map(|(k, _)| *k)
            .collect();
        if !missing.is_empty() {
            return Err(MarketplaceError::MissingEnv(missing.join(", ")));
        }

        let mut values = values.into_iter().flatten();
        Ok(Self {
            client_id: values.next().unwrap_or_default(),
            client_secret: values.next().unwrap_or_default(),
            refresh_token: values.next().unwrap_or_default(),
        })
    }
}
