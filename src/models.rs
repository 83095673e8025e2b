use serde::Deserialize;
use serde_json::Value;

use crate::error::{MarketplaceError, Result};

/// Query parameters for one request, in the order they are sent.
pub type QueryParams = Vec<(&'static str, String)>;

/// Body of `POST /oauth/token`. Every other field of the response is ignored.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: Option<String>,
}

/// The slice of an item listing the client reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemSummary {
    /// Creation date of the listing, `YYYY-MM-DD`.
    pub start_date: String,
    pub seller_id: u64,
    pub sold_quantity: u64,
}

impl ItemSummary {
    /// Absent and `null` fields are `MissingField`; any other value of the
    /// wrong type (a string id, a negative count) is `UnexpectedType`.
    pub fn from_item(endpoint: &str, item: &Value) -> Result<Self> {
        let start_time = field(endpoint, item, "start_time", Value::as_str)?;
        let seller_id = field(endpoint, item, "seller_id", Value::as_u64)?;
        let sold_quantity = field(endpoint, item, "sold_quantity", Value::as_u64)?;

        Ok(Self {
            start_date: start_time.chars().take(10).collect(),
            seller_id,
            sold_quantity,
        })
    }
}

fn field<'a, T>(
    endpoint: &str,
    item: &'a Value,
    name: &'static str,
    read: impl Fn(&'a Value) -> Option<T>,
) -> Result<T> {
    match item.get(name) {
        None | Some(Value::Null) => Err(MarketplaceError::MissingField {
            endpoint: endpoint.to_string(),
            field: name,
        }),
        Some(value) => read(value).ok_or_else(|| MarketplaceError::UnexpectedType {
            endpoint: endpoint.to_string(),
            field: name,
        }),
    }
}

impl From<ItemSummary> for (String, u64, u64) {
    fn from(summary: ItemSummary) -> Self {
        (summary.start_date, summary.seller_id, summary.sold_quantity)
    }
}

/// One page of a `sites/{site}/search` response.
#[derive(Debug, Default)]
pub struct SearchPage {
    pub paging: Option<Paging>,
    pub results: Vec<Value>,
}

impl SearchPage {
    /// Splits a search body into its results and paging block.
    ///
    /// The two are read independently: an unreadable `paging` block never
    /// loses the page's results.
    pub fn from_body(mut body: Value) -> Self {
        let results = match body.get_mut("results").map(Value::take) {
            Some(Value::Array(results)) => results,
            _ => Vec::new(),
        };
        let paging = body
            .get_mut("paging")
            .map(Value::take)
            .and_then(|p| serde_json::from_value(p).ok());
        Self { paging, results }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Paging {
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub offset: u64,
    #[serde(default)]
    pub limit: u64,
}
