//! Client for the Mercado Livre marketplace REST API.
//!
//! A [`MarketplaceClient`] trades OAuth2 application credentials for an access
//! token once, then exposes query methods for orders, searches, categories,
//! item details and visit statistics.
//!
//! ```no_run
//! use mercadolivre_connect::{Credentials, MarketplaceClient};
//!
//! # async fn run() -> mercadolivre_connect::Result<()> {
//! let client = MarketplaceClient::connect(&Credentials::from_env()?).await?;
//! if let Some(categories) = client.categories().await {
//!     println!("{}", categories);
//! }
//! let listings = client.search_products_paged("cafeteira", 50).await;
//! println!("{} listings", listings.len());
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod paging;
pub mod stats;

pub use client::MarketplaceClient;
pub use config::{ClientConfig, Config, Credentials};
pub use error::{MarketplaceError, Result};
pub use models::{ItemSummary, Paging, QueryParams, SearchPage};
pub use paging::PageCursor;
pub use stats::{RequestStats, StatsSnapshot};
