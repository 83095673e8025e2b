use std::time::Instant;

use anyhow::{Result, anyhow};
use dotenvy::dotenv;
use serde_json::Value;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use mercadolivre_connect::adapters::{ExportResult, export_to_excel, listing_row};
use mercadolivre_connect::{ClientConfig, Config, Credentials, MarketplaceClient};

// ==================== JOB ====================
enum Listings {
    Keyword(String),
    Category(String),
}

struct ExportJob {
    listings: Listings,
    site_id: String,
    page_limit: u32,
    output_file: String,
}

impl ExportJob {
    fn from_env() -> Result<Self> {
        let listings = match (
            std::env::var("ML_SEARCH_QUERY").ok(),
            std::env::var("ML_CATEGORY_ID").ok(),
        ) {
            (Some(q), _) if !q.is_empty() => Listings::Keyword(q),
            (_, Some(c)) if !c.is_empty() => Listings::Category(c),
            _ => {
                return Err(anyhow!(
                    "Set ML_SEARCH_QUERY or ML_CATEGORY_ID to choose the listings to export"
                ));
            }
        };
        let page_limit = match std::env::var("ML_PAGE_LIMIT") {
            Ok(v) => v
                .parse()
                .map_err(|e| anyhow!("Invalid ML_PAGE_LIMIT {:?}: {}", v, e))?,
            Err(_) => Config::DEFAULT_PAGE_LIMIT,
        };
        Ok(Self {
            listings,
            site_id: std::env::var("ML_SITE_ID").unwrap_or_else(|_| Config::SITE_ID.to_string()),
            page_limit,
            output_file: std::env::var("OUTPUT_FILE").unwrap_or_else(|_| {
                format!("ml_listings_{}.xlsx", chrono::Utc::now().timestamp())
            }),
        })
    }
}

// ==================== MAIN APPLICATION ====================
async fn fetch_listings(client: &MarketplaceClient, job: &ExportJob) -> Vec<Value> {
    match &job.listings {
        Listings::Keyword(q) => {
            info!("Searching listings for {:?}...", q);
            client.search_products_paged(q, job.page_limit).await
        }
        Listings::Category(c) => {
            info!("Fetching listings in category {}...", c);
            client.items_by_category_paged(c, job.page_limit).await
        }
    }
}

async fn run() -> Result<ExportResult> {
    let start = Instant::now();
    info!("{}", "=".repeat(80));
    info!("Mercado Livre - Listings Exporter");
    info!("{}", "=".repeat(80));

    let credentials = Credentials::from_env()?;
    let job = ExportJob::from_env()?;
    info!("Environment validation passed");
    info!("Site: {}", job.site_id);
    info!("Output file: {}", job.output_file);

    let config = ClientConfig::default().with_site(&job.site_id);
    let client = MarketplaceClient::connect_with(config, &credentials).await?;

    let listings = fetch_listings(&client, &job).await;
    if listings.is_empty() {
        warn!("No listings found");
        return Ok(ExportResult {
            filename: job.output_file,
            record_count: 0,
            file_size: 0,
        });
    }

    let rows: Vec<_> = listings.iter().map(listing_row).collect();
    let export_result = export_to_excel(&rows, &job.output_file)?;

    let stats = client.stats();
    info!("{}", "=".repeat(80));
    info!("LISTINGS EXPORT COMPLETED");
    info!("Duration: {:.1} seconds", start.elapsed().as_secs_f32());
    info!("Total API requests: {}", stats.requests);
    info!("Failed API requests: {}", stats.failures);
    info!("Listings exported: {}", export_result.record_count);
    info!("Output file: {} ({} bytes)", export_result.filename, export_result.file_size);
    info!("{}", "=".repeat(80));
    Ok(export_result)
}

// ==================== ENTRY POINT ====================
#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run().await {
        eprintln!("\nFatal error: {}", e);
        std::process::exit(1);
    }
}
