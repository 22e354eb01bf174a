use anyhow::Result;
use tracing_subscriber::EnvFilter;

use catador::analysis::analyze_products;
use catador::config::{ScrapeConfig, ScrapePolicy};
use catador::scrape::ScrapeSession;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = ScrapeConfig::from_env()?;
    let session = ScrapeSession::new(config, ScrapePolicy::default());

    let products = session.run().await;
    if products.is_empty() {
        println!("No products found.");
        return Ok(());
    }

    let reports = analyze_products(&products);
    for report in &reports {
        println!(
            "{} | ${:.0} | sentiment {:.2} ({} comments) | {}",
            report.product.name,
            report.product.price,
            report.sentiment.score,
            report.sentiment.comment_count,
            report.verdict.recommendation
        );
    }

    Ok(())
}
