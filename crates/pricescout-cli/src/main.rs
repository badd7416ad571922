//! Command-line front end: runs one search fan-out and reports the results.
//!
//! All extraction and orchestration logic lives in `pricescout-scraper`;
//! this binary only parses arguments, wires configuration, prints a summary,
//! and optionally writes the records as JSON.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use pricescout_core::{default_sites, load_sites, ProductRecord, SiteId};
use pricescout_scraper::SearchManager;

#[derive(Debug, Parser)]
#[command(name = "pricescout-cli")]
#[command(about = "Search products across e-commerce storefronts")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search the configured storefronts for a product.
    Search {
        /// Product search term.
        query: String,

        /// Maximum results collected per storefront.
        #[arg(long, default_value_t = 10)]
        max_results: usize,

        /// Comma-separated site identifiers (amazon, flipkart, chroma,
        /// reliance), or "all".
        #[arg(long, default_value = "all", value_delimiter = ',')]
        sites: Vec<String>,

        /// Write the records as pretty JSON to this path.
        #[arg(long)]
        output: Option<PathBuf>,

        /// Write the records to a timestamped JSON file in the current
        /// directory (ignored when --output is given).
        #[arg(long)]
        save: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Search {
            query,
            max_results,
            sites,
            output,
            save,
        } => run_search(&query, max_results, &sites, output, save).await,
    }
}

async fn run_search(
    query: &str,
    max_results: usize,
    sites: &[String],
    output: Option<PathBuf>,
    save: bool,
) -> anyhow::Result<()> {
    if query.trim().is_empty() {
        anyhow::bail!("search query must not be empty");
    }
    if max_results == 0 {
        anyhow::bail!("--max-results must be positive");
    }

    let app_config = pricescout_core::load_app_config()?;
    let site_configs = match &app_config.sites_path {
        Some(path) => load_sites(path)?.sites,
        None => default_sites(),
    };
    let manager = SearchManager::new(site_configs, &app_config)
        .map_err(|e| anyhow::anyhow!("failed to build search manager: {e}"))?;

    let site_filter = resolve_site_filter(sites);
    tracing::info!(query, max_results, "starting search");
    let records = manager
        .search_all(query, max_results, site_filter.as_deref())
        .await;

    print_summary(query, &records);

    let path = output.or_else(|| save.then(|| PathBuf::from(output_filename(query))));
    if let Some(path) = path {
        write_records(&path, &records)?;
        println!("results written to {}", path.display());
    }

    Ok(())
}

/// Maps the `--sites` argument to the manager's site filter: the `all`
/// sentinel (or an empty list) selects every configured site.
fn resolve_site_filter(sites: &[String]) -> Option<Vec<String>> {
    if sites.is_empty() || sites.iter().any(|s| s.eq_ignore_ascii_case("all")) {
        None
    } else {
        Some(sites.to_vec())
    }
}

/// Timestamped default output name, e.g. `products_coffee_maker_20260828_141503.json`.
fn output_filename(query: &str) -> String {
    let slug = query.trim().replace(' ', "_");
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    format!("products_{slug}_{timestamp}.json")
}

fn write_records(path: &Path, records: &[ProductRecord]) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(records)?;
    std::fs::write(path, json)
        .map_err(|e| anyhow::anyhow!("failed to write {}: {e}", path.display()))?;
    Ok(())
}

/// Per-site record count and average price, in first-appearance order.
fn summarize(records: &[ProductRecord]) -> Vec<(SiteId, usize, f64)> {
    let mut summary: Vec<(SiteId, usize, f64)> = Vec::new();
    for record in records {
        match summary.iter_mut().find(|(id, _, _)| *id == record.website) {
            Some((_, count, sum)) => {
                *count += 1;
                *sum += record.price;
            }
            None => summary.push((record.website, 1, record.price)),
        }
    }
    summary
        .into_iter()
        .map(|(id, count, sum)| (id, count, sum / count as f64))
        .collect()
}

fn print_summary(query: &str, records: &[ProductRecord]) {
    if records.is_empty() {
        println!("no products found for '{query}'");
        return;
    }

    println!("found {} products for '{query}'", records.len());
    for (site, count, avg_price) in summarize(records) {
        println!("  {site}: {count} products (avg price: {avg_price:.2})");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(website: SiteId, price: f64) -> ProductRecord {
        ProductRecord {
            website,
            name: "Test".to_owned(),
            price,
            rating: None,
            reviews: "N/A".to_owned(),
            url: "N/A".to_owned(),
            search_query: "test".to_owned(),
        }
    }

    #[test]
    fn all_sentinel_selects_every_site() {
        assert_eq!(resolve_site_filter(&["all".to_owned()]), None);
        assert_eq!(resolve_site_filter(&["ALL".to_owned()]), None);
        assert_eq!(resolve_site_filter(&[]), None);
    }

    #[test]
    fn explicit_sites_pass_through() {
        let sites = vec!["amazon".to_owned(), "flipkart".to_owned()];
        assert_eq!(resolve_site_filter(&sites), Some(sites.clone()));
    }

    #[test]
    fn all_mixed_with_sites_still_selects_every_site() {
        let sites = vec!["amazon".to_owned(), "all".to_owned()];
        assert_eq!(resolve_site_filter(&sites), None);
    }

    #[test]
    fn output_filename_slugs_spaces() {
        let name = output_filename("coffee maker");
        assert!(name.starts_with("products_coffee_maker_"));
        assert!(name.ends_with(".json"));
    }

    #[test]
    fn summary_groups_by_site_in_first_appearance_order() {
        let records = vec![
            record(SiteId::Flipkart, 100.0),
            record(SiteId::Flipkart, 300.0),
            record(SiteId::Amazon, 50.0),
        ];
        let summary = summarize(&records);
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].0, SiteId::Flipkart);
        assert_eq!(summary[0].1, 2);
        assert!((summary[0].2 - 200.0).abs() < f64::EPSILON);
        assert_eq!(summary[1].0, SiteId::Amazon);
        assert_eq!(summary[1].1, 1);
    }
}
