//! Command-line runner for the catalog extractor.
//!
//! ```text
//! qidian-catalog book <id>
//! qidian-catalog category [sub-category name] [page]
//! qidian-catalog search [sub-category name] [page]
//! ```
//!
//! Results are printed to stdout as pretty JSON.

use anyhow::{Context, Result, bail};
use tokio_util::sync::CancellationToken;
use tracing::info;

use qidian_catalog::infrastructure::{AppConfig, HttpClient, init_logging_with_config};
use qidian_catalog::{CatalogService, CategorySearch, Search, SubCategory};

const USAGE: &str = "usage: qidian-catalog <book <id> | category [sub-category] [page] | search [sub-category] [page]>";

/// Optional sub-category name followed by an optional page number
fn listing_args(args: &[String]) -> Result<(SubCategory, u32)> {
    let sub_category = match args.first() {
        Some(name) => {
            let sub_category = SubCategory::from_name(name);
            if sub_category.is_empty() {
                bail!("unknown sub-category '{}'", name);
            }
            sub_category
        }
        None => SubCategory::default(),
    };
    let page = args
        .get(1)
        .map(|page| page.parse::<u32>())
        .transpose()
        .context("page must be a positive number")?
        .unwrap_or(1);
    Ok((sub_category, page))
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load_default().context("Failed to load configuration")?;
    init_logging_with_config(config.logging.clone()).context("Failed to initialize logging")?;

    let client = HttpClient::new(config.http.clone())?;
    let service = CatalogService::with_config(client, &config.parsing)?;

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });

    let args: Vec<String> = std::env::args().skip(1).collect();
    let output = match args.split_first() {
        Some((command, rest)) if command == "book" => {
            let id = rest.first().context(USAGE)?;
            serde_json::to_string_pretty(&service.fetch_book(id, &cancel).await?)?
        }
        Some((command, rest)) if command == "category" => {
            let (sub_category, page) = listing_args(rest)?;
            let search = CategorySearch::builder()
                .sub_category(sub_category)
                .page(page)
                .build()?;
            info!("Running category search: {}", search.url());
            serde_json::to_string_pretty(&service.execute_category_search(&search, &cancel).await?)?
        }
        Some((command, rest)) if command == "search" => {
            let (sub_category, page) = listing_args(rest)?;
            let search = Search::builder()
                .sub_category(sub_category)
                .page(page)
                .build();
            info!("Running search: {}", search.url());
            serde_json::to_string_pretty(&service.execute_search(&search, &cancel).await?)?
        }
        _ => bail!(USAGE),
    };

    println!("{output}");
    Ok(())
}
