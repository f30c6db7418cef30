use clap::{Parser, Subcommand};

use mealmap_places::{search_restaurants, GeoapifyClient, SearchParams};
use mealmap_scraper::{ChromiumBrowser, FileCache, OpenRiceScraper};

#[derive(Debug, Parser)]
#[command(name = "mealmap-cli")]
#[command(about = "Mealmap command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scrape review-site enrichment for one restaurant name.
    Scrape {
        /// Restaurant name to search for.
        name: String,
    },
    /// Search for restaurants near a coordinate pair.
    Search {
        #[arg(long)]
        lat: f64,
        #[arg(long)]
        lon: f64,
        #[arg(long, default_value_t = 2000)]
        radius: u32,
        #[arg(long, default_value_t = 30)]
        limit: u32,
        #[arg(long, default_value = "all")]
        cuisine: String,
    },
    /// Enrichment cache maintenance.
    Cache {
        #[command(subcommand)]
        command: CacheCommands,
    },
}

#[derive(Debug, Subcommand)]
enum CacheCommands {
    /// Report the number of cached entries.
    Stats,
    /// Drop every cached entry.
    Clear,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = mealmap_core::load_app_config()?;
    let cli = Cli::parse();

    match cli.command {
        Commands::Scrape { name } => {
            let engine =
                ChromiumBrowser::launch(config.scraper_headless, config.scraper_page_timeout_ms)
                    .await?;
            let scraper = OpenRiceScraper::new(
                engine,
                &config.openrice_base_url,
                config.scraper_max_retries,
                config.scraper_inter_request_delay_ms,
            );
            let record = scraper.scrape_restaurant(&name).await?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        Commands::Search {
            lat,
            lon,
            radius,
            limit,
            cuisine,
        } => {
            let client = GeoapifyClient::new(
                &config.geoapify_base_url,
                &config.geoapify_api_key,
                config.places_timeout_secs,
            )?;
            let params = SearchParams {
                position: mealmap_core::Position {
                    latitude: lat,
                    longitude: lon,
                },
                radius_meters: radius,
                limit,
                cuisine_filter: cuisine,
            };
            let restaurants = search_restaurants(&client, &params).await?;
            for (rank, restaurant) in restaurants.iter().enumerate() {
                println!(
                    "{:2}. {} ({:.0}m) [{}] health {}",
                    rank + 1,
                    restaurant.name,
                    restaurant.distance_meters,
                    restaurant.cuisine_types.join(", "),
                    restaurant.health_score,
                );
            }
        }
        Commands::Cache { command } => {
            let cache = FileCache::new(&config.cache_dir, config.cache_retention_hours);
            match command {
                CacheCommands::Stats => {
                    let stats = cache.stats().await;
                    println!(
                        "{} cached entries in {}",
                        stats.entries,
                        stats.directory.display()
                    );
                }
                CacheCommands::Clear => {
                    let removed = cache.clear().await?;
                    println!("cache cleared ({removed} entries removed)");
                }
            }
        }
    }

    Ok(())
}
