pub mod browser;
pub mod cache;
pub mod enrich;
pub mod error;
pub mod matching;
pub mod parse;
pub mod scrape;

pub use browser::{BrowserEngine, ChromiumBrowser};
pub use cache::{CacheError, CacheStats, FileCache};
pub use enrich::{Enricher, EnrichmentOutcome, FlightRegistry, RestaurantScraper, UnavailableScraper};
pub use error::ScrapeError;
pub use scrape::OpenRiceScraper;
