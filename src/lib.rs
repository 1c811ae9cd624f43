//! remarket
//!
//! A lightweight Rust library for fetching, normalizing, enriching, and
//! summarizing real-estate listing data (rentals and sales).
//!
//! ### Features
//! - Fetch rental/sale listings around an address or coordinate from the
//!   upstream provider, normalized into one canonical schema
//! - Enrich listings with distance, price-per-sqft, and days-on-market
//! - Regional rental metrics: rent distribution, rent/distance correlation,
//!   per-property-type and per-ZIP breakdowns
//! - Sales market metrics: price distributions, histograms, HOA and
//!   size/age statistics, outlier counts
//! - Per-listing investment ratios (comps): gross yield, cap rate, GRM
//!
//! ### Example
//! ```no_run
//! use remarket::{Client, MetricsConfig};
//! use remarket::api::SearchQuery;
//!
//! let client = Client::new("api-key".into());
//! let query = SearchQuery::at_point(34.05, -118.24, 5.0);
//! let mut rentals = client.fetch_rentals(&query)?;
//!
//! let config = MetricsConfig::default();
//! remarket::enrich::enrich_listings(&mut rentals, Some(34.05), Some(-118.24), &config);
//! let metrics = remarket::compute_rental_metrics(&rentals, Some((34.05, -118.24)), &config);
//! println!("{:#?}", metrics.overall.median_rent);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod api;
pub mod cache;
pub mod comps;
pub mod config;
pub mod dates;
pub mod distance;
pub mod enrich;
pub mod models;
pub mod rental_metrics;
pub mod sales_metrics;
pub mod stats;

pub use api::Client;
pub use comps::{compute_comp_metrics, CompsAssumptions};
pub use config::MetricsConfig;
pub use models::{ListingCategory, NormalizedListing};
pub use rental_metrics::{compute_rental_metrics, RentalMarketMetrics};
pub use sales_metrics::{compute_sales_metrics, SalesMarketMetrics};
