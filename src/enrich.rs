//! Pre-metrics enrichment pass.
//!
//! Runs once per result set, after normalization and before the calculators:
//! annotates price-per-sqft, days-on-market with fresh/stale flags, the
//! has-HOA flag, and distance from the search center. The calculators
//! themselves never mutate listings.

use crate::config::MetricsConfig;
use crate::dates;
use crate::distance::haversine_miles;
use crate::models::NormalizedListing;
use crate::stats::safe_div;

pub fn enrich_listings(
    listings: &mut [NormalizedListing],
    center_lat: Option<f64>,
    center_lon: Option<f64>,
    config: &MetricsConfig,
) {
    for listing in listings {
        annotate_price_per_sqft(listing);
        annotate_dom_flags(listing, config);
        annotate_hoa(listing);
        annotate_distance(listing, center_lat, center_lon);
    }
}

fn annotate_price_per_sqft(listing: &mut NormalizedListing) {
    let price = listing.pricing.list_price;
    let sqft = listing.facts.sqft.map(f64::from);
    listing.pricing.price_per_sqft = safe_div(price, sqft);
}

fn annotate_dom_flags(listing: &mut NormalizedListing, config: &MetricsConfig) {
    if listing.dates.days_on_market.is_none() {
        listing.dates.days_on_market = dates::days_on_market(&listing.dates);
    }
    let dom = listing.dates.days_on_market;
    listing.dates.is_fresh = dom.map(|d| d <= config.fresh_threshold_days);
    listing.dates.is_stale = dom.map(|d| d >= config.stale_threshold_days);
}

fn annotate_hoa(listing: &mut NormalizedListing) {
    listing.hoa.has_hoa = listing.hoa.monthly.map(|monthly| monthly != 0.0);
}

fn annotate_distance(
    listing: &mut NormalizedListing,
    center_lat: Option<f64>,
    center_lon: Option<f64>,
) {
    let (Some(center_lat), Some(center_lon)) = (center_lat, center_lon) else {
        return;
    };
    let (Some(lat), Some(lon)) = (listing.address.lat, listing.address.lon) else {
        return;
    };
    listing.distance_miles = Some(haversine_miles(center_lat, center_lon, lat, lon));
}
