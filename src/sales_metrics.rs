//! Sales market metrics.
//!
//! Pure computation over a slice of normalized sale listings: overall price
//! and price-per-sqft distributions, fixed-width histograms, size and age,
//! HOA fees, per-property-type and per-ZIP breakdowns, and Tukey-fence
//! outlier counts.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::MetricsConfig;
use crate::dates;
use crate::models::NormalizedListing;
use crate::rental_metrics::UNKNOWN_GROUP;
use crate::stats::{max_value, mean, median, min_value, percentile, ratio, stddev};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallSalesMetrics {
    pub listing_count: usize,
    pub median_price: Option<f64>,
    pub mean_price: Option<f64>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub p25_price: Option<f64>,
    pub p75_price: Option<f64>,
    pub stddev_price: Option<f64>,
    pub median_price_per_sqft: Option<f64>,
    pub mean_price_per_sqft: Option<f64>,
    pub min_price_per_sqft: Option<f64>,
    pub max_price_per_sqft: Option<f64>,
    pub p25_price_per_sqft: Option<f64>,
    pub p75_price_per_sqft: Option<f64>,
    pub stddev_price_per_sqft: Option<f64>,
    pub median_dom: Option<f64>,
    pub mean_dom: Option<f64>,
    pub min_dom: Option<i64>,
    pub max_dom: Option<i64>,
    pub p25_dom: Option<f64>,
    pub p75_dom: Option<f64>,
    /// Share of ALL listings (not just those with a known days-on-market)
    /// at or past the stale threshold.
    pub pct_stale_listings: Option<f64>,
    /// Share of all listings at or under the fresh threshold.
    pub pct_fresh_listings: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBucket {
    pub bucket_min: f64,
    pub bucket_max: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceDistributionMetrics {
    pub buckets: Vec<PriceBucket>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePerSqftDistributionMetrics {
    pub buckets: Vec<PriceBucket>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizeAndAgeMetrics {
    pub median_sqft: Option<f64>,
    pub mean_sqft: Option<f64>,
    pub min_sqft: Option<i64>,
    pub max_sqft: Option<i64>,
    pub p25_sqft: Option<f64>,
    pub p75_sqft: Option<f64>,
    pub median_year_built: Option<i32>,
    pub mean_year_built: Option<f64>,
    pub min_year_built: Option<i32>,
    pub max_year_built: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoaFeeMetrics {
    /// Fraction of listings with a known HOA fee (zero counts as known).
    pub pct_with_hoa: Option<f64>,
    pub median_hoa_monthly: Option<f64>,
    pub mean_hoa_monthly: Option<f64>,
    pub min_hoa_monthly: Option<f64>,
    pub max_hoa_monthly: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesPropertyTypeStats {
    pub property_type: String,
    pub count: usize,
    pub pct_of_inventory: Option<f64>,
    pub median_price: Option<f64>,
    pub median_price_per_sqft: Option<f64>,
    pub median_sqft: Option<f64>,
    pub median_year_built: Option<i32>,
    pub median_dom: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesZipClusterStats {
    pub zip: String,
    pub count: usize,
    pub median_price: Option<f64>,
    pub median_price_per_sqft: Option<f64>,
    pub median_sqft: Option<f64>,
    pub median_dom: Option<f64>,
    pub median_year_built: Option<i32>,
    pub centroid_lat: Option<f64>,
    pub centroid_lon: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesOutlierMetrics {
    pub low_price_outlier_count: usize,
    pub high_price_outlier_count: usize,
    pub low_price_per_sqft_outlier_count: usize,
    pub high_price_per_sqft_outlier_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesMarketMetrics {
    pub overall: OverallSalesMetrics,
    pub price_distribution: PriceDistributionMetrics,
    pub price_per_sqft_distribution: PricePerSqftDistributionMetrics,
    pub size_and_age: SizeAndAgeMetrics,
    pub hoa: HoaFeeMetrics,
    pub property_type_metrics: Vec<SalesPropertyTypeStats>,
    pub clusters_by_zip: Vec<SalesZipClusterStats>,
    pub outliers: SalesOutlierMetrics,
}

/// Compute sales market metrics over `listings`.
pub fn compute_sales_metrics(
    listings: &[NormalizedListing],
    config: &MetricsConfig,
) -> SalesMarketMetrics {
    let prices = collect_prices(listings);
    let price_per_sqft_values = collect_price_per_sqft(listings);
    let dom_values = collect_days_on_market(listings);
    let dom_f64: Vec<f64> = dom_values.iter().map(|&d| d as f64).collect();

    let stale_count = dom_values
        .iter()
        .filter(|&&d| d >= config.stale_threshold_days)
        .count();
    let fresh_count = dom_values
        .iter()
        .filter(|&&d| d <= config.fresh_threshold_days)
        .count();

    let overall = OverallSalesMetrics {
        listing_count: listings.len(),
        median_price: median(&prices),
        mean_price: mean(&prices),
        min_price: min_value(&prices),
        max_price: max_value(&prices),
        p25_price: percentile(&prices, 0.25),
        p75_price: percentile(&prices, 0.75),
        stddev_price: stddev(&prices),
        median_price_per_sqft: median(&price_per_sqft_values),
        mean_price_per_sqft: mean(&price_per_sqft_values),
        min_price_per_sqft: min_value(&price_per_sqft_values),
        max_price_per_sqft: max_value(&price_per_sqft_values),
        p25_price_per_sqft: percentile(&price_per_sqft_values, 0.25),
        p75_price_per_sqft: percentile(&price_per_sqft_values, 0.75),
        stddev_price_per_sqft: stddev(&price_per_sqft_values),
        median_dom: median(&dom_f64),
        mean_dom: mean(&dom_f64),
        min_dom: dom_values.iter().min().copied(),
        max_dom: dom_values.iter().max().copied(),
        p25_dom: percentile(&dom_f64, 0.25),
        p75_dom: percentile(&dom_f64, 0.75),
        pct_stale_listings: ratio(stale_count, listings.len()),
        pct_fresh_listings: ratio(fresh_count, listings.len()),
    };

    SalesMarketMetrics {
        overall,
        price_distribution: PriceDistributionMetrics {
            buckets: build_buckets(&prices, config.bucket_count),
        },
        price_per_sqft_distribution: PricePerSqftDistributionMetrics {
            buckets: build_buckets(&price_per_sqft_values, config.bucket_count),
        },
        size_and_age: build_size_and_age(listings),
        hoa: build_hoa_metrics(listings),
        property_type_metrics: build_property_type_metrics(listings),
        clusters_by_zip: build_zip_clusters(listings),
        outliers: build_outlier_metrics(&prices, &price_per_sqft_values, config.iqr_multiplier),
    }
}

fn collect_prices(listings: &[NormalizedListing]) -> Vec<f64> {
    listings
        .iter()
        .filter_map(|l| l.pricing.list_price)
        .collect()
}

fn collect_price_per_sqft(listings: &[NormalizedListing]) -> Vec<f64> {
    listings.iter().filter_map(price_per_sqft).collect()
}

fn price_per_sqft(listing: &NormalizedListing) -> Option<f64> {
    let price = listing.pricing.list_price?;
    match listing.facts.sqft {
        Some(sqft) if sqft != 0 => Some(price / f64::from(sqft)),
        _ => None,
    }
}

fn collect_days_on_market(listings: &[NormalizedListing]) -> Vec<i64> {
    listings
        .iter()
        .filter_map(|l| dates::days_on_market(&l.dates))
        .collect()
}

/// Equal-width histogram over `[lo, hi]`. Buckets are half-open except the
/// last one, which includes `hi`; identical values collapse into a single
/// `[lo, lo]` bucket; empty input yields no buckets.
fn build_buckets(values: &[f64], bucket_count: usize) -> Vec<PriceBucket> {
    let (Some(lo), Some(hi)) = (min_value(values), max_value(values)) else {
        return Vec::new();
    };
    if lo == hi {
        return vec![PriceBucket {
            bucket_min: lo,
            bucket_max: hi,
            count: values.len(),
        }];
    }

    let step = (hi - lo) / bucket_count as f64;
    let mut edges: Vec<f64> = (0..bucket_count).map(|i| lo + step * i as f64).collect();
    edges.push(hi);

    (0..bucket_count)
        .map(|idx| {
            let start = edges[idx];
            let end = edges[idx + 1];
            let last = idx == bucket_count - 1;
            let count = values
                .iter()
                .filter(|&&v| v >= start && (v < end || (last && v <= end)))
                .count();
            PriceBucket {
                bucket_min: start,
                bucket_max: end,
                count,
            }
        })
        .collect()
}

fn build_size_and_age(listings: &[NormalizedListing]) -> SizeAndAgeMetrics {
    // Zero sqft is provider noise, not a studio apartment.
    let sqft_values: Vec<f64> = listings
        .iter()
        .filter_map(|l| l.facts.sqft)
        .filter(|&v| v > 0)
        .map(f64::from)
        .collect();
    let year_values: Vec<f64> = listings
        .iter()
        .filter_map(|l| l.facts.year_built)
        .map(f64::from)
        .collect();

    SizeAndAgeMetrics {
        median_sqft: median(&sqft_values),
        mean_sqft: mean(&sqft_values),
        min_sqft: min_value(&sqft_values).map(|v| v as i64),
        max_sqft: max_value(&sqft_values).map(|v| v as i64),
        p25_sqft: percentile(&sqft_values, 0.25),
        p75_sqft: percentile(&sqft_values, 0.75),
        median_year_built: median_int(&year_values),
        mean_year_built: mean(&year_values),
        min_year_built: min_value(&year_values).map(|v| v as i32),
        max_year_built: max_value(&year_values).map(|v| v as i32),
    }
}

fn build_hoa_metrics(listings: &[NormalizedListing]) -> HoaFeeMetrics {
    let hoa_values: Vec<f64> = listings.iter().filter_map(|l| l.hoa.monthly).collect();
    HoaFeeMetrics {
        pct_with_hoa: ratio(hoa_values.len(), listings.len()),
        median_hoa_monthly: median(&hoa_values),
        mean_hoa_monthly: mean(&hoa_values),
        min_hoa_monthly: min_value(&hoa_values),
        max_hoa_monthly: max_value(&hoa_values),
    }
}

fn group_by<'a, F>(listings: &'a [NormalizedListing], key: F) -> BTreeMap<String, Vec<&'a NormalizedListing>>
where
    F: Fn(&NormalizedListing) -> Option<&String>,
{
    let mut groups: BTreeMap<String, Vec<&NormalizedListing>> = BTreeMap::new();
    for listing in listings {
        let group_key = key(listing).cloned().unwrap_or_else(|| UNKNOWN_GROUP.into());
        groups.entry(group_key).or_default().push(listing);
    }
    groups
}

fn build_property_type_metrics(listings: &[NormalizedListing]) -> Vec<SalesPropertyTypeStats> {
    let total = listings.len();
    group_by(listings, |l| l.facts.property_type.as_ref())
        .into_iter()
        .map(|(property_type, entries)| {
            let prices: Vec<f64> = entries.iter().filter_map(|e| e.pricing.list_price).collect();
            let ppsf: Vec<f64> = entries.iter().filter_map(|e| price_per_sqft(e)).collect();
            let sqft: Vec<f64> = entries
                .iter()
                .filter_map(|e| e.facts.sqft)
                .filter(|&v| v > 0)
                .map(f64::from)
                .collect();
            let years: Vec<f64> = entries
                .iter()
                .filter_map(|e| e.facts.year_built)
                .map(f64::from)
                .collect();
            let dom: Vec<f64> = entries
                .iter()
                .filter_map(|e| dates::days_on_market(&e.dates))
                .map(|d| d as f64)
                .collect();

            SalesPropertyTypeStats {
                property_type,
                count: entries.len(),
                pct_of_inventory: ratio(entries.len(), total),
                median_price: median(&prices),
                median_price_per_sqft: median(&ppsf),
                median_sqft: median(&sqft),
                median_year_built: median_int(&years),
                median_dom: median(&dom),
            }
        })
        .collect()
}

fn build_zip_clusters(listings: &[NormalizedListing]) -> Vec<SalesZipClusterStats> {
    group_by(listings, |l| l.address.zip.as_ref())
        .into_iter()
        .map(|(zip, entries)| {
            let prices: Vec<f64> = entries.iter().filter_map(|e| e.pricing.list_price).collect();
            let ppsf: Vec<f64> = entries.iter().filter_map(|e| price_per_sqft(e)).collect();
            let sqft: Vec<f64> = entries
                .iter()
                .filter_map(|e| e.facts.sqft)
                .filter(|&v| v > 0)
                .map(f64::from)
                .collect();
            let years: Vec<f64> = entries
                .iter()
                .filter_map(|e| e.facts.year_built)
                .map(f64::from)
                .collect();
            let dom: Vec<f64> = entries
                .iter()
                .filter_map(|e| dates::days_on_market(&e.dates))
                .map(|d| d as f64)
                .collect();
            let lats: Vec<f64> = entries.iter().filter_map(|e| e.address.lat).collect();
            let lons: Vec<f64> = entries.iter().filter_map(|e| e.address.lon).collect();

            SalesZipClusterStats {
                zip,
                count: entries.len(),
                median_price: median(&prices),
                median_price_per_sqft: median(&ppsf),
                median_sqft: median(&sqft),
                median_dom: median(&dom),
                median_year_built: median_int(&years),
                centroid_lat: mean(&lats),
                centroid_lon: mean(&lons),
            }
        })
        .collect()
}

fn build_outlier_metrics(
    prices: &[f64],
    price_per_sqft: &[f64],
    iqr_multiplier: f64,
) -> SalesOutlierMetrics {
    let (low_price, high_price) = iqr_bounds(prices, iqr_multiplier);
    let (low_ppsf, high_ppsf) = iqr_bounds(price_per_sqft, iqr_multiplier);

    SalesOutlierMetrics {
        low_price_outlier_count: count_below(prices, low_price),
        high_price_outlier_count: count_above(prices, high_price),
        low_price_per_sqft_outlier_count: count_below(price_per_sqft, low_ppsf),
        high_price_per_sqft_outlier_count: count_above(price_per_sqft, high_ppsf),
    }
}

/// Tukey fences `(Q1 - k*IQR, Q3 + k*IQR)`. Fewer than 4 values gives no
/// bounds, so all outlier counts stay 0.
fn iqr_bounds(values: &[f64], multiplier: f64) -> (Option<f64>, Option<f64>) {
    if values.len() < 4 {
        return (None, None);
    }
    let (Some(q1), Some(q3)) = (percentile(values, 0.25), percentile(values, 0.75)) else {
        return (None, None);
    };
    let iqr = q3 - q1;
    (Some(q1 - multiplier * iqr), Some(q3 + multiplier * iqr))
}

fn count_below(values: &[f64], bound: Option<f64>) -> usize {
    match bound {
        Some(b) => values.iter().filter(|&&v| v < b).count(),
        None => 0,
    }
}

fn count_above(values: &[f64], bound: Option<f64>) -> usize {
    match bound {
        Some(b) => values.iter().filter(|&&v| v > b).count(),
        None => 0,
    }
}

/// Median rounded to the nearest whole number (years, mostly).
fn median_int(values: &[f64]) -> Option<i32> {
    median(values).map(|m| m.round() as i32)
}
