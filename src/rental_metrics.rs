//! Regional rental market metrics.
//!
//! Pure computation over a slice of normalized rental listings: overall rent
//! distribution, rent/distance relationship, per-property-type breakdowns,
//! and per-ZIP clusters. No I/O, no shared state; every call aggregates into
//! its own locals, so concurrent invocations need no locking.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::MetricsConfig;
use crate::dates;
use crate::distance::haversine_miles;
use crate::models::NormalizedListing;
use crate::stats::{
    max_value, mean, median, min_value, pearson_correlation, percentile, safe_div,
};

/// Grouping sentinel for listings missing a property type or ZIP.
pub const UNKNOWN_GROUP: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallRentMetrics {
    pub count: usize,
    pub min_rent: Option<f64>,
    pub max_rent: Option<f64>,
    pub mean_rent: Option<f64>,
    pub median_rent: Option<f64>,
    pub p25_rent: Option<f64>,
    pub p75_rent: Option<f64>,
    pub min_rent_per_sqft: Option<f64>,
    pub max_rent_per_sqft: Option<f64>,
    pub mean_rent_per_sqft: Option<f64>,
    pub median_rent_per_sqft: Option<f64>,
    pub p25_rent_per_sqft: Option<f64>,
    pub p75_rent_per_sqft: Option<f64>,
    pub mean_days_on_market: Option<f64>,
    pub median_days_on_market: Option<f64>,
    pub fastest_days_on_market: Option<i64>,
    pub slowest_days_on_market: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceMetrics {
    pub median_distance_miles: Option<f64>,
    /// Pearson correlation between rent and distance, over listings where
    /// both are defined. Requires at least 2 such pairs.
    pub rent_distance_correlation: Option<f64>,
    /// Median rent with each listing weighted by `1 / (|distance| + eps)`,
    /// so nearby listings dominate.
    pub distance_weighted_median_rent: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyTypeStats {
    pub property_type: String,
    pub count: usize,
    pub median_rent: Option<f64>,
    pub median_rent_per_sqft: Option<f64>,
    pub median_sqft: Option<f64>,
    pub mean_days_on_market: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterRentStats {
    pub cluster_key: String,
    pub count: usize,
    pub median_rent: Option<f64>,
    pub median_rent_per_sqft: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentalMarketMetrics {
    pub overall: OverallRentMetrics,
    pub distance: DistanceMetrics,
    pub property_type_metrics: Vec<PropertyTypeStats>,
    pub clusters_by_zip: Vec<ClusterRentStats>,
}

/// Per-listing values carried into the grouped aggregations.
#[derive(Debug, Clone, Copy)]
struct RentObservation {
    rent: Option<f64>,
    rent_per_sqft: Option<f64>,
    sqft: Option<f64>,
    dom: Option<f64>,
}

/// Compute regional rental metrics over `rentals`, optionally relative to a
/// search center `(lat, lon)`.
///
/// Category is not enforced here; passing sale listings simply treats their
/// total prices as rents. Listings missing a field are excluded from the
/// aggregates that need it, never zero-filled.
pub fn compute_rental_metrics(
    rentals: &[NormalizedListing],
    center: Option<(f64, f64)>,
    config: &MetricsConfig,
) -> RentalMarketMetrics {
    let mut rents: Vec<f64> = Vec::new();
    let mut rent_per_sqft_values: Vec<f64> = Vec::new();
    let mut dom_values: Vec<i64> = Vec::new();
    let mut distance_values: Vec<f64> = Vec::new();
    let mut rent_distance_pairs: Vec<(f64, f64)> = Vec::new();

    let mut property_groups: BTreeMap<String, Vec<RentObservation>> = BTreeMap::new();
    let mut zip_groups: BTreeMap<String, Vec<RentObservation>> = BTreeMap::new();

    for listing in rentals {
        let rent = listing.pricing.list_price;
        let sqft = positive_sqft(listing.facts.sqft);
        let rent_per_sqft = safe_div(rent, sqft);
        let dom = dates::days_on_market(&listing.dates);
        let distance = listing_distance(listing, center);

        if let Some(r) = rent {
            rents.push(r);
        }
        if let Some(rps) = rent_per_sqft {
            rent_per_sqft_values.push(rps);
        }
        if let Some(d) = dom {
            dom_values.push(d);
        }
        if let Some(dist) = distance {
            distance_values.push(dist);
            if let Some(r) = rent {
                rent_distance_pairs.push((r, dist));
            }
        }

        let observation = RentObservation {
            rent,
            rent_per_sqft,
            sqft,
            dom: dom.map(|d| d as f64),
        };
        let property_key = listing
            .facts
            .property_type
            .clone()
            .unwrap_or_else(|| UNKNOWN_GROUP.into());
        property_groups.entry(property_key).or_default().push(observation);

        let zip_key = listing
            .address
            .zip
            .clone()
            .unwrap_or_else(|| UNKNOWN_GROUP.into());
        zip_groups.entry(zip_key).or_default().push(observation);
    }

    let dom_f64: Vec<f64> = dom_values.iter().map(|&d| d as f64).collect();

    let overall = OverallRentMetrics {
        count: rentals.len(),
        min_rent: min_value(&rents),
        max_rent: max_value(&rents),
        mean_rent: mean(&rents),
        median_rent: median(&rents),
        p25_rent: percentile(&rents, 0.25),
        p75_rent: percentile(&rents, 0.75),
        min_rent_per_sqft: min_value(&rent_per_sqft_values),
        max_rent_per_sqft: max_value(&rent_per_sqft_values),
        mean_rent_per_sqft: mean(&rent_per_sqft_values),
        median_rent_per_sqft: median(&rent_per_sqft_values),
        p25_rent_per_sqft: percentile(&rent_per_sqft_values, 0.25),
        p75_rent_per_sqft: percentile(&rent_per_sqft_values, 0.75),
        mean_days_on_market: mean(&dom_f64),
        median_days_on_market: median(&dom_f64),
        fastest_days_on_market: dom_values.iter().min().copied(),
        slowest_days_on_market: dom_values.iter().max().copied(),
    };

    let distance = DistanceMetrics {
        median_distance_miles: median(&distance_values),
        rent_distance_correlation: pearson_correlation(&rent_distance_pairs),
        distance_weighted_median_rent: distance_weighted_median(
            &rent_distance_pairs,
            config.distance_epsilon,
        ),
    };

    let property_type_metrics = property_groups
        .into_iter()
        .map(|(property_type, entries)| build_property_stats(property_type, &entries))
        .collect();

    let clusters_by_zip = zip_groups
        .into_iter()
        .map(|(cluster_key, entries)| build_cluster_stats(cluster_key, &entries))
        .collect();

    RentalMarketMetrics {
        overall,
        distance,
        property_type_metrics,
        clusters_by_zip,
    }
}

fn positive_sqft(sqft: Option<u32>) -> Option<f64> {
    match sqft {
        Some(v) if v > 0 => Some(f64::from(v)),
        _ => None,
    }
}

/// Distance for one listing: the pre-annotated value wins; otherwise compute
/// from the center and the listing's own coordinates when all are known.
fn listing_distance(listing: &NormalizedListing, center: Option<(f64, f64)>) -> Option<f64> {
    if listing.distance_miles.is_some() {
        return listing.distance_miles;
    }
    let (center_lat, center_lon) = center?;
    let lat = listing.address.lat?;
    let lon = listing.address.lon?;
    Some(haversine_miles(center_lat, center_lon, lat, lon))
}

/// Weighted median over `(rent, distance)` pairs with weight
/// `1 / (|distance| + epsilon)`: walking rents in ascending order, the first
/// rent at which cumulative weight reaches half the total.
fn distance_weighted_median(pairs: &[(f64, f64)], epsilon: f64) -> Option<f64> {
    if pairs.is_empty() {
        return None;
    }
    let mut weighted: Vec<(f64, f64)> = pairs
        .iter()
        .map(|&(rent, distance)| (rent, 1.0 / (distance.abs() + epsilon)))
        .collect();
    let total_weight: f64 = weighted.iter().map(|&(_, w)| w).sum();
    if total_weight == 0.0 {
        return None;
    }

    weighted.sort_by(|a, b| a.0.total_cmp(&b.0));
    let threshold = total_weight / 2.0;
    let mut running = 0.0;
    for &(rent, weight) in &weighted {
        running += weight;
        if running >= threshold {
            return Some(rent);
        }
    }
    weighted.last().map(|&(rent, _)| rent)
}

fn build_property_stats(property_type: String, entries: &[RentObservation]) -> PropertyTypeStats {
    let rents: Vec<f64> = entries.iter().filter_map(|e| e.rent).collect();
    let rent_per_sqft: Vec<f64> = entries.iter().filter_map(|e| e.rent_per_sqft).collect();
    let sqft: Vec<f64> = entries.iter().filter_map(|e| e.sqft).collect();
    let dom: Vec<f64> = entries.iter().filter_map(|e| e.dom).collect();

    PropertyTypeStats {
        property_type,
        count: entries.len(),
        median_rent: median(&rents),
        median_rent_per_sqft: median(&rent_per_sqft),
        median_sqft: median(&sqft),
        mean_days_on_market: mean(&dom),
    }
}

fn build_cluster_stats(cluster_key: String, entries: &[RentObservation]) -> ClusterRentStats {
    let rents: Vec<f64> = entries.iter().filter_map(|e| e.rent).collect();
    let rent_per_sqft: Vec<f64> = entries.iter().filter_map(|e| e.rent_per_sqft).collect();

    ClusterRentStats {
        cluster_key,
        count: entries.len(),
        median_rent: median(&rents),
        median_rent_per_sqft: median(&rent_per_sqft),
    }
}
