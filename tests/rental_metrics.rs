use remarket::models::{
    Address, Dates, Facts, Hoa, ListingCategory, NormalizedListing, Pricing,
};
use remarket::rental_metrics::compute_rental_metrics;
use remarket::MetricsConfig;

fn rental(id: &str, rent: Option<f64>, sqft: Option<u32>) -> NormalizedListing {
    NormalizedListing {
        id: id.into(),
        category: ListingCategory::Rental,
        status: None,
        address: Address::default(),
        facts: Facts {
            sqft,
            ..Facts::default()
        },
        pricing: Pricing {
            list_price: rent,
            ..Pricing::default()
        },
        dates: Dates::default(),
        hoa: Hoa::default(),
        distance_miles: None,
    }
}

#[test]
fn overall_and_grouping_end_to_end() {
    // Three rentals, same size, one with no property type.
    let mut a = rental("a", Some(1800.0), Some(1000));
    a.facts.property_type = Some("apartment".into());
    let mut b = rental("b", Some(2000.0), Some(1000));
    b.facts.property_type = Some("apartment".into());
    let c = rental("c", Some(2400.0), Some(1000));

    let metrics = compute_rental_metrics(&[a, b, c], None, &MetricsConfig::default());

    assert_eq!(metrics.overall.count, 3);
    assert_eq!(metrics.overall.median_rent, Some(2000.0));
    assert!((metrics.overall.median_rent_per_sqft.unwrap() - 2.0).abs() < 1e-9);
    assert_eq!(metrics.overall.min_rent, Some(1800.0));
    assert_eq!(metrics.overall.max_rent, Some(2400.0));

    // Lexicographic group order, missing type under "unknown".
    let types: Vec<&str> = metrics
        .property_type_metrics
        .iter()
        .map(|s| s.property_type.as_str())
        .collect();
    assert_eq!(types, vec!["apartment", "unknown"]);
    assert_eq!(metrics.property_type_metrics[0].count, 2);
    assert_eq!(metrics.property_type_metrics[1].count, 1);
    assert_eq!(metrics.property_type_metrics[1].median_rent, Some(2400.0));
}

#[test]
fn missing_fields_exclude_listings_from_aggregates_only() {
    let listings = vec![
        rental("a", Some(1500.0), None),
        rental("b", None, Some(800)),
        rental("c", Some(2500.0), Some(1000)),
    ];
    let metrics = compute_rental_metrics(&listings, None, &MetricsConfig::default());

    // Count covers everything; rent stats only the two priced listings;
    // rent-per-sqft only the one listing with both fields.
    assert_eq!(metrics.overall.count, 3);
    assert_eq!(metrics.overall.mean_rent, Some(2000.0));
    assert_eq!(metrics.overall.median_rent_per_sqft, Some(2.5));
}

#[test]
fn zero_sqft_never_produces_a_rent_per_sqft() {
    let listings = vec![rental("a", Some(1500.0), Some(0))];
    let metrics = compute_rental_metrics(&listings, None, &MetricsConfig::default());
    assert_eq!(metrics.overall.median_rent_per_sqft, None);
}

#[test]
fn distance_weighted_median_favors_near_listings() {
    let mut near = rental("near", Some(1000.0), None);
    near.distance_miles = Some(0.0);
    let mut mid = rental("mid", Some(2000.0), None);
    mid.distance_miles = Some(5.0);
    let mut far = rental("far", Some(3000.0), None);
    far.distance_miles = Some(10.0);

    let metrics = compute_rental_metrics(&[near, mid, far], None, &MetricsConfig::default());

    // Straight median would be 2000; the listing at distance 0 carries
    // weight 1/0.1 = 10 and alone crosses half the total weight.
    assert_eq!(
        metrics.distance.distance_weighted_median_rent,
        Some(1000.0)
    );
    assert_eq!(metrics.distance.median_distance_miles, Some(5.0));
}

#[test]
fn rent_distance_correlation_needs_two_pairs() {
    let mut only = rental("a", Some(1000.0), None);
    only.distance_miles = Some(1.0);
    let no_distance = rental("b", Some(2000.0), None);

    let metrics = compute_rental_metrics(&[only, no_distance], None, &MetricsConfig::default());
    assert_eq!(metrics.distance.rent_distance_correlation, None);
}

#[test]
fn rent_rises_with_distance_gives_positive_correlation() {
    let mut a = rental("a", Some(1000.0), None);
    a.distance_miles = Some(0.0);
    let mut b = rental("b", Some(2000.0), None);
    b.distance_miles = Some(5.0);
    let mut c = rental("c", Some(3000.0), None);
    c.distance_miles = Some(10.0);

    let metrics = compute_rental_metrics(&[a, b, c], None, &MetricsConfig::default());
    assert!((metrics.distance.rent_distance_correlation.unwrap() - 1.0).abs() < 1e-9);
}

#[test]
fn distance_computed_from_center_when_not_annotated() {
    let mut listing = rental("a", Some(1500.0), None);
    listing.address.lat = Some(0.0);
    listing.address.lon = Some(1.0);

    // One degree of longitude on the equator is ~69 miles.
    let metrics = compute_rental_metrics(
        &[listing],
        Some((0.0, 0.0)),
        &MetricsConfig::default(),
    );
    assert_eq!(metrics.distance.median_distance_miles, Some(69.0));
}

#[test]
fn clusters_by_zip_sorted_with_unknown_sentinel() {
    let mut a = rental("a", Some(1000.0), None);
    a.address.zip = Some("90210".into());
    let mut b = rental("b", Some(2000.0), None);
    b.address.zip = Some("10001".into());
    let c = rental("c", Some(3000.0), None);

    let metrics = compute_rental_metrics(&[a, b, c], None, &MetricsConfig::default());
    let keys: Vec<&str> = metrics
        .clusters_by_zip
        .iter()
        .map(|s| s.cluster_key.as_str())
        .collect();
    assert_eq!(keys, vec!["10001", "90210", "unknown"]);
    assert_eq!(metrics.clusters_by_zip[0].median_rent, Some(2000.0));
}

#[test]
fn empty_input_yields_undefined_not_zero() {
    let metrics = compute_rental_metrics(&[], None, &MetricsConfig::default());
    assert_eq!(metrics.overall.count, 0);
    assert_eq!(metrics.overall.median_rent, None);
    assert_eq!(metrics.overall.mean_days_on_market, None);
    assert_eq!(metrics.distance.median_distance_miles, None);
    assert!(metrics.property_type_metrics.is_empty());
    assert!(metrics.clusters_by_zip.is_empty());
}

#[test]
fn days_on_market_flows_into_overall_and_groups() {
    let mut a = rental("a", Some(1000.0), None);
    a.dates.listed = Some("2024-01-01".into());
    a.dates.removed = Some("2024-01-11".into());
    a.facts.property_type = Some("house".into());
    let mut b = rental("b", Some(2000.0), None);
    b.dates.listed = Some("2024-01-01".into());
    b.dates.last_seen = Some("2024-01-31".into());
    b.facts.property_type = Some("house".into());

    let metrics = compute_rental_metrics(&[a, b], None, &MetricsConfig::default());
    assert_eq!(metrics.overall.fastest_days_on_market, Some(10));
    assert_eq!(metrics.overall.slowest_days_on_market, Some(30));
    assert_eq!(metrics.overall.mean_days_on_market, Some(20.0));
    assert_eq!(
        metrics.property_type_metrics[0].mean_days_on_market,
        Some(20.0)
    );
}
