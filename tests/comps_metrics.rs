use remarket::comps::{compute_comp_metrics, CompsAssumptions};
use remarket::models::{
    Address, Dates, Facts, Hoa, ListingCategory, NormalizedListing, Pricing,
};

fn listing(category: ListingCategory, price: Option<f64>, sqft: Option<u32>) -> NormalizedListing {
    NormalizedListing {
        id: "prov:rentcast:test".into(),
        category,
        status: None,
        address: Address::default(),
        facts: Facts {
            sqft,
            ..Facts::default()
        },
        pricing: Pricing {
            list_price: price,
            ..Pricing::default()
        },
        dates: Dates::default(),
        hoa: Hoa::default(),
        distance_miles: None,
    }
}

#[test]
fn rental_row_with_purchase_price_assumption() {
    let rental = listing(ListingCategory::Rental, Some(2000.0), Some(1000));
    let assumptions = CompsAssumptions {
        purchase_price: Some(300_000.0),
        ..CompsAssumptions::default()
    };
    let row = compute_comp_metrics(&rental, &assumptions);

    assert_eq!(row.rent_per_sqft, Some(2.0));
    // Annual rent 24_000 over the assumed basis.
    assert!((row.gross_yield.unwrap() - 0.08).abs() < 1e-9);
    assert!((row.grm.unwrap() - 12.5).abs() < 1e-9);
    // Defaults: 5% vacancy, 8% + 8% of rent, no taxes/insurance/HOA.
    // (24_000 * 0.95 - 24_000 * 0.16) / 300_000
    assert!((row.cap_rate.unwrap() - 0.0632).abs() < 1e-9);
    // A rental has no sale price, so price-side ratios are undefined.
    assert_eq!(row.price_per_sqft, None);
    assert_eq!(row.rent_to_price, None);
}

#[test]
fn cap_rate_includes_fixed_expenses() {
    let rental = listing(ListingCategory::Rental, Some(2000.0), None);
    let assumptions = CompsAssumptions {
        purchase_price: Some(300_000.0),
        taxes_annual: Some(3_600.0),
        insurance_annual: Some(1_200.0),
        hoa_monthly: Some(100.0),
        ..CompsAssumptions::default()
    };
    let row = compute_comp_metrics(&rental, &assumptions);
    // op_ex = 24_000 * 0.16 + 3_600 + 1_200 + 1_200 = 9_840
    // (22_800 - 9_840) / 300_000
    assert!((row.cap_rate.unwrap() - 0.0432).abs() < 1e-9);
}

#[test]
fn sale_row_uses_listing_price_as_basis() {
    let sale = listing(ListingCategory::Sale, Some(250_000.0), Some(1250));
    let row = compute_comp_metrics(&sale, &CompsAssumptions::default());

    assert_eq!(row.price_per_sqft, Some(200.0));
    // No rent means every rent-derived ratio is undefined, not zero.
    assert_eq!(row.rent_per_sqft, None);
    assert_eq!(row.rent_to_price, None);
    assert_eq!(row.gross_yield, None);
    assert_eq!(row.cap_rate, None);
    assert_eq!(row.grm, None);
}

#[test]
fn zero_sqft_is_a_safe_division() {
    let sale = listing(ListingCategory::Sale, Some(250_000.0), Some(0));
    let row = compute_comp_metrics(&sale, &CompsAssumptions::default());
    assert_eq!(row.price_per_sqft, None);
}

#[test]
fn no_price_no_ratios() {
    let rental = listing(ListingCategory::Rental, None, Some(1000));
    let row = compute_comp_metrics(&rental, &CompsAssumptions::default());
    assert_eq!(row.rent_per_sqft, None);
    assert_eq!(row.gross_yield, None);
    assert_eq!(row.cap_rate, None);
    assert_eq!(row.grm, None);
}

#[test]
fn assumption_defaults_match_documented_values() {
    let a = CompsAssumptions::default();
    assert_eq!(a.vacancy_pct, 5.0);
    assert_eq!(a.maintenance_pct_of_rent, 8.0);
    assert_eq!(a.mgmt_pct_of_rent, 8.0);
    assert_eq!(a.purchase_price, None);
}

#[test]
fn assumptions_deserialize_with_defaults() {
    let a: CompsAssumptions = serde_json::from_str(r#"{"purchase_price": 500000}"#).unwrap();
    assert_eq!(a.purchase_price, Some(500_000.0));
    assert_eq!(a.vacancy_pct, 5.0);
}
