use remarket::models::{ListingCategory, PricingPeriod, RawListing};

#[test]
fn parse_sample_payload() {
    let sample = r#"
    [
      {
        "id": "123-Main-St",
        "formattedAddress": "123 Main St, Austin, TX 73301",
        "addressLine1": "123 Main St",
        "city": "Austin",
        "state": "TX",
        "zipCode": "73301",
        "latitude": 30.2672,
        "longitude": -97.7431,
        "bedrooms": 3,
        "bathrooms": 2.5,
        "squareFootage": 1850,
        "yearBuilt": 1998,
        "propertyType": "Single Family",
        "price": 2400,
        "status": "Active",
        "listedDate": "2024-01-05T00:00:00.000Z",
        "lastSeenDate": "2024-02-01T00:00:00.000Z",
        "hoaFee": null
      },
      {
        "id": "456-Oak-Ave",
        "zipCode": "73301",
        "price": "529000",
        "hoaFee": "75"
      }
    ]
    "#;

    let entries: Vec<RawListing> = serde_json::from_str(sample).unwrap();
    assert_eq!(entries.len(), 2);

    let rental = entries[0].clone().into_normalized(ListingCategory::Rental);
    assert_eq!(rental.id, "prov:rentcast:123-Main-St");
    assert_eq!(rental.address.zip.as_deref(), Some("73301"));
    assert_eq!(rental.facts.beds, Some(3));
    assert_eq!(rental.facts.baths, Some(2.5));
    assert_eq!(rental.facts.sqft, Some(1850));
    assert_eq!(rental.pricing.list_price, Some(2400.0));
    assert_eq!(rental.pricing.period, Some(PricingPeriod::Monthly));
    assert_eq!(rental.hoa.monthly, None);
    assert_eq!(rental.distance_miles, None);

    // Older payloads encode numerics as strings; both forms are accepted.
    let sale = entries[1].clone().into_normalized(ListingCategory::Sale);
    assert_eq!(sale.pricing.list_price, Some(529_000.0));
    assert_eq!(sale.pricing.period, Some(PricingPeriod::Total));
    assert_eq!(sale.hoa.monthly, Some(75.0));
}

#[test]
fn missing_id_maps_to_unknown() {
    let raw: RawListing = serde_json::from_str(r#"{"price": 1000}"#).unwrap();
    let listing = raw.into_normalized(ListingCategory::Rental);
    assert_eq!(listing.id, "prov:rentcast:unknown");
}

#[test]
fn period_is_derived_from_category_not_payload() {
    let raw: RawListing = serde_json::from_str(r#"{"id": "x", "price": 1000}"#).unwrap();
    let as_rental = raw.clone().into_normalized(ListingCategory::Rental);
    let as_sale = raw.into_normalized(ListingCategory::Sale);
    assert_eq!(as_rental.pricing.period, Some(PricingPeriod::Monthly));
    assert_eq!(as_sale.pricing.period, Some(PricingPeriod::Total));
}

#[test]
fn normalized_listing_round_trips_through_json() {
    let raw: RawListing =
        serde_json::from_str(r#"{"id": "x", "price": 1000, "zipCode": "73301"}"#).unwrap();
    let listing = raw.into_normalized(ListingCategory::Rental);
    let json = serde_json::to_string(&listing).unwrap();
    let back: remarket::NormalizedListing = serde_json::from_str(&json).unwrap();
    assert_eq!(listing, back);
}
