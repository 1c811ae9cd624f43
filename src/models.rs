use serde::{Deserialize, Serialize};

/// Listing category. Determines the unit of `list_price`: a monthly figure
/// for rentals, a total figure for sales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingCategory {
    Rental,
    Sale,
}

impl ListingCategory {
    pub fn pricing_period(&self) -> PricingPeriod {
        match self {
            ListingCategory::Rental => PricingPeriod::Monthly,
            ListingCategory::Sale => PricingPeriod::Total,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PricingPeriod {
    Monthly,
    Total,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub formatted: Option<String>,
    pub line1: Option<String>,
    pub line2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub county: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Facts {
    pub beds: Option<u32>,
    /// 0.5 increments (1.0, 1.5, 2.0, ...).
    pub baths: Option<f64>,
    pub sqft: Option<u32>,
    pub year_built: Option<i32>,
    pub property_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pricing {
    pub list_price: Option<f64>,
    pub currency: String,
    pub period: Option<PricingPeriod>,
    /// Annotated by the enrichment pass; `None` until then.
    pub price_per_sqft: Option<f64>,
}

impl Default for Pricing {
    fn default() -> Self {
        Self {
            list_price: None,
            currency: "USD".into(),
            period: None,
            price_per_sqft: None,
        }
    }
}

/// Provider date strings plus the values the enrichment pass derives from
/// them. The strings stay in whatever format the provider sent; parsing
/// happens in `dates`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dates {
    pub listed: Option<String>,
    pub removed: Option<String>,
    pub last_seen: Option<String>,
    pub days_on_market: Option<i64>,
    pub is_fresh: Option<bool>,
    pub is_stale: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hoa {
    pub monthly: Option<f64>,
    pub has_hoa: Option<bool>,
}

/// Canonical listing record used by every calculator (one row = one listing).
///
/// Absence is meaningful: an absent price, sqft, year or date excludes the
/// listing from the aggregates that need that field, never substituting zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedListing {
    pub id: String,
    pub category: ListingCategory,
    pub status: Option<String>,
    pub address: Address,
    pub facts: Facts,
    pub pricing: Pricing,
    pub dates: Dates,
    pub hoa: Hoa,
    /// Miles from the search center, annotated by the enrichment pass.
    pub distance_miles: Option<f64>,
}

/// Raw entry as returned by the listings provider.
///
/// The provider serializes some numerics as **strings** in older payloads;
/// we accept both string/number and normalize.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawListing {
    pub id: Option<String>,
    #[serde(rename = "formattedAddress")]
    pub formatted_address: Option<String>,
    #[serde(rename = "addressLine1")]
    pub address_line1: Option<String>,
    #[serde(rename = "addressLine2")]
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    #[serde(rename = "zipCode")]
    pub zip_code: Option<String>,
    pub county: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<f64>,
    #[serde(rename = "squareFootage")]
    pub square_footage: Option<u32>,
    #[serde(rename = "yearBuilt")]
    pub year_built: Option<i32>,
    #[serde(rename = "propertyType")]
    pub property_type: Option<String>,
    #[serde(default, deserialize_with = "de_opt_f64_from_string_or_number")]
    pub price: Option<f64>,
    pub status: Option<String>,
    #[serde(rename = "listedDate")]
    pub listed_date: Option<String>,
    #[serde(rename = "removedDate")]
    pub removed_date: Option<String>,
    #[serde(rename = "lastSeenDate")]
    pub last_seen_date: Option<String>,
    #[serde(
        rename = "hoaFee",
        default,
        deserialize_with = "de_opt_f64_from_string_or_number"
    )]
    pub hoa_fee: Option<f64>,
}

impl RawListing {
    /// Map a provider entry into the canonical schema. The pricing period is
    /// derived from `category`, never taken from the payload.
    pub fn into_normalized(self, category: ListingCategory) -> NormalizedListing {
        let id = format!("prov:rentcast:{}", self.id.as_deref().unwrap_or("unknown"));
        NormalizedListing {
            id,
            category,
            status: self.status,
            address: Address {
                formatted: self.formatted_address,
                line1: self.address_line1,
                line2: self.address_line2,
                city: self.city,
                state: self.state,
                zip: self.zip_code,
                county: self.county,
                lat: self.latitude,
                lon: self.longitude,
            },
            facts: Facts {
                beds: self.bedrooms,
                baths: self.bathrooms,
                sqft: self.square_footage,
                year_built: self.year_built,
                property_type: self.property_type,
            },
            pricing: Pricing {
                list_price: self.price,
                currency: "USD".into(),
                period: Some(category.pricing_period()),
                price_per_sqft: None,
            },
            dates: Dates {
                listed: self.listed_date,
                removed: self.removed_date,
                last_seen: self.last_seen_date,
                ..Dates::default()
            },
            hoa: Hoa {
                monthly: self.hoa_fee,
                has_hoa: None,
            },
            distance_miles: None,
        }
    }
}

/// Serde helper: parse `Option<f64>` from a JSON number, a string, or null.
fn de_opt_f64_from_string_or_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    struct OptF64Visitor;

    impl<'de> Visitor<'de> for OptF64Visitor {
        type Value = Option<f64>;

        fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            write!(f, "a number, a numeric string, or null")
        }

        fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(v))
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(v as f64))
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(v as f64))
        }

        fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            s.parse::<f64>().map(Some).map_err(E::custom)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_some<D2>(self, d: D2) -> Result<Self::Value, D2::Error>
        where
            D2: serde::Deserializer<'de>,
        {
            d.deserialize_any(OptF64Visitor)
        }
    }

    deserializer.deserialize_option(OptF64Visitor)
}
