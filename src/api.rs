//! Synchronous client for the upstream **listings provider** (RentCast-style
//! REST API).
//!
//! Returns results as canonical `models::NormalizedListing` rows. Transient
//! server errors are retried with a short backoff; everything else maps onto
//! the `ProviderError` taxonomy.
//!
//! Typical usage:
//! ```no_run
//! # use remarket::api::{Client, SearchQuery};
//! let client = Client::new("api-key".into());
//! let query = SearchQuery::at_point(34.05, -118.24, 5.0);
//! let rentals = client.fetch_rentals(&query)?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use crate::models::{ListingCategory, NormalizedListing, RawListing};
use anyhow::{Context, Result};
use log::{debug, warn};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};
use reqwest::blocking::Client as HttpClient;
use reqwest::redirect::Policy;
use reqwest::StatusCode;
use std::time::Duration;

/// Provider failure taxonomy. Retry decisions and caller-facing status
/// mapping key off these variants, not raw HTTP codes.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("provider did not respond before timeout")]
    Timeout,
    #[error("provider rate limit exceeded (HTTP 429)")]
    RateLimit,
    #[error("provider rejected credentials (HTTP {0})")]
    Auth(u16),
    #[error("provider rejected request (HTTP {0})")]
    Client(u16),
    #[error("provider server error (HTTP {0})")]
    Server(u16),
    #[error("network error: {0}")]
    Network(String),
    #[error("malformed provider payload: {0}")]
    Parsing(String),
}

/// Search parameters accepted by the provider's listing endpoints.
///
/// Location precedence follows the provider: lat/lon+radius, then address,
/// then city+state, then ZIP. Range filters use the provider's `min:max`
/// syntax (`*` for an open end), e.g. `"2:*"` for two or more bedrooms.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchQuery {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub radius_miles: Option<f64>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub bedrooms: Option<String>,
    pub bathrooms: Option<String>,
    pub days_old: Option<String>,
    pub limit: Option<u32>,
}

impl SearchQuery {
    /// Query centered on a coordinate with a search radius in miles.
    pub fn at_point(latitude: f64, longitude: f64, radius_miles: f64) -> Self {
        Self {
            latitude: Some(latitude),
            longitude: Some(longitude),
            radius_miles: Some(radius_miles),
            ..Self::default()
        }
    }
}

// Allow -, _, ., :, * unescaped (range syntax and lookback windows use them)
const SAFE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b':')
    .remove(b'*');

fn enc(value: &str) -> String {
    percent_encoding::utf8_percent_encode(value.trim(), SAFE).to_string()
}

const DEFAULT_RADIUS_MILES: f64 = 5.0;
const DEFAULT_DAYS_OLD: &str = "*:270";
const REQUEST_CAP: u32 = 100;

#[derive(Debug, Clone)]
pub struct Client {
    pub rental_url: String,
    pub sale_url: String,
    api_key: String,
    http: HttpClient,
}

impl Client {
    pub fn new(api_key: String) -> Self {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(12)) // total request timeout
            .connect_timeout(Duration::from_secs(5)) // connect timeout
            .redirect(Policy::limited(5)) // cap redirects
            .user_agent(concat!("remarket/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("reqwest client build");
        Self {
            rental_url: "https://api.rentcast.io/v1/listings/rental/long-term".into(),
            sale_url: "https://api.rentcast.io/v1/listings/sale".into(),
            api_key,
            http,
        }
    }

    /// Fetch rental listings matching `query`, normalized.
    pub fn fetch_rentals(&self, query: &SearchQuery) -> Result<Vec<NormalizedListing>> {
        self.fetch(ListingCategory::Rental, query)
    }

    /// Fetch sale listings matching `query`, normalized.
    pub fn fetch_sales(&self, query: &SearchQuery) -> Result<Vec<NormalizedListing>> {
        self.fetch(ListingCategory::Sale, query)
    }

    fn fetch(
        &self,
        category: ListingCategory,
        query: &SearchQuery,
    ) -> Result<Vec<NormalizedListing>> {
        let endpoint = match category {
            ListingCategory::Rental => &self.rental_url,
            ListingCategory::Sale => &self.sale_url,
        };
        let url = format!("{}?{}", endpoint, build_query_string(query)?);
        debug!("fetching {:?} listings: {}", category, url);

        let raw = self
            .get_listings(&url)
            .with_context(|| format!("GET {}", url))?;
        Ok(raw
            .into_iter()
            .map(|r| r.into_normalized(category))
            .collect())
    }

    /// One GET with a small retry for transient failures (5xx).
    fn get_listings(&self, url: &str) -> Result<Vec<RawListing>, ProviderError> {
        let mut last_err = ProviderError::Network("no attempt made".into());
        for backoff_ms in [100u64, 300, 700] {
            match self
                .http
                .get(url)
                .header("X-Api-Key", &self.api_key)
                .header("accept", "application/json")
                .send()
            {
                Ok(r) if r.status().is_success() => {
                    return r
                        .json::<Vec<RawListing>>()
                        .map_err(|e| ProviderError::Parsing(e.to_string()));
                }
                Ok(r) if r.status().is_server_error() => {
                    warn!("provider returned HTTP {}, retrying", r.status());
                    last_err = classify_status(r.status());
                }
                Ok(r) => return Err(classify_status(r.status())),
                Err(e) if e.is_timeout() => return Err(ProviderError::Timeout),
                Err(e) => last_err = ProviderError::Network(e.to_string()),
            }
            std::thread::sleep(Duration::from_millis(backoff_ms));
        }
        Err(last_err)
    }
}

fn classify_status(status: StatusCode) -> ProviderError {
    let code = status.as_u16();
    match code {
        408 => ProviderError::Timeout,
        429 => ProviderError::RateLimit,
        401 | 403 => ProviderError::Auth(code),
        400..=499 => ProviderError::Client(code),
        _ => ProviderError::Server(code),
    }
}

/// Assemble the provider query string, applying location precedence and the
/// provider's request cap.
fn build_query_string(query: &SearchQuery) -> Result<String> {
    let mut params: Vec<(String, String)> = Vec::new();

    if let (Some(lat), Some(lon)) = (query.latitude, query.longitude) {
        params.push(("latitude".into(), lat.to_string()));
        params.push(("longitude".into(), lon.to_string()));
        params.push((
            "radius".into(),
            query.radius_miles.unwrap_or(DEFAULT_RADIUS_MILES).to_string(),
        ));
    } else if let Some(address) = &query.address {
        params.push(("address".into(), enc(address)));
        params.push((
            "radius".into(),
            query.radius_miles.unwrap_or(DEFAULT_RADIUS_MILES).to_string(),
        ));
    } else if let (Some(city), Some(state)) = (&query.city, &query.state) {
        params.push(("city".into(), enc(city)));
        params.push(("state".into(), enc(state)));
    } else if let Some(zip) = &query.zip {
        params.push(("zipCode".into(), enc(zip)));
    } else {
        anyhow::bail!("query must include lat/lon, address, city+state, or zip");
    }

    if let Some(bedrooms) = &query.bedrooms {
        params.push(("bedrooms".into(), enc(bedrooms)));
    }
    if let Some(bathrooms) = &query.bathrooms {
        params.push(("bathrooms".into(), enc(bathrooms)));
    }
    params.push((
        "daysOld".into(),
        enc(query.days_old.as_deref().unwrap_or(DEFAULT_DAYS_OLD)),
    ));
    params.push((
        "limit".into(),
        query.limit.unwrap_or(REQUEST_CAP).min(REQUEST_CAP).to_string(),
    ));

    Ok(params
        .into_iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&"))
}
