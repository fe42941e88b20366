//! Ads archive URL construction.

use chrono::NaiveDate;
use reqwest::Url;
use thiserror::Error;

/// Base URL of the ads archive endpoint.
pub const BASE_URL: &str = "https://graph.facebook.com/v5.0/ads_archive";

/// Fields requested for every ad unless overridden.
pub const DEFAULT_FIELDS: &[&str] = &[
    "id",
    "ad_delivery_start_time",
    "ad_delivery_stop_time",
    "ad_snapshot_url",
    "bylines",
    "delivery_by_region",
    "demographic_distribution",
    "impressions",
    "publisher_platforms",
    "spend",
];

/// Query parameters of the first archive request.
///
/// Follow-up pages use the archive-provided `paging.next` URL as is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveQuery {
    /// Access token passed through to the archive.
    pub access_token: String,
    /// Ad type, e.g. `POLITICAL_AND_ISSUE_ADS`.
    pub ad_type: String,
    /// Delivery status filter: `ALL`, `ACTIVE` or `INACTIVE`.
    pub ad_active_status: String,
    /// Page ids whose ads are requested.
    pub search_page_ids: Vec<String>,
    /// ISO country codes the ads must have reached.
    pub ad_reached_countries: Vec<String>,
    /// Earliest delivery date.
    pub ad_delivery_date_min: Option<NaiveDate>,
    /// Latest delivery date.
    pub ad_delivery_date_max: Option<NaiveDate>,
    /// Fields to return for each ad.
    pub fields: Vec<String>,
}

impl ArchiveQuery {
    /// Creates a query for political and issue ads of any status reaching
    /// the US, with the default field list.
    #[must_use]
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            ad_type: "POLITICAL_AND_ISSUE_ADS".to_string(),
            ad_active_status: "ALL".to_string(),
            search_page_ids: Vec::new(),
            ad_reached_countries: vec!["US".to_string()],
            ad_delivery_date_min: None,
            ad_delivery_date_max: None,
            fields: DEFAULT_FIELDS.iter().map(|f| (*f).to_string()).collect(),
        }
    }

    /// Sets the page ids to search.
    #[must_use]
    pub fn with_page_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search_page_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the reached countries.
    #[must_use]
    pub fn with_countries<I, S>(mut self, countries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ad_reached_countries = countries.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the delivery date window. Either end may be open.
    #[must_use]
    pub const fn with_delivery_dates(
        mut self,
        min: Option<NaiveDate>,
        max: Option<NaiveDate>,
    ) -> Self {
        self.ad_delivery_date_min = min;
        self.ad_delivery_date_max = max;
        self
    }

    /// Sets the ad type.
    #[must_use]
    pub fn with_ad_type(mut self, ad_type: impl Into<String>) -> Self {
        self.ad_type = ad_type.into();
        self
    }

    /// Sets the active status filter.
    #[must_use]
    pub fn with_active_status(mut self, status: impl Into<String>) -> Self {
        self.ad_active_status = status.into();
        self
    }

    /// Returns the query as ordered key/value pairs.
    #[must_use]
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("access_token", self.access_token.clone()),
            ("ad_type", self.ad_type.clone()),
            ("ad_active_status", self.ad_active_status.clone()),
            ("search_page_ids", self.search_page_ids.join(",")),
            ("ad_reached_countries", json_list(&self.ad_reached_countries)),
        ];
        if let Some(min) = self.ad_delivery_date_min {
            params.push(("ad_delivery_date_min", min.format("%Y-%m-%d").to_string()));
        }
        if let Some(max) = self.ad_delivery_date_max {
            params.push(("ad_delivery_date_max", max.format("%Y-%m-%d").to_string()));
        }
        params.push(("fields", self.fields.join(",")));
        params
    }
}

/// Formats a list the way the archive expects list parameters: `["US","CA"]`.
fn json_list(items: &[String]) -> String {
    let quoted: Vec<String> = items.iter().map(|i| format!("\"{i}\"")).collect();
    format!("[{}]", quoted.join(","))
}

/// Builds the URL of the first archive request.
///
/// # Errors
///
/// Returns an error if `base_url` is not a valid absolute URL.
///
/// # Example
///
/// ```
/// use adreach_fetch::url::{ArchiveQuery, seed_url};
///
/// let query = ArchiveQuery::new("TOKEN").with_page_ids(["100801038449520"]);
/// let url = seed_url("https://graph.facebook.com/v5.0/ads_archive", &query).unwrap();
/// assert!(url.as_str().contains("search_page_ids=100801038449520"));
/// ```
pub fn seed_url(base_url: &str, query: &ArchiveQuery) -> Result<Url, SeedUrlError> {
    Url::parse_with_params(base_url, query.params()).map_err(|source| SeedUrlError {
        base_url: base_url.to_string(),
        source,
    })
}

/// The archive endpoint could not be turned into a request URL.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid archive URL {base_url}: {source}")]
pub struct SeedUrlError {
    /// The endpoint as given.
    pub base_url: String,
    /// Why it did not parse.
    pub source: ::url::ParseError,
}

/// Returns `url` as text with any `access_token` value masked, for logging.
#[must_use]
pub fn redacted(url: &Url) -> String {
    if !url.query_pairs().any(|(k, _)| k == "access_token") {
        return url.to_string();
    }
    let mut masked = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == "access_token" {
                "REDACTED".to_string()
            } else {
                v.into_owned()
            };
            (k.into_owned(), v)
        })
        .collect();
    masked.query_pairs_mut().clear().extend_pairs(pairs);
    masked.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_query() -> ArchiveQuery {
        ArchiveQuery::new("secret")
            .with_page_ids(["100801038449520"])
            .with_countries(["US"])
            .with_delivery_dates(
                NaiveDate::from_ymd_opt(2020, 9, 1),
                NaiveDate::from_ymd_opt(2021, 12, 31),
            )
    }

    #[test]
    fn test_default_query() {
        let query = ArchiveQuery::new("t");
        assert_eq!(query.ad_type, "POLITICAL_AND_ISSUE_ADS");
        assert_eq!(query.ad_active_status, "ALL");
        assert_eq!(query.fields.len(), DEFAULT_FIELDS.len());
    }

    #[test]
    fn test_seed_url_params() {
        let url = seed_url(BASE_URL, &sample_query()).unwrap();
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        let get = |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        };

        assert_eq!(url.path(), "/v5.0/ads_archive");
        assert_eq!(get("access_token"), Some("secret"));
        assert_eq!(get("search_page_ids"), Some("100801038449520"));
        assert_eq!(get("ad_reached_countries"), Some("[\"US\"]"));
        assert_eq!(get("ad_delivery_date_min"), Some("2020-09-01"));
        assert_eq!(get("ad_delivery_date_max"), Some("2021-12-31"));
        assert!(get("fields").unwrap().contains("demographic_distribution"));
    }

    #[test]
    fn test_open_date_window_is_omitted() {
        let query = ArchiveQuery::new("t");
        let keys: Vec<_> = query.params().into_iter().map(|(k, _)| k).collect();
        assert!(!keys.contains(&"ad_delivery_date_min"));
        assert!(!keys.contains(&"ad_delivery_date_max"));
    }

    #[test]
    fn test_seed_url_rejects_relative_base() {
        let err = seed_url("ads_archive", &sample_query()).unwrap_err();
        assert_eq!(err.base_url, "ads_archive");
        assert_eq!(err.source, ::url::ParseError::RelativeUrlWithoutBase);
        assert!(err.to_string().starts_with("Invalid archive URL ads_archive"));
    }

    #[test]
    fn test_redacted() {
        let url = seed_url(BASE_URL, &sample_query()).unwrap();
        let text = redacted(&url);
        assert!(!text.contains("secret"));
        assert!(text.contains("access_token=REDACTED"));
        assert!(text.contains("search_page_ids=100801038449520"));
    }

    #[test]
    fn test_redacted_without_token() {
        let url = Url::parse("https://example.com/page?after=abc").unwrap();
        assert_eq!(redacted(&url), "https://example.com/page?after=abc");
    }
}
