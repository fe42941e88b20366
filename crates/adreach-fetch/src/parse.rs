//! Page decoding.

use adreach_types::AdRecord;
use reqwest::Url;
use serde::Deserialize;
use serde_json::value::RawValue;
use thiserror::Error;

/// Errors that can occur while decoding a page.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// The body is not a JSON page (`{"data": [...]}`).
    #[error("Invalid page JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// `paging.next` is present but is not an absolute URL.
    #[error("Invalid next-page cursor {cursor:?}: {reason}")]
    InvalidCursor {
        /// The cursor as received.
        cursor: String,
        /// Why it could not be parsed.
        reason: String,
    },
}

/// One page of ad records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    /// Records in the order the archive returned them.
    pub records: Vec<AdRecord>,
    /// Where the next page lives, if there is one.
    pub next_cursor: Option<Url>,
}

impl Page {
    /// Creates a page.
    #[must_use]
    pub const fn new(records: Vec<AdRecord>, next_cursor: Option<Url>) -> Self {
        Self {
            records,
            next_cursor,
        }
    }

    /// Returns true if the page has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the number of records in the page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if this is the last page.
    #[must_use]
    pub const fn is_last(&self) -> bool {
        self.next_cursor.is_none()
    }
}

/// Raw page as returned by the archive.
///
/// Records stay raw here so that a bad record fails on its own, not the page.
#[derive(Debug, Deserialize)]
struct RawPage {
    data: Vec<Box<RawValue>>,
    #[serde(default)]
    paging: Option<RawPaging>,
}

/// Raw `paging` object. Only `next` matters; `cursors` and `previous` are ignored.
#[derive(Debug, Deserialize)]
struct RawPaging {
    #[serde(default)]
    next: Option<String>,
}

/// Decodes a JSON page body.
///
/// A missing `paging` object, a `paging` object without `next`, or an empty
/// `next` all mean there are no further pages. Each entry of `data` is
/// decoded with [`AdRecord::from_json`], so a malformed record is kept and
/// marked rather than failing the page.
///
/// # Errors
///
/// Returns an error if the body is not a page or `paging.next` is not a URL.
pub fn decode_page(body: &[u8]) -> Result<Page, DecodeError> {
    let raw: RawPage = serde_json::from_slice(body)?;

    let next_cursor = match raw.paging.and_then(|p| p.next) {
        Some(next) if !next.trim().is_empty() => {
            Some(Url::parse(&next).map_err(|e| DecodeError::InvalidCursor {
                cursor: next.clone(),
                reason: e.to_string(),
            })?)
        }
        _ => None,
    };

    let records = raw
        .data
        .iter()
        .map(|record| AdRecord::from_json(record.get()))
        .collect();
    Ok(Page::new(records, next_cursor))
}
