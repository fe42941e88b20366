//! Page sources.

use async_trait::async_trait;
use reqwest::Url;

use crate::{ArchiveClient, FetchError, Page};

/// Something that can return the page behind a cursor.
///
/// [`ArchiveClient`] is the production source; tests substitute in-memory
/// ones.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetches the page at `cursor`.
    ///
    /// # Errors
    ///
    /// Returns an error if the page cannot be fetched or decoded.
    async fn fetch_page(&self, cursor: &Url) -> Result<Page, FetchError>;
}

#[async_trait]
impl PageSource for ArchiveClient {
    async fn fetch_page(&self, cursor: &Url) -> Result<Page, FetchError> {
        self.get_page(cursor).await
    }
}

#[async_trait]
impl<T: PageSource + ?Sized> PageSource for &T {
    async fn fetch_page(&self, cursor: &Url) -> Result<Page, FetchError> {
        (**self).fetch_page(cursor).await
    }
}

#[async_trait]
impl<T: PageSource + ?Sized> PageSource for Box<T> {
    async fn fetch_page(&self, cursor: &Url) -> Result<Page, FetchError> {
        (**self).fetch_page(cursor).await
    }
}
