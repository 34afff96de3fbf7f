mod http;

pub use http::{HttpFetcher, HttpFetcherConfig};

use async_trait::async_trait;

use volley_core::{FetchError, FetchId, Item};

/// One remote lookup per identifier.
///
/// Must be safe to invoke concurrently for distinct identifiers. Whether a
/// failure is worth retrying is not the fetcher's call; it only classifies
/// the error, and the configured policies decide.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch the item named by `id`.
    async fn fetch(&self, id: &FetchId) -> Result<Item, FetchError>;

    /// Fetch the whole collection in one call.
    async fn fetch_all(&self) -> Result<Vec<Item>, FetchError>;
}
