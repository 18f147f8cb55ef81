use chrono::Utc;
use tracing::warn;

use crate::api::ApiClient;
use crate::error::Result;
use crate::models::{CachedQuote, Quote, SlotRequest};
use crate::session::Session;

use super::cache::QuoteCache;

/// Prices slots and remembers each total in the quote cache.
///
/// Failed quotes are never retried here; the caller re-triggers them.
#[derive(Clone)]
pub struct QuoteRequester {
    api: ApiClient,
    cache: QuoteCache,
}

impl QuoteRequester {
    pub fn new(api: ApiClient, cache: QuoteCache) -> Self {
        Self { api, cache }
    }

    /// Validate, quote and cache `slot`.
    ///
    /// A failed cache write is logged and does not fail the quote.
    pub async fn request(&self, session: &Session, slot: &SlotRequest) -> Result<Quote> {
        let quote = self.api.request_quote(session, slot).await?;

        let key = slot.cache_key();
        let entry = CachedQuote {
            total: quote.total,
            computed_at_epoch_millis: Utc::now().timestamp_millis(),
        };
        if let Err(e) = self.cache.put(&key, entry).await {
            warn!("Failed to cache quote {}: {}", key, e);
        }

        Ok(quote)
    }

    /// The last total cached for `slot`, if any
    pub async fn cached(&self, slot: &SlotRequest) -> Result<Option<CachedQuote>> {
        self.cache.get(&slot.cache_key()).await
    }
}
