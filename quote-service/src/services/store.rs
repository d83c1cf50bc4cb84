use crate::error::QuoteError;
use crate::models::{NewQuote, Quote};
use async_trait::async_trait;

/// Document store holding quote records and the single index record.
///
/// Quote writes and index writes are separate calls; nothing ties them into
/// one transaction.
#[async_trait]
pub trait QuoteStore: Send + Sync {
    /// All quotes, ordered by id.
    async fn list_quotes(&self) -> Result<Vec<Quote>, QuoteError>;

    /// `NotFound` when no quote has this id.
    async fn get_quote(&self, id: &str) -> Result<Quote, QuoteError>;

    /// Stores a new quote under a store-assigned id.
    async fn add_quote(&self, new: NewQuote) -> Result<Quote, QuoteError>;

    /// Deleting an absent id is not an error.
    async fn delete_quote(&self, id: &str) -> Result<(), QuoteError>;

    /// Creates the index record with no entries if it does not exist yet.
    async fn ensure_index(&self) -> Result<(), QuoteError>;

    /// `NotFound` when the index record does not exist.
    async fn get_index_docs(&self) -> Result<Vec<String>, QuoteError>;

    /// Appends `id` unless already present, creating the record if needed.
    async fn add_to_index(&self, id: &str) -> Result<(), QuoteError>;

    /// Removes every occurrence of `id`; `NotFound` when the record is missing.
    async fn remove_from_index(&self, id: &str) -> Result<(), QuoteError>;

    /// Keeps only the first occurrence of each entry, in one update of the
    /// index record. A missing record is left alone.
    async fn dedupe_index(&self) -> Result<(), QuoteError>;

    async fn health_check(&self) -> Result<(), QuoteError>;
}
