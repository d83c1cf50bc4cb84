use crate::error::QuoteError;
use crate::models::{NewQuote, Quote};
use crate::services::store::QuoteStore;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashSet};
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct MemoryState {
    quotes: BTreeMap<String, Quote>,
    index: Option<Vec<String>>,
}

/// In-process store with the same semantics as the MongoDB backend.
///
/// Starts without an index record, like a fresh database.
#[derive(Debug, Default)]
pub struct MemoryQuoteStore {
    state: RwLock<MemoryState>,
}

impl MemoryQuoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored quote records.
    pub async fn len(&self) -> usize {
        self.state.read().await.quotes.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Removes the index record entirely.
    pub async fn drop_index(&self) {
        self.state.write().await.index = None;
    }

    /// Overwrites the index entries as an external writer would, bypassing
    /// the set semantics of `add_to_index`.
    pub async fn overwrite_index(&self, docs: Vec<String>) {
        self.state.write().await.index = Some(docs);
    }
}

#[async_trait]
impl QuoteStore for MemoryQuoteStore {
    async fn list_quotes(&self) -> Result<Vec<Quote>, QuoteError> {
        Ok(self.state.read().await.quotes.values().cloned().collect())
    }

    async fn get_quote(&self, id: &str) -> Result<Quote, QuoteError> {
        self.state
            .read()
            .await
            .quotes
            .get(id)
            .cloned()
            .ok_or_else(QuoteError::quote_not_found)
    }

    async fn add_quote(&self, new: NewQuote) -> Result<Quote, QuoteError> {
        let quote = Quote::from_new(new);
        self.state
            .write()
            .await
            .quotes
            .insert(quote.id.clone(), quote.clone());
        Ok(quote)
    }

    async fn delete_quote(&self, id: &str) -> Result<(), QuoteError> {
        self.state.write().await.quotes.remove(id);
        Ok(())
    }

    async fn ensure_index(&self) -> Result<(), QuoteError> {
        self.state.write().await.index.get_or_insert_with(Vec::new);
        Ok(())
    }

    async fn get_index_docs(&self) -> Result<Vec<String>, QuoteError> {
        self.state
            .read()
            .await
            .index
            .clone()
            .ok_or_else(QuoteError::index_not_found)
    }

    async fn add_to_index(&self, id: &str) -> Result<(), QuoteError> {
        let mut state = self.state.write().await;
        let docs = state.index.get_or_insert_with(Vec::new);
        if !docs.iter().any(|d| d == id) {
            docs.push(id.to_string());
        }
        Ok(())
    }

    async fn remove_from_index(&self, id: &str) -> Result<(), QuoteError> {
        let mut state = self.state.write().await;
        let docs = state.index.as_mut().ok_or_else(QuoteError::index_not_found)?;
        docs.retain(|d| d != id);
        Ok(())
    }

    async fn dedupe_index(&self) -> Result<(), QuoteError> {
        if let Some(docs) = self.state.write().await.index.as_mut() {
            let mut seen = HashSet::with_capacity(docs.len());
            docs.retain(|d| seen.insert(d.clone()));
        }
        Ok(())
    }

    async fn health_check(&self) -> Result<(), QuoteError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_quote(text: &str) -> NewQuote {
        NewQuote::new(text, "Anonymous", None)
    }

    #[tokio::test]
    async fn missing_index_is_not_found_until_ensured() {
        let store = MemoryQuoteStore::new();
        assert!(matches!(
            store.get_index_docs().await,
            Err(QuoteError::NotFound(_))
        ));

        store.ensure_index().await.unwrap();
        assert!(store.get_index_docs().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn ensure_index_keeps_existing_entries() {
        let store = MemoryQuoteStore::new();
        store.add_to_index("a").await.unwrap();
        store.ensure_index().await.unwrap();
        assert_eq!(store.get_index_docs().await.unwrap(), vec!["a"]);
    }

    #[tokio::test]
    async fn add_to_index_has_set_semantics() {
        let store = MemoryQuoteStore::new();
        store.ensure_index().await.unwrap();
        store.add_to_index("a").await.unwrap();
        store.add_to_index("b").await.unwrap();
        store.add_to_index("a").await.unwrap();
        assert_eq!(store.get_index_docs().await.unwrap(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn remove_from_index_drops_every_occurrence() {
        let store = MemoryQuoteStore::new();
        store
            .overwrite_index(vec!["a".to_string(), "b".to_string(), "a".to_string()])
            .await;
        store.remove_from_index("a").await.unwrap();
        assert_eq!(store.get_index_docs().await.unwrap(), vec!["b"]);
    }

    #[tokio::test]
    async fn dedupe_keeps_first_occurrences_in_order() {
        let store = MemoryQuoteStore::new();
        let docs = ["b", "a", "b", "c", "a"].map(String::from).to_vec();
        store.overwrite_index(docs).await;

        store.dedupe_index().await.unwrap();
        assert_eq!(store.get_index_docs().await.unwrap(), vec!["b", "a", "c"]);
    }

    #[tokio::test]
    async fn dedupe_without_index_record_is_a_no_op() {
        let store = MemoryQuoteStore::new();
        store.dedupe_index().await.unwrap();
        assert!(matches!(
            store.get_index_docs().await,
            Err(QuoteError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn remove_without_index_record_is_not_found() {
        let store = MemoryQuoteStore::new();
        assert!(matches!(
            store.remove_from_index("a").await,
            Err(QuoteError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn quotes_round_trip_and_delete_is_idempotent() {
        let store = MemoryQuoteStore::new();
        let quote = store.add_quote(new_quote("Hello")).await.unwrap();

        assert_eq!(store.get_quote(&quote.id).await.unwrap(), quote);
        assert_eq!(store.list_quotes().await.unwrap(), vec![quote.clone()]);

        store.delete_quote(&quote.id).await.unwrap();
        store.delete_quote(&quote.id).await.unwrap();
        assert!(store.is_empty().await);
        assert!(matches!(
            store.get_quote(&quote.id).await,
            Err(QuoteError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn list_is_ordered_by_id() {
        let store = MemoryQuoteStore::new();
        for text in ["one", "two", "three", "four"] {
            store.add_quote(new_quote(text)).await.unwrap();
        }
        let ids: Vec<String> = store
            .list_quotes()
            .await
            .unwrap()
            .into_iter()
            .map(|q| q.id)
            .collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
    }
}
