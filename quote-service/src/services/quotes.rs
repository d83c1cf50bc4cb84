use crate::error::QuoteError;
use crate::models::{NewQuote, Quote};
use crate::selector;
use crate::services::clock::Clock;
use crate::services::store::QuoteStore;
use chrono::NaiveDate;
use metrics::counter;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use validator::Validate;

/// Outcome of repairing the index record against the stored quotes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Entries that still point at a stored quote.
    pub kept: usize,
    /// Stored quotes that were missing from the index.
    pub added: usize,
    /// Dangling or duplicate entries dropped.
    pub removed: usize,
    /// Entries after the repair, not counting writes made while it ran.
    pub total: usize,
}

/// Quote operations over an injected store and clock.
///
/// Creation and deletion each perform two writes (quote record, then index
/// record). A failure in between leaves the index out of step with the quotes;
/// [`QuoteService::reconcile_index`] repairs that.
#[derive(Clone)]
pub struct QuoteService {
    store: Arc<dyn QuoteStore>,
    clock: Arc<dyn Clock>,
}

impl QuoteService {
    pub fn new(store: Arc<dyn QuoteStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &Arc<dyn QuoteStore> {
        &self.store
    }

    pub async fn list_quotes(&self) -> Result<Vec<Quote>, QuoteError> {
        self.store.list_quotes().await
    }

    pub async fn get_quote(&self, id: &str) -> Result<Quote, QuoteError> {
        let id = require_id(id, "Quote ID is required")?;
        self.store.get_quote(id).await
    }

    pub async fn create_quote(&self, new: NewQuote) -> Result<Quote, QuoteError> {
        let result = self.create_quote_inner(new).await;
        record_write("create", &result);
        result
    }

    async fn create_quote_inner(&self, new: NewQuote) -> Result<Quote, QuoteError> {
        let new = new.normalized();
        new.validate()?;

        let quote = self.store.add_quote(new).await?;
        tracing::info!(quote_id = %quote.id, "Quote created");

        self.store.add_to_index(&quote.id).await.map_err(|e| {
            tracing::error!(
                quote_id = %quote.id,
                error = %e,
                "Quote stored but index update failed; index needs reconciliation"
            );
            e
        })?;

        Ok(quote)
    }

    /// Deletes the quote and drops it from the index. Succeeds for ids that
    /// do not exist.
    pub async fn delete_quote(&self, id: &str) -> Result<String, QuoteError> {
        let result = self.delete_quote_inner(id).await;
        record_write("delete", &result);
        result
    }

    async fn delete_quote_inner(&self, id: &str) -> Result<String, QuoteError> {
        let id = require_id(id, "id is blank")?;

        self.store.delete_quote(id).await?;
        tracing::info!(quote_id = %id, "Quote deleted");

        self.store.remove_from_index(id).await.map_err(|e| {
            tracing::error!(
                quote_id = %id,
                error = %e,
                "Quote deleted but index update failed; index needs reconciliation"
            );
            e
        })?;

        Ok(id.to_string())
    }

    /// Quote of the day according to the injected clock.
    pub async fn daily_quote(&self) -> Result<Quote, QuoteError> {
        self.daily_quote_on(self.clock.today()).await
    }

    pub async fn daily_quote_on(&self, date: NaiveDate) -> Result<Quote, QuoteError> {
        let result = self.resolve_daily(date).await;
        let outcome = match &result {
            Ok(_) => "ok",
            Err(e) => e.kind(),
        };
        counter!("daily_quote_selections_total", "outcome" => outcome).increment(1);
        result
    }

    async fn resolve_daily(&self, date: NaiveDate) -> Result<Quote, QuoteError> {
        let docs = self.store.get_index_docs().await?;
        let id = selector::select_daily(date, &docs)?;

        self.store.get_quote(id).await.map_err(|e| {
            if matches!(e, QuoteError::NotFound(_)) {
                tracing::warn!(
                    quote_id = %id,
                    date = %date,
                    "Daily quote points at a missing quote"
                );
            }
            e
        })
    }

    /// Repairs the index so it lists exactly the stored quotes.
    ///
    /// Works out the differences from a snapshot of the index and the quotes,
    /// then applies them entry by entry with `remove_from_index` and
    /// `add_to_index`. A create or delete that completes meanwhile keeps its
    /// own index write. Surviving entries keep their order, so the daily
    /// selection only moves where the universe actually changed; quotes
    /// missing from the index are appended in id order.
    ///
    /// A quote deleted after the snapshot but before it is appended comes
    /// back as a dangling entry; the next run drops it.
    pub async fn reconcile_index(&self) -> Result<ReconcileReport, QuoteError> {
        let current = match self.store.get_index_docs().await {
            Ok(docs) => docs,
            Err(QuoteError::NotFound(_)) => {
                self.store.ensure_index().await?;
                Vec::new()
            }
            Err(e) => return Err(e),
        };
        let quotes = self.store.list_quotes().await?;
        let existing: HashSet<&str> = quotes.iter().map(|q| q.id.as_str()).collect();

        let mut indexed: HashSet<&str> = HashSet::with_capacity(current.len());
        let mut dangling: Vec<&str> = Vec::new();
        let mut kept = 0;
        for id in &current {
            if !indexed.insert(id.as_str()) {
                continue;
            }
            if existing.contains(id.as_str()) {
                kept += 1;
            } else {
                dangling.push(id.as_str());
            }
        }

        for id in &dangling {
            self.store.remove_from_index(id).await?;
        }
        if indexed.len() < current.len() {
            self.store.dedupe_index().await?;
        }

        let mut added = 0;
        for quote in quotes.iter().filter(|q| !indexed.contains(q.id.as_str())) {
            self.store.add_to_index(&quote.id).await?;
            added += 1;
        }

        let report = ReconcileReport {
            kept,
            added,
            removed: current.len() - kept,
            total: kept + added,
        };

        counter!("quote_index_reconciliations_total").increment(1);
        tracing::info!(
            kept = report.kept,
            added = report.added,
            removed = report.removed,
            "Quote index reconciled"
        );

        Ok(report)
    }
}

fn require_id<'a>(id: &'a str, message: &str) -> Result<&'a str, QuoteError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(QuoteError::InvalidRequest(message.to_string()));
    }
    Ok(id)
}

fn record_write<T>(operation: &'static str, result: &Result<T, QuoteError>) {
    let outcome = match result {
        Ok(_) => "ok",
        Err(e) => e.kind(),
    };
    counter!("quote_writes_total", "operation" => operation, "outcome" => outcome).increment(1);
}
