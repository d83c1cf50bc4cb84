//! Deterministic "quote of the day" selection.
//!
//! The seed is the unpadded decimal concatenation of year, month and day, so
//! distinct dates can share a seed: 2020-01-23 and 2020-12-03 both become
//! `"2020123"` and pick the same position. Changing the seed format would move
//! the quote shown on those dates for every existing deployment, so it is kept.

pub mod arc4;

pub use arc4::Arc4Rng;

use crate::error::QuoteError;
use chrono::{Datelike, NaiveDate};

/// Seed string for `date`: `{year}{month}{day}` with no padding.
pub fn daily_seed(date: NaiveDate) -> String {
    format!("{}{}{}", date.year(), date.month(), date.day())
}

/// Position chosen for a universe of `len` entries under `seed`.
pub fn select_index(seed: &str, len: usize) -> Result<usize, QuoteError> {
    if len == 0 {
        return Err(QuoteError::EmptyIndex);
    }

    let draw = Arc4Rng::from_seed_str(seed).next_f64();
    let index = (draw * len as f64).floor() as usize;

    // The draw is below 1; the clamp only guards float rounding.
    Ok(index.min(len - 1))
}

/// Picks the identifier shown on `date`.
///
/// Pure: the same date and the same `docs` in the same order always give the
/// same identifier. The result is not checked against the store.
pub fn select_daily(date: NaiveDate, docs: &[String]) -> Result<&str, QuoteError> {
    let seed = daily_seed(date);
    let index = select_index(&seed, docs.len())?;

    tracing::debug!(seed = %seed, index, universe = docs.len(), "Daily quote selected");

    Ok(docs[index].as_str())
}
