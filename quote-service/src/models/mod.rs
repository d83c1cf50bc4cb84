pub mod quote;

pub use quote::{NewQuote, Quote, QuoteIndex, QUOTE_INDEX_ID};
