pub mod quotes;

pub use quotes::{CreateQuoteRequest, DeletedQuoteResponse, QuoteData, QuoteResponse};
