use crate::models::{NewQuote, Quote};
use serde::{Deserialize, Serialize};

/// Body of `POST /quotes`. Missing fields default to empty so they are
/// rejected by validation instead of by the JSON extractor.
#[derive(Debug, Deserialize)]
pub struct CreateQuoteRequest {
    #[serde(default)]
    pub quote: String,
    #[serde(default)]
    pub author_primary: String,
    #[serde(default)]
    pub author_secondary: Option<String>,
}

impl From<CreateQuoteRequest> for NewQuote {
    fn from(req: CreateQuoteRequest) -> Self {
        NewQuote::new(req.quote, req.author_primary, req.author_secondary)
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuoteData {
    pub quote: String,
    pub author_primary: String,
    pub author_secondary: Option<String>,
    pub tags: Vec<String>,
}

/// `{ id, data }` envelope returned for single quotes and list items.
#[derive(Debug, Serialize, Deserialize)]
pub struct QuoteResponse {
    pub id: String,
    pub data: QuoteData,
}

impl From<Quote> for QuoteResponse {
    fn from(quote: Quote) -> Self {
        Self {
            id: quote.id,
            data: QuoteData {
                quote: quote.quote,
                author_primary: quote.author_primary,
                author_secondary: quote.author_secondary,
                tags: quote.tags,
            },
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeletedQuoteResponse {
    pub id: String,
}
