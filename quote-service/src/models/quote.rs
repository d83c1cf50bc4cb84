use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// `_id` of the single index record.
pub const QUOTE_INDEX_ID: &str = "ids";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Quote {
    #[serde(rename = "_id")]
    pub id: String,
    pub quote: String,
    pub author_primary: String,
    #[serde(default)]
    pub author_secondary: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Quote {
    /// Assigns a fresh identifier; tags always start empty.
    pub fn from_new(new: NewQuote) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            quote: new.quote,
            author_primary: new.author_primary,
            author_secondary: new.author_secondary,
            tags: Vec::new(),
        }
    }
}

/// Fields a caller supplies when adding a quote.
#[derive(Debug, Clone, Validate, PartialEq, Eq)]
pub struct NewQuote {
    #[validate(length(min = 1, message = "quote must not be blank"))]
    pub quote: String,
    #[validate(length(min = 1, message = "author_primary must not be blank"))]
    pub author_primary: String,
    pub author_secondary: Option<String>,
}

impl NewQuote {
    pub fn new(
        quote: impl Into<String>,
        author_primary: impl Into<String>,
        author_secondary: Option<String>,
    ) -> Self {
        Self {
            quote: quote.into(),
            author_primary: author_primary.into(),
            author_secondary,
        }
    }

    /// Trims surrounding whitespace; a blank secondary author becomes `None`.
    pub fn normalized(self) -> Self {
        Self {
            quote: self.quote.trim().to_string(),
            author_primary: self.author_primary.trim().to_string(),
            author_secondary: self
                .author_secondary
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        }
    }
}

/// The ordered universe of quote ids the daily selection draws from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuoteIndex {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub docs: Vec<String>,
}
