use crate::error::QuoteError;
use crate::models::{NewQuote, Quote, QuoteIndex, QUOTE_INDEX_ID};
use crate::services::store::QuoteStore;
use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::{
    bson::doc,
    options::{FindOptions, UpdateOptions},
    Client as MongoClient, Collection, Database,
};
use service_core::error::AppError;

#[derive(Clone)]
pub struct MongoDb {
    client: MongoClient,
    db: Database,
}

impl MongoDb {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        tracing::info!(database = %database, "Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to connect to MongoDB: {}", e);
            AppError::from(e)
        })?;
        let db = client.database(database);
        tracing::info!(database = %database, "Successfully connected to MongoDB database");
        Ok(Self { client, db })
    }

    pub fn quotes(&self) -> Collection<Quote> {
        self.db.collection("quotes")
    }

    pub fn quotes_metadata(&self) -> Collection<QuoteIndex> {
        self.db.collection("quotes_metadata")
    }

    pub fn client(&self) -> &MongoClient {
        &self.client
    }

    fn upsert() -> UpdateOptions {
        UpdateOptions::builder().upsert(true).build()
    }
}

#[async_trait]
impl QuoteStore for MongoDb {
    async fn list_quotes(&self) -> Result<Vec<Quote>, QuoteError> {
        let options = FindOptions::builder().sort(doc! { "_id": 1 }).build();
        let cursor = self.quotes().find(doc! {}, options).await?;
        let quotes: Vec<Quote> = cursor.try_collect().await?;
        Ok(quotes)
    }

    async fn get_quote(&self, id: &str) -> Result<Quote, QuoteError> {
        self.quotes()
            .find_one(doc! { "_id": id }, None)
            .await?
            .ok_or_else(QuoteError::quote_not_found)
    }

    async fn add_quote(&self, new: NewQuote) -> Result<Quote, QuoteError> {
        let quote = Quote::from_new(new);
        self.quotes().insert_one(&quote, None).await.map_err(|e| {
            tracing::error!(quote_id = %quote.id, "Failed to insert quote: {}", e);
            QuoteError::from(e)
        })?;
        Ok(quote)
    }

    async fn delete_quote(&self, id: &str) -> Result<(), QuoteError> {
        let result = self.quotes().delete_one(doc! { "_id": id }, None).await?;
        if result.deleted_count == 0 {
            tracing::debug!(quote_id = %id, "Delete matched no quote");
        }
        Ok(())
    }

    async fn ensure_index(&self) -> Result<(), QuoteError> {
        let result = self
            .quotes_metadata()
            .update_one(
                doc! { "_id": QUOTE_INDEX_ID },
                doc! { "$setOnInsert": { "docs": [] } },
                Self::upsert(),
            )
            .await
            .map_err(|e| {
                tracing::error!("Failed to ensure quote index record: {}", e);
                QuoteError::from(e)
            })?;

        if result.upserted_id.is_some() {
            tracing::info!("Created empty quote index record");
        }
        Ok(())
    }

    async fn get_index_docs(&self) -> Result<Vec<String>, QuoteError> {
        self.quotes_metadata()
            .find_one(doc! { "_id": QUOTE_INDEX_ID }, None)
            .await?
            .map(|index| index.docs)
            .ok_or_else(QuoteError::index_not_found)
    }

    async fn add_to_index(&self, id: &str) -> Result<(), QuoteError> {
        self.quotes_metadata()
            .update_one(
                doc! { "_id": QUOTE_INDEX_ID },
                doc! { "$addToSet": { "docs": id } },
                Self::upsert(),
            )
            .await?;
        Ok(())
    }

    async fn remove_from_index(&self, id: &str) -> Result<(), QuoteError> {
        let result = self
            .quotes_metadata()
            .update_one(
                doc! { "_id": QUOTE_INDEX_ID },
                doc! { "$pull": { "docs": id } },
                None,
            )
            .await?;

        if result.matched_count == 0 {
            return Err(QuoteError::index_not_found());
        }
        Ok(())
    }

    async fn dedupe_index(&self) -> Result<(), QuoteError> {
        // Pipeline update: folds `docs` left to right, skipping ids already kept.
        let pipeline = vec![doc! {
            "$set": {
                "docs": {
                    "$reduce": {
                        "input": "$docs",
                        "initialValue": [],
                        "in": {
                            "$cond": [
                                { "$in": ["$$this", "$$value"] },
                                "$$value",
                                { "$concatArrays": ["$$value", ["$$this"]] }
                            ]
                        }
                    }
                }
            }
        }];

        self.quotes_metadata()
            .update_one(doc! { "_id": QUOTE_INDEX_ID }, pipeline, None)
            .await?;
        Ok(())
    }

    async fn health_check(&self) -> Result<(), QuoteError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                QuoteError::from(e)
            })?;
        Ok(())
    }
}
