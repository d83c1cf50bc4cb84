pub mod clock;
pub mod database;
pub mod memory;
pub mod metrics;
pub mod quotes;
pub mod store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use database::MongoDb;
pub use memory::MemoryQuoteStore;
pub use metrics::{get_metrics, init_metrics};
pub use quotes::{QuoteService, ReconcileReport};
pub use store::QuoteStore;
