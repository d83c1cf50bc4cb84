pub mod health;
pub mod quotes;

pub use health::{health_check, metrics_endpoint, readiness_check};
pub use quotes::{
    create_quote, daily_quote, delete_quote, get_quote, hello, list_quotes, reconcile_index,
};
