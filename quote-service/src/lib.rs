//! Quote Service - quotes over a document store, plus a deterministic quote of the day.

pub mod config;
pub mod dtos;
pub mod error;
pub mod handlers;
pub mod models;
pub mod selector;
pub mod services;
pub mod startup;
