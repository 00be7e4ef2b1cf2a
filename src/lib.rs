//! Tick-level stock data analytics: a batch processing pipeline (timestamp
//! reconstruction, cleaning, technical indicators, resampled views) behind a
//! read-only query API.

pub mod api;
pub mod clean;
pub mod config;
pub mod error;
pub mod indicator;
pub mod loader;
pub mod model;
pub mod processor;
pub mod resample;
pub mod stats;
