pub mod engine;
pub mod ewma;
pub mod rolling;
pub mod rsi;
pub mod vwap;
