use std::path::Path;

use tracing::info;

use crate::clean::clean;
use crate::error::AppError;
use crate::indicator::engine::enrich;
use crate::loader::load_csv;
use crate::model::candle::OhlcvBar;
use crate::model::tick::{EnrichedTick, RawTick};
use crate::resample::{
    indicator_rows, ohlcv_bars, orderbook_rows, IndicatorRow, OrderbookRow, Timeframe,
};
use crate::stats::{self, CorrelationMatrix, Summary};

/// The fully processed dataset and its cached analytics. Built once at
/// startup, immutable afterwards: query methods only read, so the processor
/// can be shared across concurrent request handlers without locking.
pub struct TickProcessor {
    series: Vec<EnrichedTick>,
    summary: Summary,
    correlation: CorrelationMatrix,
}

impl TickProcessor {
    /// Run the whole pipeline over a CSV dataset. Any fatal dataset problem
    /// (unreadable file, missing `start_time` column, nothing left after
    /// timestamp reconstruction) surfaces here, before anything is served.
    pub fn from_csv(path: &Path) -> Result<Self, AppError> {
        let records = load_csv(path)?;
        Self::from_records(records)
    }

    /// Build from an already-normalized record sequence. This is the
    /// structured-record-source boundary: alternative loaders (and tests)
    /// enter the pipeline here.
    pub fn from_records(mut records: Vec<RawTick>) -> Result<Self, AppError> {
        if records.is_empty() {
            return Err(AppError::EmptyDataset);
        }
        // Stable, so duplicate timestamps keep their input order.
        records.sort_by_key(|r| r.timestamp);

        let cleaned = clean(records);
        let enriched = enrich(cleaned);
        let (summary, correlation) = stats::compute(&enriched);

        info!(ticks = enriched.len(), "tick processor initialized");
        Ok(Self {
            series: enriched,
            summary,
            correlation,
        })
    }

    /// The cached scalar summary. Always available once initialized; a series
    /// emptied by the warm-up drop yields a zero-valued summary.
    pub fn get_summary(&self) -> &Summary {
        &self.summary
    }

    /// OHLCV candles of `last_price` per `timeframe` bucket, volume summed.
    /// Recomputed from the cached series on every call.
    pub fn get_timeseries_data(&self, timeframe: Timeframe) -> Vec<OhlcvBar> {
        ohlcv_bars(&self.series, timeframe)
    }

    /// Mean bid-ask spread and order-flow imbalance per 1-minute bucket.
    pub fn get_orderbook_analysis(&self) -> Vec<OrderbookRow> {
        orderbook_rows(&self.series)
    }

    /// Mean of each indicator column per 1-minute bucket.
    pub fn get_technical_indicators(&self) -> Vec<IndicatorRow> {
        indicator_rows(&self.series)
    }

    /// Pairwise Pearson correlations among the analytic columns. Not exposed
    /// over the query API; available to library consumers.
    pub fn correlation_matrix(&self) -> &CorrelationMatrix {
        &self.correlation
    }

    pub fn tick_count(&self) -> usize {
        self.series.len()
    }
}
