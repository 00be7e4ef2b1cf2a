use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),

    #[error("dataset unreadable: {0}")]
    Io(#[from] std::io::Error),

    #[error("dataset parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("dataset is missing required column '{0}'")]
    MissingColumn(String),

    #[error("no valid records remain after timestamp reconstruction")]
    EmptyDataset,

    #[error("invalid timeframe '{0}', allowed values: 1Min, 5Min, 15Min, 1H")]
    InvalidTimeframe(String),
}
