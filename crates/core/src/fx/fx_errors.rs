use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FxError {
    #[error("Exchange rate not found: {0}")]
    RateNotFound(String),

    #[error("Conversion overflows: {0}")]
    ConversionOverflow(String),

    #[error("Corrupt cached rate record: {0}")]
    CorruptCacheRecord(String),
}
