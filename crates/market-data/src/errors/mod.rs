//! Error types for the market data crate.
//!
//! Every outbound call maps its failure onto [`MarketDataError`]. None of
//! these errors are fatal: callers fall back to cached or approximate data.

use thiserror::Error;

/// Errors that can occur while talking to a rate or quote provider.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarketDataError {
    /// The host could not be reached (DNS failure, refused connection, offline).
    #[error("Network unavailable: {0}")]
    NetworkUnavailable(String),

    /// The request did not complete within the client timeout.
    #[error("Request timed out")]
    Timeout,

    /// The provider answered with a non-success HTTP status.
    #[error("Server error: HTTP {0}")]
    ServerError(u16),

    /// The response body could not be decoded into the expected shape.
    #[error("Failed to decode response: {0}")]
    DecodingFailed(String),

    /// The endpoint URL could not be built from the configured base URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The provider rejected the request because of its quota (HTTP 429).
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// The symbol is malformed or unknown to the provider.
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),
}

impl MarketDataError {
    /// Whether a later, user-initiated retry could succeed.
    ///
    /// Nothing in this crate retries on its own; the flag only drives
    /// whether a retry affordance makes sense.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::NetworkUnavailable(_)
            | Self::Timeout
            | Self::ServerError(_)
            | Self::RateLimitExceeded => true,
            Self::DecodingFailed(_) | Self::InvalidUrl(_) | Self::InvalidSymbol(_) => false,
        }
    }

    /// Maps a transport-level reqwest error onto the crate taxonomy.
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_builder() {
            Self::InvalidUrl(err.to_string())
        } else if err.is_decode() {
            Self::DecodingFailed(err.to_string())
        } else if let Some(status) = err.status() {
            Self::from_status(status.as_u16())
        } else {
            Self::NetworkUnavailable(err.to_string())
        }
    }

    /// Maps a non-success HTTP status code.
    pub(crate) fn from_status(code: u16) -> Self {
        if code == 429 {
            Self::RateLimitExceeded
        } else {
            Self::ServerError(code)
        }
    }
}
