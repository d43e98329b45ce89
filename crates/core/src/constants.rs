use std::time::Duration;

use nexus_market_data::CurrencyCode;

/// A cached rate table older than this is refetched before use.
pub const RATE_STALENESS_WINDOW: Duration = Duration::from_secs(15 * 60);

/// A cached quote younger than this is served without a fetch.
pub const QUOTE_FRESHNESS_WINDOW: Duration = Duration::from_secs(60);

/// Timeout for every outbound HTTP request.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(15);

/// Upper bound on symbols held by the in-memory quote cache.
pub const QUOTE_CACHE_CAPACITY: u64 = 1_000;

/// Decimal places kept for rebased fallback rates
pub const RATE_DECIMAL_PRECISION: u32 = 6;

pub const DEFAULT_BASE_CURRENCY: CurrencyCode = CurrencyCode::Usd;
