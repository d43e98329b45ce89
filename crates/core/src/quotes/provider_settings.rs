//! Quote provider selection.

use std::sync::Arc;
use std::time::Duration;

use nexus_market_data::provider::finnhub::DEFAULT_BASE_URL;
use nexus_market_data::{FinnhubProvider, QuoteProvider, SimulatedQuoteProvider};

use crate::constants::HTTP_TIMEOUT;

/// Which quote source to talk to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum QuoteProviderSettings {
    Finnhub {
        api_key: String,
        base_url: String,
        timeout: Duration,
    },
    /// Generated quotes for running without an API key
    #[default]
    Simulated,
}

impl QuoteProviderSettings {
    /// Finnhub when a non-blank key is given, simulated otherwise.
    pub fn from_api_key(api_key: Option<&str>) -> Self {
        match api_key.map(str::trim).filter(|key| !key.is_empty()) {
            Some(key) => QuoteProviderSettings::Finnhub {
                api_key: key.to_string(),
                base_url: DEFAULT_BASE_URL.to_string(),
                timeout: HTTP_TIMEOUT,
            },
            None => QuoteProviderSettings::Simulated,
        }
    }

    pub fn provider_id(&self) -> &'static str {
        match self {
            QuoteProviderSettings::Finnhub { .. } => "FINNHUB",
            QuoteProviderSettings::Simulated => "SIMULATED",
        }
    }
}

pub fn build_quote_provider(settings: &QuoteProviderSettings) -> Arc<dyn QuoteProvider> {
    match settings {
        QuoteProviderSettings::Finnhub {
            api_key,
            base_url,
            timeout,
        } => Arc::new(FinnhubProvider::with_base_url(
            api_key.clone(),
            base_url.clone(),
            *timeout,
        )),
        QuoteProviderSettings::Simulated => {
            log::info!("No quote API key configured, using simulated quotes");
            Arc::new(SimulatedQuoteProvider::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_key_selects_simulated() {
        assert_eq!(
            QuoteProviderSettings::from_api_key(None),
            QuoteProviderSettings::Simulated
        );
        assert_eq!(
            QuoteProviderSettings::from_api_key(Some("   ")),
            QuoteProviderSettings::Simulated
        );
    }

    #[test]
    fn test_key_selects_finnhub() {
        let settings = QuoteProviderSettings::from_api_key(Some(" abc123 "));
        match &settings {
            QuoteProviderSettings::Finnhub { api_key, .. } => assert_eq!(api_key, "abc123"),
            other => panic!("expected finnhub, got {:?}", other),
        }
        assert_eq!(build_quote_provider(&settings).id(), settings.provider_id());
    }

    #[test]
    fn test_build_simulated() {
        let provider = build_quote_provider(&QuoteProviderSettings::Simulated);
        assert_eq!(provider.id(), "SIMULATED");
    }
}
