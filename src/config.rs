//! Runtime configuration.
//!
//! Everything has a default, so an empty JSON object is a valid config.
//! Values are checked by [`AppConfig::validate`] before use.

use crate::domain::catalog::{FilterCriteria, SortKey};
use crate::domain::errors::ConfigurationError;
use crate::domain::investment::InvestmentSettings;
use crate::domain::logging::LogLevel;
use crate::domain::metrics::ReturnsCalculator;
use crate::infrastructure::FailureInjection;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    pub investment: InvestmentConfig,
    pub catalog: CatalogConfig,
    pub returns: ReturnsConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InvestmentConfig {
    #[serde(flatten)]
    pub settings: InvestmentSettings,
    /// Simulated chain latency per attempt
    pub settlement_delay_ms: u64,
    pub failure: FailureInjection,
    pub explorer_base_url: String,
}

impl Default for InvestmentConfig {
    fn default() -> Self {
        Self {
            settings: InvestmentSettings::default(),
            settlement_delay_ms: 3_000,
            failure: FailureInjection::Never,
            explorer_base_url: "https://polygonscan.com".to_string(),
        }
    }
}

impl InvestmentConfig {
    pub fn settlement_delay(&self) -> Duration {
        Duration::from_millis(self.settlement_delay_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CatalogConfig {
    /// Initial sort label of the markets page
    pub markets_sort: String,
    /// Initial sort label of the properties page
    pub properties_sort: String,
    /// Initial upper bound of the properties page investment slider
    pub max_investment: f64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            markets_sort: "Market Cap".to_string(),
            properties_sort: "newest".to_string(),
            max_investment: 10_000.0,
        }
    }
}

impl CatalogConfig {
    pub fn markets_criteria(&self) -> Result<FilterCriteria, ConfigurationError> {
        Ok(FilterCriteria::new(SortKey::parse(&self.markets_sort)?))
    }

    pub fn properties_criteria(&self) -> Result<FilterCriteria, ConfigurationError> {
        Ok(FilterCriteria::new(SortKey::parse(&self.properties_sort)?)
            .with_investment_range(Some(0.0), Some(self.max_investment)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReturnsConfig {
    /// Platform average yield used by the investors page calculator
    pub platform_yield_percent: f64,
}

impl Default for ReturnsConfig {
    fn default() -> Self {
        Self {
            platform_yield_percent: 7.2,
        }
    }
}

impl ReturnsConfig {
    pub fn calculator(&self) -> ReturnsCalculator {
        ReturnsCalculator::new(self.platform_yield_percent)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoggingConfig {
    pub level: LogLevel,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: LogLevel::Info }
    }
}

impl AppConfig {
    /// Parse and validate
    pub fn from_json_str(json: &str) -> Result<Self, ConfigurationError> {
        let config: AppConfig =
            serde_json::from_str(json).map_err(|e| ConfigurationError::Malformed(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.investment.settings.validate()?;
        self.investment.failure.validate()?;
        if !self.investment.explorer_base_url.starts_with("http") {
            return Err(ConfigurationError::InvalidParameter(format!(
                "investment.explorerBaseUrl '{}' is not an http(s) URL",
                self.investment.explorer_base_url
            )));
        }

        self.catalog.markets_criteria()?;
        self.catalog.properties_criteria()?.validate()?;

        let yield_percent = self.returns.platform_yield_percent;
        if !yield_percent.is_finite() || yield_percent < 0.0 {
            return Err(ConfigurationError::InvalidParameter(format!(
                "returns.platformYieldPercent {} must be a non-negative number",
                yield_percent
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let config = AppConfig::from_json_str("{}").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.investment.settlement_delay(), Duration::from_millis(3_000));
        assert_eq!(config.investment.settings.transaction_fee, 0.05);
    }
}
