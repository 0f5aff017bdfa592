pub use super::value_objects::{Category, Financials, ListingId, ListingStatus, Location, MarketStats};
use crate::domain::errors::ValidationError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Domain entity - a property or tradable pair shown in a catalog view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingRecord {
    pub id: ListingId,
    pub name: String,
    #[serde(default)]
    pub symbol: Option<String>,
    pub location: Location,
    pub category: Category,
    pub status: ListingStatus,
    pub financials: Financials,
    #[serde(default)]
    pub market: Option<MarketStats>,
    #[serde(default)]
    pub funding_deadline: Option<NaiveDate>,
    /// Percentage in [0, 100]; only meaningful while funding
    #[serde(default)]
    pub funding_progress: f64,
    pub network: String,
    #[serde(default)]
    pub token_symbol: Option<String>,
    #[serde(default)]
    pub is_favorite: bool,
}

impl ListingRecord {
    /// Check the record invariants before it enters a catalog
    pub fn validate(&self) -> Result<(), ValidationError> {
        let fail = |reason: &str| {
            Err(ValidationError::InvalidListing {
                id: self.id.to_string(),
                reason: reason.to_string(),
            })
        };

        let f = &self.financials;
        let amounts = [f.total_value, f.token_price, f.minimum_investment, f.estimated_yield];
        if amounts.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return fail("financial fields must be finite and non-negative");
        }
        if f.token_price <= 0.0 {
            return fail("token price must be positive");
        }
        if f.available_tokens > f.total_tokens {
            return fail("available tokens exceed total tokens");
        }
        if !(0.0..=100.0).contains(&self.funding_progress) {
            return fail("funding progress must be within [0, 100]");
        }
        if [f.annual_rent, f.expenses]
            .iter()
            .flatten()
            .any(|v| !v.is_finite() || *v < 0.0)
        {
            return fail("rent and expenses must be finite and non-negative");
        }
        if let Some(market) = &self.market {
            let figures = [market.price, market.high_24h, market.low_24h, market.volume_24h, market.market_cap];
            if figures.iter().any(|v| !v.is_finite() || *v < 0.0) || !market.change_24h.is_finite() {
                return fail("market stats must be finite");
            }
        }
        Ok(())
    }

    /// Case-insensitive substring match on name, ticker and city.
    /// `needle` must already be lowercase.
    pub fn matches_search(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(needle)
            || self
                .symbol
                .as_ref()
                .is_some_and(|s| s.to_lowercase().contains(needle))
            || self.location.city.to_lowercase().contains(needle)
    }

    /// Market cap on the markets page, total asset value otherwise
    pub fn market_cap_or_value(&self) -> f64 {
        self.market.map(|m| m.market_cap).unwrap_or(self.financials.total_value)
    }

    /// Last traded price if the pair trades, list token price otherwise
    pub fn price(&self) -> f64 {
        self.market.map(|m| m.price).unwrap_or(self.financials.token_price)
    }

    pub fn change_24h(&self) -> Option<f64> {
        self.market.map(|m| m.change_24h)
    }

    pub fn volume_24h(&self) -> Option<f64> {
        self.market.map(|m| m.volume_24h)
    }

    pub fn is_funding(&self) -> bool {
        self.status == ListingStatus::Funding
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> ListingRecord {
        ListingRecord {
            id: ListingId::from("OTP-EURC"),
            name: "Oslo Tech Park".into(),
            symbol: Some("OTP".into()),
            location: Location { city: "Oslo".into(), country: "Norway".into() },
            category: Category::Commercial,
            status: ListingStatus::Trading,
            financials: Financials {
                total_value: 58_000_000.0,
                token_price: 200.0,
                total_tokens: 290_000,
                available_tokens: 12_000,
                minimum_investment: 500.0,
                estimated_yield: 8.2,
                annual_rent: None,
                expenses: None,
            },
            market: None,
            funding_deadline: None,
            funding_progress: 100.0,
            network: "Polygon".into(),
            token_symbol: Some("OTP".into()),
            is_favorite: false,
        }
    }

    #[test]
    fn search_hits_name_symbol_and_city() {
        let r = record();
        assert!(r.matches_search("tech"));
        assert!(r.matches_search("otp"));
        assert!(r.matches_search("osl"));
        assert!(r.matches_search(""));
        assert!(!r.matches_search("stockholm"));
    }

    #[test]
    fn oversubscribed_supply_is_rejected() {
        let mut r = record();
        r.financials.available_tokens = r.financials.total_tokens + 1;
        assert!(matches!(r.validate(), Err(ValidationError::InvalidListing { .. })));
    }

    #[test]
    fn funding_progress_out_of_range_is_rejected() {
        let mut r = record();
        r.funding_progress = 120.0;
        assert!(r.validate().is_err());
        r.funding_progress = 40.0;
        assert!(r.validate().is_ok());
    }
}
