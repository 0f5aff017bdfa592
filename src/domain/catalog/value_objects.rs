use derive_more::{Deref, Display};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display as StrumDisplay, EnumIter, EnumString};

use crate::domain::errors::ConfigurationError;

/// Value Object - unique listing identifier (`OTP-EURC`, `stockholm-lofts`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deref, Display, Serialize, Deserialize)]
#[display(fmt = "{}", _0)]
pub struct ListingId(String);

impl ListingId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ListingId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Property type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay, EnumIter, EnumString, AsRefStr, Serialize, Deserialize)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[strum(to_string = "Residential")]
    Residential,
    #[strum(to_string = "Commercial")]
    Commercial,
    #[strum(to_string = "Mixed")]
    Mixed,
}

/// Listing lifecycle tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay, EnumIter, EnumString, AsRefStr, Serialize, Deserialize)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    #[strum(to_string = "Funding")]
    Funding,
    #[strum(to_string = "Funded")]
    Funded,
    #[strum(to_string = "Trading")]
    Trading,
}

/// Sort options offered by the markets and properties browsers.
///
/// Labels from both pages parse case-insensitively (`"Market Cap"`,
/// `"24h Change"`, `"yield"`, `"funded"`, `"closing"`, `"newest"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay, EnumIter, EnumString, AsRefStr, Serialize, Deserialize)]
#[strum(ascii_case_insensitive)]
pub enum SortKey {
    #[strum(to_string = "Market Cap", serialize = "market_cap", serialize = "value")]
    MarketCap,
    #[strum(to_string = "24h Change", serialize = "change")]
    Change24h,
    #[strum(to_string = "Volume")]
    Volume,
    #[strum(to_string = "Yield")]
    Yield,
    #[strum(to_string = "Price")]
    Price,
    #[strum(to_string = "Funding Progress", serialize = "funded")]
    FundingProgress,
    #[strum(to_string = "Closing Soon", serialize = "closing")]
    ClosingSoon,
    #[strum(to_string = "Newest", serialize = "newest first")]
    Newest,
}

/// Ordering applied for a sort key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Descending,
    Ascending,
    /// Keep the source order untouched
    Unsorted,
}

/// Per-key direction table. Closing-soon is the only ascending key.
const SORT_POLICIES: [(SortKey, SortDirection); 8] = [
    (SortKey::MarketCap, SortDirection::Descending),
    (SortKey::Change24h, SortDirection::Descending),
    (SortKey::Volume, SortDirection::Descending),
    (SortKey::Yield, SortDirection::Descending),
    (SortKey::Price, SortDirection::Descending),
    (SortKey::FundingProgress, SortDirection::Descending),
    (SortKey::ClosingSoon, SortDirection::Ascending),
    (SortKey::Newest, SortDirection::Unsorted),
];

impl SortKey {
    /// Parse a UI label, failing on anything not in the policy table
    pub fn parse(label: &str) -> Result<Self, ConfigurationError> {
        label
            .trim()
            .parse::<SortKey>()
            .map_err(|_| ConfigurationError::UnknownSortKey(label.to_string()))
    }

    pub fn direction(&self) -> SortDirection {
        SORT_POLICIES
            .iter()
            .find(|(key, _)| key == self)
            .map(|(_, direction)| *direction)
            .unwrap_or(SortDirection::Unsorted)
    }

    /// Keys ordered by a numeric magnitude
    pub fn is_magnitude(&self) -> bool {
        self.direction() == SortDirection::Descending
    }
}

/// Value Object - where a listing is
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub city: String,
    pub country: String,
}

/// Accounting fields of a listing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Financials {
    pub total_value: f64,
    pub token_price: f64,
    pub total_tokens: u64,
    pub available_tokens: u64,
    pub minimum_investment: f64,
    /// Annual yield in percent
    pub estimated_yield: f64,
    #[serde(default)]
    pub annual_rent: Option<f64>,
    #[serde(default)]
    pub expenses: Option<f64>,
}

impl Financials {
    /// Largest amount that can be invested: every available token at list price
    pub fn max_investment(&self) -> f64 {
        self.available_tokens as f64 * self.token_price
    }
}

/// Secondary-market figures shown on the markets page
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketStats {
    pub price: f64,
    pub change_24h: f64,
    pub high_24h: f64,
    pub low_24h: f64,
    pub volume_24h: f64,
    pub market_cap: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn every_sort_key_has_a_policy() {
        for key in SortKey::iter() {
            assert!(SORT_POLICIES.iter().any(|(k, _)| *k == key), "{key} missing");
        }
    }

    #[test]
    fn sort_labels_from_both_pages_parse() {
        assert_eq!(SortKey::parse("Market Cap").unwrap(), SortKey::MarketCap);
        assert_eq!(SortKey::parse("24h change").unwrap(), SortKey::Change24h);
        assert_eq!(SortKey::parse("funded").unwrap(), SortKey::FundingProgress);
        assert_eq!(SortKey::parse("closing").unwrap(), SortKey::ClosingSoon);
        assert_eq!(SortKey::parse("newest").unwrap(), SortKey::Newest);
        assert_eq!(SortKey::ClosingSoon.direction(), SortDirection::Ascending);
    }

    #[test]
    fn category_parse_ignores_case() {
        assert_eq!("commercial".parse::<Category>().unwrap(), Category::Commercial);
        assert_eq!("MIXED".parse::<Category>().unwrap(), Category::Mixed);
        assert_eq!(Category::Residential.to_string(), "Residential");
    }
}
