use super::value_objects::{Category, ListingStatus, SortKey};
use crate::domain::errors::ConfigurationError;
use serde::{Deserialize, Serialize};

/// Category dropdown: "All", "Favorites" or a concrete property type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CategoryFilter {
    #[default]
    All,
    Favorites,
    Only(Category),
}

impl CategoryFilter {
    pub fn parse(label: &str) -> Result<Self, ConfigurationError> {
        let label = label.trim();
        if label.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        if label.eq_ignore_ascii_case("favorites") {
            return Ok(Self::Favorites);
        }
        label
            .parse::<Category>()
            .map(Self::Only)
            .map_err(|_| ConfigurationError::UnknownCategory(label.to_string()))
    }
}

/// Status dropdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StatusFilter {
    #[default]
    All,
    Only(ListingStatus),
}

impl StatusFilter {
    pub fn parse(label: &str) -> Result<Self, ConfigurationError> {
        let label = label.trim();
        if label.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        label
            .parse::<ListingStatus>()
            .map(Self::Only)
            .map_err(|_| ConfigurationError::UnknownStatus(label.to_string()))
    }
}

/// Location dropdown on the properties page
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LocationFilter {
    #[default]
    All,
    City(String),
}

impl LocationFilter {
    pub fn parse(label: &str) -> Self {
        let label = label.trim();
        if label.is_empty() || label.eq_ignore_ascii_case("all") {
            Self::All
        } else {
            Self::City(label.to_string())
        }
    }
}

/// Current UI selections. Built per render, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub search: String,
    pub category: CategoryFilter,
    pub status: StatusFilter,
    pub location: LocationFilter,
    pub sort: SortKey,
    pub min_investment: Option<f64>,
    pub max_investment: Option<f64>,
    pub min_yield: Option<f64>,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self::new(SortKey::Newest)
    }
}

impl FilterCriteria {
    /// Everything passes, ordered by `sort`
    pub fn new(sort: SortKey) -> Self {
        Self {
            search: String::new(),
            category: CategoryFilter::All,
            status: StatusFilter::All,
            location: LocationFilter::All,
            sort,
            min_investment: None,
            max_investment: None,
            min_yield: None,
        }
    }

    /// Build from the raw dropdown labels the pages use
    pub fn from_labels(search: &str, category: &str, status: &str, sort: &str) -> Result<Self, ConfigurationError> {
        Ok(Self {
            search: search.to_string(),
            category: CategoryFilter::parse(category)?,
            status: StatusFilter::parse(status)?,
            sort: SortKey::parse(sort)?,
            ..Self::default()
        })
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_category(mut self, category: CategoryFilter) -> Self {
        self.category = category;
        self
    }

    pub fn with_status(mut self, status: StatusFilter) -> Self {
        self.status = status;
        self
    }

    pub fn with_location(mut self, location: LocationFilter) -> Self {
        self.location = location;
        self
    }

    pub fn with_investment_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_investment = min;
        self.max_investment = max;
        self
    }

    pub fn with_min_yield(mut self, min_yield: f64) -> Self {
        self.min_yield = Some(min_yield);
        self
    }

    /// Reject bounds that can never match
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let bounds = [self.min_investment, self.max_investment, self.min_yield];
        if bounds.iter().flatten().any(|b| !b.is_finite()) {
            return Err(ConfigurationError::InvalidParameter("range bounds must be finite".into()));
        }
        if let (Some(min), Some(max)) = (self.min_investment, self.max_investment) {
            if min > max {
                return Err(ConfigurationError::InvalidParameter(format!(
                    "min investment {} exceeds max investment {}",
                    min, max
                )));
            }
        }
        Ok(())
    }
}
