use super::criteria::{CategoryFilter, FilterCriteria, LocationFilter, StatusFilter};
use super::entities::{ListingId, ListingRecord};
use super::value_objects::{SortDirection, SortKey};
use crate::domain::errors::ConfigurationError;
use crate::domain::logging::{LogComponent, get_logger};
use crate::domain::session::FavoritesSet;
use chrono::Datelike;
use std::cmp::Ordering;

/// Ordered subset of a catalog produced by [`CatalogEngine::apply`].
///
/// Borrows the source records; an empty view is a normal result the UI
/// renders as an explicit empty state.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogView<'a> {
    records: Vec<&'a ListingRecord>,
    total: usize,
    sort: SortKey,
}

impl<'a> CatalogView<'a> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Size of the collection the view was taken from
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort
    }

    pub fn records(&self) -> &[&'a ListingRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a ListingRecord> + '_ {
        self.records.iter().copied()
    }

    pub fn ids(&self) -> Vec<&'a ListingId> {
        self.records.iter().map(|r| &r.id).collect()
    }

    pub fn names(&self) -> Vec<&'a str> {
        self.records.iter().map(|r| r.name.as_str()).collect()
    }

    /// Owned copy for callers that outlive the source slice
    pub fn to_owned_records(&self) -> Vec<ListingRecord> {
        self.records.iter().map(|r| (*r).clone()).collect()
    }
}

/// Domain service for the markets and properties browsers
#[derive(Debug, Clone, Copy, Default)]
pub struct CatalogEngine;

impl CatalogEngine {
    pub fn new() -> Self {
        Self
    }

    /// Filter and sort `listings` according to `criteria`.
    ///
    /// Pure: the input slice is untouched and identical inputs give identical
    /// views. Sorting is stable, so ties keep input order.
    pub fn apply<'a>(
        &self,
        listings: &'a [ListingRecord],
        criteria: &FilterCriteria,
        favorites: &FavoritesSet,
    ) -> Result<CatalogView<'a>, ConfigurationError> {
        criteria.validate()?;

        let needle = criteria.search.trim().to_lowercase();
        let mut records: Vec<&ListingRecord> = listings
            .iter()
            .filter(|r| r.matches_search(&needle))
            .filter(|r| Self::category_matches(r, criteria.category, favorites))
            .filter(|r| Self::status_matches(r, criteria.status))
            .filter(|r| Self::location_matches(r, &criteria.location))
            .filter(|r| Self::range_matches(r, criteria))
            .collect();

        // Closing-soon only lists records that actually close
        if criteria.sort == SortKey::ClosingSoon {
            records.retain(|r| r.funding_deadline.is_some());
        }

        Self::sort(&mut records, criteria.sort);

        get_logger().debug(
            LogComponent::Domain("Catalog"),
            &format!(
                "filtered {} -> {} listings by {}",
                listings.len(),
                records.len(),
                criteria.sort
            ),
        );

        Ok(CatalogView {
            records,
            total: listings.len(),
            sort: criteria.sort,
        })
    }

    fn category_matches(record: &ListingRecord, filter: CategoryFilter, favorites: &FavoritesSet) -> bool {
        match filter {
            CategoryFilter::All => true,
            CategoryFilter::Favorites => favorites.contains(&record.id),
            CategoryFilter::Only(category) => record.category == category,
        }
    }

    fn status_matches(record: &ListingRecord, filter: StatusFilter) -> bool {
        match filter {
            StatusFilter::All => true,
            StatusFilter::Only(status) => record.status == status,
        }
    }

    fn location_matches(record: &ListingRecord, filter: &LocationFilter) -> bool {
        match filter {
            LocationFilter::All => true,
            LocationFilter::City(city) => record.location.city.to_lowercase() == city.to_lowercase(),
        }
    }

    fn range_matches(record: &ListingRecord, criteria: &FilterCriteria) -> bool {
        let minimum = record.financials.minimum_investment;
        criteria.min_investment.is_none_or(|min| minimum >= min)
            && criteria.max_investment.is_none_or(|max| minimum <= max)
            && criteria.min_yield.is_none_or(|y| record.financials.estimated_yield >= y)
    }

    /// Value a record is ordered by; `None` always sorts last
    pub fn sort_value(record: &ListingRecord, key: SortKey) -> Option<f64> {
        match key {
            SortKey::MarketCap => Some(record.market_cap_or_value()),
            SortKey::Change24h => record.change_24h(),
            SortKey::Volume => record.volume_24h(),
            SortKey::Yield => Some(record.financials.estimated_yield),
            SortKey::Price => Some(record.price()),
            SortKey::FundingProgress => Some(record.funding_progress),
            SortKey::ClosingSoon => record.funding_deadline.map(|d| d.num_days_from_ce() as f64),
            SortKey::Newest => None,
        }
    }

    fn sort(records: &mut [&ListingRecord], key: SortKey) {
        let direction = key.direction();
        if direction == SortDirection::Unsorted {
            return;
        }
        // slice::sort_by is stable
        records.sort_by(|a, b| {
            compare(Self::sort_value(a, key), Self::sort_value(b, key), direction)
        });
    }
}

fn compare(a: Option<f64>, b: Option<f64>, direction: SortDirection) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => match direction {
            SortDirection::Descending => b.total_cmp(&a),
            SortDirection::Ascending => a.total_cmp(&b),
            SortDirection::Unsorted => Ordering::Equal,
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_values_sort_last_in_both_directions() {
        assert_eq!(compare(Some(1.0), None, SortDirection::Descending), Ordering::Less);
        assert_eq!(compare(None, Some(1.0), SortDirection::Ascending), Ordering::Greater);
        assert_eq!(compare(Some(1.0), Some(2.0), SortDirection::Descending), Ordering::Greater);
        assert_eq!(compare(Some(1.0), Some(2.0), SortDirection::Ascending), Ordering::Less);
    }
}
