use crate::domain::catalog::{
    CatalogEngine, CatalogView, FilterCriteria, ListingId, ListingRecord, ListingSource, ListingStatus,
};
use crate::domain::errors::{AppResult, ApplicationError};
use crate::domain::events::{CatalogEvent, EventDispatcher};
use crate::domain::logging::{LogComponent, get_logger};
use crate::domain::metrics::{cap_rate_percent, net_operating_income};
use crate::domain::session::FavoritesSet;
use serde::Serialize;
use std::rc::Rc;

/// Headline figures over a whole catalog
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogSummary {
    pub listings: usize,
    pub trading: usize,
    pub funding: usize,
    pub total_value: f64,
    /// `None` for an empty catalog
    pub average_yield: Option<f64>,
}

/// Property detail figures
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingDetail {
    pub listing: ListingRecord,
    pub net_operating_income: f64,
    pub cap_rate_percent: f64,
    pub max_investment: f64,
}

/// Use case: browse the markets and properties catalogs
pub struct CatalogBrowser<S: ListingSource> {
    source: S,
    engine: CatalogEngine,
    dispatcher: Option<Rc<dyn EventDispatcher>>,
}

impl<S: ListingSource> CatalogBrowser<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            engine: CatalogEngine::new(),
            dispatcher: None,
        }
    }

    pub fn with_dispatcher(mut self, dispatcher: Rc<dyn EventDispatcher>) -> Self {
        self.dispatcher = Some(dispatcher);
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Favorites flagged in the source data
    pub fn initial_favorites(&self) -> AppResult<FavoritesSet> {
        Ok(FavoritesSet::seeded_from(self.source.listings()?))
    }

    pub fn browse(&self, criteria: &FilterCriteria, favorites: &FavoritesSet) -> AppResult<CatalogView<'_>> {
        let listings = self.source.listings()?;
        let view = self.engine.apply(listings, criteria, favorites)?;
        if let Some(dispatcher) = &self.dispatcher {
            dispatcher.publish_catalog_event(CatalogEvent::ViewFiltered {
                total: view.total(),
                shown: view.len(),
            });
        }
        Ok(view)
    }

    /// Browse with raw control labels (`"Favorites"`, `"24h Change"`, ...)
    pub fn browse_labels(
        &self,
        search: &str,
        category: &str,
        status: &str,
        sort: &str,
        favorites: &FavoritesSet,
    ) -> AppResult<CatalogView<'_>> {
        let criteria = FilterCriteria::from_labels(search, category, status, sort)?;
        self.browse(&criteria, favorites)
    }

    pub fn listing(&self, id: &ListingId) -> AppResult<&ListingRecord> {
        self.source
            .find(id)?
            .ok_or_else(|| ApplicationError::ListingNotFound(id.to_string()).into())
    }

    pub fn detail(&self, id: &ListingId) -> AppResult<ListingDetail> {
        let listing = self.listing(id)?;
        let financials = &listing.financials;
        Ok(ListingDetail {
            net_operating_income: net_operating_income(financials.annual_rent, financials.expenses),
            cap_rate_percent: cap_rate_percent(financials)?,
            max_investment: financials.max_investment(),
            listing: listing.clone(),
        })
    }

    pub fn summary(&self) -> AppResult<CatalogSummary> {
        let listings = self.source.listings()?;
        let count_status = |status: ListingStatus| listings.iter().filter(|l| l.status == status).count();
        let average_yield = if listings.is_empty() {
            None
        } else {
            Some(listings.iter().map(|l| l.financials.estimated_yield).sum::<f64>() / listings.len() as f64)
        };

        let summary = CatalogSummary {
            listings: listings.len(),
            trading: count_status(ListingStatus::Trading),
            funding: count_status(ListingStatus::Funding),
            total_value: listings.iter().map(|l| l.financials.total_value).sum(),
            average_yield,
        };
        get_logger().debug(
            LogComponent::Application("CatalogBrowser"),
            &format!("summary over {} listings", summary.listings),
        );
        Ok(summary)
    }
}

