use crate::domain::catalog::ListingId;
use crate::domain::investment::TransactionStep;
use std::fmt::Debug;

/// Base trait for all domain events
pub trait DomainEvent: Debug + Clone {
    fn event_type(&self) -> &'static str;
}

/// Events raised by an investment session
#[derive(Debug, Clone, PartialEq)]
pub enum InvestmentEvent {
    StateChanged {
        listing: ListingId,
        from: TransactionStep,
        to: TransactionStep,
    },
    ConnectionRequested {
        listing: ListingId,
    },
    SettlementAttemptFailed {
        listing: ListingId,
        attempt: u32,
        reason: String,
    },
}

impl DomainEvent for InvestmentEvent {
    fn event_type(&self) -> &'static str {
        match self {
            InvestmentEvent::StateChanged { .. } => "StateChanged",
            InvestmentEvent::ConnectionRequested { .. } => "ConnectionRequested",
            InvestmentEvent::SettlementAttemptFailed { .. } => "SettlementAttemptFailed",
        }
    }
}

/// Events raised while browsing catalogs
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogEvent {
    FavoriteToggled { listing: ListingId, is_favorite: bool },
    ViewFiltered { total: usize, shown: usize },
}

impl DomainEvent for CatalogEvent {
    fn event_type(&self) -> &'static str {
        match self {
            CatalogEvent::FavoriteToggled { .. } => "FavoriteToggled",
            CatalogEvent::ViewFiltered { .. } => "ViewFiltered",
        }
    }
}

/// Event dispatcher for publishing events
pub trait EventDispatcher {
    fn publish_investment_event(&self, event: InvestmentEvent);
    fn publish_catalog_event(&self, event: CatalogEvent);
}

/// Simple in-memory event dispatcher
#[derive(Default)]
pub struct InMemoryEventDispatcher {
    investment_handlers: Vec<Box<dyn Fn(&InvestmentEvent)>>,
    catalog_handlers: Vec<Box<dyn Fn(&CatalogEvent)>>,
}

impl InMemoryEventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe_to_investment_events<F>(&mut self, handler: F)
    where
        F: Fn(&InvestmentEvent) + 'static,
    {
        self.investment_handlers.push(Box::new(handler));
    }

    pub fn subscribe_to_catalog_events<F>(&mut self, handler: F)
    where
        F: Fn(&CatalogEvent) + 'static,
    {
        self.catalog_handlers.push(Box::new(handler));
    }
}

impl EventDispatcher for InMemoryEventDispatcher {
    fn publish_investment_event(&self, event: InvestmentEvent) {
        for handler in &self.investment_handlers {
            handler(&event);
        }
    }

    fn publish_catalog_event(&self, event: CatalogEvent) {
        for handler in &self.catalog_handlers {
            handler(&event);
        }
    }
}
