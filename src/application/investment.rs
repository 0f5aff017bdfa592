use crate::domain::catalog::{ListingId, ListingSource};
use crate::domain::errors::{AppResult, ApplicationError};
use crate::domain::events::EventDispatcher;
use crate::domain::investment::{InvestmentSession, InvestmentSettings, TransactionId};
use crate::domain::logging::{LogComponent, get_logger};
use std::rc::Rc;

/// Use case: open invest modals for listings of one source
pub struct InvestmentCoordinator<S: ListingSource> {
    source: S,
    settings: InvestmentSettings,
    explorer_base_url: String,
    dispatcher: Option<Rc<dyn EventDispatcher>>,
}

impl<S: ListingSource> InvestmentCoordinator<S> {
    pub fn new(source: S, settings: InvestmentSettings, explorer_base_url: impl Into<String>) -> Self {
        Self {
            source,
            settings,
            explorer_base_url: explorer_base_url.into(),
            dispatcher: None,
        }
    }

    pub fn with_dispatcher(mut self, dispatcher: Rc<dyn EventDispatcher>) -> Self {
        self.dispatcher = Some(dispatcher);
        self
    }

    pub fn settings(&self) -> &InvestmentSettings {
        &self.settings
    }

    /// Start a session for `listing_id` in the Input step
    pub fn open_session(&self, listing_id: &ListingId) -> AppResult<InvestmentSession> {
        let listing = self
            .source
            .find(listing_id)?
            .ok_or_else(|| ApplicationError::ListingNotFound(listing_id.to_string()))?;

        let session = InvestmentSession::open(listing, self.settings)?;
        get_logger().info(
            LogComponent::Application("InvestmentCoordinator"),
            &format!("invest modal opened for {}", listing.name),
        );
        Ok(match &self.dispatcher {
            Some(dispatcher) => session.with_dispatcher(dispatcher.clone()),
            None => session,
        })
    }

    /// Block explorer page for a settled transaction
    pub fn explorer_link(&self, transaction: &TransactionId) -> String {
        transaction.explorer_url(&self.explorer_base_url)
    }
}
