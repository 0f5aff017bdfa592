use js_sys::Promise;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

use crate::application::{CatalogBrowser, InvestmentCoordinator};
use crate::config::AppConfig;
use crate::domain::catalog::{ListingId, ListingRecord};
use crate::domain::errors::{AppError, ApplicationError};
use crate::domain::investment::{InvestAction, InvestmentSession, SessionTeardown, TransactionState};
use crate::domain::logging::{LogComponent, get_logger};
use crate::domain::metrics::{Holding, OrderTicket, PortfolioSummary, ReturnsCalculator};
use crate::domain::session::UserSession;
use crate::infrastructure::{DemoWallet, GlooTimer, SeedListingSource, SimulatedSettlementGateway};
use serde::Serialize;

fn to_js(error: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&error.to_string())
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(to_js)
}

fn load_config(config_json: Option<String>) -> Result<AppConfig, JsValue> {
    match config_json {
        Some(json) => AppConfig::from_json_str(&json).map_err(to_js),
        None => Ok(AppConfig::default()),
    }
}

/// Favorites and wallet shared by the catalog and invest APIs
#[wasm_bindgen]
pub struct DemoSession {
    inner: Rc<RefCell<UserSession<DemoWallet>>>,
}

#[wasm_bindgen]
impl DemoSession {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<DemoSession, JsValue> {
        let favorites = CatalogBrowser::new(SeedListingSource::new())
            .initial_favorites()
            .map_err(to_js)?;
        Ok(Self {
            inner: Rc::new(RefCell::new(UserSession::new(favorites, DemoWallet::auto_approving()))),
        })
    }

    #[wasm_bindgen(js_name = isWalletConnected)]
    pub fn is_wallet_connected(&self) -> bool {
        use crate::domain::session::WalletConnection;
        self.inner.borrow().wallet().is_connected()
    }

    #[wasm_bindgen(js_name = walletAddress)]
    pub fn wallet_address(&self) -> Option<String> {
        use crate::domain::session::WalletConnection;
        self.inner.borrow().wallet().address().map(str::to_string)
    }
}

/// Markets and properties browsers
#[wasm_bindgen]
pub struct CatalogApi {
    browser: CatalogBrowser<SeedListingSource>,
    session: Rc<RefCell<UserSession<DemoWallet>>>,
}

#[wasm_bindgen]
impl CatalogApi {
    #[wasm_bindgen(constructor)]
    pub fn new(session: &DemoSession) -> CatalogApi {
        Self {
            browser: CatalogBrowser::new(SeedListingSource::new()),
            session: session.inner.clone(),
        }
    }

    /// Filtered, sorted listings as a JSON array
    pub fn browse(&self, search: &str, category: &str, status: &str, sort: &str) -> Result<String, JsValue> {
        let session = self.session.borrow();
        let view = self
            .browser
            .browse_labels(search, category, status, sort, session.favorites())
            .map_err(to_js)?;
        let records: Vec<&ListingRecord> = view.records().to_vec();
        to_json(&records)
    }

    /// Flip a favorite, returning the new membership
    #[wasm_bindgen(js_name = toggleFavorite)]
    pub fn toggle_favorite(&self, listing_id: &str) -> Result<bool, JsValue> {
        let id = ListingId::from(listing_id);
        self.browser.listing(&id).map_err(to_js)?;
        Ok(self.session.borrow_mut().toggle_favorite(&id, None))
    }

    pub fn detail(&self, listing_id: &str) -> Result<String, JsValue> {
        let detail = self.browser.detail(&ListingId::from(listing_id)).map_err(to_js)?;
        to_json(&detail)
    }

    pub fn summary(&self) -> Result<String, JsValue> {
        to_json(&self.browser.summary().map_err(to_js)?)
    }
}

/// Investors page calculator plus the trade and portfolio figures
#[wasm_bindgen]
pub struct ReturnsApi {
    calculator: ReturnsCalculator,
}

#[wasm_bindgen]
impl ReturnsApi {
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<ReturnsApi, JsValue> {
        let config = load_config(config_json)?;
        Ok(Self {
            calculator: config.returns.calculator(),
        })
    }

    /// Projection for the text in the amount field, rounded to cents
    pub fn project(&self, input: &str) -> Result<String, JsValue> {
        let projection = self.calculator.project_input(input).map_err(to_js)?;
        to_json(&projection.rounded())
    }

    #[wasm_bindgen(js_name = quoteOrder)]
    pub fn quote_order(&self, ticket_json: &str, market_price: f64) -> Result<String, JsValue> {
        let ticket: OrderTicket = serde_json::from_str(ticket_json).map_err(to_js)?;
        to_json(&ticket.quote(market_price).map_err(to_js)?)
    }

    #[wasm_bindgen(js_name = valuePortfolio)]
    pub fn value_portfolio(&self, holdings_json: &str) -> Result<String, JsValue> {
        let holdings: Vec<Holding> = serde_json::from_str(holdings_json).map_err(to_js)?;
        to_json(&PortfolioSummary::from_holdings(&holdings).map_err(to_js)?)
    }
}

struct InvestmentSlot {
    session: InvestmentSession,
    gateway: SimulatedSettlementGateway<GlooTimer>,
}

/// One open invest modal.
///
/// While `confirm` is pending the session is owned by the promise and
/// every other call reports the session as busy.
#[wasm_bindgen]
pub struct InvestmentApi {
    slot: Rc<RefCell<Option<InvestmentSlot>>>,
    teardown: SessionTeardown,
    user: Rc<RefCell<UserSession<DemoWallet>>>,
    explorer_base_url: String,
}

impl InvestmentApi {
    fn with_slot<T>(&self, f: impl FnOnce(&mut InvestmentSlot) -> Result<T, AppError>) -> Result<T, JsValue> {
        if self.teardown.is_closed() {
            return Err(to_js(ApplicationError::SessionClosed));
        }
        let mut slot = self.slot.borrow_mut();
        match slot.as_mut() {
            Some(slot) => f(slot).map_err(to_js),
            None => Err(to_js(ApplicationError::SessionBusy("settlement in progress".into()))),
        }
    }
}

#[wasm_bindgen]
impl InvestmentApi {
    #[wasm_bindgen(constructor)]
    pub fn open(session: &DemoSession, listing_id: &str, config_json: Option<String>) -> Result<InvestmentApi, JsValue> {
        let config = load_config(config_json)?;
        let coordinator = InvestmentCoordinator::new(
            SeedListingSource::new(),
            config.investment.settings,
            config.investment.explorer_base_url.clone(),
        );
        let investment = coordinator
            .open_session(&ListingId::from(listing_id))
            .map_err(to_js)?;
        let gateway = SimulatedSettlementGateway::new(GlooTimer, config.investment.settlement_delay())
            .with_failure(config.investment.failure);

        Ok(Self {
            teardown: investment.teardown_handle(),
            slot: Rc::new(RefCell::new(Some(InvestmentSlot {
                session: investment,
                gateway,
            }))),
            user: session.inner.clone(),
            explorer_base_url: config.investment.explorer_base_url,
        })
    }

    /// Current state as JSON (`{"step": "input", ...}`)
    pub fn state(&self) -> Result<String, JsValue> {
        let state: TransactionState = self.with_slot(|slot| Ok(slot.session.state().clone()))?;
        to_json(&state)
    }

    /// Store an amount and return the quote for it
    #[wasm_bindgen(js_name = setAmount)]
    pub fn set_amount(&self, amount: f64) -> Result<String, JsValue> {
        let quote = self.with_slot(|slot| {
            slot.session.set_amount(amount)?;
            Ok(slot.session.quote()?)
        })?;
        to_json(&quote)
    }

    /// `true` when the modal moved to Confirm, `false` when a wallet
    /// connection was requested instead
    pub fn invest(&self) -> Result<bool, JsValue> {
        let user = self.user.clone();
        self.with_slot(|slot| {
            let mut user = user.borrow_mut();
            let action = slot.session.invest(user.wallet_mut())?;
            Ok(action == InvestAction::AwaitingConfirmation)
        })
    }

    pub fn back(&self) -> Result<(), JsValue> {
        self.with_slot(|slot| Ok(slot.session.back()?))
    }

    pub fn retry(&self) -> Result<(), JsValue> {
        self.with_slot(|slot| Ok(slot.session.retry()?))
    }

    /// Settle the confirmed investment. Resolves to the final state JSON.
    pub fn confirm(&self) -> Promise {
        let slot_cell = self.slot.clone();
        let teardown = self.teardown.clone();
        future_to_promise(async move {
            if teardown.is_closed() {
                return Err(to_js(ApplicationError::SessionClosed));
            }
            let taken = slot_cell.borrow_mut().take();
            let Some(mut slot) = taken else {
                return Err(to_js(ApplicationError::SessionBusy("settlement in progress".into())));
            };

            let outcome = slot.session.confirm(&mut slot.gateway, &GlooTimer).await;
            let state = slot.session.state().clone();
            if !teardown.is_closed() {
                *slot_cell.borrow_mut() = Some(slot);
            }
            outcome.map_err(to_js)?;
            Ok(JsValue::from_str(&to_json(&state)?))
        })
    }

    /// Explorer link of the settled transaction, if any
    #[wasm_bindgen(js_name = explorerLink)]
    pub fn explorer_link(&self) -> Result<Option<String>, JsValue> {
        let base = self.explorer_base_url.clone();
        self.with_slot(|slot| {
            Ok(match slot.session.state() {
                TransactionState::Success(outcome) => Some(outcome.transaction_id.explorer_url(&base)),
                _ => None,
            })
        })
    }

    /// Tear the modal down; an in-flight settlement is aborted
    pub fn close(&self) {
        get_logger().info(LogComponent::Presentation("InvestmentApi"), "invest modal closed");
        self.teardown.close();
        self.slot.borrow_mut().take();
    }
}
