//! Derived figures: return projections, cap rate, portfolio valuation and
//! the trading-screen order ticket. Pure and deterministic.

pub mod order_ticket;
pub mod portfolio;
pub mod returns;
pub mod valuation;

pub use order_ticket::{OrderKind, OrderQuote, OrderSide, OrderTicket, TRADING_FEE_RATE, quick_fill_amount};
pub use portfolio::{Holding, HoldingValuation, PortfolioSummary};
pub use returns::{ReturnProjection, ReturnsCalculator, estimated_annual_return, round_to_cents, token_count};
pub use valuation::{cap_rate_percent, net_operating_income};
