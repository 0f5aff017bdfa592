use crate::domain::errors::ComputationError;
use serde::{Deserialize, Serialize};

/// A position in the mock portfolio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    pub symbol: String,
    pub name: String,
    pub tokens: u64,
    pub avg_price: f64,
    pub current_price: f64,
}

impl Holding {
    pub fn cost_basis(&self) -> f64 {
        self.tokens as f64 * self.avg_price
    }

    pub fn market_value(&self) -> f64 {
        self.tokens as f64 * self.current_price
    }

    pub fn pnl(&self) -> f64 {
        (self.current_price - self.avg_price) * self.tokens as f64
    }
}

/// Derived figures for one holding row
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingValuation {
    pub symbol: String,
    pub value: f64,
    pub pnl: f64,
    pub pnl_percent: f64,
    pub allocation_percent: f64,
}

/// Totals across all holdings
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub total_value: f64,
    pub total_invested: f64,
    pub total_return: f64,
    pub return_percent: f64,
    pub holdings: Vec<HoldingValuation>,
}

impl PortfolioSummary {
    pub fn from_holdings(holdings: &[Holding]) -> Result<Self, ComputationError> {
        for h in holdings {
            if !(h.avg_price.is_finite() && h.current_price.is_finite()) || h.avg_price < 0.0 || h.current_price < 0.0 {
                return Err(ComputationError::InvalidInput(format!("prices of {}", h.symbol)));
            }
        }

        let total_value: f64 = holdings.iter().map(Holding::market_value).sum();
        let total_invested: f64 = holdings.iter().map(Holding::cost_basis).sum();
        if holdings.is_empty() {
            return Ok(Self {
                total_value,
                total_invested,
                total_return: 0.0,
                return_percent: 0.0,
                holdings: Vec::new(),
            });
        }
        if total_value == 0.0 {
            return Err(ComputationError::DivisionByZero("allocation"));
        }
        if total_invested == 0.0 {
            return Err(ComputationError::DivisionByZero("portfolio return"));
        }

        let valuations = holdings
            .iter()
            .map(|h| {
                let cost = h.cost_basis();
                if cost == 0.0 {
                    return Err(ComputationError::DivisionByZero("holding pnl"));
                }
                Ok(HoldingValuation {
                    symbol: h.symbol.clone(),
                    value: h.market_value(),
                    pnl: h.pnl(),
                    pnl_percent: h.pnl() / cost * 100.0,
                    allocation_percent: h.market_value() / total_value * 100.0,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let total_return = total_value - total_invested;
        Ok(Self {
            total_value,
            total_invested,
            total_return,
            return_percent: total_return / total_invested * 100.0,
            holdings: valuations,
        })
    }
}
