use crate::domain::errors::ComputationError;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display as StrumDisplay, EnumString};

/// Trading fee on the pair screen: 0.1 % of the order total
pub const TRADING_FEE_RATE: f64 = 0.001;

#[derive(Debug, Clone, Copy, PartialEq, Eq, StrumDisplay, EnumString, AsRefStr, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    Sell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, StrumDisplay, EnumString, AsRefStr, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderKind {
    Limit,
    Market,
}

/// Order form on the mock trading screen. Nothing is ever matched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrderTicket {
    pub side: OrderSide,
    pub kind: OrderKind,
    /// Limit price; ignored for market orders
    pub limit_price: Option<f64>,
    pub amount: f64,
}

/// What the form shows under the inputs
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OrderQuote {
    pub price: f64,
    pub total: f64,
    pub fee: f64,
}

impl OrderTicket {
    /// Price the order executes at: the limit, or the market price
    pub fn effective_price(&self, market_price: f64) -> f64 {
        match (self.kind, self.limit_price) {
            (OrderKind::Limit, Some(price)) if price > 0.0 => price,
            _ => market_price,
        }
    }

    pub fn quote(&self, market_price: f64) -> Result<OrderQuote, ComputationError> {
        let price = self.effective_price(market_price);
        if !price.is_finite() || price < 0.0 || !self.amount.is_finite() || self.amount < 0.0 {
            return Err(ComputationError::InvalidInput("order price and amount must be non-negative".into()));
        }
        let total = price * self.amount;
        Ok(OrderQuote {
            price,
            total,
            fee: total * TRADING_FEE_RATE,
        })
    }
}

/// Token amount for the 25/50/75/100 % quick-fill buttons
pub fn quick_fill_amount(balance: f64, percent: f64, price: f64) -> Result<f64, ComputationError> {
    if price == 0.0 {
        return Err(ComputationError::DivisionByZero("quick fill"));
    }
    if ![balance, percent, price].iter().all(|v| v.is_finite() && *v >= 0.0) {
        return Err(ComputationError::InvalidInput("quick fill inputs must be non-negative".into()));
    }
    Ok((balance * percent / 100.0 / price).round())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn market_orders_ignore_limit_price() {
        let ticket = OrderTicket {
            side: OrderSide::Buy,
            kind: OrderKind::Market,
            limit_price: Some(90.0),
            amount: 10.0,
        };
        let quote = ticket.quote(105.2).unwrap();
        assert_eq!(quote.price, 105.2);
        assert!((quote.total - 1052.0).abs() < 1e-9);
        assert!((quote.fee - 1.052).abs() < 1e-9);
    }

    #[test]
    fn quick_fill_rounds_to_whole_tokens() {
        assert_eq!(quick_fill_amount(10_000.0, 25.0, 105.2).unwrap(), 24.0);
        assert_eq!(
            quick_fill_amount(10_000.0, 25.0, 0.0),
            Err(ComputationError::DivisionByZero("quick fill"))
        );
    }
}
