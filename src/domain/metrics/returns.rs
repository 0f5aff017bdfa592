use crate::domain::errors::{ComputationError, DomainResult, ValidationError};
use serde::Serialize;

/// Round a monetary figure to cents. This is the only rounding step;
/// everything upstream keeps full precision.
pub fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn ensure_non_negative(name: &str, value: f64) -> Result<f64, ComputationError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ComputationError::InvalidInput(format!(
            "{} must be a finite, non-negative number (got {})",
            name, value
        )));
    }
    Ok(value)
}

/// Whole tokens bought by `amount` at `token_price`
pub fn token_count(amount: f64, token_price: f64) -> Result<u64, ComputationError> {
    let amount = ensure_non_negative("amount", amount)?;
    let token_price = ensure_non_negative("token price", token_price)?;
    if token_price == 0.0 {
        return Err(ComputationError::DivisionByZero("token count"));
    }
    Ok((amount / token_price).floor() as u64)
}

/// Yearly income on `principal` at `annual_yield_percent`
pub fn estimated_annual_return(principal: f64, annual_yield_percent: f64) -> Result<f64, ComputationError> {
    let principal = ensure_non_negative("principal", principal)?;
    let rate = ensure_non_negative("annual yield", annual_yield_percent)? / 100.0;
    Ok(principal * rate)
}

/// Projected payouts for a principal held at a constant yield.
///
/// Five-year value compounds annually with the yield held fixed; it is a
/// display figure, not a financial model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnProjection {
    pub principal: f64,
    pub annual_yield_percent: f64,
    pub quarterly_dividend: f64,
    pub annual_income: f64,
    pub five_year_value: f64,
}

impl ReturnProjection {
    pub fn compute(principal: f64, annual_yield_percent: f64) -> Result<Self, ComputationError> {
        let principal = ensure_non_negative("principal", principal)?;
        let yield_percent = ensure_non_negative("annual yield", annual_yield_percent)?;
        let rate = yield_percent / 100.0;

        Ok(Self {
            principal,
            annual_yield_percent: yield_percent,
            quarterly_dividend: principal * rate / 4.0,
            annual_income: principal * rate,
            five_year_value: principal * (1.0 + rate).powi(5),
        })
    }

    /// Copy with every monetary figure rounded to cents
    pub fn rounded(&self) -> Self {
        Self {
            principal: round_to_cents(self.principal),
            annual_yield_percent: self.annual_yield_percent,
            quarterly_dividend: round_to_cents(self.quarterly_dividend),
            annual_income: round_to_cents(self.annual_income),
            five_year_value: round_to_cents(self.five_year_value),
        }
    }

    pub fn five_year_gain(&self) -> f64 {
        self.five_year_value - self.principal
    }
}

/// Investor-page calculator: a text field plus the platform average yield
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReturnsCalculator {
    annual_yield_percent: f64,
}

impl ReturnsCalculator {
    pub fn new(annual_yield_percent: f64) -> Self {
        Self { annual_yield_percent }
    }

    pub fn annual_yield_percent(&self) -> f64 {
        self.annual_yield_percent
    }

    /// Parse the amount field. Blank means nothing entered yet.
    pub fn parse_principal(input: &str) -> Result<f64, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(0.0);
        }
        let cleaned: String = trimmed.chars().filter(|c| *c != ',' && *c != '_').collect();
        match cleaned.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value),
            Ok(_) => Err(ValidationError::NonFiniteAmount),
            Err(_) => Err(ValidationError::UnparsableAmount(input.to_string())),
        }
    }

    pub fn project(&self, principal: f64) -> Result<ReturnProjection, ComputationError> {
        ReturnProjection::compute(principal, self.annual_yield_percent)
    }

    /// Parse the text field and project it in one go
    pub fn project_input(&self, input: &str) -> DomainResult<ReturnProjection> {
        let principal = Self::parse_principal(input)?;
        Ok(self.project(principal)?)
    }
}
