use crate::domain::catalog::Financials;
use crate::domain::errors::ComputationError;

/// Rent minus operating expenses; missing figures count as zero
pub fn net_operating_income(annual_rent: Option<f64>, expenses: Option<f64>) -> f64 {
    annual_rent.unwrap_or(0.0) - expenses.unwrap_or(0.0)
}

/// Net operating income as a percentage of total asset value.
///
/// A zero-valued asset has no cap rate: that is an error, never `NaN`.
pub fn cap_rate_percent(financials: &Financials) -> Result<f64, ComputationError> {
    let total_value = financials.total_value;
    if !total_value.is_finite() {
        return Err(ComputationError::InvalidInput(format!("total value {}", total_value)));
    }
    if total_value == 0.0 {
        return Err(ComputationError::DivisionByZero("cap rate"));
    }
    let noi = net_operating_income(financials.annual_rent, financials.expenses);
    Ok(noi / total_value * 100.0)
}
