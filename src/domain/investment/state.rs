use crate::domain::catalog::{ListingId, ListingRecord};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display as StrumDisplay, EnumIter};

/// Named steps of the invest modal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay, EnumIter, AsRefStr, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStep {
    Input,
    Confirm,
    Processing,
    Success,
    Error,
}

/// What happens to amounts outside `[minimum, maximum]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AmountPolicy {
    /// Pull the amount back into range without complaining
    #[default]
    Clamp,
    /// Leave the amount untouched and report a validation error
    Reject,
}

/// Synthetic on-chain transaction hash
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[display(fmt = "{}", _0)]
pub struct TransactionId(String);

impl TransactionId {
    pub fn from_bytes(bytes: &[u8; 32]) -> Self {
        Self(format!("0x{}", hex::encode(bytes)))
    }

    pub fn value(&self) -> &str {
        &self.0
    }

    /// `0x12345678...9abcdef0`, as shown on the success step
    pub fn short(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        if chars.len() <= 18 {
            return self.0.clone();
        }
        let head: String = chars[..10].iter().collect();
        let tail: String = chars[chars.len() - 8..].iter().collect();
        format!("{}...{}", head, tail)
    }

    pub fn explorer_url(&self, explorer_base: &str) -> String {
        format!("{}/tx/{}", explorer_base.trim_end_matches('/'), self.0)
    }
}

/// Listing fields an investment session needs, copied at open time
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentTerms {
    pub listing: ListingId,
    pub name: String,
    pub token_price: f64,
    pub minimum_investment: f64,
    pub maximum_investment: f64,
    pub estimated_yield: f64,
    pub network: String,
    pub token_symbol: Option<String>,
}

impl From<&ListingRecord> for InvestmentTerms {
    fn from(record: &ListingRecord) -> Self {
        Self {
            listing: record.id.clone(),
            name: record.name.clone(),
            token_price: record.financials.token_price,
            minimum_investment: record.financials.minimum_investment,
            maximum_investment: record.financials.max_investment(),
            estimated_yield: record.financials.estimated_yield,
            network: record.network.clone(),
            token_symbol: record.token_symbol.clone(),
        }
    }
}

/// Figures shown under the amount input
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentQuote {
    pub amount: f64,
    pub tokens: u64,
    pub token_price: f64,
    pub estimated_annual_return: f64,
    pub transaction_fee: f64,
    pub total: f64,
}

/// Immutable summary shown on the confirm step
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmationSnapshot {
    pub amount: f64,
    pub tokens: u64,
    pub network: String,
    pub wallet_address: String,
    pub estimated_annual_return: f64,
}

/// Terminal figures of a settled investment
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementOutcome {
    pub transaction_id: TransactionId,
    pub amount: f64,
    pub tokens_received: u64,
    pub estimated_annual_return: f64,
    pub attempts: u32,
}

/// Why processing ended in the error step
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionFailure {
    pub reason: String,
    pub attempts: u32,
}

/// Current state of the invest modal
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "step", rename_all = "lowercase")]
pub enum TransactionState {
    Input,
    Confirm(ConfirmationSnapshot),
    Processing(ConfirmationSnapshot),
    Success(SettlementOutcome),
    Error(TransactionFailure),
}

impl TransactionState {
    pub fn step(&self) -> TransactionStep {
        match self {
            TransactionState::Input => TransactionStep::Input,
            TransactionState::Confirm(_) => TransactionStep::Confirm,
            TransactionState::Processing(_) => TransactionStep::Processing,
            TransactionState::Success(_) => TransactionStep::Success,
            TransactionState::Error(_) => TransactionStep::Error,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, TransactionState::Success(_) | TransactionState::Error(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transaction_id_short_form() {
        let id = TransactionId::from_bytes(&[0xab; 32]);
        assert_eq!(id.value().len(), 66);
        assert_eq!(id.short(), "0xabababab...abababab");
        assert_eq!(
            id.explorer_url("https://polygonscan.com/"),
            format!("https://polygonscan.com/tx/{}", id.value())
        );
    }
}
