use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

use crate::portfolio::Symbol;
use crate::util::decimal::GreaterEqualZeroDecimal;

#[derive(PartialEq, Eq, Clone, Copy, Debug, Hash)]
pub enum TxAction {
    Buy,
    Sell,
}

impl TxAction {
    pub fn pretty_str(&self) -> &str {
        match self {
            TxAction::Buy => "Buy",
            TxAction::Sell => "Sell",
        }
    }
}

impl std::fmt::Display for TxAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.pretty_str())
    }
}

/// A single executed trade from a statement's investment section.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Tx {
    pub symbol: Symbol,
    pub action: TxAction,
    pub when: NaiveDateTime,
    pub price: GreaterEqualZeroDecimal,
    pub quantity: GreaterEqualZeroDecimal,
    pub fee: GreaterEqualZeroDecimal,
    pub amount: GreaterEqualZeroDecimal,
    pub currency: String,
    // The line number in the statement's transaction section. Used as a
    // tie-breaker to keep same-timestamp trades in statement order.
    pub read_index: u32,
}

impl Tx {
    pub fn date(&self) -> NaiveDate {
        self.when.date()
    }

    pub fn signature(&self) -> TxSignature {
        TxSignature {
            when: self.when,
            symbol: self.symbol.clone(),
            action: self.action,
            price: *self.price,
            quantity: *self.quantity,
        }
    }
}

/// Identity of a trade for de-duplication. Consecutive monthly statements
/// overlap, so the same trade can appear in more than one document.
#[derive(PartialEq, Eq, Clone, Debug, Hash)]
pub struct TxSignature {
    pub when: NaiveDateTime,
    pub symbol: Symbol,
    pub action: TxAction,
    pub price: Decimal,
    pub quantity: Decimal,
}

impl PartialOrd for Tx {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Tx {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.when, self.read_index).cmp(&(other.when, other.read_index))
    }
}
