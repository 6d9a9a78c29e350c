use chrono::NaiveDateTime;
use rust_decimal::Decimal;

use crate::portfolio::Symbol;
use crate::util::decimal::{GreaterEqualZeroDecimal, PosDecimal};

/// An open position created by a buy, consumed (possibly in pieces) by
/// later sells, oldest first.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Lot {
    pub symbol: Symbol,
    pub acquired: NaiveDateTime,
    pub price: GreaterEqualZeroDecimal,
    pub remaining: GreaterEqualZeroDecimal,
}

/// One lot's contribution to a sell.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct LotConsumption {
    pub lot_acquired: NaiveDateTime,
    pub lot_price: GreaterEqualZeroDecimal,
    pub consumed: PosDecimal,
    pub lot_remaining_after: GreaterEqualZeroDecimal,
    pub try_income: Decimal,
    pub usd_income: Decimal,
    // Whether the TRY cost basis was scaled up by ÜFE growth.
    pub inflation_adjusted: bool,
}

/// A fully matched sell, broken down by the lots it consumed.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct SellMatch {
    pub symbol: Symbol,
    pub sold_at: NaiveDateTime,
    pub sell_price: GreaterEqualZeroDecimal,
    pub quantity: GreaterEqualZeroDecimal,
    pub consumptions: Vec<LotConsumption>,
    pub try_income: Decimal,
    pub usd_income: Decimal,
    pub in_tax_year: bool,
}
