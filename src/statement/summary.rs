use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::portfolio::Symbol;
use crate::statement::doc::StatementDocument;
use crate::util::decimal::{parse_statement_decimal, GreaterEqualZeroDecimal};

// Snapshot rows quote everything in USD, which doubles as the row filter.
const CURRENCY_MARKER: &str = "USD";

// End-relative positions of the numeric columns. The security description
// between symbol and quantity varies in width, so the columns are anchored
// to the end of the row.
const QUANTITY_END_OFFSET: usize = 7;
const BUY_PRICE_END_OFFSET: usize = 6;
const PROFIT_END_OFFSET: usize = 4;
const TOTAL_VALUE_END_OFFSET: usize = 2;
const MIN_TOKENS: usize = 8;

/// One security's row of the month-end holdings snapshot.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct SnapshotEntry {
    pub symbol: Symbol,
    pub quantity: GreaterEqualZeroDecimal,
    pub avg_buy_price: GreaterEqualZeroDecimal,
    pub unrealized_profit: Decimal,
    pub total_value: Decimal,
}

/// Holdings reported by the statement as of its portfolio date, keyed by
/// symbol. Rows that do not have the expected shape are dropped with a
/// diagnostic rather than failing the statement.
pub fn parse_portfolio_summary(doc: &StatementDocument) -> HashMap<Symbol, SnapshotEntry> {
    let mut entries = HashMap::new();
    for line in doc.portfolio_lines() {
        if !line.contains(CURRENCY_MARKER) {
            continue;
        }
        match parse_snapshot_row(line) {
            Some(entry) => {
                entries.insert(entry.symbol.clone(), entry);
            }
            None => {
                tracing::warn!(
                    "dropping unparseable holdings row in {} snapshot: {line}",
                    doc.portfolio_date
                );
            }
        }
    }
    entries
}

fn parse_snapshot_row(line: &str) -> Option<SnapshotEntry> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let n = tokens.len();
    if n < MIN_TOKENS {
        return None;
    }

    let quantity = parse_statement_decimal(tokens[n - QUANTITY_END_OFFSET])?;
    let avg_buy_price = parse_statement_decimal(tokens[n - BUY_PRICE_END_OFFSET])?;
    let unrealized_profit = parse_statement_decimal(tokens[n - PROFIT_END_OFFSET])?;
    let total_value = parse_statement_decimal(tokens[n - TOTAL_VALUE_END_OFFSET])?;

    Some(SnapshotEntry {
        symbol: tokens[0].to_string(),
        quantity: GreaterEqualZeroDecimal::try_from(quantity).ok()?,
        avg_buy_price: GreaterEqualZeroDecimal::try_from(avg_buy_price).ok()?,
        unrealized_profit,
        total_value,
    })
}
