use crate::portfolio::model::tx::{Tx, TxAction};
use crate::util::date::parse_statement_datetime;
use crate::util::decimal::{parse_statement_decimal, GreaterEqualZeroDecimal};

// Orders in these states never executed, so they carry no position effect.
const CANCELLED_STATUSES: [&str; 2] = ["İptal", "Reddedildi"];

const BUY_SIDE: &str = "Alış";
const SELL_SIDE: &str = "Satış";

const SYMBOL_TOKEN: usize = 4;
const SIDE_TOKEN: usize = 5;
const STATUS_TOKEN: usize = 6;
const CURRENCY_TOKEN: usize = 7;
const MIN_TOKENS: usize = 10;

/// Interprets one line of the investment transactions section. Returns
/// `None` for anything that is not an executed trade: headers, page
/// furniture, cancelled or rejected orders, and malformed rows. The
/// section is noisy by nature, so a non-trade line is never an error.
pub fn parse_tx_line(line: &str, read_index: u32) -> Option<Tx> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < MIN_TOKENS {
        return None;
    }

    let when = parse_statement_datetime(&format!("{} {}", tokens[0], tokens[1])).ok()?;

    let action = match tokens[SIDE_TOKEN] {
        BUY_SIDE => TxAction::Buy,
        SELL_SIDE => TxAction::Sell,
        _ => return None,
    };
    if CANCELLED_STATUSES.contains(&tokens[STATUS_TOKEN]) {
        tracing::debug!("skipping cancelled order line: {line}");
        return None;
    }

    // The trailing numeric columns are fixed relative to the end of the
    // line, since the description columns can themselves contain spaces.
    let n = tokens.len();
    let quantity = parse_statement_decimal(tokens[n - 4])?;
    let price = parse_statement_decimal(tokens[n - 3])?;
    let fee = parse_statement_decimal(tokens[n - 2])?;
    let amount = parse_statement_decimal(tokens[n - 1])?;

    Some(Tx {
        symbol: tokens[SYMBOL_TOKEN].to_string(),
        action,
        when,
        price: GreaterEqualZeroDecimal::try_from(price).ok()?,
        quantity: GreaterEqualZeroDecimal::try_from(quantity).ok()?,
        fee: GreaterEqualZeroDecimal::try_from(fee).ok()?,
        amount: GreaterEqualZeroDecimal::try_from(amount).ok()?,
        currency: tokens[CURRENCY_TOKEN].to_string(),
        read_index,
    })
}
