use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::util::decimal::is_positive;

// 2024 income tax schedule. Each bracket is (upper bound, rate, tax owed
// on everything below the bracket).
struct Bracket {
    upper: Option<Decimal>,
    rate: Decimal,
    base: Decimal,
}

const fn bracket(upper: Option<Decimal>, rate: Decimal, base: Decimal) -> Bracket {
    Bracket { upper, rate, base }
}

const BRACKETS: [Bracket; 5] = [
    bracket(Some(dec!(158000)), dec!(0.15), dec!(0)),
    bracket(Some(dec!(330000)), dec!(0.20), dec!(23700)),
    bracket(Some(dec!(800000)), dec!(0.27), dec!(58100)),
    bracket(Some(dec!(4300000)), dec!(0.35), dec!(185000)),
    bracket(None, dec!(0.40), dec!(1410000)),
];

/// Tax owed on an aggregate yearly profit, per the progressive schedule.
/// Losses and zero profit owe nothing. Exact decimal arithmetic, no
/// intermediate rounding.
pub fn compute_tax(profit: Decimal) -> Decimal {
    if !is_positive(&profit) {
        return Decimal::ZERO;
    }
    let mut lower = Decimal::ZERO;
    for b in &BRACKETS {
        let in_bracket = match b.upper {
            Some(upper) if profit > upper => {
                lower = upper;
                continue;
            }
            _ => profit - lower,
        };
        return b.base + in_bracket * b.rate;
    }
    unreachable!("final bracket is unbounded");
}
