use std::collections::VecDeque;

use chrono::Datelike;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::portfolio::model::lot::{Lot, LotConsumption, SellMatch};
use crate::portfolio::model::tx::{Tx, TxAction};
use crate::portfolio::Symbol;
use crate::refdata::{FxRateTable, UfeTable};
use crate::util::basic::SError;
use crate::util::decimal::{GreaterEqualZeroDecimal, PosDecimal};

// Cost bases are only inflation-adjusted when cumulative index growth
// exceeds ten percent.
const INFLATION_ADJUSTMENT_THRESHOLD: Decimal = dec!(0.10);

/// FIFO matcher for one security. Buys open lots, sells consume them
/// oldest-first, and each consumed portion yields a TRY income (FX
/// converted, inflation adjusted where applicable) and a USD income.
pub struct LotMatcher<'a> {
    symbol: Symbol,
    fx: &'a FxRateTable,
    ufe: &'a UfeTable,
    tax_year: i32,
    lots: VecDeque<Lot>,
    held: GreaterEqualZeroDecimal,
    history: Vec<String>,
    sells: Vec<SellMatch>,
    try_income_total: Decimal,
    usd_income_total: Decimal,
}

/// Final per-security result of a matching run.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct SecurityGains {
    pub symbol: Symbol,
    pub try_income: Decimal,
    pub usd_income: Decimal,
    pub sells: Vec<SellMatch>,
    pub held: GreaterEqualZeroDecimal,
}

impl<'a> LotMatcher<'a> {
    pub fn new(
        symbol: Symbol,
        fx: &'a FxRateTable,
        ufe: &'a UfeTable,
        tax_year: i32,
    ) -> LotMatcher<'a> {
        LotMatcher {
            symbol,
            fx,
            ufe,
            tax_year,
            lots: VecDeque::new(),
            held: GreaterEqualZeroDecimal::zero(),
            history: Vec::new(),
            sells: Vec::new(),
            try_income_total: Decimal::ZERO,
            usd_income_total: Decimal::ZERO,
        }
    }

    pub fn held(&self) -> GreaterEqualZeroDecimal {
        self.held
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn apply(&mut self, tx: &Tx) -> Result<(), SError> {
        self.history.push(format!(
            "{} {} {} x {} @ {} {}",
            tx.when, tx.action, tx.quantity, tx.symbol, tx.price, tx.currency
        ));
        match tx.action {
            TxAction::Buy => {
                self.apply_buy(tx);
                Ok(())
            }
            TxAction::Sell => self.apply_sell(tx),
        }
    }

    fn apply_buy(&mut self, tx: &Tx) {
        self.lots.push_back(Lot {
            symbol: tx.symbol.clone(),
            acquired: tx.when,
            price: tx.price,
            remaining: tx.quantity,
        });
        self.held += tx.quantity;
        tracing::debug!(
            "{}: opened lot of {} @ {} (now holding {})",
            self.symbol,
            tx.quantity,
            tx.price,
            self.held
        );
    }

    fn apply_sell(&mut self, tx: &Tx) -> Result<(), SError> {
        let (fx, ufe) = (self.fx, self.ufe);
        let mut remaining = *tx.quantity;
        let mut consumptions = Vec::new();
        let mut try_income = Decimal::ZERO;
        let mut usd_income = Decimal::ZERO;

        for lot in self.lots.iter_mut() {
            if remaining.is_zero() {
                break;
            }
            // A lot is only eligible when acquired strictly before the
            // sell. Same-instant buys cannot fund the sell.
            if lot.acquired >= tx.when || lot.remaining.is_zero() {
                continue;
            }
            let consume = std::cmp::min(remaining, *lot.remaining);
            // consume is min of two positives
            let consume = PosDecimal::try_from(consume).unwrap();

            let (portion_try, adjusted) = portion_try_income(fx, ufe, consume, lot, tx)?;
            let portion_usd = *consume * (*tx.price - *lot.price);

            // consume <= lot.remaining
            lot.remaining =
                GreaterEqualZeroDecimal::try_from(*lot.remaining - *consume).unwrap();
            remaining -= *consume;
            try_income += portion_try;
            usd_income += portion_usd;

            consumptions.push(LotConsumption {
                lot_acquired: lot.acquired,
                lot_price: lot.price,
                consumed: consume,
                lot_remaining_after: lot.remaining,
                try_income: portion_try,
                usd_income: portion_usd,
                inflation_adjusted: adjusted,
            });
        }

        if !remaining.is_zero() {
            return Err(format!(
                "Sell of {} {} on {} cannot be fully matched against prior buys: \
                 {} units remain unmatched",
                tx.quantity,
                self.symbol,
                tx.date(),
                remaining
            ));
        }

        // All of tx.quantity was consumed from held lots
        self.held = GreaterEqualZeroDecimal::try_from(*self.held - *tx.quantity).unwrap();

        let in_tax_year = tx.when.year() == self.tax_year;
        if in_tax_year {
            self.try_income_total += try_income;
            self.usd_income_total += usd_income;
        } else {
            tracing::debug!(
                "{}: sell on {} is outside tax year {}; matched but not taxed",
                self.symbol,
                tx.date(),
                self.tax_year
            );
        }

        self.sells.push(SellMatch {
            symbol: tx.symbol.clone(),
            sold_at: tx.when,
            sell_price: tx.price,
            quantity: tx.quantity,
            consumptions,
            try_income,
            usd_income,
            in_tax_year,
        });
        Ok(())
    }

    pub fn into_gains(self) -> SecurityGains {
        SecurityGains {
            symbol: self.symbol,
            try_income: self.try_income_total,
            usd_income: self.usd_income_total,
            sells: self.sells,
            held: self.held,
        }
    }
}

// TRY income for one consumed portion. Both legs convert at the rate
// preceding their own settlement date, and the buy leg's cost is scaled
// by index growth when that growth clears the threshold.
fn portion_try_income(
    fx: &FxRateTable,
    ufe: &UfeTable,
    consume: PosDecimal,
    lot: &Lot,
    tx: &Tx,
) -> Result<(Decimal, bool), SError> {
    let sell_rate = fx.rate_preceding(tx.date())?;
    let buy_rate = fx.rate_preceding(lot.acquired.date())?;
    let sell_amount = *consume * *tx.price * *sell_rate.usd_try_rate;
    let mut buy_amount = *consume * *lot.price * *buy_rate.usd_try_rate;

    let sell_idx = ufe.index_for(tx.when.year(), tx.when.month())?;
    let buy_idx = ufe.index_for(lot.acquired.year(), lot.acquired.month())?;
    let growth = (*sell_idx - *buy_idx) / *buy_idx;
    let adjusted = growth > INFLATION_ADJUSTMENT_THRESHOLD;
    if adjusted {
        buy_amount *= *sell_idx / *buy_idx;
        tracing::debug!(
            "{}: cost basis of lot from {} adjusted by index growth {growth:.4}",
            lot.symbol,
            lot.acquired.date()
        );
    }
    Ok((sell_amount - buy_amount, adjusted))
}
