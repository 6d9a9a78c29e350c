use chrono::NaiveDate;

use crate::portfolio::Symbol;
use crate::util::decimal::GreaterEqualZeroDecimal;

/// A divergence between the holdings a statement snapshot reports and the
/// holdings computed from the transactions read so far. Non-fatal, since
/// statements can omit activity (transfers in, corporate actions) that the
/// transaction section never shows.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct ReconcileWarning {
    pub symbol: Symbol,
    pub date: NaiveDate,
    pub reported: GreaterEqualZeroDecimal,
    pub computed: GreaterEqualZeroDecimal,
    pub history: Vec<String>,
}

impl std::fmt::Display for ReconcileWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Holdings mismatch for {} on {}: statement reports {}, computed {}",
            self.symbol, self.date, self.reported, self.computed
        )?;
        for line in &self.history {
            write!(f, "\n   {}", line)?;
        }
        Ok(())
    }
}

pub fn check_snapshot_entry(
    symbol: &str,
    date: NaiveDate,
    reported: GreaterEqualZeroDecimal,
    computed: GreaterEqualZeroDecimal,
    history: &[String],
) -> Option<ReconcileWarning> {
    if reported == computed {
        tracing::info!("{symbol} reconciles on {date}: holding {computed}");
        return None;
    }
    Some(ReconcileWarning {
        symbol: symbol.to_string(),
        date,
        reported,
        computed,
        history: history.to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use crate::gezdec;
    use crate::util::date::pub_testlib::ymd;

    use super::check_snapshot_entry;

    #[test]
    fn test_match_produces_no_warning() {
        assert_eq!(
            check_snapshot_entry("AAPL", ymd(2024, 1, 31), gezdec!(10), gezdec!(10), &[]),
            None
        );
    }

    #[test]
    fn test_mismatch_warning_rendering() {
        let history = vec!["2024-01-05 10:15:22 Buy 10 x AAPL @ 100 USD".to_string()];
        let warning = check_snapshot_entry(
            "AAPL",
            ymd(2024, 1, 31),
            gezdec!(50),
            gezdec!(48),
            &history,
        )
        .unwrap();
        let rendered = warning.to_string();
        assert!(rendered.contains(
            "Holdings mismatch for AAPL on 2024-01-31: statement reports 50, computed 48"
        ));
        assert!(rendered.contains("Buy 10 x AAPL"));
    }
}
