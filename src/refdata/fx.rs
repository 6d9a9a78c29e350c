use std::collections::HashMap;

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;

use crate::util::basic::SError;
use crate::util::decimal::PosDecimal;

// Rate file keys look like "02-01-2024".
pub const RATE_TABLE_DATE_FORMAT: &str = "%d-%m-%Y";

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct DailyRate {
    pub date: NaiveDate,
    pub usd_try_rate: PosDecimal,
}

impl std::fmt::Display for DailyRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.date, self.usd_try_rate)
    }
}

/// USD/TRY closing rates keyed by day. Days the central bank publishes no
/// rate (weekends, holidays) are simply absent.
#[derive(Debug)]
pub struct FxRateTable {
    rates: HashMap<NaiveDate, PosDecimal>,
    earliest: NaiveDate,
}

impl FxRateTable {
    pub fn from_json(json_text: &str) -> Result<FxRateTable, SError> {
        let raw: HashMap<String, Decimal> = serde_json::from_str(json_text)
            .map_err(|e| format!("Failed to parse rate table: {e}"))?;

        let mut rates = HashMap::with_capacity(raw.len());
        for (date_str, rate) in raw {
            let date = NaiveDate::parse_from_str(&date_str, RATE_TABLE_DATE_FORMAT)
                .map_err(|e| format!("Invalid date \"{date_str}\" in rate table: {e}"))?;
            let rate = PosDecimal::try_from(rate)
                .map_err(|_| format!("Invalid rate {rate} for {date_str} in rate table"))?;
            rates.insert(date, rate);
        }
        Self::from_rates(rates)
    }

    pub fn from_rates(rates: HashMap<NaiveDate, PosDecimal>) -> Result<FxRateTable, SError> {
        let earliest = rates
            .keys()
            .min()
            .copied()
            .ok_or_else(|| "Rate table is empty".to_string())?;
        Ok(FxRateTable { rates, earliest })
    }

    /// The rate in effect for a settlement on `date`: the closing rate of
    /// the nearest day strictly before it. The rate of `date` itself is
    /// never used, even when published.
    pub fn rate_preceding(&self, date: NaiveDate) -> Result<DailyRate, SError> {
        let mut cursor = date - Duration::days(1);
        while cursor >= self.earliest {
            if let Some(rate) = self.rates.get(&cursor) {
                return Ok(DailyRate {
                    date: cursor,
                    usd_try_rate: *rate,
                });
            }
            cursor -= Duration::days(1);
        }
        Err(format!(
            "No USD/TRY rate available preceding {date} (table starts at {})",
            self.earliest
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use crate::pdec;
    use crate::util::date::pub_testlib::ymd;

    use super::FxRateTable;

    fn sample_table() -> FxRateTable {
        // 6th/7th are a weekend gap.
        FxRateTable::from_rates(HashMap::from([
            (ymd(2024, 1, 2), pdec!(29.80)),
            (ymd(2024, 1, 4), pdec!(29.95)),
            (ymd(2024, 1, 5), pdec!(30.00)),
            (ymd(2024, 1, 8), pdec!(30.10)),
        ]))
        .unwrap()
    }

    #[test]
    fn test_from_json() {
        let table = FxRateTable::from_json(
            r#"{"02-01-2024": 29.80, "03-01-2024": 29.90}"#,
        )
        .unwrap();
        let rate = table.rate_preceding(ymd(2024, 1, 4)).unwrap();
        assert_eq!(rate.date, ymd(2024, 1, 3));
        assert_eq!(rate.usd_try_rate, pdec!(29.90));
    }

    #[test]
    fn test_from_json_errors() {
        let _ = FxRateTable::from_json("{}").unwrap_err();
        let _ = FxRateTable::from_json(r#"{"not-a-date": 29.80}"#).unwrap_err();
        let _ = FxRateTable::from_json(r#"{"02-01-2024": -1}"#).unwrap_err();
        let _ = FxRateTable::from_json("not json").unwrap_err();
    }

    #[test]
    fn test_rate_preceding_is_strictly_prior() {
        let table = sample_table();
        // The 5th has its own rate, but the settlement uses the 4th's.
        let rate = table.rate_preceding(ymd(2024, 1, 5)).unwrap();
        assert_eq!(rate.date, ymd(2024, 1, 4));
        assert_eq!(rate.usd_try_rate, pdec!(29.95));
    }

    #[test]
    fn test_rate_preceding_skips_gaps() {
        let table = sample_table();
        // Monday the 8th looks back past the weekend to Friday the 5th.
        let rate = table.rate_preceding(ymd(2024, 1, 8)).unwrap();
        assert_eq!(rate.date, ymd(2024, 1, 5));

        let rate = table.rate_preceding(ymd(2024, 1, 4)).unwrap();
        assert_eq!(rate.date, ymd(2024, 1, 2));
    }

    #[test]
    fn test_rate_preceding_off_table_start() {
        let table = sample_table();
        let _ = table.rate_preceding(ymd(2024, 1, 2)).unwrap_err();
        let _ = table.rate_preceding(ymd(2023, 12, 25)).unwrap_err();
    }
}
