use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::util::basic::SError;
use crate::util::decimal::PosDecimal;

// Rows of the published ÜFE (domestic producer price index) series,
// one per year, with one column per month.
#[derive(Deserialize, Debug)]
struct UfeYearRow {
    #[serde(rename = "Year")]
    year: String,
    #[serde(rename = "01")]
    m01: Option<Decimal>,
    #[serde(rename = "02")]
    m02: Option<Decimal>,
    #[serde(rename = "03")]
    m03: Option<Decimal>,
    #[serde(rename = "04")]
    m04: Option<Decimal>,
    #[serde(rename = "05")]
    m05: Option<Decimal>,
    #[serde(rename = "06")]
    m06: Option<Decimal>,
    #[serde(rename = "07")]
    m07: Option<Decimal>,
    #[serde(rename = "08")]
    m08: Option<Decimal>,
    #[serde(rename = "09")]
    m09: Option<Decimal>,
    #[serde(rename = "10")]
    m10: Option<Decimal>,
    #[serde(rename = "11")]
    m11: Option<Decimal>,
    #[serde(rename = "12")]
    m12: Option<Decimal>,
}

impl UfeYearRow {
    fn months(&self) -> [(u32, Option<Decimal>); 12] {
        [
            (1, self.m01),
            (2, self.m02),
            (3, self.m03),
            (4, self.m04),
            (5, self.m05),
            (6, self.m06),
            (7, self.m07),
            (8, self.m08),
            (9, self.m09),
            (10, self.m10),
            (11, self.m11),
            (12, self.m12),
        ]
    }
}

/// Monthly ÜFE index values, used to adjust cost bases for inflation.
#[derive(Debug)]
pub struct UfeTable {
    index: HashMap<(i32, u32), PosDecimal>,
}

impl UfeTable {
    pub fn from_json(json_text: &str) -> Result<UfeTable, SError> {
        let rows: Vec<UfeYearRow> = serde_json::from_str(json_text)
            .map_err(|e| format!("Failed to parse ÜFE table: {e}"))?;

        let mut index = HashMap::new();
        for row in rows {
            let year: i32 = row
                .year
                .trim()
                .parse()
                .map_err(|_| format!("Invalid year \"{}\" in ÜFE table", row.year))?;
            for (month, value) in row.months() {
                if let Some(value) = value {
                    let value = PosDecimal::try_from(value).map_err(|_| {
                        format!("Invalid ÜFE value {value} for {year}-{month:02}")
                    })?;
                    index.insert((year, month), value);
                }
            }
        }
        if index.is_empty() {
            return Err("ÜFE table is empty".to_string());
        }
        Ok(UfeTable { index })
    }

    pub fn from_values(values: HashMap<(i32, u32), PosDecimal>) -> Result<UfeTable, SError> {
        if values.is_empty() {
            return Err("ÜFE table is empty".to_string());
        }
        Ok(UfeTable { index: values })
    }

    /// The index applicable to a transaction in the given month: the
    /// published value of the month before it, since the index for a month
    /// is only known after that month closes.
    pub fn index_for(&self, year: i32, month: u32) -> Result<PosDecimal, SError> {
        let (y, m) = if month == 1 {
            (year - 1, 12)
        } else {
            (year, month - 1)
        };
        self.index
            .get(&(y, m))
            .copied()
            .ok_or_else(|| format!("No ÜFE index available for {y}-{m:02}"))
    }
}
