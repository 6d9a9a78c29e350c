use chrono::{Datelike, NaiveDate};

use crate::util::basic::SError;
use crate::util::date::{extract_statement_dates, is_last_day_of_month};

// Landmark strings of the statement layout. The broker renders these
// verbatim, so plain substring checks are enough.
pub const TITLE_MARKER: &str = "Midas Menkul Değerler A.Ş.";
pub const HEADER_MARKER: &str = "HESAP EKSTRESİ";
pub const PORTFOLIO_MARKER: &str = "PORTFÖY ÖZETİ";
pub const TRANSACTIONS_MARKER: &str = "YATIRIM İŞLEMLERİ";
pub const ACCOUNT_TX_MARKER: &str = "HESAP İŞLEMLERİ";

const CUSTOMER_NAME_MARKER: &str = "Müşteri Adı";
const TCKN_MARKER: &str = "TCKN";
const ACCOUNT_OPENING_MARKER: &str = "Hesap Açılış";

#[derive(PartialEq, Eq, Clone, Debug)]
pub struct AccountInfo {
    pub customer_name: String,
    pub tckn: String,
    pub account_opening_date: NaiveDate,
}

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct StatementPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// A validated monthly statement, held fully in memory. Parsing only
/// establishes structure and identity; the transaction and portfolio
/// sections are interpreted lazily by their own parsers.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct StatementDocument {
    lines: Vec<String>,
    pub period: StatementPeriod,
    pub account: AccountInfo,
    pub portfolio_date: NaiveDate,
    portfolio_idx: usize,
    transactions_idx: usize,
    // Absent in statements with no cash activity section.
    account_tx_idx: Option<usize>,
}

impl StatementDocument {
    pub fn parse(text: &str) -> Result<StatementDocument, SError> {
        if !text.contains(TITLE_MARKER) || !text.contains(HEADER_MARKER) {
            return Err("Document is not a recognized account statement".to_string());
        }
        let lines: Vec<String> = text.lines().map(str::to_string).collect();

        let find_line = |marker: &str| lines.iter().position(|l| l.contains(marker));

        let header_idx = find_line(HEADER_MARKER)
            .ok_or_else(|| format!("No \"{HEADER_MARKER}\" line found"))?;
        let period = Self::parse_period(&lines[header_idx])?;

        let portfolio_idx = find_line(PORTFOLIO_MARKER)
            .ok_or_else(|| format!("No \"{PORTFOLIO_MARKER}\" line found"))?;
        let portfolio_dates = extract_statement_dates(&lines[portfolio_idx]);
        let portfolio_date = match portfolio_dates[..] {
            [date] => date,
            _ => {
                return Err(format!(
                    "Expected exactly one date on the \"{PORTFOLIO_MARKER}\" line, \
                     found {}",
                    portfolio_dates.len()
                ))
            }
        };

        let account = Self::parse_account_info(&lines[..portfolio_idx])?;

        let transactions_idx = find_line(TRANSACTIONS_MARKER)
            .ok_or_else(|| format!("No \"{TRANSACTIONS_MARKER}\" line found"))?;
        if transactions_idx <= portfolio_idx {
            return Err(format!(
                "\"{TRANSACTIONS_MARKER}\" section precedes \"{PORTFOLIO_MARKER}\""
            ));
        }
        let account_tx_idx = find_line(ACCOUNT_TX_MARKER);
        if let Some(idx) = account_tx_idx {
            if idx <= transactions_idx {
                return Err(format!(
                    "\"{ACCOUNT_TX_MARKER}\" section precedes \"{TRANSACTIONS_MARKER}\""
                ));
            }
        }

        Ok(StatementDocument {
            lines,
            period,
            account,
            portfolio_date,
            portfolio_idx,
            transactions_idx,
            account_tx_idx,
        })
    }

    fn parse_period(header_line: &str) -> Result<StatementPeriod, SError> {
        let dates = extract_statement_dates(header_line);
        let (start, end) = match dates[..] {
            [start, end] => (start, end),
            _ => {
                return Err(format!(
                    "Expected exactly two dates on the statement header line, found {}",
                    dates.len()
                ))
            }
        };
        if start.day() != 1 {
            return Err(format!(
                "Statement period must start on the first of the month, starts {start}"
            ));
        }
        if !is_last_day_of_month(end) {
            return Err(format!(
                "Statement period must end on the last day of a month, ends {end}"
            ));
        }
        Ok(StatementPeriod { start, end })
    }

    fn parse_account_info(lines_before_portfolio: &[String]) -> Result<AccountInfo, SError> {
        let value_after_colon = |marker: &str| -> Option<String> {
            lines_before_portfolio
                .iter()
                .find(|l| l.contains(marker))
                .and_then(|l| l.split_once(':'))
                .map(|(_, v)| v.trim().to_string())
        };

        let customer_name = value_after_colon(CUSTOMER_NAME_MARKER)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| format!("No \"{CUSTOMER_NAME_MARKER}\" found in statement"))?;

        let tckn = value_after_colon(TCKN_MARKER)
            .ok_or_else(|| format!("No \"{TCKN_MARKER}\" found in statement"))?;
        if tckn.len() != 11 || !tckn.chars().all(|c| c.is_ascii_digit()) {
            return Err(format!("\"{tckn}\" is not a valid 11-digit TCKN"));
        }

        let account_opening_date = lines_before_portfolio
            .iter()
            .find(|l| l.contains(ACCOUNT_OPENING_MARKER))
            .map(|l| extract_statement_dates(l))
            .and_then(|dates| dates.first().copied())
            .ok_or_else(|| {
                format!("No \"{ACCOUNT_OPENING_MARKER}\" date found in statement")
            })?;

        Ok(AccountInfo {
            customer_name,
            tckn,
            account_opening_date,
        })
    }

    /// Lines of the holdings snapshot section.
    pub fn portfolio_lines(&self) -> &[String] {
        &self.lines[self.portfolio_idx + 1..self.transactions_idx]
    }

    /// Lines of the investment transactions section.
    pub fn transaction_lines(&self) -> &[String] {
        let end = self.account_tx_idx.unwrap_or(self.lines.len());
        &self.lines[self.transactions_idx + 1..end]
    }
}
