use std::collections::{BTreeSet, HashMap, HashSet};

use itertools::Itertools;
use rust_decimal::Decimal;

use crate::app::outfmt::model::{OutputType, ReportWriter};
use crate::portfolio::bookkeeping::lot_matcher::{LotMatcher, SecurityGains};
use crate::portfolio::bookkeeping::reconcile::{check_snapshot_entry, ReconcileWarning};
use crate::portfolio::model::tx::{Tx, TxSignature};
use crate::portfolio::render::{
    render_security_gains, render_sell_breakdown, render_summary, RenderTable,
};
use crate::portfolio::Symbol;
use crate::refdata::{FxRateTable, UfeTable};
use crate::statement::doc::StatementDocument;
use crate::statement::summary::{parse_portfolio_summary, SnapshotEntry};
use crate::statement::tx_line::parse_tx_line;
use crate::tax::compute_tax;
use crate::util::basic::SError;
use crate::util::decimal::GreaterEqualZeroDecimal;
use crate::util::rw::WriteHandle;
use crate::write_errln;

/// One statement's text, with a description (eg. the file name) for error
/// messages.
pub struct StatementText {
    pub desc: String,
    pub text: String,
}

#[derive(Debug)]
pub struct ParsedStatement {
    pub doc: StatementDocument,
    pub snapshot: HashMap<Symbol, SnapshotEntry>,
    pub txs: Vec<Tx>,
}

pub struct Options {
    pub tax_year: i32,
    pub strict_final_reconcile: bool,
    pub render_full_values: bool,
    pub print_sells: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            tax_year: 2024,
            strict_final_reconcile: false,
            render_full_values: false,
            print_sells: false,
        }
    }
}

#[derive(Debug)]
pub struct CalcResult {
    pub securities: Vec<SecurityGains>,
    pub total_try_income: Decimal,
    pub total_usd_income: Decimal,
    pub tax_owed: Decimal,
    pub warnings: Vec<ReconcileWarning>,
}

/// Parses and validates one statement. `seen_sigs` persists across the
/// batch, so trades repeated in overlapping statements are read once.
pub fn parse_statement(
    stext: &StatementText,
    seen_sigs: &mut HashSet<TxSignature>,
    read_counter: &mut u32,
) -> Result<ParsedStatement, SError> {
    let doc = StatementDocument::parse(&stext.text)
        .map_err(|e| format!("{}: {e}", stext.desc))?;
    let snapshot = parse_portfolio_summary(&doc);

    let mut txs = Vec::new();
    for line in doc.transaction_lines() {
        if let Some(tx) = parse_tx_line(line, *read_counter) {
            if seen_sigs.insert(tx.signature()) {
                *read_counter += 1;
                txs.push(tx);
            } else {
                tracing::info!(
                    "{}: dropping duplicate of already-read trade: {line}",
                    stext.desc
                );
            }
        }
    }
    Ok(ParsedStatement { doc, snapshot, txs })
}

/// Runs the full computation: parse, dedup, FIFO matching in global
/// chronological order with a reconciliation pass at each statement's
/// portfolio date, then tax on the aggregate TRY profit.
///
/// Reconciliation warnings go to `err_printer` as they are found, and are
/// also returned on the result.
pub fn run_calculation(
    statements: &[StatementText],
    fx: &FxRateTable,
    ufe: &UfeTable,
    options: &Options,
    err_printer: &mut WriteHandle,
) -> Result<CalcResult, SError> {
    if statements.is_empty() {
        return Err("No statements provided".to_string());
    }

    let mut seen_sigs = HashSet::new();
    let mut read_counter: u32 = 0;
    let mut parsed: Vec<ParsedStatement> = statements
        .iter()
        .map(|st| parse_statement(st, &mut seen_sigs, &mut read_counter))
        .collect::<Result<_, _>>()?;

    // All statements must belong to the same account.
    for stmt in &parsed[1..] {
        if stmt.doc.account.tckn != parsed[0].doc.account.tckn {
            return Err(format!(
                "Statements belong to different accounts (TCKN {} vs {})",
                parsed[0].doc.account.tckn, stmt.doc.account.tckn
            ));
        }
    }

    parsed.sort_by_key(|s| s.doc.portfolio_date);

    let mut txs: Vec<Tx> = parsed.iter().flat_map(|s| s.txs.iter().cloned()).collect();
    txs.sort();

    let mut matchers: HashMap<Symbol, LotMatcher> = HashMap::new();
    let mut warnings: Vec<ReconcileWarning> = Vec::new();
    let mut cursor = 0;
    let last_stmt_idx = parsed.len() - 1;

    for (stmt_idx, stmt) in parsed.iter().enumerate() {
        while cursor < txs.len() && txs[cursor].date() <= stmt.doc.portfolio_date {
            let tx = &txs[cursor];
            matchers
                .entry(tx.symbol.clone())
                .or_insert_with(|| {
                    LotMatcher::new(tx.symbol.clone(), fx, ufe, options.tax_year)
                })
                .apply(tx)?;
            cursor += 1;
        }

        // Check every snapshot row, and also every security we compute a
        // nonzero holding for. A position the statement fails to report
        // is as much of a mismatch as a misreported one.
        let mut symbols: BTreeSet<&Symbol> = stmt.snapshot.keys().collect();
        for (symbol, matcher) in &matchers {
            if !matcher.held().is_zero() {
                symbols.insert(symbol);
            }
        }
        for symbol in symbols {
            let reported = stmt
                .snapshot
                .get(symbol)
                .map(|entry| entry.quantity)
                .unwrap_or_else(GreaterEqualZeroDecimal::zero);
            let (computed, history) = match matchers.get(symbol) {
                Some(m) => (m.held(), m.history().to_vec()),
                None => (GreaterEqualZeroDecimal::zero(), Vec::new()),
            };
            if let Some(warning) = check_snapshot_entry(
                symbol,
                stmt.doc.portfolio_date,
                reported,
                computed,
                &history,
            ) {
                write_errln!(err_printer, "Warning: {warning}");
                if stmt_idx == last_stmt_idx && options.strict_final_reconcile {
                    return Err(format!(
                        "Final holdings do not reconcile: {warning}"
                    ));
                }
                warnings.push(warning);
            }
        }
    }

    // Trades dated after the last statement's portfolio date.
    for tx in &txs[cursor..] {
        matchers
            .entry(tx.symbol.clone())
            .or_insert_with(|| LotMatcher::new(tx.symbol.clone(), fx, ufe, options.tax_year))
            .apply(tx)?;
    }

    let securities: Vec<SecurityGains> = matchers
        .into_values()
        .map(|m| m.into_gains())
        .sorted_by(|a, b| a.symbol.cmp(&b.symbol))
        .collect();

    let total_try_income: Decimal = securities.iter().map(|s| s.try_income).sum();
    let total_usd_income: Decimal = securities.iter().map(|s| s.usd_income).sum();
    let tax_owed = compute_tax(total_try_income);

    Ok(CalcResult {
        securities,
        total_try_income,
        total_usd_income,
        tax_owed,
        warnings,
    })
}

pub struct AppRenderResult {
    pub security_gains_table: RenderTable,
    pub sell_tables: Vec<(Symbol, RenderTable)>,
    pub summary_table: RenderTable,
    pub result: CalcResult,
}

pub fn run_app_to_render_model(
    statements: &[StatementText],
    fx: &FxRateTable,
    ufe: &UfeTable,
    options: &Options,
    err_printer: &mut WriteHandle,
) -> Result<AppRenderResult, SError> {
    let result = run_calculation(statements, fx, ufe, options, err_printer)?;

    let security_gains_table =
        render_security_gains(&result.securities, options.render_full_values);
    let sell_tables = if options.print_sells {
        result
            .securities
            .iter()
            .filter(|sec| !sec.sells.is_empty())
            .map(|sec| {
                (
                    sec.symbol.clone(),
                    render_sell_breakdown(sec, options.render_full_values),
                )
            })
            .collect()
    } else {
        Vec::new()
    };
    let summary_table = render_summary(
        &result.total_try_income,
        &result.total_usd_income,
        &result.tax_owed,
        options.render_full_values,
    );

    Ok(AppRenderResult {
        security_gains_table,
        sell_tables,
        summary_table,
        result,
    })
}

pub fn run_app_to_writer(
    statements: &[StatementText],
    fx: &FxRateTable,
    ufe: &UfeTable,
    options: &Options,
    writer: &mut dyn ReportWriter,
    err_printer: &mut WriteHandle,
) -> Result<(), ()> {
    let render = match run_app_to_render_model(statements, fx, ufe, options, err_printer) {
        Ok(render) => render,
        Err(e) => {
            write_errln!(err_printer, "Error: {e}");
            return Err(());
        }
    };

    let mut print = |out_type, name: &str, table: &RenderTable| {
        writer
            .print_render_table(out_type, name, table)
            .map_err(|e| {
                write_errln!(err_printer, "Error printing {name}: {e}");
            })
    };

    for (symbol, table) in &render.sell_tables {
        print(OutputType::SellBreakdown, symbol, table)?;
    }
    print(OutputType::SecurityGains, "", &render.security_gains_table)?;
    print(OutputType::Summary, "", &render.summary_table)?;
    Ok(())
}
