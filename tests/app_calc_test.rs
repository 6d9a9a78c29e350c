use std::collections::HashMap;

use rust_decimal_macros::dec;

use ekstre::app::approot::{run_app_to_writer, run_calculation, Options, StatementText};
use ekstre::app::outfmt::text::TextWriter;
use ekstre::pdec;
use ekstre::refdata::FxRateTable;
use ekstre::util::date::pub_testlib::ymd;
use ekstre::util::rw::WriteHandle;

mod common;
use common::{flat_fx, flat_ufe, snapshot_row, statement_text, tx_line};

fn stext(desc: &str, text: String) -> StatementText {
    StatementText {
        desc: desc.to_string(),
        text,
    }
}

#[test]
fn test_single_sale_end_to_end() {
    // Buy 10 AAPL @ 100 on Jan 5, sell 10 @ 150 on Jun 10. The sale must
    // settle at the Jun 9 rate and the purchase at the Jan 4 rate.
    let fx = FxRateTable::from_rates(HashMap::from([
        (ymd(2024, 1, 4), pdec!(29.95)),
        (ymd(2024, 6, 9), pdec!(32.50)),
    ]))
    .unwrap();
    let ufe = flat_ufe();

    let jan = stext(
        "jan.txt",
        statement_text(
            "01/01/24",
            "31/01/24",
            "31/01/24",
            &[snapshot_row("AAPL", "10", "100,00", "0,00", "1.000,00")],
            &[tx_line(
                "05/01/24 10:15:22",
                "AAPL",
                "Alış",
                "10",
                "100,00",
                "0,00",
                "1.000,00",
            )],
        ),
    );
    let jun = stext(
        "jun.txt",
        statement_text(
            "01/06/24",
            "30/06/24",
            "30/06/24",
            &[],
            &[tx_line(
                "10/06/24 15:45:00",
                "AAPL",
                "Satış",
                "10",
                "150,00",
                "0,00",
                "1.500,00",
            )],
        ),
    );

    let mut err_printer = WriteHandle::empty_write_handle();
    let result = run_calculation(
        &[jan, jun],
        &fx,
        &ufe,
        &Options::default(),
        &mut err_printer,
    )
    .unwrap();

    assert!(result.warnings.is_empty());
    assert_eq!(result.securities.len(), 1);
    let aapl = &result.securities[0];
    assert_eq!(aapl.symbol, "AAPL");
    // 10 x 150 x 32.50 - 10 x 100 x 29.95
    assert_eq!(aapl.try_income, dec!(18800.00));
    assert_eq!(aapl.usd_income, dec!(500.00));
    assert_eq!(*aapl.held, dec!(0));

    assert_eq!(result.total_try_income, dec!(18800.00));
    // First bracket: 15%
    assert_eq!(result.tax_owed, dec!(2820.00));
}

#[test]
fn test_partial_lot_consumption() {
    let (fx, ufe) = (flat_fx(), flat_ufe());

    let jan = stext(
        "jan.txt",
        statement_text(
            "01/01/24",
            "31/01/24",
            "31/01/24",
            &[snapshot_row("AAPL", "3", "110,00", "0,00", "330,00")],
            &[
                tx_line(
                    "05/01/24 10:00:00",
                    "AAPL",
                    "Alış",
                    "10",
                    "100,00",
                    "0,00",
                    "1.000,00",
                ),
                tx_line(
                    "10/01/24 10:00:00",
                    "AAPL",
                    "Alış",
                    "8",
                    "110,00",
                    "0,00",
                    "880,00",
                ),
                tx_line(
                    "20/01/24 10:00:00",
                    "AAPL",
                    "Satış",
                    "15",
                    "120,00",
                    "0,00",
                    "1.800,00",
                ),
            ],
        ),
    );

    let mut err_printer = WriteHandle::empty_write_handle();
    let result =
        run_calculation(&[jan], &fx, &ufe, &Options::default(), &mut err_printer).unwrap();

    assert!(result.warnings.is_empty());
    let aapl = &result.securities[0];
    assert_eq!(*aapl.held, dec!(3));

    // One sell, two income contributions: 10 from the first lot, then 5
    // from the second, which keeps 3.
    assert_eq!(aapl.sells.len(), 1);
    let sell = &aapl.sells[0];
    assert_eq!(sell.consumptions.len(), 2);
    assert_eq!(*sell.consumptions[0].consumed, dec!(10));
    assert_eq!(*sell.consumptions[1].consumed, dec!(5));
    assert_eq!(*sell.consumptions[1].lot_remaining_after, dec!(3));

    // Flat 30.00 rate: USD 250 profit becomes TRY 7500.
    assert_eq!(aapl.usd_income, dec!(250.00));
    assert_eq!(aapl.try_income, dec!(7500.00));
}

#[test]
fn test_oversold_aborts() {
    let (fx, ufe) = (flat_fx(), flat_ufe());

    let jan = stext(
        "jan.txt",
        statement_text(
            "01/01/24",
            "31/01/24",
            "31/01/24",
            &[],
            &[
                tx_line(
                    "05/01/24 10:00:00",
                    "AAPL",
                    "Alış",
                    "12",
                    "100,00",
                    "0,00",
                    "1.200,00",
                ),
                tx_line(
                    "20/01/24 10:00:00",
                    "AAPL",
                    "Satış",
                    "20",
                    "120,00",
                    "0,00",
                    "2.400,00",
                ),
            ],
        ),
    );

    let mut err_printer = WriteHandle::empty_write_handle();
    let err = run_calculation(&[jan], &fx, &ufe, &Options::default(), &mut err_printer)
        .unwrap_err();
    assert!(err.contains("AAPL"), "{err}");
    assert!(err.contains("8 units remain unmatched"), "{err}");
}

#[test]
fn test_reconciliation_warning_continues() {
    let (fx, ufe) = (flat_fx(), flat_ufe());

    // The statement says 50 TSLA, but the trades only account for 48.
    let feb = stext(
        "feb.txt",
        statement_text(
            "01/02/24",
            "29/02/24",
            "29/02/24",
            &[snapshot_row("TSLA", "50", "200,00", "0,00", "10.000,00")],
            &[tx_line(
                "05/02/24 10:00:00",
                "TSLA",
                "Alış",
                "48",
                "200,00",
                "0,00",
                "9.600,00",
            )],
        ),
    );

    let (mut err_printer, err_buff) = WriteHandle::string_buff_write_handle();
    let result =
        run_calculation(&[feb], &fx, &ufe, &Options::default(), &mut err_printer).unwrap();

    assert_eq!(result.warnings.len(), 1);
    let warning = &result.warnings[0];
    assert_eq!(warning.symbol, "TSLA");
    assert_eq!(warning.date, ymd(2024, 2, 29));
    assert_eq!(*warning.reported, dec!(50));
    assert_eq!(*warning.computed, dec!(48));

    let printed = err_buff.borrow().as_str().to_string();
    assert!(
        printed.contains(
            "Holdings mismatch for TSLA on 2024-02-29: statement reports 50, computed 48"
        ),
        "{printed}"
    );

    // The computation itself still completes.
    assert_eq!(*result.securities[0].held, dec!(48));
}

#[test]
fn test_unreported_holding_is_warned() {
    let (fx, ufe) = (flat_fx(), flat_ufe());

    // A buy the trades account for, but no holdings row at all.
    let jan = stext(
        "jan.txt",
        statement_text(
            "01/01/24",
            "31/01/24",
            "31/01/24",
            &[],
            &[tx_line(
                "05/01/24 10:00:00",
                "AAPL",
                "Alış",
                "10",
                "100,00",
                "0,00",
                "1.000,00",
            )],
        ),
    );

    let (mut err_printer, err_buff) = WriteHandle::string_buff_write_handle();
    let result =
        run_calculation(&[jan], &fx, &ufe, &Options::default(), &mut err_printer).unwrap();

    assert_eq!(result.warnings.len(), 1);
    let warning = &result.warnings[0];
    assert_eq!(warning.symbol, "AAPL");
    assert_eq!(*warning.reported, dec!(0));
    assert_eq!(*warning.computed, dec!(10));
    let printed = err_buff.borrow().as_str().to_string();
    assert!(printed.contains("statement reports 0, computed 10"), "{printed}");
    assert_eq!(*result.securities[0].held, dec!(10));
}

#[test]
fn test_unreported_holding_fatal_under_strict_reconcile() {
    let (fx, ufe) = (flat_fx(), flat_ufe());

    let jan = stext(
        "jan.txt",
        statement_text(
            "01/01/24",
            "31/01/24",
            "31/01/24",
            &[],
            &[tx_line(
                "05/01/24 10:00:00",
                "AAPL",
                "Alış",
                "10",
                "100,00",
                "0,00",
                "1.000,00",
            )],
        ),
    );

    let options = Options {
        strict_final_reconcile: true,
        ..Default::default()
    };
    let mut err_printer = WriteHandle::empty_write_handle();
    let err = run_calculation(&[jan], &fx, &ufe, &options, &mut err_printer).unwrap_err();
    assert!(err.contains("Final holdings do not reconcile"), "{err}");
    assert!(err.contains("AAPL"), "{err}");
}

#[test]
fn test_strict_reconcile_is_fatal_at_final_statement() {
    let (fx, ufe) = (flat_fx(), flat_ufe());

    let feb = stext(
        "feb.txt",
        statement_text(
            "01/02/24",
            "29/02/24",
            "29/02/24",
            &[snapshot_row("TSLA", "50", "200,00", "0,00", "10.000,00")],
            &[tx_line(
                "05/02/24 10:00:00",
                "TSLA",
                "Alış",
                "48",
                "200,00",
                "0,00",
                "9.600,00",
            )],
        ),
    );

    let options = Options {
        strict_final_reconcile: true,
        ..Default::default()
    };
    let mut err_printer = WriteHandle::empty_write_handle();
    let err = run_calculation(&[feb], &fx, &ufe, &options, &mut err_printer).unwrap_err();
    assert!(err.contains("Final holdings do not reconcile"), "{err}");
}

#[test]
fn test_mixed_accounts_rejected() {
    let (fx, ufe) = (flat_fx(), flat_ufe());

    let jan = stext(
        "jan.txt",
        statement_text("01/01/24", "31/01/24", "31/01/24", &[], &[]),
    );
    let feb = stext(
        "feb.txt",
        statement_text("01/02/24", "29/02/24", "29/02/24", &[], &[])
            .replace(common::TCKN, "10987654321"),
    );

    let mut err_printer = WriteHandle::empty_write_handle();
    let err = run_calculation(&[jan, feb], &fx, &ufe, &Options::default(), &mut err_printer)
        .unwrap_err();
    assert!(err.contains("different accounts"), "{err}");
}

#[test]
fn test_no_statements_is_an_error() {
    let (fx, ufe) = (flat_fx(), flat_ufe());
    let mut err_printer = WriteHandle::empty_write_handle();
    let err =
        run_calculation(&[], &fx, &ufe, &Options::default(), &mut err_printer).unwrap_err();
    assert!(err.contains("No statements"), "{err}");
}

#[test]
fn test_writer_output() {
    let (fx, ufe) = (flat_fx(), flat_ufe());

    let jan = stext(
        "jan.txt",
        statement_text(
            "01/01/24",
            "31/01/24",
            "31/01/24",
            &[snapshot_row("AAPL", "4", "100,00", "0,00", "400,00")],
            &[
                tx_line(
                    "05/01/24 10:00:00",
                    "AAPL",
                    "Alış",
                    "10",
                    "100,00",
                    "0,00",
                    "1.000,00",
                ),
                tx_line(
                    "20/01/24 10:00:00",
                    "AAPL",
                    "Satış",
                    "6",
                    "120,00",
                    "0,00",
                    "720,00",
                ),
            ],
        ),
    );

    let (out_handle, out_buff) = WriteHandle::string_buff_write_handle();
    let mut writer = TextWriter::new(out_handle);
    let mut err_printer = WriteHandle::empty_write_handle();
    let options = Options {
        print_sells: true,
        ..Default::default()
    };
    run_app_to_writer(&[jan], &fx, &ufe, &options, &mut writer, &mut err_printer).unwrap();

    let out = out_buff.borrow().as_str().to_string();
    assert!(out.contains("AAPL Sells"), "{out}");
    assert!(out.contains("Security Gains"), "{out}");
    assert!(out.contains("Tax Summary"), "{out}");
    // 6 x (120 - 100) = 120 USD, at a flat 30.00 rate
    assert!(out.contains("₺3600.00"), "{out}");
    assert!(out.contains("$120.00"), "{out}");
}
