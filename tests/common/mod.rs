#![allow(dead_code)]

use std::collections::HashMap;

use ekstre::pdec;
use ekstre::refdata::{FxRateTable, UfeTable};
use ekstre::util::date::pub_testlib::ymd;

pub const TCKN: &str = "12345678901";

/// Builds a minimal but structurally complete statement text.
/// Dates are dd/mm/yy as the broker renders them.
pub fn statement_text(
    start: &str,
    end: &str,
    portfolio_date: &str,
    snapshot_rows: &[String],
    tx_lines: &[String],
) -> String {
    let mut lines = vec![
        "Midas Menkul Değerler A.Ş.".to_string(),
        format!("HESAP EKSTRESİ {start} - {end}"),
        "Müşteri Adı : Ali Veli".to_string(),
        format!("TCKN : {TCKN}"),
        "Hesap Açılış Tarihi : 05/08/22".to_string(),
        format!("PORTFÖY ÖZETİ ( ) {portfolio_date}"),
        "Sembol Açıklama Adet Ortalama Maliyet Kar Toplam Değer".to_string(),
    ];
    lines.extend(snapshot_rows.iter().cloned());
    lines.push(format!("YATIRIM İŞLEMLERİ ({start} - {end})"));
    lines.push(
        "Tarih Saat Emir Tipi Sembol İşlem Durum Para Birimi Adet Fiyat Komisyon Tutar"
            .to_string(),
    );
    lines.extend(tx_lines.iter().cloned());
    lines.push("HESAP İŞLEMLERİ".to_string());
    lines.push("01/01/24 Virman 100,00".to_string());
    lines.join("\n")
}

pub fn snapshot_row(symbol: &str, qty: &str, price: &str, profit: &str, total: &str) -> String {
    format!("{symbol} HOLDING {qty} {price} USD {profit} USD {total} USD")
}

pub fn tx_line(
    datetime: &str,
    symbol: &str,
    side: &str,
    qty: &str,
    price: &str,
    fee: &str,
    amount: &str,
) -> String {
    format!("{datetime} Piyasa Emri {symbol} {side} Gerçekleşti USD - {qty} {price} {fee} {amount}")
}

/// 30.00 USD/TRY on every day of 2023 and the first half of 2024.
pub fn flat_fx() -> FxRateTable {
    let mut rates = HashMap::new();
    for year in [2023, 2024] {
        for month in 1..=12 {
            for day in 1..=28 {
                rates.insert(ymd(year, month, day), pdec!(30.00));
            }
        }
    }
    FxRateTable::from_rates(rates).unwrap()
}

/// A constant index, so no sell ever crosses the inflation threshold.
pub fn flat_ufe() -> UfeTable {
    let mut values = HashMap::new();
    for year in [2023, 2024] {
        for month in 1..=12 {
            values.insert((year, month), pdec!(2000));
        }
    }
    UfeTable::from_values(values).unwrap()
}
