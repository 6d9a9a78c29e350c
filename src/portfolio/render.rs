use rust_decimal::Decimal;

use crate::portfolio::bookkeeping::lot_matcher::SecurityGains;
use crate::util::decimal::currency_precision_str;

/// Generic table model, rendered by the output layer.
#[derive(PartialEq, Eq, Clone, Debug, Default)]
pub struct RenderTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub footer: Vec<String>,
    pub notes: Vec<String>,
    pub errors: Vec<String>,
}

fn try_str(d: &Decimal, full_values: bool) -> String {
    if full_values {
        format!("₺{}", d)
    } else {
        format!("₺{}", currency_precision_str(d))
    }
}

fn usd_str(d: &Decimal, full_values: bool) -> String {
    if full_values {
        format!("${}", d)
    } else {
        format!("${}", currency_precision_str(d))
    }
}

pub fn render_security_gains(gains: &[SecurityGains], full_values: bool) -> RenderTable {
    let mut table = RenderTable {
        header: ["Security", "TRY Income", "USD Income", "Still Held"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        ..Default::default()
    };

    for sec in gains {
        table.rows.push(vec![
            sec.symbol.clone(),
            try_str(&sec.try_income, full_values),
            usd_str(&sec.usd_income, full_values),
            sec.held.to_string(),
        ]);
    }

    let total_try: Decimal = gains.iter().map(|g| g.try_income).sum();
    let total_usd: Decimal = gains.iter().map(|g| g.usd_income).sum();
    table.footer = vec![
        "Total".to_string(),
        try_str(&total_try, full_values),
        usd_str(&total_usd, full_values),
        String::new(),
    ];
    table
}

pub fn render_sell_breakdown(gains: &SecurityGains, full_values: bool) -> RenderTable {
    let mut table = RenderTable {
        header: [
            "Sold At",
            "Quantity",
            "Sell Price",
            "Lot Acquired",
            "Lot Price",
            "TRY Income",
            "USD Income",
            "Adjusted",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect(),
        ..Default::default()
    };

    for sell in &gains.sells {
        for consumption in &sell.consumptions {
            table.rows.push(vec![
                sell.sold_at.to_string(),
                consumption.consumed.to_string(),
                usd_str(&sell.sell_price, full_values),
                consumption.lot_acquired.to_string(),
                usd_str(&consumption.lot_price, full_values),
                try_str(&consumption.try_income, full_values),
                usd_str(&consumption.usd_income, full_values),
                if consumption.inflation_adjusted { "Y" } else { "" }.to_string(),
            ]);
        }
        if !sell.in_tax_year {
            table.notes.push(format!(
                "Sell of {} on {} falls outside the tax year and is excluded from totals",
                sell.quantity,
                sell.sold_at.date()
            ));
        }
    }
    table
}

pub fn render_summary(
    total_try_income: &Decimal,
    total_usd_income: &Decimal,
    tax_owed: &Decimal,
    full_values: bool,
) -> RenderTable {
    RenderTable {
        header: ["Total TRY Income", "Total USD Income", "Tax Owed"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        rows: vec![vec![
            try_str(total_try_income, full_values),
            usd_str(total_usd_income, full_values),
            try_str(tax_owed, full_values),
        ]],
        ..Default::default()
    }
}
