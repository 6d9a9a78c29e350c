use std::io::Write;

use tabled::settings::{
    object::{Cell, Rows},
    Alignment, Border,
};

use crate::{portfolio::render::RenderTable, util::rw::WriteHandle};

use super::model::{OutputType, ReportWriter};

pub struct TextWriter {
    w: WriteHandle,
}

impl TextWriter {
    pub fn new(w: WriteHandle) -> TextWriter {
        TextWriter { w }
    }
}

impl ReportWriter for TextWriter {
    fn print_render_table(
        &mut self,
        out_type: OutputType,
        name: &str,
        table_model: &RenderTable,
    ) -> Result<(), super::model::Error> {
        let map_write_err = |e| format!("{e}");

        for err in &table_model.errors {
            writeln!(self.w, "[!] {}", err).map_err(map_write_err)?;
        }
        if !table_model.errors.is_empty() {
            writeln!(self.w, "Printing parsed information state:")
                .map_err(map_write_err)?;
        }

        let title = match out_type {
            OutputType::SecurityGains => "Security Gains".to_string(),
            OutputType::SellBreakdown => format!("{} Sells", name),
            OutputType::Summary => "Tax Summary".to_string(),
        };
        writeln!(self.w, "{}", title).map_err(map_write_err)?;

        let mut table_bldr = tabled::builder::Builder::default();
        table_bldr.push_record(
            table_model
                .header
                .iter()
                .map(|h| h.to_uppercase())
                .collect::<Vec<String>>(),
        );
        let n_rows = table_model.rows.len();
        for row in &table_model.rows {
            table_bldr.push_record(row);
        }

        // The footer renders as a smaller table below the main one,
        // separated by a blank spacer row.
        let footer_sep_row: Option<usize> = if !table_model.footer.is_empty() {
            let mut split_line = Vec::with_capacity(table_model.footer.len());
            split_line.resize_with(table_model.footer.len(), String::new);
            table_bldr.push_record(split_line);
            table_bldr.push_record(table_model.footer.clone());
            Some(1 + n_rows)
        } else {
            None
        };

        let mut table = table_bldr.build();
        table.with(tabled::settings::Style::ascii());
        table.modify(Rows::first(), Alignment::center());

        if let Some(sep_row) = footer_sep_row {
            let footer_row = sep_row + 1;
            table.modify(
                Rows::single(sep_row),
                Border::new().set_left(' ').set_right(' '),
            );
            for (col, footer_cell) in table_model.footer.iter().enumerate() {
                if footer_cell.is_empty() {
                    table.modify(
                        Cell::new(footer_row, col),
                        Border::full(' ', ' ', ' ', ' ', ' ', ' ', ' ', ' '),
                    );
                }
            }
        }

        writeln!(self.w, "{table}").map_err(map_write_err)?;

        for note in &table_model.notes {
            writeln!(self.w, "{note}").map_err(map_write_err)?;
        }

        writeln!(self.w).map_err(map_write_err)?;
        Ok(())
    }
}
