use crate::portfolio::render::RenderTable;

pub enum OutputType {
    SecurityGains,
    SellBreakdown,
    Summary,
}

pub type Error = String;

pub trait ReportWriter {
    fn print_render_table(
        &mut self,
        out_type: OutputType,
        name: &str,
        table_model: &RenderTable,
    ) -> Result<(), Error>;

    fn finish(self: Box<Self>) -> Result<(), Error> {
        Ok(())
    }
}
