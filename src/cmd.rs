use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::app::approot::{run_app_to_writer, Options, StatementText};
use crate::app::outfmt::text::TextWriter;
use crate::refdata::{FxRateTable, UfeTable};
use crate::util::basic::SError;
use crate::util::retry::{run_with_retries, RetryPolicy};
use crate::util::rw::WriteHandle;
use crate::verboseln;

const ABOUT: &str = "Computes yearly capital gains income and tax owed \
from monthly brokerage account statements.";

#[derive(Parser, Debug)]
#[command(name = "ekstre", version = crate::app::APP_VERSION, about = ABOUT)]
pub struct Args {
    /// Statement text files (one per month, any order)
    #[arg(required = true)]
    pub statement_files: Vec<PathBuf>,

    /// JSON file of daily USD/TRY rates, keyed DD-MM-YYYY
    #[arg(long)]
    pub rates: PathBuf,

    /// JSON file of monthly ÜFE index values
    #[arg(long)]
    pub ufe: PathBuf,

    /// Tax year to compute income and tax for
    #[arg(long, default_value_t = 2024)]
    pub tax_year: i32,

    /// Treat a holdings mismatch at the final statement as a fatal error
    #[arg(long)]
    pub strict_reconcile: bool,

    /// Print per-security sell breakdowns
    #[arg(long)]
    pub print_sells: bool,

    /// Print full decimal values, rather than rounding to cents
    #[arg(long)]
    pub print_full_values: bool,

    /// Print verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

fn read_file(path: &PathBuf) -> Result<String, SError> {
    std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {e}", path.to_string_lossy()))
}

pub fn command_main() -> Result<(), SError> {
    crate::tracing::setup_tracing();
    let args = Args::parse();
    crate::log::set_verbose(args.verbose);
    verboseln!("args: {args:#?}");

    // The reference data files are often freshly synced; tolerate a
    // transiently unreadable file.
    let retry = RetryPolicy::new(3, Duration::from_millis(100));
    let fx = FxRateTable::from_json(&run_with_retries(&retry, || read_file(&args.rates))?)?;
    let ufe = UfeTable::from_json(&run_with_retries(&retry, || read_file(&args.ufe))?)?;

    let mut statements = Vec::with_capacity(args.statement_files.len());
    for path in &args.statement_files {
        statements.push(StatementText {
            desc: path.to_string_lossy().to_string(),
            text: read_file(path)?,
        });
    }

    let options = Options {
        tax_year: args.tax_year,
        strict_final_reconcile: args.strict_reconcile,
        render_full_values: args.print_full_values,
        print_sells: args.print_sells,
    };

    let mut writer = TextWriter::new(WriteHandle::stdout_write_handle());
    let mut err_printer = WriteHandle::stderr_write_handle();
    run_app_to_writer(
        &statements,
        &fx,
        &ufe,
        &options,
        &mut writer,
        &mut err_printer,
    )
    // Failures were already printed to stderr
    .map_err(|()| String::new())
}
