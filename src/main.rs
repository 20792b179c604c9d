use clap::{Parser, Subcommand};
use royalbit_gridtable::cli;
use royalbit_gridtable::config::{OUTPUT_DIR_ENV, WORKSHEET_ENV};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gridtable")]
#[command(about = "Convert spreadsheet worksheets to string-typed tables and back.")]
#[command(long_about = "GridTable - spreadsheet grid <-> table conversion

COMMANDS:
  convert   - Worksheet to a new time-tagged workbook (import then export)
  import    - Worksheet to a YAML/JSON table set
  export    - YAML/JSON table set to Excel (.xlsx), one sheet per table
  sheets    - List the worksheets of a workbook

EXAMPLES:
  gridtable convert report.xlsx                  # reads sheet 'page'
  gridtable convert report.xlsx -w \"Q1 Data\" -o out.xlsx
  gridtable import report.xlsx tables.yaml
  gridtable export tables.yaml report_copy.xlsx

LOGGING:
  Diagnostics go to stderr. Set RUST_LOG (e.g. RUST_LOG=debug) or pass -v.")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Import a worksheet and export it to a new workbook.

The worksheet's first row holds the column names. The header scan stops at
the first blank header cell; columns to its right are dropped. Every cell is
read as text.

OUTPUT:
  Without --output the result is written next to the input (or into
  --output-dir) as <input stem>_<yyyy-MM-dd-HHmm>.xlsx.

EXAMPLE:
  gridtable convert report.xlsx -w page --output-dir exports/")]
    /// Convert one worksheet into a new time-tagged workbook
    Convert {
        /// Path to Excel file (.xlsx, .xls, .xlsb, .ods)
        input: PathBuf,

        /// Worksheet to read (matched ignoring case and surrounding spaces)
        #[arg(short, long, env = WORKSHEET_ENV)]
        worksheet: Option<String>,

        /// Output Excel file path (.xlsx)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Directory for the generated output file
        #[arg(long, env = OUTPUT_DIR_ENV)]
        output_dir: Option<PathBuf>,

        /// Show verbose conversion steps
        #[arg(short, long)]
        verbose: bool,
    },

    /// Import a worksheet to a YAML or JSON table set
    Import {
        /// Path to Excel file
        input: PathBuf,

        /// Output table set path (.yaml, .yml or .json)
        output: PathBuf,

        /// Worksheet to read
        #[arg(short, long, env = WORKSHEET_ENV)]
        worksheet: Option<String>,

        /// Table name (defaults to the worksheet name with spaces as dashes)
        #[arg(short, long)]
        table: Option<String>,

        /// Show verbose import steps
        #[arg(short, long)]
        verbose: bool,
    },

    #[command(long_about = "Export a YAML or JSON table set to Excel .xlsx.

Each table becomes one worksheet named after the table, in table set order.
Row 1 holds the column names. Columns with kind 'decimal' are written with
exactly two decimal places using banker's rounding.

EXAMPLE:
  gridtable export tables.yaml tables.xlsx")]
    /// Export a table set to Excel .xlsx
    Export {
        /// Path to table set file (.yaml, .yml or .json)
        input: PathBuf,

        /// Output Excel file path (.xlsx)
        output: PathBuf,

        /// Show verbose export steps
        #[arg(short, long)]
        verbose: bool,
    },

    /// List the worksheets of a workbook
    Sheets {
        /// Path to Excel file
        input: PathBuf,
    },
}

impl Commands {
    fn verbose(&self) -> bool {
        match self {
            Commands::Convert { verbose, .. }
            | Commands::Import { verbose, .. }
            | Commands::Export { verbose, .. } => *verbose,
            Commands::Sheets { .. } => false,
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "royalbit_gridtable=debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.command.verbose());

    let result = match cli.command {
        Commands::Convert {
            input,
            worksheet,
            output,
            output_dir,
            verbose,
        } => cli::convert(input, worksheet, output, output_dir, verbose),

        Commands::Import {
            input,
            output,
            worksheet,
            table,
            verbose,
        } => cli::import(input, output, worksheet, table, verbose),

        Commands::Export {
            input,
            output,
            verbose,
        } => cli::export(input, output, verbose),

        Commands::Sheets { input } => cli::sheets(input),
    };

    if let Err(e) = result {
        cli::display::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}
