use anyhow::Context;
use clap::{Parser, Subcommand};
use gfix::cli;
use gfix::config::FixConfig;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gfix")]
#[command(about = "Fix Excel-converted gene names in data files.")]
#[command(long_about = "gfix - Restore gene symbols that spreadsheets turned into dates

Spreadsheet software auto-converts symbols such as MARCH1 or SEPT2 into
dates (1-Mar, 2-Sep). gfix finds those cells in every sheet, whether they
hold date text (Mar-1, 3/1/2024, 2024-03-01) or real date values, and
writes the current HGNC symbol back (MARCHF1, SEPTIN2). Date cells are read
with the workbook's own epoch, so 1904-based files need no extra option.

COMMANDS:
  fix     - Restore gene symbols and save a corrected workbook
  check   - Scan workbooks without writing, fail if anything is corrupted
  genes   - List the known corrupted forms

EXAMPLES:
  gfix fix supplementary.xlsx                       # → supplementary_fixed.xlsx
  gfix fix data.xls -o clean.xlsx --report changes.json
  gfix check *.xlsx

Logging: set RUST_LOG=gfix=debug to trace every restored cell.")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Restore date-corrupted gene symbols in a workbook.

Every cell of every sheet (header rows included) is checked against the
known corruption table. Matching cells get the canonical gene symbol; all
other cells are written back unchanged. Each change is reported with its
location, old value and new value.

Use --dry-run to preview changes without writing the output workbook.")]
    /// Restore gene symbols and save a corrected workbook
    Fix {
        /// Input workbook (.xlsx, .xlsm, .xlsb, .xls, .ods)
        input: PathBuf,

        /// Output .xlsx path (default: <input stem>_fixed.xlsx)
        #[arg(short, long = "output_file", visible_alias = "output")]
        output: Option<PathBuf>,

        /// Preview changes without writing the output workbook
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Show verbose processing steps
        #[arg(short, long)]
        verbose: bool,

        /// Also write the change report to a .json or .yaml file
        #[arg(short, long)]
        report: Option<PathBuf>,
    },

    /// Scan workbooks without writing; exit non-zero if anything needs fixing
    Check {
        /// Workbook(s) to scan
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// List the known corrupted forms and their gene symbols
    Genes,
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gfix=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Fix {
            input,
            output,
            dry_run,
            verbose,
            report,
        } => {
            let config = FixConfig {
                dry_run,
                verbose,
                report,
            };
            cli::fix(input.clone(), output, &config)
                .with_context(|| format!("Error processing file: {}", input.display()))?;
        }

        Commands::Check { files } => cli::check(files)?,

        Commands::Genes => cli::genes()?,
    }

    Ok(())
}
