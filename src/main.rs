//! `parts-import`: normalizes vendor XLSX price lists into `parts` records.

use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use clap::Subcommand;
use parts_catalog::import::import_file;
use parts_catalog::import::ImportOptions;
use parts_catalog::logging;
use parts_catalog::search::SearchQuery;
use std::io::BufWriter;
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "parts-import")]
#[command(author, version, about = "Normalize vendor price lists into parts records", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import an XLSX price list and print one JSON record per line
    Import {
        /// Price list to import
        file: PathBuf,

        #[command(flatten)]
        options: ImportArgs,
    },

    /// Import a price list and print one page of keyword matches
    Search {
        /// Price list to search
        file: PathBuf,

        /// Space separated search terms
        keyword: String,

        /// Page number, starting at 1
        #[arg(long)]
        page: Option<usize>,

        /// Records per page (1 to 200, default 50)
        #[arg(long)]
        page_size: Option<usize>,

        #[command(flatten)]
        options: ImportArgs,
    },
}

#[derive(clap::Args)]
struct ImportArgs {
    /// Glob selecting the worksheet (default: first sheet)
    #[arg(long = "sheet")]
    sheet_name: Option<String>,

    /// Drop rows whose cells are all blank
    #[arg(long)]
    skip_empty_rows: bool,

    /// Leave update_time for the storage layer to fill
    #[arg(long)]
    no_update_time: bool,

    /// Currency whose prices default to tax included (repeatable)
    #[arg(long = "tax-included-currency", value_name = "CUR")]
    tax_included_currencies: Vec<String>,
}

impl From<ImportArgs> for ImportOptions {
    fn from(args: ImportArgs) -> Self {
        ImportOptions {
            sheet_name: args.sheet_name,
            skip_empty_rows: args.skip_empty_rows,
            stamp_update_time: !args.no_update_time,
            tax_included_currencies: args.tax_included_currencies,
        }
    }
}

fn main() -> Result<()> {
    logging::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Import { file, options } => import(file, options.into()),
        Commands::Search {
            file,
            keyword,
            page,
            page_size,
            options,
        } => search(file, &keyword, page, page_size, options.into()),
    }
}

fn import(file: PathBuf, options: ImportOptions) -> Result<()> {
    let records = import_file(&file, &options).with_context(|| format!("Failed to import '{}'", file.display()))?;

    let mut output = BufWriter::new(std::io::stdout().lock());
    for record in &records {
        serde_json::to_writer(&mut output, record).context("Failed to serialize record")?;
        writeln!(output)?;
    }
    output.flush()?;
    Ok(())
}

fn search(file: PathBuf, keyword: &str, page: Option<usize>, page_size: Option<usize>, options: ImportOptions) -> Result<()> {
    let query = SearchQuery::new(keyword, page, page_size).context("Invalid search keyword")?;
    let records = import_file(&file, &options).with_context(|| format!("Failed to import '{}'", file.display()))?;
    let page = query.search(&records);

    let mut output = std::io::stdout().lock();
    serde_json::to_writer(&mut output, &page).context("Failed to serialize search results")?;
    writeln!(output)?;
    Ok(())
}
