//! docbatch CLI - build, submit and inspect document batches

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use colored::Colorize;

use docbatch::api::Document;
use docbatch::{
    compare, inspect_table, to_request_json, BatchAssembler, BuildReport, DocumentBuilder,
    DocumentService, HttpDocumentService, LayoutConstants, MemoryDocumentService, ReportSpec,
    RetryPolicy, TableSelector,
};

/// Append point of a freshly created document.
const NEW_DOCUMENT_ORIGIN: &str = "1";

#[derive(Parser)]
#[command(name = "docbatch")]
#[command(version)]
#[command(about = "Build and submit offset-addressed document batches", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the batch for a report and print the request JSON
    Plan {
        /// Report description (JSON)
        #[arg(value_name = "REPORT")]
        report: PathBuf,

        /// Offset to append at
        #[arg(long, env = "DOCBATCH_ORIGIN", default_value = NEW_DOCUMENT_ORIGIN)]
        origin: usize,

        /// Layout constants file (JSON)
        #[arg(long, env = "DOCBATCH_LAYOUT", value_name = "FILE")]
        layout: Option<PathBuf>,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Append a report to a remote document in one batch
    Submit {
        /// Report description (JSON)
        #[arg(value_name = "REPORT")]
        report: PathBuf,

        /// Remote document id
        #[arg(short, long, env = "DOCBATCH_DOCUMENT")]
        document: String,

        /// Bearer token for the document API
        #[arg(long, env = "DOCBATCH_TOKEN", hide_env_values = true)]
        token: String,

        /// Documents resource URL
        #[arg(long, env = "DOCBATCH_BASE_URL")]
        base_url: Option<String>,

        /// Layout constants file (JSON)
        #[arg(long, env = "DOCBATCH_LAYOUT", value_name = "FILE")]
        layout: Option<PathBuf>,

        /// Retries for rate-limited submissions
        #[arg(long, default_value = "3")]
        retries: u32,
    },

    /// Read the cell offsets of a table
    Inspect {
        /// Remote document id
        #[arg(short, long, env = "DOCBATCH_DOCUMENT")]
        document: Option<String>,

        /// Document JSON saved from the API
        #[arg(short, long, value_name = "FILE")]
        file: Option<PathBuf>,

        /// Bearer token for the document API
        #[arg(long, env = "DOCBATCH_TOKEN", hide_env_values = true)]
        token: Option<String>,

        /// Documents resource URL
        #[arg(long, env = "DOCBATCH_BASE_URL")]
        base_url: Option<String>,

        /// Zero-based table position in the document
        #[arg(long, default_value = "0")]
        table: usize,

        /// Print a grid of cell starts instead of the cell map
        #[arg(long)]
        grid: bool,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Apply a report to an in-memory document and verify table offsets
    Simulate {
        /// Report description (JSON)
        #[arg(value_name = "REPORT")]
        report: PathBuf,

        /// Layout constants file (JSON)
        #[arg(long, env = "DOCBATCH_LAYOUT", value_name = "FILE")]
        layout: Option<PathBuf>,

        /// Write the simulated document JSON here
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Plan {
            report,
            origin,
            layout,
            output,
            compact,
        } => cmd_plan(&report, origin, layout.as_deref(), output.as_deref(), compact),
        Commands::Submit {
            report,
            document,
            token,
            base_url,
            layout,
            retries,
        } => cmd_submit(
            &report,
            &document,
            &token,
            base_url.as_deref(),
            layout.as_deref(),
            retries,
        ),
        Commands::Inspect {
            document,
            file,
            token,
            base_url,
            table,
            grid,
            output,
        } => cmd_inspect(
            document.as_deref(),
            file.as_deref(),
            token.as_deref(),
            base_url.as_deref(),
            table,
            grid,
            output.as_deref(),
        ),
        Commands::Simulate {
            report,
            layout,
            output,
        } => cmd_simulate(&report, layout.as_deref(), output.as_deref()),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Layout constants from `--layout`, else the report's own, else defaults.
fn resolve_constants(spec: &ReportSpec, layout: Option<&Path>) -> docbatch::Result<LayoutConstants> {
    match layout {
        Some(path) => {
            log::debug!("loading layout constants from {}", path.display());
            LayoutConstants::from_file(path)
        }
        None => Ok(spec.layout.unwrap_or_default()),
    }
}

fn print_rejections(report: &BuildReport) {
    for rejection in &report.rejections {
        eprintln!(
            "{} {} {}: {}",
            "Skipped".yellow().bold(),
            rejection.kind,
            rejection.index,
            rejection.error
        );
    }
}

fn write_or_print(output: Option<&Path>, content: &str) -> CmdResult {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn http_service(token: &str, base_url: Option<&str>) -> docbatch::Result<HttpDocumentService> {
    let mut options = docbatch::service::HttpOptions::new();
    if let Some(url) = base_url {
        options = options.with_base_url(url);
    }
    HttpDocumentService::with_options(token, options)
}

fn cmd_plan(
    report: &Path,
    origin: usize,
    layout: Option<&Path>,
    output: Option<&Path>,
    compact: bool,
) -> CmdResult {
    let spec = ReportSpec::from_file(report)?;
    let constants = resolve_constants(&spec, layout)?;
    log::debug!(
        "planning {} elements from {} at offset {}",
        spec.elements.len(),
        report.display(),
        origin
    );

    let mut builder = DocumentBuilder::with_constants(origin, constants);
    let build = spec.build(&mut builder)?;
    print_rejections(&build);
    let batch = builder.finish()?;

    let json = to_request_json(&batch, !compact)?;
    write_or_print(output, &json)?;

    eprintln!(
        "{} {} operations, {} elements placed, offsets {}..{}",
        "Planned".green().bold(),
        batch.len(),
        build.placements.len(),
        batch.origin(),
        batch.extent()
    );
    Ok(())
}

fn cmd_submit(
    report: &Path,
    document: &str,
    token: &str,
    base_url: Option<&str>,
    layout: Option<&Path>,
    retries: u32,
) -> CmdResult {
    let spec = ReportSpec::from_file(report)?;
    let constants = resolve_constants(&spec, layout)?;

    let service = Arc::new(http_service(token, base_url)?);
    let assembler =
        BatchAssembler::new(service).with_retry(RetryPolicy::new().with_max_retries(retries));

    let origin = assembler.append_point(document)?;
    log::debug!("document {} appends at {}", document, origin);
    println!("{} {}", "Append point".cyan(), origin);

    let mut builder = DocumentBuilder::with_constants(origin, constants);
    let build = spec.build(&mut builder)?;
    print_rejections(&build);
    let batch = builder.finish()?;

    let receipt = assembler.submit(document, &batch)?;
    println!(
        "{} {} operations in {} attempt(s)",
        "Submitted".green().bold(),
        receipt.operations,
        receipt.attempts
    );
    println!("{}", receipt.url);
    Ok(())
}

fn cmd_inspect(
    document: Option<&str>,
    file: Option<&Path>,
    token: Option<&str>,
    base_url: Option<&str>,
    table: usize,
    grid: bool,
    output: Option<&Path>,
) -> CmdResult {
    let doc: Document = match (document, file) {
        (_, Some(path)) => serde_json::from_str(&fs::read_to_string(path)?)?,
        (Some(id), None) => {
            let token = token.ok_or("--token (or DOCBATCH_TOKEN) is required with --document")?;
            http_service(token, base_url)?.get_document(id)?
        }
        (None, None) => return Err("either --document or --file is required".into()),
    };

    log::debug!("inspecting table {} of {}", table, doc.document_id);
    let map = inspect_table(&doc, TableSelector::Nth(table))?;
    if !map.missing.is_empty() {
        eprintln!(
            "{} {} cell(s) without indexed content",
            "Warning:".yellow().bold(),
            map.missing.len()
        );
    }

    let json = if grid {
        serde_json::to_string_pretty(&map.to_grid())?
    } else {
        serde_json::to_string_pretty(&map)?
    };
    write_or_print(output, &json)
}

fn cmd_simulate(report: &Path, layout: Option<&Path>, output: Option<&Path>) -> CmdResult {
    let spec = ReportSpec::from_file(report)?;
    let constants = resolve_constants(&spec, layout)?;

    let service = Arc::new(MemoryDocumentService::with_constants(constants));
    let id = service.create_document(spec.title.clone());
    let assembler = BatchAssembler::new(service.clone()).with_retry(RetryPolicy::none());

    let origin = assembler.append_point(&id)?;
    log::debug!("simulating {} at offset {}", report.display(), origin);
    let mut builder = DocumentBuilder::with_constants(origin, constants);
    let build = spec.build(&mut builder)?;
    print_rejections(&build);
    let batch = builder.finish()?;
    let receipt = assembler.submit(&id, &batch)?;
    println!(
        "{} {} operations applied to {}",
        "Simulated".green().bold(),
        receipt.operations,
        id
    );

    let doc = service.get_document(&id)?;
    let layouts = build.placements.iter().filter_map(|p| p.table.as_ref());
    let mut failures = 0;
    for (n, layout) in layouts.enumerate() {
        let observed = inspect_table(&doc, TableSelector::Nth(n))?;
        match compare(layout, &observed) {
            Ok(()) => println!(
                "  {} table {} ({}x{}) at {}",
                "ok".green(),
                n,
                layout.rows,
                layout.columns,
                layout.origin
            ),
            Err(e) => {
                failures += 1;
                println!("  {} table {}: {}", "mismatch".red(), n, e);
            }
        }
    }

    if let Some(path) = output {
        fs::write(path, serde_json::to_string_pretty(&doc)?)?;
        println!("{} {}", "Saved to".green(), path.display());
    }

    if failures > 0 {
        return Err(format!("{} table(s) disagree with the layout prediction", failures).into());
    }
    Ok(())
}

fn cmd_version() {
    println!("{} {}", "docbatch".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Offset-tracking document batch builder");
}
