use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use rdo_report::builder::{ReportRenderer, DEFAULT_DATE_FORMAT};
use rdo_report::export;
use rdo_report::model::ReportId;
use rdo_report::sample;
use rdo_report::store::{Dataset, InMemoryRepository, ReportRepository};

/// Exports construction-site daily reports (RDO) as paginated PDF files.
#[derive(Parser)]
#[command(author, version, about = "Daily work report PDF export")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render one report of a JSON dataset.
    Render(RenderArgs),

    /// Render the built-in sample report.
    Sample(SampleArgs),
}

#[derive(Args)]
struct RenderOptions {
    /// `chrono` format used for dates in the document.
    #[arg(long, env = "RDO_DATE_FORMAT", default_value = DEFAULT_DATE_FORMAT)]
    date_format: String,

    /// Add a PDF outline with one entry per section.
    #[cfg(feature = "bookmarks")]
    #[arg(long)]
    bookmarks: bool,
}

#[derive(Args)]
struct RenderArgs {
    /// Dataset file holding projects, users, reports and their entries.
    #[arg(long)]
    data: PathBuf,

    /// Identifier of the report to render.
    #[arg(long)]
    report: u64,

    /// Output file; defaults to the download name, e.g. `rdo-12-0007.pdf`.
    #[arg(long)]
    output: Option<PathBuf>,

    #[command(flatten)]
    options: RenderOptions,
}

#[derive(Args)]
struct SampleArgs {
    /// Output file; defaults to the download name of the sample report.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Append this many multi-line occurrences to force extra pages.
    #[arg(long, default_value_t = 0)]
    long_occurrences: usize,

    /// Also write the sample dataset as JSON, usable with `render --data`.
    #[arg(long)]
    dump_data: Option<PathBuf>,

    #[command(flatten)]
    options: RenderOptions,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Render(args) => run_render(args),
        Commands::Sample(args) => run_sample(args),
    };

    if let Err(err) = result {
        eprintln!("Error: {}", err);
        print_error_sources(err.as_ref());
        std::process::exit(1);
    }
}

fn run_render(args: RenderArgs) -> Result<(), Box<dyn Error>> {
    let json = fs::read_to_string(&args.data)?;
    let dataset: Dataset = serde_json::from_str(&json)?;
    let repository = InMemoryRepository::from_dataset(dataset)?;
    export_to_file(
        &repository,
        ReportId(args.report),
        args.output.as_deref(),
        &args.options,
    )
}

fn run_sample(args: SampleArgs) -> Result<(), Box<dyn Error>> {
    let dataset = sample::with_long_occurrences(sample::sample_dataset(), args.long_occurrences);
    if let Some(path) = &args.dump_data {
        fs::write(path, serde_json::to_string_pretty(&dataset)?)?;
        println!("Wrote sample dataset to {}", path.display());
    }
    let repository = InMemoryRepository::from_dataset(dataset)?;
    export_to_file(
        &repository,
        sample::SAMPLE_REPORT,
        args.output.as_deref(),
        &args.options,
    )
}

fn export_to_file(
    repository: &dyn ReportRepository,
    id: ReportId,
    output: Option<&Path>,
    options: &RenderOptions,
) -> Result<(), Box<dyn Error>> {
    let renderer = ReportRenderer::builder()
        .with_date_format(options.date_format.as_str())
        .build()?;

    #[cfg(feature = "bookmarks")]
    let download = if options.bookmarks {
        export::export_report_with_bookmarks(repository, &renderer, id)?
    } else {
        export::export_report(repository, &renderer, id)?
    };
    #[cfg(not(feature = "bookmarks"))]
    let download = export::export_report(repository, &renderer, id)?;

    let path = output.map_or_else(|| PathBuf::from(&download.file_name), Path::to_path_buf);
    fs::write(&path, &download.bytes)?;

    println!("Wrote {} ({} bytes)", path.display(), download.bytes.len());
    Ok(())
}

fn print_error_sources(mut error: &(dyn Error + 'static)) {
    while let Some(source) = error.source() {
        eprintln!("  caused by: {}", source);
        error = source;
    }
}
