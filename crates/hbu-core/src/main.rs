//! hbu - Highest & Best Use study generator
//!
//! The command-line entry point, handling:
//! - Plot listing and lookup
//! - Study generation with the offline or chat-completions analyzer
//! - PDF and plain-text report export
//! - The REST server
//! - Configuration inspection

use clap::{Args, Parser, Subcommand};
use hbu_common::{Error, Plot, PlotId, Result, Study, StructuredError};
use hbu_config::{load_config, validate_config, HbuConfig, Provider, ResolvedConfig};
use hbu_core::exit_codes::ExitCode;
use hbu_core::logging::{init_logging, LogConfig, LogFormat};
use hbu_core::{
    analyzer_from_settings, config_error, report_config, ApiServer, ApiState, MemoryRepository,
    StudyService,
};
use hbu_report::{format::format_number, DirectorySink, ReportExporter, WriterSink};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Highest & Best Use study generator
#[derive(Parser)]
#[command(name = "hbu")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Path to config.toml
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease verbosity (-q, -qq)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    quiet: u8,

    /// Log format on stderr (human, jsonl)
    #[arg(long, global = true, value_name = "FORMAT")]
    log_format: Option<LogFormat>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the available plots
    Plots {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show one plot as JSON
    Plot {
        /// Plot id (e.g. plot-001)
        id: String,
    },

    /// Generate an HBU study for a plot and export it
    Study(StudyArgs),

    /// Render reports from stored study and plot JSON
    Render(RenderArgs),

    /// Run the REST server
    Serve {
        /// Bind address (overrides [server] bind)
        #[arg(long, value_name = "ADDR")]
        bind: Option<String>,
    },

    /// Print the JSON schema of the structured analysis
    Schema,

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Args, Debug)]
struct StudyArgs {
    /// Plot id (e.g. plot-001)
    plot_id: String,

    /// Analyzer to use (overrides [analysis] provider)
    #[arg(long, value_name = "PROVIDER")]
    analyzer: Option<Provider>,

    /// Write the PDF report into DIR ([export] output_dir or "." when omitted)
    #[arg(long, value_name = "DIR", num_args = 0..=1)]
    pdf: Option<Option<PathBuf>>,

    /// Print the plain-text report to stdout
    #[arg(long, conflicts_with = "json")]
    text: bool,

    /// Print the study as JSON to stdout
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Study JSON file
    #[arg(long, value_name = "FILE")]
    study: PathBuf,

    /// Plot JSON file
    #[arg(long, value_name = "FILE")]
    plot: PathBuf,

    /// Write the PDF report into DIR ([export] output_dir or "." when omitted)
    #[arg(long, value_name = "DIR", num_args = 0..=1)]
    pdf: Option<Option<PathBuf>>,

    /// Print the plain-text report to stdout (default when --pdf is absent)
    #[arg(long)]
    text: bool,
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Print the effective configuration as TOML
    Show,

    /// Validate a configuration file (defaults to the resolved one)
    Validate {
        /// Config file to validate
        path: Option<PathBuf>,
    },
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            let code = if e.use_stderr() {
                ExitCode::ArgsError
            } else {
                ExitCode::Success
            };
            std::process::exit(code.as_i32());
        }
    };

    let mut log_config = LogConfig::from_env(None, cli.global.log_format);
    log_config.level = log_config
        .level
        .adjusted(cli.global.verbose, cli.global.quiet);
    let run_id = init_logging(&log_config);
    let _run = tracing::info_span!("run", run_id = %run_id).entered();

    let exit_code = match run(&cli) {
        Ok(()) => ExitCode::Success,
        Err(e) => report_error(&log_config, &e),
    };

    std::process::exit(exit_code.as_i32());
}

fn report_error(log_config: &LogConfig, err: &Error) -> ExitCode {
    let code = ExitCode::from(err);
    match log_config.format {
        LogFormat::Jsonl => {
            let structured = StructuredError::from(err).with_context("exit_code", code.as_i32());
            eprintln!("{}", structured.to_json());
        }
        LogFormat::Human => {
            eprintln!("# {}", err.headline());
            eprintln!();
            eprintln!("Error: {}", err);
        }
    }
    code
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Plots { json } => run_plots(*json),
        Commands::Plot { id } => run_plot(id),
        Commands::Study(args) => run_study(&cli.global, args),
        Commands::Render(args) => run_render(&cli.global, args),
        Commands::Serve { bind } => run_serve(&cli.global, bind.as_deref()),
        Commands::Schema => print_json(&hbu_common::analysis::enhanced_schema()),
        Commands::Config { command } => run_config(&cli.global, command),
    }
}

fn load(global: &GlobalOpts) -> Result<ResolvedConfig> {
    load_config(global.config.as_deref()).map_err(config_error)
}

fn print_json(value: &impl serde::Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run_plots(json: bool) -> Result<()> {
    let repo = MemoryRepository::seeded();
    let plots = hbu_core::Repository::list_plots(&repo);
    if json {
        return print_json(&plots);
    }

    println!(
        "{:<10} {:<15} {:<16} {:>10}  ADDRESS",
        "ID", "PARCEL", "ZONING", "SIZE (sqm)"
    );
    for plot in &plots {
        println!(
            "{:<10} {:<15} {:<16} {:>10}  {}",
            plot.id.as_str(),
            plot.parcel_number,
            plot.zoning,
            format_number(plot.size),
            plot.address
        );
    }
    Ok(())
}

fn run_plot(id: &str) -> Result<()> {
    let repo = MemoryRepository::seeded();
    let plot = hbu_core::Repository::get_plot(&repo, &PlotId::from(id)).ok_or_else(|| {
        Error::PlotNotFound {
            plot_id: id.to_string(),
        }
    })?;
    print_json(&plot)
}

fn pdf_dir(requested: &Option<Option<PathBuf>>, config: &HbuConfig) -> Option<PathBuf> {
    requested.as_ref().map(|dir| {
        dir.clone()
            .or_else(|| config.export.output_dir.clone())
            .unwrap_or_else(|| PathBuf::from("."))
    })
}

fn export_pdf(exporter: &ReportExporter, study: &Study, plot: &Plot, dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    let mut sink = DirectorySink::new(dir);
    if let Some(receipt) = exporter.export_pdf(Some(study), Some(plot), &mut sink)? {
        eprintln!(
            "wrote {} ({} pages, {} bytes)",
            dir.join(&receipt.filename).display(),
            receipt.pages,
            receipt.bytes
        );
    }
    Ok(())
}

fn export_text(exporter: &ReportExporter, study: &Study, plot: &Plot) -> Result<()> {
    let mut sink = WriterSink::stdout();
    exporter.export_text(Some(study), Some(plot), &mut sink)?;
    Ok(())
}

fn run_study(global: &GlobalOpts, args: &StudyArgs) -> Result<()> {
    let resolved = load(global)?;
    let mut settings = resolved.config.analysis.clone();
    if let Some(provider) = args.analyzer {
        settings.provider = provider;
    }

    let analyzer = analyzer_from_settings(&settings)?;
    let service = StudyService::new(Arc::new(MemoryRepository::seeded()), analyzer);
    let study = service.generate_study(&PlotId::from(args.plot_id.as_str()))?;
    let plot = service.get_plot(&study.plot_id)?;
    let exporter = ReportExporter::new(report_config(&resolved.config.export));

    if let Some(dir) = pdf_dir(&args.pdf, &resolved.config) {
        export_pdf(&exporter, &study, &plot, &dir)?;
    }

    if args.json {
        print_json(&study)?;
    } else if args.text {
        export_text(&exporter, &study, &plot)?;
    } else {
        println!(
            "{} generated for {} ({} sections)",
            study.id,
            plot.id,
            study.populated_sections().len()
        );
    }
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn run_render(global: &GlobalOpts, args: &RenderArgs) -> Result<()> {
    let resolved = load(global)?;
    let study: Study = read_json(&args.study)?;
    let plot: Plot = read_json(&args.plot)?;
    plot.validate()?;

    let exporter = ReportExporter::new(report_config(&resolved.config.export));
    let pdf = pdf_dir(&args.pdf, &resolved.config);
    if let Some(dir) = &pdf {
        export_pdf(&exporter, &study, &plot, dir)?;
    }
    if args.text || pdf.is_none() {
        export_text(&exporter, &study, &plot)?;
    }
    Ok(())
}

fn run_serve(global: &GlobalOpts, bind: Option<&str>) -> Result<()> {
    let resolved = load(global)?;
    let analyzer = analyzer_from_settings(&resolved.config.analysis)?;
    let service = StudyService::new(Arc::new(MemoryRepository::seeded()), analyzer);
    let exporter = ReportExporter::new(report_config(&resolved.config.export));

    let bind = bind.unwrap_or(&resolved.config.server.bind);
    let server = ApiServer::start(bind, ApiState::new(service, exporter))?;
    info!(addr = %server.addr(), config_source = %resolved.source, "serving");
    eprintln!("listening on http://{}", server.addr());
    server.wait();
    Ok(())
}

fn run_config(global: &GlobalOpts, command: &ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Show => {
            let resolved = load(global)?;
            let toml = resolved.config.to_toml_string().map_err(config_error)?;
            match &resolved.path {
                Some(path) => println!("# source: {} ({})", resolved.source, path.display()),
                None => println!("# source: {}", resolved.source),
            }
            print!("{}", toml);
            Ok(())
        }
        ConfigCommands::Validate { path: Some(path) } => {
            let config = HbuConfig::from_file(path).map_err(config_error)?;
            validate_config(&config).map_err(config_error)?;
            println!("{}: valid", path.display());
            Ok(())
        }
        ConfigCommands::Validate { path: None } => {
            let resolved = load(global)?;
            match &resolved.path {
                Some(path) => println!("{}: valid", path.display()),
                None => println!("no config file found; built-in defaults are valid"),
            }
            Ok(())
        }
    }
}
