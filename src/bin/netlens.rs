use clap::{Parser, Subcommand, ValueEnum};
use console::{Term, set_colors_enabled, style};
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use netlens::config::Config;
use netlens::fmt::{self, text};
use netlens::services::write_output;
use netlens::{NetlensError, load_ntp, load_traceroute};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "netlens")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Summarize NTP query and traceroute logs")]
#[command(long_about = Some(
    "Parse NTP query dumps and traceroute logs into records and per-group statistics.\n\
     \n\
     Examples:\n\
       netlens ntp\n\
       netlens ntp logs/ntp_output.txt --json --pretty\n\
       netlens traceroute traceroute_results.txt --dot hops.dot"
))]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Output format: text or json
    #[arg(short = 'f', long, value_enum, global = true)]
    format: Option<OutputFormat>,

    /// Alias for JSON output
    #[arg(short = 'j', long, global = true)]
    json: bool,

    /// Pretty-print JSON
    #[arg(short = 'p', long, global = true)]
    pretty: bool,

    /// Disable colored output
    #[arg(long = "no-color", alias = "nocolor", global = true)]
    no_color: bool,

    /// Show skipped-line counters and debug logs
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    /// Read settings from this TOML file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Per-server delay, offset and jitter from an NTP query log
    Ntp {
        /// Log file (default: ntp_output.txt)
        path: Option<PathBuf>,
    },
    /// Per-hop latency from a traceroute log
    Traceroute {
        /// Log file (default: traceroute_results.txt)
        path: Option<PathBuf>,

        /// Write the hop-chain graph in Graphviz DOT format
        #[arg(long)]
        dot: Option<PathBuf>,
    },
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);
    let term = Term::stdout();

    let config = match Config::load(args.config.as_deref()) {
        Ok(c) => c,
        Err(e) => process::exit(handle_error(&term, e)),
    };
    if let Some(path) = config.path() {
        debug!(path = %path.display(), "using config");
    }

    let format = if args.json {
        OutputFormat::Json
    } else if let Some(f) = args.format {
        f
    } else if config.defaults.format.as_deref() == Some("json") {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    let want_color = format == OutputFormat::Text
        && io::stdout().is_terminal()
        && std::env::var_os("NO_COLOR").is_none()
        && !args.no_color
        && config.defaults.color != Some(false);
    set_colors_enabled(want_color);

    if args.pretty && format == OutputFormat::Text {
        term.write_line(
            &style("Error: There is no pretty print for the plain text display")
                .red()
                .bold()
                .to_string(),
        )
        .ok();
        process::exit(2);
    }

    let result = match &args.command {
        Command::Ntp { path } => {
            let path = path.clone().unwrap_or_else(|| config.ntp_log());
            run_ntp(&term, &path, format, &args)
        }
        Command::Traceroute { path, dot } => {
            let path = path.clone().unwrap_or_else(|| config.traceroute_log());
            run_traceroute(&term, &path, dot.as_deref(), format, &args)
        }
    };

    let code = match result {
        Ok(()) => 0,
        Err(e) => handle_error(&term, e),
    };
    process::exit(code);
}

fn run_ntp(
    term: &Term,
    path: &Path,
    format: OutputFormat,
    args: &Args,
) -> Result<(), NetlensError> {
    let extraction = load_ntp(path)?;
    if extraction.is_empty() {
        term.write_line(&style(text::NO_NTP_DATA).yellow().to_string())
            .ok();
        if args.verbose {
            term.write_line(&text::render_report(&extraction.report)).ok();
        }
        return Ok(());
    }

    let stats = extraction.stats();
    match format {
        OutputFormat::Json => {
            let doc = fmt::json::ntp_to_json(
                &path.display().to_string(),
                &extraction.samples,
                &stats,
                &extraction.report,
                args.pretty,
            )?;
            println!("{}", doc);
        }
        OutputFormat::Text => {
            term.write_line(&style("Parsed NTP Data:").bold().to_string())
                .ok();
            term.write_line(&text::render_samples(&extraction.samples))
                .ok();
            term.write_line(&text::render_stats(
                "Stats (min, max, mean, std) for Delay & Jitter:",
                "Server",
                &stats,
            ))
            .ok();
            if args.verbose {
                term.write_line(&text::render_report(&extraction.report)).ok();
            }
        }
    }
    Ok(())
}

fn run_traceroute(
    term: &Term,
    path: &Path,
    dot: Option<&Path>,
    format: OutputFormat,
    args: &Args,
) -> Result<(), NetlensError> {
    let extraction = load_traceroute(path)?;
    if extraction.is_empty() {
        term.write_line(&style(text::NO_TRACEROUTE_DATA).yellow().to_string())
            .ok();
        if args.verbose {
            term.write_line(&text::render_report(&extraction.report)).ok();
        }
        return Ok(());
    }

    let rows = extraction.rows();
    let stats = extraction.stats();
    match format {
        OutputFormat::Json => {
            let doc = fmt::json::traceroute_to_json(
                &path.display().to_string(),
                &rows,
                &stats,
                &extraction.report,
                args.pretty,
            )?;
            println!("{}", doc);
        }
        OutputFormat::Text => {
            term.write_line(&style("Traceroute Hops:").bold().to_string())
                .ok();
            term.write_line(&text::render_hop_rows(&rows)).ok();
            term.write_line(&text::render_stats(
                "Stats (min, max, mean, std) for Avg Latency:",
                "Target",
                &stats,
            ))
            .ok();
            if args.verbose {
                term.write_line(&text::render_report(&extraction.report)).ok();
            }
        }
    }

    if let Some(dot_path) = dot {
        let graph = extraction.graph();
        write_output(dot_path, &graph.to_dot())?;
        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "hop graph exported"
        );
        if format == OutputFormat::Text {
            term.write_line(&format!(
                "{} {}",
                style("Graph written to").cyan().bold(),
                style(dot_path.display()).green()
            ))
            .ok();
        }
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "warn,netlens=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn handle_error(term: &Term, err: NetlensError) -> i32 {
    term.write_line(&style(format!("Error: {}", err)).red().to_string())
        .ok();
    match err {
        NetlensError::Io { .. } | NetlensError::Write { .. } => 1,
        NetlensError::Config(_) => 3,
        _ => 4,
    }
}
