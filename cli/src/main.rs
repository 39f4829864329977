use std::fs;
use std::io::{self, BufWriter, Read, Write};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use flagkit_core::{DistanceEngine, Split, closest_match, optimal_breakpoint, wrap};
use flagkit_flags::{
    BoundedInt, COLOR_FORMATS_HELP, ColorString, FilePath, FlagSet, UsageConfig,
};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Output format for the distance matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum CliOutputFormat {
    Table,
    Json,
    Yaml,
}

#[derive(Debug, Parser)]
#[command(name = "flagkit", version)]
#[command(about = "Fuzzy flag matching, usage layout and paragraph wrapping")]
struct Cli {
    /// Log debug events to stderr. RUST_LOG takes precedence when set.
    #[arg(long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the edit distance between two strings.
    Distance(DistanceArgs),
    /// Suggest the candidate most likely meant by a mistyped name.
    Suggest(SuggestArgs),
    /// Pick the label column width for a usage screen.
    Breakpoint(BreakpointArgs),
    /// Wrap text from stdin or a file.
    Wrap(WrapArgs),
    /// Compute all pairwise distances between names in parallel.
    Matrix(MatrixArgs),
    /// Run the sample "inout" program on the given arguments.
    Demo(DemoArgs),
}

#[derive(Debug, Args)]
struct DistanceArgs {
    /// First string.
    a: String,
    /// Second string.
    b: String,
    /// Cap the result at this value.
    #[arg(long)]
    cutoff: Option<usize>,
}

#[derive(Debug, Args)]
struct SuggestArgs {
    /// The mistyped name.
    name: String,
    /// Comma-separated candidate names.
    #[arg(long)]
    candidates: String,
}

#[derive(Debug, Args)]
struct BreakpointArgs {
    /// Total width available for label plus description.
    #[arg(long)]
    max_width: u16,
    /// Entries as LABEL_WIDTH:DESCRIPTION_WIDTH.
    #[arg(required = true)]
    entries: Vec<String>,
}

#[derive(Debug, Args)]
struct WrapArgs {
    /// Line width in code points (default: line_width from --config, or 80).
    #[arg(long)]
    width: Option<usize>,
    /// Read text from this file instead of stdin.
    #[arg(long)]
    input: Option<PathBuf>,
    /// Path to a usage layout YAML file.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct MatrixArgs {
    /// Comma-separated names.
    #[arg(long)]
    names: String,
    /// Cap every distance at this value.
    #[arg(long)]
    cutoff: Option<usize>,
    /// Number of worker threads (default: number of CPUs).
    #[arg(long)]
    jobs: Option<usize>,
    /// Output format.
    #[arg(long, default_value = "table")]
    format: CliOutputFormat,
}

#[derive(Debug, Args)]
#[command(disable_help_flag = true)]
struct DemoArgs {
    /// Arguments for the sample program, e.g. `-c #F80 --number 42`.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

#[derive(Debug, Serialize)]
struct DistanceMatrix {
    names: Vec<String>,
    cutoff: Option<usize>,
    distances: Vec<Vec<usize>>,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Distance(args) => run_distance(args),
        Command::Suggest(args) => run_suggest(args),
        Command::Breakpoint(args) => run_breakpoint(args),
        Command::Wrap(args) => run_wrap(args),
        Command::Matrix(args) => run_matrix(args),
        Command::Demo(args) => run_demo(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run_distance(args: DistanceArgs) -> Result<(), String> {
    let engine = DistanceEngine::new();
    let distance = engine
        .distance(&args.a, &args.b, args.cutoff)
        .map_err(|err| format!("Failed to compare inputs: {err}"))?;
    println!("{distance}");
    Ok(())
}

fn run_suggest(args: SuggestArgs) -> Result<(), String> {
    let candidates = parse_csv_list(&args.candidates);
    if candidates.is_empty() {
        return Err("--candidates must name at least one candidate".to_string());
    }

    let engine = DistanceEngine::new();
    match closest_match(&engine, &args.name, candidates.iter().map(String::as_str)) {
        Some(suggestion) => println!("{}", suggestion.candidate),
        None => println!("no close match"),
    }
    Ok(())
}

fn run_breakpoint(args: BreakpointArgs) -> Result<(), String> {
    let entries = args
        .entries
        .iter()
        .map(|raw| parse_split(raw))
        .collect::<Result<Vec<Split>, String>>()?;
    let width = optimal_breakpoint(&entries, args.max_width);
    let single_line = entries
        .iter()
        .filter(|split| split.fits_at(width, args.max_width))
        .count();
    debug!(width, single_line, total = entries.len(), "Chosen breakpoint");
    println!("{width}");
    Ok(())
}

fn run_wrap(args: WrapArgs) -> Result<(), String> {
    let config = match &args.config {
        Some(path) => UsageConfig::load(path)
            .map_err(|err| format!("Failed to load '{}': {err}", path.display()))?,
        None => UsageConfig::default(),
    };
    let width = args.width.unwrap_or(config.line_width);

    let text = match &args.input {
        Some(path) => fs::read_to_string(path)
            .map_err(|err| format!("Failed to read '{}': {err}", path.display()))?,
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .map_err(|err| format!("Failed to read stdin: {err}"))?;
            text
        }
    };
    let text = normalize_line_endings(&text);

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    wrap(&text, width, |line| writeln!(out, "{line}"))
        .and_then(|()| out.flush())
        .map_err(|err| format!("Failed to wrap input: {err}"))
}

fn run_matrix(args: MatrixArgs) -> Result<(), String> {
    use rayon::prelude::*;

    let names = parse_csv_list(&args.names);
    if names.is_empty() {
        return Err("--names must list at least one name".to_string());
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(jobs) = args.jobs {
        builder = builder.num_threads(jobs);
    }
    let pool = builder
        .build()
        .map_err(|e| format!("Failed to create thread pool: {e}"))?;

    let engine = DistanceEngine::new();
    let n = names.len();
    let cells: Vec<usize> = pool
        .install(|| {
            (0..n * n)
                .into_par_iter()
                .map(|cell| engine.distance(&names[cell / n], &names[cell % n], args.cutoff))
                .collect::<Result<Vec<usize>, _>>()
        })
        .map_err(|err| format!("Failed to compare names: {err}"))?;
    debug!(
        names = n,
        shared_cells = engine.pool().capacity(),
        "Distance matrix complete"
    );

    let matrix = DistanceMatrix {
        distances: cells.chunks(n).map(<[usize]>::to_vec).collect(),
        names,
        cutoff: args.cutoff,
    };
    let raw = format_matrix(&matrix, args.format)?;
    print!("{raw}");
    Ok(())
}

fn run_demo(args: DemoArgs) -> Result<(), String> {
    let mut flags = demo_flags().map_err(|err| format!("Failed to register demo flags: {err}"))?;
    flags.parse_or_exit(args.args);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    flags
        .for_each_flag(|name, value| {
            if flags.set_by_user(name) {
                writeln!(out, "Value of '--{name}': {value}")
            } else {
                writeln!(out, "Value of '--{name}': unset")
            }
        })
        .map_err(|err| format!("Failed to write values: {err}"))?;
    if !flags.extra_args().is_empty() {
        writeln!(out, "Extra arguments: {}", flags.extra_args().join(", "))
            .map_err(|err| format!("Failed to write values: {err}"))?;
    }
    Ok(())
}

/// The sample program behind `flagkit demo`.
fn demo_flags() -> Result<FlagSet, flagkit_flags::RegistrationError> {
    let mut flags = FlagSet::new("inout", "Given some flags, inout prints the passed values.");
    flags.register_flag("color", "Color in hex or rgb format.", ColorString::new(0, 0, 0))?;
    flags.register_flag("number", "Number between 11 and 99.", BoundedInt::new(0, 11, 99))?;
    flags.register_flag(
        "output",
        "Output image path, must end with .png or .jpg.",
        FilePath::new("output.png", &["png", "jpg"]),
    )?;
    flags.register_short_aliases("color", &['c'])?;
    flags.register_short_aliases("number", &['n'])?;
    flags.register_short_aliases("output", &['o'])?;
    flags.add_usage_section(format!("Color formats:\n{COLOR_FORMATS_HELP}"));
    Ok(flags)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_csv_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// Parses a `LABEL_WIDTH:DESCRIPTION_WIDTH` breakpoint entry.
fn parse_split(raw: &str) -> Result<Split, String> {
    let (label, description) = raw
        .split_once(':')
        .ok_or_else(|| format!("Invalid entry '{raw}': expected LABEL_WIDTH:DESCRIPTION_WIDTH"))?;
    let label = label
        .trim()
        .parse::<u16>()
        .map_err(|err| format!("Invalid label width in '{raw}': {err}"))?;
    let description = description
        .trim()
        .parse::<u16>()
        .map_err(|err| format!("Invalid description width in '{raw}': {err}"))?;
    Ok(Split::new(label, description))
}

/// Converts CRLF line endings so the wrapper only sees `\n`.
fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n")
}

/// Formats a distance matrix in the requested output format.
fn format_matrix(matrix: &DistanceMatrix, format: CliOutputFormat) -> Result<String, String> {
    match format {
        CliOutputFormat::Json => serde_json::to_string_pretty(matrix)
            .map(|mut raw| {
                raw.push('\n');
                raw
            })
            .map_err(|e| format!("JSON serialization failed: {e}")),
        CliOutputFormat::Yaml => {
            serde_yaml::to_string(matrix).map_err(|e| format!("YAML serialization failed: {e}"))
        }
        CliOutputFormat::Table => Ok(format_table(matrix)),
    }
}

fn format_table(matrix: &DistanceMatrix) -> String {
    use std::fmt::Write as _;

    let name_width = matrix
        .names
        .iter()
        .map(|name| name.chars().count())
        .max()
        .unwrap_or(0);
    let column_widths: Vec<usize> = matrix
        .names
        .iter()
        .enumerate()
        .map(|(col, name)| {
            let widest = matrix
                .distances
                .iter()
                .map(|row| row[col].to_string().len())
                .max()
                .unwrap_or(0);
            name.chars().count().max(widest)
        })
        .collect();

    let mut out = String::new();
    let _ = write!(out, "{:name_width$}", "");
    for (name, width) in matrix.names.iter().zip(&column_widths) {
        let _ = write!(out, "  {name:>width$}");
    }
    out.push('\n');

    for (name, row) in matrix.names.iter().zip(&matrix.distances) {
        let _ = write!(out, "{name:name_width$}");
        for (distance, width) in row.iter().zip(&column_widths) {
            let _ = write!(out, "  {distance:>width$}");
        }
        out.push('\n');
    }
    out
}
