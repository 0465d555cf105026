use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use clap::{ArgGroup, CommandFactory, Parser, Subcommand, ValueEnum};
use miette::{Context, IntoDiagnostic, Result};
use tracing_subscriber::EnvFilter;

use git_owner_core::{IdentityMode, OutputFormat, OwnerConfig, OwnerError, Signals, WeightConfig};
use git_owner_estimator::{estimate_file, FileEstimate};
use git_owner_extract::log::LogOptions;
use git_owner_extract::GitRecordSource;

const CONFIG_FILE: &str = ".git-owner.toml";

#[derive(Parser)]
#[command(
    name = "git-owner",
    version,
    about = "Estimate who the approximate owner of a file is in a Git repository",
    long_about = "Estimate who the approximate owner of a file is in a Git repository.\n\n\
                   Combines who wrote the lines that survive today (git blame) with who\n\
                   committed to the file over time (git log) into one ranked list.\n\n\
                   Examples:\n  \
                     git-owner src/main.rs                 Ranked owners of one file\n  \
                     git-owner -m src/*.rs                 Only the most likely owner per file\n  \
                     git-owner --only-log --names lib.rs   Rank by commit history, by author name\n  \
                     git-owner --recency --half-life 30 a.rs   Favor recent commits",
    args_conflicts_with_subcommands = true,
    subcommand_negates_reqs = true,
    group(ArgGroup::new("signal").args(["only_log", "only_blame"]))
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// One or more files in the current Git repository
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Show only the most likely owner without additional statistics
    #[arg(short, long)]
    most_likely: bool,

    /// Identify users by name rather than by email
    #[arg(short, long)]
    names: bool,

    /// Show debugging messages
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Estimate only from Git log
    #[arg(short = 'l', long)]
    only_log: bool,

    /// Estimate only from Git blame
    #[arg(short = 'b', long)]
    only_blame: bool,

    /// Share of the blame signal in the combined score, 0.0 to 1.0 (default: 0.7)
    #[arg(long, value_name = "COEFFICIENT")]
    blame_weight: Option<f64>,

    /// Weight recent commits more than old ones
    #[arg(long)]
    recency: bool,

    /// Age in days at which a commit counts half (default: 90)
    #[arg(long, value_name = "DAYS")]
    half_life: Option<f64>,

    /// Show at most N authors per file
    #[arg(long, value_name = "N")]
    top: Option<usize>,

    /// Measure commit ages from this date (RFC 3339 or YYYY-MM-DD) instead of now
    #[arg(long, value_name = "DATE")]
    as_of: Option<String>,

    /// Stop following a file's history at renames
    #[arg(long)]
    no_follow: bool,

    /// Consider at most N commits per file, newest first
    #[arg(long, value_name = "N")]
    max_commits: Option<usize>,

    /// Path to configuration file (default: .git-owner.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        global = true,
        default_value = "text",
        long_help = "Output format for results.\n\n\
                       Formats:\n  \
                         text      Ranked lines per file (default)\n  \
                         json      Machine-readable JSON with camelCase keys\n  \
                         markdown  GitHub-flavored Markdown"
    )]
    format: OutputFormat,

    /// When to use colors
    #[arg(long, global = true, default_value = "auto")]
    color: ColorChoice,
}

#[derive(Subcommand)]
enum Command {
    /// Create a default .git-owner.toml configuration file
    Init,
    /// Generate shell completion scripts
    #[command(hide = true)]
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Clone, PartialEq, Eq, ValueEnum)]
enum ColorChoice {
    /// Auto-detect based on terminal
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

const DEFAULT_CONFIG: &str = r#"# git-owner configuration

[weights]
# Share of git blame in the combined score; the rest comes from git log.
# blame_weight_coefficient = 0.7
# Weight recent commits more than old ones.
# recency_decay_enabled = false
# decay_half_life_days = 90.0
# decay_factor = 0.5
# Show at most this many authors per file.
# top_n = 5

[identity]
# "email" or "name"
# mode = "email"
"#;

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<OwnerConfig> {
    match path {
        Some(path) => OwnerConfig::from_file(path)
            .wrap_err(format!("loading {}", path.display())),
        None => {
            let default_path = Path::new(CONFIG_FILE);
            if default_path.exists() {
                OwnerConfig::from_file(default_path).wrap_err(format!("loading {CONFIG_FILE}"))
            } else {
                Ok(OwnerConfig::default())
            }
        }
    }
}

/// Fold CLI flags over the configured weights; flags win.
fn resolve_weights(cli: &Cli, config: &OwnerConfig) -> Result<WeightConfig> {
    let mut weights = config.weights;
    if let Some(c) = cli.blame_weight {
        weights.blame_weight_coefficient = c;
    }
    if cli.recency {
        weights.recency_decay_enabled = true;
    }
    if let Some(days) = cli.half_life {
        weights.decay_half_life_days = days;
    }
    if cli.top.is_some() {
        weights.top_n = cli.top;
    }
    weights.validate()?;
    Ok(weights)
}

fn resolve_log_options(cli: &Cli) -> LogOptions {
    LogOptions {
        follow_renames: !cli.no_follow,
        max_commits: cli.max_commits,
    }
}

fn resolve_signals(cli: &Cli) -> Signals {
    if cli.only_log {
        Signals::LogOnly
    } else if cli.only_blame {
        Signals::BlameOnly
    } else {
        Signals::Both
    }
}

/// Decay reference: `--as-of` if given, otherwise now.
fn resolve_reference_time(cli: &Cli, weights: &WeightConfig) -> Result<Option<i64>> {
    match &cli.as_of {
        Some(raw) => parse_as_of(raw).map(Some),
        None if weights.recency_decay_enabled => Ok(Some(Utc::now().timestamp())),
        None => Ok(None),
    }
}

fn parse_as_of(raw: &str) -> Result<i64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.timestamp());
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .into_diagnostic()
        .wrap_err(format!("invalid --as-of date '{raw}' (expected RFC 3339 or YYYY-MM-DD)"))?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| miette::miette!("invalid --as-of date '{raw}'"))?;
    Ok(midnight.and_utc().timestamp())
}

fn print_text(estimates: &[FileEstimate], most_likely: bool, use_color: bool) {
    let multiple = estimates.len() > 1;
    for estimate in estimates {
        if most_likely {
            println!("{}", estimate.report.estimated_owner);
            continue;
        }
        if multiple {
            if use_color {
                println!("\x1b[1m-- {} --\x1b[0m", estimate.path);
            } else {
                println!("-- {} --", estimate.path);
            }
        }
        print!("{}", estimate.report);
    }
}

fn print_markdown(estimates: &[FileEstimate], most_likely: bool) {
    for estimate in estimates {
        if most_likely {
            println!("- `{}`: {}", estimate.path, estimate.report.estimated_owner);
        } else {
            println!("## `{}`\n", estimate.path);
            println!("{}", estimate.report.to_markdown());
        }
    }
}

fn print_json(estimates: &[FileEstimate], most_likely: bool) -> Result<()> {
    let json = if most_likely {
        let owners: Vec<_> = estimates
            .iter()
            .map(|e| {
                serde_json::json!({
                    "path": e.path,
                    "estimatedOwner": e.report.estimated_owner,
                })
            })
            .collect();
        serde_json::to_string_pretty(&owners)
    } else {
        serde_json::to_string_pretty(estimates)
    };
    println!("{}", json.map_err(OwnerError::from)?);
    Ok(())
}

fn run_init() -> Result<()> {
    let path = Path::new(CONFIG_FILE);
    if path.exists() {
        miette::bail!(miette::miette!(
            help = "Edit the existing file or remove it first",
            "{CONFIG_FILE} already exists"
        ));
    }
    std::fs::write(path, DEFAULT_CONFIG)
        .into_diagnostic()
        .wrap_err(format!("writing {CONFIG_FILE}"))?;
    eprintln!("Created {CONFIG_FILE}");
    Ok(())
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .build(),
        )
    }))
    .expect("miette handler");
    human_panic::setup_panic!();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        Some(Command::Init) => return run_init(),
        Some(Command::Completions { shell }) => {
            clap_complete::generate(*shell, &mut Cli::command(), "git-owner", &mut std::io::stdout());
            return Ok(());
        }
        None => {}
    }

    let config = load_config(cli.config.as_deref())?;
    let weights = resolve_weights(&cli, &config)?;
    let signals = resolve_signals(&cli);
    let reference_time = resolve_reference_time(&cli, &weights)?;
    let identity = if cli.names {
        IdentityMode::Name
    } else {
        config.identity.mode
    };

    let use_color = match cli.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => std::io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    };

    tracing::debug!(?weights, ?signals, %identity, "resolved settings");

    let cwd = std::env::current_dir().into_diagnostic()?;
    let source = GitRecordSource::discover(&cwd, identity)
        .map_err(|e| {
            miette::miette!(
                help = "Run git-owner from inside a git repository",
                "{e}"
            )
        })?
        .with_log_options(resolve_log_options(&cli));
    tracing::debug!(workdir = ?source.workdir(), "repository opened");

    let mut estimates = Vec::with_capacity(cli.files.len());
    for file in &cli.files {
        let estimate = estimate_file(&source, file, signals, &weights, reference_time)
            .wrap_err(format!("estimating owner of {}", file.display()))?;
        estimates.push(estimate);
    }

    match cli.format {
        OutputFormat::Text => print_text(&estimates, cli.most_likely, use_color),
        OutputFormat::Markdown => print_markdown(&estimates, cli.most_likely),
        OutputFormat::Json => print_json(&estimates, cli.most_likely)?,
    }

    Ok(())
}
