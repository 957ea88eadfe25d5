#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser;
use glance::render::lines;
use glance::{default_source, Collector, Config, GlanceError, StyleConfig};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

/// Exit statuses
const EXIT_INVALID_OPTION: i32 = 1;
const EXIT_INVALID_ARGUMENT: i32 = 3;
const EXIT_EXCEPTION: i32 = 6;

const FIELDS_HELP: &str = "\
FIELDS:
  blank   Blank line
  colors  Sample of terminal colors
  cpu     CPU info
  fs      Filesystem usage
  host    Hostname
  ip      IPv4/IPv6 addresses (ipv4, ipv6 for one family)
  kernel  Kernel info
  os      Operating System info
  ram     RAM usage
  shell   Current shell
  tty     TTY info
  uptime  Uptime

EXIT STATUS:
  0  Success
  1  Invalid option
  3  Invalid argument (unknown field or style token)
  6  Exception";

/// System information at a glance
#[derive(Parser, Debug)]
#[command(name = "glance", version, about, after_help = FIELDS_HELP)]
struct Cli {
    /// Show the given field; repeat to choose fields and their order
    #[arg(short = 'f', long = "field", value_name = "KEY")]
    fields: Vec<String>,

    /// Disable colorized output
    #[arg(long)]
    no_color: bool,

    /// Config file (default: <config dir>/glance/rc)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log collection details to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
            _ => {
                let _ = e.print();
                process::exit(EXIT_INVALID_OPTION);
            }
        },
    };

    init_logging(cli.verbose);

    match run(&cli) {
        Ok(lines) => {
            if !lines.is_empty() {
                println!("{}", lines.join("\n"));
            }
        }
        Err(e) => {
            eprintln!("glance: {:#}", e);
            process::exit(exit_code(&e));
        }
    }
}

/// Report lines for the requested fields
fn run(cli: &Cli) -> Result<Vec<String>> {
    let path = cli.config.clone().unwrap_or_else(Config::default_path);
    let config = Config::load_or_init(&path)?;
    tracing::debug!(path = %path.display(), "config loaded");

    let style = StyleConfig::from_tokens(
        &config.field_colors[..],
        &config.data_colors[..],
        color_enabled(cli.no_color),
    )?;

    let collector = Collector::new(default_source(config.timeout()))
        .with_exclusion(&config.ignore_interfaces)?;

    // Command line order wins over the config order
    let keys: &[String] = if cli.fields.is_empty() {
        &config.fields
    } else {
        &cli.fields
    };

    let snapshot = collector
        .collect(keys)
        .context("could not build report")?;

    Ok(lines(&snapshot, &style))
}

/// Styling is on unless disabled by flag, environment or a non-terminal stdout
fn color_enabled(no_color_flag: bool) -> bool {
    if no_color_flag {
        return false;
    }
    if std::env::var_os("NO_COLOR").is_some() || std::env::var_os("GLANCE_NO_COLOR").is_some() {
        return false;
    }
    atty::is(atty::Stream::Stdout)
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("glance=debug")
    } else {
        EnvFilter::try_from_env("GLANCE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<GlanceError>() {
        Some(e) if e.is_usage_error() => EXIT_INVALID_ARGUMENT,
        _ => EXIT_EXCEPTION,
    }
}
