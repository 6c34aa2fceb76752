use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use ngreport_cli::OutputFormat;
use ngreport_cli::commands;
use ngreport_cli::commands::analyze::ReportConfig;
use ngreport_core::report::DEFAULT_REPORT_SIZE;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ngreport")]
#[command(author, version, about, long_about = None)]
#[command(
    about = "Per-endpoint latency reports from web-server access logs",
    long_about = "ngreport reads an nginx access log (plain or .gz), extracts the request \
                  path and request time of every well-formed line, and reports count, \
                  share of traffic, and total/average/median/maximum latency per endpoint."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Pretty)]
    format: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a latency report from an access log
    Analyze {
        /// Path to the access log (files ending in .gz are decompressed)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Number of endpoints to keep, ranked by total time
        #[arg(long, env = "NGREPORT_REPORT_SIZE", default_value_t = DEFAULT_REPORT_SIZE)]
        report_size: usize,

        /// Keep every endpoint in order of first appearance (overrides --report-size)
        #[arg(long)]
        all: bool,

        /// Write the report rows as JSON to this file
        #[arg(short, long, env = "NGREPORT_OUTPUT")]
        output: Option<PathBuf>,
    },

    /// Generate shell completion scripts
    #[command(after_long_help = COMPLETION_HELP)]
    Completion {
        /// Shell to generate completions for
        #[arg(long, value_enum)]
        shell: Shell,
    },
}

const COMPLETION_HELP: &str = "\
SUPPORTED SHELLS:
    bash, zsh, fish, powershell, elvish

INSTALLATION:
    bash:  ngreport completion --shell bash >> ~/.bashrc
    zsh:   ngreport completion --shell zsh > ~/.zfunc/_ngreport
           (with fpath+=~/.zfunc in ~/.zshrc)
    fish:  ngreport completion --shell fish > ~/.config/fish/completions/ngreport.fish";

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    // Execute the command
    match cli.command {
        Commands::Analyze {
            file,
            report_size,
            all,
            output,
        } => {
            let config = ReportConfig {
                report_size: (!all).then_some(report_size),
                output,
            };
            commands::analyze::execute(&file, &config, cli.format)
        }
        Commands::Completion { shell } => {
            commands::completion::execute(shell, &mut Cli::command())
        }
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("ngreport=debug,ngreport_cli=debug,ngreport_core=debug")
    } else {
        EnvFilter::new("ngreport=info,ngreport_cli=info,ngreport_core=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
