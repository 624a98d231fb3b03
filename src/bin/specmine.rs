//! Command-line front end for specmine
//!
//! Usage: specmine translate|check [options]

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod cli;

use cli::OutputFormat;

#[derive(Parser)]
#[command(name = "specmine")]
#[command(about = "Translate API documentation into executable specifications", long_about = None)]
struct Cli {
    /// Verbose output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate the tag comments of documented members into conditions
    Translate {
        /// JSON array of documented members
        members: PathBuf,

        /// JSON array of type declarations
        #[arg(long)]
        types: PathBuf,

        /// JSON proposition table decomposing each comment
        #[arg(long)]
        propositions: PathBuf,

        /// Translator configuration (JSON)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output file (default: print to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format of the summary
        #[arg(long, default_value = "human")]
        format: OutputFormat,
    },

    /// Check translated members for conflicting specifications
    Check {
        /// Member files or directories containing them
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Output format
        #[arg(long, default_value = "human")]
        format: OutputFormat,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let exit_code = match cli.command {
        Commands::Translate {
            members,
            types,
            propositions,
            config,
            output,
            format,
        } => cli::translate::handle_translate(
            &cli::translate::TranslateArgs {
                members,
                types,
                propositions,
                config,
                output,
            },
            format,
        ),
        Commands::Check { paths, format } => cli::check::handle_check(&paths, format),
    };

    std::process::exit(exit_code);
}

/// Log to stderr; `RUST_LOG` overrides the verbosity flag
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("specmine={}", default_level)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
