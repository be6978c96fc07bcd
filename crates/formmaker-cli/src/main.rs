//! formmaker CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "formmaker", version, about = "Form validation and grading toolkit")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Grade a submission against a form
    Grade {
        /// Path to the form JSON document
        #[arg(long)]
        form: PathBuf,

        /// Path to the submitted answers JSON (keyed by question index)
        #[arg(long)]
        answers: PathBuf,

        /// Output format: table, json, markdown
        #[arg(long, default_value = "table")]
        format: String,

        /// Directory to save the graded submission artifact into
        #[arg(long)]
        output: Option<PathBuf>,

        /// Fraction of the max score required to pass
        #[arg(long)]
        pass_threshold: Option<f64>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate form JSON files
    Validate {
        /// Path to a form file or directory
        #[arg(long)]
        form: PathBuf,
    },

    /// Show the structure of a form
    Inspect {
        /// Path to the form JSON document
        #[arg(long)]
        form: PathBuf,
    },

    /// Create starter config, sample form, and sample answers
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("formmaker=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Grade {
            form,
            answers,
            format,
            output,
            pass_threshold,
            config,
        } => commands::grade::execute(form, answers, format, output, pass_threshold, config),
        Commands::Validate { form } => commands::validate::execute(form),
        Commands::Inspect { form } => commands::inspect::execute(form),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
