mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::config::ConfigSubcommand;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "readme-wizard",
    about = "Step-by-step README.md generator with GitHub pre-fill",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .readme-wizard/ or .git/)
    #[arg(long, global = true, env = "README_WIZARD_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create .readme-wizard/ with a default config
    Init,

    /// Show wizard progress
    Status,

    /// Show the fields of a step (default: the current step)
    Step { index: Option<usize> },

    /// Set a field value ("-" reads the value from stdin)
    Set {
        id: String,
        value: String,
        /// Overwrite existing content when suggestions apply
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Switch an include-section toggle on or off
    Toggle {
        id: String,
        #[arg(value_parser = ["on", "off"])]
        state: String,
    },

    /// Apply the canned suggestions of a project category
    Suggest {
        category: String,
        /// Overwrite existing content
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// List project categories
    Categories,

    /// Validate the current step and move forward
    Next,

    /// Go back one step
    Back,

    /// Leave the finished state and return to the first step
    Restart,

    /// Discard all progress
    Reset {
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Pre-fill fields from a public GitHub repository
    Analyze {
        /// Repository URL or owner/repo
        url: String,
        /// Let category suggestions overwrite existing content
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Render the README from the current answers
    Generate {
        /// Write to this file instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Walk through every step interactively
    Wizard,

    /// Inspect and validate the config
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },

    /// Serve the JSON API
    Ui {
        /// Port to listen on (0 = OS-assigned)
        #[arg(long, default_value = "0")]
        port: u16,

        /// Don't open browser automatically
        #[arg(long)]
        no_open: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Ui { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());
    let json = cli.json;

    let result = match cli.command {
        Commands::Init => cmd::init::run(&root),
        Commands::Status => cmd::status::run(&root, json),
        Commands::Step { index } => cmd::status::step(&root, index, json),
        Commands::Set { id, value, yes } => cmd::field::set(&root, &id, &value, yes, json),
        Commands::Toggle { id, state } => cmd::field::toggle(&root, &id, state == "on", json),
        Commands::Suggest { category, yes } => cmd::field::suggest(&root, &category, yes, json),
        Commands::Categories => cmd::field::categories(&root, json),
        Commands::Next => cmd::nav::next(&root, json),
        Commands::Back => cmd::nav::back(&root, json),
        Commands::Restart => cmd::nav::restart(&root, json),
        Commands::Reset { yes } => cmd::nav::reset(&root, yes, json),
        Commands::Analyze { url, yes } => cmd::analyze::run(&root, &url, yes, json),
        Commands::Generate { output } => cmd::generate::run(&root, output.as_deref(), json),
        Commands::Wizard => cmd::wizard::run(&root),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, json),
        Commands::Ui { port, no_open } => cmd::ui::run(&root, port, no_open),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
