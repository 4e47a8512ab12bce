mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{specs::SpecsSubcommand, tasks::TasksSubcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "specboard",
    about = "Dashboard for spec-kit style projects — discover, browse, and track tasks",
    version,
    propagate_version = true
)]
struct Cli {
    /// Projects root directory to scan (default: current directory)
    #[arg(long, global = true, env = "SPECBOARD_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan the root directory and list discovered projects
    Scan,

    /// List discovered projects (same scan, table by default)
    Projects,

    /// Browse and toggle tasks
    Tasks {
        #[command(subcommand)]
        subcommand: TasksSubcommand,
    },

    /// Show spec files
    Specs {
        #[command(subcommand)]
        subcommand: SpecsSubcommand,
    },

    /// List agent definitions for a project
    Agents {
        /// Project name or id
        project: String,
    },

    /// Start the web dashboard
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
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Scan | Commands::Projects => cmd::projects::run(&root, cli.json),
        Commands::Tasks { subcommand } => cmd::tasks::run(&root, subcommand, cli.json),
        Commands::Specs { subcommand } => cmd::specs::run(&root, subcommand, cli.json),
        Commands::Agents { project } => cmd::agents::run(&root, &project, cli.json),
        Commands::Ui { port, no_open } => cmd::ui::run(&root, port, no_open),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
