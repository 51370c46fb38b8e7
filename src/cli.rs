// CLI module - command-line argument parsing and handlers
//
// Subcommands pick what runs:
// - (none): REST server in the background, terminal front-end in front
// - serve: REST server only
// - tui: terminal front-end only, against the configured API base
// - config --show | --reset | --path: configuration management

use crate::config::{Config, VERSION};
use clap::{Parser, Subcommand};
use std::io::Write;

/// Marquee - movie and actor catalog
#[derive(Parser)]
#[command(name = "marquee")]
#[command(version = VERSION)]
#[command(about = "Movie and actor catalog: REST server and terminal front-end", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the REST server only
    Serve,

    /// Run the terminal front-end only
    Tui,

    /// Manage configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Reset config file to defaults
        #[arg(long)]
        reset: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,
    },
}

/// What the binary should run after argument parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Server plus front-end (front-end skipped when headless)
    All,
    Serve,
    Tui,
}

impl Commands {
    fn run_mode(&self) -> Option<RunMode> {
        match self {
            Commands::Serve => Some(RunMode::Serve),
            Commands::Tui => Some(RunMode::Tui),
            Commands::Config { .. } => None,
        }
    }
}

/// Handle CLI commands
///
/// Returns the mode to run, or `None` when a command was handled here
/// (exit after).
pub fn handle_cli() -> Option<RunMode> {
    let cli = Cli::parse();

    match cli.command {
        None => Some(RunMode::All),
        Some(Commands::Config { show, reset, path }) => {
            if path {
                handle_config_path();
            } else if show {
                handle_config_show();
            } else if reset {
                handle_config_reset();
            } else {
                // No flag provided, show help
                println!("Usage: marquee config [--show|--reset|--path]");
                println!();
                println!("Options:");
                println!("  --show    Display effective configuration");
                println!("  --reset   Reset config file to defaults");
                println!("  --path    Show config file path");
            }
            None
        }
        Some(command) => command.run_mode(),
    }
}

fn handle_config_path() {
    match Config::config_path() {
        Some(path) => println!("{}", path.display()),
        None => {
            eprintln!("Error: Could not determine config path");
            std::process::exit(1);
        }
    }
}

fn handle_config_show() {
    let config = Config::from_env();

    println!("# Effective configuration (env > file > defaults)");
    println!();
    println!("enable_tui = {}", config.enable_tui);
    print!("{}", config.to_toml());

    // Show source info
    println!();
    if let Some(path) = Config::config_path() {
        if path.exists() {
            println!("# Source: {}", path.display());
        } else {
            println!("# Source: defaults (no config file)");
        }
    }
}

fn handle_config_reset() {
    let Some(path) = Config::config_path() else {
        eprintln!("Error: Could not determine config path");
        std::process::exit(1);
    };

    // Confirm if file exists
    if path.exists() {
        eprint!(
            "Config file exists at {}. Overwrite? [y/N] ",
            path.display()
        );
        let _ = std::io::stderr().flush();

        let mut input = String::new();
        if std::io::stdin().read_line(&mut input).is_err()
            || !input.trim().eq_ignore_ascii_case("y")
        {
            println!("Aborted.");
            return;
        }
    }

    // Create parent directory
    if let Some(parent) = path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            eprintln!("Error creating directory: {}", e);
            std::process::exit(1);
        }
    }

    // Write the default config (using Config's single source of truth)
    if let Err(e) = std::fs::write(&path, Config::default().to_toml()) {
        eprintln!("Error writing config: {}", e);
        std::process::exit(1);
    }

    println!("Config reset to defaults: {}", path.display());
}
