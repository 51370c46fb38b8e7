// Startup module - displays banner and module status
//
// Headless and server-only runs print a banner to stdout. When the
// terminal front-end owns the screen the same information goes to the
// system logs panel instead.

use crate::cli::RunMode;
use crate::config::{Config, Invalidation, VERSION};

/// ANSI color codes for terminal output
mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GREEN: &str = "\x1b[32m";
    pub const MAGENTA: &str = "\x1b[35m";
}

/// Module status for display
pub struct ModuleStatus {
    pub name: &'static str,
    pub enabled: bool,
    pub description: String,
}

/// Print the startup banner and module status
/// This runs before the TUI takes over the screen (or in headless mode)
pub fn print_startup(config: &Config, mode: RunMode) {
    use colors::*;

    // Banner
    println!();
    println!("  {BOLD}{CYAN}Marquee{RESET} {DIM}v{VERSION}{RESET}");
    println!("  {DIM}Movie and actor catalog{RESET}");
    println!();

    // Config file status
    if let Some(path) = Config::config_path() {
        if path.exists() {
            println!("  {DIM}Config:{RESET} {GREEN}✓{RESET} {}", path.display());
        } else {
            println!("  {DIM}Config:{RESET} {DIM}(using defaults){RESET}");
        }
    }
    println!();

    for module in &module_status(config, mode) {
        print_module_status(module);
    }
    println!();

    if mode != RunMode::Tui {
        println!(
            "  {MAGENTA}▸{RESET} API listening on {BOLD}http://{}/api{RESET}",
            config.bind_addr
        );
    }
    println!();
}

/// Status of each part of the application for this run
pub fn module_status(config: &Config, mode: RunMode) -> Vec<ModuleStatus> {
    let serves = mode != RunMode::Tui;
    let shows_tui = match mode {
        RunMode::All => config.enable_tui,
        RunMode::Tui => true,
        RunMode::Serve => false,
    };
    let invalidation = match config.cache.invalidation {
        Invalidation::Patch => "patch local collections",
        Invalidation::Refetch => "refetch after mutations",
    };

    vec![
        ModuleStatus {
            name: "storage",
            enabled: serves,
            description: format!("SQLite {}", config.db_path.display()),
        },
        ModuleStatus {
            name: "server",
            enabled: serves,
            description: format!("REST API on {}", config.bind_addr),
        },
        ModuleStatus {
            name: "tui",
            enabled: shows_tui,
            description: format!("Terminal front-end -> {}", config.api_base),
        },
        ModuleStatus {
            name: "cache",
            enabled: shows_tui,
            description: invalidation.to_string(),
        },
        ModuleStatus {
            name: "rollback",
            enabled: shows_tui && config.cache.rollback_on_failure,
            description: "Restore order when a reorder fails".to_string(),
        },
        ModuleStatus {
            name: "file-log",
            enabled: config.logging.file.enabled,
            description: format!("JSON logs in {}", config.logging.file.dir.display()),
        },
    ]
}

/// Print a single module's status
fn print_module_status(module: &ModuleStatus) {
    use colors::*;

    let (icon, style) = if module.enabled {
        (format!("{GREEN}✓{RESET}"), "")
    } else {
        (format!("{DIM}○{RESET}"), DIM)
    };

    println!(
        "    {icon} {style}{:<10}{RESET} {DIM}{}{RESET}",
        module.name, module.description
    );
}

/// Print startup messages to the TUI log panel
pub fn log_startup(config: &Config, mode: RunMode) {
    tracing::info!("═══════════════════════════════");
    tracing::info!("  🎬 MARQUEE v{}", VERSION);
    tracing::info!("═══════════════════════════════");

    for module in &module_status(config, mode) {
        let icon = if module.enabled { "✓" } else { "○" };
        tracing::info!("  {} {} - {}", icon, module.name, module.description);
    }

    if mode != RunMode::Tui {
        tracing::info!("▸ API on http://{}/api", config.bind_addr);
    }
    tracing::info!("Ready. F2 actors, F3 movies.");
}
