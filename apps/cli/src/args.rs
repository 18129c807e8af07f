use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use snus_core::TimeWindow;

#[derive(Debug, Parser)]
#[command(name = "snus-tracker", version, about = "Log snus usage and see what it costs")]
pub struct Cli {
    /// Use this database file instead of the configured one
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Print machine-readable JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log one portion now
    Log,
    /// Remove today's most recent portion
    Undo,
    /// Delete an entry by id
    Delete { id: i64 },
    /// List entries, newest first
    List {
        #[arg(long, value_enum)]
        window: Option<WindowArg>,
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// Totals, projection and cost for a window
    Stats {
        #[arg(long, value_enum)]
        window: Option<WindowArg>,
    },
    /// Show current settings
    Settings,
    /// Change a setting
    Set {
        #[arg(value_enum)]
        key: SettingKey,
        value: String,
    },
    /// Map markers and the overall cluster summary
    Markers,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum WindowArg {
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Total,
}

impl From<WindowArg> for TimeWindow {
    fn from(value: WindowArg) -> Self {
        match value {
            WindowArg::Daily => TimeWindow::Daily,
            WindowArg::Weekly => TimeWindow::Weekly,
            WindowArg::Monthly => TimeWindow::Monthly,
            WindowArg::Yearly => TimeWindow::Yearly,
            WindowArg::Total => TimeWindow::Total,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SettingKey {
    Cost,
    Portions,
    Period,
    DarkMode,
}
