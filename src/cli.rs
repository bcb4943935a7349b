use clap::{Parser, ValueEnum};
use plugin_gallery::RenderMode;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "plugin-gallery")]
#[command(about = "Plugin Gallery preview - Loads topic-tagged plugin repositories and prints the rendered gallery")]
#[command(version)]
pub struct Cli {
    /// GitHub topic the gallery lists
    #[arg(long, env = "GALLERY_TOPIC", default_value = plugin_gallery::config::DEFAULT_TOPIC)]
    pub topic: String,

    /// GitHub REST API base URL
    #[arg(long, env = "GALLERY_API_URL", default_value = plugin_gallery::config::DEFAULT_API_BASE_URL)]
    pub api_url: String,

    /// Raw content host used for README lookups
    #[arg(long, env = "GALLERY_RAW_URL", default_value = plugin_gallery::config::DEFAULT_RAW_BASE_URL)]
    pub raw_url: String,

    /// Entry layout
    #[arg(long, value_enum, default_value_t = ModeArg::Rich)]
    pub mode: ModeArg,

    /// Number of pages to load, starting at page 1
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub pages: u32,

    /// Write the gallery markup here instead of stdout
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Print per-page summaries as JSON on stderr
    #[arg(long)]
    pub json: bool,
}

/// Command-line spelling of [`RenderMode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Click opens the repository
    Simple,
    /// Collapsible README body
    Rich,
}

impl From<ModeArg> for RenderMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Simple => RenderMode::Simple,
            ModeArg::Rich => RenderMode::Rich,
        }
    }
}
