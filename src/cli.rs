use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lazyframe")]
#[command(author, version, about = "Lazy-loading placeholders for embedded video players")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve a source URL to its vendor, media id and embed URL
    Resolve {
        /// Source URL (as it would appear in data-src)
        #[arg(required = true)]
        url: String,

        /// Build the embed URL with autoplay=0
        #[arg(long)]
        no_autoplay: bool,
    },

    /// Render placeholders for one or more URLs and print the resulting markup
    Render {
        /// Source URLs, one placeholder each
        #[arg(required = true)]
        urls: Vec<String>,

        /// Title applied to every placeholder
        #[arg(long)]
        title: Option<String>,

        /// Thumbnail URL applied to every placeholder
        #[arg(long)]
        thumbnail: Option<String>,

        /// Skip metadata lookups
        #[arg(long)]
        offline: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
