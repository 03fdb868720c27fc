//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::logging::LogFormat;

/// ukbkings: biobank field-dictionary munger
#[derive(Parser)]
#[command(name = "ukbkings")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Log output format
    #[arg(long, global = true, default_value = "compact")]
    pub log_format: LogFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the field-to-name lookup table from a basket's HTML dictionary
    Munge {
        /// Path to the basket HTML file
        #[arg(long, value_name = "FILE")]
        html: PathBuf,

        /// Basket label used to name the output (e.g., ukb12345)
        #[arg(long)]
        basket: String,

        /// Output directory
        #[arg(long, default_value = "./")]
        out_dir: PathBuf,

        /// Print the run summary as JSON
        #[arg(long)]
        json: bool,

        /// Decode the HTML as UTF-8 instead of ISO-8859-1
        #[arg(long)]
        utf8: bool,
    },

    /// Link genotyped and imputed dataset files into the project directory
    Link {
        /// Project id (e.g., 12345); derived from the current directory when omitted
        #[arg(value_name = "PROJECT_ID")]
        project_id: Option<String>,

        /// Project-specific fam file
        #[arg(long)]
        fam: Option<PathBuf>,

        /// Project-specific sample file
        #[arg(long)]
        sample: Option<PathBuf>,

        /// Only link --fam/--sample; the shared dataset links already exist
        #[arg(long)]
        skip_datasets: bool,

        /// Print the actions without touching the file system
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Project directory to create links in
        #[arg(long, default_value = ".")]
        root: PathBuf,
    },
}
