//! ukbkings CLI - biobank field-dictionary munger.

mod cli;
mod commands;
mod logging;

use clap::Parser;
use cli::{Cli, Commands};
use logging::LogConfig;

fn main() {
    let cli = Cli::parse();

    let log_config = LogConfig::from_verbosity(cli.verbose).with_format(cli.log_format);
    logging::init_logging(&log_config);

    let result = match cli.command {
        Commands::Munge {
            html,
            basket,
            out_dir,
            json,
            utf8,
        } => commands::munge::run(html, basket, out_dir, json, utf8),

        Commands::Link {
            project_id,
            fam,
            sample,
            skip_datasets,
            dry_run,
            root,
        } => commands::link::run(project_id, fam, sample, skip_datasets, dry_run, root),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
