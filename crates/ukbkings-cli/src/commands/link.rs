//! Link command - publish dataset files under the project directory.

use std::path::{Path, PathBuf};

use colored::Colorize;
use ukbkings::link::project_id_from_path;
use ukbkings::{LinkConfig, LinkPlan};

pub fn run(
    project_id: Option<String>,
    fam: Option<PathBuf>,
    sample: Option<PathBuf>,
    skip_datasets: bool,
    dry_run: bool,
    root: PathBuf,
) -> Result<(), Box<dyn std::error::Error>> {
    let project_id = match project_id {
        Some(id) => id,
        None => resolve_project_id(&root)?,
    };

    let plan = LinkPlan::build(
        &project_id,
        fam.as_deref(),
        sample.as_deref(),
        skip_datasets,
        &LinkConfig::default(),
    );

    if dry_run {
        println!(
            "{} {} links for ukb{}",
            "Would create".cyan().bold(),
            plan.link_count(),
            project_id
        );
        print!("{}", plan);
        return Ok(());
    }

    let created = plan.apply(&root)?;

    println!(
        "{} {} links for ukb{} in {}",
        "Created".green().bold(),
        created.len().to_string().white().bold(),
        project_id,
        root.display()
    );

    Ok(())
}

fn resolve_project_id(root: &Path) -> Result<String, Box<dyn std::error::Error>> {
    let dir = std::fs::canonicalize(root)?;
    project_id_from_path(&dir.to_string_lossy()).ok_or_else(|| {
        format!(
            "Cannot derive a project id from '{}'; pass PROJECT_ID explicitly",
            dir.display()
        )
        .into()
    })
}
