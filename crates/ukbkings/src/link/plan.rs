//! Link plans: the ordered directory and symlink actions for a project.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{MungeError, Result};

static PROJECT_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"^.*biobank/ukb([^_]*)").unwrap());

/// Locations of the shared dataset release.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkConfig {
    /// Directory holding the genotyped binary files.
    pub genotyped_dir: PathBuf,
    /// Directory holding the imputed files and sample QC tables.
    pub imputed_dir: PathBuf,
    /// Chromosomes with imputed files, in link order.
    pub chromosomes: Vec<String>,
}

impl Default for LinkConfig {
    fn default() -> Self {
        let mut chromosomes = vec!["X".to_string(), "XY".to_string()];
        chromosomes.extend((1..=22).map(|c| c.to_string()));

        Self {
            genotyped_dir: PathBuf::from("/scratch/datasets/ukbiobank/June2017/Genotypes/"),
            imputed_dir: PathBuf::from("/scratch/datasets/ukbiobank/June2017/Imputed/"),
            chromosomes,
        }
    }
}

/// A single file-system action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum LinkAction {
    /// Create a directory (and parents) relative to the project root.
    CreateDir { path: PathBuf },
    /// Create `link` (relative to the project root) pointing at `target`.
    Symlink { target: PathBuf, link: PathBuf },
}

impl fmt::Display for LinkAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkAction::CreateDir { path } => write!(f, "mkdir -p {}", path.display()),
            LinkAction::Symlink { target, link } => {
                write!(f, "ln -s {} {}", target.display(), link.display())
            }
        }
    }
}

/// Ordered actions that publish a project's dataset files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinkPlan {
    pub project_id: String,
    pub actions: Vec<LinkAction>,
}

impl LinkPlan {
    /// Build the plan for a project.
    ///
    /// Shared dataset links are skipped when `initialized` is set; the
    /// project-specific `fam` and `sample` links are added whenever given.
    pub fn build(
        project_id: &str,
        fam: Option<&Path>,
        sample: Option<&Path>,
        initialized: bool,
        config: &LinkConfig,
    ) -> Self {
        let genotyped = PathBuf::from("genotyped");
        let imputed = PathBuf::from("imputed");
        let geno = &config.genotyped_dir;
        let imp = &config.imputed_dir;

        let mut actions = vec![
            LinkAction::CreateDir { path: genotyped.clone() },
            LinkAction::CreateDir { path: imputed.clone() },
        ];
        let mut link = |target: PathBuf, link: PathBuf| {
            actions.push(LinkAction::Symlink { target, link });
        };

        if !initialized {
            link(imp.join("ukb_sqc_v2.txt"), imputed.join("ukb_sqc.txt"));
            link(imp.join("ukb_sqc_v2_fields.txt"), imputed.join("ukb_sqc_fields.txt"));

            link(
                geno.join("ukb_binary_v2.bed"),
                genotyped.join(format!("ukb{}.bed", project_id)),
            );
            link(
                geno.join("ukb_binary_v2.bim"),
                genotyped.join(format!("ukb{}.bim", project_id)),
            );

            for chr in &config.chromosomes {
                link(
                    imp.join(format!("ukb_imp_chr{}_v3.bgen", chr)),
                    imputed.join(format!("ukb_imp_chr{}.bgen", chr)),
                );
                link(
                    imp.join(format!("ukb_imp_chr{}_v3.bgen.bgi", chr)),
                    imputed.join(format!("ukb_imp_chr{}.bgen.bgi", chr)),
                );
                link(
                    imp.join(format!("ukb_mfi_chr{}_v3.txt", chr)),
                    imputed.join(format!("ukb_mfi_chr{}.txt", chr)),
                );
            }
        }

        if let Some(fam) = fam {
            link(fam.to_path_buf(), genotyped.join(format!("ukb{}.fam", project_id)));
        }

        if let Some(sample) = sample {
            link(sample.to_path_buf(), imputed.join(format!("ukb{}.sample", project_id)));
        }

        Self {
            project_id: project_id.to_string(),
            actions,
        }
    }

    /// Number of symbolic links in the plan.
    pub fn link_count(&self) -> usize {
        self.actions
            .iter()
            .filter(|a| matches!(a, LinkAction::Symlink { .. }))
            .count()
    }

    /// Carry out the plan under `root`. Returns the links created.
    ///
    /// Directories are created if missing. A link whose path already exists
    /// fails the run; links made before the failure are left in place.
    pub fn apply(&self, root: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
        let root = root.as_ref();
        let mut created = Vec::new();

        for action in &self.actions {
            match action {
                LinkAction::CreateDir { path } => {
                    let path = root.join(path);
                    fs::create_dir_all(&path).map_err(|e| MungeError::Link { path, source: e })?;
                }
                LinkAction::Symlink { target, link } => {
                    let path = root.join(link);
                    symlink(target, &path).map_err(|e| MungeError::Link {
                        path: path.clone(),
                        source: e,
                    })?;
                    debug!(link = %path.display(), target = %target.display(), "linked");
                    created.push(path);
                }
            }
        }

        info!(project = %self.project_id, links = created.len(), "dataset links created");
        Ok(created)
    }
}

impl fmt::Display for LinkPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for action in &self.actions {
            writeln!(f, "{}", action)?;
        }
        Ok(())
    }
}

/// Derive a project id from a project directory path.
///
/// `/scratch/groups/ukbiobank/ukb18177_glanville` gives `18177`.
pub fn project_id_from_path(path: &str) -> Option<String> {
    PROJECT_ID
        .captures(path)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .filter(|id| !id.is_empty())
}

#[cfg(unix)]
fn symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::windows::fs::symlink_file(target, link)
}
